//! FHIR-aligned encounter wire models and translation helpers.
//!
//! Responsibilities:
//! - Define the public domain-level encounter type and the `encounter-status` value set
//! - Define a wire model for JSON serialisation/deserialisation
//! - Translate the subject reference and period start between wire strings and typed values
//!
//! Notes:
//! - `period.start` is written as an RFC 3339 UTC timestamp with second precision
//!   (e.g. `1987-06-05T14:00:00Z`); FHIR requires a zone whenever a time is present.

use crate::{from_json, FhirError, Reference, ResourceType};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Encounter status (FHIR R4 `encounter-status`, excluding `entered-in-error`/`unknown`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncounterStatus {
    Planned,
    Arrived,
    Triaged,
    InProgress,
    OnLeave,
    Finished,
    Cancelled,
}

impl EncounterStatus {
    /// Every status the generators may pick, in wire order.
    pub const ALL: [EncounterStatus; 7] = [
        EncounterStatus::Planned,
        EncounterStatus::Arrived,
        EncounterStatus::Triaged,
        EncounterStatus::InProgress,
        EncounterStatus::OnLeave,
        EncounterStatus::Finished,
        EncounterStatus::Cancelled,
    ];

    /// Convert to FHIR wire format string.
    pub fn to_wire(self) -> &'static str {
        match self {
            EncounterStatus::Planned => "planned",
            EncounterStatus::Arrived => "arrived",
            EncounterStatus::Triaged => "triaged",
            EncounterStatus::InProgress => "in-progress",
            EncounterStatus::OnLeave => "onleave",
            EncounterStatus::Finished => "finished",
            EncounterStatus::Cancelled => "cancelled",
        }
    }

    /// Parse from FHIR wire format string.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(EncounterStatus::Planned),
            "arrived" => Some(EncounterStatus::Arrived),
            "triaged" => Some(EncounterStatus::Triaged),
            "in-progress" => Some(EncounterStatus::InProgress),
            "onleave" => Some(EncounterStatus::OnLeave),
            "finished" => Some(EncounterStatus::Finished),
            "cancelled" => Some(EncounterStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for EncounterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_wire())
    }
}

/// Domain-level carrier for encounter data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncounterData {
    /// Server-assigned logical id; `None` until the encounter has been created.
    pub id: Option<String>,

    /// Current status of the encounter.
    pub status: EncounterStatus,

    /// The patient this encounter belongs to.
    pub subject: Reference,

    /// Start of the encounter period.
    pub period_start: DateTime<Utc>,
}

// ============================================================================
// Public Encounter operations
// ============================================================================

/// Encounter resource operations.
///
/// This is a zero-sized type used for namespacing encounter-related operations.
pub struct Encounter;

impl Encounter {
    /// Parse an encounter resource from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if:
    /// - the JSON does not match the wire schema (the failing path is named),
    /// - resourceType is not "Encounter",
    /// - status, subject or period start are missing or invalid.
    pub fn parse(json_text: &str) -> Result<EncounterData, FhirError> {
        let wire: EncounterWire = from_json(json_text, "Encounter")?;

        if wire.resource_type != ResourceType::Encounter.as_str() {
            return Err(FhirError::InvalidInput(format!(
                "Expected resourceType 'Encounter', got '{}'",
                wire.resource_type
            )));
        }

        wire_to_domain(wire)
    }

    /// Render an encounter resource as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if serialisation fails.
    pub fn render(data: &EncounterData) -> Result<String, FhirError> {
        let wire = domain_to_wire(data);
        serde_json::to_string(&wire)
            .map_err(|e| FhirError::Translation(format!("Failed to serialise encounter: {e}")))
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
struct EncounterWire {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<ReferenceWire>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
struct ReferenceWire {
    pub reference: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
struct PeriodWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn wire_to_domain(wire: EncounterWire) -> Result<EncounterData, FhirError> {
    let status = EncounterStatus::from_wire(&wire.status).ok_or_else(|| {
        FhirError::Translation(format!("Unsupported encounter status '{}'", wire.status))
    })?;

    let subject = wire
        .subject
        .ok_or_else(|| FhirError::Translation("Encounter has no subject".into()))?
        .reference
        .parse::<Reference>()?;

    let start = wire
        .period
        .and_then(|p| p.start)
        .ok_or_else(|| FhirError::Translation("Encounter has no period.start".into()))?;
    let period_start = DateTime::parse_from_rfc3339(&start)
        .map_err(|e| FhirError::Translation(format!("Invalid period.start '{start}': {e}")))?
        .with_timezone(&Utc);

    Ok(EncounterData {
        id: wire.id,
        status,
        subject,
        period_start,
    })
}

fn domain_to_wire(data: &EncounterData) -> EncounterWire {
    EncounterWire {
        resource_type: ResourceType::Encounter.as_str().to_string(),
        id: data.id.clone(),
        status: data.status.to_wire().to_string(),
        subject: Some(ReferenceWire {
            reference: data.subject.to_string(),
        }),
        period: Some(PeriodWire {
            start: Some(
                data.period_start
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> EncounterData {
        EncounterData {
            id: None,
            status: EncounterStatus::InProgress,
            subject: "Patient/42".parse().expect("valid reference"),
            period_start: Utc
                .with_ymd_and_hms(1987, 6, 5, 14, 0, 0)
                .single()
                .expect("valid datetime"),
        }
    }

    #[test]
    fn renders_expected_wire_shape() {
        let json = Encounter::render(&sample()).expect("should render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(
            value,
            serde_json::json!({
                "resourceType": "Encounter",
                "status": "in-progress",
                "subject": {"reference": "Patient/42"},
                "period": {"start": "1987-06-05T14:00:00Z"}
            })
        );
    }

    #[test]
    fn parses_server_response() {
        let input = r#"{
            "resourceType": "Encounter",
            "id": "e1",
            "meta": {"versionId": "1"},
            "status": "onleave",
            "subject": {"reference": "Patient/42"},
            "period": {"start": "1987-06-05T16:00:00+02:00"}
        }"#;

        let encounter = Encounter::parse(input).expect("should parse");
        assert_eq!(encounter.id.as_deref(), Some("e1"));
        assert_eq!(encounter.status, EncounterStatus::OnLeave);
        assert_eq!(encounter.subject.to_string(), "Patient/42");
        assert_eq!(encounter.period_start, sample().period_start);
    }

    #[test]
    fn rejects_missing_subject() {
        let input = r#"{"resourceType": "Encounter", "status": "planned",
            "period": {"start": "1987-06-05T14:00:00Z"}}"#;

        let err = Encounter::parse(input).expect_err("should reject");
        assert!(matches!(err, FhirError::Translation(msg) if msg.contains("subject")));
    }

    #[test]
    fn rejects_unknown_status() {
        let input = r#"{"resourceType": "Encounter", "status": "entered-in-error",
            "subject": {"reference": "Patient/1"},
            "period": {"start": "1987-06-05T14:00:00Z"}}"#;

        let err = Encounter::parse(input).expect_err("should reject");
        assert!(matches!(err, FhirError::Translation(msg) if msg.contains("entered-in-error")));
    }

    #[test]
    fn status_wire_strings_round_trip() {
        for status in EncounterStatus::ALL {
            assert_eq!(EncounterStatus::from_wire(status.to_wire()), Some(status));
        }
    }
}
