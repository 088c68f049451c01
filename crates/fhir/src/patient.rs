//! FHIR-aligned patient wire models and translation helpers.
//!
//! Responsibilities:
//! - Define the public domain-level patient type used by the generators
//! - Define a wire model for JSON serialisation/deserialisation
//! - Validate `resourceType` and gender codes on responses from the server
//!
//! Notes:
//! - Server responses carry many more fields (`meta`, `text`, ...) than this tool writes, so
//!   parsing ignores unknown keys rather than rejecting them.

use crate::{from_json, AdministrativeGender, FhirError, Reference, ResourceType};
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Domain-level carrier for patient data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientData {
    /// Server-assigned logical id; `None` until the patient has been created.
    pub id: Option<String>,

    /// Administrative gender.
    pub gender: Option<AdministrativeGender>,
}

impl PatientData {
    /// Reference to this patient on the remote server.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidReference`] if the patient has no (valid) server id.
    pub fn reference(&self) -> Result<Reference, FhirError> {
        let id = self.id.as_deref().ok_or_else(|| {
            FhirError::InvalidReference("patient has no server-assigned id".into())
        })?;
        Reference::new(ResourceType::Patient, id)
    }
}

// ============================================================================
// Public Patient operations
// ============================================================================

/// Patient resource operations.
///
/// This is a zero-sized type used for namespacing patient-related operations.
pub struct Patient;

impl Patient {
    /// Parse a patient resource from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if:
    /// - the JSON does not match the wire schema (the failing path is named),
    /// - resourceType is not "Patient",
    /// - gender is not an `administrative-gender` code.
    pub fn parse(json_text: &str) -> Result<PatientData, FhirError> {
        let wire: PatientWire = from_json(json_text, "Patient")?;

        if wire.resource_type != ResourceType::Patient.as_str() {
            return Err(FhirError::InvalidInput(format!(
                "Expected resourceType 'Patient', got '{}'",
                wire.resource_type
            )));
        }

        wire_to_domain(wire)
    }

    /// Render a patient resource as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if serialisation fails.
    pub fn render(data: &PatientData) -> Result<String, FhirError> {
        let wire = domain_to_wire(data);
        serde_json::to_string(&wire)
            .map_err(|e| FhirError::Translation(format!("Failed to serialise patient: {e}")))
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
struct PatientWire {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn wire_to_domain(wire: PatientWire) -> Result<PatientData, FhirError> {
    let gender = wire
        .gender
        .as_deref()
        .map(str::parse::<AdministrativeGender>)
        .transpose()?;

    Ok(PatientData {
        id: wire.id,
        gender,
    })
}

fn domain_to_wire(data: &PatientData) -> PatientWire {
    PatientWire {
        resource_type: ResourceType::Patient.as_str().to_string(),
        id: data.id.clone(),
        gender: data.gender.map(|g| g.to_wire().to_string()),
    }
}
