//! FHIR `AdministrativeGender` value set.

use crate::FhirError;
use std::fmt;
use std::str::FromStr;

/// Administrative gender of a patient (FHIR R4 `administrative-gender`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdministrativeGender {
    Male,
    Female,
    Other,
    Unknown,
}

impl AdministrativeGender {
    /// Every value in wire order.
    pub const ALL: [AdministrativeGender; 4] = [
        AdministrativeGender::Male,
        AdministrativeGender::Female,
        AdministrativeGender::Other,
        AdministrativeGender::Unknown,
    ];

    /// Convert to FHIR wire format string.
    pub fn to_wire(self) -> &'static str {
        match self {
            AdministrativeGender::Male => "male",
            AdministrativeGender::Female => "female",
            AdministrativeGender::Other => "other",
            AdministrativeGender::Unknown => "unknown",
        }
    }

    /// Parse from FHIR wire format string.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "male" => Some(AdministrativeGender::Male),
            "female" => Some(AdministrativeGender::Female),
            "other" => Some(AdministrativeGender::Other),
            "unknown" => Some(AdministrativeGender::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for AdministrativeGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_wire())
    }
}

impl FromStr for AdministrativeGender {
    type Err = FhirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s)
            .ok_or_else(|| FhirError::InvalidInput(format!("unknown administrative gender '{s}'")))
    }
}
