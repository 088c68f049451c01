//! FHIR wire/boundary support for the server fill tool.
//!
//! This crate provides **wire models** and **translation helpers** for the FHIR resources the
//! fill tool writes to a remote FHIR REST API:
//! - Patient (administrative gender only)
//! - Encounter (status, subject reference, period start)
//!
//! This crate focuses on:
//! - FHIR JSON serialisation/deserialisation
//! - translation between domain primitives and wire structs
//! - typed remote references (`Patient/42`) built from server responses
//!
//! Transport (HTTP) is not handled here; see `fill-core`.

pub mod encounter;
pub mod gender;
pub mod patient;
pub mod reference;

// Re-export facades
pub use encounter::Encounter;
pub use patient::Patient;

// Re-export public domain-level types
pub use encounter::{EncounterData, EncounterStatus};
pub use gender::AdministrativeGender;
pub use patient::PatientData;
pub use reference::{Reference, ResourceType};

use serde::de::DeserializeOwned;

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;

/// Deserialize a wire struct from JSON, naming the failing field path on mismatch.
fn from_json<T: DeserializeOwned>(json_text: &str, what: &str) -> FhirResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);

    match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            Err(FhirError::Translation(format!(
                "{what} schema mismatch at {path}: {source}"
            )))
        }
    }
}
