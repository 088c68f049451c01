use chrono::{DateTime, Utc};
use fhir::ResourceType;

#[derive(Debug, thiserror::Error)]
pub enum FillError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("date span from {min} to {max} does not contain a whole day")]
    EmptyDateSpan {
        min: DateTime<Utc>,
        max: DateTime<Utc>,
    },
    #[error("FHIR error: {0}")]
    Fhir(#[from] fhir::FhirError),
    #[error("request to FHIR server failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("FHIR server rejected {resource_type} creation with status {status}: {body}")]
    Status {
        resource_type: ResourceType,
        status: u16,
        body: String,
    },
    #[error("{0} creation response carried no id in the body or Location header")]
    MissingIdentifier(ResourceType),
}

pub type FillResult<T> = std::result::Result<T, FillError>;
