//! Typed remote references (`Patient/42`).
//!
//! A [`Reference`] names a resource that already exists on the remote FHIR server. It is only
//! built from a server-assigned id (creation response body or `Location` header) or by parsing
//! a well-formed relative reference, so holding one means the target has been created.

use crate::FhirError;
use std::fmt;
use std::str::FromStr;

/// Maximum length of a FHIR logical id.
const MAX_ID_LEN: usize = 64;

/// Resource types written by the fill tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Patient,
    Encounter,
}

impl ResourceType {
    /// The FHIR `resourceType` string, also used as the REST path segment.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Patient => "Patient",
            ResourceType::Encounter => "Encounter",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = FhirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(ResourceType::Patient),
            "Encounter" => Ok(ResourceType::Encounter),
            other => Err(FhirError::InvalidReference(format!(
                "unsupported resource type '{other}'"
            ))),
        }
    }
}

/// Reference to a resource created on the remote server.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reference {
    resource_type: ResourceType,
    id: String,
}

impl Reference {
    /// Build a reference from a resource type and a server-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidReference`] if `id` is not a valid FHIR logical id
    /// (`[A-Za-z0-9\-\.]{1,64}`).
    pub fn new(resource_type: ResourceType, id: impl Into<String>) -> Result<Self, FhirError> {
        let id = id.into();
        validate_id(&id)?;
        Ok(Self { resource_type, id })
    }

    /// Recover a reference from a `Location`/`Content-Location` header value.
    ///
    /// Accepts absolute or relative values of the form
    /// `.../<ResourceType>/<id>[/_history/<vid>]`; the last occurrence of the expected
    /// resource type segment wins.
    pub fn from_location(resource_type: ResourceType, location: &str) -> Result<Self, FhirError> {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let position = segments
            .iter()
            .rposition(|segment| *segment == resource_type.as_str())
            .ok_or_else(|| {
                FhirError::InvalidReference(format!(
                    "location '{location}' does not name a {resource_type}"
                ))
            })?;

        let id = segments.get(position + 1).ok_or_else(|| {
            FhirError::InvalidReference(format!("location '{location}' has no id"))
        })?;

        Self::new(resource_type, *id)
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.id)
    }
}

impl FromStr for Reference {
    type Err = FhirError;

    /// Parse a relative reference such as `Patient/42`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource_type, id) = s.split_once('/').ok_or_else(|| {
            FhirError::InvalidReference(format!("expected '<ResourceType>/<id>', got '{s}'"))
        })?;
        Self::new(resource_type.parse()?, id)
    }
}

fn validate_id(id: &str) -> Result<(), FhirError> {
    if id.is_empty() || id.len() > MAX_ID_LEN {
        return Err(FhirError::InvalidReference(format!(
            "id must be 1-{MAX_ID_LEN} characters, got {}",
            id.len()
        )));
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return Err(FhirError::InvalidReference(format!(
            "id '{id}' contains characters outside [A-Za-z0-9-.]"
        )));
    }

    Ok(())
}
