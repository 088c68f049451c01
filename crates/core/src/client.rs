//! FHIR server client.
//!
//! [`FhirServer`] is the seam between the submission driver and the remote API;
//! [`HttpFhirServer`] implements it over FHIR REST (`POST {base}/{ResourceType}`).

use crate::constants::{FHIR_JSON_MEDIA_TYPE, PREFER_RETURN_REPRESENTATION};
use crate::{FillError, FillResult};
use fhir::{Encounter, Patient, Reference, ResourceType};
use reqwest::header::{ACCEPT, CONTENT_LOCATION, CONTENT_TYPE, LOCATION};
use reqwest::Url;

/// Result of a successful (2xx) creation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateOutcome {
    pub resource_type: ResourceType,
    /// Raw response body; empty when the server answered with `return=minimal`.
    pub body: String,
    /// `Location` header, or `Content-Location` when `Location` is absent.
    pub location: Option<String>,
}

impl CreateOutcome {
    /// Recover the reference of the created resource.
    ///
    /// The id is taken from the response body when one is present, then from the location
    /// header.
    ///
    /// # Errors
    ///
    /// Returns [`FillError::Fhir`] if the body is not a valid resource of the expected type,
    /// and [`FillError::MissingIdentifier`] if neither body nor headers carry an id.
    pub fn reference(&self) -> FillResult<Reference> {
        if !self.body.trim().is_empty() {
            let id = match self.resource_type {
                ResourceType::Patient => Patient::parse(&self.body)?.id,
                ResourceType::Encounter => Encounter::parse(&self.body)?.id,
            };
            if let Some(id) = id {
                return Ok(Reference::new(self.resource_type, id)?);
            }
        }

        match &self.location {
            Some(location) => Ok(Reference::from_location(self.resource_type, location)?),
            None => Err(FillError::MissingIdentifier(self.resource_type)),
        }
    }
}

/// A remote FHIR API that can create resources.
#[allow(async_fn_in_trait)]
pub trait FhirServer {
    /// Create one resource from its JSON representation.
    async fn create(&self, resource_type: ResourceType, body: String)
        -> FillResult<CreateOutcome>;
}

/// [`FhirServer`] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpFhirServer {
    client: reqwest::Client,
    base: Url,
}

impl HttpFhirServer {
    /// Create a client for the FHIR API rooted at `base`.
    pub fn new(base: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base)
    }

    pub fn with_client(client: reqwest::Client, mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, resource_type: ResourceType) -> FillResult<Url> {
        self.base.join(resource_type.as_str()).map_err(|e| {
            FillError::InvalidInput(format!(
                "cannot build {resource_type} endpoint from '{}': {e}",
                self.base
            ))
        })
    }
}

impl FhirServer for HttpFhirServer {
    async fn create(
        &self,
        resource_type: ResourceType,
        body: String,
    ) -> FillResult<CreateOutcome> {
        let url = self.endpoint(resource_type)?;
        tracing::debug!(%url, "creating {resource_type}");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FHIR_JSON_MEDIA_TYPE)
            .header(ACCEPT, FHIR_JSON_MEDIA_TYPE)
            .header("Prefer", PREFER_RETURN_REPRESENTATION)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .or_else(|| response.headers().get(CONTENT_LOCATION))
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FillError::Status {
                resource_type,
                status: status.as_u16(),
                body,
            });
        }

        Ok(CreateOutcome {
            resource_type,
            body,
            location,
        })
    }
}
