//! Run configuration.
//!
//! Resolved once at startup from command-line arguments and passed into the driver. The core
//! never reads environment variables.

use crate::encounters::TimestampBounds;
use crate::{FillError, FillResult};
use reqwest::Url;

/// Which records a run creates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// One Patient per iteration.
    PatientsOnly,
    /// One Patient followed by one Encounter referencing it per iteration.
    #[default]
    PatientsWithEncounters,
}

/// Configuration for one fill run.
#[derive(Clone, Debug)]
pub struct FillConfig {
    fhir_base: Url,
    count: usize,
    mode: FillMode,
    bounds: TimestampBounds,
    seed: Option<u64>,
}

impl FillConfig {
    /// Create a new `FillConfig`.
    ///
    /// `fhir_base` must be an absolute `http` or `https` URL; a trailing slash is added so that
    /// resource endpoints resolve beneath it.
    pub fn new(
        fhir_base: &str,
        count: usize,
        mode: FillMode,
        bounds: TimestampBounds,
        seed: Option<u64>,
    ) -> FillResult<Self> {
        let mut url = Url::parse(fhir_base.trim()).map_err(|e| {
            FillError::InvalidInput(format!("fhir_base '{fhir_base}' is not a valid URL: {e}"))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(FillError::InvalidInput(format!(
                "fhir_base must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            fhir_base: url,
            count,
            mode,
            bounds,
            seed,
        })
    }

    pub fn fhir_base(&self) -> &Url {
        &self.fhir_base
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mode(&self) -> FillMode {
        self.mode
    }

    pub fn bounds(&self) -> &TimestampBounds {
        &self.bounds
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
