//! # Fill Core
//!
//! Core logic for filling a FHIR server with synthetic test records.
//!
//! This crate contains:
//! - the capacity codebook (label -> code tables for categorical variables)
//! - seedable random generators for patients and encounters
//! - the [`FhirServer`] seam and its HTTP implementation
//! - the sequential submission driver (patients only, or patients with encounters)
//!
//! **No process concerns**: argument parsing, logging setup and the async runtime belong in the
//! `fill-server` binary. Randomness is always passed in explicitly.

pub mod client;
pub mod codebook;
pub mod config;
pub mod constants;
pub mod driver;
pub mod encounters;
pub mod error;
pub mod patients;

pub use client::{CreateOutcome, FhirServer, HttpFhirServer};
pub use codebook::{Capacity, CodedVariable};
pub use config::{FillConfig, FillMode};
pub use driver::{fill_patients, fill_patients_with_encounters, run, FillSummary, IterationState};
pub use encounters::{generate_encounter, parse_date, random_timestamp, TimestampBounds};
pub use error::{FillError, FillResult};
pub use patients::generate_patients;
