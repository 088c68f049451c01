//! Constants used throughout the fill core crate.

/// Number of patients created when no count is given.
pub const DEFAULT_NUM_PATIENTS: usize = 10;

/// Earliest default encounter start date (`YYYY-MM-DD`, midnight UTC).
pub const MIN_START_DATE: &str = "1900-01-01";

/// Media type for FHIR JSON request and response bodies.
pub const FHIR_JSON_MEDIA_TYPE: &str = "application/fhir+json";

/// `Prefer` header value asking the server to echo the created resource.
pub const PREFER_RETURN_REPRESENTATION: &str = "return=representation";

/// Hours in a day, the range of the hour component of random timestamps.
pub const HOURS_PER_DAY: i64 = 24;
