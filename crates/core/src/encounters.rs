//! Random encounter generation.

use crate::constants::{HOURS_PER_DAY, MIN_START_DATE};
use crate::{FillError, FillResult};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use fhir::{EncounterData, EncounterStatus, Reference};
use rand::seq::SliceRandom;
use rand::Rng;

/// Inclusive-exclusive bounds for random encounter start timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimestampBounds {
    min: DateTime<Utc>,
    max: DateTime<Utc>,
}

impl TimestampBounds {
    /// Create bounds, rejecting spans that do not contain a whole day.
    pub fn new(min: DateTime<Utc>, max: DateTime<Utc>) -> FillResult<Self> {
        if (max - min).num_days() <= 0 {
            return Err(FillError::EmptyDateSpan { min, max });
        }
        Ok(Self { min, max })
    }

    /// Default bounds: 1900-01-01 up to `now`.
    pub fn until(now: DateTime<Utc>) -> FillResult<Self> {
        Self::new(parse_date(MIN_START_DATE)?, now)
    }

    pub fn min(&self) -> DateTime<Utc> {
        self.min
    }

    pub fn max(&self) -> DateTime<Utc> {
        self.max
    }
}

/// Parse a `YYYY-MM-DD` date as midnight UTC.
pub fn parse_date(text: &str) -> FillResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| FillError::InvalidInput(format!("invalid date '{text}': {e}")))?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| FillError::InvalidInput(format!("invalid date '{text}'")))
}

/// Pick a timestamp `min + d days + h hours` with `d` uniform in `[0, whole days of the span)`
/// and `h` uniform in `[0, 24)`.
///
/// # Errors
///
/// Returns [`FillError::EmptyDateSpan`] if `max - min` is shorter than one day, including
/// equal and inverted bounds.
pub fn random_timestamp<R: Rng + ?Sized>(
    rng: &mut R,
    min: DateTime<Utc>,
    max: DateTime<Utc>,
) -> FillResult<DateTime<Utc>> {
    let span_days = (max - min).num_days();
    if span_days <= 0 {
        return Err(FillError::EmptyDateSpan { min, max });
    }

    let days = rng.gen_range(0..span_days);
    let hours = rng.gen_range(0..HOURS_PER_DAY);

    Ok(min + Duration::days(days) + Duration::hours(hours))
}

/// Build an encounter for an already created patient.
///
/// The status is drawn uniformly from [`EncounterStatus::ALL`] and the period start from
/// [`random_timestamp`] within `bounds`.
pub fn generate_encounter<R: Rng + ?Sized>(
    rng: &mut R,
    patient: &Reference,
    bounds: &TimestampBounds,
) -> FillResult<EncounterData> {
    let status = *EncounterStatus::ALL
        .choose(rng)
        .ok_or_else(|| FillError::InvalidInput("no encounter statuses to choose from".into()))?;
    let period_start = random_timestamp(rng, bounds.min, bounds.max)?;

    tracing::debug!(subject = %patient, %status, %period_start, "generated encounter");

    Ok(EncounterData {
        id: None,
        status,
        subject: patient.clone(),
        period_start,
    })
}
