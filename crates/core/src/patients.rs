//! Random patient generation.

use crate::codebook::Capacity;
use fhir::PatientData;
use rand::seq::SliceRandom;
use rand::Rng;

/// Lazily generate `count` patients with a gender drawn uniformly from the sex codebook.
///
/// The iterator borrows `rng`, so the sequence is finite and cannot be restarted.
pub fn generate_patients<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
) -> impl Iterator<Item = PatientData> + '_ {
    (0..count).map(move |_| {
        let gender = Capacity::SEX.mapping.choose(rng).map(|(label, _)| *label);
        tracing::debug!(gender = ?gender, "generated patient");
        PatientData { id: None, gender }
    })
}
