//! Sequential submission of generated records to a FHIR server.
//!
//! Every submission is awaited before the next one starts. The first failure ends the run and
//! is returned unchanged; records created in earlier iterations stay on the server.

use crate::client::FhirServer;
use crate::config::{FillConfig, FillMode};
use crate::encounters::{generate_encounter, TimestampBounds};
use crate::patients::generate_patients;
use crate::FillResult;
use fhir::{Encounter, Patient, Reference, ResourceType};
use rand::Rng;
use std::fmt;

/// References of the resources created by a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FillSummary {
    pub patients: Vec<Reference>,
    pub encounters: Vec<Reference>,
}

/// Progress of a single patient + encounter iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IterationState {
    Unsubmitted,
    PatientSubmitted(Reference),
    EncounterSubmitted {
        patient: Reference,
        encounter: Option<Reference>,
    },
}

impl fmt::Display for IterationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationState::Unsubmitted => f.write_str("unsubmitted"),
            IterationState::PatientSubmitted(patient) => {
                write!(f, "patient {patient} submitted")
            }
            IterationState::EncounterSubmitted { patient, .. } => {
                write!(f, "encounter for {patient} submitted")
            }
        }
    }
}

/// Run the variant selected by `config`.
pub async fn run<S, R>(server: &S, rng: &mut R, config: &FillConfig) -> FillResult<FillSummary>
where
    S: FhirServer,
    R: Rng + ?Sized,
{
    match config.mode() {
        FillMode::PatientsOnly => fill_patients(server, rng, config.count()).await,
        FillMode::PatientsWithEncounters => {
            fill_patients_with_encounters(server, rng, config.count(), config.bounds()).await
        }
    }
}

/// Create `n` random patients, one request each.
pub async fn fill_patients<S, R>(server: &S, rng: &mut R, n: usize) -> FillResult<FillSummary>
where
    S: FhirServer,
    R: Rng + ?Sized,
{
    let mut summary = FillSummary::default();

    for (index, patient) in generate_patients(rng, n).enumerate() {
        let outcome = server
            .create(ResourceType::Patient, Patient::render(&patient)?)
            .await
            .inspect_err(|e| tracing::error!(iteration = index, "patient submission failed: {e}"))?;

        match outcome.reference() {
            Ok(reference) => {
                tracing::info!(iteration = index, "created {reference}");
                summary.patients.push(reference);
            }
            Err(e) => tracing::info!(iteration = index, "created patient ({e})"),
        }
    }

    Ok(summary)
}

/// Create `n` random patients, each followed by one encounter referencing it.
///
/// Issues `2n` requests in the order patient, encounter, patient, encounter, ...
pub async fn fill_patients_with_encounters<S, R>(
    server: &S,
    rng: &mut R,
    n: usize,
    bounds: &TimestampBounds,
) -> FillResult<FillSummary>
where
    S: FhirServer,
    R: Rng + ?Sized,
{
    let mut summary = FillSummary::default();

    for index in 0..n {
        let mut state = IterationState::Unsubmitted;
        let result = submit_pair(server, rng, bounds, &mut state).await;

        if let Err(e) = &result {
            tracing::error!(iteration = index, %state, "submission failed: {e}");
        }
        result?;

        if let IterationState::EncounterSubmitted { patient, encounter } = state {
            tracing::info!(
                iteration = index,
                encounter = ?encounter.as_ref().map(Reference::to_string),
                "created {patient} with encounter"
            );
            summary.patients.push(patient);
            summary.encounters.extend(encounter);
        }
    }

    Ok(summary)
}

async fn submit_pair<S, R>(
    server: &S,
    rng: &mut R,
    bounds: &TimestampBounds,
    state: &mut IterationState,
) -> FillResult<()>
where
    S: FhirServer,
    R: Rng + ?Sized,
{
    let patient = generate_patients(rng, 1).next().unwrap_or_default();
    let created = server
        .create(ResourceType::Patient, Patient::render(&patient)?)
        .await?;
    let patient = created.reference()?;
    *state = IterationState::PatientSubmitted(patient.clone());

    let encounter = generate_encounter(rng, &patient, bounds)?;
    let created = server
        .create(ResourceType::Encounter, Encounter::render(&encounter)?)
        .await?;
    // The encounter id is informational; nothing links to it.
    let encounter = created.reference().ok();
    *state = IterationState::EncounterSubmitted { patient, encounter };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CreateOutcome;
    use crate::encounters::parse_date;
    use crate::FillError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    /// In-memory server that records every call and hands out sequential ids.
    #[derive(Default)]
    struct RecordingServer {
        calls: Mutex<Vec<(ResourceType, serde_json::Value)>>,
        fail_on_call: Option<usize>,
        patient_body: Option<String>,
    }

    impl FhirServer for RecordingServer {
        async fn create(
            &self,
            resource_type: ResourceType,
            body: String,
        ) -> FillResult<CreateOutcome> {
            let mut calls = self.calls.lock().expect("lock");
            let mut value: serde_json::Value = serde_json::from_str(&body).expect("json body");
            calls.push((resource_type, value.clone()));
            let call = calls.len();

            if self.fail_on_call == Some(call) {
                return Err(FillError::Status {
                    resource_type,
                    status: 500,
                    body: "boom".into(),
                });
            }

            // Echo the resource back with a sequential id, as `return=representation` does.
            let body = match (resource_type, &self.patient_body) {
                (ResourceType::Patient, Some(body)) => body.clone(),
                _ => {
                    value["id"] = serde_json::Value::String(call.to_string());
                    value.to_string()
                }
            };

            Ok(CreateOutcome {
                resource_type,
                body,
                location: None,
            })
        }
    }

    impl RecordingServer {
        fn calls(&self) -> Vec<(ResourceType, serde_json::Value)> {
            self.calls.lock().expect("lock").clone()
        }
    }

    fn bounds() -> TimestampBounds {
        TimestampBounds::new(
            parse_date("1990-01-01").expect("date"),
            parse_date("2000-01-01").expect("date"),
        )
        .expect("bounds")
    }

    #[tokio::test]
    async fn patients_and_encounters_alternate() {
        let server = RecordingServer::default();
        let mut rng = StdRng::seed_from_u64(1);

        let summary = fill_patients_with_encounters(&server, &mut rng, 2, &bounds())
            .await
            .expect("run succeeds");

        let calls = server.calls();
        let order: Vec<_> = calls.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            order,
            vec![
                ResourceType::Patient,
                ResourceType::Encounter,
                ResourceType::Patient,
                ResourceType::Encounter,
            ]
        );

        // Each encounter references the patient created just before it.
        assert_eq!(calls[1].1["subject"]["reference"], "Patient/1");
        assert_eq!(calls[3].1["subject"]["reference"], "Patient/3");

        let patients: Vec<_> = summary.patients.iter().map(|r| r.to_string()).collect();
        let encounters: Vec<_> = summary.encounters.iter().map(|r| r.to_string()).collect();
        assert_eq!(patients, vec!["Patient/1", "Patient/3"]);
        assert_eq!(encounters, vec!["Encounter/2", "Encounter/4"]);
    }

    #[tokio::test]
    async fn patients_only_issues_n_patient_calls() {
        let server = RecordingServer::default();
        let mut rng = StdRng::seed_from_u64(2);

        let summary = fill_patients(&server, &mut rng, 5).await.expect("run succeeds");

        let calls = server.calls();
        assert_eq!(calls.len(), 5);
        for (resource_type, body) in &calls {
            assert_eq!(*resource_type, ResourceType::Patient);
            assert_eq!(body["resourceType"], "Patient");
            assert!(body["gender"].is_string());
        }
        assert_eq!(summary.patients.len(), 5);
        assert!(summary.encounters.is_empty());
    }

    #[tokio::test]
    async fn zero_patients_makes_no_calls() {
        let server = RecordingServer::default();
        let mut rng = StdRng::seed_from_u64(3);

        let summary = fill_patients_with_encounters(&server, &mut rng, 0, &bounds())
            .await
            .expect("run succeeds");

        assert!(server.calls().is_empty());
        assert_eq!(summary, FillSummary::default());
    }

    #[tokio::test]
    async fn failure_stops_the_run() {
        let server = RecordingServer {
            fail_on_call: Some(3),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(4);

        let err = fill_patients_with_encounters(&server, &mut rng, 3, &bounds())
            .await
            .expect_err("third call fails");

        assert!(matches!(err, FillError::Status { status: 500, .. }));
        assert_eq!(server.calls().len(), 3);
    }

    #[tokio::test]
    async fn failure_stops_patients_only_run() {
        let server = RecordingServer {
            fail_on_call: Some(2),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(4);

        assert!(fill_patients(&server, &mut rng, 10).await.is_err());
        assert_eq!(server.calls().len(), 2);
    }

    #[tokio::test]
    async fn malformed_patient_response_aborts_before_encounter() {
        let server = RecordingServer {
            patient_body: Some(r#"{"resourceType":"Patient"}"#.to_string()),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);

        let err = fill_patients_with_encounters(&server, &mut rng, 2, &bounds())
            .await
            .expect_err("no patient id");

        assert!(matches!(
            err,
            FillError::MissingIdentifier(ResourceType::Patient)
        ));
        assert_eq!(server.calls().len(), 1);
    }

    #[tokio::test]
    async fn run_dispatches_on_mode() {
        let server = RecordingServer::default();
        let mut rng = StdRng::seed_from_u64(6);
        let config = FillConfig::new(
            "http://localhost:8080/fhir",
            2,
            FillMode::PatientsOnly,
            bounds(),
            None,
        )
        .expect("config");

        run(&server, &mut rng, &config).await.expect("run succeeds");
        assert_eq!(server.calls().len(), 2);
    }
}
