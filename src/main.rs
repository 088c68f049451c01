use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fill_core::constants::DEFAULT_NUM_PATIENTS;
use fill_core::{FillConfig, FillMode, HttpFhirServer, TimestampBounds, parse_date};

/// Fill a FHIR server with random patients (and encounters) for testing.
///
/// This is meant for test servers only: every run creates new resources and nothing is
/// cleaned up afterwards.
#[derive(Parser, Debug)]
#[command(name = "fill-server")]
#[command(version, about)]
struct Cli {
    /// Base URL of the FHIR API (e.g. http://localhost:8080/fhir)
    fhir_base: String,

    /// Number of patients to create
    #[arg(default_value_t = DEFAULT_NUM_PATIENTS)]
    n: usize,

    /// Only create patients, without an encounter for each
    #[arg(long)]
    patients_only: bool,

    /// Seed for the random generator, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Earliest encounter start date (YYYY-MM-DD)
    #[arg(long)]
    min_date: Option<String>,

    /// Latest encounter start date (YYYY-MM-DD, exclusive); defaults to now
    #[arg(long)]
    max_date: Option<String>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<FillConfig> {
        let max = match &self.max_date {
            Some(date) => parse_date(date)?,
            None => chrono::Utc::now(),
        };
        let bounds = match &self.min_date {
            Some(date) => TimestampBounds::new(parse_date(date)?, max)?,
            None => TimestampBounds::until(max)?,
        };
        let mode = if self.patients_only {
            FillMode::PatientsOnly
        } else {
            FillMode::PatientsWithEncounters
        };

        Ok(FillConfig::new(
            &self.fhir_base,
            self.n,
            mode,
            bounds,
            self.seed,
        )?)
    }
}

/// Entry point: one sequential run against the given FHIR server.
///
/// Any failed submission ends the run with a non-zero exit status; resources created before
/// the failure are left on the server.
///
/// # Environment Variables
/// - `RUST_LOG`: log filter (default: `fill_server=info,fill_core=info`)
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fill_server=info".parse()?)
                .add_directive("fill_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Cli::parse().into_config()?;

    let mut rng = match config.seed() {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let server = HttpFhirServer::new(config.fhir_base().clone());

    tracing::info!(
        "++ Filling {} with {} patients ({:?})",
        config.fhir_base(),
        config.count(),
        config.mode()
    );

    let summary = fill_core::run(&server, &mut rng, &config).await?;

    tracing::info!(
        patients = summary.patients.len(),
        encounters = summary.encounters.len(),
        "fill complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_ten_patients_with_encounters() {
        let cli = Cli::try_parse_from(["fill-server", "http://localhost:8080/fhir"])
            .expect("valid arguments");
        assert_eq!(cli.n, 10);

        let config = cli.into_config().expect("valid config");
        assert_eq!(config.count(), 10);
        assert_eq!(config.mode(), FillMode::PatientsWithEncounters);
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn parses_options() {
        let cli = Cli::try_parse_from([
            "fill-server",
            "https://example.org/fhir/",
            "3",
            "--patients-only",
            "--seed",
            "99",
            "--min-date",
            "2000-01-01",
            "--max-date",
            "2010-01-01",
        ])
        .expect("valid arguments");

        let config = cli.into_config().expect("valid config");
        assert_eq!(config.count(), 3);
        assert_eq!(config.mode(), FillMode::PatientsOnly);
        assert_eq!(config.seed(), Some(99));
        assert_eq!(config.bounds().min(), parse_date("2000-01-01").expect("date"));
        assert_eq!(config.bounds().max(), parse_date("2010-01-01").expect("date"));
    }

    #[test]
    fn requires_fhir_base_and_valid_dates() {
        assert!(Cli::try_parse_from(["fill-server"]).is_err());

        let cli = Cli::try_parse_from([
            "fill-server",
            "http://localhost/fhir",
            "--min-date",
            "2000-01-01",
            "--max-date",
            "2000-01-01",
        ])
        .expect("valid arguments");
        assert!(cli.into_config().is_err());
    }
}
