//! Populate the LMS star-schema warehouse with synthetic data.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use mockable::DefaultClock;
use tokio::runtime::Builder;
use tracing::{error, info};
use warehouse::config::{DatabaseSettings, SeedingSettings};
use warehouse::domain::{SeedingOptions, SeedingReport, WarehouseSeeder};
use warehouse::outbound::persistence::{
    DbPool, DieselWarehouseStore, PoolConfig, run_migrations,
};
use warehouse::telemetry::init_tracing;

const BINARY_NAME: &str = "lms-seed";

/// `lms-seed` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lms-seed",
    about = "Truncate and repopulate the LMS warehouse with synthetic data",
    version
)]
struct CliArgs {
    /// RNG seed; overrides `LMS_SEED_SEED`. A random seed is drawn when unset.
    #[arg(long, value_name = "n")]
    seed: Option<u64>,
    /// Number of students; overrides `LMS_SEED_STUDENT_COUNT`.
    #[arg(long = "students", value_name = "n")]
    student_count: Option<usize>,
    /// Database connection URL; overrides the `LMS_DB_*` settings.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Apply pending schema migrations before seeding.
    #[arg(long)]
    migrate: bool,
    /// Print the run report as JSON instead of text.
    #[arg(long = "report-json")]
    report_json: bool,
    /// Emit logs as JSON.
    #[arg(long = "log-json")]
    log_json: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    match run(args) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "seeding failed");
            eprintln!("lms-seed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> io::Result<String> {
    let database_url = resolve_database_url(args.database_url.clone())?;
    let settings = SeedingSettings::load(BINARY_NAME).map_err(io::Error::other)?;
    let options = resolve_options(&args, &settings);
    info!(seed = options.seed, students = options.student_count, "starting seeding run");

    if args.migrate {
        run_migrations(&database_url)
            .map_err(|err| io::Error::other(format!("apply migrations: {err}")))?;
        info!("migrations applied");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| io::Error::other(format!("create Tokio runtime: {err}")))?;
    let report = runtime.block_on(seed(&database_url, options))?;

    if args.report_json {
        serde_json::to_string_pretty(&report)
            .map_err(|err| io::Error::other(format!("serialise report: {err}")))
    } else {
        Ok(render_report(&report))
    }
}

async fn seed(database_url: &str, options: SeedingOptions) -> io::Result<SeedingReport> {
    let pool = DbPool::new(pool_config(database_url))
        .await
        .map_err(|err| io::Error::other(format!("create database pool: {err}")))?;
    let store = Arc::new(DieselWarehouseStore::new(pool));
    let seeder = WarehouseSeeder::new(store, Arc::new(DefaultClock));

    seeder.run(options).await.map_err(io::Error::other)
}

/// Seeding issues one statement at a time, so a single connection suffices.
fn pool_config(database_url: &str) -> PoolConfig {
    PoolConfig::new(database_url)
        .with_max_size(1)
        .with_min_idle(Some(1))
}

fn resolve_options(args: &CliArgs, settings: &SeedingSettings) -> SeedingOptions {
    SeedingOptions {
        seed: args
            .seed
            .or(settings.seed)
            .unwrap_or_else(rand::random::<u64>),
        student_count: args.student_count.unwrap_or_else(|| settings.student_count()),
    }
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    DatabaseSettings::load(BINARY_NAME)
        .and_then(|settings| settings.database_url())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
}

fn render_report(report: &SeedingReport) -> String {
    let tables = &report.tables;
    [
        format!("seed={}", report.seed),
        format!("students_requested={}", report.student_count),
        format!("skipped_registrations={}", report.skipped_registrations),
        format!("dim_element_types={}", tables.element_types),
        format!("dim_topics={}", tables.topics),
        format!("dim_students={}", tables.students),
        format!("dim_courses={}", tables.courses),
        format!("dim_modules={}", tables.modules),
        format!("dim_lessons={}", tables.lessons),
        format!("dim_learning_elements={}", tables.learning_elements),
        format!("dim_course_registrations={}", tables.registrations),
        format!("dim_dates={}", tables.calendar_dates),
        format!("fact_student_progress={}", tables.progress_facts),
    ]
    .join("\n")
}
