//! Run the canned analytical queries against the LMS warehouse.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::warn;
use warehouse::config::DatabaseSettings;
use warehouse::domain::ports::QueryOutcome;
use warehouse::domain::{AnalyticsService, CannedQuery, render_outcome};
use warehouse::outbound::persistence::PostgresQueryRunner;
use warehouse::telemetry::init_tracing;

const BINARY_NAME: &str = "lms-analytics";

/// Which canned queries to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum QuerySelection {
    /// Query A: maximum Hadoop video time per lesson and registration month.
    A,
    /// Query B: most popular topics among last year's registrations.
    B,
    /// Both queries in order.
    All,
}

impl QuerySelection {
    fn queries(self) -> Vec<CannedQuery> {
        match self {
            Self::A => vec![CannedQuery::MaxHadoopVideoDuration],
            Self::B => vec![CannedQuery::PopularTopicsLastYear],
            Self::All => CannedQuery::ALL.to_vec(),
        }
    }
}

/// `lms-analytics` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lms-analytics",
    about = "Print the canned LMS warehouse reports",
    version
)]
struct CliArgs {
    /// Query to run.
    #[arg(long, value_enum, default_value_t = QuerySelection::All)]
    query: QuerySelection,
    /// Database connection URL; overrides the `LMS_DB_*` settings.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Print the results as a JSON array instead of text tables.
    #[arg(long)]
    json: bool,
    /// Emit logs as JSON.
    #[arg(long = "log-json")]
    log_json: bool,
}

/// One query's result in `--json` output.
#[derive(Debug, Serialize)]
struct QueryReport<'a> {
    heading: &'static str,
    outcome: &'a QueryOutcome,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    let database_url = match resolve_database_url(args.database_url) {
        Ok(url) => url,
        Err(err) => {
            eprintln!("lms-analytics: {err}");
            return ExitCode::FAILURE;
        }
    };

    let service = AnalyticsService::new(PostgresQueryRunner::new(database_url));
    let results: Vec<(CannedQuery, QueryOutcome)> = args
        .query
        .queries()
        .into_iter()
        .map(|query| (query, service.run(query)))
        .collect();
    let mut failed = false;
    for (query, outcome) in &results {
        if let QueryOutcome::Failed(message) = outcome {
            warn!(query = ?query, error = %message, "query failed");
            failed = true;
        }
    }

    if args.json {
        match render_json(&results) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("lms-analytics: serialise results: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for (query, outcome) in &results {
            println!("{}", render_section(*query, outcome));
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
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

fn render_section(query: CannedQuery, outcome: &QueryOutcome) -> String {
    format!("{}\n{}\n", query.heading(), render_outcome(outcome))
}

fn render_json(results: &[(CannedQuery, QueryOutcome)]) -> serde_json::Result<String> {
    let reports: Vec<QueryReport<'_>> = results
        .iter()
        .map(|(query, outcome)| QueryReport {
            heading: query.heading(),
            outcome,
        })
        .collect();
    serde_json::to_string_pretty(&reports)
}
