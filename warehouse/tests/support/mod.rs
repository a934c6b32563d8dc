//! Shared helpers for warehouse integration tests.
//!
//! Integration tests compile as separate crates under `warehouse/tests/`, so
//! the embedded-cluster gating and database provisioning live here.

use pg_embedded_setup_unpriv::TemporaryDatabase;
use warehouse::outbound::persistence::run_migrations;

/// Returns true when `RUN_PG_EMBEDDED=1` opts into embedded PostgreSQL tests.
pub fn embedded_postgres_enabled() -> bool {
    std::env::var("RUN_PG_EMBEDDED").as_deref() == Ok("1")
}

/// Returns true when the `SKIP_TEST_CLUSTER` environment variable is set to a
/// truthy value.
///
/// Truthy values: "1", "true", "yes" (case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Handles embedded cluster setup failures consistently across integration tests.
///
/// When `SKIP_TEST_CLUSTER` is truthy, prints a skip marker and returns `None`.
/// Otherwise, panics with a clear failure message so CI breakage is not masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Create a temporary database on the shared cluster and migrate it.
pub fn migrated_database() -> Result<TemporaryDatabase, String> {
    let cluster = pg_embedded_setup_unpriv::test_support::shared_cluster_handle()
        .map_err(|err| format!("shared cluster: {err:?}"))?;
    let database = cluster
        .create_temporary_database()
        .map_err(|err| format!("temporary database: {err:?}"))?;
    run_migrations(database.url()).map_err(|err| err.to_string())?;
    Ok(database)
}

/// Provision a migrated database, or `None` when embedded tests are disabled
/// or the cluster is unavailable and skipping is allowed.
pub fn warehouse_database() -> Option<TemporaryDatabase> {
    if !embedded_postgres_enabled() {
        eprintln!("SKIP-TEST-CLUSTER: set RUN_PG_EMBEDDED=1 to run");
        return None;
    }
    match migrated_database() {
        Ok(database) => Some(database),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
