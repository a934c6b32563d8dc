//! Embedded star-schema migrations.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::domain::ports::WarehouseStoreError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply all pending star-schema migrations to the database at `database_url`.
///
/// Already-applied migrations are skipped, so the call is safe to repeat.
pub fn run_migrations(database_url: &str) -> Result<(), WarehouseStoreError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| WarehouseStoreError::connection(err.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| WarehouseStoreError::query(format!("migration: {err}")))?;
    Ok(())
}
