//! Embedded PostgreSQL smoke test for the star-schema migrations.
//!
//! Use `cargo test -- --ignored` with `RUN_PG_EMBEDDED=1` to run it.

use postgres::{Client, NoTls};
use rstest::rstest;
use warehouse::outbound::persistence::run_migrations;

mod support;

use support::warehouse_database;

const STAR_SCHEMA_TABLES: [&str; 10] = [
    "dim_course_registrations",
    "dim_courses",
    "dim_dates",
    "dim_element_types",
    "dim_learning_elements",
    "dim_lessons",
    "dim_modules",
    "dim_students",
    "dim_topics",
    "fact_student_progress",
];

#[rstest]
#[ignore = "requires embedded Postgres binaries; opt-in via RUN_PG_EMBEDDED=1"]
fn migrations_create_star_schema_and_rerun_cleanly() {
    let Some(database) = warehouse_database() else {
        return;
    };

    run_migrations(database.url()).expect("already-applied migrations are skipped");

    let mut client = Client::connect(database.url(), NoTls).expect("postgres client");
    let tables: Vec<String> = client
        .query(
            "SELECT table_name::text FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name <> '__diesel_schema_migrations' \
             ORDER BY table_name",
            &[],
        )
        .expect("list tables")
        .iter()
        .map(|row| row.get(0))
        .collect();
    assert_eq!(tables, STAR_SCHEMA_TABLES);
}
