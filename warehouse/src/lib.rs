//! Seeding and analytics over the LMS star-schema warehouse.
//!
//! The crate wires the pure planners from `lms-data` to PostgreSQL:
//!
//! - [`domain`] holds the ports, the phase-by-phase [`domain::WarehouseSeeder`]
//!   and the canned analytical queries.
//! - [`outbound`] provides the Diesel store, embedded migrations and the
//!   synchronous query runner.
//! - [`config`] and [`telemetry`] carry the settings and logging used by the
//!   `lms-seed` and `lms-analytics` binaries.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
