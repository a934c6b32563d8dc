//! PostgreSQL persistence adapters.
//!
//! The seeding path writes through Diesel with async support from
//! `diesel-async` and `bb8` pooling. The analytics path uses a plain
//! synchronous `postgres` client, since it runs a handful of statements and
//! exits.
//!
//! Diesel row structs (`models.rs`) and the schema (`schema.rs`) never leave
//! this module; adapters translate them to and from `lms-data` seeds.

mod diesel_warehouse_store;
mod migrations;
mod models;
mod pool;
mod postgres_query_runner;
mod schema;

pub use diesel_warehouse_store::DieselWarehouseStore;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
pub use postgres_query_runner::{PostgresQueryRunner, describe_postgres_error};
