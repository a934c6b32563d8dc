//! Domain services for seeding and querying the learning-management warehouse.
//!
//! Services depend only on the traits in [`ports`]; adapters live under
//! `outbound`.

pub mod analytics;
pub mod ports;
mod seeding;

pub use analytics::{AnalyticsService, CannedQuery, render_outcome};
pub use seeding::{
    RegistrationOutcome, SeedingError, SeedingOptions, SeedingReport, WarehouseSeeder,
};
