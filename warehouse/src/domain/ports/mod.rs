//! Domain ports: the seams between the domain services and their adapters.

mod analytics_query;
mod macros;
mod warehouse_store;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use analytics_query::MockAnalyticsQueryRunner;
pub use analytics_query::{AnalyticsQueryRunner, QueryOutcome, QueryParam, RowSet};
#[cfg(test)]
pub use warehouse_store::MockWarehouseStore;
pub use warehouse_store::{TableCounts, WarehouseStore, WarehouseStoreError};
