use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::machine::{Machine, NewMachine};
use crate::domain::product::{NewProduct, Product};
use crate::domain::shift_pattern::{NewShiftPattern, ShiftPattern};
use crate::domain::shift_report::{
    NewShiftReport, ShiftActivity, ShiftFilter, ShiftReport, ShiftReportKey, ShiftSummary,
    ShiftSummaryListQuery,
};
use crate::domain::standard_rate::{NewStandardRate, StandardRate};

pub mod machine;
pub mod product;
pub mod shift_pattern;
pub mod shift_report;
pub mod standard_rate;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over machines.
pub trait MachineReader {
    fn get_machine_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Machine>>;
    fn list_machines(&self, hub_id: i32) -> RepositoryResult<Vec<Machine>>;
}

/// Write operations over machines.
pub trait MachineWriter {
    /// Insert machines, refreshing the unit of ones that already exist by name.
    fn upsert_machines(&self, new_machines: &[NewMachine]) -> RepositoryResult<usize>;
}

/// Read-only operations over products.
pub trait ProductReader {
    fn list_products(&self, hub_id: i32) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over products.
pub trait ProductWriter {
    /// Insert products, refreshing the details of ones that already exist by name.
    fn upsert_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
}

/// Read-only operations over shift patterns.
pub trait ShiftPatternReader {
    fn get_shift_pattern_by_id(&self, id: i32, hub_id: i32)
    -> RepositoryResult<Option<ShiftPattern>>;
    fn list_shift_patterns(&self, hub_id: i32) -> RepositoryResult<Vec<ShiftPattern>>;
}

/// Write operations over shift patterns.
pub trait ShiftPatternWriter {
    /// Insert patterns, refreshing the hours of ones that already exist by code.
    fn upsert_shift_patterns(&self, new_patterns: &[NewShiftPattern]) -> RepositoryResult<usize>;
}

/// Read-only operations over standard rates.
pub trait StandardRateReader {
    fn list_standard_rates(&self, hub_id: i32) -> RepositoryResult<Vec<StandardRate>>;
    /// Rates of every product configured for one machine.
    fn list_machine_rates(&self, machine_id: i32, hub_id: i32)
    -> RepositoryResult<Vec<StandardRate>>;
}

/// Write operations over standard rates.
pub trait StandardRateWriter {
    /// Insert rates, replacing the value of existing product/machine pairs.
    fn upsert_standard_rates(&self, new_rates: &[NewStandardRate]) -> RepositoryResult<usize>;
}

/// Read-only operations over saved shift reports.
pub trait ShiftReportReader {
    fn find_shift_summary(&self, key: &ShiftReportKey) -> RepositoryResult<Option<ShiftSummary>>;
    fn get_shift_report(&self, summary_id: i32, hub_id: i32)
    -> RepositoryResult<Option<ShiftReport>>;
    fn list_shift_summaries(
        &self,
        query: ShiftSummaryListQuery,
    ) -> RepositoryResult<(usize, Vec<ShiftSummary>)>;
    fn list_shift_activities(&self, filter: &ShiftFilter) -> RepositoryResult<Vec<ShiftActivity>>;
}

/// Write operations over shift reports. A summary and its activities are
/// always written in one transaction.
pub trait ShiftReportWriter {
    fn create_shift_report(&self, report: &NewShiftReport) -> RepositoryResult<ShiftReport>;
    /// Delete any report stored under the same key, then insert `report`.
    fn replace_shift_report(&self, report: &NewShiftReport) -> RepositoryResult<ShiftReport>;
    fn delete_shift_report(&self, summary_id: i32, hub_id: i32) -> RepositoryResult<()>;
}
