//! Record store port and its backends
//!
//! Each backend follows these patterns:
//! - Every mutation is one atomic step (single write guard / single statement)
//! - Uniqueness relies on the key itself, never check-then-insert across calls
//! - Listings and aggregation are one read pass over the collection

pub mod memory;
pub mod postgres;
pub mod schema;

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Employee, EmployeeId, FieldPatch};
use crate::query::{ListFilter, SalaryAverages, SkillQuery};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence for the employee collection.
///
/// Inputs are already validated; stores only enforce identity and atomicity.
#[async_trait]
pub trait EmployeeStore: Send + Sync + fmt::Debug {
    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// `Conflict` when the identifier is already stored.
    async fn insert(&self, employee: Employee) -> Result<Employee>;

    /// Fetch one record. `NotFound` when absent.
    async fn get(&self, id: &EmployeeId) -> Result<Employee>;

    /// Apply a patch atomically and return the updated record.
    ///
    /// # Errors
    ///
    /// `NotFound` when absent.
    async fn update(&self, id: &EmployeeId, patch: &FieldPatch) -> Result<Employee>;

    /// Remove a record. `NotFound` when absent, including a repeated delete.
    async fn delete(&self, id: &EmployeeId) -> Result<()>;

    /// Records matching the filter, ascending by joining date then identifier.
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Employee>>;

    /// Records holding the skill, ordered by identifier.
    async fn search_skill(&self, skill: &SkillQuery) -> Result<Vec<Employee>>;

    /// Mean salary per department over the whole collection.
    async fn average_salary_by_department(&self) -> Result<SalaryAverages>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64>;

    /// Release the storage handle. Called once at shutdown.
    async fn close(&self) {}
}
