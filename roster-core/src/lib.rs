//! roster-core: employee record store and query layer
//!
//! Owns the employee data model, the partial-update patch type, the error
//! taxonomy, the storage port with in-memory and PostgreSQL backends, and the
//! listing/search/aggregation rules.

pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod service;
pub mod store;

pub use config::{RosterConfig, StorageBackend};
pub use error::{Error, ErrorKind, Result};
pub use model::{Employee, EmployeeId, FieldPatch, NewEmployee, Pagination, ValidationError};
pub use query::{ListFilter, SalaryAverages, SkillQuery};
pub use service::EmployeeService;
pub use store::{EmployeeStore, MemoryStore, PgStore};
