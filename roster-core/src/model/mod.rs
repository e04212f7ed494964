//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod employee;
pub mod pagination;
pub mod patch;
pub mod validation;

pub use employee::{
    parse_joining_date, Employee, EmployeeId, NewEmployee, RawEmployeeId, MAX_SALARY,
};
pub use pagination::{Pagination, PaginationParams};
pub use patch::FieldPatch;
pub use validation::ValidationError;
