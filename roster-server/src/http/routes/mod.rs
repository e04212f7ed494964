//! Route handlers organized by resource

pub mod employees;
pub mod health;
