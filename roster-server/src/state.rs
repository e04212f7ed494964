//! Application state shared across handlers

use roster_core::EmployeeService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    employees: EmployeeService,
}

impl AppState {
    pub fn new(employees: EmployeeService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { employees }),
        }
    }

    pub fn employees(&self) -> &EmployeeService {
        &self.inner.employees
    }
}
