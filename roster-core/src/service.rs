//! Employee service: boundary validation in front of an [`EmployeeStore`].
//!
//! Callers hand in raw wire values (payloads, path ids, query strings); the
//! service validates them, runs the store operation and logs the outcome.
//! Errors pass through unchanged for the caller to translate.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Employee, EmployeeId, FieldPatch, NewEmployee, Pagination};
use crate::query::{ListFilter, SalaryAverages, SkillQuery};
use crate::store::EmployeeStore;

#[derive(Debug, Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn EmployeeStore> {
        &self.store
    }

    /// Create a record. `InvalidInput` for bad fields, `Conflict` for a taken id.
    pub async fn create(&self, new: NewEmployee) -> Result<Employee> {
        let employee = new.validate()?;
        let id = employee.employee_id.clone();

        match self.store.insert(employee).await {
            Ok(stored) => {
                info!(employee_id = %id, department = %stored.department, "employee created");
                Ok(stored)
            }
            Err(e) => {
                warn!(employee_id = %id, error = %e, "create rejected");
                Err(e)
            }
        }
    }

    pub async fn get(&self, id: &str) -> Result<Employee> {
        let id = lookup_id(id)?;
        debug!(employee_id = %id, "fetching employee");
        self.store.get(&id).await
    }

    /// Apply a partial update; only the patched fields change.
    pub async fn update(&self, id: &str, patch: FieldPatch) -> Result<Employee> {
        let id = lookup_id(id)?;
        let updated = self.store.update(&id, &patch).await?;
        info!(employee_id = %id, fields = ?patch.fields(), "employee updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = lookup_id(id)?;
        self.store.delete(&id).await?;
        info!(employee_id = %id, "employee deleted");
        Ok(())
    }

    /// Records in a department (or all records when `department` is blank or
    /// absent), oldest joiner first.
    pub async fn list_by_department(
        &self,
        department: Option<&str>,
        page: Option<Pagination>,
    ) -> Result<Vec<Employee>> {
        let filter = ListFilter::all().with_department(department).with_page(page);
        let records = self.store.list(&filter).await?;
        debug!(
            department = filter.department_name().unwrap_or("*"),
            count = records.len(),
            "listed employees"
        );
        Ok(records)
    }

    pub async fn search_by_skill(&self, skill: &str) -> Result<Vec<Employee>> {
        let query = SkillQuery::new(skill)?;
        let records = self.store.search_skill(&query).await?;
        debug!(skill = query.as_str(), count = records.len(), "skill search");
        Ok(records)
    }

    pub async fn average_salary_by_department(&self) -> Result<SalaryAverages> {
        let averages = self.store.average_salary_by_department().await?;
        debug!(departments = averages.len(), "salary averages computed");
        Ok(averages)
    }

    /// Number of stored records; doubles as a storage liveness probe.
    pub async fn count(&self) -> Result<u64> {
        self.store.count().await
    }

    /// Close the underlying store.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

/// An id that can't be valid can't be stored either.
fn lookup_id(raw: &str) -> Result<EmployeeId> {
    EmployeeId::new(raw).map_err(|_| Error::not_found(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn service() -> EmployeeService {
        EmployeeService::new(Arc::new(MemoryStore::new()))
    }

    fn new_employee(id: &str) -> NewEmployee {
        serde_json::from_value(json!({
            "employee_id": id,
            "name": "Ada",
            "department": "Engineering",
            "salary": 100.0,
            "joining_date": "2021-06-01",
            "skills": ["Rust"]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn invalid_create_leaves_store_untouched() {
        let svc = service();
        let mut bad = new_employee("E1");
        bad.salary = Some(-10.0);

        let err = svc.create(bad).await.unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(svc.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_id_is_not_found() {
        let svc = service();
        let err = svc.get("not a valid id").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn blank_skill_is_invalid() {
        let svc = service();
        let err = svc.search_by_skill("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
