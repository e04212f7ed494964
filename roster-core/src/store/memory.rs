//! In-memory employee store
//!
//! A `HashMap` behind a tokio `RwLock`. Used by tests and by `--storage memory`
//! runs; contents are lost on shutdown.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::EmployeeStore;
use crate::error::{Error, Result};
use crate::model::{Employee, EmployeeId, FieldPatch};
use crate::query::{self, ListFilter, SalaryAverages, SkillQuery};

/// In-memory implementation of [`EmployeeStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<EmployeeId, Employee>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn insert(&self, employee: Employee) -> Result<Employee> {
        let mut records = self.records.write().await;
        match records.entry(employee.employee_id.clone()) {
            Entry::Occupied(_) => Err(Error::conflict(employee.employee_id.as_str())),
            Entry::Vacant(slot) => Ok(slot.insert(employee).clone()),
        }
    }

    async fn get(&self, id: &EmployeeId) -> Result<Employee> {
        let records = self.records.read().await;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(id.as_str()))
    }

    async fn update(&self, id: &EmployeeId, patch: &FieldPatch) -> Result<Employee> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| Error::not_found(id.as_str()))?;
        patch.apply(record);
        Ok(record.clone())
    }

    async fn delete(&self, id: &EmployeeId) -> Result<()> {
        let mut records = self.records.write().await;
        records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(id.as_str()))
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<Employee>> {
        let mut matched: Vec<Employee> = {
            let records = self.records.read().await;
            records
                .values()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect()
        };
        query::sort_for_listing(&mut matched);

        Ok(match filter.page() {
            Some(page) => page.window(matched),
            None => matched,
        })
    }

    async fn search_skill(&self, skill: &SkillQuery) -> Result<Vec<Employee>> {
        let mut matched: Vec<Employee> = {
            let records = self.records.read().await;
            records
                .values()
                .filter(|e| skill.matches(e))
                .cloned()
                .collect()
        };
        query::sort_by_id(&mut matched);
        Ok(matched)
    }

    async fn average_salary_by_department(&self) -> Result<SalaryAverages> {
        let records = self.records.read().await;
        Ok(query::average_salary_by_department(records.values()))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pagination;
    use chrono::NaiveDate;

    fn emp(id: &str, dept: &str, salary: f64, date: &str, skills: &[&str]) -> Employee {
        Employee {
            employee_id: EmployeeId::new(id).unwrap(),
            name: format!("Employee {}", id),
            department: dept.into(),
            salary,
            joining_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.list(&ListFilter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = MemoryStore::new();
        let record = emp("E1", "Eng", 10.0, "2021-01-01", &["Rust"]);

        store.insert(record.clone()).await.unwrap();

        assert_eq!(store.get(&record.employee_id).await.unwrap(), record);
    }

    #[tokio::test]
    async fn duplicate_insert_keeps_original() {
        let store = MemoryStore::new();
        let original = emp("E1", "Eng", 10.0, "2021-01-01", &[]);
        store.insert(original.clone()).await.unwrap();

        let err = store
            .insert(emp("E1", "Sales", 99.0, "2023-01-01", &[]))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Conflict { .. }));
        assert_eq!(store.get(&original.employee_id).await.unwrap(), original);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = MemoryStore::new();
        let patch = FieldPatch::default().with_salary(1.0).unwrap();

        let err = store
            .update(&EmployeeId::new("nope").unwrap(), &patch)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let store = MemoryStore::new();
        let record = emp("E1", "Eng", 10.0, "2021-01-01", &[]);
        store.insert(record.clone()).await.unwrap();

        store.delete(&record.employee_id).await.unwrap();
        let err = store.delete(&record.employee_id).await.unwrap_err();

        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_pages_after_sorting() {
        let store = MemoryStore::new();
        store.insert(emp("c", "Eng", 1.0, "2023-01-01", &[])).await.unwrap();
        store.insert(emp("a", "Eng", 1.0, "2021-01-01", &[])).await.unwrap();
        store.insert(emp("b", "Eng", 1.0, "2022-01-01", &[])).await.unwrap();

        let filter = ListFilter::department("Eng").with_page(Some(Pagination::new(2, 2)));
        let page = store.list(&filter).await.unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].employee_id.as_str(), "c");
    }

    #[tokio::test]
    async fn concurrent_updates_do_not_lose_fields() {
        let store = MemoryStore::new();
        let record = emp("E1", "Eng", 10.0, "2021-01-01", &[]);
        store.insert(record.clone()).await.unwrap();

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                let id = record.employee_id.clone();
                tokio::spawn(async move {
                    let patch = if i % 2 == 0 {
                        FieldPatch::default().with_salary(500.0).unwrap()
                    } else {
                        FieldPatch::default().with_name("Renamed").unwrap()
                    };
                    store.update(&id, &patch).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = store.get(&record.employee_id).await.unwrap();
        assert_eq!(stored.salary, 500.0);
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.department, "Eng");
    }
}
