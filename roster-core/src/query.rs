//! Query and aggregation rules shared by every store
//!
//! - Listings: ascending `joining_date`, ties broken by `employee_id`
//! - Skill search: case-insensitive exact match, ordered by `employee_id`
//! - Salary averages: per department, summed in `employee_id` order then divided

use std::collections::BTreeMap;

use crate::model::{Employee, Pagination, ValidationError};

/// Department name → mean salary. Departments without records never appear.
pub type SalaryAverages = BTreeMap<String, f64>;

/// Filter for department listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    department: Option<String>,
    page: Option<Pagination>,
}

impl ListFilter {
    /// Every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Exact department match. A blank name means no filter.
    pub fn department(name: &str) -> Self {
        Self::all().with_department(Some(name))
    }

    pub fn with_department(mut self, name: Option<&str>) -> Self {
        self.department = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned);
        self
    }

    pub fn with_page(mut self, page: Option<Pagination>) -> Self {
        self.page = page;
        self
    }

    pub fn department_name(&self) -> Option<&str> {
        self.department.as_deref()
    }

    pub fn page(&self) -> Option<Pagination> {
        self.page
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        self.department
            .as_deref()
            .map_or(true, |d| employee.department == d)
    }
}

/// Normalised skill search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillQuery(String);

impl SkillQuery {
    pub fn new(skill: &str) -> Result<Self, ValidationError> {
        let skill = skill.trim();
        if skill.is_empty() {
            return Err(ValidationError::Empty { field: "skill" });
        }
        Ok(Self(fold_skill(skill)))
    }

    /// Lowercased term
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        employee
            .skills
            .iter()
            .any(|skill| fold_skill(skill) == self.0)
    }
}

/// Case folding used for skill comparison.
///
/// Every backend compares against this exact folding (PostgreSQL stores it in
/// `skills_folded`), so matches never depend on a database locale.
pub fn fold_skill(skill: &str) -> String {
    skill.to_lowercase()
}

/// Order records for a department listing.
pub fn sort_for_listing(records: &mut [Employee]) {
    records.sort_by(|a, b| {
        a.joining_date
            .cmp(&b.joining_date)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });
}

/// Order records by identifier.
pub fn sort_by_id(records: &mut [Employee]) {
    records.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
}

/// Mean salary per department over the given records.
///
/// Records are visited in `employee_id` order regardless of input order, so
/// the floating-point sum is the same for a fixed set of records.
pub fn average_salary_by_department<'a, I>(records: I) -> SalaryAverages
where
    I: IntoIterator<Item = &'a Employee>,
{
    let mut ordered: Vec<&Employee> = records.into_iter().collect();
    ordered.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));

    let mut totals: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    for emp in ordered {
        let entry = totals.entry(emp.department.as_str()).or_insert((0.0, 0));
        entry.0 += emp.salary;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(department, (sum, count))| (department.to_owned(), sum / count as f64))
        .collect()
}
