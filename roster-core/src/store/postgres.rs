//! PostgreSQL employee store
//!
//! One row per employee in `employees`, keyed by `employee_id`.
//! - insert: `ON CONFLICT DO NOTHING RETURNING` (no check-then-insert)
//! - update: single `UPDATE ... COALESCE ... RETURNING` (no read-modify-write)
//! - identifiers compare with `COLLATE "C"` so ordering matches the in-memory store
//! - skill search reads `skills_folded`, folded in Rust with [`fold_skill`]

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};

use super::{schema, EmployeeStore};
use crate::error::{Error, Result};
use crate::model::{Employee, EmployeeId, FieldPatch};
use crate::query::{fold_skill, ListFilter, SalaryAverages, SkillQuery};

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

const COLUMNS: &str = "employee_id, name, department, salary, joining_date, skills";

#[derive(Debug, FromRow)]
struct EmployeeRow {
    employee_id: String,
    name: String,
    department: String,
    salary: f64,
    joining_date: NaiveDate,
    skills: Vec<String>,
}

fn folded(skills: &[String]) -> Vec<String> {
    skills.iter().map(|s| fold_skill(s)).collect()
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            employee_id: EmployeeId::from_stored(row.employee_id),
            name: row.name,
            department: row.department,
            salary: row.salary,
            joining_date: row.joining_date,
            skills: row.skills.into_iter().collect(),
        }
    }
}

/// PostgreSQL implementation of [`EmployeeStore`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect, then make sure the table exists.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the connection or bootstrap fails.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = PgStore::connect("postgres://localhost/roster", 5).await?;
    /// ```
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::from_pool(pool);
        store.bootstrap().await?;
        Ok(store)
    }

    /// Wrap an existing pool without touching the schema.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn bootstrap(&self) -> Result<()> {
        schema::run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EmployeeStore for PgStore {
    async fn insert(&self, employee: Employee) -> Result<Employee> {
        let sql = format!(
            "INSERT INTO employees ({COLUMNS}, skills_folded) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (employee_id) DO NOTHING RETURNING {COLUMNS}"
        );
        let skills: Vec<String> = employee.skills.iter().cloned().collect();
        let skills_folded = folded(&skills);

        let row: Option<EmployeeRow> = sqlx::query_as(&sql)
            .bind(employee.employee_id.as_str())
            .bind(&employee.name)
            .bind(&employee.department)
            .bind(employee.salary)
            .bind(employee.joining_date)
            .bind(skills)
            .bind(skills_folded)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, &employee.employee_id))?;

        row.map(Employee::from)
            .ok_or_else(|| Error::conflict(employee.employee_id.as_str()))
    }

    async fn get(&self, id: &EmployeeId) -> Result<Employee> {
        let sql = format!("SELECT {COLUMNS} FROM employees WHERE employee_id = $1");
        let row: Option<EmployeeRow> = sqlx::query_as(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Employee::from)
            .ok_or_else(|| Error::not_found(id.as_str()))
    }

    async fn update(&self, id: &EmployeeId, patch: &FieldPatch) -> Result<Employee> {
        let sql = format!(
            r#"
            UPDATE employees SET
                name = COALESCE($2::text, name),
                department = COALESCE($3::text, department),
                salary = COALESCE($4::double precision, salary),
                joining_date = COALESCE($5::date, joining_date),
                skills = COALESCE($6::text[], skills),
                skills_folded = COALESCE($7::text[], skills_folded),
                updated_at = NOW()
            WHERE employee_id = $1
            RETURNING {COLUMNS}
            "#
        );
        let skills: Option<Vec<String>> = patch.skills().map(|set| set.iter().cloned().collect());
        let skills_folded = skills.as_deref().map(folded);

        let row: Option<EmployeeRow> = sqlx::query_as(&sql)
            .bind(id.as_str())
            .bind(patch.name())
            .bind(patch.department())
            .bind(patch.salary())
            .bind(patch.joining_date())
            .bind(skills)
            .bind(skills_folded)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Employee::from)
            .ok_or_else(|| Error::not_found(id.as_str()))
    }

    async fn delete(&self, id: &EmployeeId) -> Result<()> {
        let result = sqlx::query("DELETE FROM employees WHERE employee_id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found(id.as_str()));
        }
        Ok(())
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<Employee>> {
        let sql = format!(
            r#"
            SELECT {COLUMNS} FROM employees
            WHERE ($1::text IS NULL OR department = $1)
            ORDER BY joining_date ASC, employee_id COLLATE "C" ASC
            LIMIT $2 OFFSET $3
            "#
        );
        let page = filter.page();
        let limit = page.map(|p| i64::from(p.limit()));
        let offset = page.map_or(0, |p| i64::try_from(p.offset()).unwrap_or(i64::MAX));

        let rows: Vec<EmployeeRow> = sqlx::query_as(&sql)
            .bind(filter.department_name())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn search_skill(&self, skill: &SkillQuery) -> Result<Vec<Employee>> {
        let sql = format!(
            r#"
            SELECT {COLUMNS} FROM employees
            WHERE $1 = ANY(skills_folded)
            ORDER BY employee_id COLLATE "C" ASC
            "#
        );
        let rows: Vec<EmployeeRow> = sqlx::query_as(&sql)
            .bind(skill.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn average_salary_by_department(&self) -> Result<SalaryAverages> {
        // Ordered SUM keeps the float result reproducible for a fixed row set.
        let rows: Vec<(String, f64)> = sqlx::query_as(
            r#"
            SELECT department,
                   SUM(salary ORDER BY employee_id COLLATE "C") / COUNT(*)::double precision
            FROM employees
            GROUP BY department
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn count(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn close(&self) {
        tracing::info!("Closing database pool");
        self.pool.close().await;
    }
}

fn map_unique_violation(e: sqlx::Error, id: &EmployeeId) -> Error {
    let is_unique = e
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);
    if is_unique {
        Error::conflict(id.as_str())
    } else {
        e.into()
    }
}
