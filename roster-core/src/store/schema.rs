//! Table bootstrap for the PostgreSQL store

use sqlx::PgPool;

use crate::error::Result;

/// Create the `employees` table and its indexes if they are missing.
pub async fn run(pool: &PgPool) -> Result<()> {
    tracing::info!("Bootstrapping employees table...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            employee_id TEXT PRIMARY KEY,
            name TEXT NOT NULL CHECK (length(name) > 0),
            department TEXT NOT NULL CHECK (length(department) > 0),
            salary DOUBLE PRECISION NOT NULL CHECK (salary >= 0 AND salary <= 1e15),
            joining_date DATE NOT NULL,
            skills TEXT[] NOT NULL DEFAULT '{}',
            skills_folded TEXT[] NOT NULL DEFAULT '{}',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Employees table ready");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_employees_skills_folded ON employees USING GIN (skills_folded)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_employees_department ON employees(department)")
        .execute(pool)
        .await?;
    sqlx::query(
        r#"CREATE INDEX IF NOT EXISTS idx_employees_joining ON employees(joining_date, employee_id COLLATE "C")"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
