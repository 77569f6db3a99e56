use crate::utils::ids;
use sqlx::PgPool;
use std::env;

pub async fn create_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to the database")
}

/// Idempotent schema setup, run once at startup. The employee id counter is
/// seeded from the highest suffix already persisted so a pre-populated
/// database keeps its sequence.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS cafes (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            location TEXT NOT NULL,
            logo TEXT
        )",
        "CREATE TABLE IF NOT EXISTS employees (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email_address TEXT NOT NULL,
            phone_number TEXT NOT NULL,
            gender TEXT NOT NULL,
            cafe TEXT,
            start_date TIMESTAMPTZ NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS employees_cafe_idx ON employees (cafe)",
        "CREATE TABLE IF NOT EXISTS counters (
            name TEXT PRIMARY KEY,
            value BIGINT NOT NULL
        )",
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    let existing_ids: Vec<String> = sqlx::query_scalar("SELECT id FROM employees")
        .fetch_all(pool)
        .await?;
    let max_suffix = existing_ids
        .iter()
        .filter_map(|id| ids::parse_employee_suffix(id))
        .max()
        .unwrap_or(0);

    sqlx::query(
        "INSERT INTO counters (name, value) VALUES ('employee_id', $1)
         ON CONFLICT (name) DO NOTHING",
    )
    .bind(max_suffix)
    .execute(pool)
    .await?;

    Ok(())
}
