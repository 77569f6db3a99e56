use sqlx::PgPool;

pub const EMPLOYEE_ID_PREFIX: &str = "UI";

const SUFFIX_DIGITS: usize = 7;

/// Largest suffix the seven-digit format can carry; `next_employee_id`
/// refuses to mint anything past it rather than widen the id silently.
pub const MAX_EMPLOYEE_ID_SUFFIX: i64 = 9_999_999;

pub fn format_employee_id(n: i64) -> String {
    format!("{}{:07}", EMPLOYEE_ID_PREFIX, n)
}

/// Numeric suffix of a well-formed employee id, `None` if the id does not
/// match the two-uppercase-letters + seven-digits pattern.
pub fn parse_employee_suffix(id: &str) -> Option<i64> {
    let prefix = id.get(..2)?;
    let digits = id.get(2..)?;
    if prefix.chars().all(|c| c.is_ascii_uppercase())
        && digits.len() == SUFFIX_DIGITS
        && digits.chars().all(|c| c.is_ascii_digit())
    {
        digits.parse().ok()
    } else {
        None
    }
}

/// Next employee id via a single atomic counter bump. Concurrent creations
/// each get a distinct value; there is no read-max-then-increment window.
pub async fn next_employee_id(pool: &PgPool) -> Result<String, sqlx::Error> {
    let value = sqlx::query_scalar::<_, i64>(
        "INSERT INTO counters (name, value) VALUES ('employee_id', 1)
         ON CONFLICT (name) DO UPDATE SET value = counters.value + 1
         RETURNING value",
    )
    .fetch_one(pool)
    .await?;
    if value > MAX_EMPLOYEE_ID_SUFFIX {
        return Err(sqlx::Error::Protocol("employee id space exhausted".to_string()));
    }
    Ok(format_employee_id(value))
}
