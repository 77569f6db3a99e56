use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `cafe` holds the external id of the assigned cafe, not a database-native
/// reference, so the assignment survives cafe re-creation under the same id.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email_address: String,
    pub phone_number: String,
    pub gender: String,
    pub cafe: Option<String>,
    pub start_date: DateTime<Utc>,
}
