use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Cafe {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub logo: Option<String>,
}
