use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One `hive_accounts` row. `reputation` is stored in display form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountRow {
    pub id: i32,
    pub name: String,
    pub display_name: Option<String>,
    pub about: Option<String>,
    pub reputation: Option<f64>,
    pub vote_weight: f64,
}
