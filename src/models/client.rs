use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 客户 (client 表)
///
/// debt / total_debts 由用户维护, 账务引擎不会自动更新。
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub history: String,
    pub shipping_id: Option<i64>,
    pub debt: f64,
    pub total_debts: f64,
    pub created_at: DateTime<Utc>,
}

/// 客户新建/更新内容 (已校验)
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDraft {
    pub name: String,
    pub phone: Option<String>,
    pub history: String,
    pub debt: f64,
    pub total_debts: f64,
}
