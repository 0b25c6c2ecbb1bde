use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Currency;

/// 债务账目 (debit 表)
///
/// amount 恒为正数, 方向由 sender (欠款方) -> receiver (收款方) 表示。
/// total_debit 是同一 (sender, receiver) 对所有账目金额之和的缓存,
/// 只在该对被写入时刷新。
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Debit {
    pub id: i64,
    pub sender_id: Option<i64>,
    pub receiver_id: i64,
    pub shipping_id: Option<i64>,
    pub amount: f64,
    pub currency: Currency,
    pub note: String,
    pub transaction_date: Option<NaiveDate>,
    pub total_debit: f64,
    pub created_at: DateTime<Utc>,
}

/// 新建账目 (已校验)
#[derive(Debug, Clone, PartialEq)]
pub struct NewDebit {
    pub sender_id: Option<i64>,
    pub receiver_id: i64,
    pub shipping_id: Option<i64>,
    pub amount: f64,
    pub currency: Currency,
    pub note: String,
    pub transaction_date: Option<NaiveDate>,
}

/// 账目列表过滤条件
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DebitFilter {
    pub sender_id: Option<i64>,
    pub receiver_id: Option<i64>,
    pub shipping_id: Option<i64>,
}

/// 单一币种下的客户收支汇总
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct CurrencyBalance {
    pub currency: Currency,
    pub receivable: f64,
    pub payable: f64,
    pub net: f64,
}

/// 客户账单
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientStatement {
    pub client_id: i64,
    pub balances: Vec<CurrencyBalance>,
}
