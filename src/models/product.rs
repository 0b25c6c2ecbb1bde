//! 仓储模块的行结构, 本服务只读取和级联清理, 不提供增改接口

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 货品 (product 表), 可关联到来源运输单
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub shipping_id: Option<i64>,
    pub quantity: f64,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// 库存位置 (store 表): 某货品在某房间的数量
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct StoreListing {
    pub id: i64,
    pub product_id: i64,
    pub room_id: i64,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
}
