use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// 运输单类型
///
/// 历史数据中同时存在 "comming" 与 "coming" 两种拼写, 解析时都接受,
/// 写库和输出一律使用规范拼写。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum ShipmentType {
    #[serde(rename = "input load")]
    #[sqlx(rename = "input load")]
    InputLoad,
    #[serde(rename = "output load")]
    #[sqlx(rename = "output load")]
    OutputLoad,
    #[serde(rename = "coming", alias = "comming")]
    #[sqlx(rename = "coming")]
    Coming,
    #[serde(rename = "going")]
    #[sqlx(rename = "going")]
    Going,
}

impl ShipmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentType::InputLoad => "input load",
            ShipmentType::OutputLoad => "output load",
            ShipmentType::Coming => "coming",
            ShipmentType::Going => "going",
        }
    }
}

impl fmt::Display for ShipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "input load" => Ok(ShipmentType::InputLoad),
            "output load" => Ok(ShipmentType::OutputLoad),
            "coming" | "comming" => Ok(ShipmentType::Coming),
            "going" => Ok(ShipmentType::Going),
            _ => Err(LedgerError::InvalidShipmentType(s.to_string())),
        }
    }
}

/// 结算币种
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Currency {
    #[default]
    #[serde(rename = "Dollar")]
    #[sqlx(rename = "Dollar")]
    Dollar,
    #[serde(rename = "Iraqi Dinar")]
    #[sqlx(rename = "Iraqi Dinar")]
    IraqiDinar,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Dollar => "Dollar",
            Currency::IraqiDinar => "Iraqi Dinar",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dollar" => Ok(Currency::Dollar),
            "iraqi dinar" => Ok(Currency::IraqiDinar),
            _ => Err(LedgerError::validation(
                "currency",
                format!("unknown currency {:?}", s),
            )),
        }
    }
}

/// 运输单 (shipment 表)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Shipment {
    pub id: i64,
    #[serde(rename = "type")]
    pub shipment_type: ShipmentType,
    pub shipping_date: Option<NaiveDate>,
    pub receiving_date: Option<NaiveDate>,
    pub sender_client_id: Option<i64>,
    pub receiver_client_id: Option<i64>,
    pub paid: f64,
    pub ship_price: f64,
    pub currency: Currency,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// 新建运输单 (已校验)
#[derive(Debug, Clone, PartialEq)]
pub struct NewShipment {
    pub shipment_type: ShipmentType,
    pub shipping_date: Option<NaiveDate>,
    pub sender_client_id: i64,
    pub receiver_client_id: i64,
    pub paid: f64,
    pub ship_price: f64,
    pub currency: Currency,
    pub note: String,
}

/// 运输单更新 (已校验), 整体覆盖原有字段
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentUpdate {
    pub shipment_type: ShipmentType,
    pub shipping_date: Option<NaiveDate>,
    pub receiving_date: Option<NaiveDate>,
    pub sender_client_id: i64,
    pub receiver_client_id: i64,
    pub paid: f64,
    pub ship_price: f64,
    pub currency: Currency,
    pub note: String,
}
