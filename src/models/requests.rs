//! 请求体定义与边界校验
//!
//! 每个接口一个显式结构体, 校验通过后转换为服务层使用的类型化命令。
//! 数值字段缺省或为 null 时按 0 处理, 文本字段缺省为空串, 币种缺省为 Dollar。

use chrono::NaiveDate;
use serde::Deserialize;

use super::{ClientDraft, Currency, NewDebit, NewShipment, ShipmentType, ShipmentUpdate};
use crate::error::{LedgerError, LedgerResult};

/// PUT /api/shipments/:id
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShipmentUpdateRequest {
    #[serde(rename = "type")]
    pub shipment_type: Option<String>,
    pub shipping_date: Option<NaiveDate>,
    pub receiving_date: Option<NaiveDate>,
    pub receiver_client_id: Option<i64>,
    pub sender_client_id: Option<i64>,
    pub paid: Option<f64>,
    pub ship_price: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub note: String,
}

impl ShipmentUpdateRequest {
    pub fn validate(self) -> LedgerResult<ShipmentUpdate> {
        Ok(ShipmentUpdate {
            shipment_type: parse_type(self.shipment_type.as_deref())?,
            shipping_date: self.shipping_date,
            receiving_date: self.receiving_date,
            sender_client_id: required(self.sender_client_id, "sender_client_id")?,
            receiver_client_id: required(self.receiver_client_id, "receiver_client_id")?,
            paid: non_negative(self.paid.unwrap_or(0.0), "paid")?,
            ship_price: non_negative(self.ship_price.unwrap_or(0.0), "ship_price")?,
            currency: parse_currency(self.currency.as_deref())?,
            note: self.note,
        })
    }
}

/// POST /api/shipments
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewShipmentRequest {
    #[serde(rename = "type")]
    pub shipment_type: Option<String>,
    pub shipping_date: Option<NaiveDate>,
    pub receiver_client_id: Option<i64>,
    pub sender_client_id: Option<i64>,
    pub paid: Option<f64>,
    pub ship_price: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub note: String,
    /// 附件由上传层处理, 这里只接受不使用
    #[serde(default)]
    pub file: Option<serde_json::Value>,
}

impl NewShipmentRequest {
    pub fn validate(self) -> LedgerResult<NewShipment> {
        Ok(NewShipment {
            shipment_type: parse_type(self.shipment_type.as_deref())?,
            shipping_date: self.shipping_date,
            sender_client_id: required(self.sender_client_id, "sender_client_id")?,
            receiver_client_id: required(self.receiver_client_id, "receiver_client_id")?,
            paid: non_negative(self.paid.unwrap_or(0.0), "paid")?,
            ship_price: non_negative(self.ship_price.unwrap_or(0.0), "ship_price")?,
            currency: parse_currency(self.currency.as_deref())?,
            note: self.note,
        })
    }
}

/// POST /api/debits
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDebitRequest {
    pub sender_id: Option<i64>,
    pub receiver_id: Option<i64>,
    pub shipping_id: Option<i64>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub note: String,
    pub transaction_date: Option<NaiveDate>,
}

impl NewDebitRequest {
    pub fn validate(self) -> LedgerResult<NewDebit> {
        let amount = non_negative(required(self.amount, "amount")?, "amount")?;
        if amount == 0.0 {
            return Err(LedgerError::validation("amount", "must be greater than zero"));
        }

        Ok(NewDebit {
            sender_id: self.sender_id,
            receiver_id: required(self.receiver_id, "receiver_id")?,
            shipping_id: self.shipping_id,
            amount,
            currency: parse_currency(self.currency.as_deref())?,
            note: self.note,
            transaction_date: Some(required(self.transaction_date, "transaction_date")?),
        })
    }
}

/// POST /api/clients, PUT /api/clients/:id
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub history: String,
    pub debt: Option<f64>,
    pub total_debts: Option<f64>,
}

impl ClientRequest {
    pub fn validate(self) -> LedgerResult<ClientDraft> {
        let name = required(self.name, "name")?.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::validation("name", "must not be blank"));
        }
        let debt = self.debt.unwrap_or(0.0);
        let total_debts = self.total_debts.unwrap_or(0.0);
        if !debt.is_finite() {
            return Err(LedgerError::validation("debt", "must be a finite number"));
        }
        if !total_debts.is_finite() {
            return Err(LedgerError::validation("total_debts", "must be a finite number"));
        }

        Ok(ClientDraft {
            name,
            phone: self.phone.filter(|p| !p.trim().is_empty()),
            history: self.history,
            debt,
            total_debts,
        })
    }
}

fn required<T>(value: Option<T>, field: &str) -> LedgerResult<T> {
    value.ok_or_else(|| LedgerError::validation(field, "is required"))
}

fn non_negative(value: f64, field: &str) -> LedgerResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(LedgerError::validation(
            field,
            "must be a non-negative number",
        ));
    }
    Ok(value)
}

fn parse_type(value: Option<&str>) -> LedgerResult<ShipmentType> {
    required(value, "type")?.parse()
}

fn parse_currency(value: Option<&str>) -> LedgerResult<Currency> {
    match value {
        Some(v) if !v.trim().is_empty() => v.parse(),
        _ => Ok(Currency::default()),
    }
}
