use serde::Serialize;
use std::fmt;

/// 阻止删除客户的关联关系类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependentRelation {
    Shipping,
    Debit,
}

impl fmt::Display for DependentRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependentRelation::Shipping => f.write_str("shipping"),
            DependentRelation::Debit => f.write_str("debit"),
        }
    }
}

/// 阻止删除的关联行统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependents {
    pub relation: DependentRelation,
    pub count: i64,
}

/// 账务引擎错误
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("invalid field `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("invalid shipment type: {0:?}")]
    InvalidShipmentType(String),

    #[error("client {client_id} is still referenced by {}", describe(.blocking))]
    ClientHasDependents {
        client_id: i64,
        blocking: Vec<Dependents>,
    },

    #[error("store failure: {0}")]
    Store(#[from] sqlx::Error),

    #[error("migration failure: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("export failure: {0}")]
    Export(#[from] csv::Error),
}

impl LedgerError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LedgerError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        LedgerError::NotFound { entity, id }
    }
}

fn describe(blocking: &[Dependents]) -> String {
    blocking
        .iter()
        .map(|d| format!("{} {} row(s)", d.count, d.relation))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type LedgerResult<T> = Result<T, LedgerError>;
