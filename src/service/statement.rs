use super::ledger::ensure_client;
use crate::db::queries_debit;
use crate::error::LedgerResult;
use crate::models::{ClientStatement, Debit};
use sqlx::SqlitePool;
use std::io::Write;

/// 客户账单: 实时从账目行汇总, 不依赖 total_debit 缓存
pub struct StatementService {
    pool: SqlitePool,
}

impl StatementService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 按币种汇总客户的应收、应付与净额
    pub async fn client_statement(&self, client_id: i64) -> LedgerResult<ClientStatement> {
        let mut conn = self.pool.acquire().await?;
        ensure_client(&mut conn, client_id).await?;

        let balances = queries_debit::client_balances(&mut conn, client_id).await?;
        Ok(ClientStatement { client_id, balances })
    }

    /// 导出客户参与的全部账目为 CSV, 返回导出行数
    pub async fn export_client_debits<W: Write>(
        &self,
        client_id: i64,
        writer: W,
    ) -> LedgerResult<usize> {
        let debits = {
            let mut conn = self.pool.acquire().await?;
            ensure_client(&mut conn, client_id).await?;
            queries_debit::list_client_debits(&mut conn, client_id).await?
        };

        write_debits_csv(&debits, writer)?;
        tracing::info!("Exported {} debit(s) for client {}", debits.len(), client_id);
        Ok(debits.len())
    }
}

/// 将 Option 转换为 CSV 字段
fn option_to_csv<T: ToString>(val: &Option<T>) -> String {
    val.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

/// 写出账目 CSV (含表头)
pub fn write_debits_csv<W: Write>(debits: &[Debit], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record([
        "id",
        "sender_id",
        "receiver_id",
        "shipping_id",
        "amount",
        "currency",
        "note",
        "transaction_date",
        "total_debit",
    ])?;

    for debit in debits {
        writer.write_record(&[
            debit.id.to_string(),
            option_to_csv(&debit.sender_id),
            debit.receiver_id.to_string(),
            option_to_csv(&debit.shipping_id),
            debit.amount.to_string(),
            debit.currency.to_string(),
            debit.note.clone(),
            option_to_csv(&debit.transaction_date),
            debit.total_debit.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
