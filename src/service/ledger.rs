use crate::db::{queries, queries_debit};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Debit, DebitFilter, NewDebit, NewShipment, Shipment, ShipmentType, ShipmentUpdate,
};
use indexmap::IndexSet;
use sqlx::{SqliteConnection, SqlitePool};

/// 账务引擎: 让债务账目与运输单的付款状态保持一致
///
/// 每个写操作都在单个事务内完成, 失败时事务随 drop 回滚。
pub struct LedgerService {
    pool: SqlitePool,
}

impl LedgerService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 运输单更新后重建其债务账目
    ///
    /// 旧账目全部删除, 然后按欠款/多付分别生成 0~2 条新账目,
    /// 并刷新新账目所在 (sender, receiver) 对的 total_debit。
    pub async fn reconcile_shipment_debits(
        &self,
        shipment_id: i64,
        update: ShipmentUpdate,
    ) -> LedgerResult<Shipment> {
        let mut tx = self.pool.begin().await?;

        if queries::get_shipment(&mut tx, shipment_id).await?.is_none() {
            tracing::warn!("Shipment {} not found, update rejected", shipment_id);
            return Err(LedgerError::not_found("shipment", shipment_id));
        }
        ensure_client(&mut tx, update.sender_client_id).await?;
        ensure_client(&mut tx, update.receiver_client_id).await?;

        // 1. 覆盖运输单字段
        queries::update_shipment(&mut tx, shipment_id, &update).await?;

        // 2. 删除该运输单的全部旧账目
        let removed = queries_debit::delete_debits_for_shipment(&mut tx, shipment_id).await?;
        tracing::debug!("Shipment {}: removed {} previous debit(s)", shipment_id, removed);

        let mut touched: IndexSet<(i64, i64)> = IndexSet::new();

        // 3. 欠款: 收货方欠发货方
        let outstanding = update.ship_price - update.paid;
        if update.ship_price > 0.0 && update.paid < update.ship_price {
            let debit = NewDebit {
                sender_id: Some(update.sender_client_id),
                receiver_id: update.receiver_client_id,
                shipping_id: Some(shipment_id),
                amount: outstanding,
                currency: update.currency,
                note: shortage_note(update.shipment_type, shipment_id),
                transaction_date: update.receiving_date,
            };
            queries_debit::insert_debit(&mut tx, &debit).await?;
            touched.insert((update.sender_client_id, update.receiver_client_id));
            tracing::info!(
                "Shipment {}: shortage of {} {} recorded",
                shipment_id, outstanding, update.currency
            );
        }

        // 4. 多付: 方向互换, 与欠款分支独立判断
        let overpaid = update.paid - update.ship_price;
        if update.paid > update.ship_price {
            let debit = NewDebit {
                sender_id: Some(update.receiver_client_id),
                receiver_id: update.sender_client_id,
                shipping_id: Some(shipment_id),
                amount: overpaid,
                currency: update.currency,
                note: overpayment_note(update.shipment_type, shipment_id),
                transaction_date: update.receiving_date,
            };
            queries_debit::insert_debit(&mut tx, &debit).await?;
            touched.insert((update.receiver_client_id, update.sender_client_id));
            tracing::info!(
                "Shipment {}: overpayment of {} {} recorded",
                shipment_id, overpaid, update.currency
            );
        }

        // 5. 只刷新本次涉及的 (sender, receiver) 对
        refresh_pair_totals(&mut tx, &touched).await?;

        let shipment = queries::get_shipment(&mut tx, shipment_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("shipment", shipment_id))?;
        tx.commit().await?;

        tracing::info!("Shipment {} reconciled, {} debit pair(s) refreshed", shipment_id, touched.len());
        Ok(shipment)
    }

    /// 新建运输单并生成初始账目
    ///
    /// 无论付款状态如何, 总是生成一条全额运费账目: 收货方欠发货方 ship_price。
    pub async fn create_shipment_with_initial_debit(
        &self,
        shipment: NewShipment,
    ) -> LedgerResult<Shipment> {
        let mut tx = self.pool.begin().await?;

        ensure_client(&mut tx, shipment.sender_client_id).await?;
        ensure_client(&mut tx, shipment.receiver_client_id).await?;

        let shipment_id = queries::insert_shipment(&mut tx, &shipment).await?;
        queries::set_client_shipment(&mut tx, shipment.sender_client_id, shipment_id).await?;
        queries::set_client_shipment(&mut tx, shipment.receiver_client_id, shipment_id).await?;

        let debit = NewDebit {
            sender_id: Some(shipment.receiver_client_id),
            receiver_id: shipment.sender_client_id,
            shipping_id: Some(shipment_id),
            amount: shipment.ship_price,
            currency: shipment.currency,
            note: format!(
                "Shipping cost of {} shipment #{}: {} {}",
                shipment.shipment_type, shipment_id, shipment.ship_price, shipment.currency
            ),
            transaction_date: shipment.shipping_date,
        };
        queries_debit::insert_debit(&mut tx, &debit).await?;

        let touched = IndexSet::from([(shipment.receiver_client_id, shipment.sender_client_id)]);
        refresh_pair_totals(&mut tx, &touched).await?;

        let created = queries::get_shipment(&mut tx, shipment_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("shipment", shipment_id))?;
        tx.commit().await?;

        tracing::info!(
            "Shipment {} created ({}), initial debit {} {}",
            shipment_id, shipment.shipment_type, shipment.ship_price, shipment.currency
        );
        Ok(created)
    }

    /// 直接录入一条账目, 有 sender 时刷新该对的 total_debit
    pub async fn create_debit(&self, debit: NewDebit) -> LedgerResult<Debit> {
        let mut tx = self.pool.begin().await?;

        if let Some(sender_id) = debit.sender_id {
            ensure_client(&mut tx, sender_id).await?;
        }
        ensure_client(&mut tx, debit.receiver_id).await?;
        if let Some(shipment_id) = debit.shipping_id {
            if queries::get_shipment(&mut tx, shipment_id).await?.is_none() {
                return Err(LedgerError::not_found("shipment", shipment_id));
            }
        }

        let debit_id = queries_debit::insert_debit(&mut tx, &debit).await?;
        if let Some(sender_id) = debit.sender_id {
            let touched = IndexSet::from([(sender_id, debit.receiver_id)]);
            refresh_pair_totals(&mut tx, &touched).await?;
        }

        let created = queries_debit::get_debit(&mut tx, debit_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("debit", debit_id))?;
        tx.commit().await?;

        tracing::info!(
            "Debit {} created: {:?} -> {}, {} {}",
            debit_id, debit.sender_id, debit.receiver_id, debit.amount, debit.currency
        );
        Ok(created)
    }

    /// 删除单条账目并刷新其所在对的 total_debit
    pub async fn delete_debit(&self, debit_id: i64) -> LedgerResult<()> {
        let mut tx = self.pool.begin().await?;

        let debit = queries_debit::get_debit(&mut tx, debit_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("debit", debit_id))?;
        queries_debit::delete_debit(&mut tx, debit_id).await?;

        if let Some(sender_id) = debit.sender_id {
            let touched = IndexSet::from([(sender_id, debit.receiver_id)]);
            refresh_pair_totals(&mut tx, &touched).await?;
        }
        tx.commit().await?;

        tracing::info!("Debit {} deleted", debit_id);
        Ok(())
    }

    pub async fn get_shipment(&self, shipment_id: i64) -> LedgerResult<Shipment> {
        let mut conn = self.pool.acquire().await?;
        queries::get_shipment(&mut conn, shipment_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("shipment", shipment_id))
    }

    pub async fn list_shipments(&self) -> LedgerResult<Vec<Shipment>> {
        let mut conn = self.pool.acquire().await?;
        Ok(queries::list_shipments(&mut conn).await?)
    }

    pub async fn get_debit(&self, debit_id: i64) -> LedgerResult<Debit> {
        let mut conn = self.pool.acquire().await?;
        queries_debit::get_debit(&mut conn, debit_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("debit", debit_id))
    }

    pub async fn list_debits(&self, filter: &DebitFilter) -> LedgerResult<Vec<Debit>> {
        let mut conn = self.pool.acquire().await?;
        Ok(queries_debit::list_debits(&mut conn, filter).await?)
    }
}

/// 重新统计每个 (sender, receiver) 对的总额并写回该对所有账目
///
/// 未涉及的对保持原有缓存值。
pub(crate) async fn refresh_pair_totals(
    conn: &mut SqliteConnection,
    pairs: &IndexSet<(i64, i64)>,
) -> Result<(), sqlx::Error> {
    for &(sender_id, receiver_id) in pairs {
        let total = queries_debit::sum_pair(conn, sender_id, receiver_id).await?;
        let rows = queries_debit::update_pair_total(conn, sender_id, receiver_id, total).await?;
        tracing::debug!(
            "Pair {} -> {}: total_debit = {} on {} row(s)",
            sender_id, receiver_id, total, rows
        );
    }
    Ok(())
}

pub(crate) async fn ensure_client(conn: &mut SqliteConnection, client_id: i64) -> LedgerResult<()> {
    if queries::client_exists(conn, client_id).await? {
        Ok(())
    } else {
        Err(LedgerError::not_found("client", client_id))
    }
}

fn shortage_note(shipment_type: ShipmentType, shipment_id: i64) -> String {
    format!("Remaining shipping cost of {} shipment #{}", shipment_type, shipment_id)
}

fn overpayment_note(shipment_type: ShipmentType, shipment_id: i64) -> String {
    format!("Overpayment on {} shipment #{}", shipment_type, shipment_id)
}
