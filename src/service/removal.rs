use crate::db::{queries, queries_debit};
use crate::error::{DependentRelation, Dependents, LedgerError, LedgerResult};
use sqlx::SqlitePool;

/// 级联删除运输单的统计
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ShipmentRemoval {
    pub shipment_id: i64,
    pub client_refs_cleared: u64,
    pub products: u64,
    pub store_listings: u64,
    pub debits: u64,
}

/// 删除服务: 运输单级联删除与客户受保护删除
pub struct RemovalService {
    pool: SqlitePool,
}

impl RemovalService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 在单个事务内删除运输单及其所有依赖行
    pub async fn delete_shipment_cascade(&self, shipment_id: i64) -> LedgerResult<ShipmentRemoval> {
        let mut tx = self.pool.begin().await?;

        if queries::get_shipment(&mut tx, shipment_id).await?.is_none() {
            return Err(LedgerError::not_found("shipment", shipment_id));
        }

        let client_refs_cleared = queries::clear_client_shipment_refs(&mut tx, shipment_id).await?;

        let product_ids = queries::product_ids_for_shipment(&mut tx, shipment_id).await?;
        let store_listings =
            queries::delete_store_listings_for_products(&mut tx, &product_ids).await?;
        let products = queries::delete_products(&mut tx, &product_ids).await?;

        let debits = queries_debit::delete_debits_for_shipment(&mut tx, shipment_id).await?;
        queries::delete_shipment(&mut tx, shipment_id).await?;

        tx.commit().await?;

        let removal = ShipmentRemoval {
            shipment_id,
            client_refs_cleared,
            products,
            store_listings,
            debits,
        };
        tracing::info!("Shipment {} deleted: {:?}", shipment_id, removal);
        Ok(removal)
    }

    /// 删除客户, 仍被运输单或账目引用时拒绝
    pub async fn delete_client_guarded(&self, client_id: i64) -> LedgerResult<()> {
        let mut tx = self.pool.begin().await?;

        if !queries::client_exists(&mut tx, client_id).await? {
            return Err(LedgerError::not_found("client", client_id));
        }

        let as_sender = queries::count_shipments_as_sender(&mut tx, client_id).await?;
        let as_receiver = queries::count_shipments_as_receiver(&mut tx, client_id).await?;
        let debits = queries_debit::count_debits_for_client(&mut tx, client_id).await?;

        let mut blocking = Vec::new();
        if as_sender + as_receiver > 0 {
            blocking.push(Dependents {
                relation: DependentRelation::Shipping,
                count: as_sender + as_receiver,
            });
        }
        if debits > 0 {
            blocking.push(Dependents {
                relation: DependentRelation::Debit,
                count: debits,
            });
        }

        if !blocking.is_empty() {
            tracing::warn!(
                "Client {} not deleted: {} shipment(s) as sender, {} as receiver, {} debit(s)",
                client_id, as_sender, as_receiver, debits
            );
            return Err(LedgerError::ClientHasDependents { client_id, blocking });
        }

        queries::delete_client(&mut tx, client_id).await?;
        tx.commit().await?;

        tracing::info!("Client {} deleted", client_id);
        Ok(())
    }
}
