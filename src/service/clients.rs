use crate::db::queries;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Client, ClientDraft};
use sqlx::SqlitePool;

/// 客户目录
pub struct ClientService {
    pool: SqlitePool,
}

impl ClientService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_client(&self, draft: ClientDraft) -> LedgerResult<Client> {
        let mut tx = self.pool.begin().await?;
        let client_id = queries::insert_client(&mut tx, &draft).await?;
        let client = queries::get_client(&mut tx, client_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("client", client_id))?;
        tx.commit().await?;

        tracing::info!("Client {} created: {}", client_id, client.name);
        Ok(client)
    }

    pub async fn get_client(&self, client_id: i64) -> LedgerResult<Client> {
        let mut conn = self.pool.acquire().await?;
        queries::get_client(&mut conn, client_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("client", client_id))
    }

    pub async fn list_clients(&self) -> LedgerResult<Vec<Client>> {
        let mut conn = self.pool.acquire().await?;
        Ok(queries::list_clients(&mut conn).await?)
    }

    /// 更新客户资料 (不涉及回引用运输单)
    pub async fn update_client(&self, client_id: i64, draft: ClientDraft) -> LedgerResult<Client> {
        let mut tx = self.pool.begin().await?;
        if queries::update_client(&mut tx, client_id, &draft).await? == 0 {
            return Err(LedgerError::not_found("client", client_id));
        }
        let client = queries::get_client(&mut tx, client_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("client", client_id))?;
        tx.commit().await?;

        tracing::info!("Client {} updated", client_id);
        Ok(client)
    }
}
