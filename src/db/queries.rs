use crate::models::{Client, ClientDraft, NewShipment, Product, Shipment, ShipmentUpdate, StoreListing};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

/// 查询运输单
pub async fn get_shipment(
    conn: &mut SqliteConnection,
    shipment_id: i64,
) -> Result<Option<Shipment>, sqlx::Error> {
    sqlx::query_as::<_, Shipment>(
        r#"
        SELECT id, shipment_type, shipping_date, receiving_date,
               sender_client_id, receiver_client_id,
               paid, ship_price, currency, note, created_at
        FROM shipment
        WHERE id = ?
        "#,
    )
    .bind(shipment_id)
    .fetch_optional(conn)
    .await
}

/// 运输单列表 (新建的在前)
pub async fn list_shipments(conn: &mut SqliteConnection) -> Result<Vec<Shipment>, sqlx::Error> {
    sqlx::query_as::<_, Shipment>(
        r#"
        SELECT id, shipment_type, shipping_date, receiving_date,
               sender_client_id, receiver_client_id,
               paid, ship_price, currency, note, created_at
        FROM shipment
        ORDER BY id DESC
        "#,
    )
    .fetch_all(conn)
    .await
}

/// 插入运输单, 返回新ID
pub async fn insert_shipment(
    conn: &mut SqliteConnection,
    shipment: &NewShipment,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO shipment (
            shipment_type, shipping_date, receiving_date,
            sender_client_id, receiver_client_id,
            paid, ship_price, currency, note, created_at
        ) VALUES (?, ?, NULL, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(shipment.shipment_type)
    .bind(shipment.shipping_date)
    .bind(shipment.sender_client_id)
    .bind(shipment.receiver_client_id)
    .bind(shipment.paid)
    .bind(shipment.ship_price)
    .bind(shipment.currency)
    .bind(&shipment.note)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// 覆盖运输单的可编辑字段
pub async fn update_shipment(
    conn: &mut SqliteConnection,
    shipment_id: i64,
    update: &ShipmentUpdate,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE shipment
        SET shipment_type = ?, shipping_date = ?, receiving_date = ?,
            sender_client_id = ?, receiver_client_id = ?,
            paid = ?, ship_price = ?, currency = ?, note = ?
        WHERE id = ?
        "#,
    )
    .bind(update.shipment_type)
    .bind(update.shipping_date)
    .bind(update.receiving_date)
    .bind(update.sender_client_id)
    .bind(update.receiver_client_id)
    .bind(update.paid)
    .bind(update.ship_price)
    .bind(update.currency)
    .bind(&update.note)
    .bind(shipment_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_shipment(
    conn: &mut SqliteConnection,
    shipment_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM shipment WHERE id = ?")
        .bind(shipment_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// 统计客户作为发货方的运输单数量
pub async fn count_shipments_as_sender(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT count(*) FROM shipment WHERE sender_client_id = ?")
        .bind(client_id)
        .fetch_one(conn)
        .await
}

/// 统计客户作为收货方的运输单数量
pub async fn count_shipments_as_receiver(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT count(*) FROM shipment WHERE receiver_client_id = ?")
        .bind(client_id)
        .fetch_one(conn)
        .await
}

/// 查询客户
pub async fn get_client(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        r#"
        SELECT id, name, phone, history, shipping_id, debt, total_debts, created_at
        FROM client
        WHERE id = ?
        "#,
    )
    .bind(client_id)
    .fetch_optional(conn)
    .await
}

pub async fn list_clients(conn: &mut SqliteConnection) -> Result<Vec<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        r#"
        SELECT id, name, phone, history, shipping_id, debt, total_debts, created_at
        FROM client
        ORDER BY name, id
        "#,
    )
    .fetch_all(conn)
    .await
}

pub async fn client_exists(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM client WHERE id = ?")
        .bind(client_id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

/// 插入客户, 返回新ID
pub async fn insert_client(
    conn: &mut SqliteConnection,
    draft: &ClientDraft,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO client (name, phone, history, shipping_id, debt, total_debts, created_at)
        VALUES (?, ?, ?, NULL, ?, ?, ?)
        "#,
    )
    .bind(&draft.name)
    .bind(&draft.phone)
    .bind(&draft.history)
    .bind(draft.debt)
    .bind(draft.total_debts)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_client(
    conn: &mut SqliteConnection,
    client_id: i64,
    draft: &ClientDraft,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE client
        SET name = ?, phone = ?, history = ?, debt = ?, total_debts = ?
        WHERE id = ?
        "#,
    )
    .bind(&draft.name)
    .bind(&draft.phone)
    .bind(&draft.history)
    .bind(draft.debt)
    .bind(draft.total_debts)
    .bind(client_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_client(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM client WHERE id = ?")
        .bind(client_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// 记录客户最近关联的运输单
pub async fn set_client_shipment(
    conn: &mut SqliteConnection,
    client_id: i64,
    shipment_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE client SET shipping_id = ? WHERE id = ?")
        .bind(shipment_id)
        .bind(client_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// 清空所有指向该运输单的客户回引用
pub async fn clear_client_shipment_refs(
    conn: &mut SqliteConnection,
    shipment_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE client SET shipping_id = NULL WHERE shipping_id = ?")
        .bind(shipment_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

// ---- 仓储表 ----
// 货品与库存由仓储模块维护, 本服务只在级联删除时清理。
// 下面的插入/查询函数是该模块写入数据的入口, 也供测试准备数据。

/// 插入库房, 返回新ID
pub async fn insert_room(conn: &mut SqliteConnection, name: &str) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO room (name, created_at) VALUES (?, ?)")
        .bind(name)
        .bind(Utc::now())
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

/// 插入货品, 返回新ID
pub async fn insert_product(
    conn: &mut SqliteConnection,
    name: &str,
    shipment_id: Option<i64>,
    quantity: f64,
    price: f64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO product (name, shipping_id, quantity, price, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(shipment_id)
    .bind(quantity)
    .bind(price)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// 插入库存位置, 返回新ID
pub async fn insert_store_listing(
    conn: &mut SqliteConnection,
    product_id: i64,
    room_id: i64,
    quantity: f64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO store (product_id, room_id, quantity, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(product_id)
    .bind(room_id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// 按ID读取货品, 级联删除后用于核对
pub async fn get_product(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "SELECT id, name, shipping_id, quantity, price, created_at FROM product WHERE id = ?",
    )
    .bind(product_id)
    .fetch_optional(conn)
    .await
}

/// 查询货品的库存位置
pub async fn list_store_listings(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> Result<Vec<StoreListing>, sqlx::Error> {
    sqlx::query_as::<_, StoreListing>(
        "SELECT id, product_id, room_id, quantity, created_at FROM store WHERE product_id = ? ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(conn)
    .await
}

/// 查询运输单带来的所有货品ID
pub async fn product_ids_for_shipment(
    conn: &mut SqliteConnection,
    shipment_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM product WHERE shipping_id = ? ORDER BY id")
        .bind(shipment_id)
        .fetch_all(conn)
        .await
}

/// 删除指定货品的库存位置
pub async fn delete_store_listings_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i64],
) -> Result<u64, sqlx::Error> {
    delete_where_in(conn, "DELETE FROM store WHERE product_id IN (", product_ids).await
}

pub async fn delete_products(
    conn: &mut SqliteConnection,
    product_ids: &[i64],
) -> Result<u64, sqlx::Error> {
    delete_where_in(conn, "DELETE FROM product WHERE id IN (", product_ids).await
}

async fn delete_where_in(
    conn: &mut SqliteConnection,
    statement: &str,
    ids: &[i64],
) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut query_builder = QueryBuilder::<Sqlite>::new(statement);
    let mut separated = query_builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let result = query_builder.build().execute(conn).await?;
    Ok(result.rows_affected())
}
