use crate::models::{CurrencyBalance, Debit, DebitFilter, NewDebit};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

const DEBIT_COLUMNS: &str = "id, sender_id, receiver_id, shipping_id, amount, currency, note, \
                             transaction_date, total_debit, created_at";

/// 查询单条账目
pub async fn get_debit(
    conn: &mut SqliteConnection,
    debit_id: i64,
) -> Result<Option<Debit>, sqlx::Error> {
    sqlx::query_as::<_, Debit>(
        r#"
        SELECT id, sender_id, receiver_id, shipping_id, amount, currency, note,
               transaction_date, total_debit, created_at
        FROM debit
        WHERE id = ?
        "#,
    )
    .bind(debit_id)
    .fetch_optional(conn)
    .await
}

/// 按条件查询账目列表
pub async fn list_debits(
    conn: &mut SqliteConnection,
    filter: &DebitFilter,
) -> Result<Vec<Debit>, sqlx::Error> {
    let mut query_builder =
        QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM debit WHERE 1 = 1", DEBIT_COLUMNS));

    if let Some(sender_id) = filter.sender_id {
        query_builder.push(" AND sender_id = ").push_bind(sender_id);
    }
    if let Some(receiver_id) = filter.receiver_id {
        query_builder.push(" AND receiver_id = ").push_bind(receiver_id);
    }
    if let Some(shipping_id) = filter.shipping_id {
        query_builder.push(" AND shipping_id = ").push_bind(shipping_id);
    }
    query_builder.push(" ORDER BY id");

    query_builder.build_query_as::<Debit>().fetch_all(conn).await
}

/// 客户参与的所有账目 (按交易日期排序)
pub async fn list_client_debits(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<Vec<Debit>, sqlx::Error> {
    sqlx::query_as::<_, Debit>(
        r#"
        SELECT id, sender_id, receiver_id, shipping_id, amount, currency, note,
               transaction_date, total_debit, created_at
        FROM debit
        WHERE sender_id = ? OR receiver_id = ?
        ORDER BY transaction_date, id
        "#,
    )
    .bind(client_id)
    .bind(client_id)
    .fetch_all(conn)
    .await
}

/// 插入账目, total_debit 初始为自身金额, 返回新ID
pub async fn insert_debit(
    conn: &mut SqliteConnection,
    debit: &NewDebit,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO debit (
            sender_id, receiver_id, shipping_id, amount, currency,
            note, transaction_date, total_debit, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(debit.sender_id)
    .bind(debit.receiver_id)
    .bind(debit.shipping_id)
    .bind(debit.amount)
    .bind(debit.currency)
    .bind(&debit.note)
    .bind(debit.transaction_date)
    .bind(debit.amount)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn delete_debit(conn: &mut SqliteConnection, debit_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM debit WHERE id = ?")
        .bind(debit_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// 删除运输单关联的全部账目
pub async fn delete_debits_for_shipment(
    conn: &mut SqliteConnection,
    shipment_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM debit WHERE shipping_id = ?")
        .bind(shipment_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// 统计 (sender, receiver) 对的账目总额
pub async fn sum_pair(
    conn: &mut SqliteConnection,
    sender_id: i64,
    receiver_id: i64,
) -> Result<f64, sqlx::Error> {
    // TOTAL() 在无行时返回 0.0 (REAL), 避免 SUM() 的 NULL
    sqlx::query_scalar("SELECT total(amount) FROM debit WHERE sender_id = ? AND receiver_id = ?")
        .bind(sender_id)
        .bind(receiver_id)
        .fetch_one(conn)
        .await
}

/// 将总额写回该对的所有账目
pub async fn update_pair_total(
    conn: &mut SqliteConnection,
    sender_id: i64,
    receiver_id: i64,
    total: f64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE debit SET total_debit = ? WHERE sender_id = ? AND receiver_id = ?",
    )
    .bind(total)
    .bind(sender_id)
    .bind(receiver_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// 统计客户作为任一方出现的账目数量
pub async fn count_debits_for_client(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT count(*) FROM debit WHERE sender_id = ? OR receiver_id = ?")
        .bind(client_id)
        .bind(client_id)
        .fetch_one(conn)
        .await
}

/// 按币种汇总客户应收/应付
pub async fn client_balances(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<Vec<CurrencyBalance>, sqlx::Error> {
    sqlx::query_as::<_, CurrencyBalance>(
        r#"
        SELECT currency,
               total(CASE WHEN receiver_id = ? THEN amount ELSE 0.0 END) AS receivable,
               total(CASE WHEN sender_id = ? THEN amount ELSE 0.0 END) AS payable,
               total(CASE WHEN receiver_id = ? THEN amount ELSE 0.0 END)
                 - total(CASE WHEN sender_id = ? THEN amount ELSE 0.0 END) AS net
        FROM debit
        WHERE sender_id = ? OR receiver_id = ?
        GROUP BY currency
        ORDER BY currency
        "#,
    )
    .bind(client_id)
    .bind(client_id)
    .bind(client_id)
    .bind(client_id)
    .bind(client_id)
    .bind(client_id)
    .fetch_all(conn)
    .await
}
