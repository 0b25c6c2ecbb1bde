//! 运输单账目重建与 total_debit 汇总的集成测试

mod common;

use common::{date, new_shipment, shipment_update, TestDb};
use shipping_ledger::models::{Currency, DebitFilter, NewDebit, ShipmentType};
use shipping_ledger::{LedgerError, LedgerService};

fn for_shipment(shipment_id: i64) -> DebitFilter {
    DebitFilter {
        shipping_id: Some(shipment_id),
        ..Default::default()
    }
}

fn direct_debit(sender: Option<i64>, receiver: i64, amount: f64) -> NewDebit {
    NewDebit {
        sender_id: sender,
        receiver_id: receiver,
        shipping_id: None,
        amount,
        currency: Currency::Dollar,
        note: String::new(),
        transaction_date: Some(date(2024, 2, 1)),
    }
}

#[tokio::test]
async fn creation_always_books_full_price_owed_by_receiver() {
    let db = TestDb::new().await;
    let sender = db.client("Basra Freight").await;
    let receiver = db.client("Erbil Market").await;
    let ledger = LedgerService::new(db.pool.clone());

    // 已全额付款也照样生成一条全额账目
    let shipment = ledger
        .create_shipment_with_initial_debit(new_shipment(sender, receiver, 1000.0, 1000.0))
        .await
        .unwrap();

    let debits = ledger.list_debits(&for_shipment(shipment.id)).await.unwrap();
    assert_eq!(debits.len(), 1);
    assert_eq!(debits[0].sender_id, Some(receiver));
    assert_eq!(debits[0].receiver_id, sender);
    assert_eq!(debits[0].amount, 1000.0);
    assert_eq!(debits[0].total_debit, 1000.0);
    assert_eq!(debits[0].transaction_date, Some(date(2024, 3, 1)));
    assert!(debits[0].note.contains("input load"));
}

#[tokio::test]
async fn shortage_produces_single_outstanding_debit() {
    let db = TestDb::new().await;
    let sender = db.client("Basra Freight").await;
    let receiver = db.client("Erbil Market").await;
    let ledger = LedgerService::new(db.pool.clone());
    let shipment = ledger
        .create_shipment_with_initial_debit(new_shipment(sender, receiver, 1000.0, 0.0))
        .await
        .unwrap();

    let updated = ledger
        .reconcile_shipment_debits(shipment.id, shipment_update(sender, receiver, 1000.0, 400.0))
        .await
        .unwrap();
    assert_eq!(updated.paid, 400.0);
    assert_eq!(updated.receiving_date, Some(date(2024, 3, 9)));

    let debits = ledger.list_debits(&for_shipment(shipment.id)).await.unwrap();
    assert_eq!(debits.len(), 1);
    assert_eq!(debits[0].amount, 600.0);
    assert_eq!(debits[0].sender_id, Some(sender));
    assert_eq!(debits[0].receiver_id, receiver);
    assert_eq!(debits[0].transaction_date, Some(date(2024, 3, 9)));
    assert_eq!(debits[0].total_debit, 600.0);
}

#[tokio::test]
async fn overpayment_swaps_parties() {
    let db = TestDb::new().await;
    let sender = db.client("Basra Freight").await;
    let receiver = db.client("Erbil Market").await;
    let ledger = LedgerService::new(db.pool.clone());
    let shipment = ledger
        .create_shipment_with_initial_debit(new_shipment(sender, receiver, 1000.0, 0.0))
        .await
        .unwrap();

    ledger
        .reconcile_shipment_debits(shipment.id, shipment_update(sender, receiver, 1000.0, 1500.0))
        .await
        .unwrap();

    let debits = ledger.list_debits(&for_shipment(shipment.id)).await.unwrap();
    assert_eq!(debits.len(), 1);
    assert_eq!(debits[0].amount, 500.0);
    assert_eq!(debits[0].sender_id, Some(receiver));
    assert_eq!(debits[0].receiver_id, sender);
}

#[tokio::test]
async fn fully_paid_leaves_no_debit() {
    let db = TestDb::new().await;
    let sender = db.client("Basra Freight").await;
    let receiver = db.client("Erbil Market").await;
    let ledger = LedgerService::new(db.pool.clone());
    let shipment = ledger
        .create_shipment_with_initial_debit(new_shipment(sender, receiver, 1000.0, 0.0))
        .await
        .unwrap();

    ledger
        .reconcile_shipment_debits(shipment.id, shipment_update(sender, receiver, 1000.0, 1000.0))
        .await
        .unwrap();

    let debits = ledger.list_debits(&for_shipment(shipment.id)).await.unwrap();
    assert!(debits.is_empty());
}

#[tokio::test]
async fn free_shipment_with_payment_is_an_overpayment() {
    let db = TestDb::new().await;
    let sender = db.client("Basra Freight").await;
    let receiver = db.client("Erbil Market").await;
    let ledger = LedgerService::new(db.pool.clone());
    let shipment = ledger
        .create_shipment_with_initial_debit(new_shipment(sender, receiver, 0.0, 0.0))
        .await
        .unwrap();

    ledger
        .reconcile_shipment_debits(shipment.id, shipment_update(sender, receiver, 0.0, 75.0))
        .await
        .unwrap();

    let debits = ledger.list_debits(&for_shipment(shipment.id)).await.unwrap();
    assert_eq!(debits.len(), 1);
    assert_eq!(debits[0].amount, 75.0);
    assert_eq!(debits[0].sender_id, Some(receiver));
}

#[tokio::test]
async fn second_update_replaces_first() {
    let db = TestDb::new().await;
    let sender = db.client("Basra Freight").await;
    let receiver = db.client("Erbil Market").await;
    let ledger = LedgerService::new(db.pool.clone());
    let shipment = ledger
        .create_shipment_with_initial_debit(new_shipment(sender, receiver, 1000.0, 0.0))
        .await
        .unwrap();

    ledger
        .reconcile_shipment_debits(shipment.id, shipment_update(sender, receiver, 1000.0, 400.0))
        .await
        .unwrap();
    ledger
        .reconcile_shipment_debits(shipment.id, shipment_update(sender, receiver, 1000.0, 700.0))
        .await
        .unwrap();

    let debits = ledger.list_debits(&for_shipment(shipment.id)).await.unwrap();
    assert_eq!(debits.len(), 1);
    assert_eq!(debits[0].amount, 300.0);
    assert_eq!(debits[0].total_debit, 300.0);
}

#[tokio::test]
async fn update_overwrites_type_and_currency() {
    let db = TestDb::new().await;
    let sender = db.client("Basra Freight").await;
    let receiver = db.client("Erbil Market").await;
    let ledger = LedgerService::new(db.pool.clone());
    let shipment = ledger
        .create_shipment_with_initial_debit(new_shipment(sender, receiver, 1000.0, 0.0))
        .await
        .unwrap();

    let mut update = shipment_update(sender, receiver, 250_000.0, 50_000.0);
    update.shipment_type = ShipmentType::Going;
    update.currency = Currency::IraqiDinar;
    let updated = ledger.reconcile_shipment_debits(shipment.id, update).await.unwrap();
    assert_eq!(updated.shipment_type, ShipmentType::Going);
    assert_eq!(updated.currency, Currency::IraqiDinar);

    let debits = ledger.list_debits(&for_shipment(shipment.id)).await.unwrap();
    assert_eq!(debits[0].currency, Currency::IraqiDinar);
    assert_eq!(debits[0].amount, 200_000.0);
    assert!(debits[0].note.contains("going"));
}

#[tokio::test]
async fn pair_total_is_written_to_every_row_of_the_pair() {
    let db = TestDb::new().await;
    let debtor = db.client("Mosul Traders").await;
    let creditor = db.client("Najaf Storage").await;
    let ledger = LedgerService::new(db.pool.clone());

    for amount in [100.0, 250.0, 50.0] {
        ledger
            .create_debit(direct_debit(Some(debtor), creditor, amount))
            .await
            .unwrap();
    }

    let debits = ledger
        .list_debits(&DebitFilter {
            sender_id: Some(debtor),
            receiver_id: Some(creditor),
            shipping_id: None,
        })
        .await
        .unwrap();
    assert_eq!(debits.len(), 3);
    assert!(debits.iter().all(|d| d.total_debit == 400.0));
}

#[tokio::test]
async fn debit_without_sender_keeps_its_own_total() {
    let db = TestDb::new().await;
    let creditor = db.client("Najaf Storage").await;
    let ledger = LedgerService::new(db.pool.clone());

    let first = ledger.create_debit(direct_debit(None, creditor, 80.0)).await.unwrap();
    let second = ledger.create_debit(direct_debit(None, creditor, 20.0)).await.unwrap();

    assert_eq!(ledger.get_debit(first.id).await.unwrap().total_debit, 80.0);
    assert_eq!(second.total_debit, 20.0);
}

#[tokio::test]
async fn untouched_pair_keeps_cached_total() {
    let db = TestDb::new().await;
    let sender = db.client("Basra Freight").await;
    let receiver = db.client("Erbil Market").await;
    let ledger = LedgerService::new(db.pool.clone());

    let manual = ledger
        .create_debit(direct_debit(Some(sender), receiver, 100.0))
        .await
        .unwrap();
    let shipment = ledger
        .create_shipment_with_initial_debit(new_shipment(sender, receiver, 1000.0, 0.0))
        .await
        .unwrap();

    ledger
        .reconcile_shipment_debits(shipment.id, shipment_update(sender, receiver, 1000.0, 400.0))
        .await
        .unwrap();
    assert_eq!(ledger.get_debit(manual.id).await.unwrap().total_debit, 700.0);

    // 付清后不再生成账目, 该对不被刷新, 旧缓存保留
    ledger
        .reconcile_shipment_debits(shipment.id, shipment_update(sender, receiver, 1000.0, 1000.0))
        .await
        .unwrap();
    assert_eq!(ledger.get_debit(manual.id).await.unwrap().total_debit, 700.0);
}

#[tokio::test]
async fn deleting_a_debit_refreshes_its_pair() {
    let db = TestDb::new().await;
    let debtor = db.client("Mosul Traders").await;
    let creditor = db.client("Najaf Storage").await;
    let ledger = LedgerService::new(db.pool.clone());

    let kept = ledger
        .create_debit(direct_debit(Some(debtor), creditor, 100.0))
        .await
        .unwrap();
    let dropped = ledger
        .create_debit(direct_debit(Some(debtor), creditor, 250.0))
        .await
        .unwrap();

    ledger.delete_debit(dropped.id).await.unwrap();

    assert_eq!(ledger.get_debit(kept.id).await.unwrap().total_debit, 100.0);
    assert!(matches!(
        ledger.get_debit(dropped.id).await,
        Err(LedgerError::NotFound { entity: "debit", .. })
    ));
}

#[tokio::test]
async fn failed_aggregate_write_rolls_back_the_whole_update() {
    let db = TestDb::new().await;
    let sender = db.client("Basra Freight").await;
    let receiver = db.client("Erbil Market").await;
    let ledger = LedgerService::new(db.pool.clone());
    let shipment = ledger
        .create_shipment_with_initial_debit(new_shipment(sender, receiver, 1000.0, 0.0))
        .await
        .unwrap();

    sqlx::query(
        r#"
        CREATE TRIGGER refuse_total_debit BEFORE UPDATE OF total_debit ON debit
        BEGIN
            SELECT RAISE(ABORT, 'aggregate write refused');
        END
        "#,
    )
    .execute(&db.pool)
    .await
    .unwrap();

    let err = ledger
        .reconcile_shipment_debits(shipment.id, shipment_update(sender, receiver, 1000.0, 400.0))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Store(_)));

    let reread = ledger.get_shipment(shipment.id).await.unwrap();
    assert_eq!(reread.paid, 0.0);
    assert_eq!(reread.ship_price, 1000.0);
    assert_eq!(reread.receiving_date, None);

    // 初始账目没有被删除
    let debits = ledger.list_debits(&for_shipment(shipment.id)).await.unwrap();
    assert_eq!(debits.len(), 1);
    assert_eq!(debits[0].amount, 1000.0);
    assert_eq!(debits[0].sender_id, Some(receiver));
}

#[tokio::test]
async fn unknown_shipment_or_party_is_rejected() {
    let db = TestDb::new().await;
    let sender = db.client("Basra Freight").await;
    let receiver = db.client("Erbil Market").await;
    let ledger = LedgerService::new(db.pool.clone());

    let err = ledger
        .reconcile_shipment_debits(42, shipment_update(sender, receiver, 10.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { entity: "shipment", id: 42 }));

    let err = ledger
        .create_shipment_with_initial_debit(new_shipment(sender, 999, 10.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { entity: "client", id: 999 }));
    assert!(ledger.list_shipments().await.unwrap().is_empty());

    let mut debit = direct_debit(Some(sender), receiver, 5.0);
    debit.shipping_id = Some(7);
    let err = ledger.create_debit(debit).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { entity: "shipment", id: 7 }));
}
