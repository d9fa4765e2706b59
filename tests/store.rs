use balance_tracker::db::{self, BalanceStore, PgBalanceStore};
use balance_tracker::models::BalanceChange;
use chrono::DateTime;
use rust_decimal::Decimal;
use std::str::FromStr;

const TEST_SIGNATURE: &str =
    "5j7s6NiJS3JAkvgkoc18WVAsiSaci2pxB2A6ueCJP4tprA2TFg9wSyTLeYouxPBJEMzJinENTkpA52YStRW5Dia7";

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL environment variable"]
async fn upsert_is_last_write_wins() {
    dotenvy::dotenv().ok();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set, skipping integration test");
            return;
        }
    };

    let pool = db::get_db_pool(&database_url).expect("Failed to build pool");
    let store = PgBalanceStore::new(pool.clone());
    store.initialize().await.expect("Failed to initialize store");

    let _ = sqlx::query("DELETE FROM balance_changes WHERE signature = $1")
        .bind(TEST_SIGNATURE)
        .execute(&pool)
        .await;

    assert!(store.find(TEST_SIGNATURE).await.unwrap().is_none());

    let first = BalanceChange::new(
        TEST_SIGNATURE.to_string(),
        dec("10.0"),
        dec("10.01"),
        DateTime::from_timestamp(1_700_000_000, 0),
    );
    store.upsert(&first).await.expect("first upsert failed");

    let second = BalanceChange::new(TEST_SIGNATURE.to_string(), dec("10.0"), dec("7.5"), None);
    store.upsert(&second).await.expect("second upsert failed");

    let row = store
        .find(TEST_SIGNATURE)
        .await
        .unwrap()
        .expect("row should exist");
    assert_eq!(row.delta, dec("-2.5"));
    assert_eq!(row.post_amount, dec("7.5"));
    assert!(row.tx_timestamp.is_none());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM balance_changes WHERE signature = $1")
        .bind(TEST_SIGNATURE)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
