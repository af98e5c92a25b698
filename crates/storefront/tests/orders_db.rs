//! Repository round-trip tests against a live database.
//!
//! Ignored by default. Run against a disposable database with:
//!
//! ```bash
//! STOREFRONT_TEST_DATABASE_URL=postgres://localhost/pawmart_test \
//!     cargo test -p pawmart-storefront -- --ignored
//! ```

#![allow(clippy::unwrap_used)]

use chrono::Utc;
use rust_decimal::dec;

use pawmart_core::OrderStatus;
use pawmart_storefront::checkout::OrderStore;
use pawmart_storefront::db::OrderRepository;
use pawmart_storefront::models::{LineItem, NewOrder, Recipient};

async fn test_pool() -> sqlx::PgPool {
    let url = std::env::var("STOREFRONT_TEST_DATABASE_URL")
        .expect("set STOREFRONT_TEST_DATABASE_URL to run database tests");
    let pool = sqlx::PgPool::connect(&url).await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

#[tokio::test]
#[ignore = "requires a disposable PostgreSQL database"]
async fn order_round_trips_through_the_repository() {
    let pool = test_pool().await;
    let repo = OrderRepository::new(&pool);

    let new_order = NewOrder {
        items: vec![
            LineItem {
                title: "Salmon Bites".to_string(),
                slug: "salmon-bites".to_string(),
                unit_price: dec!(100),
                quantity: 3,
                line_total: dec!(300),
            },
            LineItem {
                title: "Cat Litter".to_string(),
                slug: "cat-litter".to_string(),
                unit_price: dec!(11),
                quantity: 10,
                line_total: dec!(110),
            },
        ],
        status: OrderStatus::Unpaid,
        created_at: Utc::now(),
        recipient: Recipient {
            first_name: "Daryna".to_string(),
            last_name: "Koval".to_string(),
            city: "Lviv".to_string(),
            zip_code: 79000,
        },
        total_price: dec!(410),
    };

    let id = repo.create(&new_order).await.unwrap();
    let fetched = repo.get(id).await.unwrap().unwrap();

    assert_eq!(fetched.items, new_order.items);
    assert_eq!(fetched.total_price, new_order.total_price);
    assert_eq!(fetched.recipient, new_order.recipient);
    assert_eq!(fetched.status, OrderStatus::Unpaid);
}

#[tokio::test]
#[ignore = "requires a disposable PostgreSQL database"]
async fn payment_callback_updates_the_order_status() {
    let pool = test_pool().await;
    let repo = OrderRepository::new(&pool);

    let new_order = NewOrder {
        items: vec![LineItem {
            title: "Chew Toy".to_string(),
            slug: "chew-toy".to_string(),
            unit_price: dec!(7.50),
            quantity: 2,
            line_total: dec!(15),
        }],
        status: OrderStatus::Unpaid,
        created_at: Utc::now(),
        recipient: Recipient {
            first_name: "Daryna".to_string(),
            last_name: "Koval".to_string(),
            city: "Lviv".to_string(),
            zip_code: 79000,
        },
        total_price: dec!(15),
    };

    let id = repo.create(&new_order).await.unwrap();
    assert!(repo.set_status(id, OrderStatus::Paid).await.unwrap());

    let fetched = repo.get(id).await.unwrap().unwrap();
    assert_eq!(fetched.status, OrderStatus::Paid);
}
