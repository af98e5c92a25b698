//! Checkout flow tests against in-memory collaborators.
//!
//! The fakes record every side-effecting call into a shared log so the
//! order of operations - snapshot, clear, persist, issue link - is
//! observable, not just the end state.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::{Decimal, dec};

use pawmart_core::{OrderId, OrderStatus, Price, ProductId, SessionKey};
use pawmart_storefront::cart::{CartAggregator, CartError, CartStore, ProductLookup};
use pawmart_storefront::checkout::{Checkout, CheckoutError, CheckoutOutcome, OrderStore};
use pawmart_storefront::db::RepositoryError;
use pawmart_storefront::models::{NewOrder, Product, Recipient};
use pawmart_storefront::payments::{PaymentError, PaymentLink};

type CallLog = Arc<Mutex<Vec<&'static str>>>;
type Entries = Arc<Mutex<Vec<(ProductId, u32)>>>;
type CreatedOrders = Arc<Mutex<Vec<NewOrder>>>;

// =============================================================================
// Fakes
// =============================================================================

/// Cart store over a shared entry list; records `clear` calls.
struct RecordingCart {
    entries: Entries,
    log: CallLog,
}

#[async_trait]
impl CartStore for RecordingCart {
    async fn add(
        &self,
        _session: &SessionKey,
        product: ProductId,
        qty: u32,
    ) -> Result<(), CartError> {
        self.entries.lock().unwrap().push((product, qty));
        Ok(())
    }

    async fn remove(&self, _session: &SessionKey, product: ProductId) -> Result<(), CartError> {
        self.entries.lock().unwrap().retain(|(id, _)| *id != product);
        Ok(())
    }

    async fn clear(&self, _session: &SessionKey) -> Result<(), CartError> {
        self.log.lock().unwrap().push("clear");
        self.entries.lock().unwrap().clear();
        Ok(())
    }

    async fn entries(&self, _session: &SessionKey) -> Result<Vec<(ProductId, u32)>, CartError> {
        Ok(self.entries.lock().unwrap().clone())
    }
}

struct FixedCatalog(Vec<Product>);

#[async_trait]
impl ProductLookup for FixedCatalog {
    async fn by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .0
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

/// Order store over a shared order list; records `create` calls and can
/// simulate an insert failure.
struct OrderSink {
    orders: CreatedOrders,
    fail: bool,
    log: CallLog,
}

#[async_trait]
impl OrderStore for OrderSink {
    async fn create(&self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        self.log.lock().unwrap().push("create");
        if self.fail {
            return Err(RepositoryError::DataCorruption(
                "simulated insert failure".to_string(),
            ));
        }
        let mut orders = self.orders.lock().unwrap();
        orders.push(order.clone());
        Ok(OrderId::new(i32::try_from(orders.len()).unwrap()))
    }
}

/// Payment provider answering with a deterministic per-order link.
struct StubPayments {
    fail: bool,
    log: CallLog,
}

#[async_trait]
impl PaymentLink for StubPayments {
    async fn issue_link(
        &self,
        order_id: OrderId,
        _order: &NewOrder,
    ) -> Result<String, PaymentError> {
        self.log.lock().unwrap().push("issue_link");
        if self.fail {
            return Err(PaymentError::Api { status: 503 });
        }
        Ok(format!("https://pay.example.com/checkout/{order_id}"))
    }
}

// =============================================================================
// Helpers
// =============================================================================

struct Harness {
    log: CallLog,
    entries: Entries,
    orders: CreatedOrders,
    checkout: Checkout<RecordingCart, FixedCatalog, OrderSink, StubPayments>,
}

fn harness(
    entries: Vec<(ProductId, u32)>,
    catalog: Vec<Product>,
    fail_orders: bool,
    fail_payments: bool,
) -> Harness {
    let log = CallLog::default();
    let entries: Entries = Arc::new(Mutex::new(entries));
    let orders = CreatedOrders::default();

    let cart = RecordingCart {
        entries: entries.clone(),
        log: log.clone(),
    };
    let sink = OrderSink {
        orders: orders.clone(),
        fail: fail_orders,
        log: log.clone(),
    };
    let payments = StubPayments {
        fail: fail_payments,
        log: log.clone(),
    };

    Harness {
        log,
        entries,
        orders,
        checkout: Checkout::new(
            CartAggregator::new(cart, FixedCatalog(catalog)),
            sink,
            payments,
        ),
    }
}

fn product(id: i32, title: &str, retail: Decimal, wholesale: Decimal) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        description: String::new(),
        slug: title.to_lowercase().replace(' ', "-"),
        price: Price::new(retail, wholesale),
        category: "for cats".to_string(),
        tags: Vec::new(),
        created_at: Utc::now(),
    }
}

fn recipient() -> Recipient {
    Recipient {
        first_name: "Daryna".to_string(),
        last_name: "Koval".to_string(),
        city: "Lviv".to_string(),
        zip_code: 79000,
    }
}

fn session() -> SessionKey {
    SessionKey::from("s1")
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn empty_cart_short_circuits_with_zero_side_effects() {
    let h = harness(vec![], vec![], false, false);

    let outcome = h
        .checkout
        .place_order(&session(), recipient())
        .await
        .unwrap();

    assert_eq!(outcome, CheckoutOutcome::EmptyCart);
    assert!(h.log.lock().unwrap().is_empty(), "no collaborator was called");
}

#[tokio::test]
async fn checkout_clears_the_cart_before_persisting_the_order() {
    let h = harness(
        vec![(ProductId::new(1), 3)],
        vec![product(1, "Salmon Bites", dec!(100), dec!(50))],
        false,
        false,
    );

    let outcome = h
        .checkout
        .place_order(&session(), recipient())
        .await
        .unwrap();

    assert_eq!(*h.log.lock().unwrap(), vec!["clear", "create", "issue_link"]);
    assert_eq!(
        outcome,
        CheckoutOutcome::Placed {
            order_id: OrderId::new(1),
            payment_url: "https://pay.example.com/checkout/1".to_string(),
        }
    );
}

#[tokio::test]
async fn assembled_order_copies_the_snapshot_verbatim() {
    let h = harness(
        vec![(ProductId::new(1), 3), (ProductId::new(2), 10)],
        vec![
            product(1, "Salmon Bites", dec!(100), dec!(50)),
            product(2, "Cat Litter", dec!(18), dec!(11)),
        ],
        false,
        false,
    );

    h.checkout
        .place_order(&session(), recipient())
        .await
        .unwrap();

    let created = h.orders.lock().unwrap();
    assert_eq!(created.len(), 1);
    let order = &created[0];

    assert_eq!(order.status, OrderStatus::Unpaid);
    assert_eq!(order.recipient, recipient());
    assert_eq!(order.items.len(), 2);
    // 3 * 100 retail + 10 * 11 wholesale
    assert_eq!(order.total_price, dec!(410));
    assert_eq!(
        order.total_price,
        order.items.iter().map(|i| i.line_total).sum::<Decimal>()
    );
}

#[tokio::test]
async fn invalid_recipient_is_rejected_before_any_side_effect() {
    let h = harness(
        vec![(ProductId::new(1), 3)],
        vec![product(1, "Salmon Bites", dec!(100), dec!(50))],
        false,
        false,
    );

    let bad = Recipient {
        first_name: String::new(),
        ..recipient()
    };
    let err = h.checkout.place_order(&session(), bad).await.unwrap_err();

    assert!(matches!(err, CheckoutError::Recipient(_)));
    assert!(h.log.lock().unwrap().is_empty(), "nothing was touched");
    assert_eq!(h.entries.lock().unwrap().len(), 1, "cart kept its entry");
}

#[tokio::test]
async fn failed_persist_after_clear_is_the_partial_persistence_fault() {
    let h = harness(
        vec![(ProductId::new(1), 3)],
        vec![product(1, "Salmon Bites", dec!(100), dec!(50))],
        true,
        false,
    );

    let err = h
        .checkout
        .place_order(&session(), recipient())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::OrderNotPersisted(_)));
    // The cart was already cleared when the insert failed; the contents
    // are gone and no compensating restore happens.
    assert_eq!(*h.log.lock().unwrap(), vec!["clear", "create"]);
    assert!(h.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn payment_refusal_leaves_the_order_persisted() {
    let h = harness(
        vec![(ProductId::new(1), 3)],
        vec![product(1, "Salmon Bites", dec!(100), dec!(50))],
        false,
        true,
    );

    let err = h
        .checkout
        .place_order(&session(), recipient())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Payment(_)));
    assert_eq!(h.orders.lock().unwrap().len(), 1);
}
