//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (DB ping)
//!
//! # Products
//! GET    /products                - Product listing (filter query params)
//! POST   /products                - Create product
//! GET    /products/{slug}         - Product detail with approved comments
//! PATCH  /products/{slug}         - Partial update
//! DELETE /products/{slug}         - Delete product
//!
//! # Cart
//! POST   /products/{slug}/cart    - Add to cart (quantity in body)
//! GET    /cart                    - Priced cart snapshot
//! DELETE /cart                    - Clear the cart
//! DELETE /cart/{slug}             - Remove one product
//!
//! # Bookmarks
//! POST   /products/{slug}/bookmark - Toggle bookmark
//! GET    /bookmarks               - Bookmarked products
//!
//! # Comments
//! POST   /products/{slug}/comments - Leave a comment (goes to moderation)
//! GET    /admin/comments          - Pending comments
//! PATCH  /admin/comments/{id}     - Approve or reject
//!
//! # Orders
//! POST   /orders                  - Checkout (cart -> order -> payment link)
//! GET    /orders                  - Order history, newest first
//! GET    /orders/{id}             - Order detail
//! GET    /orders/success          - Post-payment landing
//! POST   /orders/{id}/confirm     - Payment provider callback
//! ```

pub mod bookmarks;
pub mod cart;
pub mod comments;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{slug}",
            get(products::show)
                .patch(products::update)
                .delete(products::destroy),
        )
        .route("/{slug}/cart", post(cart::add))
        .route("/{slug}/bookmark", post(bookmarks::toggle))
        .route("/{slug}/comments", post(comments::create))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/{slug}", delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/success", get(orders::success))
        .route("/{id}", get(orders::show))
        .route("/{id}/confirm", post(orders::confirm))
}

/// Create the admin (moderation) routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/comments", get(comments::pending))
        .route("/comments/{id}", patch(comments::moderate))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/admin", admin_routes())
        .route("/bookmarks", get(bookmarks::index))
}
