//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness probe
//! GET  /health/ready                    - Readiness probe (checks database)
//!
//! # Auth
//! POST /token                           - Exchange username/password for a bearer token
//!
//! # Users
//! POST   /users/create/                 - Register
//! GET    /users/?skip=&limit=           - Paginated listing
//! GET    /users/me/                     - Current user (bearer token required)
//! PUT    /users/update/{user_id}        - Partial update
//! DELETE /users/delete/{user_id}        - Delete
//!
//! # Addresses
//! GET/POST          /addresses/
//! GET/PUT/DELETE    /addresses/{address_id}
//!
//! # Organizations, products, orders, roles
//! GET    /organizations/, /organizations/{org_id}
//! POST   /create_organization/
//! PUT    /update_organization/{org_id}
//! DELETE /delete_organization/{org_id}
//! (products, orders and roles follow the same shape)
//! ```

pub mod addresses;
pub mod auth;
pub mod health;
pub mod orders;
pub mod organizations;
pub mod products;
pub mod roles;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the health probe routes.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Create the user routes.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/create/", post(users::create))
        .route("/users/", get(users::index))
        .route("/users/me/", get(users::me))
        .route("/users/update/{user_id}", put(users::update))
        .route("/users/delete/{user_id}", delete(users::delete))
}

/// Create the address routes.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/addresses/", get(addresses::index).post(addresses::create))
        .route(
            "/addresses/{address_id}",
            get(addresses::show)
                .put(addresses::update)
                .delete(addresses::delete),
        )
}

/// Create the organization routes.
pub fn organization_routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/", get(organizations::index))
        .route("/organizations/{org_id}", get(organizations::show))
        .route("/create_organization/", post(organizations::create))
        .route("/update_organization/{org_id}", put(organizations::update))
        .route("/delete_organization/{org_id}", delete(organizations::delete))
}

/// Create the product routes.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products/", get(products::index))
        .route("/products/{prod_id}", get(products::show))
        .route("/create_product/", post(products::create))
        .route("/update_product/{prod_id}", put(products::update))
        .route("/delete_product/{prod_id}", delete(products::delete))
}

/// Create the order routes.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/", get(orders::index))
        .route("/orders/{order_id}", get(orders::show))
        .route("/create_order/", post(orders::create))
        .route("/update_order/{order_id}", put(orders::update))
        .route("/delete_order/{order_id}", delete(orders::delete))
}

/// Create the role routes.
pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/roles/", get(roles::index))
        .route("/roles/{role_id}", get(roles::show))
        .route("/create_role/", post(roles::create))
        .route("/update_role/{role_id}", put(roles::update))
        .route("/delete_role/{role_id}", delete(roles::delete))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .route("/token", post(auth::token))
        .merge(user_routes())
        .merge(address_routes())
        .merge(organization_routes())
        .merge(product_routes())
        .merge(order_routes())
        .merge(role_routes())
}
