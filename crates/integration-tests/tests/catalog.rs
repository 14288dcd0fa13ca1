//! End-to-end tests for organizations, roles, products, orders and addresses.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (tp-cli migrate)
//! - The API server running (cargo run -p tradepost-api)
//!
//! Run with: cargo test -p tradepost-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use tradepost_integration_tests::{TestContext, id_of, unique};

async fn create_product(ctx: &TestContext) -> Value {
    ctx.create(
        "/create_product/",
        &json!({
            "prod_name": unique("mug"),
            "prod_og_price": 12.5,
            "prod_new_price": 9.99,
        }),
    )
    .await
}

async fn create_organization(ctx: &TestContext) -> Value {
    ctx.create("/create_organization/", &json!({ "org_name": unique("acme") }))
        .await
}

// ============================================================================
// Organizations & Roles
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_organization_crud() {
    let ctx = TestContext::new();
    let org = create_organization(&ctx).await;
    let id = id_of(&org);

    let renamed = unique("renamed");
    let resp = ctx
        .client
        .put(ctx.url(&format!("/update_organization/{id}")))
        .json(&json!({ "org_name": renamed }))
        .send()
        .await
        .expect("Failed to update organization");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse organization");
    assert_eq!(updated["org_name"], json!(renamed));

    let resp = ctx
        .client
        .delete(ctx.url(&format!("/delete_organization/{id}")))
        .send()
        .await
        .expect("Failed to delete organization");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .client
        .get(ctx.url(&format!("/organizations/{id}")))
        .send()
        .await
        .expect("Failed to get organization");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_organization_name_is_conflict() {
    let ctx = TestContext::new();
    let org = create_organization(&ctx).await;

    let resp = ctx
        .client
        .post(ctx.url("/create_organization/"))
        .json(&json!({ "org_name": org["org_name"] }))
        .send()
        .await
        .expect("Failed to create organization");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_role_links_user_and_organization() {
    let ctx = TestContext::new();
    let user = ctx.create_user("member").await;
    let org = create_organization(&ctx).await;

    let role = ctx
        .create(
            "/create_role/",
            &json!({ "org_id": id_of(&org), "user_id": id_of(&user), "role": "owner" }),
        )
        .await;
    assert_eq!(role["role"], "owner");

    let resp = ctx
        .client
        .post(ctx.url("/create_role/"))
        .json(&json!({ "org_id": id_of(&org), "user_id": i64::from(i32::MAX), "role": "x" }))
        .send()
        .await
        .expect("Failed to create role");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Products & Orders
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_defaults_to_current_product_price() {
    let ctx = TestContext::new();
    let user = ctx.create_user("buyer").await;
    let org = create_organization(&ctx).await;
    let product = create_product(&ctx).await;

    let order = ctx
        .create(
            "/create_order/",
            &json!({
                "prod_id": id_of(&product),
                "org_id": id_of(&org),
                "user_id": id_of(&user),
            }),
        )
        .await;

    assert_eq!(order["ord_price"], product["prod_new_price"]);
    assert!(order["ord_date"].is_string());

    // Ordered products cannot be deleted out from under their orders
    let resp = ctx
        .client
        .delete(ctx.url(&format!("/delete_product/{}", id_of(&product))))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_for_missing_product_is_unprocessable() {
    let ctx = TestContext::new();
    let user = ctx.create_user("buyer").await;
    let org = create_organization(&ctx).await;

    let resp = ctx
        .client
        .post(ctx.url("/create_order/"))
        .json(&json!({
            "prod_id": i64::from(i32::MAX),
            "org_id": id_of(&org),
            "user_id": id_of(&user),
        }))
        .send()
        .await
        .expect("Failed to create order");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_product_partial_update_keeps_other_fields() {
    let ctx = TestContext::new();
    let product = create_product(&ctx).await;

    let resp = ctx
        .client
        .put(ctx.url(&format!("/update_product/{}", id_of(&product))))
        .json(&json!({ "prod_desc": "Holds tea" }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(updated["prod_desc"], "Holds tea");
    assert_eq!(updated["prod_name"], product["prod_name"]);
    assert_eq!(updated["prod_new_price"], product["prod_new_price"]);
}

// ============================================================================
// Addresses
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_addresses_follow_their_user() {
    let ctx = TestContext::new();
    let user = ctx.create_user("resident").await;

    let address = ctx
        .create(
            "/addresses/",
            &json!({
                "user_id": id_of(&user),
                "address_line1": "1 Rabbit Hole",
                "city": "Oxford",
                "postal_code": 1865,
                "state": "Oxfordshire",
                "country": "UK",
            }),
        )
        .await;
    assert_eq!(address["address_line2"], "");

    let resp = ctx
        .client
        .delete(ctx.url(&format!("/users/delete/{}", id_of(&user))))
        .send()
        .await
        .expect("Failed to delete user");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .client
        .get(ctx.url(&format!("/addresses/{}", id_of(&address))))
        .send()
        .await
        .expect("Failed to get address");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
