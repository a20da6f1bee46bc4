mod common;

use axum::http::StatusCode;
use common::{setup_test_app, TestApp, ADMIN_EMAIL};
use serde_json::{json, Value};

async fn add_to_cart(app: &TestApp, cookie: &str, product_id: &str) -> (StatusCode, Value) {
    app.send(
        "PUT",
        "/carts",
        Some(cookie),
        Some(json!({ "productId": product_id })),
    )
    .await
}

#[tokio::test]
async fn test_cart_add_twice_increments() {
    let app = setup_test_app().await;
    let cookie = app.register("owner@example.com", "Ana").await;
    app.create_shop(&cookie).await;
    let (_, product) = app.create_product(&cookie, 100.0, 20.0, 5).await;
    let id = product["id"].as_str().unwrap();

    let (status, line) = add_to_cart(&app, &cookie, id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(line["soldQuantity"], 1);
    let (_, line) = add_to_cart(&app, &cookie, id).await;
    assert_eq!(line["soldQuantity"], 2);
    assert_eq!(line["sellingPrice"].as_f64(), Some(130.0));

    let (_, cart) = app.send("GET", "/carts", Some(&cookie), None).await;
    assert_eq!(cart.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cannot_cart_another_owners_product() {
    let app = setup_test_app().await;
    let owner = app.register("owner@example.com", "Ana").await;
    let other = app.register("other@example.com", "Bo").await;
    app.create_shop(&owner).await;
    let (_, product) = app.create_product(&owner, 100.0, 20.0, 5).await;

    let (status, _) = add_to_cart(&app, &other, product["id"].as_str().unwrap()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = add_to_cart(&app, &other, "no-such-product").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_cart_line_is_idempotent() {
    let app = setup_test_app().await;
    let cookie = app.register("owner@example.com", "Ana").await;
    app.create_shop(&cookie).await;
    let (_, product) = app.create_product(&cookie, 100.0, 20.0, 5).await;
    let id = product["id"].as_str().unwrap();
    add_to_cart(&app, &cookie, id).await;

    let uri = format!("/carts/{}", id);
    let (status, body) = app.send("DELETE", &uri, Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 1);
    let (_, body) = app.send("DELETE", &uri, Some(&cookie), None).await;
    assert_eq!(body["deletedCount"], 0);
}

#[tokio::test]
async fn test_full_checkout_flow() {
    let app = setup_test_app().await;
    let cookie = app.register("owner@example.com", "Ana").await;
    app.create_shop(&cookie).await;
    let (_, product) = app.create_product(&cookie, 100.0, 20.0, 5).await;
    let id = product["id"].as_str().unwrap();
    add_to_cart(&app, &cookie, id).await;
    add_to_cart(&app, &cookie, id).await;

    let (status, report) = app.send("POST", "/sales", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["stage"], "done");
    assert_eq!(report["salesResult"]["insertedCount"], 1);
    assert_eq!(report["ledgerResults"][0]["modified"], true);
    assert_eq!(report["ledgerResults"][0]["soldQuantity"], 2);
    assert_eq!(report["cartResults"][0]["deletedCount"], 1);

    let (_, cart) = app.send("GET", "/carts", Some(&cookie), None).await;
    assert!(cart.as_array().unwrap().is_empty());

    let (_, stored) = app
        .send("GET", &format!("/product/{}", id), Some(&cookie), None)
        .await;
    assert_eq!(stored["quantity"], 3);
    assert_eq!(stored["salesCount"], 2);

    let (status, sales) = app.send("GET", "/sales", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    let sales = sales.as_array().unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0]["soldBy"], "owner@example.com");
    assert_eq!(sales[0]["sellerName"], "Ana");
    assert_eq!(sales[0]["soldQuantity"], 2);

    let (status, summary) = app.send("GET", "/salesSummary", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["sellers"][0]["seller"], "Ana");
    assert_eq!(summary["sellers"][0]["totalSales"].as_f64(), Some(260.0));
    assert_eq!(summary["sellers"][0]["totalInvest"].as_f64(), Some(200.0));
    assert_eq!(summary["sellers"][0]["totalProfit"].as_f64(), Some(56.0));
}

#[tokio::test]
async fn test_empty_checkout_succeeds() {
    let app = setup_test_app().await;
    let cookie = app.register("owner@example.com", "Ana").await;

    let (status, report) = app.send("POST", "/sales", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["salesResult"]["insertedCount"], 0);
    assert!(report["ledgerResults"].as_array().unwrap().is_empty());
    assert!(report["cartResults"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_of_depleted_product_reports_unmodified() {
    let app = setup_test_app().await;
    let cookie = app.register("owner@example.com", "Ana").await;
    app.create_shop(&cookie).await;
    let (_, product) = app.create_product(&cookie, 100.0, 20.0, 0).await;
    add_to_cart(&app, &cookie, product["id"].as_str().unwrap()).await;

    let (status, report) = app.send("POST", "/sales", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["salesResult"]["insertedCount"], 1);
    assert_eq!(report["ledgerResults"][0]["modified"], false);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checkouts_sell_last_unit_once() {
    let app = setup_test_app().await;
    let cookie = app.register("owner@example.com", "Ana").await;
    app.create_shop(&cookie).await;
    let (_, product) = app.create_product(&cookie, 100.0, 20.0, 1).await;
    let id = product["id"].as_str().unwrap();
    add_to_cart(&app, &cookie, id).await;

    let (first, second) = tokio::join!(
        app.send("POST", "/sales", Some(&cookie), None),
        app.send("POST", "/sales", Some(&cookie), None),
    );
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::OK);

    let modified = [&first.1, &second.1]
        .iter()
        .flat_map(|report| report["ledgerResults"].as_array().unwrap().iter())
        .filter(|outcome| outcome["modified"] == true)
        .count();
    assert_eq!(modified, 1);

    let (_, stored) = app
        .send("GET", &format!("/product/{}", id), Some(&cookie), None)
        .await;
    assert_eq!(stored["quantity"], 0);
    assert_eq!(stored["salesCount"], 1);

    let (_, cart) = app.send("GET", "/carts", Some(&cookie), None).await;
    assert!(cart.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cart_price_is_frozen_through_checkout() {
    let app = setup_test_app().await;
    let cookie = app.register("owner@example.com", "Ana").await;
    app.create_shop(&cookie).await;
    let (_, product) = app.create_product(&cookie, 100.0, 20.0, 5).await;
    let id = product["id"].as_str().unwrap();
    add_to_cart(&app, &cookie, id).await;

    app.send(
        "PUT",
        &format!("/product/{}", id),
        Some(&cookie),
        Some(json!({ "cost": 200 })),
    )
    .await;
    add_to_cart(&app, &cookie, id).await;

    app.send("POST", "/sales", Some(&cookie), None).await;
    let (_, sales) = app.send("GET", "/sales", Some(&cookie), None).await;
    assert_eq!(sales[0]["sellingPrice"].as_f64(), Some(130.0));
    assert_eq!(sales[0]["productCost"].as_f64(), Some(100.0));
}

#[tokio::test]
async fn test_admin_summary() {
    let app = setup_test_app().await;
    let cookie = app.register("owner@example.com", "Ana").await;
    app.create_shop(&cookie).await;
    let (_, product) = app.create_product(&cookie, 100.0, 20.0, 5).await;
    add_to_cart(&app, &cookie, product["id"].as_str().unwrap()).await;
    app.send("POST", "/sales", Some(&cookie), None).await;

    let (status, _) = app.send("GET", "/admin/salesSummary", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.login(ADMIN_EMAIL).await;
    let (status, summary) = app.send("GET", "/admin/salesSummary", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalSales"].as_f64(), Some(130.0));
    assert_eq!(summary["adminIncome"].as_f64(), Some(0.0));
    assert_eq!(summary["productCount"], 1);
    assert_eq!(summary["shopCount"], 1);
    assert_eq!(summary["userCount"], 2);
}

#[tokio::test]
async fn test_increase_income_credits_admin() {
    let app = setup_test_app().await;

    let (status, _) = app
        .send("PATCH", "/admin/increaseIncome", None, Some(json!({ "amount": 5.5 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .send("PATCH", "/admin/increaseIncome", None, Some(json!({ "amount": 0 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .send("PATCH", "/admin/increaseIncome", None, Some(json!({ "amount": 1.0e27 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let admin = app.login(ADMIN_EMAIL).await;
    let (_, me) = app.send("GET", "/user", Some(&admin), None).await;
    assert_eq!(me["role"], "admin");
    assert_eq!(me["income"].as_f64(), Some(5.5));
}
