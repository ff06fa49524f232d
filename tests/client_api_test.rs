//! In-process tests of the client routes against the in-memory store.
//!
//! Run with: `cargo test --test client_api_test`

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use dashboard_api::config::AppConfig;
use dashboard_api::seed::{self, SeedData};
use dashboard_api::store::{Document, MemoryStore, Store};
use dashboard_api::{routes, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

/// `{"field":"userId","sort":"desc"}`, percent-encoded.
const SORT_USER_ID_DESC: &str = "%7B%22field%22%3A%22userId%22%2C%22sort%22%3A%22desc%22%7D";

fn docs(values: Vec<Value>) -> Vec<Document> {
    values
        .into_iter()
        .map(|v| v.as_object().cloned().expect("fixture must be an object"))
        .collect()
}

async fn app_with(data: SeedData) -> Router {
    let store = Store::Memory(MemoryStore::default());
    seed::load(&store, data).await.expect("seed");
    let config = AppConfig::from_vars(|_| None).expect("config");
    routes::router(AppState { store, config })
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    });
    (status, body)
}

/// Transactions `t01..tNN` with user ids `user-01..` and costs `1.00..`.
fn numbered_transactions(count: usize) -> Vec<Document> {
    docs(
        (1..=count)
            .map(|i| {
                json!({
                    "_id": format!("t{i:02}"),
                    "userId": format!("user-{i:02}"),
                    "cost": format!("{i}.00"),
                })
            })
            .collect(),
    )
}

fn transaction_ids(body: &Value) -> Vec<String> {
    body["transactions"]
        .as_array()
        .expect("transactions array")
        .iter()
        .map(|t| t["_id"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================
// Transactions
// ============================================================

#[tokio::test]
async fn page_one_skips_the_first_page_size_records() {
    let app = app_with(SeedData {
        transactions: numbered_transactions(25),
        ..Default::default()
    })
    .await;

    let (status, body) = get(&app, "/client/transactions?page=1&pageSize=20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transaction_ids(&body), vec!["t21", "t22", "t23", "t24", "t25"]);
}

#[tokio::test]
async fn default_parameters_are_page_one_of_twenty() {
    let app = app_with(SeedData {
        transactions: numbered_transactions(25),
        ..Default::default()
    })
    .await;

    let (status, body) = get(&app, "/client/transactions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transaction_ids(&body).len(), 5);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn never_returns_more_than_page_size() {
    let app = app_with(SeedData {
        transactions: numbered_transactions(25),
        ..Default::default()
    })
    .await;

    for (page, page_size) in [(0, 0), (0, 7), (1, 7), (3, 7), (0, 100), (9, 3)] {
        let uri = format!("/client/transactions?page={page}&pageSize={page_size}");
        let (status, body) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(transaction_ids(&body).len() <= page_size, "{uri}");
    }
}

#[tokio::test]
async fn empty_search_matches_every_record() {
    let app = app_with(SeedData {
        transactions: numbered_transactions(25),
        ..Default::default()
    })
    .await;

    let (status, body) = get(&app, "/client/transactions?page=0&pageSize=100&search=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transaction_ids(&body).len(), 25);
}

#[tokio::test]
async fn search_is_case_insensitive_over_cost_and_user_id() {
    let app = app_with(SeedData {
        transactions: numbered_transactions(25),
        ..Default::default()
    })
    .await;

    let (_, body) = get(&app, "/client/transactions?page=0&search=USER-2").await;
    assert_eq!(
        transaction_ids(&body),
        vec!["t20", "t21", "t22", "t23", "t24", "t25"]
    );

    let (_, body) = get(&app, "/client/transactions?page=0&search=%5E13%5C.").await;
    assert_eq!(transaction_ids(&body), vec!["t13"]);
}

#[tokio::test]
async fn total_counts_name_matches_independently_of_the_page() {
    let mut transactions = numbered_transactions(3);
    transactions.extend(docs(vec![
        json!({"_id": "g1", "userId": "u-9", "cost": "5.00", "name": "Gift card"}),
        json!({"_id": "g2", "userId": "u-9", "cost": "8.00", "name": "GIFT wrap"}),
    ]));
    let app = app_with(SeedData {
        transactions,
        ..Default::default()
    })
    .await;

    let (status, body) = get(&app, "/client/transactions?page=0&search=gift").await;
    assert_eq!(status, StatusCode::OK);
    assert!(transaction_ids(&body).is_empty());
    assert_eq!(body["total"], 2);

    let (_, body) = get(&app, "/client/transactions?page=0&search=user").await;
    assert_eq!(transaction_ids(&body).len(), 3);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn descending_sort_request_orders_ascending() {
    let app = app_with(SeedData {
        transactions: docs(vec![
            json!({"_id": "a", "userId": "user-b", "cost": "1"}),
            json!({"_id": "b", "userId": "user-c", "cost": "2"}),
            json!({"_id": "c", "userId": "user-a", "cost": "3"}),
        ]),
        ..Default::default()
    })
    .await;

    let uri = format!("/client/transactions?page=0&sort={SORT_USER_ID_DESC}");
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transaction_ids(&body), vec!["c", "a", "b"]);
}

#[tokio::test]
async fn non_string_sort_direction_orders_ascending() {
    let app = app_with(SeedData {
        transactions: docs(vec![
            json!({"_id": "a", "userId": "user-b", "cost": "1"}),
            json!({"_id": "b", "userId": "user-a", "cost": "2"}),
        ]),
        ..Default::default()
    })
    .await;

    // {"field":"userId","sort":1}
    let (status, body) = get(
        &app,
        "/client/transactions?page=0&sort=%7B%22field%22%3A%22userId%22%2C%22sort%22%3A1%7D",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transaction_ids(&body), vec!["b", "a"]);
}

#[tokio::test]
async fn array_sort_is_not_found() {
    let app = app_with(SeedData::default()).await;

    // ["userId","desc"]
    let (status, body) = get(
        &app,
        "/client/transactions?sort=%5B%22userId%22%2C%22desc%22%5D",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid sort parameter"));
}

#[tokio::test]
async fn transaction_costs_come_back_as_stored() {
    let app = app_with(SeedData {
        transactions: docs(vec![
            json!({"_id": "t1", "userId": "u1", "cost": 7}),
            json!({"_id": "t2", "userId": "u1", "cost": 7.5}),
            json!({"_id": "t3", "userId": "u1", "cost": "7.00"}),
        ]),
        ..Default::default()
    })
    .await;

    let (status, body) = get(&app, "/client/transactions?page=0").await;
    assert_eq!(status, StatusCode::OK);
    let costs: Vec<&Value> = body["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| &t["cost"])
        .collect();
    assert_eq!(costs, vec![&json!(7), &json!(7.5), &json!("7.00")]);
    assert!(body["transactions"][0].get("products").is_none());
}

#[tokio::test]
async fn malformed_sort_is_not_found_with_message() {
    let app = app_with(SeedData::default()).await;

    let (status, body) = get(&app, "/client/transactions?sort=userId-desc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let message = body["message"].as_str().expect("message field");
    assert!(message.starts_with("Invalid sort parameter"), "{message}");
}

#[tokio::test]
async fn non_numeric_page_is_not_found_with_message() {
    let app = app_with(SeedData::default()).await;

    let (status, body) = get(&app, "/client/transactions?page=two").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Invalid pagination: page must be an integer, got \"two\""
    );
}

#[tokio::test]
async fn negative_offset_is_not_found_with_message() {
    let app = app_with(SeedData {
        transactions: numbered_transactions(3),
        ..Default::default()
    })
    .await;

    let (status, body) = get(&app, "/client/transactions?page=-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Invalid query options: skip must be non-negative, got -20"
    );
}

#[tokio::test]
async fn invalid_search_pattern_is_not_found() {
    let app = app_with(SeedData::default()).await;

    let (status, body) = get(&app, "/client/transactions?search=%5B").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid search pattern"));
}

// ============================================================
// Products, customers, geography
// ============================================================

#[tokio::test]
async fn products_include_their_stats() {
    let app = app_with(SeedData {
        products: docs(vec![
            json!({"_id": "p1", "name": "Lamp", "price": 34.99, "color": "red"}),
            json!({"_id": "p2", "name": "Hoodie", "price": 52.0}),
        ]),
        product_stats: docs(vec![
            json!({"_id": "s1", "productId": "p1", "year": 2021, "yearlySalesTotal": 29286}),
        ]),
        ..Default::default()
    })
    .await;

    let (status, body) = get(&app, "/client/products").await;
    assert_eq!(status, StatusCode::OK);

    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["name"], "Lamp");
    assert_eq!(products[0]["color"], "red");
    assert_eq!(products[0]["stat"][0]["_id"], "s1");
    assert_eq!(products[0]["stat"][0]["yearlySalesTotal"], 29286);
    assert_eq!(products[1]["stat"], json!([]));
}

#[tokio::test]
async fn products_accept_float_counts_and_keep_stat_fields() {
    let app = app_with(SeedData {
        products: docs(vec![json!({"_id": "p1", "supply": 12.0})]),
        product_stats: docs(vec![
            json!({"_id": "s1", "productId": "p1", "region": "EU", "yearlyTotalSoldUnits": 40.0}),
        ]),
        ..Default::default()
    })
    .await;

    let (status, body) = get(&app, "/client/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "_id": "p1",
            "supply": 12.0,
            "stat": [{"_id": "s1", "productId": "p1", "region": "EU", "yearlyTotalSoldUnits": 40.0}]
        }])
    );
}

#[tokio::test]
async fn customers_come_back_as_stored_minus_password() {
    let app = app_with(SeedData {
        users: docs(vec![
            json!({"_id": "u1", "role": "user", "password": "x", "__v": 0, "nickname": "ann"}),
        ]),
        ..Default::default()
    })
    .await;

    let (status, body) = get(&app, "/client/customers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"_id": "u1", "role": "user", "__v": 0, "nickname": "ann"}])
    );
}

#[tokio::test]
async fn customers_are_users_without_passwords() {
    let app = app_with(SeedData {
        users: docs(vec![
            json!({"_id": "u1", "name": "Marilyn", "password": "XRYBnKAfm", "country": "CN", "role": "user"}),
            json!({"_id": "u2", "name": "Konstantine", "password": "omMDCh", "role": "superadmin"}),
            json!({"_id": "u3", "name": "Olly", "password": "WwDjOlH", "role": "user"}),
        ]),
        ..Default::default()
    })
    .await;

    let (status, body) = get(&app, "/client/customers").await;
    assert_eq!(status, StatusCode::OK);

    let customers = body.as_array().unwrap();
    let names: Vec<&str> = customers.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Marilyn", "Olly"]);
    for customer in customers {
        assert!(customer.get("password").is_none());
        assert_eq!(customer["role"], "user");
    }
}

#[tokio::test]
async fn geography_counts_users_by_iso3() {
    let app = app_with(SeedData {
        users: docs(vec![
            json!({"_id": "u1", "country": "US"}),
            json!({"_id": "u2", "country": "US"}),
            json!({"_id": "u3", "country": "CA"}),
        ]),
        ..Default::default()
    })
    .await;

    let (status, body) = get(&app, "/client/geography").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": "USA", "value": 2},
            {"id": "CAN", "value": 1}
        ])
    );
}

#[tokio::test]
async fn malformed_user_document_is_not_found_with_message() {
    let app = app_with(SeedData {
        users: docs(vec![json!({"_id": "u1", "transactions": "not-an-array"})]),
        ..Default::default()
    })
    .await;

    let (status, body) = get(&app, "/client/geography").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Malformed document"));
}

// ============================================================
// Health
// ============================================================

#[tokio::test]
async fn health_probes() {
    let app = app_with(SeedData::default()).await;

    let (status, body) = get(&app, "/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let (status, body) = get(&app, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "store": "connected"}));
}
