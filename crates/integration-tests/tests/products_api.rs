//! Product REST API tests.
//!
//! These tests verify:
//! - Listing and filtering products by name, brand, country, labels and controversies
//! - Creating products, including duplicate and incomplete payloads
//! - Fetching and updating single products
//! - Category aggregation
//! - 405 responses with an `Allow` header for unsupported methods
//!
//! The in-memory tests run by default. The `PostgreSQL` tests need a migrated
//! database and are ignored unless `--include-ignored` is passed.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use greenshelf_catalog::db::{MIGRATOR, PgProductStore, ProductStore};
use greenshelf_integration_tests::{TestServer, sample_products};
use reqwest::{StatusCode, header::ALLOW};
use secrecy::SecretString;
use serde_json::{Value, json};

async fn seeded() -> TestServer {
    let server = TestServer::spawn().await;
    server.create_all(&sample_products()).await;
    server
}

async fn list_ids(server: &TestServer, query: &str) -> Vec<i64> {
    let response = server
        .client
        .get(server.url(&format!("/products{query}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let products: Vec<Value> = response.json().await.unwrap();
    products
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

async fn message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["message"].as_str().unwrap().to_owned()
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn test_list_without_filters_returns_all_in_id_order() {
    let server = seeded().await;
    assert_eq!(list_ids(&server, "").await, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_empty_catalog_lists_nothing() {
    let server = TestServer::spawn().await;
    assert!(list_ids(&server, "").await.is_empty());
}

#[tokio::test]
async fn test_name_filter_is_case_insensitive_substring() {
    let server = seeded().await;
    assert_eq!(list_ids(&server, "?q=KAFF").await, vec![1]);
    assert_eq!(list_ids(&server, "?q=milch").await, vec![4]);
}

#[tokio::test]
async fn test_brand_and_country_filters() {
    let server = seeded().await;
    assert_eq!(list_ids(&server, "?brand=ritter").await, vec![2]);
    assert_eq!(list_ids(&server, "?marke=oat").await, vec![4]);
    assert_eq!(list_ids(&server, "?originCountry=ecua").await, vec![3]);
    assert_eq!(list_ids(&server, "?herkunftsland=schwed").await, vec![4]);
}

#[tokio::test]
async fn test_labels_match_any_selected() {
    let server = seeded().await;
    assert_eq!(list_ids(&server, "?labels=Fairtrade").await, vec![1, 2]);
    assert_eq!(
        list_ids(&server, "?labels=Vegan&labels=Rainforest%20Alliance").await,
        vec![3, 4]
    );
}

#[tokio::test]
async fn test_bracket_form_equals_scalar_form() {
    let server = seeded().await;
    let scalar = list_ids(&server, "?labels=Klimaneutral").await;
    let bracket = list_ids(&server, "?labels%5B%5D=Klimaneutral").await;
    assert_eq!(scalar, vec![1, 4]);
    assert_eq!(scalar, bracket);
}

#[tokio::test]
async fn test_controversies_exclude_matching_products() {
    let server = seeded().await;
    assert_eq!(
        list_ids(&server, "?controversies=Kinderarbeit").await,
        vec![2, 4]
    );
    assert_eq!(
        list_ids(&server, "?controversy%5B%5D=Pestizide").await,
        vec![1, 2, 4]
    );
}

#[tokio::test]
async fn test_filters_combine_with_and() {
    let server = seeded().await;
    assert_eq!(
        list_ids(&server, "?labels=Fairtrade&controversies=Kinderarbeit").await,
        vec![2]
    );
    assert!(
        list_ids(&server, "?q=kaffee&brand=oatly")
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_empty_and_unknown_parameters_are_ignored() {
    let server = seeded().await;
    assert_eq!(
        list_ids(&server, "?q=&labels=&sort=desc").await,
        vec![1, 2, 3, 4]
    );
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_returns_stored_product() {
    let server = TestServer::spawn().await;
    let response = server
        .client
        .post(server.url("/products"))
        .json(&json!({
            "id": 7,
            "produkt": "Tee",
            "marke": "Teekanne",
            "labels": ["EU Bio"],
            "herkunftsland": "Indien"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], 7);
    assert_eq!(body["produkt"], "Tee");
    assert_eq!(body["controversy"], json!([]));
    assert!(body["_id"].is_string());
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_accepts_english_field_names() {
    let server = TestServer::spawn().await;
    let response = server
        .client
        .post(server.url("/products"))
        .json(&json!({
            "id": 8,
            "name": "Reis",
            "brand": "Davert",
            "controversies": ["Methan"],
            "originCountry": "Italien"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["marke"], "Davert");
    assert_eq!(body["controversy"], json!(["Methan"]));
}

#[tokio::test]
async fn test_create_duplicate_id_conflicts() {
    let server = seeded().await;
    let response = server
        .client
        .post(server.url("/products"))
        .json(&sample_products()[0])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(message(response).await, "Product with this ID already exists");
    assert_eq!(list_ids(&server, "").await, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_create_missing_fields_is_bad_request() {
    let server = TestServer::spawn().await;
    let response = server
        .client
        .post(server.url("/products"))
        .json(&json!({ "id": 9, "produkt": "Honig" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        message(response).await,
        "Missing required fields: marke, herkunftsland"
    );
    assert!(list_ids(&server, "").await.is_empty());
}

#[tokio::test]
async fn test_create_zero_id_is_missing() {
    let server = TestServer::spawn().await;
    let response = server
        .client
        .post(server.url("/products"))
        .json(&json!({ "id": 0, "produkt": "A", "marke": "B", "herkunftsland": "C" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "Missing required fields: id");
}

#[tokio::test]
async fn test_create_malformed_json_is_bad_request() {
    let server = TestServer::spawn().await;
    let response = server
        .client
        .post(server.url("/products"))
        .header("content-type", "application/json")
        .body("{\"id\": 1,")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Lookup
// ============================================================================

#[tokio::test]
async fn test_get_product_by_id() {
    let server = seeded().await;
    let response = server
        .client
        .get(server.url("/products/3"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["produkt"], "Bananen");
    assert_eq!(body["controversy"], json!(["Pestizide", "Kinderarbeit"]));
}

#[tokio::test]
async fn test_get_unknown_product_is_not_found() {
    let server = seeded().await;
    for path in ["/products/999", "/products/abc"] {
        let response = server.client.get(server.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        assert_eq!(message(response).await, "Product not found");
    }
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_replaces_fields_and_keeps_id() {
    let server = seeded().await;
    let response = server
        .client
        .put(server.url("/products/2"))
        .json(&json!({
            "id": 500,
            "marke": "Lindt",
            "labels": ["Vegan"]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], 2);
    assert_eq!(body["produkt"], "Schokolade");
    assert_eq!(body["marke"], "Lindt");
    assert_eq!(body["labels"], json!(["Vegan"]));
    assert_eq!(list_ids(&server, "?brand=lindt").await, vec![2]);
}

#[tokio::test]
async fn test_update_without_lists_clears_them() {
    let server = seeded().await;
    let response = server
        .client
        .put(server.url("/products/1"))
        .json(&json!({ "produkt": "Espresso" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["labels"], json!([]));
    assert_eq!(body["controversy"], json!([]));
    assert_eq!(
        list_ids(&server, "?controversies=Kinderarbeit").await,
        vec![1, 2, 4]
    );
}

#[tokio::test]
async fn test_update_unknown_product_is_not_found() {
    let server = seeded().await;
    let response = server
        .client
        .put(server.url("/products/999"))
        .json(&json!({
            "id": 999,
            "produkt": "Nichts",
            "marke": "Niemand",
            "labels": ["Vegan"],
            "herkunftsland": "Nirgendwo"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(message(response).await, "Product not found");

    // No upsert: the catalog is unchanged and the id is still unknown
    assert_eq!(list_ids(&server, "").await, vec![1, 2, 3, 4]);
    let lookup = server
        .client
        .get(server.url("/products/999"))
        .send()
        .await
        .unwrap();
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_empty_field_is_bad_request() {
    let server = seeded().await;
    let response = server
        .client
        .put(server.url("/products/1"))
        .json(&json!({ "marke": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "Field must not be empty: marke");
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_categories_are_distinct_and_sorted() {
    let server = seeded().await;
    let response = server
        .client
        .get(server.url("/products/categories"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["labels"],
        json!(["EU Bio", "Fairtrade", "Klimaneutral", "Rainforest Alliance", "Vegan"])
    );
    assert_eq!(body["controversies"], json!(["Kinderarbeit", "Pestizide"]));
    assert_eq!(
        body["brands"],
        json!(["Chiquita", "Oatly", "Ritter Sport", "Starbucks"])
    );
    assert_eq!(
        body["countries"],
        json!(["Deutschland", "Ecuador", "Kolumbien", "Schweden"])
    );
}

#[tokio::test]
async fn test_categories_skip_empty_entries() {
    let server = TestServer::spawn().await;
    server
        .create_all(&[json!({
            "id": 1,
            "produkt": "Seife",
            "marke": "Dr. Bronner",
            "labels": ["", "Vegan"],
            "controversy": [""],
            "herkunftsland": "USA"
        })])
        .await;

    let body: Value = server
        .client
        .get(server.url("/products/categories"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["labels"], json!(["Vegan"]));
    assert_eq!(body["controversies"], json!([]));
}

// ============================================================================
// Unsupported methods
// ============================================================================

#[tokio::test]
async fn test_unsupported_methods_report_allowed_ones() {
    let server = seeded().await;
    let cases = [
        (reqwest::Method::DELETE, "/products", "GET, POST"),
        (reqwest::Method::PATCH, "/products", "GET, POST"),
        (reqwest::Method::DELETE, "/products/1", "GET, PUT"),
        (reqwest::Method::POST, "/products/1", "GET, PUT"),
        (reqwest::Method::POST, "/products/categories", "GET"),
    ];

    for (method, path, allow) in cases {
        let response = server
            .client
            .request(method.clone(), server.url(path))
            .send()
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "{method} {path}"
        );
        assert_eq!(response.headers()[ALLOW], allow, "{method} {path}");
    }

    assert_eq!(list_ids(&server, "").await, vec![1, 2, 3, 4]);
}

// ============================================================================
// PostgreSQL store
// ============================================================================

async fn postgres_server() -> TestServer {
    let url = std::env::var("CATALOG_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("CATALOG_DATABASE_URL must be set");
    let store = PgProductStore::new(SecretString::from(url));
    MIGRATOR.run(store.pool().await.unwrap()).await.unwrap();
    store.replace_all(Vec::new()).await.unwrap();
    TestServer::spawn_with_store(Arc::new(store)).await
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_postgres_filters_match_in_memory_semantics() {
    let server = postgres_server().await;
    server.create_all(&sample_products()).await;

    assert_eq!(list_ids(&server, "").await, vec![1, 2, 3, 4]);
    assert_eq!(list_ids(&server, "?q=KAFF").await, vec![1]);
    assert_eq!(list_ids(&server, "?labels%5B%5D=Klimaneutral").await, vec![1, 4]);
    assert_eq!(
        list_ids(&server, "?labels=Fairtrade&controversies=Kinderarbeit").await,
        vec![2]
    );
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_postgres_duplicate_and_update() {
    let server = postgres_server().await;
    server.create_all(&sample_products()).await;

    let duplicate = server
        .client
        .post(server.url("/products"))
        .json(&sample_products()[1])
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let updated: Value = server
        .client
        .put(server.url("/products/4"))
        .json(&json!({ "herkunftsland": "Finnland", "labels": ["Vegan"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["herkunftsland"], "Finnland");
    assert_eq!(updated["produkt"], "Hafermilch");
    assert_eq!(updated["labels"], json!(["Vegan"]));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_postgres_failed_replace_rolls_back() {
    let url = std::env::var("CATALOG_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("CATALOG_DATABASE_URL must be set");
    let store = PgProductStore::new(SecretString::from(url));
    MIGRATOR.run(store.pool().await.unwrap()).await.unwrap();

    let valid = |value: Value| {
        serde_json::from_value::<greenshelf_core::ProductInput>(value)
            .unwrap()
            .validate()
            .unwrap()
    };
    let products: Vec<_> = sample_products().into_iter().map(valid).collect();
    store.replace_all(products).await.unwrap();

    let clashing = vec![
        valid(json!({ "id": 9, "produkt": "A", "marke": "B", "herkunftsland": "C" })),
        valid(json!({ "id": 9, "produkt": "D", "marke": "E", "herkunftsland": "F" })),
    ];
    assert!(store.replace_all(clashing).await.is_err());

    let server = TestServer::spawn_with_store(Arc::new(store)).await;
    assert_eq!(list_ids(&server, "").await, vec![1, 2, 3, 4]);
}
