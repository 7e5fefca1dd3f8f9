use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;
use emlak_server::{
    api::app_router,
    build_state,
    config::{Config, LogFormat},
};

async fn build_test_router() -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["http://localhost:3000".to_string()],
        request_timeout: Duration::from_secs(30),
        log_format: LogFormat::Text,
    };
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config).unwrap(), tmp)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn listing(number: &str, neighborhood: &str, price: f64) -> Value {
    json!({
        "listingNumber": number,
        "price": price,
        "city": "Istanbul",
        "district": "Kadikoy",
        "neighborhood": neighborhood,
        "squareMeters": 100,
        "buildingAge": 5,
        "propertyType": "apartment",
        "agentPhones": ["0532 000 00 00"]
    })
}

/// Six Moda listings at 20000/m2 and two Fenerbahce listings at 15000/m2.
async fn seed(app: &Router) {
    let mut listings: Vec<Value> = (0..6)
        .map(|i| listing(&format!("M{}", i), "Moda", 2_000_000.0))
        .collect();
    listings.push(listing("F0", "Fenerbahce", 1_500_000.0));
    listings.push(listing("F1", "Fenerbahce", 1_500_000.0));
    // Missing neighborhood: skipped
    listings.push(json!({ "listingNumber": "X0", "city": "Istanbul", "district": "Kadikoy" }));

    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/properties/import",
        Some(json!({ "listings": listings })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "saved": 8, "skipped": 1 }));
}

fn query(neighborhood: &str, square_meters: f64) -> Value {
    json!({
        "city": "Istanbul",
        "district": "Kadikoy",
        "neighborhood": neighborhood,
        "squareMeters": square_meters,
        "buildingAge": 5,
        "propertyType": "apartment",
        "roomCount": "3+1"
    })
}

#[tokio::test]
async fn healthz_and_openapi() {
    let (app, _tmp) = build_test_router().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/v1/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, doc) = send(&app, Method::GET, "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/valuation/estimate"].is_object());
}

#[tokio::test]
async fn estimate_after_import() {
    let (app, _tmp) = build_test_router().await;
    seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/valuation/estimate",
        Some(query("Moda", 100.0)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // base = 20000 * 0.6 + 18750 * 0.4 = 19500; age 5 -> 1.05
    assert_eq!(body["estimatedPrice"].as_f64().unwrap(), 2_047_500.0);
    assert_eq!(body["priceRange"]["low"].as_f64().unwrap(), 1_842_750.0);
    assert_eq!(body["priceRange"]["high"].as_f64().unwrap(), 2_252_250.0);
    assert_eq!(body["comparables"].as_array().unwrap().len(), 8);
    assert_eq!(body["comparables"][0]["similarityScore"], 100);
    assert_eq!(body["areaStats"]["neighborhoodListings"], 6);
    assert_eq!(body["areaStats"]["districtListings"], 8);
    // 8 * 4 + 6 * 0.6 + 30 * (1 - 5000 / 19500) = 57.9
    assert_eq!(body["confidenceScore"], 57);
}

#[tokio::test]
async fn estimate_error_kinds() {
    let (app, _tmp) = build_test_router().await;
    seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/valuation/estimate",
        Some(query("Caddebostan", 100.0)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "insufficient_area_data");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/valuation/estimate",
        Some(query("Moda", 0.0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
    assert_eq!(body["code"], 400);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/valuation/estimate",
        Some(query("Moda", 1e25)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/valuation/estimate",
        Some(json!({ "city": "Istanbul" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
}

#[tokio::test]
async fn estimate_without_comparables() {
    let (app, _tmp) = build_test_router().await;
    seed(&app).await;

    // Far larger and much older than anything listed
    let mut villa = query("Moda", 400.0);
    villa["buildingAge"] = json!(60);
    villa["propertyType"] = json!("villa");
    let (status, body) = send(&app, Method::POST, "/api/v1/valuation/estimate", Some(villa)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "no_comparables_found");
}

#[tokio::test]
async fn browse_listings_and_locations() {
    let (app, _tmp) = build_test_router().await;
    seed(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/properties?limit=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = send(&app, Method::GET, "/api/v1/properties?maxPrice=1600000", None).await;
    let cheap = body.as_array().unwrap();
    assert_eq!(cheap.len(), 2);
    assert!(cheap.iter().all(|p| p["neighborhood"] == "Fenerbahce"));

    let id = cheap[0]["id"].as_str().unwrap().to_string();
    let (status, body) = send(&app, Method::GET, &format!("/api/v1/properties/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pricePerSqm"].as_f64().unwrap(), 15_000.0);
    assert_eq!(body["agentPhones"], json!(["0532 000 00 00"]));

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/properties/{}/price-history", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::GET, "/api/v1/properties/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    let (_, body) = send(&app, Method::GET, "/api/v1/locations/cities", None).await;
    assert_eq!(body, json!([{ "value": "Istanbul", "label": "Istanbul" }]));

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/locations/neighborhoods?city=Istanbul&district=Kadikoy",
        None,
    )
    .await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["value"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Fenerbahce", "Moda"]);
}

#[tokio::test]
async fn area_statistics_summaries() {
    let (app, _tmp) = build_test_router().await;
    seed(&app).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/area-statistics?city=Istanbul&district=Kadikoy",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let summaries = body.as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[1]["neighborhood"], "Moda");
    assert_eq!(summaries[1]["avgPricePerSqm"].as_f64().unwrap(), 20_000.0);
    assert_eq!(summaries[1]["totalListings"], 6);

    let (status, _) = send(&app, Method::GET, "/api/v1/area-statistics", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
