use std::sync::Arc;

use chrono::FixedOffset;
use fishery::photos::LocalPhotoStore;
use fishery_web::{routes, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use warp::{http::StatusCode, Filter, Reply};

async fn state() -> (AppState, TempDir) {
    let db = database::in_memory().await.unwrap();
    let photos = tempfile::tempdir().unwrap();
    let state = AppState::new(
        db,
        Arc::new(LocalPhotoStore::new(photos.path())),
        FixedOffset::east_opt(7 * 3600).unwrap(),
    );

    (state, photos)
}

async fn call<F>(api: &F, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value)
where
    F: Filter + Clone + 'static,
    F::Extract: Reply + Send,
{
    let mut request = warp::test::request().method(method).path(path);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.reply(api).await;
    let status = response.status();
    let body = serde_json::from_slice(response.body()).unwrap();

    (status, body)
}

async fn create_record<F>(api: &F, record: Value) -> String
where
    F: Filter + Clone + 'static,
    F::Extract: Reply + Send,
{
    let (status, body) = call(api, "POST", "/fishing-records", Some(record)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_str().unwrap().to_string()
}

fn catch(province: &str, verified: bool, price: f64) -> Value {
    json!({
        "userId": "u1",
        "catchDate": "2024-03-02T06:00:00Z",
        "verified": verified,
        "location": { "province": province, "latitude": 17.4, "longitude": 104.7 },
        "fishList": [{ "name": "ปลาบึก", "count": 2, "price": price }],
        "totalWeight": 3.5
    })
}

#[tokio::test]
async fn stats_reflect_the_whole_filtered_set() {
    let (state, _photos) = state().await;
    let api = routes(state);
    for (province, verified) in [("นครพนม", true), ("นครพนม", true), ("นครพนม", false), ("เลย", true)] {
        create_record(&api, catch(province, verified, 100.0)).await;
    }

    let (status, body) = call(
        &api,
        "GET",
        "/fishing-records?search=%E0%B8%99%E0%B8%84%E0%B8%A3%E0%B8%9E%E0%B8%99%E0%B8%A1&verified=verified&limit=1",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["stats"]["totalRecords"], 2);
    assert_eq!(body["stats"]["verifiedCount"], 2);
    assert_eq!(body["stats"]["totalValue"], 400.0);
    assert_eq!(body["pagination"]["hasMore"], true);
    assert_eq!(body["data"][0]["fisherName"], "ไม่ระบุชื่อ");
}

#[tokio::test]
async fn owner_history_is_not_paginated() {
    let (state, _photos) = state().await;
    let api = routes(state);
    for _ in 0..3 {
        create_record(&api, catch("เลย", false, 10.0)).await;
    }

    let (_, body) = call(&api, "GET", "/fishing-records?userId=u1&limit=1&page=2", None).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["pagination"]["page"], 0);
    assert_eq!(body["pagination"]["hasMore"], false);
}

#[tokio::test]
async fn collection_stats_endpoint() {
    let (state, _photos) = state().await;
    let api = routes(state);
    create_record(&api, catch("เลย", true, 10.0)).await;
    create_record(&api, catch("เลย", false, 5.0)).await;

    let (status, body) = call(&api, "GET", "/fishing-records/stats?minDate=2024-03-01", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["totalRecords"], 2);
    assert_eq!(body["stats"]["totalValue"], 30.0);
    assert_eq!(body["stats"]["totalWeight"], 7.0);
}

#[tokio::test]
async fn invalid_input_is_a_field_level_error() {
    let (state, _photos) = state().await;
    let api = routes(state);

    let (status, body) = call(&api, "GET", "/fishing-records?verified=maybe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["field"], "verified");

    let (status, body) = call(&api, "GET", "/fishing-records?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "limit");

    let (status, body) = call(&api, "GET", "/fishing-records?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["field"], "page");

    let (status, body) = call(&api, "GET", "/fish-distribution?limit=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "limit");
}

#[tokio::test]
async fn empty_paging_values_use_defaults() {
    let (state, _photos) = state().await;
    let api = routes(state);
    create_record(&api, catch("เลย", true, 10.0)).await;

    let (status, body) = call(&api, "GET", "/fishing-records?page=&limit=&search=", None).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["pageSize"], 20);

    let (status, body) = call(&api, "GET", "/fish-distribution?limit=", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_things_are_not_found() {
    let (state, _photos) = state().await;
    let api = routes(state);

    let (status, body) = call(&api, "GET", "/fishing-records/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, body) = call(&api, "GET", "/no-such-route", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn payment_lifecycle() {
    let (state, _photos) = state().await;
    let api = routes(state);
    let first = create_record(&api, catch("เลย", true, 10.0)).await;
    let second = create_record(&api, catch("เลย", true, 10.0)).await;

    let (status, body) = call(
        &api,
        "POST",
        "/payments",
        Some(json!({
            "userId": "u1",
            "fisherName": "สมชาย",
            "period": "2024-03",
            "periodStart": "2024-03-01",
            "periodEnd": "2024-03-31",
            "recordIds": [&first, &second],
            "paymentRate": 120.0,
            "paidDate": "2024-04-01T03:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let payment_id = body["payment"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["payment"]["totalAmount"], 240.0);

    let (_, body) = call(&api, "GET", &format!("/fishing-records/{first}"), None).await;
    assert_eq!(body["data"]["isPaid"], true);
    assert_eq!(body["data"]["paymentId"], payment_id.as_str());

    let (_, body) = call(&api, "GET", "/payments?userId=u1", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = call(&api, "DELETE", &format!("/payments/{payment_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revertedRecords"], 2);

    let (_, body) = call(&api, "GET", &format!("/fishing-records/{second}"), None).await;
    assert_eq!(body["data"]["isPaid"], false);
    assert_eq!(body["data"]["paymentId"], Value::Null);

    let (status, _) = call(&api, "GET", &format!("/payments/{payment_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn payment_needs_records() {
    let (state, _photos) = state().await;
    let api = routes(state);

    let (status, body) = call(
        &api,
        "POST",
        "/payments",
        Some(json!({ "userId": "u1", "period": "2024-03", "recordIds": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "recordIds");
}

#[tokio::test]
async fn edits_and_deletes_records() {
    let (state, photos) = state().await;
    let api = routes(state);
    std::fs::write(photos.path().join("catch.jpg"), b"jpeg").unwrap();
    let mut record = catch("เลย", false, 10.0);
    record["photos"] = json!(["catch.jpg", "missing.jpg"]);
    let id = create_record(&api, record).await;

    let (status, body) = call(
        &api,
        "PATCH",
        &format!("/fishing-records/{id}"),
        Some(json!({ "verified": true, "notes": "ok" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verified"], true);
    assert_eq!(body["data"]["notes"], "ok");

    let (status, body) = call(
        &api,
        "PATCH",
        &format!("/fishing-records/{id}"),
        Some(json!({ "isPaid": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "isPaid");

    let (status, body) = call(
        &api,
        "PUT",
        &format!("/fishing-records/{id}"),
        Some(json!({ "verified": false, "weather": "ฝน" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["weather"], "ฝน");
    assert_eq!(body["data"]["notes"], Value::Null);

    let (status, body) = call(&api, "DELETE", &format!("/fishing-records/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["photos"][0]["deleted"], true);
    assert_eq!(body["photos"][1]["deleted"], false);
    assert!(!photos.path().join("catch.jpg").exists());

    let (status, _) = call(&api, "GET", &format!("/fishing-records/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn distribution_and_reference_data() {
    let (state, _photos) = state().await;
    let api = routes(state);
    create_record(&api, catch("เลย", false, 10.0)).await;

    let (status, body) = call(&api, "GET", "/fish-distribution?limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["species"], "ปลาบึก");

    let (status, body) = call(&api, "GET", "/fish-species", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn manages_fishing_spots() {
    let (state, _photos) = state().await;
    let api = routes(state);

    let (status, body) = call(
        &api,
        "POST",
        "/fishing-spots",
        Some(json!({ "name": "แก่งสะดอก", "latitude": 17.1, "longitude": 104.2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(&api, "POST", "/fishing-spots", Some(json!({ "latitude": 91 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "name");

    let (status, _) = call(
        &api,
        "PUT",
        &format!("/fishing-spots/{id}"),
        Some(json!({ "name": "วังปลา" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&api, "GET", "/fishing-spots", None).await;
    assert_eq!(body["data"][0]["name"], "วังปลา");

    let (status, _) = call(&api, "DELETE", &format!("/fishing-spots/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&api, "DELETE", &format!("/fishing-spots/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
