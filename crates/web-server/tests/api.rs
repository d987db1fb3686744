use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use database::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    web_server::router(Arc::new(MemoryStore::new()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

async fn created_id(app: &Router, uri: &str, body: Value) -> i64 {
    let (status, value) = post(app, uri, body).await;
    assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {value}");
    value["id"].as_i64().unwrap()
}

/// Vessel "Storm" with two voyages: cod 10 + cod 5 at North on 2024-05-10,
/// salmon 20 at South on 2024-06-20.
async fn storm_fleet(app: &Router) -> (i64, i64) {
    let storm = created_id(app, "/vessels", json!({"name": "Storm", "type": "trawler", "displacement": 120.5})).await;
    let north = created_id(app, "/banks", json!({"name": "North", "location": "Barents Sea"})).await;
    let south = created_id(app, "/banks", json!({"name": "South"})).await;

    let trips = [
        ("2024-05-01", north, "2024-05-10", vec![("cod", 10), ("cod", 5)]),
        ("2024-06-15", south, "2024-06-20", vec![("salmon", 20)]),
    ];
    for (depart, bank_id, arrival, catches) in trips {
        let voyage = created_id(app, "/voyages", json!({"vessel_id": storm, "depart_date": depart})).await;
        let visit = created_id(
            app,
            "/visits",
            json!({"voyage_id": voyage, "bank_id": bank_id, "arrival_date": arrival, "quality": "good"}),
        )
        .await;
        for (species, weight) in catches {
            created_id(app, "/catches", json!({"visit_id": visit, "species": species, "weight": weight})).await;
        }
    }
    (north, south)
}

#[tokio::test]
async fn health_check_responds() {
    let app = app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn registered_user_is_returned_with_hash_and_role() {
    let app = app();
    let (status, body) = post(
        &app,
        "/users",
        json!({"username": "anna", "password_hash": "$argon2id$stub", "role": "admin"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"msg": "created"}));

    let (status, body) = get(&app, "/users/anna").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "anna");
    assert_eq!(body["password_hash"], "$argon2id$stub");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn duplicate_username_is_rejected_and_store_unchanged() {
    let app = app();
    let user = json!({"username": "anna", "password_hash": "first", "role": "user"});
    assert_eq!(post(&app, "/users", user).await.0, StatusCode::CREATED);

    let (status, body) = post(
        &app,
        "/users",
        json!({"username": "anna", "password_hash": "second", "role": "admin"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Пользователь уже существует");

    let (_, stored) = get(&app, "/users/anna").await;
    assert_eq!(stored["password_hash"], "first");
    assert_eq!(stored["role"], "user");

    let (_, users) = get(&app, "/users").await;
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let (status, body) = get(&app(), "/users/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Не найдено");
}

#[tokio::test]
async fn created_vessel_carries_generated_id() {
    let app = app();
    let (status, vessel) = post(&app, "/vessels", json!({"name": "Storm", "type": "seiner"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(vessel["name"], "Storm");
    assert_eq!(vessel["type"], "seiner");

    let id = vessel["id"].as_i64().unwrap();
    let (status, fetched) = get(&app, &format!("/vessels/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, vessel);
}

#[tokio::test]
async fn dangling_foreign_key_is_a_bad_request() {
    let app = app();
    let (status, body) = post(&app, "/voyages", json!({"vessel_id": 42, "depart_date": "2024-05-01"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Связанная запись не найдена"));

    let (_, voyages) = get(&app, "/voyages").await;
    assert_eq!(voyages, json!([]));
}

#[tokio::test]
async fn missing_required_field_is_a_bad_request() {
    let app = app();
    let (status, body) = post(&app, "/catches", json!({"visit_id": 1, "weight": 3})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Некорректное тело запроса");
}

#[tokio::test]
async fn negative_weight_is_rejected() {
    let app = app();
    storm_fleet(&app).await;
    let (status, _) = post(&app, "/catches", json!({"visit_id": 1, "species": "cod", "weight": -1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weights_beyond_stored_precision_are_rejected_and_reports_keep_working() {
    let app = app();
    storm_fleet(&app).await;

    for weight in [json!(5e28), json!(1000000000), json!(1.2345)] {
        let (status, body) = post(&app, "/catches", json!({"visit_id": 1, "species": "cod", "weight": weight})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "weight {weight} was accepted");
        assert!(body["error"].as_str().unwrap().contains("weight"));
    }

    let (status, body) = get(&app, "/reports/top-vessels").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"vessel": "Storm", "total": 35.0}]));
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() {
    let (status, body) = get(&app(), "/vessels/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Некорректный идентификатор");

    let (status, body) = get(&app(), "/reports/above-average/north").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Некорректный идентификатор");
}

#[tokio::test]
async fn list_filters_narrow_results() {
    let app = app();
    let (north, _) = storm_fleet(&app).await;

    let (_, visits) = get(&app, &format!("/visits?bank_id={north}")).await;
    assert_eq!(visits.as_array().unwrap().len(), 1);

    let (_, cod) = get(&app, "/catches?species=cod").await;
    assert_eq!(cod.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn top_vessels_sums_the_whole_fleet() {
    let app = app();
    storm_fleet(&app).await;

    let (status, body) = get(&app, "/reports/top-vessels").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"vessel": "Storm", "total": 35.0}]));

    let (_, cod) = get(&app, "/reports/top-vessels?species=cod").await;
    assert_eq!(cod, json!([{"vessel": "Storm", "total": 15.0}]));
}

#[tokio::test]
async fn top_vessels_date_range_is_inclusive_and_blank_means_absent() {
    let app = app();
    storm_fleet(&app).await;

    let (_, body) = get(&app, "/reports/top-vessels?date_from=2024-05-10&date_to=2024-05-10").await;
    assert_eq!(body[0]["total"], json!(15.0));

    let (_, body) = get(&app, "/reports/top-vessels?species=&date_from=&date_to=").await;
    assert_eq!(body[0]["total"], json!(35.0));
}

#[tokio::test]
async fn malformed_report_date_is_a_bad_request() {
    let app = app();
    let (status, body) = get(&app, "/reports/top-vessels?date_from=10.05.2024").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_bank_reports_are_empty() {
    let app = app();
    storm_fleet(&app).await;

    let (status, body) = get(&app, "/reports/above-average/999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = get(&app, "/reports/species-bank?bank_id=999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn bank_average_report_ranks_banks() {
    let app = app();
    storm_fleet(&app).await;

    let (status, body) = get(&app, "/reports/avg-catch-per-bank").await;
    assert_eq!(status, StatusCode::OK);
    let banks: Vec<&str> = body.as_array().unwrap().iter().map(|r| r["bank"].as_str().unwrap()).collect();
    assert_eq!(banks, vec!["South", "North"]);
}

#[tokio::test]
async fn above_average_lists_vessels_beating_the_bank_mean() {
    let app = app();
    let (north, _) = storm_fleet(&app).await;

    // Gull lands 3 at North on 2024-07-01; North's mean is (15 + 3) / 2 = 9.
    let gull = created_id(&app, "/vessels", json!({"name": "Gull"})).await;
    let voyage = created_id(&app, "/voyages", json!({"vessel_id": gull, "depart_date": "2024-06-28"})).await;
    let visit = created_id(
        &app,
        "/visits",
        json!({"voyage_id": voyage, "bank_id": north, "arrival_date": "2024-07-01", "quality": "poor"}),
    )
    .await;
    created_id(&app, "/catches", json!({"visit_id": visit, "species": "cod", "weight": 3})).await;

    let (status, body) = get(&app, &format!("/reports/above-average/{north}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"vessel": "Storm", "average": 15.0}]));

    // Storm alone in May has nobody to beat.
    let (_, body) = get(&app, &format!("/reports/above-average/{north}?date_to=2024-05-31")).await;
    assert_eq!(body, json!([]));
}
