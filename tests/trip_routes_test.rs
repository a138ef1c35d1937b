mod common;

use actix_web::test;
use serde_json::json;
use serial_test::serial;

use common::{bearer_token, TestApp};

#[actix_rt::test]
#[serial]
async fn test_create_trip_rejects_malformed_dates() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .insert_header(("Authorization", format!("Bearer {}", bearer_token())))
        .set_json(&json!({
            "city": "Kyoto",
            "startDate": "next tuesday",
            "endDate": "2026-04-06",
            "notes": "cherry blossoms",
            "final_plan": "Day 1: Kyoto Exploration"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("startDate"));
}

#[actix_rt::test]
#[serial]
async fn test_create_trip_rejects_missing_dates() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .insert_header(("Authorization", format!("Bearer {}", bearer_token())))
        .set_json(&json!({ "city": "Kyoto" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_create_trip_rejects_reversed_date_range() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .insert_header(("Authorization", format!("Bearer {}", bearer_token())))
        .set_json(&json!({
            "city": "Kyoto",
            "startDate": "2026-04-06",
            "endDate": "2026-04-02"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("startDate must not be after endDate"));
}

#[actix_rt::test]
#[serial]
async fn test_create_trip_requires_city() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .insert_header(("Authorization", format!("Bearer {}", bearer_token())))
        .set_json(&json!({
            "startDate": "2026-04-02",
            "endDate": "2026-04-06"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_get_trip_with_malformed_id_is_not_found() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/trips/not-a-real-id")
        .insert_header(("Authorization", format!("Bearer {}", bearer_token())))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Trip not found");
}

#[actix_rt::test]
#[serial]
async fn test_save_trip_rejects_incomplete_body() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/save-trip")
        .insert_header(("Authorization", format!("Bearer {}", bearer_token())))
        .set_json(&json!({ "city": "Kyoto" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
