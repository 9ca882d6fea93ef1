//! Routes end to end: in-memory SurrealDB, local object store in a tempdir

use axum::Router;
use axum::body::Body;
use chrono::{TimeZone, Utc};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::{ReservationDetails, ReservationStatus};
use tablebook_server::auth::JwtConfig;
use tablebook_server::db::repository::ReservationStore;
use tablebook_server::core::config::MEMORY_DATABASE;
use tablebook_server::{Config, ServerState, api::build_app};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret-0123456789abcdef";
const BOUNDARY: &str = "tablebook-test-boundary";

async fn setup() -> (tempfile::TempDir, ServerState) {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config::new(tmp.path().to_string_lossy(), JwtConfig::new(SECRET));
    config.database_path = MEMORY_DATABASE.to_string();
    let state = ServerState::initialize(&config).await.unwrap();
    (tmp, state)
}

fn token(state: &ServerState, user_id: &str) -> String {
    let token = state
        .get_jwt_service()
        .generate_token(user_id, Some("Olivia Owner"))
        .unwrap();
    format!("Bearer {token}")
}

fn multipart_body(listing: &Value) -> Vec<u8> {
    let mut body = Vec::new();
    let mut part = |headers: String, content: &[u8]| {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n{headers}\r\n\r\n").as_bytes());
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    };
    part(
        "Content-Disposition: form-data; name=\"listing\"".to_string(),
        listing.to_string().as_bytes(),
    );
    part(
        "Content-Disposition: form-data; name=\"images\"; filename=\"front.jpg\"\r\nContent-Type: image/jpeg".to_string(),
        &[0xFF, 0xD8, 0xFF, 0xE0],
    );
    part(
        "Content-Disposition: form-data; name=\"menu\"; filename=\"menu.pdf\"\r\nContent-Type: application/pdf".to_string(),
        b"%PDF-1.4 menu",
    );
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn submit_request(auth: Option<&str>) -> Request<Body> {
    let listing = json!({
        "name": "Blue Fin",
        "address": "1 Harbor Rd",
        "latitude": "40.7128",
        "longitude": "-74.0060",
        "capacity": 40,
        "startingPrice": "25.50",
        "additionalInfo": "Free parking. Dogs welcome.",
        "cuisines": ["Seafood"]
    });
    let mut builder = Request::post("/api/restaurants").header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(multipart_body(&listing))).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_is_public() {
    let (_tmp, state) = setup().await;
    let app = build_app(state);

    let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn submission_requires_sign_in() {
    let (_tmp, state) = setup().await;
    let app = build_app(state);

    let (status, body) = send(&app, submit_request(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);
    assert_eq!(body["message"], "Sign in before listing a restaurant");
}

#[tokio::test]
async fn submit_then_browse_and_download() {
    let (_tmp, state) = setup().await;
    let auth = token(&state, "owner-1");
    let app = build_app(state);

    let (status, body) = send(&app, submit_request(Some(&auth))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["navigateTo"], "/restaurants");
    let id = body["restaurant"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["restaurant"]["userId"], "owner-1");

    // detail view is public
    let (status, detail) = send(
        &app,
        Request::get(format!("/api/restaurants/{id}")).body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Blue Fin");
    assert_eq!(detail["additionalInfoItems"], json!(["Free parking", "Dogs welcome"]));
    assert_eq!(detail["openingTime"][0]["from"], "8:00 AM");

    // menu is downloadable through the files route
    let menu_url = detail["menuURL"].as_str().unwrap();
    let path = menu_url.trim_start_matches("http://localhost:3000");
    let response = app
        .clone()
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"%PDF-1.4 menu");

    // owner sees it in their listings
    let (status, mine) = send(
        &app,
        Request::get("/api/restaurants")
            .header(header::AUTHORIZATION, &auth)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn browsing_all_listings_is_public() {
    let (_tmp, state) = setup().await;
    let first = token(&state, "owner-1");
    let second = token(&state, "owner-2");
    let app = build_app(state);

    for auth in [&first, &second] {
        let (status, body) = send(&app, submit_request(Some(auth))).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    let (status, all) = send(
        &app,
        Request::get("/api/restaurants/all").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{all}");
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|listing| listing["name"] == "Blue Fin"));
    assert!(all.iter().all(|listing| listing["openingTime"].is_array()));
}

#[tokio::test]
async fn only_owner_can_overwrite() {
    let (_tmp, state) = setup().await;
    let owner = token(&state, "owner-1");
    let stranger = token(&state, "someone-else");
    let app = build_app(state);

    let (_, body) = send(&app, submit_request(Some(&owner))).await;
    let id = body["restaurant"]["id"].as_str().unwrap().to_string();

    let edit = |auth: &str| {
        Request::put(format!("/api/restaurants/{id}"))
            .header(header::AUTHORIZATION, auth)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "name": "Blue Fin Bistro", "address": "2 Harbor Rd" }).to_string(),
            ))
            .unwrap()
    };

    let (status, body) = send(&app, edit(&stranger)).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    let (status, body) = send(&app, edit(&owner)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["name"], "Blue Fin Bistro");
    assert_eq!(body["userId"], "owner-1");
    assert_eq!(body["imagesUrl"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn unknown_listing_is_not_found() {
    let (_tmp, state) = setup().await;
    let app = build_app(state);

    let (status, body) = send(
        &app,
        Request::get("/api/restaurants/missing").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);
}

#[tokio::test]
async fn file_route_rejects_traversal() {
    let (_tmp, state) = setup().await;
    let app = build_app(state);

    let (status, _) = send(
        &app,
        Request::get("/api/files/hotel_menus/..%2F..%2Fsecret")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert!(status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reservations_accept_flow() {
    let (_tmp, state) = setup().await;
    let auth = token(&state, "staff-1");
    let created = state
        .reservations
        .create(ReservationDetails {
            user_id: "diner-1".to_string(),
            user_name: Some("Dana Diner".to_string()),
            restaurant_id: "listing-1".to_string(),
            restaurant_name: "Blue Fin".to_string(),
            time: Utc.with_ymd_and_hms(2024, 7, 1, 18, 30, 0).unwrap(),
            status: ReservationStatus::Pending,
        })
        .await
        .unwrap();
    let app = build_app(state.clone());

    let (status, _) = send(
        &app,
        Request::get("/api/reservations").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, board) = send(
        &app,
        Request::get("/api/reservations")
            .header(header::AUTHORIZATION, &auth)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["empty"], false);
    assert_eq!(board["reservations"][0]["displayName"], "Dana Diner");

    let accept = Request::post(format!("/api/reservations/{}/accept", created.id))
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let (status, outcome) = send(&app, accept).await;
    assert_eq!(status, StatusCode::OK, "{outcome}");
    assert_eq!(outcome["status"], "accepted");
    assert_eq!(outcome["applied"], true);

    let stored = state.reservations.get(&created.id).await.unwrap().unwrap();
    assert_eq!(stored.details.status, ReservationStatus::Accepted);

    let reject = Request::post(format!("/api/reservations/{}/reject", created.id))
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, reject).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);
}
