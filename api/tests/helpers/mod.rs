use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use db::models::user::Model as UserModel;
use db::test_utils::setup_test_db;
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use util::state::AppState;

/// Full application router over a fresh in-memory database.
pub async fn make_app() -> (Router, DatabaseConnection) {
    let db = setup_test_db().await;
    let state = AppState::new(db.clone());
    let app = Router::new().nest("/api", api::routes::routes(state));
    (app, db)
}

/// Creates a staff account and returns a bearer token for it.
pub async fn login_as(db: &DatabaseConnection, username: &str, admin: bool) -> String {
    let user = UserModel::create(db, username, &format!("{username}@school.test"), "pw123456", admin)
        .await
        .expect("failed to create user");
    let (token, _expiry) = api::auth::generate_jwt(user.id, user.admin);
    token
}

/// Sends one JSON request through the router and decodes the JSON reply.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("failed to build request"),
        None => builder.body(Body::empty()).expect("failed to build request"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let json: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response was not JSON")
    };
    (status, json)
}
