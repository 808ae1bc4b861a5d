mod helpers;

use axum::http::StatusCode;
use db::models::user::Model as UserModel;
use helpers::{login_as, make_app, send_json};
use serde_json::json;

#[tokio::test]
async fn login_returns_token_for_valid_credentials() {
    let (app, db) = make_app().await;
    UserModel::create(&db, "ms_joshi", "joshi@school.test", "secret-pw", false)
        .await
        .unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": "ms_joshi", "password": "secret-pw"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["data"]["username"], "ms_joshi");
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_user_identically() {
    let (app, db) = make_app().await;
    UserModel::create(&db, "ms_joshi", "joshi@school.test", "secret-pw", false)
        .await
        .unwrap();

    let (status_wrong, body_wrong) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": "ms_joshi", "password": "nope"})),
    )
    .await;
    let (status_unknown, body_unknown) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": "nobody", "password": "nope"})),
    )
    .await;

    assert_eq!(status_wrong, StatusCode::UNAUTHORIZED);
    assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(body_wrong["message"], body_unknown["message"]);
}

#[tokio::test]
async fn me_returns_the_account_behind_the_token() {
    let (app, db) = make_app().await;
    let token = login_as(&db, "mr_rao", false).await;

    let (status, body) = send_json(&app, "GET", "/api/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "mr_rao");
    assert_eq!(body["data"]["admin"], false);
}

#[tokio::test]
async fn me_rejects_missing_token() {
    let (app, _db) = make_app().await;

    let (status, _body) = send_json(&app, "GET", "/api/auth/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_non_admin_tokens() {
    let (app, db) = make_app().await;
    let teacher = login_as(&db, "mr_rao", false).await;
    let admin = login_as(&db, "principal", true).await;

    let (status_teacher, _) = send_json(&app, "GET", "/api/users", Some(&teacher), None).await;
    let (status_admin, _) = send_json(&app, "GET", "/api/users", Some(&admin), None).await;

    assert_eq!(status_teacher, StatusCode::FORBIDDEN);
    assert_eq!(status_admin, StatusCode::OK);
}
