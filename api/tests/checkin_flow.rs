mod helpers;

use axum::http::StatusCode;
use db::models::{section, student};
use helpers::{login_as, make_app, send_json};
use serde_json::json;

#[tokio::test]
async fn full_qr_check_in_flow() {
    let (app, db) = make_app().await;
    let token = login_as(&db, "mr_rao", false).await;
    let sec = section::Model::create(&db, "10-A").await.unwrap();
    let asha = student::Model::create(&db, "10A-01", "Asha", None, sec.id)
        .await
        .unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/qr",
        Some(&token),
        Some(json!({"section_id": sec.id, "subject": "Maths"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let code = body["data"]["code"].as_str().unwrap().to_owned();

    // The public display polls for the current token.
    let (status, poll) = send_json(
        &app,
        "GET",
        &format!("/api/checkin/status?code={code}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let qr_token = poll["data"]["token"].as_str().unwrap().to_owned();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/checkin",
        None,
        Some(json!({"code": code, "token": qr_token, "roll_no": "10A-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["student_name"], "Asha");
    assert_eq!(body["data"]["already_marked"], false);

    // A repeat scan succeeds without writing a second record.
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/checkin",
        None,
        Some(json!({"code": code, "token": qr_token, "roll_no": "10A-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["already_marked"], true);

    // The mark is committed and the stats followed immediately.
    let (_, stats) = send_json(
        &app,
        "GET",
        &format!("/api/students/{}/stats", asha.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(stats["data"]["overall_percentage"], 100);
    assert_eq!(stats["data"]["subjects"][0]["subject"], "Maths");
}

#[tokio::test]
async fn check_in_rejects_stale_tokens_and_unknown_students() {
    let (app, db) = make_app().await;
    let token = login_as(&db, "mr_rao", false).await;
    let sec = section::Model::create(&db, "10-A").await.unwrap();
    student::Model::create(&db, "10A-01", "Asha", None, sec.id)
        .await
        .unwrap();

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/qr",
        Some(&token),
        Some(json!({"section_id": sec.id, "subject": "Maths"})),
    )
    .await;
    let code = body["data"]["code"].as_str().unwrap().to_owned();
    let (_, poll) = send_json(
        &app,
        "GET",
        &format!("/api/checkin/status?code={code}"),
        None,
        None,
    )
    .await;
    let qr_token = poll["data"]["token"].as_str().unwrap().to_owned();

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/checkin",
        None,
        Some(json!({"code": code, "token": "deadbeef", "roll_no": "10A-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/checkin",
        None,
        Some(json!({"code": code, "token": qr_token, "roll_no": "99Z-99"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No student matches that roll number");

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/checkin",
        None,
        Some(json!({"code": "nosuchcode", "token": qr_token, "roll_no": "10A-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn allow_list_restricts_who_may_check_in() {
    let (app, db) = make_app().await;
    let token = login_as(&db, "mr_rao", false).await;
    let sec = section::Model::create(&db, "10-A").await.unwrap();
    student::Model::create(&db, "10A-01", "Asha", None, sec.id)
        .await
        .unwrap();
    student::Model::create(&db, "10A-02", "Bilal", None, sec.id)
        .await
        .unwrap();

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/qr",
        Some(&token),
        Some(json!({
            "section_id": sec.id,
            "subject": "Maths",
            "allow_list": ["10A-01"]
        })),
    )
    .await;
    let code = body["data"]["code"].as_str().unwrap().to_owned();
    let (_, poll) = send_json(
        &app,
        "GET",
        &format!("/api/checkin/status?code={code}"),
        None,
        None,
    )
    .await;
    let qr_token = poll["data"]["token"].as_str().unwrap().to_owned();

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/checkin",
        None,
        Some(json!({"code": code, "token": qr_token, "roll_no": "10A-02"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/checkin",
        None,
        Some(json!({"code": code, "token": qr_token, "roll_no": "10A-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn geofenced_sessions_require_nearby_coordinates() {
    let (app, db) = make_app().await;
    let token = login_as(&db, "mr_rao", false).await;
    let sec = section::Model::create(&db, "10-A").await.unwrap();
    student::Model::create(&db, "10A-01", "Asha", None, sec.id)
        .await
        .unwrap();

    // No radius given: the configured default applies.
    let (_, body) = send_json(
        &app,
        "POST",
        "/api/qr",
        Some(&token),
        Some(json!({
            "section_id": sec.id,
            "subject": "Maths",
            "latitude": 18.5204,
            "longitude": 73.8567
        })),
    )
    .await;
    assert_eq!(body["data"]["radius_m"], 100.0);
    let code = body["data"]["code"].as_str().unwrap().to_owned();
    let (_, poll) = send_json(
        &app,
        "GET",
        &format!("/api/checkin/status?code={code}"),
        None,
        None,
    )
    .await;
    let qr_token = poll["data"]["token"].as_str().unwrap().to_owned();

    // Missing coordinates count as out of range.
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/checkin",
        None,
        Some(json!({"code": code, "token": qr_token, "roll_no": "10A-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Mumbai is well outside a 100 m fence around Pune.
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/checkin",
        None,
        Some(json!({
            "code": code, "token": qr_token, "roll_no": "10A-01",
            "latitude": 19.0760, "longitude": 72.8777
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/checkin",
        None,
        Some(json!({
            "code": code, "token": qr_token, "roll_no": "10A-01",
            "latitude": 18.5205, "longitude": 73.8568
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn stopped_sessions_reject_polls_and_scans() {
    let (app, db) = make_app().await;
    let token = login_as(&db, "mr_rao", false).await;
    let sec = section::Model::create(&db, "10-A").await.unwrap();
    student::Model::create(&db, "10A-01", "Asha", None, sec.id)
        .await
        .unwrap();

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/qr",
        Some(&token),
        Some(json!({"section_id": sec.id, "subject": "Maths"})),
    )
    .await;
    let session_id = body["data"]["id"].as_i64().unwrap();
    let code = body["data"]["code"].as_str().unwrap().to_owned();
    let (_, poll) = send_json(
        &app,
        "GET",
        &format!("/api/checkin/status?code={code}"),
        None,
        None,
    )
    .await;
    let qr_token = poll["data"]["token"].as_str().unwrap().to_owned();

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/qr/{session_id}/stop"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], false);

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/checkin/status?code={code}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/checkin",
        None,
        Some(json!({"code": code, "token": qr_token, "roll_no": "10A-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/qr/{session_id}/token"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::GONE);
}
