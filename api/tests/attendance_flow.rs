mod helpers;

use axum::http::StatusCode;
use db::models::{section, student};
use helpers::{login_as, make_app, send_json};
use serde_json::json;

#[tokio::test]
async fn draft_marks_do_not_touch_stats_until_finalized() {
    let (app, db) = make_app().await;
    let token = login_as(&db, "mr_rao", false).await;
    let sec = section::Model::create(&db, "10-A").await.unwrap();
    let asha = student::Model::create(&db, "10A-01", "Asha", None, sec.id)
        .await
        .unwrap();
    let bilal = student::Model::create(&db, "10A-02", "Bilal", None, sec.id)
        .await
        .unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/attendance",
        Some(&token),
        Some(json!({
            "section_id": sec.id,
            "subject": "Maths",
            "date": "2026-03-02",
            "draft": true,
            "entries": [
                {"student_id": asha.id, "status": "present"},
                {"student_id": bilal.id, "status": "absent"}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["created"], 2);

    // Drafts are invisible to stats.
    let (_, stats) = send_json(
        &app,
        "GET",
        &format!("/api/students/{}/stats", asha.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(stats["data"]["overall_percentage"], 0);
    assert_eq!(stats["data"]["subjects"].as_array().unwrap().len(), 0);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/attendance/finalize",
        Some(&token),
        Some(json!({
            "section_id": sec.id,
            "subject": "Maths",
            "date": "2026-03-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["finalized"], 2);

    let (_, asha_stats) = send_json(
        &app,
        "GET",
        &format!("/api/students/{}/stats", asha.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(asha_stats["data"]["overall_percentage"], 100);
    assert_eq!(asha_stats["data"]["subjects"][0]["subject"], "Maths");
    assert_eq!(asha_stats["data"]["subjects"][0]["percentage"], 100);

    let (_, bilal_stats) = send_json(
        &app,
        "GET",
        &format!("/api/students/{}/stats", bilal.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(bilal_stats["data"]["overall_percentage"], 0);
}

#[tokio::test]
async fn resubmitting_overwrites_the_existing_mark() {
    let (app, db) = make_app().await;
    let token = login_as(&db, "mr_rao", false).await;
    let sec = section::Model::create(&db, "10-B").await.unwrap();
    let chitra = student::Model::create(&db, "10B-01", "Chitra", None, sec.id)
        .await
        .unwrap();

    let submit = |status: &str| {
        json!({
            "section_id": sec.id,
            "subject": "History",
            "date": "2026-03-03",
            "draft": false,
            "entries": [{"student_id": chitra.id, "status": status}]
        })
    };

    let (_, first) = send_json(&app, "POST", "/api/attendance", Some(&token), Some(submit("absent"))).await;
    assert_eq!(first["data"]["created"], 1);

    let (_, second) = send_json(&app, "POST", "/api/attendance", Some(&token), Some(submit("present"))).await;
    assert_eq!(second["data"]["created"], 0);
    assert_eq!(second["data"]["updated"], 1);

    // One record, final status wins, stats follow.
    let (_, records) = send_json(
        &app,
        "GET",
        &format!("/api/attendance?student_id={}", chitra.id),
        Some(&token),
        None,
    )
    .await;
    let rows = records["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "present");

    let (_, stats) = send_json(
        &app,
        "GET",
        &format!("/api/students/{}/stats", chitra.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(stats["data"]["overall_percentage"], 100);
}

#[tokio::test]
async fn committed_marks_cannot_be_demoted_back_to_draft() {
    let (app, db) = make_app().await;
    let token = login_as(&db, "mr_rao", false).await;
    let sec = section::Model::create(&db, "10-C").await.unwrap();
    let dev = student::Model::create(&db, "10C-01", "Dev", None, sec.id)
        .await
        .unwrap();

    let payload = |draft: bool, status: &str| {
        json!({
            "section_id": sec.id,
            "subject": "Physics",
            "date": "2026-03-04",
            "draft": draft,
            "entries": [{"student_id": dev.id, "status": status}]
        })
    };

    send_json(&app, "POST", "/api/attendance", Some(&token), Some(payload(false, "late"))).await;
    // Correction attempt flagged as draft still lands as a committed mark.
    send_json(&app, "POST", "/api/attendance", Some(&token), Some(payload(true, "present"))).await;

    let (_, records) = send_json(
        &app,
        "GET",
        &format!("/api/attendance?student_id={}&draft=false", dev.id),
        Some(&token),
        None,
    )
    .await;
    let rows = records["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "present");
    assert_eq!(rows[0]["draft"], false);
}

#[tokio::test]
async fn attendance_requires_authentication() {
    let (app, _db) = make_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/attendance",
        None,
        Some(json!({
            "section_id": 1,
            "subject": "Maths",
            "date": "2026-03-02",
            "entries": [{"student_id": 1, "status": "present"}]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
