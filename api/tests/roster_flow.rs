mod helpers;

use axum::http::StatusCode;
use helpers::{login_as, make_app, send_json};
use serde_json::json;

#[tokio::test]
async fn section_and_roster_crud() {
    let (app, db) = make_app().await;
    let token = login_as(&db, "mr_rao", false).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/sections",
        Some(&token),
        Some(json!({"name": "10-A"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let section_id = body["data"]["id"].as_i64().unwrap();

    // Duplicate section names collide.
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/sections",
        Some(&token),
        Some(json!({"name": "10-A"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(json!({
            "roll_no": "10A-01",
            "name": "Asha",
            "section_id": section_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let student_id = body["data"]["id"].as_i64().unwrap();

    // Roll numbers are globally unique.
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(json!({
            "roll_no": "10A-01",
            "name": "Imposter",
            "section_id": section_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/students/{student_id}"),
        Some(&token),
        Some(json!({"name": "Asha R"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Asha R");
    assert_eq!(body["data"]["roll_no"], "10A-01");

    let (_, listing) = send_json(
        &app,
        "GET",
        &format!("/api/students?section_id={section_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(listing["data"]["total"], 1);
    assert_eq!(listing["data"]["students"][0]["name"], "Asha R");

    let (_, sections) = send_json(&app, "GET", "/api/sections", Some(&token), None).await;
    assert_eq!(sections["data"][0]["student_count"], 1);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/students/{student_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/students/{student_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn timetable_slots_are_unique_per_period() {
    let (app, db) = make_app().await;
    let token = login_as(&db, "mr_rao", false).await;

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/sections",
        Some(&token),
        Some(json!({"name": "10-B"})),
    )
    .await;
    let section_id = body["data"]["id"].as_i64().unwrap();

    let slot = json!({
        "subject": "Maths",
        "teacher_id": 1,
        "weekday": 1,
        "period": 3
    });

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/sections/{section_id}/timetable"),
        Some(&token),
        Some(slot.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let slot_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/sections/{section_id}/timetable"),
        Some(&token),
        Some(slot),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/sections/{section_id}/timetable/{slot_id}"),
        Some(&token),
        Some(json!({"period": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["period"], 4);

    let (_, listing) = send_json(
        &app,
        "GET",
        &format!("/api/sections/{section_id}/timetable"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(listing["data"].as_array().unwrap().len(), 1);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/sections/{section_id}/timetable/{slot_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
