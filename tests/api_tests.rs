mod common;

use academium::{auth::repo_types::Role, tutors::repo_types::Curriculum};
use reqwest::StatusCode;
use serde_json::json;
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};
use uuid::Uuid;

fn in_hours(h: i64) -> String {
    (OffsetDateTime::now_utc() + Duration::hours(h))
        .format(&Rfc3339)
        .unwrap()
}

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;
    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

// ── Registration & Auth ─────────────────────────────────────────

#[tokio::test]
async fn register_returns_message() {
    let app = common::spawn_app().await;
    let (body, status) = app
        .register("Amina", "amina@example.com", "password123", "student")
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn register_duplicate_email_conflicts() {
    let app = common::spawn_app().await;
    app.register("Amina", "amina@example.com", "password123", "student")
        .await;
    let (body, status) = app
        .register("Other", "AMINA@example.com", "password456", "tutor")
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("already"));
}

#[tokio::test]
async fn register_missing_fields_is_bad_request() {
    let app = common::spawn_app().await;
    let (body, status) = app
        .post("/api/auth/register", &json!({ "email": "x@example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn login_token_decodes_to_user_and_role() {
    let app = common::spawn_app().await;
    app.register("Brian", "brian@example.com", "password123", "tutor")
        .await;
    let (body, status) = app.login("brian@example.com", "password123").await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    let claims = app.state.keys.verify(token).unwrap();
    assert_eq!(claims.sub.to_string(), body["user"]["id"].as_str().unwrap());
    assert_eq!(claims.role, Role::Tutor);
    assert_eq!(body["user"]["role"], "tutor");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn login_wrong_password_is_unauthorized() {
    let app = common::spawn_app().await;
    app.register("Brian", "brian@example.com", "password123", "student")
        .await;
    let (_, status) = app.login("brian@example.com", "wrongpassword").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, status) = app.login("nobody@example.com", "password123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_token() {
    let app = common::spawn_app().await;
    let (_, status) = app.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (token, id) = app.student("me@example.com").await;
    let (body, status) = app.get_auth("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["email"], "me@example.com");
}

// ── Tutors ──────────────────────────────────────────────────────

#[tokio::test]
async fn search_filters_by_text_and_curriculum() {
    let app = common::spawn_app().await;
    app.seed_tutor("Jane", "Math", Curriculum::Igcse).await;
    app.seed_tutor("Omar", "Physics", Curriculum::Gcse).await;

    let (body, status) = app.get("/api/tutors/search?q=&curriculum=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (body, _) = app.get("/api/tutors/search?q=math&curriculum=").await;
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Jane");

    let (body, _) = app.get("/api/tutors/search?q=jane&curriculum=IGCSE").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (body, _) = app.get("/api/tutors/search?q=jane&curriculum=GCSE").await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, status) = app.get("/api/tutors/search?curriculum=SAT").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_and_get_tutor() {
    let app = common::spawn_app().await;
    let jane = app.seed_tutor("Jane", "Math", Curriculum::Igcse).await;

    let (body, status) = app.get("/api/tutors").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (body, status) = app.get(&format!("/api/tutors/{}", jane.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hourlyRate"], 25.0);
    assert_eq!(body["curriculum"], "IGCSE");

    let (_, status) = app.get(&format!("/api/tutors/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_tutor_requires_auth() {
    let app = common::spawn_app().await;
    let profile = json!({
        "name": "Grace",
        "subject": "Biology",
        "curriculum": "CBC",
        "hourlyRate": 12.5,
        "online": true
    });
    let (_, status) = app.post("/api/tutors", &profile).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (token, _) = app.student("grace@example.com").await;
    let (body, status) = app.post_auth("/api/tutors", &token, &profile).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"], 0.0);
    assert_eq!(body["sessions"], 0);
    assert_eq!(body["online"], true);
}

// ── Bookings ────────────────────────────────────────────────────

#[tokio::test]
async fn bookings_require_token() {
    let app = common::spawn_app().await;
    let (_, status) = app.get("/api/bookings").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, status) = app.get_auth("/api/bookings", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_booking_ignores_client_status() {
    let app = common::spawn_app().await;
    let tutor = app.seed_tutor("Jane", "Math", Curriculum::Igcse).await;
    let (token, student_id) = app.student("kid@example.com").await;

    let (body, status) = app
        .post_auth(
            "/api/bookings",
            &token,
            &json!({
                "student": student_id,
                "tutor": tutor.id,
                "date": in_hours(1),
                "duration": 60,
                "status": "confirmed",
                "paymentStatus": "paid"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["paymentStatus"], "unpaid");
    assert_eq!(body["student"], student_id);
    assert_eq!(body["tutor"], tutor.id.to_string());
}

#[tokio::test]
async fn create_booking_validates_input() {
    let app = common::spawn_app().await;
    let tutor = app.seed_tutor("Jane", "Math", Curriculum::Igcse).await;
    let (token, _) = app.student("kid@example.com").await;

    let (_, status) = app
        .post_auth(
            "/api/bookings",
            &token,
            &json!({ "tutor": tutor.id, "date": in_hours(1), "duration": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, status) = app
        .post_auth(
            "/api/bookings",
            &token,
            &json!({ "tutor": tutor.id, "date": in_hours(-1), "duration": 60 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, status) = app
        .post_auth(
            "/api/bookings",
            &token,
            &json!({ "tutor": Uuid::new_v4(), "date": in_hours(1), "duration": 60 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, status) = app
        .post_auth(
            "/api/bookings",
            &token,
            &json!({
                "student": Uuid::new_v4(),
                "tutor": tutor.id,
                "date": in_hours(1),
                "duration": 60
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_bookings_only_shows_own_and_populates_tutor() {
    let app = common::spawn_app().await;
    let tutor = app.seed_tutor("Jane", "Math", Curriculum::Igcse).await;
    let (alice, alice_id) = app.student("alice@example.com").await;
    let (bob, _) = app.student("bob@example.com").await;

    for token in [&alice, &bob, &alice] {
        let (body, status) = app
            .post_auth(
                "/api/bookings",
                token,
                &json!({ "tutor": tutor.id, "date": in_hours(2), "duration": 45 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    let (body, status) = app.get_auth("/api/bookings", &alice).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    for b in list {
        assert_eq!(b["student"], alice_id);
        assert_eq!(b["tutor"]["name"], "Jane");
        assert_eq!(b["tutor"]["subject"], "Math");
    }

    let booking_id = list[0]["id"].as_str().unwrap();
    let (body, status) = app
        .get_auth(&format!("/api/bookings/{booking_id}"), &alice)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], booking_id);

    let (_, status) = app
        .get_auth(&format!("/api/bookings/{booking_id}"), &bob)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_with_token_for_unknown_user_is_unauthorized() {
    let app = common::spawn_app().await;
    let tutor = app.seed_tutor("Jane", "Math", Curriculum::Igcse).await;
    let ghost = app.state.keys.sign(Uuid::new_v4(), Role::Student).unwrap();

    let (_, status) = app.get_auth("/api/auth/me", &ghost).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (body, status) = app
        .post_auth(
            "/api/bookings",
            &ghost,
            &json!({ "tutor": tutor.id, "date": in_hours(1), "duration": 60 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{body}");
    assert!(body["message"].is_string());
}

// ── Malformed bodies ────────────────────────────────────────────

#[tokio::test]
async fn wrongly_typed_field_is_bad_request_with_message() {
    let app = common::spawn_app().await;
    let tutor = app.seed_tutor("Jane", "Math", Curriculum::Igcse).await;
    let (token, _) = app.student("kid@example.com").await;

    let (body, status) = app
        .post_auth(
            "/api/bookings",
            &token,
            &json!({ "tutor": tutor.id, "date": in_hours(1), "duration": "60" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string(), "{body}");
}

#[tokio::test]
async fn unparseable_body_is_bad_request_with_message() {
    let app = common::spawn_app().await;
    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());
}
