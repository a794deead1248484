mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use talent_backend::models::review::NewReview;

use common::spawn_app;

fn session_cookie(headers: &axum::http::HeaderMap) -> String {
    let raw = headers["set-cookie"].to_str().unwrap();
    raw.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn profile_visits_are_counted_once_per_session() {
    let app = spawn_app().await;
    app.seed_talent(10, "ada").await;

    let (status, headers, body) = app
        .request(Method::GET, "/api/talent/10", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile_visits"], 1);
    let cookie = session_cookie(&headers);
    assert!(cookie.starts_with("sessionid="));

    let (status, headers, body) = app
        .request_with_headers(Method::GET, "/api/talent/10", None, None, &[("cookie", &cookie)])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile_visits"], 1);
    assert!(headers.get("set-cookie").is_none());

    let (_, _, body) = app
        .request(Method::GET, "/api/talent/10", None, None)
        .await;
    assert_eq!(body["profile_visits"], 2);

    let (status, _) = app.get("/api/talent/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_owner_can_edit_a_profile() {
    let app = spawn_app().await;
    let ada = app.talent(1, "ada").await;
    let bob = app.talent(2, "bob").await;

    // First authenticated request creates the talent.
    let (status, _, body) = app
        .request(
            Method::PATCH,
            "/api/talent/1",
            Some(&ada),
            Some(json!({ "about_me": "Rustacean", "timezone": "Europe/Berlin" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["about_me"], "Rustacean");
    assert_eq!(body["timezone"], "Europe/Berlin");
    assert_eq!(body["discord_profile"], "ada");

    let (status, _, _) = app
        .request(
            Method::PATCH,
            "/api/talent/1",
            None,
            Some(json!({ "about_me": "anon" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Touch bob so he exists, then try to edit ada.
    app.request(Method::PUT, "/api/talent/2/summary", Some(&bob), Some(json!({ "summary": "hi" })))
        .await;
    let (status, _, _) = app
        .request(
            Method::PUT,
            "/api/talent/1/username",
            Some(&bob),
            Some(json!({ "username": "hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = app
        .request(
            Method::PUT,
            "/api/talent/404/username",
            Some(&bob),
            Some(json!({ "username": "ghost" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Permission is checked before the body.
    let (status, _, _) = app
        .request(
            Method::PUT,
            "/api/talent/1/timezone",
            Some(&bob),
            Some(json!({ "timezone": "Not/AZone!" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = app
        .request(
            Method::PUT,
            "/api/talent/1/timezone",
            Some(&ada),
            Some(json!({ "timezone": "Not a zone" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn single_field_endpoints_echo_the_field() {
    let app = spawn_app().await;
    let ada = app.talent(1, "ada").await;

    let cases = [
        ("username", json!({ "username": "ada.l" })),
        ("about-me", json!({ "about_me": "Analytical engines" })),
        ("summary", json!({ "summary": "First programmer" })),
        ("language", json!({ "language": "English" })),
        ("timezone", json!({ "timezone": "Europe/London" })),
        ("avatar", json!({ "avatar": "https://img.example.com/ada.png" })),
    ];
    for (field, body) in cases {
        let (status, _, response) = app
            .request(
                Method::PUT,
                &format!("/api/talent/1/{}", field),
                Some(&ada),
                Some(body.clone()),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}: {}", field, response);
        assert_eq!(response, body);
    }

    let (_, talent) = app.get("/api/talent/1").await;
    assert_eq!(talent["username"], "ada.l");
    assert_eq!(talent["avatar"], "https://img.example.com/ada.png");
}

#[tokio::test]
async fn skills_are_capped_at_five() {
    let app = spawn_app().await;
    let ada = app.talent(1, "ada").await;

    let (status, _, body) = app
        .request(
            Method::PUT,
            "/api/talent/1/skills",
            Some(&ada),
            Some(json!({ "name": ["Rust", "Go", "SQL", "rust"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Go", "Rust", "SQL"]);

    let (status, _, body) = app
        .request(
            Method::PUT,
            "/api/talent/1/skills",
            Some(&ada),
            Some(json!({ "name": ["a", "b", "c", "d", "e", "f"] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You can only select a maximum of 5 skills.");

    let (status, body) = app.get("/api/talent/1/skills").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = app.get("/api/skill").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn list_filters_by_skill_and_sorts_by_rating() {
    let app = spawn_app().await;
    for (id, name) in [(1, "ada"), (2, "bob"), (3, "cyd")] {
        app.seed_talent(id, name).await;
    }
    let store = &app.state.store;
    store
        .replace_talent_skills(1, &["Rust".to_string()])
        .await
        .unwrap();
    store
        .replace_talent_skills(2, &["Go".to_string(), "rust".to_string()])
        .await
        .unwrap();
    for (talent_id, rating) in [(1, 3), (2, 5), (2, 4)] {
        store
            .insert_review(NewReview {
                talent_id,
                company_id: None,
                reviewer_name: "Rev".into(),
                reviewer_organization: "Org".into(),
                review: "ok".into(),
                rating,
            })
            .await
            .unwrap();
    }

    let (_, body) = app.get("/api/talent?skills=RUST").await;
    assert_eq!(body["total"], 2);

    let (_, body) = app.get("/api/talent?skills[]=go").await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], 2);

    let (_, body) = app.get("/api/talent?sort_by=most_experienced").await;
    let ids: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1, 3]);

    let (_, body) = app.get("/api/talent?sort_by=least_experienced").await;
    let ids: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let (status, _) = app.get("/api/talent?sort_by=random").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/talent/2/average-rating").await;
    assert_eq!(body["average_rating"], 4.5);
    let (_, body) = app.get("/api/talent/3/average-rating").await;
    assert!(body["average_rating"].is_null());
    let (status, _) = app.get("/api/talent/99/average-rating").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pagination_rejects_pages_past_the_end() {
    let app = spawn_app().await;
    for id in 1..=3 {
        app.seed_talent(id, "t").await;
    }

    let (status, body) = app.get("/api/talent?page=2&page_size=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["total_pages"], 2);

    let (status, body) = app.get("/api/talent?page=3&page_size=2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid page.");
}

#[tokio::test]
async fn owner_can_delete_profile() {
    let app = spawn_app().await;
    let ada = app.talent(1, "ada").await;
    let bob = app.talent(2, "bob").await;
    app.request(Method::PUT, "/api/talent/1/summary", Some(&ada), Some(json!({ "summary": "x" })))
        .await;

    let (status, _, _) = app
        .request(Method::DELETE, "/api/talent/1", Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = app
        .request(Method::DELETE, "/api/talent/1", Some(&ada), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.state.store.get_talent(1).await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_bodies_do_not_mask_permission_errors() {
    let app = spawn_app().await;
    let ada = app.talent(42, "ada").await;
    let bob = app.talent(77, "bob").await;
    app.request(Method::PUT, "/api/talent/77/summary", Some(&bob), Some(json!({ "summary": "b" })))
        .await;

    let bad = json!({ "username": 5 });
    let (status, _, _) = app
        .request(Method::PUT, "/api/talent/999/username", Some(&ada), Some(bad.clone()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = app
        .request(Method::PUT, "/api/talent/77/username", Some(&ada), Some(bad.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = app
        .request(Method::PATCH, "/api/talent/77", Some(&ada), Some(json!({ "email": [] })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = app
        .request(Method::PUT, "/api/talent/77/skills", Some(&ada), Some(json!({ "name": "x" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = app
        .request(Method::PUT, "/api/talent/42/username", Some(&ada), Some(bad))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn names_and_fields_respect_column_limits() {
    let app = spawn_app().await;
    let ada = app.talent(43, "ada").await;

    let (status, _, _) = app
        .request(
            Method::PUT,
            "/api/talent/43/skills",
            Some(&ada),
            Some(json!({ "name": ["x".repeat(500)] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.state.store.list_skills().await.unwrap().is_empty());

    let (status, _, _) = app
        .request(
            Method::PUT,
            "/api/talent/43/skills",
            Some(&ada),
            Some(json!({ "name": ["y".repeat(100)] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let long_email = format!("{}@example.com", "a".repeat(200));
    let (status, _, _) = app
        .request(
            Method::PATCH,
            "/api/talent/43",
            Some(&ada),
            Some(json!({ "email": long_email })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn timezones_must_exist() {
    let app = spawn_app().await;
    let ada = app.talent(42, "ada").await;

    let (status, _, _) = app
        .request(
            Method::PUT,
            "/api/talent/42/timezone",
            Some(&ada),
            Some(json!({ "timezone": "Mars/Olympus_Mons" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = app
        .request(
            Method::PUT,
            "/api/talent/42/timezone",
            Some(&ada),
            Some(json!({ "timezone": "Asia/Tashkent" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timezone"], "Asia/Tashkent");
}
