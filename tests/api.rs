//! End-to-end tests over the full router: auth, ownership scoping, lead
//! conversion and the dashboard endpoint.

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Value};

use clienttrack::{api, jwt::JwtKeys};
use clienttrack_core::db::Database;

fn test_server() -> TestServer {
    let db = Database::open_in_memory().unwrap();
    db.migrate().unwrap();
    let keys = JwtKeys::new("test-secret").unwrap();
    TestServer::new(api::create_router(db, keys)).unwrap()
}

async fn signup(server: &TestServer, name: &str, email: &str) -> String {
    let response = server
        .post("/auth/signup")
        .json(&json!({
            "name": name,
            "email": email,
            "password": "correct horse battery",
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["token"].as_str().unwrap().to_string()
}

fn rfc3339(dt: chrono::DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn lead_body(follow_up: chrono::DateTime<Utc>) -> Value {
    json!({
        "client_name": "Acme",
        "contact_details": "acme@example.com",
        "source": "linkedin",
        "description": "landing page",
        "estimated_revenue": 1200.0,
        "expected_time": rfc3339(follow_up + Duration::days(14)),
        "follow_up_date": rfc3339(follow_up),
    })
}

fn project_body(expected: chrono::DateTime<Utc>, status: Option<&str>) -> Value {
    let mut body = json!({
        "client_name": "Globex",
        "contact_details": "globex@example.com",
        "source": "x",
        "description": "app build",
        "revenue": 5000.0,
        "expected_time": rfc3339(expected),
    });
    if let Some(status) = status {
        body["status"] = json!(status);
    }
    body
}

#[tokio::test]
async fn signup_then_login_round_trip() {
    let server = test_server();
    let token = signup(&server, "Ada", "ada@example.com").await;

    // the signup token works immediately
    server
        .get("/leads")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    let login = server
        .post("/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": "correct horse battery" }))
        .await;
    login.assert_status_ok();
    let body = login.json::<Value>();
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"].get("password_hash").is_none());

    // wrong password and unknown email fail the same way
    let bad_password = server
        .post("/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": "wrong wrong wrong" }))
        .await;
    bad_password.assert_status(StatusCode::UNAUTHORIZED);

    let unknown = server
        .post("/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "correct horse battery" }))
        .await;
    unknown.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        bad_password.json::<Value>()["error"],
        unknown.json::<Value>()["error"]
    );
}

#[tokio::test]
async fn signup_validation() {
    let server = test_server();

    let bad_email = server
        .post("/auth/signup")
        .json(&json!({ "name": "Ada", "email": "not-an-email", "password": "long enough pw" }))
        .await;
    bad_email.assert_status(StatusCode::BAD_REQUEST);

    let short_password = server
        .post("/auth/signup")
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "password": "short" }))
        .await;
    short_password.assert_status(StatusCode::BAD_REQUEST);

    signup(&server, "Ada", "ada@example.com").await;
    let duplicate = server
        .post("/auth/signup")
        .json(&json!({ "name": "Ada2", "email": "ada@example.com", "password": "long enough pw" }))
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn requests_without_valid_token_are_rejected() {
    let server = test_server();

    server.get("/leads").await.assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/projects/dashboard")
        .authorization_bearer("garbage")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/leads")
        .authorization("Token abc")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn leads_are_invisible_across_users() {
    let server = test_server();
    let ada = signup(&server, "Ada", "ada@example.com").await;
    let bob = signup(&server, "Bob", "bob@example.com").await;

    let created = server
        .post("/leads")
        .authorization_bearer(&ada)
        .json(&lead_body(Utc::now()))
        .await;
    created.assert_status_ok();
    let lead_id = created.json::<Value>()["id"].as_str().unwrap().to_string();

    let bobs_view = server.get("/leads").authorization_bearer(&bob).await;
    assert_eq!(bobs_view.json::<Value>().as_array().unwrap().len(), 0);

    // Bob can neither delete nor convert Ada's lead
    server
        .delete(&format!("/leads/{lead_id}"))
        .authorization_bearer(&bob)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .post(&format!("/projects/convert/{lead_id}"))
        .authorization_bearer(&bob)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // and it is still there for Ada
    let adas_view = server.get("/leads").authorization_bearer(&ada).await;
    assert_eq!(adas_view.json::<Value>().as_array().unwrap().len(), 1);

    let deleted = server
        .delete(&format!("/leads/{lead_id}"))
        .authorization_bearer(&ada)
        .await;
    deleted.assert_status_ok();
    assert_eq!(deleted.json::<Value>()["message"], "Lead deleted");
}

#[tokio::test]
async fn convert_copies_fields_and_removes_lead() {
    let server = test_server();
    let ada = signup(&server, "Ada", "ada@example.com").await;

    let lead = server
        .post("/leads")
        .authorization_bearer(&ada)
        .json(&lead_body(Utc::now()))
        .await
        .json::<Value>();
    let lead_id = lead["id"].as_str().unwrap();

    let converted = server
        .post(&format!("/projects/convert/{lead_id}"))
        .authorization_bearer(&ada)
        .await;
    converted.assert_status_ok();
    let project = converted.json::<Value>();

    assert_eq!(project["client_name"], lead["client_name"]);
    assert_eq!(project["contact_details"], lead["contact_details"]);
    assert_eq!(project["source"], lead["source"]);
    assert_eq!(project["description"], lead["description"]);
    assert_eq!(project["revenue"], lead["estimated_revenue"]);
    assert_eq!(project["expected_time"], lead["expected_time"]);
    assert_eq!(project["status"], "in_progress");
    assert_eq!(project["follow_up_notes"], json!([]));

    // the lead is gone; converting again is a 404
    let leads = server.get("/leads").authorization_bearer(&ada).await;
    assert_eq!(leads.json::<Value>().as_array().unwrap().len(), 0);
    server
        .post(&format!("/projects/convert/{lead_id}"))
        .authorization_bearer(&ada)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_update_is_partial_and_owner_scoped() {
    let server = test_server();
    let ada = signup(&server, "Ada", "ada@example.com").await;
    let bob = signup(&server, "Bob", "bob@example.com").await;

    let project = server
        .post("/projects")
        .authorization_bearer(&ada)
        .json(&project_body(Utc::now() + Duration::days(30), None))
        .await
        .json::<Value>();
    let project_id = project["id"].as_str().unwrap();
    assert_eq!(project["status"], "in_progress");

    server
        .put(&format!("/projects/{project_id}"))
        .authorization_bearer(&bob)
        .json(&json!({ "status": "completed" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let updated = server
        .put(&format!("/projects/{project_id}"))
        .authorization_bearer(&ada)
        .json(&json!({ "status": "on_hold" }))
        .await;
    updated.assert_status_ok();
    let updated = updated.json::<Value>();
    assert_eq!(updated["status"], "on_hold");
    assert_eq!(updated["client_name"], project["client_name"]);
    assert_eq!(updated["revenue"], project["revenue"]);
}

#[tokio::test]
async fn follow_up_notes_append() {
    let server = test_server();
    let ada = signup(&server, "Ada", "ada@example.com").await;

    let project = server
        .post("/projects")
        .authorization_bearer(&ada)
        .json(&project_body(Utc::now() + Duration::days(30), None))
        .await
        .json::<Value>();
    let project_id = project["id"].as_str().unwrap();

    server
        .post(&format!("/projects/{project_id}/notes"))
        .authorization_bearer(&ada)
        .json(&json!({ "note": "sent the draft" }))
        .await
        .assert_status_ok();
    let with_notes = server
        .post(&format!("/projects/{project_id}/notes"))
        .authorization_bearer(&ada)
        .json(&json!({ "note": "client replied" }))
        .await
        .json::<Value>();

    let notes = with_notes["follow_up_notes"].as_array().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["note"], "sent the draft");
    assert_eq!(notes[1]["note"], "client replied");
}

#[tokio::test]
async fn dashboard_reports_todays_follow_ups_and_open_revenue() {
    let server = test_server();
    let ada = signup(&server, "Ada", "ada@example.com").await;
    let now = Utc::now();

    // due today
    server
        .post("/leads")
        .authorization_bearer(&ada)
        .json(&lead_body(now))
        .await
        .assert_status_ok();
    // due next week, stays off the feed
    server
        .post("/leads")
        .authorization_bearer(&ada)
        .json(&lead_body(now + Duration::days(7)))
        .await
        .assert_status_ok();

    // open project due today
    server
        .post("/projects")
        .authorization_bearer(&ada)
        .json(&project_body(now, None))
        .await
        .assert_status_ok();
    // completed project due today: excluded from feed and revenue
    server
        .post("/projects")
        .authorization_bearer(&ada)
        .json(&project_body(now, Some("completed")))
        .await
        .assert_status_ok();
    // open project due far in the future: revenue only
    server
        .post("/projects")
        .authorization_bearer(&ada)
        .json(&project_body(now + Duration::days(60), Some("on_hold")))
        .await
        .assert_status_ok();

    let dashboard = server
        .get("/projects/dashboard")
        .authorization_bearer(&ada)
        .await;
    dashboard.assert_status_ok();
    let dashboard = dashboard.json::<Value>();

    let follow_ups = dashboard["follow_ups"].as_array().unwrap();
    assert_eq!(follow_ups.len(), 2);
    let kinds: Vec<_> = follow_ups.iter().map(|f| f["type"].as_str().unwrap()).collect();
    assert!(kinds.contains(&"lead"));
    assert!(kinds.contains(&"project"));

    // 5000 (today) + 5000 (future, on hold); the completed one is excluded
    assert_eq!(dashboard["expected_revenue"], 10000.0);
    assert_eq!(dashboard["leads_count"], 2);
    assert_eq!(dashboard["projects_count"], 3);
    assert_eq!(dashboard["projects_by_status"]["in_progress"], 1);
    assert_eq!(dashboard["projects_by_status"]["on_hold"], 1);
    assert_eq!(dashboard["projects_by_status"]["partially_completed"], 0);
    assert_eq!(dashboard["projects_by_status"]["completed"], 1);
}

#[tokio::test]
async fn dashboard_is_empty_for_a_fresh_account() {
    let server = test_server();
    let ada = signup(&server, "Ada", "ada@example.com").await;

    let dashboard = server
        .get("/projects/dashboard")
        .authorization_bearer(&ada)
        .await
        .json::<Value>();

    assert_eq!(dashboard["follow_ups"], json!([]));
    assert_eq!(dashboard["expected_revenue"], 0.0);
    assert_eq!(dashboard["leads_count"], 0);
    assert_eq!(dashboard["projects_count"], 0);
}
