//! Login, keyword lookup, query tickets and service plumbing.

mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn login_accepts_seeded_accounts() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/login",
            json!({ "username": "manager1", "password": "manager123" }),
        )
        .await;
    assert_eq!(status, 200, "login failed: {body}");
    assert_eq!(body["username"], "manager1");
    assert_eq!(body["role"], "Manager");
    assert!(body["id"].as_i64().is_some());
    assert!(body.get("password").is_none(), "password leaked: {body}");

    let (status, _) = app
        .post(
            "/api/v1/login",
            json!({ "username": "worker1", "password": "worker123" }),
        )
        .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn login_rejects_bad_credentials_uniformly() {
    let app = TestApp::new().await;

    let (status, wrong_password) = app
        .post(
            "/api/v1/login",
            json!({ "username": "manager1", "password": "nope" }),
        )
        .await;
    assert_eq!(status, 401);

    let (status, unknown_user) = app
        .post(
            "/api/v1/login",
            json!({ "username": "ghost", "password": "nope" }),
        )
        .await;
    assert_eq!(status, 401);

    // Same message either way, so callers cannot probe for usernames
    assert_eq!(wrong_password["message"], unknown_user["message"]);
}

#[tokio::test]
async fn lookup_summarizes_a_worker_with_entries() {
    let app = TestApp::new().await;

    let (_, project) = app
        .post("/api/v1/projects", json!({ "name": "Bridge" }))
        .await;
    let project_id = project["id"].as_i64().expect("id");
    let (_, worker) = app
        .post(
            "/api/v1/workers",
            json!({
                "name": "Ann",
                "role": "Engineer",
                "assigned_project_id": project_id
            }),
        )
        .await;
    let worker_id = worker["id"].as_i64().expect("id");

    // One closed shift, timestamps already in the reference offset
    let (status, _) = app
        .post(
            "/api/v1/clockin",
            json!({
                "worker_id": worker_id,
                "project_id": project_id,
                "timestamp": "2024-01-01T09:00:00+05:30"
            }),
        )
        .await;
    assert_eq!(status, 201);
    let (status, _) = app
        .post(
            "/api/v1/clockout",
            json!({
                "worker_id": worker_id,
                "timestamp": "2024-01-01T17:00:00+05:30"
            }),
        )
        .await;
    assert_eq!(status, 200);

    // Case-insensitive substring finds her
    let (status, body) = app
        .post("/api/v1/chatbot", json!({ "message": "ann" }))
        .await;
    assert_eq!(status, 200);
    let text = body["response"].as_str().expect("response");
    assert!(text.contains("Worker: Ann"), "missing header: {text}");
    assert!(text.contains("Role: Engineer"), "missing role: {text}");
    assert!(
        text.contains("Assigned project: Bridge"),
        "missing assignment: {text}"
    );
    assert!(
        text.contains("- 2024-01-01 09:00 -> 2024-01-01 17:00"),
        "entries render at minute precision: {text}"
    );
}

#[tokio::test]
async fn lookup_renders_open_entry_as_in_progress() {
    let app = TestApp::new().await;

    let (_, project) = app
        .post("/api/v1/projects", json!({ "name": "Bridge" }))
        .await;
    let project_id = project["id"].as_i64().expect("id");
    let (_, worker) = app
        .post(
            "/api/v1/workers",
            json!({ "name": "Ann", "role": "Engineer" }),
        )
        .await;
    let worker_id = worker["id"].as_i64().expect("id");

    let (status, _) = app
        .post(
            "/api/v1/clockin",
            json!({
                "worker_id": worker_id,
                "project_id": project_id,
                "timestamp": "2024-01-01T09:00:00+05:30"
            }),
        )
        .await;
    assert_eq!(status, 201);

    let (_, body) = app
        .post("/api/v1/chatbot", json!({ "message": "Ann" }))
        .await;
    let text = body["response"].as_str().expect("response");
    assert!(
        text.contains("- 2024-01-01 09:00 -> In progress"),
        "open entry should show as in progress: {text}"
    );
    assert!(text.contains("Assigned project: None"), "{text}");
}

#[tokio::test]
async fn lookup_prefers_workers_over_projects() {
    let app = TestApp::new().await;

    let (_, _) = app
        .post("/api/v1/projects", json!({ "name": "Annex" }))
        .await;
    let (_, _) = app
        .post(
            "/api/v1/workers",
            json!({ "name": "Ann", "role": "Engineer" }),
        )
        .await;

    // "ann" hits both the worker Ann and the project Annex; the worker wins
    let (_, body) = app
        .post("/api/v1/chatbot", json!({ "message": "ann" }))
        .await;
    let text = body["response"].as_str().expect("response");
    assert!(text.starts_with("Worker: Ann"), "{text}");
}

#[tokio::test]
async fn lookup_summarizes_a_project_roster() {
    let app = TestApp::new().await;

    let (_, project) = app
        .post(
            "/api/v1/projects",
            json!({ "name": "Bridge", "status": "Active" }),
        )
        .await;
    let project_id = project["id"].as_i64().expect("id");

    for (name, role) in [("Ann", "Engineer"), ("Bob", "Welder")] {
        let (_, _) = app
            .post(
                "/api/v1/workers",
                json!({
                    "name": name,
                    "role": role,
                    "assigned_project_id": project_id
                }),
            )
            .await;
    }

    let (_, body) = app
        .post("/api/v1/chatbot", json!({ "message": "bridge" }))
        .await;
    let text = body["response"].as_str().expect("response");
    assert!(text.contains("Project: Bridge"), "{text}");
    assert!(text.contains("Status: Active"), "{text}");
    assert!(text.contains("- Ann (Engineer)"), "{text}");
    assert!(text.contains("- Bob (Welder)"), "{text}");
}

#[tokio::test]
async fn lookup_accepts_legacy_query_field() {
    let app = TestApp::new().await;

    let (_, _) = app
        .post(
            "/api/v1/workers",
            json!({ "name": "Ann", "role": "Engineer" }),
        )
        .await;

    // Older clients post `query` instead of `message`
    let (status, body) = app
        .post("/api/v1/chatbot", json!({ "query": "ann" }))
        .await;
    assert_eq!(status, 200);
    let text = body["response"].as_str().expect("response");
    assert!(text.starts_with("Worker: Ann"), "{text}");
}

#[tokio::test]
async fn lookup_reports_misses() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/api/v1/chatbot", json!({ "message": "nonexistent" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        body["response"],
        "No worker or project matching 'nonexistent' was found."
    );
}

#[tokio::test]
async fn query_tickets_default_and_list_newest_first() {
    let app = TestApp::new().await;

    let (status, first) = app
        .post(
            "/api/v1/queries",
            json!({
                "title": "Missing timesheet",
                "description": "Ann's Monday shift is not recorded",
                "worker_name": "Ann",
                "project_name": "Bridge"
            }),
        )
        .await;
    assert_eq!(status, 201, "ticket creation failed: {first}");
    assert_eq!(first["priority"], "medium");
    assert_eq!(first["status"], "open");

    let (status, second) = app
        .post(
            "/api/v1/queries",
            json!({
                "title": "Broken gate badge",
                "description": "Badge reader rejects Bob",
                "worker_name": "Bob",
                "project_name": "Bridge",
                "priority": "high"
            }),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(second["priority"], "high");

    let (status, tickets) = app.get("/api/v1/queries").await;
    assert_eq!(status, 200);
    let tickets = tickets.as_array().expect("tickets");
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0]["title"], "Broken gate badge");
    assert_eq!(tickets[1]["title"], "Missing timesheet");
}

#[tokio::test]
async fn banner_and_health_respond() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/").await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Backend running successfully");

    let (status, body) = app.get("/health").await;
    assert_eq!(status, 200, "health check failed: {body}");
    assert_eq!(body["status"], "ok");
}
