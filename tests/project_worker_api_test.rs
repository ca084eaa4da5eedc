//! Project and worker CRUD plus assignment.

mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn project_creation_defaults_and_uniqueness() {
    let app = TestApp::new().await;

    let (status, project) = app
        .post("/api/v1/projects", json!({ "name": "Bridge" }))
        .await;
    assert_eq!(status, 201, "creation failed: {project}");
    assert_eq!(project["name"], "Bridge");
    assert_eq!(project["status"], "Planned");
    assert!(project["description"].is_null());

    // Names are unique
    let (status, body) = app
        .post("/api/v1/projects", json!({ "name": "Bridge" }))
        .await;
    assert_eq!(status, 409, "duplicate name accepted: {body}");
}

#[tokio::test]
async fn project_listing_filters_by_status_substring() {
    let app = TestApp::new().await;

    for (name, status) in [
        ("Bridge", "Active"),
        ("Tunnel", "On Hold"),
        ("Depot", "active"),
    ] {
        let (code, _) = app
            .post(
                "/api/v1/projects",
                json!({ "name": name, "status": status }),
            )
            .await;
        assert_eq!(code, 201);
    }

    // Substring match is case-insensitive on both sides
    let (status, projects) = app.get("/api/v1/projects?status=ACT").await;
    assert_eq!(status, 200);
    let projects = projects.as_array().expect("projects");
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["name"], "Bridge");
    assert_eq!(projects[1]["name"], "Depot");

    // Unfiltered returns everything in creation order
    let (_, all) = app.get("/api/v1/projects").await;
    assert_eq!(all.as_array().expect("projects").len(), 3);
}

#[tokio::test]
async fn project_get_by_id() {
    let app = TestApp::new().await;

    let (_, project) = app
        .post("/api/v1/projects", json!({ "name": "Bridge" }))
        .await;
    let id = project["id"].as_i64().expect("id");

    let (status, fetched) = app.get(&format!("/api/v1/projects/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["name"], "Bridge");

    let (status, _) = app.get("/api/v1/projects/9999").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn worker_creation_validates_initial_assignment() {
    let app = TestApp::new().await;

    let (_, project) = app
        .post("/api/v1/projects", json!({ "name": "Bridge" }))
        .await;
    let project_id = project["id"].as_i64().expect("id");

    let (status, worker) = app
        .post(
            "/api/v1/workers",
            json!({
                "name": "Ann",
                "role": "Engineer",
                "assigned_project_id": project_id
            }),
        )
        .await;
    assert_eq!(status, 201, "creation failed: {worker}");
    assert_eq!(worker["assigned_project_id"], project_id);

    // An initial assignment to a missing project is rejected outright
    let (status, body) = app
        .post(
            "/api/v1/workers",
            json!({
                "name": "Bob",
                "role": "Welder",
                "assigned_project_id": 9999
            }),
        )
        .await;
    assert_eq!(status, 404, "expected missing-project rejection: {body}");

    let (_, workers) = app.get("/api/v1/workers").await;
    assert_eq!(workers.as_array().expect("workers").len(), 1);
}

#[tokio::test]
async fn worker_listing_filters_by_project() {
    let app = TestApp::new().await;

    let (_, bridge) = app
        .post("/api/v1/projects", json!({ "name": "Bridge" }))
        .await;
    let (_, tunnel) = app
        .post("/api/v1/projects", json!({ "name": "Tunnel" }))
        .await;
    let bridge_id = bridge["id"].as_i64().expect("id");
    let tunnel_id = tunnel["id"].as_i64().expect("id");

    for (name, project) in [("Ann", bridge_id), ("Bob", tunnel_id), ("Cara", bridge_id)] {
        let (status, _) = app
            .post(
                "/api/v1/workers",
                json!({
                    "name": name,
                    "role": "Engineer",
                    "assigned_project_id": project
                }),
            )
            .await;
        assert_eq!(status, 201);
    }

    let (status, workers) = app
        .get(&format!("/api/v1/workers?project_id={bridge_id}"))
        .await;
    assert_eq!(status, 200);
    let workers = workers.as_array().expect("workers");
    assert_eq!(workers.len(), 2);
    assert_eq!(workers[0]["name"], "Ann");
    assert_eq!(workers[1]["name"], "Cara");
}

#[tokio::test]
async fn assignment_moves_worker_between_projects() {
    let app = TestApp::new().await;

    let (_, bridge) = app
        .post("/api/v1/projects", json!({ "name": "Bridge" }))
        .await;
    let (_, tunnel) = app
        .post("/api/v1/projects", json!({ "name": "Tunnel" }))
        .await;
    let bridge_id = bridge["id"].as_i64().expect("id");
    let tunnel_id = tunnel["id"].as_i64().expect("id");

    let (_, worker) = app
        .post(
            "/api/v1/workers",
            json!({ "name": "Ann", "role": "Engineer" }),
        )
        .await;
    let worker_id = worker["id"].as_i64().expect("id");
    assert!(worker["assigned_project_id"].is_null());

    let (status, body) = app
        .post(
            &format!("/api/v1/projects/{bridge_id}/assign"),
            json!({ "worker_id": worker_id }),
        )
        .await;
    assert_eq!(status, 200, "assignment failed: {body}");
    assert_eq!(body["message"], "Worker Ann assigned to project Bridge");

    // Reassignment overwrites the previous project
    let (status, _) = app
        .post(
            &format!("/api/v1/projects/{tunnel_id}/assign"),
            json!({ "worker_id": worker_id }),
        )
        .await;
    assert_eq!(status, 200);

    let (_, workers) = app
        .get(&format!("/api/v1/workers?project_id={tunnel_id}"))
        .await;
    let workers = workers.as_array().expect("workers");
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0]["assigned_project_id"], tunnel_id);
}

#[tokio::test]
async fn assignment_rejects_missing_ids_without_side_effects() {
    let app = TestApp::new().await;

    let (_, bridge) = app
        .post("/api/v1/projects", json!({ "name": "Bridge" }))
        .await;
    let bridge_id = bridge["id"].as_i64().expect("id");

    let (_, worker) = app
        .post(
            "/api/v1/workers",
            json!({ "name": "Ann", "role": "Engineer" }),
        )
        .await;
    let worker_id = worker["id"].as_i64().expect("id");

    let (status, _) = app
        .post(
            "/api/v1/projects/9999/assign",
            json!({ "worker_id": worker_id }),
        )
        .await;
    assert_eq!(status, 404);

    let (status, _) = app
        .post(
            &format!("/api/v1/projects/{bridge_id}/assign"),
            json!({ "worker_id": 9999 }),
        )
        .await;
    assert_eq!(status, 404);

    // Ann is still unassigned after both failures
    let (_, workers) = app.get("/api/v1/workers").await;
    let workers = workers.as_array().expect("workers");
    assert_eq!(workers.len(), 1);
    assert!(workers[0]["assigned_project_id"].is_null());
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app.post("/api/v1/projects", json!({ "name": "" })).await;
    assert_eq!(status, 400);

    let (status, _) = app
        .post("/api/v1/workers", json!({ "name": "", "role": "Engineer" }))
        .await;
    assert_eq!(status, 400);
}
