mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use orchest_api::app::{
    model::JobStatus,
    response::{Job, JobList, MessageResponse, Project, ProjectList},
};
use serde_json::json;

use common::{Fixture, empty_request, json, json_request, send};

async fn create_project(router: &axum::Router, path: &str) -> Project {
    let response = send(router, json_request("POST", "/api/projects/", json!({ "path": path }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json(response).await
}

async fn create_job(router: &axum::Router, project: &Project, name: &str) -> Job {
    let response = send(
        router,
        json_request(
            "POST",
            "/api/jobs/",
            json!({
                "name": name,
                "project_uuid": project.uuid,
                "pipeline_uuid": "pipeline-1",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json(response).await
}

#[tokio::test]
async fn api_prefix_reaches_the_endpoint_collection() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    let response = send(&router, empty_request("GET", "/api/jobs/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list: JobList = json(response).await;
    assert!(list.jobs.is_empty());

    let response = send(&router, empty_request("GET", "/jobs/")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn any_origin_is_allowed_on_api_paths() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    let request = Request::builder()
        .uri("/api/projects/")
        .header(header::ORIGIN, "https://client.example.org")
        .body(Body::empty())
        .expect("valid request");
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&header::HeaderValue::from_static("*"))
    );
}

#[tokio::test]
async fn any_origin_is_allowed_outside_the_api() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    let request = Request::builder()
        .uri("/not-registered")
        .header(header::ORIGIN, "http://localhost:8000")
        .body(Body::empty())
        .expect("valid request");
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&header::HeaderValue::from_static("*"))
    );
}

#[tokio::test]
async fn preflight_requests_are_answered() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/jobs/")
        .header(header::ORIGIN, "https://elsewhere.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .expect("valid request");
    let response = send(&router, request).await;

    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&header::HeaderValue::from_static("*"))
    );
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn projects_can_be_created_listed_and_deleted() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    let project = create_project(&router, "data-science").await;
    assert_eq!(project.path, "data-science");

    let response = send(&router, empty_request("GET", &format!("/api/projects/{}", project.uuid))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Project = json(response).await;
    assert_eq!(fetched.uuid, project.uuid);

    let response = send(&router, empty_request("GET", "/api/projects/")).await;
    let list: ProjectList = json(response).await;
    assert_eq!(list.projects.len(), 1);

    let response = send(&router, empty_request("DELETE", &format!("/api/projects/{}", project.uuid))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&router, empty_request("GET", &format!("/api/projects/{}", project.uuid))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: MessageResponse = json(response).await;
    assert!(body.message.contains(&project.uuid));
}

#[tokio::test]
async fn project_paths_are_unique_and_non_empty() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    create_project(&router, "shared").await;

    let response = send(&router, json_request("POST", "/api/projects/", json!({ "path": "shared" }))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&router, json_request("POST", "/api/projects/", json!({ "path": "   " }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn jobs_start_as_drafts_and_can_be_updated() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    let project = create_project(&router, "etl").await;
    let job = create_job(&router, &project, "nightly").await;
    assert_eq!(job.status, JobStatus::Draft);
    assert_eq!(job.project_uuid, project.uuid);

    let response = send(
        &router,
        json_request(
            "PUT",
            &format!("/api/jobs/{}", job.uuid),
            json!({ "status": "PENDING", "name": "nightly-run" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Job = json(response).await;
    assert_eq!(updated.status, JobStatus::Pending);
    assert_eq!(updated.name, "nightly-run");

    let response = send(&router, empty_request("GET", "/api/jobs/")).await;
    let list: serde_json::Value = json(response).await;
    assert_eq!(list["jobs"][0]["status"], "PENDING");
    assert_eq!(list["jobs"][0]["uuid"], job.uuid);
}

#[tokio::test]
async fn job_for_unknown_project_is_rejected() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    let response = send(
        &router,
        json_request(
            "POST",
            "/api/jobs/",
            json!({ "name": "orphan", "project_uuid": "nope", "pipeline_uuid": "p" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incomplete_job_body_is_a_bad_request() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    let response = send(&router, json_request("POST", "/api/jobs/", json!({ "name": "x" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = json(response).await;
    assert!(!body.message.is_empty());
}

#[tokio::test]
async fn non_json_body_is_a_bad_request() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/projects/")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"path":"plain"}"#))
        .expect("valid request");
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = json(response).await;
    assert!(body.message.contains("Content-Type"));
}

#[tokio::test]
async fn deleting_a_project_removes_its_jobs() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    let project = create_project(&router, "cleanup").await;
    let job = create_job(&router, &project, "temporary").await;

    let response = send(&router, empty_request("DELETE", &format!("/api/projects/{}", project.uuid))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&router, empty_request("GET", &format!("/api/jobs/{}", job.uuid))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_unknown_job_is_not_found() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    let response = send(&router, empty_request("DELETE", "/api/jobs/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn data_survives_a_restart() {
    let fixture = Fixture::new();

    let router = fixture.router().await;
    let project = create_project(&router, "persistent").await;
    drop(router);

    let router = fixture.router().await;
    let response = send(&router, empty_request("GET", &format!("/api/projects/{}", project.uuid))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_served_under_the_prefix() {
    let fixture = Fixture::new();
    let router = fixture.router().await;

    let response = send(&router, empty_request("GET", "/api/swagger.json")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc: serde_json::Value = json(response).await;
    let paths = doc["paths"].as_object().expect("paths object");
    assert!(paths.contains_key("/api/jobs/"));
    assert!(paths.contains_key("/api/projects/{uuid}"));
}

#[tokio::test]
async fn openapi_document_can_be_written_to_a_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = dir.path().join("api.json");

    orchest_api::docs::generate_docs(&output)
        .await
        .expect("docs written");

    let contents = std::fs::read_to_string(&output).expect("read docs");
    let doc: serde_json::Value = serde_json::from_str(&contents).expect("valid json");
    assert_eq!(doc["info"]["title"], "Orchest API");
}
