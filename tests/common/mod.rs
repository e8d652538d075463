#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use orchest_api::{Application, bootstrap};
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tower::ServiceExt;

/// A config file and database living in their own temporary directory.
pub struct Fixture {
    pub dir: TempDir,
    pub config_path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let config_path = dir.path().join("config.toml");
        let database = dir.path().join("orchest.db");

        std::fs::write(
            &config_path,
            format!(
                "[server]\nhost = \"127.0.0.1\"\nport = 0\n\n[database]\nurl = \"sqlite://{}?mode=rwc\"\n",
                database.display()
            ),
        )
        .expect("write config");

        Fixture { dir, config_path }
    }

    pub fn database_path(&self) -> PathBuf {
        self.dir.path().join("orchest.db")
    }

    pub async fn app(&self) -> Application {
        bootstrap::create_app(&self.config_path)
            .await
            .expect("bootstrap succeeds")
    }

    pub async fn router(&self) -> Router {
        self.app().await.into_router().expect("router builds")
    }
}

pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, contents).expect("write config");
    path
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.expect("request is served")
}

pub async fn json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}
