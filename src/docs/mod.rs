use std::path::Path;

use axum::Json;
use tokio::io::AsyncWriteExt;
use utoipa::OpenApi;

use crate::app::controller::{JobsControllerApi, ProjectsControllerApi};
use crate::app::response::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    nest(
        (path = "/api", api = ProjectsControllerApi),
        (path = "/api", api = JobsControllerApi)
    ),
    components(schemas(MessageResponse)),
    info(title = "Orchest API", description = "Projects and jobs of an Orchest instance")
)]
pub struct MainApiDoc;

pub async fn swagger() -> Json<utoipa::openapi::OpenApi> {
    Json(MainApiDoc::openapi())
}

pub async fn generate_docs(path: &Path) -> anyhow::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await?;

    let docs = MainApiDoc::openapi().to_pretty_json()?;

    file.write_all(docs.as_bytes()).await?;
    file.flush().await?;

    tracing::info!(path = %path.display(), "OpenAPI document written");

    Ok(())
}
