use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use orchest_core::extract::{Json, Path};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::app::{
    AppState,
    model::project,
    response::{ApiError, CreateProject, MessageResponse, Project, ProjectList},
};

pub struct ProjectsController;

#[orchest_macros::controller(namespace = "projects", state = AppState)]
impl ProjectsController {
    #[orchest_macros::get("/projects/")]
    #[orchest_macros::utoipa_response(status = 200, body = ProjectList, description = "All projects")]
    pub async fn index(State(state): State<AppState>) -> Result<Json<ProjectList>, ApiError> {
        let projects = project::Entity::find()
            .order_by_asc(project::Column::CreatedTime)
            .all(&state.db)
            .await?;

        Ok(Json(ProjectList {
            projects: projects.into_iter().map(Project::from).collect(),
        }))
    }

    #[orchest_macros::post("/projects/")]
    #[orchest_macros::utoipa_response(status = 201, body = Project, description = "Project created")]
    #[orchest_macros::utoipa_response(status = 400, body = MessageResponse, description = "Invalid project")]
    #[orchest_macros::utoipa_response(status = 409, body = MessageResponse, description = "Path already taken")]
    pub async fn create(
        State(state): State<AppState>,
        Json(payload): Json<CreateProject>,
    ) -> Result<(StatusCode, Json<Project>), ApiError> {
        let path = payload.path.trim();
        if path.is_empty() {
            return Err(ApiError::BadRequest("project path must not be empty".into()));
        }

        let existing = project::Entity::find()
            .filter(project::Column::Path.eq(path))
            .one(&state.db)
            .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(format!("a project already lives at `{path}`")));
        }

        let model = project::ActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            path: Set(path.to_owned()),
            created_time: Set(Utc::now()),
        }
        .insert(&state.db)
        .await?;

        tracing::info!(uuid = %model.uuid, path = %model.path, "project created");

        Ok((StatusCode::CREATED, Json(model.into())))
    }

    #[orchest_macros::get("/projects/{uuid}")]
    #[orchest_macros::utoipa_response(status = 200, body = Project, description = "The project")]
    #[orchest_macros::utoipa_response(status = 404, body = MessageResponse, description = "Project not found")]
    pub async fn show(
        State(state): State<AppState>,
        Path(uuid): Path<String>,
    ) -> Result<Json<Project>, ApiError> {
        let model = project::Entity::find_by_id(uuid.clone())
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("project `{uuid}` not found")))?;

        Ok(Json(model.into()))
    }

    /// Deleting a project removes its jobs too.
    #[orchest_macros::delete("/projects/{uuid}")]
    #[orchest_macros::utoipa_response(status = 200, body = MessageResponse, description = "Project deleted")]
    #[orchest_macros::utoipa_response(status = 404, body = MessageResponse, description = "Project not found")]
    pub async fn delete(
        State(state): State<AppState>,
        Path(uuid): Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let result = project::Entity::delete_by_id(uuid.clone())
            .exec(&state.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound(format!("project `{uuid}` not found")));
        }

        tracing::info!(%uuid, "project deleted");

        Ok(Json(MessageResponse::new("project deleted")))
    }
}
