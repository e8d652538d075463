use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use orchest_core::extract::{Json, Path};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::app::{
    AppState,
    model::{JobStatus, job, project},
    response::{ApiError, CreateJob, Job, JobList, MessageResponse, UpdateJob},
};

pub struct JobsController;

#[orchest_macros::controller(namespace = "jobs", state = AppState)]
impl JobsController {
    #[orchest_macros::get("/jobs/")]
    #[orchest_macros::utoipa_response(status = 200, body = JobList, description = "All jobs")]
    pub async fn index(State(state): State<AppState>) -> Result<Json<JobList>, ApiError> {
        let jobs = job::Entity::find()
            .order_by_asc(job::Column::CreatedTime)
            .all(&state.db)
            .await?;

        Ok(Json(JobList {
            jobs: jobs.into_iter().map(Job::from).collect(),
        }))
    }

    #[orchest_macros::post("/jobs/")]
    #[orchest_macros::utoipa_response(status = 201, body = Job, description = "Draft job created")]
    #[orchest_macros::utoipa_response(status = 400, body = MessageResponse, description = "Invalid job")]
    #[orchest_macros::utoipa_response(status = 404, body = MessageResponse, description = "Project not found")]
    pub async fn create(
        State(state): State<AppState>,
        Json(payload): Json<CreateJob>,
    ) -> Result<(StatusCode, Json<Job>), ApiError> {
        let name = payload.name.trim();
        if name.is_empty() {
            return Err(ApiError::BadRequest("job name must not be empty".into()));
        }

        let project = project::Entity::find_by_id(payload.project_uuid.clone())
            .one(&state.db)
            .await?;
        if project.is_none() {
            return Err(ApiError::NotFound(format!(
                "project `{}` not found",
                payload.project_uuid
            )));
        }

        let model = job::ActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_owned()),
            project_uuid: Set(payload.project_uuid),
            pipeline_uuid: Set(payload.pipeline_uuid),
            status: Set(JobStatus::Draft),
            created_time: Set(Utc::now()),
        }
        .insert(&state.db)
        .await?;

        tracing::info!(uuid = %model.uuid, project = %model.project_uuid, "job created");

        Ok((StatusCode::CREATED, Json(model.into())))
    }

    #[orchest_macros::get("/jobs/{uuid}")]
    #[orchest_macros::utoipa_response(status = 200, body = Job, description = "The job")]
    #[orchest_macros::utoipa_response(status = 404, body = MessageResponse, description = "Job not found")]
    pub async fn show(
        State(state): State<AppState>,
        Path(uuid): Path<String>,
    ) -> Result<Json<Job>, ApiError> {
        let model = find_job(&state, &uuid).await?;

        Ok(Json(model.into()))
    }

    #[orchest_macros::put("/jobs/{uuid}")]
    #[orchest_macros::utoipa_response(status = 200, body = Job, description = "Job updated")]
    #[orchest_macros::utoipa_response(status = 400, body = MessageResponse, description = "Invalid update")]
    #[orchest_macros::utoipa_response(status = 404, body = MessageResponse, description = "Job not found")]
    pub async fn update(
        State(state): State<AppState>,
        Path(uuid): Path<String>,
        Json(payload): Json<UpdateJob>,
    ) -> Result<Json<Job>, ApiError> {
        let model = find_job(&state, &uuid).await?;

        if payload.name.is_none() && payload.status.is_none() {
            return Ok(Json(model.into()));
        }

        let mut active: job::ActiveModel = model.into();
        if let Some(name) = payload.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ApiError::BadRequest("job name must not be empty".into()));
            }
            active.name = Set(name.to_owned());
        }
        if let Some(status) = payload.status {
            active.status = Set(status);
        }

        let model = active.update(&state.db).await?;
        tracing::info!(uuid = %model.uuid, status = ?model.status, "job updated");

        Ok(Json(model.into()))
    }

    #[orchest_macros::delete("/jobs/{uuid}")]
    #[orchest_macros::utoipa_response(status = 200, body = MessageResponse, description = "Job deleted")]
    #[orchest_macros::utoipa_response(status = 404, body = MessageResponse, description = "Job not found")]
    pub async fn delete(
        State(state): State<AppState>,
        Path(uuid): Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let result = job::Entity::delete_by_id(uuid.clone()).exec(&state.db).await?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound(format!("job `{uuid}` not found")));
        }

        tracing::info!(%uuid, "job deleted");

        Ok(Json(MessageResponse::new("job deleted")))
    }
}

async fn find_job(state: &AppState, uuid: &str) -> Result<job::Model, ApiError> {
    job::Entity::find_by_id(uuid.to_owned())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("job `{uuid}` not found")))
}
