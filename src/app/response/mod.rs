use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::app::model::{JobStatus, job, project};

pub use orchest_core::response::{ApiError, MessageResponse};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Project {
    pub uuid: String,
    pub path: String,
    pub created_time: DateTime<Utc>,
}

impl From<project::Model> for Project {
    fn from(model: project::Model) -> Self {
        Project {
            uuid: model.uuid,
            path: model.path,
            created_time: model.created_time,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectList {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateProject {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Job {
    pub uuid: String,
    pub name: String,
    pub project_uuid: String,
    pub pipeline_uuid: String,
    pub status: JobStatus,
    pub created_time: DateTime<Utc>,
}

impl From<job::Model> for Job {
    fn from(model: job::Model) -> Self {
        Job {
            uuid: model.uuid,
            name: model.name,
            project_uuid: model.project_uuid,
            pipeline_uuid: model.pipeline_uuid,
            status: model.status,
            created_time: model.created_time,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobList {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateJob {
    pub name: String,
    pub project_uuid: String,
    pub pipeline_uuid: String,
}

/// Fields left out are kept as they are.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateJob {
    pub name: Option<String>,
    pub status: Option<JobStatus>,
}
