// handlers/projects.rs - /api/Projects

use axum::extract::{multipart::MultipartRejection, Multipart, Path, State};

use super::{form::FormData, Deleted};
use crate::app::AppState;
use crate::database::models::ProjectModel;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::forms::{AddProjectForm, UpdateProjectForm};
use crate::services::DEFAULT_PROJECT_STATUS;

/// GET /api/Projects
pub async fn get_projects(State(state): State<AppState>) -> ApiResult<Vec<ProjectModel>> {
    Ok(ApiResponse::success(state.projects.get_projects().await?))
}

/// GET /api/Projects/:id
pub async fn get_project(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<ProjectModel> {
    Ok(ApiResponse::success(state.projects.get_project_by_id(&id).await?))
}

/// POST /api/Projects (multipart); new projects start in status STARTED
pub async fn create_project(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ProjectModel> {
    let mut form = FormData::read(multipart).await?;
    let form = AddProjectForm {
        image: form.file("imageFileName"),
        project_name: form.text("projectName"),
        client_id: form.text("clientId"),
        description: form.optional("description"),
        start_date: form.text("startDate"),
        end_date: form.text("endDate"),
        budget: form.decimal("budget")?,
        user_id: form.text("userId"),
    };
    let project = state.projects.create_project(form, DEFAULT_PROJECT_STATUS).await?;
    Ok(ApiResponse::created(project))
}

/// PUT /api/Projects (multipart)
pub async fn update_project(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ProjectModel> {
    let mut form = FormData::read(multipart).await?;
    let form = UpdateProjectForm {
        id: form.text("id"),
        existing_image_file_name: form.optional("existingImageFileName"),
        new_image: form.file("newImageFileName"),
        project_name: form.text("projectName"),
        client_id: form.text("clientId"),
        description: form.optional("description"),
        start_date: form.text("startDate"),
        end_date: form.text("endDate"),
        budget: form.decimal("budget")?,
        user_id: form.text("userId"),
        status_id: form.int("statusId"),
    };
    Ok(ApiResponse::success(state.projects.update_project(form).await?))
}

/// DELETE /api/Projects/:id
pub async fn delete_project(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Deleted> {
    state.projects.delete_project(&id).await?;
    Ok(ApiResponse::success(Deleted { id }))
}
