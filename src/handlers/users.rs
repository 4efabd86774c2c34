// handlers/users.rs - /api/Users

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Extension,
};

use super::{form::FormData, Deleted};
use crate::app::AppState;
use crate::database::models::UserModel;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::forms::{AddUserForm, UpdateUserForm};

/// GET /api/Users
pub async fn get_users(State(state): State<AppState>) -> ApiResult<Vec<UserModel>> {
    Ok(ApiResponse::success(state.users.get_users().await?))
}

/// GET /api/Users/me - the signed-in user, looked up by the token's name claim
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<UserModel> {
    Ok(ApiResponse::success(state.users.get_user_by_email(&auth_user.username).await?))
}

/// GET /api/Users/:id (admin)
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<UserModel> {
    Ok(ApiResponse::success(state.users.get_user_by_id(&id).await?))
}

/// POST /api/Users (admin, multipart)
pub async fn create_user(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<UserModel> {
    let mut form = FormData::read(multipart).await?;
    let form = AddUserForm {
        image: form.file("imageFileName"),
        first_name: form.text("firstName"),
        last_name: form.text("lastName"),
        email: form.text("email"),
        phone: form.optional("phone"),
        job_title: form.text("jobTitle"),
        role: form.text("role"),
        street_name: form.text("streetName"),
        postal_code: form.text("postalCode"),
        city: form.text("city"),
    };
    Ok(ApiResponse::created(state.users.create_user(form).await?))
}

/// PUT /api/Users (admin, multipart)
pub async fn update_user(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<UserModel> {
    let mut form = FormData::read(multipart).await?;
    let form = UpdateUserForm {
        id: form.text("id"),
        existing_image_file_name: form.optional("existingImageFileName"),
        new_image: form.file("newImageFileName"),
        first_name: form.text("firstName"),
        last_name: form.text("lastName"),
        email: form.text("email"),
        phone: form.optional("phone"),
        job_title: form.text("jobTitle"),
        role: form.text("role"),
        street_name: form.text("streetName"),
        postal_code: form.text("postalCode"),
        city: form.text("city"),
    };
    Ok(ApiResponse::success(state.users.update_user(form).await?))
}

/// DELETE /api/Users/:id (admin)
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Deleted> {
    state.users.delete_user(&id).await?;
    Ok(ApiResponse::success(Deleted { id }))
}
