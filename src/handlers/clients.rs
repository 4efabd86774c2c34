// handlers/clients.rs - /api/Clients

use axum::extract::{multipart::MultipartRejection, Multipart, Path, State};

use super::{form::FormData, Deleted};
use crate::app::AppState;
use crate::database::models::ClientModel;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::forms::{AddClientForm, UpdateClientForm};

/// GET /api/Clients
pub async fn get_clients(State(state): State<AppState>) -> ApiResult<Vec<ClientModel>> {
    Ok(ApiResponse::success(state.clients.get_clients().await?))
}

/// GET /api/Clients/:id (admin)
pub async fn get_client(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<ClientModel> {
    Ok(ApiResponse::success(state.clients.get_client_by_id(&id).await?))
}

/// POST /api/Clients (admin, multipart)
pub async fn create_client(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ClientModel> {
    let mut form = FormData::read(multipart).await?;
    let form = AddClientForm {
        image: form.file("imageFileName"),
        client_name: form.text("clientName"),
        email: form.text("email"),
        phone: form.optional("phone"),
        street_name: form.text("streetName"),
        postal_code: form.text("postalCode"),
        city: form.text("city"),
        reference: form.optional("reference"),
    };
    Ok(ApiResponse::created(state.clients.create_client(form).await?))
}

/// PUT /api/Clients (admin, multipart)
pub async fn update_client(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ClientModel> {
    let mut form = FormData::read(multipart).await?;
    let form = UpdateClientForm {
        id: form.text("id"),
        existing_image_file_name: form.optional("existingImageFileName"),
        new_image: form.file("newImageFileName"),
        client_name: form.text("clientName"),
        email: form.text("email"),
        phone: form.optional("phone"),
        street_name: form.text("streetName"),
        postal_code: form.text("postalCode"),
        city: form.text("city"),
        reference: form.optional("reference"),
    };
    Ok(ApiResponse::success(state.clients.update_client(form).await?))
}

/// DELETE /api/Clients/:id (admin)
pub async fn delete_client(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Deleted> {
    state.clients.delete_client(&id).await?;
    Ok(ApiResponse::success(Deleted { id }))
}
