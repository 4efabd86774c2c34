// handlers/auth.rs - POST /api/Auth/SignUp and POST /api/Auth/SignIn

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::forms::{AuthResult, SignInForm, SignUpForm};

#[derive(Debug, Serialize)]
pub struct SignUpResult {
    pub ok: bool,
    pub message: String,
}

/// POST /api/Auth/SignUp - register, or claim an account an admin created
pub async fn sign_up(
    State(state): State<AppState>,
    form: Result<Json<SignUpForm>, JsonRejection>,
) -> ApiResult<SignUpResult> {
    let Json(form) = form.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let message = state.auth.sign_up(form).await?;
    Ok(ApiResponse::created(SignUpResult { ok: true, message }))
}

/// POST /api/Auth/SignIn - exchange credentials for a JWT
pub async fn sign_in(
    State(state): State<AppState>,
    form: Result<Json<SignInForm>, JsonRejection>,
) -> ApiResult<AuthResult> {
    let Json(form) = form.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let result = state.auth.sign_in(form).await?;
    Ok(ApiResponse::success(result))
}
