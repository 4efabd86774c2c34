// handlers/system.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - service information
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Alpha BackOffice API",
            "version": version,
            "description": "Back-office administration of users, clients and projects",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/Auth/SignUp, /api/Auth/SignIn (public)",
                "users": "/api/Users[/me|/:id] (JWT; writes and lookups by id need X-ADM-API-KEY)",
                "clients": "/api/Clients[/:id] (JWT; writes and lookups by id need X-ADM-API-KEY)",
                "projects": "/api/Projects[/:id] (JWT)",
                "statuses": "/api/Statuses (JWT)",
                "images": "/images/:file (public)",
            }
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let database = match &state.db {
        Some(db) => db.health_check().await.map_err(|e| e.to_string()),
        None => Err("database not configured".to_string()),
    };

    match database {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            let err = ApiError::service_unavailable("Database unavailable");
            let mut body = err.to_json();
            body["data"] = json!({
                "status": "degraded",
                "timestamp": now,
                "database": "unreachable"
            });
            (err.status_code(), Json(body))
        }
    }
}
