// handlers/mod.rs - one module per API area
//
// Public: /, /health, /api/Auth/*
// JWT:    /api/Users, /api/Clients, /api/Projects, /api/Statuses
// Admin:  JWT plus the X-ADM-API-KEY header, applied per route in app.rs

pub mod auth;
pub mod clients;
pub mod form;
pub mod projects;
pub mod statuses;
pub mod system;
pub mod users;

use serde::Serialize;

/// Body of the 200 response for deletes
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
}
