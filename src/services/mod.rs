pub mod auth_service;
pub mod client_service;
pub mod error;
pub mod forms;
pub mod project_service;
pub mod role_service;
pub mod status_service;
pub mod user_service;
pub mod validation;

pub use auth_service::AuthService;
pub use client_service::ClientService;
pub use error::{ServiceError, ServiceResult};
pub use project_service::{ProjectService, DEFAULT_PROJECT_STATUS};
pub use role_service::RoleService;
pub use status_service::StatusService;
pub use user_service::UserService;
