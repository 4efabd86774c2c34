pub mod admin_key;
pub mod auth;
pub mod response;

pub use admin_key::{require_admin_api_key, ADMIN_API_KEY_HEADER};
pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
