//! Request forms accepted by the services.
//!
//! Auth forms arrive as JSON. The entity forms are assembled from multipart
//! fields by the handlers, so their text fields default to empty strings and
//! required-field checks happen in `validation`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::storage::UploadedFile;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub terms_and_conditions: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub access_token: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AddUserForm {
    pub image: Option<UploadedFile>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub job_title: String,
    pub role: String,
    pub street_name: String,
    pub postal_code: String,
    pub city: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserForm {
    pub id: String,
    pub existing_image_file_name: Option<String>,
    pub new_image: Option<UploadedFile>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub job_title: String,
    pub role: String,
    pub street_name: String,
    pub postal_code: String,
    pub city: String,
}

#[derive(Debug, Clone, Default)]
pub struct AddClientForm {
    pub image: Option<UploadedFile>,
    pub client_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub street_name: String,
    pub postal_code: String,
    pub city: String,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateClientForm {
    pub id: String,
    pub existing_image_file_name: Option<String>,
    pub new_image: Option<UploadedFile>,
    pub client_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub street_name: String,
    pub postal_code: String,
    pub city: String,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AddProjectForm {
    pub image: Option<UploadedFile>,
    pub project_name: String,
    pub client_id: String,
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub budget: Option<Decimal>,
    pub user_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProjectForm {
    pub id: String,
    pub existing_image_file_name: Option<String>,
    pub new_image: Option<UploadedFile>,
    pub project_name: String,
    pub client_id: String,
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub budget: Option<Decimal>,
    pub user_id: String,
    pub status_id: i32,
}
