use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::Role;

/// One row of the `user_details` view
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub image_file_name: Option<String>,
    pub created: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub role: Option<String>,
    pub street_name: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}

impl UserRecord {
    pub fn has_password(&self) -> bool {
        self.password_hash.as_deref().is_some_and(|h| !h.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserModel {
    pub id: String,
    pub image_file_name: Option<String>,
    pub created: DateTime<Utc>,
    pub information: UserInformationModel,
    pub address: UserAddressModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInformationModel {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAddressModel {
    pub user_id: String,
    pub street_name: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}

impl From<UserRecord> for UserModel {
    fn from(row: UserRecord) -> Self {
        Self {
            information: UserInformationModel {
                user_id: row.id.clone(),
                email: row.email,
                first_name: row.first_name,
                last_name: row.last_name,
                phone: row.phone,
                job_title: row.job_title,
                role: row.role,
            },
            address: UserAddressModel {
                user_id: row.id.clone(),
                street_name: row.street_name,
                postal_code: row.postal_code,
                city: row.city,
            },
            id: row.id,
            image_file_name: row.image_file_name,
            created: row.created,
        }
    }
}

/// Insert payload: user, information and address are written together
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: Option<String>,
    pub image_file_name: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub role: Option<Role>,
    pub street_name: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub id: String,
    pub image_file_name: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub street_name: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}
