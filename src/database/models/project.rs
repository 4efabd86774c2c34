use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::client::{ClientAddressModel, ClientInformationModel, ClientModel};
use super::status::StatusModel;
use super::user::{UserAddressModel, UserInformationModel, UserModel};

/// One row of the `project_details` view; client and user columns are prefixed
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRecord {
    pub id: String,
    pub image_file_name: Option<String>,
    pub project_name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<Decimal>,
    pub created: DateTime<Utc>,
    pub status_id: i32,
    pub status_name: String,

    pub client_id: String,
    pub client_image_file_name: Option<String>,
    pub client_name: String,
    pub client_created: DateTime<Utc>,
    pub client_is_active: bool,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub client_reference: Option<String>,
    pub client_street_name: String,
    pub client_postal_code: String,
    pub client_city: String,

    pub user_id: String,
    pub user_image_file_name: Option<String>,
    pub user_created: DateTime<Utc>,
    pub user_email: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_phone: Option<String>,
    pub user_job_title: Option<String>,
    pub user_role: Option<String>,
    pub user_street_name: Option<String>,
    pub user_postal_code: Option<String>,
    pub user_city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectModel {
    pub id: String,
    pub image_file_name: Option<String>,
    pub project_name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<Decimal>,
    pub created: DateTime<Utc>,
    pub client: ClientModel,
    pub user: UserModel,
    pub status: StatusModel,
}

impl From<ProjectRecord> for ProjectModel {
    fn from(row: ProjectRecord) -> Self {
        let client = ClientModel {
            information: ClientInformationModel {
                client_id: row.client_id.clone(),
                email: row.client_email,
                phone: row.client_phone,
                reference: row.client_reference,
            },
            address: ClientAddressModel {
                client_id: row.client_id.clone(),
                street_name: row.client_street_name,
                postal_code: row.client_postal_code,
                city: row.client_city,
            },
            id: row.client_id,
            image_file_name: row.client_image_file_name,
            client_name: row.client_name,
            created: row.client_created,
            is_active: row.client_is_active,
        };

        let user = UserModel {
            information: UserInformationModel {
                user_id: row.user_id.clone(),
                email: row.user_email,
                first_name: row.user_first_name,
                last_name: row.user_last_name,
                phone: row.user_phone,
                job_title: row.user_job_title,
                role: row.user_role,
            },
            address: UserAddressModel {
                user_id: row.user_id.clone(),
                street_name: row.user_street_name,
                postal_code: row.user_postal_code,
                city: row.user_city,
            },
            id: row.user_id,
            image_file_name: row.user_image_file_name,
            created: row.user_created,
        };

        Self {
            id: row.id,
            image_file_name: row.image_file_name,
            project_name: row.project_name,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            budget: row.budget,
            created: row.created,
            client,
            user,
            status: StatusModel {
                id: row.status_id,
                status_name: row.status_name,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub project_name: String,
    pub image_file_name: Option<String>,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<Decimal>,
    pub client_id: String,
    pub user_id: String,
    pub status_id: i32,
}

#[derive(Debug, Clone)]
pub struct ProjectUpdate {
    pub id: String,
    pub project_name: String,
    pub image_file_name: Option<String>,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<Decimal>,
    pub client_id: String,
    pub user_id: String,
    pub status_id: i32,
}
