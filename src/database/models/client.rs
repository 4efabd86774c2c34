use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `client_details` view
#[derive(Debug, Clone, FromRow)]
pub struct ClientRecord {
    pub id: String,
    pub image_file_name: Option<String>,
    pub client_name: String,
    pub created: DateTime<Utc>,
    pub is_active: bool,
    pub email: String,
    pub phone: Option<String>,
    pub reference: Option<String>,
    pub street_name: String,
    pub postal_code: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientModel {
    pub id: String,
    pub image_file_name: Option<String>,
    pub client_name: String,
    pub created: DateTime<Utc>,
    pub is_active: bool,
    pub information: ClientInformationModel,
    pub address: ClientAddressModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInformationModel {
    pub client_id: String,
    pub email: String,
    pub phone: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAddressModel {
    pub client_id: String,
    pub street_name: String,
    pub postal_code: String,
    pub city: String,
}

impl From<ClientRecord> for ClientModel {
    fn from(row: ClientRecord) -> Self {
        Self {
            information: ClientInformationModel {
                client_id: row.id.clone(),
                email: row.email,
                phone: row.phone,
                reference: row.reference,
            },
            address: ClientAddressModel {
                client_id: row.id.clone(),
                street_name: row.street_name,
                postal_code: row.postal_code,
                city: row.city,
            },
            id: row.id,
            image_file_name: row.image_file_name,
            client_name: row.client_name,
            created: row.created,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub client_name: String,
    pub image_file_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub reference: Option<String>,
    pub street_name: String,
    pub postal_code: String,
    pub city: String,
}

#[derive(Debug, Clone)]
pub struct ClientUpdate {
    pub id: String,
    pub client_name: String,
    pub image_file_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub reference: Option<String>,
    pub street_name: String,
    pub postal_code: String,
    pub city: String,
}
