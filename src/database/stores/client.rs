use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;

use super::{new_id, IdRow};
use crate::database::manager::DatabaseError;
use crate::database::models::{ClientModel, ClientRecord, ClientUpdate, NewClient};
use crate::database::repository::Repository;
use crate::filter::FilterData;

#[async_trait]
pub trait ClientStore: Send + Sync {
    /// All clients with information and address, ordered by name
    async fn list_all(&self) -> Result<Vec<ClientModel>, DatabaseError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ClientRecord>, DatabaseError>;
    async fn exists_by_id(&self, id: &str) -> Result<bool, DatabaseError>;
    /// Whether `name` is taken, optionally ignoring one client (the one being updated)
    async fn name_exists(&self, name: &str, excluding_id: Option<&str>) -> Result<bool, DatabaseError>;
    async fn create(&self, client: NewClient) -> Result<String, DatabaseError>;
    async fn update(&self, client: ClientUpdate) -> Result<bool, DatabaseError>;
    async fn delete(&self, id: &str) -> Result<bool, DatabaseError>;
}

pub struct PgClientStore {
    details: Repository<ClientRecord>,
    clients: Repository<IdRow>,
}

impl PgClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            details: Repository::new("client_details", pool.clone()),
            clients: Repository::new("clients", pool),
        }
    }

    fn pool(&self) -> &PgPool {
        self.clients.pool()
    }
}

#[async_trait]
impl ClientStore for PgClientStore {
    async fn list_all(&self) -> Result<Vec<ClientModel>, DatabaseError> {
        let rows = self.details.select_any(FilterData::ordered("client_name asc")).await?;
        Ok(rows.into_iter().map(ClientModel::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ClientRecord>, DatabaseError> {
        self.details.select_one(FilterData::where_(json!({ "id": id }))).await
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, DatabaseError> {
        self.clients.exists(FilterData::where_(json!({ "id": id }))).await
    }

    async fn name_exists(&self, name: &str, excluding_id: Option<&str>) -> Result<bool, DatabaseError> {
        let where_clause = match excluding_id {
            Some(id) => json!({ "client_name": name, "id": { "$ne": id } }),
            None => json!({ "client_name": name }),
        };
        self.clients.exists(FilterData::where_(where_clause)).await
    }

    async fn create(&self, client: NewClient) -> Result<String, DatabaseError> {
        let id = new_id();
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "INSERT INTO clients (id, image_file_name, client_name, is_active)
             VALUES ($1, $2, $3, TRUE)",
        )
        .bind(&id)
        .bind(&client.image_file_name)
        .bind(&client.client_name)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO client_information (client_id, email, phone, reference)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&id)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.reference)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO client_addresses (client_id, street_name, postal_code, city)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&id)
        .bind(&client.street_name)
        .bind(&client.postal_code)
        .bind(&client.city)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn update(&self, client: ClientUpdate) -> Result<bool, DatabaseError> {
        let mut tx = self.pool().begin().await?;

        let updated = sqlx::query("UPDATE clients SET client_name = $2, image_file_name = $3 WHERE id = $1")
            .bind(&client.id)
            .bind(&client.client_name)
            .bind(&client.image_file_name)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE client_information SET email = $2, phone = $3, reference = $4 WHERE client_id = $1",
        )
        .bind(&client.id)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.reference)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE client_addresses SET street_name = $2, postal_code = $3, city = $4 WHERE client_id = $1",
        )
        .bind(&client.id)
        .bind(&client.street_name)
        .bind(&client.postal_code)
        .bind(&client.city)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        let deleted = self.clients.delete_where(FilterData::where_(json!({ "id": id }))).await?;
        Ok(deleted > 0)
    }
}
