use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;

use super::{new_id, IdRow};
use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, UserModel, UserRecord, UserUpdate};
use crate::database::repository::Repository;
use crate::filter::FilterData;
use crate::types::Role;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users with information and address, oldest first
    async fn list_all(&self) -> Result<Vec<UserModel>, DatabaseError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, DatabaseError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DatabaseError>;
    async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError>;
    /// Inserts the user with its information and address; returns the new id
    async fn create(&self, user: NewUser) -> Result<String, DatabaseError>;
    async fn update(&self, user: UserUpdate) -> Result<bool, DatabaseError>;
    async fn set_password(&self, id: &str, password_hash: &str) -> Result<bool, DatabaseError>;
    async fn set_role(&self, id: &str, role: Role) -> Result<bool, DatabaseError>;
    async fn count_in_role(&self, role: Role) -> Result<i64, DatabaseError>;
    async fn delete(&self, id: &str) -> Result<bool, DatabaseError>;
}

pub struct PgUserStore {
    details: Repository<UserRecord>,
    users: Repository<IdRow>,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            details: Repository::new("user_details", pool.clone()),
            users: Repository::new("users", pool),
        }
    }

    fn pool(&self) -> &PgPool {
        self.users.pool()
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list_all(&self) -> Result<Vec<UserModel>, DatabaseError> {
        let rows = self.details.select_any(FilterData::ordered("created asc")).await?;
        Ok(rows.into_iter().map(UserModel::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, DatabaseError> {
        self.details.select_one(FilterData::where_(json!({ "id": id }))).await
    }

    // Matches the case-insensitive unique index on users
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DatabaseError> {
        let row = sqlx::query_as::<_, UserRecord>(
            "SELECT * FROM user_details WHERE lower(email) = lower(trim($1)) LIMIT 1",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower(trim($1)))")
                .bind(email)
                .fetch_one(self.pool())
                .await?;
        Ok(exists)
    }

    async fn create(&self, user: NewUser) -> Result<String, DatabaseError> {
        let id = new_id();
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, image_file_name)
             VALUES ($1, $2, $2, $3, $4)",
        )
        .bind(&id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.image_file_name)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO user_information (user_id, first_name, last_name, phone, job_title, role)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.job_title)
        .bind(user.role.map(|r| r.as_str()))
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO user_addresses (user_id, street_name, postal_code, city)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&id)
        .bind(&user.street_name)
        .bind(&user.postal_code)
        .bind(&user.city)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn update(&self, user: UserUpdate) -> Result<bool, DatabaseError> {
        let mut tx = self.pool().begin().await?;

        let updated = sqlx::query("UPDATE users SET image_file_name = $2 WHERE id = $1")
            .bind(&user.id)
            .bind(&user.image_file_name)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE user_information
             SET first_name = $2, last_name = $3, phone = $4, job_title = $5
             WHERE user_id = $1",
        )
        .bind(&user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.job_title)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO user_addresses (user_id, street_name, postal_code, city)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE
             SET street_name = EXCLUDED.street_name,
                 postal_code = EXCLUDED.postal_code,
                 city = EXCLUDED.city",
        )
        .bind(&user.id)
        .bind(&user.street_name)
        .bind(&user.postal_code)
        .bind(&user.city)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn set_password(&self, id: &str, password_hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_role(&self, id: &str, role: Role) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE user_information SET role = $2 WHERE user_id = $1")
            .bind(id)
            .bind(role.as_str())
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_in_role(&self, role: Role) -> Result<i64, DatabaseError> {
        self.details.count(FilterData::where_(json!({ "role": role.as_str() }))).await
    }

    async fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        let deleted = self.users.delete_where(FilterData::where_(json!({ "id": id }))).await?;
        Ok(deleted > 0)
    }
}
