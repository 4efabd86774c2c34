use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::StatusModel;
use crate::database::repository::Repository;
use crate::filter::FilterData;

#[async_trait]
pub trait StatusStore: Send + Sync {
    /// All statuses ordered by id
    async fn list_all(&self) -> Result<Vec<StatusModel>, DatabaseError>;
}

pub struct PgStatusStore {
    statuses: Repository<StatusModel>,
}

impl PgStatusStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            statuses: Repository::new("statuses", pool),
        }
    }
}

#[async_trait]
impl StatusStore for PgStatusStore {
    async fn list_all(&self) -> Result<Vec<StatusModel>, DatabaseError> {
        self.statuses.select_any(FilterData::ordered("id asc")).await
    }
}
