use std::sync::Arc;

use crate::cache::CacheHandler;
use crate::database::models::StatusModel;
use crate::database::stores::StatusStore;
use crate::types::cache_keys;

use super::error::{ServiceError, ServiceResult};

pub struct StatusService {
    store: Arc<dyn StatusStore>,
    cache: Arc<CacheHandler<Vec<StatusModel>>>,
}

impl StatusService {
    pub fn new(store: Arc<dyn StatusStore>, cache: Arc<CacheHandler<Vec<StatusModel>>>) -> Self {
        Self { store, cache }
    }

    pub async fn get_statuses(&self) -> ServiceResult<Vec<StatusModel>> {
        match self.cache.get(cache_keys::STATUSES).await {
            Some(models) => Ok(models),
            None => self.update_cache().await,
        }
    }

    pub async fn get_status_by_name(&self, status_name: &str) -> ServiceResult<StatusModel> {
        if let Some(found) = self
            .cache
            .get(cache_keys::STATUSES)
            .await
            .and_then(|models| models.into_iter().find(|s| s.status_name == status_name))
        {
            return Ok(found);
        }

        self.update_cache()
            .await?
            .into_iter()
            .find(|s| s.status_name == status_name)
            .ok_or_else(|| ServiceError::NotFound("Status not found.".to_string()))
    }

    pub async fn update_cache(&self) -> ServiceResult<Vec<StatusModel>> {
        let models = self
            .store
            .list_all()
            .await
            .map_err(|e| ServiceError::failed("retrieve statuses", e))?;
        Ok(self.cache.set(cache_keys::STATUSES, models).await)
    }
}
