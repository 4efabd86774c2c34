use std::sync::Arc;

use tracing::info;

use crate::cache::CacheHandler;
use crate::database::models::{ClientModel, ClientUpdate, NewClient, ProjectModel};
use crate::database::stores::ClientStore;
use crate::storage::FileHandler;
use crate::types::cache_keys;

use super::error::{ServiceError, ServiceResult};
use super::forms::{AddClientForm, UpdateClientForm};
use super::validation;

pub struct ClientService {
    clients: Arc<dyn ClientStore>,
    cache: Arc<CacheHandler<Vec<ClientModel>>>,
    /// Projects embed their client, so client edits drop this slot
    projects_cache: Arc<CacheHandler<Vec<ProjectModel>>>,
    files: Arc<dyn FileHandler>,
}

impl ClientService {
    pub fn new(
        clients: Arc<dyn ClientStore>,
        cache: Arc<CacheHandler<Vec<ClientModel>>>,
        projects_cache: Arc<CacheHandler<Vec<ProjectModel>>>,
        files: Arc<dyn FileHandler>,
    ) -> Self {
        Self { clients, cache, projects_cache, files }
    }

    pub async fn create_client(&self, form: AddClientForm) -> ServiceResult<ClientModel> {
        Self::validate(&form.client_name, &form.email, &form.street_name, &form.postal_code, &form.city)?;

        let taken = self
            .clients
            .name_exists(&form.client_name, None)
            .await
            .map_err(|e| ServiceError::failed("create client", e))?;
        if taken {
            return Err(ServiceError::AlreadyExists("Client name already exists.".to_string()));
        }

        let image_file_name = self
            .files
            .upload(form.image.as_ref())
            .await
            .map_err(|e| ServiceError::failed("store client image", e))?;

        let client_id = self
            .clients
            .create(NewClient {
                client_name: form.client_name,
                image_file_name,
                email: form.email,
                phone: form.phone,
                reference: form.reference,
                street_name: form.street_name,
                postal_code: form.postal_code,
                city: form.city,
            })
            .await
            .map_err(|e| ServiceError::from_write("create client", e))?;

        info!("Created client {}", client_id);
        self.update_cache()
            .await?
            .into_iter()
            .find(|c| c.id == client_id)
            .ok_or_else(|| ServiceError::Failed("Could not retrieve created client.".to_string()))
    }

    pub async fn delete_client(&self, id: &str) -> ServiceResult<()> {
        if id.trim().is_empty() {
            return Err(ServiceError::BadRequest("Invalid ID.".to_string()));
        }

        let exists = self
            .clients
            .exists_by_id(id)
            .await
            .map_err(|e| ServiceError::failed("delete client", e))?;
        if !exists {
            return Err(ServiceError::NotFound("No client found with the given id.".to_string()));
        }

        let deleted = self
            .clients
            .delete(id)
            .await
            .map_err(|e| ServiceError::from_delete("delete client", e))?;
        if !deleted {
            return Err(ServiceError::Failed("Client deletion failed.".to_string()));
        }

        info!("Deleted client {}", id);
        self.update_cache().await?;
        self.projects_cache.invalidate(cache_keys::PROJECTS).await;
        Ok(())
    }

    pub async fn get_clients(&self) -> ServiceResult<Vec<ClientModel>> {
        match self.cache.get(cache_keys::CLIENTS).await {
            Some(models) => Ok(models),
            None => self.update_cache().await,
        }
    }

    pub async fn get_client_by_id(&self, id: &str) -> ServiceResult<ClientModel> {
        if id.trim().is_empty() {
            return Err(ServiceError::BadRequest("Invalid ID.".to_string()));
        }

        if let Some(found) = self
            .cache
            .get(cache_keys::CLIENTS)
            .await
            .and_then(|models| models.into_iter().find(|c| c.id == id))
        {
            return Ok(found);
        }

        self.update_cache()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::NotFound("Client not found.".to_string()))
    }

    pub async fn update_client(&self, form: UpdateClientForm) -> ServiceResult<ClientModel> {
        validation::validate_required(&[&form.id])?;
        Self::validate(&form.client_name, &form.email, &form.street_name, &form.postal_code, &form.city)?;

        let taken = self
            .clients
            .name_exists(&form.client_name, Some(&form.id))
            .await
            .map_err(|e| ServiceError::failed("update client", e))?;
        if taken {
            return Err(ServiceError::AlreadyExists(format!(
                "Client with name {} already exists.",
                form.client_name
            )));
        }

        let found = self
            .clients
            .find_by_id(&form.id)
            .await
            .map_err(|e| ServiceError::failed("update client", e))?;
        if found.is_none() {
            return Err(ServiceError::NotFound("Client not found.".to_string()));
        }

        let image_file_name = match self
            .files
            .upload(form.new_image.as_ref())
            .await
            .map_err(|e| ServiceError::failed("store client image", e))?
        {
            Some(uploaded) => Some(uploaded),
            None => form.existing_image_file_name.filter(|n| !n.is_empty()),
        };

        let updated = self
            .clients
            .update(ClientUpdate {
                id: form.id.clone(),
                client_name: form.client_name,
                image_file_name,
                email: form.email,
                phone: form.phone,
                reference: form.reference,
                street_name: form.street_name,
                postal_code: form.postal_code,
                city: form.city,
            })
            .await
            .map_err(|e| ServiceError::from_write("update client", e))?;
        if !updated {
            return Err(ServiceError::Failed("Client update failed.".to_string()));
        }

        self.projects_cache.invalidate(cache_keys::PROJECTS).await;
        self.update_cache()
            .await?
            .into_iter()
            .find(|c| c.id == form.id)
            .ok_or_else(|| ServiceError::Failed("Could not retrieve updated client.".to_string()))
    }

    pub async fn update_cache(&self) -> ServiceResult<Vec<ClientModel>> {
        let models = self
            .clients
            .list_all()
            .await
            .map_err(|e| ServiceError::failed("retrieve clients", e))?;
        Ok(self.cache.set(cache_keys::CLIENTS, models).await)
    }

    fn validate(client_name: &str, email: &str, street_name: &str, postal_code: &str, city: &str) -> ServiceResult<()> {
        validation::validate_required(&[client_name, email, street_name, postal_code, city])?;
        validation::validate_min_length(&[client_name, street_name, postal_code, city], 2)?;
        validation::validate_email(email)
    }
}
