use std::sync::Arc;

use tracing::info;

use crate::cache::CacheHandler;
use crate::database::models::{NewUser, ProjectModel, UserModel, UserUpdate};
use crate::database::stores::UserStore;
use crate::storage::FileHandler;
use crate::types::{cache_keys, Role};

use super::error::{ServiceError, ServiceResult};
use super::forms::{AddUserForm, UpdateUserForm};
use super::role_service::RoleService;
use super::validation;

pub struct UserService {
    users: Arc<dyn UserStore>,
    roles: Arc<RoleService>,
    cache: Arc<CacheHandler<Vec<UserModel>>>,
    /// Projects embed their user, so user edits drop this slot
    projects_cache: Arc<CacheHandler<Vec<ProjectModel>>>,
    files: Arc<dyn FileHandler>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<RoleService>,
        cache: Arc<CacheHandler<Vec<UserModel>>>,
        projects_cache: Arc<CacheHandler<Vec<ProjectModel>>>,
        files: Arc<dyn FileHandler>,
    ) -> Self {
        Self { users, roles, cache, projects_cache, files }
    }

    pub async fn create_user(&self, mut form: AddUserForm) -> ServiceResult<UserModel> {
        form.email = validation::normalize_email(&form.email);
        validation::validate_required(&[
            &form.first_name,
            &form.last_name,
            &form.email,
            &form.job_title,
            &form.role,
            &form.street_name,
            &form.postal_code,
            &form.city,
        ])?;
        validation::validate_email(&form.email)?;
        validation::validate_min_length(
            &[&form.first_name, &form.last_name, &form.street_name, &form.postal_code, &form.city],
            2,
        )?;
        let role: Role = form.role.parse().map_err(ServiceError::BadRequest)?;

        let exists = self
            .users
            .email_exists(&form.email)
            .await
            .map_err(|e| ServiceError::failed("create user", e))?;
        if exists {
            return Err(ServiceError::AlreadyExists(format!(
                "User with email {} already exists.",
                form.email
            )));
        }

        let image_file_name = self
            .files
            .upload(form.image.as_ref())
            .await
            .map_err(|e| ServiceError::failed("store user image", e))?;

        let user_id = self
            .users
            .create(NewUser {
                email: form.email,
                password_hash: None,
                image_file_name,
                first_name: form.first_name,
                last_name: form.last_name,
                phone: form.phone,
                job_title: Some(form.job_title),
                role: None,
                street_name: Some(form.street_name),
                postal_code: Some(form.postal_code),
                city: Some(form.city),
            })
            .await
            .map_err(|e| ServiceError::from_write("create user", e))?;

        self.roles.assign_role(&user_id, role).await?;

        info!("Created user {} with role {}", user_id, role);
        self.update_cache()
            .await?
            .into_iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| ServiceError::Failed("Could not retrieve created user.".to_string()))
    }

    pub async fn delete_user(&self, id: &str) -> ServiceResult<()> {
        if id.trim().is_empty() {
            return Err(ServiceError::BadRequest("Invalid ID.".to_string()));
        }

        let found = self
            .users
            .find_by_id(id)
            .await
            .map_err(|e| ServiceError::failed("delete user", e))?;
        if found.is_none() {
            return Err(ServiceError::NotFound("No user found with the given ID.".to_string()));
        }

        let deleted = self
            .users
            .delete(id)
            .await
            .map_err(|e| ServiceError::from_delete("delete user", e))?;
        if !deleted {
            return Err(ServiceError::Failed("User deletion failed.".to_string()));
        }

        info!("Deleted user {}", id);
        self.update_cache().await?;
        self.projects_cache.invalidate(cache_keys::PROJECTS).await;
        Ok(())
    }

    pub async fn get_users(&self) -> ServiceResult<Vec<UserModel>> {
        match self.cache.get(cache_keys::USERS).await {
            Some(models) => Ok(models),
            None => self.update_cache().await,
        }
    }

    pub async fn get_user_by_id(&self, id: &str) -> ServiceResult<UserModel> {
        self.find(|u| u.id == id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found.".to_string()))
    }

    pub async fn get_user_by_email(&self, email: &str) -> ServiceResult<UserModel> {
        let email = validation::normalize_email(email);
        self.find(|u| validation::normalize_email(&u.information.email) == email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found.".to_string()))
    }

    pub async fn update_user(&self, form: UpdateUserForm) -> ServiceResult<UserModel> {
        validation::validate_required(&[
            &form.id,
            &form.first_name,
            &form.last_name,
            &form.email,
            &form.job_title,
            &form.role,
            &form.street_name,
            &form.postal_code,
            &form.city,
        ])?;
        validation::validate_min_length(
            &[&form.first_name, &form.last_name, &form.street_name, &form.postal_code, &form.city],
            2,
        )?;
        let role: Role = form.role.parse().map_err(ServiceError::BadRequest)?;

        let existing = self
            .users
            .find_by_id(&form.id)
            .await
            .map_err(|e| ServiceError::failed("update user", e))?
            .ok_or_else(|| ServiceError::NotFound("User not found.".to_string()))?;

        let image_file_name = match self
            .files
            .upload(form.new_image.as_ref())
            .await
            .map_err(|e| ServiceError::failed("store user image", e))?
        {
            Some(uploaded) => Some(uploaded),
            None => form.existing_image_file_name.filter(|n| !n.is_empty()),
        };

        let updated = self
            .users
            .update(UserUpdate {
                id: form.id.clone(),
                image_file_name,
                first_name: form.first_name,
                last_name: form.last_name,
                phone: form.phone,
                job_title: Some(form.job_title),
                street_name: Some(form.street_name),
                postal_code: Some(form.postal_code),
                city: Some(form.city),
            })
            .await
            .map_err(|e| ServiceError::from_write("update user", e))?;
        if !updated {
            return Err(ServiceError::NotFound("User not found.".to_string()));
        }

        if existing.role.as_deref() != Some(role.as_str()) {
            self.roles.update_role(&form.id, role).await?;
        }
        self.projects_cache.invalidate(cache_keys::PROJECTS).await;

        self.update_cache()
            .await?
            .into_iter()
            .find(|u| u.id == form.id)
            .ok_or_else(|| ServiceError::Failed("Could not retrieve updated user.".to_string()))
    }

    /// Cache first; on a miss the list is reloaded once and searched again
    async fn find(&self, predicate: impl Fn(&UserModel) -> bool) -> ServiceResult<Option<UserModel>> {
        if let Some(found) = self
            .cache
            .get(cache_keys::USERS)
            .await
            .and_then(|models| models.into_iter().find(|u| predicate(u)))
        {
            return Ok(Some(found));
        }
        Ok(self.update_cache().await?.into_iter().find(|u| predicate(u)))
    }

    pub async fn update_cache(&self) -> ServiceResult<Vec<UserModel>> {
        let models = self
            .users
            .list_all()
            .await
            .map_err(|e| ServiceError::failed("retrieve users", e))?;
        Ok(self.cache.set(cache_keys::USERS, models).await)
    }
}
