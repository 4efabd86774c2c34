use std::sync::Arc;

use tracing::{error, info};

use crate::cache::CacheHandler;
use crate::database::models::{NewProject, ProjectModel, ProjectUpdate};
use crate::database::stores::ProjectStore;
use crate::storage::FileHandler;
use crate::types::cache_keys;

use super::error::{ServiceError, ServiceResult};
use super::forms::{AddProjectForm, UpdateProjectForm};
use super::status_service::StatusService;
use super::validation;

pub const DEFAULT_PROJECT_STATUS: &str = "STARTED";

pub struct ProjectService {
    projects: Arc<dyn ProjectStore>,
    statuses: Arc<StatusService>,
    cache: Arc<CacheHandler<Vec<ProjectModel>>>,
    files: Arc<dyn FileHandler>,
}

impl ProjectService {
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        statuses: Arc<StatusService>,
        cache: Arc<CacheHandler<Vec<ProjectModel>>>,
        files: Arc<dyn FileHandler>,
    ) -> Self {
        Self { projects, statuses, cache, files }
    }

    pub async fn create_project(&self, form: AddProjectForm, default_status: &str) -> ServiceResult<ProjectModel> {
        validation::validate_required(&[&form.project_name, &form.client_id, &form.user_id])?;
        validation::validate_min_length(&[&form.project_name], 2)?;
        let [start_date, end_date] = validation::validate_dates([&form.start_date, &form.end_date])?;

        let status = self
            .statuses
            .get_status_by_name(default_status)
            .await
            .map_err(|e| {
                error!("Default status '{}' unavailable: {}", default_status, e);
                ServiceError::Failed(format!("An error occurred while trying to create project: {}", e.message()))
            })?;

        let image_file_name = self
            .files
            .upload(form.image.as_ref())
            .await
            .map_err(|e| ServiceError::failed("store project image", e))?;

        let project_id = self
            .projects
            .create(NewProject {
                project_name: form.project_name,
                image_file_name,
                description: form.description,
                start_date,
                end_date,
                budget: form.budget,
                client_id: form.client_id,
                user_id: form.user_id,
                status_id: status.id,
            })
            .await
            .map_err(|e| ServiceError::from_write("create project", e))?;

        info!("Created project {}", project_id);
        self.update_cache()
            .await?
            .into_iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| ServiceError::Failed("Could not retrieve created project.".to_string()))
    }

    pub async fn delete_project(&self, id: &str) -> ServiceResult<()> {
        if id.trim().is_empty() {
            return Err(ServiceError::BadRequest("Invalid ID.".to_string()));
        }

        let exists = self
            .projects
            .exists_by_id(id)
            .await
            .map_err(|e| ServiceError::failed("delete project", e))?;
        if !exists {
            return Err(ServiceError::NotFound("No project found with the given ID.".to_string()));
        }

        let deleted = self
            .projects
            .delete(id)
            .await
            .map_err(|e| ServiceError::from_delete("delete project", e))?;
        if !deleted {
            return Err(ServiceError::Failed("Project deletion failed.".to_string()));
        }

        info!("Deleted project {}", id);
        self.update_cache().await?;
        Ok(())
    }

    pub async fn get_projects(&self) -> ServiceResult<Vec<ProjectModel>> {
        match self.cache.get(cache_keys::PROJECTS).await {
            Some(models) => Ok(models),
            None => self.update_cache().await,
        }
    }

    pub async fn get_project_by_id(&self, id: &str) -> ServiceResult<ProjectModel> {
        if id.trim().is_empty() {
            return Err(ServiceError::BadRequest("Invalid ID.".to_string()));
        }

        if let Some(found) = self
            .cache
            .get(cache_keys::PROJECTS)
            .await
            .and_then(|models| models.into_iter().find(|p| p.id == id))
        {
            return Ok(found);
        }

        self.update_cache()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::NotFound("Project not found.".to_string()))
    }

    pub async fn update_project(&self, form: UpdateProjectForm) -> ServiceResult<ProjectModel> {
        validation::validate_required(&[&form.id, &form.project_name, &form.client_id, &form.user_id])?;
        validation::validate_min_length(&[&form.project_name], 2)?;
        let [start_date, end_date] = validation::validate_dates([&form.start_date, &form.end_date])?;
        validation::validate_number_fields(&[form.status_id])?;

        let found = self
            .projects
            .find_by_id(&form.id)
            .await
            .map_err(|e| ServiceError::failed("update project", e))?;
        if found.is_none() {
            return Err(ServiceError::NotFound("Project not found.".to_string()));
        }

        let image_file_name = match self
            .files
            .upload(form.new_image.as_ref())
            .await
            .map_err(|e| ServiceError::failed("store project image", e))?
        {
            Some(uploaded) => Some(uploaded),
            None => form.existing_image_file_name.filter(|n| !n.is_empty()),
        };

        let updated = self
            .projects
            .update(ProjectUpdate {
                id: form.id.clone(),
                project_name: form.project_name,
                image_file_name,
                description: form.description,
                start_date,
                end_date,
                budget: form.budget,
                client_id: form.client_id,
                user_id: form.user_id,
                status_id: form.status_id,
            })
            .await
            .map_err(|e| ServiceError::from_write("update project", e))?;
        if !updated {
            return Err(ServiceError::Failed("Project update failed.".to_string()));
        }

        self.update_cache()
            .await?
            .into_iter()
            .find(|p| p.id == form.id)
            .ok_or_else(|| ServiceError::Failed("Could not retrieve updated project.".to_string()))
    }

    pub async fn update_cache(&self) -> ServiceResult<Vec<ProjectModel>> {
        let models = self
            .projects
            .list_all()
            .await
            .map_err(|e| ServiceError::failed("retrieve projects", e))?;
        Ok(self.cache.set(cache_keys::PROJECTS, models).await)
    }
}
