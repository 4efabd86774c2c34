use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;

use super::{new_id, IdRow};
use crate::database::manager::DatabaseError;
use crate::database::models::{NewProject, ProjectModel, ProjectRecord, ProjectUpdate};
use crate::database::repository::Repository;
use crate::filter::FilterData;

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// All projects with client, user and status, newest first
    async fn list_all(&self) -> Result<Vec<ProjectModel>, DatabaseError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ProjectRecord>, DatabaseError>;
    async fn exists_by_id(&self, id: &str) -> Result<bool, DatabaseError>;
    async fn create(&self, project: NewProject) -> Result<String, DatabaseError>;
    async fn update(&self, project: ProjectUpdate) -> Result<bool, DatabaseError>;
    async fn delete(&self, id: &str) -> Result<bool, DatabaseError>;
}

pub struct PgProjectStore {
    details: Repository<ProjectRecord>,
    projects: Repository<IdRow>,
}

impl PgProjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            details: Repository::new("project_details", pool.clone()),
            projects: Repository::new("projects", pool),
        }
    }

    fn pool(&self) -> &PgPool {
        self.projects.pool()
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn list_all(&self) -> Result<Vec<ProjectModel>, DatabaseError> {
        let rows = self.details.select_any(FilterData::ordered("created desc")).await?;
        Ok(rows.into_iter().map(ProjectModel::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ProjectRecord>, DatabaseError> {
        self.details.select_one(FilterData::where_(json!({ "id": id }))).await
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, DatabaseError> {
        self.projects.exists(FilterData::where_(json!({ "id": id }))).await
    }

    async fn create(&self, project: NewProject) -> Result<String, DatabaseError> {
        let id = new_id();
        sqlx::query(
            "INSERT INTO projects
                (id, image_file_name, project_name, description, start_date, end_date, budget, client_id, user_id, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&id)
        .bind(&project.image_file_name)
        .bind(&project.project_name)
        .bind(&project.description)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.budget)
        .bind(&project.client_id)
        .bind(&project.user_id)
        .bind(project.status_id)
        .execute(self.pool())
        .await?;
        Ok(id)
    }

    async fn update(&self, project: ProjectUpdate) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE projects
             SET image_file_name = $2, project_name = $3, description = $4, start_date = $5,
                 end_date = $6, budget = $7, client_id = $8, user_id = $9, status_id = $10
             WHERE id = $1",
        )
        .bind(&project.id)
        .bind(&project.image_file_name)
        .bind(&project.project_name)
        .bind(&project.description)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.budget)
        .bind(&project.client_id)
        .bind(&project.user_id)
        .bind(project.status_id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        let deleted = self.projects.delete_where(FilterData::where_(json!({ "id": id }))).await?;
        Ok(deleted > 0)
    }
}
