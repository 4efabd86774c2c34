use std::sync::Arc;

use tracing::info;

use crate::database::models::UserRecord;
use crate::database::stores::UserStore;
use crate::types::Role;

use super::error::{ServiceError, ServiceResult};

/// Role bookkeeping on top of the user's information record
pub struct RoleService {
    users: Arc<dyn UserStore>,
}

impl RoleService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// The first account becomes the administrator
    pub async fn determine_default_role(&self) -> ServiceResult<Role> {
        let admins = self
            .users
            .count_in_role(Role::Admin)
            .await
            .map_err(|e| ServiceError::failed("count administrators", e))?;
        Ok(if admins > 0 { Role::User } else { Role::Admin })
    }

    pub async fn assign_default_role(&self, user_id: &str) -> ServiceResult<Role> {
        let role = self.determine_default_role().await?;
        let assigned = self
            .users
            .set_role(user_id, role)
            .await
            .map_err(|e| ServiceError::failed("assign default role", e))?;
        if !assigned {
            return Err(ServiceError::Failed("Unable to add default role to user.".to_string()));
        }
        info!("Assigned default role {} to user {}", role, user_id);
        Ok(role)
    }

    pub async fn assign_role(&self, user_id: &str, role: Role) -> ServiceResult<()> {
        let assigned = self
            .users
            .set_role(user_id, role)
            .await
            .map_err(|e| ServiceError::failed("assign role", e))?;
        if !assigned {
            return Err(ServiceError::Failed("Unable to add role to user.".to_string()));
        }
        Ok(())
    }

    pub async fn update_role(&self, user_id: &str, new_role: Role) -> ServiceResult<()> {
        let updated = self
            .users
            .set_role(user_id, new_role)
            .await
            .map_err(|e| ServiceError::failed("update role", e))?;
        if !updated {
            return Err(ServiceError::Failed("Unable to update role for user.".to_string()));
        }
        info!("Changed role of user {} to {}", user_id, new_role);
        Ok(())
    }

    /// Users without a recognised role are treated as `User`
    pub fn get_user_role(&self, user: &UserRecord) -> Role {
        user.role
            .as_deref()
            .and_then(|r| r.parse().ok())
            .unwrap_or(Role::User)
    }
}
