use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{generate_jwt, hash_password, verify_password};
use crate::cache::CacheHandler;
use crate::config::AppConfig;
use crate::database::models::{NewUser, UserModel};
use crate::database::stores::UserStore;
use crate::types::{cache_keys, Role};

use super::error::{ServiceError, ServiceResult};
use super::forms::{AuthResult, SignInForm, SignUpForm};
use super::role_service::RoleService;
use super::validation;

pub struct AuthService {
    users: Arc<dyn UserStore>,
    roles: Arc<RoleService>,
    cache: Arc<CacheHandler<Vec<UserModel>>>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<RoleService>,
        cache: Arc<CacheHandler<Vec<UserModel>>>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self { users, roles, cache, config }
    }

    /// Registers an account, or sets the password of a user an admin created earlier.
    /// Returns the message for the 201 response.
    pub async fn sign_up(&self, mut form: SignUpForm) -> ServiceResult<String> {
        form.email = validation::normalize_email(&form.email);
        Self::validate_sign_up(&form)?;

        let existing = self
            .users
            .find_by_email(&form.email)
            .await
            .map_err(|e| ServiceError::failed("create user", e))?;

        if existing.as_ref().is_some_and(|user| user.has_password()) {
            return Err(ServiceError::AlreadyExists("User already has an account.".to_string()));
        }

        let password_hash =
            hash_password(&form.password).map_err(|e| ServiceError::failed("create user", e))?;

        if let Some(user) = existing {
            let saved = self
                .users
                .set_password(&user.id, &password_hash)
                .await
                .map_err(|e| ServiceError::failed("create user", e))?;
            if !saved {
                return Err(ServiceError::Failed("Password could not be saved.".to_string()));
            }
            info!("Password set for pre-registered user {}", user.id);
            return Ok("User updated successfully.".to_string());
        }

        let user_id = self
            .users
            .create(NewUser {
                email: form.email,
                password_hash: Some(password_hash),
                image_file_name: None,
                first_name: form.first_name.trim().to_string(),
                last_name: form.last_name.trim().to_string(),
                phone: None,
                job_title: None,
                role: None,
                street_name: None,
                postal_code: None,
                city: None,
            })
            .await
            .map_err(|e| ServiceError::from_write("create user", e))?;

        self.roles.assign_default_role(&user_id).await?;
        self.update_cache().await?;

        info!("User {} signed up", user_id);
        Ok("User was successfully created.".to_string())
    }

    pub async fn sign_in(&self, form: SignInForm) -> ServiceResult<AuthResult> {
        let user = self
            .users
            .find_by_email(&validation::normalize_email(&form.email))
            .await
            .map_err(|e| ServiceError::failed("sign in", e))?
            .ok_or_else(|| {
                warn!("Sign-in attempt for unknown email");
                ServiceError::Unauthorized("Invalid email.".to_string())
            })?;

        let password_ok = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(&form.password, hash));
        if !password_ok {
            warn!("Sign-in rejected for user {}", user.id);
            return Err(ServiceError::Unauthorized("Invalid email or password.".to_string()));
        }

        let role = self.roles.get_user_role(&user);
        let access_token = generate_jwt(&user.id, &user.username, Some(role), &self.config.security)
            .map_err(|e| {
                tracing::error!("Failed to generate JWT token: {}", e);
                ServiceError::Failed("Failed to generate JWT token.".to_string())
            })?;

        let is_admin = role == Role::Admin;
        Ok(AuthResult {
            access_token,
            is_admin,
            api_key: is_admin.then(|| self.config.security.admin_api_key.clone()),
        })
    }

    async fn update_cache(&self) -> ServiceResult<Vec<UserModel>> {
        let models = self
            .users
            .list_all()
            .await
            .map_err(|e| ServiceError::failed("retrieve users", e))?;
        Ok(self.cache.set(cache_keys::USERS, models).await)
    }

    fn validate_sign_up(form: &SignUpForm) -> ServiceResult<()> {
        validation::validate_required(&[
            &form.email,
            &form.password,
            &form.confirm_password,
            &form.first_name,
            &form.last_name,
        ])?;
        validation::validate_password_match_and_terms(form)?;
        validation::validate_min_length(&[&form.first_name, &form.last_name], 2)?;
        validation::validate_email(&form.email)?;
        validation::validate_password(&form.password)
    }
}
