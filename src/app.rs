// app.rs - shared state and the route table

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::cache::CacheHandler;
use crate::config::AppConfig;
use crate::database::stores::{
    ClientStore, PgClientStore, PgProjectStore, PgStatusStore, PgUserStore, ProjectStore, StatusStore, UserStore,
};
use crate::database::DatabaseManager;
use crate::handlers::{auth, clients, projects, statuses, system, users};
use crate::middleware::{jwt_auth_middleware, require_admin_api_key};
use crate::services::{AuthService, ClientService, ProjectService, RoleService, StatusService, UserService};
use crate::storage::{FileHandler, LocalFileHandler};

/// Persistence seams the services are built on
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub clients: Arc<dyn ClientStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub statuses: Arc<dyn StatusStore>,
    pub files: Arc<dyn FileHandler>,
}

impl Stores {
    /// PostgreSQL stores sharing one pool, uploads written to `api.upload_dir`
    pub fn postgres(db: &DatabaseManager, config: &AppConfig) -> Self {
        let pool = db.pool().clone();
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            clients: Arc::new(PgClientStore::new(pool.clone())),
            projects: Arc::new(PgProjectStore::new(pool.clone())),
            statuses: Arc::new(PgStatusStore::new(pool)),
            files: Arc::new(LocalFileHandler::new(&config.api.upload_dir)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Only used by /health; `None` when the app runs on non-database stores
    pub db: Option<DatabaseManager>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub clients: Arc<ClientService>,
    pub projects: Arc<ProjectService>,
    pub statuses: Arc<StatusService>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, db: DatabaseManager) -> Self {
        let stores = Stores::postgres(&db, &config);
        Self::with_stores(config, Some(db), stores)
    }

    /// Wires the services over the given stores. Each entity gets one cache;
    /// the users cache is shared by sign-up and user administration, and the
    /// projects cache is dropped by client and user edits.
    pub fn with_stores(config: Arc<AppConfig>, db: Option<DatabaseManager>, stores: Stores) -> Self {
        let enabled = config.cache.enabled;

        let users_cache = CacheHandler::shared(enabled);
        let projects_cache = CacheHandler::shared(enabled);
        let roles = Arc::new(RoleService::new(stores.users.clone()));
        let statuses = Arc::new(StatusService::new(stores.statuses, CacheHandler::shared(enabled)));

        Self {
            auth: Arc::new(AuthService::new(
                stores.users.clone(),
                roles.clone(),
                users_cache.clone(),
                config.clone(),
            )),
            users: Arc::new(UserService::new(
                stores.users,
                roles,
                users_cache,
                projects_cache.clone(),
                stores.files.clone(),
            )),
            clients: Arc::new(ClientService::new(
                stores.clients,
                CacheHandler::shared(enabled),
                projects_cache.clone(),
                stores.files.clone(),
            )),
            projects: Arc::new(ProjectService::new(stores.projects, statuses.clone(), projects_cache, stores.files)),
            statuses,
            config,
            db,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(auth_routes())
        // JWT protected
        .merge(protected_routes(config.clone()))
        .nest_service("/images", ServeDir::new(&config.api.upload_dir))
        // Global middleware
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/Auth/SignUp", post(auth::sign_up))
        .route("/api/Auth/SignIn", post(auth::sign_in))
}

fn protected_routes(config: Arc<AppConfig>) -> Router<AppState> {
    Router::new()
        .merge(user_routes(config.clone()))
        .merge(client_routes(config.clone()))
        .merge(project_routes())
        .route("/api/Statuses", get(statuses::get_statuses))
        .route_layer(middleware::from_fn_with_state(config, jwt_auth_middleware))
}

fn user_routes(config: Arc<AppConfig>) -> Router<AppState> {
    Router::new()
        .route("/api/Users", get(users::get_users))
        .route("/api/Users/me", get(users::get_current_user))
        .route(
            "/api/Users",
            post(users::create_user).put(users::update_user)
                .route_layer(middleware::from_fn_with_state(config.clone(), require_admin_api_key)),
        )
        .route(
            "/api/Users/:id",
            get(users::get_user).delete(users::delete_user)
                .route_layer(middleware::from_fn_with_state(config.clone(), require_admin_api_key)),
        )
}

fn client_routes(config: Arc<AppConfig>) -> Router<AppState> {
    Router::new()
        .route("/api/Clients", get(clients::get_clients))
        .route(
            "/api/Clients",
            post(clients::create_client).put(clients::update_client)
                .route_layer(middleware::from_fn_with_state(config.clone(), require_admin_api_key)),
        )
        .route(
            "/api/Clients/:id",
            get(clients::get_client).delete(clients::delete_client)
                .route_layer(middleware::from_fn_with_state(config.clone(), require_admin_api_key)),
        )
}

fn project_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/Projects",
            get(projects::get_projects)
                .post(projects::create_project)
                .put(projects::update_project),
        )
        .route(
            "/api/Projects/:id",
            get(projects::get_project).delete(projects::delete_project),
        )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }
    if config.is_development() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
}
