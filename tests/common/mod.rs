#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use alpha_backoffice::auth::generate_jwt;
use alpha_backoffice::config::AppConfig;
use alpha_backoffice::database::models::{
    ClientModel, ClientRecord, ClientUpdate, NewClient, NewProject, NewUser, ProjectModel, ProjectRecord,
    ProjectUpdate, StatusModel, UserModel, UserRecord, UserUpdate,
};
use alpha_backoffice::database::stores::{ClientStore, ProjectStore, StatusStore, UserStore};
use alpha_backoffice::database::DatabaseError;
use alpha_backoffice::middleware::ADMIN_API_KEY_HEADER;
use alpha_backoffice::storage::LocalFileHandler;
use alpha_backoffice::types::Role;
use alpha_backoffice::{app, AppState, Stores};

pub const JWT_SECRET: &str = "integration-test-secret-0123456789";
pub const ADMIN_KEY: &str = "integration-admin-key";

// ---------------------------------------------------------------------------
// In-memory stores
// ---------------------------------------------------------------------------

struct ProjectRow {
    id: String,
    image_file_name: Option<String>,
    project_name: String,
    description: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget: Option<Decimal>,
    created: chrono::DateTime<Utc>,
    client_id: String,
    user_id: String,
    status_id: i32,
}

#[derive(Default)]
struct Tables {
    users: Vec<UserRecord>,
    clients: Vec<ClientRecord>,
    projects: Vec<ProjectRow>,
    statuses: Vec<StatusModel>,
}

/// One shared set of tables implementing every store trait, with the
/// unique and foreign key rules of the PostgreSQL schema.
#[derive(Default)]
pub struct MemoryDb {
    tables: Mutex<Tables>,
    /// Number of `list_all` calls per entity, to observe cache hits
    user_loads: Mutex<usize>,
}

impl MemoryDb {
    /// Tables with the two seeded statuses
    pub fn seeded() -> Arc<Self> {
        let db = Self::default();
        db.tables.lock().unwrap().statuses = vec![
            StatusModel { id: 1, status_name: "STARTED".into() },
            StatusModel { id: 2, status_name: "COMPLETED".into() },
        ];
        Arc::new(db)
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_user(&self, email: &str, password: Option<&str>, role: Option<Role>) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let password_hash = password.map(|p| bcrypt::hash(p, 4).unwrap());
        self.tables.lock().unwrap().users.push(UserRecord {
            id: id.clone(),
            username: email.into(),
            email: email.into(),
            password_hash,
            image_file_name: None,
            created: Utc::now(),
            first_name: "Test".into(),
            last_name: "User".into(),
            phone: None,
            job_title: Some("Tester".into()),
            role: role.map(|r| r.to_string()),
            street_name: Some("Main Street".into()),
            postal_code: Some("12345".into()),
            city: Some("Springfield".into()),
        });
        id
    }

    pub fn seed_client(&self, name: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.tables.lock().unwrap().clients.push(ClientRecord {
            id: id.clone(),
            image_file_name: None,
            client_name: name.into(),
            created: Utc::now(),
            is_active: true,
            email: "contact@example.com".into(),
            phone: None,
            reference: None,
            street_name: "Harbour Road".into(),
            postal_code: "54321".into(),
            city: "Shelbyville".into(),
        });
        id
    }

    pub fn seed_project(&self, name: &str, client_id: &str, user_id: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.tables.lock().unwrap().projects.push(ProjectRow {
            id: id.clone(),
            image_file_name: None,
            project_name: name.into(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            budget: None,
            created: Utc::now(),
            client_id: client_id.into(),
            user_id: user_id.into(),
            status_id: 1,
        });
        id
    }

    pub fn user(&self, id: &str) -> Option<UserRecord> {
        self.tables.lock().unwrap().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn user_by_email(&self, email: &str) -> Option<UserRecord> {
        self.tables.lock().unwrap().users.iter().find(|u| u.email.eq_ignore_ascii_case(email.trim())).cloned()
    }

    pub fn project_count(&self) -> usize {
        self.tables.lock().unwrap().projects.len()
    }

    pub fn user_loads(&self) -> usize {
        *self.user_loads.lock().unwrap()
    }

    fn project_model(tables: &Tables, row: &ProjectRow) -> Option<ProjectModel> {
        let client = tables.clients.iter().find(|c| c.id == row.client_id)?.clone();
        let user = tables.users.iter().find(|u| u.id == row.user_id)?.clone();
        let status = tables.statuses.iter().find(|s| s.id == row.status_id)?.clone();

        Some(ProjectModel::from(ProjectRecord {
            id: row.id.clone(),
            image_file_name: row.image_file_name.clone(),
            project_name: row.project_name.clone(),
            description: row.description.clone(),
            start_date: row.start_date,
            end_date: row.end_date,
            budget: row.budget,
            created: row.created,
            status_id: status.id,
            status_name: status.status_name,
            client_id: client.id,
            client_image_file_name: client.image_file_name,
            client_name: client.client_name,
            client_created: client.created,
            client_is_active: client.is_active,
            client_email: client.email,
            client_phone: client.phone,
            client_reference: client.reference,
            client_street_name: client.street_name,
            client_postal_code: client.postal_code,
            client_city: client.city,
            user_id: user.id,
            user_image_file_name: user.image_file_name,
            user_created: user.created,
            user_email: user.email,
            user_first_name: user.first_name,
            user_last_name: user.last_name,
            user_phone: user.phone,
            user_job_title: user.job_title,
            user_role: user.role,
            user_street_name: user.street_name,
            user_postal_code: user.postal_code,
            user_city: user.city,
        }))
    }

    fn check_references(tables: &Tables, client_id: &str, user_id: &str, status_id: i32) -> Result<(), DatabaseError> {
        if !tables.clients.iter().any(|c| c.id == client_id) {
            return Err(DatabaseError::ForeignKeyViolation("projects_client_id_fkey".into()));
        }
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(DatabaseError::ForeignKeyViolation("projects_user_id_fkey".into()));
        }
        if !tables.statuses.iter().any(|s| s.id == status_id) {
            return Err(DatabaseError::ForeignKeyViolation("projects_status_id_fkey".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryDb {
    async fn list_all(&self) -> Result<Vec<UserModel>, DatabaseError> {
        *self.user_loads.lock().unwrap() += 1;
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().cloned().map(UserModel::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, DatabaseError> {
        Ok(self.user(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DatabaseError> {
        Ok(self.user_by_email(email))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError> {
        Ok(self.user_by_email(email).is_some())
    }

    async fn create(&self, user: NewUser) -> Result<String, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(DatabaseError::UniqueViolation("users_email_key".into()));
        }
        let id = uuid::Uuid::new_v4().to_string();
        tables.users.push(UserRecord {
            id: id.clone(),
            username: user.email.clone(),
            email: user.email,
            password_hash: user.password_hash,
            image_file_name: user.image_file_name,
            created: Utc::now(),
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            job_title: user.job_title,
            role: user.role.map(|r| r.to_string()),
            street_name: user.street_name,
            postal_code: user.postal_code,
            city: user.city,
        });
        Ok(id)
    }

    async fn update(&self, user: UserUpdate) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables.users.iter_mut().find(|u| u.id == user.id) else {
            return Ok(false);
        };
        row.image_file_name = user.image_file_name;
        row.first_name = user.first_name;
        row.last_name = user.last_name;
        row.phone = user.phone;
        row.job_title = user.job_title;
        row.street_name = user.street_name;
        row.postal_code = user.postal_code;
        row.city = user.city;
        Ok(true)
    }

    async fn set_password(&self, id: &str, password_hash: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(match tables.users.iter_mut().find(|u| u.id == id) {
            Some(row) => {
                row.password_hash = Some(password_hash.into());
                true
            }
            None => false,
        })
    }

    async fn set_role(&self, id: &str, role: Role) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(match tables.users.iter_mut().find(|u| u.id == id) {
            Some(row) => {
                row.role = Some(role.to_string());
                true
            }
            None => false,
        })
    }

    async fn count_in_role(&self, role: Role) -> Result<i64, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().filter(|u| u.role.as_deref() == Some(role.as_str())).count() as i64)
    }

    async fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.projects.iter().any(|p| p.user_id == id) {
            return Err(DatabaseError::ForeignKeyViolation("projects_user_id_fkey".into()));
        }
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        Ok(tables.users.len() < before)
    }
}

#[async_trait]
impl ClientStore for MemoryDb {
    async fn list_all(&self) -> Result<Vec<ClientModel>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        let mut rows = tables.clients.clone();
        rows.sort_by(|a, b| a.client_name.cmp(&b.client_name));
        Ok(rows.into_iter().map(ClientModel::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ClientRecord>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.clients.iter().any(|c| c.id == id))
    }

    async fn name_exists(&self, name: &str, excluding_id: Option<&str>) -> Result<bool, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .clients
            .iter()
            .any(|c| c.client_name == name && Some(c.id.as_str()) != excluding_id))
    }

    async fn create(&self, client: NewClient) -> Result<String, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.clients.iter().any(|c| c.client_name == client.client_name) {
            return Err(DatabaseError::UniqueViolation("clients_client_name_key".into()));
        }
        let id = uuid::Uuid::new_v4().to_string();
        tables.clients.push(ClientRecord {
            id: id.clone(),
            image_file_name: client.image_file_name,
            client_name: client.client_name,
            created: Utc::now(),
            is_active: true,
            email: client.email,
            phone: client.phone,
            reference: client.reference,
            street_name: client.street_name,
            postal_code: client.postal_code,
            city: client.city,
        });
        Ok(id)
    }

    async fn update(&self, client: ClientUpdate) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables.clients.iter_mut().find(|c| c.id == client.id) else {
            return Ok(false);
        };
        row.client_name = client.client_name;
        row.image_file_name = client.image_file_name;
        row.email = client.email;
        row.phone = client.phone;
        row.reference = client.reference;
        row.street_name = client.street_name;
        row.postal_code = client.postal_code;
        row.city = client.city;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.projects.iter().any(|p| p.client_id == id) {
            return Err(DatabaseError::ForeignKeyViolation("projects_client_id_fkey".into()));
        }
        let before = tables.clients.len();
        tables.clients.retain(|c| c.id != id);
        Ok(tables.clients.len() < before)
    }
}

#[async_trait]
impl ProjectStore for MemoryDb {
    async fn list_all(&self) -> Result<Vec<ProjectModel>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        let mut models: Vec<ProjectModel> = tables
            .projects
            .iter()
            .filter_map(|row| Self::project_model(&tables, row))
            .collect();
        models.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(models)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ProjectRecord>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.projects.iter().find(|p| p.id == id).and_then(|row| {
            let model = Self::project_model(&tables, row)?;
            Some(ProjectRecord {
                id: model.id,
                image_file_name: model.image_file_name,
                project_name: model.project_name,
                description: model.description,
                start_date: model.start_date,
                end_date: model.end_date,
                budget: model.budget,
                created: model.created,
                status_id: model.status.id,
                status_name: model.status.status_name,
                client_id: model.client.id,
                client_image_file_name: model.client.image_file_name,
                client_name: model.client.client_name,
                client_created: model.client.created,
                client_is_active: model.client.is_active,
                client_email: model.client.information.email,
                client_phone: model.client.information.phone,
                client_reference: model.client.information.reference,
                client_street_name: model.client.address.street_name,
                client_postal_code: model.client.address.postal_code,
                client_city: model.client.address.city,
                user_id: model.user.id,
                user_image_file_name: model.user.image_file_name,
                user_created: model.user.created,
                user_email: model.user.information.email,
                user_first_name: model.user.information.first_name,
                user_last_name: model.user.information.last_name,
                user_phone: model.user.information.phone,
                user_job_title: model.user.information.job_title,
                user_role: model.user.information.role,
                user_street_name: model.user.address.street_name,
                user_postal_code: model.user.address.postal_code,
                user_city: model.user.address.city,
            })
        }))
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.projects.iter().any(|p| p.id == id))
    }

    async fn create(&self, project: NewProject) -> Result<String, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        Self::check_references(&tables, &project.client_id, &project.user_id, project.status_id)?;
        let id = uuid::Uuid::new_v4().to_string();
        tables.projects.push(ProjectRow {
            id: id.clone(),
            image_file_name: project.image_file_name,
            project_name: project.project_name,
            description: project.description,
            start_date: project.start_date,
            end_date: project.end_date,
            budget: project.budget,
            created: Utc::now(),
            client_id: project.client_id,
            user_id: project.user_id,
            status_id: project.status_id,
        });
        Ok(id)
    }

    async fn update(&self, project: ProjectUpdate) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        Self::check_references(&tables, &project.client_id, &project.user_id, project.status_id)?;
        let Some(row) = tables.projects.iter_mut().find(|p| p.id == project.id) else {
            return Ok(false);
        };
        row.project_name = project.project_name;
        row.image_file_name = project.image_file_name;
        row.description = project.description;
        row.start_date = project.start_date;
        row.end_date = project.end_date;
        row.budget = project.budget;
        row.client_id = project.client_id;
        row.user_id = project.user_id;
        row.status_id = project.status_id;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        Ok(tables.projects.len() < before)
    }
}

#[async_trait]
impl StatusStore for MemoryDb {
    async fn list_all(&self) -> Result<Vec<StatusModel>, DatabaseError> {
        Ok(self.tables.lock().unwrap().statuses.clone())
    }
}

// ---------------------------------------------------------------------------
// In-process application
// ---------------------------------------------------------------------------

pub fn test_config(upload_dir: &str) -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = JWT_SECRET.to_string();
    config.security.admin_api_key = ADMIN_KEY.to_string();
    config.api.upload_dir = upload_dir.to_string();
    config
}

pub struct TestResponse {
    pub status: StatusCode,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
    }

    /// The `data` member of the success envelope
    pub fn data(&self) -> Value {
        self.json()["data"].clone()
    }

    pub fn message(&self) -> String {
        self.json()["message"].as_str().unwrap_or_default().to_string()
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: Arc<MemoryDb>,
    pub state: AppState,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_db(MemoryDb::seeded())
    }

    pub fn with_db(db: Arc<MemoryDb>) -> Self {
        Self::build(db, true)
    }

    pub fn build(db: Arc<MemoryDb>, cache_enabled: bool) -> Self {
        let uploads = tempfile::tempdir().expect("tempdir");
        let mut config = test_config(uploads.path().to_str().expect("utf-8 path"));
        config.cache.enabled = cache_enabled;
        let config = Arc::new(config);
        let stores = Stores {
            users: db.clone(),
            clients: db.clone(),
            projects: db.clone(),
            statuses: db.clone(),
            files: Arc::new(LocalFileHandler::new(uploads.path())),
        };
        let state = AppState::with_stores(config, None, stores);
        Self { router: app(state.clone()), db, state, uploads }
    }

    /// Seeds a user holding `role` and returns a bearer token for them
    pub fn token_for(&self, email: &str, role: Role) -> String {
        let id = self.db.seed_user(email, Some("Passw0rd!"), Some(role));
        generate_jwt(&id, email, Some(role), &self.state.config.security).expect("token")
    }

    pub fn admin_token(&self) -> String {
        self.token_for("admin@example.com", Role::Admin)
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body")
            .to_vec();
        TestResponse { status, bytes }
    }

    pub async fn get(&self, uri: &str, auth: Auth<'_>) -> TestResponse {
        self.send(auth.apply(Request::builder().method(Method::GET).uri(uri)).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str, auth: Auth<'_>) -> TestResponse {
        self.send(auth.apply(Request::builder().method(Method::DELETE).uri(uri)).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn multipart(&self, method: Method, uri: &str, auth: Auth<'_>, form: MultipartForm) -> TestResponse {
        let (content_type, body) = form.finish();
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type);
        self.send(auth.apply(builder).body(Body::from(body)).unwrap()).await
    }
}

/// Credentials attached to a request
#[derive(Clone, Copy)]
pub enum Auth<'a> {
    None,
    Bearer(&'a str),
    /// Bearer token plus the admin key header
    Admin(&'a str),
}

impl Auth<'_> {
    fn apply(self, builder: axum::http::request::Builder) -> axum::http::request::Builder {
        match self {
            Auth::None => builder,
            Auth::Bearer(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            Auth::Admin(token) => builder
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(ADMIN_API_KEY_HEADER, ADMIN_KEY),
        }
    }
}

/// Minimal `multipart/form-data` encoder
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self { boundary: format!("----alpha-{}", uuid::Uuid::new_v4().simple()), body: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (format!("multipart/form-data; boundary={}", self.boundary), self.body)
    }
}

pub fn client_form(name: &str) -> MultipartForm {
    MultipartForm::new()
        .text("clientName", name)
        .text("email", "office@acme.example")
        .text("phone", "+1 555 0100")
        .text("streetName", "Industrial Way 1")
        .text("postalCode", "90210")
        .text("city", "Springfield")
        .text("reference", "ACME-001")
}

// ---------------------------------------------------------------------------
// Spawned binary
// ---------------------------------------------------------------------------

/// The built binary running on a free port; killed on drop
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let server = Self::spawn()?;
        server.wait_ready(Duration::from_secs(30)).await?;
        Ok(server)
    }

    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // DATABASE_URL is inherited; a short timeout keeps /health quick when nothing listens
        let child = Command::new(env!("CARGO_BIN_EXE_alpha-backoffice"))
            .env("API_PORT", port.to_string())
            .env("JWT_SECRET", JWT_SECRET)
            .env("ADMIN_API_KEY", ADMIN_KEY)
            .env("DATABASE_CONNECTION_TIMEOUT", "2")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Without a database the server still answers, with 503
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
