//! Per-entity persistence.
//!
//! Each store is a trait so services can run against PostgreSQL in production
//! and an in-memory implementation in tests. The Pg implementations read from
//! the `*_details` views through `Repository<T>` and write to the base tables.

pub mod client;
pub mod project;
pub mod status;
pub mod user;

use sqlx::FromRow;

pub use client::{ClientStore, PgClientStore};
pub use project::{PgProjectStore, ProjectStore};
pub use status::{PgStatusStore, StatusStore};
pub use user::{PgUserStore, UserStore};

/// Key-only view of a base table row, used for existence checks and deletes
#[derive(Debug, Clone, FromRow)]
pub struct IdRow {
    pub id: String,
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
