//! The `todos` table and the store handle shared by all handlers.
//!
//! # Design
//! `TodoStore` wraps a `sqlx::AnyPool` so the same binary can run against
//! Postgres in deployment and SQLite in tests. The pool connects lazily:
//! building a store never touches the network, which lets the startup
//! sequencer own the "is the database up yet" question.

use serde::Serialize;
use sqlx::any::AnyPoolOptions;
use sqlx::{AnyPool, Row};
use thiserror::Error;
use tracing::instrument;

/// Maximum title length accepted by the create operation, in characters.
pub const TITLE_MAX_CHARS: usize = 255;

/// A single persisted todo and its transport form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unsupported database url scheme: {0}")]
    UnsupportedScheme(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// The SQL dialect behind a database URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Result<Self, StoreError> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(StoreError::UnsupportedScheme(other.to_string())),
        }
    }

    fn create_table_sql(self) -> &'static str {
        match self {
            Backend::Postgres => {
                "CREATE TABLE IF NOT EXISTS todos (\
                 id BIGSERIAL PRIMARY KEY, \
                 title VARCHAR(255) NOT NULL)"
            }
            Backend::Sqlite => {
                "CREATE TABLE IF NOT EXISTS todos (\
                 id INTEGER PRIMARY KEY AUTOINCREMENT, \
                 title VARCHAR(255) NOT NULL)"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TodoStore {
    pool: AnyPool,
    backend: Backend,
}

impl TodoStore {
    /// Build a store for `database_url` without opening a connection.
    pub fn connect(database_url: &str) -> Result<Self, StoreError> {
        sqlx::any::install_default_drivers();
        let backend = Backend::from_url(database_url)?;
        let pool = AnyPoolOptions::new().connect_lazy(database_url)?;
        Ok(Self { pool, backend })
    }

    #[instrument(skip(self), fields(backend = ?self.backend))]
    pub async fn create_schema(&self) -> Result<(), StoreError> {
        sqlx::query(self.backend.create_table_sql())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All todos in insertion order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let rows = sqlx::query("SELECT id, title FROM todos ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|row| -> Result<Todo, StoreError> {
                Ok(Todo {
                    id: row.try_get("id")?,
                    title: row.try_get("title")?,
                })
            })
            .collect()
    }

    /// Insert one todo and commit. Returns the assigned id.
    #[instrument(skip(self))]
    pub async fn insert(&self, title: &str) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("INSERT INTO todos (title) VALUES ($1) RETURNING id")
            .bind(title)
            .fetch_one(&mut *tx)
            .await?;
        let id: i64 = row.try_get("id")?;
        tx.commit().await?;
        Ok(id)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
