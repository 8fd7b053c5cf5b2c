use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common_auth::Role;
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::model::{IdentityRecord, NewIdentity};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("username '{0}' already exists")]
    Duplicate(String),
    #[error("storage error: {0}")]
    Storage(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence for identity records.
///
/// `insert` enforces username uniqueness; `exists_by_username` is only a
/// cheap pre-check and can race with a concurrent insert.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn exists_by_username(&self, username: &str) -> RepoResult<bool>;
    async fn insert(&self, identity: NewIdentity) -> RepoResult<IdentityRecord>;
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<IdentityRecord>>;
}

#[derive(FromRow)]
struct IdentityRow {
    id: i64,
    name: String,
    username: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for IdentityRecord {
    type Error = RepoError;

    fn try_from(row: IdentityRow) -> RepoResult<Self> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|err| RepoError::Storage(err.to_string()))?;
        Ok(Self {
            id: row.id,
            name: row.name,
            username: row.username,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct PgIdentityStore {
    db: PgPool,
}

impl PgIdentityStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn storage(err: sqlx::Error) -> RepoError {
    RepoError::Storage(err.to_string())
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn exists_by_username(&self, username: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.db)
            .await
            .map_err(storage)
    }

    async fn insert(&self, identity: NewIdentity) -> RepoResult<IdentityRecord> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "INSERT INTO users (name, username, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, username, password_hash, role, created_at",
        )
        .bind(&identity.name)
        .bind(&identity.username)
        .bind(&identity.password_hash)
        .bind(identity.role.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err {
                if db_err.is_unique_violation() {
                    return RepoError::Duplicate(identity.username.clone());
                }
            }
            storage(err)
        })?;
        row.try_into()
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<IdentityRecord>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT id, name, username, password_hash, role, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .map_err(storage)?;
        row.map(IdentityRecord::try_from).transpose()
    }
}

/// Process-local store for development and tests.
#[derive(Clone, Default)]
pub struct InMemoryIdentityStore {
    rows: Arc<RwLock<Vec<IdentityRecord>>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn exists_by_username(&self, username: &str) -> RepoResult<bool> {
        Ok(self.rows.read().await.iter().any(|row| row.username == username))
    }

    async fn insert(&self, identity: NewIdentity) -> RepoResult<IdentityRecord> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.username == identity.username) {
            return Err(RepoError::Duplicate(identity.username));
        }
        let record = IdentityRecord {
            id: rows.len() as i64 + 1,
            name: identity.name,
            username: identity.username,
            password_hash: identity.password_hash,
            role: identity.role,
            created_at: Utc::now(),
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<IdentityRecord>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|row| row.username == username)
            .cloned())
    }
}
