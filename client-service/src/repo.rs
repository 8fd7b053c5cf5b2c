use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::model::{ClientProfile, NewClientProfile};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("a client profile already exists for user {0}")]
    Duplicate(i64),
    #[error("storage error: {0}")]
    Storage(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn insert(&self, profile: NewClientProfile) -> RepoResult<ClientProfile>;
    async fn find_by_id(&self, profile_id: i64) -> RepoResult<Option<ClientProfile>>;
    /// Appends to the profile owned by `user_id`; `None` when the user has no profile.
    async fn append_project(&self, user_id: i64, project_id: i64) -> RepoResult<Option<ClientProfile>>;
}

#[derive(FromRow)]
struct ClientRow {
    profile_id: i64,
    user_id: i64,
    name: String,
    email: String,
    password_hash: String,
    project_ids: Vec<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClientRow> for ClientProfile {
    fn from(row: ClientRow) -> Self {
        Self {
            profile_id: row.profile_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            project_ids: row.project_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "profile_id, user_id, name, email, password_hash, project_ids, created_at, updated_at";

#[derive(Clone)]
pub struct PgClientStore {
    db: PgPool,
}

impl PgClientStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn storage(err: sqlx::Error) -> RepoError {
    RepoError::Storage(err.to_string())
}

#[async_trait]
impl ClientStore for PgClientStore {
    async fn insert(&self, profile: NewClientProfile) -> RepoResult<ClientProfile> {
        let sql = format!(
            "INSERT INTO client_profiles (user_id, name, email, password_hash)
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ClientRow>(&sql)
            .bind(profile.user_id)
            .bind(&profile.name)
            .bind(&profile.email)
            .bind(&profile.password_hash)
            .fetch_one(&self.db)
            .await
            .map_err(|err| {
                if let sqlx::Error::Database(db_err) = &err {
                    if db_err.is_unique_violation() {
                        return RepoError::Duplicate(profile.user_id);
                    }
                }
                storage(err)
            })?;
        Ok(row.into())
    }

    async fn find_by_id(&self, profile_id: i64) -> RepoResult<Option<ClientProfile>> {
        let sql = format!("SELECT {COLUMNS} FROM client_profiles WHERE profile_id = $1");
        let row = sqlx::query_as::<_, ClientRow>(&sql)
            .bind(profile_id)
            .fetch_optional(&self.db)
            .await
            .map_err(storage)?;
        Ok(row.map(ClientProfile::from))
    }

    async fn append_project(&self, user_id: i64, project_id: i64) -> RepoResult<Option<ClientProfile>> {
        let sql = format!(
            "UPDATE client_profiles
             SET project_ids = array_append(project_ids, $2), updated_at = NOW()
             WHERE user_id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ClientRow>(&sql)
            .bind(user_id)
            .bind(project_id)
            .fetch_optional(&self.db)
            .await
            .map_err(storage)?;
        Ok(row.map(ClientProfile::from))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryClientStore {
    rows: Arc<RwLock<Vec<ClientProfile>>>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn insert(&self, profile: NewClientProfile) -> RepoResult<ClientProfile> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.user_id == profile.user_id) {
            return Err(RepoError::Duplicate(profile.user_id));
        }
        let now = Utc::now();
        let record = ClientProfile {
            profile_id: rows.len() as i64 + 1,
            user_id: profile.user_id,
            name: profile.name,
            email: profile.email,
            password_hash: profile.password_hash,
            project_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, profile_id: i64) -> RepoResult<Option<ClientProfile>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.profile_id == profile_id).cloned())
    }

    async fn append_project(&self, user_id: i64, project_id: i64) -> RepoResult<Option<ClientProfile>> {
        let mut rows = self.rows.write().await;
        Ok(rows.iter_mut().find(|row| row.user_id == user_id).map(|row| {
            row.project_ids.push(project_id);
            row.updated_at = Utc::now();
            row.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_profile(user_id: i64) -> NewClientProfile {
        NewClientProfile {
            user_id,
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$stub".into(),
        }
    }

    #[tokio::test]
    async fn one_profile_per_user() {
        let store = InMemoryClientStore::new();
        let first = store.insert(new_profile(42)).await.unwrap();
        assert_eq!(first.profile_id, 1);
        assert!(first.project_ids.is_empty());
        assert!(matches!(store.insert(new_profile(42)).await, Err(RepoError::Duplicate(42))));
    }

    #[tokio::test]
    async fn append_is_keyed_by_user_id() {
        let store = InMemoryClientStore::new();
        store.insert(new_profile(7)).await.unwrap();
        let profile = store.insert(new_profile(42)).await.unwrap();

        store.append_project(42, 100).await.unwrap().unwrap();
        let updated = store.append_project(42, 101).await.unwrap().unwrap();
        assert_eq!(updated.project_ids, vec![100, 101]);

        let fetched = store.find_by_id(profile.profile_id).await.unwrap().unwrap();
        assert_eq!(fetched.project_ids, vec![100, 101]);
        assert!(store.append_project(99, 1).await.unwrap().is_none());
    }
}
