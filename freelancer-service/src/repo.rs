use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common_clients::ProfileRequest;
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::model::FreelancerProfile;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("a freelancer profile already exists for user {0}")]
    Duplicate(i64),
    #[error("storage error: {0}")]
    Storage(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait FreelancerStore: Send + Sync {
    async fn insert(&self, profile: &ProfileRequest) -> RepoResult<FreelancerProfile>;
}

#[derive(FromRow)]
struct FreelancerRow {
    profile_id: i64,
    user_id: i64,
    name: String,
    email: String,
    password_hash: String,
    skills: Vec<String>,
    hourly_rate: Option<f64>,
    availability: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<FreelancerRow> for FreelancerProfile {
    fn from(row: FreelancerRow) -> Self {
        Self {
            profile_id: row.profile_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            skills: row.skills,
            hourly_rate: row.hourly_rate,
            availability: row.availability,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgFreelancerStore {
    db: PgPool,
}

impl PgFreelancerStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FreelancerStore for PgFreelancerStore {
    async fn insert(&self, profile: &ProfileRequest) -> RepoResult<FreelancerProfile> {
        let row = sqlx::query_as::<_, FreelancerRow>(
            "INSERT INTO freelancer_profiles (user_id, name, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING profile_id, user_id, name, email, password_hash, skills,
                       hourly_rate, availability, created_at",
        )
        .bind(profile.user_id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.password)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err {
                if db_err.is_unique_violation() {
                    return RepoError::Duplicate(profile.user_id);
                }
            }
            RepoError::Storage(err.to_string())
        })?;
        Ok(row.into())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryFreelancerStore {
    rows: Arc<RwLock<Vec<FreelancerProfile>>>,
}

impl InMemoryFreelancerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_by_user_id(&self, user_id: i64) -> Option<FreelancerProfile> {
        self.rows.read().await.iter().find(|row| row.user_id == user_id).cloned()
    }
}

#[async_trait]
impl FreelancerStore for InMemoryFreelancerStore {
    async fn insert(&self, profile: &ProfileRequest) -> RepoResult<FreelancerProfile> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.user_id == profile.user_id) {
            return Err(RepoError::Duplicate(profile.user_id));
        }
        let record = FreelancerProfile {
            profile_id: rows.len() as i64 + 1,
            user_id: profile.user_id,
            name: profile.name.clone(),
            email: profile.email.clone(),
            password_hash: profile.password.clone(),
            skills: Vec::new(),
            hourly_rate: None,
            availability: None,
            created_at: Utc::now(),
        };
        rows.push(record.clone());
        Ok(record)
    }
}
