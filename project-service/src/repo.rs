use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common_clients::{NewProject, ProjectRecord, ProjectStatus};
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("storage error: {0}")]
    Storage(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// New projects start `OPEN` with no assigned freelancer.
    async fn insert(&self, project: NewProject) -> RepoResult<ProjectRecord>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<ProjectRecord>>;
}

#[derive(FromRow)]
struct ProjectRow {
    id: i64,
    client_id: i64,
    title: String,
    description: String,
    budget: f64,
    duration_days: i32,
    status: String,
    assigned_freelancer_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for ProjectRecord {
    type Error = RepoError;

    fn try_from(row: ProjectRow) -> RepoResult<Self> {
        let status = ProjectStatus::parse(&row.status)
            .ok_or_else(|| RepoError::Storage(format!("unknown project status '{}'", row.status)))?;
        Ok(Self {
            id: row.id,
            client_id: row.client_id,
            title: row.title,
            description: row.description,
            budget: row.budget,
            duration_days: row.duration_days,
            status,
            assigned_freelancer_id: row.assigned_freelancer_id,
            created_at: row.created_at,
        })
    }
}

const COLUMNS: &str =
    "id, client_id, title, description, budget, duration_days, status, assigned_freelancer_id, created_at";

#[derive(Clone)]
pub struct PgProjectStore {
    db: PgPool,
}

impl PgProjectStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn storage(err: sqlx::Error) -> RepoError {
    RepoError::Storage(err.to_string())
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn insert(&self, project: NewProject) -> RepoResult<ProjectRecord> {
        let sql = format!(
            "INSERT INTO projects (client_id, title, description, budget, duration_days, status)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(project.client_id)
            .bind(&project.title)
            .bind(&project.description)
            .bind(project.budget)
            .bind(project.duration)
            .bind(ProjectStatus::Open.as_str())
            .fetch_one(&self.db)
            .await
            .map_err(storage)?;
        ProjectRecord::try_from(row)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<ProjectRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(storage)?;
        row.map(ProjectRecord::try_from).transpose()
    }
}

#[derive(Clone, Default)]
pub struct InMemoryProjectStore {
    rows: Arc<RwLock<Vec<ProjectRecord>>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn insert(&self, project: NewProject) -> RepoResult<ProjectRecord> {
        let mut rows = self.rows.write().await;
        let record = ProjectRecord {
            id: rows.len() as i64 + 1,
            client_id: project.client_id,
            title: project.title,
            description: project.description,
            budget: project.budget,
            duration_days: project.duration,
            status: ProjectStatus::Open,
            assigned_freelancer_id: None,
            created_at: Utc::now(),
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<ProjectRecord>> {
        Ok(self.rows.read().await.iter().find(|row| row.id == id).cloned())
    }
}
