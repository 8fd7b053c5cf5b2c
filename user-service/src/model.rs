use chrono::{DateTime, Utc};
use common_auth::Role;
use serde::{Deserialize, Serialize};

/// Stored account. `role` never changes after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Public view of an identity; never carries the credential hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityView {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub role: Role,
}

impl From<&IdentityRecord> for IdentityView {
    fn from(record: &IdentityRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            username: record.username.clone(),
            role: record.role,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}
