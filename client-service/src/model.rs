use chrono::{DateTime, Utc};
use common_clients::ProfileRequest;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub profile_id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub project_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewClientProfile {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl From<ProfileRequest> for NewClientProfile {
    fn from(req: ProfileRequest) -> Self {
        Self {
            user_id: req.user_id,
            name: req.name,
            email: req.email,
            password_hash: req.password,
        }
    }
}
