use chrono::{DateTime, Utc};
use serde::Serialize;

/// Only the identity fields are known at registration; the rest stay empty
/// until the freelancer fills them in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerProfile {
    pub profile_id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub skills: Vec<String>,
    pub hourly_rate: Option<f64>,
    pub availability: Option<String>,
    pub created_at: DateTime<Utc>,
}
