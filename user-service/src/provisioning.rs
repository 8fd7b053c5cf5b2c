//! Registration: persist the identity, then create the role's remote
//! profile. The two writes are not atomic and nothing is rolled back when
//! the second one fails.

use std::sync::Arc;

use common_auth::Role;
use common_clients::{ClientError, ProfileRef, ProfileRequest, ProfileServices};
use common_http_errors::ApiError;
use thiserror::Error;
use tracing::{info, warn};

use crate::metrics::UserMetrics;
use crate::model::{IdentityRecord, NewIdentity, NewUser};
use crate::passwords::hash_password;
use crate::repo::{IdentityStore, RepoError};

#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),
    /// The identity record exists; its profile does not.
    #[error("identity {user_id} created but {role} profile creation failed: {source}")]
    UpstreamUnavailable {
        user_id: i64,
        role: Role,
        #[source]
        source: ClientError,
    },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("{0}")]
    Hashing(String),
}

impl From<RepoError> for ProvisioningError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate(username) => ProvisioningError::DuplicateUsername(username),
            RepoError::Storage(message) => ProvisioningError::Storage(message),
        }
    }
}

impl From<ProvisioningError> for ApiError {
    fn from(err: ProvisioningError) -> Self {
        match err {
            ProvisioningError::InvalidInput(message) => ApiError::invalid_input(message),
            ProvisioningError::DuplicateUsername(_) => ApiError::Conflict {
                code: "duplicate_username",
                message: Some(err.to_string()),
            },
            ProvisioningError::UpstreamUnavailable { .. } => ApiError::UpstreamUnavailable {
                message: Some(err.to_string()),
            },
            ProvisioningError::Storage(_) | ProvisioningError::Hashing(_) => ApiError::internal(err),
        }
    }
}

pub struct Provisioner {
    store: Arc<dyn IdentityStore>,
    profiles: Arc<dyn ProfileServices>,
    metrics: Arc<UserMetrics>,
}

fn validate(user: &NewUser) -> Result<Role, ProvisioningError> {
    for (field, value) in [
        ("name", &user.name),
        ("username", &user.username),
        ("password", &user.password),
    ] {
        if value.trim().is_empty() {
            return Err(ProvisioningError::InvalidInput(format!("{field} must not be empty")));
        }
    }
    user.role
        .parse::<Role>()
        .map_err(|err| ProvisioningError::InvalidInput(err.to_string()))
}

impl Provisioner {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        profiles: Arc<dyn ProfileServices>,
        metrics: Arc<UserMetrics>,
    ) -> Self {
        Self {
            store,
            profiles,
            metrics,
        }
    }

    pub async fn register(&self, user: NewUser) -> Result<IdentityRecord, ProvisioningError> {
        let role = validate(&user)?;
        let username = user.username.trim().to_string();

        if self.store.exists_by_username(&username).await? {
            return Err(ProvisioningError::DuplicateUsername(username));
        }

        let password_hash = hash_password(&user.password).map_err(ProvisioningError::Hashing)?;
        let record = self
            .store
            .insert(NewIdentity {
                name: user.name.trim().to_string(),
                username,
                password_hash,
                role,
            })
            .await?;
        self.metrics.registration(role.as_str());
        info!(user_id = record.id, username = %record.username, %role, "identity record created");

        match self.create_profile(&record).await {
            Ok(Some(profile)) => {
                info!(user_id = record.id, profile_id = profile.profile_id, %role, "profile created");
                Ok(record)
            }
            Ok(None) => Ok(record),
            Err(source) => {
                warn!(
                    user_id = record.id,
                    username = %record.username,
                    %role,
                    error = %source,
                    "profile creation failed; identity record kept without profile"
                );
                self.metrics.provisioning_divergence(role.as_str());
                Err(ProvisioningError::UpstreamUnavailable {
                    user_id: record.id,
                    role,
                    source,
                })
            }
        }
    }

    /// One remote call per profile-bearing role; teachers have no profile.
    async fn create_profile(&self, record: &IdentityRecord) -> Result<Option<ProfileRef>, ClientError> {
        let request = ProfileRequest {
            user_id: record.id,
            name: record.name.clone(),
            email: record.username.clone(),
            password: record.password_hash.clone(),
        };
        match record.role {
            Role::Client => self.profiles.create_client_profile(&request).await.map(Some),
            Role::Freelancer => self.profiles.create_freelancer_profile(&request).await.map(Some),
            Role::Teacher => Ok(None),
        }
    }
}
