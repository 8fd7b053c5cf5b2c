//! Service-to-service contracts: request/response bodies and the HTTP
//! clients that carry them.

pub mod error;
pub mod http;
pub mod model;
pub mod profiles;
pub mod projects;

pub use error::{ClientError, ClientResult};
pub use http::{HttpRpc, DEFAULT_TIMEOUT_SECS};
pub use model::{NewProject, ProfileRef, ProfileRequest, ProjectRecord, ProjectStatus};
pub use profiles::{HttpProfileServices, ProfileServices};
pub use projects::{HttpProjectClient, ProjectClient};
