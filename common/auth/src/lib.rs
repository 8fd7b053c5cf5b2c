pub mod bearer;
pub mod claims;
pub mod config;
pub mod error;
pub mod roles;
pub mod signer;
pub mod verifier;

pub use bearer::bearer_token;
pub use claims::{Claims, Principal};
pub use config::JwtConfig;
pub use error::{AuthError, AuthResult};
pub use roles::{Role, UnknownRole};
pub use signer::{IssuedToken, TokenSigner};
pub use verifier::JwtVerifier;
