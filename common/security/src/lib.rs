pub mod context;
pub mod error;
pub mod headers;
pub mod test_macros;

pub use context::IdentityContext;
pub use error::SecurityError;
pub use headers::{inject_identity, strip_identity, REQUEST_ID_HEADER, USERNAME_HEADER, USER_ID_HEADER};
