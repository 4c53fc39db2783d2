//! `jengamart-auth` — password hashing and bearer session tokens.
//!
//! Transport-agnostic: the HTTP layer decides where tokens travel; this
//! crate only hashes, signs and verifies.

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password};
pub use session::{AuthError, SessionClaims, SessionKeys};
