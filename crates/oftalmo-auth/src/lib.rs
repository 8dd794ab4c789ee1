//! oftalmo-auth
//!
//! Bearer token validation for the API. Tokens are HS256 JWTs signed with a
//! shared secret; the identity provider that issues them is configured
//! outside this system.

pub mod error;
pub mod jwt;
