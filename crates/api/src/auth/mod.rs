//! Authentication primitives.
//!
//! - [`password`]: Argon2id hashing and verification.
//! - [`jwt`]: HS256 access-token issue and validation.

pub mod jwt;
pub mod password;
