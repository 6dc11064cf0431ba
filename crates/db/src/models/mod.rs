//! Row structs and DTOs.
//!
//! Each submodule pairs a `FromRow` entity with the `Deserialize` inputs used
//! to create or patch it.

pub mod alert;
pub mod friend;
pub mod user;
