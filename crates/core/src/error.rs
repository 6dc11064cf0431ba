//! Domain error type shared by every Demodet crate.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A sensor channel carried NaN or an infinity.
    #[error("Invalid reading: {channel} must be a finite number, got {value}")]
    InvalidReading { channel: &'static str, value: f64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
