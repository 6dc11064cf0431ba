//! Friend requests.
//!
//! Accepted friendships live in `friendships` as two mirrored rows and are
//! read back as user ids or full user rows by `FriendRepo`.

use demodet_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A pending, directional request from one user to another.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct FriendRequest {
    pub id: DbId,
    pub from_user_id: DbId,
    pub to_user_id: DbId,
    pub created_at: Timestamp,
}
