//! Repository layer.
//!
//! Each repository is a zero-sized struct whose async methods take `&PgPool`
//! as the first argument.

pub mod alert_repo;
pub mod friend_repo;
pub mod user_repo;

pub use alert_repo::AlertRepo;
pub use friend_repo::FriendRepo;
pub use user_repo::UserRepo;
