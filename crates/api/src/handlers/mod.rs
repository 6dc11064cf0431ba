pub mod alerts;
pub mod auth;
pub mod friends;
pub mod misc;
pub mod presence;
pub mod threat;
pub mod users;
