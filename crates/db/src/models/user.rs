//! User entity model and DTOs.

use demodet_core::threat::ScoreTier;
use demodet_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A song a user pinned to their profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteSong {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Full user row from the `users` table.
///
/// Carries the password hash. Never serialize it; use [`UserProfile`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub favorite_song: Option<Json<FavoriteSong>>,
    pub current_threat_tier: Option<String>,
    pub current_threat_score: Option<i16>,
    pub current_threat_source: Option<String>,
    pub current_threat_at: Option<Timestamp>,
    pub last_lat: Option<f64>,
    pub last_lon: Option<f64>,
    pub last_location_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The threat tier a user last reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentThreat {
    pub tier: String,
    pub score: Option<i16>,
    pub source: Option<String>,
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub updated_at: Option<Timestamp>,
}

/// Public user representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub favorite_song: Option<FavoriteSong>,
    pub current_threat: Option<CurrentThreat>,
    pub location: Option<Location>,
    pub created_at: Timestamp,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        let current_threat = user.current_threat_tier.map(|tier| CurrentThreat {
            tier,
            score: user.current_threat_score,
            source: user.current_threat_source,
            updated_at: user.current_threat_at,
        });
        let location = match (user.last_lat, user.last_lon) {
            (Some(lat), Some(lon)) => Some(Location {
                lat,
                lon,
                updated_at: user.last_location_at,
            }),
            _ => None,
        };
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            photo_url: user.photo_url,
            favorite_song: user.favorite_song.map(|Json(song)| song),
            current_threat,
            location,
            created_at: user.created_at,
        }
    }
}

/// DTO for inserting a user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
}

/// Partial profile update. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub favorite_song: Option<FavoriteSong>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Input for recording a user's current threat tier.
#[derive(Debug, Clone, Deserialize)]
pub struct SetThreat {
    pub tier: ScoreTier,
    pub score: Option<u8>,
    pub source: Option<String>,
}
