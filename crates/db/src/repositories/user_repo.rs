//! Repository for the `users` table.

use demodet_core::types::DbId;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::models::user::{CreateUser, SetThreat, UpdateProfile, User};

/// Column list shared across queries.
const COLUMNS: &str = "id, email, password_hash, display_name, photo_url, favorite_song, \
                       current_threat_tier, current_threat_score, current_threat_source, \
                       current_threat_at, last_lat, last_lon, last_location_at, \
                       created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Fails with a `uq_users_email` unique violation if the email is taken.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, display_name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Most recently created users first.
    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, User>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial profile update. Only non-`None` fields are written.
    ///
    /// The location is replaced only when both coordinates are supplied, and
    /// its timestamp moves with it. Returns `None` if the user does not exist.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let (lat, lon) = match (input.lat, input.lon) {
            (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
            _ => (None, None),
        };
        let query = format!(
            "UPDATE users SET
                display_name = COALESCE($2, display_name),
                photo_url = COALESCE($3, photo_url),
                favorite_song = COALESCE($4, favorite_song),
                last_lat = COALESCE($5, last_lat),
                last_lon = COALESCE($6, last_lon),
                last_location_at = CASE WHEN $5::float8 IS NULL THEN last_location_at ELSE NOW() END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.display_name)
            .bind(&input.photo_url)
            .bind(input.favorite_song.as_ref().map(Json))
            .bind(lat)
            .bind(lon)
            .fetch_optional(pool)
            .await
    }

    /// Record the tier a user's monitor last reported.
    pub async fn set_current_threat(
        pool: &PgPool,
        id: DbId,
        input: &SetThreat,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                current_threat_tier = $2,
                current_threat_score = $3,
                current_threat_source = $4,
                current_threat_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(input.tier.as_str())
            .bind(input.score.map(i16::from))
            .bind(&input.source)
            .fetch_optional(pool)
            .await
    }
}
