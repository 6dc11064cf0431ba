//! Repository for `friend_requests` and `friendships`.

use demodet_core::types::DbId;
use sqlx::PgPool;

use crate::models::friend::FriendRequest;
use crate::models::user::User;

const REQUEST_COLUMNS: &str = "id, from_user_id, to_user_id, created_at";

pub struct FriendRepo;

impl FriendRepo {
    /// Record a pending request from `from` to `to`.
    ///
    /// A repeated request violates `uq_friend_requests_pair`.
    pub async fn create_request(
        pool: &PgPool,
        from: DbId,
        to: DbId,
    ) -> Result<FriendRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO friend_requests (from_user_id, to_user_id)
             VALUES ($1, $2)
             RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, FriendRequest>(&query)
            .bind(from)
            .bind(to)
            .fetch_one(pool)
            .await
    }

    /// Requests waiting for `user_id` to accept, oldest first.
    pub async fn list_incoming_requests(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<FriendRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {REQUEST_COLUMNS} FROM friend_requests
             WHERE to_user_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, FriendRequest>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Accept the pending request from `from` to `to`.
    ///
    /// Consumes the request (and any mirror request in the other direction)
    /// and writes both friendship rows in one transaction. Returns `false`
    /// when no such request is pending.
    pub async fn accept(pool: &PgPool, from: DbId, to: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query(
            "DELETE FROM friend_requests WHERE from_user_id = $1 AND to_user_id = $2",
        )
        .bind(from)
        .bind(to)
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM friend_requests WHERE from_user_id = $2 AND to_user_id = $1")
            .bind(from)
            .bind(to)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO friendships (user_id, friend_id)
             VALUES ($1, $2), ($2, $1)
             ON CONFLICT DO NOTHING",
        )
        .bind(from)
        .bind(to)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    pub async fn are_friends(pool: &PgPool, a: DbId, b: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM friendships WHERE user_id = $1 AND friend_id = $2)",
        )
        .bind(a)
        .bind(b)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    pub async fn list_friend_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT friend_id FROM friendships WHERE user_id = $1 ORDER BY friend_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Full user rows of everyone `user_id` is friends with.
    pub async fn list_friends(pool: &PgPool, user_id: DbId) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT u.id, u.email, u.password_hash, u.display_name, u.photo_url, u.favorite_song,
                    u.current_threat_tier, u.current_threat_score, u.current_threat_source,
                    u.current_threat_at, u.last_lat, u.last_lon, u.last_location_at,
                    u.created_at, u.updated_at
             FROM friendships f
             JOIN users u ON u.id = f.friend_id
             WHERE f.user_id = $1
             ORDER BY u.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
