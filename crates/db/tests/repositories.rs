//! Repository integration tests.
//!
//! `#[sqlx::test]` creates a fresh database per test from `DATABASE_URL`
//! and applies the workspace migrations.

use demodet_core::threat::{ScoreTier, ThreatLevel};
use demodet_db::models::alert::CreateAlert;
use demodet_db::models::user::{CreateUser, FavoriteSong, SetThreat, UpdateProfile, UserProfile};
use demodet_db::repositories::{AlertRepo, FriendRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        display_name: None,
    }
}

fn new_alert(level: ThreatLevel, score: Option<u8>) -> CreateAlert {
    CreateAlert {
        threat_level: level,
        score,
        message: None,
        sensor_data: None,
        created_at: None,
    }
}

fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.constraint() == Some(constraint),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_find_user(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("eleven@hawkins.test"))
        .await
        .unwrap();

    let by_id = UserRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "eleven@hawkins.test");

    let by_email = UserRepo::find_by_email(&pool, "eleven@hawkins.test")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, created.id);

    assert!(UserRepo::find_by_email(&pool, "nobody@hawkins.test")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("mike@hawkins.test"))
        .await
        .unwrap();
    let err = UserRepo::create(&pool, &new_user("mike@hawkins.test"))
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err, "uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_respects_limit(pool: PgPool) {
    for i in 0..5 {
        UserRepo::create(&pool, &new_user(&format!("kid{i}@hawkins.test")))
            .await
            .unwrap();
    }
    let users = UserRepo::list(&pool, 3).await.unwrap();
    assert_eq!(users.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_profile_is_partial(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("dustin@hawkins.test"))
        .await
        .unwrap();

    let first = UpdateProfile {
        display_name: Some("Dustin".into()),
        favorite_song: Some(FavoriteSong {
            title: "Never Ending Story".into(),
            artist: Some("Limahl".into()),
            url: None,
        }),
        ..Default::default()
    };
    UserRepo::update_profile(&pool, user.id, &first)
        .await
        .unwrap()
        .unwrap();

    let second = UpdateProfile {
        photo_url: Some("https://img.test/dustin.png".into()),
        lat: Some(39.1),
        lon: Some(-86.5),
        ..Default::default()
    };
    let updated = UserRepo::update_profile(&pool, user.id, &second)
        .await
        .unwrap()
        .unwrap();

    let profile = UserProfile::from(updated);
    assert_eq!(profile.display_name.as_deref(), Some("Dustin"));
    assert_eq!(profile.photo_url.as_deref(), Some("https://img.test/dustin.png"));
    assert_eq!(profile.favorite_song.unwrap().title, "Never Ending Story");
    let location = profile.location.unwrap();
    assert_eq!((location.lat, location.lon), (39.1, -86.5));
    assert!(location.updated_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_profile_missing_user(pool: PgPool) {
    let result = UserRepo::update_profile(&pool, 999_999, &UpdateProfile::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_current_threat(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("will@hawkins.test"))
        .await
        .unwrap();
    let input = SetThreat {
        tier: ScoreTier::High,
        score: Some(64),
        source: Some("monitor".into()),
    };
    let updated = UserRepo::set_current_threat(&pool, user.id, &input)
        .await
        .unwrap()
        .unwrap();

    let threat = UserProfile::from(updated).current_threat.unwrap();
    assert_eq!(threat.tier, "high");
    assert_eq!(threat.score, Some(64));
    assert!(threat.updated_at.is_some());
}

// ---------------------------------------------------------------------------
// Friends
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_friend_request_and_accept(pool: PgPool) {
    let lucas = UserRepo::create(&pool, &new_user("lucas@hawkins.test"))
        .await
        .unwrap();
    let max = UserRepo::create(&pool, &new_user("max@hawkins.test"))
        .await
        .unwrap();

    FriendRepo::create_request(&pool, lucas.id, max.id)
        .await
        .unwrap();
    let incoming = FriendRepo::list_incoming_requests(&pool, max.id)
        .await
        .unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].from_user_id, lucas.id);

    assert!(FriendRepo::accept(&pool, lucas.id, max.id).await.unwrap());

    assert!(FriendRepo::are_friends(&pool, lucas.id, max.id).await.unwrap());
    assert!(FriendRepo::are_friends(&pool, max.id, lucas.id).await.unwrap());
    assert_eq!(
        FriendRepo::list_friend_ids(&pool, max.id).await.unwrap(),
        vec![lucas.id]
    );
    let friends = FriendRepo::list_friends(&pool, lucas.id).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].email, "max@hawkins.test");
    assert!(FriendRepo::list_incoming_requests(&pool, max.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_accept_without_request(pool: PgPool) {
    let a = UserRepo::create(&pool, &new_user("a@hawkins.test"))
        .await
        .unwrap();
    let b = UserRepo::create(&pool, &new_user("b@hawkins.test"))
        .await
        .unwrap();

    assert!(!FriendRepo::accept(&pool, a.id, b.id).await.unwrap());
    assert!(!FriendRepo::are_friends(&pool, a.id, b.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_friend_request_rejected(pool: PgPool) {
    let a = UserRepo::create(&pool, &new_user("nancy@hawkins.test"))
        .await
        .unwrap();
    let b = UserRepo::create(&pool, &new_user("jonathan@hawkins.test"))
        .await
        .unwrap();

    FriendRepo::create_request(&pool, a.id, b.id).await.unwrap();
    let err = FriendRepo::create_request(&pool, a.id, b.id)
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err, "uq_friend_requests_pair"));
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_alerts_listed_newest_first(pool: PgPool) {
    let first = AlertRepo::create(&pool, None, &new_alert(ThreatLevel::Warning, Some(45)))
        .await
        .unwrap();
    let second = AlertRepo::create(&pool, None, &new_alert(ThreatLevel::Critical, Some(88)))
        .await
        .unwrap();

    let alerts = AlertRepo::list_recent(&pool, 10).await.unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].id, second.id);
    assert_eq!(alerts[1].id, first.id);
    assert_eq!(alerts[0].threat_level, "critical");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_alert_keeps_sensor_snapshot(pool: PgPool) {
    let mut input = new_alert(ThreatLevel::Danger, None);
    input.message = Some("Sound spike near the lab".into());
    input.sensor_data = Some(serde_json::json!({"temperature": 26.0, "soundLevel": 70.0, "aqi": 90.0}));

    let created = AlertRepo::create(&pool, None, &input).await.unwrap();
    let found = AlertRepo::list_recent(&pool, 1).await.unwrap().remove(0);

    assert_eq!(found.id, created.id);
    assert_eq!(found.score, None);
    assert_eq!(found.sensor_data.unwrap()["soundLevel"], 70.0);
    assert_eq!(found.message.as_deref(), Some("Sound spike near the lab"));
}
