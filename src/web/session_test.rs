use std::collections::HashMap;

use chrono::Utc;
use tower_sessions::cookie::time::{Duration, OffsetDateTime};
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{ExpiredDeletion, SessionStore};

use crate::db::{RecordId, STATUS_ACTIVE, User};
use crate::web::{Flash, FlashClass, SessionData, open_store};

fn jane() -> User {
    let now = Utc::now();
    User {
        id: RecordId::Int(9),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane@example.com".to_string(),
        password: "hash".to_string(),
        status_id: STATUS_ACTIVE,
        created_at: now,
        updated_at: now,
        deleted: 0,
    }
}

#[test]
fn flashes_are_taken_once() {
    let mut data = SessionData::default();
    data.add_flash("Note added!", FlashClass::Success);

    let flashes = data.take_flashes();
    assert_eq!(
        flashes,
        vec![Flash {
            message: "Note added!".to_string(),
            class: FlashClass::Success,
        }]
    );
    assert!(data.take_flashes().is_empty());
}

#[test]
fn log_in_replaces_previous_state() {
    let mut data = SessionData {
        login_attempt: 3,
        csrf_token: Some("old".to_string()),
        ..Default::default()
    };
    data.log_in(&jane());

    assert!(data.is_authenticated());
    assert_eq!(data.user_id.as_deref(), Some("9"));
    assert_eq!(data.first_name.as_deref(), Some("Jane"));
    assert_eq!(data.email.as_deref(), Some("jane@example.com"));
    assert_eq!(data.login_attempt, 0);
    assert_eq!(data.csrf_token, None);
}

#[test]
fn clear_logs_out() {
    let mut data = SessionData::default();
    data.log_in(&jane());
    data.clear();
    assert!(!data.is_authenticated());
}

#[test]
fn payload_tolerates_missing_fields() {
    let data: SessionData = serde_json::from_str(r#"{"login_attempt": 2}"#).unwrap();
    assert_eq!(data.login_attempt, 2);
    assert!(data.flashes.is_empty());

    let flash: Flash = serde_json::from_str(r#"{"message":"hi","class":"warning"}"#).unwrap();
    assert_eq!(flash.class, FlashClass::Warning);
}

fn record(expiry_date: OffsetDateTime) -> Record {
    let mut data = HashMap::new();
    data.insert("notepad.session".to_string(), serde_json::json!({ "login_attempt": 2 }));
    Record {
        id: Id::default(),
        data,
        expiry_date,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_session_is_not_loaded() {
    let store = open_store("sqlite::memory:").await.unwrap();

    let mut expired = record(OffsetDateTime::now_utc() - Duration::minutes(5));
    store.create(&mut expired).await.unwrap();
    let mut live = record(OffsetDateTime::now_utc() + Duration::hours(1));
    store.create(&mut live).await.unwrap();

    assert!(store.load(&expired.id).await.unwrap().is_none());
    let loaded = store.load(&live.id).await.unwrap().expect("live session loads");
    assert_eq!(loaded.data, live.data);
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_cleanup_keeps_live_sessions() {
    let store = open_store("sqlite::memory:").await.unwrap();

    let mut expired = record(OffsetDateTime::now_utc() - Duration::minutes(5));
    store.create(&mut expired).await.unwrap();
    let mut live = record(OffsetDateTime::now_utc() + Duration::hours(1));
    store.create(&mut live).await.unwrap();

    store.delete_expired().await.unwrap();

    assert!(store.load(&expired.id).await.unwrap().is_none());
    assert!(store.load(&live.id).await.unwrap().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn store_creates_missing_parent_directories() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("sessions.db");
    let url = format!("sqlite://{}?mode=rwc", path.display());

    let store = open_store(&url).await.unwrap();
    let mut live = record(OffsetDateTime::now_utc() + Duration::hours(1));
    store.create(&mut live).await.unwrap();
    assert!(path.exists());
}
