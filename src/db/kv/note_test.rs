//! Tests for RedbNoteStore.

use tempfile::TempDir;

use super::tables::{NOTES, note_key};
use crate::db::testing;
use crate::db::{Database, DbError, ObjectId, RedbDatabase};

async fn setup_db() -> (TempDir, RedbDatabase) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db = RedbDatabase::open(dir.path().join("notepad.redb"))
        .await
        .expect("Failed to open database");
    db.migrate().await.expect("Migration should succeed");
    (dir, db)
}

#[tokio::test(flavor = "multi_thread")]
async fn note_crud() {
    let (_dir, db) = setup_db().await;
    testing::note_crud(&db).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn note_ownership_enforced() {
    let (_dir, db) = setup_db().await;
    testing::note_ownership_enforced(&db).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn note_invalid_ids_are_no_result() {
    let (_dir, db) = setup_db().await;
    testing::note_invalid_ids_are_no_result(&db).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn note_lists_are_per_user() {
    let (_dir, db) = setup_db().await;
    testing::note_lists_are_per_user(&db).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn note_prefix_scan_does_not_leak_between_owners() {
    let (_dir, db) = setup_db().await;
    let notes = db.notes();

    notes.create("one", "u1").await.unwrap();
    notes.create("ten", "u10").await.unwrap();
    notes.create("ten again", "u10").await.unwrap();

    let u1 = notes.list_by_user("u1").await.unwrap();
    assert_eq!(u1.len(), 1);
    assert_eq!(u1[0].content, "one");

    let u10 = notes.list_by_user("u10").await.unwrap();
    assert_eq!(u10.len(), 2);
    assert!(u10.iter().all(|n| n.user_id == "u10"));
}

#[tokio::test(flavor = "multi_thread")]
async fn note_other_owner_is_unauthorized_not_missing() {
    let (_dir, db) = setup_db().await;
    let notes = db.notes();

    let note = notes.create("mine", "u1").await.unwrap();

    assert!(matches!(
        notes.get_by_id("u2", &note.note_id()).await,
        Err(DbError::Unauthorized)
    ));
    assert!(matches!(
        notes.delete("u2", &ObjectId::new().to_hex()).await,
        Err(DbError::NoResult)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn note_hello_is_visible_only_to_its_owner() {
    let (_dir, db) = setup_db().await;
    let notes = db.notes();

    let note = notes.create("hello", "u1").await.unwrap();

    let listed = notes.list_by_user("u1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, "hello");
    assert!(notes.list_by_user("u2").await.unwrap().is_empty());
    assert!(matches!(
        notes.get_by_id("u2", &note.note_id()).await,
        Err(DbError::Unauthorized)
    ));
    assert_eq!(
        notes.get_by_id("u1", &note.note_id()).await.unwrap().content,
        "hello"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn note_list_skips_undecodable_records() {
    let (_dir, db) = setup_db().await;
    let notes = db.notes();
    notes.create("good", "u1").await.unwrap();

    let kv = db.manager().kv().await.unwrap();
    let corrupt_key = note_key("u1", &ObjectId::new().to_hex());
    let txn = kv.begin_write().unwrap();
    {
        let mut table = txn.open_table(NOTES).unwrap();
        table
            .insert(corrupt_key.as_str(), b"not json".as_slice())
            .unwrap();
    }
    txn.commit().unwrap();

    let listed = notes.list_by_user("u1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, "good");
}

#[tokio::test(flavor = "multi_thread")]
async fn note_list_before_migrate_is_empty() {
    let dir = TempDir::new().unwrap();
    let db = RedbDatabase::open(dir.path().join("fresh.redb"))
        .await
        .unwrap();

    assert!(db.notes().list_by_user("u1").await.unwrap().is_empty());
}
