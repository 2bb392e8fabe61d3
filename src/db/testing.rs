//! Behavior every backend must share, written once against `dyn Database`.
//!
//! Each backend's test module opens its own store and calls these.

use crate::db::{Database, DbError, IdKind, ObjectId, RecordId, STATUS_ACTIVE, User};

pub async fn register(db: &dyn Database, first_name: &str, email: &str) -> User {
    db.users()
        .create(first_name, "Doe", email, "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA")
        .await
        .expect("Create user should succeed")
}

/// An id of the right shape for `db` that no record carries.
fn missing_id(db: &dyn Database) -> String {
    match db.id_kind() {
        IdKind::Integer => "987654".to_string(),
        IdKind::Object => ObjectId::new().to_hex(),
    }
}

pub async fn user_create_and_find(db: &dyn Database) {
    let created = register(db, "Jane", "jane@example.com").await;
    assert_eq!(created.id.kind(), db.id_kind());
    assert_eq!(created.status_id, STATUS_ACTIVE);
    assert!(created.is_active());

    let found = db
        .users()
        .find_by_email("jane@example.com")
        .await
        .expect("Find should succeed");
    assert_eq!(found.id, created.id);
    assert_eq!(found.first_name, "Jane");
    assert_eq!(found.last_name, "Doe");
    assert_eq!(found.email, "jane@example.com");
    assert_eq!(found.password, created.password);

    let parsed = RecordId::parse(db.id_kind(), &found.user_id()).expect("Canonical id parses");
    assert_eq!(parsed, found.id);
}

pub async fn user_find_missing_is_no_result(db: &dyn Database) {
    let result = db.users().find_by_email("nobody@example.com").await;
    assert!(matches!(result, Err(DbError::NoResult)));
}

pub async fn user_duplicate_email_rejected(db: &dyn Database) {
    let first = register(db, "Jane", "dup@example.com").await;

    let result = db
        .users()
        .create("Janet", "Other", "dup@example.com", "hash")
        .await;
    assert!(matches!(result, Err(DbError::AlreadyExists { .. })));

    let found = db
        .users()
        .find_by_email("dup@example.com")
        .await
        .expect("Original account should remain");
    assert_eq!(found.id, first.id);
    assert_eq!(found.first_name, "Jane");
}

pub async fn note_crud(db: &dyn Database) {
    let user = register(db, "Jane", "notes@example.com").await;
    let user_id = user.user_id();
    let notes = db.notes();

    assert!(notes.list_by_user(&user_id).await.unwrap().is_empty());

    let first = notes.create("first note", &user_id).await.unwrap();
    let second = notes.create("second note", &user_id).await.unwrap();
    assert_eq!(first.user_id, user_id);
    assert_eq!(first.id.kind(), db.id_kind());
    assert_ne!(first.id, second.id);

    let listed = notes.list_by_user(&user_id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].content, "first note");
    assert_eq!(listed[1].content, "second note");

    let fetched = notes.get_by_id(&user_id, &first.note_id()).await.unwrap();
    assert_eq!(fetched.id, first.id);
    assert_eq!(fetched.content, "first note");

    let updated = notes
        .update("edited", &user_id, &first.note_id())
        .await
        .unwrap();
    assert_eq!(updated.id, first.id);
    assert_eq!(updated.content, "edited");
    assert!(updated.updated_at >= first.updated_at);

    let fetched = notes.get_by_id(&user_id, &first.note_id()).await.unwrap();
    assert_eq!(fetched.content, "edited");

    notes.delete(&user_id, &first.note_id()).await.unwrap();
    let result = notes.get_by_id(&user_id, &first.note_id()).await;
    assert!(matches!(result, Err(DbError::NoResult)));

    let listed = notes.list_by_user(&user_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, second.id);
}

pub async fn note_ownership_enforced(db: &dyn Database) {
    let owner = register(db, "Owner", "owner@example.com").await.user_id();
    let intruder = register(db, "Intruder", "intruder@example.com")
        .await
        .user_id();
    let notes = db.notes();

    let note = notes.create("private", &owner).await.unwrap();
    let note_id = note.note_id();

    assert!(matches!(
        notes.get_by_id(&intruder, &note_id).await,
        Err(DbError::Unauthorized)
    ));
    assert!(matches!(
        notes.update("hijacked", &intruder, &note_id).await,
        Err(DbError::Unauthorized)
    ));
    assert!(matches!(
        notes.delete(&intruder, &note_id).await,
        Err(DbError::Unauthorized)
    ));

    let untouched = notes.get_by_id(&owner, &note_id).await.unwrap();
    assert_eq!(untouched.content, "private");
    assert!(notes.list_by_user(&intruder).await.unwrap().is_empty());
}

pub async fn note_invalid_ids_are_no_result(db: &dyn Database) {
    let user_id = register(db, "Jane", "ids@example.com").await.user_id();
    let notes = db.notes();
    let missing = missing_id(db);

    for bad in ["", "not-an-id", "0", "-1", "zzzzzzzzzzzzzzzzzzzzzzzz", missing.as_str()] {
        assert!(
            matches!(notes.get_by_id(&user_id, bad).await, Err(DbError::NoResult)),
            "get_by_id({:?})",
            bad
        );
        assert!(
            matches!(notes.update("x", &user_id, bad).await, Err(DbError::NoResult)),
            "update({:?})",
            bad
        );
        assert!(
            matches!(notes.delete(&user_id, bad).await, Err(DbError::NoResult)),
            "delete({:?})",
            bad
        );
    }
}

pub async fn note_lists_are_per_user(db: &dyn Database) {
    let alice = register(db, "Alice", "alice@example.com").await.user_id();
    let bob = register(db, "Bob", "bob@example.com").await.user_id();
    let notes = db.notes();

    notes.create("alice one", &alice).await.unwrap();
    notes.create("alice two", &alice).await.unwrap();
    notes.create("bob one", &bob).await.unwrap();

    let alice_notes = notes.list_by_user(&alice).await.unwrap();
    assert_eq!(alice_notes.len(), 2);
    assert!(alice_notes.iter().all(|n| n.is_owned_by(&alice)));

    let bob_notes = notes.list_by_user(&bob).await.unwrap();
    assert_eq!(bob_notes.len(), 1);
    assert_eq!(bob_notes[0].content, "bob one");
}
