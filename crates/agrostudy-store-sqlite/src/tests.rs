//! Integration tests for `SqliteGateway` against an in-memory database.

use agrostudy_core::{
  gateway::{AuthGateway, Gateway},
  identity::{Identity, NewIdentity},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::SqliteGateway;

async fn store() -> SqliteGateway {
  SqliteGateway::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(store: &SqliteGateway, email: &str) -> Identity {
  store
    .sign_up(NewIdentity {
      email:        email.into(),
      display_name: "Test User".into(),
      password:     "hunter2!".into(),
    })
    .await
    .unwrap()
}

fn note_row(owner: Uuid, title: &str) -> Value {
  json!({
    "id": Uuid::new_v4(),
    "owner_id": owner,
    "title": title,
    "content": "conteúdo",
    "subject_id": null,
    "tags": [],
  })
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sign_up_and_sign_in() {
  let s = store().await;
  let created = user(&s, "alice@example.com").await;

  let identity = s.sign_in("alice@example.com", "hunter2!").await.unwrap();
  assert_eq!(identity.id, created.id);
  assert_eq!(identity.display_name, "Test User");
}

#[tokio::test]
async fn sign_up_duplicate_email_errors() {
  let s = store().await;
  user(&s, "alice@example.com").await;

  let err = s
    .sign_up(NewIdentity {
      email:        "alice@example.com".into(),
      display_name: "Someone Else".into(),
      password:     "other".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::EmailTaken(_)));
}

#[tokio::test]
async fn sign_in_wrong_password_errors() {
  let s = store().await;
  user(&s, "alice@example.com").await;

  let err = s.sign_in("alice@example.com", "wrong").await.unwrap_err();
  assert!(matches!(err, crate::Error::InvalidCredentials));
}

#[tokio::test]
async fn sign_in_unknown_email_errors() {
  let s = store().await;
  let err = s.sign_in("nobody@example.com", "pw").await.unwrap_err();
  assert!(matches!(err, crate::Error::InvalidCredentials));
}

// ─── Rows ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_stamps_timestamps_and_returns_row() {
  let s = store().await;
  let owner = user(&s, "a@example.com").await;

  let stored = s.insert("notes", note_row(owner.id, "Aula 1")).await.unwrap();
  assert!(stored.get("created_at").and_then(Value::as_str).is_some());
  assert_eq!(stored["created_at"], stored["updated_at"]);
  assert_eq!(stored["title"], "Aula 1");
}

#[tokio::test]
async fn insert_without_id_errors() {
  let s = store().await;
  let owner = user(&s, "a@example.com").await;

  let err = s
    .insert("notes", json!({ "owner_id": owner.id, "title": "x" }))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::InvalidRow(_)));
}

#[tokio::test]
async fn fetch_all_is_owner_scoped() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let bob = user(&s, "bob@example.com").await;

  s.insert("notes", note_row(alice.id, "Alice's")).await.unwrap();
  s.insert("notes", note_row(bob.id, "Bob's")).await.unwrap();

  let rows = s.fetch_all("notes", alice.id).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0]["title"], "Alice's");
}

#[tokio::test]
async fn update_merges_patch_and_bumps_updated_at() {
  let s = store().await;
  let owner = user(&s, "a@example.com").await;

  let stored = s.insert("notes", note_row(owner.id, "Before")).await.unwrap();
  let id = Uuid::parse_str(stored["id"].as_str().unwrap()).unwrap();

  let updated = s
    .update("notes", id, owner.id, json!({ "title": "After" }))
    .await
    .unwrap();

  assert_eq!(updated["title"], "After");
  assert_eq!(updated["content"], "conteúdo");
  // created_at untouched; updated_at rewritten by the store.
  assert_eq!(updated["created_at"], stored["created_at"]);
}

#[tokio::test]
async fn update_with_wrong_owner_errors() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let bob = user(&s, "bob@example.com").await;

  let stored = s.insert("notes", note_row(alice.id, "Hers")).await.unwrap();
  let id = Uuid::parse_str(stored["id"].as_str().unwrap()).unwrap();

  let err = s
    .update("notes", id, bob.id, json!({ "title": "Mine now" }))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::RowNotFound(_)));
}

#[tokio::test]
async fn delete_removes_exactly_one_row() {
  let s = store().await;
  let owner = user(&s, "a@example.com").await;

  let first = s.insert("notes", note_row(owner.id, "One")).await.unwrap();
  s.insert("notes", note_row(owner.id, "Two")).await.unwrap();

  let id = Uuid::parse_str(first["id"].as_str().unwrap()).unwrap();
  s.delete("notes", id, owner.id).await.unwrap();

  let rows = s.fetch_all("notes", owner.id).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0]["title"], "Two");
}

#[tokio::test]
async fn delete_nonexistent_row_errors() {
  let s = store().await;
  let owner = user(&s, "a@example.com").await;

  let err = s.delete("notes", Uuid::new_v4(), owner.id).await.unwrap_err();
  assert!(matches!(err, crate::Error::RowNotFound(_)));
}

// ─── Objects ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_and_delete_object() {
  let s = store().await;

  s.upload_object("visit-photos", "u1/p1.jpg", vec![0xFF, 0xD8])
    .await
    .unwrap();
  s.delete_object("visit-photos", "u1/p1.jpg").await.unwrap();

  let err = s
    .delete_object("visit-photos", "u1/p1.jpg")
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::ObjectNotFound(_)));
}

#[tokio::test]
async fn public_url_is_derived_from_base() {
  let s = store().await;
  assert_eq!(
    s.public_url("pdfs", "u1/doc.pdf"),
    "local://agrostudy/pdfs/u1/doc.pdf"
  );
}
