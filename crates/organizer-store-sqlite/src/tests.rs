//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use organizer_core::{
  note::{NewNote, NotePatch},
  patch::Field,
  store::{OrganizerStore, StoreError as _, StoreErrorKind},
  user::{NewUser, Role, UserPatch},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(username: &str) -> NewUser {
  NewUser {
    first_name:    "Ann".into(),
    last_name:     "Lee".into(),
    email:         format!("{username}@example.com"),
    username:      username.into(),
    password_hash: "hash".into(),
    role:          Role::Generic,
  }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_note(on: NaiveDate, content: &str) -> NewNote {
  NewNote { note_date: on, content: content.into(), hidden: false, starred: false }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;

  let user = s.create_user(new_user("ann")).await.unwrap();
  assert!(user.id > 0);
  assert_eq!(user.username, "ann");
  assert_eq!(user.role, Role::Generic);
  assert_eq!(user.created_at, user.updated_at);

  let fetched = s.get_user(user.id).await.unwrap().unwrap();
  assert_eq!(fetched, user);

  let by_name = s.get_user_by_username("ann").await.unwrap().unwrap();
  assert_eq!(by_name.id, user.id);
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(42).await.unwrap().is_none());
  assert!(s.get_user_by_username("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
  let s = store().await;
  s.create_user(new_user("ann")).await.unwrap();

  let mut dup = new_user("ann");
  dup.email = "other@example.com".into();
  let err = s.create_user(dup).await.unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::Conflict);
}

#[tokio::test]
async fn existence_checks() {
  let s = store().await;
  let ann = s.create_user(new_user("ann")).await.unwrap();
  let bob = s.create_user(new_user("bob")).await.unwrap();

  assert!(s.user_exists("ann", "x@example.com").await.unwrap());
  assert!(s.user_exists("x", "bob@example.com").await.unwrap());
  assert!(!s.user_exists("x", "x@example.com").await.unwrap());

  // A user's own name does not count against them.
  assert!(
    !s.username_or_email_taken_by_other(ann.id, "ann", "ann@example.com")
      .await
      .unwrap()
  );
  assert!(
    s.username_or_email_taken_by_other(ann.id, "bob", "ann@example.com")
      .await
      .unwrap()
  );
  assert!(
    s.username_or_email_taken_by_other(bob.id, "bob", "ann@example.com")
      .await
      .unwrap()
  );
}

#[tokio::test]
async fn list_and_count_users() {
  let s = store().await;
  assert_eq!(s.count_users().await.unwrap(), 0);

  let a = s.create_user(new_user("ann")).await.unwrap();
  let b = s.create_user(new_user("bob")).await.unwrap();

  let all = s.list_users().await.unwrap();
  assert_eq!(all.iter().map(|u| u.id).collect::<Vec<_>>(), vec![a.id, b.id]);
  assert_eq!(s.count_users().await.unwrap(), 2);
}

#[tokio::test]
async fn update_user_writes_only_set_fields() {
  let s = store().await;
  let user = s.create_user(new_user("ann")).await.unwrap();

  let patch = UserPatch {
    first_name: Field::Set("Anna".into()),
    role:       Field::Set(Role::Admin),
    ..Default::default()
  };
  let updated = s.update_user(user.id, patch).await.unwrap().unwrap();

  assert_eq!(updated.first_name, "Anna");
  assert_eq!(updated.role, Role::Admin);
  assert_eq!(updated.last_name, user.last_name);
  assert_eq!(updated.email, user.email);
  assert_eq!(updated.password_hash, user.password_hash);
  assert!(updated.updated_at >= user.updated_at);
}

#[tokio::test]
async fn update_user_into_taken_email_is_a_conflict() {
  let s = store().await;
  let ann = s.create_user(new_user("ann")).await.unwrap();
  s.create_user(new_user("bob")).await.unwrap();

  let patch = UserPatch { email: Field::Set("bob@example.com".into()), ..Default::default() };
  let err = s.update_user(ann.id, patch).await.unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::Conflict);
}

#[tokio::test]
async fn empty_user_patch_reads_back_unchanged() {
  let s = store().await;
  let user = s.create_user(new_user("ann")).await.unwrap();

  let back = s.update_user(user.id, UserPatch::default()).await.unwrap().unwrap();
  assert_eq!(back, user);
  assert_eq!(back.updated_at, user.updated_at);
}

#[tokio::test]
async fn update_missing_user_returns_none() {
  let s = store().await;
  let patch = UserPatch { first_name: Field::Set("x".into()), ..Default::default() };
  assert!(s.update_user(7, patch).await.unwrap().is_none());
  assert!(s.update_user(7, UserPatch::default()).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_user_cascades_to_notes() {
  let s = store().await;
  let ann = s.create_user(new_user("ann")).await.unwrap();
  let note = s.create_note(ann.id, new_note(date(2024, 1, 1), "hi")).await.unwrap();

  assert!(s.delete_user(ann.id).await.unwrap());
  assert!(!s.delete_user(ann.id).await.unwrap());
  assert!(s.get_note(ann.id, note.id).await.unwrap().is_none());
}

// ─── Notes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_note() {
  let s = store().await;
  let ann = s.create_user(new_user("ann")).await.unwrap();

  let note = s
    .create_note(ann.id, NewNote {
      note_date: date(2024, 3, 9),
      content:   "buy milk".into(),
      hidden:    false,
      starred:   true,
    })
    .await
    .unwrap();

  assert_eq!(note.user_id, ann.id);
  assert_eq!(note.note_date, date(2024, 3, 9));
  assert!(note.starred);

  let fetched = s.get_note(ann.id, note.id).await.unwrap().unwrap();
  assert_eq!(fetched, note);
}

#[tokio::test]
async fn notes_are_invisible_to_other_users() {
  let s = store().await;
  let ann = s.create_user(new_user("ann")).await.unwrap();
  let bob = s.create_user(new_user("bob")).await.unwrap();
  let note = s.create_note(ann.id, new_note(date(2024, 1, 1), "secret")).await.unwrap();

  assert!(s.get_note(bob.id, note.id).await.unwrap().is_none());
  assert!(s.list_notes(bob.id, date(2024, 1, 1), true).await.unwrap().is_empty());

  let patch = NotePatch { content: Field::Set("pwned".into()), ..Default::default() };
  assert!(s.update_note(bob.id, note.id, patch).await.unwrap().is_none());
  assert!(s.update_note(bob.id, note.id, NotePatch::default()).await.unwrap().is_none());
  assert!(!s.delete_note(bob.id, note.id).await.unwrap());

  // Untouched for the owner.
  let still = s.get_note(ann.id, note.id).await.unwrap().unwrap();
  assert_eq!(still.content, "secret");
}

#[tokio::test]
async fn list_notes_filters_by_date_and_hidden() {
  let s = store().await;
  let ann = s.create_user(new_user("ann")).await.unwrap();
  let day = date(2024, 5, 1);

  let visible = s.create_note(ann.id, new_note(day, "a")).await.unwrap();
  let hidden = s
    .create_note(ann.id, NewNote { hidden: true, ..new_note(day, "b") })
    .await
    .unwrap();
  s.create_note(ann.id, new_note(date(2024, 5, 2), "c")).await.unwrap();

  let shown = s.list_notes(ann.id, day, false).await.unwrap();
  assert_eq!(shown.iter().map(|n| n.id).collect::<Vec<_>>(), vec![visible.id]);

  let all = s.list_notes(ann.id, day, true).await.unwrap();
  assert_eq!(all.iter().map(|n| n.id).collect::<Vec<_>>(), vec![visible.id, hidden.id]);
}

#[tokio::test]
async fn content_only_update_keeps_the_date() {
  let s = store().await;
  let ann = s.create_user(new_user("ann")).await.unwrap();
  let note = s.create_note(ann.id, new_note(date(2024, 2, 29), "old")).await.unwrap();

  let patch = NotePatch { content: Field::Set("new".into()), ..Default::default() };
  let updated = s.update_note(ann.id, note.id, patch).await.unwrap().unwrap();

  assert_eq!(updated.content, "new");
  assert_eq!(updated.note_date, note.note_date);
  assert_eq!(updated.hidden, note.hidden);
  assert_eq!(updated.created_at, note.created_at);
  assert!(updated.updated_at >= note.updated_at);
}

#[tokio::test]
async fn explicit_empty_values_are_written() {
  let s = store().await;
  let ann = s.create_user(new_user("ann")).await.unwrap();
  let note = s
    .create_note(ann.id, NewNote { starred: true, ..new_note(date(2024, 1, 1), "text") })
    .await
    .unwrap();

  let patch = NotePatch {
    content: Field::Set(String::new()),
    starred: Field::Set(false),
    ..Default::default()
  };
  let updated = s.update_note(ann.id, note.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.content, "");
  assert!(!updated.starred);
}

#[tokio::test]
async fn empty_patch_reads_back_unchanged() {
  let s = store().await;
  let ann = s.create_user(new_user("ann")).await.unwrap();
  let note = s.create_note(ann.id, new_note(date(2024, 1, 1), "same")).await.unwrap();

  let back = s.update_note(ann.id, note.id, NotePatch::default()).await.unwrap().unwrap();
  assert_eq!(back, note);
}

#[tokio::test]
async fn concurrent_patches_are_last_writer_wins() {
  let s = store().await;
  let ann = s.create_user(new_user("ann")).await.unwrap();
  let note = s.create_note(ann.id, new_note(date(2024, 1, 1), "start")).await.unwrap();

  // `join!` polls the first update first, so its statement is queued on the
  // connection thread ahead of the second one.
  let (s1, s2) = (s.clone(), s.clone());
  let first = NotePatch { content: Field::Set("one".into()), ..Default::default() };
  let second = NotePatch { content: Field::Set("two".into()), ..Default::default() };
  let (a, b) = tokio::join!(
    s1.update_note(ann.id, note.id, first),
    s2.update_note(ann.id, note.id, second),
  );
  let (a, b) = (a.unwrap().unwrap(), b.unwrap().unwrap());

  assert_eq!(a.content, "one");
  assert_eq!(b.content, "two");
  assert!(b.updated_at >= a.updated_at);

  let stored = s.get_note(ann.id, note.id).await.unwrap().unwrap();
  assert_eq!(stored, b);
}

#[tokio::test]
async fn note_for_missing_owner_is_not_a_conflict() {
  let s = store().await;
  let err = s.create_note(404, new_note(date(2024, 1, 1), "orphan")).await.unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::MissingReference);
  assert_ne!(err.kind(), StoreErrorKind::Conflict);

  // A note whose owner was deleted after the fact is refused the same way.
  let ann = s.create_user(new_user("ann")).await.unwrap();
  assert!(s.delete_user(ann.id).await.unwrap());
  let err = s.create_note(ann.id, new_note(date(2024, 1, 1), "late")).await.unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::MissingReference);
}

#[tokio::test]
async fn delete_note() {
  let s = store().await;
  let ann = s.create_user(new_user("ann")).await.unwrap();
  let note = s.create_note(ann.id, new_note(date(2024, 1, 1), "x")).await.unwrap();

  assert!(s.delete_note(ann.id, note.id).await.unwrap());
  assert!(!s.delete_note(ann.id, note.id).await.unwrap());
  assert!(s.get_note(ann.id, note.id).await.unwrap().is_none());
}
