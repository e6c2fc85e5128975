mod common;

use common::{COVER, CoveredNote, Note, memory};
use serde_json::json;
use std::sync::Arc;
use tether_client::Method;
use tether_model::SyncState;
use tether_sync::{CommonFields, Entity, Resource};
use tether_types::{ApiError, EntityId, ErrorKind, GeoLocation, Permissions};

// ── Fetch hooks ──────────────────────────────────────────────────

#[tokio::test]
async fn after_fetch_runs_while_in_flight() {
    let (memory, client) = memory();
    let cover = memory.seed("/covers", json!({"caption": "blue"})).await;
    let id = memory
        .seed("/notes", json!({"title": "t", "body": cover.as_str()}))
        .await;

    let mut note = CoveredNote::from_entity(Entity::with_id(CoveredNote::schema(), client, id));
    assert!(note.fetch().await.unwrap());

    assert_eq!(note.state_in_hook, Some(SyncState::InFlight));
    assert_eq!(note.sync_state(), SyncState::Clean);
    let cover = note.cover.as_ref().unwrap();
    assert_eq!(cover.get_as::<String>("caption").as_deref(), Some("blue"));
}

#[tokio::test]
async fn dependent_fetch_failure_does_not_fail_fetch() {
    let (memory, client) = memory();
    let id = memory
        .seed("/notes", json!({"title": "t", "body": "covers-404"}))
        .await;

    let mut note = CoveredNote::from_entity(Entity::with_id(CoveredNote::schema(), client, id));
    assert!(note.fetch().await.unwrap());
    assert!(note.cover.is_none());
    assert_eq!(note.sync_state(), SyncState::Clean);
}

#[tokio::test]
async fn failed_fetch_skips_hook() {
    let (_, client) = memory();
    let mut note = CoveredNote::from_entity(Entity::with_id(
        CoveredNote::schema(),
        client,
        EntityId::parse("notes-1").unwrap(),
    ));
    assert_eq!(note.fetch().await.unwrap_err().kind(), ErrorKind::NotFound);
    assert!(note.state_in_hook.is_none());
}

// ── Save hooks ───────────────────────────────────────────────────

#[tokio::test]
async fn validation_failure_sends_nothing() {
    let (memory, client) = memory();
    let mut note = CoveredNote::from_entity(Entity::new(CoveredNote::schema(), client));
    note.entity.set("title", "  ");

    let err = note.save().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    assert!(memory.requests().await.is_empty());
    assert_eq!(note.sync_state(), SyncState::New);
}

async fn fetched_covered_note(
    memory: &tether_client::MemoryClient,
    client: Arc<dyn tether_client::Client>,
) -> CoveredNote {
    let cover = memory.seed("/covers", json!({"caption": "blue"})).await;
    let id = memory
        .seed("/notes", json!({"title": "t", "body": cover.as_str()}))
        .await;
    let mut note = CoveredNote::from_entity(Entity::with_id(CoveredNote::schema(), client, id));
    note.fetch().await.unwrap();
    note
}

#[tokio::test]
async fn dependent_save_failure_is_the_result() {
    let (memory, client) = memory();
    let mut note = fetched_covered_note(&memory, client).await;
    note.entity.set("title", "new title");
    note.cover.as_mut().unwrap().set("caption", "red");
    memory
        .fail_next(Method::Patch, "/covers", ApiError::Conflict("stale cover".into()))
        .await;

    let err = note.save().await.unwrap_err();

    assert_eq!(err, ApiError::Conflict("stale cover".into()));
    // The parent update already went through and is not undone.
    assert_eq!(note.entity.sync_state(), SyncState::Clean);
    assert_eq!(note.cover.as_ref().unwrap().sync_state(), SyncState::Dirty);
}

#[tokio::test]
async fn dependents_saved_even_when_parent_fails() {
    let (memory, client) = memory();
    let mut note = fetched_covered_note(&memory, client).await;
    note.entity.set("title", "new title");
    note.cover.as_mut().unwrap().set("caption", "red");
    memory
        .fail_next(Method::Patch, "/notes", ApiError::Network("reset".into()))
        .await;

    let err = note.save().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    assert_eq!(note.entity.sync_state(), SyncState::Dirty);
    assert_eq!(note.cover.as_ref().unwrap().sync_state(), SyncState::Clean);
}

#[tokio::test]
async fn parent_failure_wins_when_both_saves_fail() {
    let (memory, client) = memory();
    let mut note = fetched_covered_note(&memory, client).await;
    note.entity.set("title", "new title");
    note.cover.as_mut().unwrap().set("caption", "red");
    memory
        .fail_next(Method::Patch, "/notes", ApiError::Network("reset".into()))
        .await;
    memory
        .fail_next(Method::Patch, "/covers", ApiError::Conflict("stale cover".into()))
        .await;

    let err = note.save().await.unwrap_err();

    assert_eq!(err, ApiError::Network("reset".into()));
    assert_eq!(note.entity.sync_state(), SyncState::Dirty);
    assert_eq!(note.cover.as_ref().unwrap().sync_state(), SyncState::Dirty);
}

#[tokio::test]
async fn composite_save_success() {
    let (memory, client) = memory();
    let mut note = fetched_covered_note(&memory, client).await;
    note.cover.as_mut().unwrap().set("caption", "green");

    assert!(note.save().await.unwrap());

    let cover_id = note.cover.as_ref().unwrap().id().unwrap().clone();
    let mut check = Entity::with_id(&COVER, Arc::clone(note.entity.client()), cover_id);
    check.fetch().await.unwrap();
    assert_eq!(check.get_as::<String>("caption").as_deref(), Some("green"));
}

// ── Common fields ────────────────────────────────────────────────

#[tokio::test]
async fn common_fields_roundtrip_through_server() {
    let (_, client) = memory();
    let mut note = Note::from_entity(Entity::new(Note::schema(), client));
    note.set_title("Trip");
    note.set_tag(Some("travel"));
    note.set_location(Some(GeoLocation::new(47.6, -122.3)));
    note.set_read_permissions(Permissions::Owner);
    note.set_write_permissions(Permissions::Owner);
    note.save().await.unwrap();

    let id = note.id().unwrap().clone();
    let mut copy = Note::from_entity(Entity::with_id(Note::schema(), Arc::clone(note.entity().client()), id));
    copy.fetch().await.unwrap();

    assert_eq!(copy.title().as_deref(), Some("Trip"));
    assert_eq!(copy.tag().as_deref(), Some("travel"));
    assert_eq!(copy.location(), Some(GeoLocation::new(47.6, -122.3)));
    assert_eq!(copy.read_permissions(), Permissions::Owner);
    assert_eq!(copy.write_permissions(), Permissions::Owner);
    assert!(copy.created().is_some());
    assert!(copy.last_modified().is_some());
}

#[test]
fn permissions_default_when_unset() {
    let (_, client) = memory();
    let note = Note::from_entity(Entity::new(Note::schema(), client));
    assert_eq!(note.read_permissions(), Permissions::Default);
    assert!(note.tag().is_none());
}

#[test]
#[should_panic(expected = "cannot change after creation")]
fn permissions_fixed_after_creation() {
    let (_, client) = memory();
    let mut note = Note::from_entity(Entity::with_id(
        Note::schema(),
        client,
        EntityId::parse("notes-1").unwrap(),
    ));
    note.set_write_permissions(Permissions::Anyone);
}

#[tokio::test]
async fn resource_delete() {
    let (memory, client) = memory();
    let id = memory.seed("/notes", json!({"title": "x"})).await;
    let mut note = Note::from_entity(Entity::with_id(Note::schema(), client, id));
    assert!(note.delete().await.unwrap());
    assert_eq!(note.sync_state(), SyncState::New);
}
