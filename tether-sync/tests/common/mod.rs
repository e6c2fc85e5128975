//! Shared test resources for engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Arc, LazyLock};
use tether_client::{ApiRequest, Client, MemoryClient};
use tether_model::{EntitySchema, FieldDescriptor, SyncState};
use tether_sync::{Entity, Resource};
use tether_types::{ApiError, ApiResult, EntityId};
use tracing_subscriber::EnvFilter;

pub static NOTE: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new("note", "/notes")
        .with_common_fields()
        .with_field(FieldDescriptor::text("title", "title"))
        .with_field(FieldDescriptor::text("body", "body"))
        .with_field(FieldDescriptor::text("author", "authorName").always_send())
});

pub static COVER: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new("cover", "/covers")
        .with_field(FieldDescriptor::text("caption", "caption"))
});

/// A plain resource with no hooks.
#[derive(Debug, Clone)]
pub struct Note {
    entity: Entity,
}

impl Note {
    pub fn title(&self) -> Option<String> {
        self.entity.get_as("title")
    }

    pub fn set_title(&mut self, title: &str) {
        self.entity.set("title", title);
    }
}

impl Resource for Note {
    fn schema() -> &'static EntitySchema {
        &NOTE
    }

    fn from_entity(entity: Entity) -> Self {
        Self { entity }
    }

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

/// A note owning a dependent cover, referenced through `body`.
#[derive(Debug)]
pub struct CoveredNote {
    pub entity: Entity,
    pub cover: Option<Entity>,
    pub state_in_hook: Option<SyncState>,
}

#[async_trait]
impl Resource for CoveredNote {
    fn schema() -> &'static EntitySchema {
        &NOTE
    }

    fn from_entity(entity: Entity) -> Self {
        Self {
            entity,
            cover: None,
            state_in_hook: None,
        }
    }

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn validate(&self) -> ApiResult<()> {
        match self.entity.get_as::<String>("title") {
            Some(title) if !title.trim().is_empty() => Ok(()),
            _ => Err(ApiError::validation("title is required")),
        }
    }

    async fn after_fetch(&mut self) -> ApiResult<()> {
        self.state_in_hook = Some(self.sync_state());
        let Some(cover_id) = self.entity.get_as::<String>("body") else {
            return Ok(());
        };
        let mut cover = Entity::with_id(&COVER, Arc::clone(self.entity.client()), EntityId::parse(&cover_id)?);
        cover.fetch().await?;
        self.cover = Some(cover);
        Ok(())
    }

    async fn save_dependents(&mut self) -> ApiResult<()> {
        match &mut self.cover {
            Some(cover) => cover.save().await.map(|_| ()),
            None => Ok(()),
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn memory() -> (Arc<MemoryClient>, Arc<dyn Client>) {
    init_tracing();
    let memory = Arc::new(MemoryClient::new());
    let client: Arc<dyn Client> = memory.clone();
    (memory, client)
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

pub async fn last_request(memory: &MemoryClient) -> ApiRequest {
    memory
        .requests()
        .await
        .pop()
        .expect("no request recorded")
}

/// A client whose requests never complete.
pub struct StalledClient;

#[async_trait]
impl Client for StalledClient {
    async fn request(&self, _request: ApiRequest) -> ApiResult<Value> {
        std::future::pending().await
    }
}
