use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tether_client::Client;
use tether_model::{DerivedValue, EntitySchema, FieldDescriptor};
use tether_sync::{Entity, Resource};
use tether_types::EntityId;

static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new("picture", "/pictures")
        .with_common_fields()
        .with_field(FieldDescriptor::text("caption", "caption"))
        .with_field(FieldDescriptor::url("signed_url", "signedUrl").read_only())
        .with_field(FieldDescriptor::text("content_type", "contentType").read_only())
});

/// An uploaded image. Created through [`PictureCollection::add`](crate::PictureCollection::add).
#[derive(Debug, Clone)]
pub struct Picture {
    entity: Entity,
}

impl Picture {
    /// A clean reference to an existing picture, e.g. one named by another
    /// object's fields. Nothing is fetched.
    pub fn reference(client: Arc<dyn Client>, id: EntityId, signed_url: Option<String>) -> Self {
        let mut entity = Entity::with_id(&SCHEMA, client, id);
        if let Some(url) = signed_url {
            entity.fields_mut().merge_clean("signed_url", Value::String(url));
        }
        Self { entity }
    }

    pub fn caption(&self) -> Option<String> {
        self.entity.get_as("caption")
    }

    pub fn set_caption(&mut self, caption: Option<&str>) {
        self.entity.set("caption", caption);
    }

    /// Time-limited download URL issued by the server.
    pub fn signed_url(&self) -> Option<String> {
        self.entity.get_as("signed_url")
    }

    pub fn content_type(&self) -> Option<String> {
        self.entity.get_as("content_type")
    }
}

impl DerivedValue for Picture {
    fn backing(&self) -> (Option<Value>, Option<Value>) {
        (
            self.entity.id().map(|id| Value::String(id.to_string())),
            self.signed_url().map(Value::String),
        )
    }
}

impl Resource for Picture {
    fn schema() -> &'static EntitySchema {
        &SCHEMA
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
