use std::sync::LazyLock;
use tether_model::{EntitySchema, FieldDescriptor};
use tether_sync::{Entity, Resource};

static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new("album", "/albums")
        .with_common_fields()
        .with_field(FieldDescriptor::text("name", "name"))
        .with_field(FieldDescriptor::text("caption", "caption"))
});

/// A named group of pictures.
#[derive(Debug, Clone)]
pub struct Album {
    entity: Entity,
}

impl Album {
    pub fn name(&self) -> Option<String> {
        self.entity.get_as("name")
    }

    pub fn set_name(&mut self, name: &str) {
        self.entity.set("name", name);
    }

    pub fn caption(&self) -> Option<String> {
        self.entity.get_as("caption")
    }

    pub fn set_caption(&mut self, caption: Option<&str>) {
        self.entity.set("caption", caption);
    }
}

impl Resource for Album {
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
