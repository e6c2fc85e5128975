use std::sync::LazyLock;
use tether_model::{EntitySchema, FieldDescriptor};
use tether_sync::{Entity, Resource};

static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new("checkin", "/checkins")
        .with_common_fields()
        .with_field(FieldDescriptor::text("comment", "comment"))
        .with_field(FieldDescriptor::text("description", "description"))
});

/// A user's presence at a place.
#[derive(Debug, Clone)]
pub struct Checkin {
    entity: Entity,
}

impl Checkin {
    pub fn comment(&self) -> Option<String> {
        self.entity.get_as("comment")
    }

    pub fn set_comment(&mut self, comment: Option<&str>) {
        self.entity.set("comment", comment);
    }

    pub fn description(&self) -> Option<String> {
        self.entity.get_as("description")
    }

    pub fn set_description(&mut self, description: Option<&str>) {
        self.entity.set("description", description);
    }
}

impl Resource for Checkin {
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
