use std::sync::LazyLock;
use tether_model::{EntitySchema, FieldDescriptor};
use tether_sync::{Entity, Resource};

static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new("user_list", "/lists")
        .with_common_fields()
        .with_field(FieldDescriptor::text("name", "name"))
});

#[derive(Debug, Clone)]
pub struct UserList {
    entity: Entity,
}

impl UserList {
    pub fn name(&self) -> Option<String> {
        self.entity.get_as("name")
    }

    pub fn set_name(&mut self, name: &str) {
        self.entity.set("name", name);
    }
}

impl Resource for UserList {
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
