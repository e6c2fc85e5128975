use crate::FieldSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tether_types::EntityId;

/// Describes an entity type: where it lives on the server and which fields it carries.
///
/// One schema exists per type and is consulted by a single generic
/// get/set/diff routine, so no per-type serialization code is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySchema {
    pub entity_type: String,
    /// Resource path segment, e.g. `/albums`. Instance paths append `/{id}`.
    pub path: String,
    pub fields: Vec<FieldDescriptor>,
}

/// A declared field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// In-memory name used by accessors (e.g. `first_name`).
    pub name: String,
    /// Key used in request bodies and responses (e.g. `firstName`).
    pub wire_name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub access: FieldAccess,
    /// Sent with every partial update, changed or not. The backend requires
    /// some fields to be present on every update.
    #[serde(default)]
    pub always_send: bool,
}

impl FieldDescriptor {
    fn simple(name: &str, wire_name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            wire_name: wire_name.into(),
            field_type,
            access: FieldAccess::ReadWrite,
            always_send: false,
        }
    }

    /// Shorthand for a text field.
    pub fn text(name: &str, wire_name: &str) -> Self {
        Self::simple(name, wire_name, FieldType::Text)
    }

    /// Shorthand for a numeric field.
    pub fn number(name: &str, wire_name: &str) -> Self {
        Self::simple(name, wire_name, FieldType::Number)
    }

    /// Shorthand for a boolean field.
    pub fn bool(name: &str, wire_name: &str) -> Self {
        Self::simple(name, wire_name, FieldType::Bool)
    }

    /// Shorthand for an RFC 3339 timestamp field.
    pub fn datetime(name: &str, wire_name: &str) -> Self {
        Self::simple(name, wire_name, FieldType::DateTime)
    }

    /// Shorthand for a field holding one of a closed set of string values.
    pub fn enumeration(name: &str, wire_name: &str) -> Self {
        Self::simple(name, wire_name, FieldType::Enum)
    }

    /// Shorthand for a geographic point field.
    pub fn geo_point(name: &str, wire_name: &str) -> Self {
        Self::simple(name, wire_name, FieldType::GeoPoint)
    }

    /// Shorthand for a read/write permission field. Permissions are fixed at creation.
    pub fn permissions(name: &str, wire_name: &str) -> Self {
        Self::simple(name, wire_name, FieldType::Permissions).create_only()
    }

    /// Shorthand for a field holding the id of another object.
    pub fn reference(name: &str, wire_name: &str) -> Self {
        Self::simple(name, wire_name, FieldType::Reference)
    }

    /// Shorthand for a URL field.
    pub fn url(name: &str, wire_name: &str) -> Self {
        Self::simple(name, wire_name, FieldType::Url)
    }

    /// Shorthand for an opaque JSON field.
    pub fn json(name: &str, wire_name: &str) -> Self {
        Self::simple(name, wire_name, FieldType::Json)
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.access = FieldAccess::ReadOnly;
        self
    }

    #[must_use]
    pub fn create_only(mut self) -> Self {
        self.access = FieldAccess::CreateOnly;
        self
    }

    #[must_use]
    pub fn always_send(mut self) -> Self {
        self.always_send = true;
        self
    }
}

/// The value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Bool,
    DateTime,
    Enum,
    GeoPoint,
    Permissions,
    Reference,
    Url,
    Json,
}

/// Who may write a field, and when it travels to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAccess {
    /// Sent on create and, when dirty, on update.
    #[default]
    ReadWrite,
    /// Sent on create only; immutable once the object exists.
    CreateOnly,
    /// Populated by the server; never sent.
    ReadOnly,
}

/// An outgoing request body together with the in-memory names it covers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub body: Map<String, Value>,
    /// Fields whose dirty flags the server response settles.
    pub fields: Vec<String>,
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl EntitySchema {
    pub fn new(entity_type: &str, path: &str) -> Self {
        Self {
            entity_type: entity_type.into(),
            path: path.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds the fields every server object carries.
    #[must_use]
    pub fn with_common_fields(self) -> Self {
        self.with_field(FieldDescriptor::datetime("created", "created").read_only())
            .with_field(FieldDescriptor::datetime("last_modified", "lastModified").read_only())
            .with_field(FieldDescriptor::geo_point("location", "location"))
            .with_field(FieldDescriptor::text("tag", "tag"))
            .with_field(FieldDescriptor::permissions("read_permissions", "readPermissions"))
            .with_field(FieldDescriptor::permissions("write_permissions", "writePermissions"))
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn by_wire_name(&self, wire_name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.wire_name == wire_name)
    }

    /// Path of a single instance: `{path}/{id}`.
    pub fn instance_path(&self, id: &EntityId) -> String {
        format!("{}/{}", self.path, id)
    }

    /// Builds a partial-update body: every dirty writable field plus every
    /// `always_send` field that holds a value.
    ///
    /// Dirty fields the server never accepts on update (read-only,
    /// create-only) are listed in `fields` without being sent, so a
    /// successful save settles them too.
    pub fn encode_changes(&self, fields: &FieldSet) -> Payload {
        let mut payload = Payload::default();
        for name in fields.dirty_names() {
            match self.field(name) {
                Some(desc) if desc.access == FieldAccess::ReadWrite => {
                    let value = fields.raw(name).cloned().unwrap_or(Value::Null);
                    payload.body.insert(desc.wire_name.clone(), value);
                }
                Some(_) => {}
                None => {
                    let value = fields.raw(name).cloned().unwrap_or(Value::Null);
                    payload.body.insert(name.to_string(), value);
                }
            }
            payload.fields.push(name.to_string());
        }
        for desc in self.fields.iter().filter(|f| f.always_send) {
            if payload.body.contains_key(&desc.wire_name) {
                continue;
            }
            if let Some(value) = fields.get(&desc.name) {
                payload.body.insert(desc.wire_name.clone(), value.clone());
                payload.fields.push(desc.name.clone());
            }
        }
        payload
    }

    /// Builds a create body: every writable or create-only field that holds a value.
    pub fn encode_all(&self, fields: &FieldSet) -> Payload {
        let mut payload = Payload::default();
        for (name, value) in fields.iter() {
            let desc = self.field(name);
            if desc.is_some_and(|d| d.access == FieldAccess::ReadOnly) {
                continue;
            }
            if !value.is_null() {
                let wire = desc.map_or(name, |d| d.wire_name.as_str());
                payload.body.insert(wire.to_string(), value.clone());
            }
            payload.fields.push(name.to_string());
        }
        payload
    }

    /// Maps a response object back to in-memory names.
    ///
    /// Unknown wire keys are kept under their wire name so nothing the
    /// server sent is lost. The `id` key is excluded; ids are handled by the
    /// lifecycle engine.
    pub fn decode(&self, object: &Map<String, Value>) -> Vec<(String, Value)> {
        object
            .iter()
            .filter(|(key, _)| key.as_str() != "id")
            .map(|(key, value)| {
                let name = self
                    .by_wire_name(key)
                    .map_or_else(|| key.clone(), |d| d.name.clone());
                (name, value.clone())
            })
            .collect()
    }
}
