use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tether_client::{ApiRequest, Client, FileUpload};
use tether_model::{EntitySchema, FieldAccess, FieldSet, SyncState};
use tether_types::{ApiError, ApiResult, EntityId};
use tracing::{debug, info};

/// Raised for the duration of a network call; lowered on drop, so a
/// cancelled future cannot leave its entity in flight.
pub(crate) struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Observes whether an entity has a call outstanding, from outside the
/// task that owns it.
#[derive(Debug, Clone)]
pub struct InFlightProbe(Arc<AtomicUsize>);

impl InFlightProbe {
    pub fn is_in_flight(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }
}

/// One server object: its id, its fields and their dirty flags.
///
/// Mutating operations take `&mut self`; an entity has one writer at a time.
pub struct Entity {
    schema: &'static EntitySchema,
    client: Arc<dyn Client>,
    id: Option<EntityId>,
    fields: FieldSet,
    in_flight: Arc<AtomicUsize>,
}

impl Entity {
    /// A new object, not yet on the server.
    pub fn new(schema: &'static EntitySchema, client: Arc<dyn Client>) -> Self {
        Self {
            schema,
            client,
            id: None,
            fields: FieldSet::new(),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A reference to an existing object whose fields have not been fetched.
    pub fn with_id(schema: &'static EntitySchema, client: Arc<dyn Client>, id: EntityId) -> Self {
        let mut entity = Self::new(schema, client);
        entity.id = Some(id);
        entity
    }

    /// Hydrates a clean entity from a server object. The object must carry an `id`.
    pub fn from_server(
        schema: &'static EntitySchema,
        client: Arc<dyn Client>,
        object: &Map<String, Value>,
    ) -> ApiResult<Self> {
        let id = response_id(schema, object)?;
        let mut entity = Self::with_id(schema, client, id);
        entity.fields.replace_clean(schema.decode(object));
        Ok(entity)
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    pub fn client(&self) -> &Arc<dyn Client> {
        &self.client
    }

    pub fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    pub fn sync_state(&self) -> SyncState {
        SyncState::derive(
            self.id.is_some(),
            self.fields.has_changes(),
            self.in_flight.load(Ordering::SeqCst) > 0,
        )
    }

    pub fn in_flight_probe(&self) -> InFlightProbe {
        InFlightProbe(Arc::clone(&self.in_flight))
    }

    pub(crate) fn enter_in_flight(&self) -> InFlightGuard {
        InFlightGuard::enter(&self.in_flight)
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Direct access to field storage, bypassing descriptor checks.
    pub fn fields_mut(&mut self) -> &mut FieldSet {
        &mut self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.fields.get_as(name)
    }

    pub fn get_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        self.fields.get_or_default(name)
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.fields.is_dirty(name)
    }

    /// Sets a declared field and marks it dirty if the value changed.
    /// `None` clears the field.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not declared by the schema, is read-only, is
    /// create-only and the object already exists, or if `value` cannot be
    /// represented as JSON.
    pub fn set<V: Serialize>(&mut self, name: &str, value: V) -> bool {
        let Some(desc) = self.schema.field(name) else {
            panic!("{} declares no field {name:?}", self.schema.entity_type);
        };
        match desc.access {
            FieldAccess::ReadOnly => {
                panic!("{}.{name} is read-only", self.schema.entity_type)
            }
            FieldAccess::CreateOnly if self.id.is_some() => {
                panic!("{}.{name} cannot change after creation", self.schema.entity_type)
            }
            _ => {}
        }
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            panic!("{}.{name}: value is not representable as JSON: {e}", self.schema.entity_type)
        });
        self.fields.set(name, value)
    }

    /// Clears a field. Equivalent to `set(name, None::<()>)`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Entity::set`].
    pub fn clear(&mut self, name: &str) -> bool {
        self.set(name, Value::Null)
    }

    /// Replaces local fields with the server's copy.
    ///
    /// On failure nothing local changes.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no id.
    pub async fn fetch(&mut self) -> ApiResult<bool> {
        let id = self.require_id("fetch");
        let path = self.schema.instance_path(&id);
        let _guard = self.enter_in_flight();

        debug!("Fetching {path}");
        let response = self.client.request(ApiRequest::get(path)).await?;
        let object = expect_object(self.schema, response)?;
        self.fields.replace_clean(self.schema.decode(&object));
        Ok(true)
    }

    /// Creates the object or sends its changed fields.
    ///
    /// A new object is created with every set field. An existing object
    /// sends its dirty fields plus every always-sent field; with nothing
    /// dirty no request is made. On success the fields that were sent are
    /// clean and server corrections are merged into every field that is not
    /// dirty.
    pub async fn save(&mut self) -> ApiResult<bool> {
        let Some(id) = self.id.clone() else {
            let payload = self.schema.encode_all(&self.fields);
            let request = ApiRequest::post(self.schema.path.clone(), payload.body);
            return self.create(request, payload.fields).await;
        };

        if !self.fields.has_changes() {
            debug!("{} {id} has no changes", self.schema.entity_type);
            return Ok(true);
        }

        let payload = self.schema.encode_changes(&self.fields);
        if payload.is_empty() {
            self.fields.clear_dirty(&payload.fields);
            return Ok(true);
        }

        let path = self.schema.instance_path(&id);
        let _guard = self.enter_in_flight();
        debug!("Updating {path} ({} fields)", payload.body.len());
        let response = self.client.request(ApiRequest::patch(path, payload.body)).await?;

        self.fields.clear_dirty(&payload.fields);
        if let Value::Object(object) = response {
            self.merge(&object);
        }
        Ok(true)
    }

    /// Creates the object through a file upload carrying its set fields.
    ///
    /// # Panics
    ///
    /// Panics if the object already exists.
    pub async fn save_with_file(&mut self, data: Vec<u8>, content_type: &str) -> ApiResult<bool> {
        if let Some(id) = &self.id {
            panic!("{} {id} already exists; file content is sent on create only", self.schema.entity_type);
        }
        let payload = self.schema.encode_all(&self.fields);
        let upload = FileUpload {
            metadata: payload.body,
            data,
            content_type: content_type.to_string(),
        };
        let request = ApiRequest::upload(self.schema.path.clone(), upload);
        self.create(request, payload.fields).await
    }

    /// Deletes the object on the server. On success the entity is new again
    /// and keeps its field values.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no id.
    pub async fn delete(&mut self) -> ApiResult<bool> {
        let id = self.require_id("delete");
        let path = self.schema.instance_path(&id);
        let _guard = self.enter_in_flight();

        self.client.request(ApiRequest::delete(path)).await?;
        info!("Deleted {} {id}", self.schema.entity_type);
        self.id = None;
        Ok(true)
    }

    async fn create(&mut self, request: ApiRequest, sent: Vec<String>) -> ApiResult<bool> {
        let _guard = self.enter_in_flight();
        debug!("Creating {}", request.path);
        let response = self.client.request(request).await?;
        let object = expect_object(self.schema, response)?;
        let id = response_id(self.schema, &object)?;
        info!("Created {} {id}", self.schema.entity_type);

        self.assign_id(id);
        self.fields.clear_dirty(&sent);
        self.merge(&object);
        Ok(true)
    }

    fn merge(&mut self, object: &Map<String, Value>) {
        for (name, value) in self.schema.decode(object) {
            if !self.fields.is_dirty(&name) {
                self.fields.merge_clean(&name, value);
            }
        }
    }

    fn assign_id(&mut self, id: EntityId) {
        if let Some(existing) = &self.id {
            assert_eq!(
                existing, &id,
                "{} id cannot be reassigned",
                self.schema.entity_type
            );
        }
        self.id = Some(id);
    }

    fn require_id(&self, operation: &str) -> EntityId {
        match &self.id {
            Some(id) => id.clone(),
            None => panic!(
                "cannot {operation} a {} that has not been created",
                self.schema.entity_type
            ),
        }
    }
}

impl Clone for Entity {
    /// Copies id and fields. The clone has no call in flight.
    fn clone(&self) -> Self {
        Self {
            schema: self.schema,
            client: Arc::clone(&self.client),
            id: self.id.clone(),
            fields: self.fields.clone(),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("entity_type", &self.schema.entity_type)
            .field("id", &self.id)
            .field("state", &self.sync_state())
            .field("fields", &self.fields)
            .finish()
    }
}

fn expect_object(schema: &EntitySchema, response: Value) -> ApiResult<Map<String, Value>> {
    match response {
        Value::Object(object) => Ok(object),
        other => Err(ApiError::unknown(format!(
            "expected a {} object, got {other}",
            schema.entity_type
        ))),
    }
}

fn response_id(schema: &EntitySchema, object: &Map<String, Value>) -> ApiResult<EntityId> {
    match object.get("id").and_then(Value::as_str) {
        Some(id) => EntityId::parse(id),
        None => Err(ApiError::unknown(format!(
            "{} response carries no id",
            schema.entity_type
        ))),
    }
}
