use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
struct FieldSlot {
    value: Value,
    dirty: bool,
}

/// Field values of one entity, each with a dirty flag.
///
/// A field is dirty from the moment a setter changes its value until a
/// fetch or save response settles it. `Value::Null` marks a cleared field:
/// it reads back as absent but is still sent (as `null`) when dirty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    slots: BTreeMap<String, FieldSlot>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, `None` when unset or cleared.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.raw(name).filter(|v| !v.is_null())
    }

    /// Current value including explicit nulls.
    pub(crate) fn raw(&self, name: &str) -> Option<&Value> {
        self.slots.get(name).map(|slot| &slot.value)
    }

    /// Typed read. Values that do not deserialize as `T` read as absent.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Typed read falling back to `T::default()`.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        self.get_as(name).unwrap_or_default()
    }

    /// Writes a value and marks the field dirty.
    ///
    /// Writing the value a field already holds changes nothing and leaves
    /// its flag alone. Returns whether the value changed.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.slots.get_mut(name) {
            Some(slot) if slot.value == value => false,
            Some(slot) => {
                slot.value = value;
                slot.dirty = true;
                true
            }
            None if value.is_null() => false,
            None => {
                self.slots
                    .insert(name.to_string(), FieldSlot { value, dirty: true });
                true
            }
        }
    }

    /// Writes a value received from the server without marking it dirty.
    pub fn merge_clean(&mut self, name: &str, value: Value) {
        self.slots
            .insert(name.to_string(), FieldSlot { value, dirty: false });
    }

    /// Replaces every field with server state, all flags clear.
    pub fn replace_clean(&mut self, values: impl IntoIterator<Item = (String, Value)>) {
        self.slots = values
            .into_iter()
            .map(|(name, value)| (name, FieldSlot { value, dirty: false }))
            .collect();
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.slots.get(name).is_some_and(|slot| slot.dirty)
    }

    pub fn has_changes(&self) -> bool {
        self.slots.values().any(|slot| slot.dirty)
    }

    pub fn dirty_names(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.dirty)
            .map(|(name, _)| name.as_str())
    }

    pub fn clear_dirty<S: AsRef<str>>(&mut self, names: impl IntoIterator<Item = S>) {
        for name in names {
            if let Some(slot) = self.slots.get_mut(name.as_ref()) {
                slot.dirty = false;
            }
        }
    }

    pub fn clear_all_dirty(&mut self) {
        for slot in self.slots.values_mut() {
            slot.dirty = false;
        }
    }

    /// Every stored field, cleared ones included, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots
            .iter()
            .map(|(name, slot)| (name.as_str(), &slot.value))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
