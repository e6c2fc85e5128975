//! Objects derived from a pair of stored fields.
//!
//! A profile picture, for example, is stored on its owner as a picture id
//! and a signed URL. Readers get a picture object; writers assign one. The
//! object is cached and rebuilt only when either backing field no longer
//! matches what the cached object was built from.

use crate::FieldSet;
use serde_json::Value;

/// An object that can report the two field values it is stored as.
pub trait DerivedValue {
    /// The (key, auxiliary) values written when this object is assigned.
    fn backing(&self) -> (Option<Value>, Option<Value>);
}

/// A cached object derived from a key field and an auxiliary field.
#[derive(Debug, Clone)]
pub struct DerivedRef<T> {
    key_field: &'static str,
    aux_field: &'static str,
    cached: Option<T>,
    built_from: (Option<Value>, Option<Value>),
}

impl<T: DerivedValue> DerivedRef<T> {
    pub const fn new(key_field: &'static str, aux_field: &'static str) -> Self {
        Self {
            key_field,
            aux_field,
            cached: None,
            built_from: (None, None),
        }
    }

    /// Returns the cached object, rebuilding it first if stale.
    ///
    /// The cache is stale when either backing field differs from the values
    /// the cached object was built or assigned from, including a transition
    /// to or from absent. Changes made to the cached object itself never
    /// invalidate it. An absent key field yields `None`, as does a key
    /// `build` cannot use.
    pub fn get_or_rebuild(
        &mut self,
        fields: &FieldSet,
        build: impl FnOnce(&Value, Option<&Value>) -> Option<T>,
    ) -> Option<&mut T> {
        let key = fields.get(self.key_field);
        let aux = fields.get(self.aux_field);

        let (built_key, built_aux) = &self.built_from;
        if built_key.as_ref() != key || built_aux.as_ref() != aux {
            self.cached = key.and_then(|k| build(k, aux));
            self.built_from = (key.cloned(), aux.cloned());
        }
        self.cached.as_mut()
    }

    /// Assigns a new object (or none), writing both backing fields.
    pub fn set(&mut self, fields: &mut FieldSet, value: Option<T>) {
        let (key, aux) = value
            .as_ref()
            .map_or((None, None), DerivedValue::backing);
        fields.set(self.key_field, key.unwrap_or(Value::Null));
        fields.set(self.aux_field, aux.unwrap_or(Value::Null));
        self.built_from = (
            fields.get(self.key_field).cloned(),
            fields.get(self.aux_field).cloned(),
        );
        self.cached = value;
    }

    /// The cached object without a staleness check.
    pub fn peek(&self) -> Option<&T> {
        self.cached.as_ref()
    }
}
