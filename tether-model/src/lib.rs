//! Entity field model for Tether.
//!
//! Defines the network-free half of entity synchronization:
//! - [`EntitySchema`]: a per-type table of [`FieldDescriptor`]s (name, wire name, type, access)
//! - [`FieldSet`]: field values with per-field dirty flags
//! - [`Payload`]: the minimal create/update bodies computed from a `FieldSet`
//! - [`SyncState`]: New / Clean / Dirty / InFlight
//! - [`DerivedRef`]: a cached object derived from two backing fields
//!
//! The lifecycle engine in `tether-sync` drives these types against a client.

mod derived;
mod fields;
mod schema;
mod state;

pub use derived::{DerivedRef, DerivedValue};
pub use fields::FieldSet;
pub use schema::{EntitySchema, FieldAccess, FieldDescriptor, FieldType, Payload};
pub use state::SyncState;
