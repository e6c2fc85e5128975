//! Entity lifecycle engine for Tether.
//!
//! [`Entity`] owns one object's id and field storage and runs the
//! fetch/save/delete lifecycle against a [`Client`](tether_client::Client):
//! creates send every set field, updates send only what changed, and
//! responses are merged back without touching fields that are still dirty.
//!
//! Typed objects wrap an `Entity` and implement [`Resource`], which adds
//! local validation and dependent fetch/save hooks. [`Collection`] provides
//! create, lookup and paged search for one resource type.

mod collection;
mod common;
mod entity;
mod query;
mod resource;

pub use collection::Collection;
pub use common::CommonFields;
pub use entity::{Entity, InFlightProbe};
pub use query::{DEFAULT_PAGE_SIZE, SearchQuery, SearchResult};
pub use resource::Resource;
