//! Core type definitions for Tether.
//!
//! This crate defines the shared types every other Tether crate
//! depends on:
//! - [`EntityId`]: opaque server-assigned identifiers
//! - [`ApiError`] / [`ApiResult`]: the uniform outcome of every network-backed call
//! - [`Permissions`]: read/write permission settings sent on create
//! - [`GeoLocation`], [`GeoRange`], [`DateRange`]: values and search constraints
//!
//! Object-specific types (users, albums, pictures) belong in `tether-objects`.

mod error;
mod geo;
mod ids;
mod permissions;
mod range;

pub use error::{ApiError, ApiResult, ErrorKind, FieldViolation};
pub use geo::{GeoLocation, GeoRange};
pub use ids::EntityId;
pub use permissions::Permissions;
pub use range::DateRange;
