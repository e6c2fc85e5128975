//! Typed Tether objects.
//!
//! Each object type wraps a `tether_sync::Entity` with its own field
//! table and accessors; each collection adds type-specific create and
//! search calls on top of `tether_sync::Collection`.
//!
//! ```ignore
//! let objects = Objects::from_env()?;
//! let album = objects.albums().add("Trip", None, &CreateOptions::default()).await?;
//! ```

mod album;
mod checkin;
mod collections;
mod objects;
mod options;
mod picture;
mod user;
mod user_list;

pub use album::Album;
pub use checkin::Checkin;
pub use collections::{
    AlbumCollection, CheckinCollection, PictureCollection, UserCollection, UserFilter,
    UserListCollection,
};
pub use objects::Objects;
pub use options::CreateOptions;
pub use picture::Picture;
pub use user::{User, UserGender};
pub use user_list::UserList;

pub use tether_sync::{CommonFields, Resource, SearchQuery, SearchResult};
