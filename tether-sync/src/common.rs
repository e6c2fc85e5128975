use crate::Resource;
use chrono::{DateTime, Utc};
use tether_types::{GeoLocation, Permissions};

/// Accessors for the fields every server object carries.
pub trait CommonFields: Resource {
    fn created(&self) -> Option<DateTime<Utc>> {
        self.entity().get_as("created")
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.entity().get_as("last_modified")
    }

    fn location(&self) -> Option<GeoLocation> {
        self.entity().get_as("location")
    }

    fn set_location(&mut self, location: Option<GeoLocation>) {
        self.entity_mut().set("location", location);
    }

    fn tag(&self) -> Option<String> {
        self.entity().get_as("tag")
    }

    fn set_tag(&mut self, tag: Option<&str>) {
        self.entity_mut().set("tag", tag);
    }

    fn read_permissions(&self) -> Permissions {
        self.entity().get_or_default("read_permissions")
    }

    /// # Panics
    ///
    /// Panics once the object exists; permissions are fixed at creation.
    fn set_read_permissions(&mut self, permissions: Permissions) {
        self.entity_mut().set("read_permissions", permissions);
    }

    fn write_permissions(&self) -> Permissions {
        self.entity().get_or_default("write_permissions")
    }

    /// # Panics
    ///
    /// Panics once the object exists; permissions are fixed at creation.
    fn set_write_permissions(&mut self, permissions: Permissions) {
        self.entity_mut().set("write_permissions", permissions);
    }
}

impl<R: Resource> CommonFields for R {}
