use tether_sync::CommonFields;
use tether_types::{GeoLocation, Permissions};

/// Settings every object accepts when it is created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateOptions {
    pub location: Option<GeoLocation>,
    pub tag: Option<String>,
    pub read_permissions: Permissions,
    pub write_permissions: Permissions,
}

impl CreateOptions {
    #[must_use]
    pub fn at(mut self, location: GeoLocation) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn permissions(mut self, read: Permissions, write: Permissions) -> Self {
        self.read_permissions = read;
        self.write_permissions = write;
        self
    }

    pub(crate) fn apply<R: CommonFields>(&self, resource: &mut R) {
        resource.set_location(self.location);
        resource.set_tag(self.tag.as_deref());
        resource.set_read_permissions(self.read_permissions);
        resource.set_write_permissions(self.write_permissions);
    }
}
