use crate::{
    AlbumCollection, CheckinCollection, PictureCollection, UserCollection, UserListCollection,
};
use std::sync::Arc;
use tether_client::{Client, ClientConfig, HttpClient};
use tether_types::ApiResult;
use tracing::info;

/// Entry point: every collection, sharing one client.
#[derive(Debug, Clone)]
pub struct Objects {
    albums: AlbumCollection,
    checkins: CheckinCollection,
    lists: UserListCollection,
    pictures: PictureCollection,
    users: UserCollection,
}

impl Objects {
    pub fn new(client: Arc<dyn Client>) -> Self {
        Self {
            albums: AlbumCollection::new(Arc::clone(&client)),
            checkins: CheckinCollection::new(Arc::clone(&client)),
            lists: UserListCollection::new(Arc::clone(&client)),
            pictures: PictureCollection::new(Arc::clone(&client)),
            users: UserCollection::new(client),
        }
    }

    /// Connects over HTTP with `config`.
    pub fn connect(config: ClientConfig) -> ApiResult<Self> {
        info!("Connecting to {}", config.base_url);
        let client = HttpClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Connects over HTTP with [`ClientConfig::from_env`].
    pub fn from_env() -> ApiResult<Self> {
        Self::connect(ClientConfig::from_env()?)
    }

    pub fn client(&self) -> &Arc<dyn Client> {
        self.albums.client()
    }

    pub fn albums(&self) -> &AlbumCollection {
        &self.albums
    }

    pub fn checkins(&self) -> &CheckinCollection {
        &self.checkins
    }

    pub fn lists(&self) -> &UserListCollection {
        &self.lists
    }

    pub fn pictures(&self) -> &PictureCollection {
        &self.pictures
    }

    pub fn users(&self) -> &UserCollection {
        &self.users
    }
}
