//! Typed collections with per-type create arguments and search filters.
//!
//! Each wraps a [`Collection`] and dereferences to it, so `get`, `create`,
//! `pages` and `items` are available directly.

use crate::{Album, Checkin, CreateOptions, Picture, User, UserList};
use std::ops::Deref;
use std::sync::Arc;
use tether_client::{Client, Parameters};
use tether_sync::{Collection, Resource, SearchQuery, SearchResult};
use tether_types::ApiResult;

macro_rules! typed_collection {
    ($name:ident, $resource:ty) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            inner: Collection<$resource>,
        }

        impl $name {
            pub fn new(client: Arc<dyn Client>) -> Self {
                Self {
                    inner: Collection::new(client),
                }
            }
        }

        impl Deref for $name {
            type Target = Collection<$resource>;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }
    };
}

typed_collection!(AlbumCollection, Album);
typed_collection!(CheckinCollection, Checkin);
typed_collection!(UserListCollection, UserList);
typed_collection!(PictureCollection, Picture);
typed_collection!(UserCollection, User);

impl AlbumCollection {
    pub async fn add(
        &self,
        name: &str,
        caption: Option<&str>,
        options: &CreateOptions,
    ) -> ApiResult<Album> {
        let mut album = self.create();
        album.set_name(name);
        album.set_caption(caption);
        options.apply(&mut album);
        self.inner.add(album).await
    }

    pub async fn find(
        &self,
        name: Option<&str>,
        caption: Option<&str>,
        query: &SearchQuery,
    ) -> ApiResult<SearchResult<Album>> {
        self.inner
            .find(query, |p| {
                p.insert_opt("name", name);
                p.insert_opt("caption", caption);
            })
            .await
    }
}

impl CheckinCollection {
    pub async fn add(
        &self,
        comment: Option<&str>,
        description: Option<&str>,
        options: &CreateOptions,
    ) -> ApiResult<Checkin> {
        let mut checkin = self.create();
        checkin.set_comment(comment);
        checkin.set_description(description);
        options.apply(&mut checkin);
        self.inner.add(checkin).await
    }

    pub async fn find(
        &self,
        comment: Option<&str>,
        query: &SearchQuery,
    ) -> ApiResult<SearchResult<Checkin>> {
        self.inner
            .find(query, |p| p.insert_opt("comment", comment))
            .await
    }
}

impl UserListCollection {
    pub async fn add(&self, name: &str, options: &CreateOptions) -> ApiResult<UserList> {
        let mut list = self.create();
        list.set_name(name);
        options.apply(&mut list);
        self.inner.add(list).await
    }

    pub async fn find(
        &self,
        name: Option<&str>,
        query: &SearchQuery,
    ) -> ApiResult<SearchResult<UserList>> {
        self.inner
            .find(query, |p| p.insert_opt("name", name))
            .await
    }
}

impl PictureCollection {
    /// Uploads `data` as a new picture.
    pub async fn add(
        &self,
        caption: Option<&str>,
        data: Vec<u8>,
        content_type: &str,
        options: &CreateOptions,
    ) -> ApiResult<Picture> {
        let mut picture = self.create();
        picture.set_caption(caption);
        options.apply(&mut picture);
        let saved = picture.entity_mut().save_with_file(data, content_type).await;
        saved.map(|_| picture)
    }

    pub async fn find(
        &self,
        caption: Option<&str>,
        query: &SearchQuery,
    ) -> ApiResult<SearchResult<Picture>> {
        self.inner
            .find(query, |p| p.insert_opt("caption", caption))
            .await
    }
}

/// User search filters. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UserFilter {
    fn write(&self, params: &mut Parameters) {
        params.insert_opt("userName", self.user_name.as_deref());
        params.insert_opt("firstName", self.first_name.as_deref());
        params.insert_opt("lastName", self.last_name.as_deref());
        params.insert_opt("email", self.email.as_deref());
    }
}

impl UserCollection {
    pub async fn find(
        &self,
        filter: &UserFilter,
        query: &SearchQuery,
    ) -> ApiResult<SearchResult<User>> {
        self.inner.find(query, |p| filter.write(p)).await
    }
}
