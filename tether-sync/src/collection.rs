use crate::{Entity, Resource, SearchQuery, SearchResult};
use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tether_client::{ApiRequest, Client, Parameters};
use tether_types::{ApiError, ApiResult, EntityId};
use tracing::debug;

/// Create, lookup and search for one resource type.
///
/// Collections hold no state of their own beyond the client; searches are
/// independent and may run concurrently.
pub struct Collection<R> {
    client: Arc<dyn Client>,
    _marker: PhantomData<fn() -> R>,
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            _marker: PhantomData,
        }
    }
}

impl<R> fmt::Debug for Collection<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("type", &std::any::type_name::<R>())
            .finish()
    }
}

impl<R: Resource> Collection<R> {
    pub fn new(client: Arc<dyn Client>) -> Self {
        Self {
            client,
            _marker: PhantomData,
        }
    }

    pub fn client(&self) -> &Arc<dyn Client> {
        &self.client
    }

    /// A new, unsaved object.
    pub fn create(&self) -> R {
        R::from_entity(Entity::new(R::schema(), Arc::clone(&self.client)))
    }

    /// A reference to an existing object; nothing is fetched.
    pub fn reference(&self, id: EntityId) -> R {
        R::from_entity(Entity::with_id(R::schema(), Arc::clone(&self.client), id))
    }

    /// Saves `resource` and hands it back populated with its server id.
    pub async fn add(&self, mut resource: R) -> ApiResult<R> {
        let saved = resource.save().await;
        saved.map(|_| resource)
    }

    /// Fetches the object with `id`.
    pub async fn get(&self, id: EntityId) -> ApiResult<R> {
        let mut resource = self.reference(id);
        let fetched = resource.fetch().await;
        fetched.map(|_| resource)
    }

    /// Searches with the common filters of `query` plus the type-specific
    /// filters written by `filters`.
    pub async fn find(
        &self,
        query: &SearchQuery,
        filters: impl FnOnce(&mut Parameters),
    ) -> ApiResult<SearchResult<R>> {
        let mut specific = Parameters::new();
        filters(&mut specific);
        self.search(query, specific).await
    }

    /// Fetches one page. `filters` are merged over the common parameters.
    pub async fn search(&self, query: &SearchQuery, filters: Parameters) -> ApiResult<SearchResult<R>> {
        let mut params = query.to_parameters();
        params.extend(filters);
        let path = R::schema().path.clone();
        debug!("Searching {path} ({} params)", params.len());

        let response = self
            .client
            .request(ApiRequest::get(path).with_query(params))
            .await?;
        self.parse_page(response, query.page_size)
    }

    /// Every page from `query` onwards, fetched lazily as the stream is
    /// polled. The stream ends after the page without a continuation token,
    /// or after the first failure.
    pub fn pages(
        &self,
        query: SearchQuery,
        filters: Parameters,
    ) -> impl Stream<Item = ApiResult<SearchResult<R>>> + Send + use<R> {
        let collection = self.clone();
        stream::try_unfold(Some(query), move |next| {
            let collection = collection.clone();
            let filters = filters.clone();
            async move {
                let Some(query) = next else {
                    return Ok::<_, ApiError>(None);
                };
                let page = collection.search(&query, filters).await?;
                let following = page.next_query(&query);
                Ok(Some((page, following)))
            }
        })
    }

    /// Every matching object from `query` onwards, one page at a time.
    pub fn items(
        &self,
        query: SearchQuery,
        filters: Parameters,
    ) -> impl Stream<Item = ApiResult<R>> + Send + use<R> {
        self.pages(query, filters)
            .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<R, ApiError>)))
            .try_flatten()
    }

    fn parse_page(&self, response: Value, page_size: usize) -> ApiResult<SearchResult<R>> {
        let Value::Object(mut body) = response else {
            return Err(ApiError::unknown(format!(
                "expected a search result object for {}",
                R::schema().entity_type
            )));
        };

        let items = match body.remove("pageResults") {
            Some(Value::Array(results)) => results
                .iter()
                .map(|item| match item {
                    Value::Object(object) => {
                        Entity::from_server(R::schema(), Arc::clone(&self.client), object)
                            .map(R::from_entity)
                    }
                    other => Err(ApiError::unknown(format!("search result is not an object: {other}"))),
                })
                .collect::<ApiResult<Vec<_>>>()?,
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                return Err(ApiError::unknown(format!("pageResults is not an array: {other}")));
            }
        };

        let continuation_token = match body.remove("nextToken") {
            Some(Value::String(token)) if !token.is_empty() => Some(token),
            _ => None,
        };

        Ok(SearchResult {
            items,
            continuation_token,
            page_size,
        })
    }
}
