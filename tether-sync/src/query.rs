use tether_client::Parameters;
use tether_types::{DateRange, EntityId, GeoRange};

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Filters shared by every collection search.
///
/// Unset filters are omitted from the request and mean "no constraint".
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub owner_user_id: Option<EntityId>,
    pub created: Option<DateRange>,
    pub last_modified: Option<DateRange>,
    pub location_range: Option<GeoRange>,
    /// Opaque token from a previous page, echoed verbatim.
    pub paging_token: Option<String>,
    pub page_size: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            owner_user_id: None,
            created: None,
            last_modified: None,
            location_range: None,
            paging_token: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn owned_by(mut self, user: EntityId) -> Self {
        self.owner_user_id = Some(user);
        self
    }

    #[must_use]
    pub fn created_in(mut self, range: DateRange) -> Self {
        self.created = Some(range);
        self
    }

    #[must_use]
    pub fn modified_in(mut self, range: DateRange) -> Self {
        self.last_modified = Some(range);
        self
    }

    #[must_use]
    pub fn within(mut self, range: GeoRange) -> Self {
        self.location_range = Some(range);
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn continue_from(mut self, token: impl Into<String>) -> Self {
        self.paging_token = Some(token.into());
        self
    }

    pub fn to_parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert_opt("ownerUserId", self.owner_user_id.as_ref());
        params.insert_opt("created", self.created.map(|r| r.to_param()));
        params.insert_opt("lastModified", self.last_modified.map(|r| r.to_param()));
        params.insert_opt("locationRange", self.location_range.map(|r| r.to_param()));
        params.insert_opt("pagingToken", self.paging_token.as_deref());
        params.insert("pageSize", self.page_size.to_string());
        params
    }
}

/// One page of search results.
#[derive(Debug, Clone)]
pub struct SearchResult<T> {
    pub items: Vec<T>,
    /// Present when more results exist.
    pub continuation_token: Option<String>,
    /// The page size that was requested.
    pub page_size: usize,
}

impl<T> SearchResult<T> {
    pub fn has_more(&self) -> bool {
        self.continuation_token.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The query for the page after this one, if there is one.
    pub fn next_query(&self, query: &SearchQuery) -> Option<SearchQuery> {
        self.continuation_token
            .as_ref()
            .map(|token| query.clone().continue_from(token.clone()))
    }
}

impl<T> IntoIterator for SearchResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a SearchResult<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
