//! Filter and pagination options for the images collection.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Query against the images collection.
///
/// Starts at the first page with 20 images per page and no filters. Setters
/// consume and return `self` so a query reads as one chain; call
/// [`to_params`](Self::to_params) to flatten it into query parameters.
///
/// ```rust
/// use imbo_client::ImagesQuery;
///
/// let query = ImagesQuery::new().with_page(2).with_limit(5);
/// assert_eq!(query.page(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ImagesQuery {
    page: u32,
    limit: u32,
    return_metadata: bool,
    metadata_query: Option<Value>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl Default for ImagesQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            return_metadata: false,
            metadata_query: None,
            from: None,
            to: None,
        }
    }
}

impl ImagesQuery {
    /// A query with the default pagination and no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Page to fetch, starting at 1. A value of 0 leaves paging to the server.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Maximum number of images per page. A value of 0 leaves the limit to
    /// the server.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Ask the server to include each image's metadata in the listing.
    pub fn with_return_metadata(mut self, return_metadata: bool) -> Self {
        self.return_metadata = return_metadata;
        self
    }

    /// Metadata filter, sent JSON-serialized as the `query` parameter.
    pub fn with_metadata_query(mut self, metadata_query: Value) -> Self {
        self.metadata_query = Some(metadata_query);
        self
    }

    /// Only include images added at or after `from`.
    pub fn with_from(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    /// Only include images added at or before `to`.
    pub fn with_to(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    /// Page to fetch.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of images per page.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Whether the listing should include metadata.
    pub fn return_metadata(&self) -> bool {
        self.return_metadata
    }

    /// Metadata filter, if one was set.
    pub fn metadata_query(&self) -> Option<&Value> {
        self.metadata_query.as_ref()
    }

    /// Lower bound on the added time, if one was set.
    pub fn from(&self) -> Option<DateTime<Utc>> {
        self.from
    }

    /// Upper bound on the added time, if one was set.
    pub fn to(&self) -> Option<DateTime<Utc>> {
        self.to
    }

    /// Flatten the query into the parameters understood by the images
    /// resource. Disabled values (page or limit of 0, unset filters) are
    /// omitted so the server applies its own defaults; timestamps are sent
    /// as milliseconds since the epoch.
    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if self.page > 0 {
            params.insert("page".to_string(), self.page.to_string());
        }
        if self.limit > 0 {
            params.insert("limit".to_string(), self.limit.to_string());
        }
        if self.return_metadata {
            params.insert("metadata".to_string(), "1".to_string());
        }
        if let Some(from) = self.from {
            params.insert("from".to_string(), from.timestamp_millis().to_string());
        }
        if let Some(to) = self.to {
            params.insert("to".to_string(), to.timestamp_millis().to_string());
        }
        if let Some(metadata_query) = &self.metadata_query {
            params.insert("query".to_string(), metadata_query.to_string());
        }
        params
    }
}
