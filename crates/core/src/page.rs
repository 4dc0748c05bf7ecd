//! Paged child-listing request templates.

use serde::Serialize;

/// Default number of entities requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// A request template for listing the children of a node.
///
/// Holds the collection endpoint path (relative to the API base URL),
/// the fixed query parameters identifying the parent, and the current
/// pagination offset. The page limit itself is supplied by the fetch
/// engine at request time and stays constant for the life of the
/// widget; only the offset advances, one page at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchDescriptor {
    /// Endpoint path, e.g. `/folder` or `/item/{id}/files`.
    pub path: String,
    /// Fixed query parameters (parent reference, sort order).
    pub params: Vec<(String, String)>,
    /// Pagination offset for the next request.
    pub offset: usize,
}

impl FetchDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
            offset: 0,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// The same template advanced to the next page.
    pub fn advanced(&self, page_size: usize) -> Self {
        Self {
            path: self.path.clone(),
            params: self.params.clone(),
            offset: self.offset + page_size,
        }
    }

    /// Full query parameter list for a request with the given limit.
    pub fn query(&self, limit: usize) -> Vec<(String, String)> {
        let mut query = self.params.clone();
        query.push(("offset".to_string(), self.offset.to_string()));
        query.push(("limit".to_string(), limit.to_string()));
        query
    }
}
