use girdertree_core::{FetchDescriptor, ModelError};

use crate::rest::RestError;

/// Errors surfaced to the widget boundary.
///
/// Every backend failure is caught at the operation boundary and
/// converted into one of these; nothing is allowed to propagate
/// uncaught into the rendering library's event loop. None of them
/// trigger an automatic retry.
#[derive(Debug, thiserror::Error)]
pub enum TreeviewError {
    /// Fatal frontend/backend contract mismatch from the mapper.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A child-listing request failed; the whole materialization call
    /// fails and no partial results are surfaced.
    #[error("Child fetch failed for {}: {source}", .request.path)]
    ChildFetchFailed {
        /// The originating request template.
        request: FetchDescriptor,
        #[source]
        source: RestError,
    },

    /// A write-gated operation was refused before any request was sent.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The server rejected an update; UI state must roll back to the
    /// pre-operation values.
    #[error("Mutation failed: {source}")]
    MutationFailed {
        #[source]
        source: RestError,
    },
}
