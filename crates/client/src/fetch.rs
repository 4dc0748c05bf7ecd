//! Paged child materialization.
//!
//! Turns a node's fetch descriptors into its child node list: all
//! listing requests are issued concurrently, their results are merged
//! in descriptor order regardless of completion order, each entity is
//! run through the mapper, and every full page gets a continuation
//! node carrying the advanced descriptor.

use std::sync::Arc;

use girdertree_core::mapper::map_entity;
use girdertree_core::NodeDescriptor;

use crate::error::TreeviewError;
use crate::rest::GirderClient;

/// The lazy-loading fetch engine for one widget instance.
pub struct FetchEngine {
    rest: Arc<GirderClient>,
    page_size: usize,
}

impl FetchEngine {
    pub fn new(rest: Arc<GirderClient>, page_size: usize) -> Self {
        Self { rest, page_size }
    }

    /// Materialize the children of `node`.
    ///
    /// Results from descriptor `i` always precede those from descriptor
    /// `i + 1` in the merged list, independent of network timing. A
    /// source that returns a full page is followed by a continuation
    /// node whose descriptor is advanced by one page; triggering that
    /// continuation re-enters this method and its results are meant to
    /// replace the continuation in place (see [`replace_continuation`]).
    ///
    /// If any one listing request fails, the whole call fails with
    /// [`TreeviewError::ChildFetchFailed`] and no partial results are
    /// surfaced.
    pub async fn load_children(
        &self,
        node: &Arc<NodeDescriptor>,
    ) -> Result<Vec<NodeDescriptor>, TreeviewError> {
        // Children loaded through a continuation node belong to the
        // continuation's parent, not to the synthetic node itself.
        let parent = if node.is_continuation() {
            node.parent.clone()
        } else {
            Some(Arc::clone(node))
        };

        let pages = futures::future::try_join_all(node.fetch.iter().map(|fetch| async move {
            let entities = self.rest.list(fetch, self.page_size).await.map_err(|source| {
                TreeviewError::ChildFetchFailed {
                    request: fetch.clone(),
                    source,
                }
            })?;
            Ok::<_, TreeviewError>((fetch, entities))
        }))
        .await?;

        let mut children = Vec::new();
        for (fetch, entities) in pages {
            let full_page = entities.len() >= self.page_size;
            for entity in &entities {
                children.push(map_entity(entity, parent.as_ref())?);
            }
            if full_page {
                children.push(NodeDescriptor::continuation(
                    fetch.advanced(self.page_size),
                    parent.clone(),
                ));
            }
        }

        tracing::debug!(
            key = %node.key,
            sources = node.fetch.len(),
            children = children.len(),
            "Materialized child nodes"
        );
        Ok(children)
    }
}

/// Replace the continuation node with key `key` in a sibling list by
/// the freshly loaded nodes, splicing them in at the same position.
///
/// Returns `false` (leaving `siblings` untouched) when no continuation
/// with that key is present.
pub fn replace_continuation(
    siblings: &mut Vec<NodeDescriptor>,
    key: &str,
    replacement: Vec<NodeDescriptor>,
) -> bool {
    match siblings
        .iter()
        .position(|n| n.is_continuation() && n.key == key)
    {
        Some(index) => {
            siblings.splice(index..=index, replacement);
            true
        }
        None => false,
    }
}
