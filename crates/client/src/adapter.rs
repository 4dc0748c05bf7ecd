//! The widget boundary.
//!
//! [`TreeAdapter`] translates the callback contract of an external
//! tree-rendering widget (expand, inline rename, drag-and-drop, delete
//! key, "load more" activation) into the fetch and mutation engines.
//! Mutating callbacks answer with a [`MutationOutcome`] telling the
//! widget whether to keep its optimistic edit or roll it back; errors
//! never escape as panics into the widget's event loop.

use std::sync::Arc;

use girdertree_core::mapper::root_nodes;
use girdertree_core::{Entity, FetchDescriptor, NodeDescriptor, UndoToken};

use crate::config::TreeviewConfig;
use crate::error::TreeviewError;
use crate::fetch::FetchEngine;
use crate::icons;
use crate::mutate::MutationEngine;
use crate::rest::GirderClient;

/// Callback invoked when focus moves to a node.
pub type FocusHandler = Box<dyn Fn(&NodeDescriptor) + Send + Sync>;
/// Callback invoked with the undo token of each successful mutation.
/// Reserved for consumer-side undo surfacing; no-op when unset.
pub type UndoHandler = Box<dyn Fn(&UndoToken) + Send + Sync>;

/// Verdict of a mutating widget callback.
#[derive(Debug)]
pub enum MutationOutcome {
    /// The server confirmed the edit; the widget keeps it. The undo
    /// token reverses the operation in one step.
    Applied { undo: UndoToken },
    /// The operation was refused or failed; the widget must restore
    /// its pre-operation state (title reverts, dragged node returns).
    Rejected { reason: TreeviewError },
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }
}

/// One tree-view widget instance bound to one Girder server.
pub struct TreeAdapter {
    config: TreeviewConfig,
    rest: Arc<GirderClient>,
    fetch: FetchEngine,
    mutate: MutationEngine,
    on_focus: Option<FocusHandler>,
    on_undo: Option<UndoHandler>,
}

impl TreeAdapter {
    pub fn new(config: TreeviewConfig) -> Self {
        let rest = Arc::new(GirderClient::new(&config));
        Self {
            fetch: FetchEngine::new(Arc::clone(&rest), config.page_size),
            mutate: MutationEngine::new(Arc::clone(&rest)),
            rest,
            config,
            on_focus: None,
            on_undo: None,
        }
    }

    pub fn on_focus(mut self, handler: FocusHandler) -> Self {
        self.on_focus = Some(handler);
        self
    }

    pub fn on_undo(mut self, handler: UndoHandler) -> Self {
        self.on_undo = Some(handler);
        self
    }

    /// Widget extensions to enable, derived from the configuration.
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut extensions = vec!["glyph", "hotkeys"];
        if self.config.drag_and_drop {
            extensions.push("dnd");
        }
        if self.config.edit {
            extensions.push("edit");
        }
        if self.config.persist {
            extensions.push("persist");
        }
        extensions
    }

    /// The static root nodes: the current user's Home tree (when a
    /// session exists), all collections, and all users.
    pub async fn source(&self) -> Result<Vec<NodeDescriptor>, TreeviewError> {
        let me = self.rest.current_user().await.map_err(|source| {
            TreeviewError::ChildFetchFailed {
                request: FetchDescriptor::new("/user/me"),
                source,
            }
        })?;
        Ok(root_nodes(me.as_ref())?)
    }

    /// "Node expanded": materialize the node's children.
    pub async fn lazy_load(
        &self,
        node: &Arc<NodeDescriptor>,
    ) -> Result<Vec<NodeDescriptor>, TreeviewError> {
        self.fetch.load_children(node).await.inspect_err(|error| {
            tracing::warn!(key = %node.key, %error, "Child load failed");
        })
    }

    /// "Load more" activated: fetch the continuation's page. The widget
    /// replaces the continuation node in place with the result (see
    /// [`crate::fetch::replace_continuation`]).
    pub async fn load_more(
        &self,
        continuation: &Arc<NodeDescriptor>,
    ) -> Result<Vec<NodeDescriptor>, TreeviewError> {
        self.lazy_load(continuation).await
    }

    /// Drag pre-check: may this node be picked up at all?
    pub fn allow_drag(&self, node: &NodeDescriptor) -> bool {
        !node.is_continuation()
            && !self.mutate.is_locked()
            && node.write
            && node
                .entity
                .as_ref()
                .and_then(|e| e.kind().ok())
                .is_some_and(|kind| kind.is_movable())
    }

    /// Drop pre-check: may `dragged` legally land under `target`?
    pub fn allow_drop(&self, dragged: &NodeDescriptor, target: &NodeDescriptor) -> bool {
        let Some(kind) = dragged.entity.as_ref().and_then(|e| e.kind().ok()) else {
            return false;
        };
        !target.is_continuation()
            && self.allow_drag(dragged)
            && target.write
            && target.may_contain(kind)
    }

    /// "Node dropped onto candidate parent": move it server-side. On
    /// `Rejected` the widget returns the node to its origin.
    pub async fn handle_drop(
        &self,
        dragged: &NodeDescriptor,
        target: &NodeDescriptor,
    ) -> MutationOutcome {
        let Some(old_parent) = parent_entity(dragged) else {
            return MutationOutcome::Rejected {
                reason: TreeviewError::PermissionDenied(format!(
                    "node {} has no parent context",
                    dragged.key
                )),
            };
        };
        self.outcome(self.mutate.move_node(dragged, &old_parent, target).await)
    }

    /// "Inline rename committed": persist the new title. On `Rejected`
    /// the widget sets the title back to the pre-edit value.
    pub async fn commit_rename(&self, node: &NodeDescriptor, new_name: &str) -> MutationOutcome {
        self.outcome(self.mutate.rename(node, new_name).await)
    }

    /// "Delete key pressed": soft-delete into the recycle bin. The
    /// widget removes the node from view only on `Applied`. Static
    /// roots are never deletable.
    pub async fn delete(&self, node: &NodeDescriptor) -> MutationOutcome {
        if node.root.is_some() {
            return MutationOutcome::Rejected {
                reason: TreeviewError::PermissionDenied(format!(
                    "root node {} cannot be deleted",
                    node.key
                )),
            };
        }
        self.outcome(self.mutate.remove(node).await)
    }

    /// Apply an undo token (user-triggered).
    pub async fn undo(&self, token: &UndoToken) -> Result<(), TreeviewError> {
        self.mutate.undo(token).await
    }

    /// Focus moved to a node: notify the consumer.
    pub fn focus(&self, node: &NodeDescriptor) {
        tracing::trace!(key = %node.key, "Focus moved");
        if let Some(handler) = &self.on_focus {
            handler(node);
        }
    }

    /// CSS icon class for a node.
    pub fn icon_class(&self, node: &NodeDescriptor) -> Option<String> {
        icons::icon_class(&self.config, node)
    }

    fn outcome(&self, result: Result<UndoToken, TreeviewError>) -> MutationOutcome {
        match result {
            Ok(undo) => {
                if let Some(handler) = &self.on_undo {
                    handler(&undo);
                }
                MutationOutcome::Applied { undo }
            }
            Err(reason) => {
                tracing::warn!(%reason, "Mutation rejected; widget state rolls back");
                MutationOutcome::Rejected { reason }
            }
        }
    }
}

/// Entity behind a node's parent link, for undo context.
fn parent_entity(node: &NodeDescriptor) -> Option<Entity> {
    node.parent.as_ref().and_then(|p| p.entity.clone())
}
