//! UI-facing node descriptors.

use std::sync::Arc;

use crate::entity::Entity;
use crate::kind::EntityKind;
use crate::page::FetchDescriptor;

/// CSS class applied to nodes the session may edit.
pub const WRITEABLE_CLASS: &str = "gt-writeable";
/// CSS class applied to read-only nodes.
pub const READONLY_CLASS: &str = "gt-readonly";

/// The three static roots of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    /// The current user's own folder tree.
    Home,
    /// All collections on the server.
    Collections,
    /// All users, sorted by login.
    Users,
}

impl RootKind {
    /// Name used for icon-map lookup.
    pub fn as_str(&self) -> &'static str {
        match self {
            RootKind::Home => "home",
            RootKind::Collections => "collections",
            RootKind::Users => "users",
        }
    }
}

/// The UI projection of zero-or-one backend entity.
///
/// Produced by the mapper (entity-backed nodes), by the root-source
/// builder (static roots), or by the fetch engine (continuation nodes).
/// The widget owns these; the `parent` link is informational only —
/// used for permission inheritance and undo context, never for
/// ownership or lifetime decisions. The authoritative hierarchy lives
/// server-side.
#[derive(Debug, Clone)]
pub struct NodeDescriptor {
    pub title: String,
    /// Stable key, unique within the sibling set: the entity id, a
    /// fixed key for static roots, or a synthetic key for continuations.
    pub key: String,
    pub is_container: bool,
    /// Children not yet fetched; the widget should call back on expand.
    pub is_lazy: bool,
    /// Whether write-gated interactions are allowed on this node.
    pub write: bool,
    /// Child-listing request templates, in merge order.
    pub fetch: Vec<FetchDescriptor>,
    /// Entity kinds this node may legally contain.
    pub parent_of: Vec<EntityKind>,
    pub tooltip: String,
    /// Cosmetic classes (`gt-writeable` / `gt-readonly`).
    pub extra_classes: Vec<String>,
    /// The backing entity; `None` for static roots and continuations.
    pub entity: Option<Entity>,
    /// Non-owning back-reference to the parent descriptor.
    pub parent: Option<Arc<NodeDescriptor>>,
    /// Set on the three static roots.
    pub root: Option<RootKind>,
    /// Marks a synthetic "load more" continuation node.
    pub paging: bool,
}

impl NodeDescriptor {
    /// Build a continuation node carrying the next page's fetch
    /// descriptor. Never writeable, never a drag source or target.
    pub fn continuation(fetch: FetchDescriptor, parent: Option<Arc<NodeDescriptor>>) -> Self {
        let key = format!("more:{}:{}", fetch.path, fetch.offset);
        Self {
            title: "Load more...".to_string(),
            key,
            is_container: false,
            is_lazy: false,
            write: false,
            fetch: vec![fetch],
            parent_of: Vec::new(),
            tooltip: String::new(),
            extra_classes: Vec::new(),
            entity: None,
            parent,
            root: None,
            paging: true,
        }
    }

    pub fn is_continuation(&self) -> bool {
        self.paging
    }

    /// Whether children of the given kind may be placed under this node.
    pub fn may_contain(&self, kind: EntityKind) -> bool {
        self.parent_of.contains(&kind)
    }

    /// Model-type name used for icon lookup: the root marker for static
    /// roots, otherwise the backing entity's declared kind string.
    pub fn model_type(&self) -> Option<&str> {
        self.root
            .map(|r| r.as_str())
            .or_else(|| self.entity.as_ref().map(|e| e.model_type.as_str()))
    }
}
