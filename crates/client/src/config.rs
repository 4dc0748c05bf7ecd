//! Consumer-facing widget configuration.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use girdertree_core::Entity;
use girdertree_core::page::DEFAULT_PAGE_SIZE;

/// Consumer-supplied icon resolver. Return `None` to fall back to the
/// configured icon map.
pub type IconFn = Arc<dyn Fn(&Entity) -> Option<String> + Send + Sync>;

/// Options accepted by the tree-view entry point.
///
/// All fields default to something usable; only the API base URL is
/// required. The boolean flags mirror the widget extensions they
/// enable and do not change core behavior.
#[derive(Clone)]
pub struct TreeviewConfig {
    /// Base URL of the Girder API, e.g. `https://data.example.org/api/v1`.
    pub api: String,
    /// Authentication token sent as the `Girder-Token` header.
    pub token: Option<String>,
    /// Page size for child listings (default: 25).
    pub page_size: usize,
    /// Optional per-entity icon resolver, consulted before `icon_map`.
    pub icon: Option<IconFn>,
    /// Model-type name to CSS icon class.
    pub icon_map: HashMap<String, String>,
    /// Persist the expanded tree in the widget's local store.
    pub persist: bool,
    /// Allow inline rename and node creation.
    pub edit: bool,
    /// Enable drag-and-drop interactions.
    pub drag_and_drop: bool,
    /// Short-circuit every non-GET request with a synthetic success
    /// payload instead of contacting the backend (offline/demo mode).
    pub mock_mutations: bool,
}

impl TreeviewConfig {
    pub fn new(api: impl Into<String>) -> Self {
        Self {
            api: api.into(),
            token: None,
            page_size: DEFAULT_PAGE_SIZE,
            icon: None,
            icon_map: default_icon_map(),
            persist: false,
            edit: false,
            drag_and_drop: false,
            mock_mutations: false,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_icon(mut self, icon: IconFn) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Override the icon class for one model-type name.
    pub fn with_icon_override(
        mut self,
        model_type: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        self.icon_map.insert(model_type.into(), class.into());
        self
    }

    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn with_edit(mut self, edit: bool) -> Self {
        self.edit = edit;
        self
    }

    pub fn with_drag_and_drop(mut self, drag_and_drop: bool) -> Self {
        self.drag_and_drop = drag_and_drop;
        self
    }

    pub fn with_mock_mutations(mut self, mock_mutations: bool) -> Self {
        self.mock_mutations = mock_mutations;
        self
    }
}

impl fmt::Debug for TreeviewConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeviewConfig")
            .field("api", &self.api)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("page_size", &self.page_size)
            .field("icon", &self.icon.as_ref().map(|_| "<fn>"))
            .field("icon_map", &self.icon_map)
            .field("persist", &self.persist)
            .field("edit", &self.edit)
            .field("drag_and_drop", &self.drag_and_drop)
            .field("mock_mutations", &self.mock_mutations)
            .finish()
    }
}

/// Default icon classes per model-type name, including the refined
/// file types derived from mime types.
pub fn default_icon_map() -> HashMap<String, String> {
    [
        ("collection", "icon-database"),
        ("user", "icon-user"),
        ("item", "icon-docs"),
        ("folder", "icon-folder"),
        ("file", "icon-doc-text"),
        ("home", "icon-home"),
        ("users", "icon-users"),
        ("collections", "icon-sitemap"),
        ("image", "icon-file-image"),
        ("javascript", "icon-file-code"),
        ("xml", "icon-file-code"),
        ("pdf", "icon-file-pdf"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
