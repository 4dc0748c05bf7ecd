//! Undo tokens and the ready-to-issue requests they carry.

use serde::Serialize;

/// HTTP method of a [`RestRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

/// A fully specified backend request, ready to issue without further
/// context. Used for the inverse half of an [`UndoToken`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestRequest {
    pub method: Method,
    /// Path relative to the API base URL, e.g. `/item/123`.
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl RestRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

/// Receipt for a completed mutation: a human-readable summary plus the
/// inverse request that reverses it in one step.
///
/// Created synchronously when a mutation succeeds and either consumed
/// by a user-triggered undo or discarded. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoToken {
    /// Summary of the operation just performed, e.g. `"x was deleted."`.
    pub description: String,
    /// Request that restores the pre-operation state.
    pub inverse: RestRequest,
}

impl UndoToken {
    pub fn new(description: impl Into<String>, inverse: RestRequest) -> Self {
        Self {
            description: description.into(),
            inverse,
        }
    }
}
