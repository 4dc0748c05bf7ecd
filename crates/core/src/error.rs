use crate::kind::EntityKind;

/// Errors produced by the pure model layer.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The backend reported an entity kind outside the closed set.
    ///
    /// This indicates a contract mismatch between frontend and backend
    /// and must never be silently swallowed.
    #[error("Unknown entity kind '{kind}' for id {id}")]
    UnknownEntityKind { kind: String, id: String },

    /// An entity lacked a field the mapper needs for its kind
    /// (e.g. a folder without a parent reference during undo).
    #[error("{kind} entity {id} is missing required field '{field}'")]
    MissingField {
        kind: EntityKind,
        id: String,
        field: &'static str,
    },
}
