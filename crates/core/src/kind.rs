//! The closed set of entity kinds served by a Girder backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Kind of a backend entity, as reported in its `_modelType` field.
///
/// The set is closed: the mapper dispatches exhaustively over it, and an
/// unrecognized kind string is a fatal [`ModelError::UnknownEntityKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Collection,
    Folder,
    Item,
    File,
    User,
}

impl EntityKind {
    /// The wire name used by the backend (`parentType`, URL segments).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Collection => "collection",
            EntityKind::Folder => "folder",
            EntityKind::Item => "item",
            EntityKind::File => "file",
            EntityKind::User => "user",
        }
    }

    /// Parse a `_modelType` string, keeping `id` for the error report.
    pub fn parse(kind: &str, id: &str) -> Result<Self, ModelError> {
        match kind {
            "collection" => Ok(EntityKind::Collection),
            "folder" => Ok(EntityKind::Folder),
            "item" => Ok(EntityKind::Item),
            "file" => Ok(EntityKind::File),
            "user" => Ok(EntityKind::User),
            _ => Err(ModelError::UnknownEntityKind {
                kind: kind.to_string(),
                id: id.to_string(),
            }),
        }
    }

    /// Whether entities of this kind can be reparented at all.
    ///
    /// Only folders and items support move and soft-delete; collections,
    /// files, and users have no reparenting request shape.
    pub fn is_movable(&self) -> bool {
        matches!(self, EntityKind::Folder | EntityKind::Item)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
