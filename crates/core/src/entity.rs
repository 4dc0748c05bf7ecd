//! Raw backend entity records.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::kind::EntityKind;

/// Minimum `_accessLevel` granting write access (Girder's WRITE level).
pub const WRITE_ACCESS_LEVEL: i64 = 1;

/// A record as returned by the Girder REST API.
///
/// Girder serves different field sets per kind; everything kind-specific
/// is optional here and unknown fields are ignored. The declared kind
/// arrives as a raw string in `_modelType` and is only resolved to an
/// [`EntityKind`] by [`Entity::kind`], so a contract mismatch surfaces
/// as a mapping error rather than a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_modelType")]
    pub model_type: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Login name; present on user entities only.
    #[serde(default)]
    pub login: Option<String>,
    #[serde(rename = "_accessLevel", default)]
    pub access_level: Option<i64>,
    /// Parent id of a folder.
    #[serde(rename = "parentId", default)]
    pub parent_id: Option<String>,
    /// Parent kind of a folder ("collection", "folder", or "user").
    #[serde(rename = "parentCollection", default)]
    pub parent_collection: Option<String>,
    /// Containing folder of an item.
    #[serde(rename = "folderId", default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Mime type; present on file entities only.
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
}

impl Entity {
    /// Resolve the declared kind string to the closed kind set.
    pub fn kind(&self) -> Result<EntityKind, ModelError> {
        EntityKind::parse(&self.model_type, &self.id)
    }

    /// Display title: the login for users, the name for everything else.
    pub fn display_title(&self) -> &str {
        if self.model_type == "user" {
            self.login.as_deref().unwrap_or("")
        } else {
            self.name.as_deref().unwrap_or("")
        }
    }

    /// Whether the acting session may modify this entity directly.
    pub fn writeable(&self) -> bool {
        self.access_level
            .map(|level| level >= WRITE_ACCESS_LEVEL)
            .unwrap_or(false)
    }
}
