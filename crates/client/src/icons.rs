//! Icon classification. Cosmetic only.

use girdertree_core::NodeDescriptor;

use crate::config::TreeviewConfig;

/// Resolve the CSS icon class for a node.
///
/// The consumer's icon function wins when it returns a class; otherwise
/// the icon map is consulted by model-type name, with file nodes
/// refined by mime type first. Continuation nodes carry no icon.
pub fn icon_class(config: &TreeviewConfig, node: &NodeDescriptor) -> Option<String> {
    if node.is_continuation() {
        return None;
    }

    if let (Some(icon), Some(entity)) = (&config.icon, &node.entity) {
        if let Some(class) = icon(entity) {
            return Some(class);
        }
    }

    let mut model_type = node.model_type()?;
    if model_type == "file" {
        let mime = node
            .entity
            .as_ref()
            .and_then(|e| e.mime_type.as_deref())
            .unwrap_or("");
        model_type = match mime {
            "application/json" | "text/javascript" => "javascript",
            "application/xml" | "text/xml" | "text/html" => "xml",
            "image/jpeg" | "image/png" => "image",
            "application/pdf" => "pdf",
            _ => model_type,
        };
    }
    config.icon_map.get(model_type).cloned()
}
