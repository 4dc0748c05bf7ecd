//! Entity-to-node mapping.
//!
//! Pure transform from a backend [`Entity`] (plus, for non-root kinds,
//! its parent descriptor) into exactly one [`NodeDescriptor`]. Dispatch
//! is an exhaustive match over the closed kind set, so adding a kind is
//! a compile error until every arm is handled.

use std::sync::Arc;

use crate::entity::Entity;
use crate::error::ModelError;
use crate::kind::EntityKind;
use crate::node::{NodeDescriptor, RootKind, READONLY_CLASS, WRITEABLE_CLASS};
use crate::page::FetchDescriptor;

/// Map one entity into its node descriptor.
///
/// `parent` is required for write-permission inheritance on items and
/// files; without it they come out read-only. Per-kind rules:
///
/// | kind       | container | lazy | children fetched        | parentOf        | write       |
/// |------------|-----------|------|-------------------------|-----------------|-------------|
/// | collection | yes       | yes  | folders                 | folder          | own level   |
/// | folder     | yes       | yes  | items, then folders     | folder, item    | own level   |
/// | item       | yes       | yes  | files                   | file            | from parent |
/// | file       | no        | no   | —                       | —               | from parent |
/// | user       | yes       | yes  | root folders            | folder          | own level   |
pub fn map_entity(
    entity: &Entity,
    parent: Option<&Arc<NodeDescriptor>>,
) -> Result<NodeDescriptor, ModelError> {
    let kind = entity.kind()?;
    let parent_write = parent.map(|p| p.write).unwrap_or(false);

    let (is_container, is_lazy, write, fetch, parent_of) = match kind {
        EntityKind::Collection => (
            true,
            true,
            entity.writeable(),
            vec![FetchDescriptor::new("/folder")
                .with_param("parentType", "collection")
                .with_param("parentId", &entity.id)],
            vec![EntityKind::Folder],
        ),
        EntityKind::Folder => (
            true,
            true,
            entity.writeable(),
            // Two independent paged sources; items always precede
            // subfolders in the merged child list.
            vec![
                FetchDescriptor::new("/item").with_param("folderId", &entity.id),
                FetchDescriptor::new("/folder")
                    .with_param("parentType", "folder")
                    .with_param("parentId", &entity.id),
            ],
            vec![EntityKind::Folder, EntityKind::Item],
        ),
        EntityKind::Item => (
            true,
            true,
            parent_write,
            vec![FetchDescriptor::new(format!("/item/{}/files", entity.id))],
            vec![EntityKind::File],
        ),
        EntityKind::File => (false, false, parent_write, Vec::new(), Vec::new()),
        EntityKind::User => (
            true,
            true,
            entity.writeable(),
            vec![FetchDescriptor::new("/folder")
                .with_param("parentType", "user")
                .with_param("parentId", &entity.id)],
            vec![EntityKind::Folder],
        ),
    };

    let title = entity.display_title().to_string();
    let tooltip = tooltip_for(entity, kind, &title);
    let class = if write { WRITEABLE_CLASS } else { READONLY_CLASS };

    Ok(NodeDescriptor {
        title,
        key: entity.id.clone(),
        is_container,
        is_lazy,
        write,
        fetch,
        parent_of,
        tooltip,
        extra_classes: vec![class.to_string()],
        entity: Some(entity.clone()),
        parent: parent.cloned(),
        root: None,
        paging: false,
    })
}

/// Build the static root nodes: the current user's Home tree (omitted
/// for anonymous sessions), all collections, and all users.
pub fn root_nodes(current_user: Option<&Entity>) -> Result<Vec<NodeDescriptor>, ModelError> {
    let mut roots = Vec::new();

    if let Some(user) = current_user {
        let mut home = map_entity(user, None)?;
        home.title = "Home".to_string();
        home.tooltip = "Home folder".to_string();
        home.parent_of = Vec::new();
        home.root = Some(RootKind::Home);
        roots.push(home);
    }

    roots.push(static_root(
        "Collections",
        "2",
        "All collections",
        RootKind::Collections,
        FetchDescriptor::new("/collection"),
    ));
    roots.push(static_root(
        "Users",
        "3",
        "All users",
        RootKind::Users,
        FetchDescriptor::new("/user").with_param("sort", "login"),
    ));

    Ok(roots)
}

fn static_root(
    title: &str,
    key: &str,
    tooltip: &str,
    root: RootKind,
    fetch: FetchDescriptor,
) -> NodeDescriptor {
    NodeDescriptor {
        title: title.to_string(),
        key: key.to_string(),
        is_container: true,
        is_lazy: true,
        write: false,
        fetch: vec![fetch],
        parent_of: Vec::new(),
        tooltip: tooltip.to_string(),
        extra_classes: vec![READONLY_CLASS.to_string()],
        entity: None,
        parent: None,
        root: Some(root),
        paging: false,
    }
}

/// Tooltip precedence: entity description, then a kind-specific text
/// (the user's full name), then the display title.
fn tooltip_for(entity: &Entity, kind: EntityKind, title: &str) -> String {
    if let Some(description) = entity.description.as_deref() {
        if !description.is_empty() {
            return description.to_string();
        }
    }
    if kind == EntityKind::User {
        let full = format!(
            "{} {}",
            entity.first_name.as_deref().unwrap_or(""),
            entity.last_name.as_deref().unwrap_or(""),
        );
        if full.trim() != "" {
            return full;
        }
    }
    title.to_string()
}
