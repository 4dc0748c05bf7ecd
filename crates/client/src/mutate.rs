//! Rename, move, and soft-delete with one-step undo.
//!
//! Every operation is validated against the acting node's write flag
//! and the widget-wide mutation lock before any request is issued, and
//! returns an [`UndoToken`] whose inverse request reverses it. The
//! recycle-bin lookup backing soft delete is resolved lazily and
//! memoized for the life of the engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;

use girdertree_core::{
    Entity, EntityKind, FetchDescriptor, Method, ModelError, NodeDescriptor, RestRequest,
    UndoToken,
};

use crate::error::TreeviewError;
use crate::rest::{GirderClient, RestError};

/// Name of the per-user soft-delete destination folder.
pub const RECYCLE_BIN_NAME: &str = "Recycle Bin";

/// Widget-wide "operation in progress" flag.
///
/// While one mutation is outstanding, every other write-gated
/// interaction is refused, preventing concurrent conflicting edits
/// against the same tree. Scoped to one engine (one widget instance),
/// so independent widgets on a page do not interfere.
pub struct MutationLock {
    busy: AtomicBool,
}

impl MutationLock {
    fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Try to take the lock; `None` while another operation is running.
    fn try_acquire(&self) -> Option<MutationGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| MutationGuard { lock: self })
    }

    pub fn is_locked(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the mutation lock when dropped, on success and failure
/// paths alike.
pub struct MutationGuard<'a> {
    lock: &'a MutationLock,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.lock.busy.store(false, Ordering::Release);
    }
}

/// The mutation/undo engine for one widget instance.
pub struct MutationEngine {
    rest: Arc<GirderClient>,
    lock: MutationLock,
    /// Memoized recycle-bin folder id, resolved on first soft delete.
    recycle_bin: OnceCell<String>,
}

impl MutationEngine {
    pub fn new(rest: Arc<GirderClient>) -> Self {
        Self {
            rest,
            lock: MutationLock::new(),
            recycle_bin: OnceCell::new(),
        }
    }

    /// Whether an operation is currently in flight.
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Rename an entity, returning a token that restores the old name.
    pub async fn rename(
        &self,
        node: &NodeDescriptor,
        new_name: &str,
    ) -> Result<UndoToken, TreeviewError> {
        let _guard = self.acquire_for(node)?;
        let entity = backing_entity(node)?;
        let kind = entity.kind()?;
        let old_name = entity.display_title().to_string();
        let path = format!("/{}/{}", kind, entity.id);

        self.execute(&RestRequest::new(Method::Put, &path).with_param("name", new_name))
            .await?;

        Ok(UndoToken::new(
            format!("{old_name} was renamed to {new_name}"),
            RestRequest::new(Method::Put, &path).with_param("name", &old_name),
        ))
    }

    /// Reparent an entity under `new_parent`, returning a token that
    /// reparents it back under `old_parent`.
    ///
    /// Folders and items use different request shapes: a folder move
    /// carries a `{parentId, parentType}` pair, an item move a single
    /// `{folderId}` value. The inverse uses the same field names as the
    /// forward request.
    pub async fn move_node(
        &self,
        node: &NodeDescriptor,
        old_parent: &Entity,
        new_parent: &NodeDescriptor,
    ) -> Result<UndoToken, TreeviewError> {
        let _guard = self.acquire_for(node)?;
        let entity = backing_entity(node)?;
        let kind = entity.kind()?;

        if !kind.is_movable() {
            return Err(TreeviewError::PermissionDenied(format!(
                "{kind} entities cannot be moved"
            )));
        }
        if !new_parent.write {
            return Err(TreeviewError::PermissionDenied(format!(
                "target {} is read-only",
                new_parent.key
            )));
        }
        if !new_parent.may_contain(kind) {
            return Err(TreeviewError::PermissionDenied(format!(
                "target {} cannot contain {kind} entities",
                new_parent.key
            )));
        }
        let target = new_parent.entity.as_ref().ok_or_else(|| {
            TreeviewError::PermissionDenied(format!(
                "target {} is not backed by an entity",
                new_parent.key
            ))
        })?;

        let (forward, inverse) = match kind {
            EntityKind::Folder => {
                let path = format!("/folder/{}", entity.id);
                (
                    RestRequest::new(Method::Put, &path)
                        .with_param("parentId", &target.id)
                        .with_param("parentType", &target.model_type),
                    RestRequest::new(Method::Put, &path)
                        .with_param("parentId", &old_parent.id)
                        .with_param("parentType", old_parent.kind()?.as_str()),
                )
            }
            EntityKind::Item => {
                let path = format!("/item/{}", entity.id);
                (
                    RestRequest::new(Method::Put, &path).with_param("folderId", &target.id),
                    RestRequest::new(Method::Put, &path).with_param("folderId", &old_parent.id),
                )
            }
            // is_movable() ruled the rest out above.
            _ => unreachable!("unmovable kind {kind} passed the movability check"),
        };

        self.execute(&forward).await?;
        Ok(UndoToken::new(
            format!("{} was moved.", entity.display_title()),
            inverse,
        ))
    }

    /// Soft-delete an entity by reparenting it into the user's recycle
    /// bin, returning a token that restores the original parent.
    pub async fn remove(&self, node: &NodeDescriptor) -> Result<UndoToken, TreeviewError> {
        let _guard = self.acquire_for(node)?;
        let entity = backing_entity(node)?;
        let kind = entity.kind()?;
        let path = format!("/{}/{}", kind, entity.id);

        let (forward, inverse) = match kind {
            EntityKind::Folder => {
                let parent_id = require(entity, kind, entity.parent_id.as_deref(), "parentId")?;
                let parent_type = require(
                    entity,
                    kind,
                    entity.parent_collection.as_deref(),
                    "parentCollection",
                )?;
                let bin_id = self.recycle_bin().await?;
                (
                    RestRequest::new(Method::Put, &path)
                        .with_param("parentId", bin_id)
                        .with_param("parentType", "folder"),
                    RestRequest::new(Method::Put, &path)
                        .with_param("parentId", parent_id)
                        .with_param("parentType", parent_type),
                )
            }
            EntityKind::Item => {
                let folder_id = require(entity, kind, entity.folder_id.as_deref(), "folderId")?;
                let bin_id = self.recycle_bin().await?;
                (
                    RestRequest::new(Method::Put, &path).with_param("folderId", bin_id),
                    RestRequest::new(Method::Put, &path).with_param("folderId", folder_id),
                )
            }
            _ => {
                return Err(TreeviewError::PermissionDenied(format!(
                    "{kind} entities cannot be deleted"
                )))
            }
        };

        self.execute(&forward).await?;
        tracing::info!(id = %entity.id, kind = %kind, "Moved entity to recycle bin");
        Ok(UndoToken::new(
            format!("{} was deleted.", entity.display_title()),
            inverse,
        ))
    }

    /// Recreate a previously deleted entity from its retained record
    /// (folders and items only). Returns the new entity id.
    pub async fn recreate(&self, entity: &Entity) -> Result<String, TreeviewError> {
        let _guard = self.acquire()?;
        let kind = entity.kind()?;
        let request = match kind {
            EntityKind::Folder => {
                let parent_id = require(entity, kind, entity.parent_id.as_deref(), "parentId")?;
                let parent_type = require(
                    entity,
                    kind,
                    entity.parent_collection.as_deref(),
                    "parentCollection",
                )?;
                let mut request = RestRequest::new(Method::Post, "/folder")
                    .with_param("parentType", parent_type)
                    .with_param("parentId", parent_id)
                    .with_param("name", entity.display_title());
                if let Some(description) = &entity.description {
                    request = request.with_param("description", description);
                }
                if let Some(public) = entity.public {
                    request = request.with_param("public", public.to_string());
                }
                request
            }
            EntityKind::Item => {
                let folder_id = require(entity, kind, entity.folder_id.as_deref(), "folderId")?;
                let mut request = RestRequest::new(Method::Post, "/item")
                    .with_param("folderId", folder_id)
                    .with_param("name", entity.display_title());
                if let Some(description) = &entity.description {
                    request = request.with_param("description", description);
                }
                request
            }
            _ => {
                return Err(TreeviewError::PermissionDenied(format!(
                    "{kind} entities cannot be recreated"
                )))
            }
        };

        let created = self.execute(&request).await?;
        entity_id(&created).map_err(|source| TreeviewError::MutationFailed { source })
    }

    /// Apply an undo token's inverse request (user-triggered).
    pub async fn undo(&self, token: &UndoToken) -> Result<(), TreeviewError> {
        let _guard = self.acquire()?;
        self.execute(&token.inverse).await?;
        tracing::info!(description = %token.description, "Reverted operation");
        Ok(())
    }

    // ---- private helpers ----

    /// Resolve the recycle-bin folder id, creating the folder on first
    /// use. Memoized: at most one lookup/creation per engine lifetime.
    async fn recycle_bin(&self) -> Result<&str, TreeviewError> {
        let id = self
            .recycle_bin
            .get_or_try_init(|| async {
                let me = self
                    .rest
                    .current_user()
                    .await
                    .map_err(|source| TreeviewError::MutationFailed { source })?
                    .ok_or_else(|| {
                        TreeviewError::PermissionDenied(
                            "soft delete requires an authenticated user".to_string(),
                        )
                    })?;

                let lookup = FetchDescriptor::new("/folder")
                    .with_param("parentType", "user")
                    .with_param("parentId", &me.id)
                    .with_param("name", RECYCLE_BIN_NAME);
                let folders = self
                    .rest
                    .list(&lookup, 1)
                    .await
                    .map_err(|source| TreeviewError::MutationFailed { source })?;

                if let Some(bin) = folders.into_iter().next() {
                    return Ok(bin.id);
                }

                tracing::info!(user = %me.id, "Creating recycle bin folder");
                let created = self
                    .execute(
                        &RestRequest::new(Method::Post, "/folder")
                            .with_param("parentType", "user")
                            .with_param("parentId", &me.id)
                            .with_param("name", RECYCLE_BIN_NAME),
                    )
                    .await?;
                entity_id(&created).map_err(|source| TreeviewError::MutationFailed { source })
            })
            .await?;
        Ok(id)
    }

    /// Write-permission gate: refuse when the node is read-only or
    /// another operation holds the lock. Runs before any request.
    fn acquire_for(&self, node: &NodeDescriptor) -> Result<MutationGuard<'_>, TreeviewError> {
        if !node.write {
            return Err(TreeviewError::PermissionDenied(format!(
                "node {} is read-only",
                node.key
            )));
        }
        self.acquire()
    }

    fn acquire(&self) -> Result<MutationGuard<'_>, TreeviewError> {
        self.lock.try_acquire().ok_or_else(|| {
            TreeviewError::PermissionDenied("another operation is in progress".to_string())
        })
    }

    async fn execute(&self, request: &RestRequest) -> Result<serde_json::Value, TreeviewError> {
        self.rest.execute(request).await.map_err(|source| {
            tracing::warn!(
                method = request.method.as_str(),
                path = %request.path,
                error = %source,
                "Mutation request failed"
            );
            TreeviewError::MutationFailed { source }
        })
    }
}

/// The entity behind a node; synthetic nodes cannot be mutated.
fn backing_entity(node: &NodeDescriptor) -> Result<&Entity, TreeviewError> {
    node.entity.as_ref().ok_or_else(|| {
        TreeviewError::PermissionDenied(format!("node {} is not backed by an entity", node.key))
    })
}

fn require<'a>(
    entity: &Entity,
    kind: EntityKind,
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, ModelError> {
    value.ok_or_else(|| ModelError::MissingField {
        kind,
        id: entity.id.clone(),
        field,
    })
}

/// Pull the `_id` out of a creation response.
fn entity_id(value: &serde_json::Value) -> Result<String, RestError> {
    value["_id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| RestError::Malformed("creation response carries no _id".to_string()))
}
