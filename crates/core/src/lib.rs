//! Core data model for the Girder tree view.
//!
//! Pure types and transforms shared by the client layer: entity kinds,
//! backend entity records, node descriptors, paged fetch descriptors,
//! undo tokens, and the entity-to-node mapper. No I/O happens here;
//! everything network-facing lives in `girdertree-client`.

pub mod entity;
pub mod error;
pub mod kind;
pub mod mapper;
pub mod node;
pub mod page;
pub mod undo;

pub use entity::Entity;
pub use error::ModelError;
pub use kind::EntityKind;
pub use node::{NodeDescriptor, RootKind};
pub use page::FetchDescriptor;
pub use undo::{Method, RestRequest, UndoToken};
