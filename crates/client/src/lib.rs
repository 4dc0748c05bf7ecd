//! Lazily loaded tree-view client for a Girder REST backend.
//!
//! Wires the pure model in `girdertree-core` to a live backend: a
//! [`rest::GirderClient`] request layer, the [`fetch::FetchEngine`]
//! paged child-materialization pipeline, the [`mutate::MutationEngine`]
//! for rename/move/soft-delete with one-step undo, and the
//! [`adapter::TreeAdapter`] boundary that translates it all into the
//! lazy-load / drag-drop / edit callback contract of an external
//! tree-rendering widget.

pub mod adapter;
pub mod config;
pub mod error;
pub mod fetch;
pub mod icons;
pub mod mutate;
pub mod rest;

pub use adapter::{MutationOutcome, TreeAdapter};
pub use config::TreeviewConfig;
pub use error::TreeviewError;
pub use fetch::{replace_continuation, FetchEngine};
pub use mutate::MutationEngine;
pub use rest::{GirderClient, RestError};
