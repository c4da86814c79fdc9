//! Core storage traits and abstractions.
//!
//! - [`RecordStore`] - Database driver abstraction
//! - [`BackendKind`], [`BackendCapability`] - Runtime capability discovery
//! - [`SearchCapabilities`] - The text-search primitives strategy selection looks at

mod backend;
mod store;

pub use backend::{BackendCapability, BackendKind, SearchCapabilities};
pub use store::RecordStore;
