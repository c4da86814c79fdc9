//! Core types for the persistence layer.
//!
//! - [`Record`], [`RecordId`] - Rows and primary keys
//! - [`ListQuery`], [`Page`] - Multi-record request arguments

mod list;
mod record;

pub use list::{ListQuery, Page};
pub use record::{Record, RecordId};
