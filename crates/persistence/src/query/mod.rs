//! Query assembly and resolution.
//!
//! [`RecordResolver`] is the request-facing entry point. It validates paging,
//! compiles search terms, builds a [`SelectQuery`], lets the installed
//! [`QueryModifier`] adjust it and runs it on a [`RecordStore`](crate::core::RecordStore).

mod modifier;
mod resolver;
mod select;

pub use modifier::{ColumnScope, NoopModifier, QueryModifier};
pub use resolver::RecordResolver;
pub use select::{Filter, SelectQuery};
