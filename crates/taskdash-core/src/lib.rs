//! View-state for the task dashboard: the shared task store, the create
//! form, the sortable list with inline editing, and the analytics
//! projections. Nothing here knows about a UI framework; the Yew app and
//! the CLI both drive these types.

pub mod analytics;
pub mod datetime;
pub mod error;
pub mod form;
pub mod http;
pub mod list;
pub mod service;
pub mod store;

pub use error::{Notice, Result, TaskError};
pub use taskdash_shared::{TaskCreate, TaskDto, TaskPriority};
