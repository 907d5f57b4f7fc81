//! Store module - object operations against the cloud container
//!
//! This module is organized into submodules:
//! - `types`: Core types and client creation
//! - `list`: Full-container listing
//! - `objects`: Object operations (fetch, upload, download, delete)

mod list;
mod objects;
mod types;

// Re-export types
pub use types::{RemoteItem, StoreConfig};

// Re-export list operations
pub use list::list_items;

// Re-export object operations
pub use objects::{delete_object, download_to_file, fetch_object, upload_file};
