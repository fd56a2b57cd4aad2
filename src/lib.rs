//! lnlist - light novel release tracker.
//!
//! This library provides functionality for:
//! - Keeping a catalog of publishers and the book series they release
//! - Exporting the catalog as a standalone, searchable HTML page
//! - Importing such pages (including hand-edited ones) back into the catalog
//! - Saving the catalog as a versioned JSON snapshot

pub mod config;
pub mod console;
pub mod error;
pub mod formats;
pub mod models;
pub mod search;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use console::Console;
pub use error::{ConfigError, FormatError, StoreError};
pub use formats::{CatalogFormat, FormatRegistry, HtmlFormat, JsonFormat, PageOptions};
pub use models::{Book, Publisher};
pub use store::CatalogStore;
