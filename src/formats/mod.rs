//! Catalog file formats and the registry that picks one per file.
//!
//! The HTML format is the human-readable export that opens directly in a
//! browser; the JSON format is the versioned snapshot used as a working file.

mod html;
mod json;

pub use html::{HtmlFormat, PageOptions, decode_html, encode_html};
pub use json::{JsonFormat, SNAPSHOT_VERSION};

use crate::config::ExportConfig;
use crate::error::FormatError;
use crate::models::Publisher;
use std::path::Path;

/// A serialization of the whole publisher list.
pub trait CatalogFormat: Send + Sync {
    /// Returns the identifier used on the command line.
    fn name(&self) -> &'static str;

    /// File extensions (lowercase, without the dot) handled by this format.
    fn extensions(&self) -> &'static [&'static str];

    /// Checks if this format handles the given path, by extension.
    fn can_handle(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions().contains(&ext.as_str())
            })
    }

    /// Serializes the publisher list.
    fn encode(&self, publishers: &[Publisher]) -> Result<String, FormatError>;

    /// Rebuilds a publisher list from serialized content.
    fn decode(&self, input: &str) -> Result<Vec<Publisher>, FormatError>;

    /// Rebuilds a publisher list from raw file bytes. Rejects invalid UTF-8.
    fn decode_bytes(&self, bytes: &[u8]) -> Result<Vec<Publisher>, FormatError> {
        self.decode(std::str::from_utf8(bytes)?)
    }
}

/// Registry of available formats.
pub struct FormatRegistry {
    formats: Vec<Box<dyn CatalogFormat>>,
}

impl FormatRegistry {
    /// Creates a new registry with all available formats.
    pub fn new(config: &ExportConfig) -> Self {
        let formats: Vec<Box<dyn CatalogFormat>> = vec![
            Box::new(HtmlFormat::new(PageOptions::from_config(config))),
            Box::new(JsonFormat),
        ];

        Self { formats }
    }

    /// Finds a format that can handle the given path.
    pub fn find_for_path(&self, path: &Path) -> Option<&dyn CatalogFormat> {
        self.formats
            .iter()
            .find(|f| f.can_handle(path))
            .map(|f| f.as_ref())
    }

    /// Finds a format by its name.
    pub fn find_by_name(&self, name: &str) -> Option<&dyn CatalogFormat> {
        self.formats
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .map(|f| f.as_ref())
    }

    /// Returns all registered formats.
    pub fn all(&self) -> &[Box<dyn CatalogFormat>] {
        &self.formats
    }

    /// Lists every handled extension, for messages like `html, htm, json`.
    pub fn extensions(&self) -> String {
        self.all()
            .iter()
            .flat_map(|f| f.extensions().iter().copied())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Reads and decodes a catalog file, choosing the format by extension.
    pub fn read(&self, path: &Path) -> Result<Vec<Publisher>, FormatError> {
        let format = self.require(path)?;
        let bytes = std::fs::read(path)?;
        format.decode_bytes(&bytes)
    }

    /// Encodes and writes a catalog file, choosing the format by extension.
    pub fn write(&self, path: &Path, publishers: &[Publisher]) -> Result<(), FormatError> {
        self.write_with(self.require(path)?, path, publishers)
    }

    /// Encodes with an explicit format and writes to `path`, creating its
    /// parent directory.
    pub fn write_with(
        &self,
        format: &dyn CatalogFormat,
        path: &Path,
        publishers: &[Publisher],
    ) -> Result<(), FormatError> {
        let content = format.encode(publishers)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    fn require(&self, path: &Path) -> Result<&dyn CatalogFormat, FormatError> {
        self.find_for_path(path)
            .ok_or_else(|| FormatError::UnsupportedFile(path.display().to_string()))
    }
}
