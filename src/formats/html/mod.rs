//! Standalone HTML export and its importer.
//!
//! The exported page is the durable artifact users keep and hand-edit, so the
//! class names and attributes below are a compatibility contract: files
//! written by earlier exports must keep decoding.

mod decoder;
mod encoder;

pub use decoder::decode as decode_html;
pub use encoder::encode as encode_html;

use super::CatalogFormat;
use crate::config::ExportConfig;
use crate::error::FormatError;
use crate::models::Publisher;
use chrono::NaiveDate;

/// Class of the container wrapping one publisher.
const PUBLISHER_SECTION: &str = "publisher-section";
/// Class of the colored publisher header.
const PUBLISHER_HEADER: &str = "publisher-header";
/// Class of the span holding the icon-prefixed publisher name.
const PUBLISHER_NAME: &str = "publisher-name";
/// Class of a year-group separator row.
const SEPARATOR_ROW: &str = "separator-row";
/// Class of a book row.
const BOOK_ROW: &str = "book-row";

/// Attribute carrying the text the page's filter script searches.
const ATTR_SEARCH: &str = "data-search";
/// Attribute carrying the raw year group of a row.
const ATTR_GROUP: &str = "data-year-group";
/// Attribute marking a separator whose label is not a declared group.
const ATTR_IMPLICIT: &str = "data-implicit";
/// Attribute carrying a book's position in its publisher's sequence.
const ATTR_POSITION: &str = "data-position";

const PUBLISHER_ICON: &str = "🏢";
const PRE_ORDER_ICON: &str = "📅";

/// Page-level settings for an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    /// Contents of `<title>`.
    pub title: String,
    /// Visible page heading.
    pub heading: String,
    /// Date shown as "last updated"; today when `None`.
    pub updated: Option<NaiveDate>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

impl PageOptions {
    /// Builds page options from the export configuration.
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            title: config.page_title.clone(),
            heading: config.heading.clone(),
            updated: None,
        }
    }

    /// Pins the "last updated" date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.updated = Some(date);
        self
    }
}

/// The HTML page format.
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    options: PageOptions,
}

impl HtmlFormat {
    /// Creates the format with the given page options.
    pub fn new(options: PageOptions) -> Self {
        Self { options }
    }
}

impl CatalogFormat for HtmlFormat {
    fn name(&self) -> &'static str {
        "html"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["html", "htm"]
    }

    fn encode(&self, publishers: &[Publisher]) -> Result<String, FormatError> {
        Ok(encode_html(publishers, &self.options))
    }

    fn decode(&self, input: &str) -> Result<Vec<Publisher>, FormatError> {
        Ok(decode_html(input))
    }

    /// Invalid byte sequences become U+FFFD instead of failing the import.
    fn decode_bytes(&self, bytes: &[u8]) -> Result<Vec<Publisher>, FormatError> {
        self.decode(&String::from_utf8_lossy(bytes))
    }
}

/// Escapes text for use in element content and quoted attribute values.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
