//! Catalog data model: publishers owning ordered books and year groups.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display label for books without a year group.
pub const FALLBACK_GROUP: &str = "其他";

/// Name given to a decoded publisher section whose header could not be read.
pub const UNKNOWN_PUBLISHER: &str = "未知出版社";

/// Header color assumed when a decoded section has no inline background.
pub const FALLBACK_COLOR: &str = "#ffccff";

/// Header color for publishers created from scratch.
pub const NEW_PUBLISHER_COLOR: &str = "#e0e7ff";

/// File name used for HTML exports.
pub const EXPORT_FILE_NAME: &str = "My_Light_Novel_List.html";

/// A single tracked title.
///
/// Every field except `id` is free text with no enforced format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    /// Session-unique identity. Regenerated on creation and on HTML import.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// Optional URL for the author; empty when unknown.
    pub author_link: String,
    /// Taiwanese edition progress.
    pub tw_progress: String,
    /// Latest Taiwanese release date.
    pub tw_date: String,
    /// Upcoming pre-order date; empty when nothing is announced.
    pub pre_order_date: String,
    /// Japanese original progress.
    pub jp_progress: String,
    /// Latest Japanese release date.
    pub jp_date: String,
    /// Chinese translation status.
    pub cn_status: String,
    /// Personal reading progress.
    pub read_progress: String,
    /// Year-group label; empty means unassigned.
    pub year_group: String,
}

impl Book {
    /// Creates a book with a fresh id and the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the year group (builder style).
    pub fn in_group(mut self, year_group: impl Into<String>) -> Self {
        self.year_group = year_group.into();
        self
    }

    /// Label the book is displayed under.
    pub fn group_label(&self) -> &str {
        if self.year_group.is_empty() {
            FALLBACK_GROUP
        } else {
            &self.year_group
        }
    }

    /// Compares every field except `id`.
    pub fn same_content(&self, other: &Book) -> bool {
        Book { id: other.id, ..self.clone() } == *other
    }
}

/// One display group of a publisher: its label and the books under it.
#[derive(Debug, Clone)]
pub struct BookGroup<'a> {
    pub label: &'a str,
    /// Whether the label appears in the publisher's declared year groups.
    pub declared: bool,
    /// Books in their original sequence order, with their positions.
    pub books: Vec<(usize, &'a Book)>,
}

/// A named collection of books.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Publisher {
    /// Display name, unique among publishers.
    pub name: String,
    /// CSS color of the section header.
    pub color: String,
    /// Books in manual insertion order.
    pub books: Vec<Book>,
    /// Declared year-group labels in display order, possibly empty groups.
    pub year_groups: Vec<String>,
}

impl Publisher {
    /// Creates an empty publisher.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            books: Vec::new(),
            year_groups: Vec::new(),
        }
    }

    /// Checks whether `label` is in the declared year groups.
    pub fn is_declared(&self, label: &str) -> bool {
        self.year_groups.iter().any(|g| g == label)
    }

    /// Groups books for display.
    ///
    /// Declared groups come first in declared order (even when empty), then
    /// labels only reached through a book, in order of first appearance.
    /// Books keep their sequence order inside each group.
    pub fn grouped_books(&self) -> Vec<BookGroup<'_>> {
        let mut groups: Vec<BookGroup<'_>> = Vec::new();

        for label in self.year_groups.iter().map(String::as_str) {
            if !groups.iter().any(|g| g.label == label) {
                groups.push(BookGroup {
                    label,
                    declared: true,
                    books: Vec::new(),
                });
            }
        }

        for (index, book) in self.books.iter().enumerate() {
            let label = book.group_label();
            match groups.iter_mut().find(|g| g.label == label) {
                Some(group) => group.books.push((index, book)),
                None => groups.push(BookGroup {
                    label,
                    declared: false,
                    books: vec![(index, book)],
                }),
            }
        }

        groups
    }

    /// Compares name, color, declared groups, and book content ignoring ids.
    pub fn same_content(&self, other: &Publisher) -> bool {
        self.name == other.name
            && self.color == other.color
            && self.year_groups == other.year_groups
            && self.books.len() == other.books.len()
            && self
                .books
                .iter()
                .zip(&other.books)
                .all(|(a, b)| a.same_content(b))
    }
}
