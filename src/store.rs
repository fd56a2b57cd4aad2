//! In-memory catalog store.
//!
//! The store owns the publisher list behind an `Arc`. Snapshots are cheap
//! clones of that `Arc`; every mutation copies the list first if a snapshot
//! is still alive, so snapshots never observe later edits.

use crate::error::{FormatError, StoreError};
use crate::formats::FormatRegistry;
use crate::models::{Book, FALLBACK_GROUP, Publisher};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Owned, mutable publisher list.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    publishers: Arc<Vec<Publisher>>,
}

impl CatalogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `publishers`.
    pub fn from_publishers(publishers: Vec<Publisher>) -> Self {
        Self {
            publishers: Arc::new(publishers),
        }
    }

    /// Loads a catalog file, choosing the format by extension.
    ///
    /// A missing file yields an empty store.
    pub fn load(path: &Path, registry: &FormatRegistry) -> Result<Self, FormatError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        Ok(Self::from_publishers(registry.read(path)?))
    }

    /// Writes the catalog, choosing the format by extension.
    pub fn save(&self, path: &Path, registry: &FormatRegistry) -> Result<(), FormatError> {
        registry.write(path, &self.publishers)
    }

    /// Returns an immutable view of the current list.
    pub fn snapshot(&self) -> Arc<Vec<Publisher>> {
        Arc::clone(&self.publishers)
    }

    /// Borrows the current list.
    pub fn publishers(&self) -> &[Publisher] {
        &self.publishers
    }

    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }

    /// Finds a publisher's position by name.
    pub fn publisher_index(&self, name: &str) -> Result<usize, StoreError> {
        self.publishers
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| StoreError::PublisherNotFound(name.to_string()))
    }

    /// Borrows the publisher at `index`.
    pub fn publisher(&self, index: usize) -> Result<&Publisher, StoreError> {
        self.publishers
            .get(index)
            .ok_or(StoreError::PublisherIndex(index))
    }

    /// Replaces the whole list, as an import does.
    pub fn replace_all(&mut self, publishers: Vec<Publisher>) {
        self.publishers = Arc::new(publishers);
    }

    /// Removes every publisher.
    pub fn clear(&mut self) {
        self.replace_all(Vec::new());
    }

    /// Appends a publisher with no books. Returns its position.
    pub fn add_publisher(&mut self, name: &str, color: &str) -> Result<usize, StoreError> {
        let name = self.check_name(name, None)?;
        let list = Arc::make_mut(&mut self.publishers);
        list.push(Publisher::new(name, color.trim()));
        Ok(list.len() - 1)
    }

    /// Renames the publisher at `index`.
    pub fn rename_publisher(&mut self, index: usize, name: &str) -> Result<(), StoreError> {
        self.publisher(index)?;
        let name = self.check_name(name, Some(index))?;
        self.publisher_mut(index)?.name = name;
        Ok(())
    }

    /// Changes the header color of the publisher at `index`.
    pub fn set_publisher_color(&mut self, index: usize, color: &str) -> Result<(), StoreError> {
        self.publisher_mut(index)?.color = color.trim().to_string();
        Ok(())
    }

    /// Removes the publisher at `index` together with its books.
    pub fn remove_publisher(&mut self, index: usize) -> Result<Publisher, StoreError> {
        self.publisher(index)?;
        Ok(Arc::make_mut(&mut self.publishers).remove(index))
    }

    /// Declares a year group. Declaring an existing label is a no-op.
    pub fn add_year_group(&mut self, index: usize, label: &str) -> Result<(), StoreError> {
        let label = non_empty(label)?;
        let publisher = self.publisher_mut(index)?;
        if !publisher.is_declared(&label) {
            publisher.year_groups.push(label);
        }
        Ok(())
    }

    /// Renames a year group in the declared list and on every book using it.
    ///
    /// Renaming onto an already declared label merges the two groups.
    pub fn rename_year_group(
        &mut self,
        index: usize,
        old: &str,
        new: &str,
    ) -> Result<(), StoreError> {
        let new = non_empty(new)?;
        {
            let publisher = self.publisher(index)?;
            if !publisher.is_declared(old) && !publisher.books.iter().any(|b| b.year_group == old)
            {
                return Err(StoreError::YearGroupNotFound(old.to_string()));
            }
        }
        if old == new {
            return Ok(());
        }

        let publisher = self.publisher_mut(index)?;
        if publisher.is_declared(&new) {
            publisher.year_groups.retain(|g| g != old);
        } else if let Some(slot) = publisher.year_groups.iter_mut().find(|g| g.as_str() == old) {
            *slot = new.clone();
        }

        let mut moved = false;
        for book in publisher.books.iter_mut().filter(|b| b.year_group == old) {
            book.year_group = new.clone();
            moved = true;
        }
        if moved {
            register_group(publisher, &new);
        }
        Ok(())
    }

    /// Deletes a year group. Its books move to the fallback group.
    pub fn delete_year_group(&mut self, index: usize, label: &str) -> Result<(), StoreError> {
        {
            let publisher = self.publisher(index)?;
            if !publisher.is_declared(label) && !publisher.books.iter().any(|b| b.year_group == label)
            {
                return Err(StoreError::YearGroupNotFound(label.to_string()));
            }
        }

        let publisher = self.publisher_mut(index)?;
        publisher.year_groups.retain(|g| g != label);

        let mut moved = false;
        for book in publisher.books.iter_mut().filter(|b| b.year_group == label) {
            book.year_group = FALLBACK_GROUP.to_string();
            moved = true;
        }
        if moved {
            register_group(publisher, FALLBACK_GROUP);
        }
        Ok(())
    }

    /// Appends a book under the publisher at `index` with a fresh id.
    /// Returns the book's position.
    pub fn add_book(&mut self, index: usize, book: Book) -> Result<usize, StoreError> {
        let book = prepare(book, Uuid::new_v4())?;
        let publisher = self.publisher_mut(index)?;
        register_group(publisher, &book.year_group);
        publisher.books.push(book);
        Ok(publisher.books.len() - 1)
    }

    /// Replaces the book at `position`, keeping its id.
    pub fn edit_book(&mut self, index: usize, position: usize, book: Book) -> Result<(), StoreError> {
        let id = self.book(index, position)?.id;
        let book = prepare(book, id)?;
        let publisher = self.publisher_mut(index)?;
        register_group(publisher, &book.year_group);
        publisher.books[position] = book;
        Ok(())
    }

    /// Removes and returns the book at `position`.
    pub fn delete_book(&mut self, index: usize, position: usize) -> Result<Book, StoreError> {
        self.book(index, position)?;
        Ok(self.publisher_mut(index)?.books.remove(position))
    }

    /// Borrows the book at `position` in the publisher at `index`.
    pub fn book(&self, index: usize, position: usize) -> Result<&Book, StoreError> {
        let publisher = self.publisher(index)?;
        publisher.books.get(position).ok_or_else(|| StoreError::BookIndex {
            publisher: publisher.name.clone(),
            index: position,
        })
    }

    fn publisher_mut(&mut self, index: usize) -> Result<&mut Publisher, StoreError> {
        self.publisher(index)?;
        Ok(&mut Arc::make_mut(&mut self.publishers)[index])
    }

    /// Trims `name` and checks it is non-empty and unused by other publishers.
    fn check_name(&self, name: &str, except: Option<usize>) -> Result<String, StoreError> {
        let name = non_empty(name)?;
        let taken = self
            .publishers
            .iter()
            .enumerate()
            .any(|(i, p)| Some(i) != except && p.name == name);
        if taken {
            return Err(StoreError::DuplicatePublisher(name));
        }
        Ok(name)
    }
}

fn non_empty(value: &str) -> Result<String, StoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::EmptyName);
    }
    Ok(value.to_string())
}

/// Trims every text field, requires a title, and stamps the id.
fn prepare(mut book: Book, id: Uuid) -> Result<Book, StoreError> {
    let fields = [
        &mut book.title,
        &mut book.author,
        &mut book.author_link,
        &mut book.tw_progress,
        &mut book.tw_date,
        &mut book.pre_order_date,
        &mut book.jp_progress,
        &mut book.jp_date,
        &mut book.cn_status,
        &mut book.read_progress,
        &mut book.year_group,
    ];
    for field in fields {
        let trimmed = field.trim();
        if trimmed.len() != field.len() {
            *field = trimmed.to_string();
        }
    }

    if book.title.is_empty() {
        return Err(StoreError::MissingTitle);
    }
    book.id = id;
    Ok(book)
}

/// Adds a book's group label to the declared list if it is missing.
fn register_group(publisher: &mut Publisher, label: &str) {
    if !label.is_empty() && !publisher.is_declared(label) {
        publisher.year_groups.push(label.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::formats::{PageOptions, decode_html, encode_html};
    use tempfile::TempDir;

    fn store_with_groups() -> CatalogStore {
        let mut store = CatalogStore::new();
        let idx = store.add_publisher("台灣角川", "#e0e7ff").unwrap();
        store.add_year_group(idx, "2024").unwrap();
        store.add_year_group(idx, "2025").unwrap();
        store.add_book(idx, Book::new("A").in_group("2025")).unwrap();
        store.add_book(idx, Book::new("B").in_group("2024")).unwrap();
        store.add_book(idx, Book::new("C")).unwrap();
        store
    }

    fn titles_in(store: &CatalogStore, group: &str) -> Vec<String> {
        store.publishers()[0]
            .books
            .iter()
            .filter(|b| b.year_group == group)
            .map(|b| b.title.clone())
            .collect()
    }

    #[test]
    fn test_add_publisher_rules() {
        let mut store = CatalogStore::new();
        assert_eq!(store.add_publisher("  東立 ", "#fff").unwrap(), 0);
        assert_eq!(store.publishers()[0].name, "東立");
        assert_eq!(
            store.add_publisher("東立", "#000"),
            Err(StoreError::DuplicatePublisher("東立".to_string()))
        );
        assert_eq!(store.add_publisher("   ", "#000"), Err(StoreError::EmptyName));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rename_and_remove_publisher() {
        let mut store = CatalogStore::new();
        store.add_publisher("東立", "#fff").unwrap();
        store.add_publisher("青文", "#fff").unwrap();

        assert!(store.rename_publisher(0, "青文").is_err());
        store.rename_publisher(0, "東立").unwrap();
        store.rename_publisher(0, "東立出版").unwrap();
        assert_eq!(store.publisher_index("東立出版").unwrap(), 0);

        store.set_publisher_color(1, " #123456 ").unwrap();
        assert_eq!(store.publishers()[1].color, "#123456");

        let removed = store.remove_publisher(0).unwrap();
        assert_eq!(removed.name, "東立出版");
        assert_eq!(store.publishers()[0].name, "青文");
        assert_eq!(store.remove_publisher(5), Err(StoreError::PublisherIndex(5)));
        assert!(matches!(
            store.publisher_index("東立出版"),
            Err(StoreError::PublisherNotFound(_))
        ));
    }

    #[test]
    fn test_add_year_group_is_idempotent() {
        let mut store = store_with_groups();
        store.add_year_group(0, " 2024 ").unwrap();
        assert_eq!(store.publishers()[0].year_groups, vec!["2024", "2025"]);
        assert_eq!(store.add_year_group(0, ""), Err(StoreError::EmptyName));
    }

    #[test]
    fn test_delete_year_group_moves_books() {
        let mut store = store_with_groups();
        store.delete_year_group(0, "2024").unwrap();

        let publisher = &store.publishers()[0];
        assert!(!publisher.is_declared("2024"));
        assert_eq!(publisher.books.len(), 3);
        assert_eq!(titles_in(&store, FALLBACK_GROUP), vec!["B"]);
        assert!(store.publishers()[0].is_declared(FALLBACK_GROUP));
    }

    #[test]
    fn test_delete_empty_year_group() {
        let mut store = store_with_groups();
        store.add_year_group(0, "2026").unwrap();
        store.delete_year_group(0, "2026").unwrap();
        assert_eq!(store.publishers()[0].year_groups, vec!["2024", "2025"]);
        assert!(matches!(
            store.delete_year_group(0, "1999"),
            Err(StoreError::YearGroupNotFound(_))
        ));
    }

    #[test]
    fn test_rename_year_group_cascades() {
        let mut store = store_with_groups();
        store.rename_year_group(0, "2024", "2023~2024").unwrap();

        assert_eq!(store.publishers()[0].year_groups, vec!["2023~2024", "2025"]);
        assert_eq!(titles_in(&store, "2023~2024"), vec!["B"]);
        assert!(titles_in(&store, "2024").is_empty());
    }

    #[test]
    fn test_rename_year_group_merges() {
        let mut store = store_with_groups();
        store.rename_year_group(0, "2024", "2025").unwrap();

        assert_eq!(store.publishers()[0].year_groups, vec!["2025"]);
        assert_eq!(titles_in(&store, "2025"), vec!["A", "B"]);
        assert_eq!(store.rename_year_group(0, "2025", " "), Err(StoreError::EmptyName));
        assert!(store.rename_year_group(0, "nope", "x").is_err());
    }

    #[test]
    fn test_add_book_requires_title_and_registers_group() {
        let mut store = store_with_groups();
        assert_eq!(store.add_book(0, Book::new("  ")), Err(StoreError::MissingTitle));

        let pos = store.add_book(0, Book::new(" D ").in_group("2026")).unwrap();
        assert_eq!(pos, 3);
        let publisher = &store.publishers()[0];
        assert_eq!(publisher.books[3].title, "D");
        assert_eq!(publisher.year_groups, vec!["2024", "2025", "2026"]);
    }

    #[test]
    fn test_rename_orphan_group_registers_new_label() {
        let mut store = CatalogStore::from_publishers(vec![Publisher::new("東立", "#fff")]);
        store.publisher_mut(0).unwrap().books.push(Book::new("A").in_group("舊作"));

        store.rename_year_group(0, "舊作", "2020").unwrap();

        let publisher = &store.publishers()[0];
        assert_eq!(publisher.year_groups, vec!["2020"]);
        assert_eq!(publisher.books[0].year_group, "2020");
    }

    #[test]
    fn test_written_fields_survive_html_round_trip() {
        let mut store = CatalogStore::new();
        store.add_publisher("尖端", " #fde68a ").unwrap();

        let mut book = Book::new("Re:Zero");
        book.author = " 長月達平 ".to_string();
        book.pre_order_date = " ".to_string();
        book.read_progress = "3\n".to_string();
        store.add_book(0, book).unwrap();

        let stored = store.book(0, 0).unwrap();
        assert_eq!(stored.author, "長月達平");
        assert_eq!(stored.pre_order_date, "");
        assert_eq!(store.publishers()[0].color, "#fde68a");

        let html = encode_html(store.publishers(), &PageOptions::default());
        assert!(!html.contains("class=\"pre-tag"));
        let decoded = decode_html(&html);
        assert!(decoded[0].same_content(&store.publishers()[0]));
    }

    #[test]
    fn test_add_book_assigns_fresh_id() {
        let mut store = store_with_groups();
        let book = Book::new("D");
        let supplied = book.id;
        store.add_book(0, book.clone()).unwrap();
        store.add_book(0, book).unwrap();

        let books = &store.publishers()[0].books;
        assert_ne!(books[3].id, supplied);
        assert_ne!(books[3].id, books[4].id);
    }

    #[test]
    fn test_edit_book_keeps_id_and_position() {
        let mut store = store_with_groups();
        let id = store.book(0, 1).unwrap().id;

        let mut edited = Book::new("B2").in_group("2025");
        edited.read_progress = "5".to_string();
        store.edit_book(0, 1, edited).unwrap();

        let book = store.book(0, 1).unwrap();
        assert_eq!(book.id, id);
        assert_eq!(book.title, "B2");
        assert_eq!(book.read_progress, "5");
        assert_eq!(
            store.edit_book(0, 9, Book::new("x")),
            Err(StoreError::BookIndex {
                publisher: "台灣角川".to_string(),
                index: 9
            })
        );
        assert_eq!(store.edit_book(0, 0, Book::default()), Err(StoreError::MissingTitle));
    }

    #[test]
    fn test_delete_book() {
        let mut store = store_with_groups();
        let removed = store.delete_book(0, 0).unwrap();
        assert_eq!(removed.title, "A");
        assert_eq!(store.publishers()[0].books[0].title, "B");
        assert!(store.delete_book(0, 7).is_err());
        assert!(store.delete_book(3, 0).is_err());
    }

    #[test]
    fn test_snapshot_is_copy_on_write() {
        let mut store = store_with_groups();
        let before = store.snapshot();

        store.delete_book(0, 0).unwrap();
        store.add_publisher("青文", "#fff").unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].books.len(), 3);
        assert_eq!(store.len(), 2);
        assert_eq!(store.publishers()[0].books.len(), 2);
    }

    #[test]
    fn test_replace_all_and_clear() {
        let mut store = store_with_groups();
        store.replace_all(vec![Publisher::new("尖端", "#fff"), Publisher::new("東立", "#fff")]);
        assert_eq!(store.len(), 2);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_missing_and_save() {
        let dir = TempDir::new().unwrap();
        let registry = FormatRegistry::new(&ExportConfig::default());
        let path = dir.path().join("catalog.json");

        let store = CatalogStore::load(&path, &registry).unwrap();
        assert!(store.is_empty());

        let store = store_with_groups();
        store.save(&path, &registry).unwrap();
        let loaded = CatalogStore::load(&path, &registry).unwrap();
        assert_eq!(loaded.publishers(), store.publishers());
    }
}
