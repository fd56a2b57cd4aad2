//! Substring filtering over the catalog.

use crate::models::{Book, Publisher};

/// Builds the composite text the exported page filters on.
pub fn search_text(book: &Book) -> String {
    [
        book.title.as_str(),
        book.author.as_str(),
        book.tw_progress.as_str(),
        book.read_progress.as_str(),
    ]
    .join(" ")
}

/// Case-insensitive substring match on title or author.
///
/// An empty query matches every book.
pub fn book_matches(book: &Book, query: &str) -> bool {
    let query = query.to_lowercase();
    book.title.to_lowercase().contains(&query) || book.author.to_lowercase().contains(&query)
}

/// Applies the publisher filter, then the book query.
///
/// Publishers that survive the name filter are kept even if none of their
/// books match. Returned books keep their original positions.
pub fn filter_publishers<'a>(
    publishers: &'a [Publisher],
    publisher: Option<&str>,
    query: &str,
) -> Vec<(&'a Publisher, Vec<usize>)> {
    publishers
        .iter()
        .filter(|p| publisher.is_none_or(|name| p.name == name))
        .map(|p| {
            let hits = p
                .books
                .iter()
                .enumerate()
                .filter(|(_, b)| book_matches(b, query))
                .map(|(i, _)| i)
                .collect();
            (p, hits)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Publisher> {
        let mut kadokawa = Publisher::new("角川", "#fff");
        let mut book = Book::new("Overlord");
        book.author = "丸山くがね".to_string();
        kadokawa.books.push(book);
        kadokawa.books.push(Book::new("Slayers"));

        let mut tongli = Publisher::new("東立", "#eee");
        tongli.books.push(Book::new("Sword Art Online"));
        vec![kadokawa, tongli]
    }

    #[test]
    fn test_search_text_joins_fields() {
        let mut book = Book::new("Title");
        book.author = "Author".to_string();
        book.tw_progress = "12".to_string();
        book.read_progress = "10".to_string();
        book.jp_progress = "20".to_string();
        assert_eq!(search_text(&book), "Title Author 12 10");
    }

    #[test]
    fn test_book_matches_case_insensitive() {
        let book = Book::new("Sword Art Online");
        assert!(book_matches(&book, "art on"));
        assert!(book_matches(&book, "SWORD"));
        assert!(book_matches(&book, ""));
        assert!(!book_matches(&book, "overlord"));
    }

    #[test]
    fn test_book_matches_author() {
        let mut book = Book::new("Overlord");
        book.author = "丸山くがね".to_string();
        assert!(book_matches(&book, "丸山"));
    }

    #[test]
    fn test_filter_publishers() {
        let publishers = sample();

        let all = filter_publishers(&publishers, None, "s");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].1, vec![1]);
        assert_eq!(all[1].1, vec![0]);

        let only = filter_publishers(&publishers, Some("東立"), "overlord");
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].0.name, "東立");
        assert!(only[0].1.is_empty());
    }
}
