//! Rebuilds the publisher list from an exported (or hand-edited) page.
//!
//! Decoding is best-effort: any element that cannot be found yields an empty
//! field, and a page without publisher sections yields an empty list.

use super::{
    ATTR_GROUP, ATTR_IMPLICIT, ATTR_POSITION, BOOK_ROW, PRE_ORDER_ICON, PUBLISHER_ICON,
    SEPARATOR_ROW,
};
use crate::models::{Book, FALLBACK_COLOR, Publisher, UNKNOWN_PUBLISHER};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;
use uuid::Uuid;

/// Publisher name following the icon in the header text.
static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"🏢\s*(.+)").unwrap());

/// Background color inside an inline style attribute.
static COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)background-color\s*:\s*([^;]+)").unwrap());

static SELECTORS: LazyLock<Selectors> = LazyLock::new(Selectors::new);

/// CSS selectors used for parsing.
struct Selectors {
    section: Selector,
    /// Header (current layout).
    header: Selector,
    /// Header (pages written before the header had its own class).
    header_fallback: Selector,
    name: Selector,
    separator: Selector,
    book_row: Selector,
    cell: Selector,
    title: Selector,
    /// Author link or span (current layout).
    author: Selector,
    /// Author link (older layout).
    author_fallback: Selector,
    progress: Selector,
    date: Selector,
    pre_order: Selector,
    status: Selector,
    read_progress: Selector,
}

impl Selectors {
    fn new() -> Self {
        Self {
            section: Selector::parse(".publisher-section").unwrap(),
            header: Selector::parse(".publisher-header").unwrap(),
            header_fallback: Selector::parse(".px-6.py-4").unwrap(),
            name: Selector::parse(".publisher-name").unwrap(),
            separator: Selector::parse("tr.separator-row").unwrap(),
            book_row: Selector::parse("tr.book-row").unwrap(),
            cell: Selector::parse("td").unwrap(),
            title: Selector::parse(".font-bold").unwrap(),
            author: Selector::parse(".author").unwrap(),
            author_fallback: Selector::parse("a").unwrap(),
            progress: Selector::parse(".font-mono").unwrap(),
            date: Selector::parse(".date-tag").unwrap(),
            pre_order: Selector::parse(".pre-tag").unwrap(),
            status: Selector::parse(".read-badge").unwrap(),
            read_progress: Selector::parse(".text-sm").unwrap(),
        }
    }
}

/// Parses `html` and returns one publisher per section, in document order.
pub fn decode(html: &str) -> Vec<Publisher> {
    let doc = Html::parse_document(html);
    doc.select(&SELECTORS.section).map(decode_section).collect()
}

fn decode_section(section: ElementRef<'_>) -> Publisher {
    let header = section
        .select(&SELECTORS.header)
        .next()
        .or_else(|| section.select(&SELECTORS.header_fallback).next());

    let name = header
        .and_then(extract_name)
        .unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string());
    let color = header
        .and_then(extract_color)
        .unwrap_or_else(|| FALLBACK_COLOR.to_string());

    let separators: Vec<ElementRef<'_>> = section.select(&SELECTORS.separator).collect();
    let rows: Vec<ElementRef<'_>> = section.select(&SELECTORS.book_row).collect();

    let mut year_groups: Vec<String> = Vec::new();
    for separator in &separators {
        if separator.value().attr(ATTR_IMPLICIT) == Some("true") {
            continue;
        }
        let label = element_text(*separator);
        if !label.is_empty() && !year_groups.contains(&label) {
            year_groups.push(label);
        }
    }

    let mut books: Vec<Book> = rows.iter().map(|row| decode_book(*row)).collect();
    assign_positional_groups(&separators, &rows, &mut books);
    let books = restore_order(&rows, books);

    Publisher {
        name,
        color,
        books,
        year_groups,
    }
}

fn extract_name(header: ElementRef<'_>) -> Option<String> {
    let name = match header.select(&SELECTORS.name).next() {
        Some(span) => {
            let text = element_text(span);
            text.strip_prefix(PUBLISHER_ICON)?.trim().to_string()
        }
        None => {
            let text: String = header.text().collect();
            NAME_REGEX.captures(&text)?.get(1)?.as_str().trim().to_string()
        }
    };

    Some(name).filter(|n| !n.is_empty())
}

fn extract_color(header: ElementRef<'_>) -> Option<String> {
    let style = header.value().attr("style")?;
    let color = COLOR_REGEX.captures(style)?.get(1)?.as_str().trim();
    Some(color.to_string()).filter(|c| !c.is_empty())
}

fn decode_book(row: ElementRef<'_>) -> Book {
    let cells: Vec<ElementRef<'_>> = row.select(&SELECTORS.cell).collect();
    let cell = |i: usize| cells.get(i).copied();

    let author = cell(0).and_then(|c| {
        first(c, &SELECTORS.author).or_else(|| first(c, &SELECTORS.author_fallback))
    });

    let pre_order_date = cell(1)
        .and_then(|c| first(c, &SELECTORS.pre_order))
        .map(|e| element_text(e).replacen(PRE_ORDER_ICON, "", 1).trim().to_string())
        .unwrap_or_default();

    Book {
        id: Uuid::new_v4(),
        title: field(cell(0), &SELECTORS.title),
        author: author.map(element_text).unwrap_or_default(),
        author_link: author
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string)
            .unwrap_or_default(),
        tw_progress: field(cell(1), &SELECTORS.progress),
        tw_date: field(cell(1), &SELECTORS.date),
        pre_order_date,
        jp_progress: field(cell(2), &SELECTORS.progress),
        jp_date: field(cell(2), &SELECTORS.date),
        cn_status: field(cell(3), &SELECTORS.status),
        read_progress: field(cell(4), &SELECTORS.read_progress),
        year_group: row
            .value()
            .attr(ATTR_GROUP)
            .map(|g| g.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Assigns groups to rows that carry no explicit group attribute.
///
/// Each separator claims the book rows among its following siblings up to the
/// next separator. Rows before the first separator stay unassigned.
fn assign_positional_groups(
    separators: &[ElementRef<'_>],
    rows: &[ElementRef<'_>],
    books: &mut [Book],
) {
    let positions: HashMap<_, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.id(), i))
        .collect();

    for separator in separators {
        let label = element_text(*separator);
        let claimed = separator
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|el| !has_class(*el, SEPARATOR_ROW))
            .filter(|el| has_class(*el, BOOK_ROW) && el.value().attr(ATTR_GROUP).is_none());

        for row in claimed {
            if let Some(&i) = positions.get(&row.id()) {
                books[i].year_group = label.clone();
            }
        }
    }
}

/// Reorders books by their recorded sequence position.
///
/// Falls back to document order unless every row carries a distinct position.
fn restore_order(rows: &[ElementRef<'_>], books: Vec<Book>) -> Vec<Book> {
    let positions: Option<Vec<usize>> = rows
        .iter()
        .map(|row| row.value().attr(ATTR_POSITION)?.trim().parse().ok())
        .collect();

    let Some(positions) = positions else {
        return books;
    };

    let mut sorted = positions.clone();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != positions.len() {
        return books;
    }

    let mut indexed: Vec<(usize, Book)> = positions.into_iter().zip(books).collect();
    indexed.sort_by_key(|(position, _)| *position);
    indexed.into_iter().map(|(_, book)| book).collect()
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

fn field(scope: Option<ElementRef<'_>>, selector: &Selector) -> String {
    scope
        .and_then(|s| first(s, selector))
        .map(element_text)
        .unwrap_or_default()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
