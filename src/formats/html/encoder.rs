//! Renders the publisher list as a styled, self-contained HTML page.

use super::{
    ATTR_GROUP, ATTR_IMPLICIT, ATTR_POSITION, ATTR_SEARCH, BOOK_ROW, PRE_ORDER_ICON,
    PUBLISHER_HEADER, PUBLISHER_ICON, PUBLISHER_NAME, PUBLISHER_SECTION, PageOptions,
    SEPARATOR_ROW, escape,
};
use crate::models::{Book, BookGroup, Publisher};
use crate::search::search_text;
use chrono::{Datelike, Local, NaiveDate};

const STYLE: &str = r#"    <style>
        body { background-color: #f8fafc; font-family: 'PingFang TC', 'Microsoft JhengHei', sans-serif; }
        .date-tag { font-size: 0.7rem; background: #64748b; color: white; padding: 1px 6px; border-radius: 4px; display: inline-block; margin-top: 4px; }
        .pre-tag { font-size: 0.72rem; color: white; padding: 3px 8px; border-radius: 6px; font-weight: 600; display: block; margin: 6px auto 0; max-width: fit-content; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        .read-badge { font-size: 0.7rem; padding: 2px 8px; border-radius: 6px; font-weight: bold; display: inline-block; }
        .badge-done { background: #dcfce7; color: #166534; border: 1px solid #bbf7d0; }
        .badge-none { background: #f1f5f9; color: #64748b; border: 1px solid #e2e8f0; }
        .book-row { transition: background 0.2s; }
        .separator-row { background-color: #f1f5f9; font-weight: 800; color: #475569; text-align: center; letter-spacing: 0.2em; }
        .new-badge { background: #ef4444; color: white; font-size: 0.65rem; padding: 1px 4px; border-radius: 3px; margin-left: 5px; vertical-align: middle; }
    </style>
"#;

// Case-insensitive substring filter over each row's search attribute.
const SCRIPT: &str = r#"    <script>
        function filterBooks() {
            const query = document.getElementById('searchInput').value.toLowerCase();
            document.querySelectorAll('.book-row').forEach(row => {
                const text = (row.getAttribute('data-search') || '').toLowerCase();
                row.style.display = text.includes(query) ? '' : 'none';
            });
        }
    </script>
"#;

const TABLE_HEAD: &str = r#"                    <thead class="bg-slate-50/50 text-slate-500 text-xs font-bold uppercase tracking-wider">
                        <tr>
                            <th class="px-6 py-4">書籍資訊</th>
                            <th class="px-6 py-4 text-center">台版進度</th>
                            <th class="px-6 py-4 text-center">日版進度</th>
                            <th class="px-6 py-4 text-center">中翻狀態</th>
                            <th class="px-6 py-4">看書進度</th>
                        </tr>
                    </thead>
"#;

/// Produces the complete HTML document for `publishers`.
pub fn encode(publishers: &[Publisher], options: &PageOptions) -> String {
    let updated = options
        .updated
        .unwrap_or_else(|| Local::now().date_naive());

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"zh-TW\">\n<head>\n");
    out.push_str("    <meta charset=\"UTF-8\">\n");
    out.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    out.push_str(&format!("    <title>{}</title>\n", escape(&options.title)));
    out.push_str("    <script src=\"https://cdn.tailwindcss.com\"></script>\n");
    out.push_str(STYLE);
    out.push_str("</head>\n<body class=\"p-4 md:p-8\">\n    <div class=\"max-w-7xl mx-auto\">\n");
    out.push_str(&render_page_header(&options.heading, updated));

    for publisher in publishers {
        out.push_str(&render_publisher(publisher));
    }

    out.push_str("    </div>\n\n");
    out.push_str(SCRIPT);
    out.push_str("</body>\n</html>\n");
    out
}

/// Formats a date as `YYYY年MM月DD日`.
fn format_date(date: NaiveDate) -> String {
    format!(
        "{}年{:02}月{:02}日",
        date.year(),
        date.month(),
        date.day()
    )
}

fn render_page_header(heading: &str, updated: NaiveDate) -> String {
    format!(
        r#"        <div class="flex flex-col md:flex-row justify-between items-center mb-6 bg-white p-6 rounded-2xl shadow-sm border border-slate-100">
            <div>
                <h1 class="text-3xl font-black text-slate-800 tracking-tight">{heading}</h1>
                <p class="text-slate-400 text-sm mt-1">最後更新：{updated}</p>
            </div>
            <div class="mt-4 md:mt-0 w-full md:w-96">
                <input type="text" id="searchInput" placeholder="搜尋書名、作者或進度..."
                    class="w-full px-4 py-2 bg-slate-50 border border-slate-200 rounded-xl focus:ring-2 focus:ring-blue-400 focus:outline-none transition-all" onkeyup="filterBooks()">
            </div>
        </div>
"#,
        heading = escape(heading),
        updated = format_date(updated),
    )
}

fn render_publisher(publisher: &Publisher) -> String {
    let rows: String = publisher
        .grouped_books()
        .iter()
        .map(render_group)
        .collect();

    format!(
        r#"
        <div class="mb-10 bg-white rounded-2xl shadow-sm border border-slate-100 overflow-hidden {section}">
            <div class="{header} px-6 py-4 flex justify-between items-center border-b border-slate-50" style="background-color: {color};">
                <span class="{name_class} font-bold text-slate-700">{icon} {name}</span>
                <span class="bg-white/60 text-slate-600 px-3 py-0.5 rounded-full text-xs font-bold">{count} BOOKS</span>
            </div>
            <div class="overflow-x-auto">
                <table class="w-full text-left border-collapse">
{head}                    <tbody class="divide-y divide-slate-50">
{rows}                    </tbody>
                </table>
            </div>
        </div>
"#,
        section = PUBLISHER_SECTION,
        header = PUBLISHER_HEADER,
        color = escape(&publisher.color),
        name_class = PUBLISHER_NAME,
        icon = PUBLISHER_ICON,
        name = escape(&publisher.name),
        count = publisher.books.len(),
        head = TABLE_HEAD,
        rows = rows,
    )
}

fn render_group(group: &BookGroup<'_>) -> String {
    let label = escape(group.label);
    let implicit = if group.declared {
        String::new()
    } else {
        format!(r#" {ATTR_IMPLICIT}="true""#)
    };

    let mut out = format!(
        r#"                        <tr class="{SEPARATOR_ROW}" {ATTR_GROUP}="{label}"{implicit}>
                            <td colspan="5" class="px-6 py-3 text-sm bg-slate-100/50 uppercase">{label}</td>
                        </tr>
"#
    );

    for (position, book) in &group.books {
        out.push_str(&render_book(*position, book));
    }
    out
}

fn render_book(position: usize, book: &Book) -> String {
    let author = if book.author_link.is_empty() {
        format!(
            r#"<span class="author">{}</span>"#,
            escape(&book.author)
        )
    } else {
        format!(
            r#"<a class="author hover:text-blue-500 underline" href="{}" target="_blank">{}</a>"#,
            escape(&book.author_link),
            escape(&book.author)
        )
    };

    let pre_order = if book.pre_order_date.is_empty() {
        String::new()
    } else {
        format!(
            "\n                                <div class=\"pre-tag bg-amber-500\">{PRE_ORDER_ICON} {}</div>",
            escape(&book.pre_order_date)
        )
    };

    format!(
        r#"                        <tr class="{BOOK_ROW} hover:bg-slate-50/80" {ATTR_SEARCH}="{search}" {ATTR_GROUP}="{group}" {ATTR_POSITION}="{position}">
                            <td class="px-6 py-4">
                                <div class="font-bold text-slate-700 text-sm">{title}</div>
                                <div class="text-xs text-slate-400 mt-0.5">{author}</div>
                            </td>
                            <td class="px-6 py-4 text-center">
                                <div class="font-mono text-sm font-bold text-slate-600">{tw_progress}</div>
                                <div class="date-tag tracking-tighter" title="最後發售日期">{tw_date}</div>{pre_order}
                            </td>
                            <td class="px-6 py-4 text-center">
                                <div class="font-mono text-sm font-bold text-blue-600">{jp_progress}</div>
                                <div class="date-tag tracking-tighter bg-blue-500/80" title="最後發售日期">{jp_date}</div>
                            </td>
                            <td class="px-6 py-4 text-center">
                                <span class="read-badge badge-none">{cn_status}</span>
                            </td>
                            <td class="px-6 py-4">
                                <span class="text-sm text-blue-600 font-medium">{read_progress}</span>
                            </td>
                        </tr>
"#,
        search = escape(&search_text(book)),
        group = escape(&book.year_group),
        title = escape(&book.title),
        tw_progress = escape(&book.tw_progress),
        tw_date = escape(&book.tw_date),
        jp_progress = escape(&book.jp_progress),
        jp_date = escape(&book.jp_date),
        cn_status = escape(&book.cn_status),
        read_progress = escape(&book.read_progress),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FALLBACK_GROUP;

    fn options() -> PageOptions {
        PageOptions::default().with_date(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap())
    }

    fn grouped_publisher() -> Publisher {
        let mut publisher = Publisher::new("台灣角川", "#e0e7ff");
        publisher.year_groups = vec!["2024".to_string(), "2025".to_string()];
        publisher.books = vec![
            Book::new("A").in_group("2025"),
            Book::new("B").in_group("2024"),
            Book::new("C"),
        ];
        publisher
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(format_date(date), "2024年01月09日");
    }

    #[test]
    fn test_page_shell() {
        let html = encode(&[], &options());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>輕小說進度追蹤</title>"));
        assert!(html.contains("最後更新：2025年03月07日"));
        assert!(html.contains("id=\"searchInput\""));
        assert!(html.contains("function filterBooks()"));
        assert!(html.contains("cdn.tailwindcss.com"));
        assert!(!html.contains(PUBLISHER_SECTION));
    }

    #[test]
    fn test_group_order() {
        let html = encode(&[grouped_publisher()], &options());

        let pos = |needle: &str| html.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
        let g2024 = pos(r#"data-year-group="2024">"#);
        let g2025 = pos(r#"data-year-group="2025">"#);
        let other = pos(&format!(r#"data-year-group="{FALLBACK_GROUP}" data-implicit="true">"#));
        let a = pos(r#">A</div>"#);
        let b = pos(r#">B</div>"#);
        let c = pos(r#">C</div>"#);

        assert!(g2024 < b && b < g2025);
        assert!(g2025 < a && a < other);
        assert!(other < c);
    }

    #[test]
    fn test_header_and_count() {
        let html = encode(&[grouped_publisher()], &options());
        assert!(html.contains(r#"style="background-color: #e0e7ff;""#));
        assert!(html.contains("🏢 台灣角川"));
        assert!(html.contains(">3 BOOKS</span>"));
    }

    #[test]
    fn test_book_row_attributes() {
        let mut book = Book::new("Title").in_group("2024");
        book.author = "Author".to_string();
        book.tw_progress = "3".to_string();
        book.read_progress = "2".to_string();

        let row = render_book(4, &book);
        assert!(row.contains(r#"data-search="Title Author 3 2""#));
        assert!(row.contains(r#"data-year-group="2024""#));
        assert!(row.contains(r#"data-position="4""#));
        assert!(row.contains(r#"<span class="author">Author</span>"#));
        assert!(!row.contains("pre-tag"));
    }

    #[test]
    fn test_author_link_and_pre_order() {
        let mut book = Book::new("Title");
        book.author = "Author".to_string();
        book.author_link = "https://example.com/a".to_string();
        book.pre_order_date = "2026-02-05".to_string();

        let row = render_book(0, &book);
        assert!(row.contains(r#"href="https://example.com/a""#));
        assert!(row.contains("📅 2026-02-05</div>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut publisher = Publisher::new("<script>", "#fff\" onclick=\"x");
        publisher.books.push(Book::new("a<b>"));
        let html = encode(&[publisher], &options());
        assert!(html.contains("🏢 &lt;script&gt;"));
        assert!(html.contains("a&lt;b&gt;"));
        assert!(!html.contains("onclick=\"x"));
    }
}
