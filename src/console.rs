//! Console output formatting with ANSI color support.
//!
//! Provides styled terminal output with automatic TTY detection
//! and respect for the NO_COLOR environment variable.

use crate::models::{Book, Publisher};
use std::io::{self, BufRead, IsTerminal, Write};

/// ANSI style codes for terminal formatting.
#[derive(Debug, Clone, Copy)]
pub enum Style {
    Bold,
    Dim,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
}

impl Style {
    /// Returns the ANSI escape code for this style.
    fn code(self) -> &'static str {
        match self {
            Style::Bold => "1",
            Style::Dim => "2",
            Style::Red => "31",
            Style::Green => "32",
            Style::Yellow => "33",
            Style::Blue => "34",
            Style::Magenta => "35",
            Style::Cyan => "36",
            Style::Gray => "90",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Console output handler with color support detection.
#[derive(Debug)]
pub struct Console {
    colors_enabled: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    /// Creates a new Console instance, detecting color support.
    ///
    /// Colors are disabled if:
    /// - The `NO_COLOR` environment variable is set
    /// - stdout is not a terminal (TTY)
    pub fn new() -> Self {
        let colors_enabled = std::env::var("NO_COLOR").is_err() && io::stdout().is_terminal();

        Self { colors_enabled }
    }

    /// Creates a Console with colors explicitly enabled or disabled.
    pub fn with_colors(enabled: bool) -> Self {
        Self {
            colors_enabled: enabled,
        }
    }

    /// Applies ANSI styles to text if colors are enabled.
    pub fn style(&self, text: &str, styles: &[Style]) -> String {
        if !self.colors_enabled || styles.is_empty() {
            return text.to_string();
        }

        let codes: Vec<&str> = styles.iter().map(|s| s.code()).collect();
        format!("\x1b[{}m{}{}", codes.join(";"), text, RESET)
    }

    /// Creates a colored label like `[INFO]`.
    pub fn label(&self, label: &str, color: Style) -> String {
        let styled = self.style(label, &[color, Style::Bold]);
        format!("[{}]", styled)
    }

    /// Prints an info message with blue `[INFO]` label.
    pub fn info(&self, message: &str) {
        println!("{} {}", self.label("INFO", Style::Blue), message);
    }

    /// Prints a success message with green `[OK]` label.
    pub fn success(&self, message: &str) {
        println!("{} {}", self.label("OK", Style::Green), message);
    }

    /// Prints a warning message with yellow `[WARN]` label.
    pub fn warning(&self, message: &str) {
        println!("{} {}", self.label("WARN", Style::Yellow), message);
    }

    /// Prints an error message with red `[ERROR]` label.
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", self.label("ERROR", Style::Red), message);
    }

    /// Prints a step message with cyan `[STEP]` label.
    pub fn step(&self, message: &str) {
        println!("{} {}", self.label("STEP", Style::Cyan), message);
    }

    /// Prints a section header in magenta bold.
    pub fn section(&self, message: &str) {
        println!();
        println!("{}", self.style(message, &[Style::Magenta, Style::Bold]));
    }

    /// Returns text styled as muted (dim gray).
    pub fn muted(&self, text: &str) -> String {
        self.style(text, &[Style::Gray, Style::Dim])
    }

    /// Formats a count with styling.
    pub fn count(&self, n: usize) -> String {
        self.style(&n.to_string(), &[Style::Green, Style::Bold])
    }

    /// Formats a publisher heading such as `🏢 台灣角川 (3 books, #e0e7ff)`.
    pub fn publisher_heading(&self, publisher: &Publisher) -> String {
        format!(
            "{} {}",
            self.style(&format!("🏢 {}", publisher.name), &[Style::Magenta, Style::Bold]),
            self.muted(&format!(
                "({} books, {})",
                publisher.books.len(),
                publisher.color
            ))
        )
    }

    /// Formats a year-group separator line.
    pub fn group_heading(&self, label: &str, declared: bool) -> String {
        let marker = if declared { "" } else { " *" };
        format!("  {}", self.style(&format!("── {label}{marker} ──"), &[Style::Cyan]))
    }

    /// Formats one book line; `position` is shown 1-based.
    pub fn book_line(&self, position: usize, book: &Book) -> String {
        let mut parts = vec![format!(
            "{} {}",
            self.style(&format!("{:>3}.", position + 1), &[Style::Gray]),
            self.style(&book.title, &[Style::Bold])
        )];

        if !book.author.is_empty() {
            parts.push(book.author.clone());
        }
        if !book.tw_progress.is_empty() || !book.tw_date.is_empty() {
            parts.push(format!("TW {} {}", book.tw_progress, book.tw_date).trim_end().to_string());
        }
        if !book.pre_order_date.is_empty() {
            parts.push(self.style(&format!("📅 {}", book.pre_order_date), &[Style::Yellow]));
        }
        if !book.jp_progress.is_empty() || !book.jp_date.is_empty() {
            parts.push(format!("JP {} {}", book.jp_progress, book.jp_date).trim_end().to_string());
        }
        if !book.cn_status.is_empty() {
            parts.push(book.cn_status.clone());
        }
        if !book.read_progress.is_empty() {
            parts.push(self.style(&format!("read {}", book.read_progress), &[Style::Blue]));
        }

        format!("    {}", parts.join(" · "))
    }

    /// Asks a yes/no question on stdin. Anything but `y`/`yes` declines.
    pub fn confirm(&self, prompt: &str) -> bool {
        print!("{} {} [y/N] ", self.label("??", Style::Yellow), prompt);
        let _ = io::stdout().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
