//! Command-line definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use lnlist::Book;
use std::path::PathBuf;

/// Light novel release tracker: edit the catalog, import and export HTML.
#[derive(Parser, Debug)]
#[command(name = "lnlist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Working catalog file (.json or .html). Defaults to the configured one.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Configuration file to use instead of the default location.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation prompt.
    #[arg(long, short, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show publishers and their books, grouped by year.
    List {
        /// Only show this publisher.
        #[arg(long, short)]
        publisher: Option<String>,

        /// Only show books whose title or author contains this text.
        #[arg(long, short)]
        query: Option<String>,
    },

    /// Replace the catalog with the contents of an exported file.
    Import {
        /// File to import (.html or .json).
        file: PathBuf,
    },

    /// Write the catalog as a standalone page (or JSON snapshot).
    Export {
        /// Output path. Defaults to the configured export directory and name.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format. Defaults to the output file's extension.
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
    },

    /// Manage publishers.
    Publisher {
        #[command(subcommand)]
        command: PublisherCommands,
    },

    /// Manage a publisher's year groups.
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },

    /// Manage books.
    Book {
        #[command(subcommand)]
        command: BookCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum PublisherCommands {
    /// Add an empty publisher.
    Add {
        name: String,
        /// Header color (CSS). Defaults to the configured color.
        #[arg(long)]
        color: Option<String>,
    },
    /// Rename a publisher.
    Rename { name: String, new_name: String },
    /// Change a publisher's header color.
    Color { name: String, color: String },
    /// Delete a publisher and all of its books.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Declare a year group.
    Add { publisher: String, label: String },
    /// Rename a year group and move its books along.
    Rename {
        publisher: String,
        old: String,
        new: String,
    },
    /// Delete a year group; its books move to "其他".
    Delete { publisher: String, label: String },
}

#[derive(Subcommand, Debug)]
pub enum BookCommands {
    /// Add a book to a publisher.
    Add {
        publisher: String,
        #[command(flatten)]
        fields: BookFields,
    },
    /// Edit the book at a position (1-based, as shown by `list`).
    Edit {
        publisher: String,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        position: u32,
        #[command(flatten)]
        fields: BookFields,
    },
    /// Delete the book at a position (1-based, as shown by `list`).
    Delete {
        publisher: String,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        position: u32,
    },
}

/// Editable book fields. Omitted fields are left unchanged.
#[derive(Args, Debug, Default)]
pub struct BookFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub author_link: Option<String>,
    /// Taiwanese edition progress.
    #[arg(long)]
    pub tw_progress: Option<String>,
    /// Latest Taiwanese release date.
    #[arg(long)]
    pub tw_date: Option<String>,
    /// Announced pre-order date.
    #[arg(long)]
    pub pre_order: Option<String>,
    /// Japanese original progress.
    #[arg(long)]
    pub jp_progress: Option<String>,
    /// Latest Japanese release date.
    #[arg(long)]
    pub jp_date: Option<String>,
    /// Chinese translation status.
    #[arg(long)]
    pub cn_status: Option<String>,
    /// Personal reading progress.
    #[arg(long)]
    pub read_progress: Option<String>,
    /// Year group label.
    #[arg(long)]
    pub group: Option<String>,
}

impl BookFields {
    /// Whether a non-blank title was supplied.
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Overwrites the fields that were supplied.
    pub fn apply(self, book: &mut Book) {
        let updates = [
            (self.title, &mut book.title),
            (self.author, &mut book.author),
            (self.author_link, &mut book.author_link),
            (self.tw_progress, &mut book.tw_progress),
            (self.tw_date, &mut book.tw_date),
            (self.pre_order, &mut book.pre_order_date),
            (self.jp_progress, &mut book.jp_progress),
            (self.jp_date, &mut book.jp_date),
            (self.cn_status, &mut book.cn_status),
            (self.read_progress, &mut book.read_progress),
            (self.group, &mut book.year_group),
        ];

        for (value, field) in updates {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Html,
    Json,
}

impl ExportFormat {
    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_book_add() {
        let cli = Cli::try_parse_from([
            "lnlist", "book", "add", "台灣角川", "--title", "Overlord", "--group", "2024",
            "--pre-order", "2026-02-05",
        ])
        .unwrap();

        match cli.command {
            Commands::Book {
                command: BookCommands::Add { publisher, fields },
            } => {
                assert_eq!(publisher, "台灣角川");
                assert!(fields.has_title());
                let mut book = Book::default();
                fields.apply(&mut book);
                assert_eq!(book.title, "Overlord");
                assert_eq!(book.year_group, "2024");
                assert_eq!(book.pre_order_date, "2026-02-05");
                assert_eq!(book.author, "");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_position_is_one_based() {
        assert!(Cli::try_parse_from(["lnlist", "book", "delete", "東立", "0"]).is_err());
        assert!(Cli::try_parse_from(["lnlist", "book", "delete", "東立", "1", "-y"]).is_ok());
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut book = Book::new("Old");
        book.author = "someone".to_string();
        BookFields {
            read_progress: Some("3".to_string()),
            ..BookFields::default()
        }
        .apply(&mut book);

        assert_eq!(book.title, "Old");
        assert_eq!(book.author, "someone");
        assert_eq!(book.read_progress, "3");
    }

    #[test]
    fn test_blank_title_rejected() {
        let fields = BookFields {
            title: Some("   ".to_string()),
            ..BookFields::default()
        };
        assert!(!fields.has_title());
    }
}
