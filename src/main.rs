//! lnlist CLI - light novel release tracker.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{BookCommands, Cli, Commands, ExportFormat, GroupCommands, PublisherCommands};
use lnlist::config::Config;
use lnlist::console::Console;
use lnlist::formats::FormatRegistry;
use lnlist::search::filter_publishers;
use lnlist::{Book, CatalogStore, Publisher};
use std::path::{Path, PathBuf};

/// Everything a command needs besides the store.
struct Session<'a> {
    config: &'a Config,
    registry: &'a FormatRegistry,
    console: &'a Console,
    /// Answers a yes/no question.
    ask: &'a dyn Fn(&str) -> bool,
    assume_yes: bool,
}

impl Session<'_> {
    /// Asks before a destructive change unless `--yes` was given.
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes || (self.ask)(prompt) {
            return true;
        }
        self.console.info("Cancelled; nothing changed.");
        false
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let console = Console::new();

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let registry = FormatRegistry::new(&config.export);
    let catalog_path = match &args.catalog {
        Some(path) => path.clone(),
        None => config.catalog_path()?,
    };

    let mut store = CatalogStore::load(&catalog_path, &registry)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;

    let ask = |prompt: &str| console.confirm(prompt);
    let ctx = Session {
        config: &config,
        registry: &registry,
        console: &console,
        ask: &ask,
        assume_yes: args.yes,
    };

    let changed = match execute(args.command, &mut store, &ctx) {
        Ok(changed) => changed,
        Err(e) => {
            console.error(&format!("{e:#}"));
            std::process::exit(1);
        }
    };

    if changed {
        store
            .save(&catalog_path, &registry)
            .with_context(|| format!("Failed to save catalog {}", catalog_path.display()))?;
        console.success(&format!("Saved {}", catalog_path.display()));
    }

    Ok(())
}

/// Runs one command. Returns true when the catalog changed.
fn execute(command: Commands, store: &mut CatalogStore, ctx: &Session<'_>) -> Result<bool> {
    match command {
        Commands::List { publisher, query } => {
            list(store, ctx.console, publisher.as_deref(), query.as_deref());
            Ok(false)
        }
        Commands::Import { file } => import(&file, store, ctx),
        Commands::Export { output, format } => {
            export(store, ctx, output, format)?;
            Ok(false)
        }
        Commands::Publisher { command } => publisher_command(command, store, ctx),
        Commands::Group { command } => group_command(command, store, ctx),
        Commands::Book { command } => book_command(command, store, ctx),
    }
}

fn list(store: &CatalogStore, console: &Console, publisher: Option<&str>, query: Option<&str>) {
    if store.is_empty() {
        console.info("Catalog is empty. Import an HTML file or add a publisher.");
        return;
    }

    let query = query.unwrap_or("");
    let filtered = filter_publishers(store.publishers(), publisher, query);
    if filtered.is_empty() {
        console.warning("No publisher matches the filter.");
        return;
    }

    for (publisher, hits) in filtered {
        console.section(&console.publisher_heading(publisher));
        for group in publisher.grouped_books() {
            let books: Vec<_> = group
                .books
                .iter()
                .filter(|(i, _)| hits.contains(i))
                .collect();
            if books.is_empty() && !query.is_empty() {
                continue;
            }

            println!("{}", console.group_heading(group.label, group.declared));
            for (position, book) in books {
                println!("{}", console.book_line(*position, book));
            }
        }
    }
}

fn import(file: &Path, store: &mut CatalogStore, ctx: &Session<'_>) -> Result<bool> {
    if !file.exists() {
        ctx.console
            .warning(&format!("{} not found; nothing imported.", file.display()));
        return Ok(false);
    }

    ctx.console.step(&format!("Importing {}...", file.display()));
    let publishers = ctx
        .registry
        .read(file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    if publishers.is_empty() {
        ctx.console
            .warning("No publisher sections found; the catalog is now empty.");
    } else {
        let books: usize = publishers.iter().map(|p| p.books.len()).sum();
        ctx.console.success(&format!(
            "Imported {} publishers, {} books",
            ctx.console.count(publishers.len()),
            ctx.console.count(books)
        ));
    }

    for name in duplicate_names(&publishers) {
        ctx.console.warning(&format!(
            "Publisher 「{}」 appears more than once; commands reach only the first.",
            name
        ));
    }

    store.replace_all(publishers);
    Ok(true)
}

/// Names carried by more than one publisher, in order of first appearance.
fn duplicate_names(publishers: &[Publisher]) -> Vec<&str> {
    let mut duplicates: Vec<&str> = Vec::new();
    for (i, publisher) in publishers.iter().enumerate() {
        let name = publisher.name.as_str();
        if !duplicates.contains(&name) && publishers[..i].iter().any(|p| p.name == name) {
            duplicates.push(name);
        }
    }
    duplicates
}

fn export(
    store: &CatalogStore,
    ctx: &Session<'_>,
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
) -> Result<()> {
    let output = match (output, format) {
        (Some(path), _) => path,
        (None, Some(format)) => ctx.config.export_path().with_extension(format.name()),
        (None, None) => ctx.config.export_path(),
    };

    let encoder = match format {
        Some(format) => ctx.registry.find_by_name(format.name()),
        None => ctx.registry.find_for_path(&output),
    }
    .ok_or_else(|| {
        anyhow::anyhow!(
            "No format handles {} (supported: {})",
            output.display(),
            ctx.registry.extensions()
        )
    })?;

    ctx.console
        .step(&format!("Exporting {} as {}...", output.display(), encoder.name()));
    ctx.registry
        .write_with(encoder, &output, store.publishers())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    ctx.console.success(&format!("Exported {}", output.display()));
    Ok(())
}

fn publisher_command(
    command: PublisherCommands,
    store: &mut CatalogStore,
    ctx: &Session<'_>,
) -> Result<bool> {
    match command {
        PublisherCommands::Add { name, color } => {
            let color = color.unwrap_or_else(|| ctx.config.defaults.publisher_color.clone());
            store.add_publisher(&name, &color)?;
            ctx.console.success(&format!("Added publisher {}", name.trim()));
        }
        PublisherCommands::Rename { name, new_name } => {
            let index = store.publisher_index(&name)?;
            store.rename_publisher(index, &new_name)?;
            ctx.console
                .success(&format!("Renamed {} to {}", name, new_name.trim()));
        }
        PublisherCommands::Color { name, color } => {
            let index = store.publisher_index(&name)?;
            store.set_publisher_color(index, &color)?;
            ctx.console.success(&format!("Updated color of {}", name));
        }
        PublisherCommands::Delete { name } => {
            let index = store.publisher_index(&name)?;
            let books = store.publisher(index)?.books.len();
            if !ctx.confirm(&format!("Delete 「{}」 and its {} books?", name, books)) {
                return Ok(false);
            }
            store.remove_publisher(index)?;
            ctx.console.success(&format!("Deleted publisher {}", name));
        }
    }
    Ok(true)
}

fn group_command(
    command: GroupCommands,
    store: &mut CatalogStore,
    ctx: &Session<'_>,
) -> Result<bool> {
    match command {
        GroupCommands::Add { publisher, label } => {
            let index = store.publisher_index(&publisher)?;
            store.add_year_group(index, &label)?;
            ctx.console
                .success(&format!("Added group {} to {}", label.trim(), publisher));
        }
        GroupCommands::Rename {
            publisher,
            old,
            new,
        } => {
            let index = store.publisher_index(&publisher)?;
            store.rename_year_group(index, &old, &new)?;
            ctx.console
                .success(&format!("Renamed group {} to {}", old, new.trim()));
        }
        GroupCommands::Delete { publisher, label } => {
            let index = store.publisher_index(&publisher)?;
            let prompt = format!(
                "Delete group 「{}」? Its books move to 「{}」.",
                label,
                lnlist::models::FALLBACK_GROUP
            );
            if !ctx.confirm(&prompt) {
                return Ok(false);
            }
            store.delete_year_group(index, &label)?;
            ctx.console.success(&format!("Deleted group {}", label));
        }
    }
    Ok(true)
}

fn book_command(
    command: BookCommands,
    store: &mut CatalogStore,
    ctx: &Session<'_>,
) -> Result<bool> {
    match command {
        BookCommands::Add { publisher, fields } => {
            if !fields.has_title() {
                anyhow::bail!("A title is required (--title)");
            }
            let index = store.publisher_index(&publisher)?;

            let mut book = Book::default();
            fields.apply(&mut book);
            let position = store.add_book(index, book)?;

            let added = store.book(index, position)?;
            ctx.console.success(&format!("Added {}", added.title));
            println!("{}", ctx.console.book_line(position, added));
        }
        BookCommands::Edit {
            publisher,
            position,
            fields,
        } => {
            let index = store.publisher_index(&publisher)?;
            let position = (position - 1) as usize;

            let mut book = store.book(index, position)?.clone();
            fields.apply(&mut book);
            store.edit_book(index, position, book)?;

            let edited = store.book(index, position)?;
            ctx.console.success(&format!("Updated {}", edited.title));
            println!("{}", ctx.console.book_line(position, edited));
        }
        BookCommands::Delete {
            publisher,
            position,
        } => {
            let index = store.publisher_index(&publisher)?;
            let position = (position - 1) as usize;
            let title = store.book(index, position)?.title.clone();

            if !ctx.confirm(&format!("Delete 「{}」?", title)) {
                return Ok(false);
            }
            store.delete_book(index, position)?;
            ctx.console.success(&format!("Deleted {}", title));
        }
    }
    Ok(true)
}
