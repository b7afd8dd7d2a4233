//! Load catalogue entries from a JSON file
//!
//! The file is an array of books:
//!
//! ```json
//! [{"title": "Dune", "author": "Frank Herbert", "summary": "...", "cover_image": "https://..."}]
//! ```
//!
//! `genre_id`, `summary` and `cover_image` may be omitted.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bookshelf_server::db::{BookRepo, NewBook};
use clap::Parser;

use super::open_database;
use crate::config::BookshelfConfig;

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// JSON file holding an array of books
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: PathBuf,
}

fn read_books(path: &Path) -> Result<Vec<NewBook>> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read {}", path.display()))?;
    let books: Vec<NewBook> = serde_json::from_str(&content)
        .context(format!("Failed to parse {} as a JSON array of books", path.display()))?;

    if let Some(index) = books
        .iter()
        .position(|b| b.title.trim().is_empty() || b.author.trim().is_empty())
    {
        anyhow::bail!("Book at index {} has an empty title or author", index);
    }

    Ok(books)
}

/// Insert every book in the file, or none of them.
pub async fn run_seed(args: SeedArgs, config: &BookshelfConfig) -> Result<()> {
    let books = read_books(&args.file)?;
    let pool = open_database(&config.database).await?;

    let inserted = BookRepo::new(&pool)
        .insert_all(&books)
        .await
        .context(format!(
            "Failed to seed from {}; no books were inserted",
            args.file.display()
        ))?;
    for book in &inserted {
        tracing::debug!(book_id = book.id, title = %book.title, "book inserted");
    }
    pool.close().await;

    tracing::info!(count = books.len(), "catalogue seeded");
    println!("Inserted {} books", books.len());
    Ok(())
}
