//! Book command handlers
//!
//! Handlers take any [`Catalog`], so they work the same against the file
//! store and an in-memory catalog.

use anyhow::Result;

use shelf_core::{Book, Catalog};

use crate::output::{Output, OutputFormat};

/// Add a book
pub fn add(
    catalog: &mut impl Catalog,
    title: String,
    author: String,
    year: i32,
    output: &Output,
) -> Result<()> {
    let book = Book::new(title.trim(), author.trim(), year);
    catalog.add(book.clone());

    match output.format {
        OutputFormat::Json => output.print_book(&book),
        _ => output.success(&format!(
            "Added '{}' by {} ({})",
            book.title, book.author, book.year
        )),
    }
    Ok(())
}

/// Remove the first book with this title
///
/// A missing title is reported but is not an error.
pub fn remove(catalog: &mut impl Catalog, title: &str, output: &Output) -> Result<()> {
    match catalog.remove(title.trim()) {
        Some(book) => output.success(&format!("Removed '{}' by {}", book.title, book.author)),
        None => output.message(&format!("Book '{}' not found", title.trim())),
    }
    Ok(())
}

/// List all books
pub fn list(catalog: &impl Catalog, output: &Output) -> Result<()> {
    output.print_books(catalog.books());
    Ok(())
}
