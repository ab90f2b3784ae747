//! Catalog line format
//!
//! One book per line, `title,author,year`, no quoting or escaping:
//!
//! ```text
//! Dune,Frank Herbert,1965
//! 1984,George Orwell,1949
//! ```
//!
//! Fields are trimmed on parse. A field containing a comma (or a line
//! break) is written as-is and will not survive a reload.

use thiserror::Error;

use crate::models::Book;

/// Field separator
pub const SEPARATOR: char = ',';

/// Why a persisted line was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// The line did not split into exactly three fields
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),

    /// The third field is not an integer
    #[error("year '{0}' is not an integer")]
    InvalidYear(String),

    /// The raw bytes are not UTF-8
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Render a book as a line, without the trailing newline
pub fn format_line(book: &Book) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        book.title,
        book.author,
        book.year,
        sep = SEPARATOR
    )
}

/// Parse a single non-blank line
pub fn parse_line(line: &str) -> Result<Book, LineError> {
    let fields: Vec<&str> = line.trim().split(SEPARATOR).map(str::trim).collect();

    match fields.as_slice() {
        &[title, author, year] => {
            let year = year
                .parse::<i32>()
                .map_err(|_| LineError::InvalidYear(year.to_string()))?;
            Ok(Book::new(title, author, year))
        }
        other => Err(LineError::FieldCount(other.len())),
    }
}

/// Whether a book holds text the line format cannot represent
pub fn needs_escaping(book: &Book) -> bool {
    [&book.title, &book.author]
        .iter()
        .any(|field| field.contains(SEPARATOR) || field.contains('\n') || field.contains('\r'))
}

/// Render the whole catalog, one newline-terminated line per book
pub fn format_catalog(books: &[Book]) -> String {
    let mut out = String::new();
    for book in books {
        out.push_str(&format_line(book));
        out.push('\n');
    }
    out
}
