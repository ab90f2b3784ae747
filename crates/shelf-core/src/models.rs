//! Data models for Shelf
//!
//! A catalog holds one kind of record: a [`Book`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// A catalogued book
///
/// The title doubles as the lookup key. Nothing enforces uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Book {
    /// Book title
    pub title: String,
    /// Author name(s), free text
    pub author: String,
    /// Publication year (negative for BCE)
    pub year: i32,
}

impl Book {
    /// Create a new book record
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {}, Author: {}, Year: {}",
            self.title, self.author, self.year
        )
    }
}
