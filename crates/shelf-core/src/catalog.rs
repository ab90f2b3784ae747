//! Catalog capability
//!
//! [`Catalog`] is what callers program against: append, remove by title,
//! list. [`MemoryCatalog`] is the plain in-memory implementation;
//! [`BookStore`](crate::store::BookStore) wraps one and persists after each
//! mutation.

use crate::events::{EventSink, StoreEvent, TracingSink};
use crate::models::Book;

/// An ordered collection of books
///
/// Books keep insertion order. Titles are matched exactly and are not
/// required to be unique; lookups and removals act on the first match.
pub trait Catalog {
    /// Append a book at the end
    fn add(&mut self, book: Book);

    /// Remove the first book whose title equals `title`
    ///
    /// Returns the removed book, or `None` when no title matched.
    fn remove(&mut self, title: &str) -> Option<Book>;

    /// All books in insertion order, without side effects
    fn books(&self) -> &[Book];

    /// All books in insertion order, reporting each one as listed
    fn list(&self) -> &[Book];

    /// Number of books
    fn len(&self) -> usize {
        self.books().len()
    }

    /// Whether the catalog holds no books
    fn is_empty(&self) -> bool {
        self.books().is_empty()
    }

    /// First book with this exact title
    fn find(&self, title: &str) -> Option<&Book> {
        self.books().iter().find(|b| b.title == title)
    }
}

/// In-memory catalog
#[derive(Debug)]
pub struct MemoryCatalog<S: EventSink = TracingSink> {
    books: Vec<Book>,
    sink: S,
}

impl Default for MemoryCatalog<TracingSink> {
    fn default() -> Self {
        Self::new(TracingSink)
    }
}

impl<S: EventSink> MemoryCatalog<S> {
    /// Create an empty catalog reporting to `sink`
    pub fn new(sink: S) -> Self {
        Self {
            books: Vec::new(),
            sink,
        }
    }

    /// Create a catalog holding `books`
    pub fn with_books(books: Vec<Book>, sink: S) -> Self {
        Self { books, sink }
    }

    /// The sink this catalog reports to
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Replace the contents wholesale
    pub fn replace(&mut self, books: Vec<Book>) {
        self.books = books;
    }
}

impl<S: EventSink> Catalog for MemoryCatalog<S> {
    fn add(&mut self, book: Book) {
        self.sink
            .record(&StoreEvent::BookAdded { book: book.clone() });
        self.books.push(book);
    }

    fn remove(&mut self, title: &str) -> Option<Book> {
        match self.books.iter().position(|b| b.title == title) {
            Some(pos) => Some(self.books.remove(pos)),
            None => {
                self.sink.record(&StoreEvent::BookNotFound {
                    title: title.to_string(),
                });
                None
            }
        }
    }

    fn books(&self) -> &[Book] {
        &self.books
    }

    fn list(&self) -> &[Book] {
        for book in &self.books {
            self.sink
                .record(&StoreEvent::BookListed { book: book.clone() });
        }
        &self.books
    }
}
