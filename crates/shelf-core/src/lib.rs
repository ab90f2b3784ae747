//! Shelf Core Library
//!
//! This crate provides the core functionality for Shelf, a small book
//! catalog kept in a flat text file.
//!
//! # Quick Start
//!
//! ```no_run
//! use shelf_core::{Book, BookStore, Catalog, TracingSink};
//!
//! let mut store = BookStore::open("books.txt", TracingSink);
//! store.add(Book::new("Dune", "Frank Herbert", 1965));
//! let books = store.list();
//! ```
//!
//! # Modules
//!
//! - `catalog`: The `Catalog` trait and its in-memory implementation
//! - `store`: File-backed catalog (main entry point)
//! - `models`: The `Book` record
//! - `events`: Store events and the sinks that log them
//! - `storage`: Line format, file I/O and storage errors
//! - `config`: Application configuration

pub mod catalog;
pub mod config;
pub mod events;
pub mod models;
pub mod storage;
pub mod store;

pub use catalog::{Catalog, MemoryCatalog};
pub use config::Config;
pub use events::{EventSink, RecordingSink, StoreEvent, TracingSink};
pub use models::Book;
pub use storage::{LineError, StorageError, StorageResult};
pub use store::{BookStore, LoadReport, SaveMode};
