//! Store events and the sinks that receive them
//!
//! The store never writes logs directly. Every notable thing it does is
//! described as a [`StoreEvent`] and handed to the [`EventSink`] supplied at
//! construction. The CLI passes a [`TracingSink`]; tests use a
//! [`RecordingSink`] to assert on what happened.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::{error, info, warn};

use crate::models::Book;
use crate::storage::{LineError, StorageError};

/// Something the store did or failed to do
#[derive(Debug)]
pub enum StoreEvent {
    /// The backing file did not exist and was created empty
    FileCreated { path: PathBuf },
    /// A book was appended to the catalog
    BookAdded { book: Book },
    /// A remove found no book with this title
    BookNotFound { title: String },
    /// A book was emitted by a listing
    BookListed { book: Book },
    /// A persisted line could not be parsed and was ignored
    LineSkipped {
        line_number: usize,
        line: String,
        reason: LineError,
    },
    /// The catalog was written to disk
    Saved { count: usize, path: PathBuf },
    /// A book was written with content the line format cannot round-trip
    LossyRecord { title: String },
    /// The backing file could not be created
    CreateFailed { error: StorageError },
    /// The backing file could not be read
    ReadFailed { error: StorageError },
    /// The backing file could not be written
    WriteFailed { error: StorageError },
}

impl StoreEvent {
    /// Whether the event reports a failed I/O operation
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StoreEvent::CreateFailed { .. }
                | StoreEvent::ReadFailed { .. }
                | StoreEvent::WriteFailed { .. }
        )
    }
}

impl fmt::Display for StoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreEvent::FileCreated { path } => write!(f, "File '{}' created", path.display()),
            StoreEvent::BookAdded { book } => write!(
                f,
                "Book '{}' by {} ({}) has been added",
                book.title, book.author, book.year
            ),
            StoreEvent::BookNotFound { title } => {
                write!(f, "Book '{}' not found in the library", title)
            }
            StoreEvent::BookListed { book } => write!(f, "{}", book),
            StoreEvent::LineSkipped {
                line_number,
                line,
                reason,
            } => write!(f, "Skip bad line {}: {:?} ({})", line_number, line, reason),
            StoreEvent::Saved { count, path } => {
                write!(f, "Saved {} book(s) to '{}'", count, path.display())
            }
            StoreEvent::LossyRecord { title } => write!(
                f,
                "Book '{}' contains a comma or line break and will not load back unchanged",
                title
            ),
            StoreEvent::ReadFailed { error } => write!(f, "{}", error),
            StoreEvent::CreateFailed { error } | StoreEvent::WriteFailed { error } => {
                write!(f, "{}", error)?;
                match error.recovery_suggestion() {
                    Some(hint) => write!(f, ". {}", hint),
                    None => Ok(()),
                }
            }
        }
    }
}

/// Receives store events
pub trait EventSink {
    fn record(&self, event: &StoreEvent);
}

impl<S: EventSink + ?Sized> EventSink for Rc<S> {
    fn record(&self, event: &StoreEvent) {
        (**self).record(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn record(&self, event: &StoreEvent) {
        (**self).record(event);
    }
}

/// Forwards events to `tracing`
///
/// Lifecycle events log at info, skipped and lossy records at warn, and
/// I/O failures at error.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &StoreEvent) {
        match event {
            StoreEvent::LineSkipped { .. } | StoreEvent::LossyRecord { .. } => {
                warn!("{}", event)
            }
            e if e.is_failure() => error!("{}", event),
            _ => info!("{}", event),
        }
    }
}

/// Keeps rendered events in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<String>>,
    failures: Cell<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered messages, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    /// Whether any recorded message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.events.borrow().iter().any(|m| m.contains(needle))
    }

    /// Number of I/O failures recorded
    pub fn failure_count(&self) -> usize {
        self.failures.get()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
        self.failures.set(0);
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &StoreEvent) {
        if event.is_failure() {
            self.failures.set(self.failures.get() + 1);
        }
        self.events.borrow_mut().push(event.to_string());
    }
}
