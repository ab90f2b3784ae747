//! File-backed catalog
//!
//! `BookStore` keeps the authoritative list in a [`MemoryCatalog`] and
//! mirrors it to a text file after every successful mutation.
//!
//! ## Usage
//!
//! ```no_run
//! use shelf_core::{Book, BookStore, Catalog, TracingSink};
//!
//! let mut store = BookStore::open("books.txt", TracingSink);
//! store.add(Book::new("Dune", "Frank Herbert", 1965));
//! store.remove("Dune");
//! for book in store.list() {
//!     println!("{}", book);
//! }
//! ```
//!
//! ## Failure handling
//!
//! Nothing here returns an error to the caller. I/O failures are reported
//! to the sink and the store carries on with what it has in memory, so a
//! failed save leaves memory and disk out of step until the next
//! successful one. Use [`BookStore::try_load`] and [`BookStore::try_save`]
//! to see errors directly.

use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, MemoryCatalog};
use crate::config::Config;
use crate::events::{EventSink, StoreEvent};
use crate::models::Book;
use crate::storage::{file, format, LineError, StorageError, StorageResult};

/// How the catalog file is rewritten
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveMode {
    /// Truncate and write in place
    #[default]
    Overwrite,
    /// Write a temp file and rename it over the catalog
    Atomic,
}

/// Summary of a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records parsed and kept
    pub loaded: usize,
    /// Non-blank lines rejected as malformed
    pub skipped: usize,
    /// False if reading stopped on an I/O error
    pub complete: bool,
}

/// Books parsed before a read error, if the file could be opened at all
struct PartialRead {
    books: Option<(Vec<Book>, usize)>,
    error: StorageError,
}

/// Catalog persisted to a flat text file
pub struct BookStore<S: EventSink> {
    catalog: MemoryCatalog<S>,
    path: PathBuf,
    save_mode: SaveMode,
}

impl<S: EventSink> BookStore<S> {
    /// Open the catalog at `path`, creating it if needed
    ///
    /// Missing parent directories and the file itself are created, then any
    /// existing records are loaded. Failures are reported to `sink`; the
    /// store is returned regardless, possibly empty.
    pub fn open(path: impl Into<PathBuf>, sink: S) -> Self {
        let path = path.into();
        let mut store = Self {
            catalog: MemoryCatalog::new(sink),
            path,
            save_mode: SaveMode::default(),
        };

        match file::ensure_file(&store.path) {
            Ok(true) => store.emit(StoreEvent::FileCreated {
                path: store.path.clone(),
            }),
            Ok(false) => {}
            Err(error) => store.emit(StoreEvent::CreateFailed { error }),
        }

        store.load();
        store
    }

    /// Open the catalog described by `config`
    pub fn from_config(config: &Config, sink: S) -> Self {
        let mode = if config.atomic_save {
            SaveMode::Atomic
        } else {
            SaveMode::Overwrite
        };
        Self::open(config.catalog_path(), sink).with_save_mode(mode)
    }

    /// Choose how subsequent saves write the file
    pub fn with_save_mode(mut self, mode: SaveMode) -> Self {
        self.save_mode = mode;
        self
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save_mode(&self) -> SaveMode {
        self.save_mode
    }

    /// The sink this store reports to
    pub fn sink(&self) -> &S {
        self.catalog.sink()
    }

    /// Reload the catalog from disk
    ///
    /// Blank lines are ignored. Malformed lines, including ones that are not
    /// UTF-8, are skipped with a warning. If the file cannot be opened the
    /// in-memory list is kept as is; if an I/O error breaks the read off
    /// partway, whatever was parsed up to that point replaces it.
    pub fn load(&mut self) -> LoadReport {
        match self.read_books() {
            Ok((books, skipped)) => self.commit(books, skipped, true),
            Err(PartialRead { books, error }) => {
                self.emit(StoreEvent::ReadFailed { error });
                match books {
                    Some((books, skipped)) => self.commit(books, skipped, false),
                    None => LoadReport {
                        loaded: 0,
                        skipped: 0,
                        complete: false,
                    },
                }
            }
        }
    }

    /// Reload the catalog, failing on any I/O error
    ///
    /// The in-memory list is only replaced if the whole file was read.
    pub fn try_load(&mut self) -> StorageResult<LoadReport> {
        match self.read_books() {
            Ok((books, skipped)) => Ok(self.commit(books, skipped, true)),
            Err(partial) => Err(partial.error),
        }
    }

    /// Write the whole catalog to disk, reporting the outcome to the sink
    pub fn save(&self) {
        if let Err(error) = self.try_save() {
            self.emit(StoreEvent::WriteFailed { error });
        }
    }

    /// Write the whole catalog to disk
    pub fn try_save(&self) -> StorageResult<()> {
        let books = self.catalog.books();

        for book in books.iter().filter(|b| format::needs_escaping(b)) {
            self.emit(StoreEvent::LossyRecord {
                title: book.title.clone(),
            });
        }

        let data = format::format_catalog(books);
        match self.save_mode {
            SaveMode::Overwrite => file::overwrite(&self.path, data.as_bytes())?,
            SaveMode::Atomic => file::atomic_write(&self.path, data.as_bytes())?,
        }

        self.emit(StoreEvent::Saved {
            count: books.len(),
            path: self.path.clone(),
        });
        Ok(())
    }

    fn read_books(&self) -> Result<(Vec<Book>, usize), PartialRead> {
        let lines = file::open_lines(&self.path)
            .map_err(|error| PartialRead { books: None, error })?;

        let mut books = Vec::new();
        let mut skipped = 0;

        for (index, line) in lines.enumerate() {
            let bytes = match line {
                Ok(bytes) => bytes,
                Err(error) => {
                    return Err(PartialRead {
                        books: Some((books, skipped)),
                        error,
                    })
                }
            };

            let line = match String::from_utf8(bytes) {
                Ok(line) => line,
                Err(e) => {
                    skipped += 1;
                    self.emit(StoreEvent::LineSkipped {
                        line_number: index + 1,
                        line: String::from_utf8_lossy(e.as_bytes()).trim().to_string(),
                        reason: LineError::InvalidUtf8,
                    });
                    continue;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match format::parse_line(trimmed) {
                Ok(book) => books.push(book),
                Err(reason) => {
                    skipped += 1;
                    self.emit(StoreEvent::LineSkipped {
                        line_number: index + 1,
                        line: trimmed.to_string(),
                        reason,
                    });
                }
            }
        }

        Ok((books, skipped))
    }

    fn commit(&mut self, books: Vec<Book>, skipped: usize, complete: bool) -> LoadReport {
        let loaded = books.len();
        self.catalog.replace(books);
        LoadReport {
            loaded,
            skipped,
            complete,
        }
    }

    fn emit(&self, event: StoreEvent) {
        self.catalog.sink().record(&event);
    }
}

impl<S: EventSink> Catalog for BookStore<S> {
    fn add(&mut self, book: Book) {
        self.catalog.add(book);
        self.save();
    }

    fn remove(&mut self, title: &str) -> Option<Book> {
        let removed = self.catalog.remove(title)?;
        self.save();
        Some(removed)
    }

    fn books(&self) -> &[Book] {
        self.catalog.books()
    }

    fn list(&self) -> &[Book] {
        self.catalog.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use std::fs;
    use tempfile::TempDir;

    fn books_path(temp_dir: &TempDir) -> PathBuf {
        temp_dir.path().join("books.txt")
    }

    #[test]
    fn test_open_creates_file_and_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("books.txt");
        let sink = RecordingSink::new();

        let store = BookStore::open(&path, &sink);

        assert!(path.exists());
        assert!(store.is_empty());
        assert!(sink.contains("created"));
        assert_eq!(sink.failure_count(), 0);
    }

    #[test]
    fn test_open_loads_existing_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = books_path(&temp_dir);
        fs::write(&path, "Dune,Frank Herbert,1965\n1984,George Orwell,1949\n").unwrap();
        let sink = RecordingSink::new();

        let store = BookStore::open(&path, &sink);

        assert_eq!(
            store.books(),
            &[
                Book::new("Dune", "Frank Herbert", 1965),
                Book::new("1984", "George Orwell", 1949),
            ]
        );
        assert!(!sink.contains("created"));
    }

    #[test]
    fn test_add_then_remove_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let path = books_path(&temp_dir);
        let sink = RecordingSink::new();
        let mut store = BookStore::open(&path, &sink);

        store.add(Book::new("Dune", "Frank Herbert", 1965));
        store.add(Book::new("1984", "George Orwell", 1949));
        store.remove("Dune");

        assert_eq!(store.list(), &[Book::new("1984", "George Orwell", 1949)]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "1984,George Orwell,1949\n");
    }

    #[test]
    fn test_add_appends_one_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = books_path(&temp_dir);
        fs::write(&path, "Emma,Jane Austen,1815\n").unwrap();
        let sink = RecordingSink::new();
        let mut store = BookStore::open(&path, &sink);

        let before = fs::read_to_string(&path).unwrap().lines().count();
        store.add(Book::new("Dune", "Frank Herbert", 1965));
        let after = fs::read_to_string(&path).unwrap().lines().count();

        assert_eq!(after, before + 1);
        assert_eq!(
            store.books().last(),
            Some(&Book::new("Dune", "Frank Herbert", 1965))
        );
        assert!(sink.contains("Saved 2 book(s)"));
    }

    #[test]
    fn test_remove_missing_title_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = books_path(&temp_dir);
        // Odd spacing and a blank line, to prove no rewrite happens
        let original = "Dune , Frank Herbert,1965\n\nEmma,Jane Austen,1815\n";
        fs::write(&path, original).unwrap();
        let sink = RecordingSink::new();
        let mut store = BookStore::open(&path, &sink);
        let before = store.books().to_vec();
        sink.clear();

        assert!(store.remove("Ulysses").is_none());

        assert_eq!(store.books(), before.as_slice());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert!(sink.contains("Book 'Ulysses' not found in the library"));
        assert!(!sink.contains("Saved"));
    }

    #[test]
    fn test_remove_first_duplicate_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = books_path(&temp_dir);
        let sink = RecordingSink::new();
        let mut store = BookStore::open(&path, &sink);

        store.add(Book::new("Dune", "Frank Herbert", 1965));
        store.add(Book::new("Emma", "Jane Austen", 1815));
        store.add(Book::new("Dune", "Brian Herbert", 1999));

        let removed = store.remove("Dune").unwrap();
        assert_eq!(removed.author, "Frank Herbert");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Emma,Jane Austen,1815\nDune,Brian Herbert,1999\n"
        );
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = books_path(&temp_dir);
        fs::write(
            &path,
            "Dune,Frank Herbert,1965\nEmma,Jane Austen\n\n   \nUlysses,James Joyce,soon\n",
        )
        .unwrap();
        let sink = RecordingSink::new();

        let mut store = BookStore::open(&path, &sink);
        assert_eq!(store.books(), &[Book::new("Dune", "Frank Herbert", 1965)]);
        assert!(sink.contains("Skip bad line 2"));
        assert!(sink.contains("Skip bad line 5"));

        let report = store.load();
        assert_eq!(
            report,
            LoadReport {
                loaded: 1,
                skipped: 2,
                complete: true
            }
        );
    }

    #[test]
    fn test_load_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = books_path(&temp_dir);
        let sink = RecordingSink::new();
        let mut store = BookStore::open(&path, &sink);
        store.add(Book::new("Dune", "Frank Herbert", 1965));

        fs::write(&path, "Emma,Jane Austen,1815\n").unwrap();
        store.load();

        assert_eq!(store.books(), &[Book::new("Emma", "Jane Austen", 1815)]);
    }

    #[test]
    fn test_unreadable_file_keeps_memory() {
        let temp_dir = TempDir::new().unwrap();
        let path = books_path(&temp_dir);
        let sink = RecordingSink::new();
        let mut store = BookStore::open(&path, &sink);
        store.add(Book::new("Dune", "Frank Herbert", 1965));

        fs::remove_file(&path).unwrap();
        let report = store.load();

        assert!(!report.complete);
        assert_eq!(store.len(), 1);
        assert_eq!(sink.failure_count(), 1);
        assert!(store.try_load().is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = books_path(&temp_dir);
        let mut bytes = b"Dune,Frank Herbert,1965\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"Emma,Jane Austen,1815\n");
        fs::write(&path, bytes).unwrap();
        let sink = RecordingSink::new();

        let mut store = BookStore::open(&path, &sink);

        assert_eq!(
            store.books(),
            &[
                Book::new("Dune", "Frank Herbert", 1965),
                Book::new("Emma", "Jane Austen", 1815),
            ]
        );
        assert_eq!(sink.failure_count(), 0);
        assert!(sink.contains("Skip bad line 2"));
        assert!(sink.contains("not valid UTF-8"));

        // The next save drops the bad line but keeps every record after it
        store.add(Book::new("1984", "George Orwell", 1949));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Dune,Frank Herbert,1965\nEmma,Jane Austen,1815\n1984,George Orwell,1949\n"
        );
        assert_eq!(
            store.load(),
            LoadReport {
                loaded: 3,
                skipped: 0,
                complete: true
            }
        );
    }

    #[test]
    fn test_failed_save_keeps_memory() {
        let temp_dir = TempDir::new().unwrap();
        let path = books_path(&temp_dir);
        let sink = RecordingSink::new();
        let mut store = BookStore::open(&path, &sink);

        // Replace the file with a directory so the overwrite fails
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        store.add(Book::new("Dune", "Frank Herbert", 1965));

        assert_eq!(store.len(), 1);
        assert_eq!(sink.failure_count(), 1);
        assert!(store.try_save().is_err());
    }

    #[test]
    fn test_unwritable_location_still_opens() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let sink = RecordingSink::new();

        let store = BookStore::open(blocker.join("books.txt"), &sink);

        assert!(store.is_empty());
        assert!(sink.failure_count() >= 1);
    }

    #[test]
    fn test_comma_in_field_warns_on_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = books_path(&temp_dir);
        let sink = RecordingSink::new();
        let mut store = BookStore::open(&path, &sink);

        store.add(Book::new("Dune", "Herbert, Frank", 1965));

        assert!(sink.contains("will not load back unchanged"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Dune,Herbert, Frank,1965\n");

        // The written line has four fields and is dropped on reload
        let reloaded = BookStore::open(&path, RecordingSink::new());
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_atomic_save_mode() {
        let temp_dir = TempDir::new().unwrap();
        let path = books_path(&temp_dir);
        let sink = RecordingSink::new();
        let mut store = BookStore::open(&path, &sink).with_save_mode(SaveMode::Atomic);

        store.add(Book::new("Dune", "Frank Herbert", 1965));

        assert_eq!(store.save_mode(), SaveMode::Atomic);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Dune,Frank Herbert,1965\n");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            catalog_file: None,
            atomic_save: true,
            log_level: None,
            log_file: None,
        };

        let store = BookStore::from_config(&config, RecordingSink::new());

        assert_eq!(store.path(), temp_dir.path().join("books.txt"));
        assert_eq!(store.save_mode(), SaveMode::Atomic);
        assert!(store.path().exists());
    }
}
