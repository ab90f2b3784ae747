//! Interactive command loop
//!
//! ```text
//! Enter command (add, remove, show, exit): add
//! Enter book title: Dune
//! Enter book author: Frank Herbert
//! Enter book year: 1965
//! ```
//!
//! Field input is trimmed; the year must parse as an integer or the
//! command is abandoned. A line that is not UTF-8 counts as invalid input
//! rather than ending the session. End of input behaves like `exit`.

use std::io::{self, BufRead, Write};

use tracing::{error, info};

use shelf_core::{Book, Catalog};

const COMMAND_PROMPT: &str = "Enter command (add, remove, show, exit): ";

/// A parsed top-level command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Add,
    Remove,
    Show,
    Exit,
    Unknown,
}

impl Command {
    fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "add" => Command::Add,
            "remove" => Command::Remove,
            "show" => Command::Show,
            "exit" => Command::Exit,
            _ => Command::Unknown,
        }
    }
}

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
enum Reply {
    /// A trimmed line
    Line(String),
    /// A line that was not UTF-8
    Undecodable,
    /// End of input
    Eof,
}

/// Run the loop until `exit` or end of input
pub fn run<C, R, W>(catalog: &mut C, mut input: R, mut out: W) -> io::Result<()>
where
    C: Catalog,
    R: BufRead,
    W: Write,
{
    loop {
        let command = match prompt(&mut input, &mut out, COMMAND_PROMPT)? {
            Reply::Line(line) => Command::parse(&line),
            Reply::Undecodable => Command::Unknown,
            Reply::Eof => break,
        };

        match command {
            Command::Add => {
                let Some(book) = read_book(&mut input, &mut out)? else {
                    continue;
                };
                catalog.add(book);
            }
            Command::Remove => match prompt(&mut input, &mut out, "Enter book title to remove: ")? {
                Reply::Line(title) => {
                    catalog.remove(&title);
                }
                Reply::Undecodable => error!("Input is not valid UTF-8"),
                Reply::Eof => break,
            },
            Command::Show => {
                catalog.list();
            }
            Command::Exit => break,
            Command::Unknown => info!("Invalid command. Please try again."),
        }
    }

    Ok(())
}

/// Ask for title, author and year
///
/// Returns `None` if a field is not UTF-8, the year is not an integer or
/// input ran out.
fn read_book<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<Book>> {
    let Some(title) = field(input, out, "Enter book title: ")? else {
        return Ok(None);
    };
    let Some(author) = field(input, out, "Enter book author: ")? else {
        return Ok(None);
    };
    let Some(year) = field(input, out, "Enter book year: ")? else {
        return Ok(None);
    };

    match year.parse::<i32>() {
        Ok(year) => Ok(Some(Book::new(title, author, year))),
        Err(_) => {
            error!("Year must be an integer");
            Ok(None)
        }
    }
}

/// Prompt for one field of a command
fn field<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> io::Result<Option<String>> {
    match prompt(input, out, text)? {
        Reply::Line(line) => Ok(Some(line)),
        Reply::Undecodable => {
            error!("Input is not valid UTF-8");
            Ok(None)
        }
        Reply::Eof => Ok(None),
    }
}

/// Print `text`, read one line and trim it
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> io::Result<Reply> {
    write!(out, "{}", text)?;
    out.flush()?;

    let mut bytes = Vec::new();
    if input.read_until(b'\n', &mut bytes)? == 0 {
        return Ok(Reply::Eof);
    }

    Ok(match String::from_utf8(bytes) {
        Ok(line) => Reply::Line(line.trim().to_string()),
        Err(_) => Reply::Undecodable,
    })
}
