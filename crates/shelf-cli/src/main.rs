//! Shelf CLI
//!
//! Command-line interface for Shelf - a flat-file book catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use shelf_core::{BookStore, Config, TracingSink};

mod commands;
mod logging;
mod output;
mod shell;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Shelf - a book catalog kept in a plain text file")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Catalog file to use instead of the configured one
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Config file to use instead of ~/.config/shelf/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a book
    Add {
        /// Book title
        title: String,
        /// Book author
        author: String,
        /// Publication year
        #[arg(allow_negative_numbers = true)]
        year: i32,
    },
    /// Remove the first book with this exact title
    #[command(alias = "rm")]
    Remove {
        /// Book title
        title: String,
    },
    /// List all books
    #[command(alias = "ls", alias = "show")]
    List,
    /// Interactive prompt (default when no command is given)
    Shell,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, catalog_file, atomic_save, log_level, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands never touch the catalog
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let mut config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    if let Some(file) = cli.file {
        config.catalog_file = Some(file);
    }

    let interactive = matches!(cli.command, Some(Commands::Shell) | None);
    logging::init(&config, interactive);

    let mut store = BookStore::from_config(&config, TracingSink);

    match cli.command {
        Some(Commands::Add {
            title,
            author,
            year,
        }) => commands::book::add(&mut store, title, author, year, &output),
        Some(Commands::Remove { title }) => commands::book::remove(&mut store, &title, &output),
        Some(Commands::List) => commands::book::list(&store, &output),
        Some(Commands::Shell) | None => {
            let stdin = std::io::stdin();
            shell::run(&mut store, stdin.lock(), std::io::stdout())
                .context("Interactive session failed")
        }
        Some(Commands::Config { .. }) => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["shelf", "add", "Dune", "Frank Herbert", "1965"]).unwrap();
        match cli.command {
            Some(Commands::Add {
                title,
                author,
                year,
            }) => {
                assert_eq!(title, "Dune");
                assert_eq!(author, "Frank Herbert");
                assert_eq!(year, 1965);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_add_rejects_bad_year() {
        assert!(Cli::try_parse_from(["shelf", "add", "Dune", "Frank Herbert", "soon"]).is_err());
    }

    #[test]
    fn test_parse_aliases_and_globals() {
        let cli = Cli::try_parse_from(["shelf", "show", "--json", "--file", "/tmp/b.txt"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List)));
        assert!(cli.json);
        assert_eq!(cli.file, Some(PathBuf::from("/tmp/b.txt")));

        let cli = Cli::try_parse_from(["shelf", "rm", "Dune"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Remove { .. })));
    }

    #[test]
    fn test_no_command_means_shell() {
        let cli = Cli::try_parse_from(["shelf"]).unwrap();
        assert!(cli.command.is_none());
    }
}
