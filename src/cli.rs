//! Command-line interface definitions for NewsKatta.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. Feed reading, note management, and account operations each get
//! their own subcommand tree.

use clap::{Parser, Subcommand};

/// Command-line arguments for the NewsKatta news reader.
///
/// # Examples
///
/// ```sh
/// # Read a category feed
/// newskatta fetch --category "Krida"
///
/// # Free-text search
/// newskatta search "MPSC"
///
/// # Keep a note against an article headline
/// newskatta notes add "revise articles 14-18" --headline "SC hearing today"
///
/// # Export all notes as text
/// newskatta notes export --dir ~/Documents
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the note store file
    #[arg(short, long, default_value = ".", env = "NEWSKATTA_DATA_DIR")]
    pub data_dir: String,

    /// Path to the config.yaml file (required for auth commands)
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch and render one category feed
    Fetch {
        /// Category to load
        #[arg(short = 'C', long, default_value = "Top Stories")]
        category: String,
    },

    /// Search news by free text (day-scoped Marathi query)
    Search {
        /// The search term
        term: String,
    },

    /// List the fixed categories
    Categories,

    /// Manage study notes
    Notes {
        #[command(subcommand)]
        command: NotesCommand,
    },

    /// Account operations against the identity provider
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    /// Save a note against an article headline
    Add {
        /// The note text
        text: String,

        /// The article headline the note belongs to
        #[arg(long)]
        headline: String,
    },

    /// List saved notes, most recent first
    List,

    /// Delete the note at a position (as shown by `notes list`)
    Rm {
        /// Zero-based note index
        index: usize,
    },

    /// Export all notes to NewsKatta_Notes.txt
    Export {
        /// Directory to write the export file into
        #[arg(long, default_value = ".")]
        dir: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,

        /// Password (6+ characters)
        #[arg(long)]
        password: String,
    },

    /// Sign in to an existing account
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Send a password-reset email
    Reset {
        #[arg(long)]
        email: String,
    },
}
