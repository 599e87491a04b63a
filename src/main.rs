//! # NewsKatta
//!
//! A terminal news reader for Marathi Google News feeds. Feeds are fetched
//! through the rss2json conversion API, normalized into display cards
//! (resolved image, cleaned summary, formatted date), and rendered with
//! category filters and free-text search. Users can attach study notes to
//! articles, persisted locally and exportable as plain text, and manage an
//! email/password account through the Firebase identity API.
//!
//! ## Usage
//!
//! ```sh
//! newskatta fetch --category "Krida"
//! newskatta search "MPSC"
//! newskatta notes add "revise this" --headline "SC hearing today"
//! newskatta notes export --dir ~/Documents
//! ```
//!
//! ## Architecture
//!
//! 1. **Resolve**: category or search term becomes a Google News RSS URL
//! 2. **Fetch**: the URL is wrapped in an rss2json conversion request
//! 3. **Normalize**: each raw item becomes a [`models::DisplayItem`] card
//! 4. **Render**: cards are printed with read and share links
//!
//! Notes and auth are independent subcommand trees over [`notes::NoteStore`]
//! and [`auth::IdentityGate`].

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod auth;
mod cli;
mod config;
mod feed;
mod models;
mod normalize;
mod notes;
mod utils;

use auth::IdentityGate;
use cli::{AuthCommand, Cli, Command, NotesCommand};
use feed::{FeedController, FeedState, HttpFetcher, SEARCH_CATEGORY};
use models::{DisplayItem, Note};
use notes::NoteStore;
use utils::{ensure_writable_dir, share_link};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args.data_dir, ?args.config, "Parsed CLI arguments");

    match args.command {
        Command::Fetch { category } => show_feed(&category, None).await,
        Command::Search { term } => show_feed(SEARCH_CATEGORY, Some(&term)).await,
        Command::Categories => {
            for name in feed::category_names() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Notes { command } => {
            ensure_writable_dir(&args.data_dir).await?;
            let mut store = NoteStore::open(Path::new(&args.data_dir))?;
            run_notes_command(&mut store, command)
        }
        Command::Auth { command } => {
            let config = config::load_config(&args.config)?;
            let gate = IdentityGate::new(config.identity.api_key);
            run_auth_command(&gate, command).await;
            Ok(())
        }
    }
}

/// Load one category or search and render the resulting cards.
async fn show_feed(category: &str, search_term: Option<&str>) -> Result<(), Box<dyn Error>> {
    let label = search_term.unwrap_or(category);
    println!("Fetching {label}...");

    let controller = FeedController::new(HttpFetcher);
    let mut state = FeedState::default();
    state.begin();

    let update = controller.load(category, search_term).await;
    state.apply(&controller, update);

    if state.items.is_empty() {
        println!("No items.");
        return Ok(());
    }

    info!(count = state.items.len(), %category, "Rendering feed");
    for item in &state.items {
        print_card(item);
    }
    Ok(())
}

fn print_card(item: &DisplayItem) {
    if !item.published_at.is_empty() {
        println!("[ {} ]", item.published_at);
    }
    println!("{}", item.title);
    println!("{}", item.summary);
    println!("Image: {}", item.image_url);
    println!("Read:  {}", item.link);
    println!("Share: {}", share_link(&item.title, &item.link));
    println!();
}

fn run_notes_command(store: &mut NoteStore, command: NotesCommand) -> Result<(), Box<dyn Error>> {
    match command {
        NotesCommand::Add { text, headline } => {
            if store.add(&text, &headline)? {
                println!("Note saved.");
            } else {
                println!("Nothing to save: note text is empty.");
            }
        }
        NotesCommand::List => {
            if store.notes().is_empty() {
                println!("No notes saved yet.");
            }
            for (index, note) in store.notes().iter().enumerate() {
                println!("{}", note_line(index, note));
            }
        }
        NotesCommand::Rm { index } => {
            if store.remove(index)? {
                println!("Note {index} deleted.");
            } else {
                println!("No note at index {index}.");
            }
        }
        NotesCommand::Export { dir } => match store.export_to_file(Path::new(&dir))? {
            Some(path) => println!("Notes exported to {}", path.display()),
            None => println!("No notes to export!"),
        },
    }
    Ok(())
}

/// One `notes list` entry: index, timestamp, headline, indented text.
fn note_line(index: usize, note: &Note) -> String {
    format!(
        "[{index}] {} - {}\n    {}",
        note.created_at, note.headline, note.text
    )
}

async fn run_auth_command(gate: &IdentityGate, command: AuthCommand) {
    match command {
        AuthCommand::Signup { email, password } => match gate.sign_up(&email, &password).await {
            Ok(session) => {
                println!("Account Created Successfully! You are now logged in.");
                println!("Signed in as {}", session.email);
            }
            Err(e) => {
                warn!(error = %e, "Sign-up failed");
                println!("{e}");
            }
        },
        AuthCommand::Login { email, password } => match gate.sign_in(&email, &password).await {
            Ok(session) => println!("Signed in as {}", session.email),
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                println!("{e}");
            }
        },
        AuthCommand::Reset { email } => match gate.send_password_reset(&email).await {
            Ok(()) => println!("Password reset email sent! Check your inbox."),
            Err(e) => {
                warn!(error = %e, "Password reset failed");
                println!("{e}");
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_line_layout() {
        let note = Note {
            text: "revise this".to_string(),
            headline: "SC hearing today".to_string(),
            created_at: "15 Jan, 10:30".to_string(),
        };
        assert_eq!(
            note_line(3, &note),
            "[3] 15 Jan, 10:30 - SC hearing today\n    revise this"
        );
    }
}
