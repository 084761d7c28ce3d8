//! Command-line interface implementation.
//!
//! One-shot commands run inside a fresh session. The lock state machine
//! belongs to a running session, so a new process starts unlocked and
//! has no unlock credential; lock/unlock live in the interactive shell.

use clap::{Parser, Subcommand};
use colored::*;
use serde_json::json;
use std::path::PathBuf;
use std::str::FromStr;
use zeroize::Zeroize;

use crate::auth::NoCredential;
use crate::error::{Result, VaultError};
use crate::models::{Category, EntryDraft, EntryPatch, VaultEntry};
use crate::persist::{JsonFileStore, VaultPersistence};
use crate::query::CategoryFilter;
use crate::security::ScoreWeights;
use crate::session::{VaultSession, PASSWORD_MASK};
use crate::store::EntryStore;
use crate::utils::{self, print_entry_row, print_metrics, strength_label, success};

/// Personal secrets vault with strength analysis and security scoring.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to vault file
    #[arg(
        short = 'f',
        long,
        global = true,
        env = "VAULT_FILE",
        help = "Path to vault file (default: searches for vault.json)"
    )]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(
        short = 'o',
        long,
        global = true,
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new vault
    Init {
        /// Force overwrite if vault exists
        #[arg(long)]
        force: bool,
    },

    /// Add a new entry to the vault
    Add {
        /// Display title
        title: String,

        /// Account identifier
        #[arg(short, long, default_value = "")]
        username: String,

        /// Password value (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Entry category: login, secure-note, credit-card, identity
        #[arg(short, long, default_value = "login")]
        category: String,

        /// Associated URL
        #[arg(long)]
        url: Option<String>,

        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,

        /// Mark as favorite
        #[arg(long)]
        favorite: bool,
    },

    /// List entries
    List {
        /// Filter by category ("all" for every category)
        #[arg(short, long, default_value = "all")]
        category: String,
    },

    /// Show a single entry
    Show {
        /// Entry id
        id: String,

        /// Print the password in plain text
        #[arg(short, long)]
        reveal: bool,
    },

    /// Edit an existing entry
    Edit {
        /// Entry id
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Delete an entry
    Rm {
        /// Entry id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Toggle the favorite flag on an entry
    Favorite {
        /// Entry id
        id: String,
    },

    /// Search entries by title or username
    Search {
        /// Search query (case-insensitive substring)
        query: String,

        /// Filter by category ("all" for every category)
        #[arg(short, long, default_value = "all")]
        category: String,
    },

    /// Show vault security status
    Status,
}

impl Cli {
    /// Get the vault file path.
    pub fn get_vault_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.file {
            Ok(path.clone())
        } else if let Some(path) = utils::find_vault_file() {
            Ok(path)
        } else {
            Err(VaultError::Other(
                "No vault file found. Use 'securevault init' to create one.".to_string(),
            ))
        }
    }

    /// Execute the CLI command.
    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Init { force } => self.init_vault(*force),
            Commands::Add {
                title,
                username,
                password,
                category,
                url,
                notes,
                favorite,
            } => self.add_entry(
                title,
                username,
                password.clone(),
                category,
                url.clone(),
                notes.clone(),
                *favorite,
            ),
            Commands::List { category } => self.list_entries("", category),
            Commands::Show { id, reveal } => self.show_entry(id, *reveal),
            Commands::Edit {
                id,
                title,
                username,
                password,
                url,
                notes,
                category,
            } => self.edit_entry(
                id,
                title.clone(),
                username.clone(),
                password.clone(),
                url.clone(),
                notes.clone(),
                category.as_deref(),
            ),
            Commands::Rm { id, yes } => self.delete_entry(id, *yes),
            Commands::Favorite { id } => self.toggle_favorite(id),
            Commands::Search { query, category } => self.list_entries(query, category),
            Commands::Status => self.show_status(),
        }
    }

    /// Open the vault file and build a one-shot session around it.
    fn open_session(&self) -> Result<(JsonFileStore, VaultSession)> {
        let file = JsonFileStore::new(self.get_vault_file()?);
        let entries = file.load_all()?;
        let store = EntryStore::from_entries(entries);
        let session = VaultSession::new(store, Box::new(NoCredential), ScoreWeights::default());
        Ok((file, session))
    }

    fn save(&self, file: &JsonFileStore, session: &VaultSession) -> Result<()> {
        file.save_all(session.entries()?)
    }

    /// Initialize a new vault.
    fn init_vault(&self, force: bool) -> Result<()> {
        let path = self
            .file
            .clone()
            .unwrap_or_else(utils::default_vault_path);
        let file = JsonFileStore::new(path);
        file.init(force)?;
        success(&format!("Created vault at: {}", file.path().display()));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn add_entry(
        &self,
        title: &str,
        username: &str,
        password: Option<String>,
        category: &str,
        url: Option<String>,
        notes: Option<String>,
        favorite: bool,
    ) -> Result<()> {
        let category = Category::from_str(category)?;

        let mut password = match password {
            Some(password) => password,
            None if category.requires_password() => {
                if !atty::is(atty::Stream::Stdin) {
                    return Err(VaultError::InvalidEntry(
                        "password required; pass --password in non-interactive mode".to_string(),
                    ));
                }
                rpassword::prompt_password("Password: ")?
            }
            None => String::new(),
        };

        let (file, mut session) = self.open_session()?;
        let draft = EntryDraft {
            title: title.to_string(),
            username: username.to_string(),
            password: password.clone(),
            url,
            notes,
            category,
            favorite,
        };
        password.zeroize();

        let entry = session.add_entry(draft)?;
        self.save(&file, &session)?;

        match self.output {
            OutputFormat::Text => {
                success(&format!(
                    "Added {} ({}) with id {}",
                    entry.title.bold(),
                    entry.category,
                    entry.id.dimmed()
                ));
                println!("  Strength: {}", strength_label(entry.strength));
            }
            OutputFormat::Json => {
                print_json(&entry_to_json(&entry, PASSWORD_MASK));
            }
        }
        Ok(())
    }

    fn list_entries(&self, query: &str, category: &str) -> Result<()> {
        let filter = CategoryFilter::from_str(category)?;
        let (_, session) = self.open_session()?;
        let entries = session.list_visible(query, filter)?;

        match self.output {
            OutputFormat::Text => {
                if entries.is_empty() {
                    println!("(no entries)");
                    return Ok(());
                }
                for entry in entries {
                    print_entry_row(entry);
                }
            }
            OutputFormat::Json => {
                let items: Vec<_> = entries
                    .iter()
                    .map(|entry| entry_to_json(entry, PASSWORD_MASK))
                    .collect();
                print_json(&json!(items));
            }
        }
        Ok(())
    }

    fn show_entry(&self, id: &str, reveal: bool) -> Result<()> {
        let (_, mut session) = self.open_session()?;

        if reveal {
            session.toggle_reveal(id)?;
        }
        let password = session.display_password(id)?.to_string();
        let entry = session.entry(id)?;

        match self.output {
            OutputFormat::Text => {
                println!("{}  {}", entry.id.dimmed(), entry.title.bold());
                println!("  Category:  {}", entry.category);
                if !entry.username.is_empty() {
                    println!("  Username:  {}", entry.username);
                }
                println!("  Password:  {password}");
                println!("  Strength:  {}", strength_label(entry.strength));
                if let Some(url) = &entry.url {
                    println!("  URL:       {url}");
                }
                if let Some(notes) = &entry.notes {
                    println!("  Notes:     {notes}");
                }
                println!("  Modified:  {}", utils::format_timestamp(&entry.last_modified));
                if entry.favorite {
                    println!("  {}", "★ favorite".yellow());
                }
            }
            OutputFormat::Json => {
                print_json(&entry_to_json(entry, &password));
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn edit_entry(
        &self,
        id: &str,
        title: Option<String>,
        username: Option<String>,
        password: Option<String>,
        url: Option<String>,
        notes: Option<String>,
        category: Option<&str>,
    ) -> Result<()> {
        let category = match category {
            Some(raw) => Some(Category::from_str(raw)?),
            None => None,
        };

        let (file, mut session) = self.open_session()?;
        let patch = EntryPatch {
            title,
            username,
            password,
            url: url.map(Some),
            notes: notes.map(Some),
            category,
            favorite: None,
        };
        let entry = session.edit_entry(id, patch)?;
        self.save(&file, &session)?;

        match self.output {
            OutputFormat::Text => {
                success(&format!("Updated {}", entry.title.bold()));
                println!("  Strength: {}", strength_label(entry.strength));
            }
            OutputFormat::Json => print_json(&entry_to_json(&entry, PASSWORD_MASK)),
        }
        Ok(())
    }

    fn delete_entry(&self, id: &str, yes: bool) -> Result<()> {
        let (file, mut session) = self.open_session()?;
        let title = session.entry(id)?.title.clone();

        if !yes {
            if !atty::is(atty::Stream::Stdin) {
                return Err(VaultError::Cancelled);
            }
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!("Delete '{title}'?"))
                .default(false)
                .interact()
                .map_err(|_| VaultError::Cancelled)?;
            if !confirmed {
                return Err(VaultError::Cancelled);
            }
        }

        if !session.delete_entry(id)? {
            return Err(VaultError::EntryNotFound(id.to_string()));
        }
        self.save(&file, &session)?;
        success(&format!("Deleted {title}"));
        Ok(())
    }

    fn toggle_favorite(&self, id: &str) -> Result<()> {
        let (file, mut session) = self.open_session()?;
        let entry = session.toggle_favorite(id)?;
        self.save(&file, &session)?;

        let state = if entry.favorite { "on" } else { "off" };
        success(&format!("Favorite {} for {}", state, entry.title.bold()));
        Ok(())
    }

    fn show_status(&self) -> Result<()> {
        let (_, session) = self.open_session()?;
        let metrics = session.metrics()?;

        match self.output {
            OutputFormat::Text => print_metrics(&metrics),
            OutputFormat::Json => {
                let value = serde_json::to_value(metrics)?;
                print_json(&value);
            }
        }
        Ok(())
    }
}

/// JSON view of an entry. The password field carries whatever the
/// reveal gate chose, never the secret unconditionally.
fn entry_to_json(entry: &VaultEntry, password_display: &str) -> serde_json::Value {
    json!({
        "id": entry.id,
        "title": entry.title,
        "username": entry.username,
        "password": password_display,
        "url": entry.url,
        "notes": entry.notes,
        "category": entry.category,
        "strength": entry.strength,
        "last_modified": entry.last_modified,
        "favorite": entry.favorite,
    })
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_basic_commands() {
        assert!(Cli::try_parse_from(["securevault", "list"]).is_ok());
        assert!(Cli::try_parse_from(["securevault", "list", "--category", "login"]).is_ok());
        assert!(Cli::try_parse_from(["securevault", "status", "-o", "json"]).is_ok());
        assert!(Cli::try_parse_from(["securevault", "search", "github"]).is_ok());
        assert!(Cli::try_parse_from(["securevault", "bogus"]).is_err());
    }

    #[test]
    fn test_cli_add_accepts_options() {
        let cli = Cli::try_parse_from([
            "securevault",
            "add",
            "GitHub",
            "--username",
            "emma",
            "--password",
            "SecurePass123!@#",
            "--category",
            "login",
            "--favorite",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                ref title,
                favorite,
                ..
            } => {
                assert_eq!(title, "GitHub");
                assert!(favorite);
            }
            _ => panic!("expected add command"),
        }
    }
}
