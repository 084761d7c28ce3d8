//! Interactive mode for vault operations.
//!
//! The shell owns one long-lived [`VaultSession`], so the lock/unlock
//! state machine and the reveal gate are driven here. A session
//! passphrase may be set at startup; without one, `lock` still works
//! but the session cannot be unlocked again.

use colored::*;
use dialoguer::{Confirm, Input, Password};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::str::FromStr;
use zeroize::Zeroize;

use crate::auth::{Argon2Verifier, NoCredential, UnlockVerifier};
use crate::error::{Result, VaultError};
use crate::models::{Category, EntryDraft, EntryPatch, VaultEntry};
use crate::persist::{JsonFileStore, VaultPersistence};
use crate::query::CategoryFilter;
use crate::security::ScoreWeights;
use crate::session::VaultSession;
use crate::store::EntryStore;
use crate::utils::{self, print_entry_row, print_metrics, strength_label, success, warning};

/// Interactive vault shell.
pub struct InteractiveVault {
    file: JsonFileStore,
    session: VaultSession,
    editor: DefaultEditor,
}

impl InteractiveVault {
    /// Create a new interactive vault session.
    pub fn new(vault_path: PathBuf) -> Result<Self> {
        let file = JsonFileStore::new(vault_path);
        if !file.exists() {
            return Err(VaultError::VaultNotFound(file.path().to_path_buf()));
        }

        for warn in utils::check_runtime_warnings() {
            warning(&warn);
        }
        for warn in utils::check_file_permissions(file.path()) {
            warning(&warn);
        }

        let entries = file.load_all()?;
        let store = EntryStore::from_entries(entries);
        let verifier = prompt_session_passphrase()?;
        let session = VaultSession::new(store, verifier, ScoreWeights::default());

        let editor = DefaultEditor::new()
            .map_err(|_| VaultError::Other("Failed to create editor".to_string()))?;

        Ok(Self {
            file,
            session,
            editor,
        })
    }

    /// Run the interactive loop.
    pub fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let prompt = if self.session.is_locked() {
                format!("{} ", "vault(locked)>".red())
            } else {
                format!("{} ", "vault>".cyan())
            };
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    match self.execute_command(line) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => eprintln!("{} {}", "Error:".red(), e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("\nUse 'exit' to quit");
                }
                Err(ReadlineError::Eof) => {
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err:?}");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Execute a command. Returns true when the shell should exit.
    fn execute_command(&mut self, input: &str) -> Result<bool> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(false);
        }

        match parts[0] {
            "help" | "?" => {
                self.show_help();
                Ok(false)
            }
            "list" | "ls" => {
                self.list_entries(parts.get(1).copied())?;
                Ok(false)
            }
            "search" => {
                if parts.len() < 2 {
                    eprintln!("Usage: search <query>");
                } else {
                    let query = parts[1..].join(" ");
                    self.search_entries(&query)?;
                }
                Ok(false)
            }
            "show" => {
                if parts.len() < 2 {
                    eprintln!("Usage: show <id>");
                } else {
                    self.show_entry(parts[1])?;
                }
                Ok(false)
            }
            "add" => {
                self.add_entry()?;
                Ok(false)
            }
            "edit" => {
                if parts.len() < 2 {
                    eprintln!("Usage: edit <id>");
                } else {
                    self.edit_entry(parts[1])?;
                }
                Ok(false)
            }
            "delete" | "rm" => {
                if parts.len() < 2 {
                    eprintln!("Usage: delete <id>");
                } else {
                    self.delete_entry(parts[1])?;
                }
                Ok(false)
            }
            "fav" => {
                if parts.len() < 2 {
                    eprintln!("Usage: fav <id>");
                } else {
                    let entry = self.session.toggle_favorite(parts[1])?;
                    self.save()?;
                    let state = if entry.favorite { "on" } else { "off" };
                    success(&format!("Favorite {state} for {}", entry.title));
                }
                Ok(false)
            }
            "status" => {
                self.show_status()?;
                Ok(false)
            }
            "lock" => {
                self.session.lock();
                success("Vault locked");
                Ok(false)
            }
            "unlock" => {
                self.unlock()?;
                Ok(false)
            }
            "clear" => {
                utils::clear_screen();
                Ok(false)
            }
            "exit" | "quit" => Ok(true),
            _ => {
                eprintln!(
                    "Unknown command: {}. Type 'help' for available commands.",
                    parts[0]
                );
                Ok(false)
            }
        }
    }

    fn show_help(&self) {
        println!("\n{}", "Available Commands:".bold());
        println!("  {}          - Show this help", "help".cyan());
        println!("  {} [cat]    - List entries, optionally by category", "list".cyan());
        println!("  {} <query>  - Search titles and usernames", "search".cyan());
        println!("  {} <id>     - Show entry, toggling password reveal", "show".cyan());
        println!("  {}           - Add a new entry", "add".cyan());
        println!("  {} <id>     - Edit an entry", "edit".cyan());
        println!("  {} <id>     - Delete an entry", "delete".cyan());
        println!("  {} <id>     - Toggle favorite", "fav".cyan());
        println!("  {}        - Show security metrics", "status".cyan());
        println!("  {}          - Lock the vault", "lock".cyan());
        println!("  {}        - Unlock the vault", "unlock".cyan());
        println!("  {}          - Exit\n", "exit".cyan());
    }

    fn print_welcome(&self) {
        println!("{}", "SecureVault interactive shell".bold());
        println!("Vault: {}", self.file.path().display());
        println!("Type 'help' for available commands.\n");
    }

    fn save(&self) -> Result<()> {
        self.file.save_all(self.session.entries()?)
    }

    fn list_entries(&self, category: Option<&str>) -> Result<()> {
        let filter = match category {
            Some(raw) => CategoryFilter::from_str(raw)?,
            None => CategoryFilter::All,
        };
        let entries = self.session.list_visible("", filter)?;
        self.print_rows(&entries);
        Ok(())
    }

    fn search_entries(&self, query: &str) -> Result<()> {
        let entries = self.session.list_visible(query, CategoryFilter::All)?;
        self.print_rows(&entries);
        Ok(())
    }

    fn print_rows(&self, entries: &[&VaultEntry]) {
        if entries.is_empty() {
            println!("(no entries)");
            return;
        }
        for entry in entries {
            print_entry_row(entry);
        }
    }

    /// Show an entry, toggling its reveal flag first.
    fn show_entry(&mut self, id: &str) -> Result<()> {
        let revealed = self.session.toggle_reveal(id)?;
        let password = self.session.display_password(id)?.to_string();
        let entry = self.session.entry(id)?;

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
        println!(
            "  Modified:  {}",
            utils::format_timestamp(&entry.last_modified)
        );
        if !revealed {
            println!("  (password hidden again; 'show {id}' to reveal)");
        }
        Ok(())
    }

    fn add_entry(&mut self) -> Result<()> {
        // Fail fast before prompting for anything.
        if self.session.is_locked() {
            return Err(VaultError::VaultLocked);
        }

        let title: String = Input::new()
            .with_prompt("Title")
            .interact_text()
            .map_err(|_| VaultError::Cancelled)?;
        let username: String = Input::new()
            .with_prompt("Username")
            .allow_empty(true)
            .interact_text()
            .map_err(|_| VaultError::Cancelled)?;
        let category_raw: String = Input::new()
            .with_prompt("Category (login/secure-note/credit-card/identity)")
            .default("login".to_string())
            .interact_text()
            .map_err(|_| VaultError::Cancelled)?;
        let category = Category::from_str(&category_raw)?;

        let mut password = if category.requires_password() {
            Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .map_err(|_| VaultError::Cancelled)?
        } else {
            String::new()
        };

        let url: String = Input::new()
            .with_prompt("URL")
            .allow_empty(true)
            .interact_text()
            .map_err(|_| VaultError::Cancelled)?;
        let notes: String = Input::new()
            .with_prompt("Notes")
            .allow_empty(true)
            .interact_text()
            .map_err(|_| VaultError::Cancelled)?;

        let draft = EntryDraft {
            title,
            username,
            password: password.clone(),
            url: (!url.is_empty()).then_some(url),
            notes: (!notes.is_empty()).then_some(notes),
            category,
            favorite: false,
        };
        password.zeroize();

        let entry = self.session.add_entry(draft)?;
        self.save()?;
        success(&format!(
            "Added {} with id {} ({})",
            entry.title,
            entry.id,
            strength_label(entry.strength)
        ));
        Ok(())
    }

    fn edit_entry(&mut self, id: &str) -> Result<()> {
        let current = self.session.entry(id)?.clone();

        let title: String = Input::new()
            .with_prompt("Title")
            .default(current.title.clone())
            .interact_text()
            .map_err(|_| VaultError::Cancelled)?;
        let username: String = Input::new()
            .with_prompt("Username")
            .default(current.username.clone())
            .allow_empty(true)
            .interact_text()
            .map_err(|_| VaultError::Cancelled)?;

        let change_password = Confirm::new()
            .with_prompt("Change password?")
            .default(false)
            .interact()
            .map_err(|_| VaultError::Cancelled)?;
        let mut password = if change_password {
            Some(
                Password::new()
                    .with_prompt("New password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|_| VaultError::Cancelled)?,
            )
        } else {
            None
        };

        let patch = EntryPatch {
            title: Some(title),
            username: Some(username),
            password: password.clone(),
            ..Default::default()
        };
        if let Some(p) = password.as_mut() {
            p.zeroize();
        }

        let entry = self.session.edit_entry(id, patch)?;
        self.save()?;
        success(&format!(
            "Updated {} ({})",
            entry.title,
            strength_label(entry.strength)
        ));
        Ok(())
    }

    fn delete_entry(&mut self, id: &str) -> Result<()> {
        let title = self.session.entry(id)?.title.clone();
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete '{title}'?"))
            .default(false)
            .interact()
            .map_err(|_| VaultError::Cancelled)?;
        if !confirmed {
            return Err(VaultError::Cancelled);
        }

        self.session.delete_entry(id)?;
        self.save()?;
        success(&format!("Deleted {title}"));
        Ok(())
    }

    fn show_status(&self) -> Result<()> {
        let metrics = self.session.metrics()?;
        print_metrics(&metrics);
        Ok(())
    }

    fn unlock(&mut self) -> Result<()> {
        if !self.session.is_locked() {
            println!("Vault is already unlocked");
            return Ok(());
        }
        let mut candidate = rpassword::prompt_password("Passphrase: ")?;
        let result = self.session.unlock(&candidate);
        candidate.zeroize();
        result?;
        success("Vault unlocked");
        Ok(())
    }
}

/// Ask for an optional session passphrase at shell startup.
///
/// An empty passphrase leaves the session without an unlock credential.
fn prompt_session_passphrase() -> Result<Box<dyn UnlockVerifier>> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(Box::new(NoCredential));
    }

    let mut passphrase = Password::new()
        .with_prompt("Session passphrase (empty to skip lock support)")
        .allow_empty_password(true)
        .interact()
        .map_err(|_| VaultError::Cancelled)?;

    let verifier: Box<dyn UnlockVerifier> = if passphrase.is_empty() {
        Box::new(NoCredential)
    } else {
        Box::new(Argon2Verifier::new(&passphrase)?)
    };
    passphrase.zeroize();
    Ok(verifier)
}
