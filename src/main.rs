//! Main entry point for securevault.

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use dialoguer::Confirm;
use std::path::PathBuf;

use securevault::cli::Cli;
use securevault::interactive::InteractiveVault;
use securevault::persist::JsonFileStore;
use securevault::utils::error_exit;

fn main() {
    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let args = std::env::args().collect::<Vec<_>>();

    // Interactive mode when no subcommand is given
    if args.len() == 1 || (args.len() == 3 && (args[1] == "-f" || args[1] == "--file")) {
        run_interactive();
    } else {
        run_cli();
    }
}

/// Run in CLI mode.
fn run_cli() {
    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        error_exit(&e.to_string(), 1);
    }
}

/// Run in interactive mode.
fn run_interactive() {
    let vault_path = match resolve_vault_path() {
        Ok(path) => path,
        Err(e) => error_exit(&format!("{e:#}"), 1),
    };

    match InteractiveVault::new(vault_path) {
        Ok(mut vault) => {
            if let Err(e) = vault.run() {
                error_exit(&e.to_string(), 1);
            }
        }
        Err(e) => error_exit(&e.to_string(), 1),
    }
}

/// Work out which vault file the interactive shell should open,
/// offering to create one when none exists.
fn resolve_vault_path() -> anyhow::Result<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() == 3 {
        return Ok(PathBuf::from(&args[2]));
    }
    if let Ok(path) = std::env::var("VAULT_FILE") {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = securevault::utils::find_vault_file() {
        return Ok(path);
    }

    eprintln!("{}", "No vault file found.".yellow());
    let vault_path = securevault::utils::default_vault_path();
    let full_path = std::env::current_dir()
        .context("cannot determine current directory")?
        .join(&vault_path);

    let create = if atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout) {
        Confirm::new()
            .with_prompt(format!(
                "Would you like to create a new vault at '{}'?",
                full_path.display()
            ))
            .default(true)
            .interact()
            .unwrap_or(false)
    } else {
        eprintln!(
            "{}",
            "Run 'securevault init' to create a vault, or run securevault in an interactive terminal."
                .yellow()
        );
        false
    };

    if !create {
        anyhow::bail!("No vault file available. Use 'securevault init' to create one.");
    }

    JsonFileStore::new(&vault_path)
        .init(false)
        .with_context(|| format!("failed to create vault at {}", vault_path.display()))?;
    println!("{} Created vault at: {}", "✓".green(), vault_path.display());
    Ok(vault_path)
}
