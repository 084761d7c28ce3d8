//! Utility functions shared by the CLI and interactive modes.

use chrono::{DateTime, Utc};
use colored::*;
use std::path::{Path, PathBuf};

use crate::models::{SecurityMetrics, Strength, VaultEntry};

/// Candidate vault file names, checked in order.
const VAULT_FILE_NAMES: &[&str] = &["vault.json", ".vault.json"];

/// Find a vault file in the current directory, its parents, or the home
/// directory.
pub fn find_vault_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;

    let mut dir = Some(current_dir.as_path());
    while let Some(candidate) = dir {
        for name in VAULT_FILE_NAMES {
            let path = candidate.join(name);
            if path.exists() {
                return Some(path);
            }
        }
        dir = candidate.parent();
    }

    let home = dirs::home_dir()?;
    for name in VAULT_FILE_NAMES {
        let path = home.join(name);
        if path.exists() {
            return Some(path);
        }
    }

    None
}

/// Default location for a newly created vault.
pub fn default_vault_path() -> PathBuf {
    PathBuf::from("vault.json")
}

/// Check runtime conditions and return warnings.
pub fn check_runtime_warnings() -> Vec<String> {
    let mut warnings = Vec::new();

    #[cfg(unix)]
    {
        if unsafe { libc::geteuid() } == 0 {
            warnings.push("Running as root is not recommended".to_string());
        }
    }

    warnings
}

/// Check vault file permissions and return warnings.
pub fn check_file_permissions(path: &Path) -> Vec<String> {
    let mut warnings = Vec::new();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = std::fs::metadata(path) {
            let mode = metadata.permissions().mode();
            if mode & 0o077 != 0 {
                warnings.push(format!(
                    "Vault file has insecure permissions: {:o}. Run 'chmod 600 {}' to fix.",
                    mode & 0o777,
                    path.display()
                ));
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = path;
    }

    warnings
}

/// Format a timestamp for table display, in local time.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Print an error message and exit.
pub fn error_exit(message: &str, code: i32) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), message);
    std::process::exit(code);
}

/// Print a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message.
pub fn warning(message: &str) {
    println!("{} {}", "Warning:".yellow(), message);
}

/// Clear the terminal screen.
pub fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
    use std::io::{self, Write};
    let _ = io::stdout().flush();
}

/// Strength tier with its display color.
pub fn strength_label(strength: Strength) -> ColoredString {
    match strength {
        Strength::Weak => "weak".red(),
        Strength::Fair => "fair".yellow(),
        Strength::Good => "good".green(),
        Strength::Strong => "strong".cyan(),
    }
}

/// Print one list/search result line.
pub fn print_entry_row(entry: &VaultEntry) {
    let favorite = if entry.favorite {
        "★".yellow().to_string()
    } else {
        " ".to_string()
    };
    println!(
        "{} {}  {}  {} [{}] {}",
        favorite,
        entry.id.dimmed(),
        entry.title.bold(),
        entry.username,
        entry.category,
        strength_label(entry.strength)
    );
}

/// Print the security metrics summary.
pub fn print_metrics(metrics: &SecurityMetrics) {
    println!("{}", "Vault security".bold());
    println!("  Entries:             {}", metrics.total_entries);
    println!("  Weak passwords:      {}", metrics.weak_passwords);
    println!("  Duplicate passwords: {}", metrics.duplicate_passwords);

    let score = metrics.security_score;
    let colored_score = if score >= 80 {
        score.to_string().green()
    } else if score >= 50 {
        score.to_string().yellow()
    } else {
        score.to_string().red()
    };
    println!("  Security score:      {colored_score}/100");
}
