//! Data models for the credential vault.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::VaultError;

/// Kind of record stored in the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Login,
    SecureNote,
    CreditCard,
    Identity,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 4] = [
        Category::Login,
        Category::SecureNote,
        Category::CreditCard,
        Category::Identity,
    ];

    /// Whether entries of this category must carry a non-empty password.
    /// Secure notes may hold free text only.
    pub fn requires_password(&self) -> bool {
        !matches!(self, Category::SecureNote)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Login => "login",
            Category::SecureNote => "secure-note",
            Category::CreditCard => "credit-card",
            Category::Identity => "identity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Login
    }
}

impl FromStr for Category {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "login" => Ok(Category::Login),
            "secure-note" | "note" => Ok(Category::SecureNote),
            "credit-card" | "card" => Ok(Category::CreditCard),
            "identity" => Ok(Category::Identity),
            _ => Err(VaultError::InvalidEntry(format!(
                "Unknown category: {s} (expected login, secure-note, credit-card, or identity)"
            ))),
        }
    }
}

/// Password strength tier derived from password composition.
///
/// Tiers are ordered weakest to strongest so callers can compare them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl Strength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Weak => "weak",
            Strength::Fair => "fair",
            Strength::Good => "good",
            Strength::Strong => "strong",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a single entry in the vault.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VaultEntry {
    /// Opaque unique identifier, immutable after creation.
    pub id: String,
    /// Display name, never empty.
    pub title: String,
    /// Account identifier, may be empty.
    pub username: String,
    /// Secret value. May be empty for secure notes only.
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub category: Category,
    /// Derived from `password` by the classifier; the store recomputes it
    /// on every mutation path.
    pub strength: Strength,
    /// Non-decreasing; refreshed on every mutation of any field.
    pub last_modified: DateTime<Utc>,
    pub favorite: bool,
}

/// Caller-supplied fields for a new entry.
///
/// The store assigns the id, timestamp, and strength itself.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category: Category,
    pub favorite: bool,
}

/// Partial update for an existing entry.
///
/// `None` leaves a field untouched; the outer `Option` on `url` and
/// `notes` distinguishes "leave as is" from "clear the field".
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub category: Option<Category>,
    pub favorite: Option<bool>,
}

/// Vault-wide security posture, recomputed on demand from a full store
/// snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecurityMetrics {
    pub total_entries: usize,
    pub weak_passwords: usize,
    /// Entries whose password text is shared with at least one other
    /// entry. Counts entries involved, not distinct duplicated values.
    pub duplicate_passwords: usize,
    /// Composite score in 0..=100.
    pub security_score: u8,
}
