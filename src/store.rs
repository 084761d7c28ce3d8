//! In-memory entry store.
//!
//! The store owns every `VaultEntry` and is the single mutation entry
//! point: ids are assigned here, strength is recomputed here, and
//! timestamps are stamped here. Entries keep their insertion order so
//! `list()` is stable across reads.

use chrono::Utc;
use rand::RngCore;

use crate::error::{Result, VaultError};
use crate::models::{Category, EntryDraft, EntryPatch, VaultEntry};
use crate::strength;

/// Ordered collection of vault entries.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<VaultEntry>,
}

impl EntryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted entries, preserving their order.
    ///
    /// Strength is recomputed on load so a hand-edited vault file can
    /// never carry a stale tier.
    pub fn from_entries(entries: Vec<VaultEntry>) -> Self {
        let mut store = Self { entries };
        for entry in &mut store.entries {
            entry.strength = strength::classify(&entry.password);
        }
        store
    }

    /// Validate and insert a new entry.
    ///
    /// Assigns the id, stamps the creation time, and computes the initial
    /// strength. Returns the stored entry.
    pub fn add(&mut self, draft: EntryDraft) -> Result<VaultEntry> {
        validate_fields(&draft.title, &draft.password, draft.category)?;

        let entry = VaultEntry {
            id: self.generate_id(),
            strength: strength::classify(&draft.password),
            last_modified: Utc::now(),
            title: draft.title,
            username: draft.username,
            password: draft.password,
            url: draft.url,
            notes: draft.notes,
            category: draft.category,
            favorite: draft.favorite,
        };

        let stored = entry.clone();
        self.entries.push(entry);
        Ok(stored)
    }

    /// Apply a partial update to an existing entry.
    ///
    /// All-or-nothing: if validation of the patched entry fails, the
    /// stored entry is left exactly as before. Strength is always
    /// recomputed and the timestamp refreshed on success.
    pub fn update(&mut self, id: &str, patch: EntryPatch) -> Result<VaultEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))?;

        let mut updated = self.entries[index].clone();
        if let Some(title) = patch.title {
            updated.title = title;
        }
        if let Some(username) = patch.username {
            updated.username = username;
        }
        if let Some(password) = patch.password {
            updated.password = password;
        }
        if let Some(url) = patch.url {
            updated.url = url;
        }
        if let Some(notes) = patch.notes {
            updated.notes = notes;
        }
        if let Some(category) = patch.category {
            updated.category = category;
        }
        if let Some(favorite) = patch.favorite {
            updated.favorite = favorite;
        }

        validate_fields(&updated.title, &updated.password, updated.category)?;

        updated.strength = strength::classify(&updated.password);
        // last_modified stays non-decreasing even if the clock steps back
        let now = Utc::now();
        if now > updated.last_modified {
            updated.last_modified = now;
        }

        self.entries[index] = updated.clone();
        Ok(updated)
    }

    /// Remove an entry. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Result<&VaultEntry> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))
    }

    /// All entries in insertion order.
    pub fn list(&self) -> &[VaultEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Generate a fresh random id, retrying on the (unlikely) collision.
    fn generate_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let mut bytes = [0u8; 8];
            rng.fill_bytes(&mut bytes);
            let id: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
            if !self.entries.iter().any(|e| e.id == id) {
                return id;
            }
        }
    }
}

fn validate_fields(title: &str, password: &str, category: Category) -> Result<()> {
    if title.trim().is_empty() {
        return Err(VaultError::InvalidEntry(
            "title must not be empty".to_string(),
        ));
    }
    if category.requires_password() && password.is_empty() {
        return Err(VaultError::InvalidEntry(format!(
            "{category} entries require a password"
        )));
    }
    Ok(())
}
