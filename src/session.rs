//! Vault session: lock state machine, reveal gate, and gated access to
//! the store, aggregator, and query engine.
//!
//! One `VaultSession` exists per running instance and owns all vault
//! state. Mutating methods take `&mut self`, so concurrent callers are
//! serialized by the borrow checker rather than an internal lock.

use std::collections::HashMap;

use crate::auth::UnlockVerifier;
use crate::error::{Result, VaultError};
use crate::models::{EntryDraft, EntryPatch, SecurityMetrics, VaultEntry};
use crate::query::{self, CategoryFilter};
use crate::security::{self, ScoreWeights};
use crate::store::EntryStore;

/// Fixed-width stand-in for a hidden password.
///
/// The width is constant so a masked row never leaks the real
/// password's length.
pub const PASSWORD_MASK: &str = "••••••••";

/// Lock state of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Locked,
    Unlocked,
}

/// One user-facing vault session.
///
/// While locked, every read and write on entries, metrics, or query
/// output fails with `VaultLocked`; only `unlock` and the state
/// accessors remain reachable.
pub struct VaultSession {
    store: EntryStore,
    /// Reveal gate: absent id means masked.
    revealed: HashMap<String, bool>,
    state: LockState,
    verifier: Box<dyn UnlockVerifier>,
    weights: ScoreWeights,
}

impl VaultSession {
    /// Create a session that starts unlocked.
    pub fn new(store: EntryStore, verifier: Box<dyn UnlockVerifier>, weights: ScoreWeights) -> Self {
        Self {
            store,
            revealed: HashMap::new(),
            state: LockState::Unlocked,
            verifier,
            weights,
        }
    }

    /// Create a session that starts locked.
    pub fn locked(
        store: EntryStore,
        verifier: Box<dyn UnlockVerifier>,
        weights: ScoreWeights,
    ) -> Self {
        let mut session = Self::new(store, verifier, weights);
        session.state = LockState::Locked;
        session
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    fn ensure_unlocked(&self) -> Result<()> {
        match self.state {
            LockState::Unlocked => Ok(()),
            LockState::Locked => Err(VaultError::VaultLocked),
        }
    }

    /// Lock the session. Always succeeds.
    ///
    /// The reveal map is cleared in the same call as the state flip, so
    /// no password stays displayed across a lock.
    pub fn lock(&mut self) {
        self.revealed.clear();
        self.state = LockState::Locked;
    }

    /// Attempt to unlock with a candidate secret.
    ///
    /// Delegates the check to the configured verifier. On failure the
    /// session stays locked and `UnlockFailed` is returned. Unlocking an
    /// already-unlocked session is a no-op.
    pub fn unlock(&mut self, candidate: &str) -> Result<()> {
        if self.state == LockState::Unlocked {
            return Ok(());
        }
        if self.verifier.verify(candidate) {
            self.state = LockState::Unlocked;
            Ok(())
        } else {
            Err(VaultError::UnlockFailed)
        }
    }

    /// Entries matching the query and category filter, in store order.
    pub fn list_visible(&self, query: &str, filter: CategoryFilter) -> Result<Vec<&VaultEntry>> {
        self.ensure_unlocked()?;
        Ok(query::search(self.store.list(), query, filter))
    }

    /// Security metrics over the full store, not the filtered view.
    pub fn metrics(&self) -> Result<SecurityMetrics> {
        self.ensure_unlocked()?;
        Ok(security::compute_metrics(self.store.list(), self.weights))
    }

    /// Look up a single entry by id.
    pub fn entry(&self, id: &str) -> Result<&VaultEntry> {
        self.ensure_unlocked()?;
        self.store.get(id)
    }

    /// Full store snapshot, for session-boundary persistence.
    pub fn entries(&self) -> Result<&[VaultEntry]> {
        self.ensure_unlocked()?;
        Ok(self.store.list())
    }

    pub fn add_entry(&mut self, draft: EntryDraft) -> Result<VaultEntry> {
        self.ensure_unlocked()?;
        self.store.add(draft)
    }

    pub fn edit_entry(&mut self, id: &str, patch: EntryPatch) -> Result<VaultEntry> {
        self.ensure_unlocked()?;
        self.store.update(id, patch)
    }

    /// Remove an entry. Returns whether anything was removed.
    pub fn delete_entry(&mut self, id: &str) -> Result<bool> {
        self.ensure_unlocked()?;
        Ok(self.store.remove(id))
    }

    pub fn toggle_favorite(&mut self, id: &str) -> Result<VaultEntry> {
        self.ensure_unlocked()?;
        let favorite = self.store.get(id)?.favorite;
        self.store.update(
            id,
            EntryPatch {
                favorite: Some(!favorite),
                ..Default::default()
            },
        )
    }

    /// Flip the reveal flag for an entry. Returns the new flag.
    ///
    /// An id never toggled before starts masked, so the first toggle
    /// reveals.
    pub fn toggle_reveal(&mut self, id: &str) -> Result<bool> {
        self.ensure_unlocked()?;
        self.store.get(id)?;
        let flag = self.revealed.entry(id.to_string()).or_insert(false);
        *flag = !*flag;
        Ok(*flag)
    }

    /// Whether an entry's password is currently revealed.
    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.get(id).copied().unwrap_or(false)
    }

    /// The password as it should be rendered: the literal secret when
    /// revealed, the fixed-width mask otherwise.
    pub fn display_password(&self, id: &str) -> Result<&str> {
        self.ensure_unlocked()?;
        let entry = self.store.get(id)?;
        if self.is_revealed(id) {
            Ok(entry.password.as_str())
        } else {
            Ok(PASSWORD_MASK)
        }
    }
}
