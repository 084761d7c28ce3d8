//! Vault-wide security posture aggregation.
//!
//! Metrics are computed fresh from a full store snapshot on every call;
//! nothing here holds state or caches.

use std::collections::HashMap;

use crate::models::{SecurityMetrics, Strength, VaultEntry};

/// Relative weight of each penalty in the composite score.
///
/// The exact weighting is a tunable, not a contract; the defaults favor
/// weak passwords over reuse. The empty-vault score of 100 holds for any
/// weights.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub weak: f64,
    pub duplicate: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            weak: 0.6,
            duplicate: 0.4,
        }
    }
}

/// Compute vault-wide metrics from a store snapshot.
pub fn compute_metrics(entries: &[VaultEntry], weights: ScoreWeights) -> SecurityMetrics {
    let total_entries = entries.len();
    if total_entries == 0 {
        return SecurityMetrics {
            total_entries: 0,
            weak_passwords: 0,
            duplicate_passwords: 0,
            security_score: 100,
        };
    }

    let weak_passwords = entries
        .iter()
        .filter(|e| e.strength == Strength::Weak)
        .count();
    let duplicate_passwords = count_duplicate_passwords(entries);

    let total = total_entries as f64;
    let weak_ratio = weak_passwords as f64 / total;
    let duplicate_ratio = duplicate_passwords as f64 / total;
    let raw = 100.0 * (1.0 - weak_ratio) * weights.weak
        + 100.0 * (1.0 - duplicate_ratio) * weights.duplicate;
    let security_score = raw.round().clamp(0.0, 100.0) as u8;

    SecurityMetrics {
        total_entries,
        weak_passwords,
        duplicate_passwords,
        security_score,
    }
}

/// Count entries whose password text is shared with at least one other
/// entry.
///
/// Grouping is by exact string, case-sensitive, no normalization. Every
/// member of a group of two or more counts. Empty passwords (secure
/// notes) never group.
fn count_duplicate_passwords(entries: &[VaultEntry]) -> usize {
    let mut groups: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        if !entry.password.is_empty() {
            *groups.entry(entry.password.as_str()).or_insert(0) += 1;
        }
    }
    groups.values().filter(|&&count| count >= 2).sum()
}
