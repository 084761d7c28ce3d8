//! Search and category filtering over a store snapshot.

use std::str::FromStr;

use crate::error::VaultError;
use crate::models::{Category, VaultEntry};

/// Category side of the search predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Category::from_str(s).map(CategoryFilter::Only)
        }
    }
}

/// Filter entries by free-text query and category.
///
/// A pure, stable filter: matches keep the store's insertion order and
/// are never ranked. The text predicate is a case-insensitive substring
/// match against the title or username; an empty query matches every
/// entry. Both predicates must hold.
pub fn search<'a>(
    entries: &'a [VaultEntry],
    query: &str,
    filter: CategoryFilter,
) -> Vec<&'a VaultEntry> {
    let needle = query.to_lowercase();

    entries
        .iter()
        .filter(|entry| {
            let text_match = needle.is_empty()
                || entry.title.to_lowercase().contains(&needle)
                || entry.username.to_lowercase().contains(&needle);
            let category_match = match filter {
                CategoryFilter::All => true,
                CategoryFilter::Only(category) => entry.category == category,
            };
            text_match && category_match
        })
        .collect()
}
