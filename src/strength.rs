//! Password strength classification.

use crate::models::Strength;

/// Classify a password into a strength tier.
///
/// Deterministic and total: one point each for length >= 8, length >= 12,
/// mixed upper and lower case, at least one digit, and at least one
/// non-alphanumeric character. A total of 0-1 maps to weak, 2 to fair,
/// 3-4 to good, and 5 to strong. The empty string is always weak.
pub fn classify(password: &str) -> Strength {
    match composition_score(password) {
        0 | 1 => Strength::Weak,
        2 => Strength::Fair,
        3 | 4 => Strength::Good,
        _ => Strength::Strong,
    }
}

fn composition_score(password: &str) -> u8 {
    let mut score = 0;

    let length = password.chars().count();
    if length >= 8 {
        score += 1;
    }
    if length >= 12 {
        score += 1;
    }

    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    if has_lowercase && has_uppercase {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_alphanumeric()) {
        score += 1;
    }

    score
}
