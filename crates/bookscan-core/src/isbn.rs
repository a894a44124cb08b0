//! Structural ISBN classification.
//!
//! This is a shape check only: check digits are not verified, so a code with
//! the right length and prefix but a wrong check digit still counts as an ISBN.

use serde::{Deserialize, Serialize};

/// Which ISBN form a payload matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsbnKind {
    Isbn10,
    Isbn13,
}

impl std::fmt::Display for IsbnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IsbnKind::Isbn10 => write!(f, "ISBN-10"),
            IsbnKind::Isbn13 => write!(f, "ISBN-13"),
        }
    }
}

/// Strip hyphens and whitespace from a raw payload.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Classify a raw barcode payload.
///
/// - 10 characters: all ASCII digits, or nine digits followed by `X`.
/// - 13 characters: all ASCII digits with a `978` or `979` (Bookland) prefix.
pub fn classify(raw: &str) -> Option<IsbnKind> {
    let clean = normalize(raw);
    let chars: Vec<char> = clean.chars().collect();

    match chars.len() {
        10 => {
            let (body, last) = chars.split_at(9);
            let body_digits = body.iter().all(char::is_ascii_digit);
            let last_ok = last[0].is_ascii_digit() || last[0] == 'X';
            (body_digits && last_ok).then_some(IsbnKind::Isbn10)
        }
        13 => {
            let all_digits = chars.iter().all(char::is_ascii_digit);
            let bookland = clean.starts_with("978") || clean.starts_with("979");
            (all_digits && bookland).then_some(IsbnKind::Isbn13)
        }
        _ => None,
    }
}

/// Whether a raw payload is shaped like an ISBN.
pub fn is_isbn(raw: &str) -> bool {
    classify(raw).is_some()
}
