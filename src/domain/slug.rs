use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

static CANONICAL_SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]+(?:-[a-z]+)*-\d+$").unwrap());

/// Suffix used when nothing tells us which of several same-named people is meant.
pub const DEFAULT_SUFFIX: u32 = 1;

/// How the numeric suffix of a slug was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disambiguation {
    /// The input was already a canonical slug.
    Canonical,
    /// The caller passed an explicit index.
    Supplied(u32),
    /// No index was given; `DEFAULT_SUFFIX` was assumed.
    Assumed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug {
    value: String,
    disambiguation: Disambiguation,
}

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn disambiguation(&self) -> Disambiguation {
        self.disambiguation
    }

    /// True when the suffix is a guess that may point at the wrong person.
    pub fn is_guess(&self) -> bool {
        self.disambiguation == Disambiguation::Assumed
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A free-form player name plus an optional caller-supplied disambiguator.
#[derive(Debug, Clone)]
pub struct Identifier<'a> {
    pub name: &'a str,
    pub index: Option<u32>,
}

impl<'a> Identifier<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name, index: None }
    }

    pub fn with_index(mut self, index: Option<u32>) -> Self {
        self.index = index;
        self
    }
}

pub fn is_canonical(input: &str) -> bool {
    CANONICAL_SLUG.is_match(input)
}

/// Turns a player name into the `first-last-N` scheme used in player URLs.
///
/// Canonical slugs come back untouched. Anything else is folded to ASCII
/// lowercase, whitespace runs become single hyphens, and the suffix is either
/// the caller's index or `DEFAULT_SUFFIX`.
pub fn normalize(identifier: &Identifier<'_>) -> Slug {
    let trimmed = identifier.name.trim();
    if is_canonical(trimmed) && identifier.index.is_none() {
        return Slug {
            value: trimmed.to_string(),
            disambiguation: Disambiguation::Canonical,
        };
    }

    let base = team_slug(trimmed);
    let (suffix, disambiguation) = match identifier.index {
        Some(index) => (index, Disambiguation::Supplied(index)),
        None => (DEFAULT_SUFFIX, Disambiguation::Assumed),
    };

    // An explicit index replaces whatever suffix a canonical input carried.
    let base = if is_canonical(trimmed) {
        base.trim_end_matches(|c: char| c.is_ascii_digit())
            .trim_end_matches('-')
            .to_string()
    } else {
        base
    };

    Slug {
        value: format!("{base}-{suffix}"),
        disambiguation,
    }
}

/// Lowercase hyphenated form without a numeric suffix, as used for schools
/// and franchises.
pub fn team_slug(name: &str) -> String {
    fold_ascii(name)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// `"north-carolina"` -> `"North Carolina"`.
pub fn display_name(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn fold_ascii(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| c.is_ascii())
        .filter(|c| !matches!(c, '.' | '\''))
        .collect()
}
