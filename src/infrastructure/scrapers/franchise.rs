use super::PageParser;
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static NTH_SEASON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,3})(?:st|nd|rd|th)\s+season\b").unwrap());
static ESTABLISHED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:established|founded)\s+(?:in\s+)?(\d{4})\b").unwrap());

/// Guesses how many seasons a franchise has played from its team page.
///
/// Page wording varies a lot, so this only ever answers "don't know" rather
/// than failing.
pub struct FranchiseSeasonsParser {
    pub current_year: i32,
}

impl FranchiseSeasonsParser {
    pub fn seasons_in(&self, text: &str) -> Option<u32> {
        if let Some(caps) = NTH_SEASON.captures(text) {
            return caps[1].parse().ok().filter(|n| *n > 0);
        }

        let established: i32 = ESTABLISHED.captures(text)?[1].parse().ok()?;
        let seasons = self.current_year - established + 1;
        u32::try_from(seasons).ok().filter(|n| *n > 0)
    }
}

impl PageParser for FranchiseSeasonsParser {
    type Output = Option<u32>;

    fn parse(&self, document: &Html) -> Result<Option<u32>> {
        let text = document
            .select(&BODY)
            .next()
            .map(|body| body.text().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();
        Ok(self.seasons_in(&text))
    }
}
