use super::PageParser;
use crate::domain::{GameSummary, PlayerLine, TeamBox};
use crate::error::{Result, ScrapeError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use tracing::debug;

static DESCRIPTION: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[property="og:description"], meta[name="description"]"#).unwrap()
});
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static CAPTION: Lazy<Selector> = Lazy::new(|| Selector::parse("caption").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static POSITION: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"[class*="position"]"#).unwrap());

// "... of the Boston Celtics vs. New York Knicks NBA basketball game, final score 132-109, ..."
static SUMMARY_SENTENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)of the (?P<home>.+?) vs\.? (?P<away>.+?) (?:NBA|NCAA|basketball)\b.*?final score (?P<hs>\d+)\s*-\s*(?P<as>\d+)")
        .unwrap()
});
// "Celtics 132-109 Knicks (Oct 22, 2024) Box Score - ESPN"
static TITLE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<home>.+?)\s+(?P<hs>\d+)\s*-\s*(?P<as>\d+)\s+(?P<away>.+?)\s*\(").unwrap()
});

/// Row labels that separate sections rather than name a player.
const NON_PLAYER_ROWS: &[&str] = &["starters", "bench", "team", "totals", ""];

fn summary_from(caps: &regex::Captures<'_>) -> GameSummary {
    GameSummary {
        home_team: Some(caps["home"].trim().to_string()),
        away_team: Some(caps["away"].trim().to_string()),
        home_score: caps["hs"].parse().ok(),
        away_score: caps["as"].parse().ok(),
    }
}

/// Teams and final score from the page's description and title, when they
/// are phrased the way the parser expects. The team listed first is treated
/// as the home side.
pub fn parse_summary(document: &Html) -> GameSummary {
    let description = document
        .select(&DESCRIPTION)
        .filter_map(|meta| meta.value().attr("content"))
        .find_map(|content| SUMMARY_SENTENCE.captures(content).map(|caps| summary_from(&caps)));
    if let Some(summary) = description {
        return summary;
    }

    document
        .select(&TITLE)
        .next()
        .map(|title| title.text().collect::<String>())
        .and_then(|title| TITLE_LINE.captures(title.trim()).map(|caps| summary_from(&caps)))
        .unwrap_or_default()
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn player_line(labels: &[String], cells: &[ElementRef<'_>]) -> Option<PlayerLine> {
    let name_cell = cells.first()?;
    let position = name_cell
        .select(&POSITION)
        .next()
        .map(|el| cell_text(&el))
        .filter(|pos| !pos.is_empty());
    let name = name_cell
        .select(&LINK)
        .next()
        .map(|link| cell_text(&link))
        .unwrap_or_else(|| cell_text(name_cell));

    if NON_PLAYER_ROWS.contains(&name.to_lowercase().as_str()) {
        return None;
    }

    let mut minutes = None;
    let mut stats = BTreeMap::new();
    // A short row is a "DNP" line: the player is listed with no numbers.
    if cells.len() == labels.len() {
        for (label, cell) in labels.iter().zip(cells).skip(1) {
            let value = cell_text(cell);
            if label == "min" {
                minutes = value.parse().ok();
            } else if !value.is_empty() {
                stats.insert(label.clone(), value);
            }
        }
    }

    Some(PlayerLine {
        name,
        position,
        minutes,
        stats,
    })
}

fn parse_team_table(table: ElementRef<'_>) -> Option<(Option<String>, Vec<PlayerLine>)> {
    let rows: Vec<ElementRef<'_>> = table.select(&ROW).collect();
    let header_at = rows.iter().position(|row| {
        row.select(&CELL)
            .any(|cell| cell_text(&cell).eq_ignore_ascii_case("min"))
    })?;
    let labels: Vec<String> = rows[header_at]
        .select(&CELL)
        .map(|cell| cell_text(&cell).to_lowercase())
        .collect();

    let players: Vec<PlayerLine> = rows[header_at + 1..]
        .iter()
        .filter_map(|row| {
            let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
            // Repeated header rows ("bench" sections) carry the labels again.
            if cells.iter().any(|cell| cell_text(cell).eq_ignore_ascii_case("min")) {
                return None;
            }
            player_line(&labels, &cells)
        })
        .collect();

    let team = table
        .select(&CAPTION)
        .next()
        .map(|caption| cell_text(&caption))
        .or_else(|| table.value().attr("aria-label").map(str::to_string))
        .filter(|name| !name.is_empty());

    Some((team, players))
}

pub struct BoxScoreParser;

impl PageParser for BoxScoreParser {
    type Output = (GameSummary, Vec<TeamBox>);

    fn parse(&self, document: &Html) -> Result<(GameSummary, Vec<TeamBox>)> {
        let summary = parse_summary(document);
        let fallback_names = [summary.home_team.clone(), summary.away_team.clone()];

        let teams: Vec<TeamBox> = document
            .select(&TABLE)
            .filter_map(parse_team_table)
            .filter(|(_, players)| !players.is_empty())
            .enumerate()
            .map(|(index, (team, players))| {
                let team = team.or_else(|| fallback_names.get(index).cloned().flatten());
                TeamBox::from_players(team, players)
            })
            .collect();

        if teams.is_empty() {
            return Err(ScrapeError::not_found("no player rows in any box score table"));
        }
        debug!(
            "Parsed box score: {} players across {} teams",
            teams.iter().map(TeamBox::player_count).sum::<usize>(),
            teams.len()
        );
        Ok((summary, teams))
    }
}
