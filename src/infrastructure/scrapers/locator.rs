//! Finds a stat table and one of its rows in a parsed page.
//!
//! Reference pages ship some tables inside HTML comments and reveal them
//! with script, so a table missing from the visible tree is looked for again
//! inside every comment node before giving up.

use crate::error::{Result, ScrapeError};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use tracing::debug;

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

pub const CAREER_TOKEN: &str = "Career";

/// Stat-bearing columns that hold a team's name.
const NAME_STATS: &[&str] = &["school_name", "team_name", "team"];

/// Suffixes appended to a school's name in season tables.
const NAME_MARKERS: &[&str] = &["NCAA"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// The cell's `data-stat` code, if any.
    pub stat: Option<String>,
    pub text: String,
    pub header: bool,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: Option<String>,
    pub cells: Vec<Cell>,
}

impl Row {
    fn is_career(&self, prefix: &str) -> bool {
        if self.id.as_deref() == Some(format!("{prefix}.{CAREER_TOKEN}").as_str()) {
            return true;
        }
        self.cells
            .first()
            .is_some_and(|cell| cell.header && cell.text == CAREER_TOKEN)
    }

    fn is_season_row(&self, prefix: &str) -> bool {
        self.id
            .as_deref()
            .and_then(|id| id.strip_prefix(prefix))
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()))
    }

    fn name_cells(&self) -> Vec<&Cell> {
        let named: Vec<&Cell> = self
            .cells
            .iter()
            .filter(|cell| {
                cell.stat
                    .as_deref()
                    .is_some_and(|stat| NAME_STATS.contains(&stat))
            })
            .collect();
        if named.is_empty() {
            self.cells.iter().filter(|cell| !cell.header).collect()
        } else {
            named
        }
    }

    /// `needle` must already be lowercase.
    fn name_is(&self, needle: &str) -> bool {
        self.name_cells()
            .iter()
            .any(|cell| bare_name(&cell.text).to_lowercase() == needle)
    }

    /// `needle` must already be lowercase.
    fn name_contains(&self, needle: &str) -> bool {
        self.name_cells()
            .iter()
            .any(|cell| cell.text.to_lowercase().contains(needle))
    }
}

/// A name cell's text without trailing markers such as a tournament flag.
fn bare_name(text: &str) -> &str {
    let mut name = text.trim();
    while let Some(rest) = NAME_MARKERS
        .iter()
        .find_map(move |marker| name.strip_suffix(*marker))
    {
        name = rest.trim_end();
    }
    name
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub id: String,
    pub rows: Vec<Row>,
}

impl Table {
    fn from_element(id: &str, element: ElementRef<'_>) -> Self {
        let rows = element
            .select(&ROW)
            .map(|row| Row {
                id: row.value().attr("id").map(str::to_string),
                cells: row
                    .select(&CELL)
                    .map(|cell| Cell {
                        stat: cell.value().attr("data-stat").map(str::to_string),
                        text: cell.text().collect::<String>().trim().to_string(),
                        header: cell.value().name() == "th",
                        href: cell
                            .select(&LINK)
                            .next()
                            .and_then(|link| link.value().attr("href"))
                            .map(str::to_string),
                    })
                    .collect(),
            })
            .collect();

        Self {
            id: id.to_string(),
            rows,
        }
    }

    pub fn row_by_id(&self, row_id: &str) -> Option<&Row> {
        self.rows
            .iter()
            .find(|row| row.id.as_deref() == Some(row_id))
    }

    /// The career totals row and the number of single-season rows above it.
    pub fn career_row(&self) -> Option<(&Row, u32)> {
        let mut seasons = 0;
        for row in &self.rows {
            if row.is_career(&self.id) {
                return Some((row, seasons));
            }
            if row.is_season_row(&self.id) {
                seasons += 1;
            }
        }
        None
    }

    /// An exact (case-insensitive) name wins anywhere in the table; a
    /// substring match is only used when no row names the team exactly.
    pub fn row_for_team(&self, display_name: &str) -> Option<&Row> {
        let needle = display_name.trim().to_lowercase();
        self.rows
            .iter()
            .find(|row| row.name_is(&needle))
            .or_else(|| self.rows.iter().find(|row| row.name_contains(&needle)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonKey {
    Year(u16),
    Career,
}

impl fmt::Display for SeasonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Career => f.write_str(CAREER_TOKEN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKey {
    Season(SeasonKey),
    /// Matched against the row's name cell, exact names first.
    Team(String),
}

#[derive(Debug, Clone)]
pub struct Target {
    /// Table ids to try, in order.
    pub tables: Vec<&'static str>,
    pub row: RowKey,
}

#[derive(Debug, Clone)]
pub struct Located {
    pub table_id: String,
    pub row: Row,
    /// Only set for career lookups.
    pub seasons_played: Option<u32>,
}

fn find_visible(document: &Html, table_id: &str) -> Option<Table> {
    document
        .select(&TABLE)
        .find(|table| table.value().attr("id") == Some(table_id))
        .map(|table| Table::from_element(table_id, table))
}

fn find_in_comments(document: &Html, table_id: &str) -> Option<Table> {
    document.tree.root().descendants().find_map(|node| {
        let comment: &str = node.value().as_comment()?;
        if !comment.contains(table_id) {
            return None;
        }
        let fragment = Html::parse_fragment(comment);
        find_visible(&fragment, table_id)
    })
}

/// Looks for `table#{table_id}` in the page, then inside its comments.
pub fn find_table(document: &Html, table_id: &str) -> Option<Table> {
    find_visible(document, table_id).or_else(|| {
        debug!("Table {table_id} not visible, scanning comments");
        find_in_comments(document, table_id)
    })
}

pub fn locate(document: &Html, target: &Target) -> Result<Located> {
    let mut tables_seen = Vec::new();

    for table_id in &target.tables {
        let Some(table) = find_table(document, table_id) else {
            continue;
        };
        tables_seen.push(*table_id);

        let found = match &target.row {
            RowKey::Season(SeasonKey::Career) => table
                .career_row()
                .map(|(row, seasons)| (row.clone(), Some(seasons))),
            RowKey::Season(SeasonKey::Year(year)) => table
                .row_by_id(&format!("{table_id}.{year}"))
                .map(|row| (row.clone(), None)),
            RowKey::Team(name) => table.row_for_team(name).map(|row| (row.clone(), None)),
        };

        if let Some((row, seasons_played)) = found {
            return Ok(Located {
                table_id: table.id,
                row,
                seasons_played,
            });
        }
    }

    let reason = match (&target.row, tables_seen.is_empty()) {
        (_, true) => format!("no table among {:?}", target.tables),
        (RowKey::Season(season), false) => {
            format!("no {season} row in {:?}", tables_seen)
        }
        (RowKey::Team(name), false) => format!("no row for {name} in {:?}", tables_seen),
    };
    Err(ScrapeError::not_found(reason))
}
