use super::PageParser;
use crate::domain::{GameOutcome, ResultKind, ScheduleEntry};
use crate::error::Result;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("table tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

static RESULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<kind>[WL])\s*(?P<home>\d+)\s*-\s*(?P<away>\d+)(?:\s*(?P<ot>\d*OT))?").unwrap()
});
static GAME_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"gameId[/=](\d+)").unwrap());

const HEADER_TOKEN: &str = "RESULT";

/// Labels only ever seen in a section's header row.
const HEADER_LABELS: &[&str] = &["DATE", "OPPONENT", HEADER_TOKEN, "TIME"];
const RECORD_LABEL: &str = "W-L";

/// Splits a compact result token.
///
/// Returns `None` for the column header so the row can be skipped. Any other
/// token yields an outcome, empty where the token could not be read.
pub fn parse_result(token: &str) -> Option<GameOutcome> {
    let token = token.trim();
    if token.eq_ignore_ascii_case(HEADER_TOKEN) {
        return None;
    }

    let Some(caps) = RESULT.captures(token) else {
        debug!("Unrecognised result token {token:?}");
        return Some(GameOutcome::unknown());
    };

    let home_score = caps["home"].parse::<u32>().ok();
    let away_score = caps["away"].parse::<u32>().ok();
    Some(GameOutcome {
        result: Some(if &caps["kind"] == "W" {
            ResultKind::Win
        } else {
            ResultKind::Loss
        }),
        score: home_score
            .zip(away_score)
            .map(|(home, away)| format!("{home}-{away}")),
        home_score,
        away_score,
        overtime: caps.name("ot").is_some(),
    })
}

fn month_day(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    // Weekdays are dropped: they only agree with one of the candidate years.
    let month_day = raw.split_once(',').map_or(raw, |(_, rest)| rest).trim();
    (!month_day.is_empty()).then_some(month_day)
}

fn on_year(month_day: &str, year: i32) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{month_day} {year}"), "%b %d %Y").ok()
}

/// Reads a year-less `"Fri, Nov 8"` style date of a played game.
///
/// The year is taken from `today`; a result that lands after `today` belongs
/// to the previous year.
pub fn parse_schedule_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let month_day = month_day(raw)?;

    match on_year(month_day, today.year()) {
        Some(date) if date > today => on_year(month_day, today.year() - 1),
        Some(date) => Some(date),
        // Feb 29 of a non-leap current year.
        None => on_year(month_day, today.year() - 1).filter(|date| *date <= today),
    }
}

/// Same as [`parse_schedule_date`] for a game still to be played, which
/// rolls forward into next year instead.
pub fn parse_upcoming_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let month_day = month_day(raw)?;

    on_year(month_day, today.year())
        .filter(|date| *date >= today)
        .or_else(|| on_year(month_day, today.year() + 1))
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn split_opponent(raw: &str) -> (String, Option<bool>) {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix("vs") {
        (rest.trim().to_string(), Some(true))
    } else if let Some(rest) = raw.strip_prefix('@') {
        (rest.trim().to_string(), Some(false))
    } else {
        (raw.to_string(), None)
    }
}

pub fn game_id_from_link(href: &str) -> Option<String> {
    GAME_ID.captures(href).map(|caps| caps[1].to_string())
}

/// Where a section's result and record live, read off its header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    result: Option<usize>,
    record: Option<usize>,
}

impl Columns {
    /// Layout of played games, assumed until a header row says otherwise.
    const PLAYED: Self = Self {
        result: Some(2),
        record: Some(3),
    };

    fn from_header(labels: &[String]) -> Option<Self> {
        let is_header = labels
            .iter()
            .any(|label| HEADER_LABELS.iter().any(|known| label.eq_ignore_ascii_case(known)));
        if !is_header {
            return None;
        }

        let at = |wanted: &str| labels.iter().position(|label| label.eq_ignore_ascii_case(wanted));
        Some(Self {
            result: at(HEADER_TOKEN),
            record: at(RECORD_LABEL),
        })
    }
}

pub struct ScheduleParser {
    pub today: NaiveDate,
    /// Game pages live at `{game_base}/{game_id}`.
    pub game_base: String,
}

impl ScheduleParser {
    fn parse_row(
        &self,
        cells: &[ElementRef<'_>],
        labels: &[String],
        columns: Columns,
    ) -> Option<ScheduleEntry> {
        if cells.len() < 3 {
            return None;
        }

        let (outcome, date) = match columns.result {
            Some(at) => (
                parse_result(labels.get(at)?)?,
                parse_schedule_date(&labels[0], self.today),
            ),
            None => (GameOutcome::unknown(), parse_upcoming_date(&labels[0], self.today)),
        };
        let (opponent, home) = split_opponent(&labels[1]);
        let game_id = cells
            .iter()
            .flat_map(|cell| cell.select(&LINK))
            .filter_map(|link| link.value().attr("href"))
            .find_map(game_id_from_link);

        Some(ScheduleEntry {
            date,
            opponent,
            home,
            outcome,
            record: columns
                .record
                .and_then(|at| labels.get(at))
                .filter(|record| !record.is_empty())
                .cloned(),
            game_url: game_id
                .as_ref()
                .map(|id| format!("{}/{id}", self.game_base)),
            game_id,
        })
    }
}

impl PageParser for ScheduleParser {
    type Output = Vec<ScheduleEntry>;

    fn parse(&self, document: &Html) -> Result<Vec<ScheduleEntry>> {
        let mut columns = Columns::PLAYED;
        let mut games = Vec::new();

        for row in document.select(&ROW) {
            let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
            let labels: Vec<String> = cells.iter().map(cell_text).collect();

            if let Some(header) = Columns::from_header(&labels) {
                debug!("Schedule section columns: {header:?}");
                columns = header;
                continue;
            }
            games.extend(self.parse_row(&cells, &labels, columns));
        }

        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn win_token_is_exploded() {
        let outcome = parse_result("W78-65").unwrap();
        assert_eq!(outcome.result, Some(ResultKind::Win));
        assert_eq!(outcome.home_score, Some(78));
        assert_eq!(outcome.away_score, Some(65));
        assert_eq!(outcome.score.as_deref(), Some("78-65"));
        assert!(!outcome.overtime);
    }

    #[test]
    fn overtime_loss_is_flagged() {
        let outcome = parse_result("L60-58 OT").unwrap();
        assert_eq!(outcome.result, Some(ResultKind::Loss));
        assert_eq!(outcome.home_score, Some(60));
        assert_eq!(outcome.away_score, Some(58));
        assert!(outcome.overtime);
        assert!(parse_result("W 101-99 2OT").unwrap().overtime);
    }

    #[test]
    fn header_is_skipped_and_garbage_is_empty() {
        assert_eq!(parse_result("RESULT"), None);
        assert_eq!(parse_result("Postponed"), Some(GameOutcome::unknown()));
    }

    #[test]
    fn future_dates_roll_back_a_year() {
        let today = day(2025, 3, 10);
        assert_eq!(parse_schedule_date("Fri, Nov 8", today), Some(day(2024, 11, 8)));
        assert_eq!(parse_schedule_date("Sat, Jan 4", today), Some(day(2025, 1, 4)));
        assert_eq!(parse_schedule_date("Mar 10", today), Some(day(2025, 3, 10)));
        assert_eq!(parse_schedule_date("DATE", today), None);
        assert_eq!(parse_schedule_date("", today), None);
    }

    #[test]
    fn schedule_rows_are_extracted() {
        let page = r#"
            <table>
              <tr><td colspan="4">Regular Season</td></tr>
              <tr><td>DATE</td><td>OPPONENT</td><td>RESULT</td><td>W-L</td></tr>
              <tr>
                <td>Fri, Nov 8</td>
                <td><span>vs</span><span><a href="/nba/team/_/name/bkn">Brooklyn</a></span></td>
                <td><span>W</span><span><a href="https://www.espn.com/nba/game/_/gameId/401704900/nets-celtics">108-104</a></span></td>
                <td>9-1</td>
              </tr>
              <tr>
                <td>Sun, Nov 10</td>
                <td><span>@</span><span>Milwaukee</span></td>
                <td><span>L</span><span><a href="/nba/game/_/gameId/401704911">113-107 OT</a></span></td>
                <td>9-2</td>
              </tr>
            </table>"#;
        let parser = ScheduleParser {
            today: day(2025, 3, 1),
            game_base: "https://www.espn.com/nba/game/_/gameId".into(),
        };
        let games = parser.parse(&Html::parse_document(page)).unwrap();

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].opponent, "Brooklyn");
        assert_eq!(games[0].home, Some(true));
        assert_eq!(games[0].date, Some(day(2024, 11, 8)));
        assert_eq!(games[0].game_id.as_deref(), Some("401704900"));
        assert_eq!(
            games[0].game_url.as_deref(),
            Some("https://www.espn.com/nba/game/_/gameId/401704900")
        );
        assert_eq!(games[1].home, Some(false));
        assert!(games[1].outcome.overtime);
        assert_eq!(games[1].record.as_deref(), Some("9-2"));
    }

    #[test]
    fn upcoming_section_has_no_result_or_record() {
        let page = r#"
            <table>
              <tr><td>DATE</td><td>OPPONENT</td><td>RESULT</td><td>W-L</td><td>Hi Points</td></tr>
              <tr>
                <td>Fri, Feb 28</td>
                <td><span>vs</span><span>Detroit</span></td>
                <td><span>W</span><span><a href="/nba/game/_/gameId/401705400">115-111</a></span></td>
                <td>44-15</td>
                <td>Tatum 32</td>
              </tr>
              <tr><td>DATE</td><td>OPPONENT</td><td>TIME</td><td>TV</td><td>tickets</td></tr>
              <tr>
                <td>Wed, Mar 12</td>
                <td><span>vs</span><span><a href="/nba/team/_/name/bkn">Brooklyn</a></span></td>
                <td><a href="/nba/game/_/gameId/401705512">7:30 PM</a></td>
                <td>ESPN</td>
                <td>Tickets as low as $45</td>
              </tr>
              <tr>
                <td>Thu, Jan 8</td>
                <td><span>@</span><span>Utah</span></td>
                <td>9:00 PM</td>
                <td></td>
                <td></td>
              </tr>
            </table>"#;
        let parser = ScheduleParser {
            today: day(2025, 3, 1),
            game_base: "https://www.espn.com/nba/game/_/gameId".into(),
        };
        let games = parser.parse(&Html::parse_document(page)).unwrap();

        assert_eq!(games.len(), 3);
        assert!(games.iter().all(|game| game.opponent != "OPPONENT"));

        assert_eq!(games[0].record.as_deref(), Some("44-15"));
        assert_eq!(games[0].date, Some(day(2025, 2, 28)));

        let brooklyn = &games[1];
        assert_eq!(brooklyn.opponent, "Brooklyn");
        assert_eq!(brooklyn.outcome, GameOutcome::unknown());
        assert_eq!(brooklyn.record, None);
        assert_eq!(brooklyn.date, Some(day(2025, 3, 12)));
        assert_eq!(brooklyn.game_id.as_deref(), Some("401705512"));

        assert_eq!(games[2].date, Some(day(2026, 1, 8)));
        assert_eq!(games[2].home, Some(false));
    }
}
