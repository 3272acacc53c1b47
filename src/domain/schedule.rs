use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResultKind {
    Win,
    Loss,
}

/// Exploded form of a compact result token such as `W78-65` or `L60-58 OT`.
///
/// A token that does not have that shape still yields an outcome, with the
/// fields it could not fill left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameOutcome {
    pub result: Option<ResultKind>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub score: Option<String>,
    pub overtime: bool,
}

impl GameOutcome {
    pub fn unknown() -> Self {
        Self {
            result: None,
            home_score: None,
            away_score: None,
            score: None,
            overtime: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    pub date: Option<NaiveDate>,
    pub opponent: String,
    pub home: Option<bool>,
    pub outcome: GameOutcome,
    pub record: Option<String>,
    pub game_id: Option<String>,
    pub game_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSchedule {
    pub team: String,
    pub franchise_seasons: Option<u32>,
    pub games: Vec<ScheduleEntry>,
}
