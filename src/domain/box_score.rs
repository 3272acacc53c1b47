use serde::Serialize;
use std::collections::BTreeMap;

/// Players listed before this index in a team table are the starters.
pub const STARTER_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerLine {
    pub name: String,
    pub position: Option<String>,
    pub minutes: Option<u32>,
    /// Counting stats keyed by lowercase column label (`pts`, `reb`, `fg`, ...).
    pub stats: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamBox {
    pub team: Option<String>,
    pub starters: Vec<PlayerLine>,
    pub bench: Vec<PlayerLine>,
}

impl TeamBox {
    pub fn from_players(team: Option<String>, mut players: Vec<PlayerLine>) -> Self {
        let bench = if players.len() > STARTER_COUNT {
            players.split_off(STARTER_COUNT)
        } else {
            Vec::new()
        };
        Self {
            team,
            starters: players,
            bench,
        }
    }

    pub fn player_count(&self) -> usize {
        self.starters.len() + self.bench.len()
    }
}

/// Best-effort data recovered from page metadata. Any part may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxScore {
    pub game_id: String,
    pub summary: GameSummary,
    pub teams: Vec<TeamBox>,
}
