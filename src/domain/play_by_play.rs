use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Play {
    pub period: Option<u32>,
    pub clock: Option<String>,
    pub description: String,
    pub team: Option<String>,
    /// Running score keyed by each side's abbreviation.
    pub score: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlayByPlay {
    Available {
        game_id: String,
        home: String,
        away: String,
        plays: Vec<Play>,
    },
    NoData {
        game_id: String,
        message: String,
    },
}

impl PlayByPlay {
    pub fn no_data(game_id: impl Into<String>) -> Self {
        Self::NoData {
            game_id: game_id.into(),
            message: "No play-by-play data available".to_string(),
        }
    }
}
