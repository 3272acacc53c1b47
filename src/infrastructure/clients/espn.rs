use crate::domain::{Play, PlayByPlay};
use crate::error::Result;
use crate::infrastructure::fetcher::{browser_headers, DocumentFetcher, FetchRequest};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
struct Side {
    id: Option<String>,
    abbreviation: String,
    name: Option<String>,
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_count(value: Option<&Value>) -> u32 {
    value
        .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

fn side_from(competitor: &Value, fallback: &str) -> Side {
    let team = competitor.get("team").unwrap_or(&Value::Null);
    Side {
        id: team
            .get("id")
            .or_else(|| competitor.get("id"))
            .and_then(as_text),
        abbreviation: team
            .get("abbreviation")
            .and_then(Value::as_str)
            .unwrap_or(fallback)
            .to_string(),
        name: team
            .get("displayName")
            .or_else(|| team.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Home and away sides from the summary header. A side without a
/// `homeAway` flag is whichever competitor the other side did not take;
/// with no flags at all they are taken in order, home first.
fn sides(summary: &Value) -> (Side, Side) {
    let competitors = summary
        .pointer("/header/competitions/0/competitors")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let flagged = |flag: &str| {
        competitors
            .iter()
            .position(|c| c.get("homeAway").and_then(Value::as_str) == Some(flag))
    };
    let other_than = |taken: usize| (0..competitors.len()).find(|&at| at != taken);

    let (home_at, away_at) = match (flagged("home"), flagged("away")) {
        (Some(home), Some(away)) => (Some(home), Some(away)),
        (Some(home), None) => (Some(home), other_than(home)),
        (None, Some(away)) => (other_than(away), Some(away)),
        (None, None) => (
            (!competitors.is_empty()).then_some(0),
            (competitors.len() > 1).then_some(1),
        ),
    };

    let home = home_at.map(|at| side_from(&competitors[at], "HOME"));
    let away = away_at.map(|at| side_from(&competitors[at], "AWAY"));

    let placeholder = |abbreviation: &str| Side {
        id: None,
        abbreviation: abbreviation.to_string(),
        name: None,
    };
    (
        home.unwrap_or_else(|| placeholder("HOME")),
        away.unwrap_or_else(|| placeholder("AWAY")),
    )
}

/// Builds the ordered play list from an ESPN game summary payload.
pub fn parse_play_by_play(game_id: &str, summary: &Value) -> PlayByPlay {
    let Some(raw_plays) = summary.get("plays").and_then(Value::as_array) else {
        warn!("Summary for game {game_id} has no plays");
        return PlayByPlay::no_data(game_id);
    };

    let (home, away) = sides(summary);
    let names: HashMap<String, String> = [&home, &away]
        .into_iter()
        .filter_map(|side| Some((side.id.clone()?, side.name.clone()?)))
        .collect();

    let plays = raw_plays
        .iter()
        .map(|play| {
            let team = play
                .pointer("/team/id")
                .and_then(as_text)
                .and_then(|id| names.get(&id).cloned());
            let score = BTreeMap::from([
                (home.abbreviation.clone(), as_count(play.get("homeScore"))),
                (away.abbreviation.clone(), as_count(play.get("awayScore"))),
            ]);
            Play {
                period: play
                    .pointer("/period/number")
                    .and_then(Value::as_u64)
                    .and_then(|n| u32::try_from(n).ok()),
                clock: play
                    .pointer("/clock/displayValue")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                description: play
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                team,
                score,
            }
        })
        .collect();

    PlayByPlay::Available {
        game_id: game_id.to_string(),
        home: home.abbreviation,
        away: away.abbreviation,
        plays,
    }
}

pub struct EspnClient {
    fetcher: DocumentFetcher,
}

impl EspnClient {
    pub fn new(fetcher: DocumentFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn play_by_play(&self, summary_url: String, game_id: &str) -> Result<PlayByPlay> {
        let summary = self
            .fetcher
            .fetch_json(FetchRequest::new(summary_url).headers(browser_headers()))
            .await?;
        let result = parse_play_by_play(game_id, &summary);
        if let PlayByPlay::Available { plays, .. } = &result {
            info!("Game {game_id}: {} plays", plays.len());
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary() -> Value {
        json!({
            "header": {"competitions": [{"competitors": [
                {"homeAway": "away", "team": {"id": "18", "abbreviation": "NY", "displayName": "New York Knicks"}},
                {"homeAway": "home", "team": {"id": "2", "abbreviation": "BOS", "displayName": "Boston Celtics"}}
            ]}]},
            "plays": [
                {"period": {"number": 1}, "clock": {"displayValue": "12:00"}, "text": "Jump ball", "homeScore": 0, "awayScore": 0},
                {"period": {"number": 1}, "clock": {"displayValue": "11:41"}, "text": "Jayson Tatum makes 26-foot three point jumper",
                 "team": {"id": "2"}, "homeScore": 3, "awayScore": 0},
                {"period": {"number": 1}, "clock": {"displayValue": "11:20"}, "text": "Jalen Brunson makes driving layup",
                 "team": {"id": "18"}, "homeScore": 3, "awayScore": 2}
            ]
        })
    }

    #[test]
    fn plays_carry_running_score_by_abbreviation() {
        let PlayByPlay::Available { home, away, plays, .. } = parse_play_by_play("401656359", &summary()) else {
            panic!("expected plays");
        };
        assert_eq!((home.as_str(), away.as_str()), ("BOS", "NY"));
        assert_eq!(plays.len(), 3);

        let tatum = &plays[1];
        assert_eq!(tatum.period, Some(1));
        assert_eq!(tatum.clock.as_deref(), Some("11:41"));
        assert_eq!(tatum.team.as_deref(), Some("Boston Celtics"));
        assert_eq!(tatum.score["BOS"], 3);
        assert_eq!(tatum.score["NY"], 0);

        assert_eq!(plays[0].team, None);
        assert_eq!(plays[2].team.as_deref(), Some("New York Knicks"));
    }

    #[test]
    fn competitors_without_flags_are_positional() {
        let mut payload = summary();
        for competitor in payload
            .pointer_mut("/header/competitions/0/competitors")
            .unwrap()
            .as_array_mut()
            .unwrap()
        {
            competitor.as_object_mut().unwrap().remove("homeAway");
        }
        let PlayByPlay::Available { home, away, .. } = parse_play_by_play("1", &payload) else {
            panic!("expected plays");
        };
        assert_eq!((home.as_str(), away.as_str()), ("NY", "BOS"));
    }

    #[test]
    fn missing_plays_is_no_data_not_an_error() {
        let result = parse_play_by_play("401656359", &json!({"header": {}}));
        assert_eq!(result, PlayByPlay::no_data("401656359"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["message"], "No play-by-play data available");
    }

    #[test]
    fn single_flag_leaves_the_other_competitor_for_the_other_side() {
        let mut payload = summary();
        payload
            .pointer_mut("/header/competitions/0/competitors/0")
            .unwrap()
            .as_object_mut()
            .unwrap()
            .remove("homeAway");
        payload["plays"] = json!([{"text": "Layup", "homeScore": 5, "awayScore": 3}]);

        let PlayByPlay::Available { home, away, plays, .. } = parse_play_by_play("1", &payload) else {
            panic!("expected plays");
        };
        assert_eq!((home.as_str(), away.as_str()), ("BOS", "NY"));
        assert_eq!(plays[0].score["BOS"], 5);
        assert_eq!(plays[0].score["NY"], 3);
    }

    #[test]
    fn lone_away_flag_at_the_front_still_resolves_home() {
        let mut payload = summary();
        payload
            .pointer_mut("/header/competitions/0/competitors/1")
            .unwrap()
            .as_object_mut()
            .unwrap()
            .remove("homeAway");

        let PlayByPlay::Available { home, away, .. } = parse_play_by_play("1", &payload) else {
            panic!("expected plays");
        };
        assert_eq!((home.as_str(), away.as_str()), ("BOS", "NY"));
    }
}
