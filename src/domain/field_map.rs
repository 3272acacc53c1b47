//! Static translation tables from source `data-stat` codes to the keys
//! exposed by the API.
//!
//! Each normalized key appears once per map. Codes that name the same
//! concept in different page revisions (`g` and `games`, say) are listed
//! together on that key's entry.

use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug)]
pub struct FieldEntry {
    pub key: &'static str,
    pub codes: &'static [&'static str],
}

#[derive(Debug)]
pub struct FieldMap {
    pub name: &'static str,
    pub version: u32,
    entries: &'static [FieldEntry],
    lookup: Lazy<HashMap<&'static str, &'static str>>,
}

impl FieldMap {
    pub fn key_for(&self, code: &str) -> Option<&'static str> {
        self.lookup.get(code).copied()
    }

    pub fn entries(&self) -> &'static [FieldEntry] {
        self.entries
    }

    pub fn label(&self) -> String {
        format!("{} v{}", self.name, self.version)
    }
}

/// What the mapper does with a source code the map does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmappedPolicy {
    /// Keep the cell, using the raw code as its key.
    PassThrough,
    /// Skip the cell.
    Drop,
}

fn index(map: &FieldMap) -> HashMap<&'static str, &'static str> {
    map.entries
        .iter()
        .flat_map(|entry| entry.codes.iter().map(move |code| (*code, entry.key)))
        .collect()
}

macro_rules! field_map {
    ($name:ident, $label:literal, $version:literal, [$($key:literal => [$($code:literal),+ $(,)?]),+ $(,)?]) => {
        pub static $name: FieldMap = FieldMap {
            name: $label,
            version: $version,
            entries: &[$(FieldEntry { key: $key, codes: &[$($code),+] }),+],
            lookup: Lazy::new(|| index(&$name)),
        };
    };
}

field_map!(PLAYER_PER_GAME, "player_per_game", 2, [
    "season" => ["year_id", "season"],
    "team" => ["team_name_abbr", "school_name", "team_id"],
    "conference" => ["conf_abbr"],
    "class" => ["class"],
    "position" => ["pos"],
    "games" => ["g", "games"],
    "games_started" => ["gs", "games_started"],
    "minutes_per_game" => ["mp_per_g"],
    "field_goals_per_game" => ["fg_per_g"],
    "field_goal_attempts_per_game" => ["fga_per_g"],
    "field_goal_pct" => ["fg_pct"],
    "two_pointers_per_game" => ["fg2_per_g"],
    "two_point_attempts_per_game" => ["fg2a_per_g"],
    "two_point_pct" => ["fg2_pct"],
    "three_pointers_per_game" => ["fg3_per_g"],
    "three_point_attempts_per_game" => ["fg3a_per_g"],
    "three_point_pct" => ["fg3_pct"],
    "effective_fg_pct" => ["efg_pct"],
    "free_throws_per_game" => ["ft_per_g"],
    "free_throw_attempts_per_game" => ["fta_per_g"],
    "free_throw_pct" => ["ft_pct"],
    "offensive_rebounds_per_game" => ["orb_per_g"],
    "defensive_rebounds_per_game" => ["drb_per_g"],
    "rebounds_per_game" => ["trb_per_g"],
    "assists_per_game" => ["ast_per_g"],
    "steals_per_game" => ["stl_per_g"],
    "blocks_per_game" => ["blk_per_g"],
    "turnovers_per_game" => ["tov_per_g"],
    "fouls_per_game" => ["pf_per_g"],
    "points_per_game" => ["pts_per_g"],
    "awards" => ["awards"],
]);

field_map!(PLAYER_TOTALS, "player_totals", 2, [
    "season" => ["year_id", "season"],
    "team" => ["team_name_abbr", "school_name", "team_id"],
    "conference" => ["conf_abbr"],
    "class" => ["class"],
    "position" => ["pos"],
    "games" => ["g", "games"],
    "games_started" => ["gs", "games_started"],
    "minutes" => ["mp"],
    "field_goals" => ["fg"],
    "field_goal_attempts" => ["fga"],
    "field_goal_pct" => ["fg_pct"],
    "two_pointers" => ["fg2"],
    "two_point_attempts" => ["fg2a"],
    "two_point_pct" => ["fg2_pct"],
    "three_pointers" => ["fg3"],
    "three_point_attempts" => ["fg3a"],
    "three_point_pct" => ["fg3_pct"],
    "effective_fg_pct" => ["efg_pct"],
    "free_throws" => ["ft"],
    "free_throw_attempts" => ["fta"],
    "free_throw_pct" => ["ft_pct"],
    "offensive_rebounds" => ["orb"],
    "defensive_rebounds" => ["drb"],
    "rebounds" => ["trb"],
    "assists" => ["ast"],
    "steals" => ["stl"],
    "blocks" => ["blk"],
    "turnovers" => ["tov"],
    "fouls" => ["pf"],
    "points" => ["pts"],
    "awards" => ["awards"],
]);

/// Headline career numbers, keyed by their display labels.
field_map!(PLAYER_SUMMARY, "player_summary", 1, [
    "PTS" => ["pts_per_g"],
    "AST" => ["ast_per_g"],
    "REB" => ["trb_per_g"],
    "FG%" => ["fg_pct"],
    "3P%" => ["fg3_pct"],
    "Total Points" => ["pts"],
]);

field_map!(TEAM_SEASON, "team_season", 1, [
    "rank" => ["ranker"],
    "school" => ["school_name"],
    "games" => ["g", "games"],
    "wins" => ["wins"],
    "losses" => ["losses"],
    "win_loss_pct" => ["win_loss_pct"],
    "simple_rating_system" => ["srs"],
    "strength_of_schedule" => ["sos"],
    "conference_wins" => ["wins_conf"],
    "conference_losses" => ["losses_conf"],
    "home_wins" => ["wins_home"],
    "home_losses" => ["losses_home"],
    "away_wins" => ["wins_visitor"],
    "away_losses" => ["losses_visitor"],
    "points_for" => ["pts"],
    "points_against" => ["opp_pts"],
    "minutes" => ["mp"],
    "field_goals" => ["fg"],
    "field_goal_attempts" => ["fga"],
    "field_goal_pct" => ["fg_pct"],
    "three_pointers" => ["fg3"],
    "three_point_attempts" => ["fg3a"],
    "three_point_pct" => ["fg3_pct"],
    "free_throws" => ["ft"],
    "free_throw_attempts" => ["fta"],
    "free_throw_pct" => ["ft_pct"],
    "offensive_rebounds" => ["orb"],
    "rebounds" => ["trb"],
    "assists" => ["ast"],
    "steals" => ["stl"],
    "blocks" => ["blk"],
    "turnovers" => ["tov"],
    "fouls" => ["pf"],
    "pace" => ["pace"],
    "offensive_rating" => ["off_rtg"],
    "free_throw_rate" => ["fta_per_fga_pct"],
    "three_point_attempt_rate" => ["fg3a_per_fga_pct"],
    "true_shooting_pct" => ["ts_pct"],
    "rebound_pct" => ["trb_pct"],
    "assist_pct" => ["ast_pct"],
    "steal_pct" => ["stl_pct"],
    "block_pct" => ["blk_pct"],
    "effective_fg_pct" => ["efg_pct"],
    "turnover_pct" => ["tov_pct"],
    "offensive_rebound_pct" => ["orb_pct"],
    "free_throws_per_fga" => ["ft_rate"],
]);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_unique(map: &FieldMap) {
        let mut keys = HashSet::new();
        let mut codes = HashSet::new();
        for entry in map.entries() {
            assert!(keys.insert(entry.key), "{}: duplicate key {}", map.name, entry.key);
            for code in entry.codes {
                assert!(codes.insert(*code), "{}: duplicate code {}", map.name, code);
            }
        }
    }

    #[test]
    fn normalized_keys_are_unique_within_each_map() {
        assert_unique(&PLAYER_PER_GAME);
        assert_unique(&PLAYER_TOTALS);
        assert_unique(&PLAYER_SUMMARY);
        assert_unique(&TEAM_SEASON);
    }

    #[test]
    fn synonyms_resolve_to_the_same_key() {
        assert_eq!(PLAYER_TOTALS.key_for("g"), Some("games"));
        assert_eq!(PLAYER_TOTALS.key_for("games"), Some("games"));
        assert_eq!(PLAYER_PER_GAME.key_for("pts_per_g"), Some("points_per_game"));
        assert_eq!(TEAM_SEASON.key_for("ranker"), Some("rank"));
        assert_eq!(TEAM_SEASON.key_for("unknown_code"), None);
    }
}
