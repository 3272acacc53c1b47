use crate::config::cli::Args;
use crate::error::Result;
use clap::Parser;
use reqwest::Client;
use std::time::Duration;

pub(crate) mod cli;

/// Where each upstream page lives. Kept separate from `Args` so tests can
/// point the scrapers at a local server.
#[derive(Debug, Clone)]
pub struct Sources {
    pub reference_base: String,
    pub espn_base: String,
    pub espn_api_base: String,
}

impl Sources {
    pub fn player_page(&self, slug: &str) -> String {
        format!("{}/players/{slug}.html", self.reference_base)
    }

    pub fn school_stats_page(&self, year: u16) -> String {
        format!(
            "{}/seasons/men/{year}-school-stats.html",
            self.reference_base
        )
    }

    pub fn schedule_page(&self, team_slug: &str) -> String {
        format!("{}/team/schedule/_/name/{team_slug}", self.espn_base)
    }

    pub fn team_page(&self, team_slug: &str) -> String {
        format!("{}/team/_/name/{team_slug}", self.espn_base)
    }

    pub fn game_base(&self) -> String {
        format!("{}/game/_/gameId", self.espn_base)
    }

    pub fn box_score_page(&self, game_id: &str) -> String {
        format!("{}/boxscore/_/gameId/{game_id}", self.espn_base)
    }

    pub fn summary_api(&self, game_id: &str) -> String {
        format!("{}/summary?event={game_id}", self.espn_api_base)
    }
}

impl From<&Args> for Sources {
    fn from(args: &Args) -> Self {
        Self {
            reference_base: args.reference_base.trim_end_matches('/').to_string(),
            espn_base: args.espn_base.trim_end_matches('/').to_string(),
            espn_api_base: args.espn_api_base.trim_end_matches('/').to_string(),
        }
    }
}

pub struct Config {
    pub args: Args,
    pub sources: Sources,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        // No client-wide timeout: only the box score fetch is bounded.
        let http_client = Client::builder()
            .user_agent(concat!("courtside/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let sources = Sources::from(&args);

        Ok(Self {
            args,
            sources,
            http_client,
        })
    }

    pub fn box_score_timeout(&self) -> Duration {
        Duration::from_secs(self.args.box_score_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_and_build_urls() {
        let args = Args::parse_from(["courtside"]);
        assert_eq!(args.default_season, 2025);

        let sources = Sources::from(&args);
        assert_eq!(
            sources.player_page("zion-williamson-1"),
            "https://www.sports-reference.com/cbb/players/zion-williamson-1.html"
        );
        assert_eq!(
            sources.summary_api("401585601"),
            "https://site.api.espn.com/apis/site/v2/sports/basketball/nba/summary?event=401585601"
        );
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let args = Args::parse_from(["courtside", "--espn-base", "http://127.0.0.1:9000/nba/"]);
        let sources = Sources::from(&args);
        assert_eq!(
            sources.schedule_page("bos"),
            "http://127.0.0.1:9000/nba/team/schedule/_/name/bos"
        );
    }
}
