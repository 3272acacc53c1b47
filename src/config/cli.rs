use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Address the HTTP server listens on
    #[arg(long, env = "COURTSIDE_BIND", default_value = "0.0.0.0:8000")]
    pub bind: String,

    /// Log level or filter directive (error, warn, info, debug, trace)
    #[arg(long, env = "COURTSIDE_LOG", default_value = "info")]
    pub log_level: String,

    /// Season served by `/players/{name}` when no year is given
    #[arg(long, default_value_t = 2025)]
    pub default_season: u16,

    /// Timeout applied to box score fetches, in seconds
    #[arg(long, default_value_t = 10)]
    pub box_score_timeout_secs: u64,

    /// Base URL of the college basketball reference site
    #[arg(
        long,
        env = "COURTSIDE_REFERENCE_BASE",
        default_value = "https://www.sports-reference.com/cbb"
    )]
    pub reference_base: String,

    /// Base URL of the ESPN NBA pages
    #[arg(long, env = "COURTSIDE_ESPN_BASE", default_value = "https://www.espn.com/nba")]
    pub espn_base: String,

    /// Base URL of the ESPN summary API used for play-by-play
    #[arg(
        long,
        env = "COURTSIDE_ESPN_API_BASE",
        default_value = "https://site.api.espn.com/apis/site/v2/sports/basketball/nba"
    )]
    pub espn_api_base: String,
}
