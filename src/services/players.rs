use crate::config::Sources;
use crate::domain::field_map::{PLAYER_PER_GAME, PLAYER_SUMMARY, PLAYER_TOTALS};
use crate::domain::slug::{self, Disambiguation};
use crate::domain::{Identifier, StatRecord, UnmappedPolicy};
use crate::error::Result;
use crate::infrastructure::{
    extract, DocumentFetcher, FetchRequest, RowKey, SeasonKey, StatTableParser, TableVariant,
};
use serde::Serialize;
use tracing::{info, warn};

/// Shown for a summary label the page has no cell for.
const NOT_AVAILABLE: &str = "N/A";

fn totals_first() -> Vec<TableVariant> {
    vec![
        TableVariant {
            id: "players_totals",
            map: &PLAYER_TOTALS,
        },
        TableVariant {
            id: "players_per_game",
            map: &PLAYER_PER_GAME,
        },
    ]
}

#[derive(Debug, Serialize)]
pub struct PlayerStats {
    pub player: String,
    pub disambiguation: Disambiguation,
    pub season: String,
    pub source_table: String,
    pub stats: StatRecord,
}

/// Headline numbers for one player, every label always present.
#[derive(Debug, Serialize)]
pub struct PlayerSummary {
    pub player: String,
    pub slug: String,
    pub stats: StatRecord,
}

pub struct PlayerService {
    fetcher: DocumentFetcher,
    sources: Sources,
    default_season: u16,
}

impl PlayerService {
    pub fn new(fetcher: DocumentFetcher, sources: Sources, default_season: u16) -> Self {
        info!("Created player service (default season {default_season})");
        Self {
            fetcher,
            sources,
            default_season,
        }
    }

    async fn lookup(
        &self,
        identifier: &Identifier<'_>,
        season: SeasonKey,
        variants: Vec<TableVariant>,
        policy: UnmappedPolicy,
    ) -> Result<PlayerStats> {
        let slug = slug::normalize(identifier);
        if slug.is_guess() {
            warn!(
                "Assuming suffix -{} for {:?}; pass an index if this is the wrong player",
                slug::DEFAULT_SUFFIX,
                identifier.name
            );
        }

        let document = self
            .fetcher
            .fetch(FetchRequest::new(self.sources.player_page(slug.as_str())))
            .await?;
        let parser = StatTableParser {
            variants,
            row: RowKey::Season(season),
            policy,
        };
        let line = extract(&parser, document)?;

        let mut stats = line.record;
        if let Some(seasons) = line.seasons_played {
            stats.insert("seasons_played", Some(i64::from(seasons).into()));
        }

        Ok(PlayerStats {
            player: slug.to_string(),
            disambiguation: slug.disambiguation(),
            season: season.to_string(),
            source_table: line.table_id,
            stats,
        })
    }

    /// Totals for the configured current season.
    pub async fn latest(&self, identifier: &Identifier<'_>) -> Result<PlayerStats> {
        self.season(identifier, self.default_season).await
    }

    pub async fn season(&self, identifier: &Identifier<'_>, year: u16) -> Result<PlayerStats> {
        self.lookup(
            identifier,
            SeasonKey::Year(year),
            totals_first(),
            UnmappedPolicy::PassThrough,
        )
        .await
    }

    /// Career row plus `seasons_played`, with empty fields removed.
    pub async fn career_totals(&self, identifier: &Identifier<'_>) -> Result<PlayerStats> {
        let mut career = self
            .lookup(
                identifier,
                SeasonKey::Career,
                totals_first(),
                UnmappedPolicy::PassThrough,
            )
            .await?;
        career.stats = career.stats.without_missing();
        Ok(career)
    }

    /// Career row of the per-game table under display labels. Labels with
    /// no value on the page read `"N/A"`.
    pub async fn summary(&self, identifier: &Identifier<'_>) -> Result<PlayerSummary> {
        let per_game = vec![TableVariant {
            id: "players_per_game",
            map: &PLAYER_SUMMARY,
        }];
        let career = self
            .lookup(identifier, SeasonKey::Career, per_game, UnmappedPolicy::Drop)
            .await?;

        let mut stats = StatRecord::new();
        for entry in PLAYER_SUMMARY.entries() {
            let value = career
                .stats
                .get(entry.key)
                .cloned()
                .flatten()
                .unwrap_or_else(|| NOT_AVAILABLE.into());
            stats.insert(entry.key, Some(value));
        }

        Ok(PlayerSummary {
            player: identifier.name.to_string(),
            slug: career.player,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatValue;
    use crate::error::ScrapeError;
    use crate::infrastructure::fetcher::tests::serve;
    use axum::routing::get;
    use axum::Router;
    use reqwest::Client;

    const PAGE: &str = r#"<html><body>
        <table id="players_per_game"><tbody>
          <tr id="players_per_game.2024"><th data-stat="year_id">2023-24</th><td data-stat="g">32</td><td data-stat="pts_per_g">31.6</td></tr>
        </tbody>
        <tfoot><tr id="players_per_game.Career"><th data-stat="year_id">Career</th><td data-stat="pts_per_g">28.4</td><td data-stat="ast_per_g">8.2</td><td data-stat="trb_per_g"></td><td data-stat="fg_pct">.466</td></tr></tfoot>
        </table>
        <!-- <table id="players_totals">
          <tbody>
            <tr id="players_totals.2021"><th data-stat="year_id">2020-21</th><td data-stat="g">30</td><td data-stat="pts">799</td><td data-stat="awards"></td></tr>
            <tr id="players_totals.2022"><th data-stat="year_id">2021-22</th><td data-stat="g">33</td><td data-stat="pts">863</td><td data-stat="awards">AA-1</td></tr>
            <tr id="players_totals.2023"><th data-stat="year_id">2022-23</th><td data-stat="g">38</td><td data-stat="pts">1055</td><td data-stat="awards"></td></tr>
          </tbody>
          <tfoot><tr id="players_totals.Career"><th data-stat="year_id">Career</th><td data-stat="g">101</td><td data-stat="pts">2717</td><td data-stat="awards"></td><td data-stat="extra_col">x</td></tr></tfoot>
        </table> -->
        </body></html>"#;

    async fn service() -> PlayerService {
        let base = serve(
            Router::new()
                .route("/players/caitlin-clark-1.html", get(|| async { axum::response::Html(PAGE) })),
        )
        .await;
        let sources = Sources {
            reference_base: base,
            espn_base: String::new(),
            espn_api_base: String::new(),
        };
        PlayerService::new(DocumentFetcher::new(Client::new()), sources, 2023)
    }

    #[tokio::test]
    async fn career_totals_counts_seasons_and_drops_nulls() {
        let service = service().await;
        let career = service
            .career_totals(&Identifier::new("Caitlin Clark"))
            .await
            .unwrap();

        assert_eq!(career.player, "caitlin-clark-1");
        assert_eq!(career.disambiguation, Disambiguation::Assumed);
        assert_eq!(career.season, "Career");
        assert_eq!(career.stats.get("seasons_played"), Some(&Some(StatValue::Integer(3))));
        assert_eq!(career.stats.get("points"), Some(&Some(StatValue::Integer(2717))));
        assert!(!career.stats.contains_key("awards"));
        assert!(career.stats.contains_key("extra_col"));
    }

    #[tokio::test]
    async fn season_keeps_missing_values_as_null() {
        let service = service().await;
        let season = service
            .latest(&Identifier::new("caitlin-clark-1"))
            .await
            .unwrap();
        assert_eq!(season.season, "2023");
        assert_eq!(season.source_table, "players_totals");
        assert!(season.stats.is_missing("awards"));
    }

    #[tokio::test]
    async fn season_falls_back_to_per_game_table() {
        let service = service().await;
        let season = service
            .season(&Identifier::new("Caitlin Clark"), 2024)
            .await
            .unwrap();
        assert_eq!(season.source_table, "players_per_game");
        assert_eq!(season.stats.get("games"), Some(&Some(StatValue::Integer(32))));
    }

    #[tokio::test]
    async fn unknown_player_is_a_fetch_error() {
        let service = service().await;
        let err = service
            .season(&Identifier::new("Nobody Here"), 2024)
            .await
            .unwrap_err();
        match err {
            ScrapeError::Fetch { status, url } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/players/nobody-here-1.html"));
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_season_is_not_found() {
        let service = service().await;
        let err = service
            .season(&Identifier::new("Caitlin Clark"), 2019)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::NotFound { .. }));
    }

    #[tokio::test]
    async fn summary_labels_career_numbers_and_fills_gaps() {
        let service = service().await;
        let summary = service
            .summary(&Identifier::new("Caitlin Clark"))
            .await
            .unwrap();

        assert_eq!(summary.player, "Caitlin Clark");
        assert_eq!(summary.slug, "caitlin-clark-1");
        assert_eq!(summary.stats.len(), 6);
        assert_eq!(summary.stats.get("PTS"), Some(&Some(StatValue::Float(28.4))));
        assert_eq!(summary.stats.get("FG%"), Some(&Some(StatValue::Float(0.466))));
        assert_eq!(summary.stats.get("REB"), Some(&Some("N/A".into())));
        assert_eq!(summary.stats.get("Total Points"), Some(&Some("N/A".into())));
    }
}
