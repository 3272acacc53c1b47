use crate::config::Sources;
use crate::domain::field_map::TEAM_SEASON;
use crate::domain::slug::{display_name, team_slug};
use crate::domain::{StatRecord, TeamSchedule, UnmappedPolicy};
use crate::error::Result;
use crate::infrastructure::{
    browser_headers, extract, DocumentFetcher, FetchRequest, FranchiseSeasonsParser, RowKey,
    ScheduleParser, StatTableParser, TableVariant,
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct TeamSeason {
    pub team: String,
    pub season: u16,
    pub stats: StatRecord,
}

pub struct TeamService {
    fetcher: DocumentFetcher,
    sources: Sources,
}

impl TeamService {
    pub fn new(fetcher: DocumentFetcher, sources: Sources) -> Self {
        info!("Created team service");
        Self { fetcher, sources }
    }

    /// One school's season aggregate, matched by display name.
    pub async fn season(&self, name: &str, year: u16) -> Result<TeamSeason> {
        let team = display_name(&team_slug(name));
        let document = self
            .fetcher
            .fetch(FetchRequest::new(self.sources.school_stats_page(year)))
            .await?;

        let parser = StatTableParser {
            variants: vec![
                TableVariant {
                    id: "basic_school_stats",
                    map: &TEAM_SEASON,
                },
                TableVariant {
                    id: "adv_school_stats",
                    map: &TEAM_SEASON,
                },
            ],
            row: RowKey::Team(team.clone()),
            policy: UnmappedPolicy::Drop,
        };
        let line = extract(&parser, document)?;

        Ok(TeamSeason {
            team,
            season: year,
            stats: line.record.without_missing(),
        })
    }

    pub async fn schedule(&self, team: &str, today: NaiveDate) -> Result<TeamSchedule> {
        let document = self
            .fetcher
            .fetch(FetchRequest::new(self.sources.schedule_page(team)).headers(browser_headers()))
            .await?;
        let parser = ScheduleParser {
            today,
            game_base: self.sources.game_base(),
        };
        let games = extract(&parser, document)?;
        info!("Schedule for {team}: {} games", games.len());

        Ok(TeamSchedule {
            team: team.to_string(),
            franchise_seasons: self.franchise_seasons(team, today.year()).await,
            games,
        })
    }

    /// Never fails: any problem just means the count is unknown.
    async fn franchise_seasons(&self, team: &str, current_year: i32) -> Option<u32> {
        let request = FetchRequest::new(self.sources.team_page(team)).headers(browser_headers());
        let parsed = self
            .fetcher
            .fetch(request)
            .await
            .and_then(|document| extract(&FranchiseSeasonsParser { current_year }, document));
        match parsed {
            Ok(seasons) => seasons,
            Err(err) => {
                warn!("Could not read franchise history for {team}: {err}");
                None
            }
        }
    }
}
