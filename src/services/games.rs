use crate::config::Sources;
use crate::domain::{BoxScore, PlayByPlay};
use crate::error::{Result, ScrapeError};
use crate::infrastructure::{
    browser_headers, extract, BoxScoreParser, DocumentFetcher, EspnClient, FetchRequest,
};
use std::time::Duration;
use tracing::info;

fn check_game_id(game_id: &str) -> Result<()> {
    if game_id.is_empty() || !game_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScrapeError::Parse(format!("invalid game id {game_id:?}")));
    }
    Ok(())
}

pub struct GameService {
    fetcher: DocumentFetcher,
    espn: EspnClient,
    sources: Sources,
    box_score_timeout: Duration,
}

impl GameService {
    pub fn new(fetcher: DocumentFetcher, sources: Sources, box_score_timeout: Duration) -> Self {
        info!("Created game service");
        Self {
            espn: EspnClient::new(fetcher.clone()),
            fetcher,
            sources,
            box_score_timeout,
        }
    }

    pub async fn box_score(&self, game_id: &str) -> Result<BoxScore> {
        check_game_id(game_id)?;
        let request = FetchRequest::new(self.sources.box_score_page(game_id))
            .headers(browser_headers())
            .timeout(self.box_score_timeout);
        let document = self.fetcher.fetch(request).await?;
        let (summary, teams) = extract(&BoxScoreParser, document)?;

        Ok(BoxScore {
            game_id: game_id.to_string(),
            summary,
            teams,
        })
    }

    pub async fn play_by_play(&self, game_id: &str) -> Result<PlayByPlay> {
        check_game_id(game_id)?;
        self.espn
            .play_by_play(self.sources.summary_api(game_id), game_id)
            .await
    }
}
