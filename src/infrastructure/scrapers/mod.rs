use crate::error::Result;
use crate::infrastructure::fetcher::RawDocument;
use scraper::Html;
use tracing::debug;

pub(crate) mod box_score;
pub(crate) mod franchise;
pub(crate) mod locator;
pub(crate) mod mapper;
pub(crate) mod schedule;
pub(crate) mod stat_table;

/// Extracts one kind of result from a parsed page.
pub trait PageParser {
    type Output;

    fn parse(&self, document: &Html) -> Result<Self::Output>;
}

/// Parses a fetched page and hands it to `parser`.
///
/// Kept synchronous: `Html` is not `Send` and must not live across an await.
pub fn extract<P: PageParser>(parser: &P, document: RawDocument) -> Result<P::Output> {
    debug!("Parsing {} ({} bytes)", document.url, document.body.len());
    let html = Html::parse_document(&document.body);
    parser.parse(&html)
}
