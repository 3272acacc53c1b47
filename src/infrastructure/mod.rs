mod clients;
pub(crate) mod fetcher;
mod scrapers;

pub use clients::espn::EspnClient;
pub use fetcher::{browser_headers, DocumentFetcher, FetchRequest};
pub use scrapers::box_score::BoxScoreParser;
pub use scrapers::franchise::FranchiseSeasonsParser;
pub use scrapers::locator::{RowKey, SeasonKey};
pub use scrapers::schedule::ScheduleParser;
pub use scrapers::stat_table::{StatTableParser, TableVariant};
pub use scrapers::extract;
