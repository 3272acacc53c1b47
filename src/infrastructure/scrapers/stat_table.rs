use super::locator::{locate, RowKey, Target};
use super::mapper::map_fields;
use super::PageParser;
use crate::domain::{FieldMap, StatRecord, UnmappedPolicy};
use crate::error::{Result, ScrapeError};
use scraper::Html;
use tracing::debug;

/// A table id together with the field map its codes are read with.
#[derive(Debug, Clone, Copy)]
pub struct TableVariant {
    pub id: &'static str,
    pub map: &'static FieldMap,
}

#[derive(Debug, Clone)]
pub struct StatLine {
    pub table_id: String,
    pub record: StatRecord,
    pub seasons_played: Option<u32>,
}

/// Locates one row across a list of table variants and maps it.
pub struct StatTableParser {
    pub variants: Vec<TableVariant>,
    pub row: RowKey,
    pub policy: UnmappedPolicy,
}

impl PageParser for StatTableParser {
    type Output = StatLine;

    fn parse(&self, document: &Html) -> Result<StatLine> {
        let target = Target {
            tables: self.variants.iter().map(|variant| variant.id).collect(),
            row: self.row.clone(),
        };
        let located = locate(document, &target)?;

        let map = self
            .variants
            .iter()
            .find(|variant| variant.id == located.table_id)
            .map(|variant| variant.map)
            .ok_or_else(|| ScrapeError::Other(format!("no field map for {}", located.table_id)))?;

        let record = map_fields(&located.row, map, self.policy);
        if record.is_empty() {
            return Err(ScrapeError::not_found(format!(
                "row in {} has no stat cells",
                located.table_id
            )));
        }
        debug!("Mapped {} fields from {} with {}", record.len(), located.table_id, map.label());

        Ok(StatLine {
            record,
            table_id: located.table_id,
            seasons_played: located.seasons_played,
        })
    }
}
