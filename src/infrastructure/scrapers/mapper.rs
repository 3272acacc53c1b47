use super::locator::Row;
use crate::domain::{FieldMap, StatRecord, StatValue, UnmappedPolicy};
use tracing::trace;

/// Translates one row's cells into a `StatRecord`.
///
/// Header and data cells are treated alike, since rank columns render as
/// `th`. Cells without a `data-stat` code are ignored. Empty cells are kept
/// as missing values.
pub fn map_fields(row: &Row, map: &FieldMap, policy: UnmappedPolicy) -> StatRecord {
    let mut record = StatRecord::new();

    for cell in &row.cells {
        let Some(code) = cell.stat.as_deref() else {
            continue;
        };
        let key = match (map.key_for(code), policy) {
            (Some(key), _) => key,
            (None, UnmappedPolicy::PassThrough) => code,
            (None, UnmappedPolicy::Drop) => {
                trace!("Dropping unmapped code {code} for {}", map.name);
                continue;
            }
        };
        record.insert(key, StatValue::from_cell(&cell.text));
    }

    record
}
