mod box_score;
pub(crate) mod field_map;
mod play_by_play;
mod schedule;
pub(crate) mod slug;
mod stat_record;

pub use box_score::{BoxScore, GameSummary, PlayerLine, TeamBox};
pub use field_map::{FieldMap, UnmappedPolicy};
pub use play_by_play::{Play, PlayByPlay};
pub use schedule::{GameOutcome, ResultKind, ScheduleEntry, TeamSchedule};
pub use slug::Identifier;
pub use stat_record::{StatRecord, StatValue};
