//! Pure derivations over the latest snapshot and timeseries.
//! Nothing here keeps a copy of source data between calls.

mod grid;
mod level;
mod meta;
mod ranking;
mod streak;

pub use grid::{cells_to_units, plan_rows, GridPlan, WIDE_BREAKPOINT};
pub use level::{daily_series, level, LevelEntry};
pub use meta::{summarize, StateMeta};
pub use ranking::{district_count, has_overflow, rank, RankedRegion, TOP_DISTRICTS};
pub use streak::{is_quiet_streak, Lookback};
