use crate::data::{Field, StatisticMode, Tallied, Timeseries};

/// Trailing window the caller checks, tied to the district list's display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Collapsed,
    Expanded,
}

impl Lookback {
    pub fn from_expanded(expanded: bool) -> Self {
        if expanded {
            Lookback::Expanded
        } else {
            Lookback::Collapsed
        }
    }

    pub fn days(self) -> usize {
        match self {
            Lookback::Collapsed => 6,
            Lookback::Expanded => 10,
        }
    }
}

/// True iff every one of the last `window` dates of `parent` has a zero
/// delta for `mode`. Shorter series use every date they have; a missing or
/// empty series is not a streak.
///
/// Panics if `window` is zero.
pub fn is_quiet_streak(
    timeseries: &Timeseries,
    parent: &str,
    mode: StatisticMode,
    window: usize,
) -> bool {
    assert!(window > 0, "streak window must cover at least one date");

    let Some(series) = timeseries.get(parent) else {
        return false;
    };
    let trailing = series.last_n(window);
    !trailing.is_empty()
        && trailing
            .iter()
            .all(|(_, point)| point.statistic(Field::Delta, mode) == 0)
}
