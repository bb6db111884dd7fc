use crate::data::{Field, Snapshot, StatisticMode, Tallied, Timeseries};

/// Headline total and delta for one mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelEntry {
    pub mode: StatisticMode,
    pub total: i64,
    pub delta: i64,
}

/// Headline figures for every mode, in display order
pub fn level(snapshot: &Snapshot, parent: &str) -> Option<[LevelEntry; 4]> {
    let region = snapshot.get(parent)?;
    Some(StatisticMode::ALL.map(|mode| LevelEntry {
        mode,
        total: region.statistic(Field::Total, mode),
        delta: region.statistic(Field::Delta, mode),
    }))
}

/// Last `window` (date, value) pairs for a region; `None` takes the whole series
pub fn daily_series(
    timeseries: &Timeseries,
    parent: &str,
    mode: StatisticMode,
    field: Field,
    window: Option<usize>,
) -> Vec<(String, i64)> {
    let Some(series) = timeseries.get(parent) else {
        return Vec::new();
    };
    series
        .last_n(window.unwrap_or(usize::MAX))
        .iter()
        .map(|(date, point)| (date.clone(), point.statistic(field, mode)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{district, series_with, snapshot_with};

    #[test]
    fn test_level_covers_all_modes() {
        let mut snapshot = snapshot_with("KL", vec![]);
        snapshot.insert("TN".to_string(), district(40, 2));
        let entries = level(&snapshot, "TN").unwrap();
        assert_eq!(entries.map(|e| e.mode), StatisticMode::ALL);
        assert_eq!(entries[0].total, 40);
        assert_eq!(entries[0].delta, 2);
        assert!(level(&snapshot, "XX").is_none());
    }

    #[test]
    fn test_daily_series_window() {
        let ts = series_with("KL", &[1, 2, 3, 4]);
        let deltas = daily_series(&ts, "KL", StatisticMode::Confirmed, Field::Delta, Some(2));
        assert_eq!(
            deltas,
            vec![("2020-03-03".to_string(), 3), ("2020-03-04".to_string(), 4)]
        );
        let totals = daily_series(&ts, "KL", StatisticMode::Confirmed, Field::Total, None);
        assert_eq!(totals.last().map(|(_, v)| *v), Some(10));
        assert!(daily_series(&ts, "TN", StatisticMode::Confirmed, Field::Total, None).is_empty());
    }
}
