use crate::data::{Field, Snapshot, StatisticMode, Tallied, UNKNOWN_DISTRICT};

/// How many districts the collapsed list shows
pub const TOP_DISTRICTS: usize = 5;

/// One row of the district ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRegion {
    pub name: String,
    pub total: i64,
    pub delta: i64,
}

impl RankedRegion {
    /// Secondary "+n" indicator: only for event-count modes, only for growth
    pub fn delta_indicator(&self, mode: StatisticMode) -> Option<i64> {
        (mode.shows_delta() && self.delta > 0).then_some(self.delta)
    }
}

/// Sub-regions of `parent` ordered by the mode's total, largest first.
///
/// "Unknown" is dropped, ties keep document order, and `limit` truncates
/// (`None` returns the full list for the expanded view). A parent that is
/// missing or has no district breakdown yields an empty list.
pub fn rank(
    snapshot: &Snapshot,
    parent: &str,
    mode: StatisticMode,
    limit: Option<usize>,
) -> Vec<RankedRegion> {
    let Some(districts) = snapshot.get(parent).and_then(|region| region.districts.as_ref()) else {
        return Vec::new();
    };

    let mut ranked: Vec<RankedRegion> = districts
        .iter()
        .filter(|(name, _)| *name != UNKNOWN_DISTRICT)
        .map(|(name, district)| RankedRegion {
            name: name.to_string(),
            total: district.statistic(Field::Total, mode),
            delta: district.statistic(Field::Delta, mode),
        })
        .collect();

    // sort_by is stable, so equal totals stay in document order
    ranked.sort_by(|a, b| b.total.cmp(&a.total));

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

/// Whether the "view all" toggle is worth offering. Counts raw keys, "Unknown" included.
pub fn has_overflow(snapshot: &Snapshot, parent: &str) -> bool {
    snapshot
        .get(parent)
        .and_then(|region| region.districts.as_ref())
        .is_some_and(|districts| districts.len() > TOP_DISTRICTS)
}

/// Number of real districts (everything except "Unknown")
pub fn district_count(snapshot: &Snapshot, parent: &str) -> usize {
    snapshot
        .get(parent)
        .and_then(|region| region.districts.as_ref())
        .map(|districts| districts.keys().filter(|name| *name != UNKNOWN_DISTRICT).count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{district, snapshot_with};
    use crate::data::RegionSnapshot;

    fn names(ranked: &[RankedRegion]) -> Vec<&str> {
        ranked.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_rank_excludes_unknown() {
        let snapshot = snapshot_with(
            "KL",
            vec![("A", district(50, 1)), ("B", district(120, 4)), ("Unknown", district(999, 9))],
        );
        let ranked = rank(&snapshot, "KL", StatisticMode::Confirmed, Some(5));
        assert_eq!(names(&ranked), vec!["B", "A"]);
        assert_eq!(ranked[0].total, 120);
        assert_eq!(ranked[0].delta, 4);
    }

    #[test]
    fn test_rank_is_non_increasing_and_complete() {
        let snapshot = snapshot_with(
            "TN",
            vec![
                ("Chennai", district(300, 0)),
                ("Ariyalur", district(10, 0)),
                ("Unknown", district(5, 0)),
                ("Madurai", district(80, 0)),
                ("Salem", district(80, 0)),
                ("Erode", district(120, 0)),
            ],
        );
        let ranked = rank(&snapshot, "TN", StatisticMode::Confirmed, None);
        assert_eq!(ranked.len(), 5);
        assert!(ranked.windows(2).all(|w| w[0].total >= w[1].total));
        // Tie keeps document order
        assert_eq!(names(&ranked), vec!["Chennai", "Erode", "Madurai", "Salem", "Ariyalur"]);
    }

    #[test]
    fn test_limit_is_prefix_of_full_ranking() {
        let snapshot = snapshot_with(
            "KL",
            (0..9).map(|i| (["a", "b", "c", "d", "e", "f", "g", "h", "i"][i], district((i as i64 * 37) % 11, 0))).collect(),
        );
        let full = rank(&snapshot, "KL", StatisticMode::Confirmed, None);
        for k in 0..=full.len() {
            assert_eq!(rank(&snapshot, "KL", StatisticMode::Confirmed, Some(k)), full[..k].to_vec());
        }
    }

    #[test]
    fn test_missing_data_ranks_empty() {
        let snapshot = snapshot_with("KL", vec![]);
        assert!(rank(&snapshot, "KL", StatisticMode::Active, None).is_empty());
        assert!(rank(&snapshot, "XX", StatisticMode::Active, Some(5)).is_empty());

        let no_breakdown: Snapshot = [("DL", RegionSnapshot::default())].into_iter().collect();
        assert!(rank(&no_breakdown, "DL", StatisticMode::Confirmed, None).is_empty());
        assert_eq!(district_count(&no_breakdown, "DL"), 0);
    }

    #[test]
    fn test_missing_counts_rank_as_zero() {
        let snapshot = snapshot_with(
            "KL",
            vec![("Empty", RegionSnapshot::default()), ("Some", district(3, 0))],
        );
        let ranked = rank(&snapshot, "KL", StatisticMode::Deceased, None);
        assert!(ranked.iter().all(|r| r.total == 0));
        assert_eq!(names(&ranked), vec!["Empty", "Some"]);
    }

    #[test]
    fn test_delta_indicator_hidden_for_active() {
        let row = RankedRegion {
            name: "A".to_string(),
            total: 10,
            delta: 3,
        };
        assert_eq!(row.delta_indicator(StatisticMode::Confirmed), Some(3));
        assert_eq!(row.delta_indicator(StatisticMode::Active), None);
        let flat = RankedRegion { delta: 0, ..row };
        assert_eq!(flat.delta_indicator(StatisticMode::Deceased), None);
    }

    #[test]
    fn test_overflow_counts_unknown() {
        let mut districts: Vec<_> = (0..5).map(|i| (["a", "b", "c", "d", "e"][i], district(1, 0))).collect();
        assert!(!has_overflow(&snapshot_with("KL", districts.clone()), "KL"));
        districts.push(("Unknown", district(1, 0)));
        let snapshot = snapshot_with("KL", districts);
        assert!(has_overflow(&snapshot, "KL"));
        assert_eq!(district_count(&snapshot, "KL"), 5);
    }
}
