use crate::data::{Field, Snapshot, StatisticMode, Tallied, Timeseries};

/// Dates compared for the weekly growth figure
const GROWTH_SPAN: usize = 7;

/// Derived figures for the region summary panel
#[derive(Debug, Clone, PartialEq)]
pub struct StateMeta {
    pub population: Option<u64>,
    pub last_updated: Option<String>,
    pub confirmed_per_million: Option<f64>,
    pub tests_per_million: Option<f64>,
    /// Percentages of confirmed
    pub active_ratio: Option<f64>,
    pub recovery_ratio: Option<f64>,
    pub case_fatality_ratio: Option<f64>,
    /// Average daily growth of confirmed over the last week, percent
    pub growth_rate: Option<f64>,
}

pub fn summarize(snapshot: &Snapshot, timeseries: &Timeseries, parent: &str) -> Option<StateMeta> {
    let region = snapshot.get(parent)?;
    let confirmed = region.statistic(Field::Total, StatisticMode::Confirmed);
    let population = region.meta.population.filter(|&p| p > 0);

    let per_million = |count: i64| population.map(|p| count as f64 / p as f64 * 1_000_000.0);
    let ratio = |mode: StatisticMode| {
        (confirmed > 0)
            .then(|| region.statistic(Field::Total, mode) as f64 / confirmed as f64 * 100.0)
    };

    Some(StateMeta {
        population,
        last_updated: region.meta.last_updated.clone(),
        confirmed_per_million: per_million(confirmed),
        tests_per_million: (region.total.tested > 0)
            .then(|| per_million(region.total.tested))
            .flatten(),
        active_ratio: ratio(StatisticMode::Active),
        recovery_ratio: ratio(StatisticMode::Recovered),
        case_fatality_ratio: ratio(StatisticMode::Deceased),
        growth_rate: weekly_growth(timeseries, parent),
    })
}

fn weekly_growth(timeseries: &Timeseries, parent: &str) -> Option<f64> {
    let trailing = timeseries.get(parent)?.last_n(GROWTH_SPAN + 1);
    if trailing.len() <= GROWTH_SPAN {
        return None;
    }
    let base = trailing[0].1.statistic(Field::Total, StatisticMode::Confirmed);
    let latest = trailing[GROWTH_SPAN].1.statistic(Field::Total, StatisticMode::Confirmed);
    (base > 0).then(|| (latest - base) as f64 / base as f64 * 100.0 / GROWTH_SPAN as f64)
}
