use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use thiserror::Error;

/// Sub-region key for cases not attributed to any district
pub const UNKNOWN_DISTRICT: &str = "Unknown";

/// Which measurement drives rankings, deltas and streak checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatisticMode {
    Confirmed,
    #[default]
    Active,
    Recovered,
    Deceased,
}

impl StatisticMode {
    pub const ALL: [StatisticMode; 4] = [
        StatisticMode::Confirmed,
        StatisticMode::Active,
        StatisticMode::Recovered,
        StatisticMode::Deceased,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatisticMode::Confirmed => "confirmed",
            StatisticMode::Active => "active",
            StatisticMode::Recovered => "recovered",
            StatisticMode::Deceased => "deceased",
        }
    }

    /// Next mode in display order, wrapping around
    pub fn next(self) -> Self {
        match self {
            StatisticMode::Confirmed => StatisticMode::Active,
            StatisticMode::Active => StatisticMode::Recovered,
            StatisticMode::Recovered => StatisticMode::Deceased,
            StatisticMode::Deceased => StatisticMode::Confirmed,
        }
    }

    /// Active caseload is a state, not an event count, so it has no delta to show
    pub fn shows_delta(self) -> bool {
        self != StatisticMode::Active
    }

    /// Modes where "no new cases" is a claim worth making
    pub fn supports_streak(self) -> bool {
        matches!(self, StatisticMode::Confirmed | StatisticMode::Deceased)
    }
}

impl fmt::Display for StatisticMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized statistic mode `{0}`")]
pub struct ParseModeError(pub String);

impl FromStr for StatisticMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatisticMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

/// Which half of a count record to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Total,
    Delta,
}

/// Raw per-category counts. Every field is optional in the feed; missing reads as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Counts {
    pub confirmed: i64,
    pub deceased: i64,
    pub recovered: i64,
    /// Migrated or otherwise closed cases
    #[serde(alias = "migrated")]
    pub other: i64,
    pub tested: i64,
}

impl Counts {
    /// Count for a mode; active is derived from the closed categories
    pub fn statistic(&self, mode: StatisticMode) -> i64 {
        match mode {
            StatisticMode::Confirmed => self.confirmed,
            StatisticMode::Active => self.confirmed - self.deceased - self.recovered - self.other,
            StatisticMode::Recovered => self.recovered,
            StatisticMode::Deceased => self.deceased,
        }
    }
}

/// Anything carrying a total/delta pair of counts
pub trait Tallied {
    fn counts(&self, field: Field) -> &Counts;

    fn statistic(&self, field: Field, mode: StatisticMode) -> i64 {
        self.counts(field).statistic(mode)
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct RegionMeta {
    pub population: Option<u64>,
    pub last_updated: Option<String>,
}

/// Aggregate counts for one region, with its sub-regions one level down
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct RegionSnapshot {
    pub total: Counts,
    pub delta: Counts,
    pub meta: RegionMeta,
    pub districts: Option<OrderedMap<RegionSnapshot>>,
}

impl Tallied for RegionSnapshot {
    fn counts(&self, field: Field) -> &Counts {
        match field {
            Field::Total => &self.total,
            Field::Delta => &self.delta,
        }
    }
}

/// Counts for a single date
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct TimeseriesPoint {
    pub total: Counts,
    pub delta: Counts,
}

impl Tallied for TimeseriesPoint {
    fn counts(&self, field: Field) -> &Counts {
        match field {
            Field::Total => &self.total,
            Field::Delta => &self.delta,
        }
    }
}

/// Region code -> region snapshot
pub type Snapshot = OrderedMap<RegionSnapshot>;

/// ISO date -> point, in date order
pub type RegionSeries = OrderedMap<TimeseriesPoint>;

/// Region code -> per-date series
pub type Timeseries = OrderedMap<RegionSeries>;

/// String-keyed map that keeps the order keys appeared in the document.
/// A repeated key replaces the value but keeps its first position.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: String, value: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Trailing `n` entries (all of them when fewer exist)
    pub fn last_n(&self, n: usize) -> &[(String, V)] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (key, value) in iter {
            map.insert(key.into(), value);
        }
        map
    }
}

struct OrderedMapVisitor<V> {
    marker: PhantomData<fn() -> OrderedMap<V>>,
}

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut map = OrderedMap {
            entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
        };
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor {
            marker: PhantomData,
        })
    }
}
