mod model;
mod source;

pub use model::{
    Counts, Field, OrderedMap, ParseModeError, RegionMeta, RegionSeries, RegionSnapshot,
    Snapshot, StatisticMode, Tallied, Timeseries, TimeseriesPoint, UNKNOWN_DISTRICT,
};
pub use source::{RefreshPolicy, SourceCache};

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: simd_json::Error,
    },
}

/// Load the per-region snapshot (`data.min.json` layout)
pub fn load_snapshot(path: &Path) -> Result<Snapshot, DataError> {
    load_json(path)
}

/// Load the per-region daily timeseries (`timeseries.min.json` layout)
pub fn load_timeseries(path: &Path) -> Result<Timeseries, DataError> {
    load_json(path)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let mut bytes = fs::read(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    simd_json::serde::from_slice(&mut bytes).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_snapshot() {
        let file = temp_file(
            r#"{"KL": {"total": {"confirmed": 10, "recovered": 4},
                       "meta": {"population": 35000000},
                       "districts": {"Ernakulam": {"total": {"confirmed": 7}}, "Unknown": {}}}}"#,
        );
        let snapshot = load_snapshot(file.path()).unwrap();
        let kerala = snapshot.get("KL").unwrap();
        assert_eq!(kerala.statistic(Field::Total, StatisticMode::Active), 6);
        assert_eq!(kerala.meta.population, Some(35_000_000));
        assert_eq!(kerala.districts.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_load_timeseries_keeps_date_order() {
        let file = temp_file(
            r#"{"KL": {"2020-03-02": {"delta": {"confirmed": 1}}, "2020-03-03": {"delta": {"confirmed": 0}}}}"#,
        );
        let timeseries = load_timeseries(file.path()).unwrap();
        let dates: Vec<_> = timeseries.get("KL").unwrap().keys().collect();
        assert_eq!(dates, vec!["2020-03-02", "2020-03-03"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_snapshot(Path::new("/nonexistent/data.min.json")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let file = temp_file("{\"KL\": ");
        let err = load_snapshot(file.path()).unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
    }
}
