use crate::error::{BwallocError, Result};
use crate::types::{TrafficSeries, UsageMatrix};
use polars::prelude::*;
use std::path::Path;
use super::{types::DatasetMetadata, validator::DataValidator};

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| BwallocError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load the aggregate traffic series, one row per time step.
    pub fn load_traffic<P: AsRef<Path>>(path: P) -> Result<TrafficSeries> {
        let df = Self::load(&path)?;
        Self::traffic_from_frame(&df)
    }

    pub fn traffic_from_frame(df: &DataFrame) -> Result<TrafficSeries> {
        DataValidator::validate_minimum_rows(df, 1)?;
        let column = DataValidator::find_traffic_column(df)?;
        log::debug!("Using column '{}' as traffic", column);
        TrafficSeries::new(DataValidator::column_values(df, &column)?)
    }

    /// Load per-cell usage: one numeric column per cell, one row per step.
    ///
    /// Non-numeric columns (timestamps, labels) are skipped.
    pub fn load_usage<P: AsRef<Path>>(path: P) -> Result<(UsageMatrix, Vec<String>)> {
        let df = Self::load(&path)?;
        Self::usage_from_frame(&df)
    }

    pub fn usage_from_frame(df: &DataFrame) -> Result<(UsageMatrix, Vec<String>)> {
        let null_report = DataValidator::check_nulls(df)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        let cells = DataValidator::numeric_columns(df);
        if cells.is_empty() {
            return Err(BwallocError::DataLoading(
                "Usage data has no numeric cell columns".to_string(),
            ));
        }
        let skipped = df.width() - cells.len();
        if skipped > 0 {
            log::warn!("Skipping {} non-numeric usage column(s)", skipped);
        }

        let rows = cells
            .iter()
            .map(|name| DataValidator::column_values(df, name))
            .collect::<Result<Vec<_>>>()?;

        Ok((UsageMatrix::from_rows(rows)?, cells))
    }

    /// Load both inputs and check that they cover the same time steps.
    pub fn load_dataset<P: AsRef<Path>, Q: AsRef<Path>>(
        traffic_path: P,
        usage_path: Q,
    ) -> Result<(TrafficSeries, UsageMatrix, DatasetMetadata)> {
        let traffic = Self::load_traffic(&traffic_path)?;
        let (usage, cell_names) = Self::load_usage(&usage_path)?;

        if usage.steps() != traffic.len() {
            return Err(BwallocError::shape(
                "usage steps vs traffic length",
                traffic.len(),
                usage.steps(),
            ));
        }

        let metadata = DatasetMetadata {
            traffic_path: traffic_path.as_ref().to_string_lossy().to_string(),
            usage_path: usage_path.as_ref().to_string_lossy().to_string(),
            cells: usage.cells(),
            steps: usage.steps(),
            cell_names,
            traffic_range: min_max(traffic.values().iter().copied()),
            usage_range: min_max(usage.view().iter().copied()),
        };

        log::info!(
            "Loaded {} cells over {} steps from {} and {}",
            metadata.cells,
            metadata.steps,
            metadata.usage_path,
            metadata.traffic_path
        );

        Ok((traffic, usage, metadata))
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_usage_transposes_columns() {
        let df = df! {
            "time" => &["t0", "t1", "t2"],
            "cell_a" => &[1.0, 2.0, 3.0],
            "cell_b" => &[4.0, 5.0, 6.0],
        }
        .unwrap();

        let (usage, names) = CsvConnector::usage_from_frame(&df).unwrap();
        assert_eq!(names, vec!["cell_a", "cell_b"]);
        assert_eq!(usage.cells(), 2);
        assert_eq!(usage.steps(), 3);
        assert_eq!(usage.step(1).to_vec(), vec![2.0, 5.0]);
    }

    #[test]
    fn test_load_dataset_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let traffic_path = dir.path().join("traffic.csv");
        let usage_path = dir.path().join("usage.csv");
        std::fs::write(&traffic_path, "traffic\n2.0\n2.5\n3.0\n").unwrap();
        std::fs::write(&usage_path, "c0,c1\n1.0,0.5\n1.5,1.0\n2.0,1.0\n").unwrap();

        let (traffic, usage, metadata) =
            CsvConnector::load_dataset(&traffic_path, &usage_path).unwrap();
        assert_eq!(traffic.values(), &[2.0, 2.5, 3.0]);
        assert_eq!(usage.cells(), 2);
        assert_eq!(metadata.steps, 3);
        assert_eq!(metadata.usage_range, (0.5, 2.0));
    }

    #[test]
    fn test_load_dataset_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let traffic_path = dir.path().join("traffic.csv");
        let usage_path = dir.path().join("usage.csv");
        std::fs::write(&traffic_path, "traffic\n2.0\n2.5\n").unwrap();
        std::fs::write(&usage_path, "c0\n1.0\n1.5\n2.0\n").unwrap();

        let result = CsvConnector::load_dataset(&traffic_path, &usage_path);
        assert!(matches!(
            result,
            Err(BwallocError::Shape { expected: 2, actual: 3, .. })
        ));
    }
}
