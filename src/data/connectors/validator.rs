use super::types::TrafficColumn;
use crate::error::{BwallocError, Result};
use polars::prelude::*;

pub struct DataValidator;

impl DataValidator {
    fn is_numeric(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float64
                | DataType::Float32
                | DataType::Int64
                | DataType::Int32
                | DataType::Int16
                | DataType::Int8
                | DataType::UInt64
                | DataType::UInt32
                | DataType::UInt16
                | DataType::UInt8
        )
    }

    /// Names of every numeric column, in file order.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| Self::is_numeric(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Find the traffic column by alias, falling back to the first numeric one.
    pub fn find_traffic_column(df: &DataFrame) -> Result<String> {
        let columns = df.get_column_names();
        for alias in TrafficColumn::aliases() {
            if columns.iter().any(|col| col.as_str() == *alias) {
                let dtype = df.column(alias)?.dtype().clone();
                if !Self::is_numeric(&dtype) {
                    return Err(BwallocError::DataLoading(format!(
                        "Column '{}' must be numeric, found {:?}",
                        alias, dtype
                    )));
                }
                return Ok(alias.to_string());
            }
        }

        Self::numeric_columns(df).into_iter().next().ok_or_else(|| {
            BwallocError::DataLoading(format!(
                "No traffic column found (tried aliases: {:?}) and no numeric fallback",
                TrafficColumn::aliases()
            ))
        })
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(BwallocError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Check for null values in critical columns
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let null_count = series.null_count();
            if null_count > 0 {
                null_report.push((col_name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }

    /// Column values as `f64`; nulls and negative or non-finite values are rejected.
    pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        let values = column.f64()?;

        values
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
                Some(v) => Err(BwallocError::DataLoading(format!(
                    "Invalid value {} in column '{}' at row {}",
                    v, name, row
                ))),
                None => Err(BwallocError::DataLoading(format!(
                    "Missing value in column '{}' at row {}",
                    name, row
                ))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_traffic_alias() {
        let df = df! {
            "step" => &[0i64, 1, 2],
            "Demand" => &[10.0, 12.0, 11.0],
        }
        .unwrap();

        assert_eq!(DataValidator::find_traffic_column(&df).unwrap(), "Demand");
    }

    #[test]
    fn test_traffic_falls_back_to_first_numeric() {
        let df = df! {
            "label" => &["a", "b"],
            "load" => &[1.0, 2.0],
        }
        .unwrap();

        assert_eq!(DataValidator::find_traffic_column(&df).unwrap(), "load");
    }

    #[test]
    fn test_numeric_columns_skip_text() {
        let df = df! {
            "timestamp" => &["t0", "t1"],
            "cell_a" => &[1.0, 2.0],
            "cell_b" => &[3i64, 4],
        }
        .unwrap();

        assert_eq!(DataValidator::numeric_columns(&df), vec!["cell_a", "cell_b"]);
    }

    #[test]
    fn test_negative_value_rejected() {
        let df = df! {
            "cell_a" => &[1.0, -2.0],
        }
        .unwrap();

        assert!(DataValidator::column_values(&df, "cell_a").is_err());
    }

    #[test]
    fn test_minimum_rows() {
        let df = df! {
            "traffic" => &[1.0, 2.0],
        }
        .unwrap();

        assert!(DataValidator::validate_minimum_rows(&df, 2).is_ok());
        assert!(DataValidator::validate_minimum_rows(&df, 3).is_err());
    }
}
