//! Data models for the passenger table.
//!
//! The table itself is a polars [`DataFrame`] passed from stage to stage as
//! an explicit value. This module holds the error raised when a stage gets a
//! table it cannot work with, plus a few typed accessors shared by the
//! stages.

use polars::prelude::*;
use thiserror::Error;

/// Errors raised by table operations.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error("column '{column}' has type {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: DataType,
    },

    #[error("table has no rows")]
    EmptyTable,
}

/// Whether values of this type take part in numeric statistics.
pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Fail with [`TableError::EmptyTable`] when the table has no rows.
pub fn ensure_rows(df: &DataFrame) -> Result<(), TableError> {
    if df.height() == 0 {
        return Err(TableError::EmptyTable);
    }
    Ok(())
}

/// Whether every cell of the column is missing (also true for no rows).
pub fn is_all_null(df: &DataFrame, name: &str) -> Result<bool, TableError> {
    let column = df.column(name)?;
    Ok(column.null_count() == column.len())
}

/// Numeric column as `f64`. Integer columns are widened.
pub fn numeric(df: &DataFrame, name: &str) -> Result<Float64Chunked, TableError> {
    let column = df.column(name)?;
    if !is_numeric(column.dtype()) {
        return Err(TableError::TypeMismatch {
            column: name.to_string(),
            expected: "numeric",
            found: column.dtype().clone(),
        });
    }

    Ok(column.cast(&DataType::Float64)?.f64()?.clone())
}

/// Missing values per column, in column order.
pub fn null_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|c| (c.name().to_string(), c.null_count()))
        .collect()
}

pub fn total_nulls(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|c| c.null_count()).sum()
}

/// Formats a float the way tabular tools print them: at least one decimal.
pub fn format_float(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{:.1}", x)
    } else {
        let s = format!("{:.4}", x);
        let s = s.trim_end_matches('0');
        s.trim_end_matches('.').to_string()
    }
}

/// Human readable rendering of a cell, `NaN` for missing values.
pub fn format_value(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "NaN".to_string(),
        AnyValue::Float64(x) => format_float(*x),
        AnyValue::Float32(x) => format_float(f64::from(*x)),
        AnyValue::Boolean(b) => if *b { "True" } else { "False" }.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "age" => [Some(22.0), None, Some(4.0)],
            "sibsp" => [Some(1i64), Some(0), None],
            "sex" => ["male", "female", "female"],
            "alone" => [false, true, true],
        )
        .unwrap()
    }

    #[test]
    fn test_null_counts() {
        let df = sample();
        assert_eq!(
            null_counts(&df),
            vec![
                ("age".to_string(), 1),
                ("sibsp".to_string(), 1),
                ("sex".to_string(), 0),
                ("alone".to_string(), 0)
            ]
        );
        assert_eq!(total_nulls(&df), 2);
    }

    #[test]
    fn test_numeric_widens_integers() {
        let df = sample();
        let sibsp: Vec<Option<f64>> = numeric(&df, "sibsp").unwrap().into_iter().collect();
        assert_eq!(sibsp, vec![Some(1.0), Some(0.0), None]);
    }

    #[test]
    fn test_numeric_rejects_text() {
        let df = sample();
        assert!(matches!(
            numeric(&df, "sex"),
            Err(TableError::TypeMismatch { .. })
        ));
        assert!(matches!(
            numeric(&df, "missing"),
            Err(TableError::Polars(PolarsError::ColumnNotFound(_)))
        ));
    }

    #[test]
    fn test_is_all_null() {
        let df = df!(
            "town" => [None::<&str>, None],
            "age" => [Some(1.0), None],
        )
        .unwrap();

        assert!(is_all_null(&df, "town").unwrap());
        assert!(!is_all_null(&df, "age").unwrap());
    }

    #[test]
    fn test_ensure_rows() {
        assert!(matches!(
            ensure_rows(&DataFrame::empty()),
            Err(TableError::EmptyTable)
        ));
        assert!(ensure_rows(&sample()).is_ok());
    }

    #[test]
    fn test_format_cells() {
        assert_eq!(format_value(&AnyValue::Float64(22.0)), "22.0");
        assert_eq!(format_value(&AnyValue::Null), "NaN");
        assert_eq!(format_value(&AnyValue::Boolean(true)), "True");
        assert_eq!(format_value(&AnyValue::String("male")), "male");
        assert_eq!(format_value(&AnyValue::Int64(3)), "3");
        assert_eq!(format_float(71.2833), "71.2833");
        assert_eq!(format_float(7.25), "7.25");
    }
}
