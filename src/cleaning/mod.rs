//! Missing-value cleaning.
//!
//! Fixed heuristics, applied in order: modal fill of `embark_town`, median
//! fill of `age`, removal of the sparse `deck` column, then removal of any
//! row that still holds a missing value.

use crate::analysis::stats;
use crate::models::{is_all_null, numeric, TableError};
use polars::prelude::*;
use tracing::{debug, info, warn};

pub const EMBARK_TOWN: &str = "embark_town";
pub const AGE: &str = "age";
pub const DECK: &str = "deck";

/// What the cleaner did to the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningSummary {
    /// Value used to fill `embark_town`, if any cell was filled.
    pub embark_town_fill: Option<String>,
    /// Value used to fill `age`, if any cell was filled.
    pub age_fill: Option<f64>,
    /// Columns removed from the table.
    pub dropped_columns: Vec<String>,
    pub rows_before: usize,
    pub rows_after: usize,
}

impl CleaningSummary {
    pub fn rows_dropped(&self) -> usize {
        self.rows_before - self.rows_after
    }
}

/// Clean the table in place.
pub fn clean(df: &mut DataFrame) -> Result<CleaningSummary, TableError> {
    let mut summary = CleaningSummary {
        rows_before: df.height(),
        ..Default::default()
    };

    summary.embark_town_fill = fill_with_mode(df, EMBARK_TOWN)?;
    summary.age_fill = fill_with_median(df, AGE)?;

    if df.get_column_index(DECK).is_some() {
        df.drop_in_place(DECK)?;
        debug!("Dropped column '{}'", DECK);
        summary.dropped_columns.push(DECK.to_string());
    }

    *df = df.drop_nulls::<String>(None)?;
    summary.rows_after = df.height();

    info!(
        "Cleaning removed {} of {} rows",
        summary.rows_dropped(),
        summary.rows_before
    );

    Ok(summary)
}

/// Replace the missing cells of `column` with `value`.
fn fill_nulls(df: &mut DataFrame, column: &str, value: Expr) -> Result<(), TableError> {
    *df = std::mem::take(df)
        .lazy()
        .with_column(col(column).fill_null(value))
        .collect()?;
    Ok(())
}

/// Fill missing cells of a text column with its most frequent value,
/// computed before filling.
///
/// Returns the fill value, or `None` when nothing was filled. A column with
/// no values at all has no mode and is left untouched, whatever type the
/// reader gave it.
pub fn fill_with_mode(df: &mut DataFrame, column: &str) -> Result<Option<String>, TableError> {
    if is_all_null(df, column)? {
        warn!("Column '{}' has no values; mode is undefined, leaving it missing", column);
        return Ok(None);
    }

    let cells = df.column(column)?;
    let missing = cells.null_count();
    if missing == 0 {
        return Ok(None);
    }
    if cells.dtype() != &DataType::String {
        return Err(TableError::TypeMismatch {
            column: column.to_string(),
            expected: "text",
            found: cells.dtype().clone(),
        });
    }

    let Some(value) = stats::mode(cells.str()?.into_iter().flatten()) else {
        return Ok(None);
    };

    fill_nulls(df, column, lit(value.as_str()))?;
    info!("Filled {} missing '{}' values with '{}'", missing, column, value);
    Ok(Some(value))
}

/// Fill missing cells of a numeric column with its median, computed before
/// filling.
///
/// Returns the fill value, or `None` when nothing was filled. A column with
/// no values at all has no median and is left untouched.
pub fn fill_with_median(df: &mut DataFrame, column: &str) -> Result<Option<f64>, TableError> {
    if is_all_null(df, column)? {
        warn!("Column '{}' has no values; median is undefined, leaving it missing", column);
        return Ok(None);
    }

    let values = numeric(df, column)?;
    let missing = values.null_count();
    if missing == 0 {
        return Ok(None);
    }

    let Some(value) = values.median() else {
        return Ok(None);
    };

    fill_nulls(df, column, lit(value))?;
    info!("Filled {} missing '{}' values with {}", missing, column, value);
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read_table;
    use crate::dataset::tests::fixture_table;
    use crate::models::total_nulls;
    use std::io::Cursor;

    fn read_str(csv: &str) -> DataFrame {
        read_table(Cursor::new(csv.as_bytes().to_vec())).unwrap()
    }

    #[test]
    fn test_clean_fixture() {
        let mut df = fixture_table();
        let summary = clean(&mut df).unwrap();

        assert_eq!(summary.rows_before, 21);
        // The one row without `embarked` survives the town fill but not the row drop.
        assert_eq!(summary.rows_after, 20);
        assert_eq!(summary.rows_dropped(), 1);
        assert_eq!(summary.dropped_columns, vec!["deck".to_string()]);
        assert_eq!(total_nulls(&df), 0);
        assert!(df.column(DECK).is_err());
    }

    #[test]
    fn test_fill_values_match_pre_fill_statistics() {
        let mut df = fixture_table();

        let towns = df.column(EMBARK_TOWN).unwrap().str().unwrap().clone();
        let expected_mode = stats::mode(towns.into_iter().flatten());
        let ages = numeric(&df, AGE).unwrap();
        let expected_median = ages.median();
        let missing_age_rows: Vec<usize> = ages
            .into_iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| i)
            .collect();

        let summary = clean(&mut df).unwrap();

        assert_eq!(summary.embark_town_fill, expected_mode);
        assert_eq!(summary.embark_town_fill.as_deref(), Some("Southampton"));
        assert_eq!(summary.age_fill, expected_median);
        assert_eq!(summary.age_fill, Some(29.0));

        // Missing-age rows all sit before the dropped last row, so indices hold.
        let ages = numeric(&df, AGE).unwrap();
        assert!(!missing_age_rows.is_empty());
        for row in missing_age_rows {
            assert_eq!(ages.get(row), Some(29.0));
        }
    }

    #[test]
    fn test_no_fill_when_complete() {
        let mut df = read_str("embark_town,age,deck\nCherbourg,30.0,C\n");
        let summary = clean(&mut df).unwrap();

        assert_eq!(summary.embark_town_fill, None);
        assert_eq!(summary.age_fill, None);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn test_all_missing_age_stays_missing() {
        let mut df = read_str("embark_town,age\nCherbourg,\nQueenstown,\n");

        let fill = fill_with_median(&mut df, AGE).unwrap();
        assert_eq!(fill, None);
        assert_eq!(df.column(AGE).unwrap().null_count(), 2);

        // The row drop then empties the table.
        let summary = clean(&mut df).unwrap();
        assert_eq!(summary.rows_after, 0);
        assert_eq!(df.height(), 0);
    }

    #[test]
    fn test_all_missing_embark_town_stays_missing() {
        let mut df = read_str("embark_town,age\n,22.0\n,30.0\n");

        let fill = fill_with_mode(&mut df, EMBARK_TOWN).unwrap();
        assert_eq!(fill, None);
        assert_eq!(df.column(EMBARK_TOWN).unwrap().null_count(), 2);

        let summary = clean(&mut df).unwrap();
        assert_eq!(summary.embark_town_fill, None);
        assert_eq!(summary.age_fill, None);
        assert_eq!(summary.rows_after, 0);
    }

    #[test]
    fn test_mode_fill_rejects_numeric_column() {
        let mut df = read_str("embark_town,age\n1,20.0\n,30.0\n");
        assert!(matches!(
            fill_with_mode(&mut df, EMBARK_TOWN),
            Err(TableError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_required_column() {
        let mut df = read_str("age\n1.0\n");
        assert!(matches!(
            clean(&mut df),
            Err(TableError::Polars(PolarsError::ColumnNotFound(_)))
        ));
    }
}
