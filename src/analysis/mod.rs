//! Analysis modules.
//!
//! Descriptive statistics and grouped aggregates over the cleaned table.

pub mod aggregator;
pub mod stats;

pub use aggregator::*;

use crate::models::{ensure_rows, TableError};
use polars::prelude::DataFrame;
use tracing::{debug, info};

/// Everything the console report needs, computed once from the cleaned table.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub summary: Vec<ColumnSummary>,
    pub by_class: GroupedMeans,
    pub by_sex: GroupedMeans,
    pub by_embark_town: GroupedMeans,
    /// Mean of `survived`, in `[0, 1]`.
    pub survival_rate: f64,
    pub median_age: f64,
}

impl Analysis {
    /// Compute the full set of aggregates.
    pub fn compute(table: &DataFrame) -> Result<Self, TableError> {
        ensure_rows(table)?;
        info!("Aggregating {} rows", table.height());

        let summary = describe(table)?;
        let by_class = group_means(table, "class", &GROUP_VALUE_COLUMNS)?;
        let by_sex = group_means(table, "sex", &GROUP_VALUE_COLUMNS)?;
        let by_embark_town = group_means(table, "embark_town", &GROUP_VALUE_COLUMNS)?;
        let survival_rate = column_mean(table, "survived")?;
        let median_age = column_median(table, "age")?;

        debug!(
            "Groups: {} classes, {} sexes, {} towns",
            by_class.groups.len(),
            by_sex.groups.len(),
            by_embark_town.groups.len()
        );

        Ok(Self {
            summary,
            by_class,
            by_sex,
            by_embark_town,
            survival_rate,
            median_age,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning::clean;
    use crate::dataset::tests::fixture_table;

    #[test]
    fn test_compute_on_cleaned_fixture() {
        let mut table = fixture_table();
        clean(&mut table).unwrap();

        let analysis = Analysis::compute(&table).unwrap();

        assert_eq!(
            analysis.by_class.group_names().collect::<Vec<_>>(),
            vec!["First", "Second", "Third"]
        );
        assert_eq!(
            analysis.by_sex.group_names().collect::<Vec<_>>(),
            vec!["female", "male"]
        );
        assert_eq!(
            analysis.by_embark_town.group_names().collect::<Vec<_>>(),
            vec!["Cherbourg", "Queenstown", "Southampton"]
        );

        // 10 of the 20 remaining passengers survived.
        assert!((analysis.survival_rate - 0.5).abs() < 1e-12);
        assert!(analysis.summary.iter().any(|s| s.name == "fare"));
        assert!(analysis.summary.iter().all(|s| s.count == 20));
    }

    #[test]
    fn test_compute_empty_table_fails() {
        assert!(matches!(
            Analysis::compute(&DataFrame::empty()),
            Err(TableError::EmptyTable)
        ));
    }
}
