//! Table aggregation: descriptive statistics, grouped means and the data
//! slices behind the charts.

use crate::analysis::stats;
use crate::models::{ensure_rows, is_numeric, numeric, TableError};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Columns averaged by the grouped summaries.
pub const GROUP_VALUE_COLUMNS: [&str; 3] = ["age", "fare", "survived"];

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    fn from_chunked(name: &str, values: &Float64Chunked) -> Result<Self, TableError> {
        let quantile = |q| values.quantile(q, QuantileMethod::Linear);
        Ok(Self {
            name: name.to_string(),
            count: values.len() - values.null_count(),
            mean: values.mean(),
            std: values.std(1),
            min: values.min(),
            q25: quantile(0.25)?,
            q50: quantile(0.5)?,
            q75: quantile(0.75)?,
            max: values.max(),
        })
    }
}

/// Means of a set of columns per value of a key column.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedMeans {
    /// Name of the key column.
    pub key: String,
    /// Averaged columns, in output order.
    pub columns: Vec<String>,
    /// Group value -> one mean per column (`None` if the group has no values).
    pub groups: BTreeMap<String, Vec<Option<f64>>>,
}

impl GroupedMeans {
    /// Mean of `column` within `group`.
    pub fn get(&self, group: &str, column: &str) -> Option<f64> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.groups.get(group)?.get(index).copied().flatten()
    }

    /// Group values in ascending order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

/// Mean of `value_col` within one bin of `bin_col`: `(lower, upper]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub mean: Option<f64>,
}

/// Mean (and confidence interval) of a value for one pair of keys.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossCell {
    pub outer: String,
    pub inner: String,
    pub mean: f64,
    pub ci: Option<(f64, f64)>,
}

/// Equal-width histogram of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, one more than `counts`.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.get(1)) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Non-missing values of a numeric column.
pub fn present_values(df: &DataFrame, column: &str) -> Result<Vec<f64>, TableError> {
    Ok(numeric(df, column)?.into_iter().flatten().collect())
}

/// Grouping keys of a column rendered as text, `None` for missing cells.
fn text_keys(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>, TableError> {
    let keys = df.column(column)?.cast(&DataType::String)?;
    Ok(keys.str()?.into_iter().map(|k| k.map(String::from)).collect())
}

/// Descriptive statistics for every numeric column, in column order.
pub fn describe(df: &DataFrame) -> Result<Vec<ColumnSummary>, TableError> {
    ensure_rows(df)?;

    df.get_columns()
        .iter()
        .filter(|c| is_numeric(c.dtype()))
        .map(|c| {
            let values = numeric(df, c.name())?;
            ColumnSummary::from_chunked(c.name(), &values)
        })
        .collect()
}

/// Mean of every column in `columns` per distinct value of `key`.
///
/// Rows with a missing key are skipped; missing values are skipped per column.
pub fn group_means(df: &DataFrame, key: &str, columns: &[&str]) -> Result<GroupedMeans, TableError> {
    ensure_rows(df)?;
    df.column(key)?;
    for column in columns {
        numeric(df, column)?;
    }

    let aggregates: Vec<Expr> = columns
        .iter()
        .map(|c| col(*c).cast(DataType::Float64).mean())
        .collect();

    let out = df
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg(aggregates)
        .collect()?;

    let means = columns
        .iter()
        .map(|c| Ok(out.column(c)?.f64()?.clone()))
        .collect::<Result<Vec<_>, TableError>>()?;

    let mut groups = BTreeMap::new();
    for (row, group) in text_keys(&out, key)?.into_iter().enumerate() {
        let Some(group) = group else { continue };
        groups.insert(group, means.iter().map(|m| m.get(row)).collect());
    }

    Ok(GroupedMeans {
        key: key.to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        groups,
    })
}

/// Mean of a numeric column over the whole table.
pub fn column_mean(df: &DataFrame, column: &str) -> Result<f64, TableError> {
    numeric(df, column)?.mean().ok_or(TableError::EmptyTable)
}

/// Median of a numeric column over the whole table.
pub fn column_median(df: &DataFrame, column: &str) -> Result<f64, TableError> {
    numeric(df, column)?.median().ok_or(TableError::EmptyTable)
}

/// Mean of `value_col` per bin of `bin_col`. Bins are right-closed:
/// `(edges[i], edges[i + 1]]`. Values outside all bins are ignored.
pub fn binned_means(
    df: &DataFrame,
    bin_col: &str,
    value_col: &str,
    edges: &[f64],
) -> Result<Vec<Bin>, TableError> {
    let bins_by = numeric(df, bin_col)?;
    let values = numeric(df, value_col)?;

    let mut sums = vec![(0.0, 0usize); edges.len().saturating_sub(1)];

    for (b, v) in bins_by.into_iter().zip(values.into_iter()) {
        let (Some(b), Some(v)) = (b, v) else { continue };
        if let Some(i) = edges.windows(2).position(|w| b > w[0] && b <= w[1]) {
            sums[i].0 += v;
            sums[i].1 += 1;
        }
    }

    Ok(edges
        .windows(2)
        .zip(sums)
        .map(|(w, (sum, count))| Bin {
            lower: w[0],
            upper: w[1],
            mean: if count > 0 { Some(sum / count as f64) } else { None },
        })
        .collect())
}

/// Mean of `value` for every (outer, inner) key pair present in the table,
/// ordered by outer then inner key.
pub fn cross_means(
    df: &DataFrame,
    outer: &str,
    inner: &str,
    value: &str,
) -> Result<Vec<CrossCell>, TableError> {
    numeric(df, value)?;

    let out = df
        .clone()
        .lazy()
        .filter(
            col(outer)
                .is_not_null()
                .and(col(inner).is_not_null())
                .and(col(value).is_not_null()),
        )
        .group_by([col(outer), col(inner)])
        .agg([
            col(value).cast(DataType::Float64).mean().alias("mean"),
            col(value).cast(DataType::Float64).std(1).alias("std"),
            col(value).count().cast(DataType::Float64).alias("n"),
        ])
        .collect()?;

    let outers = text_keys(&out, outer)?;
    let inners = text_keys(&out, inner)?;
    let mean = out.column("mean")?.f64()?;
    let std = out.column("std")?.f64()?;
    let n = out.column("n")?.f64()?;

    let mut cells: Vec<CrossCell> = (0..out.height())
        .filter_map(|row| {
            let mean = mean.get(row)?;
            let count = n.get(row).unwrap_or(0.0) as usize;
            Some(CrossCell {
                outer: outers[row].clone()?,
                inner: inners[row].clone()?,
                mean,
                ci: stats::confidence_interval_95(mean, std.get(row), count),
            })
        })
        .collect();

    cells.sort_by(|a, b| (&a.outer, &a.inner).cmp(&(&b.outer, &b.inner)));
    Ok(cells)
}

/// Equal-width histogram over the range of the values.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    if values.is_empty() || bins == 0 {
        return Histogram {
            edges: Vec::new(),
            counts: Vec::new(),
        };
    }

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if hi > lo { (hi - lo) / bins as f64 } else { 1.0 };

    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];

    for v in values {
        // The last bin is closed on the right so the maximum is counted.
        let i = (((v - lo) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }

    Histogram { edges, counts }
}
