//! Plain-text rendering of tables and summaries for the console.

use crate::analysis::{ColumnSummary, GroupedMeans};
use crate::cleaning::CleaningSummary;
use crate::models::{format_value, null_counts};
use polars::prelude::DataFrame;

/// Render rows as a right-aligned text table. The first column is
/// left-aligned.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                if i == 0 {
                    format!("{:<w$}", cell, w = *w)
                } else {
                    format!("{:>w$}", cell, w = *w)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&format_row(headers));
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row.as_slice()));
        out.push('\n');
    }
    out
}

fn stat(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.6}", v))
        .unwrap_or_else(|| "NaN".to_string())
}

/// First `n` rows of the table, with a leading row index.
pub fn format_head(table: &DataFrame, n: usize) -> String {
    let mut headers = vec![String::new()];
    headers.extend(table.get_columns().iter().map(|c| c.name().to_string()));

    let rows: Vec<Vec<String>> = (0..n.min(table.height()))
        .map(|row| {
            let mut cells = vec![row.to_string()];
            cells.extend(
                table
                    .get_columns()
                    .iter()
                    .map(|c| c.get(row).map_or_else(|_| String::new(), |v| format_value(&v))),
            );
            cells
        })
        .collect();

    render_table(&headers, &rows)
}

/// Column overview: position, name, non-null count and type.
pub fn format_info(table: &DataFrame) -> String {
    let headers: Vec<String> = ["#", "Column", "Non-Null Count", "Dtype"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let rows: Vec<Vec<String>> = table
        .get_columns()
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                i.to_string(),
                c.name().to_string(),
                format!("{} non-null", c.len() - c.null_count()),
                c.dtype().to_string(),
            ]
        })
        .collect();

    format!(
        "{} entries, {} columns\n{}",
        table.height(),
        table.width(),
        render_table(&headers, &rows)
    )
}

/// Missing values per column.
pub fn format_null_counts(table: &DataFrame) -> String {
    let headers = vec!["column".to_string(), "missing".to_string()];
    let rows: Vec<Vec<String>> = null_counts(table)
        .into_iter()
        .map(|(name, count)| vec![name, count.to_string()])
        .collect();

    render_table(&headers, &rows)
}

/// What the cleaner changed.
pub fn format_cleaning(summary: &CleaningSummary) -> String {
    let mut lines = Vec::new();

    if let Some(ref town) = summary.embark_town_fill {
        lines.push(format!("Filled missing embark_town with '{}'", town));
    }
    if let Some(age) = summary.age_fill {
        lines.push(format!("Filled missing age with median {:.1}", age));
    }
    for column in &summary.dropped_columns {
        lines.push(format!("Dropped column '{}'", column));
    }
    lines.push(format!(
        "Dropped {} rows with remaining missing values ({} -> {})",
        summary.rows_dropped(),
        summary.rows_before,
        summary.rows_after
    ));

    lines.join("\n")
}

/// Descriptive statistics, one column per numeric table column.
pub fn format_describe(summary: &[ColumnSummary]) -> String {
    let mut headers = vec![String::new()];
    headers.extend(summary.iter().map(|s| s.name.clone()));

    let rows: [(&str, fn(&ColumnSummary) -> String); 8] = [
        ("count", |s| format!("{:.6}", s.count as f64)),
        ("mean", |s| stat(s.mean)),
        ("std", |s| stat(s.std)),
        ("min", |s| stat(s.min)),
        ("25%", |s| stat(s.q25)),
        ("50%", |s| stat(s.q50)),
        ("75%", |s| stat(s.q75)),
        ("max", |s| stat(s.max)),
    ];

    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|(label, cell)| {
            let mut row = vec![label.to_string()];
            row.extend(summary.iter().map(cell));
            row
        })
        .collect();

    render_table(&headers, &rows)
}

/// Grouped means, one row per group.
pub fn format_grouped(grouped: &GroupedMeans) -> String {
    let mut headers = vec![grouped.key.clone()];
    headers.extend(grouped.columns.iter().cloned());

    let rows: Vec<Vec<String>> = grouped
        .groups
        .iter()
        .map(|(group, means)| {
            let mut row = vec![group.clone()];
            row.extend(means.iter().map(|m| stat(*m)));
            row
        })
        .collect();

    render_table(&headers, &rows)
}

/// Numbered insight lines.
pub fn format_insights(insights: &[String]) -> String {
    insights
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n")
}
