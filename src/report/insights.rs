//! Key insight sentences derived from the aggregates.

use crate::analysis::{Analysis, GroupedMeans};
use crate::config::MissingCategoryPolicy;
use thiserror::Error;
use tracing::warn;

/// Classes the insight sentences compare.
pub const REQUIRED_CLASSES: [&str; 2] = ["First", "Third"];
/// Sexes the insight sentences compare.
pub const REQUIRED_SEXES: [&str; 2] = ["female", "male"];

/// Errors raised while building the insights.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    #[error("category '{category}' is missing from the '{key}' groups")]
    MissingCategory { key: String, category: String },
}

/// Look up `column` for every group in `required`.
fn lookup<const N: usize>(
    grouped: &GroupedMeans,
    required: [&str; N],
    column: &str,
) -> Result<[f64; N], ReportError> {
    let mut out = [0.0; N];
    for (slot, category) in out.iter_mut().zip(required) {
        *slot = grouped
            .get(category, column)
            .ok_or_else(|| ReportError::MissingCategory {
                key: grouped.key.clone(),
                category: category.to_string(),
            })?;
    }
    Ok(out)
}

/// Build the insight sentences.
///
/// With [`MissingCategoryPolicy::Fail`] the first absent category is an
/// error; with [`MissingCategoryPolicy::Skip`] sentences that need an absent
/// category are left out.
pub fn key_insights(
    analysis: &Analysis,
    policy: MissingCategoryPolicy,
) -> Result<Vec<String>, ReportError> {
    let mut insights = vec![format!(
        "Overall survival rate: {:.1}%",
        analysis.survival_rate * 100.0
    )];

    let derived: [Result<String, ReportError>; 3] = [
        lookup(&analysis.by_class, REQUIRED_CLASSES, "survived").map(|[first, third]| {
            format!(
                "First class passengers had a {:.1}% survival rate, compared to only {:.1}% for third class.",
                first * 100.0,
                third * 100.0
            )
        }),
        lookup(&analysis.by_class, REQUIRED_CLASSES, "fare").map(|[first, third]| {
            format!(
                "The average fare for first class was ${:.2}, compared to ${:.2} for third class.",
                first, third
            )
        }),
        lookup(&analysis.by_sex, REQUIRED_SEXES, "survived").map(|[female, male]| {
            format!(
                "Female survival rate: {:.1}%, Male survival rate: {:.1}%",
                female * 100.0,
                male * 100.0
            )
        }),
    ];

    for sentence in derived {
        match (sentence, policy) {
            (Ok(s), _) => insights.push(s),
            (Err(e), MissingCategoryPolicy::Skip) => warn!("Skipping insight: {}", e),
            (Err(e), MissingCategoryPolicy::Fail) => return Err(e),
        }
    }

    insights.push(format!(
        "The median age of passengers was {:.1} years.",
        analysis.median_age
    ));

    Ok(insights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn analysis_for(classes: &[&str], sexes: &[&str], survived: &[i64], fares: &[f64]) -> Analysis {
        let n = classes.len();
        let table = df!(
            "class" => classes,
            "sex" => sexes,
            "embark_town" => vec!["Southampton"; n],
            "age" => vec![30.0; n],
            "fare" => fares,
            "survived" => survived,
        )
        .unwrap();
        Analysis::compute(&table).unwrap()
    }

    #[test]
    fn test_key_insights_sentences() {
        let analysis = analysis_for(
            &["First", "First", "Third", "Third"],
            &["female", "male", "female", "male"],
            &[1, 1, 0, 1],
            &[100.0, 200.0, 10.0, 20.0],
        );

        let insights = key_insights(&analysis, MissingCategoryPolicy::Fail).unwrap();

        assert_eq!(
            insights,
            vec![
                "Overall survival rate: 75.0%".to_string(),
                "First class passengers had a 100.0% survival rate, compared to only 50.0% for third class.".to_string(),
                "The average fare for first class was $150.00, compared to $15.00 for third class.".to_string(),
                "Female survival rate: 50.0%, Male survival rate: 100.0%".to_string(),
                "The median age of passengers was 30.0 years.".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_class_fails_by_default() {
        let analysis = analysis_for(
            &["First", "Second"],
            &["female", "male"],
            &[1, 0],
            &[100.0, 20.0],
        );

        let err = key_insights(&analysis, MissingCategoryPolicy::Fail).unwrap_err();
        assert_eq!(
            err,
            ReportError::MissingCategory {
                key: "class".to_string(),
                category: "Third".to_string()
            }
        );
    }

    #[test]
    fn test_missing_category_partial_report() {
        let analysis = analysis_for(
            &["First", "Third"],
            &["female", "female"],
            &[1, 0],
            &[100.0, 20.0],
        );

        let insights = key_insights(&analysis, MissingCategoryPolicy::Skip).unwrap();

        assert_eq!(insights.len(), 4);
        assert!(insights.iter().all(|s| !s.starts_with("Female survival rate")));
        assert!(insights[3].starts_with("The median age"));
    }
}
