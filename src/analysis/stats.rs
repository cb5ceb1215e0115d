//! Statistics polars does not provide in the shape the report needs.

use std::collections::BTreeMap;

/// Most frequent value. Ties resolve to the smallest value in
/// lexicographic order.
pub fn mode<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value.to_string())
}

/// Two-sided 95% confidence interval of a mean, normal approximation.
/// `None` below two observations.
pub fn confidence_interval_95(mean: f64, sd: Option<f64>, n: usize) -> Option<(f64, f64)> {
    if n < 2 {
        return None;
    }
    let half = 1.96 * sd? / (n as f64).sqrt();
    Some((mean - half, mean + half))
}

/// Gaussian kernel density estimate with Scott's rule bandwidth, evaluated
/// at `points` evenly spaced positions spanning the data range. `sd` is the
/// sample standard deviation of `values`.
///
/// Returns `(x, density)` pairs; empty when the data has no spread.
pub fn gaussian_kde(values: &[f64], sd: Option<f64>, points: usize) -> Vec<(f64, f64)> {
    let sd = match sd {
        Some(sd) if sd > 0.0 => sd,
        _ => return Vec::new(),
    };
    if values.is_empty() || points < 2 {
        return Vec::new();
    }

    let n = values.len() as f64;
    let bandwidth = sd * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample_std(values: &[f64]) -> Option<f64> {
        Float64Chunked::from_slice("v".into(), values).std(1)
    }

    #[test]
    fn test_mode_tie_breaks_lexicographically() {
        assert_eq!(
            mode(["Southampton", "Cherbourg", "Southampton"]),
            Some("Southampton".to_string())
        );
        assert_eq!(
            mode(["Queenstown", "Cherbourg"]),
            Some("Cherbourg".to_string())
        );
        assert_eq!(mode(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_confidence_interval() {
        let values = [0.0, 1.0, 0.0, 1.0];
        let (lo, hi) = confidence_interval_95(0.5, sample_std(&values), values.len()).unwrap();
        assert!(lo < 0.5 && hi > 0.5);
        assert!((lo + hi - 1.0).abs() < 1e-9);

        assert_eq!(confidence_interval_95(1.0, None, 1), None);
    }

    #[test]
    fn test_kde_integrates_to_about_one() {
        let values: Vec<f64> = (0..200).map(|i| (i % 40) as f64).collect();
        let curve = gaussian_kde(&values, sample_std(&values), 200);

        assert_eq!(curve.len(), 200);
        let step = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, d)| d * step).sum();
        // Evaluated only over the data range, so the tails are cut off.
        assert!(area > 0.85 && area < 1.01, "area = {}", area);
    }

    #[test]
    fn test_kde_without_spread_is_empty() {
        let values = [3.0, 3.0, 3.0];
        assert!(gaussian_kde(&values, sample_std(&values), 50).is_empty());
    }
}
