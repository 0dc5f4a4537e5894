//! Statistical primitives shared by the analysis steps.
//!
//! Aggregates mirror the conventions of the spreadsheet tooling the report
//! was designed around: sample standard deviation, linearly interpolated
//! percentiles, NaN-skipping means and sums, and key-sorted group output.

use std::collections::BTreeMap;

/// Arithmetic mean, skipping NaN entries. `None` when nothing remains.
pub fn mean(values: &[f64]) -> Option<f64> {
    let kept: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if kept.is_empty() {
        return None;
    }
    Some(kept.iter().sum::<f64>() / kept.len() as f64)
}

/// Sum, skipping NaN entries.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().copied().filter(|v| !v.is_nan()).sum()
}

/// Sample standard deviation (ddof = 1). `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let kept: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if kept.len() < 2 {
        return None;
    }
    let mu = kept.iter().sum::<f64>() / kept.len() as f64;
    let variance =
        kept.iter().map(|v| (v - mu) * (v - mu)).sum::<f64>() / (kept.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Percentile with linear interpolation between closest ranks, `q` in 0..=1.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    let mut kept: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if kept.is_empty() {
        return None;
    }
    kept.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = q * (kept.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Some(kept[lower]);
    }
    let weight = rank - lower as f64;
    Some(kept[lower] * (1.0 - weight) + kept[upper] * weight)
}

/// Pearson correlation coefficient. NaN on degenerate input, matching the
/// behaviour of a correlation over a constant series.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return f64::NAN;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Occurrence counts sorted most-frequent first; ties break on the label so
/// repeated runs emit identical output. Empty labels are dropped the way a
/// spreadsheet count ignores blanks.
pub fn value_counts<I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for value in values {
        if value.is_empty() {
            continue;
        }
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut out: Vec<(String, usize)> = counts.into_iter().collect();
    out.sort_by(|lhs, rhs| rhs.1.cmp(&lhs.1).then_with(|| lhs.0.cmp(&rhs.0)));
    out
}

/// Groups values under their keys, key-sorted.
pub fn group_values(keys: &[String], values: &[f64]) -> BTreeMap<String, Vec<f64>> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (key, value) in keys.iter().zip(values) {
        groups.entry(key.clone()).or_default().push(*value);
    }
    groups
}

/// Per-group means, key-sorted. Groups whose values are all NaN report NaN.
pub fn group_means(keys: &[String], values: &[f64]) -> Vec<(String, f64)> {
    group_values(keys, values)
        .into_iter()
        .map(|(key, group)| {
            let mu = mean(&group).unwrap_or(f64::NAN);
            (key, mu)
        })
        .collect()
}

/// Per-group sums, key-sorted.
pub fn group_sums(keys: &[String], values: &[f64]) -> Vec<(String, f64)> {
    group_values(keys, values)
        .into_iter()
        .map(|(key, group)| {
            let total = sum(&group);
            (key, total)
        })
        .collect()
}

/// An ordinary least-squares line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fits `y = intercept + slope * x`. `None` below two points or when the
    /// x values carry no variance.
    pub fn fit(x: &[f64], y: &[f64]) -> Option<Self> {
        if x.len() != y.len() || x.len() < 2 {
            return None;
        }
        let n = x.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;
        let mut cov = 0.0;
        let mut var_x = 0.0;
        for (a, b) in x.iter().zip(y) {
            cov += (a - mean_x) * (b - mean_y);
            var_x += (a - mean_x) * (a - mean_x);
        }
        if var_x == 0.0 {
            return None;
        }
        let slope = cov / var_x;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}
