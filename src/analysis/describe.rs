//! Per-column descriptive statistics, printed one table per dataset.

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::analysis::stats;
use crate::model::{Cell, Frame};

/// How many columns a describe table covers; wide datasets are cut off here.
const MAX_COLUMNS: usize = 10;

/// Summary of one column. Text columns fill the `unique`/`top`/`freq` slots,
/// numeric columns the moment and quartile slots.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub count: usize,
    pub unique: Option<usize>,
    pub top: Option<String>,
    pub freq: Option<usize>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Profiles the first [`MAX_COLUMNS`] columns of a frame.
pub fn describe(frame: &Frame) -> Vec<ColumnProfile> {
    frame
        .columns
        .iter()
        .take(MAX_COLUMNS)
        .enumerate()
        .map(|(index, name)| profile_column(frame, index, name))
        .collect()
}

/// Renders profiles as a markdown-style console table.
pub fn render_table(profiles: &[ColumnProfile]) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Column", "Count", "Unique", "Top", "Freq", "Mean", "Std", "Min", "25%", "50%", "75%",
        "Max",
    ]);
    for profile in profiles {
        builder.push_record([
            profile.name.clone(),
            profile.count.to_string(),
            format_count(profile.unique),
            profile.top.clone().unwrap_or_else(|| "-".to_string()),
            format_count(profile.freq),
            format_value(profile.mean),
            format_value(profile.std),
            format_value(profile.min),
            format_value(profile.q25),
            format_value(profile.median),
            format_value(profile.q75),
            format_value(profile.max),
        ]);
    }
    builder.build().with(Style::markdown()).to_string()
}

fn profile_column(frame: &Frame, index: usize, name: &str) -> ColumnProfile {
    let cells: Vec<&Cell> = frame.rows.iter().map(|row| &row[index]).collect();
    let present: Vec<&Cell> = cells.iter().copied().filter(|c| !c.is_empty()).collect();

    let numeric = !present.is_empty()
        && present
            .iter()
            .all(|cell| matches!(cell, Cell::Number(_) | Cell::DateTime(_)));

    let mut profile = ColumnProfile {
        name: name.to_string(),
        count: present.len(),
        unique: None,
        top: None,
        freq: None,
        mean: None,
        std: None,
        min: None,
        q25: None,
        median: None,
        q75: None,
        max: None,
    };

    if numeric {
        let values: Vec<f64> = present.iter().filter_map(|cell| cell.as_number()).collect();
        profile.mean = stats::mean(&values);
        profile.std = stats::sample_std(&values);
        profile.min = stats::percentile(&values, 0.0);
        profile.q25 = stats::percentile(&values, 0.25);
        profile.median = stats::percentile(&values, 0.5);
        profile.q75 = stats::percentile(&values, 0.75);
        profile.max = stats::percentile(&values, 1.0);
    } else {
        let counts = stats::value_counts(present.iter().map(|cell| cell.display_string()));
        profile.unique = Some(counts.len());
        if let Some((top, freq)) = counts.first() {
            profile.top = Some(top.clone());
            profile.freq = Some(*freq);
        }
    }

    profile
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn format_count(value: Option<usize>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}
