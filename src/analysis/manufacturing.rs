//! Manufacturing cost and efficiency diagnostics.

use crate::analysis::stats;
use crate::error::Result;
use crate::model::{Frame, columns};

/// Per-plant aggregate of the diagnostic metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantSummary {
    pub plant: String,
    pub yield_mean: f64,
    pub cost_variance_mean: f64,
    pub efficiency_mean: f64,
}

/// Pearson correlation matrix over the production efficiency drivers.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Columns entering the correlation matrix, in display order.
pub const CORRELATION_COLUMNS: [&str; 5] = [
    columns::YIELD_PCT,
    columns::STD_COST_PER_MT,
    columns::ACTUAL_COST_PER_MT,
    columns::COST_VARIANCE_PCT,
    columns::EFFICIENCY_RATIO,
];

/// Appends the three derived cost columns to the manufacturing frame:
/// absolute cost variance, percentage cost variance against standard cost,
/// and the actual-over-planned quantity ratio. A zero standard cost yields
/// IEEE NaN/inf in the percentage, which flows through unchanged.
pub fn append_cost_metrics(mfg: &mut Frame) -> Result<()> {
    let std_cost = mfg.numeric_column(columns::STD_COST_PER_MT)?;
    let actual_cost = mfg.numeric_column(columns::ACTUAL_COST_PER_MT)?;
    let planned = mfg.numeric_column(columns::PLANNED_QUANTITY)?;
    let actual_qty = mfg.numeric_column(columns::ACTUAL_QUANTITY)?;

    let variance: Vec<f64> = actual_cost
        .iter()
        .zip(&std_cost)
        .map(|(actual, std)| actual - std)
        .collect();
    let variance_pct: Vec<f64> = variance
        .iter()
        .zip(&std_cost)
        .map(|(var, std)| var / std * 100.0)
        .collect();
    let efficiency: Vec<f64> = actual_qty
        .iter()
        .zip(&planned)
        .map(|(actual, planned)| actual / planned)
        .collect();

    mfg.push_number_column(columns::COST_VARIANCE_ABS, variance)?;
    mfg.push_number_column(columns::COST_VARIANCE_PCT, variance_pct)?;
    mfg.push_number_column(columns::EFFICIENCY_RATIO, efficiency)?;
    Ok(())
}

/// Groups the derived metrics by plant code into per-plant means.
pub fn plant_summary(mfg: &Frame) -> Result<Vec<PlantSummary>> {
    let plants = mfg.text_column(columns::PLANT_CODE)?;
    let yields = mfg.numeric_column(columns::YIELD_PCT)?;
    let variance_pct = mfg.numeric_column(columns::COST_VARIANCE_PCT)?;
    let efficiency = mfg.numeric_column(columns::EFFICIENCY_RATIO)?;

    let yield_means = stats::group_means(&plants, &yields);
    let variance_means = stats::group_means(&plants, &variance_pct);
    let efficiency_means = stats::group_means(&plants, &efficiency);

    Ok(yield_means
        .into_iter()
        .zip(variance_means)
        .zip(efficiency_means)
        .map(
            |(((plant, yield_mean), (_, cost_variance_mean)), (_, efficiency_mean))| {
                PlantSummary {
                    plant,
                    yield_mean,
                    cost_variance_mean,
                    efficiency_mean,
                }
            },
        )
        .collect())
}

/// Computes the correlation matrix over [`CORRELATION_COLUMNS`].
pub fn correlation_matrix(mfg: &Frame) -> Result<CorrelationMatrix> {
    let series: Vec<Vec<f64>> = CORRELATION_COLUMNS
        .iter()
        .map(|column| mfg.numeric_column(column))
        .collect::<Result<_>>()?;

    let values = series
        .iter()
        .map(|row_series| {
            series
                .iter()
                .map(|col_series| stats::pearson(row_series, col_series))
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix {
        labels: CORRELATION_COLUMNS.iter().map(|s| s.to_string()).collect(),
        values,
    })
}
