//! Supply-chain emission and reliability aggregates.

use crate::analysis::stats;
use crate::error::Result;
use crate::model::{Frame, columns};

/// Marker value for an on-time delivery in the source data.
const ON_TIME_FLAG: &str = "Y";

/// Per-supplier sustainability aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierSummary {
    pub supplier: String,
    pub total_emissions: f64,
    pub mean_intensity: f64,
    pub on_time_rate: f64,
}

impl SupplierSummary {
    pub fn on_time_pct(&self) -> f64 {
        self.on_time_rate * 100.0
    }
}

/// Per-supplier reliability aggregate feeding the regression scatter: the
/// on-time rate against the mean of the raw emission readings.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierReliability {
    pub supplier: String,
    pub on_time_rate: f64,
    pub mean_emissions: f64,
}

/// Appends emissions normalised per procured quantity. A zero quantity
/// yields IEEE inf (or NaN for a zero-over-zero row), which flows through.
pub fn append_emission_intensity(proc: &mut Frame) -> Result<()> {
    let emissions = proc.numeric_column(columns::CO2_EMISSIONS)?;
    let quantities = proc.numeric_column(columns::QTY)?;

    let intensity: Vec<f64> = emissions
        .iter()
        .zip(&quantities)
        .map(|(co2, qty)| co2 / qty)
        .collect();

    proc.push_number_column(columns::EMISSION_INTENSITY, intensity)
}

/// Groups procurement rows by supplier into total emissions, mean emission
/// intensity and the fraction of deliveries flagged on time.
pub fn supplier_summary(proc: &Frame) -> Result<Vec<SupplierSummary>> {
    let suppliers = proc.text_column(columns::SUPPLIER_NAME)?;
    let emissions = proc.numeric_column(columns::CO2_EMISSIONS)?;
    let intensity = proc.numeric_column(columns::EMISSION_INTENSITY)?;

    let totals = stats::group_sums(&suppliers, &emissions);
    let intensity_means = stats::group_means(&suppliers, &intensity);
    let rates = on_time_rates(proc, &suppliers)?;

    Ok(totals
        .into_iter()
        .zip(intensity_means)
        .zip(rates)
        .map(
            |(((supplier, total_emissions), (_, mean_intensity)), (_, on_time_rate))| {
                SupplierSummary {
                    supplier,
                    total_emissions,
                    mean_intensity,
                    on_time_rate,
                }
            },
        )
        .collect())
}

/// Groups procurement rows by supplier into the on-time rate and the mean of
/// the raw emission readings.
pub fn reliability_summary(proc: &Frame) -> Result<Vec<SupplierReliability>> {
    let suppliers = proc.text_column(columns::SUPPLIER_NAME)?;
    let emissions = proc.numeric_column(columns::CO2_EMISSIONS)?;

    let emission_means = stats::group_means(&suppliers, &emissions);
    let rates = on_time_rates(proc, &suppliers)?;

    Ok(emission_means
        .into_iter()
        .zip(rates)
        .map(|((supplier, mean_emissions), (_, on_time_rate))| SupplierReliability {
            supplier,
            on_time_rate,
            mean_emissions,
        })
        .collect())
}

fn on_time_rates(proc: &Frame, suppliers: &[String]) -> Result<Vec<(String, f64)>> {
    let flags = proc.text_column(columns::ON_TIME)?;
    let indicator: Vec<f64> = flags
        .iter()
        .map(|flag| if flag == ON_TIME_FLAG { 1.0 } else { 0.0 })
        .collect();
    Ok(stats::group_means(suppliers, &indicator))
}
