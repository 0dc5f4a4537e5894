//! R&D revenue aggregation and the linear growth forecast.

use chrono::{Datelike, Duration, NaiveDate};

use crate::analysis::stats::{self, LinearFit};
use crate::error::{ReportError, Result};
use crate::model::{Cell, Frame, columns};

/// Forecast horizon, inclusive on both ends.
pub const FORECAST_YEARS: (i32, i32) = (2024, 2030);

/// Estimated revenue summed per launch year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyRevenue {
    pub year: i32,
    pub total: f64,
}

/// One extrapolated point of the fitted trend.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub year: i32,
    pub forecast: f64,
}

/// Sums estimated annual revenue per launch year, year-ascending. Rows with
/// an empty launch date drop out of the grouping; a date that cannot be
/// interpreted aborts the run.
pub fn yearly_totals(rd: &Frame) -> Result<Vec<YearlyRevenue>> {
    let dates = rd.cells(columns::EST_LAUNCH_DATE)?;
    let revenue = rd.numeric_column(columns::EST_ANNUAL_REVENUE)?;

    let mut keys = Vec::with_capacity(dates.len());
    let mut values = Vec::with_capacity(dates.len());
    for (cell, amount) in dates.into_iter().zip(revenue) {
        if cell.is_empty() {
            continue;
        }
        let year = launch_year(cell)?;
        keys.push(format!("{year:04}"));
        values.push(amount);
    }

    stats::group_sums(&keys, &values)
        .into_iter()
        .map(|(key, total)| {
            let year = key.parse::<i32>().map_err(|_| ReportError::InvalidDate {
                column: columns::EST_LAUNCH_DATE.to_string(),
                value: key.clone(),
            })?;
            Ok(YearlyRevenue { year, total })
        })
        .collect()
}

/// Fits ordinary least squares on year against total revenue and
/// extrapolates over [`FORECAST_YEARS`].
pub fn forecast(yearly: &[YearlyRevenue]) -> Result<Vec<ForecastPoint>> {
    let x: Vec<f64> = yearly.iter().map(|point| point.year as f64).collect();
    let y: Vec<f64> = yearly.iter().map(|point| point.total).collect();

    let fit = LinearFit::fit(&x, &y).ok_or_else(|| {
        ReportError::Regression(format!(
            "need at least two distinct launch years, got {}",
            yearly.len()
        ))
    })?;

    let (start, end) = FORECAST_YEARS;
    Ok((start..=end)
        .map(|year| ForecastPoint {
            year,
            forecast: fit.predict(year as f64),
        })
        .collect())
}

/// Calendar year of a launch-date cell. Accepts Excel serial datetimes,
/// ISO dates, US-style dates, and bare year numbers.
pub fn launch_year(cell: &Cell) -> Result<i32> {
    match cell {
        Cell::DateTime(serial) => serial_year(*serial),
        Cell::Number(value) if (1900.0..=2200.0).contains(value) => Ok(*value as i32),
        Cell::Number(serial) => serial_year(*serial),
        Cell::Text(text) => parse_text_year(text),
        _ => Err(invalid_date(cell.display_string())),
    }
}

fn serial_year(serial: f64) -> Result<i32> {
    // Excel serial dates count days from 1899-12-30.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).expect("fixed epoch date");
    let date = epoch
        .checked_add_signed(Duration::days(serial as i64))
        .ok_or_else(|| invalid_date(serial.to_string()))?;
    Ok(date.year())
}

fn parse_text_year(text: &str) -> Result<i32> {
    let trimmed = text.trim();
    for format in ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date.year());
        }
    }
    if let Ok(year) = trimmed.parse::<i32>() {
        if (1900..=2200).contains(&year) {
            return Ok(year);
        }
    }
    Err(invalid_date(trimmed.to_string()))
}

fn invalid_date(value: String) -> ReportError {
    ReportError::InvalidDate {
        column: columns::EST_LAUNCH_DATE.to_string(),
        value,
    }
}
