//! One-shot orchestration of the report: load, clean, aggregate, plot.
//!
//! The sequence is fixed. Each section writes its charts into its own folder
//! under the output root and the summary tables go to stdout, mirroring the
//! report document the output feeds.

use std::fs;
use std::path::{Path, PathBuf};

use plotly::common::ColorScalePalette;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{info, instrument};

use crate::analysis::manufacturing::{self, CorrelationMatrix, PlantSummary};
use crate::analysis::procurement::{self, SupplierReliability, SupplierSummary};
use crate::analysis::revenue::{self, ForecastPoint, YearlyRevenue};
use crate::analysis::{describe, stats};
use crate::charts;
use crate::error::Result;
use crate::io::excel_read;
use crate::model::{DatasetKind, Frame, columns};

/// Output folders, one per report section.
const SECTION_DIRS: [&str; 5] = [
    "SectionIII",
    "SectionIV",
    "SectionV",
    "SectionVI",
    "Appendix",
];

/// Strategic themes scored by the business: (theme, impact, feasibility).
const STRATEGIC_THEMES: [(&str, f64, f64); 4] = [
    ("Operational Efficiency", 8.0, 7.0),
    ("Sustainable Procurement", 7.0, 6.0),
    ("Logistics Optimization", 6.0, 8.0),
    ("Innovation Growth", 9.0, 8.0),
];

/// Resolves the fixed workbook file names against the data directory.
pub fn input_path(data_dir: &Path, kind: DatasetKind) -> PathBuf {
    data_dir.join(kind.file_name())
}

/// Runs the whole report once. Any failure aborts; partial output that was
/// already written stays on disk.
#[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display(), out_root = %out_root.display()))]
pub fn generate(data_dir: &Path, out_root: &Path) -> Result<()> {
    let mut datasets = load_datasets(data_dir)?;
    clean_datasets(&mut datasets);
    create_section_dirs(out_root)?;
    print_summary_statistics(&datasets);

    let section_iii = out_root.join(SECTION_DIRS[0]);
    descriptive_charts(&datasets, &section_iii)?;

    manufacturing::append_cost_metrics(&mut datasets.manufacturing)?;
    let plants = manufacturing::plant_summary(&datasets.manufacturing)?;
    print_diagnostic_summary(&plants);
    let correlation = manufacturing::correlation_matrix(&datasets.manufacturing)?;
    let section_iv = out_root.join(SECTION_DIRS[1]);
    diagnostic_charts(&datasets.manufacturing, &plants, &correlation, &section_iv)?;

    procurement::append_emission_intensity(&mut datasets.procurement)?;
    let suppliers = procurement::supplier_summary(&datasets.procurement)?;
    let yearly = revenue::yearly_totals(&datasets.rd)?;
    let trend = revenue::forecast(&yearly)?;
    let section_v = out_root.join(SECTION_DIRS[2]);
    sustainability_charts(&datasets, &suppliers, &yearly, &trend, &section_v)?;

    let reliability = procurement::reliability_summary(&datasets.procurement)?;
    let section_vi = out_root.join(SECTION_DIRS[3]);
    strategic_charts(&reliability, &section_vi)?;

    let appendix = out_root.join(SECTION_DIRS[4]);
    appendix_charts(&datasets.manufacturing, &correlation, &reliability, &appendix)?;

    println!(
        "All sections executed successfully. Charts and summary tables saved under {}.",
        out_root.display()
    );
    Ok(())
}

/// The five loaded frames.
struct Datasets {
    rd: Frame,
    sales: Frame,
    product: Frame,
    manufacturing: Frame,
    procurement: Frame,
}

impl Datasets {
    fn iter_mut(&mut self) -> [(DatasetKind, &mut Frame); 5] {
        [
            (DatasetKind::ResearchDevelopment, &mut self.rd),
            (DatasetKind::Sales, &mut self.sales),
            (DatasetKind::Product, &mut self.product),
            (DatasetKind::Manufacturing, &mut self.manufacturing),
            (DatasetKind::Procurement, &mut self.procurement),
        ]
    }

    fn iter(&self) -> [(DatasetKind, &Frame); 5] {
        [
            (DatasetKind::ResearchDevelopment, &self.rd),
            (DatasetKind::Sales, &self.sales),
            (DatasetKind::Product, &self.product),
            (DatasetKind::Manufacturing, &self.manufacturing),
            (DatasetKind::Procurement, &self.procurement),
        ]
    }
}

#[instrument(level = "info", skip_all)]
fn load_datasets(data_dir: &Path) -> Result<Datasets> {
    let load = |kind: DatasetKind| -> Result<Frame> {
        let path = input_path(data_dir, kind);
        let frame = excel_read::read_frame(&path, kind.label())?;
        info!(dataset = kind.label(), rows = frame.rows.len(), "dataset loaded");
        Ok(frame)
    };

    Ok(Datasets {
        rd: load(DatasetKind::ResearchDevelopment)?,
        sales: load(DatasetKind::Sales)?,
        product: load(DatasetKind::Product)?,
        manufacturing: load(DatasetKind::Manufacturing)?,
        procurement: load(DatasetKind::Procurement)?,
    })
}

/// Trims headers, drops duplicate rows, reports shapes, and zero-fills the
/// two datasets whose gaps are semantically zero.
fn clean_datasets(datasets: &mut Datasets) {
    for (kind, frame) in datasets.iter_mut() {
        frame.trim_headers();
        frame.dedup_rows();
        let (rows, cols) = frame.shape();
        println!("{} dataset shape: ({rows}, {cols})", kind.label());
    }

    datasets.manufacturing.fill_missing_with_zero();
    datasets.procurement.fill_missing_with_zero();
}

fn create_section_dirs(out_root: &Path) -> Result<()> {
    for section in SECTION_DIRS {
        fs::create_dir_all(out_root.join(section))?;
    }
    Ok(())
}

fn print_summary_statistics(datasets: &Datasets) {
    println!("=== Summary Statistics ===");
    for (kind, frame) in datasets.iter() {
        let profiles = describe::describe(frame);
        println!("\n{} Dataset:", kind.label());
        println!("{}", describe::render_table(&profiles));
    }
}

fn print_diagnostic_summary(plants: &[PlantSummary]) {
    let mut builder = Builder::default();
    builder.push_record(["Plant_Code", "Yield_mean", "CostVar_mean", "EffRatio_mean"]);
    for plant in plants {
        builder.push_record([
            plant.plant.clone(),
            format!("{:.2}", plant.yield_mean),
            format!("{:.2}", plant.cost_variance_mean),
            format!("{:.2}", plant.efficiency_mean),
        ]);
    }
    println!("\n===== Diagnostic Summary =====");
    println!("{}", builder.build().with(Style::markdown()));
}

#[instrument(level = "info", skip_all, fields(out = %out_dir.display()))]
fn descriptive_charts(datasets: &Datasets, out_dir: &Path) -> Result<()> {
    let rd_stages = stats::value_counts(datasets.rd.text_column(columns::STAGE)?);
    charts::write_png(
        &charts::horizontal_count_bar("R&D Project Stage Distribution", "Count", "Stage", &rd_stages),
        &out_dir.join("III1_RD_Funnel.png"),
        charts::SIZE_SMALL,
    );

    let sales_stages = stats::value_counts(datasets.sales.text_column(columns::STAGE)?);
    charts::write_png(
        &charts::horizontal_count_bar(
            "Sales Opportunity Stage Distribution",
            "Count",
            "Stage",
            &sales_stages,
        ),
        &out_dir.join("III2_Sales_Funnel.png"),
        charts::SIZE_SMALL,
    );

    let mut interests =
        stats::value_counts(datasets.sales.text_column(columns::PRODUCT_INTEREST)?);
    interests.truncate(10);
    charts::write_png(
        &charts::horizontal_count_bar(
            "Top Product Interests (Sales Pipeline)",
            "Count",
            "Product",
            &interests,
        ),
        &out_dir.join("III3_ProductInterest.png"),
        charts::SIZE_WIDE,
    );

    let plant_codes = datasets.manufacturing.text_column(columns::PLANT_CODE)?;
    let yields = datasets.manufacturing.numeric_column(columns::YIELD_PCT)?;
    let yield_means = stats::group_means(&plant_codes, &yields);
    charts::write_png(
        &charts::vertical_value_bar("Average Yield (%) by Plant", columns::YIELD_PCT, &yield_means),
        &out_dir.join("III4_Yield_byPlant.png"),
        charts::SIZE_WIDE,
    );

    let on_time = stats::value_counts(datasets.procurement.text_column(columns::ON_TIME)?);
    charts::write_png(
        &charts::vertical_count_bar(
            "Procurement: On-Time vs Late Deliveries",
            "Count",
            &on_time,
            &charts::ON_TIME_PALETTE,
        ),
        &out_dir.join("III5_OnTime_vs_Late.png"),
        charts::SIZE_SMALL,
    );

    info!(chart_count = 5, "descriptive charts rendered");
    Ok(())
}

#[instrument(level = "info", skip_all, fields(out = %out_dir.display()))]
fn diagnostic_charts(
    mfg: &Frame,
    plants: &[PlantSummary],
    correlation: &CorrelationMatrix,
    out_dir: &Path,
) -> Result<()> {
    let plant_codes = mfg.text_column(columns::PLANT_CODE)?;
    let yields = mfg.numeric_column(columns::YIELD_PCT)?;
    charts::write_png(
        &charts::grouped_box_plot(
            "Yield Distribution by Plant",
            columns::YIELD_PCT,
            &plant_codes,
            &yields,
        ),
        &out_dir.join("IV1_Yield_byPlant.png"),
        charts::SIZE_WIDE,
    );

    let variance_pct = mfg.numeric_column(columns::COST_VARIANCE_PCT)?;
    charts::write_png(
        &charts::regression_scatter(
            "Yield vs Cost Variance (%)",
            columns::YIELD_PCT,
            columns::COST_VARIANCE_PCT,
            &yields,
            &variance_pct,
            charts::PALETTE[1],
        ),
        &out_dir.join("IV2_Yield_vs_CostVariance.png"),
        charts::SIZE_SMALL,
    );

    let variance_means: Vec<(String, f64)> = plants
        .iter()
        .map(|plant| (plant.plant.clone(), plant.cost_variance_mean))
        .collect();
    charts::write_png(
        &charts::vertical_value_bar(
            "Average Cost Variance (%) by Plant",
            columns::COST_VARIANCE_PCT,
            &variance_means,
        ),
        &out_dir.join("IV3_CostVariance_byPlant.png"),
        charts::SIZE_SMALL,
    );

    charts::write_png(
        &charts::annotated_heatmap(
            "Correlation Matrix: Production Efficiency Drivers",
            &correlation.labels,
            &correlation.values,
            ColorScalePalette::Blues,
        ),
        &out_dir.join("IV4_CorrelationMatrix.png"),
        charts::SIZE_WIDE,
    );

    info!(chart_count = 4, "diagnostic charts rendered");
    Ok(())
}

#[instrument(level = "info", skip_all, fields(out = %out_dir.display()))]
fn sustainability_charts(
    datasets: &Datasets,
    suppliers: &[SupplierSummary],
    yearly: &[YearlyRevenue],
    trend: &[ForecastPoint],
    out_dir: &Path,
) -> Result<()> {
    let totals: Vec<(String, f64)> = suppliers
        .iter()
        .map(|summary| (summary.supplier.clone(), summary.total_emissions))
        .collect();
    charts::write_png(
        &charts::horizontal_value_bar("Total CO2 Impact by Supplier", "Total Emissions (kg)", &totals),
        &out_dir.join("V1_CO2_bySupplier.png"),
        charts::SIZE_WIDE,
    );

    let on_time = stats::value_counts(datasets.procurement.text_column(columns::ON_TIME)?);
    charts::write_png(
        &charts::vertical_count_bar(
            "On-Time vs Late Deliveries",
            "Count",
            &on_time,
            &charts::PALETTE,
        ),
        &out_dir.join("V2_OnTime_vs_Late.png"),
        charts::SIZE_WIDE,
    );

    let industries = datasets.rd.text_column(columns::TARGET_INDUSTRY)?;
    let revenue_values = datasets.rd.numeric_column(columns::EST_ANNUAL_REVENUE)?;
    let industry_means = stats::group_means(&industries, &revenue_values);
    charts::write_png(
        &charts::horizontal_value_bar(
            "Estimated Annual Revenue by Industry",
            columns::EST_ANNUAL_REVENUE,
            &industry_means,
        ),
        &out_dir.join("V3_RD_Revenue_byIndustry.png"),
        charts::SIZE_WIDE,
    );

    let actual: Vec<(i32, f64)> = yearly.iter().map(|point| (point.year, point.total)).collect();
    let projected: Vec<(i32, f64)> = trend
        .iter()
        .map(|point| (point.year, point.forecast))
        .collect();
    charts::write_png(
        &charts::forecast_chart("Projected R&D Revenue Growth (2024-2030)", &actual, &projected),
        &out_dir.join("V4_RD_Revenue_Forecast.png"),
        charts::SIZE_WIDE,
    );

    info!(chart_count = 4, "sustainability charts rendered");
    Ok(())
}

#[instrument(level = "info", skip_all, fields(out = %out_dir.display()))]
fn strategic_charts(reliability: &[SupplierReliability], out_dir: &Path) -> Result<()> {
    let rates: Vec<f64> = reliability.iter().map(|s| s.on_time_rate).collect();
    let intensities: Vec<f64> = reliability.iter().map(|s| s.mean_emissions).collect();
    charts::write_png(
        &charts::regression_scatter(
            "Supplier Reliability vs Emission Intensity",
            "OnTime_Rate",
            "Mean_Intensity",
            &rates,
            &intensities,
            charts::PALETTE[1],
        ),
        &out_dir.join("VI1_Supplier_Reliability_Emissions.png"),
        charts::SIZE_WIDE,
    );

    let themes: Vec<(f64, f64, String)> = STRATEGIC_THEMES
        .iter()
        .map(|(theme, impact, feasibility)| (*feasibility, *impact, theme.to_string()))
        .collect();
    charts::write_png(
        &charts::labelled_scatter("Strategic Prioritization Matrix", "Feasibility", "Impact", &themes),
        &out_dir.join("VI_Impact_vs_Feasibility.png"),
        charts::SIZE_SMALL,
    );

    info!(chart_count = 2, "strategic charts rendered");
    Ok(())
}

/// Re-renders two earlier views with the alternate colouring for the
/// appendix pages.
#[instrument(level = "info", skip_all, fields(out = %out_dir.display()))]
fn appendix_charts(
    mfg: &Frame,
    correlation: &CorrelationMatrix,
    reliability: &[SupplierReliability],
    out_dir: &Path,
) -> Result<()> {
    charts::write_png(
        &charts::annotated_heatmap(
            "Appendix: Correlation Matrix (Replotted)",
            &correlation.labels,
            &correlation.values,
            ColorScalePalette::YlGnBu,
        ),
        &out_dir.join("Appendix_CorrelationMatrix.png"),
        charts::SIZE_WIDE,
    );

    let yields = mfg.numeric_column(columns::YIELD_PCT)?;
    let variance_pct = mfg.numeric_column(columns::COST_VARIANCE_PCT)?;
    charts::write_png(
        &charts::regression_scatter(
            "Appendix: Yield vs Cost Variance (Regression)",
            columns::YIELD_PCT,
            columns::COST_VARIANCE_PCT,
            &yields,
            &variance_pct,
            charts::PALETTE[2],
        ),
        &out_dir.join("Appendix_Yield_vs_CostVariance.png"),
        charts::SIZE_WIDE,
    );

    let rates: Vec<f64> = reliability.iter().map(|s| s.on_time_rate).collect();
    let intensities: Vec<f64> = reliability.iter().map(|s| s.mean_emissions).collect();
    charts::write_png(
        &charts::regression_scatter(
            "Appendix: Supplier Reliability vs Emission Intensity",
            "OnTime_Rate",
            "Mean_Intensity",
            &rates,
            &intensities,
            charts::PALETTE[2],
        ),
        &out_dir.join("Appendix_Supplier_Reliability_Emissions.png"),
        charts::SIZE_WIDE,
    );

    info!(chart_count = 3, "appendix charts rendered");
    Ok(())
}
