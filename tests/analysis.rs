use greenfuture_report::ReportError;
use greenfuture_report::analysis::stats::LinearFit;
use greenfuture_report::analysis::{describe, manufacturing, procurement, revenue, stats};
use greenfuture_report::model::{Cell, Frame, columns};

fn frame(name: &str, headers: &[&str], rows: Vec<Vec<Cell>>) -> Frame {
    Frame::new(
        name,
        headers.iter().map(|h| h.to_string()).collect(),
        rows,
    )
}

fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

fn approx(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() < 1e-9
}

fn manufacturing_frame() -> Frame {
    frame(
        "Manufacturing",
        &[
            columns::PLANT_CODE,
            columns::YIELD_PCT,
            columns::STD_COST_PER_MT,
            columns::ACTUAL_COST_PER_MT,
            columns::PLANNED_QUANTITY,
            columns::ACTUAL_QUANTITY,
        ],
        vec![
            vec![
                text("GF-01"),
                Cell::Number(90.0),
                Cell::Number(100.0),
                Cell::Number(110.0),
                Cell::Number(50.0),
                Cell::Number(40.0),
            ],
            vec![
                text("GF-01"),
                Cell::Number(94.0),
                Cell::Number(100.0),
                Cell::Number(95.0),
                Cell::Number(50.0),
                Cell::Number(55.0),
            ],
            vec![
                text("GF-02"),
                Cell::Number(80.0),
                Cell::Number(200.0),
                Cell::Number(230.0),
                Cell::Number(80.0),
                Cell::Number(60.0),
            ],
        ],
    )
}

#[test]
fn cost_variance_columns_follow_row_formulas() {
    let mut mfg = manufacturing_frame();
    manufacturing::append_cost_metrics(&mut mfg).expect("derived columns appended");

    let std_cost = mfg.numeric_column(columns::STD_COST_PER_MT).expect("column");
    let actual_cost = mfg
        .numeric_column(columns::ACTUAL_COST_PER_MT)
        .expect("column");
    let variance = mfg.numeric_column(columns::COST_VARIANCE_ABS).expect("column");
    let variance_pct = mfg.numeric_column(columns::COST_VARIANCE_PCT).expect("column");

    for index in 0..mfg.rows.len() {
        assert!(approx(variance[index], actual_cost[index] - std_cost[index]));
        assert!(approx(
            variance_pct[index],
            variance[index] / std_cost[index] * 100.0
        ));
    }
}

#[test]
fn efficiency_ratio_is_actual_over_planned() {
    let mut mfg = manufacturing_frame();
    manufacturing::append_cost_metrics(&mut mfg).expect("derived columns appended");

    let efficiency = mfg.numeric_column(columns::EFFICIENCY_RATIO).expect("column");
    assert!(approx(efficiency[0], 40.0 / 50.0));
    assert!(approx(efficiency[1], 55.0 / 50.0));
    assert!(approx(efficiency[2], 60.0 / 80.0));
}

#[test]
fn zero_standard_cost_yields_non_finite_percentage() {
    let mut mfg = frame(
        "Manufacturing",
        &[
            columns::PLANT_CODE,
            columns::YIELD_PCT,
            columns::STD_COST_PER_MT,
            columns::ACTUAL_COST_PER_MT,
            columns::PLANNED_QUANTITY,
            columns::ACTUAL_QUANTITY,
        ],
        vec![vec![
            text("GF-03"),
            Cell::Number(85.0),
            Cell::Number(0.0),
            Cell::Number(120.0),
            Cell::Number(10.0),
            Cell::Number(9.0),
        ]],
    );
    manufacturing::append_cost_metrics(&mut mfg).expect("derived columns appended");

    let variance_pct = mfg.numeric_column(columns::COST_VARIANCE_PCT).expect("column");
    assert!(variance_pct[0].is_infinite());
}

#[test]
fn plant_summary_means_match_arithmetic_means() {
    let mut mfg = manufacturing_frame();
    manufacturing::append_cost_metrics(&mut mfg).expect("derived columns appended");

    let plants = manufacturing::plant_summary(&mfg).expect("summary built");
    assert_eq!(plants.len(), 2);

    assert_eq!(plants[0].plant, "GF-01");
    assert!(approx(plants[0].yield_mean, (90.0 + 94.0) / 2.0));
    assert!(approx(plants[0].cost_variance_mean, (10.0 - 5.0) / 2.0));
    assert!(approx(plants[0].efficiency_mean, (0.8 + 1.1) / 2.0));

    assert_eq!(plants[1].plant, "GF-02");
    assert!(approx(plants[1].cost_variance_mean, 15.0));
}

#[test]
fn correlation_matrix_has_unit_diagonal() {
    let mut mfg = manufacturing_frame();
    manufacturing::append_cost_metrics(&mut mfg).expect("derived columns appended");

    let correlation = manufacturing::correlation_matrix(&mfg).expect("matrix built");
    assert_eq!(correlation.labels.len(), 5);
    for (index, row) in correlation.values.iter().enumerate() {
        assert!(approx(row[index], 1.0));
    }
}

fn procurement_frame() -> Frame {
    frame(
        "Procurement",
        &[columns::SUPPLIER_NAME, columns::CO2_EMISSIONS, columns::QTY, columns::ON_TIME],
        vec![
            vec![text("EcoChem"), Cell::Number(120.0), Cell::Number(60.0), text("Y")],
            vec![text("EcoChem"), Cell::Number(80.0), Cell::Number(40.0), text("Y")],
            vec![text("EcoChem"), Cell::Number(100.0), Cell::Number(25.0), text("Y")],
            vec![text("EcoChem"), Cell::Number(60.0), Cell::Number(30.0), text("N")],
            vec![text("BioFeed"), Cell::Number(200.0), Cell::Number(50.0), text("N")],
        ],
    )
}

#[test]
fn emission_intensity_is_co2_over_quantity() {
    let mut proc = procurement_frame();
    procurement::append_emission_intensity(&mut proc).expect("derived column appended");

    let intensity = proc.numeric_column(columns::EMISSION_INTENSITY).expect("column");
    assert!(approx(intensity[0], 2.0));
    assert!(approx(intensity[1], 2.0));
    assert!(approx(intensity[2], 4.0));
    assert!(approx(intensity[4], 4.0));
}

#[test]
fn on_time_rate_is_fraction_of_y_rows() {
    let mut proc = procurement_frame();
    procurement::append_emission_intensity(&mut proc).expect("derived column appended");

    let suppliers = procurement::supplier_summary(&proc).expect("summary built");
    assert_eq!(suppliers.len(), 2);

    assert_eq!(suppliers[0].supplier, "BioFeed");
    assert!(approx(suppliers[0].on_time_rate, 0.0));

    assert_eq!(suppliers[1].supplier, "EcoChem");
    assert!(approx(suppliers[1].on_time_rate, 0.75));
    assert!(approx(suppliers[1].on_time_pct(), 75.0));
    assert!(approx(suppliers[1].total_emissions, 360.0));
}

#[test]
fn reliability_summary_uses_raw_emission_means() {
    let mut proc = procurement_frame();
    procurement::append_emission_intensity(&mut proc).expect("derived column appended");

    let reliability = procurement::reliability_summary(&proc).expect("summary built");
    assert_eq!(reliability.len(), 2);
    assert_eq!(reliability[1].supplier, "EcoChem");
    assert!(approx(reliability[1].mean_emissions, 90.0));
    assert!(approx(reliability[1].on_time_rate, 0.75));
}

#[test]
fn yearly_totals_group_by_launch_year_and_skip_blanks() {
    let rd = frame(
        "R&D",
        &[
            columns::STAGE,
            columns::TARGET_INDUSTRY,
            columns::EST_ANNUAL_REVENUE,
            columns::EST_LAUNCH_DATE,
        ],
        vec![
            vec![text("Pilot"), text("Energy"), Cell::Number(12.0), text("2024-03-01")],
            vec![text("Scale"), text("Energy"), Cell::Number(8.0), text("2024-11-20")],
            vec![text("Pilot"), text("Agro"), Cell::Number(5.0), text("2025-01-15")],
            vec![text("Idea"), text("Agro"), Cell::Number(99.0), Cell::Empty],
        ],
    );

    let yearly = revenue::yearly_totals(&rd).expect("totals built");
    assert_eq!(yearly.len(), 2);
    assert_eq!(yearly[0].year, 2024);
    assert!(approx(yearly[0].total, 20.0));
    assert_eq!(yearly[1].year, 2025);
    assert!(approx(yearly[1].total, 5.0));
}

#[test]
fn launch_year_accepts_excel_serials() {
    let year = revenue::launch_year(&Cell::DateTime(45292.0)).expect("serial decoded");
    assert_eq!(year, 2024);
}

#[test]
fn unparseable_launch_date_aborts() {
    let error = revenue::launch_year(&text("next spring")).expect_err("date invalid");
    assert!(matches!(error, ReportError::InvalidDate { ref value, .. } if value == "next spring"));
}

#[test]
fn forecast_spans_2024_through_2030() {
    let yearly = vec![
        revenue::YearlyRevenue { year: 2021, total: 10.0 },
        revenue::YearlyRevenue { year: 2022, total: 20.0 },
        revenue::YearlyRevenue { year: 2023, total: 30.0 },
    ];

    let trend = revenue::forecast(&yearly).expect("trend fitted");
    assert_eq!(trend.len(), 7);
    assert_eq!(trend[0].year, 2024);
    assert_eq!(trend[6].year, 2030);
    assert!(approx(trend[0].forecast, 40.0));
    assert!(approx(trend[6].forecast, 100.0));
}

#[test]
fn forecast_needs_two_distinct_years() {
    let yearly = vec![revenue::YearlyRevenue { year: 2024, total: 10.0 }];
    let error = revenue::forecast(&yearly).expect_err("degenerate fit");
    assert!(matches!(error, ReportError::Regression(_)));
}

#[test]
fn linear_fit_recovers_exact_line() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let y = [3.0, 5.0, 7.0, 9.0];

    let fit = LinearFit::fit(&x, &y).expect("fit exists");
    assert!(approx(fit.slope, 2.0));
    assert!(approx(fit.intercept, 1.0));
    assert!(approx(fit.predict(10.0), 21.0));
}

#[test]
fn pearson_detects_perfect_correlation() {
    let x = [1.0, 2.0, 3.0];
    assert!(approx(stats::pearson(&x, &[2.0, 4.0, 6.0]), 1.0));
    assert!(approx(stats::pearson(&x, &[6.0, 4.0, 2.0]), -1.0));
}

#[test]
fn percentiles_interpolate_linearly() {
    let values = [1.0, 2.0, 3.0, 4.0];
    assert!(approx(stats::percentile(&values, 0.25).expect("q1"), 1.75));
    assert!(approx(stats::percentile(&values, 0.5).expect("median"), 2.5));
    assert!(approx(stats::percentile(&values, 1.0).expect("max"), 4.0));
}

#[test]
fn sample_std_uses_one_degree_of_freedom() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let std = stats::sample_std(&values).expect("std exists");
    assert!(approx(std * std, 32.0 / 7.0));
}

#[test]
fn value_counts_order_and_blank_handling() {
    let values = ["B", "A", "B", "", "C", "A", "B"]
        .into_iter()
        .map(str::to_string);

    let counts = stats::value_counts(values);
    assert_eq!(
        counts,
        vec![
            ("B".to_string(), 3),
            ("A".to_string(), 2),
            ("C".to_string(), 1),
        ]
    );
}

#[test]
fn describe_profiles_numeric_and_text_columns() {
    let sales = frame(
        "Sales",
        &[columns::STAGE, "Amount"],
        vec![
            vec![text("Qualify"), Cell::Number(10.0)],
            vec![text("Qualify"), Cell::Number(30.0)],
            vec![text("Close"), Cell::Empty],
        ],
    );

    let profiles = describe::describe(&sales);
    assert_eq!(profiles.len(), 2);

    assert_eq!(profiles[0].count, 3);
    assert_eq!(profiles[0].unique, Some(2));
    assert_eq!(profiles[0].top.as_deref(), Some("Qualify"));
    assert_eq!(profiles[0].freq, Some(2));

    assert_eq!(profiles[1].count, 2);
    assert_eq!(profiles[1].mean, Some(20.0));
    assert_eq!(profiles[1].min, Some(10.0));
    assert_eq!(profiles[1].max, Some(30.0));
}
