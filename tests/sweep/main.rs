use dat_market::{
    config::SweepConfig,
    market::{MarketConfig, Scenario},
    sweep::{Algorithm, ResourceIsolation, SweepRow, run_sweep},
};

fn small_sweep() -> SweepConfig {
    SweepConfig {
        user_count: 8,
        resource_count: 5,
        beta_values: vec![0.0, 0.5, 1.0],
        seed: 17,
        calibrate: true,
        ..SweepConfig::default()
    }
}

#[test]
fn given_small_sweep_when_running_then_every_grid_cell_has_one_row() {
    let rows = run_sweep(&MarketConfig::default(), &small_sweep()).expect("sweep should run");

    let revenue_rows = rows
        .iter()
        .filter(|row| matches!(row, SweepRow::Revenue { .. }))
        .count();
    let calibration_rows = rows
        .iter()
        .filter(|row| matches!(row, SweepRow::Calibration { .. }))
        .count();

    assert_eq!(revenue_rows, Scenario::ALL.len() * Algorithm::ALL.len() * 3);
    assert_eq!(calibration_rows, Scenario::ALL.len() * 3);
    for row in &rows {
        if let SweepRow::Revenue { revenue, .. } = row {
            assert!(*revenue >= 0.0);
        }
    }
}

#[test]
fn given_same_seed_when_running_twice_then_rows_are_identical() {
    let sweep = small_sweep();
    let first = run_sweep(&MarketConfig::default(), &sweep).expect("sweep should run");
    let second = run_sweep(&MarketConfig::default(), &sweep).expect("sweep should run");
    assert_eq!(first, second);
}

#[test]
fn given_shared_isolation_when_running_then_sweep_still_completes() {
    let sweep = SweepConfig {
        isolation: ResourceIsolation::Shared,
        scenarios: vec![Scenario::UniformHighDemand],
        ..small_sweep()
    };
    let rows = run_sweep(&MarketConfig::default(), &sweep).expect("sweep should run");
    assert_eq!(rows.len(), Algorithm::ALL.len() * 3 + 3);
}

#[test]
fn given_no_users_when_sweeping_then_every_revenue_and_price_is_zero() {
    let sweep = SweepConfig {
        user_count: 0,
        ..small_sweep()
    };
    let rows = run_sweep(&MarketConfig::default(), &sweep).expect("sweep should run");

    for row in rows {
        match row {
            SweepRow::Revenue { revenue, .. } => assert_eq!(revenue, 0.0),
            SweepRow::Calibration { base_price, .. } => assert_eq!(base_price, 0.0),
        }
    }
}

#[test]
fn given_out_of_range_beta_when_sweeping_then_error_is_reported() {
    let sweep = SweepConfig {
        beta_values: vec![1.5],
        ..small_sweep()
    };
    let err = run_sweep(&MarketConfig::default(), &sweep).expect_err("beta 1.5 must fail");
    assert!(format!("{err:#}").contains("beta"), "unexpected error: {err:#}");
}
