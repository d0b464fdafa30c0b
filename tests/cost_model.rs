//! 기준 시나리오와 입력 검증 회귀 테스트.
use fleet_replacement_toolbox::cost_model::{
    analyze, FleetParameters, ValidationError, DEFAULT_SAMPLE_COUNT,
};

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

#[test]
fn reference_scenario_first_sample() {
    let res = analyze(&FleetParameters::default(), DEFAULT_SAMPLE_COUNT).expect("valid defaults");
    let c = &res.curves;
    assert_eq!(c.len(), 100);
    assert_eq!(c.years[0], 1.0);
    assert_eq!(c.years[99], 10.0);
    // (3*500*1 + 3*100*1 + 25000/1) * 100
    assert_eq!(c.cumulative_cost[0], 2_680_000.0);
    assert_eq!(c.total_repair_cost[0], 180_000.0);
    assert_eq!(c.preventive_cost[0], 2_500_000.0);
    // 차량 1대 기준 곡선은 배율이 적용되지 않는다.
    assert_eq!(c.repair_cost[0], 1_500.0);
    assert_eq!(c.non_availability_cost[0], 300.0);
}

#[test]
fn reference_scenario_optimum_near_analytic_minimum() {
    let res = analyze(&FleetParameters::default(), DEFAULT_SAMPLE_COUNT).unwrap();
    let analytic = (25_000.0_f64 / 1_800.0).sqrt();
    let step = 9.0 / 99.0;
    assert!(
        (res.optimum.year - analytic).abs() <= step / 2.0,
        "optimal year {} vs analytic {analytic}",
        res.optimum.year
    );
    assert_eq!(res.optimum.index, 30);
    assert_close("optimal year", res.optimum.year, 1.0 + 30.0 * step, 1e-12);
    let per_car = 1_800.0 * res.optimum.year + 25_000.0 / res.optimum.year;
    assert_close("optimal cost", res.optimum.cost, per_car * 100.0, 1e-9);

    let c = &res.curves.cumulative_cost;
    assert!(c[..30].windows(2).all(|w| w[0] > w[1]), "decreasing before optimum");
    assert!(c[30..].windows(2).all(|w| w[0] < w[1]), "increasing after optimum");
}

#[test]
fn optimum_year_does_not_depend_on_fleet_size() {
    let base = analyze(&FleetParameters::default(), 100).unwrap();
    for cars in [1, 7, 250, 10_000] {
        let params = FleetParameters {
            number_of_cars: cars,
            ..FleetParameters::default()
        };
        let res = analyze(&params, 100).unwrap();
        assert_eq!(res.optimum.index, base.optimum.index, "cars={cars}");
        assert_eq!(res.optimum.year, base.optimum.year);
    }
}

#[test]
fn single_sample_axis() {
    let res = analyze(&FleetParameters::default(), 1).unwrap();
    assert_eq!(res.curves.years, vec![1.0]);
    assert_eq!(res.optimum.index, 0);
    assert_eq!(res.optimum.year, 1.0);
    assert_eq!(res.optimum.cost, 2_680_000.0);
}

#[test]
fn one_year_horizon_is_flat_axis() {
    let params = FleetParameters {
        expected_lifetime_years: 1.0,
        ..FleetParameters::default()
    };
    let res = analyze(&params, 5).unwrap();
    assert!(res.curves.years.iter().all(|&y| y == 1.0));
    assert_eq!(res.optimum.index, 0);
}

#[test]
fn zero_cars_is_rejected() {
    let params = FleetParameters {
        number_of_cars: 0,
        ..FleetParameters::default()
    };
    assert_eq!(analyze(&params, 100), Err(ValidationError::FleetTooSmall(0)));
}

#[test]
fn short_horizon_is_rejected() {
    let params = FleetParameters {
        expected_lifetime_years: 0.5,
        ..FleetParameters::default()
    };
    assert_eq!(
        analyze(&params, 100),
        Err(ValidationError::HorizonTooShort(0.5))
    );
}

#[test]
fn zero_samples_is_rejected() {
    assert_eq!(
        analyze(&FleetParameters::default(), 0),
        Err(ValidationError::NoSamples)
    );
}

#[test]
fn negative_cost_is_rejected() {
    let params = FleetParameters {
        cost_per_repair: -1.0,
        ..FleetParameters::default()
    };
    let err = analyze(&params, 100).unwrap_err();
    assert_eq!(
        err,
        ValidationError::Negative {
            field: "cost per repair",
            value: -1.0
        }
    );
    assert_eq!(err.to_string(), "cost per repair must not be negative (got -1)");
}

#[test]
fn free_car_optimum_is_first_year() {
    let params = FleetParameters {
        cost_of_new_car: 0.0,
        ..FleetParameters::default()
    };
    let res = analyze(&params, 50).unwrap();
    assert_eq!(res.optimum.index, 0);
}

#[test]
fn no_repairs_optimum_is_horizon_end() {
    let params = FleetParameters {
        predicted_repairs_per_year: 0.0,
        unpredicted_repairs_per_year: 0.0,
        ..FleetParameters::default()
    };
    let res = analyze(&params, 50).unwrap();
    assert_eq!(res.optimum.index, 49);
    assert_eq!(res.optimum.year, 10.0);
}

#[test]
fn all_zero_costs_tie_breaks_to_first_sample() {
    let params = FleetParameters {
        cost_per_repair: 0.0,
        non_availability_cost_per_day: 0.0,
        cost_of_new_car: 0.0,
        ..FleetParameters::default()
    };
    let res = analyze(&params, 20).unwrap();
    assert!(res.curves.cumulative_cost.iter().all(|&c| c == 0.0));
    assert_eq!(res.optimum.index, 0);
}

#[test]
fn overflowing_costs_are_rejected() {
    let params = FleetParameters {
        cost_per_repair: 1e300,
        predicted_repairs_per_year: 1e300,
        ..FleetParameters::default()
    };
    assert_eq!(analyze(&params, 100), Err(ValidationError::Overflow));

    let params = FleetParameters {
        cost_of_new_car: f64::MAX,
        ..FleetParameters::default()
    };
    assert_eq!(analyze(&params, 100), Err(ValidationError::Overflow));
}
