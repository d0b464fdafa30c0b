//! 비용 곡선 불변식에 대한 속성 기반 테스트.
use fleet_replacement_toolbox::cost_model::{analyze, FleetParameters};
use proptest::prelude::*;

fn params_strategy() -> impl Strategy<Value = FleetParameters> {
    (
        0.0..5_000.0f64,
        0.0..1_000.0f64,
        0.0..12.0f64,
        0.0..12.0f64,
        1.0..200_000.0f64,
        1u32..5_000,
        2.0..40.0f64,
    )
        .prop_map(
            |(repair, downtime, predicted, unpredicted, new_car, cars, lifetime)| FleetParameters {
                cost_per_repair: repair,
                non_availability_cost_per_day: downtime,
                predicted_repairs_per_year: predicted,
                unpredicted_repairs_per_year: unpredicted,
                cost_of_new_car: new_car,
                number_of_cars: cars,
                expected_lifetime_years: lifetime,
            },
        )
}

proptest! {
    #[test]
    fn cumulative_is_sum_of_components(params in params_strategy(), samples in 1usize..300) {
        let res = analyze(&params, samples).unwrap();
        let c = &res.curves;
        prop_assert_eq!(c.len(), samples);
        for i in 0..c.len() {
            prop_assert_eq!(c.cumulative_cost[i], c.total_repair_cost[i] + c.preventive_cost[i]);
        }
    }

    #[test]
    fn single_car_curves_match_per_vehicle_sum(params in params_strategy(), samples in 1usize..200) {
        let params = FleetParameters { number_of_cars: 1, ..params };
        let res = analyze(&params, samples).unwrap();
        let c = &res.curves;
        for i in 0..c.len() {
            prop_assert_eq!(c.total_repair_cost[i], c.repair_cost[i] + c.non_availability_cost[i]);
            prop_assert_eq!(c.cumulative_cost[i], c.total_repair_cost[i] + c.preventive_cost[i]);
        }
    }

    #[test]
    fn preventive_strictly_decreasing(params in params_strategy(), samples in 2usize..300) {
        let res = analyze(&params, samples).unwrap();
        for w in res.curves.preventive_cost.windows(2) {
            prop_assert!(w[0] > w[1], "{} !> {}", w[0], w[1]);
        }
    }

    #[test]
    fn total_repair_non_decreasing(params in params_strategy(), samples in 2usize..300) {
        let res = analyze(&params, samples).unwrap();
        for w in res.curves.total_repair_cost.windows(2) {
            prop_assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn optimum_is_first_minimum(params in params_strategy(), samples in 1usize..300) {
        let res = analyze(&params, samples).unwrap();
        let c = &res.curves.cumulative_cost;
        let min = c.iter().cloned().fold(f64::INFINITY, f64::min);
        prop_assert_eq!(res.optimum.cost, min);
        prop_assert_eq!(c[res.optimum.index], min);
        prop_assert!(c[..res.optimum.index].iter().all(|&v| v > min));
        prop_assert_eq!(res.optimum.year, res.curves.years[res.optimum.index]);
    }

    #[test]
    fn doubling_fleet_doubles_scaled_curves(params in params_strategy(), samples in 1usize..200) {
        let single = analyze(&params, samples).unwrap();
        let doubled = analyze(
            &FleetParameters { number_of_cars: params.number_of_cars * 2, ..params.clone() },
            samples,
        )
        .unwrap();
        let (a, b) = (&single.curves, &doubled.curves);
        for i in 0..a.len() {
            prop_assert_eq!(b.total_repair_cost[i], 2.0 * a.total_repair_cost[i]);
            prop_assert_eq!(b.preventive_cost[i], 2.0 * a.preventive_cost[i]);
            prop_assert_eq!(b.cumulative_cost[i], 2.0 * a.cumulative_cost[i]);
            prop_assert_eq!(b.repair_cost[i], a.repair_cost[i]);
            prop_assert_eq!(b.non_availability_cost[i], a.non_availability_cost[i]);
        }
        prop_assert_eq!(single.optimum.index, doubled.optimum.index);
    }

    #[test]
    fn axis_spans_one_to_horizon(params in params_strategy(), samples in 2usize..300) {
        let res = analyze(&params, samples).unwrap();
        let years = &res.curves.years;
        prop_assert_eq!(years[0], 1.0);
        prop_assert_eq!(years[years.len() - 1], params.expected_lifetime_years);
        for w in years.windows(2) {
            prop_assert!(w[0] < w[1]);
        }
    }
}
