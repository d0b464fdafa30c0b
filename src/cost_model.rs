//! 차량 교체 시점 비용 모델.
//!
//! 수리비/비가동 손실(연수에 비례해 누적)과 신차 구입비 상각(연수에 반비례)을
//! 시간축 위에서 더한 뒤, 누적 비용이 최소가 되는 연수를 찾는다.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// 기본 샘플 개수.
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// 수리 1건당 비가동 일수. 입력으로 노출하지 않는 고정값이다.
pub const DOWNTIME_DAYS_PER_REPAIR: f64 = 1.0;

/// 시간축 시작점 [년].
const AXIS_START_YEARS: f64 = 1.0;

/// 입력 검증 오류. 발생 시 계산은 수행되지 않는다.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("number of cars must be at least 1 (got {0})")]
    FleetTooSmall(u32),

    #[error("expected lifetime must be at least 1 year (got {0})")]
    HorizonTooShort(f64),

    #[error("sample count must be at least 1")]
    NoSamples,

    #[error("amortization year must be positive (got {0})")]
    NonPositiveYear(f64),

    #[error("computed costs exceed the representable range")]
    Overflow,
}

/// 비용 모델 입력 파라미터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetParameters {
    /// 수리 1건당 비용 [통화/건]
    pub cost_per_repair: f64,
    /// 비가동 하루당 손실 [통화/일]
    pub non_availability_cost_per_day: f64,
    /// 연간 예정 수리 횟수 [건/년]
    pub predicted_repairs_per_year: f64,
    /// 연간 돌발 수리 횟수 [건/년]
    pub unpredicted_repairs_per_year: f64,
    /// 신차 구입비 [통화]
    pub cost_of_new_car: f64,
    /// 보유 차량 대수 (1 이상)
    pub number_of_cars: u32,
    /// 분석 기간 상한 [년] (1 이상)
    pub expected_lifetime_years: f64,
}

impl Default for FleetParameters {
    fn default() -> Self {
        Self {
            cost_per_repair: 500.0,
            non_availability_cost_per_day: 100.0,
            predicted_repairs_per_year: 2.0,
            unpredicted_repairs_per_year: 1.0,
            cost_of_new_car: 25_000.0,
            number_of_cars: 100,
            expected_lifetime_years: 10.0,
        }
    }
}

impl FleetParameters {
    /// 연간 총 수리 횟수(예정 + 돌발).
    pub fn repairs_per_year(&self) -> f64 {
        self.predicted_repairs_per_year + self.unpredicted_repairs_per_year
    }

    /// 모든 제약을 검사한다.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let reals = [
            ("cost per repair", self.cost_per_repair),
            (
                "non-availability cost per day",
                self.non_availability_cost_per_day,
            ),
            ("predicted repairs per year", self.predicted_repairs_per_year),
            (
                "unpredicted repairs per year",
                self.unpredicted_repairs_per_year,
            ),
            ("cost of new car", self.cost_of_new_car),
            ("expected lifetime", self.expected_lifetime_years),
        ];
        for (field, value) in reals {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(ValidationError::Negative { field, value });
            }
        }
        if self.number_of_cars < 1 {
            return Err(ValidationError::FleetTooSmall(self.number_of_cars));
        }
        if self.expected_lifetime_years < AXIS_START_YEARS {
            return Err(ValidationError::HorizonTooShort(
                self.expected_lifetime_years,
            ));
        }
        Ok(())
    }
}

/// 시간축과 비용 곡선.
///
/// `repair_cost`, `non_availability_cost`는 차량 1대 기준이고
/// 나머지 세 곡선은 차량 대수를 곱한 값이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCurves {
    pub years: Vec<f64>,
    pub repair_cost: Vec<f64>,
    pub non_availability_cost: Vec<f64>,
    pub total_repair_cost: Vec<f64>,
    pub preventive_cost: Vec<f64>,
    pub cumulative_cost: Vec<f64>,
}

impl CostCurves {
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// 최적 교체 시점.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplacementOptimum {
    pub index: usize,
    /// 최적 교체 연수 [년]
    pub year: f64,
    /// 해당 시점의 차량 전체 누적 비용 [통화]
    pub cost: f64,
}

/// 분석 결과 전체.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetAnalysis {
    pub parameters: FleetParameters,
    pub curves: CostCurves,
    pub optimum: ReplacementOptimum,
}

/// 1년부터 `end`년까지 `samples`개로 등분한 시간축을 만든다. 마지막 점은 `end`와 정확히 같다.
pub fn time_axis(end: f64, samples: usize) -> Result<Vec<f64>, ValidationError> {
    if samples < 1 {
        return Err(ValidationError::NoSamples);
    }
    if !end.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "expected lifetime",
        });
    }
    if end < AXIS_START_YEARS {
        return Err(ValidationError::HorizonTooShort(end));
    }
    if samples == 1 {
        return Ok(vec![AXIS_START_YEARS]);
    }
    let step = (end - AXIS_START_YEARS) / (samples - 1) as f64;
    let mut axis: Vec<f64> = (0..samples)
        .map(|i| AXIS_START_YEARS + i as f64 * step)
        .collect();
    axis[samples - 1] = end;
    Ok(axis)
}

/// 신차 구입비를 경과 연수로 나눈 상각 비용. 0 이하 연수는 나누기 전에 거부한다.
pub fn amortized_cost(cost_of_new_car: f64, year: f64) -> Result<f64, ValidationError> {
    if !(year.is_finite() && year > 0.0) {
        return Err(ValidationError::NonPositiveYear(year));
    }
    Ok(cost_of_new_car / year)
}

/// 최소값의 첫 번째 인덱스. 빈 슬라이스면 None.
pub fn first_min_index(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v >= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// 비용 곡선을 계산하고 누적 비용 최소 지점을 찾는다.
pub fn analyze(
    params: &FleetParameters,
    samples: usize,
) -> Result<FleetAnalysis, ValidationError> {
    params.validate()?;
    let years = time_axis(params.expected_lifetime_years, samples)?;

    let repairs = params.repairs_per_year();
    let repair_cost: Vec<f64> = years
        .iter()
        .map(|&t| repairs * params.cost_per_repair * t)
        .collect();
    let non_availability_cost: Vec<f64> = years
        .iter()
        .map(|&t| repairs * params.non_availability_cost_per_day * DOWNTIME_DAYS_PER_REPAIR * t)
        .collect();
    let preventive_per_car = years
        .iter()
        .map(|&t| amortized_cost(params.cost_of_new_car, t))
        .collect::<Result<Vec<f64>, _>>()?;

    // 대수 배율 적용 후 누적 곡선은 두 배율 곡선의 합으로 다시 구성한다.
    let fleet = f64::from(params.number_of_cars);
    let total_repair_cost: Vec<f64> = repair_cost
        .iter()
        .zip(&non_availability_cost)
        .map(|(r, n)| (r + n) * fleet)
        .collect();
    let preventive_cost: Vec<f64> = preventive_per_car.iter().map(|p| p * fleet).collect();
    let cumulative_cost: Vec<f64> = total_repair_cost
        .iter()
        .zip(&preventive_cost)
        .map(|(r, p)| r + p)
        .collect();
    // 유한한 입력이라도 곱셈 결과가 inf가 될 수 있다.
    let all_finite = [
        &repair_cost,
        &non_availability_cost,
        &total_repair_cost,
        &preventive_cost,
        &cumulative_cost,
    ]
    .iter()
    .all(|curve| curve.iter().all(|v| v.is_finite()));
    if !all_finite {
        return Err(ValidationError::Overflow);
    }

    let index = first_min_index(&cumulative_cost).ok_or(ValidationError::NoSamples)?;
    let optimum = ReplacementOptimum {
        index,
        year: years[index],
        cost: cumulative_cost[index],
    };
    debug!(
        samples = years.len(),
        optimal_index = index,
        optimal_year = optimum.year,
        optimal_cost = optimum.cost,
        "fleet cost curves computed"
    );

    Ok(FleetAnalysis {
        parameters: params.clone(),
        curves: CostCurves {
            years,
            repair_cost,
            non_availability_cost,
            total_repair_cost,
            preventive_cost,
            cumulative_cost,
        },
        optimum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_pins_both_ends() {
        let axis = time_axis(10.0, 100).unwrap();
        assert_eq!(axis.len(), 100);
        assert_eq!(axis[0], 1.0);
        assert_eq!(axis[99], 10.0);
        assert!((axis[1] - (1.0 + 9.0 / 99.0)).abs() < 1e-12);
    }

    #[test]
    fn single_sample_axis_is_year_one() {
        assert_eq!(time_axis(7.5, 1).unwrap(), vec![1.0]);
    }

    #[test]
    fn zero_samples_rejected() {
        assert_eq!(time_axis(10.0, 0), Err(ValidationError::NoSamples));
    }

    #[test]
    fn amortization_refuses_zero_year() {
        assert_eq!(
            amortized_cost(25_000.0, 0.0),
            Err(ValidationError::NonPositiveYear(0.0))
        );
        assert_eq!(amortized_cost(25_000.0, 2.0), Ok(12_500.0));
    }

    #[test]
    fn first_min_prefers_lowest_index() {
        assert_eq!(first_min_index(&[3.0, 1.0, 2.0, 1.0]), Some(1));
        assert_eq!(first_min_index(&[5.0, 5.0, 5.0]), Some(0));
        assert_eq!(first_min_index(&[]), None);
    }

    #[test]
    fn negative_rate_is_rejected() {
        let params = FleetParameters {
            unpredicted_repairs_per_year: -1.0,
            ..FleetParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ValidationError::Negative { field: "unpredicted repairs per year", .. })
        ));
    }

    #[test]
    fn nan_input_is_rejected() {
        let params = FleetParameters {
            cost_of_new_car: f64::NAN,
            ..FleetParameters::default()
        };
        assert_eq!(
            params.validate(),
            Err(ValidationError::NotFinite {
                field: "cost of new car"
            })
        );
    }
}
