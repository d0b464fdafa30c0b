//! 분석 결과를 사람이 읽는 문장, 표, CSV, JSON으로 내보낸다.

use std::io::Write;

use thiserror::Error;

use crate::cost_model::{CostCurves, FleetAnalysis};
use crate::i18n::{keys, Translator};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

pub const CSV_HEADER: &str =
    "year,repair_cost,non_availability_cost,total_repair_cost,preventive_cost,cumulative_cost";

/// 정수부에 천 단위 구분 기호를 넣는다. 소수점 이하는 반올림해 버린다.
pub fn format_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 && grouped.chars().any(|c| c != '0' && c != ',') {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// 통화 기호를 붙인 금액 문자열. 예: `$2,680,000`
pub fn format_currency(value: f64, symbol: &str) -> String {
    format!("{symbol}{}", format_thousands(value))
}

/// 최적 교체 시점을 한 문장으로 요약한다.
pub fn summary_sentence(analysis: &FleetAnalysis, currency: &str, tr: &Translator) -> String {
    tr.t_with(
        keys::SUMMARY,
        &[
            ("year", format!("{:.1}", analysis.optimum.year)),
            ("cost", format_currency(analysis.optimum.cost, currency)),
        ],
    )
}

/// 차트의 최적점 마커 라벨.
pub fn optimal_marker_label(analysis: &FleetAnalysis, tr: &Translator) -> String {
    tr.t_with(
        keys::OPTIMAL_MARKER,
        &[("year", format!("{:.1}", analysis.optimum.year))],
    )
}

/// 곡선 전체를 CSV로 기록한다.
pub fn write_csv<W: Write>(out: &mut W, curves: &CostCurves) -> Result<(), ReportError> {
    writeln!(out, "{CSV_HEADER}")?;
    for i in 0..curves.len() {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            curves.years[i],
            curves.repair_cost[i],
            curves.non_availability_cost[i],
            curves.total_repair_cost[i],
            curves.preventive_cost[i],
            curves.cumulative_cost[i]
        )?;
    }
    Ok(())
}

pub fn to_json(analysis: &FleetAnalysis) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

/// 약 `rows`개 행으로 솎아낸 요약 표를 기록한다. 최적 행은 항상 포함하고 `*`로 표시한다.
pub fn write_table<W: Write>(
    out: &mut W,
    analysis: &FleetAnalysis,
    rows: usize,
    currency: &str,
    tr: &Translator,
) -> Result<(), ReportError> {
    let curves = &analysis.curves;
    let stride = (curves.len() / rows.max(1)).max(1);
    writeln!(
        out,
        "  {:>8} {:>18} {:>18} {:>18}",
        tr.t(keys::TABLE_YEAR),
        tr.t(keys::TABLE_REPAIR),
        tr.t(keys::TABLE_PREVENTION),
        tr.t(keys::TABLE_CUMULATIVE)
    )?;
    for i in 0..curves.len() {
        let is_optimum = i == analysis.optimum.index;
        if i % stride != 0 && !is_optimum && i + 1 != curves.len() {
            continue;
        }
        writeln!(
            out,
            "{} {:>8.2} {:>18} {:>18} {:>18}",
            if is_optimum { '*' } else { ' ' },
            curves.years[i],
            format_currency(curves.total_repair_cost[i], currency),
            format_currency(curves.preventive_cost[i], currency),
            format_currency(curves.cumulative_cost[i], currency)
        )?;
    }
    Ok(())
}
