use std::io::{BufRead, Write};

use crate::app::AppError;
use crate::cost_model::FleetParameters;
use crate::i18n::{keys, Translator};

/// 터미널에서 입력 파라미터를 차례로 묻는다.
/// 빈 입력(또는 EOF)은 기본값을 유지하고, 숫자가 아니거나 최소값 미만이면 다시 묻는다.
pub fn prompt_parameters<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    tr: &Translator,
    defaults: &FleetParameters,
) -> Result<FleetParameters, AppError> {
    writeln!(output, "\n-- {} --", tr.t(keys::INPUT_HEADING))?;
    let mut p = defaults.clone();
    p.cost_per_repair = read_f64(
        input,
        output,
        tr,
        keys::INPUT_COST_PER_REPAIR,
        p.cost_per_repair,
        0.0,
    )?;
    p.non_availability_cost_per_day = read_f64(
        input,
        output,
        tr,
        keys::INPUT_NON_AVAILABILITY,
        p.non_availability_cost_per_day,
        0.0,
    )?;
    p.predicted_repairs_per_year = read_f64(
        input,
        output,
        tr,
        keys::INPUT_PREDICTED,
        p.predicted_repairs_per_year,
        0.0,
    )?;
    p.unpredicted_repairs_per_year = read_f64(
        input,
        output,
        tr,
        keys::INPUT_UNPREDICTED,
        p.unpredicted_repairs_per_year,
        0.0,
    )?;
    p.cost_of_new_car = read_f64(
        input,
        output,
        tr,
        keys::INPUT_NEW_CAR,
        p.cost_of_new_car,
        0.0,
    )?;
    p.number_of_cars = read_u32(input, output, tr, keys::INPUT_CARS, p.number_of_cars, 1)?;
    p.expected_lifetime_years = read_f64(
        input,
        output,
        tr,
        keys::INPUT_LIFETIME,
        p.expected_lifetime_years,
        1.0,
    )?;
    Ok(p)
}

/// 한 줄을 읽는다. EOF면 None.
fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Option<String>, AppError> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

fn read_f64<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    tr: &Translator,
    label_key: &str,
    default: f64,
    min: f64,
) -> Result<f64, AppError> {
    let prompt = tr.t_with(
        keys::PROMPT_DEFAULT_HINT,
        &[("label", tr.t(label_key)), ("default", default.to_string())],
    );
    loop {
        let Some(line) = read_line(input, output, &prompt)? else {
            return Ok(default);
        };
        if line.is_empty() {
            return Ok(default);
        }
        match line.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= min => return Ok(v),
            Ok(_) => writeln!(
                output,
                "{}",
                tr.t_with(keys::ERROR_BELOW_MINIMUM, &[("min", min.to_string())])
            )?,
            Err(_) => writeln!(output, "{}", tr.t(keys::ERROR_INVALID_NUMBER))?,
        }
    }
}

fn read_u32<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    tr: &Translator,
    label_key: &str,
    default: u32,
    min: u32,
) -> Result<u32, AppError> {
    let prompt = tr.t_with(
        keys::PROMPT_DEFAULT_HINT,
        &[("label", tr.t(label_key)), ("default", default.to_string())],
    );
    loop {
        let Some(line) = read_line(input, output, &prompt)? else {
            return Ok(default);
        };
        if line.is_empty() {
            return Ok(default);
        }
        match line.parse::<u32>() {
            Ok(v) if v >= min => return Ok(v),
            Ok(_) => writeln!(
                output,
                "{}",
                tr.t_with(keys::ERROR_BELOW_MINIMUM, &[("min", min.to_string())])
            )?,
            Err(_) => writeln!(output, "{}", tr.t(keys::ERROR_INVALID_NUMBER))?,
        }
    }
}
