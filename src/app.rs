use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::cost_model::{self, FleetAnalysis, FleetParameters, ValidationError};
use crate::i18n::Translator;
use crate::report::{self, OutputFormat, ReportError};
use crate::ui_cli;

/// 표 출력 시 목표 행 수.
const TABLE_ROWS: usize = 20;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl AppError {
    /// 프로세스 종료 코드. 입력 오류는 2, 그 외는 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation(_) => 2,
            _ => 1,
        }
    }
}

/// CLI 한 번 실행에 필요한 옵션.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub parameters: FleetParameters,
    pub samples: Option<usize>,
    pub interactive: bool,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub table: bool,
}

/// 표준 입출력으로 CLI를 한 번 실행한다.
pub fn run(options: &RunOptions, config: &Config, tr: &Translator) -> Result<(), AppError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout().lock();
    run_with(options, config, tr, &mut input, &mut stdout)
}

/// 파라미터를 확정하고 분석 결과를 지정 형식으로 출력한다.
/// 대화형 질문과 결과(`--output`이 없을 때)는 모두 `stdout`으로 나간다.
/// 입력 검증에 실패하면 아무것도 쓰지 않는다.
pub fn run_with<R: BufRead, W: Write>(
    options: &RunOptions,
    config: &Config,
    tr: &Translator,
    stdin: &mut R,
    stdout: &mut W,
) -> Result<(), AppError> {
    let parameters = if options.interactive {
        ui_cli::prompt_parameters(stdin, stdout, tr, &options.parameters)?
    } else {
        options.parameters.clone()
    };
    let samples = options.samples.unwrap_or(config.sample_count);

    let analysis = cost_model::analyze(&parameters, samples)?;
    info!(
        optimal_year = analysis.optimum.year,
        optimal_cost = analysis.optimum.cost,
        "analysis complete"
    );

    match &options.output {
        Some(path) => {
            let mut file = BufWriter::new(File::create(path)?);
            write_report(&mut file, &analysis, options, config, tr)?;
            file.flush()?;
            info!(path = %path.display(), "output written");
        }
        None => {
            write_report(stdout, &analysis, options, config, tr)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn write_report<W: Write>(
    out: &mut W,
    analysis: &FleetAnalysis,
    options: &RunOptions,
    config: &Config,
    tr: &Translator,
) -> Result<(), AppError> {
    match options.format {
        OutputFormat::Text => {
            if options.table {
                report::write_table(out, analysis, TABLE_ROWS, &config.currency_symbol, tr)?;
                writeln!(out)?;
            }
            writeln!(
                out,
                "{}",
                report::summary_sentence(analysis, &config.currency_symbol, tr)
            )?;
        }
        OutputFormat::Csv => report::write_csv(out, &analysis.curves)?,
        OutputFormat::Json => writeln!(out, "{}", report::to_json(analysis)?)?,
    }
    Ok(())
}
