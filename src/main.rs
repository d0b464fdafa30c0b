use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use fleet_replacement_toolbox::{
    app::{self, AppError, RunOptions},
    config,
    cost_model::FleetParameters,
    i18n::{self, keys},
    report::OutputFormat,
};

/// Estimate the cost-optimal replacement age for a vehicle fleet.
#[derive(Parser, Debug)]
#[command(author, version, about, allow_negative_numbers = true)]
struct Cli {
    /// Cost per repair
    #[arg(long, default_value_t = 500.0)]
    cost_per_repair: f64,

    /// Non-availability cost per day of downtime
    #[arg(long, default_value_t = 100.0)]
    non_availability_cost_per_day: f64,

    /// Predicted (scheduled) repairs per year
    #[arg(long, default_value_t = 2.0)]
    predicted_repairs_per_year: f64,

    /// Unpredicted (unscheduled) repairs per year
    #[arg(long, default_value_t = 1.0)]
    unpredicted_repairs_per_year: f64,

    /// Cost of a new car
    #[arg(long, default_value_t = 25_000.0)]
    cost_of_new_car: f64,

    /// Number of cars in the fleet
    #[arg(long, default_value_t = 100)]
    number_of_cars: u32,

    /// Max time horizon in years
    #[arg(long, default_value_t = 10.0)]
    expected_lifetime_years: f64,

    /// Number of samples on the time axis (defaults to the config value)
    #[arg(long)]
    samples: Option<usize>,

    /// Ask for each parameter on the terminal, using the flags as defaults
    #[arg(short, long)]
    interactive: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a sampled cost table before the summary (text format only)
    #[arg(long)]
    table: bool,

    /// Language (auto, en-us, ko-kr)
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,

    /// Path to config.toml
    #[arg(long)]
    config: Option<String>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn parameters(&self) -> FleetParameters {
        FleetParameters {
            cost_per_repair: self.cost_per_repair,
            non_availability_cost_per_day: self.non_availability_cost_per_day,
            predicted_repairs_per_year: self.predicted_repairs_per_year,
            unpredicted_repairs_per_year: self.unpredicted_repairs_per_year,
            cost_of_new_car: self.cost_of_new_car,
            number_of_cars: self.number_of_cars,
            expected_lifetime_years: self.expected_lifetime_years,
        }
    }
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 분석을 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout은 CSV/JSON 출력용으로 비워 두고 로그는 stderr로 보낸다.
    let default_filter = match cli.verbose {
        0 => "fleet_replacement_toolbox=info",
        1 => "fleet_replacement_toolbox=debug",
        _ => "fleet_replacement_toolbox=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = config::resolve_path(cli.config.as_deref());
    let cfg = match config::load_or_default_at(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "falling back to default config");
            config::Config::default()
        }
    };
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let tr = i18n::Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());

    let options = RunOptions {
        parameters: cli.parameters(),
        samples: cli.samples,
        interactive: cli.interactive,
        format: cli.format,
        output: cli.output.clone(),
        table: cli.table,
    };
    match app::run(&options, &cfg, &tr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&tr, &err),
    }
}

fn report_error(tr: &i18n::Translator, err: &AppError) -> ExitCode {
    eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
    ExitCode::from(err.exit_code() as u8)
}
