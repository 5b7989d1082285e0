use std::path::PathBuf;
use std::process;

use chrono::{Duration, SecondsFormat, Utc};
use clap::{CommandFactory, FromArgMatches, Parser};

use wspr_analysis::bands::band_names;
use wspr_analysis::cli::AnalysisRequest;
use wspr_analysis::config::Config;
use wspr_analysis::ingest::wspr_live::build_client;
use wspr_analysis::logging::{self, LogLevel, Source};
use wspr_analysis::model::AnalysisError;
use wspr_analysis::run_analysis;

/// Query the wspr.live database for reception reports of TARGET on BAND.
/// Each reception report is ranked against other transmitters heard by the
/// same receiver at the same time.
#[derive(Parser, Debug)]
#[command(author, version, about, name = "wspranalysis")]
struct Args {
    /// Target transmitter callsign
    target: String,
    /// Band name, e.g. 20m
    band: String,
    /// Transmit power in dBm to normalise SNRs for [default: 43, or from config]
    #[arg(long, allow_negative_numbers = true)]
    norm: Option<i64>,
    /// Start time for the query in RFC3339 format [default: 24 hours ago]
    #[arg(long)]
    start: Option<String>,
    /// Duration to analyse over, e.g. 24h, 30m [default: 24h, or from config]
    #[arg(long)]
    duration: Option<String>,
    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
    /// TOML config file (overrides $WSPRANALYSIS_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    dotenv::dotenv().ok();

    let command = Args::command().after_help(format!(
        "BAND is one of:\n\t{}",
        band_names().join(" ")
    ));
    let usage = command.clone().render_help();
    let args = match Args::from_arg_matches(&command.get_matches()) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    if let Err(e) = run(args) {
        if is_usage_error(&e) {
            eprintln!("{}\n", usage);
        }
        logging::error(Source::System, None, &e.to_string());
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn is_usage_error(err: &AnalysisError) -> bool {
    matches!(
        err,
        AnalysisError::InvalidBandName(_)
            | AnalysisError::InvalidTimeFormat(_)
            | AnalysisError::InvalidDuration(_)
            | AnalysisError::InvalidPowerRange(_)
    )
}

fn run(args: Args) -> Result<(), AnalysisError> {
    let config = Config::resolve(args.config.as_deref())?;

    let min_level = if args.verbose { LogLevel::Debug } else { LogLevel::Info };
    logging::init_logger(min_level, config.log_file.as_deref(), config.log_timestamps);

    let start = args.start.unwrap_or_else(|| {
        (Utc::now() - Duration::hours(24)).to_rfc3339_opts(SecondsFormat::Secs, true)
    });
    let duration = args.duration.unwrap_or_else(|| config.default_duration.clone());
    let norm = args.norm.unwrap_or(config.default_norm_power_dbm);

    let request = AnalysisRequest::from_args(&args.target, &args.band, &start, &duration, norm, args.verbose)?;
    logging::debug(
        Source::Config,
        Some(request.target_callsign.as_str()),
        &format!(
            "band {} from {} for {}s, normalised to {}dBm via {}",
            request.band,
            request.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            request.duration.num_seconds(),
            request.norm_tx_power_dbm,
            config.base_url
        ),
    );

    let client = build_client(config.timeout())?;
    let text = run_analysis(&client, &config, &request)?;
    print!("{}", text);
    Ok(())
}
