//! ALUA CLI
//!
//! Usage:
//!   alua --input session.jsonl                 # Score a recorded session
//!   alua --input session.jsonl --json          # JSON output (result + record)
//!   alua --input session.jsonl --seed 7        # Pin the fallback path
//!   alua --serve                               # HTTP API server

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use alua::core::{load_samples, run_server, save_result, Analyzer, ContractRecord};
use alua::types::ScoreResult;
use alua::{logging, AnalysisConfig, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "alua",
    version = VERSION,
    about = "ALUA - Score the synchrony of two people from a recorded session",
    long_about = "ALUA reads a two-participant session (skin conductance, intent sliders,\n\
                  relation buttons) and produces a compatibility score, a risk tier and an\n\
                  optional weak-link attribution.\n\n\
                  Sessions with a dead conductance channel are scored from one of four\n\
                  synthetic scenarios (NO-NO, YES-YES, NO-YES, YES-NO); the output says so.\n\n\
                  Risk tiers:\n  \
                  1 MINIMAL       - compatibility >= 75\n  \
                  2 MODERATE      - 50..74\n  \
                  3 SIGNIFICANT   - 25..49\n  \
                  4 CATASTROPHIC  - below 25"
)]
struct Args {
    /// Session file (newline-delimited JSON samples)
    #[arg(short, long, required_unless_present = "serve")]
    input: Option<PathBuf>,

    /// Analysis configuration (JSON; absent fields keep defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the fallback scenario and contract id
    #[arg(long)]
    seed: Option<u64>,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Debug logging for every pipeline stage
    #[arg(short, long)]
    verbose: bool,

    /// Directory for result files (default: ./results)
    #[arg(long, default_value = "./results")]
    out_dir: PathBuf,

    /// Do not write a result file
    #[arg(long)]
    no_save: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match &args.config {
        Some(path) => match AnalysisConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Config error ({}): {}", path.display(), e);
                return ExitCode::from(2);
            }
        },
        None => AnalysisConfig::default(),
    };

    if args.serve {
        run_serve(&args, config).await
    } else {
        run_analyze(&args, config)
    }
}

/// Score one session file
fn run_analyze(args: &Args, config: AnalysisConfig) -> ExitCode {
    let Some(input) = &args.input else {
        eprintln!("No input session given (use --input)");
        return ExitCode::from(2);
    };

    let samples = match load_samples(input) {
        Ok(samples) => samples,
        Err(e) => {
            eprintln!("Cannot read session {}: {}", input.display(), e);
            return ExitCode::from(2);
        }
    };

    let mut rng: Box<dyn RngCore> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };

    let analyzer = Analyzer::new(config);
    let result = match analyzer.analyze_with_rng(&samples, &mut *rng) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}: {}", input.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let record = ContractRecord::build(&result, &analyzer.config().record_base_url, &mut *rng);

    if let Err(code) = print_result(&result, &record, args) {
        return code;
    }

    if !args.no_save {
        match save_result(&result, &record, &args.out_dir) {
            Ok(path) => {
                if !args.json {
                    println!("Saved: {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("Result save failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Print in the selected format
fn print_result(result: &ScoreResult, record: &ContractRecord, args: &Args) -> Result<(), ExitCode> {
    if args.json {
        #[derive(serde::Serialize)]
        struct CliOutput<'a> {
            result: &'a ScoreResult,
            record: &'a ContractRecord,
        }

        let json = serde_json::to_string_pretty(&CliOutput { result, record }).map_err(|e| {
            eprintln!("JSON output failed: {}", e);
            ExitCode::FAILURE
        })?;
        println!("{}", json);
    } else if args.no_color {
        println!("{}", result.to_parseable_string());
        println!("contract={} | link={}", record.id, record.link);
    } else {
        println!("{}", result.to_terminal_string());
        println!("  contract: {}", record.id);
        println!("  link: {}", record.link);
    }
    Ok(())
}

/// Run HTTP API server
async fn run_serve(args: &Args, config: AnalysisConfig) -> ExitCode {
    println!();
    println!("ALUA API Server v{}", VERSION);
    println!();

    let results_dir = (!args.no_save).then(|| args.out_dir.clone());
    match run_server(&args.addr, config, results_dir).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
