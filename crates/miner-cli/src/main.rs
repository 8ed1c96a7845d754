use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use hexbin_miner_core::{
    achieved_difficulty, algorithm_id, codec, EncodingFault, Miner, MinerConfig, MinerError,
    NonceStrategy, SearchStrategy, DEFAULT_MAX_ITERATIONS, FINGERPRINT_HEX_LEN, SEED_LEN,
};

mod report;

use report::RunReport;

const EXIT_NOT_FOUND: u8 = 1;
const EXIT_INVALID_ENCODING: u8 = 3;
const EXIT_INVALID_ARGUMENT: u8 = 4;
const EXIT_FAILURE: u8 = 5;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nsearch algorithms: strstr.fast.hexbin (checksum), scanstr.hexbin (word), strstr.hexbin (general)"
);

#[derive(Parser, Debug)]
#[command(name = "hexbin-miner")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Search for a nonce whose expanded SHA-224 digest contains the block hash prefix", long_about = None)]
struct Args {
    /// Miner address, 56 hex characters
    address: String,

    /// Block hash, 56 hex characters
    block_hash: String,

    /// Number of expanded block hash characters to match (0-224)
    difficulty: usize,

    /// Maximum attempts before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: u64,

    /// Substring search strategy
    #[arg(long, value_enum, default_value_t = SearchArg::Word)]
    search: SearchArg,

    /// Nonce sequence
    #[arg(long, value_enum, default_value_t = NonceArg::Counter)]
    nonce: NonceArg,

    /// Scratch seed as 64 hex characters (default: random)
    #[arg(long, value_parser = parse_seed)]
    seed: Option<[u8; SEED_LEN]>,

    /// Check an existing nonce instead of mining
    #[arg(long, value_name = "NONCE")]
    check: Option<String>,

    /// Print a JSON report instead of `<nonce> <cycles>`
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SearchArg {
    Checksum,
    Word,
    General,
}

impl From<SearchArg> for SearchStrategy {
    fn from(arg: SearchArg) -> Self {
        match arg {
            SearchArg::Checksum => SearchStrategy::ChecksumScan,
            SearchArg::Word => SearchStrategy::WordScan,
            SearchArg::General => SearchStrategy::GeneralScan,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum NonceArg {
    Counter,
    Chained,
}

impl From<NonceArg> for NonceStrategy {
    fn from(arg: NonceArg) -> Self {
        match arg {
            NonceArg::Counter => NonceStrategy::Counter,
            NonceArg::Chained => NonceStrategy::ChainedHash,
        }
    }
}

fn parse_seed(s: &str) -> Result<[u8; SEED_LEN], String> {
    codec::decode_exact::<SEED_LEN>(s).map_err(|e| e.to_string())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("hexbin_miner={level},hexbin_miner_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reject fingerprints of the wrong length before touching the core.
fn check_lengths(args: &Args) -> Result<(), MinerError> {
    for (field, value) in [("address", &args.address), ("block hash", &args.block_hash)] {
        if value.len() != FINGERPRINT_HEX_LEN {
            return Err(MinerError::InvalidEncoding {
                field,
                fault: EncodingFault::WrongLength {
                    expected: FINGERPRINT_HEX_LEN,
                    actual: value.len(),
                },
            });
        }
    }
    Ok(())
}

fn config_from(args: &Args) -> MinerConfig {
    MinerConfig::new(args.difficulty)
        .with_max_iterations(args.max_iterations)
        .with_search(args.search.into())
        .with_nonce(args.nonce.into())
}

fn scratch_seed(args: &Args) -> Result<[u8; SEED_LEN]> {
    if let Some(seed) = args.seed {
        return Ok(seed);
    }
    let mut seed = [0u8; SEED_LEN];
    getrandom::getrandom(&mut seed).context("failed to read scratch seed from the OS")?;
    Ok(seed)
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<MinerError>() {
        Some(MinerError::InvalidEncoding { .. }) => EXIT_INVALID_ENCODING,
        Some(MinerError::InvalidArgument(_)) => EXIT_INVALID_ARGUMENT,
        None => EXIT_FAILURE,
    }
}

/// Mine and print the result. Returns whether a nonce was found.
fn run_mine(args: &Args) -> Result<bool> {
    check_lengths(args)?;
    let config = config_from(args);
    let seed = scratch_seed(args)?;
    let algorithm = algorithm_id(config.search);

    info!("Algorithm: {}", algorithm);
    info!("Difficulty: {}", config.difficulty);
    info!("Max iterations: {}", config.max_iterations);
    debug!("Nonce strategy: {}", config.nonce);
    debug!("Scratch seed: {}", codec::encode(&seed));

    let mut miner = Miner::new(&args.address, &args.block_hash, config, &seed)?;

    let start = Instant::now();
    let result = miner.run();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let report = RunReport::new(&result, args.difficulty, algorithm, elapsed_ms);
    info!(
        "{} after {} cycles in {:.0} ms ({:.0} cycles/sec)",
        result.outcome(),
        report.cycles,
        report.elapsed_ms,
        report.cycles_per_sec()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(line) = report.plain_line() {
        println!("{}", line);
    } else {
        info!("No nonce found in {} attempts", report.cycles);
    }

    Ok(report.success)
}

/// Verify `nonce` and print the difficulty it reaches. Returns whether it
/// meets the requested difficulty.
fn run_check(args: &Args, nonce: &str) -> Result<bool> {
    check_lengths(args)?;
    config_from(args).validate().map_err(MinerError::from)?;

    let level = achieved_difficulty(&args.address, nonce, &args.block_hash)?;
    let meets = level >= args.difficulty;
    info!("Nonce reaches difficulty {} (required {})", level, args.difficulty);

    if args.json {
        let value = serde_json::json!({
            "nonce": nonce,
            "difficulty": args.difficulty,
            "achieved": level,
            "valid": meets,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", level);
    }

    Ok(meets)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let outcome = match &args.check {
        Some(nonce) => run_check(&args, nonce),
        None => run_mine(&args),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_NOT_FOUND),
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}
