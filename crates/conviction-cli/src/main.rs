//! conviction binary
//!
//! Usage:
//!   conviction [--json] <scenario.json>

use std::path::PathBuf;

use conviction_cli::{run, CliConfig, Error, OutputFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_usage() {
    eprintln!("conviction - Report conviction voting status for a scenario");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  conviction [--json] <scenario.json>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CONVICTION_ALPHA            Decay factor override (0 < alpha < 1)");
    eprintln!("  CONVICTION_MAX_RATIO        Maximum requested share of funds override");
    eprintln!("  CONVICTION_WEIGHT           Threshold weight override");
    eprintln!("  CONVICTION_BLOCK_TIME_SECS  Seconds per block for estimates (default: 15)");
    eprintln!("  CONVICTION_VIEWER           Account whose own stake is shown");
    eprintln!("  RUST_LOG                    Log filter (default: conviction=info,conviction_engine=info)");
}

fn parse_args(args: &[String]) -> Result<(PathBuf, OutputFormat), Error> {
    let mut format = OutputFormat::Text;
    let mut path = None;

    for arg in args {
        match arg.as_str() {
            "--json" => format = OutputFormat::Json,
            flag if flag.starts_with('-') => {
                return Err(Error::Usage(format!("unknown flag {}", flag)));
            }
            file if path.is_none() => path = Some(PathBuf::from(file)),
            extra => return Err(Error::Usage(format!("unexpected argument {}", extra))),
        }
    }

    let path = path.ok_or_else(|| Error::Usage("missing scenario file".to_string()))?;
    Ok((path, format))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so the report can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conviction=info,conviction_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    let (path, format) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    let config = CliConfig::from_env()?;
    let report = run(&path, &config, format)?;
    print!("{}", report);

    Ok(())
}
