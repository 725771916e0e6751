/// gumroad-verify - check a single Gumroad ping from the command line
///
/// Reads a JSON config file and one event (file or stdin), prints the
/// verification result as JSON on stdout.
///
/// Exit codes: 0 verified, 1 rejected, 2 configuration or input error
use std::io::Read;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use gumroad_verify::{load_config, Event, Verifier};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gumroad-verify", version, about = "Verify a Gumroad sale or license ping")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Path to the event JSON; read from stdin when omitted
    #[arg(short, long)]
    event: Option<PathBuf>,
}

fn read_event(path: Option<&PathBuf>) -> Result<Event, String> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read event file {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read event from stdin: {}", e))?;
            buf
        }
    };

    Event::from_json(&raw).map_err(|e| format!("Failed to parse event: {}", e))
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            exit(2);
        }
    };

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let event = match read_event(cli.event.as_ref()) {
        Ok(event) => event,
        Err(e) => {
            error!("{}", e);
            exit(2);
        }
    };

    let verifier = match Verifier::new(config) {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to create verifier: {}", e);
            exit(2);
        }
    };

    let result = verifier.verify(&event);
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to serialize result: {}", e);
            exit(2);
        }
    }

    if result.is_verified() {
        info!("Verified");
        exit(0);
    }
    exit(1);
}
