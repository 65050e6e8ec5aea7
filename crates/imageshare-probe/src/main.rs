//! imageshare-probe: CLI tool for inspecting image reference resolution.
//!
//! Classifies a stored image reference, prints the URL candidates the
//! resolver generates for it, and optionally simulates a run of load
//! failures through the fallback loader. Useful for:
//!
//! - Checking which storage layouts an old post's image is tried under
//! - Verifying API and image base URL settings before a deployment
//! - Seeing where the fallback walk lands after a number of failures
//!
//! # Usage
//!
//! ```text
//! cargo run --bin imageshare-probe -- [OPTIONS] <REFERENCE>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use imageshare_resolve::{
    CandidateList, FallbackLoader, ImageReference, LoadEvent, LoadState, ResolverConfig,
    generate_candidates,
};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Image reference resolution diagnostics for imageshare.
///
/// Prints the ordered candidate URLs generated for a stored image
/// reference, ending with the placeholder.
#[derive(Parser)]
#[command(name = "imageshare-probe", version)]
struct Cli {
    /// The reference as JSON, e.g. '{"filename":"a.jpg"}' or '"a.jpg"'.
    ///
    /// Text that is not valid JSON is taken as a plain path. Use `-` to
    /// read the reference from stdin.
    reference: String,

    /// API base URL [default: $API_URL, else http://localhost:5000].
    #[arg(long)]
    api_url: Option<String>,

    /// Image base URL (defaults to `{api_url}/uploads`).
    #[arg(long)]
    image_base_url: Option<String>,

    /// Placeholder shown when every candidate fails.
    #[arg(long)]
    placeholder: Option<String>,

    /// Simulate this many consecutive load failures.
    #[arg(long, default_value_t = 0)]
    fail: usize,

    /// Output as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

/// One simulated load failure.
#[derive(Debug, Serialize)]
struct Step {
    failed: String,
    next: String,
    state: LoadState,
}

/// Full JSON output.
#[derive(Serialize)]
struct Report<'a> {
    kind: &'static str,
    candidates: &'a CandidateList,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    walk: Vec<Step>,
}

/// Parse the reference argument.
///
/// Valid JSON is classified as-is; anything else is a bare path string.
fn parse_reference(text: &str) -> ImageReference {
    let text = text.trim();
    serde_json::from_str::<Value>(text).map_or_else(
        |_| ImageReference::from_json(&Value::String(text.to_owned())),
        |value| ImageReference::from_json(&value),
    )
}

/// Build a [`ResolverConfig`] from CLI arguments.
///
/// An explicit API URL must be valid. Without one, `API_URL` is read
/// from the environment and an invalid value falls back to the default.
fn config_from_cli(cli: &Cli) -> Result<ResolverConfig, String> {
    let mut config = match cli.api_url {
        Some(ref url) => {
            ResolverConfig::try_new(url).map_err(|e| format!("Error in --api-url: {e}"))?
        }
        None => ResolverConfig::from_env(),
    };
    if let Some(ref base) = cli.image_base_url {
        config = config.with_image_base_url(base);
    }
    if let Some(ref placeholder) = cli.placeholder {
        config = config.with_placeholder(placeholder);
    }
    Ok(config)
}

/// Feed up to `failures` load errors to a fresh loader.
///
/// Stops early once the loader is exhausted.
fn simulate_failures(candidates: &CandidateList, failures: usize) -> Vec<Step> {
    let mut loader = FallbackLoader::new(candidates.clone());
    let mut walk = Vec::new();
    for _ in 0..failures {
        if !loader.is_armed() {
            break;
        }
        let failed = loader.source().to_owned();
        loader.handle(&LoadEvent::Failed { src: &failed });
        walk.push(Step {
            failed,
            next: loader.source().to_owned(),
            state: loader.state(),
        });
    }
    walk
}

fn read_reference(arg: &str) -> Result<String, String> {
    if arg != "-" {
        return Ok(arg.to_owned());
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| format!("Error reading stdin: {e}"))?;
    Ok(text)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let text = match read_reference(&cli.reference) {
        Ok(text) => text,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let reference = parse_reference(&text);
    let candidates = generate_candidates(&reference, &config);
    let walk = simulate_failures(&candidates, cli.fail);

    if cli.json {
        let report = Report {
            kind: reference.kind(),
            candidates: &candidates,
            walk,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    eprintln!("API URL: {}", config.api_url());
    eprintln!("Image base URL: {}", config.image_base_url());
    eprintln!();

    println!("Kind: {}", reference.kind());
    println!();
    println!("{:<4} URL", "#");
    println!("{}", "-".repeat(60));
    for (i, url) in candidates.iter().enumerate() {
        let marker = if i == candidates.last_index() {
            " (placeholder)"
        } else {
            ""
        };
        println!("{i:<4} {url}{marker}");
    }

    if !walk.is_empty() {
        println!();
        println!("Simulated failures");
        println!("{}", "-".repeat(60));
        for (n, step) in walk.iter().enumerate() {
            println!("{:<4} {} -> {:?}", n + 1, step.failed, step.state);
        }
        println!("Showing: {}", walk.last().map_or(candidates.first(), |s| s.next.as_str()));
    }

    ExitCode::SUCCESS
}
