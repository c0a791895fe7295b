use clap::Parser;
use clickmatch::image::io::{decode_image, load_reference};
use clickmatch::{
    Capability, EngineSelector, Exclusion, MatchEngine, MatchOptions, MatchOutcome, ScaleSpace,
    DEFAULT_CONFIDENCE, DEFAULT_SCALES,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "clickmatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for engine decisions and timings.
    #[arg(long)]
    trace: bool,
    /// Run as if the correlation engine were unavailable.
    #[arg(long)]
    no_correlation: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum EngineConfig {
    Primary,
    Fallback,
    Auto,
}

impl From<EngineConfig> for EngineSelector {
    fn from(value: EngineConfig) -> Self {
        match value {
            EngineConfig::Primary => EngineSelector::Primary,
            EngineConfig::Fallback => EngineSelector::Fallback,
            EngineConfig::Auto => EngineSelector::Auto,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    confidence: f32,
    scales: Vec<f64>,
    engine: EngineConfig,
    parallel: bool,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
            scales: DEFAULT_SCALES.to_vec(),
            engine: EngineConfig::Auto,
            parallel: false,
        }
    }
}

impl From<MatchConfigJson> for MatchOptions {
    fn from(value: MatchConfigJson) -> Self {
        MatchOptions::default()
            .with_confidence(value.confidence)
            .with_scales(value.scales)
            .with_engine(value.engine.into())
            .with_parallel(value.parallel)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    screen_path: String,
    reference_path: String,
    output_path: Option<String>,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
}

#[derive(Debug, Serialize)]
struct ClickRecord {
    x: u32,
    y: u32,
}

#[derive(Debug, Serialize)]
struct ExcludedRecord {
    scale: f64,
    reason: &'static str,
}

impl From<(f64, Exclusion)> for ExcludedRecord {
    fn from((scale, reason): (f64, Exclusion)) -> Self {
        Self {
            scale,
            reason: reason.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    engine: &'static str,
    accepted: bool,
    center: Option<ClickRecord>,
    score: Option<f32>,
    scale: Option<f64>,
    excluded: Vec<ExcludedRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("clickmatch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.screen_path.is_empty() || config.reference_path.is_empty() {
        return Err("screen_path and reference_path must be set in the config".into());
    }

    let engine = if cli.no_correlation {
        MatchEngine::new(Capability::Unavailable)
    } else {
        MatchEngine::probe()
    };
    let options = MatchOptions::from(config.match_cfg);
    options.validate()?;
    let kind = engine.engine_for(options.engine)?;

    let reference = load_reference(&config.reference_path)?;
    let screen = decode_image(&fs::read(&config.screen_path)?)?;
    tracing::info!(
        screen_width = screen.width(),
        screen_height = screen.height(),
        reference_width = reference.width(),
        reference_height = reference.height(),
        "inputs loaded"
    );

    let outcome = engine.match_image(&screen, &reference, &options)?;
    let excluded: Vec<ExcludedRecord> = ScaleSpace::exclusions(
        reference.dimensions(),
        &options.scales,
        screen.width(),
        screen.height(),
    )
    .map(ExcludedRecord::from)
    .collect();

    let (center, scale) = match outcome {
        MatchOutcome::Accepted { center, scale, .. } => (
            Some(ClickRecord {
                x: center.x,
                y: center.y,
            }),
            Some(scale),
        ),
        MatchOutcome::Rejected { .. } => (None, None),
    };
    let output = Output {
        engine: kind.as_str(),
        accepted: outcome.is_accepted(),
        center,
        score: outcome.best_score(),
        scale,
        excluded,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
