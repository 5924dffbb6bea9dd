//! Heart Art CLI
//!
//! Generate, inspect and decode heart art artifacts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use heart_art::{
    classify, decode, decode_instrument_signature, decode_lenient, ArtGenerator, DecodeOutcome,
};
use heart_config::ArtConfig;
use heart_core::{group_thousands, ArtifactDescriptor, BiometricSample};
use heart_source::{BiometricSource, MockSource, ReplaySource, SampleStream};

const DEFAULT_LOG_FILTER: &str = "heartart=info,heart_art=info,heart_source=info,heart_config=info";
const SHOWCASE_TIMESTAMP: &str = "2026-02-11T10:30:00+00:00";

#[derive(Parser)]
#[command(name = "heartart")]
#[command(about = "Deterministic heart art with hidden biometric payloads")]
#[command(version)]
struct Cli {
    /// Config file (YAML or JSON); defaults to the user config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one artifact
    Generate {
        /// Sample JSON file (overrides the reading flags)
        #[arg(long)]
        sample: Option<PathBuf>,

        /// Heart rate in BPM (0 marks a gap)
        #[arg(long, default_value_t = 72)]
        bpm: u32,

        /// Cumulative readings so far
        #[arg(long, default_value_t = 1)]
        count: u64,

        /// Recent readings, oldest first (comma separated)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        history: Vec<i64>,

        /// RFC 3339 timestamp; current time when omitted
        #[arg(long)]
        timestamp: Option<String>,

        #[arg(long, default_value = "Unknown Device")]
        source: String,

        #[arg(long, default_value_t = 1)]
        device: u32,

        /// External reference to embed (e.g. ledger receipt)
        #[arg(long)]
        transaction: Option<String>,

        /// Output file or directory; markup goes to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recover the hidden payload from an artifact
    Decode {
        /// SVG file
        file: PathBuf,

        /// Fill missing particle indices with zero bytes
        #[arg(long)]
        lenient: bool,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,

        /// Also decode the pacing ratio from the circuit traces
        #[arg(long)]
        signature: bool,
    },

    /// Classify a reading without rendering
    Classify {
        #[arg(long)]
        bpm: u32,

        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        history: Vec<i64>,

        #[arg(long, default_value = "")]
        timestamp: String,
    },

    /// Render one artifact per heart state and decode the last
    Showcase {
        /// Output directory
        #[arg(short, long, default_value = "art")]
        out: PathBuf,
    },

    /// Pull readings from a source and render every N-th one
    Stream {
        /// Source kind: mock or file
        #[arg(long, default_value = "mock")]
        source: String,

        /// Replay file for the file source
        #[arg(long)]
        file: Option<PathBuf>,

        /// Seed for the mock source
        #[arg(long)]
        seed: Option<u64>,

        /// Readings to pull
        #[arg(long, default_value_t = 100)]
        count: u64,

        /// Render an artifact every N readings
        #[arg(long, default_value_t = 10)]
        every: u64,

        /// Delay between readings in milliseconds
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,

        #[arg(short, long, default_value = "art")]
        out: PathBuf,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as YAML
    Show,

    /// Print the default config location
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let config_path = cli.config.clone();
    match cli.command {
        Commands::Generate {
            sample,
            bpm,
            count,
            history,
            timestamp,
            source,
            device,
            transaction,
            output,
        } => {
            let sample = match sample {
                Some(path) => load_sample(&path)?,
                None => {
                    let mut sample = BiometricSample::new(bpm, count)
                        .with_source(source, device)
                        .with_history(history);
                    if let Some(ts) = timestamp {
                        sample = sample.with_timestamp(ts);
                    }
                    if let Some(reference) = transaction {
                        sample = sample.with_transaction(reference);
                    }
                    sample
                }
            };
            cmd_generate(config_path.as_deref(), sample.with_current_time(), output)
        }
        Commands::Decode { file, lenient, json, signature } => cmd_decode(&file, lenient, json, signature),
        Commands::Classify { bpm, history, timestamp } => {
            cmd_classify(config_path.as_deref(), bpm, &history, &timestamp)
        }
        Commands::Showcase { out } => cmd_showcase(config_path.as_deref(), &out),
        Commands::Stream {
            source,
            file,
            seed,
            count,
            every,
            interval_ms,
            out,
        } => {
            let source = open_source(&source, file.as_deref(), seed)?;
            cmd_stream(config_path.as_deref(), source, count, every, interval_ms, &out)
        }
        Commands::Config { command } => cmd_config(config_path.as_deref(), command),
    }
}

/// Logs go to stderr so stdout stays clean for markup and JSON
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn load_config(path: Option<&Path>) -> Result<ArtConfig> {
    let config = match path {
        Some(path) => ArtConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ArtConfig::load_or_default().context("Failed to load default config")?,
    };
    Ok(config)
}

fn generator(path: Option<&Path>) -> Result<ArtGenerator> {
    ArtGenerator::new(load_config(path)?).context("Invalid configuration")
}

fn load_sample(path: &Path) -> Result<BiometricSample> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sample {}", path.display()))?;
    BiometricSample::from_json(&json).with_context(|| format!("Invalid sample {}", path.display()))
}

/// Write into `out` (a directory) under the artifact's own filename
fn write_artifact(out: &Path, artifact: &ArtifactDescriptor) -> Result<PathBuf> {
    std::fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;
    let path = out.join(&artifact.filename);
    std::fs::write(&path, &artifact.markup)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn cmd_generate(config: Option<&Path>, sample: BiometricSample, output: Option<PathBuf>) -> Result<()> {
    let artifact = generator(config)?.generate(&sample);

    match output {
        None => println!("{}", artifact.markup),
        Some(path) if path.is_dir() => {
            let written = write_artifact(&path, &artifact)?;
            print_artifact(&artifact, &written);
        }
        Some(path) => {
            std::fs::write(&path, &artifact.markup)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_artifact(&artifact, &path);
        }
    }
    Ok(())
}

fn print_artifact(artifact: &ArtifactDescriptor, path: &Path) {
    println!(
        "  [{:>10}] {} ({} bytes)",
        artifact.state,
        path.display(),
        group_thousands(artifact.byte_len() as u64)
    );
}

fn cmd_decode(file: &Path, lenient: bool, json: bool, signature: bool) -> Result<()> {
    let markup = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let outcome = DecodeOutcome::from(if lenient { decode_lenient(&markup) } else { decode(&markup) });
    let instrument = signature.then(|| decode_instrument_signature(&markup));

    if json {
        let mut value = serde_json::to_value(&outcome)?;
        if let Some(result) = &instrument {
            value["signature"] = match result {
                Ok(sig) => serde_json::to_value(sig)?,
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            };
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("\n  PAYLOAD");
        println!("  Success: {}", outcome.success);
        match &outcome.error {
            None => {
                println!("  Bytes:   {}", outcome.byte_count);
                println!("  Text:    {}", outcome.text);
            }
            Some(e) => println!("  Error:   {}", e),
        }
        if let Some(result) = &instrument {
            println!("\n  PACING SIGNATURE");
            match result {
                Ok(sig) => println!("  Bits: {}  Value: {}  Ratio: {:.4}", sig.bits, sig.value, sig.ratio),
                Err(e) => println!("  Error: {}", e),
            }
        }
    }

    if !outcome.success {
        anyhow::bail!("No payload recovered from {}", file.display());
    }
    Ok(())
}

fn cmd_classify(config: Option<&Path>, bpm: u32, history: &[i64], timestamp: &str) -> Result<()> {
    let config = load_config(config)?;
    let classification = classify(bpm, history, timestamp, &config);
    println!("{}", serde_json::to_string_pretty(&classification)?);
    Ok(())
}

/// The six canonical cases, one per visual regime
fn showcase_samples() -> Vec<(&'static str, BiometricSample)> {
    let cases: [(&str, u32, u64); 6] = [
        ("resting-early", 55, 10),
        ("baseline-growing", 72, 500),
        ("active-dense", 95, 5_000),
        ("elevated-packed", 130, 50_000),
        ("anomalous-full", 160, 100_000),
        ("pacer-maxhistory", 60, 190_950),
    ];

    cases
        .into_iter()
        .map(|(label, bpm, count)| {
            let history: Vec<i64> = if label.starts_with("anomalous") {
                // calm history, then a sudden spike
                [70, 72, 68, 74, 71, 73, 69, 72, 70, 71].repeat(5)
            } else {
                let base = (bpm as i64 - 5).max(55);
                (0..50).map(|i| base + (i % 8) - 3).collect()
            };
            let sample = BiometricSample::new(bpm, count)
                .with_timestamp(SHOWCASE_TIMESTAMP)
                .with_source("Demo\u{2019}s Apple\u{a0}Watch", 1)
                .with_history(history)
                .with_transaction("5abc123def456789".repeat(4));
            (label, sample)
        })
        .collect()
}

fn cmd_showcase(config: Option<&Path>, out: &Path) -> Result<()> {
    let generator = generator(config)?;
    println!("\n  Generating showcase across heart states...\n");

    let mut last = None;
    for (label, sample) in showcase_samples() {
        let artifact = generator.generate(&sample);
        let path = write_artifact(out, &artifact)?;
        info!(label, state = %artifact.state, "showcase artifact written");
        print_artifact(&artifact, &path);
        last = Some(artifact);
    }

    if let Some(artifact) = last {
        println!("\n  Testing payload decode on the last artifact...");
        let outcome = heart_art::decode_outcome(&artifact.markup);
        println!("  Success: {}", outcome.success);
        match &outcome.error {
            None => {
                let preview: String = outcome.text.chars().take(100).collect();
                println!("  Decoded: {}...", preview);
                println!("  Bytes:   {}", outcome.byte_count);
            }
            Some(e) => println!("  Error:   {}", e),
        }
    }

    println!("\n  All artifacts written to {}/", out.display());
    Ok(())
}

fn open_source(
    kind: &str,
    file: Option<&Path>,
    seed: Option<u64>,
) -> heart_source::Result<Box<dyn BiometricSource>> {
    match kind {
        "mock" => Ok(Box::new(match seed {
            Some(seed) => MockSource::seeded(seed),
            None => MockSource::new(),
        })),
        "file" => match file {
            Some(path) => Ok(Box::new(ReplaySource::open(path)?)),
            None => Err(heart_source::Error::UnsupportedSource(
                "file source needs --file".to_string(),
            )),
        },
        other => Err(heart_source::Error::UnsupportedSource(other.to_string())),
    }
}

fn cmd_stream(
    config: Option<&Path>,
    source: Box<dyn BiometricSource>,
    count: u64,
    every: u64,
    interval_ms: u64,
    out: &Path,
) -> Result<()> {
    let generator = generator(config)?;
    let every = every.max(1);
    let mut stream = SampleStream::new(source);
    let mut rendered = 0u64;

    info!(source = stream.source().kind(), count, every, "stream started");
    for _ in 0..count {
        let sample = match stream.next_sample() {
            Ok(sample) => sample,
            Err(e) => {
                warn!(error = %e, "reading failed, skipping");
                continue;
            }
        };

        if stream.cumulative() % every == 0 {
            let artifact = generator.generate(&sample);
            let path = write_artifact(out, &artifact)?;
            rendered += 1;
            info!(
                beat = stream.cumulative(),
                bpm = sample.value,
                state = %artifact.state,
                file = %path.display(),
                "artifact #{}",
                rendered
            );
        }

        if interval_ms > 0 {
            std::thread::sleep(Duration::from_millis(interval_ms));
        }
    }

    println!(
        "\n  {} readings, {} artifacts written to {}/",
        stream.cumulative(),
        rendered,
        out.display()
    );
    Ok(())
}

fn cmd_config(path: Option<&Path>, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = load_config(path)?;
            print!("{}", serde_yaml::to_string(&config)?);
        }
        ConfigCommands::Path => {
            println!("{}", ArtConfig::default_path().display());
        }
        ConfigCommands::Init { force } => {
            let target = path.map(Path::to_path_buf).unwrap_or_else(ArtConfig::default_path);
            if target.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", target.display());
            }
            ArtConfig::default()
                .save(&target)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            println!("  Config written to {}", target.display());
        }
    }
    Ok(())
}
