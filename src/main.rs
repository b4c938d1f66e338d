//! pii-classifier - Local PII/PHI classification rules
//!
//! Registers the built-in and configured classification rules, classifies
//! text, and runs the validation harness over sample inputs.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use pii_classifier::{
    config::ClassifierConfig,
    privacy::{publish_all, DryRunPublisher, Sample, TextClassifier, ValidationHarness},
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pii-classifier")]
#[command(author = "A3S Lab Team")]
#[command(version)]
#[command(about = "Local PII/PHI classification rules with checksum and context validation")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PII_CLASSIFIER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single piece of text
    Classify {
        /// Text to classify
        text: String,

        /// Print the redacted text instead of the matches
        #[arg(long)]
        redact: bool,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the validation harness over sample inputs
    Validate {
        /// Sample as label=text (repeatable); replaces configured samples
        #[arg(short, long = "sample", value_name = "LABEL=TEXT")]
        samples: Vec<String>,

        /// Classify samples in parallel
        #[arg(long)]
        parallel: bool,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered rules in registration order
    Rules,

    /// Publish all rules (dry run: payloads are logged, not sent)
    Publish,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("pii_classifier={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match cli.config {
        Some(path) => ClassifierConfig::from_file(&path)?,
        None => ClassifierConfig::default(),
    };

    match cli.command {
        Commands::Classify { text, redact, json } => {
            run_classify(&config, &text, redact, json)?;
        }
        Commands::Validate {
            samples,
            parallel,
            json,
        } => {
            run_validate(&config, samples, parallel, json).await?;
        }
        Commands::Rules => {
            list_rules(&config)?;
        }
        Commands::Publish => {
            run_publish(&config).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

fn run_classify(config: &ClassifierConfig, text: &str, redact: bool, json: bool) -> Result<()> {
    let classifier = TextClassifier::new(config.build_registry()?);

    if redact {
        println!("{}", classifier.redact(text));
        return Ok(());
    }

    let result = classifier.classify(text);
    if json {
        println!("{}", serde_json::to_string_pretty(&result.matches)?);
    } else {
        println!("Classification for '{}':", text);
        for m in &result.matches {
            println!(
                "- {} ({}, {}%): {}",
                m.rule_name,
                m.confidence,
                m.confidence.score(),
                m.matched_text
            );
        }
    }
    for e in &result.errors {
        tracing::warn!("{}", e);
    }
    Ok(())
}

async fn run_validate(
    config: &ClassifierConfig,
    raw_samples: Vec<String>,
    parallel: bool,
    json: bool,
) -> Result<()> {
    let samples = if raw_samples.is_empty() {
        config.samples.clone()
    } else {
        raw_samples
            .iter()
            .map(String::as_str)
            .map(parse_sample)
            .collect::<Result<Vec<_>>>()?
    };

    let harness = ValidationHarness::new(TextClassifier::new(config.build_registry()?));
    let report = if parallel || config.harness.parallel {
        harness.run_parallel(samples).await?
    } else {
        harness.run(samples)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn parse_sample(raw: &str) -> Result<Sample> {
    match raw.split_once('=') {
        Some((label, text)) if !label.trim().is_empty() => Ok(Sample::new(label.trim(), text)),
        _ => bail!("Invalid sample '{}': expected LABEL=TEXT", raw),
    }
}

fn list_rules(config: &ClassifierConfig) -> Result<()> {
    let registry = config.build_registry()?;
    for rule in registry.all() {
        let validator = rule
            .validator
            .as_ref()
            .map(|v| v.name().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<7} validator={:<6} {}",
            rule.name, rule.confidence, validator, rule.description
        );
    }
    Ok(())
}

async fn run_publish(config: &ClassifierConfig) -> Result<()> {
    if !config.publish.dry_run {
        bail!("No remote publisher is available; set publish.dry_run = true");
    }
    let registry = config.build_registry()?;
    let publisher = DryRunPublisher::new(config.publish.account());
    let count = publish_all(&registry, &publisher).await?;
    println!("Published {} rule(s) (dry run)", count);
    Ok(())
}

fn show_config(config: Option<&ClassifierConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
