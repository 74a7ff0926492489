//! Command-line front end for the langcheck evaluators.
//!
//! Loads evaluator settings from a YAML or JSON file, evaluates one
//! input/output pair, and prints the verdict as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

use langcheck_core::{
    Evaluator, LanguageMatchEvaluator, LanguageMatchSettings, RuleMatchEvaluator,
    RuleMatchSettings, TextPair, Verdict,
};

#[derive(Parser)]
#[command(name = "langcheck", version, about = "Evaluate input/output text pairs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare the detected languages of the input and the output
    Language {
        /// The prompt text
        #[arg(long)]
        input: String,

        /// The response text
        #[arg(long)]
        output: String,

        /// Settings file (YAML or JSON); defaults apply when omitted
        #[arg(long)]
        settings: Option<PathBuf>,
    },

    /// Apply substring/regex rules to the pair
    Rules {
        /// The prompt text
        #[arg(long, default_value = "")]
        input: String,

        /// The response text
        #[arg(long, default_value = "")]
        output: String,

        /// Settings file (YAML or JSON) defining the rules
        #[arg(long)]
        settings: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let verdict = match cli.command {
        Command::Language {
            input,
            output,
            settings,
        } => {
            let settings: LanguageMatchSettings = match settings {
                Some(path) => load_settings(&path)?,
                None => LanguageMatchSettings::default(),
            };
            let evaluator = LanguageMatchEvaluator::with_shared_classifier(settings)
                .context("invalid language-match settings")?;
            evaluator.evaluate(&TextPair::new(input, output))
        }
        Command::Rules {
            input,
            output,
            settings,
        } => {
            let settings: RuleMatchSettings = load_settings(&settings)?;
            let evaluator =
                RuleMatchEvaluator::new(settings).context("invalid rule-match settings")?;
            evaluator.evaluate(&TextPair::new(input, output))
        }
    };

    print_verdict(&verdict)
}

/// Reads a settings file, picking the format from the file extension.
fn load_settings<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded settings file");

    let is_json = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON settings {}", path.display()))
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML settings {}", path.display()))
    }
}

fn print_verdict(verdict: &Verdict) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(verdict)?);
    Ok(())
}
