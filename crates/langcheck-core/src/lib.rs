//! # langcheck-core
//!
//! Text-pair evaluation engine. Given an input prompt and an output
//! response, produces a pass/fail verdict, a numeric score, and a
//! human-readable explanation.
//!
//! Two evaluators:
//! - [`LanguageMatchEvaluator`]: confidence-weighted language-identity
//!   comparison — is the answer in the same language as the prompt, or in
//!   a specific expected language?
//! - [`RuleMatchEvaluator`]: ordered substring/regex rules with
//!   short-circuit semantics.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same entry and settings always produce the same
//!    verdict (given a deterministic classifier)
//! 2. **Fail-fast configuration**: invalid settings are rejected at
//!    construction, never at evaluation time
//! 3. **Skips are not failures**: low-signal entries (too few words, no
//!    confident detection) are reported as skipped with a reason
//! 4. **Parallel-safe**: evaluators and the shared classifier are immutable
//!    after construction
//!
//! ## Example
//!
//! ```rust,ignore
//! use langcheck_core::{
//!     evaluate_language_match, ComparisonMode, LanguageMatchSettings, TextPair,
//! };
//!
//! let settings = LanguageMatchSettings {
//!     mode: ComparisonMode::InputMatchesOutput,
//!     ..Default::default()
//! };
//! let entry = TextPair::new(
//!     "hello how is it going my friend? testing",
//!     "ola como vai voce eu vou bem obrigado",
//! );
//! let verdict = evaluate_language_match(settings, &entry)?;
//! assert_eq!(verdict.passed, Some(false));
//! ```

pub mod classifier;
pub mod evaluators;
pub mod language;
pub mod pipeline;
pub mod types;

// Re-export main types at crate root
pub use classifier::{LanguageClassifier, LinguaClassifier};
pub use evaluators::{
    ComparisonMode, Evaluator, LanguageMatchEvaluator, LanguageMatchSettings, Rule, RuleKind,
    RuleMatchEvaluator, RuleMatchSettings, SettingDescriptor, DEFAULT_MIN_WORDS,
    DEFAULT_THRESHOLD,
};
pub use language::{LanguageCode, UnknownLanguageError};
pub use pipeline::StageOutcome;
pub use types::{
    EvaluationStatus, LanguageDistribution, RawDistributions, TextField, TextPair, Verdict,
};

use thiserror::Error;

/// Errors raised when constructing an evaluator from settings.
///
/// These are the only errors this crate produces; evaluation itself always
/// returns a [`Verdict`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("invalid regex pattern \"{pattern}\": {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Evaluate one entry with the process-wide lingua classifier.
///
/// Convenience for one-off calls; construct a [`LanguageMatchEvaluator`]
/// directly to reuse validated settings across many entries.
pub fn evaluate_language_match(
    settings: LanguageMatchSettings,
    entry: &TextPair,
) -> Result<Verdict, ConfigError> {
    let evaluator = LanguageMatchEvaluator::with_shared_classifier(settings)?;
    Ok(evaluator.evaluate(entry))
}

/// Evaluate one entry against a list of text rules.
pub fn evaluate_rules(settings: RuleMatchSettings, entry: &TextPair) -> Result<Verdict, ConfigError> {
    let evaluator = RuleMatchEvaluator::new(settings)?;
    Ok(evaluator.evaluate(entry))
}
