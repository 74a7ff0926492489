//! The evaluators: language-identity comparison and rule matching.

mod language;
mod rules;

pub use language::{
    ComparisonMode, LanguageMatchEvaluator, LanguageMatchSettings, DEFAULT_MIN_WORDS,
    DEFAULT_THRESHOLD,
};
pub use rules::{Rule, RuleKind, RuleMatchEvaluator, RuleMatchSettings};

use crate::types::{TextPair, Verdict};

/// A configured evaluator, constructed once and reused across entries.
///
/// Implementations are immutable and safe to share across threads; one
/// `evaluate` call is a bounded, synchronous computation.
pub trait Evaluator: Send + Sync {
    /// Stable identifier for registration and logging.
    fn name(&self) -> &'static str;

    /// Evaluates one text pair to a verdict.
    fn evaluate(&self, entry: &TextPair) -> Verdict;
}

/// Describes one settings field for configuration surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub default: &'static str,
}
