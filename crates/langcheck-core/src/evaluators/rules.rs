//! Rule-match evaluator: simple substring and regex checks.
//!
//! Rules run in listed order against the chosen field and short-circuit on
//! the first violation; the score is binary. Regex rules match from the
//! beginning of the string (anchored at start, not a full-string match and
//! not a search).

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::evaluators::Evaluator;
use crate::types::{TextField, TextPair, Verdict};
use crate::ConfigError;

/// The check a single rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Contains,
    NotContains,
    MatchesRegex,
    NotMatchesRegex,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RuleKind::Contains => "contains",
            RuleKind::NotContains => "not_contains",
            RuleKind::MatchesRegex => "matches_regex",
            RuleKind::NotMatchesRegex => "not_matches_regex",
        };
        f.write_str(name)
    }
}

/// One boolean text rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Which side of the pair to check. Defaults to the output.
    #[serde(default)]
    pub field: TextField,

    #[serde(rename = "rule")]
    pub kind: RuleKind,

    /// Substring to look for, or regex pattern to match.
    pub value: String,
}

/// Settings for [`RuleMatchEvaluator`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleMatchSettings {
    pub rules: Vec<Rule>,
}

/// A rule with its regex compiled up front.
///
/// Compiling at construction keeps invalid patterns a configuration error
/// rather than an evaluation-time surprise.
struct CompiledRule {
    rule: Rule,
    regex: Option<Regex>,
}

impl CompiledRule {
    fn compile(rule: Rule) -> Result<Self, ConfigError> {
        let regex = match rule.kind {
            RuleKind::MatchesRegex | RuleKind::NotMatchesRegex => {
                // \A anchors at the start of the haystack only.
                let anchored = format!(r"\A(?:{})", rule.value);
                Some(Regex::new(&anchored).map_err(|source| ConfigError::InvalidRegex {
                    pattern: rule.value.clone(),
                    source,
                })?)
            }
            RuleKind::Contains | RuleKind::NotContains => None,
        };
        Ok(Self { rule, regex })
    }

    fn holds(&self, text: &str) -> bool {
        match self.rule.kind {
            RuleKind::Contains => text.contains(&self.rule.value),
            RuleKind::NotContains => !text.contains(&self.rule.value),
            RuleKind::MatchesRegex => self.matches_regex(text),
            RuleKind::NotMatchesRegex => !self.matches_regex(text),
        }
    }

    fn matches_regex(&self, text: &str) -> bool {
        self.regex
            .as_ref()
            .is_some_and(|regex| regex.is_match(text))
    }
}

/// The rule-match evaluator.
pub struct RuleMatchEvaluator {
    rules: Vec<CompiledRule>,
}

impl RuleMatchEvaluator {
    /// Compiles all rules, failing fast on an invalid regex pattern.
    pub fn new(settings: RuleMatchSettings) -> Result<Self, ConfigError> {
        let rules = settings
            .rules
            .into_iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }
}

impl Evaluator for RuleMatchEvaluator {
    fn name(&self) -> &'static str {
        "rule_match"
    }

    fn evaluate(&self, entry: &TextPair) -> Verdict {
        if self.rules.is_empty() {
            return Verdict::processed(0.0, false).with_details("No rules were defined");
        }

        for compiled in &self.rules {
            let text = entry.field(compiled.rule.field);
            if !compiled.holds(text) {
                return Verdict::processed(0.0, false).with_details(format!(
                    "Rule {} \"{}\" failed for {} \"{}\"",
                    compiled.rule.kind, compiled.rule.value, compiled.rule.field, text
                ));
            }
        }

        Verdict::processed(1.0, true)
    }
}
