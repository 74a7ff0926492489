//! Core data types shared by all evaluators.

use serde::{Deserialize, Serialize};

use crate::language::LanguageCode;

/// The input/output text pair under evaluation.
///
/// Immutable once constructed; evaluators never mutate it. Fields missing
/// from serialized entries deserialize as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TextPair {
    /// The prompt sent to the model.
    pub input: String,

    /// The response produced by the model.
    pub output: String,
}

impl TextPair {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// The text carried by the given field.
    pub fn field(&self, field: TextField) -> &str {
        match field {
            TextField::Input => &self.input,
            TextField::Output => &self.output,
        }
    }
}

/// Which side of the pair a check applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    Input,
    #[default]
    Output,
}

impl std::fmt::Display for TextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextField::Input => f.write_str("input"),
            TextField::Output => f.write_str("output"),
        }
    }
}

/// Detected languages with their confidences, in detection order.
///
/// Keys are unique; the order is whatever the classifier returned (for
/// lingua, confidence-descending) and is preserved into verdict details,
/// never re-sorted. Serializes as a map of code to confidence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LanguageDistribution {
    entries: Vec<(LanguageCode, f64)>,
}

impl LanguageDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, ignoring duplicates of an already-present language.
    pub fn insert(&mut self, language: LanguageCode, confidence: f64) {
        if !self.contains(language) {
            self.entries.push((language, confidence));
        }
    }

    pub fn contains(&self, language: LanguageCode) -> bool {
        self.entries.iter().any(|(code, _)| *code == language)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LanguageCode, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Detected language codes, in detection order.
    pub fn languages(&self) -> impl Iterator<Item = LanguageCode> + '_ {
        self.entries.iter().map(|(code, _)| *code)
    }

    /// Codes joined for display, e.g. `"EN, PT"`.
    pub fn join_codes(&self) -> String {
        self.languages()
            .map(|code| code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Keeps entries with confidence strictly greater than `threshold`.
    ///
    /// Ties at the threshold are excluded. An empty result means no
    /// confident detection, which callers must treat as a skip, not as a
    /// mismatch.
    pub fn filter(&self, threshold: f64) -> LanguageDistribution {
        self.entries
            .iter()
            .copied()
            .filter(|(_, confidence)| *confidence > threshold)
            .collect()
    }

    /// Number of distinct languages across both distributions.
    pub fn union_len(&self, other: &LanguageDistribution) -> usize {
        self.len()
            + other
                .languages()
                .filter(|language| !self.contains(*language))
                .count()
    }
}

impl FromIterator<(LanguageCode, f64)> for LanguageDistribution {
    fn from_iter<I: IntoIterator<Item = (LanguageCode, f64)>>(iter: I) -> Self {
        let mut distribution = LanguageDistribution::new();
        for (language, confidence) in iter {
            distribution.insert(language, confidence);
        }
        distribution
    }
}

impl Serialize for LanguageDistribution {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, confidence) in &self.entries {
            map.serialize_entry(code, confidence)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LanguageDistribution {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DistributionVisitor;

        impl<'de> serde::de::Visitor<'de> for DistributionVisitor {
            type Value = LanguageDistribution;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of language codes to confidences")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<Self::Value, A::Error> {
                let mut distribution = LanguageDistribution::new();
                while let Some((code, confidence)) = access.next_entry::<LanguageCode, f64>()? {
                    distribution.insert(code, confidence);
                }
                Ok(distribution)
            }
        }

        deserializer.deserialize_map(DistributionVisitor)
    }
}

/// The filtered distributions a language verdict was based on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDistributions {
    /// Only present in input-matches-output mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<LanguageDistribution>,

    pub output: LanguageDistribution,
}

/// Whether an evaluation ran to a verdict or was skipped for low signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
    Processed,
    Skipped,
}

/// The complete output of one evaluation call.
///
/// Invariant: `Skipped` verdicts carry no `passed` flag and their score is
/// not meaningful; `Processed` verdicts always carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: EvaluationStatus,

    pub score: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Distributions behind a language verdict; absent for rule verdicts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<RawDistributions>,
}

impl Verdict {
    /// A low-signal skip with a user-facing reason. Not a failure.
    pub fn skipped(details: impl Into<String>) -> Self {
        Self {
            status: EvaluationStatus::Skipped,
            score: 0.0,
            passed: None,
            details: Some(details.into()),
            raw_response: None,
        }
    }

    /// A completed evaluation with a pass/fail outcome.
    pub fn processed(score: f64, passed: bool) -> Self {
        Self {
            status: EvaluationStatus::Processed,
            score,
            passed: Some(passed),
            details: None,
            raw_response: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_distributions(mut self, raw_response: RawDistributions) -> Self {
        self.raw_response = Some(raw_response);
        self
    }

    pub fn is_skipped(&self) -> bool {
        self.status == EvaluationStatus::Skipped
    }
}
