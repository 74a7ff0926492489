//! Language-identity comparison evaluator.
//!
//! Checks whether a generated answer is in the same language as the prompt,
//! or in a specific expected language, using confidence-weighted language
//! detection. Short texts and low-confidence detections are skipped rather
//! than failed, since the detector is unreliable on low signal.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::{LanguageClassifier, LinguaClassifier};
use crate::evaluators::{Evaluator, SettingDescriptor};
use crate::language::LanguageCode;
use crate::pipeline::{detect_confident_languages, word_gate, StageOutcome};
use crate::types::{LanguageDistribution, RawDistributions, TextField, TextPair, Verdict};
use crate::ConfigError;

/// Below this many words, texts are skipped instead of classified.
pub const DEFAULT_MIN_WORDS: usize = 7;

/// Minimum confidence (exclusive) for a detection to count.
pub const DEFAULT_THRESHOLD: f64 = 0.25;

/// Which comparison the evaluator performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// The output must share a detected language with the input.
    #[default]
    InputMatchesOutput,

    /// The output alone is checked, optionally against an expected language.
    OutputMatchesLanguage,
}

/// Settings for [`LanguageMatchEvaluator`], validated at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageMatchSettings {
    /// What should be checked.
    pub mode: ComparisonMode,

    /// The specific language the output is expected to be, if any.
    pub expected_language: Option<LanguageCode>,

    /// Minimum number of words required before a text is classified.
    pub min_words: usize,

    /// Minimum confidence threshold for the language detection.
    pub threshold: f64,
}

impl Default for LanguageMatchSettings {
    fn default() -> Self {
        Self {
            mode: ComparisonMode::default(),
            expected_language: None,
            min_words: DEFAULT_MIN_WORDS,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl LanguageMatchSettings {
    /// Rejects configurations that could never evaluate meaningfully.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        Ok(())
    }

    /// Field documentation for configuration surfaces.
    pub fn descriptors() -> &'static [SettingDescriptor] {
        &[
            SettingDescriptor {
                name: "mode",
                description: "What should be checked",
                default: "input_matches_output",
            },
            SettingDescriptor {
                name: "expected_language",
                description: "(Optional) The specific language that the output is expected to be",
                default: "None",
            },
            SettingDescriptor {
                name: "min_words",
                description: "Minimum number of words to check, as the language detection can \
                              be unreliable for very short texts. Inputs shorter than the \
                              minimum will be skipped.",
                default: "7",
            },
            SettingDescriptor {
                name: "threshold",
                description: "Minimum confidence threshold for the language detection. If the \
                              confidence is lower than this, the evaluation will be skipped.",
                default: "0.25",
            },
        ]
    }
}

/// The language-identity comparison evaluator.
///
/// Holds immutable settings and a shared classifier; safe for concurrent
/// use from parallel callers.
pub struct LanguageMatchEvaluator {
    settings: LanguageMatchSettings,
    classifier: Arc<dyn LanguageClassifier>,
}

impl LanguageMatchEvaluator {
    /// Creates an evaluator with an explicit classifier.
    ///
    /// Fails fast on invalid settings; evaluation itself never errors.
    pub fn new(
        settings: LanguageMatchSettings,
        classifier: Arc<dyn LanguageClassifier>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            settings,
            classifier,
        })
    }

    /// Creates an evaluator backed by the process-wide lingua detector.
    pub fn with_shared_classifier(settings: LanguageMatchSettings) -> Result<Self, ConfigError> {
        // Validate before touching the shared detector, so a bad
        // configuration never triggers model loading.
        settings.validate()?;
        Self::new(settings, LinguaClassifier::shared())
    }

    pub fn settings(&self) -> &LanguageMatchSettings {
        &self.settings
    }

    fn detect(&self, text: &str, field: TextField) -> StageOutcome<LanguageDistribution> {
        detect_confident_languages(
            self.classifier.as_ref(),
            text,
            self.settings.threshold,
            field,
        )
    }

    /// Final comparison for [`ComparisonMode::OutputMatchesLanguage`].
    fn check_output_language(&self, output_languages: LanguageDistribution) -> Verdict {
        let passed = match self.settings.expected_language {
            None => true,
            Some(expected) => output_languages.contains(expected),
        };

        Verdict::processed(output_languages.len() as f64, passed)
            .with_details(format!(
                "Languages detected: {}",
                output_languages.join_codes()
            ))
            .with_distributions(RawDistributions {
                input: None,
                output: output_languages,
            })
    }

    /// Final comparison for [`ComparisonMode::InputMatchesOutput`].
    fn check_input_matches_output(
        &self,
        entry: &TextPair,
        output_languages: LanguageDistribution,
    ) -> Verdict {
        let input_languages = match self.detect(&entry.input, TextField::Input) {
            StageOutcome::Continue(distribution) => distribution,
            StageOutcome::Skip(reason) => return Verdict::skipped(reason),
        };

        let mut passed = output_languages
            .languages()
            .any(|language| input_languages.contains(language));

        let mut prefix = if passed {
            String::new()
        } else {
            "Input and output languages do not match. ".to_string()
        };

        // When an expected language is configured and the final outcome is a
        // failure, the expected-language message wins even if the underlying
        // cause was lack of overlap. Callers rely on this exact precedence.
        if let Some(expected) = self.settings.expected_language {
            passed = passed && output_languages.contains(expected);
            if !passed {
                prefix = format!(
                    "Input and output do not match the expected language: {expected}. "
                );
            }
        }

        let score = output_languages.union_len(&input_languages) as f64;

        Verdict::processed(score, passed)
            .with_details(format!(
                "{prefix}Input languages detected: {}. Output languages detected: {}",
                input_languages.join_codes(),
                output_languages.join_codes()
            ))
            .with_distributions(RawDistributions {
                input: Some(input_languages),
                output: output_languages,
            })
    }
}

impl Evaluator for LanguageMatchEvaluator {
    fn name(&self) -> &'static str {
        "language_match"
    }

    fn evaluate(&self, entry: &TextPair) -> Verdict {
        // The input gate only applies when the input side is compared;
        // expected-language checks on the output alone do not need it.
        if self.settings.mode == ComparisonMode::InputMatchesOutput {
            if let StageOutcome::Skip(reason) =
                word_gate(&entry.input, self.settings.min_words, TextField::Input)
            {
                debug!(evaluator = self.name(), %reason, "skipping");
                return Verdict::skipped(reason);
            }
        }

        if let StageOutcome::Skip(reason) =
            word_gate(&entry.output, self.settings.min_words, TextField::Output)
        {
            debug!(evaluator = self.name(), %reason, "skipping");
            return Verdict::skipped(reason);
        }

        let output_languages = match self.detect(&entry.output, TextField::Output) {
            StageOutcome::Continue(distribution) => distribution,
            StageOutcome::Skip(reason) => return Verdict::skipped(reason),
        };

        match self.settings.mode {
            ComparisonMode::OutputMatchesLanguage => self.check_output_language(output_languages),
            ComparisonMode::InputMatchesOutput => {
                self.check_input_matches_output(entry, output_languages)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EvaluationStatus;

    /// Deterministic classifier keyed on exact text.
    struct FakeClassifier {
        responses: Vec<(&'static str, Vec<(LanguageCode, f64)>)>,
    }

    impl LanguageClassifier for FakeClassifier {
        fn compute_confidences(&self, text: &str) -> Vec<(LanguageCode, f64)> {
            self.responses
                .iter()
                .find(|(known, _)| *known == text)
                .map(|(_, confidences)| confidences.clone())
                .unwrap_or_default()
        }
    }

    const EN_TEXT: &str = "hello how is it going my friend? testing";
    const PT_TEXT: &str = "ola como vai voce eu vou bem obrigado";

    fn fake_classifier() -> Arc<FakeClassifier> {
        Arc::new(FakeClassifier {
            responses: vec![
                (EN_TEXT, vec![(LanguageCode::EN, 0.93)]),
                (PT_TEXT, vec![(LanguageCode::PT, 0.88)]),
            ],
        })
    }

    fn evaluator(settings: LanguageMatchSettings) -> LanguageMatchEvaluator {
        LanguageMatchEvaluator::new(settings, fake_classifier()).unwrap()
    }

    #[test]
    fn test_threshold_out_of_range_fails_at_construction() {
        let settings = LanguageMatchSettings {
            threshold: 1.5,
            ..Default::default()
        };
        let result = LanguageMatchEvaluator::new(settings, fake_classifier());
        assert!(matches!(
            result.err(),
            Some(ConfigError::ThresholdOutOfRange(_))
        ));
    }

    #[test]
    fn test_output_matches_language_without_expectation() {
        let evaluator = evaluator(LanguageMatchSettings {
            mode: ComparisonMode::OutputMatchesLanguage,
            ..Default::default()
        });
        let verdict = evaluator.evaluate(&TextPair::new("small text", EN_TEXT));

        assert_eq!(verdict.status, EvaluationStatus::Processed);
        assert_eq!(verdict.passed, Some(true));
        assert_eq!(verdict.score, 1.0);
        assert_eq!(verdict.details.as_deref(), Some("Languages detected: EN"));
    }

    #[test]
    fn test_output_matches_expected_language() {
        let evaluator = evaluator(LanguageMatchSettings {
            mode: ComparisonMode::OutputMatchesLanguage,
            expected_language: Some(LanguageCode::EN),
            ..Default::default()
        });
        let verdict = evaluator.evaluate(&TextPair::new("", EN_TEXT));
        assert_eq!(verdict.passed, Some(true));
    }

    #[test]
    fn test_output_fails_wrong_expected_language() {
        let evaluator = evaluator(LanguageMatchSettings {
            mode: ComparisonMode::OutputMatchesLanguage,
            expected_language: Some(LanguageCode::PT),
            ..Default::default()
        });
        let verdict = evaluator.evaluate(&TextPair::new("", EN_TEXT));

        assert_eq!(verdict.passed, Some(false));
        assert_eq!(verdict.score, 1.0);
        assert_eq!(verdict.details.as_deref(), Some("Languages detected: EN"));
    }

    #[test]
    fn test_input_matches_output_mismatch() {
        let evaluator = evaluator(LanguageMatchSettings::default());
        let verdict = evaluator.evaluate(&TextPair::new(EN_TEXT, PT_TEXT));

        assert_eq!(verdict.status, EvaluationStatus::Processed);
        assert_eq!(verdict.passed, Some(false));
        assert_eq!(verdict.score, 2.0);
        assert_eq!(
            verdict.details.as_deref(),
            Some(
                "Input and output languages do not match. \
                 Input languages detected: EN. Output languages detected: PT"
            )
        );
    }

    #[test]
    fn test_input_matches_output_same_language() {
        let evaluator = evaluator(LanguageMatchSettings::default());
        let verdict = evaluator.evaluate(&TextPair::new(EN_TEXT, EN_TEXT));

        assert_eq!(verdict.passed, Some(true));
        assert_eq!(verdict.score, 1.0);
        assert_eq!(
            verdict.details.as_deref(),
            Some("Input languages detected: EN. Output languages detected: EN")
        );
    }

    #[test]
    fn test_expected_language_message_wins_over_generic_mismatch() {
        // Input EN, output PT, expected ES: the overlap check already failed,
        // but the expected-language message still takes precedence.
        let evaluator = evaluator(LanguageMatchSettings {
            expected_language: Some(LanguageCode::ES),
            ..Default::default()
        });
        let verdict = evaluator.evaluate(&TextPair::new(EN_TEXT, PT_TEXT));

        assert_eq!(verdict.passed, Some(false));
        assert_eq!(
            verdict.details.as_deref(),
            Some(
                "Input and output do not match the expected language: ES. \
                 Input languages detected: EN. Output languages detected: PT"
            )
        );
    }

    #[test]
    fn test_expected_language_fails_despite_overlap() {
        let evaluator = evaluator(LanguageMatchSettings {
            expected_language: Some(LanguageCode::PT),
            ..Default::default()
        });
        let verdict = evaluator.evaluate(&TextPair::new(EN_TEXT, EN_TEXT));

        assert_eq!(verdict.passed, Some(false));
        assert_eq!(
            verdict.details.as_deref(),
            Some(
                "Input and output do not match the expected language: PT. \
                 Input languages detected: EN. Output languages detected: EN"
            )
        );
    }

    #[test]
    fn test_short_input_skips_before_classification() {
        let evaluator = evaluator(LanguageMatchSettings::default());
        let verdict = evaluator.evaluate(&TextPair::new("small text", "small text"));

        assert!(verdict.is_skipped());
        assert_eq!(verdict.passed, None);
        assert_eq!(
            verdict.details.as_deref(),
            Some("Skipped because the input has less than 7 words")
        );
    }

    #[test]
    fn test_short_output_skips_in_output_mode() {
        let evaluator = evaluator(LanguageMatchSettings {
            mode: ComparisonMode::OutputMatchesLanguage,
            ..Default::default()
        });
        let verdict = evaluator.evaluate(&TextPair::new("", "small text"));

        assert!(verdict.is_skipped());
        assert_eq!(
            verdict.details.as_deref(),
            Some("Skipped because the output has less than 7 words")
        );
    }

    #[test]
    fn test_undetectable_output_skips_with_threshold_reason() {
        // min_words 0 lets the empty string through the gate; the classifier
        // then finds nothing confident.
        let evaluator = evaluator(LanguageMatchSettings {
            mode: ComparisonMode::OutputMatchesLanguage,
            min_words: 0,
            ..Default::default()
        });
        let verdict = evaluator.evaluate(&TextPair::new("", ""));

        assert!(verdict.is_skipped());
        assert_eq!(
            verdict.details.as_deref(),
            Some(
                "Skipped because no language could be detected on the output \
                 with a confidence higher than 0.25"
            )
        );
    }

    #[test]
    fn test_raw_distributions_reported() {
        let evaluator = evaluator(LanguageMatchSettings::default());
        let verdict = evaluator.evaluate(&TextPair::new(EN_TEXT, PT_TEXT));

        let raw = verdict.raw_response.expect("raw distributions");
        assert!(raw.output.contains(LanguageCode::PT));
        assert!(raw.input.expect("input distribution").contains(LanguageCode::EN));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let evaluator = evaluator(LanguageMatchSettings::default());
        let entry = TextPair::new(EN_TEXT, PT_TEXT);
        assert_eq!(evaluator.evaluate(&entry), evaluator.evaluate(&entry));
    }

    #[test]
    fn test_settings_roundtrip_through_serde() {
        let settings: LanguageMatchSettings = serde_json::from_str(
            r#"{"mode": "output_matches_language", "expected_language": "EN"}"#,
        )
        .unwrap();
        assert_eq!(settings.mode, ComparisonMode::OutputMatchesLanguage);
        assert_eq!(settings.expected_language, Some(LanguageCode::EN));
        assert_eq!(settings.min_words, DEFAULT_MIN_WORDS);
        assert_eq!(settings.threshold, DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_descriptors_cover_every_setting() {
        let names: Vec<_> = LanguageMatchSettings::descriptors()
            .iter()
            .map(|descriptor| descriptor.name)
            .collect();
        assert_eq!(
            names,
            vec!["mode", "expected_language", "min_words", "threshold"]
        );
    }
}
