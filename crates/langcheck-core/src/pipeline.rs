//! Shared evaluation stages: word-count gating and confident detection.
//!
//! Both comparison modes of the language evaluator run the same gate and
//! detect-filter stages before their final comparison. Each stage returns a
//! tagged [`StageOutcome`] so the skip/continue control flow is explicit
//! rather than an early-return chain.

use tracing::debug;

use crate::classifier::LanguageClassifier;
use crate::types::{LanguageDistribution, TextField};

/// Result of one pipeline stage: keep going, or stop with a skip reason.
///
/// Skip reasons are user-facing strings, not errors; low signal is a
/// reporting outcome, never a program fault.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Continue(T),
    Skip(String),
}

/// Skips evaluation when `text` has fewer than `min_words` whitespace-
/// separated words. Language detection is unreliable on very short strings;
/// gating avoids false-confidence verdicts.
///
/// `min_words = 0` never skips, even for the empty string.
pub fn word_gate(text: &str, min_words: usize, field: TextField) -> StageOutcome<()> {
    let words = text.split_whitespace().count();
    if words < min_words {
        StageOutcome::Skip(format!(
            "Skipped because the {field} has less than {min_words} words"
        ))
    } else {
        StageOutcome::Continue(())
    }
}

/// Classifies `text` and keeps languages detected with confidence strictly
/// greater than `threshold`.
///
/// An empty filtered result is a skip: absence of confident detection is
/// categorically different from a confident mismatch.
pub fn detect_confident_languages(
    classifier: &dyn LanguageClassifier,
    text: &str,
    threshold: f64,
    field: TextField,
) -> StageOutcome<LanguageDistribution> {
    let raw: LanguageDistribution = classifier.compute_confidences(text).into_iter().collect();
    let confident = raw.filter(threshold);
    if confident.is_empty() {
        StageOutcome::Skip(format!(
            "Skipped because no language could be detected on the {field} \
             with a confidence higher than {threshold}"
        ))
    } else {
        debug!(
            %field,
            languages = %confident.join_codes(),
            "confident languages detected"
        );
        StageOutcome::Continue(confident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageCode;
    use proptest::prelude::*;

    struct FixedClassifier(Vec<(LanguageCode, f64)>);

    impl LanguageClassifier for FixedClassifier {
        fn compute_confidences(&self, _text: &str) -> Vec<(LanguageCode, f64)> {
            self.0.clone()
        }
    }

    #[test]
    fn test_gate_skips_short_text() {
        let outcome = word_gate("small text", 7, TextField::Input);
        assert_eq!(
            outcome,
            StageOutcome::Skip("Skipped because the input has less than 7 words".to_string())
        );
    }

    #[test]
    fn test_gate_passes_long_enough_text() {
        let outcome = word_gate("one two three four five six seven", 7, TextField::Output);
        assert_eq!(outcome, StageOutcome::Continue(()));
    }

    #[test]
    fn test_gate_message_names_the_field() {
        match word_gate("hi", 3, TextField::Output) {
            StageOutcome::Skip(reason) => {
                assert_eq!(reason, "Skipped because the output has less than 3 words")
            }
            StageOutcome::Continue(()) => panic!("expected skip"),
        }
    }

    #[test]
    fn test_detection_below_threshold_skips() {
        let classifier = FixedClassifier(vec![(LanguageCode::EN, 0.2), (LanguageCode::PT, 0.25)]);
        let outcome =
            detect_confident_languages(&classifier, "whatever", 0.25, TextField::Output);
        assert_eq!(
            outcome,
            StageOutcome::Skip(
                "Skipped because no language could be detected on the output \
                 with a confidence higher than 0.25"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_detection_keeps_confident_languages_in_order() {
        let classifier = FixedClassifier(vec![
            (LanguageCode::PT, 0.6),
            (LanguageCode::ES, 0.3),
            (LanguageCode::EN, 0.1),
        ]);
        match detect_confident_languages(&classifier, "whatever", 0.25, TextField::Input) {
            StageOutcome::Continue(distribution) => {
                let codes: Vec<_> = distribution.languages().collect();
                assert_eq!(codes, vec![LanguageCode::PT, LanguageCode::ES]);
            }
            StageOutcome::Skip(reason) => panic!("unexpected skip: {reason}"),
        }
    }

    proptest! {
        /// A zero minimum never gates, whatever the text looks like.
        #[test]
        fn prop_zero_min_words_never_skips(text in ".*") {
            prop_assert_eq!(
                word_gate(&text, 0, TextField::Input),
                StageOutcome::Continue(())
            );
        }
    }
}
