//! Language classification backends.
//!
//! The classifier is an explicit dependency of the language evaluator,
//! injected at construction so tests can substitute deterministic fakes.
//! The production backend wraps the lingua detector, whose models are
//! loaded once per process and shared read-only across threads.

use std::sync::{Arc, OnceLock};

use lingua::{LanguageDetector, LanguageDetectorBuilder};

use crate::language::LanguageCode;

/// A multi-language text classifier.
///
/// Implementations report a confidence in [0, 1] per candidate language,
/// summing to at most 1 across all languages, and return an empty list for
/// undetectable text. Results must be deterministic for identical input and
/// must handle anything from the empty string to very long documents.
pub trait LanguageClassifier: Send + Sync {
    /// Confidence per candidate language, highest first.
    fn compute_confidences(&self, text: &str) -> Vec<(LanguageCode, f64)>;
}

/// The lingua-backed production classifier, built from all languages.
pub struct LinguaClassifier {
    detector: LanguageDetector,
}

impl LinguaClassifier {
    /// Builds a detector with all language models preloaded.
    ///
    /// Loading is expensive; prefer [`LinguaClassifier::shared`] unless a
    /// private instance is required.
    pub fn new() -> Self {
        let detector = LanguageDetectorBuilder::from_all_languages()
            .with_preloaded_language_models()
            .build();
        Self { detector }
    }

    /// The process-wide instance (initialized once, reused).
    pub fn shared() -> Arc<LinguaClassifier> {
        static SHARED: OnceLock<Arc<LinguaClassifier>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(LinguaClassifier::new())).clone()
    }
}

impl Default for LinguaClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageClassifier for LinguaClassifier {
    fn compute_confidences(&self, text: &str) -> Vec<(LanguageCode, f64)> {
        self.detector
            .compute_language_confidence_values(text)
            .into_iter()
            .filter(|(_, confidence)| *confidence > 0.0)
            .filter_map(|(language, confidence)| {
                let code = language
                    .iso_code_639_1()
                    .to_string()
                    .parse::<LanguageCode>()
                    .ok()?;
                Some((code, confidence))
            })
            .collect()
    }
}
