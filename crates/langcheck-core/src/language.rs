//! Language codes reported by the classifier.
//!
//! The set mirrors the 75 languages the lingua detector ships models for.
//! Codes serialize as their uppercase ISO 639-1 form ("EN", "PT"), which is
//! also the form used in verdict details and settings files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string is not a supported language code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown language code: {0}")]
pub struct UnknownLanguageError(pub String);

macro_rules! language_codes {
    ($($code:ident),+ $(,)?) => {
        /// ISO 639-1 code of a language the classifier can detect.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum LanguageCode {
            $($code,)+
        }

        impl LanguageCode {
            /// Every supported language, in alphabetical code order.
            pub const ALL: &'static [LanguageCode] = &[$(LanguageCode::$code,)+];

            /// The uppercase two-letter code, e.g. `"EN"`.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(LanguageCode::$code => stringify!($code),)+
                }
            }
        }

        impl FromStr for LanguageCode {
            type Err = UnknownLanguageError;

            /// Parses a two-letter code, case-insensitively.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_uppercase().as_str() {
                    $(stringify!($code) => Ok(LanguageCode::$code),)+
                    _ => Err(UnknownLanguageError(s.to_string())),
                }
            }
        }
    };
}

language_codes!(
    AF, AR, AZ, BE, BG, BN, BS, CA, CS, CY, DA, DE, EL, EN, EO, ES, ET, EU, FA,
    FI, FR, GA, GU, HE, HI, HR, HU, HY, ID, IS, IT, JA, KA, KK, KO, LA, LG, LT,
    LV, MI, MK, MN, MR, MS, NB, NL, NN, PA, PL, PT, RO, RU, SK, SL, SN, SO, SQ,
    SR, ST, SV, SW, TA, TE, TH, TL, TN, TR, TS, UK, UR, VI, XH, YO, ZH, ZU,
);

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_uppercase_code() {
        assert_eq!(LanguageCode::EN.to_string(), "EN");
        assert_eq!(LanguageCode::PT.to_string(), "PT");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("en".parse::<LanguageCode>().unwrap(), LanguageCode::EN);
        assert_eq!("Pt".parse::<LanguageCode>().unwrap(), LanguageCode::PT);
    }

    #[test]
    fn test_parse_unknown_code_fails() {
        let err = "XX".parse::<LanguageCode>().unwrap_err();
        assert_eq!(err, UnknownLanguageError("XX".to_string()));
    }

    #[test]
    fn test_all_lists_every_variant_once() {
        assert_eq!(LanguageCode::ALL.len(), 75);
        let mut seen = std::collections::HashSet::new();
        for code in LanguageCode::ALL {
            assert!(seen.insert(code.as_str()));
        }
    }

    #[test]
    fn test_serde_uses_code_form() {
        let json = serde_json::to_string(&LanguageCode::EN).unwrap();
        assert_eq!(json, r#""EN""#);
        let code: LanguageCode = serde_json::from_str(r#""PT""#).unwrap();
        assert_eq!(code, LanguageCode::PT);
    }
}
