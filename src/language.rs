//! Supported study languages
//!
//! Language-specific handling is keyed on this enum instead of raw ISO codes;
//! unknown codes are rejected when parsed.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecallError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ru,
    Uk,
    De,
    Fr,
    Es,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Ru,
        Language::Uk,
        Language::De,
        Language::Fr,
        Language::Es,
    ];

    pub fn from_code(code: &str) -> Result<Self, RecallError> {
        let normalized = code.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == normalized)
            .ok_or_else(|| RecallError::UnsupportedLanguage(code.to_string()))
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
            Language::Uk => "uk",
            Language::De => "de",
            Language::Fr => "fr",
            Language::Es => "es",
        }
    }

    /// English name
    pub fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ru => "Russian",
            Language::Uk => "Ukrainian",
            Language::De => "German",
            Language::Fr => "French",
            Language::Es => "Spanish",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ru => "Русский",
            Language::Uk => "Українська",
            Language::De => "Deutsch",
            Language::Fr => "Français",
            Language::Es => "Español",
        }
    }
}

impl FromStr for Language {
    type Err = RecallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("ru").unwrap(), Language::Ru);
        assert_eq!(Language::from_code(" UK ").unwrap(), Language::Uk);
        assert_eq!("de".parse::<Language>().unwrap(), Language::De);
    }

    #[test]
    fn test_unsupported_code() {
        let err = Language::from_code("xx").unwrap_err();
        assert!(matches!(err, RecallError::UnsupportedLanguage(code) if code == "xx"));
    }

    #[test]
    fn test_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()).unwrap(), lang);
            assert_eq!(lang.to_string(), lang.code());
            assert!(!lang.name().is_empty() && !lang.native_name().is_empty());
        }
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&Language::Ru).unwrap();
        assert_eq!(json, "\"ru\"");
        let back: Language = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(back, Language::Fr);
    }
}
