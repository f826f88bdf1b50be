use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The five languages every catalog record and UI dictionary is authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Fr,
    Pt,
    Ja,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported language code: {0:?}")]
pub struct LanguageError(pub String);

// One language-range of an Accept-Language header or a bare locale tag
// ("fr-CA", "pt_BR", "ja;q=0.8"). Only the primary subtag is captured.
static LANGUAGE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z]{1,8})(?:[-_][A-Za-z0-9]{1,8})*\s*(?:;\s*q\s*=\s*([0-9.]+))?\s*$")
        .expect("language range pattern is valid")
});

impl Language {
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::Pt,
        Language::Ja,
    ];

    /// Used when the environment reports no supported locale.
    pub const FALLBACK: Language = Language::Es;

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Pt => "pt",
            Language::Ja => "ja",
        }
    }

    /// English name of the language, as handed to the fact generator prompt.
    pub fn english_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::Pt => "Portuguese",
            Language::Ja => "Japanese",
        }
    }

    /// Self-name shown in the language switcher.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Fr => "Français",
            Language::Pt => "Português",
            Language::Ja => "日本語",
        }
    }

    /// Matches a locale tag such as `fr-CA` by its primary subtag.
    pub fn from_locale(tag: &str) -> Option<Self> {
        let caps = LANGUAGE_RANGE.captures(tag)?;
        let rejected = caps
            .get(2)
            .and_then(|q| q.as_str().parse::<f32>().ok())
            .is_some_and(|q| q <= 0.0);
        if rejected {
            return None;
        }
        caps.get(1)?.as_str().parse().ok()
    }

    /// Picks the first supported language of an `Accept-Language` style list,
    /// in the order the environment reports them.
    pub fn detect(accept_language: Option<&str>) -> Self {
        accept_language
            .into_iter()
            .flat_map(|header| header.split(','))
            .find_map(Language::from_locale)
            .unwrap_or(Language::FALLBACK)
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "fr" => Ok(Language::Fr),
            "pt" => Ok(Language::Pt),
            "ja" => Ok(Language::Ja),
            _ => Err(LanguageError(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
