//! UI string dictionaries and the per-request locale resolver.
//!
//! Dictionaries are flat `key -> text` JSON objects compiled into the binary,
//! one per [`Language`]. Lookups never fail: an unknown key resolves to the
//! key itself, and there is no fallback to another language.

use crate::catalog::Localized;
use crate::language::{Language, LanguageError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

const EMBEDDED: [(Language, &str); 5] = [
    (Language::En, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/en.json"))),
    (Language::Es, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/es.json"))),
    (Language::Fr, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/fr.json"))),
    (Language::Pt, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/pt.json"))),
    (Language::Ja, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/ja.json"))),
];

#[derive(Debug, Error)]
#[error("dictionary for {language} is malformed: {source}")]
pub struct DictionaryError {
    pub language: Language,
    #[source]
    pub source: serde_json::Error,
}

pub type Dictionary = HashMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct Translations {
    dictionaries: HashMap<Language, Dictionary>,
}

impl Translations {
    pub fn embedded() -> Result<Self, DictionaryError> {
        let mut dictionaries = HashMap::with_capacity(EMBEDDED.len());
        for (language, json) in EMBEDDED {
            let dictionary: Dictionary = serde_json::from_str(json)
                .map_err(|source| DictionaryError { language, source })?;
            dictionaries.insert(language, dictionary);
        }
        Ok(Translations { dictionaries })
    }

    pub fn from_dictionaries(dictionaries: impl IntoIterator<Item = (Language, Dictionary)>) -> Self {
        Translations {
            dictionaries: dictionaries.into_iter().collect(),
        }
    }

    pub fn translate<'a>(&'a self, key: &'a str, language: Language) -> &'a str {
        self.dictionaries
            .get(&language)
            .and_then(|d| d.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }

    pub fn dictionary(&self, language: Language) -> Option<&Dictionary> {
        self.dictionaries.get(&language)
    }
}

/// Localized text access for one active language.
///
/// A resolver is always constructed with a language already chosen, so code
/// holding one can translate without checking for an uninitialized state.
/// It is passed explicitly to whatever renders text.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    translations: Arc<Translations>,
    language: Language,
}

impl LocaleResolver {
    pub fn new(translations: Arc<Translations>, language: Language) -> Self {
        LocaleResolver {
            translations,
            language,
        }
    }

    /// Starts in the language the environment reports, or the fallback.
    pub fn detect(translations: Arc<Translations>, accept_language: Option<&str>) -> Self {
        Self::new(translations, Language::detect(accept_language))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, code: &str) -> Result<(), LanguageError> {
        self.language = code.parse()?;
        Ok(())
    }

    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.translations.translate(key, self.language)
    }

    /// Multilingual record field in the active language; empty when absent.
    pub fn localize<'a>(&self, text: &'a Localized) -> &'a str {
        text.or_empty(self.language)
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(language: Language) -> LocaleResolver {
        LocaleResolver::new(Arc::new(Translations::embedded().unwrap()), language)
    }

    #[test]
    fn embedded_dictionaries_share_keys() {
        let translations = Translations::embedded().unwrap();
        let english = translations.dictionary(Language::En).unwrap();
        for language in Language::ALL {
            let dictionary = translations.dictionary(language).unwrap();
            let mut missing: Vec<&String> =
                english.keys().filter(|k| !dictionary.contains_key(*k)).collect();
            missing.sort();
            assert!(missing.is_empty(), "{language} lacks {missing:?}");
        }
    }

    #[test]
    fn known_keys_resolve_per_language() {
        assert_eq!(resolver(Language::En).t("atomicNumber"), "Atomic Number");
        assert_eq!(resolver(Language::Es).t("atomicNumber"), "Número atómico");
        assert_eq!(resolver(Language::Ja).t("noble-gas"), "貴ガス");
    }

    #[test]
    fn unknown_key_resolves_to_itself() {
        for language in Language::ALL {
            assert_eq!(resolver(language).t("zzzUnknown"), "zzzUnknown");
        }
    }

    #[test]
    fn no_cross_language_fallback() {
        let mut en = Dictionary::new();
        en.insert("onlyEnglish".to_string(), "Only English".to_string());
        let translations =
            Translations::from_dictionaries([(Language::En, en), (Language::Fr, Dictionary::new())]);
        assert_eq!(translations.translate("onlyEnglish", Language::En), "Only English");
        assert_eq!(translations.translate("onlyEnglish", Language::Fr), "onlyEnglish");
        assert_eq!(translations.translate("onlyEnglish", Language::Ja), "onlyEnglish");
    }

    #[test]
    fn set_language_accepts_only_supported_codes() {
        let mut r = resolver(Language::En);
        r.set_language("pt").unwrap();
        assert_eq!(r.language(), Language::Pt);
        assert!(r.set_language("xx").is_err());
        assert_eq!(r.language(), Language::Pt);
    }

    #[test]
    fn detect_uses_fallback() {
        let translations = Arc::new(Translations::embedded().unwrap());
        let r = LocaleResolver::detect(translations.clone(), Some("fr-FR,fr;q=0.9"));
        assert_eq!(r.language(), Language::Fr);
        let r = LocaleResolver::detect(translations, Some("ko-KR"));
        assert_eq!(r.language(), Language::FALLBACK);
    }

    #[test]
    fn localize_renders_missing_field_as_empty() {
        let text: Localized = [(Language::En, "Hydrogen")].into_iter().collect();
        assert_eq!(resolver(Language::En).localize(&text), "Hydrogen");
        assert_eq!(resolver(Language::Ja).localize(&text), "");
    }
}
