use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

const ELEMENTS_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/elements.json"));

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("element data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("atomic number must be positive (symbol {symbol})")]
    InvalidAtomicNumber { symbol: String },
    #[error("atomic number {0} appears more than once")]
    DuplicateAtomicNumber(u32),
    #[error("symbol {0:?} appears more than once")]
    DuplicateSymbol(String),
    #[error("grid cell ({xpos}, {ypos}) is shared by elements {first} and {second}")]
    DuplicatePosition {
        xpos: u8,
        ypos: u8,
        first: u32,
        second: u32,
    },
    #[error("element {atomic_number} has no {field} text for {language}")]
    MissingTranslation {
        atomic_number: u32,
        field: &'static str,
        language: Language,
    },
}

/// Chemical classification, declared in group display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    AlkaliMetal,
    AlkalineEarthMetal,
    TransitionMetal,
    PostTransitionMetal,
    Metalloid,
    PolyatomicNonmetal,
    DiatomicNonmetal,
    NobleGas,
    Lanthanide,
    Actinide,
    Unknown,
}

impl Category {
    pub const DISPLAY_ORDER: [Category; 11] = [
        Category::AlkaliMetal,
        Category::AlkalineEarthMetal,
        Category::TransitionMetal,
        Category::PostTransitionMetal,
        Category::Metalloid,
        Category::PolyatomicNonmetal,
        Category::DiatomicNonmetal,
        Category::NobleGas,
        Category::Lanthanide,
        Category::Actinide,
        Category::Unknown,
    ];

    /// Wire name; doubles as the translation key for the category label.
    pub fn key(self) -> &'static str {
        match self {
            Category::AlkaliMetal => "alkali-metal",
            Category::AlkalineEarthMetal => "alkaline-earth-metal",
            Category::TransitionMetal => "transition-metal",
            Category::PostTransitionMetal => "post-transition-metal",
            Category::Metalloid => "metalloid",
            Category::PolyatomicNonmetal => "polyatomic-nonmetal",
            Category::DiatomicNonmetal => "diatomic-nonmetal",
            Category::NobleGas => "noble-gas",
            Category::Lanthanide => "lanthanide",
            Category::Actinide => "actinide",
            Category::Unknown => "unknown",
        }
    }

    pub fn display_rank(self) -> usize {
        Self::DISPLAY_ORDER
            .iter()
            .position(|c| *c == self)
            .unwrap_or(Self::DISPLAY_ORDER.len())
    }

    /// Card background and foreground colors.
    pub fn colors(self) -> (&'static str, &'static str) {
        match self {
            Category::NobleGas => ("#c084fc", "#ffffff"),
            Category::AlkaliMetal => ("#f87171", "#ffffff"),
            Category::AlkalineEarthMetal => ("#fb923c", "#ffffff"),
            Category::DiatomicNonmetal => ("#4ade80", "#ffffff"),
            Category::PolyatomicNonmetal => ("#22c55e", "#ffffff"),
            Category::Metalloid => ("#2dd4bf", "#ffffff"),
            Category::PostTransitionMetal => ("#60a5fa", "#ffffff"),
            Category::TransitionMetal => ("#818cf8", "#ffffff"),
            Category::Lanthanide => ("#facc15", "#000000"),
            Category::Actinide => ("#f59e0b", "#000000"),
            Category::Unknown => ("#9ca3af", "#ffffff"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Solid,
    Liquid,
    Gas,
    Unknown,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Solid, Phase::Liquid, Phase::Gas, Phase::Unknown];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Solid => "Solid",
            Phase::Liquid => "Liquid",
            Phase::Gas => "Gas",
            Phase::Unknown => "Unknown",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            Phase::Solid => "phaseSolid",
            Phase::Liquid => "phaseLiquid",
            Phase::Gas => "phaseGas",
            Phase::Unknown => "phaseUnknown",
        }
    }
}

/// Text authored once per language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localized(BTreeMap<Language, String>);

impl Localized {
    pub fn get(&self, language: Language) -> Option<&str> {
        self.0.get(&language).map(String::as_str)
    }

    /// Empty string when the record lacks the language.
    pub fn or_empty(&self, language: Language) -> &str {
        self.get(language).unwrap_or_default()
    }

    fn missing(&self) -> Option<Language> {
        Language::ALL.into_iter().find(|l| !self.0.contains_key(l))
    }
}

impl<S: Into<String>> FromIterator<(Language, S)> for Localized {
    fn from_iter<I: IntoIterator<Item = (Language, S)>>(iter: I) -> Self {
        Localized(iter.into_iter().map(|(l, s)| (l, s.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub atomic_number: u32,
    pub symbol: String,
    pub name: Localized,
    pub atomic_mass: f64,
    pub category: Category,
    pub phase: Phase,
    #[serde(default)]
    pub density: Option<f64>,
    pub summary: Localized,
    pub history: Localized,
    pub electron_configuration: String,
    pub xpos: u8,
    pub ypos: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
}

/// The immutable element dataset, kept in ascending atomic-number order.
#[derive(Debug, Clone)]
pub struct Catalog {
    elements: Vec<ElementRecord>,
    index: HashMap<u32, usize>,
}

impl Catalog {
    pub fn new(mut elements: Vec<ElementRecord>) -> Result<Self, CatalogError> {
        elements.sort_by_key(|e| e.atomic_number);

        let mut index = HashMap::with_capacity(elements.len());
        let mut symbols = HashSet::with_capacity(elements.len());
        let mut cells: HashMap<(u8, u8), u32> = HashMap::with_capacity(elements.len());

        for (i, element) in elements.iter().enumerate() {
            if element.atomic_number == 0 {
                return Err(CatalogError::InvalidAtomicNumber {
                    symbol: element.symbol.clone(),
                });
            }
            if index.insert(element.atomic_number, i).is_some() {
                return Err(CatalogError::DuplicateAtomicNumber(element.atomic_number));
            }
            if !symbols.insert(element.symbol.to_ascii_lowercase()) {
                return Err(CatalogError::DuplicateSymbol(element.symbol.clone()));
            }
            if let Some(first) = cells.insert((element.xpos, element.ypos), element.atomic_number) {
                return Err(CatalogError::DuplicatePosition {
                    xpos: element.xpos,
                    ypos: element.ypos,
                    first,
                    second: element.atomic_number,
                });
            }
            for (field, text) in [
                ("name", &element.name),
                ("summary", &element.summary),
                ("history", &element.history),
            ] {
                if let Some(language) = text.missing() {
                    return Err(CatalogError::MissingTranslation {
                        atomic_number: element.atomic_number,
                        field,
                        language,
                    });
                }
            }
        }

        Ok(Catalog { elements, index })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let elements: Vec<ElementRecord> = serde_json::from_str(json)?;
        Self::new(elements)
    }

    /// The dataset compiled into the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(ELEMENTS_JSON)
    }

    pub fn elements(&self) -> &[ElementRecord] {
        &self.elements
    }

    pub fn get(&self, atomic_number: u32) -> Option<&ElementRecord> {
        self.index.get(&atomic_number).map(|&i| &self.elements[i])
    }

    pub fn contains(&self, atomic_number: u32) -> bool {
        self.index.contains_key(&atomic_number)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(z: u32, symbol: &str, x: u8, y: u8) -> serde_json::Value {
        let text = json!({"en": symbol, "es": symbol, "fr": symbol, "pt": symbol, "ja": symbol});
        json!({
            "atomicNumber": z,
            "symbol": symbol,
            "name": text,
            "atomicMass": 1.0,
            "category": "unknown",
            "phase": "Solid",
            "summary": text,
            "history": text,
            "electronConfiguration": "",
            "xpos": x,
            "ypos": y
        })
    }

    #[test]
    fn embedded_catalog_is_complete() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.len(), 118);
        let numbers: Vec<u32> = catalog.elements().iter().map(|e| e.atomic_number).collect();
        assert_eq!(numbers, (1..=118).collect::<Vec<_>>());

        let iron = catalog.get(26).unwrap();
        assert_eq!(iron.symbol, "Fe");
        assert_eq!(iron.name.get(Language::Fr), Some("Fer"));
        assert_eq!(iron.category, Category::TransitionMetal);
        assert_eq!((iron.xpos, iron.ypos), (8, 4));

        assert_eq!(catalog.get(80).unwrap().phase, Phase::Liquid);
        assert_eq!(catalog.get(2).unwrap().phase, Phase::Gas);
        assert!(catalog.get(119).is_none());
    }

    #[test]
    fn sorts_by_atomic_number() {
        let json = json!([record(3, "Li", 1, 2), record(1, "H", 1, 1)]).to_string();
        let catalog = Catalog::from_json(&json).unwrap();
        assert_eq!(catalog.elements()[0].symbol, "H");
        assert_eq!(catalog.get(3).unwrap().symbol, "Li");
    }

    #[test]
    fn rejects_duplicate_atomic_numbers() {
        let json = json!([record(1, "H", 1, 1), record(1, "D", 2, 1)]).to_string();
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::DuplicateAtomicNumber(1))
        ));
    }

    #[test]
    fn rejects_shared_grid_cells() {
        let json = json!([record(1, "H", 1, 1), record(2, "He", 1, 1)]).to_string();
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::DuplicatePosition { first: 1, second: 2, .. })
        ));
    }

    #[test]
    fn rejects_missing_translations() {
        let mut h = record(1, "H", 1, 1);
        h["summary"].as_object_mut().unwrap().remove("ja");
        let json = json!([h]).to_string();
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::MissingTranslation {
                field: "summary",
                language: Language::Ja,
                ..
            })
        ));
    }

    #[test]
    fn localized_lookup_tolerates_gaps() {
        let text: Localized = [(Language::En, "Hydrogen")].into_iter().collect();
        assert_eq!(text.get(Language::En), Some("Hydrogen"));
        assert_eq!(text.get(Language::Ja), None);
        assert_eq!(text.or_empty(Language::Ja), "");
    }

    #[test]
    fn display_order_covers_every_category_once() {
        let mut seen = HashSet::new();
        for category in Category::DISPLAY_ORDER {
            assert!(seen.insert(category));
            assert_eq!(Category::DISPLAY_ORDER[category.display_rank()], category);
        }
        assert_eq!(seen.len(), 11);
    }
}
