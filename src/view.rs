//! Localized view models handed to the page.

use crate::catalog::{Category, ElementRecord};
use crate::favorites::FavoritesSet;
use crate::i18n::LocaleResolver;
use crate::query::{CategoryGroup, QueryResult};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementCard {
    pub atomic_number: u32,
    pub symbol: String,
    pub name: String,
    pub category: Category,
    pub background: &'static str,
    pub foreground: &'static str,
    pub xpos: u8,
    pub ypos: u8,
    pub favorite: bool,
}

impl ElementCard {
    pub fn new(element: &ElementRecord, locale: &LocaleResolver, favorites: &FavoritesSet) -> Self {
        let (background, foreground) = element.category.colors();
        ElementCard {
            atomic_number: element.atomic_number,
            symbol: element.symbol.clone(),
            name: locale.localize(&element.name).to_string(),
            category: element.category,
            background,
            foreground,
            xpos: element.xpos,
            ypos: element.ypos,
            favorite: favorites.contains(element.atomic_number),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub category: Category,
    pub label: String,
    pub background: &'static str,
    pub foreground: &'static str,
    pub elements: Vec<ElementCard>,
}

impl GroupView {
    pub fn new(group: &CategoryGroup<'_>, locale: &LocaleResolver, favorites: &FavoritesSet) -> Self {
        let (background, foreground) = group.category.colors();
        GroupView {
            category: group.category,
            label: locale.t(group.category.key()).to_string(),
            background,
            foreground,
            elements: group
                .elements
                .iter()
                .map(|e| ElementCard::new(e, locale, favorites))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum Layout {
    Grid { elements: Vec<ElementCard> },
    Grouped { groups: Vec<GroupView> },
}

impl Layout {
    pub fn new(result: &QueryResult<'_>, locale: &LocaleResolver, favorites: &FavoritesSet) -> Self {
        match result {
            QueryResult::Flat(elements) => Layout::Grid {
                elements: elements
                    .iter()
                    .map(|e| ElementCard::new(e, locale, favorites))
                    .collect(),
            },
            QueryResult::Grouped(groups) => Layout::Grouped {
                groups: groups
                    .iter()
                    .map(|g| GroupView::new(g, locale, favorites))
                    .collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementDetail {
    pub atomic_number: u32,
    pub symbol: String,
    pub name: String,
    pub summary: String,
    pub history: String,
    pub atomic_mass: String,
    pub category: Category,
    pub category_label: String,
    pub phase_label: String,
    pub electron_configuration: String,
    pub density: String,
    pub discovered_by: Option<String>,
    pub named_by: Option<String>,
    pub appearance: Option<String>,
    pub favorite: bool,
}

impl ElementDetail {
    pub fn new(element: &ElementRecord, locale: &LocaleResolver, favorite: bool) -> Self {
        ElementDetail {
            atomic_number: element.atomic_number,
            symbol: element.symbol.clone(),
            name: locale.localize(&element.name).to_string(),
            summary: locale.localize(&element.summary).to_string(),
            history: locale.localize(&element.history).to_string(),
            atomic_mass: to_precision(element.atomic_mass, 6),
            category: element.category,
            category_label: locale.t(element.category.key()).to_string(),
            phase_label: locale.t(element.phase.label_key()).to_string(),
            electron_configuration: element.electron_configuration.clone(),
            density: format_density(element.density),
            discovered_by: element.discovered_by.clone(),
            named_by: element.named_by.clone(),
            appearance: element.appearance.clone(),
            favorite,
        }
    }
}

/// What the page hands to the platform share sheet, or copies as text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    pub fn new(element: &ElementRecord, locale: &LocaleResolver, base_url: &str) -> Self {
        let name = locale.localize(&element.name);
        SharePayload {
            title: format!("{}: {}", locale.t("appName"), name),
            text: format!(
                "{} ({}) - {}: {}. {}",
                name,
                element.symbol,
                locale.t("atomicNumber"),
                element.atomic_number,
                locale.localize(&element.summary),
            ),
            url: format!(
                "{}/?element={}",
                base_url.trim_end_matches('/'),
                element.atomic_number
            ),
        }
    }
}

/// `value` rounded to `digits` significant digits, keeping trailing zeros.
pub fn to_precision(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{:.*}", digits.saturating_sub(1), value);
    }
    let magnitude = value.abs().log10().floor() as i32 + 1;
    if magnitude > digits as i32 {
        return format!("{:.*e}", digits.saturating_sub(1), value);
    }
    let decimals = (digits as i32 - magnitude).max(0) as usize;
    format!("{value:.decimals$}")
}

pub fn format_density(density: Option<f64>) -> String {
    match density {
        Some(d) => format!("{d} g/cm³"),
        None => "N/A".to_string(),
    }
}
