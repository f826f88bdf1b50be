use crate::catalog::{Catalog, Category, ElementRecord, Phase};
use crate::favorites::FavoritesSet;
use crate::language::Language;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseFilter {
    #[default]
    All,
    Only(Phase),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown phase filter {0:?}")]
pub struct PhaseFilterError(pub String);

impl PhaseFilter {
    pub fn accepts(self, phase: Phase) -> bool {
        match self {
            PhaseFilter::All => true,
            PhaseFilter::Only(wanted) => wanted == phase,
        }
    }
}

impl FromStr for PhaseFilter {
    type Err = PhaseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() || wanted.eq_ignore_ascii_case("all") {
            return Ok(PhaseFilter::All);
        }
        Phase::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .map(PhaseFilter::Only)
            .ok_or_else(|| PhaseFilterError(s.to_string()))
    }
}

/// What the user is currently asking the table to show. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub text: String,
    pub favorites_only: bool,
    pub phase: PhaseFilter,
    pub group_by_category: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub elements: Vec<&'a ElementRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult<'a> {
    Flat(Vec<&'a ElementRecord>),
    Grouped(Vec<CategoryGroup<'a>>),
}

impl<'a> QueryResult<'a> {
    /// Every element in presentation order, groups flattened.
    pub fn elements(&self) -> Vec<&'a ElementRecord> {
        match self {
            QueryResult::Flat(elements) => elements.clone(),
            QueryResult::Grouped(groups) => groups
                .iter()
                .flat_map(|g| g.elements.iter().copied())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            QueryResult::Flat(elements) => elements.len(),
            QueryResult::Grouped(groups) => groups.iter().map(|g| g.elements.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Applies every active filter of `query` to the catalog.
///
/// Each filter is an independent predicate and a record is kept only when
/// all of them hold, so the result does not depend on the order the filters
/// are listed in. Output follows catalog order, or the fixed category order
/// when grouping.
pub fn resolve<'a>(
    catalog: &'a Catalog,
    query: &QueryState,
    language: Language,
    favorites: &FavoritesSet,
) -> QueryResult<'a> {
    let needle = query.text.to_lowercase();
    let matched: Vec<&ElementRecord> = catalog
        .elements()
        .iter()
        .filter(|e| !query.favorites_only || favorites.contains(e.atomic_number))
        .filter(|e| query.phase.accepts(e.phase))
        .filter(|e| needle.is_empty() || matches_text(e, &needle, language))
        .collect();

    if query.group_by_category {
        QueryResult::Grouped(group_by_category(matched))
    } else {
        QueryResult::Flat(matched)
    }
}

/// Substring test of an already-lowercased `needle` against the localized
/// name, the symbol, and the atomic number.
pub fn matches_text(element: &ElementRecord, needle: &str, language: Language) -> bool {
    element
        .name
        .get(language)
        .is_some_and(|name| name.to_lowercase().contains(needle))
        || element.symbol.to_lowercase().contains(needle)
        || element.atomic_number.to_string().contains(needle)
}

/// Partitions `elements` by category in [`Category::DISPLAY_ORDER`], dropping
/// empty categories. Within a group, elements keep ascending atomic number.
pub fn group_by_category<'a>(elements: Vec<&'a ElementRecord>) -> Vec<CategoryGroup<'a>> {
    let mut buckets: Vec<Vec<&ElementRecord>> = vec![Vec::new(); Category::DISPLAY_ORDER.len()];
    for element in elements {
        buckets[element.category.display_rank()].push(element);
    }
    Category::DISPLAY_ORDER
        .into_iter()
        .zip(buckets)
        .filter(|(_, elements)| !elements.is_empty())
        .map(|(category, mut elements)| {
            elements.sort_by_key(|e| e.atomic_number);
            CategoryGroup { category, elements }
        })
        .collect()
}

/// Reads the `element` URL parameter the way a lenient integer parse does:
/// leading whitespace and a `+` are skipped, then the leading digits are used.
pub fn parse_element_param(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
