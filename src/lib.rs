//! Multilingual periodic table served as a local web page.
//!
//! The element catalog is compiled in. Requests run it through the query
//! pipeline ([`query::resolve`]) and render localized view models
//! ([`view`]). Favorites live in a small key/value store on disk and fun
//! facts come from a hosted text model ([`fact`]).

pub mod catalog;
pub mod config;
pub mod fact;
pub mod favorites;
pub mod i18n;
pub mod language;
pub mod query;
pub mod server;
pub mod storage;
pub mod view;

pub use catalog::{Catalog, Category, ElementRecord, Phase};
pub use favorites::{FavoritesSet, FavoritesStore};
pub use i18n::{LocaleResolver, Translations};
pub use language::Language;
pub use query::{resolve, PhaseFilter, QueryResult, QueryState};
