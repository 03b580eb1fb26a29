//! Query evaluation: text filter, contributor filter, and sorting over the
//! loaded catalog, driven by the user's `QueryState`.

use crate::catalog::{Catalog, CatalogEntry};
use crate::collation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How the index list is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Manifest order, no reordering.
    #[default]
    Default,
    Title,
    Author,
    /// Sort (and paginate) by the "shared by" name.
    Contributor,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Default => "default",
            SortMode::Title => "title",
            SortMode::Author => "author",
            SortMode::Contributor => "contributor",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = ();

    /// Unknown values fall back to `Default` rather than erroring; a stale
    /// or hand-edited query string should never break the index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "title" => SortMode::Title,
            "author" => SortMode::Author,
            "contributor" => SortMode::Contributor,
            _ => SortMode::Default,
        })
    }
}

/// The user-controlled view parameters for the book index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    pub search_text: String,
    pub sort_mode: SortMode,
    /// Contributor filter; ignored while sorting by contributor.
    pub selected_contributors: Vec<String>,
    /// 1-based; re-derived to 1 whenever search, sort, or filter change.
    pub page: usize,
    /// Scroll position recorded for restore-on-back.
    pub scroll_offset: f64,
}

impl Default for QueryState {
    fn default() -> Self {
        QueryState {
            search_text: String::new(),
            sort_mode: SortMode::Default,
            selected_contributors: Vec::new(),
            page: 1,
            scroll_offset: 0.0,
        }
    }
}

/// Query-string shape of a `QueryState`; only non-default fields are
/// serialized so restored URLs stay clean.
#[derive(Debug, Default, Serialize, Deserialize)]
struct QueryStateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contributors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scroll: Option<f64>,
}

impl QueryState {
    /// Encode as `search=...&sort=...&contributors=a,b&page=N`, omitting
    /// fields that hold their default value.
    pub fn to_query_string(&self) -> String {
        let params = QueryStateParams {
            search: (!self.search_text.is_empty()).then(|| self.search_text.clone()),
            sort: (self.sort_mode != SortMode::Default).then(|| self.sort_mode.to_string()),
            contributors: (!self.selected_contributors.is_empty())
                .then(|| self.selected_contributors.join(",")),
            page: (self.page > 1).then_some(self.page),
            scroll: (self.scroll_offset > 0.0).then_some(self.scroll_offset),
        };
        serde_urlencoded::to_string(&params).unwrap_or_default()
    }

    /// Decode a query string produced by [`Self::to_query_string`]. Missing
    /// or malformed parameters fall back to their defaults.
    pub fn from_query_string(query: &str) -> Self {
        let params: QueryStateParams = serde_urlencoded::from_str(query).unwrap_or_default();
        QueryState {
            search_text: params.search.unwrap_or_default(),
            sort_mode: params
                .sort
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            selected_contributors: params
                .contributors
                .as_deref()
                .map(|joined| {
                    joined
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            page: params.page.unwrap_or(1).max(1),
            scroll_offset: params.scroll.unwrap_or(0.0).max(0.0),
        }
    }
}

/// Apply text filter, contributor filter, and sort; returns a fresh ordered
/// list of `(id, entry)` pairs. The catalog itself is never mutated.
pub fn evaluate(catalog: &Catalog, state: &QueryState) -> Vec<(String, CatalogEntry)> {
    let needle = state.search_text.trim().to_lowercase();

    // The contributor filter is bypassed in contributor sort mode: the
    // grouping itself is the organizing structure there.
    let selected: HashSet<&str> = if state.sort_mode != SortMode::Contributor {
        state
            .selected_contributors
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        HashSet::new()
    };

    let mut rows: Vec<(String, CatalogEntry)> = catalog
        .iter()
        .filter(|(_, entry)| needle.is_empty() || matches_search(entry, &needle))
        .filter(|(_, entry)| {
            selected.is_empty() || entry.contributor().is_some_and(|c| selected.contains(c))
        })
        .map(|(id, entry)| (id.to_string(), entry.clone()))
        .collect();

    if state.sort_mode != SortMode::Default {
        // sort_by is stable: equal keys keep manifest-relative order.
        rows.sort_by(|(_, a), (_, b)| {
            collation::compare(sort_field(a, state.sort_mode), sort_field(b, state.sort_mode))
        });
    }
    rows
}

fn matches_search(entry: &CatalogEntry, needle: &str) -> bool {
    let haystack = format!(
        "{}\n{}\n{}\n{}",
        entry.title,
        entry.author,
        entry.description,
        entry.shared_by.as_deref().unwrap_or("")
    );
    haystack.to_lowercase().contains(needle)
}

fn sort_field(entry: &CatalogEntry, mode: SortMode) -> &str {
    match mode {
        SortMode::Default => "",
        SortMode::Title => &entry.title,
        SortMode::Author => &entry.author,
        SortMode::Contributor => entry.contributor().unwrap_or(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_mode_round_trips_through_strings() {
        for mode in [
            SortMode::Default,
            SortMode::Title,
            SortMode::Author,
            SortMode::Contributor,
        ] {
            assert_eq!(mode.as_str().parse::<SortMode>().unwrap(), mode);
        }
        assert_eq!("bogus".parse::<SortMode>().unwrap(), SortMode::Default);
    }

    #[test]
    fn query_string_round_trip() {
        let state = QueryState {
            search_text: "sea & sky".to_string(),
            sort_mode: SortMode::Contributor,
            selected_contributors: vec!["Ana".to_string(), "Sam".to_string()],
            page: 3,
            scroll_offset: 240.5,
        };
        let encoded = state.to_query_string();
        assert_eq!(QueryState::from_query_string(&encoded), state);
    }

    #[test]
    fn default_state_encodes_to_empty_query() {
        assert_eq!(QueryState::default().to_query_string(), "");
        assert_eq!(QueryState::from_query_string(""), QueryState::default());
    }

    #[test]
    fn malformed_query_falls_back_to_defaults() {
        let state = QueryState::from_query_string("page=zero&sort=sideways");
        assert_eq!(state, QueryState::default());
    }
}
