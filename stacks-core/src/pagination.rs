//! Pagination over an evaluated result list. Fixed-size pages normally;
//! one contributor group per page in contributor sort mode.

use crate::catalog::CatalogEntry;
use crate::collation;
use crate::query::{QueryState, SortMode};

/// Items per page in the non-grouped modes.
pub const PAGE_SIZE: usize = 8;

/// Group label for entries with no contributor recorded.
pub const UNKNOWN_CONTRIBUTOR: &str = "Unknown Contributor";

/// One rendered page of the index.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<(String, CatalogEntry)>,
    /// Always at least 1, even for an empty result list.
    pub total_pages: usize,
    /// The contributor group shown, in contributor sort mode only.
    pub current_group: Option<String>,
    /// All distinct group labels, sorted; empty outside contributor mode.
    pub group_labels: Vec<String>,
}

/// Slice one page out of `rows` (the output of [`crate::query::evaluate`]).
///
/// A `page` beyond the valid range clamps to the last page; it is never an
/// error.
pub fn paginate(rows: &[(String, CatalogEntry)], state: &QueryState) -> CatalogPage {
    if state.sort_mode == SortMode::Contributor {
        paginate_by_group(rows, state.page)
    } else {
        paginate_fixed(rows, state.page)
    }
}

fn paginate_fixed(rows: &[(String, CatalogEntry)], page: usize) -> CatalogPage {
    let total_pages = rows.len().div_ceil(PAGE_SIZE).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * PAGE_SIZE;
    let items = rows
        .iter()
        .skip(start)
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    CatalogPage {
        items,
        total_pages,
        current_group: None,
        group_labels: Vec::new(),
    }
}

fn paginate_by_group(rows: &[(String, CatalogEntry)], page: usize) -> CatalogPage {
    let mut group_labels: Vec<String> = rows.iter().map(|(_, entry)| group_label(entry)).collect();
    group_labels.sort_by(|a, b| collation::compare(a, b));
    group_labels.dedup();

    let total_pages = group_labels.len().max(1);
    let page = page.clamp(1, total_pages);
    let current = group_labels
        .get(page - 1)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_CONTRIBUTOR.to_string());

    // All entries of the one selected group, in the order evaluate()
    // already established.
    let items = rows
        .iter()
        .filter(|(_, entry)| group_label(entry) == current)
        .cloned()
        .collect();

    CatalogPage {
        items,
        total_pages,
        current_group: Some(current),
        group_labels,
    }
}

fn group_label(entry: &CatalogEntry) -> String {
    entry
        .contributor()
        .unwrap_or(UNKNOWN_CONTRIBUTOR)
        .to_string()
}
