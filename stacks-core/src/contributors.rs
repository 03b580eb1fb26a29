//! Contributor ("shared by") extraction for the filter menu.

use crate::catalog::Catalog;
use crate::collation;

/// Distinct, trimmed contributor names present in the catalog, sorted
/// ascending. Blank and absent names are dropped.
pub fn list_contributors(catalog: &Catalog) -> Vec<String> {
    let mut names: Vec<String> = catalog
        .iter()
        .filter_map(|(_, entry)| entry.contributor())
        .map(str::to_string)
        .collect();
    names.sort_by(|a, b| collation::compare(a, b));
    names.dedup();
    names
}

/// Case-insensitive substring filter over an already-sorted contributor
/// list (the menu's search box). Never resorts.
pub fn filter_contributors(contributors: &[String], needle: &str) -> Vec<String> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return contributors.to_vec();
    }
    contributors
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn entry_shared_by(shared_by: Option<&str>) -> CatalogEntry {
        CatalogEntry {
            shared_by: shared_by.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn dedupes_trims_and_sorts() {
        let catalog: Catalog = [
            ("a".to_string(), entry_shared_by(Some(" Sam "))),
            ("b".to_string(), entry_shared_by(Some("Ana"))),
            ("c".to_string(), entry_shared_by(Some("Sam"))),
            ("d".to_string(), entry_shared_by(Some("  "))),
            ("e".to_string(), entry_shared_by(None)),
        ]
        .into_iter()
        .collect();

        assert_eq!(list_contributors(&catalog), vec!["Ana", "Sam"]);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let names = vec!["Ana".to_string(), "Sam".to_string(), "Samir".to_string()];
        assert_eq!(filter_contributors(&names, "sam"), vec!["Sam", "Samir"]);
        assert_eq!(filter_contributors(&names, "AM"), vec!["Sam", "Samir"]);
        assert_eq!(filter_contributors(&names, ""), names);
    }
}
