//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use stacks_core::catalog::{Catalog, CatalogEntry};

pub fn make_entry(title: &str, author: &str, shared_by: Option<&str>) -> CatalogEntry {
    CatalogEntry {
        title: title.to_string(),
        author: author.to_string(),
        shared_by: shared_by.map(str::to_string),
        description: format!("About {title}"),
        availability: "available".to_string(),
        ..Default::default()
    }
}

/// Build a catalog in the given (manifest) order.
pub fn make_catalog(entries: Vec<(&str, CatalogEntry)>) -> Catalog {
    let mut catalog = Catalog::new();
    for (id, entry) in entries {
        catalog.insert(id, entry);
    }
    catalog
}
