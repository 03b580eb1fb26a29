//! Catalog data model: one `CatalogEntry` per book, keyed by the id derived
//! from its manifest filename.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cover shown when an entry has no usable image of its own.
pub const PLACEHOLDER_COVER: &str = "/images/placeholder-book.svg";

/// One book record as stored in the per-entry JSON files.
///
/// Every field is defaulted so that any JSON object parses; entries whose
/// body is not an object at all are replaced by [`CatalogEntry::placeholder`]
/// at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(rename = "ageLevel", default)]
    pub age_level: Option<String>,
    #[serde(rename = "publicationYear", default)]
    pub publication_year: Option<i32>,
    #[serde(rename = "sharedBy", default)]
    pub shared_by: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "coverImage", default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub availability: String,
}

impl Default for CatalogEntry {
    fn default() -> Self {
        CatalogEntry {
            title: String::new(),
            author: String::new(),
            genre: None,
            age_level: None,
            publication_year: None,
            shared_by: None,
            description: String::new(),
            cover_image: None,
            availability: String::new(),
        }
    }
}

impl CatalogEntry {
    /// The stand-in entry used when a body fetches fine but fails to parse.
    pub fn placeholder() -> Self {
        CatalogEntry {
            title: "Unknown Title".to_string(),
            author: "Unknown Author".to_string(),
            description: String::new(),
            cover_image: Some(PLACEHOLDER_COVER.to_string()),
            availability: "unknown".to_string(),
            ..Default::default()
        }
    }

    /// Title for display, falling back to "Untitled" for blank titles.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    /// Cover image URL, falling back to the bundled placeholder.
    pub fn cover_image_or_default(&self) -> &str {
        match self.cover_image.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => PLACEHOLDER_COVER,
        }
    }

    /// Contributor name, trimmed; `None` when absent or blank.
    pub fn contributor(&self) -> Option<&str> {
        self.shared_by
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn availability(&self) -> Availability {
        Availability::parse(&self.availability)
    }
}

/// Lenient reading of the free-form `availability` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Borrowed,
    Unknown,
}

impl Availability {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "available" => Availability::Available,
            "borrowed" => Availability::Borrowed,
            _ => Availability::Unknown,
        }
    }
}

/// The full collection of loaded entries for one session.
///
/// Lookup is by id, but manifest order is preserved so that the default
/// sort mode can keep it ("no reordering" means manifest order).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: HashMap<String, CatalogEntry>,
    order: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Insert an entry under `id`. Re-inserting an existing id replaces the
    /// entry but keeps its original manifest position (last-write-wins).
    pub fn insert(&mut self, id: impl Into<String>, entry: CatalogEntry) {
        let id = id.into();
        if self.entries.insert(id.clone(), entry).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(id, entry)` pairs in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|e| (id.as_str(), e)))
    }
}

impl FromIterator<(String, CatalogEntry)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, CatalogEntry)>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for (id, entry) in iter {
            catalog.insert(id, entry);
        }
        catalog
    }
}
