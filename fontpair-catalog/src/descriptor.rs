//! Font descriptors and the immutable catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One installable font family as published by the catalog endpoint.
///
/// Field names follow the endpoint's JSON (`defSubset`, `lastModified`).
/// Only `id` and `family` are required; list fields default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontDescriptor {
    /// Stable key, e.g. `roboto-mono`
    pub id: String,
    /// Display name, e.g. `Roboto Mono`
    pub family: String,
    /// Encoding subsets in publication order
    #[serde(default)]
    pub subsets: Vec<String>,
    /// Available numeric weights in publication order
    #[serde(default)]
    pub weights: Vec<u16>,
    /// Available styles (`normal`, `italic`) in publication order
    #[serde(default)]
    pub styles: Vec<String>,
    /// Continuous weight axis instead of discrete files
    #[serde(default)]
    pub variable: bool,
    /// Free-form classification (`sans-serif`, `serif`, `display`, ...)
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub def_subset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Foundry type (`google`, `other`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub font_type: Option<String>,
}

impl FontDescriptor {
    /// Minimal descriptor, mostly useful for tests and fixtures.
    pub fn new(id: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            family: family.into(),
            subsets: vec!["latin".to_string()],
            weights: vec![400],
            styles: vec!["normal".to_string()],
            variable: false,
            category: "sans-serif".to_string(),
            def_subset: None,
            last_modified: None,
            version: None,
            font_type: None,
        }
    }

    pub fn with_weights(mut self, weights: &[u16]) -> Self {
        self.weights = weights.to_vec();
        self
    }

    pub fn with_subsets(mut self, subsets: &[&str]) -> Self {
        self.subsets = subsets.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_styles(mut self, styles: &[&str]) -> Self {
        self.styles = styles.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn variable(mut self) -> Self {
        self.variable = true;
        self
    }

    /// Smallest and largest published weight.
    pub fn weight_range(&self) -> Option<(u16, u16)> {
        let min = self.weights.iter().copied().min()?;
        let max = self.weights.iter().copied().max()?;
        Some((min, max))
    }

    pub fn has_style(&self, style: &str) -> bool {
        self.styles.iter().any(|s| s == style)
    }
}

/// Immutable set of descriptors with lookup by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    fonts: Vec<FontDescriptor>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog. Later duplicates of an id are dropped.
    pub fn new(fonts: Vec<FontDescriptor>) -> Self {
        let mut index = HashMap::with_capacity(fonts.len());
        let mut kept = Vec::with_capacity(fonts.len());
        for font in fonts {
            if index.contains_key(&font.id) {
                log::warn!("Duplicate font id '{}' in catalog, keeping first", font.id);
                continue;
            }
            index.insert(font.id.clone(), kept.len());
            kept.push(font);
        }
        Self { fonts: kept, index }
    }

    /// Look up a descriptor by id. Empty ids never resolve.
    pub fn get(&self, id: &str) -> Option<&FontDescriptor> {
        self.index.get(id).map(|&i| &self.fonts[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FontDescriptor> {
        self.fonts.iter()
    }

    /// Family name for an id, if the id resolves.
    pub fn family(&self, id: &str) -> Option<&str> {
        self.get(id).map(|f| f.family.as_str())
    }

    /// Case-insensitive substring match on family or id, in catalog order.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&FontDescriptor> {
        let needle = query.trim().to_lowercase();
        self.fonts
            .iter()
            .filter(|f| {
                needle.is_empty()
                    || f.family.to_lowercase().contains(&needle)
                    || f.id.contains(&needle)
            })
            .collect()
    }
}
