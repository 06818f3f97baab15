use std::collections::HashMap;

/// Rank to display name, joined against sitemap filename prefixes.
#[derive(Debug, Clone, Default)]
pub struct CompetitorTable {
    entries: HashMap<String, String>,
}

impl CompetitorTable {
    pub fn insert(&mut self, rank: impl Into<String>, name: impl Into<String>) {
        self.entries.insert(rank.into(), name.into());
    }

    pub fn name_for(&self, rank: &str) -> Option<&str> {
        self.entries.get(rank).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One row of the output TSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub rank: String,
    pub name: String,
    pub url: String,
}
