//! The per-pass aggregation snapshot, keyed by modality code.

use crate::template::Template;

/// Mapping from modality code (e.g. "CT", "Xray") to the templates
/// aggregated for it, preserving declaration order of both.
///
/// The aggregator owns one collection per pass; the presentation layer only
/// reads it. A modality with zero successfully loaded templates is pruned
/// before the collection is handed out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalityCollection {
    entries: Vec<(String, Vec<Template>)>,
}

impl ModalityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Templates for a modality, inserting an empty entry on first use so
    /// insertion order follows first mention.
    pub fn entry_mut(&mut self, modality: &str) -> &mut Vec<Template> {
        let index = match self.entries.iter().position(|(code, _)| code == modality) {
            Some(index) => index,
            None => {
                self.entries.push((modality.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    pub fn get(&self, modality: &str) -> Option<&[Template]> {
        self.entries
            .iter()
            .find(|(code, _)| code == modality)
            .map(|(_, templates)| templates.as_slice())
    }

    /// Modality codes in insertion order.
    pub fn modalities(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Template])> {
        self.entries
            .iter()
            .map(|(code, templates)| (code.as_str(), templates.as_slice()))
    }

    /// Drop modalities that ended up with no templates.
    pub fn retain_non_empty(&mut self) {
        self.entries.retain(|(_, templates)| !templates.is_empty());
    }

    /// Number of modalities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
