//! Discovery of separator lines.
//!
//! Separators have no parent link to the rows they divide. Their index is
//! stored either as element metadata or as a name suffix, and recovered by
//! scanning the slide. Callers go through [`SeparatorTags`] only, so the
//! storage can change without touching them.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::model::ElementId;

use super::Surface;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeparatorTags {
    /// `"{prefix}{index}"` element names.
    NamePrefix { prefix: String },
    /// Index stored under a metadata key; the name still carries the prefix
    /// so the line is recognizable in the host's selection pane.
    Metadata { key: String, prefix: String },
}

impl SeparatorTags {
    /// Picks metadata when the host supports it, name scanning otherwise.
    pub fn for_surface<S: Surface + ?Sized>(surface: &S, config: &EngineConfig) -> Self {
        let prefix = config.separator_prefix.to_string();
        if surface.supports_metadata() {
            SeparatorTags::Metadata {
                key: config.separator_metadata_key.to_string(),
                prefix,
            }
        } else {
            SeparatorTags::NamePrefix { prefix }
        }
    }

    fn prefix(&self) -> &str {
        match self {
            SeparatorTags::NamePrefix { prefix } | SeparatorTags::Metadata { prefix, .. } => prefix,
        }
    }

    /// Marks `id` as the separator with the given 1-based index.
    pub fn tag<S: Surface + ?Sized>(&self, surface: &mut S, id: ElementId, index: usize) -> Result<()> {
        surface.set_name(id, &format!("{}{}", self.prefix(), index))?;
        if let SeparatorTags::Metadata { key, .. } = self {
            surface.set_metadata(id, key, &index.to_string())?;
        }
        Ok(())
    }

    fn index_of<S: Surface + ?Sized>(&self, surface: &S, id: ElementId) -> Option<usize> {
        match self {
            SeparatorTags::NamePrefix { prefix } => {
                let name = surface.name(id).ok()?;
                name.strip_prefix(prefix.as_str())?.parse().ok()
            }
            SeparatorTags::Metadata { key, .. } => {
                surface.metadata(id, key).ok().flatten()?.parse().ok()
            }
        }
    }

    /// All tagged separators on the slide, ordered by index.
    pub fn find<S: Surface + ?Sized>(&self, surface: &S) -> Vec<(usize, ElementId)> {
        let mut found: Vec<(usize, ElementId)> = surface
            .elements()
            .into_iter()
            .filter(|id| surface.kind(*id).is_ok_and(|k| k.is_line()))
            .filter_map(|id| self.index_of(surface, id).map(|idx| (idx, id)))
            .collect();
        found.sort();
        found
    }
}
