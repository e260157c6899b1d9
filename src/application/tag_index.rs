//! Note → tag name resolution.
//!
//! Both id-keyed maps are loaded from the store on first use and cached for
//! the rest of the run.

use std::collections::HashMap;

use crate::domain::{AppError, Result};

/// Source of the two tag relations.
pub trait TagSource {
    /// `(note_id, tag_id)` associations.
    ///
    /// # Errors
    /// Returns error if the store cannot be queried.
    fn note_tags(&self) -> Result<Vec<(i64, i64)>>;

    /// `(tag_id, name)` pairs.
    ///
    /// # Errors
    /// Returns error if the store cannot be queried.
    fn tag_names(&self) -> Result<Vec<(i64, String)>>;
}

#[derive(Debug, Default)]
struct TagMaps {
    note_tags: HashMap<i64, Vec<i64>>,
    tag_names: HashMap<i64, String>,
}

impl TagMaps {
    fn load(source: &impl TagSource) -> Result<Self> {
        let mut maps = Self::default();

        for (note_id, tag_id) in source.note_tags()? {
            maps.note_tags.entry(note_id).or_default().push(tag_id);
        }
        maps.tag_names.extend(source.tag_names()?);

        tracing::debug!(
            "Loaded tag index: {} tagged notes, {} tags",
            maps.note_tags.len(),
            maps.tag_names.len()
        );

        Ok(maps)
    }
}

/// Lazily built cache of note tags.
#[derive(Debug, Default)]
pub struct TagIndex {
    maps: Option<TagMaps>,
}

impl TagIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag names for a note, or `None` when the note has no tags.
    ///
    /// # Errors
    /// Returns `UnknownTag` if a linked tag id has no name row, or a store
    /// error if the first load fails.
    pub fn tags_for(
        &mut self,
        source: &impl TagSource,
        note_id: i64,
    ) -> Result<Option<Vec<String>>> {
        let maps = self.maps(source)?;

        let Some(tag_ids) = maps.note_tags.get(&note_id) else {
            return Ok(None);
        };

        tag_ids
            .iter()
            .map(|&tag_id| {
                maps.tag_names
                    .get(&tag_id)
                    .cloned()
                    .ok_or(AppError::UnknownTag { note_id, tag_id })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn maps(&mut self, source: &impl TagSource) -> Result<&TagMaps> {
        let maps = match self.maps.take() {
            Some(maps) => maps,
            None => TagMaps::load(source)?,
        };
        let maps: &TagMaps = self.maps.insert(maps);
        Ok(maps)
    }
}
