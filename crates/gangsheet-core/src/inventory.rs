use crate::error::{GangSheetError, Result};
use crate::model::Artwork;

/// Ordered list of artworks queued for one job.
///
/// Order only matters for tie-breaking: packers re-sort by height on every run.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    items: Vec<Artwork>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, art: Artwork) {
        self.items.push(art);
    }

    /// Appends `count` copies of `art`; copies share the raster.
    pub fn push_copies(&mut self, art: &Artwork, count: usize) {
        self.items.reserve(count);
        for _ in 0..count {
            self.items.push(art.clone());
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Artwork> {
        self.items.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Result<&mut Artwork> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(GangSheetError::IndexOutOfRange { index, len })
    }

    /// Most recently added artwork.
    pub fn last(&self) -> Option<&Artwork> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Artwork> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Artwork] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a Artwork;
    type IntoIter = std::slice::Iter<'a, Artwork>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Artwork> for Inventory {
    fn from_iter<T: IntoIterator<Item = Artwork>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
