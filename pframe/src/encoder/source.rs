//! Reference picture storage

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// A decoded reference picture together with its publish id.
///
/// The id is only meaningful to whoever decodes the motion raster; the
/// search itself addresses references by their position in the set.
#[derive(Clone, Debug)]
pub struct Reference {
    id: u32,
    picture: PixelBuffer,
}

impl Reference {
    pub fn new(id: u32, picture: PixelBuffer) -> Self {
        Self { id, picture }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn picture(&self) -> &PixelBuffer {
        &self.picture
    }
}

/// The ordered, immutable list of references available to one encode.
#[derive(Clone, Debug)]
pub struct SourceSet {
    references: Vec<Reference>,
}

impl SourceSet {
    /// Construct a source set.
    ///
    /// All references must share the same dimensions, and every publish id
    /// must be unique and fit in a single motion raster byte.
    pub fn new(references: Vec<Reference>) -> Result<Self> {
        let first = references.first().ok_or(Error::NoReferences)?;
        let expected = first.picture.dimensions();

        let mut seen_ids = HashSet::new();
        for reference in references.iter() {
            let found = reference.picture.dimensions();
            if found != expected {
                return Err(Error::DimensionMismatch { expected, found });
            }

            if reference.id > u8::MAX as u32 {
                return Err(Error::ReferenceIdOutOfRange(reference.id));
            }

            if !seen_ids.insert(reference.id) {
                return Err(Error::DuplicateReferenceId(reference.id));
            }
        }

        Ok(Self { references })
    }

    /// The shared width and height of every reference.
    pub fn dimensions(&self) -> (usize, usize) {
        self.references[0].picture.dimensions()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Get the reference at a given search index.
    pub fn get(&self, index: usize) -> Option<&Reference> {
        self.references.get(index)
    }

    /// All references, in search order.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter()
    }

    /// Find the search index of the reference published under `id`.
    pub fn position_of_id(&self, id: u32) -> Option<usize> {
        self.references.iter().position(|r| r.id == id)
    }
}
