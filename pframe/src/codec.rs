//! Motion raster packing and unpacking.
//!
//! A motion field is stored as an RGBA raster with one pixel per block:
//!
//! * red holds the publish id of the block's reference picture;
//! * green and blue hold the horizontal and vertical motion vector
//!   components as `128 + offset / BLOCK_FRACT_STEP`;
//! * alpha is always fully opaque.
//!
//! The encoding is lossy in the sense that a decoder must already know the
//! block size, the fractional step, and which picture each id refers to.

use crate::encoder::{Block, MotionField, SourceSet};
use crate::error::{Error, Result};
use crate::types::{QuarterPel, BLOCK_SIZE};

/// Raster value of a zero motion vector component.
pub const ZERO_OFFSET: u8 = 128;

/// Alpha value written for every block.
pub const OPAQUE: u8 = 255;

/// An RGBA8 raster with one pixel per motion field block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MotionRaster {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

impl MotionRaster {
    /// Wrap row-major RGBA bytes.
    ///
    /// Yields `None` if `data` does not hold exactly `width * height` pixels.
    pub fn from_rgba(width: usize, height: usize, data: &[u8]) -> Option<Self> {
        if data.len() != width * height * 4 {
            return None;
        }

        let pixels = data
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect();

        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// The raster as row-major RGBA bytes.
    pub fn as_rgba(&self) -> &[u8] {
        self.pixels.as_flattened()
    }
}

fn pack_component(component: QuarterPel) -> Result<u8> {
    u8::try_from(ZERO_OFFSET as i32 + component.into_unit())
        .map_err(|_| Error::MotionVectorOutOfRange)
}

fn unpack_component(value: u8) -> QuarterPel {
    QuarterPel::from_unit(value as i32 - ZERO_OFFSET as i32)
}

/// Serialize a motion field against the source set it was searched with.
pub fn pack(field: &MotionField, sources: &SourceSet) -> Result<MotionRaster> {
    let pixels = field
        .blocks()
        .iter()
        .map(|block| {
            let reference = sources
                .get(block.source_index)
                .ok_or(Error::InvalidSourceIndex(block.source_index))?;
            let id = u8::try_from(reference.id())
                .map_err(|_| Error::ReferenceIdOutOfRange(reference.id()))?;

            Ok([
                id,
                pack_component(block.motion_vector.x())?,
                pack_component(block.motion_vector.y())?,
                OPAQUE,
            ])
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MotionRaster {
        width: field.width(),
        height: field.height(),
        pixels,
    })
}

/// Rebuild a motion field from its raster.
///
/// `sources` must be the source set the raster was packed against (or one
/// publishing the same ids); its dimensions determine the expected grid.
pub fn unpack(raster: &MotionRaster, sources: &SourceSet) -> Result<MotionField> {
    let (width, height) = sources.dimensions();
    let expected = (width / BLOCK_SIZE, height / BLOCK_SIZE);
    let found = (raster.width, raster.height);
    if expected != found {
        return Err(Error::RasterDimensionMismatch { expected, found });
    }

    let blocks = raster
        .pixels
        .iter()
        .map(|&[id, dx, dy, _alpha]| {
            let source_index = sources
                .position_of_id(id as u32)
                .ok_or(Error::UnknownReferenceId(id))?;

            Ok(Block {
                source_index,
                motion_vector: (unpack_component(dx), unpack_component(dy)).into(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    MotionField::from_blocks(raster.width, raster.height, blocks).ok_or(
        Error::RasterDimensionMismatch { expected, found },
    )
}

#[cfg(test)]
mod tests {
    use crate::buffer::PixelBuffer;
    use crate::codec::{pack, unpack, MotionRaster};
    use crate::encoder::{Block, MotionField, Reference, SourceSet};
    use crate::error::Error;
    use crate::types::{MotionVector, QuarterPel};

    fn sources() -> SourceSet {
        SourceSet::new(vec![
            Reference::new(42, PixelBuffer::new(32, 16)),
            Reference::new(7, PixelBuffer::new(32, 16)),
        ])
        .unwrap()
    }

    #[test]
    fn zero_vector_packs_to_center() {
        let block = Block {
            source_index: 1,
            motion_vector: MotionVector::zero(),
        };
        let field = MotionField::from_blocks(2, 1, vec![block; 2]).unwrap();

        let raster = pack(&field, &sources()).unwrap();

        assert_eq!((raster.width(), raster.height()), (2, 1));
        assert_eq!(raster.pixels(), &[[7, 128, 128, 255], [7, 128, 128, 255]]);
        assert_eq!(raster.as_rgba(), &[7, 128, 128, 255, 7, 128, 128, 255]);
    }

    #[test]
    fn extreme_vectors_fit_in_a_byte() {
        let blocks = vec![
            Block {
                source_index: 0,
                motion_vector: (QuarterPel::from(-8.5), QuarterPel::from(8.5)).into(),
            },
            Block {
                source_index: 1,
                motion_vector: (QuarterPel::from(0.25), QuarterPel::from(-1.75)).into(),
            },
        ];
        let field = MotionField::from_blocks(2, 1, blocks).unwrap();

        let raster = pack(&field, &sources()).unwrap();

        assert_eq!(raster.pixels(), &[[42, 94, 162, 255], [7, 129, 121, 255]]);
        assert_eq!(unpack(&raster, &sources()).unwrap(), field);
    }

    #[test]
    fn oversized_vector_is_rejected() {
        let block = Block {
            source_index: 0,
            motion_vector: (QuarterPel::from_whole(40), QuarterPel::ZERO).into(),
        };
        let field = MotionField::from_blocks(2, 1, vec![block; 2]).unwrap();

        assert!(matches!(
            pack(&field, &sources()),
            Err(Error::MotionVectorOutOfRange)
        ));
    }

    #[test]
    fn unpack_rejects_unknown_ids_and_sizes() {
        let unknown = MotionRaster::from_rgba(2, 1, &[42, 128, 128, 255, 3, 128, 128, 255]).unwrap();
        assert!(matches!(
            unpack(&unknown, &sources()),
            Err(Error::UnknownReferenceId(3))
        ));

        let small = MotionRaster::from_rgba(1, 1, &[42, 128, 128, 255]).unwrap();
        assert!(matches!(
            unpack(&small, &sources()),
            Err(Error::RasterDimensionMismatch {
                expected: (2, 1),
                found: (1, 1)
            })
        ));

        assert!(MotionRaster::from_rgba(2, 1, &[0; 7]).is_none());
    }
}
