//! Motion-compensated picture reconstruction

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::encoder::field::MotionField;
use crate::encoder::source::{Reference, SourceSet};
use crate::error::{Error, Result};
use crate::types::BLOCK_SIZE;

/// Build a picture by copying every block from the reference and offset its
/// motion field entry points at.
///
/// Samples are read bilinearly, so fractional vectors are interpolated. The
/// field's grid must tile the references exactly and every block must name a
/// reference present in `sources`; fields produced by the encoder or decoded
/// with `codec::unpack` against the same source set always do.
pub fn gather(field: &MotionField, sources: &SourceSet) -> Result<PixelBuffer> {
    let (width, height) = sources.dimensions();
    if width % BLOCK_SIZE != 0 || height % BLOCK_SIZE != 0 {
        return Err(Error::UnalignedDimensions { width, height });
    }

    let expected = (width / BLOCK_SIZE, height / BLOCK_SIZE);
    let found = (field.width(), field.height());
    if expected != found {
        return Err(Error::RasterDimensionMismatch { expected, found });
    }

    let pictures = field
        .blocks()
        .iter()
        .map(|block| {
            sources
                .get(block.source_index)
                .map(Reference::picture)
                .ok_or(Error::InvalidSourceIndex(block.source_index))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut picture = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let index = (y / BLOCK_SIZE) * field.width() + x / BLOCK_SIZE;
            let reference = pictures[index];
            let (dx, dy) = field.blocks()[index].motion_vector.into_pixels();

            for c in 0..CHANNELS {
                let sample = reference.get_bilinear(x as f64 + dx, y as f64 + dy, c);
                picture.set(x, y, c, sample);
            }
        }
    }

    Ok(picture)
}

#[cfg(test)]
mod tests {
    use crate::encoder::cpu::gather::gather;
    use crate::encoder::field::{Block, MotionField};
    use crate::encoder::source::{Reference, SourceSet};
    use crate::error::Error;
    use crate::test_util::noise_picture;
    use crate::types::{MotionVector, QuarterPel};

    #[test]
    fn zero_field_copies_reference() {
        let picture = noise_picture(32, 16, 31);
        let sources = SourceSet::new(vec![
            Reference::new(0, noise_picture(32, 16, 32)),
            Reference::new(1, picture.clone()),
        ])
        .unwrap();
        let block = Block {
            source_index: 1,
            motion_vector: MotionVector::zero(),
        };
        let field = MotionField::from_blocks(2, 1, vec![block; 2]).unwrap();

        assert_eq!(gather(&field, &sources).unwrap(), picture);
    }

    #[test]
    fn applies_per_block_vectors() {
        let reference = noise_picture(32, 32, 33);
        let sources = SourceSet::new(vec![Reference::new(0, reference.clone())]).unwrap();
        let moved = Block {
            source_index: 0,
            motion_vector: (QuarterPel::from_unit(2), QuarterPel::from_whole(1)).into(),
        };
        let mut blocks = vec![Block::default(); 4];
        blocks[3] = moved;
        let field = MotionField::from_blocks(2, 2, blocks).unwrap();

        let picture = gather(&field, &sources).unwrap();

        assert_eq!(picture.get(3, 4, 0), reference.get(3, 4, 0));
        assert_eq!(
            picture.get(20, 17, 2),
            reference.get_bilinear(20.5, 18.0, 2)
        );
    }

    #[test]
    fn rejects_unknown_source_index() {
        let sources = SourceSet::new(vec![Reference::new(0, noise_picture(16, 16, 34))]).unwrap();
        let block = Block {
            source_index: 3,
            motion_vector: MotionVector::zero(),
        };
        let field = MotionField::from_blocks(1, 1, vec![block]).unwrap();

        assert!(matches!(
            gather(&field, &sources),
            Err(Error::InvalidSourceIndex(3))
        ));
    }

    #[test]
    fn rejects_mismatched_grid() {
        let sources = SourceSet::new(vec![Reference::new(0, noise_picture(32, 16, 35))]).unwrap();
        let field = MotionField::from_blocks(1, 1, vec![Block::default()]).unwrap();

        assert!(matches!(
            gather(&field, &sources),
            Err(Error::RasterDimensionMismatch {
                expected: (2, 1),
                found: (1, 1)
            })
        ));
    }

    #[test]
    fn rejects_unaligned_references() {
        let sources = SourceSet::new(vec![Reference::new(0, noise_picture(24, 16, 36))]).unwrap();
        let field = MotionField::from_blocks(1, 1, vec![Block::default()]).unwrap();

        assert!(matches!(
            gather(&field, &sources),
            Err(Error::UnalignedDimensions {
                width: 24,
                height: 16
            })
        ));
    }
}
