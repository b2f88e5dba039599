use std::path::Path;

use anyhow::Context as _;

use crate::error::SimanimResult;
use crate::levels::ValueRange;
use crate::snapshot::Snapshot;

/// One rendered frame: RGB8 with `R == G == B`, i.e. true grayscale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved RGB8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn write_png(&self, path: &Path) -> SimanimResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Render one snapshot through the shared global range.
///
/// Raster width is the matrix column count and height the row count; matrix
/// `(row, col)` lands at pixel `(x = col, y = row)`. Normalized values are
/// clamped to `[0, 1]` and quantized by truncation, so an element equal to
/// `range.min` renders as pixel 0 and one equal to `range.max` as 255.
/// Deterministic: the same snapshot and range always produce identical bytes.
pub fn render(snapshot: &Snapshot, range: &ValueRange) -> Raster {
    let width = snapshot.cols() as u32;
    let height = snapshot.rows() as u32;

    let mut data = Vec::with_capacity(snapshot.values().len() * 3);
    for &x in snapshot.values() {
        let v = range.normalize(x);
        let px = (v * 255.0) as u8;
        data.extend_from_slice(&[px, px, px]);
    }

    Raster {
        width,
        height,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_and_max_hit_the_ends_of_the_scale() {
        let snap = Snapshot::parse("0 10\n").unwrap();
        let range = ValueRange { min: 0.0, max: 10.0 };
        let raster = render(&snap, &range);
        assert_eq!(raster.data(), &[0, 0, 0, 255, 255, 255]);
    }

    #[test]
    fn out_of_range_values_clamp_instead_of_wrapping() {
        let snap = Snapshot::parse("-100 200\n").unwrap();
        let range = ValueRange { min: 0.0, max: 10.0 };
        let raster = render(&snap, &range);
        assert_eq!(raster.data(), &[0, 0, 0, 255, 255, 255]);
    }

    #[test]
    fn flat_field_renders_black() {
        let snap = Snapshot::parse("3 3\n3 3\n").unwrap();
        let range = ValueRange { min: 3.0, max: 3.0 };
        let raster = render(&snap, &range);
        assert!(raster.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn rendering_is_deterministic() {
        let snap = Snapshot::parse("0 0.3 0.7\n1 0.5 0.2\n").unwrap();
        let range = ValueRange { min: 0.0, max: 1.0 };
        assert_eq!(render(&snap, &range), render(&snap, &range));
    }

    #[test]
    fn raster_geometry_follows_the_matrix() {
        // 2 rows x 3 cols matrix => 3 wide, 2 tall raster, row-major pixels.
        let snap = Snapshot::parse("0 0 0\n1 1 1\n").unwrap();
        let range = ValueRange { min: 0.0, max: 1.0 };
        let raster = render(&snap, &range);
        assert_eq!(raster.width(), 3);
        assert_eq!(raster.height(), 2);
        // First raster row (y = 0) is matrix row 0.
        assert_eq!(&raster.data()[..9], &[0u8; 9]);
        assert_eq!(&raster.data()[9..], &[255u8; 9]);
    }

    #[test]
    fn quantization_truncates() {
        let snap = Snapshot::parse("1\n").unwrap();
        let range = ValueRange { min: 0.0, max: 3.0 };
        // 1/3 * 255 = 84.99..., truncated to 84.
        assert_eq!(render(&snap, &range).data(), &[84, 84, 84]);
    }

    #[test]
    fn grayscale_channels_agree() {
        let snap = Snapshot::parse("0.1 0.9\n0.4 0.6\n").unwrap();
        let range = ValueRange { min: 0.0, max: 1.0 };
        for px in render(&snap, &range).data().chunks_exact(3) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }
}
