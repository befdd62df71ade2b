//! Destination pixels and the regions they are written to.

use std::ops::Range;

use crate::color::ScaledColor;
use crate::error::{PhotometricResult, UsageError};

/// A pixel representation that can be constructed from a normalized color.
///
/// Implementations for integer types clamp to `[0, 1]` and round to the nearest value. None of
/// them divide by alpha; see [`ScaledColor::to_straight`].
pub trait Pixel: Copy {
    fn from_scaled(color: ScaledColor) -> Self;
}

#[inline(always)]
fn quantize(value: f32, max: f32) -> f32 {
    value.clamp(0.0, 1.0) * max + 0.5
}

impl Pixel for ScaledColor {
    #[inline(always)]
    fn from_scaled(color: ScaledColor) -> Self {
        color
    }
}

impl Pixel for [f32; 4] {
    #[inline(always)]
    fn from_scaled(color: ScaledColor) -> Self {
        color.to_array()
    }
}

impl Pixel for [u8; 4] {
    #[inline(always)]
    fn from_scaled(color: ScaledColor) -> Self {
        color.to_array().map(|v| quantize(v, 255.0) as u8)
    }
}

impl Pixel for [u16; 4] {
    #[inline(always)]
    fn from_scaled(color: ScaledColor) -> Self {
        color.to_array().map(|v| quantize(v, 65535.0) as u16)
    }
}

#[cfg(feature = "rgb")]
mod rgb_impls {
    use super::{Pixel, ScaledColor};

    impl Pixel for rgb::RGBA<u8> {
        #[inline(always)]
        fn from_scaled(color: ScaledColor) -> Self {
            let [r, g, b, a] = <[u8; 4]>::from_scaled(color);
            rgb::RGBA::new(r, g, b, a)
        }
    }

    impl Pixel for rgb::RGBA<u16> {
        #[inline(always)]
        fn from_scaled(color: ScaledColor) -> Self {
            let [r, g, b, a] = <[u16; 4]>::from_scaled(color);
            rgb::RGBA::new(r, g, b, a)
        }
    }

    impl Pixel for rgb::RGBA<f32> {
        #[inline(always)]
        fn from_scaled(color: ScaledColor) -> Self {
            rgb::RGBA::new(color.r, color.g, color.b, color.a)
        }
    }
}

/// A rectangle of a [`PixelGrid`], in absolute image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Region {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn rows(&self) -> Range<usize> {
        self.top..self.top.saturating_add(self.height)
    }

    /// The number of pixels in the region.
    pub fn len(&self) -> usize {
        self.width.saturating_mul(self.height)
    }
}

/// A caller-owned, row-major pixel buffer.
///
/// A grid may cover only a band of the rows of an image, see [`PixelGrid::split_at_row`]. Rows
/// are always addressed by their index in the whole image so that regions of a strip or tile
/// keep their coordinates when decoding into a band.
#[derive(Debug)]
pub struct PixelGrid<'a, P> {
    pixels: &'a mut [P],
    width: usize,
    first_row: usize,
    height: usize,
}

impl<'a, P> PixelGrid<'a, P> {
    /// View `pixels` as `height` rows of `width` pixels each.
    pub fn new(pixels: &'a mut [P], width: usize, height: usize) -> PhotometricResult<Self> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(UsageError::GridSize {
                width,
                height,
                len: pixels.len(),
            }
            .into());
        }

        Ok(PixelGrid {
            pixels,
            width,
            first_row: 0,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// The rows of the image this grid covers.
    pub fn rows(&self) -> Range<usize> {
        self.first_row..self.first_row + self.height
    }

    /// Split into the rows before `row` and the rows from `row` on.
    ///
    /// `row` is clamped to the rows of this grid. The two halves can be decoded into
    /// concurrently.
    pub fn split_at_row(self, row: usize) -> (PixelGrid<'a, P>, PixelGrid<'a, P>) {
        let rows = self.rows();
        let mid = row.clamp(rows.start, rows.end) - rows.start;
        let (upper, lower) = self.pixels.split_at_mut(mid * self.width);

        (
            PixelGrid {
                pixels: upper,
                width: self.width,
                first_row: self.first_row,
                height: mid,
            },
            PixelGrid {
                pixels: lower,
                width: self.width,
                first_row: self.first_row + mid,
                height: self.height - mid,
            },
        )
    }

    /// Fail unless `region` lies within the grid.
    pub fn check(&self, region: Region) -> PhotometricResult<()> {
        let rows = self.rows();
        let fits_row = region
            .left
            .checked_add(region.width)
            .is_some_and(|right| right <= self.width);
        let fits_column = region.top >= rows.start
            && region
                .top
                .checked_add(region.height)
                .is_some_and(|bottom| bottom <= rows.end);

        if fits_row && fits_column {
            Ok(())
        } else {
            Err(UsageError::RegionOutOfBounds {
                left: region.left,
                top: region.top,
                width: region.width,
                height: region.height,
                grid_width: self.width,
                grid_rows: rows,
            }
            .into())
        }
    }

    /// The pixels of `region` in row `y`. The region must have passed [`Self::check`].
    #[inline(always)]
    pub(crate) fn row_mut(&mut self, y: usize, region: &Region) -> &mut [P] {
        let start = (y - self.first_row) * self.width + region.left;
        &mut self.pixels[start..start + region.width]
    }

    pub fn pixels(&self) -> &[P] {
        self.pixels
    }
}

impl<P: Pixel> PixelGrid<'_, P> {
    /// Write colors into `region`, row by row and left to right.
    ///
    /// Writing stops early when `colors` runs out. Returns the number of pixels written.
    pub fn write(
        &mut self,
        region: Region,
        colors: impl IntoIterator<Item = ScaledColor>,
    ) -> PhotometricResult<usize> {
        if region.is_empty() {
            return Ok(0);
        }

        self.check(region)?;

        let mut colors = colors.into_iter();
        let mut written = 0;
        for y in region.rows() {
            for (pixel, color) in self.row_mut(y, &region).iter_mut().zip(colors.by_ref()) {
                *pixel = P::from_scaled(color);
                written += 1;
            }
        }

        Ok(written)
    }
}
