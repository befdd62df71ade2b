//! Decoders turning the raw samples of a strip or tile into pixels.
//!
//! A decoder is assembled from three strategies: an [`Extract`] strategy that reads channel
//! samples of one depth class, a [`ColorModel`] that scales them to a color, and the layout of the
//! raw buffers. The byte order and the layout are resolved once per [`ColorDecoder::decode`]
//! call, each combination running its own monomorphized loop.

use crate::color::{ColorModel, ScaledColor};
use crate::error::{PhotometricError, PhotometricResult, UsageError};
use crate::pixel::{Pixel, PixelGrid, Region};
use crate::sample::{BigEndian, Cursor, Endian, Extract, LittleEndian};
use crate::tags::{ByteOrder, PlanarConfiguration};

/// The most samples per pixel of any supported configuration.
pub const MAX_CHANNELS: usize = 4;

/// Decodes the raw samples of one image, selected by [`select`](crate::select).
///
/// Decoders hold no state between calls. Calls on disjoint regions may run in parallel.
pub trait ColorDecoder<P: Pixel>: Send + Sync {
    /// Decode `region.width * region.height` pixels into `region` of `pixels`.
    ///
    /// `data` holds a single buffer of interleaved samples for chunky images and one buffer per
    /// sample for planar images, each starting with the first pixel of the region. Every row of
    /// a buffer starts at a byte boundary.
    ///
    /// An empty region writes nothing and succeeds. When the buffers are too short for the region
    /// nothing is written and [`PhotometricError::CorruptData`] is returned.
    fn decode(
        &self,
        data: &[&[u8]],
        pixels: &mut PixelGrid<'_, P>,
        region: Region,
    ) -> PhotometricResult<()>;

    /// The number of raw buffers `decode` expects.
    fn buffer_count(&self) -> usize;

    /// The number of bytes the buffer at `index` needs to hold for a `width` by `height` region.
    ///
    /// Returns 0 for an `index` past [`buffer_count`](Self::buffer_count).
    fn required_len(&self, index: usize, width: usize, height: usize) -> usize;
}

/// A decoder for one combination of depth class, color model and layout.
#[derive(Debug)]
pub(crate) struct Variant<X, M> {
    extract: X,
    model: M,
    planar: bool,
    byte_order: ByteOrder,
}

impl<X: Extract, M: ColorModel> Variant<X, M> {
    pub(crate) fn new(
        extract: X,
        model: M,
        planar: PlanarConfiguration,
        byte_order: ByteOrder,
    ) -> Self {
        Variant {
            extract,
            model,
            planar: planar == PlanarConfiguration::Planar,
            byte_order,
        }
    }

    fn buffers(&self) -> usize {
        if self.planar {
            M::CHANNELS
        } else {
            1
        }
    }

    /// Bits of one pixel within the buffer at `index`.
    fn pixel_bits(&self, index: usize) -> usize {
        if self.planar {
            self.extract.bits(index)
        } else {
            (0..M::CHANNELS).map(|c| self.extract.bits(c)).sum()
        }
    }

    fn check_lengths(&self, data: &[&[u8]], region: &Region) -> PhotometricResult<()> {
        for (channel, buffer) in data.iter().enumerate() {
            let needed = self.buffer_len(channel, region.width, region.height);
            if buffer.len() < needed {
                return Err(PhotometricError::CorruptData {
                    channel,
                    offset: 0,
                    needed,
                    available: buffer.len(),
                });
            }
        }

        Ok(())
    }

    fn buffer_len(&self, index: usize, width: usize, height: usize) -> usize {
        let row = width.saturating_mul(self.pixel_bits(index)).div_ceil(8);
        row.saturating_mul(height)
    }

    /// Read one interleaved buffer.
    fn chunky<E: Endian, P: Pixel>(
        &self,
        data: &[u8],
        pixels: &mut PixelGrid<'_, P>,
        region: &Region,
    ) -> PhotometricResult<()> {
        let mut cursor = Cursor::new(data, 0);
        let mut raw = [0u64; MAX_CHANNELS];

        for y in region.rows() {
            for pixel in pixels.row_mut(y, region) {
                for (channel, sample) in raw[..M::CHANNELS].iter_mut().enumerate() {
                    *sample = self.extract.extract::<E>(&mut cursor, channel)?;
                }

                *pixel = P::from_scaled(self.model.color(&raw)?);
            }

            cursor.align();
        }

        Ok(())
    }

    /// Read one buffer per channel, advancing all of them in lockstep.
    fn planar<E: Endian, P: Pixel>(
        &self,
        data: &[&[u8]],
        pixels: &mut PixelGrid<'_, P>,
        region: &Region,
    ) -> PhotometricResult<()> {
        let mut cursors: [Cursor<'_>; MAX_CHANNELS] = std::array::from_fn(|channel| {
            Cursor::new(data.get(channel).copied().unwrap_or_default(), channel)
        });
        let cursors = &mut cursors[..M::CHANNELS];
        let mut raw = [0u64; MAX_CHANNELS];

        for y in region.rows() {
            for pixel in pixels.row_mut(y, region) {
                for (channel, cursor) in cursors.iter_mut().enumerate() {
                    raw[channel] = self.extract.extract::<E>(cursor, channel)?;
                }

                *pixel = P::from_scaled(self.model.color(&raw)?);
            }

            cursors.iter_mut().for_each(Cursor::align);
        }

        Ok(())
    }
}

impl<P: Pixel, X: Extract, M: ColorModel> ColorDecoder<P> for Variant<X, M> {
    fn decode(
        &self,
        data: &[&[u8]],
        pixels: &mut PixelGrid<'_, P>,
        region: Region,
    ) -> PhotometricResult<()> {
        if region.is_empty() {
            return Ok(());
        }

        let expected = self.buffers();
        if data.len() != expected {
            return Err(UsageError::ChannelBuffers {
                expected,
                found: data.len(),
            }
            .into());
        }

        pixels.check(region)?;
        self.check_lengths(data, &region)?;

        log::trace!(
            "decoding {:?} from {} {} {:?} buffer(s)",
            region,
            data.len(),
            if self.planar { "planar" } else { "chunky" },
            self.byte_order
        );

        match (self.planar, self.byte_order) {
            (false, ByteOrder::BigEndian) => self.chunky::<BigEndian, P>(data[0], pixels, &region),
            (false, ByteOrder::LittleEndian) => {
                self.chunky::<LittleEndian, P>(data[0], pixels, &region)
            }
            (true, ByteOrder::BigEndian) => self.planar::<BigEndian, P>(data, pixels, &region),
            (true, ByteOrder::LittleEndian) => {
                self.planar::<LittleEndian, P>(data, pixels, &region)
            }
        }
    }

    fn buffer_count(&self) -> usize {
        self.buffers()
    }

    fn required_len(&self, index: usize, width: usize, height: usize) -> usize {
        if index >= self.buffers() {
            return 0;
        }

        self.buffer_len(index, width, height)
    }
}

/// Decode a region into a fresh buffer of [`ScaledColor`]s.
///
/// Convenient for inspecting single strips and tiles, the image-sized path is
/// [`ColorDecoder::decode`] into a caller-owned [`PixelGrid`].
pub fn decode_to_vec(
    decoder: &dyn ColorDecoder<ScaledColor>,
    data: &[&[u8]],
    width: usize,
    height: usize,
) -> PhotometricResult<Vec<ScaledColor>> {
    let len = width.checked_mul(height).ok_or(UsageError::GridSize {
        width,
        height,
        len: 0,
    })?;

    let mut pixels = vec![ScaledColor::BLACK; len];
    let mut grid = PixelGrid::new(&mut pixels, width, height)?;
    decoder.decode(data, &mut grid, Region::new(0, 0, width, height))?;

    Ok(pixels)
}
