use std::fmt;

use quick_error::quick_error;

use crate::tags::{PhotometricInterpretation, SampleFormat};

quick_error! {
    /// Photometric decoding error kinds.
    #[derive(Debug)]
    #[non_exhaustive]
    pub enum PhotometricError {
        /// No decoder matches the configuration handed to
        /// [`select`](crate::select).
        UnsupportedConfiguration(err: UnsupportedConfiguration) {
            display("unsupported configuration: {}", err)
            from()
        }
        /// A raw channel buffer ends before the requested region is satisfied.
        CorruptData { channel: usize, offset: usize, needed: usize, available: usize } {
            display(
                "corrupt data in channel {}: {} bytes needed from offset {} but the buffer holds {}",
                channel, needed, offset, available
            )
        }
        /// A palette index lies outside of the color map.
        InvalidColorMap { index: u64, entries: usize } {
            display("palette index {} exceeds the color map of {} entries", index, entries)
        }
        /// The caller broke the contract of an operation.
        Usage(err: UsageError) {
            display("usage error: {}", err)
            from()
        }
    }
}

/// The aspect of a [`DecoderConfig`](crate::DecoderConfig) that no decoder supports.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnsupportedConfiguration {
    /// The photometric interpretation tag holds an unrecognized value.
    UnknownPhotometric(u16),
    /// The photometric interpretation is recognized but not decoded here.
    Photometric(PhotometricInterpretation),
    /// The planar configuration tag holds an unrecognized value.
    UnknownPlanarConfiguration(u16),
    BitDepth {
        photometric: PhotometricInterpretation,
        bits_per_sample: Vec<u16>,
    },
    Format {
        photometric: PhotometricInterpretation,
        format: SampleFormat,
    },
    /// The samples per pixel do not match the model's channels plus extra samples.
    SamplesPerPixel {
        photometric: PhotometricInterpretation,
        expected: usize,
        found: usize,
    },
    /// Palette images are only defined for one channel of chunky data.
    PlanarPalette,
    /// At most one extra sample (alpha) is decoded.
    ExtraSamples(usize),
    /// A palette image was configured without a color map.
    MissingColorMap,
    /// YCbCr data with subsampled chroma.
    ChromaSubsampling(u16, u16),
    /// More samples per pixel than any decoder handles.
    Channels(usize),
    /// A `ReferenceBlackWhite` pair with equal black and white code points.
    ReferenceBlackWhite,
}

impl fmt::Display for UnsupportedConfiguration {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::UnsupportedConfiguration::*;
        match self {
            UnknownPhotometric(value) => {
                write!(fmt, "unknown photometric interpretation {}", value)
            }
            Photometric(photometric) => {
                write!(fmt, "photometric interpretation {:?} is not supported", photometric)
            }
            UnknownPlanarConfiguration(value) => {
                write!(fmt, "unknown planar configuration {}", value)
            }
            BitDepth {
                photometric,
                bits_per_sample,
            } => write!(
                fmt,
                "bits per sample {:?} are not supported for {:?}",
                bits_per_sample, photometric
            ),
            Format {
                photometric,
                format,
            } => write!(
                fmt,
                "sample format {:?} is not supported for {:?}",
                format, photometric
            ),
            SamplesPerPixel {
                photometric,
                expected,
                found,
            } => write!(
                fmt,
                "{:?} with the given extra samples needs {} samples per pixel, found {}",
                photometric, expected, found
            ),
            PlanarPalette => fmt.write_str("palette images can not be stored planar"),
            ExtraSamples(count) => write!(fmt, "{} extra samples, at most one is supported", count),
            MissingColorMap => fmt.write_str("palette image without a color map"),
            ChromaSubsampling(horizontal, vertical) => write!(
                fmt,
                "YCbCr chroma subsampling {}x{} is not supported",
                horizontal, vertical
            ),
            Channels(count) => write!(
                fmt,
                "{} samples per pixel exceed the supported {}",
                count,
                crate::decoder::MAX_CHANNELS
            ),
            ReferenceBlackWhite => fmt.write_str("degenerate YCbCr reference black and white"),
        }
    }
}

/// User errors that can be detected before touching any pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UsageError {
    /// The region does not lie within the destination grid.
    RegionOutOfBounds {
        left: usize,
        top: usize,
        width: usize,
        height: usize,
        grid_width: usize,
        grid_rows: std::ops::Range<usize>,
    },
    /// The number of raw buffers does not match the layout.
    ChannelBuffers { expected: usize, found: usize },
    /// A TIFF color map table must hold three equally long runs of values.
    ColorMapLength(usize),
    /// The pixel slice does not have `width * height` elements.
    GridSize {
        width: usize,
        height: usize,
        len: usize,
    },
}

impl fmt::Display for UsageError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::UsageError::*;
        match self {
            RegionOutOfBounds {
                left,
                top,
                width,
                height,
                grid_width,
                grid_rows,
            } => write!(
                fmt,
                "region {}x{} at ({}, {}) exceeds grid of width {} covering rows {:?}",
                width, height, left, top, grid_width, grid_rows
            ),
            ChannelBuffers { expected, found } => write!(
                fmt,
                "expected {} raw channel buffers, got {}",
                expected, found
            ),
            ColorMapLength(len) => write!(
                fmt,
                "color map with {} values is not divisible into red, green and blue",
                len
            ),
            GridSize { width, height, len } => write!(
                fmt,
                "a {}x{} grid needs {} pixels, the buffer holds {}",
                width,
                height,
                width.saturating_mul(*height),
                len
            ),
        }
    }
}

/// Result of a photometric decoding process
pub type PhotometricResult<T> = Result<T, PhotometricError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_value() {
        let err = PhotometricError::InvalidColorMap {
            index: 20,
            entries: 16,
        };
        let text = err.to_string();
        assert!(text.contains("20"));
        assert!(text.contains("16"));

        let err: PhotometricError = UnsupportedConfiguration::ExtraSamples(2).into();
        assert!(matches!(
            err,
            PhotometricError::UnsupportedConfiguration(UnsupportedConfiguration::ExtraSamples(2))
        ));
    }

    #[test]
    fn corrupt_data_reports_offset() {
        let err = PhotometricError::CorruptData {
            channel: 1,
            offset: 12,
            needed: 3,
            available: 13,
        };
        assert_eq!(
            err.to_string(),
            "corrupt data in channel 1: 3 bytes needed from offset 12 but the buffer holds 13"
        );
    }
}
