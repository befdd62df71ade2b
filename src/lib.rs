//! Photometric interpretation of raw TIFF samples
//!
//! Converts the decompressed bytes of TIFF strips and tiles into pixels. A [`DecoderConfig`]
//! describes the sample layout of one image; [`select`] validates it once and returns a
//! [`ColorDecoder`] that writes normalized colors into a caller-owned [`PixelGrid`].
//!
//! ```
//! use tiff_photometric::tags::{ByteOrder, PhotometricInterpretation};
//! use tiff_photometric::{select, DecoderConfig, PixelGrid, Region};
//!
//! let config = DecoderConfig::new(PhotometricInterpretation::RGB, &[16, 16, 16])
//!     .with_byte_order(ByteOrder::BigEndian);
//! let decoder = select::<[u8; 4]>(&config)?;
//!
//! let strip = [0xff, 0xff, 0x00, 0x00, 0x80, 0x00];
//! let mut pixels = [[0; 4]; 1];
//! let mut grid = PixelGrid::new(&mut pixels, 1, 1)?;
//! decoder.decode(&[&strip], &mut grid, Region::new(0, 0, 1, 1))?;
//!
//! assert_eq!(pixels, [[255, 0, 128, 255]]);
//! # Ok::<(), tiff_photometric::PhotometricError>(())
//! ```
//!
//! # Related Links
//! * <https://web.archive.org/web/20210108073850/https://www.adobe.io/open/standards/TIFF.html> - The TIFF specification

mod color;
mod config;
pub mod decoder;
mod dispatch;
mod error;
mod pixel;
mod sample;
pub mod tags;

pub use self::color::ScaledColor;
pub use self::config::{AlphaAssociation, ColorMap, DecoderConfig, YCbCrParams};
pub use self::decoder::ColorDecoder;
pub use self::dispatch::select;
pub use self::error::{PhotometricError, PhotometricResult, UnsupportedConfiguration, UsageError};
pub use self::pixel::{Pixel, PixelGrid, Region};
