//! Image-level decoding configuration.
//!
//! A [`DecoderConfig`] bundles the directory values that determine how raw samples of every strip
//! and tile of one image are interpreted. It is created once per image and handed to
//! [`select`](crate::select).

use crate::error::{PhotometricResult, UnsupportedConfiguration, UsageError};
use crate::tags::{
    ByteOrder, ExtraSamples, PhotometricInterpretation, PlanarConfiguration, SampleFormat,
};

/// How the color samples of a pixel relate to its alpha sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlphaAssociation {
    /// There is no alpha. Pixels are opaque.
    None,
    /// Unassociated alpha, colors are stored independent of coverage.
    Straight,
    /// Associated alpha, colors were multiplied by alpha when the image was encoded.
    Premultiplied,
}

/// An RGB lookup table for palette images.
///
/// The entries are 16-bit values as stored in the `ColorMap` tag, where `0` is no intensity and
/// `65535` is full intensity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorMap {
    entries: Vec<[u16; 3]>,
}

impl ColorMap {
    pub fn new(entries: Vec<[u16; 3]>) -> Self {
        ColorMap { entries }
    }

    /// Build a map from the value layout of the `ColorMap` tag.
    ///
    /// The tag stores all red values, followed by all green values and then all blue values.
    pub fn from_tiff(values: &[u16]) -> PhotometricResult<Self> {
        if values.len() % 3 != 0 {
            return Err(UsageError::ColorMapLength(values.len()).into());
        }

        let len = values.len() / 3;
        let (red, rest) = values.split_at(len);
        let (green, blue) = rest.split_at(len);

        let entries = red
            .iter()
            .zip(green)
            .zip(blue)
            .map(|((&r, &g), &b)| [r, g, b])
            .collect();

        Ok(ColorMap { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[[u16; 3]] {
        &self.entries
    }
}

/// Parameters of the YCbCr to RGB conversion.
///
/// See section 21 of the TIFF 6.0 specification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YCbCrParams {
    /// `YCbCrCoefficients`: the red, green and blue luma weights.
    pub coefficients: [f32; 3],
    /// `ReferenceBlackWhite`: black and white code points of Y, Cb and Cr.
    ///
    /// `None` selects the default for the bit depth of the image, `[0, max, mid, max, mid, max]`
    /// where `mid` is `2^(bits - 1)`.
    pub reference_black_white: Option<[f32; 6]>,
    /// `YCbCrSubSampling`: horizontal and vertical chroma subsampling.
    pub subsampling: (u16, u16),
}

impl Default for YCbCrParams {
    fn default() -> Self {
        YCbCrParams {
            coefficients: [0.299, 0.587, 0.114],
            reference_black_white: None,
            subsampling: (1, 1),
        }
    }
}

/// The configuration of one image, derived from its directory.
#[derive(Clone, Debug)]
pub struct DecoderConfig {
    pub(crate) photometric: PhotometricInterpretation,
    pub(crate) bits_per_sample: Vec<u16>,
    pub(crate) planar: PlanarConfiguration,
    pub(crate) extra_samples: Vec<ExtraSamples>,
    pub(crate) sample_format: SampleFormat,
    pub(crate) byte_order: ByteOrder,
    pub(crate) color_map: Option<ColorMap>,
    pub(crate) ycbcr: YCbCrParams,
}

impl DecoderConfig {
    /// Create a configuration with one `bits_per_sample` entry per sample of a pixel.
    ///
    /// The remaining values start out as little endian, chunky, unsigned integer samples without
    /// extra samples.
    pub fn new(photometric: PhotometricInterpretation, bits_per_sample: &[u16]) -> Self {
        DecoderConfig {
            photometric,
            bits_per_sample: bits_per_sample.to_vec(),
            planar: PlanarConfiguration::Chunky,
            extra_samples: Vec::new(),
            sample_format: SampleFormat::Uint,
            byte_order: ByteOrder::LittleEndian,
            color_map: None,
            ycbcr: YCbCrParams::default(),
        }
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn with_planar_configuration(mut self, planar: PlanarConfiguration) -> Self {
        self.planar = planar;
        self
    }

    /// Declare the `ExtraSamples` of the image. They are counted in `bits_per_sample`.
    pub fn with_extra_samples(mut self, extra_samples: &[ExtraSamples]) -> Self {
        self.extra_samples = extra_samples.to_vec();
        self
    }

    pub fn with_sample_format(mut self, sample_format: SampleFormat) -> Self {
        self.sample_format = sample_format;
        self
    }

    pub fn with_color_map(mut self, color_map: ColorMap) -> Self {
        self.color_map = Some(color_map);
        self
    }

    pub fn with_ycbcr(mut self, ycbcr: YCbCrParams) -> Self {
        self.ycbcr = ycbcr;
        self
    }

    pub fn photometric(&self) -> PhotometricInterpretation {
        self.photometric
    }

    pub fn bits_per_sample(&self) -> &[u16] {
        &self.bits_per_sample
    }

    pub fn samples_per_pixel(&self) -> usize {
        self.bits_per_sample.len()
    }

    pub fn planar_configuration(&self) -> PlanarConfiguration {
        self.planar
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn sample_format(&self) -> SampleFormat {
        self.sample_format
    }

    /// The alpha association implied by the extra samples.
    ///
    /// A single `Unspecified` extra sample is decoded but does not contribute alpha.
    pub fn alpha(&self) -> Result<AlphaAssociation, UnsupportedConfiguration> {
        match self.extra_samples.as_slice() {
            [] | [ExtraSamples::Unspecified] => Ok(AlphaAssociation::None),
            [ExtraSamples::UnassociatedAlpha] => Ok(AlphaAssociation::Straight),
            [ExtraSamples::AssociatedAlpha] => Ok(AlphaAssociation::Premultiplied),
            // Unknown extension values are treated like `Unspecified`.
            [_] => Ok(AlphaAssociation::None),
            more => Err(UnsupportedConfiguration::ExtraSamples(more.len())),
        }
    }

    pub(crate) fn extra_sample_count(&self) -> usize {
        self.extra_samples.len()
    }
}
