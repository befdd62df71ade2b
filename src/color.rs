//! Scaling of extracted samples to normalized colors.
//!
//! Every channel is scaled independently to `[0, 1]` by a [`Normalize`] strategy, and a
//! [`ColorModel`] combines the channels of one pixel into a [`ScaledColor`]. Alpha is never
//! applied to the color channels; the color is tagged with its [`AlphaAssociation`] instead.

use crate::config::{AlphaAssociation, ColorMap, YCbCrParams};
use crate::decoder::MAX_CHANNELS;
use crate::error::{PhotometricError, PhotometricResult};

/// A color with components normalized to `[0, 1]`.
///
/// Integer samples always scale into that range. Floating point samples are passed through as
/// stored and may lie outside of it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    /// Whether `r`, `g` and `b` were multiplied by `a` when the image was encoded.
    pub association: AlphaAssociation,
}

impl ScaledColor {
    /// Opaque black.
    pub const BLACK: ScaledColor = ScaledColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
        association: AlphaAssociation::None,
    };

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Divide premultiplied colors by their alpha.
    ///
    /// Colors that are not premultiplied are returned unchanged. A fully transparent
    /// premultiplied color keeps its color channels.
    pub fn to_straight(self) -> ScaledColor {
        if self.association != AlphaAssociation::Premultiplied {
            return self;
        }

        let (r, g, b) = if self.a > 0.0 {
            (self.r / self.a, self.g / self.a, self.b / self.a)
        } else {
            (self.r, self.g, self.b)
        };

        ScaledColor {
            r,
            g,
            b,
            a: self.a,
            association: AlphaAssociation::Straight,
        }
    }
}

/// Scales the raw sample of one channel.
pub(crate) trait Normalize: Copy + Send + Sync + 'static {
    fn normalize(&self, raw: u64, channel: usize) -> f32;
}

/// Unsigned integers, scaled by the maximum value of their depth.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Unorm {
    max: [f64; MAX_CHANNELS],
}

impl Unorm {
    /// `bits` holds between 1 and [`MAX_CHANNELS`] depths of at most 64 bits.
    pub(crate) fn new(bits: &[u16]) -> Self {
        let mut max = [1.0; MAX_CHANNELS];
        for (max, &bits) in max.iter_mut().zip(bits) {
            *max = max_value(bits) as f64;
        }
        Unorm { max }
    }

    fn max(&self, channel: usize) -> f64 {
        self.max[channel]
    }
}

/// The largest value of an unsigned integer with `bits` bits.
pub(crate) fn max_value(bits: u16) -> u64 {
    match bits {
        0 => 0,
        1..=63 => (1u64 << bits) - 1,
        _ => u64::MAX,
    }
}

impl Normalize for Unorm {
    #[inline(always)]
    fn normalize(&self, raw: u64, channel: usize) -> f32 {
        (raw as f64 / self.max[channel]) as f32
    }
}

/// IEEE 754 half precision samples.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Float16;

impl Normalize for Float16 {
    #[inline(always)]
    fn normalize(&self, raw: u64, _: usize) -> f32 {
        half::f16::from_bits(raw as u16).to_f32()
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Float32;

impl Normalize for Float32 {
    #[inline(always)]
    fn normalize(&self, raw: u64, _: usize) -> f32 {
        f32::from_bits(raw as u32)
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Float64;

impl Normalize for Float64 {
    #[inline(always)]
    fn normalize(&self, raw: u64, _: usize) -> f32 {
        f64::from_bits(raw) as f32
    }
}

/// Combines the raw samples of one pixel into a color.
pub(crate) trait ColorModel: Send + Sync + 'static {
    /// Samples per pixel, including the extra sample.
    const CHANNELS: usize;

    fn color(&self, raw: &[u64; MAX_CHANNELS]) -> PhotometricResult<ScaledColor>;
}

#[inline(always)]
fn alpha<N: Normalize>(norm: &N, association: AlphaAssociation, raw: u64, channel: usize) -> f32 {
    match association {
        AlphaAssociation::None => 1.0,
        AlphaAssociation::Straight | AlphaAssociation::Premultiplied => {
            norm.normalize(raw, channel)
        }
    }
}

/// `BlackIsZero` and `WhiteIsZero` grayscale with `EXTRA` alpha samples.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Gray<N, const EXTRA: usize, const INVERT: bool> {
    norm: N,
    association: AlphaAssociation,
}

impl<N, const EXTRA: usize, const INVERT: bool> Gray<N, EXTRA, INVERT> {
    pub(crate) fn new(norm: N, association: AlphaAssociation) -> Self {
        Gray { norm, association }
    }
}

impl<N: Normalize, const EXTRA: usize, const INVERT: bool> ColorModel for Gray<N, EXTRA, INVERT> {
    const CHANNELS: usize = 1 + EXTRA;

    #[inline(always)]
    fn color(&self, raw: &[u64; MAX_CHANNELS]) -> PhotometricResult<ScaledColor> {
        let mut luma = self.norm.normalize(raw[0], 0);
        if INVERT {
            luma = 1.0 - luma;
        }

        let a = if EXTRA == 0 {
            1.0
        } else {
            alpha(&self.norm, self.association, raw[1], 1)
        };

        Ok(ScaledColor {
            r: luma,
            g: luma,
            b: luma,
            a,
            association: self.association,
        })
    }
}

/// RGB with `EXTRA` alpha samples.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Rgb<N, const EXTRA: usize> {
    norm: N,
    association: AlphaAssociation,
}

impl<N, const EXTRA: usize> Rgb<N, EXTRA> {
    pub(crate) fn new(norm: N, association: AlphaAssociation) -> Self {
        Rgb { norm, association }
    }
}

impl<N: Normalize, const EXTRA: usize> ColorModel for Rgb<N, EXTRA> {
    const CHANNELS: usize = 3 + EXTRA;

    #[inline(always)]
    fn color(&self, raw: &[u64; MAX_CHANNELS]) -> PhotometricResult<ScaledColor> {
        let a = if EXTRA == 0 {
            1.0
        } else {
            alpha(&self.norm, self.association, raw[3], 3)
        };

        Ok(ScaledColor {
            r: self.norm.normalize(raw[0], 0),
            g: self.norm.normalize(raw[1], 1),
            b: self.norm.normalize(raw[2], 2),
            a,
            association: self.association,
        })
    }
}

/// Subtractive CMYK without ink set or dot range adjustments.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cmyk<N> {
    norm: N,
}

impl<N> Cmyk<N> {
    pub(crate) fn new(norm: N) -> Self {
        Cmyk { norm }
    }
}

impl<N: Normalize> ColorModel for Cmyk<N> {
    const CHANNELS: usize = 4;

    #[inline(always)]
    fn color(&self, raw: &[u64; MAX_CHANNELS]) -> PhotometricResult<ScaledColor> {
        let c = self.norm.normalize(raw[0], 0);
        let m = self.norm.normalize(raw[1], 1);
        let y = self.norm.normalize(raw[2], 2);
        let k = 1.0 - self.norm.normalize(raw[3], 3);

        Ok(ScaledColor {
            r: (1.0 - c) * k,
            g: (1.0 - m) * k,
            b: (1.0 - y) * k,
            ..ScaledColor::BLACK
        })
    }
}

/// Indexed color, looked up in a color map normalized ahead of time.
#[derive(Clone, Debug)]
pub(crate) struct Palette {
    colors: Vec<[f32; 3]>,
}

impl Palette {
    pub(crate) fn new(map: &ColorMap) -> Self {
        let scale = |v: u16| f32::from(v) / f32::from(u16::MAX);
        let colors = map
            .entries()
            .iter()
            .map(|&[r, g, b]| [scale(r), scale(g), scale(b)])
            .collect();
        Palette { colors }
    }
}

impl ColorModel for Palette {
    const CHANNELS: usize = 1;

    #[inline(always)]
    fn color(&self, raw: &[u64; MAX_CHANNELS]) -> PhotometricResult<ScaledColor> {
        let index = raw[0];
        let Some(&[r, g, b]) = usize::try_from(index)
            .ok()
            .and_then(|i| self.colors.get(i))
        else {
            return Err(PhotometricError::InvalidColorMap {
                index,
                entries: self.colors.len(),
            });
        };

        Ok(ScaledColor {
            r,
            g,
            b,
            ..ScaledColor::BLACK
        })
    }
}

/// Expands a code value from its reference black/white range to a coding range.
#[derive(Clone, Copy, Debug)]
struct RangeExpander {
    black: f32,
    factor: f32,
}

impl RangeExpander {
    fn new(black: f32, white: f32, range: f32) -> Option<Self> {
        let span = white - black;
        if span == 0.0 || !span.is_finite() {
            return None;
        }

        Some(RangeExpander {
            black,
            factor: range / span,
        })
    }

    #[inline(always)]
    fn expand(&self, code: f32) -> f32 {
        (code - self.black) * self.factor
    }
}

/// YCbCr with `EXTRA` alpha samples, per section 21 of TIFF 6.0.
#[derive(Clone, Copy, Debug)]
pub(crate) struct YCbCr<const EXTRA: usize> {
    norm: Unorm,
    association: AlphaAssociation,
    luma: RangeExpander,
    cb: RangeExpander,
    cr: RangeExpander,
    coefficients: [f32; 3],
    /// Full scale of the luma coding range.
    max: f32,
}

impl<const EXTRA: usize> YCbCr<EXTRA> {
    /// Returns `None` if a reference black and white pair is degenerate.
    pub(crate) fn new(
        norm: Unorm,
        association: AlphaAssociation,
        params: &YCbCrParams,
    ) -> Option<Self> {
        let max = norm.max(0) as f32;
        let mid = (max + 1.0) / 2.0;
        let [y_black, y_white, cb_black, cb_white, cr_black, cr_white] = params
            .reference_black_white
            .unwrap_or([0.0, max, mid, max, mid, max]);

        // Chroma codes expand to a range centered on zero.
        let chroma = mid - 1.0;

        Some(YCbCr {
            norm,
            association,
            luma: RangeExpander::new(y_black, y_white, max)?,
            cb: RangeExpander::new(cb_black, cb_white, chroma)?,
            cr: RangeExpander::new(cr_black, cr_white, chroma)?,
            coefficients: params.coefficients,
            max,
        })
    }
}

impl<const EXTRA: usize> ColorModel for YCbCr<EXTRA> {
    const CHANNELS: usize = 3 + EXTRA;

    #[inline(always)]
    fn color(&self, raw: &[u64; MAX_CHANNELS]) -> PhotometricResult<ScaledColor> {
        let [luma_red, luma_green, luma_blue] = self.coefficients;

        let y = self.luma.expand(raw[0] as f32);
        let cb = self.cb.expand(raw[1] as f32);
        let cr = self.cr.expand(raw[2] as f32);

        let r = cr * (2.0 - 2.0 * luma_red) + y;
        let b = cb * (2.0 - 2.0 * luma_blue) + y;
        let g = (y - luma_blue * b - luma_red * r) / luma_green;

        let a = if EXTRA == 0 {
            1.0
        } else {
            alpha(&self.norm, self.association, raw[3], 3)
        };

        Ok(ScaledColor {
            r: (r / self.max).clamp(0.0, 1.0),
            g: (g / self.max).clamp(0.0, 1.0),
            b: (b / self.max).clamp(0.0, 1.0),
            a,
            association: self.association,
        })
    }
}
