//! Selection of the decoder matching an image configuration.

use crate::color::{
    ColorModel, Cmyk, Float16, Float32, Float64, Gray, Normalize, Palette, Rgb, Unorm, YCbCr,
};
use crate::config::{AlphaAssociation, DecoderConfig};
use crate::decoder::{ColorDecoder, Variant, MAX_CHANNELS};
use crate::error::{PhotometricResult, UnsupportedConfiguration};
use crate::pixel::Pixel;
use crate::sample::{Extract, Packed, Whole};
use crate::tags::{PhotometricInterpretation, PlanarConfiguration, SampleFormat};

/// How samples of a configuration are laid out in the raw bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Depth {
    Bytes1,
    Bytes2,
    Bytes3,
    Bytes4,
    Bytes8,
    /// Per channel depths of at most 32 bits, none of them a whole number of bytes above 8.
    Packed([u8; MAX_CHANNELS]),
}

impl Depth {
    fn of(bits_per_sample: &[u16]) -> Option<Depth> {
        let (&first, _) = bits_per_sample.split_first()?;
        if bits_per_sample.contains(&0) || bits_per_sample.len() > MAX_CHANNELS {
            return None;
        }

        if first % 8 == 0 && bits_per_sample.iter().all(|&bits| bits == first) {
            return match first {
                8 => Some(Depth::Bytes1),
                16 => Some(Depth::Bytes2),
                24 => Some(Depth::Bytes3),
                32 => Some(Depth::Bytes4),
                64 => Some(Depth::Bytes8),
                _ => None,
            };
        }

        let mut packed = [0u8; MAX_CHANNELS];
        for (packed, &bits) in packed.iter_mut().zip(bits_per_sample) {
            if bits > 32 || (bits > 8 && bits % 8 == 0) {
                return None;
            }
            *packed = u8::try_from(bits).ok()?;
        }

        Some(Depth::Packed(packed))
    }
}

/// Build a decoder for each depth class from one expression generic over the extraction.
macro_rules! with_depth {
    ($depth:expr, |$extract:ident| $body:expr) => {
        match $depth {
            Depth::Bytes1 => {
                let $extract = Whole::<1>;
                $body
            }
            Depth::Bytes2 => {
                let $extract = Whole::<2>;
                $body
            }
            Depth::Bytes3 => {
                let $extract = Whole::<3>;
                $body
            }
            Depth::Bytes4 => {
                let $extract = Whole::<4>;
                $body
            }
            Depth::Bytes8 => {
                let $extract = Whole::<8>;
                $body
            }
            Depth::Packed(bits) => {
                let $extract = Packed { bits };
                $body
            }
        }
    };
}

/// Choose the decoder for raw samples described by `config`.
///
/// All validation of the configuration happens here, once per image. The returned decoder is
/// reused for every strip and tile of the image and never inspects the configuration again.
///
/// # Errors
///
/// Returns [`PhotometricError::UnsupportedConfiguration`] if no decoder supports the combination
/// of photometric interpretation, bit depths, sample format, planar configuration and extra
/// samples.
pub fn select<P: Pixel>(config: &DecoderConfig) -> PhotometricResult<Box<dyn ColorDecoder<P>>> {
    match choose(config) {
        Ok(decoder) => Ok(decoder),
        Err(err) => {
            log::debug!(
                "no decoder for {:?} with bits {:?}: {}",
                config.photometric,
                config.bits_per_sample,
                err
            );
            Err(err.into())
        }
    }
}

fn choose<P: Pixel>(
    config: &DecoderConfig,
) -> Result<Box<dyn ColorDecoder<P>>, UnsupportedConfiguration> {
    let photometric = config.photometric;
    let channels = match photometric {
        PhotometricInterpretation::Unknown(value) => {
            return Err(UnsupportedConfiguration::UnknownPhotometric(value))
        }
        other => other
            .color_channels()
            .ok_or(UnsupportedConfiguration::Photometric(other))?,
    };

    if let PlanarConfiguration::Unknown(value) = config.planar {
        return Err(UnsupportedConfiguration::UnknownPlanarConfiguration(value));
    }

    let association = config.alpha()?;
    let expected = channels + config.extra_sample_count();
    let found = config.samples_per_pixel();
    if found != expected {
        return Err(UnsupportedConfiguration::SamplesPerPixel {
            photometric,
            expected,
            found,
        });
    }

    if found > MAX_CHANNELS {
        return Err(UnsupportedConfiguration::Channels(found));
    }

    let decoder = match config.sample_format {
        SampleFormat::Uint => unsigned(config, association)?,
        SampleFormat::IEEEFP => float(config, association)?,
        format => {
            return Err(UnsupportedConfiguration::Format {
                photometric,
                format,
            })
        }
    };

    log::debug!(
        "decoding {:?} {:?} with bits {:?} as {:?} {:?}, alpha {:?}",
        config.planar,
        photometric,
        config.bits_per_sample,
        config.sample_format,
        config.byte_order,
        association
    );

    Ok(decoder)
}

fn bit_depth(config: &DecoderConfig) -> UnsupportedConfiguration {
    UnsupportedConfiguration::BitDepth {
        photometric: config.photometric,
        bits_per_sample: config.bits_per_sample.clone(),
    }
}

fn variant<P: Pixel, X: Extract, M: ColorModel>(
    extract: X,
    model: M,
    config: &DecoderConfig,
) -> Box<dyn ColorDecoder<P>> {
    Box::new(Variant::new(extract, model, config.planar, config.byte_order))
}

/// The models shared by integer and floating point samples.
fn models<P: Pixel, X: Extract, N: Normalize>(
    extract: X,
    norm: N,
    config: &DecoderConfig,
    association: AlphaAssociation,
) -> Result<Box<dyn ColorDecoder<P>>, UnsupportedConfiguration> {
    use PhotometricInterpretation::*;

    let extra = config.extra_sample_count() > 0;
    Ok(match (config.photometric, extra) {
        (BlackIsZero, false) => {
            variant(extract, Gray::<_, 0, false>::new(norm, association), config)
        }
        (BlackIsZero, true) => {
            variant(extract, Gray::<_, 1, false>::new(norm, association), config)
        }
        (WhiteIsZero, false) => {
            variant(extract, Gray::<_, 0, true>::new(norm, association), config)
        }
        (WhiteIsZero, true) => variant(extract, Gray::<_, 1, true>::new(norm, association), config),
        (RGB, false) => variant(extract, Rgb::<_, 0>::new(norm, association), config),
        (RGB, true) => variant(extract, Rgb::<_, 1>::new(norm, association), config),
        // Extra samples on CMYK exceed the channel limit.
        (CMYK, _) => variant(extract, Cmyk::new(norm), config),
        (photometric, _) => {
            return Err(UnsupportedConfiguration::Format {
                photometric,
                format: config.sample_format,
            })
        }
    })
}

fn unsigned<P: Pixel>(
    config: &DecoderConfig,
    association: AlphaAssociation,
) -> Result<Box<dyn ColorDecoder<P>>, UnsupportedConfiguration> {
    let depth = Depth::of(&config.bits_per_sample).ok_or_else(|| bit_depth(config))?;

    match config.photometric {
        PhotometricInterpretation::RGBPalette => palette(config, depth),
        PhotometricInterpretation::YCbCr => ycbcr(config, depth, association),
        _ => {
            let norm = Unorm::new(&config.bits_per_sample);
            with_depth!(depth, |extract| models(extract, norm, config, association))
        }
    }
}

fn float<P: Pixel>(
    config: &DecoderConfig,
    association: AlphaAssociation,
) -> Result<Box<dyn ColorDecoder<P>>, UnsupportedConfiguration> {
    let bits = &config.bits_per_sample;
    if !bits.iter().all(|&b| b == bits[0]) {
        return Err(bit_depth(config));
    }

    match bits[0] {
        16 => models(Whole::<2>, Float16, config, association),
        32 => models(Whole::<4>, Float32, config, association),
        64 => models(Whole::<8>, Float64, config, association),
        _ => Err(bit_depth(config)),
    }
}

fn palette<P: Pixel>(
    config: &DecoderConfig,
    depth: Depth,
) -> Result<Box<dyn ColorDecoder<P>>, UnsupportedConfiguration> {
    if config.extra_sample_count() > 0 {
        return Err(UnsupportedConfiguration::SamplesPerPixel {
            photometric: config.photometric,
            expected: 1,
            found: config.samples_per_pixel(),
        });
    }

    if config.planar == PlanarConfiguration::Planar {
        return Err(UnsupportedConfiguration::PlanarPalette);
    }

    let map = config
        .color_map
        .as_ref()
        .ok_or(UnsupportedConfiguration::MissingColorMap)?;
    let model = Palette::new(map);

    Ok(with_depth!(depth, |extract| variant(extract, model, config)))
}

fn ycbcr<P: Pixel>(
    config: &DecoderConfig,
    depth: Depth,
    association: AlphaAssociation,
) -> Result<Box<dyn ColorDecoder<P>>, UnsupportedConfiguration> {
    let bits = &config.bits_per_sample;
    if !bits.iter().all(|&b| b == bits[0]) {
        return Err(bit_depth(config));
    }

    let (horizontal, vertical) = config.ycbcr.subsampling;
    if (horizontal, vertical) != (1, 1) {
        return Err(UnsupportedConfiguration::ChromaSubsampling(horizontal, vertical));
    }

    let norm = Unorm::new(bits);
    if config.extra_sample_count() > 0 {
        let model = YCbCr::<1>::new(norm, association, &config.ycbcr)
            .ok_or(UnsupportedConfiguration::ReferenceBlackWhite)?;
        Ok(with_depth!(depth, |extract| variant(extract, model, config)))
    } else {
        let model = YCbCr::<0>::new(norm, association, &config.ycbcr)
            .ok_or(UnsupportedConfiguration::ReferenceBlackWhite)?;
        Ok(with_depth!(depth, |extract| variant(extract, model, config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ScaledColor;
    use crate::config::{ColorMap, YCbCrParams};
    use crate::error::PhotometricError;
    use crate::tags::ExtraSamples;

    fn rejection(config: &DecoderConfig) -> UnsupportedConfiguration {
        match select::<ScaledColor>(config) {
            Err(PhotometricError::UnsupportedConfiguration(err)) => err,
            Err(err) => panic!("unexpected error {}", err),
            Ok(_) => panic!("{:?} was accepted", config),
        }
    }

    #[test]
    fn depth_classes() {
        assert_eq!(Depth::of(&[8, 8, 8]), Some(Depth::Bytes1));
        assert_eq!(Depth::of(&[24]), Some(Depth::Bytes3));
        assert_eq!(Depth::of(&[64, 64]), Some(Depth::Bytes8));
        assert_eq!(Depth::of(&[5, 6, 5]), Some(Depth::Packed([5, 6, 5, 0])));
        assert_eq!(Depth::of(&[12]), Some(Depth::Packed([12, 0, 0, 0])));
        assert_eq!(Depth::of(&[8, 4]), Some(Depth::Packed([8, 4, 0, 0])));
        assert_eq!(Depth::of(&[16, 8]), None);
        assert_eq!(Depth::of(&[40]), None);
        assert_eq!(Depth::of(&[0]), None);
        assert_eq!(Depth::of(&[]), None);
    }

    #[test]
    fn buffers_follow_layout() {
        let config = DecoderConfig::new(PhotometricInterpretation::RGB, &[8; 4])
            .with_extra_samples(&[ExtraSamples::UnassociatedAlpha]);
        assert_eq!(select::<ScaledColor>(&config).unwrap().buffer_count(), 1);

        let config = config.with_planar_configuration(PlanarConfiguration::Planar);
        assert_eq!(select::<[u8; 4]>(&config).unwrap().buffer_count(), 4);
    }

    #[test]
    fn rejected_configurations() {
        use PhotometricInterpretation::*;

        let config = DecoderConfig::new(PhotometricInterpretation::Unknown(42), &[8]);
        assert_eq!(
            rejection(&config),
            UnsupportedConfiguration::UnknownPhotometric(42)
        );

        let config = DecoderConfig::new(CIELab, &[8; 3]);
        assert_eq!(
            rejection(&config),
            UnsupportedConfiguration::Photometric(CIELab)
        );

        let config = DecoderConfig::new(RGB, &[8; 3])
            .with_planar_configuration(PlanarConfiguration::Unknown(3));
        assert_eq!(
            rejection(&config),
            UnsupportedConfiguration::UnknownPlanarConfiguration(3)
        );

        let config = DecoderConfig::new(RGB, &[8; 4]);
        assert!(matches!(
            rejection(&config),
            UnsupportedConfiguration::SamplesPerPixel {
                expected: 3,
                found: 4,
                ..
            }
        ));

        let config = DecoderConfig::new(CMYK, &[8; 5])
            .with_extra_samples(&[ExtraSamples::UnassociatedAlpha]);
        assert_eq!(rejection(&config), UnsupportedConfiguration::Channels(5));

        let config = DecoderConfig::new(RGB, &[8; 3]).with_sample_format(SampleFormat::Int);
        assert!(matches!(
            rejection(&config),
            UnsupportedConfiguration::Format {
                format: SampleFormat::Int,
                ..
            }
        ));

        let config = DecoderConfig::new(RGB, &[24; 3]).with_sample_format(SampleFormat::IEEEFP);
        assert!(matches!(
            rejection(&config),
            UnsupportedConfiguration::BitDepth { .. }
        ));

        let config = DecoderConfig::new(RGBPalette, &[8]);
        assert_eq!(
            rejection(&config),
            UnsupportedConfiguration::MissingColorMap
        );

        let config = DecoderConfig::new(RGBPalette, &[8])
            .with_color_map(ColorMap::new(vec![[0; 3]; 256]))
            .with_sample_format(SampleFormat::IEEEFP);
        assert!(matches!(
            rejection(&config),
            UnsupportedConfiguration::BitDepth { .. } | UnsupportedConfiguration::Format { .. }
        ));

        let config = DecoderConfig::new(RGBPalette, &[8])
            .with_color_map(ColorMap::new(vec![[0; 3]; 256]))
            .with_planar_configuration(PlanarConfiguration::Planar);
        assert_eq!(rejection(&config), UnsupportedConfiguration::PlanarPalette);

        let config =
            DecoderConfig::new(PhotometricInterpretation::YCbCr, &[8; 3]).with_ycbcr(YCbCrParams {
                subsampling: (2, 2),
                ..Default::default()
            });
        assert_eq!(
            rejection(&config),
            UnsupportedConfiguration::ChromaSubsampling(2, 2)
        );

        let config =
            DecoderConfig::new(PhotometricInterpretation::YCbCr, &[8; 3]).with_ycbcr(YCbCrParams {
                reference_black_white: Some([0.0, 255.0, 128.0, 128.0, 128.0, 255.0]),
                ..Default::default()
            });
        assert_eq!(
            rejection(&config),
            UnsupportedConfiguration::ReferenceBlackWhite
        );

        let config = DecoderConfig::new(BlackIsZero, &[48]);
        assert!(matches!(
            rejection(&config),
            UnsupportedConfiguration::BitDepth { .. }
        ));
    }
}
