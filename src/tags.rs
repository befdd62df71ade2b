macro_rules! tags {
    {
        // Permit arbitrary meta items, which include documentation.
        $( #[$enum_attr:meta] )*
        $vis:vis enum $name:ident($ty:tt) $(unknown(#[$unknown_meta:meta] $unknown_doc:ident))* {
            // Each of the `Name = Val,` permitting documentation.
            $($(#[$ident_attr:meta])* $tag:ident = $val:expr,)*
        }
    } => {
        $( #[$enum_attr] )*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
        #[non_exhaustive]
        #[repr($ty)]
        pub enum $name {
            $($(#[$ident_attr])* $tag = $val,)*
            $(
                #[$unknown_meta]
                Unknown($ty),
            )*
        }

        impl $name {
            #[inline(always)]
            const fn __from_inner_type(n: $ty) -> Result<Self, $ty> {
                match n {
                    $( $val => Ok($name::$tag), )*
                    n => Err(n),
                }
            }

            #[inline(always)]
            const fn __to_inner_type(&self) -> $ty {
                match *self {
                    $( $name::$tag => $val, )*
                    $( $name::Unknown($unknown_doc) => { $unknown_doc }, )*
                }
            }
        }

        tags!($name, $ty, $($unknown_doc)*);
    };
    // Every tag value consumed here is a SHORT.
    ($name:tt, u16, $($unknown_doc:ident)*) => {
        impl $name {
            #[inline(always)]
            pub const fn from_u16(val: u16) -> Option<Self> {
                match Self::__from_inner_type(val) {
                    Ok(v) => Some(v),
                    Err(_) => None,
                }
            }

            $(
            #[inline(always)]
            pub const fn from_u16_exhaustive($unknown_doc: u16) -> Self {
                match Self::__from_inner_type($unknown_doc) {
                    Ok(v) => v,
                    Err(_) => $name::Unknown($unknown_doc),
                }
            }
            )*

            #[inline(always)]
            pub const fn to_u16(&self) -> u16 {
                Self::__to_inner_type(self)
            }
        }
    };
}

tags! {
/// How raw sample values map to colors, the `PhotometricInterpretation` tag.
pub enum PhotometricInterpretation(u16) unknown(
    /// A value outside of the TIFF 6.0 and TIFF-F/FX registrations
    unknown
) {
    WhiteIsZero = 0,
    BlackIsZero = 1,
    RGB = 2,
    RGBPalette = 3,
    TransparencyMask = 4,
    CMYK = 5,
    YCbCr = 6,
    CIELab = 8,
    IccLab = 9,
    ItuLab = 10,
}
}

impl PhotometricInterpretation {
    /// The number of samples of one pixel, without extra samples.
    ///
    /// Returns `None` for interpretations that have no decoder.
    pub const fn color_channels(&self) -> Option<usize> {
        match self {
            PhotometricInterpretation::WhiteIsZero
            | PhotometricInterpretation::BlackIsZero
            | PhotometricInterpretation::RGBPalette => Some(1),
            PhotometricInterpretation::RGB | PhotometricInterpretation::YCbCr => Some(3),
            PhotometricInterpretation::CMYK => Some(4),
            _ => None,
        }
    }
}

tags! {
pub enum PlanarConfiguration(u16) unknown(
    /// A value other than chunky or planar
    unknown
) {
    /// All samples of a pixel are stored together, `RGBRGBRGB...`.
    Chunky = 1,
    /// Each sample is stored in its own plane, `RRR...GGG...BBB...`.
    Planar = 2,
}
}

tags! {
/// Data type of each sample, the `SampleFormat` tag.
pub enum SampleFormat(u16) unknown(
    /// An unknown extension sample format
    unknown
) {
    Uint = 1,
    Int = 2,
    IEEEFP = 3,
    Void = 4,
}
}

tags! {
pub enum ExtraSamples(u16) unknown(
    /// A value outside of the TIFF 6.0 registration
    unknown
) {
    /// There is no specified association between the sample and the image.
    Unspecified = 0,
    /// The sample is associated alpha, i.e. pre-multiplied color.
    AssociatedAlpha = 1,
    /// The sample is unassociated alpha such as a mask.
    UnassociatedAlpha = 2,
}
}

/// Byte order of the TIFF file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// little endian byte order
    LittleEndian,
    /// big endian byte order
    BigEndian,
}

impl ByteOrder {
    /// Get the byte order representing the running target.
    pub const fn native() -> Self {
        match () {
            #[cfg(target_endian = "little")]
            () => ByteOrder::LittleEndian,
            #[cfg(target_endian = "big")]
            () => ByteOrder::BigEndian,
            #[cfg(not(any(target_endian = "big", target_endian = "little")))]
            () => compile_error!("Unsupported target"),
        }
    }
}

#[test]
fn unknown_values_are_preserved() {
    let photometric = PhotometricInterpretation::from_u16_exhaustive(7);
    assert_eq!(photometric, PhotometricInterpretation::Unknown(7));
    assert_eq!(photometric.to_u16(), 7);
    assert_eq!(PhotometricInterpretation::from_u16(7), None);
}

#[test]
fn color_channels_per_model() {
    assert_eq!(PhotometricInterpretation::RGB.color_channels(), Some(3));
    assert_eq!(PhotometricInterpretation::CMYK.color_channels(), Some(4));
    assert_eq!(PhotometricInterpretation::RGBPalette.color_channels(), Some(1));
    assert_eq!(PhotometricInterpretation::CIELab.color_channels(), None);
    assert_eq!(
        PlanarConfiguration::from_u16(2),
        Some(PlanarConfiguration::Planar)
    );
}
