#![no_main]
use libfuzzer_sys::fuzz_target;

use tiff_photometric::tags::{
    ByteOrder, ExtraSamples, PhotometricInterpretation, PlanarConfiguration, SampleFormat,
};
use tiff_photometric::{select, ColorMap, DecoderConfig, PixelGrid, Region};

fuzz_target!(|data: &[u8]| {
    let [photometric, format, planar, extra, order, samples, width, height, rest @ ..] = data
    else {
        return;
    };

    let samples = usize::from(samples % 5);
    let Some((bits, rest)) = rest.split_at_checked(samples) else {
        return;
    };
    let bits: Vec<u16> = bits.iter().map(|&b| u16::from(b % 65)).collect();

    let mut config = DecoderConfig::new(
        PhotometricInterpretation::from_u16_exhaustive(u16::from(photometric % 8)),
        &bits,
    )
    .with_sample_format(SampleFormat::from_u16_exhaustive(u16::from(format % 5)))
    .with_planar_configuration(PlanarConfiguration::from_u16_exhaustive(u16::from(planar % 3)))
    .with_byte_order(if order & 1 == 0 {
        ByteOrder::LittleEndian
    } else {
        ByteOrder::BigEndian
    })
    .with_color_map(ColorMap::new(vec![[0x1234, 0x5678, 0x9abc]; 16]));

    if extra % 3 != 0 {
        let kind = ExtraSamples::from_u16_exhaustive(u16::from(extra % 4));
        config = config.with_extra_samples(&[kind]);
    }

    let Ok(decoder) = select::<[u8; 4]>(&config) else {
        return;
    };

    let (width, height) = (usize::from(width % 32), usize::from(height % 32));
    let count = decoder.buffer_count();
    let chunk = rest.len() / count.max(1);
    let buffers: Vec<&[u8]> = (0..count).map(|i| &rest[i * chunk..(i + 1) * chunk]).collect();

    let mut pixels = vec![[0u8; 4]; width * height];
    let Ok(mut grid) = PixelGrid::new(&mut pixels, width, height) else {
        return;
    };
    let _ = decoder.decode(&buffers, &mut grid, Region::new(0, 0, width, height));
});
