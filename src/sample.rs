//! Extraction of single channel samples from raw strip and tile bytes.
//!
//! Samples with a depth that is a multiple of 8 are read as whole bytes in the byte order of the
//! file. All other depths are packed most significant bit first, independent of the byte order of
//! the file, and every row starts at a byte boundary.

use crate::error::{PhotometricError, PhotometricResult};

/// The byte order of whole byte samples, resolved at compile time.
///
/// Decoders are instantiated once per byte order so the choice is made once per call instead of
/// once per sample.
pub(crate) trait Endian {
    /// Assemble `N` bytes of one sample into an integer.
    ///
    /// The bytes are placed into an 8 byte scratch value whose unused high-order bytes stay zero,
    /// so 24-bit samples go through the same conversion as 32-bit ones.
    fn assemble<const N: usize>(bytes: &[u8; N]) -> u64;
}

pub(crate) enum BigEndian {}

pub(crate) enum LittleEndian {}

impl Endian for BigEndian {
    #[inline(always)]
    fn assemble<const N: usize>(bytes: &[u8; N]) -> u64 {
        // Padding leads.
        let mut scratch = [0u8; 8];
        scratch[8 - N..].copy_from_slice(bytes);
        u64::from_be_bytes(scratch)
    }
}

impl Endian for LittleEndian {
    #[inline(always)]
    fn assemble<const N: usize>(bytes: &[u8; N]) -> u64 {
        // Padding trails.
        let mut scratch = [0u8; 8];
        scratch[..N].copy_from_slice(bytes);
        u64::from_le_bytes(scratch)
    }
}

/// A read position within the raw bytes of one channel (planar) or of all channels (chunky).
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    bit_offset: usize,
    /// Reported in errors.
    channel: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8], channel: usize) -> Self {
        Cursor {
            data,
            bit_offset: 0,
            channel,
        }
    }

    /// Read `N` whole bytes. The cursor must be at a byte boundary.
    #[inline(always)]
    pub(crate) fn read_bytes<const N: usize>(&mut self) -> PhotometricResult<&'a [u8; N]> {
        let start = self.byte_pos();
        let Some(bytes) = self
            .data
            .get(start..)
            .and_then(|tail| tail.first_chunk::<N>())
        else {
            return Err(self.exhausted(N));
        };

        self.bit_offset += N * 8;
        Ok(bytes)
    }

    /// Read a sample of `bits` bits, between 1 and 32 inclusive, most significant bit first.
    #[inline(always)]
    pub(crate) fn read_bits(&mut self, bits: u8) -> PhotometricResult<u64> {
        debug_assert!((1..=32).contains(&bits));

        let start = self.byte_pos();
        let bit_pos = self.bit_offset & 7;
        let span = (bit_pos + usize::from(bits)).div_ceil(8);

        let Some(bytes) = self.data.get(start..).and_then(|tail| tail.get(..span)) else {
            return Err(self.exhausted(span));
        };

        let mut scratch = [0u8; 8];
        scratch[..span].copy_from_slice(bytes);
        let value = (u64::from_be_bytes(scratch) << bit_pos) >> (64 - u32::from(bits));

        self.bit_offset += usize::from(bits);
        Ok(value)
    }

    /// Skip to the next byte boundary, where the next row begins.
    #[inline(always)]
    pub(crate) fn align(&mut self) {
        self.bit_offset = self.bit_offset.next_multiple_of(8);
    }

    pub(crate) fn byte_pos(&self) -> usize {
        self.bit_offset >> 3
    }

    #[cold]
    fn exhausted(&self, needed: usize) -> PhotometricError {
        PhotometricError::CorruptData {
            channel: self.channel,
            offset: self.byte_pos(),
            needed,
            available: self.data.len(),
        }
    }
}

/// A strategy for reading the sample of a channel.
pub(crate) trait Extract: Copy + Send + Sync + 'static {
    fn extract<E: Endian>(&self, cursor: &mut Cursor<'_>, channel: usize) -> PhotometricResult<u64>;

    /// The depth of a channel in bits.
    fn bits(&self, channel: usize) -> usize;
}

/// Samples of `N` whole bytes in the byte order of the file.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Whole<const N: usize>;

impl<const N: usize> Extract for Whole<N> {
    #[inline(always)]
    fn extract<E: Endian>(&self, cursor: &mut Cursor<'_>, _: usize) -> PhotometricResult<u64> {
        cursor.read_bytes::<N>().map(E::assemble::<N>)
    }

    fn bits(&self, _: usize) -> usize {
        N * 8
    }
}

/// Bit-packed samples, each channel with its own depth.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Packed {
    pub(crate) bits: [u8; crate::decoder::MAX_CHANNELS],
}

impl Extract for Packed {
    #[inline(always)]
    fn extract<E: Endian>(
        &self,
        cursor: &mut Cursor<'_>,
        channel: usize,
    ) -> PhotometricResult<u64> {
        cursor.read_bits(self.bits[channel])
    }

    fn bits(&self, channel: usize) -> usize {
        self.bits.get(channel).copied().map_or(0, usize::from)
    }
}
