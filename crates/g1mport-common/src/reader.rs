//! Bounds-checked little-endian cursor over a borrowed buffer.
//!
//! G1M chunks are parsed straight out of the loaded file. Every read checks
//! the remaining length and reports the shortfall as
//! [`Error::UnexpectedEof`] so truncated models fail cleanly.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// Read cursor over a byte slice.
///
/// # Example
///
/// ```
/// use g1mport_common::BinaryReader;
///
/// let chunk = [b'S', b'M', b'1', b'G', 0x10, 0x00, 0x00, 0x00];
/// let mut reader = BinaryReader::new(&chunk);
///
/// assert_eq!(reader.read_array::<4>().unwrap(), *b"SM1G");
/// assert_eq!(reader.read_u32().unwrap(), 16);
/// assert_eq!(reader.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self::new_at(data, 0)
    }

    /// Start reading at `position`, e.g. just past a chunk header.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    /// Offset of the next read from the start of the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the cursor (zero once it has moved past the end).
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Jump to an absolute offset. Out-of-range offsets fail on the next read.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Skip padding or fields that are not interpreted.
    #[inline]
    pub fn advance(&mut self, count: usize) {
        self.position = self.position.saturating_add(count);
    }

    /// Borrow the next `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self
            .data
            .get(self.position..)
            .and_then(|rest| rest.get(..count))
            .ok_or(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            })?;

        self.position += count;
        Ok(bytes)
    }

    /// Copy the next `N` bytes, e.g. a magic or version tag.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_array().map(f32::from_le_bytes)
    }

    /// Copy out a fixed-layout record (header, bone, submesh, ...).
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }
}
