//! Binary writer for serializing into a byte buffer.

use byteorder::{LittleEndian, WriteBytesExt};
use zerocopy::{Immutable, IntoBytes};

use crate::{Error, Result};

/// A little-endian writer appending to an owned buffer.
///
/// Writes into a `Vec<u8>` cannot fail, so the primitive writers are
/// infallible. Size fields that are only known after a block is written
/// are reserved with [`BinaryWriter::reserve_u32`] and filled in with
/// [`BinaryWriter::patch_u32`].
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
    data: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.data.len()
    }

    /// Consume the writer and return the buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write a little-endian u16.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        // Vec<u8> writes are infallible
        let _ = self.data.write_u16::<LittleEndian>(value);
    }

    /// Write a little-endian u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        let _ = self.data.write_u32::<LittleEndian>(value);
    }

    /// Write a little-endian f32.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        let _ = self.data.write_f32::<LittleEndian>(value);
    }

    /// Write a `usize` as a u32 field.
    pub fn write_len_u32(&mut self, value: usize) -> Result<()> {
        let value = u32::try_from(value).map_err(|_| Error::Overflow {
            value: value as u64,
            bits: 32,
        })?;
        self.write_u32(value);
        Ok(())
    }

    /// Write a struct using zerocopy.
    #[inline]
    pub fn write_struct<T: IntoBytes + Immutable>(&mut self, value: &T) {
        self.data.extend_from_slice(value.as_bytes());
    }

    /// Pad with zeros until the position is a multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) {
        let rem = self.data.len() % alignment;
        if rem != 0 {
            self.data.resize(self.data.len() + alignment - rem, 0);
        }
    }

    /// Reserve a u32 slot and return its offset for a later patch.
    pub fn reserve_u32(&mut self) -> usize {
        let offset = self.data.len();
        self.write_u32(0);
        offset
    }

    /// Overwrite a previously reserved u32 slot.
    pub fn patch_u32(&mut self, offset: usize, value: usize) -> Result<()> {
        let value = u32::try_from(value).map_err(|_| Error::Overflow {
            value: value as u64,
            bits: 32,
        })?;
        self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }
}
