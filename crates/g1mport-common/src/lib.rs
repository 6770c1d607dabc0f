//! Common utilities for g1mport.
//!
//! This crate provides the low-level pieces shared by the g1mport crates:
//!
//! - [`BinaryReader`] - Zero-copy little-endian reading from byte slices
//! - [`BinaryWriter`] - Little-endian writing into a growable buffer
//! - [`contains_nul`] - Fast zero-byte scan used to tell text tables from binary data

mod error;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Check whether a byte slice contains a zero byte.
///
/// Uses memchr's SIMD search, so scanning large files stays cheap.
#[inline]
pub fn contains_nul(data: &[u8]) -> bool {
    memchr::memchr(0, data).is_some()
}
