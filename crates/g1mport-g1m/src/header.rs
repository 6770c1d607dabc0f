//! G1M file and chunk header structures.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// G1M file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct G1mHeader {
    /// Magic bytes (`_M1G`).
    pub magic: [u8; 4],
    /// ASCII version, stored reversed (e.g. `7300` for 0037).
    pub version: [u8; 4],
    /// Total file size in bytes.
    pub file_size: u32,
    /// Offset of the first chunk.
    pub header_size: u32,
    /// Reserved.
    pub reserved: u32,
    /// Number of chunks.
    pub chunk_count: u32,
}

impl G1mHeader {
    /// Size of the header on disk.
    pub const SIZE: usize = 24;
}

/// Header preceding every chunk.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct ChunkHeader {
    /// Chunk magic (e.g. `SM1G`).
    pub magic: [u8; 4],
    /// ASCII chunk version.
    pub version: [u8; 4],
    /// Chunk size including this header.
    pub size: u32,
}

impl ChunkHeader {
    /// Size of the chunk header on disk.
    pub const SIZE: usize = 12;
}
