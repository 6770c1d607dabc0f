//! Error types for G1M parsing, import and writing.

use thiserror::Error;

/// Errors that can occur when working with G1M files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] g1mport_common::Error),

    /// Invalid file magic.
    #[error("invalid G1M magic: expected '_M1G', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Invalid file header.
    #[error("invalid G1M header: {0}")]
    InvalidHeader(String),

    /// A chunk declares a size that cannot hold its own header.
    #[error("chunk {magic:?} at offset {offset} has invalid size {size}")]
    ChunkSize {
        magic: [u8; 4],
        offset: usize,
        size: usize,
    },

    /// A required chunk is missing.
    #[error("missing {0} chunk")]
    MissingChunk(&'static str),

    /// A section body did not match its declared size.
    #[error("section {kind:#010x}: declared {expected} bytes, parsed {actual}")]
    SectionSize {
        kind: u32,
        expected: usize,
        actual: usize,
    },

    /// Index buffer format that this tool does not handle.
    #[error("unsupported index format {0:#x}")]
    UnsupportedIndexFormat(u32),

    /// The bone-ID table points past the bone list.
    #[error("bone ID {id} maps to bone {index}, but the skeleton has {bone_count} bones")]
    InvalidBoneId {
        id: usize,
        index: u16,
        bone_count: usize,
    },

    /// A name table did not name any bone of this model.
    #[error("name table does not name any bone of this model")]
    NoBoneNames,

    /// A replacement name table has the wrong length.
    #[error("bone name table has {actual} entries, model has {expected} bones")]
    BoneNameCount { expected: usize, actual: usize },

    /// Submesh index past the submesh list.
    #[error("submesh {index} out of range (model has {count} submeshes)")]
    SubmeshOutOfRange { index: usize, count: usize },

    /// A submesh references a buffer that does not exist.
    #[error("submesh references missing {kind} {index}")]
    BufferOutOfRange { kind: &'static str, index: usize },

    /// A buffer is used by more than one submesh and cannot be replaced in place.
    #[error("{kind} {index} is shared with submesh {other}")]
    SharedBuffer {
        kind: &'static str,
        index: usize,
        other: usize,
    },

    /// Imported buffer length is not a multiple of its element size.
    #[error("{kind} data is {len} bytes, not a multiple of {unit}")]
    BufferSize {
        kind: &'static str,
        len: usize,
        unit: usize,
    },

    /// Imported buffer is empty.
    #[error("{0} data is empty")]
    EmptyBuffer(&'static str),

    /// An index references a vertex past the imported vertex buffer.
    #[error("index {value} at position {position} exceeds vertex count {vertex_count}")]
    IndexOutOfRange {
        value: u32,
        position: usize,
        vertex_count: usize,
    },

    /// A vgmap names a bone that is not in the bone-name table.
    #[error("vgmap references unknown bone '{0}'")]
    UnknownBone(String),

    /// A vgmap slot lies outside the blend-index range.
    #[error("vgmap slot {slot} for bone '{bone}' exceeds the palette limit of {max}")]
    PaletteSlot { bone: String, slot: u32, max: usize },

    /// Malformed vgmap file.
    #[error("invalid vgmap: {0}")]
    Vgmap(#[from] serde_json::Error),
}

/// Result type for G1M operations.
pub type Result<T> = std::result::Result<T, Error>;
