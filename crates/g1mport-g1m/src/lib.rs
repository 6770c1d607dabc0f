//! G1M model container reader and writer.
//!
//! G1M files hold skinned models as a sequence of chunks. This crate parses
//! the two chunks needed to re-import geometry and keeps every other chunk
//! as opaque bytes so a saved file differs from the original only where
//! geometry was replaced.
//!
//! # File Format
//!
//! All values are little-endian.
//!
//! - 24-byte header: magic `_M1G`, version, file size, header size,
//!   reserved, chunk count
//! - Chunks, each with a 12-byte header (magic, version, size including header)
//!   - `SM1G` ([`Skeleton`]): bone-ID table and bone records
//!   - `GM1G` ([`Geometry`]): vertex buffers, joint palettes, index buffers,
//!     submeshes and other sections
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use g1mport_g1m::G1mFile;
//!
//! let mut g1m = G1mFile::load("CHAR_COS_001.g1m")?;
//! println!("{} bones, {} submeshes", g1m.bone_count(), g1m.submesh_count());
//!
//! g1m.import_submesh(0, Path::new("0.vb"), Path::new("0.ib"), None)?;
//! g1m.save("CHAR_COS_001.g1m")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
mod geometry;
mod header;
mod import;
mod names;
mod skeleton;
mod vgmap;

pub use error::{Error, Result};
pub use file::{Chunk, G1mFile, RawChunk};
pub use geometry::{
    Geometry, IndexBuffer, IndexFormat, Joint, JointPalette, RawSection, Section, Submesh,
    VertexBuffer,
};
pub use header::{ChunkHeader, G1mHeader};
pub use import::MAX_PALETTE_SLOT;
pub use names::{default_bone_name, parse_oid, OidEntry};
pub use skeleton::{Bone, Skeleton, NO_BONE};
pub use vgmap::VertexGroupMap;

/// G1M file magic as stored in little-endian files.
pub const G1M_MAGIC: &[u8; 4] = b"_M1G";

/// Skeleton chunk magic (`G1MS` reversed).
pub const SKELETON_MAGIC: &[u8; 4] = b"SM1G";

/// Geometry chunk magic (`G1MG` reversed).
pub const GEOMETRY_MAGIC: &[u8; 4] = b"GM1G";
