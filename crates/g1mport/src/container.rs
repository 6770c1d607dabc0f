//! The model container seam.

use std::path::Path;

use g1mport_g1m::G1mFile;

use crate::BoneIdRange;

/// Operations the re-import run needs from a model file.
///
/// Parsing and serializing the format, and interpreting buffer files, are
/// the implementation's business; the run only decides what to call and
/// in which order.
pub trait ModelContainer: Sized {
    /// Error reported by the implementation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a container from disk.
    fn load(path: &Path) -> Result<Self, Self::Error>;

    /// Number of bones.
    fn bone_count(&self) -> usize;

    /// Declared bone-ID range, used for classification.
    fn bone_id_range(&self) -> BoneIdRange;

    /// Number of submesh slots.
    fn submesh_count(&self) -> usize;

    /// Current bone-name table.
    fn bone_names(&self) -> &[String];

    /// The deterministic default name table (one name per bone).
    fn default_bone_names(&self) -> Vec<String>;

    /// Build a full name table from name-database text.
    fn parse_bone_names(&self, text: &str) -> Result<Vec<String>, Self::Error>;

    /// Replace the bone-name table.
    fn set_bone_names(&mut self, names: Vec<String>) -> Result<(), Self::Error>;

    /// Replace one submesh's geometry with buffer files.
    fn import_submesh(
        &mut self,
        index: usize,
        vertex_buffer: &Path,
        index_buffer: &Path,
        group_map: Option<&Path>,
    ) -> Result<(), Self::Error>;

    /// Write the container to `path`, replacing it.
    fn save(&self, path: &Path) -> Result<(), Self::Error>;
}

impl ModelContainer for G1mFile {
    type Error = g1mport_g1m::Error;

    fn load(path: &Path) -> Result<Self, Self::Error> {
        G1mFile::load(path)
    }

    fn bone_count(&self) -> usize {
        G1mFile::bone_count(self)
    }

    /// G1MS only declares the length of its bone-ID table, so the range is
    /// that length at both ends.
    fn bone_id_range(&self) -> BoneIdRange {
        let extent = u32::try_from(self.bone_id_count()).unwrap_or(u32::MAX);
        BoneIdRange::new(extent, extent)
    }

    fn submesh_count(&self) -> usize {
        G1mFile::submesh_count(self)
    }

    fn bone_names(&self) -> &[String] {
        G1mFile::bone_names(self)
    }

    fn default_bone_names(&self) -> Vec<String> {
        G1mFile::default_bone_names(self)
    }

    fn parse_bone_names(&self, text: &str) -> Result<Vec<String>, Self::Error> {
        self.bone_names_from_oid(text)
    }

    fn set_bone_names(&mut self, names: Vec<String>) -> Result<(), Self::Error> {
        G1mFile::set_bone_names(self, names)
    }

    fn import_submesh(
        &mut self,
        index: usize,
        vertex_buffer: &Path,
        index_buffer: &Path,
        group_map: Option<&Path>,
    ) -> Result<(), Self::Error> {
        G1mFile::import_submesh(self, index, vertex_buffer, index_buffer, group_map)
    }

    fn save(&self, path: &Path) -> Result<(), Self::Error> {
        G1mFile::save(self, path)
    }
}
