//! G1M file handling.

use std::fs;
use std::path::Path;

use g1mport_common::{BinaryReader, BinaryWriter};

use crate::header::{ChunkHeader, G1mHeader};
use crate::names::default_bone_names;
use crate::{Error, Geometry, Result, Skeleton, G1M_MAGIC, GEOMETRY_MAGIC, SKELETON_MAGIC};

/// A chunk this crate does not interpret.
#[derive(Debug, Clone)]
pub struct RawChunk {
    /// Chunk magic.
    pub magic: [u8; 4],
    /// Chunk version.
    pub version: [u8; 4],
    /// Chunk body (without the 12-byte header).
    pub data: Vec<u8>,
}

/// A top-level G1M chunk.
#[derive(Debug, Clone)]
pub enum Chunk {
    Skeleton(Skeleton),
    Geometry(Geometry),
    Raw(RawChunk),
}

/// A G1M model file.
///
/// Besides the chunks, the file carries an in-memory bone-name table (one
/// name per skeleton bone). Names are not part of the G1M format; they come
/// from companion OID tables and are used to resolve vgmap bone names during
/// submesh import.
#[derive(Debug, Clone)]
pub struct G1mFile {
    version: [u8; 4],
    reserved: u32,
    chunks: Vec<Chunk>,
    /// Index of the first skeleton chunk.
    skeleton: Option<usize>,
    /// Index of the first geometry chunk.
    geometry: usize,
    pub(crate) bone_names: Vec<String>,
}

impl G1mFile {
    /// Version written for newly built files.
    pub const DEFAULT_VERSION: [u8; 4] = *b"7300";

    /// Build a file from a skeleton and geometry.
    pub fn new(skeleton: Option<Skeleton>, geometry: Geometry) -> Self {
        let bone_names = default_bone_names(skeleton.as_ref());
        let mut chunks = Vec::with_capacity(2);
        let skeleton = skeleton.map(|skeleton| {
            chunks.push(Chunk::Skeleton(skeleton));
            0
        });
        chunks.push(Chunk::Geometry(geometry));

        Self {
            version: Self::DEFAULT_VERSION,
            reserved: 0,
            geometry: chunks.len() - 1,
            chunks,
            skeleton,
            bone_names,
        }
    }

    fn from_chunks(version: [u8; 4], reserved: u32, chunks: Vec<Chunk>) -> Result<Self> {
        let skeleton = chunks.iter().position(|c| matches!(c, Chunk::Skeleton(_)));
        let geometry = chunks
            .iter()
            .position(|c| matches!(c, Chunk::Geometry(_)))
            .ok_or(Error::MissingChunk("G1MG"))?;

        let mut file = Self {
            version,
            reserved,
            chunks,
            skeleton,
            geometry,
            bone_names: Vec::new(),
        };
        file.bone_names = default_bone_names(file.skeleton());
        Ok(file)
    }

    /// Read a G1M file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Parse a G1M file from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let header: G1mHeader = reader.read_struct()?;

        let magic = header.magic;
        if &magic != G1M_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let header_size = header.header_size as usize;
        if header_size < G1mHeader::SIZE || header_size > data.len() {
            return Err(Error::InvalidHeader(format!(
                "header size {} out of range",
                header_size
            )));
        }

        reader.seek(header_size);
        let mut chunks =
            Vec::with_capacity((header.chunk_count as usize).min(data.len() / ChunkHeader::SIZE));

        for _ in 0..header.chunk_count {
            let offset = reader.position();
            let chunk_header: ChunkHeader = reader.read_struct()?;
            let magic = chunk_header.magic;
            let version = chunk_header.version;
            let size = chunk_header.size as usize;

            if size < ChunkHeader::SIZE {
                return Err(Error::ChunkSize {
                    magic,
                    offset,
                    size,
                });
            }

            let body = reader.read_bytes(size - ChunkHeader::SIZE)?;
            let whole = &data[offset..offset + size];

            let chunk = match &magic {
                SKELETON_MAGIC => Chunk::Skeleton(Skeleton::parse(version, whole)?),
                GEOMETRY_MAGIC => Chunk::Geometry(Geometry::parse(version, whole)?),
                _ => Chunk::Raw(RawChunk {
                    magic,
                    version,
                    data: body.to_vec(),
                }),
            };
            chunks.push(chunk);
        }

        Self::from_chunks(header.version, header.reserved, chunks)
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::with_capacity(64 * 1024);

        writer.write_bytes(G1M_MAGIC);
        writer.write_bytes(&self.version);
        let size_slot = writer.reserve_u32();
        writer.write_len_u32(G1mHeader::SIZE)?;
        writer.write_u32(self.reserved);
        writer.write_len_u32(self.chunks.len())?;

        for chunk in &self.chunks {
            match chunk {
                Chunk::Skeleton(skeleton) => skeleton.write(&mut writer)?,
                Chunk::Geometry(geometry) => geometry.write(&mut writer)?,
                Chunk::Raw(raw) => write_chunk(&mut writer, &raw.magic, raw.version, |w, _| {
                    w.write_bytes(&raw.data);
                    Ok(())
                })?,
            }
        }

        let total = writer.position();
        writer.patch_u32(size_slot, total)?;
        Ok(writer.into_inner())
    }

    /// Write the file to disk, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// All chunks in file order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The first skeleton chunk, if any.
    pub fn skeleton(&self) -> Option<&Skeleton> {
        match self.skeleton.map(|i| &self.chunks[i]) {
            Some(Chunk::Skeleton(skeleton)) => Some(skeleton),
            _ => None,
        }
    }

    /// The first geometry chunk.
    pub fn geometry(&self) -> &Geometry {
        match &self.chunks[self.geometry] {
            Chunk::Geometry(geometry) => geometry,
            _ => unreachable!("geometry index always points at a geometry chunk"),
        }
    }

    pub(crate) fn geometry_mut(&mut self) -> &mut Geometry {
        match &mut self.chunks[self.geometry] {
            Chunk::Geometry(geometry) => geometry,
            _ => unreachable!("geometry index always points at a geometry chunk"),
        }
    }

    /// Number of bones in the skeleton (0 without one).
    pub fn bone_count(&self) -> usize {
        self.skeleton().map_or(0, Skeleton::bone_count)
    }

    /// Declared length of the bone-ID table (0 without a skeleton).
    pub fn bone_id_count(&self) -> usize {
        self.skeleton().map_or(0, Skeleton::id_count)
    }

    /// Number of submeshes.
    pub fn submesh_count(&self) -> usize {
        self.geometry().submeshes().len()
    }
}

/// Write a chunk header, the body produced by `body`, then patch the size.
///
/// `body` receives the writer and the chunk's start offset.
pub(crate) fn write_chunk<F>(
    writer: &mut BinaryWriter,
    magic: &[u8; 4],
    version: [u8; 4],
    body: F,
) -> Result<()>
where
    F: FnOnce(&mut BinaryWriter, usize) -> Result<()>,
{
    let start = writer.position();
    writer.write_bytes(magic);
    writer.write_bytes(&version);
    let size_slot = writer.reserve_u32();

    body(writer, start)?;

    let size = writer.position() - start;
    writer.patch_u32(size_slot, size)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bone, IndexBuffer, IndexFormat, Section, Submesh, VertexBuffer};

    fn sample() -> G1mFile {
        let skeleton = Skeleton::new(vec![Bone::new(-1), Bone::new(0)], vec![1, 0]).unwrap();
        let geometry = Geometry::new(vec![
            Section::VertexBuffers(vec![VertexBuffer::new(4, vec![0; 12])]),
            Section::IndexBuffers(vec![IndexBuffer::new(IndexFormat::U16, vec![0, 0, 1, 0, 2, 0])]),
            Section::Submeshes(vec![Submesh::default()]),
        ]);
        G1mFile::new(Some(skeleton), geometry)
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = sample().to_bytes().unwrap();
        bytes[..4].copy_from_slice(b"G1M_");
        assert!(matches!(
            G1mFile::parse(&bytes),
            Err(Error::InvalidMagic(magic)) if &magic == b"G1M_"
        ));
    }

    #[test]
    fn test_requires_geometry() {
        let mut writer = BinaryWriter::new();
        writer.write_bytes(G1M_MAGIC);
        writer.write_bytes(&G1mFile::DEFAULT_VERSION);
        writer.write_u32(24);
        writer.write_u32(24);
        writer.write_u32(0);
        writer.write_u32(0);

        assert!(matches!(
            G1mFile::parse(&writer.into_inner()),
            Err(Error::MissingChunk("G1MG"))
        ));
    }

    #[test]
    fn test_raw_chunks_are_preserved() {
        let mut g1m = sample();
        g1m.chunks.insert(
            0,
            Chunk::Raw(RawChunk {
                magic: *b"FM1G",
                version: *b"3400",
                data: vec![1, 2, 3, 4, 5, 6, 7, 8],
            }),
        );
        let g1m = G1mFile::from_chunks(g1m.version, 0, g1m.chunks).unwrap();

        let bytes = g1m.to_bytes().unwrap();
        assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize, bytes.len());

        let parsed = G1mFile::parse(&bytes).unwrap();
        assert_eq!(parsed.chunks().len(), 3);
        match &parsed.chunks()[0] {
            Chunk::Raw(raw) => {
                assert_eq!(&raw.magic, b"FM1G");
                assert_eq!(raw.data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
            }
            other => panic!("unexpected chunk: {:?}", other),
        }
        assert_eq!(parsed.bone_count(), 2);
        assert_eq!(parsed.bone_id_count(), 2);
        assert_eq!(parsed.submesh_count(), 1);
        assert_eq!(parsed.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.g1m");

        sample().save(&path).unwrap();
        let loaded = G1mFile::load(&path).unwrap();
        assert_eq!(loaded.bone_names(), &["bone_1", "bone_0"]);
    }
}
