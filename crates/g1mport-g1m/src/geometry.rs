//! Geometry chunk (G1MG).
//!
//! The chunk body is a short header followed by typed sections. Four section
//! kinds are decoded because submesh import touches them; everything else is
//! kept as raw bytes and written back unchanged.

use g1mport_common::{BinaryReader, BinaryWriter};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::file::write_chunk;
use crate::header::ChunkHeader;
use crate::{Error, Result, GEOMETRY_MAGIC};

/// Section kind for vertex buffers.
pub const SECTION_VERTEX_BUFFERS: u32 = 0x0001_0004;
/// Section kind for joint palettes.
pub const SECTION_JOINT_PALETTES: u32 = 0x0001_0006;
/// Section kind for index buffers.
pub const SECTION_INDEX_BUFFERS: u32 = 0x0001_0007;
/// Section kind for submeshes.
pub const SECTION_SUBMESHES: u32 = 0x0001_0008;

const SECTION_HEADER_SIZE: usize = 12;

/// A vertex buffer.
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    /// Unknown, preserved.
    pub unknown: u32,
    /// Bytes per vertex.
    pub stride: u32,
    /// Usage flags, preserved.
    pub flags: u32,
    /// Raw vertex data.
    pub data: Vec<u8>,
}

impl VertexBuffer {
    /// Create a vertex buffer from raw data.
    pub fn new(stride: u32, data: Vec<u8>) -> Self {
        Self {
            unknown: 0,
            stride,
            flags: 0,
            data,
        }
    }

    /// Number of whole vertices in the buffer.
    pub fn vertex_count(&self) -> usize {
        match self.stride {
            0 => 0,
            stride => self.data.len() / stride as usize,
        }
    }

    fn parse(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let unknown = reader.read_u32()?;
        let stride = reader.read_u32()?;
        let count = reader.read_u32()?;
        let flags = reader.read_u32()?;
        let len = (stride as usize)
            .checked_mul(count as usize)
            .ok_or_else(|| Error::InvalidHeader(format!("vertex buffer {stride} x {count}")))?;
        let data = reader.read_bytes(len)?.to_vec();
        Ok(Self {
            unknown,
            stride,
            flags,
            data,
        })
    }

    fn write(&self, w: &mut BinaryWriter) -> Result<()> {
        w.write_u32(self.unknown);
        w.write_u32(self.stride);
        w.write_len_u32(self.vertex_count())?;
        w.write_u32(self.flags);
        w.write_bytes(&self.data);
        Ok(())
    }
}

/// Element type of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// 8-bit indices.
    U8,
    /// 16-bit indices.
    U16,
    /// 32-bit indices.
    U32,
}

impl IndexFormat {
    /// Decode the on-disk format tag.
    pub fn from_raw(value: u32) -> Result<Self> {
        match value {
            0x08 => Ok(Self::U8),
            0x10 => Ok(Self::U16),
            0x20 => Ok(Self::U32),
            other => Err(Error::UnsupportedIndexFormat(other)),
        }
    }

    /// The on-disk format tag.
    pub const fn raw(self) -> u32 {
        match self {
            Self::U8 => 0x08,
            Self::U16 => 0x10,
            Self::U32 => 0x20,
        }
    }

    /// Bytes per index.
    pub const fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

/// An index buffer.
#[derive(Debug, Clone)]
pub struct IndexBuffer {
    /// Element type.
    pub format: IndexFormat,
    /// Reserved, preserved.
    pub reserved: u32,
    /// Raw index data (without padding).
    pub data: Vec<u8>,
}

impl IndexBuffer {
    /// Create an index buffer from raw data.
    pub fn new(format: IndexFormat, data: Vec<u8>) -> Self {
        Self {
            format,
            reserved: 0,
            data,
        }
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.data.len() / self.format.width()
    }

    /// Decode the indices.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        decode_indices(self.format, &self.data)
    }

    fn padding(len: usize) -> usize {
        (4 - len % 4) % 4
    }

    fn parse(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let count = reader.read_u32()? as usize;
        let format = IndexFormat::from_raw(reader.read_u32()?)?;
        let reserved = reader.read_u32()?;
        let len = count * format.width();
        let data = reader.read_bytes(len)?.to_vec();
        reader.advance(Self::padding(len));
        Ok(Self {
            format,
            reserved,
            data,
        })
    }

    fn write(&self, w: &mut BinaryWriter) -> Result<()> {
        w.write_len_u32(self.index_count())?;
        w.write_u32(self.format.raw());
        w.write_u32(self.reserved);
        w.write_bytes(&self.data);
        w.write_bytes(&[0u8; 3][..Self::padding(self.data.len())]);
        Ok(())
    }
}

/// Decode raw index data of the given format.
pub(crate) fn decode_indices(format: IndexFormat, data: &[u8]) -> impl Iterator<Item = u32> + '_ {
    data.chunks_exact(format.width()).map(move |c| match format {
        IndexFormat::U8 => c[0] as u32,
        IndexFormat::U16 => u16::from_le_bytes([c[0], c[1]]) as u32,
        IndexFormat::U32 => u32::from_le_bytes([c[0], c[1], c[2], c[3]]),
    })
}

/// A joint palette entry.
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct Joint {
    /// Local skeleton bone index.
    pub bone: u32,
    /// Cloth bone index.
    pub cloth: u32,
    /// Physics joint index (high bit flags physics-driven joints).
    pub physics: u32,
}

/// Maps the bone slots a submesh's vertices use to skeleton bones.
#[derive(Debug, Clone, Default)]
pub struct JointPalette {
    /// Palette entries, indexed by vertex blend index.
    pub joints: Vec<Joint>,
}

impl JointPalette {
    fn parse(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let count = reader.read_u32()?;
        let mut joints = Vec::with_capacity(count as usize);
        for _ in 0..count {
            joints.push(reader.read_struct::<Joint>()?);
        }
        Ok(Self { joints })
    }

    fn write(&self, w: &mut BinaryWriter) -> Result<()> {
        w.write_len_u32(self.joints.len())?;
        for joint in &self.joints {
            w.write_struct(joint);
        }
        Ok(())
    }
}

/// A submesh record.
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct Submesh {
    pub flags: u32,
    pub vertex_buffer_index: u32,
    pub joint_palette_index: u32,
    pub material_palette_index: u32,
    pub unknown_0: u32,
    pub material_index: u32,
    pub attribute_index: u32,
    pub index_buffer_index: u32,
    pub unknown_1: u32,
    pub primitive_type: u32,
    pub vertex_offset: u32,
    pub vertex_count: u32,
    pub index_offset: u32,
    pub index_count: u32,
}

/// A section kept as raw bytes.
#[derive(Debug, Clone)]
pub struct RawSection {
    pub kind: u32,
    pub count: u32,
    pub data: Vec<u8>,
}

/// A geometry section.
#[derive(Debug, Clone)]
pub enum Section {
    VertexBuffers(Vec<VertexBuffer>),
    JointPalettes(Vec<JointPalette>),
    IndexBuffers(Vec<IndexBuffer>),
    Submeshes(Vec<Submesh>),
    Raw(RawSection),
}

impl Section {
    /// On-disk kind tag.
    pub fn kind(&self) -> u32 {
        match self {
            Section::VertexBuffers(_) => SECTION_VERTEX_BUFFERS,
            Section::JointPalettes(_) => SECTION_JOINT_PALETTES,
            Section::IndexBuffers(_) => SECTION_INDEX_BUFFERS,
            Section::Submeshes(_) => SECTION_SUBMESHES,
            Section::Raw(raw) => raw.kind,
        }
    }

    fn parse(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let kind = reader.read_u32()?;
        let size = reader.read_u32()? as usize;
        let count = reader.read_u32()?;

        if size < SECTION_HEADER_SIZE {
            return Err(Error::SectionSize {
                kind,
                expected: size,
                actual: SECTION_HEADER_SIZE,
            });
        }

        let body = reader.read_bytes(size - SECTION_HEADER_SIZE)?;
        let mut r = BinaryReader::new(body);

        let section = match kind {
            SECTION_VERTEX_BUFFERS => {
                Section::VertexBuffers(parse_entries(&mut r, count, VertexBuffer::parse)?)
            }
            SECTION_JOINT_PALETTES => {
                Section::JointPalettes(parse_entries(&mut r, count, JointPalette::parse)?)
            }
            SECTION_INDEX_BUFFERS => {
                Section::IndexBuffers(parse_entries(&mut r, count, IndexBuffer::parse)?)
            }
            SECTION_SUBMESHES => Section::Submeshes(parse_entries(&mut r, count, |r| {
                Ok(r.read_struct::<Submesh>()?)
            })?),
            _ => {
                return Ok(Section::Raw(RawSection {
                    kind,
                    count,
                    data: body.to_vec(),
                }))
            }
        };

        if r.position() != body.len() {
            return Err(Error::SectionSize {
                kind,
                expected: body.len(),
                actual: r.position(),
            });
        }

        Ok(section)
    }

    fn write(&self, w: &mut BinaryWriter) -> Result<()> {
        let start = w.position();
        w.write_u32(self.kind());
        let size_slot = w.reserve_u32();

        match self {
            Section::VertexBuffers(buffers) => write_entries(w, buffers, VertexBuffer::write)?,
            Section::JointPalettes(palettes) => write_entries(w, palettes, JointPalette::write)?,
            Section::IndexBuffers(buffers) => write_entries(w, buffers, IndexBuffer::write)?,
            Section::Submeshes(submeshes) => write_entries(w, submeshes, |s, w| {
                w.write_struct(s);
                Ok(())
            })?,
            Section::Raw(raw) => {
                w.write_u32(raw.count);
                w.write_bytes(&raw.data);
            }
        }

        w.patch_u32(size_slot, w.position() - start)?;
        Ok(())
    }
}

fn parse_entries<'a, T>(
    reader: &mut BinaryReader<'a>,
    count: u32,
    parse: impl Fn(&mut BinaryReader<'a>) -> Result<T>,
) -> Result<Vec<T>> {
    // Count comes from the file; let the reads fail instead of preallocating
    let mut entries = Vec::with_capacity((count as usize).min(reader.remaining()));
    for _ in 0..count {
        entries.push(parse(reader)?);
    }
    Ok(entries)
}

fn write_entries<T>(
    w: &mut BinaryWriter,
    entries: &[T],
    write: impl Fn(&T, &mut BinaryWriter) -> Result<()>,
) -> Result<()> {
    w.write_len_u32(entries.len())?;
    for entry in entries {
        write(entry, w)?;
    }
    Ok(())
}

/// Parsed geometry chunk.
#[derive(Debug, Clone)]
pub struct Geometry {
    version: [u8; 4],
    platform: [u8; 4],
    reserved: u32,
    bounds: [f32; 6],
    sections: Vec<Section>,
}

impl Geometry {
    /// Chunk version written for newly built geometry.
    pub const DEFAULT_VERSION: [u8; 4] = *b"4400";

    /// Build a geometry chunk from sections.
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            version: Self::DEFAULT_VERSION,
            platform: *b"DX1\0",
            reserved: 0,
            bounds: [0.0; 6],
            sections,
        }
    }

    /// Parse geometry from a full chunk (header included).
    pub(crate) fn parse(version: [u8; 4], chunk: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new_at(chunk, ChunkHeader::SIZE);

        let platform = reader.read_array::<4>()?;
        let reserved = reader.read_u32()?;
        let mut bounds = [0.0f32; 6];
        for value in &mut bounds {
            *value = reader.read_f32()?;
        }
        let section_count = reader.read_u32()?;

        let sections = parse_entries(&mut reader, section_count, Section::parse)?;

        Ok(Self {
            version,
            platform,
            reserved,
            bounds,
            sections,
        })
    }

    /// Serialize as a full chunk.
    pub(crate) fn write(&self, writer: &mut BinaryWriter) -> Result<()> {
        write_chunk(writer, GEOMETRY_MAGIC, self.version, |w, _| {
            w.write_bytes(&self.platform);
            w.write_u32(self.reserved);
            for &value in &self.bounds {
                w.write_f32(value);
            }
            w.write_len_u32(self.sections.len())?;
            for section in &self.sections {
                section.write(w)?;
            }
            Ok(())
        })
    }

    /// All sections in file order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Model bounding box (min xyz, max xyz).
    pub fn bounds(&self) -> [f32; 6] {
        self.bounds
    }

    pub fn vertex_buffers(&self) -> &[VertexBuffer] {
        self.sections
            .iter()
            .find_map(|s| match s {
                Section::VertexBuffers(v) => Some(v.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn vertex_buffers_mut(&mut self) -> &mut [VertexBuffer] {
        self.sections
            .iter_mut()
            .find_map(|s| match s {
                Section::VertexBuffers(v) => Some(v.as_mut_slice()),
                _ => None,
            })
            .unwrap_or(&mut [])
    }

    pub fn joint_palettes(&self) -> &[JointPalette] {
        self.sections
            .iter()
            .find_map(|s| match s {
                Section::JointPalettes(v) => Some(v.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn joint_palettes_mut(&mut self) -> &mut [JointPalette] {
        self.sections
            .iter_mut()
            .find_map(|s| match s {
                Section::JointPalettes(v) => Some(v.as_mut_slice()),
                _ => None,
            })
            .unwrap_or(&mut [])
    }

    pub fn index_buffers(&self) -> &[IndexBuffer] {
        self.sections
            .iter()
            .find_map(|s| match s {
                Section::IndexBuffers(v) => Some(v.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn index_buffers_mut(&mut self) -> &mut [IndexBuffer] {
        self.sections
            .iter_mut()
            .find_map(|s| match s {
                Section::IndexBuffers(v) => Some(v.as_mut_slice()),
                _ => None,
            })
            .unwrap_or(&mut [])
    }

    pub fn submeshes(&self) -> &[Submesh] {
        self.sections
            .iter()
            .find_map(|s| match s {
                Section::Submeshes(v) => Some(v.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn submeshes_mut(&mut self) -> &mut [Submesh] {
        self.sections
            .iter_mut()
            .find_map(|s| match s {
                Section::Submeshes(v) => Some(v.as_mut_slice()),
                _ => None,
            })
            .unwrap_or(&mut [])
    }
}
