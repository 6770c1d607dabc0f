//! Skeleton chunk (G1MS).
//!
//! The skeleton stores its bones as a flat list plus a bone-ID table. The
//! table is indexed by the game's global bone ID and holds the local bone
//! index, or [`NO_BONE`] for IDs this model does not use. Its length is the
//! declared extent of the model's ID space, which differs per asset family
//! (costume skeletons declare roughly 800 to 900 IDs).

use g1mport_common::{BinaryReader, BinaryWriter};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::file::write_chunk;
use crate::header::ChunkHeader;
use crate::{Error, Result, SKELETON_MAGIC};

/// Bone-ID table marker for an unused ID.
pub const NO_BONE: u16 = 0xFFFF;

/// A bone record.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct Bone {
    /// Local scale.
    pub scale: [f32; 3],
    /// Parent bone index, or -1 for a root (high bit flags an external parent).
    pub parent: i32,
    /// Local rotation quaternion (x, y, z, w).
    pub rotation: [f32; 4],
    /// Local translation.
    pub position: [f32; 3],
    /// Unknown, usually 1.0.
    pub unknown: f32,
}

impl Bone {
    /// A bone with identity transform under `parent`.
    pub const fn new(parent: i32) -> Self {
        Self {
            scale: [1.0; 3],
            parent,
            rotation: [0.0, 0.0, 0.0, 1.0],
            position: [0.0; 3],
            unknown: 1.0,
        }
    }
}

/// Parsed skeleton chunk.
#[derive(Debug, Clone)]
pub struct Skeleton {
    version: [u8; 4],
    flags: u32,
    layer: u16,
    bone_ids: Vec<u16>,
    bones: Vec<Bone>,
    /// Reverse of `bone_ids`: the global ID of each local bone.
    ids_by_bone: Vec<Option<u32>>,
}

impl Skeleton {
    /// Chunk version written for newly built skeletons.
    pub const DEFAULT_VERSION: [u8; 4] = *b"2300";

    /// Build a skeleton from bones and a bone-ID table.
    pub fn new(bones: Vec<Bone>, bone_ids: Vec<u16>) -> Result<Self> {
        Self::from_parts(Self::DEFAULT_VERSION, 0, 0, bones, bone_ids)
    }

    fn from_parts(
        version: [u8; 4],
        flags: u32,
        layer: u16,
        bones: Vec<Bone>,
        bone_ids: Vec<u16>,
    ) -> Result<Self> {
        if bones.len() >= NO_BONE as usize || bone_ids.len() > u16::MAX as usize {
            return Err(Error::InvalidHeader(format!(
                "skeleton too large: {} bones, {} IDs",
                bones.len(),
                bone_ids.len()
            )));
        }

        let mut ids_by_bone = vec![None; bones.len()];
        for (id, &index) in bone_ids.iter().enumerate() {
            if index == NO_BONE {
                continue;
            }
            match ids_by_bone.get_mut(index as usize) {
                Some(slot) => {
                    // First ID wins if a bone is listed twice
                    slot.get_or_insert(id as u32);
                }
                None => {
                    return Err(Error::InvalidBoneId {
                        id,
                        index,
                        bone_count: bones.len(),
                    })
                }
            }
        }

        Ok(Self {
            version,
            flags,
            layer,
            bone_ids,
            bones,
            ids_by_bone,
        })
    }

    /// Parse a skeleton from a full chunk (header included).
    pub(crate) fn parse(version: [u8; 4], chunk: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new_at(chunk, ChunkHeader::SIZE);

        let bones_offset = reader.read_u32()? as usize;
        let flags = reader.read_u32()?;
        let bone_count = reader.read_u16()? as usize;
        let id_count = reader.read_u16()? as usize;
        let layer = reader.read_u16()?;
        reader.advance(2);

        let mut bone_ids = Vec::with_capacity(id_count);
        for _ in 0..id_count {
            bone_ids.push(reader.read_u16()?);
        }

        reader.seek(bones_offset);
        let mut bones = Vec::with_capacity(bone_count);
        for _ in 0..bone_count {
            bones.push(reader.read_struct::<Bone>()?);
        }

        Self::from_parts(version, flags, layer, bones, bone_ids)
    }

    /// Serialize as a full chunk.
    pub(crate) fn write(&self, writer: &mut BinaryWriter) -> Result<()> {
        write_chunk(writer, SKELETON_MAGIC, self.version, |w, start| {
            let offset_slot = w.reserve_u32();
            w.write_u32(self.flags);
            // Counts are bounded by from_parts
            w.write_u16(self.bones.len() as u16);
            w.write_u16(self.bone_ids.len() as u16);
            w.write_u16(self.layer);
            w.write_u16(0);
            for &index in &self.bone_ids {
                w.write_u16(index);
            }
            w.align(4);

            w.patch_u32(offset_slot, w.position() - start)?;
            for bone in &self.bones {
                w.write_struct(bone);
            }
            Ok(())
        })
    }

    /// Number of bones.
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Declared length of the bone-ID table.
    pub fn id_count(&self) -> usize {
        self.bone_ids.len()
    }

    /// Bone records.
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// The raw bone-ID table.
    pub fn bone_ids(&self) -> &[u16] {
        &self.bone_ids
    }

    /// Local bone index for a global bone ID.
    pub fn bone_index(&self, id: u32) -> Option<usize> {
        match self.bone_ids.get(id as usize) {
            Some(&index) if index != NO_BONE => Some(index as usize),
            _ => None,
        }
    }

    /// Global bone ID of a local bone.
    pub fn bone_id(&self, index: usize) -> Option<u32> {
        self.ids_by_bone.get(index).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Skeleton {
        let bones = vec![Bone::new(-1), Bone::new(0), Bone::new(1)];
        // IDs 0, 2 and 5 are used
        let ids = vec![0, NO_BONE, 1, NO_BONE, NO_BONE, 2];
        Skeleton::new(bones, ids).unwrap()
    }

    #[test]
    fn test_id_lookup() {
        let skeleton = sample();
        assert_eq!(skeleton.id_count(), 6);
        assert_eq!(skeleton.bone_index(2), Some(1));
        assert_eq!(skeleton.bone_index(1), None);
        assert_eq!(skeleton.bone_index(100), None);
        assert_eq!(skeleton.bone_id(2), Some(5));
    }

    #[test]
    fn test_rejects_dangling_id() {
        let err = Skeleton::new(vec![Bone::new(-1)], vec![0, 3]).unwrap_err();
        assert!(matches!(err, Error::InvalidBoneId { id: 1, index: 3, .. }));
    }

    #[test]
    fn test_write_then_parse() {
        let skeleton = sample();
        let mut writer = BinaryWriter::new();
        skeleton.write(&mut writer).unwrap();
        let chunk = writer.into_inner();

        assert_eq!(&chunk[..4], SKELETON_MAGIC);
        assert_eq!(chunk.len() % 4, 0);

        let parsed = Skeleton::parse(Skeleton::DEFAULT_VERSION, &chunk).unwrap();
        assert_eq!(parsed.bone_count(), 3);
        assert_eq!(parsed.bone_ids(), skeleton.bone_ids());
        assert_eq!({ parsed.bones()[2].parent }, 1);
    }
}
