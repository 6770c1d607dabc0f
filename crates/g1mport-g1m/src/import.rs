//! Submesh buffer import.
//!
//! Replaces the vertex and index data of one submesh with externally edited
//! buffers (`.vb`/`.ib`), optionally remapping its joint palette from a
//! vgmap. Everything is validated before the model is touched, so a failed
//! import leaves the file unchanged.

use std::fs;
use std::path::Path;

use crate::geometry::decode_indices;
use crate::{Error, G1mFile, Joint, Result, Submesh, VertexGroupMap};

/// Highest joint palette slot a vertex can address (blend indices are bytes).
pub const MAX_PALETTE_SLOT: usize = u8::MAX as usize;

impl G1mFile {
    /// Import a submesh from buffer files.
    ///
    /// `vgmap` is optional; without it the joint palette is left as is.
    pub fn import_submesh(
        &mut self,
        index: usize,
        vb_path: &Path,
        ib_path: &Path,
        vgmap: Option<&Path>,
    ) -> Result<()> {
        let vertices = fs::read(vb_path)?;
        let indices = fs::read(ib_path)?;
        let vgmap = vgmap.map(VertexGroupMap::load).transpose()?;

        self.import_submesh_data(index, &vertices, &indices, vgmap.as_ref())
    }

    /// Import a submesh from in-memory buffers.
    pub fn import_submesh_data(
        &mut self,
        index: usize,
        vertices: &[u8],
        indices: &[u8],
        vgmap: Option<&VertexGroupMap>,
    ) -> Result<()> {
        let geometry = self.geometry();
        let submeshes = geometry.submeshes();
        let submesh = *submeshes.get(index).ok_or(Error::SubmeshOutOfRange {
            index,
            count: submeshes.len(),
        })?;

        let vb_index = submesh.vertex_buffer_index as usize;
        let ib_index = submesh.index_buffer_index as usize;
        let palette_index = submesh.joint_palette_index as usize;

        ensure_exclusive(submeshes, index, "vertex buffer", vb_index, |s| {
            s.vertex_buffer_index
        })?;
        ensure_exclusive(submeshes, index, "index buffer", ib_index, |s| {
            s.index_buffer_index
        })?;

        let stride = geometry
            .vertex_buffers()
            .get(vb_index)
            .ok_or(Error::BufferOutOfRange {
                kind: "vertex buffer",
                index: vb_index,
            })?
            .stride as usize;
        let format = geometry
            .index_buffers()
            .get(ib_index)
            .ok_or(Error::BufferOutOfRange {
                kind: "index buffer",
                index: ib_index,
            })?
            .format;

        let vertex_count = element_count("vertex", vertices.len(), stride)?;
        let index_count = element_count("index", indices.len(), format.width())?;

        for (position, value) in decode_indices(format, indices).enumerate() {
            if value as usize >= vertex_count {
                return Err(Error::IndexOutOfRange {
                    value,
                    position,
                    vertex_count,
                });
            }
        }

        let remap = match vgmap {
            Some(map) => {
                ensure_exclusive(submeshes, index, "joint palette", palette_index, |s| {
                    s.joint_palette_index
                })?;
                if palette_index >= geometry.joint_palettes().len() {
                    return Err(Error::BufferOutOfRange {
                        kind: "joint palette",
                        index: palette_index,
                    });
                }
                Some(self.resolve_vgmap(map)?)
            }
            None => None,
        };

        let geometry = self.geometry_mut();

        let vertex_buffer = &mut geometry.vertex_buffers_mut()[vb_index];
        vertex_buffer.data = vertices.to_vec();

        let index_buffer = &mut geometry.index_buffers_mut()[ib_index];
        index_buffer.data = indices.to_vec();

        if let Some(remap) = remap {
            let palette = &mut geometry.joint_palettes_mut()[palette_index];
            for (slot, bone) in remap {
                if palette.joints.len() <= slot {
                    palette.joints.resize(slot + 1, Joint::default());
                }
                palette.joints[slot].bone = bone;
            }
        }

        let submesh = &mut geometry.submeshes_mut()[index];
        submesh.vertex_offset = 0;
        submesh.vertex_count = vertex_count as u32;
        submesh.index_offset = 0;
        submesh.index_count = index_count as u32;

        Ok(())
    }

    /// Resolve vgmap bone names to `(palette slot, bone index)` pairs.
    fn resolve_vgmap(&self, map: &VertexGroupMap) -> Result<Vec<(usize, u32)>> {
        map.iter()
            .map(|(name, slot)| {
                let bone = self
                    .find_bone(name)
                    .ok_or_else(|| Error::UnknownBone(name.to_string()))?;
                if slot as usize > MAX_PALETTE_SLOT {
                    return Err(Error::PaletteSlot {
                        bone: name.to_string(),
                        slot,
                        max: MAX_PALETTE_SLOT,
                    });
                }
                Ok((slot as usize, bone as u32))
            })
            .collect()
    }
}

fn ensure_exclusive(
    submeshes: &[Submesh],
    index: usize,
    kind: &'static str,
    target: usize,
    field: impl Fn(&Submesh) -> u32,
) -> Result<()> {
    match submeshes
        .iter()
        .enumerate()
        .find(|(i, s)| *i != index && field(s) as usize == target)
    {
        Some((other, _)) => Err(Error::SharedBuffer {
            kind,
            index: target,
            other,
        }),
        None => Ok(()),
    }
}

fn element_count(kind: &'static str, len: usize, unit: usize) -> Result<usize> {
    if len == 0 {
        return Err(Error::EmptyBuffer(kind));
    }
    if unit == 0 || len % unit != 0 {
        return Err(Error::BufferSize { kind, len, unit });
    }
    let count = len / unit;
    if count > u32::MAX as usize {
        return Err(Error::BufferSize { kind, len, unit });
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Bone, Geometry, IndexBuffer, IndexFormat, JointPalette, Section, Skeleton, VertexBuffer,
    };

    /// Two submeshes, each with its own buffers and palette.
    fn model() -> G1mFile {
        let skeleton = Skeleton::new(
            vec![Bone::new(-1), Bone::new(0), Bone::new(1)],
            vec![0, 1, 2],
        )
        .unwrap();

        let triangle: Vec<u8> = [0u16, 1, 2].iter().flat_map(|i| i.to_le_bytes()).collect();
        let geometry = Geometry::new(vec![
            Section::VertexBuffers(vec![
                VertexBuffer::new(8, vec![0; 24]),
                VertexBuffer::new(8, vec![0; 24]),
            ]),
            Section::JointPalettes(vec![
                JointPalette {
                    joints: vec![Joint::default()],
                },
                JointPalette::default(),
            ]),
            Section::IndexBuffers(vec![
                IndexBuffer::new(IndexFormat::U16, triangle.clone()),
                IndexBuffer::new(IndexFormat::U16, triangle),
            ]),
            Section::Submeshes(vec![
                Submesh {
                    vertex_count: 3,
                    index_count: 3,
                    ..Default::default()
                },
                Submesh {
                    vertex_buffer_index: 1,
                    joint_palette_index: 1,
                    index_buffer_index: 1,
                    vertex_count: 3,
                    index_count: 3,
                    ..Default::default()
                },
            ]),
        ]);
        G1mFile::new(Some(skeleton), geometry)
    }

    fn quad() -> (Vec<u8>, Vec<u8>) {
        let vertices = vec![7u8; 4 * 8];
        let indices = [0u16, 1, 2, 2, 1, 3]
            .iter()
            .flat_map(|i| i.to_le_bytes())
            .collect();
        (vertices, indices)
    }

    #[test]
    fn test_import_replaces_buffers() {
        let mut g1m = model();
        let (vertices, indices) = quad();

        g1m.import_submesh_data(1, &vertices, &indices, None).unwrap();

        let geometry = g1m.geometry();
        assert_eq!(geometry.vertex_buffers()[1].vertex_count(), 4);
        assert_eq!(geometry.index_buffers()[1].index_count(), 6);
        assert_eq!(geometry.vertex_buffers()[0].data, vec![0; 24]);
        let submesh = geometry.submeshes()[1];
        assert_eq!({ submesh.vertex_count }, 4);
        assert_eq!({ submesh.index_count }, 6);
    }

    #[test]
    fn test_import_applies_vgmap() {
        let mut g1m = model();
        g1m.set_bone_names(vec!["Hips".into(), "Spine".into(), "Head".into()])
            .unwrap();
        let (vertices, indices) = quad();
        let map = VertexGroupMap::from_pairs([("Head", 0), ("Spine", 2)]);

        g1m.import_submesh_data(0, &vertices, &indices, Some(&map))
            .unwrap();

        let joints = &g1m.geometry().joint_palettes()[0].joints;
        assert_eq!(joints.len(), 3);
        assert_eq!({ joints[0].bone }, 2);
        assert_eq!({ joints[2].bone }, 1);
    }

    #[test]
    fn test_unknown_vgmap_bone_leaves_model_untouched() {
        let mut g1m = model();
        let (vertices, indices) = quad();
        let map = VertexGroupMap::from_pairs([("Tail", 0)]);

        let err = g1m
            .import_submesh_data(0, &vertices, &indices, Some(&map))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownBone(name) if name == "Tail"));
        assert_eq!(g1m.geometry().vertex_buffers()[0].vertex_count(), 3);
    }

    #[test]
    fn test_out_of_range_palette_slot_leaves_model_untouched() {
        let mut g1m = model();
        let (vertices, indices) = quad();
        let map = VertexGroupMap::from_pairs([("bone_0", u32::MAX)]);

        let err = g1m
            .import_submesh_data(0, &vertices, &indices, Some(&map))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::PaletteSlot { slot: u32::MAX, max: MAX_PALETTE_SLOT, .. }
        ));
        assert_eq!(g1m.geometry().vertex_buffers()[0].vertex_count(), 3);
        assert_eq!(g1m.geometry().joint_palettes()[0].joints.len(), 1);

        let map = VertexGroupMap::from_pairs([("bone_0", MAX_PALETTE_SLOT as u32)]);
        g1m.import_submesh_data(0, &vertices, &indices, Some(&map))
            .unwrap();
        assert_eq!(
            g1m.geometry().joint_palettes()[0].joints.len(),
            MAX_PALETTE_SLOT + 1
        );
    }

    #[test]
    fn test_rejects_bad_buffers() {
        let mut g1m = model();
        let (vertices, indices) = quad();

        assert!(matches!(
            g1m.import_submesh_data(0, &vertices[..30], &indices, None),
            Err(Error::BufferSize { kind: "vertex", len: 30, unit: 8 })
        ));
        assert!(matches!(
            g1m.import_submesh_data(0, &vertices, &indices[..5], None),
            Err(Error::BufferSize { kind: "index", .. })
        ));
        assert!(matches!(
            g1m.import_submesh_data(0, &[], &indices, None),
            Err(Error::EmptyBuffer("vertex"))
        ));
        assert!(matches!(
            g1m.import_submesh_data(0, &vertices[..16], &indices, None),
            Err(Error::IndexOutOfRange { value: 2, position: 2, vertex_count: 2 })
        ));
        assert!(matches!(
            g1m.import_submesh_data(5, &vertices, &indices, None),
            Err(Error::SubmeshOutOfRange { index: 5, count: 2 })
        ));
    }

    #[test]
    fn test_rejects_shared_buffers() {
        let mut g1m = model();
        g1m.geometry_mut().submeshes_mut()[1].vertex_buffer_index = 0;
        let (vertices, indices) = quad();

        assert!(matches!(
            g1m.import_submesh_data(0, &vertices, &indices, None),
            Err(Error::SharedBuffer { kind: "vertex buffer", index: 0, other: 1 })
        ));
    }

    #[test]
    fn test_import_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let (vertices, indices) = quad();
        let vb = dir.path().join("0.vb");
        let ib = dir.path().join("0.ib");
        let vgmap = dir.path().join("0.vgmap");
        fs::write(&vb, &vertices).unwrap();
        fs::write(&ib, &indices).unwrap();
        fs::write(&vgmap, r#"{"bone_1": 0}"#).unwrap();

        let mut g1m = model();
        g1m.import_submesh(0, &vb, &ib, Some(&vgmap)).unwrap();

        assert_eq!({ g1m.geometry().joint_palettes()[0].joints[0].bone }, 1);
        assert_eq!({ g1m.geometry().submeshes()[0].index_count }, 6);
    }
}
