//! Vertex-group maps.
//!
//! A vgmap is a JSON object exported next to a submesh's buffers. It maps
//! bone names to the blend slot the vertex data uses for that bone:
//!
//! ```json
//! { "MOT00_Hips": 0, "MOT01_Spine": 1 }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::Result;

/// Bone name to palette slot mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct VertexGroupMap(BTreeMap<String, u32>);

impl VertexGroupMap {
    /// Parse a vgmap from JSON bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Read a vgmap file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Build a map from `(name, slot)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self(pairs.into_iter().map(|(n, s)| (n.into(), s)).collect())
    }

    /// Iterate `(bone name, slot)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, &slot)| (name.as_str(), slot))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
