//! Bone-name tables.
//!
//! Bone names are not stored in G1M files. Every model starts with default
//! names derived from its bone IDs, which OID text tables can override.
//!
//! # OID Text Format
//!
//! One association per line, `<bone id>,<name>`:
//!
//! ```text
//! HeaderCommon
//! ; costume skeleton
//! 0,MOT00_Hips
//! 1,MOT01_Spine
//! ```
//!
//! Blank lines, comments (`;`, `#`, `//`) and any line whose first field is
//! not a decimal number are skipped.

use crate::{Error, G1mFile, Result, Skeleton};

/// A single `<bone id>,<name>` association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidEntry {
    /// Global bone ID.
    pub id: u32,
    /// Human-readable bone name.
    pub name: String,
}

/// Parse the associations of an OID text table.
pub fn parse_oid(text: &str) -> Vec<OidEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.starts_with(';')
                && !line.starts_with('#')
                && !line.starts_with("//")
        })
        .filter_map(|line| {
            let (id, name) = line.split_once(',')?;
            let id = id.trim().parse::<u32>().ok()?;
            let name = name.trim();
            (!name.is_empty()).then(|| OidEntry {
                id,
                name: name.to_string(),
            })
        })
        .collect()
}

/// Default name of a bone: its global ID if it has one, else its local index.
pub fn default_bone_name(index: usize, id: Option<u32>) -> String {
    match id {
        Some(id) => format!("bone_{}", id),
        None => format!("bone_{}", index),
    }
}

pub(crate) fn default_bone_names(skeleton: Option<&Skeleton>) -> Vec<String> {
    let Some(skeleton) = skeleton else {
        return Vec::new();
    };

    (0..skeleton.bone_count())
        .map(|index| default_bone_name(index, skeleton.bone_id(index)))
        .collect()
}

impl G1mFile {
    /// The bone-name table, one entry per bone.
    pub fn bone_names(&self) -> &[String] {
        &self.bone_names
    }

    /// The default name table for this model.
    pub fn default_bone_names(&self) -> Vec<String> {
        default_bone_names(self.skeleton())
    }

    /// Replace the bone-name table.
    ///
    /// The table must have exactly one name per bone.
    pub fn set_bone_names(&mut self, names: Vec<String>) -> Result<()> {
        if names.len() != self.bone_count() {
            return Err(Error::BoneNameCount {
                expected: self.bone_count(),
                actual: names.len(),
            });
        }
        self.bone_names = names;
        Ok(())
    }

    /// Build a full name table from OID text without applying it.
    ///
    /// Entries for IDs this model does not use are ignored; bones the text
    /// does not name keep their default name. Fails if no entry names a
    /// bone of this model.
    pub fn bone_names_from_oid(&self, text: &str) -> Result<Vec<String>> {
        let skeleton = self.skeleton().ok_or(Error::NoBoneNames)?;
        let mut names = default_bone_names(Some(skeleton));
        let mut matched = 0usize;

        for entry in parse_oid(text) {
            if let Some(index) = skeleton.bone_index(entry.id) {
                names[index] = entry.name;
                matched += 1;
            }
        }

        if matched == 0 {
            return Err(Error::NoBoneNames);
        }
        Ok(names)
    }

    /// Local index of the bone with the given name.
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bone_names.iter().position(|n| n == name)
    }
}
