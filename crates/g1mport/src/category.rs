//! Bone-category classification.
//!
//! Picks which shared name database fits a model, from its file name and
//! the extent of its bone-ID space. Rules, first match wins:
//!
//! 1. file name contains [`HAIR_MARKER`] -> [`BoneCategory::Hair`]
//! 2. file name contains [`FACE_MARKER`] -> [`BoneCategory::Face`]
//! 3. bone-ID range inside [`COSTUME_BONE_WINDOW`] -> [`BoneCategory::Costume`]
//! 4. file name contains [`COSTUME_MARKER`] and none of
//!    [`EXCLUSION_MARKERS`] -> [`BoneCategory::Costume`]
//! 5. otherwise [`BoneCategory::Unknown`]

use std::fmt;
use std::ops::RangeInclusive;

/// File-name marker of hair models.
pub const HAIR_MARKER: &str = "_HAIR_";

/// File-name marker of face models.
pub const FACE_MARKER: &str = "_FACE_";

/// File-name marker of costume models.
pub const COSTUME_MARKER: &str = "_COS_";

/// Costume variants (menus, character select) that use other skeletons.
pub const EXCLUSION_MARKERS: [&str; 2] = ["OUTGAME", "CHRSEL"];

/// Bone-ID extents seen on costume skeletons.
pub const COSTUME_BONE_WINDOW: RangeInclusive<u32> = 800..=900;

/// Smallest and largest bone ID a container declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoneIdRange {
    pub min: u32,
    pub max: u32,
}

impl BoneIdRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Whether the whole range lies inside `window`.
    pub fn within(&self, window: &RangeInclusive<u32>) -> bool {
        window.contains(&self.min) && window.contains(&self.max)
    }
}

/// Asset family of a model, as far as bone naming is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneCategory {
    Costume,
    Hair,
    Face,
    Unknown,
}

impl BoneCategory {
    /// File name of the shared name database for this category.
    pub const fn database_name(self) -> Option<&'static str> {
        match self {
            BoneCategory::Costume => Some("costume.oid"),
            BoneCategory::Hair => Some("hair.oid"),
            BoneCategory::Face => Some("face.oid"),
            BoneCategory::Unknown => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BoneCategory::Costume => "costume",
            BoneCategory::Hair => "hair",
            BoneCategory::Face => "face",
            BoneCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BoneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the classifier looks at.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyInput<'a> {
    /// The model's file name (no directories).
    pub file_name: &'a str,
    /// Declared bone-ID range.
    pub bone_ids: BoneIdRange,
}

/// Classify a model.
pub fn classify(input: &ClassifyInput<'_>) -> BoneCategory {
    let name = input.file_name;

    if name.contains(HAIR_MARKER) {
        BoneCategory::Hair
    } else if name.contains(FACE_MARKER) {
        BoneCategory::Face
    } else if input.bone_ids.within(&COSTUME_BONE_WINDOW) {
        BoneCategory::Costume
    } else if name.contains(COSTUME_MARKER)
        && !EXCLUSION_MARKERS.iter().any(|marker| name.contains(marker))
    {
        BoneCategory::Costume
    } else {
        BoneCategory::Unknown
    }
}
