//! g1mport - re-import edited geometry into G1M model files.
//!
//! The tool takes a model, gives its bones readable names, then replaces
//! the vertex and index buffers of every submesh that has edited buffer
//! files waiting in a working directory, and writes the model back.
//!
//! # Components
//!
//! - [`Settings`] - startup configuration (working and program directories)
//! - [`resolve_database`] - locates `costume.oid`, `hair.oid`, `face.oid`
//! - [`is_text_database`] - zero-byte gate for OID text tables
//! - [`classify`] - costume/hair/face classification from name and bone IDs
//! - [`resolve_bone_names`] - companion, category and default name tiers
//! - [`run`] / [`import_into`] - the submesh re-import orchestrator
//!
//! The model format itself sits behind the [`ModelContainer`] trait, which
//! is implemented for [`g1mport_g1m::G1mFile`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use g1mport::{run, G1mFile, Settings, StdinPrompt};
//!
//! let settings = Settings::from_argv0("g1mport")?;
//! let outcome = run::<G1mFile>(Path::new("CHAR_COS_001.g1m"), &settings, &mut StdinPrompt)?;
//! println!("{} submeshes were imported.", outcome.imported_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bones;
mod category;
mod config;
mod container;
mod database;
mod error;
mod import;
mod paths;
mod prompt;

#[cfg(test)]
mod testing;

pub use bones::{resolve_bone_names, NameSource};
pub use category::{
    classify, BoneCategory, BoneIdRange, ClassifyInput, COSTUME_BONE_WINDOW, COSTUME_MARKER,
    EXCLUSION_MARKERS, FACE_MARKER, HAIR_MARKER,
};
pub use config::Settings;
pub use container::ModelContainer;
pub use database::{is_text_database, read_text_database};
pub use error::{BoxError, Error, Result};
pub use import::{
    check_extension, import_into, import_slots, plan_slots, resolve_working_dir, run,
    ImportOutcome, SubmeshSlot, MODEL_EXTENSION,
};
pub use paths::{conventional_working_dir, resolve_database};
pub use prompt::{clean_prompt_path, DirectoryPrompt, StdinPrompt, PROMPT_MESSAGE};

pub use g1mport_g1m::G1mFile;
