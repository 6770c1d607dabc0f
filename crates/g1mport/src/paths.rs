//! Locating companion files and working directories.

use std::path::{Path, PathBuf};

use crate::Settings;

/// Find a name database by file name.
///
/// A file in the working directory wins over one beside the executable.
/// Returns `None` when neither exists.
pub fn resolve_database(name: &str, settings: &Settings) -> Option<PathBuf> {
    [settings.current_dir(), settings.program_dir()]
        .into_iter()
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
}

/// The directory a model's buffer files are expected in by default.
///
/// This is the model's file name without its extension, relative to the
/// working directory (not to the model's own directory).
pub fn conventional_working_dir(model_path: &Path, settings: &Settings) -> Option<PathBuf> {
    model_path.file_stem().map(|stem| settings.resolve(stem))
}
