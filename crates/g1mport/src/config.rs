//! Startup configuration.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// Directories a run resolves relative paths against.
///
/// Built once at startup and passed down by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    current_dir: PathBuf,
    program_dir: PathBuf,
}

impl Settings {
    /// Build settings from explicit directories.
    pub fn new(current_dir: impl Into<PathBuf>, program_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
            program_dir: program_dir.into(),
        }
    }

    /// Build settings from the process working directory and `argv[0]`.
    pub fn from_argv0(argv0: &str) -> io::Result<Self> {
        Ok(Self::with_current_dir(env::current_dir()?, argv0))
    }

    /// Build settings from a given working directory and `argv[0]`.
    ///
    /// A bare program name (no `/` or `\`) means the program directory is
    /// the working directory; otherwise it is the directory part of
    /// `argv[0]`, taken relative to the working directory.
    pub fn with_current_dir(current_dir: PathBuf, argv0: &str) -> Self {
        let program_dir = match argv0.rfind(|c: char| c == '/' || c == '\\') {
            None => current_dir.clone(),
            Some(0) => current_dir.join(&argv0[..1]),
            Some(end) => current_dir.join(&argv0[..end]),
        };

        Self {
            current_dir,
            program_dir,
        }
    }

    /// Working directory captured at startup.
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Directory containing the running executable.
    pub fn program_dir(&self) -> &Path {
        &self.program_dir
    }

    /// Resolve a possibly relative path against the working directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.current_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_program_name_uses_current_dir() {
        let settings = Settings::with_current_dir(PathBuf::from("/work"), "g1mport");
        assert_eq!(settings.program_dir(), Path::new("/work"));
    }

    #[test]
    fn test_program_dir_from_argv0() {
        let settings = Settings::with_current_dir(PathBuf::from("/work"), "tools/bin/g1mport");
        assert_eq!(settings.program_dir(), Path::new("/work/tools/bin"));

        let settings = Settings::with_current_dir(PathBuf::from("/work"), "/opt/g1mport/g1mport");
        assert_eq!(settings.program_dir(), Path::new("/opt/g1mport"));
    }

    #[test]
    fn test_backslash_counts_as_separator() {
        let settings = Settings::with_current_dir(PathBuf::from("/work"), "tools\\g1mport.exe");
        assert_eq!(settings.program_dir(), Path::new("/work").join("tools"));
    }

    #[test]
    fn test_resolve() {
        let settings = Settings::new("/work", "/opt");
        assert_eq!(settings.resolve("CHAR_COS_001"), Path::new("/work/CHAR_COS_001"));
        assert_eq!(settings.resolve("/abs/dir"), Path::new("/abs/dir"));
    }
}
