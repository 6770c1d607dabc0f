//! Name-database validation.
//!
//! A model's companion `.oid` file can be either a text name table or a
//! binary file of the same extension. Text tables never contain a zero
//! byte, so that is the whole check. It does not prove the text is
//! well-formed; the container's parser still decides that.

use std::fs;
use std::path::Path;

use g1mport_common::contains_nul;

/// Whether `path` is a readable file with no zero byte (empty files pass).
pub fn is_text_database(path: &Path) -> bool {
    read_text_database(path).is_some()
}

/// Read a text name database, or `None` if it is missing, unreadable or binary.
pub fn read_text_database(path: &Path) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    if contains_nul(&bytes) {
        return None;
    }
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costume.oid");
        fs::write(&path, "HeaderCommon\n0,MOT00_Hips\n").unwrap();

        assert!(is_text_database(&path));
        assert_eq!(
            read_text_database(&path).as_deref(),
            Some("HeaderCommon\n0,MOT00_Hips\n")
        );
    }

    #[test]
    fn test_empty_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.oid");
        fs::write(&path, b"").unwrap();

        assert!(is_text_database(&path));
    }

    #[test]
    fn test_zero_byte_anywhere_fails() {
        let dir = tempfile::tempdir().unwrap();
        for (i, data) in [&b"\0abc"[..], b"abc\0", b"0,Hips\n\x001,Spine"].iter().enumerate() {
            let path = dir.path().join(format!("{}.oid", i));
            fs::write(&path, data).unwrap();
            assert!(!is_text_database(&path), "{:?} should be rejected", data);
        }
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_text_database(&dir.path().join("missing.oid")));
        assert!(!is_text_database(dir.path()));
    }
}
