//! In-memory container for exercising the run without G1M files.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{BoneIdRange, ModelContainer};

#[derive(Debug, Error)]
#[error("{0}")]
pub struct MockError(pub String);

/// One recorded `import_submesh` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCall {
    pub index: usize,
    pub vertex_buffer: PathBuf,
    pub index_buffer: PathBuf,
    pub group_map: Option<PathBuf>,
}

/// Records imports and saves; names are `index,name` lines with local indices.
#[derive(Debug, Default)]
pub struct MockContainer {
    pub bone_count: usize,
    pub bone_ids: BoneIdRange,
    pub submesh_count: usize,
    pub names: Vec<String>,
    pub imports: Vec<ImportCall>,
    pub fail_import: Option<usize>,
    pub fail_save: bool,
    pub saves: RefCell<Vec<PathBuf>>,
}

impl MockContainer {
    pub fn new(bone_count: usize, submesh_count: usize) -> Self {
        Self {
            bone_count,
            submesh_count,
            ..Default::default()
        }
    }

    pub fn with_bone_ids(mut self, range: BoneIdRange) -> Self {
        self.bone_ids = range;
        self
    }

    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_import = Some(index);
        self
    }

    pub fn imported_indices(&self) -> Vec<usize> {
        self.imports.iter().map(|call| call.index).collect()
    }
}

impl ModelContainer for MockContainer {
    type Error = MockError;

    fn load(path: &Path) -> Result<Self, Self::Error> {
        Err(MockError(format!("mock containers are not loaded from {}", path.display())))
    }

    fn bone_count(&self) -> usize {
        self.bone_count
    }

    fn bone_id_range(&self) -> BoneIdRange {
        self.bone_ids
    }

    fn submesh_count(&self) -> usize {
        self.submesh_count
    }

    fn bone_names(&self) -> &[String] {
        &self.names
    }

    fn default_bone_names(&self) -> Vec<String> {
        (0..self.bone_count).map(|i| format!("default_{}", i)).collect()
    }

    fn parse_bone_names(&self, text: &str) -> Result<Vec<String>, Self::Error> {
        let mut names = self.default_bone_names();
        let mut matched = 0;
        for line in text.lines() {
            let Some((index, name)) = line.split_once(',') else {
                continue;
            };
            if let Some(slot) = index.trim().parse::<usize>().ok().and_then(|i| names.get_mut(i)) {
                *slot = name.trim().to_string();
                matched += 1;
            }
        }
        if matched == 0 {
            return Err(MockError("no names".into()));
        }
        Ok(names)
    }

    fn set_bone_names(&mut self, names: Vec<String>) -> Result<(), Self::Error> {
        if names.len() != self.bone_count {
            return Err(MockError("wrong name count".into()));
        }
        self.names = names;
        Ok(())
    }

    fn import_submesh(
        &mut self,
        index: usize,
        vertex_buffer: &Path,
        index_buffer: &Path,
        group_map: Option<&Path>,
    ) -> Result<(), Self::Error> {
        self.imports.push(ImportCall {
            index,
            vertex_buffer: vertex_buffer.to_path_buf(),
            index_buffer: index_buffer.to_path_buf(),
            group_map: group_map.map(Path::to_path_buf),
        });
        if self.fail_import == Some(index) {
            return Err(MockError(format!("bad buffers for {}", index)));
        }
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<(), Self::Error> {
        if self.fail_save {
            return Err(MockError("disk full".into()));
        }
        self.saves.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}
