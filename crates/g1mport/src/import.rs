//! Submesh re-import orchestration.
//!
//! A run loads the model, resolves bone names, finds the directory holding
//! the edited buffers, imports every submesh slot that has both a `.vb` and
//! an `.ib` file, and only then writes the model back. The first failing
//! slot aborts the run before anything is written, so the file on disk is
//! either fully updated or untouched.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    clean_prompt_path, conventional_working_dir, resolve_bone_names, DirectoryPrompt, Error,
    ModelContainer, Result, Settings,
};

/// Extension every input model must carry (compared case-insensitively).
pub const MODEL_EXTENSION: &str = ".g1m";

/// Buffer files found for one submesh slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmeshSlot {
    /// Zero-based submesh index.
    pub index: usize,
    /// `{index}.vb`
    pub vertex_buffer: PathBuf,
    /// `{index}.ib`
    pub index_buffer: PathBuf,
    /// `{index}.vgmap`, when present.
    pub group_map: Option<PathBuf>,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Submesh slots the model declares.
    pub submesh_count: usize,
    /// Slots imported, in ascending order.
    pub imported: Vec<usize>,
}

impl ImportOutcome {
    /// Number of imported submeshes.
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }
}

/// Reject paths without the model extension.
pub fn check_extension(path: &Path) -> Result<()> {
    let name = path.as_os_str().as_encoded_bytes();
    let ext = MODEL_EXTENSION.as_bytes();

    if name.len() >= ext.len() && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext) {
        Ok(())
    } else {
        Err(Error::InvalidExtension(path.to_path_buf()))
    }
}

/// Find the directory with the buffer files.
///
/// Uses the conventional directory if it exists, otherwise asks the
/// operator once.
pub fn resolve_working_dir(
    model_path: &Path,
    settings: &Settings,
    prompt: &mut dyn DirectoryPrompt,
) -> Result<PathBuf> {
    if let Some(dir) = conventional_working_dir(model_path, settings) {
        if dir.is_dir() {
            return Ok(dir);
        }
        debug!(dir = %dir.display(), "conventional working directory missing");
    }

    let input = prompt.read_directory().map_err(Error::Prompt)?;
    let cleaned = clean_prompt_path(&input);
    if cleaned.is_empty() {
        return Err(Error::DirectoryNotFound(PathBuf::new()));
    }

    let dir = settings.resolve(&cleaned);
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir));
    }
    Ok(dir)
}

/// Collect the slots in `[0, submesh_count)` that have both buffer files.
pub fn plan_slots(dir: &Path, submesh_count: usize) -> Vec<SubmeshSlot> {
    (0..submesh_count)
        .filter_map(|index| {
            let vertex_buffer = dir.join(format!("{}.vb", index));
            let index_buffer = dir.join(format!("{}.ib", index));

            match (vertex_buffer.is_file(), index_buffer.is_file()) {
                (true, true) => {}
                (false, false) => return None,
                (has_vb, has_ib) => {
                    debug!(index, has_vb, has_ib, "skipping submesh with incomplete buffers");
                    return None;
                }
            }

            let group_map = Some(dir.join(format!("{}.vgmap", index))).filter(|p| p.is_file());

            Some(SubmeshSlot {
                index,
                vertex_buffer,
                index_buffer,
                group_map,
            })
        })
        .collect()
}

/// Import slots in order, stopping at the first failure.
pub fn import_slots<C: ModelContainer>(container: &mut C, slots: &[SubmeshSlot]) -> Result<Vec<usize>> {
    slots
        .iter()
        .map(|slot| {
            info!(index = slot.index, vgmap = slot.group_map.is_some(), "importing submesh");
            container
                .import_submesh(
                    slot.index,
                    &slot.vertex_buffer,
                    &slot.index_buffer,
                    slot.group_map.as_deref(),
                )
                .map(|()| slot.index)
                .map_err(|e| Error::SubmeshImport {
                    index: slot.index,
                    source: Box::new(e),
                })
        })
        .collect()
}

/// Import buffers into an already loaded container and save it.
///
/// The container is written to `model_path` only after every selected
/// slot imported.
pub fn import_into<C: ModelContainer>(
    container: &mut C,
    model_path: &Path,
    settings: &Settings,
    prompt: &mut dyn DirectoryPrompt,
) -> Result<ImportOutcome> {
    let dir = resolve_working_dir(model_path, settings, prompt)?;

    let submesh_count = container.submesh_count();
    let slots = plan_slots(&dir, submesh_count);
    if slots.is_empty() {
        return Err(Error::NoMatchingFiles(dir));
    }

    let imported = import_slots(container, &slots)?;

    container.save(model_path).map_err(|e| Error::Save {
        path: model_path.to_path_buf(),
        source: Box::new(e),
    })?;
    info!(path = %model_path.display(), imported = imported.len(), "model saved");

    Ok(ImportOutcome {
        submesh_count,
        imported,
    })
}

/// Run a full re-import of the model at `model_path`.
pub fn run<C: ModelContainer>(
    model_path: &Path,
    settings: &Settings,
    prompt: &mut dyn DirectoryPrompt,
) -> Result<ImportOutcome> {
    check_extension(model_path)?;
    let model_path = settings.resolve(model_path);

    let mut container = C::load(&model_path).map_err(|e| Error::Load {
        path: model_path.clone(),
        source: Box::new(e),
    })?;
    info!(
        path = %model_path.display(),
        bones = container.bone_count(),
        submeshes = container.submesh_count(),
        "model loaded"
    );

    resolve_bone_names(&mut container, &model_path, settings);

    import_into(&mut container, &model_path, settings, prompt)
}
