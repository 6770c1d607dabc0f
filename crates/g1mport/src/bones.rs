//! Bone-name resolution.
//!
//! Names come from the first tier that produces a usable table:
//!
//! 1. the model's own companion `<model>.oid`, if it is a text table
//! 2. the shared database of the model's category (`costume.oid`,
//!    `hair.oid` or `face.oid`), looked up in the working directory and
//!    then beside the executable; skipped for unknown categories
//! 3. the container's default names
//!
//! Missing, binary or unparseable databases only move resolution to the
//! next tier. Names are cosmetic, so nothing here fails the run.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    classify, read_text_database, resolve_database, BoneCategory, ClassifyInput, ModelContainer,
    Settings,
};

/// Where the applied bone names came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameSource {
    /// The model's companion `.oid` file.
    Companion(PathBuf),
    /// A shared category database.
    Category {
        category: BoneCategory,
        path: PathBuf,
    },
    /// The container's default naming scheme.
    Default,
}

impl fmt::Display for NameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameSource::Companion(path) => write!(f, "companion {}", path.display()),
            NameSource::Category { category, path } => {
                write!(f, "{} database {}", category, path.display())
            }
            NameSource::Default => f.write_str("default names"),
        }
    }
}

/// Inputs shared by the strategies, computed once per run.
struct Context<'a> {
    model_path: &'a Path,
    category: BoneCategory,
    settings: &'a Settings,
}

/// A tier that may produce a name table.
#[derive(Debug, Clone, Copy)]
enum Strategy {
    Companion,
    CategoryDatabase,
}

/// Tiers in precedence order; defaults apply when none succeeds.
const STRATEGIES: [Strategy; 2] = [Strategy::Companion, Strategy::CategoryDatabase];

impl Strategy {
    fn resolve<C: ModelContainer>(
        self,
        container: &C,
        ctx: &Context<'_>,
    ) -> Option<(NameSource, Vec<String>)> {
        match self {
            Strategy::Companion => {
                let path = ctx.model_path.with_extension("oid");
                // Binary companions share the extension; only text tables qualify
                let text = read_text_database(&path).or_else(|| {
                    debug!(path = %path.display(), "no text companion name table");
                    None
                })?;
                let names = parse(container, &path, &text)?;
                Some((NameSource::Companion(path), names))
            }
            Strategy::CategoryDatabase => {
                let file_name = ctx.category.database_name()?;
                let path = resolve_database(file_name, ctx.settings).or_else(|| {
                    debug!(database = file_name, "category database not found");
                    None
                })?;
                let text = match fs::read(&path) {
                    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "cannot read category database");
                        return None;
                    }
                };
                let names = parse(container, &path, &text)?;
                Some((
                    NameSource::Category {
                        category: ctx.category,
                        path,
                    },
                    names,
                ))
            }
        }
    }
}

fn parse<C: ModelContainer>(container: &C, path: &Path, text: &str) -> Option<Vec<String>> {
    match container.parse_bone_names(text) {
        Ok(names) => Some(names),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "name table rejected");
            None
        }
    }
}

/// Populate a container's bone names and report where they came from.
///
/// Always leaves one name per bone in place.
pub fn resolve_bone_names<C: ModelContainer>(
    container: &mut C,
    model_path: &Path,
    settings: &Settings,
) -> NameSource {
    let file_name = model_path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let category = classify(&ClassifyInput {
        file_name: &file_name,
        bone_ids: container.bone_id_range(),
    });
    debug!(%category, "classified model");

    let ctx = Context {
        model_path,
        category,
        settings,
    };

    let resolved = STRATEGIES
        .iter()
        .find_map(|strategy| strategy.resolve(container, &ctx));

    let source = match resolved {
        Some((source, names)) => match container.set_bone_names(names) {
            Ok(()) => source,
            Err(e) => {
                warn!(%source, error = %e, "could not apply name table");
                apply_defaults(container);
                NameSource::Default
            }
        },
        None => {
            apply_defaults(container);
            NameSource::Default
        }
    };

    info!(%source, bones = container.bone_count(), "bone names resolved");
    source
}

fn apply_defaults<C: ModelContainer>(container: &mut C) {
    let names = container.default_bone_names();
    if let Err(e) = container.set_bone_names(names) {
        warn!(error = %e, "could not apply default bone names");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockContainer;
    use crate::BoneIdRange;
    use tempfile::TempDir;

    struct Fixture {
        models: TempDir,
        cwd: TempDir,
        exe: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                models: tempfile::tempdir().unwrap(),
                cwd: tempfile::tempdir().unwrap(),
                exe: tempfile::tempdir().unwrap(),
            }
        }

        fn settings(&self) -> Settings {
            Settings::new(self.cwd.path(), self.exe.path())
        }

        fn model(&self, name: &str) -> PathBuf {
            self.models.path().join(name)
        }
    }

    fn container(range: BoneIdRange) -> MockContainer {
        MockContainer::new(3, 0).with_bone_ids(range)
    }

    #[test]
    fn test_companion_wins() {
        let fx = Fixture::new();
        let model = fx.model("KAS_HAIR_001.g1m");
        std::fs::write(model.with_extension("oid"), "0,Companion\n").unwrap();
        std::fs::write(fx.cwd.path().join("hair.oid"), "0,Shared\n").unwrap();

        let mut c = container(BoneIdRange::default());
        let source = resolve_bone_names(&mut c, &model, &fx.settings());

        assert_eq!(source, NameSource::Companion(model.with_extension("oid")));
        assert_eq!(c.bone_names(), &["Companion", "default_1", "default_2"]);
    }

    #[test]
    fn test_binary_companion_falls_through_to_category() {
        let fx = Fixture::new();
        let model = fx.model("KAS_FACE_001.g1m");
        std::fs::write(model.with_extension("oid"), b"0,Binary\0\x01").unwrap();
        std::fs::write(fx.exe.path().join("face.oid"), "1,Jaw\n").unwrap();

        let mut c = container(BoneIdRange::default());
        let source = resolve_bone_names(&mut c, &model, &fx.settings());

        assert_eq!(
            source,
            NameSource::Category {
                category: BoneCategory::Face,
                path: fx.exe.path().join("face.oid"),
            }
        );
        assert_eq!(c.bone_names(), &["default_0", "Jaw", "default_2"]);
    }

    #[test]
    fn test_unparseable_companion_falls_through() {
        let fx = Fixture::new();
        let model = fx.model("KAS_COS_001.g1m");
        std::fs::write(model.with_extension("oid"), "").unwrap();
        std::fs::write(fx.cwd.path().join("costume.oid"), "2,Hips\n").unwrap();

        let mut c = container(BoneIdRange::default());
        let source = resolve_bone_names(&mut c, &model, &fx.settings());

        assert!(matches!(
            source,
            NameSource::Category {
                category: BoneCategory::Costume,
                ..
            }
        ));
        assert_eq!(c.bone_names()[2], "Hips");
    }

    #[test]
    fn test_bone_window_selects_costume_database() {
        let fx = Fixture::new();
        let model = fx.model("model.g1m");
        std::fs::write(fx.cwd.path().join("costume.oid"), "0,Hips\n").unwrap();

        let mut c = container(BoneIdRange::new(850, 850));
        let source = resolve_bone_names(&mut c, &model, &fx.settings());

        assert!(matches!(
            source,
            NameSource::Category {
                category: BoneCategory::Costume,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_category_never_reads_shared_databases() {
        let fx = Fixture::new();
        let model = fx.model("stage_prop.g1m");
        for name in ["costume.oid", "hair.oid", "face.oid"] {
            std::fs::write(fx.cwd.path().join(name), "0,Shared\n").unwrap();
        }

        let mut c = container(BoneIdRange::new(10, 10));
        let source = resolve_bone_names(&mut c, &model, &fx.settings());

        assert_eq!(source, NameSource::Default);
        assert_eq!(c.bone_names(), &["default_0", "default_1", "default_2"]);
    }

    #[test]
    fn test_broken_category_database_keeps_defaults() {
        let fx = Fixture::new();
        let model = fx.model("KAS_HAIR_001.g1m");
        std::fs::write(fx.cwd.path().join("hair.oid"), "HeaderCommon\nno names here\n").unwrap();

        let mut c = container(BoneIdRange::default());
        c.set_bone_names(vec!["stale".into(); 3]).unwrap();
        let source = resolve_bone_names(&mut c, &model, &fx.settings());

        assert_eq!(source, NameSource::Default);
        assert_eq!(c.bone_names(), &["default_0", "default_1", "default_2"]);
    }

    #[test]
    fn test_no_databases_anywhere() {
        for name in ["KAS_HAIR_001.g1m", "KAS_FACE_001.g1m", "KAS_COS_001.g1m", "x.g1m"] {
            let fx = Fixture::new();
            let mut c = container(BoneIdRange::new(850, 850));
            let source = resolve_bone_names(&mut c, &fx.model(name), &fx.settings());

            assert_eq!(source, NameSource::Default, "{}", name);
            assert_eq!(c.bone_names().len(), 3);
        }
    }
}
