//! Output finalization: postcondition check, then zip or move
//!
//! ```text
//! CHECK_OUTPUT_EXISTS --no pak--> fail (MissingOutput)
//!         |
//! BRANCH_DECISION --zip && manifest written--> ZIP_BRANCH
//!         \--otherwise--> MOVE_BRANCH
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::collaborators::ArchiveBuilder;
use super::console::ConsoleOutput;
use super::registry::{MetaRegistry, RunId};
use super::request::PackagingRequest;
use super::staging::StagingArea;
use crate::error::{Error, Result};

/// What a successful run left at the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputArtifact {
    /// Raw `.pak` moved to `{destination}/{mod}.pak`
    Pak { path: PathBuf },
    /// Zip holding the `.pak` and the manifest of `run_id`
    Zip { archive: PathBuf, run_id: RunId },
}

impl OutputArtifact {
    pub fn path(&self) -> &Path {
        match self {
            Self::Pak { path } => path,
            Self::Zip { archive, .. } => archive,
        }
    }
}

pub struct OutputFinalizer<'a> {
    request: &'a PackagingRequest,
    staging: &'a StagingArea,
}

impl<'a> OutputFinalizer<'a> {
    pub fn new(request: &'a PackagingRequest, staging: &'a StagingArea) -> Self {
        Self { request, staging }
    }

    /// Run the state machine once the PAK builder has returned successfully
    pub fn finalize(
        &self,
        run_id: &RunId,
        registry: &MetaRegistry,
        archive_builder: &dyn ArchiveBuilder,
        console: &mut ConsoleOutput,
    ) -> Result<OutputArtifact> {
        let staged_pak = self.check_output_exists(console)?;

        if self.request.zip() {
            match registry.write_manifest(&self.staging.manifest_path()) {
                Ok(()) => return self.zip_branch(run_id, archive_builder),
                Err(e) => {
                    // A failed manifest degrades to a plain .pak
                    let message = format!("Failed to generate info.json ({e}); leaving output as .pak");
                    tracing::debug!("{message}");
                    console.warn(message);
                }
            }
        }

        self.move_branch(&staged_pak)
    }

    /// The builder must have materialized `{mod}.pak` in staging
    fn check_output_exists(&self, console: &mut ConsoleOutput) -> Result<PathBuf> {
        let staged_pak = self.staging.pak_path(self.request.mod_name());
        if staged_pak.is_file() {
            return Ok(staged_pak);
        }

        tracing::debug!("Expected {} after packaging", staged_pak.display());
        console.error("Failed to pak mod file");
        Err(Error::MissingOutput { path: staged_pak })
    }

    fn zip_branch(
        &self,
        run_id: &RunId,
        archive_builder: &dyn ArchiveBuilder,
    ) -> Result<OutputArtifact> {
        fs::create_dir_all(self.request.destination())?;
        let zip_prefix = self.request.destination().join("_");
        let archive = archive_builder
            .build(self.staging.dir(), &zip_prefix, self.request.mod_name())
            .map_err(Error::Archive)?;

        Ok(OutputArtifact::Zip {
            archive,
            run_id: run_id.clone(),
        })
    }

    fn move_branch(&self, staged_pak: &Path) -> Result<OutputArtifact> {
        let target = self.request.pak_destination();
        fs::create_dir_all(self.request.destination())?;
        move_replacing(staged_pak, &target)?;
        tracing::debug!("Moved {} to {}", staged_pak.display(), target.display());

        Ok(OutputArtifact::Pak { path: target })
    }
}

/// Move a file, replacing whatever is at `to`
///
/// Falls back to copy + remove when staging and destination are on different
/// filesystems.
fn move_replacing(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packaging::collaborators::ZipArchiveBuilder;
    use tempfile::TempDir;

    struct Fixture {
        request: PackagingRequest,
        staging: StagingArea,
        run_id: RunId,
        _temp: TempDir,
    }

    fn fixture(zip: bool) -> Fixture {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("work/MyMod");
        fs::create_dir_all(&source).unwrap();
        let dest = temp.path().join("out");
        let request = PackagingRequest::resolve(
            &source.to_string_lossy(),
            Some(&dest.to_string_lossy()),
            zip,
        )
        .unwrap();
        let run_id = RunId::generate();
        let staging = StagingArea::create(&temp.path().join("staging"), &run_id).unwrap();
        Fixture {
            request,
            staging,
            run_id,
            _temp: temp,
        }
    }

    fn registry_for(run_id: &RunId) -> MetaRegistry {
        let mut registry = MetaRegistry::default();
        registry
            .record(run_id.clone(), vec!["Mods/MyMod/meta.lsx".to_string()])
            .unwrap();
        registry
    }

    #[test]
    fn test_missing_pak_fails_without_touching_destination() {
        let f = fixture(false);
        let mut console = ConsoleOutput::default();

        let result = OutputFinalizer::new(&f.request, &f.staging).finalize(
            &f.run_id,
            &registry_for(&f.run_id),
            &ZipArchiveBuilder,
            &mut console,
        );

        assert!(matches!(result, Err(Error::MissingOutput { .. })));
        assert!(console.contains("Failed to pak mod file"));
        assert!(!f.request.destination().exists());
    }

    #[test]
    fn test_move_branch_replaces_existing() {
        let f = fixture(false);
        fs::create_dir_all(f.request.destination()).unwrap();
        fs::write(f.request.pak_destination(), b"stale").unwrap();
        fs::write(f.staging.pak_path("MyMod"), b"fresh").unwrap();

        let mut console = ConsoleOutput::default();
        let artifact = OutputFinalizer::new(&f.request, &f.staging)
            .finalize(&f.run_id, &registry_for(&f.run_id), &ZipArchiveBuilder, &mut console)
            .unwrap();

        assert_eq!(
            artifact,
            OutputArtifact::Pak {
                path: f.request.pak_destination()
            }
        );
        assert_eq!(fs::read(f.request.pak_destination()).unwrap(), b"fresh");
        assert!(!f.staging.pak_path("MyMod").exists());
    }

    #[test]
    fn test_zip_branch_writes_manifest_and_archive() {
        let f = fixture(true);
        fs::write(f.staging.pak_path("MyMod"), b"LSPK").unwrap();

        let mut console = ConsoleOutput::default();
        let artifact = OutputFinalizer::new(&f.request, &f.staging)
            .finalize(&f.run_id, &registry_for(&f.run_id), &ZipArchiveBuilder, &mut console)
            .unwrap();

        let archive = f.request.destination().join("MyMod.zip");
        assert_eq!(
            artifact,
            OutputArtifact::Zip {
                archive: archive.clone(),
                run_id: f.run_id.clone()
            }
        );
        assert!(archive.is_file());
        assert!(f.staging.manifest_path().is_file());
        assert!(!f.request.pak_destination().exists());
    }

    /// Writes next to the prefix without creating any directory
    struct BareArchiveBuilder;

    impl ArchiveBuilder for BareArchiveBuilder {
        fn build(
            &self,
            _staging_dir: &Path,
            zip_prefix: &Path,
            mod_name: &str,
        ) -> unilarian::Result<PathBuf> {
            let archive = zip_prefix.with_file_name(format!("{mod_name}.zip"));
            fs::write(&archive, b"PK")?;
            Ok(archive)
        }
    }

    #[test]
    fn test_zip_branch_creates_missing_destination() {
        let f = fixture(true);
        fs::write(f.staging.pak_path("MyMod"), b"LSPK").unwrap();
        assert!(!f.request.destination().exists());

        let mut console = ConsoleOutput::default();
        let artifact = OutputFinalizer::new(&f.request, &f.staging)
            .finalize(&f.run_id, &registry_for(&f.run_id), &BareArchiveBuilder, &mut console)
            .unwrap();

        assert_eq!(artifact.path(), f.request.destination().join("MyMod.zip"));
        assert!(artifact.path().is_file());
    }

    #[test]
    fn test_manifest_failure_falls_back_to_move() {
        let f = fixture(true);
        fs::write(f.staging.pak_path("MyMod"), b"LSPK").unwrap();
        // A directory where info.json should go makes the manifest write fail
        fs::create_dir_all(f.staging.manifest_path()).unwrap();

        let mut console = ConsoleOutput::default();
        let artifact = OutputFinalizer::new(&f.request, &f.staging)
            .finalize(&f.run_id, &registry_for(&f.run_id), &ZipArchiveBuilder, &mut console)
            .unwrap();

        assert!(matches!(artifact, OutputArtifact::Pak { .. }));
        assert!(console.contains("Failed to generate info.json"));
        assert!(!f.request.destination().join("MyMod.zip").exists());
    }

    #[test]
    fn test_move_replacing_plain_rename() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a.pak");
        let to = temp.path().join("b.pak");
        fs::write(&from, b"a").unwrap();
        move_replacing(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"a");
    }
}
