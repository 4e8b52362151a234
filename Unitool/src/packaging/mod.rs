//! Mod packaging pipeline
//!
//! Resolve arguments, stage a `.pak`, record its metadata, then either move
//! the `.pak` to the destination or zip it together with an `info.json`.
//! The staging directory is removed at the end of every run.
//!
//! ```no_run
//! use unitool::packaging::{ConsoleOutput, Packager, PackagingRequest};
//!
//! let request = PackagingRequest::resolve("./MyMod", None, false)?;
//! let mut console = ConsoleOutput::default();
//! let outcome = Packager::new(std::env::temp_dir().join("unitool")).run(&request, &mut console)?;
//! println!("{}", outcome.artifact.path().display());
//! # Ok::<(), unitool::Error>(())
//! ```

mod collaborators;
mod console;
mod finalizer;
mod registry;
mod request;
mod staging;

use std::path::{Path, PathBuf};

pub use collaborators::{ArchiveBuilder, LspkPakBuilder, PakBuilder, ZipArchiveBuilder};
pub use console::{ConsoleLevel, ConsoleLine, ConsoleOutput};
pub use finalizer::{OutputArtifact, OutputFinalizer};
pub use registry::{MetaRegistry, RunId};
pub use request::PackagingRequest;
pub use staging::{MANIFEST_FILE_NAME, StagingArea};

use unilarian::mods::validate_mod_structure;

use crate::error::{Error, Result};

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingOutcome {
    pub run_id: RunId,
    pub artifact: OutputArtifact,
    /// Number of metadata entries the builder reported
    pub meta_entries: usize,
}

/// Drives one packaging run at a time
pub struct Packager {
    staging_root: PathBuf,
    pak_builder: Box<dyn PakBuilder>,
    archive_builder: Box<dyn ArchiveBuilder>,
}

impl Packager {
    /// Packager with the LSPK and zip builders, staging below `staging_root`
    pub fn new(staging_root: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: staging_root.into(),
            pak_builder: Box::new(LspkPakBuilder::default()),
            archive_builder: Box::new(ZipArchiveBuilder),
        }
    }

    #[must_use]
    pub fn with_pak_builder(mut self, builder: impl PakBuilder + 'static) -> Self {
        self.pak_builder = Box::new(builder);
        self
    }

    #[must_use]
    pub fn with_archive_builder(mut self, builder: impl ArchiveBuilder + 'static) -> Self {
        self.archive_builder = Box::new(builder);
        self
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Package one mod with a fresh registry
    pub fn run(
        &self,
        request: &PackagingRequest,
        console: &mut ConsoleOutput,
    ) -> Result<PackagingOutcome> {
        let mut registry = MetaRegistry::default();
        self.run_with_registry(request, &mut registry, console)
    }

    /// Package one mod, recording its entries in a caller-owned registry
    ///
    /// The zip manifest is the whole registry, so earlier runs recorded in
    /// `registry` are listed alongside this one.
    pub fn run_with_registry(
        &self,
        request: &PackagingRequest,
        registry: &mut MetaRegistry,
        console: &mut ConsoleOutput,
    ) -> Result<PackagingOutcome> {
        let start = console.lines().len();
        if let Err(e) = request.validate_source() {
            console.error(format!("Error: {e}"));
            return Err(e);
        }

        let validation = validate_mod_structure(request.source());
        for warning in validation.warnings {
            tracing::debug!("{}: {warning}", request.mod_name());
            console.warn(warning);
        }

        let run_id = RunId::generate();
        let staging = StagingArea::create(&self.staging_root, &run_id).inspect_err(|e| {
            console.error(format!(
                "Error: cannot create staging directory in {}: {e}",
                self.staging_root.display()
            ));
        })?;

        let result = self.package(request, &run_id, &staging, registry, console);

        if let Some(warning) = staging.purge() {
            console.warn(warning);
        }

        match result {
            Ok(outcome) => {
                console.info(format!(
                    "Packaged {} -> {}",
                    request.mod_name(),
                    outcome.artifact.path().display()
                ));
                Ok(outcome)
            }
            Err(e) => {
                if !console.has_errors_since(start) {
                    console.error(format!("Error: {e}"));
                }
                Err(e)
            }
        }
    }

    fn package(
        &self,
        request: &PackagingRequest,
        run_id: &RunId,
        staging: &StagingArea,
        registry: &mut MetaRegistry,
        console: &mut ConsoleOutput,
    ) -> Result<PackagingOutcome> {
        let mod_name = request.mod_name();
        let staged_pak = staging.pak_path(mod_name);

        tracing::info!("Packing {} into {}", request.source().display(), staged_pak.display());
        let entries = self
            .pak_builder
            .process(request.source(), mod_name, &staged_pak)
            .map_err(|source| {
                tracing::debug!("Packaging {mod_name} failed: {source}");
                console.error(format!("Error: failed to process mod {mod_name}: {source}"));
                Error::Processing {
                    mod_name: mod_name.to_string(),
                    source,
                }
            })?;

        let meta_entries = entries.len();
        registry.record(run_id.clone(), entries)?;

        let artifact = OutputFinalizer::new(request, staging).finalize(
            run_id,
            registry,
            self.archive_builder.as_ref(),
            console,
        )?;

        Ok(PackagingOutcome {
            run_id: run_id.clone(),
            artifact,
            meta_entries,
        })
    }
}
