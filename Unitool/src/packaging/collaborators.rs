//! Contracts for the services the pipeline delegates to
//!
//! The pipeline never looks inside a `.pak` or a zip; it only calls these
//! traits. The default implementations are backed by `unilarian`.

use std::path::{Path, PathBuf};

use unilarian::archive::create_mod_zip;
use unilarian::mods::{MetaEntry, meta_entries};
use unilarian::pak::{CompressionMethod, PakOperations, PakProgress};

/// Builds a `.pak` from a mod folder
pub trait PakBuilder: Send + Sync {
    /// Write `output` from the contents of `source` and return the metadata
    /// entries found while scanning, in archive order.
    ///
    /// An `Err` aborts the run; an empty list is a normal success.
    fn process(
        &self,
        source: &Path,
        mod_name: &str,
        output: &Path,
    ) -> unilarian::Result<Vec<MetaEntry>>;
}

/// Wraps a staging directory into a distributable archive
pub trait ArchiveBuilder: Send + Sync {
    /// Package every file of `staging_dir`; `zip_prefix` is a placeholder
    /// inside the output folder. Returns the archive path.
    fn build(
        &self,
        staging_dir: &Path,
        zip_prefix: &Path,
        mod_name: &str,
    ) -> unilarian::Result<PathBuf>;
}

type ProgressFn = Box<dyn Fn(&PakProgress) + Send + Sync>;

/// [`PakBuilder`] writing LSPK archives
pub struct LspkPakBuilder {
    compression: CompressionMethod,
    progress: Option<ProgressFn>,
}

impl LspkPakBuilder {
    #[must_use]
    pub fn new(compression: CompressionMethod) -> Self {
        Self {
            compression,
            progress: None,
        }
    }

    /// Report per-file progress while the archive is written
    #[must_use]
    pub fn with_progress(mut self, progress: impl Fn(&PakProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn compression(&self) -> CompressionMethod {
        self.compression
    }
}

impl Default for LspkPakBuilder {
    fn default() -> Self {
        Self::new(CompressionMethod::default())
    }
}

impl PakBuilder for LspkPakBuilder {
    fn process(
        &self,
        source: &Path,
        mod_name: &str,
        output: &Path,
    ) -> unilarian::Result<Vec<MetaEntry>> {
        let report = |progress: &PakProgress| {
            if let Some(callback) = &self.progress {
                callback(progress);
            }
        };

        let summary = PakOperations::create_with_compression_and_progress(
            source,
            output,
            self.compression,
            &report,
        )?;
        let entries = meta_entries(summary.files.iter().map(String::as_str));

        tracing::info!(
            "{mod_name}: packed {} files ({}), {} meta entries",
            summary.file_count(),
            summary.compression.as_str(),
            entries.len()
        );
        Ok(entries)
    }
}

/// [`ArchiveBuilder`] writing `{mod_name}.zip` next to the prefix
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiveBuilder;

impl ArchiveBuilder for ZipArchiveBuilder {
    fn build(
        &self,
        staging_dir: &Path,
        zip_prefix: &Path,
        mod_name: &str,
    ) -> unilarian::Result<PathBuf> {
        create_mod_zip(staging_dir, zip_prefix, mod_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[test]
    fn test_lspk_builder_returns_meta_entries() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("MyMod");
        for folder in ["Mods/MyMod", "Mods/MyModPatch", "Public/MyMod"] {
            fs::create_dir_all(src.join(folder)).unwrap();
        }
        fs::write(src.join("Mods/MyMod/meta.lsx"), "<save/>").unwrap();
        fs::write(src.join("Mods/MyModPatch/meta.lsx"), "<save/>").unwrap();
        fs::write(src.join("Public/MyMod/data.txt"), "data").unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let builder = LspkPakBuilder::new(CompressionMethod::Zlib)
            .with_progress(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let output = temp.path().join("staging/MyMod.pak");
        let entries = builder.process(&src, "MyMod", &output).unwrap();

        assert_eq!(
            entries,
            vec!["Mods/MyMod/meta.lsx".to_string(), "Mods/MyModPatch/meta.lsx".to_string()]
        );
        assert!(output.is_file());
        assert_eq!(PakOperations::list(&output).unwrap().len(), 3);
        assert!(calls.load(Ordering::SeqCst) > 0);
    }

    #[test]
    fn test_lspk_builder_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let result = LspkPakBuilder::default().process(
            &temp.path().join("missing"),
            "missing",
            &temp.path().join("missing.pak"),
        );
        assert!(result.is_err());
        assert!(!temp.path().join("missing.pak").exists());
    }
}
