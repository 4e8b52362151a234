//! Core PAK archive operations

use std::fs::File;
use std::path::Path;

use super::lspk::{CompressionMethod, FileTableEntry, LspkReader, LspkWriter, PakPhase, PakProgress};
use crate::error::{Error, Result};

/// Progress callback for PAK operations.
///
/// Receives a [`PakProgress`] struct with phase, current/total counts, and optional filename.
pub type ProgressCallback<'a> = &'a (dyn Fn(&PakProgress) + Sync + Send);

/// Summary of a freshly written PAK
#[derive(Debug, Clone, Default)]
pub struct PakSummary {
    /// Archive paths in table order (forward slashes)
    pub files: Vec<String>,
    /// Compression used for file data
    pub compression: CompressionMethod,
}

impl PakSummary {
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// High-level PAK archive operations.
pub struct PakOperations;

impl PakOperations {
    /// Create a PAK file from a directory with LZ4 compression
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectoryNotFound`] if `source_dir` is not a directory,
    /// [`Error::Io`] if a file cannot be read or the output cannot be written,
    /// [`Error::PathTooLong`] / [`Error::FileTooLarge`] if an entry does not fit the format.
    pub fn create<P: AsRef<Path>>(source_dir: P, output_pak: P) -> Result<PakSummary> {
        Self::create_with_compression_and_progress(
            source_dir,
            output_pak,
            CompressionMethod::Lz4,
            &|_| {},
        )
    }

    /// Create a PAK file from a directory with compression and progress callback
    ///
    /// # Errors
    ///
    /// See [`PakOperations::create`].
    pub fn create_with_compression_and_progress<P: AsRef<Path>>(
        source_dir: P,
        output_pak: P,
        compression: CompressionMethod,
        progress: ProgressCallback,
    ) -> Result<PakSummary> {
        progress(&PakProgress::new(PakPhase::ScanningFiles, 0, 1));

        let writer = LspkWriter::new(source_dir.as_ref())?.with_compression(compression);
        let files: Vec<String> = writer.archive_paths().map(str::to_string).collect();

        tracing::info!(
            "Packing {} files from {}",
            files.len(),
            source_dir.as_ref().display()
        );
        writer.write_with_progress(output_pak.as_ref(), progress)?;

        Ok(PakSummary { files, compression })
    }

    /// List contents of a PAK file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the PAK file cannot be opened.
    /// Returns [`Error::InvalidPakMagic`] if the file is not a valid PAK archive.
    pub fn list<P: AsRef<Path>>(pak_path: P) -> Result<Vec<String>> {
        Ok(Self::list_detailed(pak_path)?
            .iter()
            .map(|e| e.path.to_string_lossy().to_string())
            .collect())
    }

    /// List contents of a PAK file with sizes and compression info
    ///
    /// # Errors
    ///
    /// See [`PakOperations::list`].
    pub fn list_detailed<P: AsRef<Path>>(pak_path: P) -> Result<Vec<FileTableEntry>> {
        let mut reader = LspkReader::new(File::open(pak_path.as_ref())?);
        reader.list_files()
    }

    /// Read a single file's bytes from a PAK without extracting
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFoundInPak`] if `file_path` is not in the archive,
    /// plus any error from [`PakOperations::list`].
    pub fn read_file_bytes<P: AsRef<Path>>(pak_path: P, file_path: &str) -> Result<Vec<u8>> {
        let mut reader = LspkReader::new(File::open(pak_path.as_ref())?);
        let entry = reader
            .list_files()?
            .into_iter()
            .find(|e| e.path.to_string_lossy() == file_path)
            .ok_or_else(|| Error::FileNotFoundInPak(file_path.to_string()))?;

        reader.read_file(&entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn sample_mod(root: &Path) {
        fs::create_dir_all(root.join("Mods/Sample")).unwrap();
        fs::create_dir_all(root.join("Public/Sample/Stats")).unwrap();
        fs::write(root.join("Mods/Sample/meta.lsx"), "<save>meta</save>").unwrap();
        fs::write(
            root.join("Public/Sample/Stats/Armor.txt"),
            "new entry \"ARM_Sample\"\n".repeat(64),
        )
        .unwrap();
    }

    #[test]
    fn test_create_then_read_every_compression() {
        for compression in [CompressionMethod::Lz4, CompressionMethod::Zlib, CompressionMethod::None] {
            let temp = TempDir::new().unwrap();
            let src = temp.path().join("Sample");
            sample_mod(&src);
            let pak = temp.path().join("Sample.pak");

            let summary =
                PakOperations::create_with_compression_and_progress(&src, &pak, compression, &|_| {})
                    .unwrap();
            assert_eq!(summary.file_count(), 2);

            let listed = PakOperations::list(&pak).unwrap();
            assert_eq!(listed, summary.files);

            let stats = PakOperations::read_file_bytes(&pak, "Public/Sample/Stats/Armor.txt").unwrap();
            assert_eq!(stats, fs::read(src.join("Public/Sample/Stats/Armor.txt")).unwrap());

            let detailed = PakOperations::list_detailed(&pak).unwrap();
            assert!(detailed.iter().all(|e| e.compression == compression));
        }
    }

    #[test]
    fn test_read_missing_file() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("Sample");
        sample_mod(&src);
        let pak = temp.path().join("Sample.pak");
        PakOperations::create(&src, &pak).unwrap();

        let result = PakOperations::read_file_bytes(&pak, "Nope/missing.txt");
        assert!(matches!(result, Err(Error::FileNotFoundInPak(_))));
    }

    #[test]
    fn test_empty_directory_produces_valid_pak() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("Empty");
        fs::create_dir_all(&src).unwrap();
        let pak = temp.path().join("Empty.pak");

        let summary = PakOperations::create(&src, &pak).unwrap();
        assert_eq!(summary.file_count(), 0);
        assert!(PakOperations::list(&pak).unwrap().is_empty());
    }

    #[test]
    fn test_progress_reports_phases() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("Sample");
        sample_mod(&src);
        let pak = temp.path().join("Sample.pak");

        let phases = Mutex::new(Vec::new());
        PakOperations::create_with_compression_and_progress(
            &src,
            &pak,
            CompressionMethod::Lz4,
            &|p| phases.lock().unwrap().push(p.phase),
        )
        .unwrap();

        let phases = phases.into_inner().unwrap();
        assert_eq!(phases.first(), Some(&PakPhase::ScanningFiles));
        assert_eq!(phases.last(), Some(&PakPhase::Complete));
        assert_eq!(
            phases.iter().filter(|p| **p == PakPhase::CompressingFiles).count(),
            2
        );
    }
}
