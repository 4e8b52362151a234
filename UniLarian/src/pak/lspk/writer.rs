//! LSPK PAK file writer with progress callbacks

use std::fs::OpenOptions;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use walkdir::WalkDir;

use super::{
    CompressionMethod, MAGIC, MAX_OFFSET, MAX_VERSION, PATH_LENGTH, PakPhase, PakProgress,
    TABLE_ENTRY_SIZE,
};
use crate::error::{Error, Result};
use crate::utils::normalize_path;

/// Progress callback type for write operations
pub type WriteProgressCallback<'a> = &'a (dyn Fn(&PakProgress) + Sync + Send);

/// Header: magic + version + footer offset
const HEADER_SIZE: u64 = 16;

/// File to be written to the PAK
struct FileEntry {
    /// Absolute path on disk
    source: PathBuf,
    /// Forward-slash path relative to the root
    archive_path: String,
}

/// Details about a written file entry
struct WrittenEntry {
    archive_path: String,
    offset: u64,
    size_compressed: u32,
    size_decompressed: u32,
}

/// LSPK PAK file writer
pub struct LspkWriter {
    /// Root path of the mod directory
    root_path: PathBuf,
    /// Files to include in the PAK, sorted by archive path
    files: Vec<FileEntry>,
    /// PAK version to write
    version: u32,
    /// Compression method to use
    compression: CompressionMethod,
}

impl LspkWriter {
    /// Create a new writer for the given directory
    ///
    /// The directory is scanned immediately; file contents are read while writing.
    pub fn new(root_path: impl Into<PathBuf>) -> Result<Self> {
        let root_path = root_path.into();
        if !root_path.is_dir() {
            return Err(Error::DirectoryNotFound(root_path));
        }
        let files = Self::collect_files(&root_path)?;

        Ok(Self {
            root_path,
            files,
            version: MAX_VERSION,
            compression: CompressionMethod::Lz4,
        })
    }

    /// Set the PAK version to write
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Set the compression method to use
    #[must_use]
    pub fn with_compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }

    /// Collect all regular files below `root`
    fn collect_files(root: &Path) -> Result<Vec<FileEntry>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry?;

            // Symlinks report their own file type when not followed, so they are skipped here
            if !entry.file_type().is_file() {
                continue;
            }

            if entry.file_name() == ".DS_Store" {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|_| Error::InvalidPath(entry.path().display().to_string()))?;
            let archive_path = normalize_path(relative);

            // One byte is reserved for the NUL terminator
            if archive_path.len() >= PATH_LENGTH {
                return Err(Error::PathTooLong {
                    len: archive_path.len(),
                    path: archive_path,
                    max: PATH_LENGTH - 1,
                });
            }

            files.push(FileEntry {
                source: entry.into_path(),
                archive_path,
            });
        }

        files.sort_by(|a, b| a.archive_path.cmp(&b.archive_path));
        tracing::debug!("Collected {} files from {}", files.len(), root.display());
        Ok(files)
    }

    /// Write the PAK file
    pub fn write(self, output_path: impl AsRef<Path>) -> Result<()> {
        self.write_with_progress(output_path, &|_| {})
    }

    /// Write the PAK file with progress callback
    pub fn write_with_progress(
        self,
        output_path: impl AsRef<Path>,
        progress: WriteProgressCallback,
    ) -> Result<()> {
        let output_path = output_path.as_ref();

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(output_path)?;
        let mut output = BufWriter::new(file);

        output.write_all(&MAGIC)?;
        output.write_u32::<LittleEndian>(self.version)?;
        // Footer offset, patched once the data is written
        output.write_u64::<LittleEndian>(0)?;

        let total_files = self.files.len();
        let mut written_entries = Vec::with_capacity(total_files);
        let mut offset = HEADER_SIZE;

        for (i, file) in self.files.iter().enumerate() {
            progress(&PakProgress::with_file(
                PakPhase::CompressingFiles,
                i + 1,
                total_files,
                file.archive_path.clone(),
            ));

            let data = std::fs::read(&file.source)?;
            let size_decompressed: u32 =
                data.len().try_into().map_err(|_| Error::FileTooLarge {
                    path: file.archive_path.clone(),
                    size: data.len(),
                })?;

            let compressed = compress(self.compression, data)?;
            let size_compressed: u32 =
                compressed.len().try_into().map_err(|_| Error::FileTooLarge {
                    path: file.archive_path.clone(),
                    size: compressed.len(),
                })?;

            if offset > MAX_OFFSET {
                return Err(Error::TooManyFiles { count: total_files });
            }

            output.write_all(&compressed)?;

            written_entries.push(WrittenEntry {
                archive_path: file.archive_path.clone(),
                offset,
                size_compressed,
                size_decompressed,
            });
            offset += u64::from(size_compressed);
        }

        let footer_offset = offset;

        let num_files: u32 = written_entries
            .len()
            .try_into()
            .map_err(|_| Error::TooManyFiles {
                count: written_entries.len(),
            })?;
        output.write_u32::<LittleEndian>(num_files)?;

        progress(&PakProgress::new(PakPhase::WritingTable, total_files, total_files));

        let flags = self.compression.to_flags();
        let mut table_data = Vec::with_capacity(TABLE_ENTRY_SIZE * written_entries.len());

        for entry in &written_entries {
            let entry_start = table_data.len();

            // Path (256 bytes, NUL-padded)
            table_data.extend_from_slice(entry.archive_path.as_bytes());
            table_data.resize(entry_start + PATH_LENGTH, 0);

            // Offset (48 bits), archive part, flags
            table_data.write_u32::<LittleEndian>((entry.offset & 0xFFFF_FFFF) as u32)?;
            table_data.write_u16::<LittleEndian>((entry.offset >> 32) as u16)?;
            table_data.write_u8(0)?;
            table_data.write_u8(flags)?;

            table_data.write_u32::<LittleEndian>(entry.size_compressed)?;
            table_data.write_u32::<LittleEndian>(entry.size_decompressed)?;
        }

        let compressed_table = lz4_flex::block::compress(&table_data);
        let table_size: u32 = compressed_table
            .len()
            .try_into()
            .map_err(|_| Error::TooManyFiles { count: total_files })?;

        output.write_u32::<LittleEndian>(table_size)?;
        output.write_all(&compressed_table)?;

        output.seek(SeekFrom::Start(8))?;
        output.write_u64::<LittleEndian>(footer_offset)?;
        output.flush()?;

        progress(&PakProgress::new(PakPhase::Complete, total_files, total_files));
        tracing::debug!(
            "Wrote {} files ({}) to {}",
            total_files,
            self.compression.as_str(),
            output_path.display()
        );

        Ok(())
    }

    /// Archive paths of the files that will be written, in table order
    pub fn archive_paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.archive_path.as_str())
    }

    /// Get the number of files that will be written
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Get the root path
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

fn compress(method: CompressionMethod, data: Vec<u8>) -> Result<Vec<u8>> {
    match method {
        CompressionMethod::None => Ok(data),
        CompressionMethod::Lz4 => Ok(lz4_flex::block::compress(&data)),
        CompressionMethod::Zlib => {
            use flate2::Compression;
            use flate2::write::ZlibEncoder;
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&data)?;
            Ok(encoder.finish()?)
        }
    }
}
