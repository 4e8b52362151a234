//! Error types for `UniLarian`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `UniLarian` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== PAK Archive Errors ====================
    /// The file is not a valid PAK archive (missing LSPK magic).
    #[error("invalid PAK magic: expected LSPK")]
    InvalidPakMagic,

    /// The PAK version is outside the supported range.
    #[error("unsupported PAK version: {version} (supported: {min}-{max})")]
    UnsupportedPakVersion {
        /// The version found in the header.
        version: u32,
        /// Lowest supported version.
        min: u32,
        /// Highest supported version.
        max: u32,
    },

    /// A relative path does not fit in a file table entry.
    #[error("path too long for PAK file table ({len} bytes, max {max}): {path}")]
    PathTooLong {
        /// The offending relative path.
        path: String,
        /// Its length in bytes.
        len: usize,
        /// The longest path the table can hold.
        max: usize,
    },

    /// A single file exceeds the 32-bit size fields of the file table.
    #[error("file {path} is too large: {size} bytes")]
    FileTooLarge {
        /// The offending relative path.
        path: String,
        /// The size that overflowed.
        size: usize,
    },

    /// The archive holds more files (or data) than the format can address.
    #[error("PAK contains too many files: {count}")]
    TooManyFiles {
        /// The number of files in the PAK.
        count: usize,
    },

    /// A header, footer or table field points past the end of the archive.
    #[error("corrupt PAK: {0}")]
    CorruptPak(String),

    /// The requested file was not found in the PAK archive.
    #[error("file not found in PAK: {0}")]
    FileNotFoundInPak(String),

    // ==================== Compression Errors ====================
    /// Decompressing a table or file entry failed.
    #[error("decompression failed: {0}")]
    DecompressionError(String),

    // ==================== Archive Errors ====================
    /// Zip archive creation failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    /// A directory that must exist is missing.
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `UniLarian` operations.
pub type Result<T> = std::result::Result<T, Error>;
