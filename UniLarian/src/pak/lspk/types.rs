//! Types for LSPK PAK file handling
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT), 2023 saghm (xiba, Apache-2.0)
//!
//! SPDX-License-Identifier: MIT AND Apache-2.0

use std::path::PathBuf;

/// Compression method used for a file in the PAK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMethod {
    None,
    Zlib,
    #[default]
    Lz4,
}

impl CompressionMethod {
    /// Parse compression method from the flags byte
    #[must_use]
    pub fn from_flags(flags: u8) -> Self {
        match flags & 0x0F {
            1 => CompressionMethod::Zlib,
            2 => CompressionMethod::Lz4,
            _ => CompressionMethod::None, // Unknown, treat as uncompressed
        }
    }

    /// Convert compression method to flags byte for writing
    #[must_use]
    pub fn to_flags(self) -> u8 {
        match self {
            CompressionMethod::None => 0,
            CompressionMethod::Zlib => 1,
            CompressionMethod::Lz4 => 2,
        }
    }

    /// Parse a user-facing name (`lz4`, `zlib`, `none`), case-insensitive
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "lz4" => Some(CompressionMethod::Lz4),
            "zlib" => Some(CompressionMethod::Zlib),
            "none" | "store" => Some(CompressionMethod::None),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionMethod::None => "none",
            CompressionMethod::Zlib => "zlib",
            CompressionMethod::Lz4 => "lz4",
        }
    }
}

/// Header of an LSPK PAK file
#[derive(Debug, Clone)]
pub(crate) struct LspkHeader {
    /// Version number
    pub version: u32,
    /// Offset to the footer from the start of the file
    pub footer_offset: u64,
}

/// Footer/metadata of an LSPK PAK file
#[derive(Debug, Clone)]
pub(crate) struct LspkFooter {
    /// Number of files in the archive
    pub num_files: u32,
    /// Size of the compressed file table
    pub table_size_compressed: u32,
}

/// Entry in the file table describing a file in the PAK
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTableEntry {
    /// Path of the file within the archive
    pub path: PathBuf,
    /// Offset of the compressed data from the start of the archive
    pub offset: u64,
    /// Size of the compressed data
    pub size_compressed: u32,
    /// Size of the decompressed data
    pub size_decompressed: u32,
    /// Compression method
    pub compression: CompressionMethod,
}

/// Progress information during PAK operations
#[derive(Debug, Clone)]
pub struct PakProgress {
    /// Current operation phase
    pub phase: PakPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current file being processed (if applicable)
    pub current_file: Option<String>,
}

impl PakProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: PakPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a file/item name
    #[must_use]
    pub fn with_file(
        phase: PakPhase,
        current: usize,
        total: usize,
        file: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }
}

/// Phase of PAK operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PakPhase {
    /// Scanning files in a directory
    ScanningFiles,
    /// Compressing and writing file data
    CompressingFiles,
    /// Writing file table to PAK
    WritingTable,
    /// Operation complete
    Complete,
}

impl PakPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScanningFiles => "Scanning files",
            Self::CompressingFiles => "Compressing files",
            Self::WritingTable => "Writing file table",
            Self::Complete => "Complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_flags() {
        for method in [CompressionMethod::None, CompressionMethod::Zlib, CompressionMethod::Lz4] {
            assert_eq!(CompressionMethod::from_flags(method.to_flags()), method);
        }
        // Upper nibble carries unrelated flags
        assert_eq!(CompressionMethod::from_flags(0x42), CompressionMethod::Lz4);
    }

    #[test]
    fn test_compression_from_name() {
        assert_eq!(CompressionMethod::from_name("LZ4"), Some(CompressionMethod::Lz4));
        assert_eq!(CompressionMethod::from_name(" zlib "), Some(CompressionMethod::Zlib));
        assert_eq!(CompressionMethod::from_name("none"), Some(CompressionMethod::None));
        assert_eq!(CompressionMethod::from_name("zstd"), None);
    }
}
