//! SPDX-FileCopyrightText: 2025 CyberDeco, 2015 Norbyte (LSLib, MIT), 2023 saghm (xiba, Apache-2.0)
//!
//! SPDX-License-Identifier: MIT AND Apache-2.0
//!
//! LSPK PAK file reader

use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::PathBuf;

use byteorder::{LittleEndian, ReadBytesExt};

use super::{
    CompressionMethod, FileTableEntry, LspkFooter, LspkHeader, MAGIC, MAX_OFFSET, MAX_VERSION,
    MIN_VERSION, PATH_LENGTH, TABLE_ENTRY_SIZE,
};
use crate::error::{Error, Result};

/// LSPK PAK file reader
pub struct LspkReader<R: Read + Seek> {
    reader: BufReader<R>,
    header: Option<LspkHeader>,
    footer: Option<LspkFooter>,
}

impl<R: Read + Seek> LspkReader<R> {
    /// Create a new reader from a Read + Seek source
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            header: None,
            footer: None,
        }
    }

    /// PAK version, once the header has been read
    pub fn version(&self) -> Option<u32> {
        self.header.as_ref().map(|h| h.version)
    }

    fn stream_len(&mut self) -> Result<u64> {
        Ok(self.reader.seek(SeekFrom::End(0))?)
    }

    /// Read and parse the PAK file header
    ///
    /// # Errors
    /// Returns an error if reading fails, the magic number is invalid or the
    /// version is unsupported.
    fn read_header(&mut self) -> Result<LspkHeader> {
        self.reader.seek(SeekFrom::Start(0))?;

        let mut magic = [0u8; 4];
        self.reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(Error::InvalidPakMagic);
        }

        let version = self.reader.read_u32::<LittleEndian>()?;
        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            return Err(Error::UnsupportedPakVersion {
                version,
                min: MIN_VERSION,
                max: MAX_VERSION,
            });
        }

        let footer_offset = self.reader.read_u64::<LittleEndian>()?;

        Ok(LspkHeader {
            version,
            footer_offset,
        })
    }

    /// Read the footer; leaves the stream positioned at the compressed table
    fn read_footer(&mut self, header: &LspkHeader) -> Result<LspkFooter> {
        self.reader.seek(SeekFrom::Start(header.footer_offset))?;

        let num_files = self.reader.read_u32::<LittleEndian>()?;
        let table_size_compressed = self.reader.read_u32::<LittleEndian>()?;

        Ok(LspkFooter {
            num_files,
            table_size_compressed,
        })
    }

    /// Read header, footer and file table
    ///
    /// # Errors
    /// Returns an error if any section is malformed or the table fails to decompress.
    pub fn list_files(&mut self) -> Result<Vec<FileTableEntry>> {
        let header = self.read_header()?;
        let footer = self.read_footer(&header)?;

        let table_start = header.footer_offset + FOOTER_FIELDS_SIZE;
        let stream_len = self.stream_len()?;
        let available = stream_len.saturating_sub(table_start);
        if u64::from(footer.table_size_compressed) > available {
            return Err(Error::CorruptPak(format!(
                "file table of {} bytes at offset {table_start} exceeds archive length {stream_len}",
                footer.table_size_compressed
            )));
        }

        let table_bytes = u64::from(footer.num_files) * TABLE_ENTRY_SIZE as u64;
        if table_bytes > u64::from(footer.table_size_compressed) * MAX_LZ4_RATIO + MAX_LZ4_RATIO {
            return Err(Error::CorruptPak(format!(
                "{} file entries cannot fit in a {}-byte table",
                footer.num_files, footer.table_size_compressed
            )));
        }

        let num_files = footer.num_files as usize;
        let table_size_decompressed = num_files * TABLE_ENTRY_SIZE;

        let mut compressed_table = vec![0u8; footer.table_size_compressed as usize];
        self.reader.read_exact(&mut compressed_table)?;

        let table = lz4_flex::block::decompress(&compressed_table, table_size_decompressed)
            .map_err(|e| Error::DecompressionError(format!("file table: {e}")))?;
        if table.len() != table_size_decompressed {
            return Err(Error::DecompressionError(format!(
                "file table: expected {table_size_decompressed} bytes, got {}",
                table.len()
            )));
        }

        let entries = table
            .chunks_exact(TABLE_ENTRY_SIZE)
            .map(parse_file_entry)
            .collect::<Result<Vec<_>>>()?;

        self.header = Some(header);
        self.footer = Some(footer);
        Ok(entries)
    }

    /// Read and decompress a single file
    ///
    /// # Errors
    /// Returns an error if reading or decompression fails.
    pub fn read_file(&mut self, entry: &FileTableEntry) -> Result<Vec<u8>> {
        let stream_len = self.stream_len()?;
        if entry.offset.saturating_add(u64::from(entry.size_compressed)) > stream_len {
            return Err(Error::CorruptPak(format!(
                "{} extends past the end of the archive",
                entry.path.display()
            )));
        }

        self.reader.seek(SeekFrom::Start(entry.offset))?;
        let mut data = vec![0u8; entry.size_compressed as usize];
        self.reader.read_exact(&mut data)?;

        match entry.compression {
            CompressionMethod::None => Ok(data),
            CompressionMethod::Lz4 => {
                lz4_flex::block::decompress(&data, entry.size_decompressed as usize).map_err(|e| {
                    Error::DecompressionError(format!("{}: {e}", entry.path.display()))
                })
            }
            CompressionMethod::Zlib => {
                let mut decoder = flate2::read::ZlibDecoder::new(data.as_slice());
                let mut out = Vec::with_capacity(entry.size_decompressed as usize);
                decoder.read_to_end(&mut out).map_err(|e| {
                    Error::DecompressionError(format!("{}: {e}", entry.path.display()))
                })?;
                Ok(out)
            }
        }
    }
}

/// File count and compressed table size precede the table
const FOOTER_FIELDS_SIZE: u64 = 8;

/// Upper bound on what one LZ4 block byte can expand to
const MAX_LZ4_RATIO: u64 = 255;

/// Parse a single 272-byte file table entry
fn parse_file_entry(mut bytes: &[u8]) -> Result<FileTableEntry> {
    let path_end = bytes[..PATH_LENGTH]
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(PATH_LENGTH);
    let path = PathBuf::from(String::from_utf8_lossy(&bytes[..path_end]).as_ref());
    bytes = &bytes[PATH_LENGTH..];

    let offset_low = bytes.read_u32::<LittleEndian>()?;
    let offset_high = bytes.read_u16::<LittleEndian>()?;
    let offset = (u64::from(offset_low) | (u64::from(offset_high) << 32)) & MAX_OFFSET;

    let _archive_part = bytes.read_u8()?;
    let flags = bytes.read_u8()?;

    let size_compressed = bytes.read_u32::<LittleEndian>()?;
    let size_decompressed = bytes.read_u32::<LittleEndian>()?;

    Ok(FileTableEntry {
        path,
        offset,
        size_compressed,
        size_decompressed,
        compression: CompressionMethod::from_flags(flags),
    })
}
