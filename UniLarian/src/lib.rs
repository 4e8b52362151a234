#![allow(non_snake_case)]
//! # UniLarian
//!
//! Packaging engine for Baldur's Gate 3 mods.
//!
//! - **PAK archives** - write and read LSPK packages
//! - **Mods** - `meta.lsx` discovery, `ModuleInfo` parsing, structure checks
//! - **Archive** - zip wrapping of a packaged mod for mod managers
//!
//! ## Quick Start
//!
//! ```no_run
//! use unilarian::pak::PakOperations;
//! use unilarian::mods::meta_entries;
//!
//! let summary = PakOperations::create("MyMod", "MyMod.pak")?;
//! let metas = meta_entries(summary.files.iter().map(String::as_str));
//! println!("Packed {} files, {} meta.lsx", summary.file_count(), metas.len());
//! # Ok::<(), unilarian::Error>(())
//! ```

pub mod archive;
pub mod error;
pub mod mods;
pub mod pak;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::archive::create_mod_zip;
    pub use crate::error::{Error, Result};
    pub use crate::mods::{MetaEntry, ModValidationResult, meta_entries, validate_mod_structure};
    pub use crate::pak::{CompressionMethod, PakOperations, PakProgress, PakSummary};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
