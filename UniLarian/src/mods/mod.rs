//! Mod utilities - metadata discovery and structure validation for BG3 mods

pub mod meta;
pub mod validation;

pub use meta::{MetaEntry, ModMetadata, is_meta_file, meta_entries, parse_meta_lsx, read_mod_metadata};
pub use validation::{ModValidationResult, validate_mod_structure};
