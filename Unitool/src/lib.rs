#![allow(non_snake_case)]
//! Unitool - turn a Baldur's Gate 3 mod folder into a `.pak`
//!
//! The [`packaging`] pipeline stages a `.pak` built by `unilarian`, then
//! either moves it next to the mod (or into a chosen folder) or wraps it in a
//! zip with an `info.json` manifest.

// Re-export unilarian
pub use unilarian;

pub mod config;
pub mod error;
pub mod packaging;

// Feature-gated modules
#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
pub use packaging::{PackagingOutcome, PackagingRequest, Packager};
