//! PAK archive operations module

pub mod lspk;
mod operations;

// Primary public API
pub use operations::{PakOperations, PakSummary, ProgressCallback};

// Re-export public LSPK types
pub use lspk::{CompressionMethod, FileTableEntry, PakPhase, PakProgress};
