//! Run-keyed metadata registry and its `info.json` manifest form

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;
use unilarian::mods::MetaEntry;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Identifier of one packaging run (UUID v4)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RunId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Metadata entries per run, in insertion order
///
/// Each key is written once. Serializes as `{ "<run id>": ["entry", ...] }`.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct MetaRegistry {
    runs: IndexMap<RunId, Vec<MetaEntry>>,
}

impl MetaRegistry {
    /// Record the entries of one run
    pub fn record(&mut self, run_id: RunId, entries: Vec<MetaEntry>) -> Result<()> {
        match self.runs.entry(run_id) {
            Entry::Occupied(existing) => Err(Error::DuplicateRun(existing.key().clone())),
            Entry::Vacant(slot) => {
                slot.insert(entries);
                Ok(())
            }
        }
    }

    pub fn entries(&self, run_id: &RunId) -> Option<&[MetaEntry]> {
        self.runs.get(run_id).map(Vec::as_slice)
    }

    pub fn run_ids(&self) -> impl Iterator<Item = &RunId> {
        self.runs.keys()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Pretty-printed `info.json` content
    pub fn to_manifest(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the manifest to `path`
    pub fn write_manifest(&self, path: &Path) -> Result<()> {
        let manifest = self.to_manifest()?;
        std::fs::write(path, manifest)?;
        tracing::debug!("Wrote manifest with {} run(s) to {}", self.len(), path.display());
        Ok(())
    }
}
