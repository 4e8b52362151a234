//! Mod structure validation

use std::path::Path;

use super::meta::read_mod_metadata;

/// Standard top-level folders of a BG3 mod
const STANDARD_DIRS: [&str; 3] = ["Mods", "Public", "Localization"];

/// Result of mod structure validation
#[derive(Clone, Debug, Default)]
pub struct ModValidationResult {
    /// Whether the mod structure looks loadable
    pub valid: bool,
    /// Found structure elements (e.g., "+ Mods/", "+ Mods/MyMod/meta.lsx")
    pub structure: Vec<String>,
    /// Warning messages about potential issues
    pub warnings: Vec<String>,
}

/// Validate a mod source directory
///
/// Checks for the standard mod folders and a `Mods/*/meta.lsx` with a UUID.
/// Problems are reported as warnings; the caller decides whether they matter.
#[must_use]
pub fn validate_mod_structure(mod_path: &Path) -> ModValidationResult {
    let mut result = ModValidationResult::default();

    for dir_name in STANDARD_DIRS {
        if mod_path.join(dir_name).is_dir() {
            result.structure.push(format!("+ {dir_name}/"));
        }
    }

    let mut meta_folders: Vec<String> = std::fs::read_dir(mod_path.join("Mods"))
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entry| entry.path().join("meta.lsx").is_file())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    meta_folders.sort();
    for folder in &meta_folders {
        result.structure.push(format!("+ Mods/{folder}/meta.lsx"));
    }

    if meta_folders.is_empty() {
        result
            .warnings
            .push("No meta.lsx found under Mods/ - mod may not load properly".to_string());
    } else if let Some(metadata) = read_mod_metadata(mod_path) {
        tracing::debug!(
            "ModuleInfo: name={:?} folder={:?} uuid={:?} version={:?}",
            metadata.name,
            metadata.folder,
            metadata.uuid,
            metadata.version_string()
        );
        if !metadata.is_valid() {
            result.warnings.push("meta.lsx is missing a UUID".to_string());
        }
    }

    if !STANDARD_DIRS.iter().any(|d| mod_path.join(d).is_dir()) {
        result.warnings.push(
            "No standard mod directories found (Mods/, Public/, Localization/)".to_string(),
        );
    }

    result.valid = result.warnings.is_empty();
    result
}
