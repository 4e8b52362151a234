//! `meta.lsx` discovery and `ModuleInfo` parsing

use std::path::Path;

/// Identifier of one packaged metadata resource.
///
/// For PAKs built by this crate it is the forward-slash archive path of a
/// `meta.lsx` file, e.g. `Mods/MyMod/meta.lsx`.
pub type MetaEntry = String;

const META_FILE_NAME: &str = "meta.lsx";

/// Whether an archive path names a `meta.lsx` file (case-insensitive)
#[must_use]
pub fn is_meta_file(archive_path: &str) -> bool {
    archive_path
        .rsplit('/')
        .next()
        .is_some_and(|name| name.eq_ignore_ascii_case(META_FILE_NAME))
}

/// Pick the metadata entries out of a PAK file list, keeping its order
pub fn meta_entries<'a, I>(archive_paths: I) -> Vec<MetaEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    archive_paths
        .into_iter()
        .filter(|p| is_meta_file(p))
        .map(str::to_string)
        .collect()
}

/// `ModuleInfo` fields read from a meta.lsx
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModMetadata {
    pub name: String,
    pub folder: String,
    pub uuid: String,
    pub author: String,
    pub version64: Option<i64>,
}

impl ModMetadata {
    /// Version64 as `major.minor.revision.build`
    ///
    /// Encoding: major << 55 | minor << 47 | revision << 31 | build
    #[must_use]
    pub fn version_string(&self) -> Option<String> {
        self.version64.map(|v| {
            let major = (v >> 55) & 0x7F;
            let minor = (v >> 47) & 0xFF;
            let revision = (v >> 31) & 0xFFFF;
            let build = v & 0x7FFF_FFFF;
            format!("{major}.{minor}.{revision}.{build}")
        })
    }

    /// Has at minimum a UUID
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.uuid.is_empty()
    }
}

fn attribute_value<'a>(line: &'a str, attr_name: &str) -> Option<&'a str> {
    let pattern = format!("{attr_name}=\"");
    let start = line.find(&pattern)? + pattern.len();
    let end = line[start..].find('"')?;
    Some(&line[start..start + end])
}

/// Parse the `ModuleInfo` node of a meta.lsx document
///
/// Attributes outside `ModuleInfo` (dependencies, publish versions) are ignored.
#[must_use]
pub fn parse_meta_lsx(lsx_content: &str) -> ModMetadata {
    let mut metadata = ModMetadata::default();
    let mut in_module_info = false;

    for line in lsx_content.lines().map(str::trim) {
        if line.contains("<node id=\"ModuleInfo\"") {
            in_module_info = true;
            continue;
        }
        // Nested <children> blocks start after the attributes we want
        if in_module_info && (line == "</node>" || line.starts_with("<children")) {
            in_module_info = false;
        }
        if !in_module_info || !line.starts_with("<attribute") {
            continue;
        }

        let (Some(id), Some(value)) = (attribute_value(line, "id"), attribute_value(line, "value"))
        else {
            continue;
        };
        match id {
            "Name" => metadata.name = value.to_string(),
            "Folder" => metadata.folder = value.to_string(),
            "UUID" => metadata.uuid = value.to_string(),
            "Author" => metadata.author = value.to_string(),
            "Version64" => metadata.version64 = value.parse().ok(),
            _ => {}
        }
    }

    metadata
}

/// Read and parse the first meta.lsx under `Mods/*/` or directly in `mod_root`
#[must_use]
pub fn read_mod_metadata(mod_root: &Path) -> Option<ModMetadata> {
    let mods_dir = mod_root.join("Mods");
    let mut candidates: Vec<_> = std::fs::read_dir(&mods_dir)
        .into_iter()
        .flatten()
        .flatten()
        .map(|entry| entry.path().join(META_FILE_NAME))
        .collect();
    candidates.sort();
    candidates.push(mod_root.join(META_FILE_NAME));

    candidates
        .iter()
        .find_map(|path| std::fs::read_to_string(path).ok())
        .map(|content| parse_meta_lsx(&content))
}
