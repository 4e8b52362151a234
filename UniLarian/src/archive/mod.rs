//! Zip packaging of staged mod output
//!
//! Wraps every file of a staging directory (the built `.pak` and its
//! `info.json`) into a single deflate-compressed zip for mod managers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};
use crate::utils::normalize_path;

/// Where [`create_mod_zip`] writes: `{mod_name}.zip` next to the prefix
///
/// The prefix is a placeholder inside the output folder (`dest/_`), so the
/// archive lands in `dest/`.
#[must_use]
pub fn zip_path_for(zip_prefix: &Path, mod_name: &str) -> PathBuf {
    let dir = zip_prefix.parent().unwrap_or(zip_prefix);
    dir.join(format!("{mod_name}.zip"))
}

/// Zip the contents of `staging_dir` into `{parent of zip_prefix}/{mod_name}.zip`
///
/// Entries are stored relative to `staging_dir` in sorted order. An existing
/// archive at the target path is replaced.
///
/// # Errors
///
/// Returns [`Error::DirectoryNotFound`] if `staging_dir` is missing,
/// [`Error::Io`] / [`Error::Zip`] if the archive cannot be written.
pub fn create_mod_zip(staging_dir: &Path, zip_prefix: &Path, mod_name: &str) -> Result<PathBuf> {
    if !staging_dir.is_dir() {
        return Err(Error::DirectoryNotFound(staging_dir.to_path_buf()));
    }

    let zip_path = zip_path_for(zip_prefix, mod_name);
    if let Some(parent) = zip_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(staging_dir).min_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry
            .path()
            .strip_prefix(staging_dir)
            .map(normalize_path)
            .map_err(|_| Error::InvalidPath(entry.path().display().to_string()))?;
        files.push((name, entry.into_path()));
    }
    files.sort();

    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .large_file(true);

    let mut zip = ZipWriter::new(BufWriter::new(File::create(&zip_path)?));
    for (name, path) in &files {
        tracing::debug!("Adding {} to {}", name, zip_path.display());
        zip.start_file(name.as_str(), options)?;
        let mut source = File::open(path)?;
        std::io::copy(&mut source, &mut zip)?;
    }
    zip.finish()?.flush()?;

    tracing::info!("Created {} ({} entries)", zip_path.display(), files.len());
    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_zip_path_for_prefix() {
        let path = zip_path_for(Path::new("/out/_"), "MyMod");
        assert_eq!(path, PathBuf::from("/out/MyMod.zip"));
    }

    #[test]
    fn test_create_mod_zip_contents() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("MyMod.pak"), b"LSPK-data").unwrap();
        fs::write(staging.join("info.json"), b"{}").unwrap();

        let out = temp.path().join("out");
        let zip_path = create_mod_zip(&staging, &out.join("_"), "MyMod").unwrap();
        assert_eq!(zip_path, out.join("MyMod.zip"));

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, vec!["MyMod.pak", "info.json"]);

        let mut pak = String::new();
        archive.by_name("MyMod.pak").unwrap().read_to_string(&mut pak).unwrap();
        assert_eq!(pak, "LSPK-data");
    }

    #[test]
    fn test_missing_staging_dir() {
        let temp = TempDir::new().unwrap();
        let result = create_mod_zip(&temp.path().join("gone"), &temp.path().join("_"), "X");
        assert!(matches!(result, Err(Error::DirectoryNotFound(_))));
    }
}
