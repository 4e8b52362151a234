//! Argument resolution: absolute source/destination paths and the mod name

use std::path::{Path, PathBuf};

use unilarian::utils::clean_path;

use crate::error::{Error, Result};

/// One packaging invocation, fixed once resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingRequest {
    source: PathBuf,
    destination: PathBuf,
    mod_name: String,
    zip: bool,
}

impl PackagingRequest {
    /// Resolve raw CLI arguments
    ///
    /// `~` is expanded, relative paths are made absolute against the working
    /// directory and `.`/`..` are folded away. A missing or blank destination
    /// becomes the parent of the source. Existence is not checked here, see
    /// [`PackagingRequest::validate_source`].
    pub fn resolve(source: &str, destination: Option<&str>, zip: bool) -> Result<Self> {
        let source = absolutize(source)?;

        let mod_name = source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                Error::InvalidPath(format!("{} has no folder name", source.display()))
            })?;

        let destination = match destination.map(str::trim).filter(|d| !d.is_empty()) {
            Some(dest) => absolutize(dest)?,
            None => source
                .parent()
                .map_or_else(|| source.clone(), Path::to_path_buf),
        };

        Ok(Self {
            source,
            destination,
            mod_name,
            zip,
        })
    }

    /// Fail with [`Error::InvalidSource`] unless the source is an existing directory
    pub fn validate_source(&self) -> Result<()> {
        if self.source.is_dir() {
            Ok(())
        } else {
            Err(Error::InvalidSource {
                path: self.source.clone(),
            })
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Final segment of the source folder
    pub fn mod_name(&self) -> &str {
        &self.mod_name
    }

    pub fn zip(&self) -> bool {
        self.zip
    }

    /// `{destination}/{mod_name}.pak`
    pub fn pak_destination(&self) -> PathBuf {
        self.destination.join(format!("{}.pak", self.mod_name))
    }
}

fn absolutize(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(raw);
    let absolute = std::path::absolute(Path::new(expanded.as_ref()))
        .map_err(|e| Error::InvalidPath(format!("{raw}: {e}")))?;
    Ok(clean_path(absolute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_destination_is_parent() {
        let request = PackagingRequest::resolve("/mods/work/MyMod", None, false).unwrap();
        assert_eq!(request.source(), Path::new("/mods/work/MyMod"));
        assert_eq!(request.destination(), Path::new("/mods/work"));
        assert_eq!(request.mod_name(), "MyMod");
        assert_eq!(request.pak_destination(), PathBuf::from("/mods/work/MyMod.pak"));
        assert!(!request.zip());
    }

    #[test]
    fn test_blank_destination_is_default() {
        let request = PackagingRequest::resolve("/mods/MyMod", Some("  "), true).unwrap();
        assert_eq!(request.destination(), Path::new("/mods"));
        assert!(request.zip());
    }

    #[test]
    fn test_normalizes_dot_segments() {
        let request =
            PackagingRequest::resolve("/mods/./work/../MyMod/", Some("/out/x/.."), false).unwrap();
        assert_eq!(request.source(), Path::new("/mods/MyMod"));
        assert_eq!(request.destination(), Path::new("/out"));
        assert_eq!(request.mod_name(), "MyMod");
    }

    #[test]
    fn test_relative_source_becomes_absolute() {
        let request = PackagingRequest::resolve("MyMod", None, false).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert!(request.source().is_absolute());
        assert_eq!(request.source(), clean_path(cwd.join("MyMod")));
        assert_eq!(request.destination(), clean_path(cwd));
    }

    #[test]
    fn test_tilde_expansion() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let request = PackagingRequest::resolve("~/MyMod", None, false).unwrap();
        assert_eq!(request.source(), clean_path(home.join("MyMod")));
    }

    #[test]
    fn test_root_has_no_mod_name() {
        let result = PackagingRequest::resolve("/", None, false);
        assert!(matches!(result, Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_validate_missing_source() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("Missing");
        let request = PackagingRequest::resolve(&missing.to_string_lossy(), None, false).unwrap();
        assert!(matches!(
            request.validate_source(),
            Err(Error::InvalidSource { path }) if path == missing
        ));
    }
}
