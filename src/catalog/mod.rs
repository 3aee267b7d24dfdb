// src/catalog/mod.rs

//! Available-version catalogs
//!
//! The resolver only needs to ask "which versions of X exist?", expressed by
//! the [`VersionCatalog`] trait. [`Catalog`] is the in-memory implementation,
//! loaded from a TOML or JSON file:
//!
//! ```toml
//! [packages]
//! numpy = ["1.18", "1.20", "1.26", "1.27"]
//! scipy = ["1.0"]
//! ```

use crate::error::{Error, Result};
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// Source of available versions per dependency name
pub trait VersionCatalog {
    /// Available versions of `name` in ascending order, or `None` if the name is unknown
    fn versions(&self, name: &str) -> Option<Vec<Version>>;
}

/// On-disk catalog layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    packages: BTreeMap<String, Vec<String>>,
}

/// Name → sorted set of available versions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    packages: BTreeMap<String, BTreeSet<Version>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog file; `.json` files are read as JSON, anything else as TOML
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading catalog {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse_toml(&content)
        }
    }

    pub fn parse_toml(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| Error::Parse(format!("Invalid catalog: {}", e)))?;
        Self::from_catalog_file(file)
    }

    pub fn parse_json(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)
            .map_err(|e| Error::Parse(format!("Invalid catalog: {}", e)))?;
        Self::from_catalog_file(file)
    }

    fn from_catalog_file(file: CatalogFile) -> Result<Self> {
        let mut catalog = Self::new();
        for (name, versions) in &file.packages {
            let versions: Vec<&str> = versions.iter().map(String::as_str).collect();
            catalog.add(name, &versions)?;
        }
        debug!("Catalog holds {} packages", catalog.len());
        Ok(catalog)
    }

    /// Add versions of a package, parsing each one
    ///
    /// Duplicate versions collapse; a name with no versions is still recorded
    /// as known.
    pub fn add(&mut self, name: &str, versions: &[&str]) -> Result<()> {
        let entry = self.packages.entry(name.to_string()).or_default();
        for v in versions {
            let version = Version::parse(v).map_err(|e| {
                Error::invalid(format!("catalog.packages.{}", name), e.to_string())
            })?;
            entry.insert(version);
        }
        Ok(())
    }

    pub fn insert(&mut self, name: &str, version: Version) {
        self.packages
            .entry(name.to_string())
            .or_default()
            .insert(version);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Serialize back to the TOML file layout
    pub fn to_toml(&self) -> Result<String> {
        let file = CatalogFile {
            packages: self
                .packages
                .iter()
                .map(|(name, versions)| {
                    (name.clone(), versions.iter().map(|v| v.to_string()).collect())
                })
                .collect(),
        };
        toml::to_string(&file).map_err(|e| Error::Parse(format!("Failed to emit catalog: {}", e)))
    }
}

impl VersionCatalog for Catalog {
    fn versions(&self, name: &str) -> Option<Vec<Version>> {
        self.packages
            .get(name)
            .map(|set| set.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_toml_sorts_versions() {
        let catalog = Catalog::parse_toml(
            r#"
[packages]
numpy = ["1.27", "1.18", "1.26", "1.20"]
"#,
        )
        .unwrap();
        let versions: Vec<String> = catalog
            .versions("numpy")
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(versions, vec!["1.18", "1.20", "1.26", "1.27"]);
        assert!(catalog.versions("scipy").is_none());
    }

    #[test]
    fn test_parse_json() {
        let catalog = Catalog::parse_json(r#"{"packages": {"scipy": ["1.0"]}}"#).unwrap();
        assert!(catalog.contains("scipy"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_duplicate_versions_collapse() {
        let mut catalog = Catalog::new();
        catalog.add("numpy", &["1.19", "1.19.0", "1.20"]).unwrap();
        assert_eq!(catalog.versions("numpy").unwrap().len(), 2);
    }

    #[test]
    fn test_bad_version_names_package() {
        let err = Catalog::parse_toml("[packages]\nnumpy = [\"1.0rc1\"]\n").unwrap_err();
        assert_eq!(err.kind(), "InvalidField");
        assert!(err.to_string().contains("catalog.packages.numpy"));
    }

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let mut json = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        write!(json, r#"{{"packages": {{"numpy": ["1.26"]}}}}"#).unwrap();
        assert!(Catalog::from_file(json.path()).unwrap().contains("numpy"));

        let mut toml_file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        write!(toml_file, "[packages]\nnumpy = [\"1.26\"]\n").unwrap();
        assert!(Catalog::from_file(toml_file.path()).unwrap().contains("numpy"));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut catalog = Catalog::new();
        catalog.add("numpy", &["1.26", "1.20"]).unwrap();
        catalog.add("scipy", &["1.0"]).unwrap();
        let again = Catalog::parse_toml(&catalog.to_toml().unwrap()).unwrap();
        assert_eq!(catalog, again);
    }
}
