// src/recipe/descriptor.rs

//! Validated, immutable package descriptors
//!
//! A [`PackageDescriptor`] is what the rest of the crate works with: the
//! recipe after required fields have been checked and every requirement line
//! has been parsed into a [`DependencySpec`].

use crate::error::{Error, Result};
use crate::recipe::format::{AboutSection, BuildSection, Phase, Recipe, SourceSection};
use crate::version::{DependencySpec, PackageVersion};
use serde::Serialize;
use std::fmt;
use strum::IntoEnumIterator;

/// Where the package sources come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceRef {
    Git {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        rev: Option<String>,
    },
    Archive {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        sha256: Option<String>,
    },
    Path {
        path: String,
    },
}

impl SourceRef {
    /// Pick the single source variant declared in a source section
    ///
    /// Returns `Ok(None)` for an empty section.
    pub fn from_section(section: &SourceSection) -> Result<Option<Self>> {
        let mut declared = Vec::new();
        if section.git_url.is_some() {
            declared.push("git_url");
        }
        if section.url.is_some() {
            declared.push("url");
        }
        if section.path.is_some() {
            declared.push("path");
        }

        if declared.len() > 1 {
            return Err(Error::invalid(
                "source",
                format!("{} are mutually exclusive", declared.join(", ")),
            ));
        }
        if section.git_rev.is_some() && section.git_url.is_none() {
            return Err(Error::invalid("source.git_rev", "git_rev requires git_url"));
        }
        if section.sha256.is_some() && section.url.is_none() {
            return Err(Error::invalid("source.sha256", "sha256 requires url"));
        }

        let source = if let Some(url) = &section.git_url {
            Some(SourceRef::Git {
                url: url.clone(),
                rev: section.git_rev.clone(),
            })
        } else if let Some(url) = &section.url {
            Some(SourceRef::Archive {
                url: url.clone(),
                sha256: section.sha256.clone(),
            })
        } else {
            section
                .path
                .as_ref()
                .map(|path| SourceRef::Path { path: path.clone() })
        };

        Ok(source)
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::Git { url, rev: Some(rev) } => write!(f, "git {}@{}", url, rev),
            SourceRef::Git { url, rev: None } => write!(f, "git {}", url),
            SourceRef::Archive { url, .. } => write!(f, "archive {}", url),
            SourceRef::Path { path } => write!(f, "path {}", path),
        }
    }
}

/// A parsed requirement tagged with the phase that declared it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub spec: DependencySpec,
    pub phase: Phase,
}

impl Dependency {
    pub fn name(&self) -> &str {
        &self.spec.name
    }
}

/// The self-test contract of the packaged library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelfTest {
    /// Modules that must be importable
    pub imports: Vec<String>,
    /// Commands that must exit 0
    pub commands: Vec<String>,
}

impl SelfTest {
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.commands.is_empty()
    }
}

/// A validated recipe
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: PackageVersion,
    pub source: Option<SourceRef>,
    pub build: BuildSection,
    /// Every requirement, in phase order then declaration order
    pub dependencies: Vec<Dependency>,
    pub self_test: SelfTest,
    pub about: AboutSection,
    pub maintainers: Vec<String>,
}

impl PackageDescriptor {
    /// Check required fields and parse every requirement line
    ///
    /// Required fields are checked in order: `package.name`,
    /// `package.version`, `requirements.run`.
    pub fn from_recipe(recipe: &Recipe) -> Result<Self> {
        let name = required(recipe.package.name.as_deref(), "package.name")?;
        let version_str = required(recipe.package.version.as_deref(), "package.version")?;
        if recipe.requirements.run.iter().all(|r| r.trim().is_empty()) {
            return Err(Error::MissingField(Phase::Run.field().to_string()));
        }

        let version = PackageVersion::parse(version_str)?;

        let source = match &recipe.source {
            Some(section) => SourceRef::from_section(section)?,
            None => None,
        };

        let mut dependencies = Vec::new();
        for phase in Phase::iter() {
            for line in recipe.requirements_for(phase) {
                if line.trim().is_empty() {
                    continue;
                }
                let spec = DependencySpec::parse(line)?;
                dependencies.push(Dependency { spec, phase });
            }
        }

        Ok(Self {
            name: name.to_string(),
            version,
            source,
            build: recipe.build.clone(),
            dependencies,
            self_test: SelfTest {
                imports: recipe.test.imports.clone(),
                commands: recipe.test.commands.clone(),
            },
            about: recipe.about.clone(),
            maintainers: recipe.extra.maintainers.clone(),
        })
    }

    /// Dependencies declared for one phase
    pub fn dependencies_in(&self, phase: Phase) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().filter(move |d| d.phase == phase)
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingField(field.to_string())),
    }
}
