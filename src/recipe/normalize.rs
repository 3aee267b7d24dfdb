// src/recipe/normalize.rs

//! Normalized, machine-checkable descriptor output
//!
//! Two recipes that differ only in requirement order, duplicate lines,
//! operator spacing or leading zeros normalize to the same output.

use crate::error::{Error, Result};
use crate::recipe::descriptor::{PackageDescriptor, SelfTest, SourceRef};
use crate::recipe::format::{AboutSection, BuildSection, Phase};
use crate::version::{ConstraintSet, DependencySpec, PackageVersion};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedPackage {
    pub name: String,
    pub version: PackageVersion,
}

/// Canonical form of a [`PackageDescriptor`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedDescriptor {
    pub package: NormalizedPackage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,
    pub build: BuildSection,
    /// Requirement lines per phase, one per name, sorted by name
    pub requirements: BTreeMap<Phase, Vec<String>>,
    pub test: SelfTest,
    pub about: AboutSection,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<String>,
}

impl NormalizedDescriptor {
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Parse(format!("Failed to emit YAML: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Parse(format!("Failed to emit JSON: {}", e)))
    }
}

/// Produce the normalized form of a descriptor
pub fn normalize(descriptor: &PackageDescriptor) -> NormalizedDescriptor {
    let mut merged: BTreeMap<Phase, BTreeMap<&str, ConstraintSet>> = BTreeMap::new();
    for dep in &descriptor.dependencies {
        merged
            .entry(dep.phase)
            .or_default()
            .entry(dep.name())
            .or_default()
            .extend(&dep.spec.constraints);
    }

    let requirements = merged
        .into_iter()
        .map(|(phase, deps)| {
            let lines = deps
                .into_iter()
                .map(|(name, constraints)| {
                    DependencySpec {
                        name: name.to_string(),
                        constraints,
                    }
                    .to_string()
                })
                .collect();
            (phase, lines)
        })
        .collect();

    let mut maintainers = descriptor.maintainers.clone();
    maintainers.sort();
    maintainers.dedup();

    NormalizedDescriptor {
        package: NormalizedPackage {
            name: descriptor.name.clone(),
            version: descriptor.version.clone(),
        },
        source: descriptor.source.clone(),
        build: descriptor.build.clone(),
        requirements,
        test: descriptor.self_test.clone(),
        about: descriptor.about.clone(),
        maintainers,
    }
}
