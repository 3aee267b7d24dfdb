// src/resolver/plan.rs

//! Resolution plan data structures
//!
//! A [`BuildPlan`] maps every dependency of a package to one concrete
//! version. It serializes to TOML (the lock form), JSON, or plain text:
//!
//! ```toml
//! package = "odl"
//! version = "0.7.0"
//!
//! [dependencies.numpy]
//! version = "1.26"
//! phases = ["host", "run"]
//! constraints = ">=1.19, <1.27"
//! ```

use crate::error::{Error, Result};
use crate::recipe::Phase;
use crate::version::{ConstraintSet, PackageVersion, Version};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::graph::DependencyGraph;

/// The version chosen for one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDependency {
    pub version: Version,
    /// Phases that require the dependency
    pub phases: Vec<Phase>,
    /// Merged constraints the version was chosen against
    pub constraints: ConstraintSet,
}

/// Result of dependency resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub package: String,
    pub version: PackageVersion,
    #[serde(default)]
    pub dependencies: BTreeMap<String, ResolvedDependency>,
}

impl BuildPlan {
    pub fn new(package: &str, version: PackageVersion) -> Self {
        Self {
            package: package.to_string(),
            version,
            dependencies: BTreeMap::new(),
        }
    }

    /// Version chosen for a dependency
    pub fn get(&self, name: &str) -> Option<&Version> {
        self.dependencies.get(name).map(|d| &d.version)
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Check the plan against a graph
    ///
    /// Every node must have exactly one entry and that entry must satisfy
    /// the node's merged constraints; the plan must hold nothing else.
    pub fn verify(&self, graph: &DependencyGraph) -> Result<()> {
        for node in graph.nodes() {
            let Some(resolved) = self.dependencies.get(&node.name) else {
                return Err(Error::UnsatisfiableConstraint {
                    name: node.name.clone(),
                    constraints: node.constraints.to_string(),
                });
            };
            if !node.constraints.satisfies(&resolved.version) {
                return Err(Error::UnsatisfiableConstraint {
                    name: node.name.clone(),
                    constraints: node.constraints.to_string(),
                });
            }
        }

        if let Some(extra) = self
            .dependencies
            .keys()
            .find(|name| graph.node(name).is_none())
        {
            return Err(Error::invalid(
                format!("plan.dependencies.{}", extra),
                "not required by the recipe",
            ));
        }

        Ok(())
    }

    /// One line per dependency: `name version (phases)`
    pub fn to_text(&self) -> String {
        let mut out = format!("{} {}\n", self.package, self.version);
        for (name, dep) in &self.dependencies {
            let phases: Vec<String> = dep.phases.iter().map(|p| p.to_string()).collect();
            let _ = writeln!(out, "  {} {} ({})", name, dep.version, phases.join(", "));
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Parse(format!("Failed to serialize plan: {}", e)))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Parse(format!("Failed to serialize plan: {}", e)))
    }

    /// Read back a plan written by [`BuildPlan::to_toml`]
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Parse(format!("Invalid plan: {}", e)))
    }
}
