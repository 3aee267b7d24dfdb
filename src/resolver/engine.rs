// src/resolver/engine.rs

//! Dependency resolver implementation
//!
//! No rule in a recipe ties the version of one dependency to another, so
//! each node is resolved on its own: filter the catalog by the node's merged
//! constraints and pick one version by policy. Nodes are resolved in
//! parallel; failures are reported in graph order so the outcome never
//! depends on scheduling.

use crate::catalog::VersionCatalog;
use crate::error::{Error, Result};
use crate::version::Version;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::conflict::Conflict;
use super::graph::{DependencyGraph, DependencyNode};
use super::plan::{BuildPlan, ResolvedDependency};

/// Which satisfying version to choose
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Highest satisfying version
    #[default]
    Newest,
    /// Lowest satisfying version, for exercising minimum bounds
    Oldest,
}

/// Resolver configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub policy: SelectionPolicy,
}

/// Dependency resolver over a version catalog
pub struct Resolver<'c, C: VersionCatalog + Sync + ?Sized> {
    catalog: &'c C,
    options: ResolveOptions,
}

impl<'c, C: VersionCatalog + Sync + ?Sized> Resolver<'c, C> {
    /// Create a resolver preferring the newest versions
    pub fn new(catalog: &'c C) -> Self {
        Self::with_options(catalog, ResolveOptions::default())
    }

    pub fn with_options(catalog: &'c C, options: ResolveOptions) -> Self {
        Self { catalog, options }
    }

    /// Resolve every node of the graph into a build plan
    ///
    /// Fails with `UnsatisfiableConstraint` naming the first node, in graph
    /// order, that has no satisfying version.
    pub fn resolve(&self, graph: &DependencyGraph) -> Result<BuildPlan> {
        let outcomes: Vec<std::result::Result<ResolvedDependency, Conflict>> = graph
            .nodes()
            .par_iter()
            .map(|node| self.select(node))
            .collect();

        let failures = outcomes.iter().filter(|o| o.is_err()).count();
        let mut plan = BuildPlan::new(graph.package(), graph.version().clone());

        for (node, outcome) in graph.nodes().iter().zip(outcomes) {
            match outcome {
                Ok(resolved) => {
                    debug!("Resolved {} to {}", node.name, resolved.version);
                    plan.dependencies.insert(node.name.clone(), resolved);
                }
                Err(conflict) => {
                    if failures > 1 {
                        warn!(
                            "{} dependencies of {} are unsatisfiable; reporting {}",
                            failures,
                            graph.package(),
                            conflict.package()
                        );
                    }
                    return Err(Error::UnsatisfiableConstraint {
                        name: node.name.clone(),
                        constraints: node.constraints.to_string(),
                    });
                }
            }
        }

        Ok(plan)
    }

    /// List every node the catalog cannot serve, in graph order
    pub fn diagnose(&self, graph: &DependencyGraph) -> Vec<Conflict> {
        graph
            .nodes()
            .par_iter()
            .filter_map(|node| self.select(node).err())
            .collect()
    }

    /// Choose a version for one node
    fn select(&self, node: &DependencyNode) -> std::result::Result<ResolvedDependency, Conflict> {
        let Some(available) = self.catalog.versions(&node.name) else {
            return Err(Conflict::MissingPackage {
                package: node.name.clone(),
                constraints: node.constraints.to_string(),
                required_by: node.phases(),
            });
        };

        let candidates = available.iter().filter(|v| node.constraints.satisfies(v));
        let chosen: Option<&Version> = match self.options.policy {
            SelectionPolicy::Newest => candidates.max(),
            SelectionPolicy::Oldest => candidates.min(),
        };

        match chosen {
            Some(version) => Ok(ResolvedDependency {
                version: version.clone(),
                phases: node.phases(),
                constraints: node.constraints.clone(),
            }),
            None => Err(Conflict::UnsatisfiableConstraint {
                package: node.name.clone(),
                constraints: node.constraints.to_string(),
                available: available.iter().map(|v| v.to_string()).collect(),
                required_by: node.phases(),
            }),
        }
    }
}
