// src/resolver/mod.rs

//! Dependency resolution and conflict detection
//!
//! A recipe moves through four stages:
//!
//! ```text
//! Descriptor --parse--> Parsed --build graph--> Graphed --resolve--> Resolved
//!                  \                   \                    \
//!                   +-------------------+--------------------+--> Failed
//! ```
//!
//! `Failed` carries the error kind and the offending field or dependency.

mod conflict;
mod engine;
mod graph;
mod plan;

pub use conflict::Conflict;
pub use engine::{ResolveOptions, Resolver, SelectionPolicy};
pub use graph::{DependencyGraph, DependencyNode, GraphStats, PhaseEdge};
pub use plan::{BuildPlan, ResolvedDependency};

use crate::catalog::VersionCatalog;
use crate::error::{Error, Result};
use crate::recipe::{self, PackageDescriptor};
use std::path::Path;
use strum_macros::Display;
use tracing::debug;

/// Stage of the resolution pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Parsed,
    Graphed,
    Resolved,
    Failed,
}

impl Stage {
    /// The stage whose transition produced an error
    pub fn failed_during(err: &Error) -> &'static str {
        match err {
            Error::DuplicateIncompatibleConstraint { .. } => "build graph",
            Error::UnsatisfiableConstraint { .. } => "resolve",
            _ => "parse",
        }
    }
}

/// Parse and validate a recipe file
pub fn load_manifest(path: &Path) -> Result<PackageDescriptor> {
    let descriptor = recipe::load_descriptor(path).inspect_err(log_failure)?;
    debug!("{} {}", path.display(), Stage::Parsed);
    Ok(descriptor)
}

/// Build and check the dependency graph of a descriptor
pub fn build_graph(descriptor: &PackageDescriptor) -> Result<DependencyGraph> {
    let graph = DependencyGraph::build(descriptor).inspect_err(log_failure)?;
    debug!("{} {}: {} dependencies", descriptor.name, Stage::Graphed, graph.len());
    Ok(graph)
}

/// Resolve a checked graph against a catalog
pub fn resolve_graph<C>(
    graph: &DependencyGraph,
    catalog: &C,
    options: ResolveOptions,
) -> Result<BuildPlan>
where
    C: VersionCatalog + Sync + ?Sized,
{
    let plan = Resolver::with_options(catalog, options)
        .resolve(graph)
        .inspect_err(log_failure)?;
    debug!("{} {}: {} dependencies", graph.package(), Stage::Resolved, plan.len());
    Ok(plan)
}

/// Build the graph of a descriptor and resolve it against a catalog
pub fn resolve_descriptor<C>(
    descriptor: &PackageDescriptor,
    catalog: &C,
    options: ResolveOptions,
) -> Result<BuildPlan>
where
    C: VersionCatalog + Sync + ?Sized,
{
    let graph = build_graph(descriptor)?;
    resolve_graph(&graph, catalog, options)
}

/// Run the whole pipeline on a recipe file
pub fn resolve_recipe_file<C>(path: &Path, catalog: &C, options: ResolveOptions) -> Result<BuildPlan>
where
    C: VersionCatalog + Sync + ?Sized,
{
    let descriptor = load_manifest(path)?;
    resolve_descriptor(&descriptor, catalog, options)
}

fn log_failure(err: &Error) {
    debug!("{} during {}: {}", Stage::Failed, Stage::failed_during(err), err);
}
