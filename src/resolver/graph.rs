// src/resolver/graph.rs

//! Dependency graph construction
//!
//! The graph is rooted at the package being built. Each node is a
//! dependency name; each edge records a phase that requires it together
//! with the constraints that phase declared. Nodes live in an arena indexed
//! by name, in first-declared order.

use crate::error::{Error, Result};
use crate::recipe::{Dependency, PackageDescriptor, Phase};
use crate::version::{ConstraintSet, DependencySpec, PackageVersion};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// A phase requiring a dependency, with the constraints it declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseEdge {
    pub phase: Phase,
    pub constraints: ConstraintSet,
}

/// A dependency name and everything required of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    pub name: String,
    /// One edge per requiring phase
    pub edges: Vec<PhaseEdge>,
    /// Conjunction of the constraints on every edge
    pub constraints: ConstraintSet,
}

impl DependencyNode {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            edges: Vec::new(),
            constraints: ConstraintSet::new(),
        }
    }

    /// Phases requiring this dependency, in phase order
    pub fn phases(&self) -> Vec<Phase> {
        let mut phases: Vec<Phase> = self.edges.iter().map(|e| e.phase).collect();
        phases.sort();
        phases
    }

    pub fn is_required_in(&self, phase: Phase) -> bool {
        self.edges.iter().any(|e| e.phase == phase)
    }
}

/// Dependency graph of a single package
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    package: String,
    version: PackageVersion,
    nodes: Vec<DependencyNode>,
    index: HashMap<String, usize>,
}

impl DependencyGraph {
    /// Create an empty graph for a package
    pub fn new(package: &str, version: PackageVersion) -> Self {
        Self {
            package: package.to_string(),
            version,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build and check the graph of a descriptor
    pub fn build(descriptor: &PackageDescriptor) -> Result<Self> {
        Self::from_dependencies(
            &descriptor.name,
            descriptor.version.clone(),
            &descriptor.dependencies,
        )
    }

    /// Build and check a graph from phase-tagged dependencies
    ///
    /// Duplicate names, within or across phases, are merged by conjunction.
    /// Fails with `DuplicateIncompatibleConstraint` when the merged
    /// constraints of a name are provably disjoint.
    pub fn from_dependencies(
        package: &str,
        version: PackageVersion,
        dependencies: &[Dependency],
    ) -> Result<Self> {
        let mut graph = Self::new(package, version);
        for dep in dependencies {
            graph.add_requirement(dep.phase, &dep.spec);
        }
        graph.check_compatibility()?;

        debug!(
            "Built dependency graph for {}: {} nodes, {} edges",
            package,
            graph.len(),
            graph.stats().total_edges
        );
        Ok(graph)
    }

    /// Record that `phase` requires `spec`, merging with what is already known
    pub fn add_requirement(&mut self, phase: Phase, spec: &DependencySpec) {
        let idx = match self.index.get(&spec.name) {
            Some(&idx) => idx,
            None => {
                self.nodes.push(DependencyNode::new(&spec.name));
                let idx = self.nodes.len() - 1;
                self.index.insert(spec.name.clone(), idx);
                idx
            }
        };

        let node = &mut self.nodes[idx];
        match node.edges.iter_mut().find(|e| e.phase == phase) {
            Some(edge) => edge.constraints.extend(&spec.constraints),
            None => node.edges.push(PhaseEdge {
                phase,
                constraints: spec.constraints.clone(),
            }),
        }
        node.constraints.extend(&spec.constraints);
    }

    /// Conservative range-intersection test over every node
    pub fn check_compatibility(&self) -> Result<()> {
        for node in &self.nodes {
            if let Some((first, second)) = node.constraints.first_conflict() {
                return Err(Error::DuplicateIncompatibleConstraint {
                    name: node.name.clone(),
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Name of the package this graph belongs to
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Version of the package this graph belongs to
    pub fn version(&self) -> &PackageVersion {
        &self.version
    }

    pub fn node(&self, name: &str) -> Option<&DependencyNode> {
        self.index.get(name).map(|&idx| &self.nodes[idx])
    }

    /// All nodes in first-declared order
    pub fn nodes(&self) -> &[DependencyNode] {
        &self.nodes
    }

    /// Phases requiring a dependency; empty if the name is not in the graph
    pub fn phases_of(&self, name: &str) -> Vec<Phase> {
        self.node(name).map(|n| n.phases()).unwrap_or_default()
    }

    /// Nodes required by one phase
    pub fn in_phase(&self, phase: Phase) -> Vec<&DependencyNode> {
        self.nodes.iter().filter(|n| n.is_required_in(phase)).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get statistics about the dependency graph
    pub fn stats(&self) -> GraphStats {
        let mut per_phase = BTreeMap::new();
        for node in &self.nodes {
            for edge in &node.edges {
                *per_phase.entry(edge.phase).or_insert(0) += 1;
            }
        }

        GraphStats {
            total_dependencies: self.nodes.len(),
            total_edges: per_phase.values().sum(),
            per_phase,
        }
    }
}

/// Statistics about the dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub total_dependencies: usize,
    pub total_edges: usize,
    pub per_phase: BTreeMap<Phase, usize>,
}
