// src/lib.rs

//! Larder: a package descriptor resolver
//!
//! Turns conda-style build recipes into validated, reproducible build plans.
//!
//! # Architecture
//!
//! - Recipes: YAML manifests with light templating, validated into immutable
//!   descriptors
//! - Constraints: dotted-numeric versions and `>=`, `<=`, `>`, `<`, `==`
//!   conjunctions
//! - Graph: one node per dependency name, one edge per requiring phase
//! - Resolution: newest satisfying version per node against a catalog,
//!   independent per node and therefore parallel

pub mod catalog;
mod error;
pub mod recipe;
pub mod resolver;
pub mod version;

pub use catalog::{Catalog, VersionCatalog};
pub use error::{Error, Result};
pub use recipe::{
    Dependency, NormalizedDescriptor, PackageDescriptor, Phase, Recipe, SourceRef, load_descriptor,
    normalize, parse_recipe, validate_recipe,
};
pub use resolver::{
    BuildPlan, Conflict, DependencyGraph, ResolveOptions, Resolver, SelectionPolicy,
    resolve_descriptor, resolve_recipe_file,
};
pub use version::{Constraint, ConstraintSet, DependencySpec, Operator, PackageVersion, Version};
