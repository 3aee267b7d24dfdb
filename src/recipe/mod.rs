// src/recipe/mod.rs

//! Recipe loading, validation and normalization
//!
//! Recipes are conda-style `meta.yaml` manifests describing how an existing
//! library is packaged: its name and version, where the sources live, the
//! requirements of each phase and how the result is self-tested.
//!
//! # Example Recipe
//!
//! ```yaml
//! {% set version = "0.7.0" %}
//!
//! package:
//!   name: odl
//!   version: {{ version }}
//!
//! source:
//!   git_url: https://github.com/odlgroup/odl
//!   git_rev: v{{ version }}
//!
//! requirements:
//!   host:
//!     - python
//!     - setuptools
//!   run:
//!     - python
//!     - numpy >=1.19, <1.27
//!     - scipy >=1.1
//!
//! test:
//!   imports:
//!     - odl
//!   commands:
//!     - python -c "import odl; odl.test()"
//! ```
//!
//! # Lifecycle
//!
//! - [`parse_recipe`] expands template variables and reads the YAML into a
//!   [`Recipe`] where every field is optional
//! - [`PackageDescriptor::from_recipe`] checks required fields and parses
//!   every requirement line; the descriptor is immutable from then on
//! - [`normalize`] emits the canonical form used for diffing and review

mod descriptor;
mod format;
mod normalize;
pub mod parser;
pub mod template;

pub use descriptor::{Dependency, PackageDescriptor, SelfTest, SourceRef};
pub use format::{
    AboutSection, BuildSection, ExtraSection, PackageSection, Phase, Recipe, RequirementsSection,
    Script, SourceSection, TestSection,
};
pub use normalize::{normalize, NormalizedDescriptor, NormalizedPackage};
pub use parser::{
    descriptor_warnings, load_descriptor, parse_recipe, parse_recipe_file, validate_recipe,
};
