// src/resolver/conflict.rs

//! Conflict types for dependency resolution
//!
//! A conflict describes one dependency the catalog cannot serve. The resolver
//! fails on the first of them; `Resolver::diagnose` lists them all.

use crate::recipe::Phase;

/// A dependency that cannot be resolved against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// The catalog knows the package but no version fits
    UnsatisfiableConstraint {
        package: String,
        constraints: String,
        /// Versions the catalog offers, ascending
        available: Vec<String>,
        required_by: Vec<Phase>,
    },
    /// The catalog has no entry for the package at all
    MissingPackage {
        package: String,
        constraints: String,
        required_by: Vec<Phase>,
    },
}

impl Conflict {
    pub fn package(&self) -> &str {
        match self {
            Conflict::UnsatisfiableConstraint { package, .. }
            | Conflict::MissingPackage { package, .. } => package,
        }
    }
}

fn join_phases(phases: &[Phase]) -> String {
    phases
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conflict::UnsatisfiableConstraint {
                package,
                constraints,
                available,
                required_by,
            } => write!(
                f,
                "No version of {} satisfies {} (available: {}) required by {}",
                package,
                constraints,
                available.join(", "),
                join_phases(required_by)
            ),
            Conflict::MissingPackage {
                package,
                constraints,
                required_by,
            } => write!(
                f,
                "Missing package {} ({}) required by {}",
                package,
                constraints,
                join_phases(required_by)
            ),
        }
    }
}
