// src/cli/mod.rs
//! CLI definitions for larder
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `resolve` - Resolve a recipe into a build plan
//! - `validate` - Check a recipe and report warnings
//! - `normalize` - Print the canonical form of a recipe
//! - `batch` - Resolve several recipes against one catalog

use clap::{Parser, Subcommand, ValueEnum};
use larder::resolver::SelectionPolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "larder")]
#[command(author = "Larder Contributors")]
#[command(version)]
#[command(about = "Resolve conda-style package recipes into reproducible build plans", long_about = None)]
pub struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a recipe into a build plan
    ///
    /// Exits 0 and prints the plan on success. On failure, prints one line
    /// naming the error kind and the offending field or dependency, and
    /// exits 1.
    Resolve {
        /// Path to the recipe (meta.yaml)
        manifest: PathBuf,

        /// Catalog of available versions (default: catalog.toml beside the recipe)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Which satisfying version to pick
        #[arg(long, value_enum, default_value_t = Prefer::Newest)]
        prefer: Prefer,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = PlanFormat::Text)]
        format: PlanFormat,

        /// Write the plan to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a recipe and print warnings
    Validate {
        /// Path to the recipe (meta.yaml)
        manifest: PathBuf,
    },

    /// Print the normalized form of a recipe
    Normalize {
        /// Path to the recipe (meta.yaml)
        manifest: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = DescriptorFormat::Yaml)]
        format: DescriptorFormat,
    },

    /// Resolve several recipes against one catalog
    Batch {
        /// Paths to the recipes
        #[arg(required = true)]
        manifests: Vec<PathBuf>,

        /// Catalog of available versions
        #[arg(short, long)]
        catalog: PathBuf,

        /// Which satisfying version to pick
        #[arg(long, value_enum, default_value_t = Prefer::Newest)]
        prefer: Prefer,
    },
}

/// Version selection preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Prefer {
    Newest,
    Oldest,
}

impl From<Prefer> for SelectionPolicy {
    fn from(prefer: Prefer) -> Self {
        match prefer {
            Prefer::Newest => SelectionPolicy::Newest,
            Prefer::Oldest => SelectionPolicy::Oldest,
        }
    }
}

/// Build plan output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Text,
    Json,
    Toml,
}

/// Normalized descriptor output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DescriptorFormat {
    Yaml,
    Json,
}
