// src/commands/resolve.rs

//! Resolution commands

use crate::cli::PlanFormat;
use anyhow::{Result, anyhow};
use larder::Error;
use larder::catalog::Catalog;
use larder::resolver::{self, BuildPlan, ResolveOptions, Resolver, SelectionPolicy};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default catalog file looked up beside the recipe
pub const DEFAULT_CATALOG_NAME: &str = "catalog.toml";

/// Catalog used when `--catalog` is not given
pub fn default_catalog_path(manifest: &Path) -> PathBuf {
    manifest
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_CATALOG_NAME)
}

/// Render a plan in the requested format
pub fn render_plan(plan: &BuildPlan, format: PlanFormat) -> Result<String> {
    let rendered = match format {
        PlanFormat::Text => plan.to_text(),
        PlanFormat::Json => plan.to_json()? + "\n",
        PlanFormat::Toml => plan.to_toml()?,
    };
    Ok(rendered)
}

/// Resolve one recipe and print or write the plan
pub fn cmd_resolve(
    manifest: &Path,
    catalog_path: Option<&Path>,
    policy: SelectionPolicy,
    format: PlanFormat,
    output: Option<&Path>,
) -> Result<()> {
    let catalog_path = catalog_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_catalog_path(manifest));
    info!("Resolving {} against {}", manifest.display(), catalog_path.display());

    // Recipe errors take precedence over catalog errors
    let descriptor = resolver::load_manifest(manifest)?;
    let graph = resolver::build_graph(&descriptor)?;
    let catalog = Catalog::from_file(&catalog_path)?;

    let options = ResolveOptions { policy };
    let plan = match resolver::resolve_graph(&graph, &catalog, options) {
        Ok(plan) => plan,
        Err(e) => {
            for conflict in Resolver::with_options(&catalog, options).diagnose(&graph) {
                info!("{}", conflict);
            }
            return Err(e.into());
        }
    };

    let rendered = render_plan(&plan, format)?;
    match output {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
            println!(
                "Resolved {} dependencies of {} {}; plan written to {}",
                plan.len(),
                plan.package,
                plan.version,
                path.display()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Resolve several recipes in parallel against one catalog
///
/// Prints one line per recipe in input order; fails if any recipe failed.
pub fn cmd_batch(manifests: &[PathBuf], catalog_path: &Path, policy: SelectionPolicy) -> Result<()> {
    let catalog = Catalog::from_file(catalog_path)?;
    let options = ResolveOptions { policy };

    let results: Vec<_> = manifests
        .par_iter()
        .map(|path| resolver::resolve_recipe_file(path, &catalog, options))
        .collect();

    let mut failed = 0;
    for (path, result) in manifests.iter().zip(&results) {
        match result {
            Ok(plan) => println!(
                "{}: ok {} {} ({} dependencies)",
                path.display(),
                plan.package,
                plan.version,
                plan.len()
            ),
            Err(e) => {
                failed += 1;
                println!(
                    "{}: failed during {}: {}",
                    path.display(),
                    resolver::Stage::failed_during(e),
                    e
                );
            }
        }
    }

    if failed > 0 {
        return Err(anyhow!("{} of {} recipes failed to resolve", failed, manifests.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_beside_manifest() {
        assert_eq!(
            default_catalog_path(Path::new("recipes/odl/meta.yaml")),
            PathBuf::from("recipes/odl/catalog.toml")
        );
        assert_eq!(
            default_catalog_path(Path::new("meta.yaml")),
            PathBuf::from("catalog.toml")
        );
    }
}
