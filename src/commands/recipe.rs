// src/commands/recipe.rs

//! Recipe inspection commands

use crate::cli::DescriptorFormat;
use anyhow::Result;
use larder::recipe::{self, PackageDescriptor};
use larder::resolver::DependencyGraph;
use std::path::Path;

/// Validate a recipe, check its constraints for contradictions, print warnings
pub fn cmd_validate(manifest: &Path) -> Result<()> {
    let recipe = recipe::parse_recipe_file(manifest)?;
    let descriptor = PackageDescriptor::from_recipe(&recipe)?;
    let warnings = recipe::descriptor_warnings(&descriptor);
    let graph = DependencyGraph::build(&descriptor)?;
    let stats = graph.stats();

    println!("{} {} is valid", descriptor.name, descriptor.version);
    if let Some(source) = &descriptor.source {
        println!("  source: {}", source);
    }
    println!(
        "  {} dependencies across {} phase requirements",
        stats.total_dependencies, stats.total_edges
    );
    for (phase, count) in &stats.per_phase {
        println!("    {}: {}", phase, count);
    }
    for warning in &warnings {
        println!("warning: {}", warning);
    }

    Ok(())
}

/// Print the normalized descriptor
pub fn cmd_normalize(manifest: &Path, format: DescriptorFormat) -> Result<()> {
    let descriptor = recipe::load_descriptor(manifest)?;
    let normalized = recipe::normalize(&descriptor);

    match format {
        DescriptorFormat::Yaml => print!("{}", normalized.to_yaml()?),
        DescriptorFormat::Json => println!("{}", normalized.to_json()?),
    }

    Ok(())
}
