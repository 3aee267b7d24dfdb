// src/recipe/parser.rs

//! Recipe file parsing and validation

use crate::error::{Error, Result};
use crate::recipe::descriptor::{PackageDescriptor, SourceRef};
use crate::recipe::format::Recipe;
use crate::recipe::template;
use std::path::Path;
use tracing::debug;

/// Parse a recipe from a YAML string, expanding template variables first
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    let rendered = template::render(content)?;
    if rendered.trim().is_empty() {
        return Ok(Recipe::default());
    }
    serde_yaml::from_str(&rendered).map_err(|e| Error::Parse(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    debug!("Reading recipe {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_recipe(&content)
}

/// Parse and validate a recipe file into a descriptor
pub fn load_descriptor(path: &Path) -> Result<PackageDescriptor> {
    let recipe = parse_recipe_file(path)?;
    PackageDescriptor::from_recipe(&recipe)
}

/// Validate a recipe for completeness and correctness
///
/// Hard failures (missing required fields, malformed constraints, mixed
/// source variants) are errors; everything else is returned as warnings.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let descriptor = PackageDescriptor::from_recipe(recipe)?;
    Ok(descriptor_warnings(&descriptor))
}

/// Non-fatal findings about an already validated descriptor
pub fn descriptor_warnings(descriptor: &PackageDescriptor) -> Vec<String> {
    let mut warnings = Vec::new();

    if descriptor.about.license.is_none() {
        warnings.push("Missing about.license".to_string());
    }
    if descriptor.about.summary.is_none() {
        warnings.push("Missing about.summary".to_string());
    }
    if descriptor.self_test.is_empty() {
        warnings.push("No test.imports or test.commands; the package is never self-tested".to_string());
    }
    if let Some(SourceRef::Git { url, rev: None }) = &descriptor.source {
        warnings.push(format!("Git source {} has no git_rev and is not reproducible", url));
    }
    if let Some(SourceRef::Archive { url, sha256: None }) = &descriptor.source {
        warnings.push(format!("Archive source {} has no sha256", url));
    }
    if descriptor.maintainers.is_empty() {
        warnings.push("No maintainers listed in extra.maintainers".to_string());
    }

    warnings
}
