// tests/common/mod.rs

//! Shared test utilities and fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A recipe modeled on the conda-forge recipe of a numerical library.
pub const ODL_RECIPE: &str = r#"{% set name = "odl" %}
{% set version = "0.7.0" %}

package:
  name: {{ name|lower }}
  version: {{ version }}

source:
  git_url: https://github.com/odlgroup/odl
  git_rev: v{{ version }}

build:
  number: 0
  noarch: python
  script: {{ PYTHON }} -m pip install . --no-deps -vv

requirements:
  host:
    - python >=3.7
    - pip
    - setuptools >=65.0
  run:
    - python >=3.7
    - setuptools >=65.0
    - future >=0.16
    - packaging >=17.0
    - numpy >=1.19, <1.27
    - scipy >=1.1

test:
  requires:
    - pytest >=5.4.0
  imports:
    - odl
  commands:
    - python -c "import odl; odl.test()"

about:
  home: https://github.com/odlgroup/odl
  license: MPL-2.0
  license_file: LICENSE
  summary: Operator Discretization Library

extra:
  maintainers:
    - adler-j
    - kohr-h
"#;

/// A catalog that satisfies every requirement of [`ODL_RECIPE`].
pub const ODL_CATALOG: &str = r#"
[packages]
python = ["3.6", "3.8", "3.11", "3.12"]
pip = ["23.0", "24.2"]
setuptools = ["60.0", "65.5", "69.0"]
future = ["0.18.3"]
packaging = ["16.8", "23.1", "24.0"]
numpy = ["1.18", "1.20", "1.26", "1.27"]
scipy = ["1.0", "1.10", "1.11.4"]
pytest = ["5.3.5", "7.4.0", "8.1.1"]
"#;

/// Create a temp directory holding `meta.yaml` and, optionally, `catalog.toml`.
///
/// Returns (TempDir, recipe_path) - keep the TempDir alive to prevent cleanup.
pub fn setup_recipe_dir(recipe: &str, catalog: Option<&str>) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let recipe_path = write_file(temp_dir.path(), "meta.yaml", recipe);
    if let Some(catalog) = catalog {
        write_file(temp_dir.path(), "catalog.toml", catalog);
    }
    (temp_dir, recipe_path)
}

/// Write a file into a directory and return its path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// A minimal valid recipe with the given run requirements.
pub fn minimal_recipe(run: &[&str]) -> String {
    let mut recipe = String::from("package:\n  name: demo\n  version: \"1.0\"\nrequirements:\n  run:\n");
    for req in run {
        recipe.push_str("    - ");
        recipe.push_str(req);
        recipe.push('\n');
    }
    recipe
}
