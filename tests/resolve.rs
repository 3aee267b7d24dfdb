// tests/resolve.rs

//! End-to-end recipe resolution tests.

mod common;

use common::{ODL_CATALOG, ODL_RECIPE, minimal_recipe, setup_recipe_dir};
use larder::{
    BuildPlan, Catalog, DependencyGraph, Error, PackageDescriptor, Phase, ResolveOptions,
    Resolver, SelectionPolicy, parse_recipe, resolve_descriptor, resolve_recipe_file,
};

fn descriptor(content: &str) -> PackageDescriptor {
    PackageDescriptor::from_recipe(&parse_recipe(content).unwrap()).unwrap()
}

fn catalog(content: &str) -> Catalog {
    Catalog::parse_toml(content).unwrap()
}

#[test]
fn test_numpy_range_picks_newest_inside_bounds() {
    let desc = descriptor(&minimal_recipe(&["numpy >=1.19, <1.27"]));
    let cat = catalog("[packages]\nnumpy = [\"1.18\", \"1.20\", \"1.26\", \"1.27\"]\n");

    let plan = resolve_descriptor(&desc, &cat, ResolveOptions::default()).unwrap();
    assert_eq!(plan.get("numpy").unwrap().to_string(), "1.26");
}

#[test]
fn test_scipy_lower_bound_unsatisfiable() {
    let desc = descriptor(&minimal_recipe(&["scipy >=1.1"]));
    let cat = catalog("[packages]\nscipy = [\"1.0\"]\n");

    match resolve_descriptor(&desc, &cat, ResolveOptions::default()) {
        Err(Error::UnsatisfiableConstraint { name, constraints }) => {
            assert_eq!(name, "scipy");
            assert_eq!(constraints, ">=1.1");
        }
        other => panic!("expected UnsatisfiableConstraint, got {:?}", other),
    }
}

#[test]
fn test_missing_package_version() {
    let content = "package:\n  name: odl\nrequirements:\n  run:\n    - numpy\n";
    let recipe = parse_recipe(content).unwrap();
    match PackageDescriptor::from_recipe(&recipe) {
        Err(Error::MissingField(field)) => assert_eq!(field, "package.version"),
        other => panic!("expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_full_recipe_resolves_within_constraints() {
    let (_dir, recipe_path) = setup_recipe_dir(ODL_RECIPE, Some(ODL_CATALOG));
    let cat = catalog(ODL_CATALOG);

    let plan = resolve_recipe_file(&recipe_path, &cat, ResolveOptions::default()).unwrap();
    assert_eq!(plan.package, "odl");
    assert_eq!(plan.version.to_string(), "0.7.0");

    let expected = [
        ("python", "3.12"),
        ("pip", "24.2"),
        ("setuptools", "69.0"),
        ("future", "0.18.3"),
        ("packaging", "24.0"),
        ("numpy", "1.26"),
        ("scipy", "1.11.4"),
        ("pytest", "8.1.1"),
    ];
    assert_eq!(plan.len(), expected.len());
    for (name, version) in expected {
        assert_eq!(plan.get(name).unwrap().to_string(), version, "{}", name);
    }

    // Every resolved version satisfies every constraint on its name
    let desc = larder::load_descriptor(&recipe_path).unwrap();
    let graph = DependencyGraph::build(&desc).unwrap();
    plan.verify(&graph).unwrap();
    for dep in &desc.dependencies {
        let resolved = plan.get(dep.name()).unwrap();
        assert!(dep.spec.constraints.satisfies(resolved), "{}", dep.spec);
    }

    assert_eq!(plan.dependencies["setuptools"].phases, vec![Phase::Host, Phase::Run]);
    assert_eq!(plan.dependencies["pytest"].phases, vec![Phase::Test]);
}

#[test]
fn test_oldest_policy_hits_minimum_bounds() {
    let (_dir, recipe_path) = setup_recipe_dir(ODL_RECIPE, None);
    let cat = catalog(ODL_CATALOG);
    let options = ResolveOptions {
        policy: SelectionPolicy::Oldest,
    };

    let plan = resolve_recipe_file(&recipe_path, &cat, options).unwrap();
    assert_eq!(plan.get("python").unwrap().to_string(), "3.8");
    assert_eq!(plan.get("numpy").unwrap().to_string(), "1.20");
    assert_eq!(plan.get("scipy").unwrap().to_string(), "1.10");
    assert_eq!(plan.get("packaging").unwrap().to_string(), "23.1");
}

#[test]
fn test_resolution_is_idempotent() {
    let desc = descriptor(ODL_RECIPE);
    let cat = catalog(ODL_CATALOG);

    let first = resolve_descriptor(&desc, &cat, ResolveOptions::default()).unwrap();
    let second = resolve_descriptor(&desc, &cat, ResolveOptions::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_toml().unwrap(), second.to_toml().unwrap());
}

#[test]
fn test_lock_round_trip_preserves_plan() {
    let desc = descriptor(ODL_RECIPE);
    let cat = catalog(ODL_CATALOG);
    let plan = resolve_descriptor(&desc, &cat, ResolveOptions::default()).unwrap();

    let restored = BuildPlan::from_toml(&plan.to_toml().unwrap()).unwrap();
    assert_eq!(restored, plan);
}

#[test]
fn test_cross_phase_constraints_are_conjunctive() {
    let content = r#"
package:
  name: demo
  version: "1.0"
requirements:
  host:
    - numpy >=1.20
  run:
    - numpy <1.26
"#;
    let desc = descriptor(content);
    let cat = catalog("[packages]\nnumpy = [\"1.18\", \"1.20\", \"1.22\", \"1.26\"]\n");

    let plan = resolve_descriptor(&desc, &cat, ResolveOptions::default()).unwrap();
    assert_eq!(plan.get("numpy").unwrap().to_string(), "1.22");
    assert_eq!(plan.dependencies["numpy"].constraints.to_string(), ">=1.20, <1.26");
}

#[test]
fn test_provably_disjoint_constraints() {
    let content = r#"
package:
  name: demo
  version: "1.0"
requirements:
  host:
    - numpy >=2.0
  run:
    - numpy <1.0
"#;
    let desc = descriptor(content);
    match DependencyGraph::build(&desc) {
        Err(Error::DuplicateIncompatibleConstraint { name, .. }) => assert_eq!(name, "numpy"),
        other => panic!("expected DuplicateIncompatibleConstraint, got {:?}", other),
    }
}

#[test]
fn test_diagnose_reports_every_conflict() {
    let desc = descriptor(&minimal_recipe(&["numpy >=2.0", "scipy >=1.1", "python"]));
    let cat = catalog("[packages]\nnumpy = [\"1.26\"]\npython = [\"3.12\"]\n");
    let graph = DependencyGraph::build(&desc).unwrap();

    let conflicts = Resolver::new(&cat).diagnose(&graph);
    let names: Vec<&str> = conflicts.iter().map(|c| c.package()).collect();
    assert_eq!(names, vec!["numpy", "scipy"]);
}

#[test]
fn test_malformed_constraint_in_recipe() {
    let content = minimal_recipe(&["numpy ~=1.19"]);
    let recipe = parse_recipe(&content).unwrap();
    let err = PackageDescriptor::from_recipe(&recipe).unwrap_err();
    assert_eq!(err.kind(), "MalformedConstraint");
    assert!(err.to_string().contains("~=1.19"));
}

#[test]
fn test_prerelease_package_version_resolves() {
    let content = minimal_recipe(&["numpy >=1.19, <1.27"]).replace("\"1.0\"", "1.0.0-rc.1");
    let (_dir, recipe_path) = setup_recipe_dir(&content, None);
    let cat = catalog("[packages]\nnumpy = [\"1.20\", \"1.26\"]\n");

    let plan = resolve_recipe_file(&recipe_path, &cat, ResolveOptions::default()).unwrap();
    assert_eq!(plan.version.as_str(), "1.0.0-rc.1");
    assert_eq!(plan.get("numpy").unwrap().to_string(), "1.26");
    assert!(plan.to_text().starts_with("demo 1.0.0-rc.1\n"));
    assert_eq!(BuildPlan::from_toml(&plan.to_toml().unwrap()).unwrap(), plan);
}
