// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are conda-style `meta.yaml` files. Every field is optional at the
//! serde level: absent required fields are reported by the validator as
//! `MissingField` with their dotted path, not as YAML errors.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};

/// A complete recipe as read from disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recipe {
    /// Package name and version
    #[serde(default)]
    pub package: PackageSection,

    /// Where the sources come from (optional)
    #[serde(default)]
    pub source: Option<SourceSection>,

    /// Build number, noarch marker, script and other flags
    #[serde(default)]
    pub build: BuildSection,

    /// Dependencies per phase
    #[serde(default)]
    pub requirements: RequirementsSection,

    /// Test dependencies, imports and commands
    #[serde(default)]
    pub test: TestSection,

    /// Descriptive metadata
    #[serde(default)]
    pub about: AboutSection,

    /// Maintainers and other free-form data
    #[serde(default)]
    pub extra: ExtraSection,
}

/// Package metadata section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageSection {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: Option<String>,

    /// Unquoted YAML numbers (`version: 1.0`) are accepted and stringified
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: Option<String>,
}

/// Source section; exactly one of git, archive or path may be given
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSection {
    #[serde(default)]
    pub git_url: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub git_rev: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub sha256: Option<String>,

    #[serde(default)]
    pub path: Option<String>,
}

/// Build section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSection {
    /// Build number (for rebuilds of the same version)
    #[serde(default)]
    pub number: Option<u64>,

    /// `python`, `generic`, or absent for arch-specific builds
    #[serde(default)]
    pub noarch: Option<String>,

    #[serde(default)]
    pub script: Option<Script>,

    /// Any other build flags, carried through untouched
    #[serde(flatten)]
    pub flags: BTreeMap<String, serde_yaml::Value>,
}

/// A build script given either as one line or a list of lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Script {
    Line(String),
    Lines(Vec<String>),
}

impl Script {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Script::Line(line) => vec![line.as_str()],
            Script::Lines(lines) => lines.iter().map(|s| s.as_str()).collect(),
        }
    }
}

/// Requirements section
///
/// A key written with no value (`run:`) reads as an empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementsSection {
    #[serde(default, deserialize_with = "string_list")]
    pub build: Vec<String>,

    #[serde(default, deserialize_with = "string_list")]
    pub host: Vec<String>,

    #[serde(default, deserialize_with = "string_list")]
    pub run: Vec<String>,
}

/// Test section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestSection {
    /// Extra dependencies needed only to run the tests
    #[serde(default, deserialize_with = "string_list")]
    pub requires: Vec<String>,

    /// Modules that must import cleanly
    #[serde(default, deserialize_with = "string_list")]
    pub imports: Vec<String>,

    /// Commands that must exit 0, e.g. `python -c "import odl; odl.test()"`
    #[serde(default, deserialize_with = "string_list")]
    pub commands: Vec<String>,
}

/// About section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_url: Option<String>,
}

/// Extra section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraSection {
    #[serde(default, alias = "recipe-maintainers", deserialize_with = "string_list")]
    pub maintainers: Vec<String>,
}

/// Dependency phase, named after the recipe section that declares it
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Build,
    Host,
    Run,
    Test,
}

impl Phase {
    /// Dotted manifest path of the list this phase is read from
    pub fn field(self) -> &'static str {
        match self {
            Phase::Build => "requirements.build",
            Phase::Host => "requirements.host",
            Phase::Run => "requirements.run",
            Phase::Test => "test.requires",
        }
    }
}

impl Recipe {
    /// Raw requirement strings declared for a phase
    pub fn requirements_for(&self, phase: Phase) -> &[String] {
        match phase {
            Phase::Build => &self.requirements.build,
            Phase::Host => &self.requirements.host,
            Phase::Run => &self.requirements.run,
            Phase::Test => &self.test.requires,
        }
    }
}

/// Read a YAML scalar (string, number or bool) as a string
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::String(s) => Ok(Some(s)),
        serde_yaml::Value::Number(n) => Ok(Some(n.to_string())),
        serde_yaml::Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!(
            "expected a scalar value, found {:?}",
            other
        ))),
    }
}

/// Read a list of scalars; `null` reads as an empty list
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(Vec::new()),
        serde_yaml::Value::Sequence(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                serde_yaml::Value::String(s) => Ok(s),
                serde_yaml::Value::Number(n) => Ok(n.to_string()),
                other => Err(D::Error::custom(format!(
                    "expected a list of strings, found item {:?}",
                    other
                ))),
            })
            .collect(),
        serde_yaml::Value::String(s) => Ok(vec![s]),
        other => Err(D::Error::custom(format!(
            "expected a list of strings, found {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_phase_string_conversion() {
        assert_eq!(Phase::Host.to_string(), "host");
        assert_eq!(Phase::from_str("test").unwrap(), Phase::Test);
        assert!(Phase::from_str("runtime").is_err());
    }

    #[test]
    fn test_numeric_version_is_stringified() {
        let recipe: Recipe = serde_yaml::from_str("package:\n  name: odl\n  version: 1.5\n").unwrap();
        assert_eq!(recipe.package.version.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_empty_requirement_key_is_empty_list() {
        let recipe: Recipe = serde_yaml::from_str("requirements:\n  host:\n  run:\n    - numpy\n").unwrap();
        assert!(recipe.requirements.host.is_empty());
        assert_eq!(recipe.requirements.run, vec!["numpy".to_string()]);
    }

    #[test]
    fn test_script_line_or_lines() {
        let one: BuildSection = serde_yaml::from_str("script: python -m pip install .").unwrap();
        assert_eq!(one.script.unwrap().lines(), vec!["python -m pip install ."]);

        let many: BuildSection = serde_yaml::from_str("script:\n  - a\n  - b\n").unwrap();
        assert_eq!(many.script.unwrap().lines(), vec!["a", "b"]);
    }

    #[test]
    fn test_build_flags_are_kept() {
        let build: BuildSection = serde_yaml::from_str("number: 2\nnoarch: python\nskip: true\n").unwrap();
        assert_eq!(build.number, Some(2));
        assert_eq!(build.noarch.as_deref(), Some("python"));
        assert!(build.flags.contains_key("skip"));
    }

    #[test]
    fn test_recipe_maintainers_alias() {
        let recipe: Recipe =
            serde_yaml::from_str("extra:\n  recipe-maintainers:\n    - kohr-h\n").unwrap();
        assert_eq!(recipe.extra.maintainers, vec!["kohr-h".to_string()]);
    }
}
