// src/version/mod.rs

//! Version handling and constraint satisfaction for recipe dependencies
//!
//! Versions are dotted-numeric (`1`, `1.19`, `1.26.4`). Constraints pair one
//! of five operators with a version, and a dependency carries an ordered
//! conjunction of them:
//!
//! ```text
//! numpy >=1.19, <1.27
//! ^^^^^ ^^^^^^^^^^^^^
//! name  constraint set (AND)
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Characters that may start an operator; a dependency name ends at the first of these
const OPERATOR_CHARS: &[char] = &['<', '>', '=', '!', '~', '^'];

/// A dotted-numeric version such as `1.26` or `2.0.1`
///
/// Comparison pads the shorter version with zeros, so `1.19` and `1.19.0`
/// are equal and hash identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    /// Parse a dotted-numeric version string
    ///
    /// Leading zeros inside a component are dropped (`01.2` becomes `1.2`).
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::malformed(s, "empty version"));
        }

        let mut components = Vec::new();
        for part in s.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::malformed(s, "version is not dotted-numeric"));
            }
            let value = part
                .parse::<u64>()
                .map_err(|e| Error::malformed(s, format!("version component '{}': {}", part, e)))?;
            components.push(value);
        }

        Ok(Self { components })
    }

    /// Build a version directly from its components
    pub fn from_components(components: Vec<u64>) -> Self {
        Self { components }
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Components with trailing zeros removed, the form used for equality and hashing
    fn significant(&self) -> &[u64] {
        let end = self
            .components
            .iter()
            .rposition(|&c| c != 0)
            .map_or(0, |i| i + 1);
        &self.components[..end]
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for c in &self.components {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", c)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

/// The version a recipe declares for its own package
///
/// Unlike [`Version`], this is not compared against anything, so pre-release
/// and local suffixes (`1.0.0-rc.1`, `1.0.0.dev0`, `2.1+cuda`) are kept as
/// written. A purely dotted-numeric value is stored in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageVersion(String);

impl PackageVersion {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::MissingField("package.version".to_string()));
        }
        if !s.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(Error::invalid(
                "package.version",
                format!("'{}' must start with a letter or digit", s),
            ));
        }
        if let Some(bad) = s
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '.' | '-' | '_' | '+' | '!'))
        {
            return Err(Error::invalid(
                "package.version",
                format!("'{}' contains '{}'", s, bad),
            ));
        }

        let canonical = match Version::parse(s) {
            Ok(numeric) => numeric.to_string(),
            Err(_) => s.to_string(),
        };
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PackageVersion {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<PackageVersion> for String {
    fn from(v: PackageVersion) -> Self {
        v.0
    }
}

/// Comparison operators accepted in a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Operator {
    #[strum(serialize = ">=")]
    GreaterOrEqual,
    #[strum(serialize = "<=")]
    LessOrEqual,
    #[strum(serialize = ">")]
    GreaterThan,
    #[strum(serialize = "<")]
    LessThan,
    #[strum(serialize = "==")]
    Exact,
}

impl Operator {
    /// Check `version <op> bound`
    pub fn compare(self, version: &Version, bound: &Version) -> bool {
        match self {
            Operator::GreaterOrEqual => version >= bound,
            Operator::LessOrEqual => version <= bound,
            Operator::GreaterThan => version > bound,
            Operator::LessThan => version < bound,
            Operator::Exact => version == bound,
        }
    }
}

/// A single operator + version pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Constraint {
    pub op: Operator,
    pub version: Version,
}

impl Constraint {
    pub fn new(op: Operator, version: Version) -> Self {
        Self { op, version }
    }

    /// Parse a single constraint
    ///
    /// Examples:
    /// - ">=1.19" → GreaterOrEqual(1.19)
    /// - "< 1.27" → LessThan(1.27)
    /// - "1.5" → Exact(1.5)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::malformed(s, "empty constraint"));
        }

        let op_len = s
            .find(|c: char| !OPERATOR_CHARS.contains(&c))
            .unwrap_or(s.len());
        let (op_str, rest) = s.split_at(op_len);

        let op = if op_str.is_empty() {
            // No operator means exact match
            Operator::Exact
        } else {
            Operator::from_str(op_str)
                .map_err(|_| Error::malformed(s, format!("unrecognized operator '{}'", op_str)))?
        };

        let version = Version::parse(rest).map_err(|e| match e {
            Error::MalformedConstraint { reason, .. } => Error::malformed(s, reason),
            other => other,
        })?;

        Ok(Self { op, version })
    }

    /// Check if a version satisfies this constraint
    pub fn satisfies(&self, version: &Version) -> bool {
        self.op.compare(version, &self.version)
    }

    fn lower(&self) -> Option<Bound<'_>> {
        match self.op {
            Operator::GreaterOrEqual | Operator::Exact => Some(Bound::inclusive(&self.version)),
            Operator::GreaterThan => Some(Bound::exclusive(&self.version)),
            Operator::LessOrEqual | Operator::LessThan => None,
        }
    }

    fn upper(&self) -> Option<Bound<'_>> {
        match self.op {
            Operator::LessOrEqual | Operator::Exact => Some(Bound::inclusive(&self.version)),
            Operator::LessThan => Some(Bound::exclusive(&self.version)),
            Operator::GreaterOrEqual | Operator::GreaterThan => None,
        }
    }

    /// Conservative range test: true when no version can satisfy both constraints
    pub fn is_disjoint_with(&self, other: &Constraint) -> bool {
        let lower = pick(self.lower(), other.lower(), Ordering::Greater);
        let upper = pick(self.upper(), other.upper(), Ordering::Less);

        match (lower, upper) {
            (Some(lo), Some(hi)) => match lo.version.cmp(hi.version) {
                Ordering::Greater => true,
                Ordering::Equal => !(lo.inclusive && hi.inclusive),
                Ordering::Less => false,
            },
            _ => false,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.version)
    }
}

impl FromStr for Constraint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Constraint {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Constraint> for String {
    fn from(c: Constraint) -> Self {
        c.to_string()
    }
}

/// One end of the interval a constraint admits
#[derive(Debug, Clone, Copy)]
struct Bound<'a> {
    version: &'a Version,
    inclusive: bool,
}

impl<'a> Bound<'a> {
    fn inclusive(version: &'a Version) -> Self {
        Self { version, inclusive: true }
    }

    fn exclusive(version: &'a Version) -> Self {
        Self { version, inclusive: false }
    }
}

/// Pick the tighter of two bounds; `tighter` is the ordering that wins
fn pick<'a>(a: Option<Bound<'a>>, b: Option<Bound<'a>>, tighter: Ordering) -> Option<Bound<'a>> {
    match (a, b) {
        (Some(a), Some(b)) => match a.version.cmp(b.version) {
            Ordering::Equal => Some(Bound {
                version: a.version,
                inclusive: a.inclusive && b.inclusive,
            }),
            ord if ord == tighter => Some(a),
            _ => Some(b),
        },
        (a, None) => a,
        (None, b) => b,
    }
}

/// An ordered conjunction of constraints; empty means any version
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated constraint list such as `">=1.19, <1.27"`
    ///
    /// An empty string or `*` yields the empty (unconstrained) set.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == "*" {
            return Ok(Self::new());
        }

        let mut set = Self::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(Error::malformed(s, "empty item in constraint list"));
            }
            set.constraints.push(Constraint::parse(part)?);
        }
        Ok(set)
    }

    /// Add a constraint unless an identical one is already present
    pub fn push(&mut self, constraint: Constraint) {
        if !self.constraints.contains(&constraint) {
            self.constraints.push(constraint);
        }
    }

    /// Conjoin every constraint of `other` into this set
    pub fn extend(&mut self, other: &ConstraintSet) {
        for c in &other.constraints {
            self.push(c.clone());
        }
    }

    /// Check if a version satisfies every constraint in the set
    pub fn satisfies(&self, version: &Version) -> bool {
        self.constraints.iter().all(|c| c.satisfies(version))
    }

    /// Find the first pair of constraints that can never hold together
    ///
    /// Each constraint admits an interval, so checking pairs is enough to
    /// prove the whole conjunction empty.
    pub fn first_conflict(&self) -> Option<(&Constraint, &Constraint)> {
        for (i, a) in self.constraints.iter().enumerate() {
            for b in &self.constraints[i + 1..] {
                if a.is_disjoint_with(b) {
                    return Some((a, b));
                }
            }
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraints.is_empty() {
            return f.write_str("*");
        }
        for (i, c) in self.constraints.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        let mut set = Self::new();
        for c in iter {
            set.push(c);
        }
        set
    }
}

impl TryFrom<String> for ConstraintSet {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<ConstraintSet> for String {
    fn from(set: ConstraintSet) -> Self {
        set.to_string()
    }
}

/// A dependency name with its constraint set, as written in a recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    pub name: String,
    pub constraints: ConstraintSet,
}

impl DependencySpec {
    /// Parse a requirement line such as `"numpy >=1.19, <1.27"` or `"python"`
    ///
    /// The name runs up to the first whitespace or operator character, so
    /// `numpy>=1.19` is accepted as well.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let name_end = s
            .find(|c: char| c.is_whitespace() || OPERATOR_CHARS.contains(&c))
            .unwrap_or(s.len());
        let (name, rest) = s.split_at(name_end);

        if name.is_empty() {
            return Err(Error::malformed(s, "missing dependency name"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(Error::malformed(s, format!("invalid dependency name '{}'", name)));
        }

        let constraints = ConstraintSet::parse(rest)?;
        Ok(Self {
            name: name.to_string(),
            constraints,
        })
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraints.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.constraints)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_version_parse_and_display() {
        assert_eq!(v("1.26.4").components(), &[1, 26, 4]);
        assert_eq!(v("01.02").to_string(), "1.2");
        assert_eq!(v(" 3 ").to_string(), "3");
    }

    #[test]
    fn test_version_parse_rejects_non_numeric() {
        for bad in ["", "1..2", "1.", "1.0.dev0", "v1.0", "1.0-rc1"] {
            let err = Version::parse(bad).unwrap_err();
            assert_eq!(err.kind(), "MalformedConstraint", "input {:?}", bad);
        }
    }

    #[test]
    fn test_package_version_keeps_suffixes() {
        for text in ["1.0.0-rc.1", "1.0.0.dev0", "2.1+cuda", "1!2.0", "0.7.0"] {
            assert_eq!(PackageVersion::parse(text).unwrap().as_str(), text);
        }
        assert_eq!(PackageVersion::parse(" 00.7.0 ").unwrap().to_string(), "0.7.0");
    }

    #[test]
    fn test_package_version_rejects_garbage() {
        assert_eq!(PackageVersion::parse("  ").unwrap_err().kind(), "MissingField");
        for bad in ["1.0 rc", "-1.0", "1.0;rm"] {
            let err = PackageVersion::parse(bad).unwrap_err();
            assert_eq!(err.kind(), "InvalidField", "input {:?}", bad);
            assert!(err.to_string().contains("package.version"));
        }
    }

    #[test]
    fn test_version_compare_pads_with_zeros() {
        assert_eq!(v("1.19"), v("1.19.0"));
        assert!(v("1.9") < v("1.19"));
        assert!(v("1.26") < v("1.26.1"));
        assert!(v("2") > v("1.99.99"));
    }

    #[test]
    fn test_version_hash_matches_equality() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(v("1.19"));
        assert!(set.contains(&v("1.19.0.0")));
    }

    #[test]
    fn test_constraint_parse_operators() {
        assert_eq!(Constraint::parse(">=1.19").unwrap().op, Operator::GreaterOrEqual);
        assert_eq!(Constraint::parse("<= 2").unwrap().op, Operator::LessOrEqual);
        assert_eq!(Constraint::parse(">1").unwrap().op, Operator::GreaterThan);
        assert_eq!(Constraint::parse("<1.27").unwrap().op, Operator::LessThan);
        assert_eq!(Constraint::parse("==1.5").unwrap().op, Operator::Exact);
        assert_eq!(Constraint::parse("1.5").unwrap().op, Operator::Exact);
    }

    #[test]
    fn test_constraint_parse_rejects_unknown_operator() {
        for bad in ["!=1.0", "~=1.0", "=1.0", "^1.0", "=>1.0", ">=", ">=abc"] {
            let err = Constraint::parse(bad).unwrap_err();
            assert_eq!(err.kind(), "MalformedConstraint", "input {:?}", bad);
        }
    }

    #[test]
    fn test_constraint_display_round_trip() {
        for input in [">= 1.19", "<1.27", "==2.0.1", "> 0", "<=3.10"] {
            let c = Constraint::parse(input).unwrap();
            let again = Constraint::parse(&c.to_string()).unwrap();
            assert_eq!(c, again);
        }
        assert_eq!(Constraint::parse(">= 1.19").unwrap().to_string(), ">=1.19");
    }

    #[test]
    fn test_constraint_set_satisfies_range() {
        let set = ConstraintSet::parse(">=1.19, <1.27").unwrap();
        assert!(set.satisfies(&v("1.19")));
        assert!(set.satisfies(&v("1.26.4")));
        assert!(!set.satisfies(&v("1.27")));
        assert!(!set.satisfies(&v("1.18")));
        assert_eq!(set.to_string(), ">=1.19, <1.27");
    }

    #[test]
    fn test_constraint_set_empty_is_any() {
        let set = ConstraintSet::parse("*").unwrap();
        assert!(set.is_empty());
        assert!(set.satisfies(&v("99.99")));
        assert_eq!(set.to_string(), "*");
        assert!(ConstraintSet::parse(">=1.0,,<2").is_err());
    }

    #[test]
    fn test_disjoint_detection() {
        let c = |s: &str| Constraint::parse(s).unwrap();
        assert!(c(">=2.0").is_disjoint_with(&c("<1.0")));
        assert!(c(">1.0").is_disjoint_with(&c("<=1.0")));
        assert!(c("==1.0").is_disjoint_with(&c("==1.1")));
        assert!(c("==1.0").is_disjoint_with(&c(">1.0")));
        assert!(!c(">=1.0").is_disjoint_with(&c("<=1.0")));
        assert!(!c(">=1.0").is_disjoint_with(&c(">=5")));
        assert!(!c("==1.0").is_disjoint_with(&c("==1.0.0")));
    }

    #[test]
    fn test_first_conflict_names_pair() {
        let set = ConstraintSet::parse(">=1.0, >=2.0, <1.5").unwrap();
        let (a, b) = set.first_conflict().unwrap();
        assert_eq!(a.to_string(), ">=2.0");
        assert_eq!(b.to_string(), "<1.5");
    }

    #[test]
    fn test_dependency_spec_parse() {
        let spec = DependencySpec::parse("numpy >=1.19, <1.27").unwrap();
        assert_eq!(spec.name, "numpy");
        assert_eq!(spec.constraints.len(), 2);

        let tight = DependencySpec::parse("numpy>=1.19").unwrap();
        assert_eq!(tight.name, "numpy");
        assert_eq!(tight.constraints.to_string(), ">=1.19");

        let bare = DependencySpec::parse("python").unwrap();
        assert!(bare.constraints.is_empty());
        assert_eq!(bare.to_string(), "python");
    }

    #[test]
    fn test_dependency_spec_parse_errors() {
        assert!(DependencySpec::parse(">=1.0").is_err());
        assert!(DependencySpec::parse("").is_err());
        assert!(DependencySpec::parse("numpy 1.19 py38_0").is_err());
        assert!(DependencySpec::parse("num/py >=1").is_err());
    }
}
