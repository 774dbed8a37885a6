//! Semantic versions and Composer-style version constraints
//!
//! Supported constraint syntax:
//!
//! | Form | Example | Meaning |
//! |------|---------|---------|
//! | exact | `1.2.3`, `=1.2.3` | that version |
//! | comparison | `>=1.0`, `<2`, `!=1.5.0` | |
//! | caret | `^1.2` | `>=1.2.0 <2.0.0` |
//! | tilde | `~1.2.3` | `>=1.2.3 <1.3.0` |
//! | wildcard | `1.2.*`, `*` | `>=1.2.0 <1.3.0`, any |
//! | hyphen | `1.0 - 2.0` | `>=1.0.0 <2.1.0` |
//!
//! Constraints separated by `,` or whitespace must all hold, alternatives are
//! separated by `||` (or `|`).

use crate::contract::{DataType, TypeMeta};
use crate::enums::SortingDirection;
use crate::string::{parse_constrained, StringConstraints};
use crate::value::Value;
use ::semver::Version;
use log::debug;
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0013, DT0014};
use serde::Deserialize;
use std::cmp::Ordering;

/// Parse a version leniently: a leading `v` is dropped and missing minor or
/// patch numbers are taken as zero (`1.2` -> `1.2.0`).
pub fn parse_version(raw: &str) -> Option<Version> {
    let raw = raw.trim();
    let raw = raw.strip_prefix(['v', 'V']).unwrap_or(raw);
    let (core, rest) = raw.split_at(raw.find(['-', '+']).unwrap_or(raw.len()));
    let padded = match core.split('.').count() {
        1 => format!("{}.0.0{}", core, rest),
        2 => format!("{}.0{}", core, rest),
        _ => raw.to_string(),
    };
    Version::parse(&padded).ok()
}

fn version_or_error(raw: &str) -> Result<Version> {
    parse_version(raw).ok_or_else(|| {
        DataTypeError::casting(
            DT0013,
            format!("{} is not a valid semantic version", describe_value(raw, false)),
        )
    })
}

/// The string is kept as given; only its validity is checked
pub fn cast(value: &Value) -> Result<Value> {
    let cast = crate::string::cast(value)?;
    if let Value::String(s) = &cast {
        if !s.trim().is_empty() {
            version_or_error(s)?;
        }
    }
    Ok(cast)
}

pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    Ok(version_or_error(a)?.cmp(&version_or_error(b)?))
}

pub fn is_version_greater_than(a: &str, b: &str) -> Result<bool> {
    Ok(compare_versions(a, b)? == Ordering::Greater)
}

/// Stable sort; fails on the first invalid version
pub fn sort_versions<S: AsRef<str>>(versions: &[S], direction: SortingDirection) -> Result<Vec<String>> {
    let mut parsed = versions
        .iter()
        .map(|v| Ok((version_or_error(v.as_ref())?, v.as_ref().to_string())))
        .collect::<Result<Vec<_>>>()?;
    if direction.is_ascending() {
        parsed.sort_by(|a, b| a.0.cmp(&b.0));
    } else {
        parsed.sort_by(|a, b| b.0.cmp(&a.0));
    }
    Ok(parsed.into_iter().map(|(_, raw)| raw).collect())
}

/// Versions satisfying `constraint`, in input order. Invalid versions are skipped.
pub fn find_versions_satisfying<S: AsRef<str>>(constraint: &str, versions: &[S]) -> Result<Vec<String>> {
    let constraint = VersionConstraint::parse(constraint)?;
    Ok(versions
        .iter()
        .map(|v| v.as_ref())
        .filter(|v| constraint.matches_str(v))
        .map(str::to_string)
        .collect())
}

/// Highest version satisfying `constraint`
pub fn find_version_best<S: AsRef<str>>(constraint: &str, versions: &[S]) -> Result<Option<String>> {
    let constraint = VersionConstraint::parse(constraint)?;
    Ok(versions
        .iter()
        .filter_map(|raw| {
            let version = parse_version(raw.as_ref())?;
            constraint
                .matches(&version)
                .then(|| (version, raw.as_ref().to_string()))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, raw)| raw))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Any,
    Eq(Version),
    Ne(Version),
    Gt(Version),
    Ge(Version),
    Lt(Version),
    Le(Version),
}

impl Predicate {
    fn matches(&self, version: &Version) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::Eq(v) => version == v,
            Predicate::Ne(v) => version != v,
            Predicate::Gt(v) => version > v,
            Predicate::Ge(v) => version >= v,
            Predicate::Lt(v) => version < v,
            Predicate::Le(v) => version <= v,
        }
    }
}

/// Version as written in a constraint, possibly incomplete
#[derive(Debug)]
struct Partial {
    major: u64,
    minor: Option<u64>,
    patch: Option<u64>,
    /// Pre-release and build suffix including the separator
    suffix: String,
    wildcard: bool,
}

impl Partial {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let raw = raw.strip_prefix(['v', 'V']).unwrap_or(raw);
        let (core, suffix) = raw.split_at(raw.find(['-', '+']).unwrap_or(raw.len()));
        let mut numbers = Vec::new();
        let mut wildcard = false;
        for part in core.split('.') {
            if wildcard {
                // Nothing may follow a wildcard except more wildcards
                if !matches!(part, "*" | "x" | "X") {
                    return None;
                }
                continue;
            }
            match part {
                "*" | "x" | "X" => wildcard = true,
                digits => numbers.push(digits.parse::<u64>().ok()?),
            }
        }
        if numbers.is_empty() || numbers.len() > 3 || (wildcard && !suffix.is_empty()) {
            return None;
        }
        Some(Self {
            major: numbers[0],
            minor: numbers.get(1).copied(),
            patch: numbers.get(2).copied(),
            suffix: suffix.to_string(),
            wildcard,
        })
    }

    fn is_complete(&self) -> bool {
        self.patch.is_some()
    }

    fn floor(&self) -> Option<Version> {
        Version::parse(&format!(
            "{}.{}.{}{}",
            self.major,
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
            self.suffix
        ))
        .ok()
    }

    /// Exclusive upper bound that still admits every version matching the
    /// given parts (`1.2` -> `1.3.0`, `1` -> `2.0.0`)
    fn ceiling(&self) -> Option<Version> {
        match (self.minor, self.patch) {
            (Some(minor), Some(patch)) => exclusive(self.major, minor, patch.checked_add(1)?),
            (Some(minor), None) => exclusive(self.major, minor.checked_add(1)?, 0),
            _ => exclusive(self.major.checked_add(1)?, 0, 0),
        }
    }

    fn caret_ceiling(&self) -> Option<Version> {
        if self.major > 0 {
            exclusive(self.major.checked_add(1)?, 0, 0)
        } else {
            match (self.minor, self.patch) {
                (Some(minor), _) if minor > 0 => exclusive(0, minor.checked_add(1)?, 0),
                (Some(_), Some(patch)) => exclusive(0, 0, patch.checked_add(1)?),
                (Some(_), None) => exclusive(0, 1, 0),
                (None, _) => exclusive(1, 0, 0),
            }
        }
    }

    fn tilde_ceiling(&self) -> Option<Version> {
        match (self.minor, self.patch) {
            (Some(minor), Some(_)) => exclusive(self.major, minor.checked_add(1)?, 0),
            _ => exclusive(self.major.checked_add(1)?, 0, 0),
        }
    }
}

/// Lowest pre-release of a version, so that pre-releases of an excluded
/// upper bound stay excluded
fn exclusive(major: u64, minor: u64, patch: u64) -> Option<Version> {
    Version::parse(&format!("{}.{}.{}-0", major, minor, patch)).ok()
}

fn is_operator(token: &str) -> bool {
    token
        .chars()
        .all(|c| matches!(c, '<' | '>' | '=' | '!' | '^' | '~'))
}

/// Split an AND group into atoms, re-attaching detached operators (`>= 1.0`)
fn tokenize(group: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut pending = String::new();
    for raw in group.split([',', ' ', '\t']).filter(|t| !t.is_empty()) {
        if is_operator(raw) {
            pending.push_str(raw);
            continue;
        }
        tokens.push(format!("{}{}", pending, raw));
        pending.clear();
    }
    if !pending.is_empty() {
        tokens.push(pending);
    }
    tokens
}

fn parse_atom(atom: &str) -> Option<Vec<Predicate>> {
    if matches!(atom, "*" | "x" | "X") {
        return Some(vec![Predicate::Any]);
    }
    let split = atom
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '!' | '^' | '~'))
        .unwrap_or(atom.len());
    let (operator, version) = atom.split_at(split);
    let partial = Partial::parse(version)?;
    let floor = partial.floor()?;

    Some(match operator {
        "" | "=" | "==" if partial.wildcard => {
            vec![Predicate::Ge(floor), Predicate::Lt(partial.ceiling()?)]
        }
        "" | "=" | "==" => vec![Predicate::Eq(floor)],
        "!=" | "<>" => vec![Predicate::Ne(floor)],
        ">" => vec![Predicate::Gt(floor)],
        ">=" => vec![Predicate::Ge(floor)],
        "<" => vec![Predicate::Lt(floor)],
        "<=" => vec![Predicate::Le(floor)],
        "^" => vec![Predicate::Ge(floor), Predicate::Lt(partial.caret_ceiling()?)],
        "~" => vec![Predicate::Ge(floor), Predicate::Lt(partial.tilde_ceiling()?)],
        _ => return None,
    })
}

fn parse_group(group: &str) -> Option<Vec<Predicate>> {
    if let Some((low, high)) = group.split_once(" - ") {
        let low = Partial::parse(low)?;
        let high = Partial::parse(high)?;
        let upper = if high.is_complete() && !high.wildcard {
            Predicate::Le(high.floor()?)
        } else {
            Predicate::Lt(high.ceiling()?)
        };
        return Some(vec![Predicate::Ge(low.floor()?), upper]);
    }
    let tokens = tokenize(group);
    if tokens.is_empty() {
        return None;
    }
    let mut predicates = Vec::new();
    for token in tokens {
        predicates.extend(parse_atom(&token)?);
    }
    Some(predicates)
}

/// A parsed constraint expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    source: String,
    alternatives: Vec<Vec<Predicate>>,
}

impl VersionConstraint {
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || {
            DataTypeError::casting(
                DT0014,
                format!("\"{}\" is not a valid version constraint", raw.trim()),
            )
        };
        let normalized = raw.trim().replace("||", "|");
        if normalized.is_empty() {
            return Err(invalid());
        }
        let alternatives = normalized
            .split('|')
            .map(|group| parse_group(group.trim()).ok_or_else(invalid))
            .collect::<Result<Vec<_>>>()?;
        debug!("Parsed version constraint {:?} into {:?}", raw, alternatives);
        Ok(Self {
            source: raw.trim().to_string(),
            alternatives,
        })
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives
            .iter()
            .any(|all| all.iter().all(|p| p.matches(version)))
    }

    /// False for unparseable versions
    pub fn matches_str(&self, version: &str) -> bool {
        parse_version(version).is_some_and(|v| self.matches(&v))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Semantic version string such as `1.4.0-beta.2`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SemanticVersionDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
}

impl DataType for SemanticVersionDataType {
    crate::data_type_basics!("SemanticVersion");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_constrained(self, &self.constraints, value)
    }

    /// Version lists read oldest first
    fn default_sorting_direction(&self) -> SortingDirection {
        SortingDirection::Asc
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.3", "1.2.3")]
    #[case("v2.0", "2.0.0")]
    #[case("3", "3.0.0")]
    #[case("1.2-beta.1", "1.2.0-beta.1")]
    fn test_parse_version(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_version(input), Version::parse(expected).ok());
    }

    #[test]
    fn test_cast_keeps_value() {
        assert_eq!(cast(&Value::from("v1.2")).unwrap(), Value::from("v1.2"));
        let err = cast(&Value::from("1.x.banana")).unwrap_err();
        assert!(err.is_casting());
        assert_eq!(err.code(), DT0013);
    }

    #[test]
    fn test_greater_than() {
        assert!(is_version_greater_than("2.0.0", "1.9.9").unwrap());
        assert!(!is_version_greater_than("1.0.0-alpha", "1.0.0").unwrap());
        assert!(is_version_greater_than("nope", "1.0.0").is_err());
    }

    #[rstest]
    #[case("^1.2", "1.2.0", true)]
    #[case("^1.2", "1.9.3", true)]
    #[case("^1.2", "2.0.0", false)]
    #[case("^1.2", "2.0.0-beta", false)]
    #[case("^0.3", "0.3.9", true)]
    #[case("^0.3", "0.4.0", false)]
    #[case("^0.0.3", "0.0.4", false)]
    #[case("~1.2", "1.9.0", true)]
    #[case("~1.2.3", "1.3.0", false)]
    #[case("~1.2.3", "1.2.9", true)]
    #[case("1.2.*", "1.2.7", true)]
    #[case("1.2.*", "1.3.0", false)]
    #[case("*", "0.0.1", true)]
    #[case(">=1.0 <1.5", "1.4.9", true)]
    #[case(">= 1.0, < 1.5", "1.5.0", false)]
    #[case("1.0 - 2.0", "2.0.9", true)]
    #[case("1.0 - 2.0.0", "2.0.1", false)]
    #[case("<1.0 || >=2.0", "2.1.0", true)]
    #[case("<1.0 | >=2.0", "1.1.0", false)]
    #[case("!=1.5.0", "1.5.0", false)]
    #[case("1.4.2", "1.4.2", true)]
    fn test_constraints(#[case] constraint: &str, #[case] version: &str, #[case] expected: bool) {
        let parsed = VersionConstraint::parse(constraint).unwrap();
        assert_eq!(parsed.matches_str(version), expected, "{} vs {}", constraint, version);
    }

    #[rstest]
    #[case("")]
    #[case(">=")]
    #[case("^banana")]
    #[case("1.*.3")]
    #[case("^18446744073709551615")]
    #[case("~0.18446744073709551615.1")]
    fn test_invalid_constraints(#[case] constraint: &str) {
        let err = VersionConstraint::parse(constraint).unwrap_err();
        assert_eq!(err.code(), DT0014);
    }

    #[test]
    fn test_find_version_best() {
        assert_eq!(
            find_version_best("^1.2", &["1.2.0", "1.3.0", "1.2.5"]).unwrap(),
            Some("1.3.0".to_string())
        );
        assert_eq!(find_version_best("^3", &["1.2.0", "2.0.0"]).unwrap(), None);
    }

    #[test]
    fn test_find_versions_satisfying_keeps_order_and_skips_invalid() {
        let found = find_versions_satisfying("~1.2", &["1.3.0", "junk", "2.0.0", "1.2.1"]).unwrap();
        assert_eq!(found, vec!["1.3.0", "1.2.1"]);
    }

    #[test]
    fn test_sort() {
        let versions = ["1.10.0", "1.2.0", "v1.2", "1.9.0-rc.1"];
        assert_eq!(
            sort_versions(&versions, SortingDirection::Asc).unwrap(),
            vec!["1.2.0", "v1.2", "1.9.0-rc.1", "1.10.0"]
        );
        assert_eq!(
            sort_versions(&versions, SortingDirection::Desc).unwrap(),
            vec!["1.10.0", "1.9.0-rc.1", "1.2.0", "v1.2"]
        );
        assert!(sort_versions(&["1.0", "x"], SortingDirection::Asc).is_err());
    }

    #[test]
    fn test_default_sorting_is_ascending() {
        assert_eq!(
            SemanticVersionDataType::default().default_sorting_direction(),
            SortingDirection::Asc
        );
    }
}
