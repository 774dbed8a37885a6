//! File paths and helpers working on `/`-normalized path strings.
//!
//! The helpers are purely textual: they never touch the file system and
//! treat both `/` and `\` as separators.

use super::{parse_constrained, StringConstraints};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::Result;
use serde::Deserialize;

const SEPARATOR: char = '/';

fn split_prefix(path: &str) -> (&str, &str) {
    // UNC share
    if let Some(rest) = path.strip_prefix("//") {
        return (&path[..2], rest);
    }
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        let prefix_len = if bytes.get(2) == Some(&b'/') { 3 } else { 2 };
        return (&path[..prefix_len], &path[prefix_len..]);
    }
    if let Some(rest) = path.strip_prefix('/') {
        return (&path[..1], rest);
    }
    ("", path)
}

/// Use `/` separators, drop `.` segments, resolve `..` and duplicate separators
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let (prefix, rest) = split_prefix(&unified);
    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if prefix.is_empty() {
                    // Relative paths may climb; absolute ones stop at the root
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    let mut normalized = prefix.to_string();
    normalized.push_str(&segments.join("/"));
    if unified.ends_with(SEPARATOR) && !segments.is_empty() {
        normalized.push(SEPARATOR);
    }
    normalized
}

pub fn is_absolute(path: &str) -> bool {
    let unified = path.replace('\\', "/");
    let (prefix, _) = split_prefix(&unified);
    prefix.ends_with(SEPARATOR) || unified.contains("://")
}

/// Last path segment
pub fn find_file_name(path: &str, with_extension: bool) -> String {
    let unified = path.replace('\\', "/");
    let name = unified
        .trim_end_matches(SEPARATOR)
        .rsplit(SEPARATOR)
        .next()
        .unwrap_or_default();
    if with_extension {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(dot) if dot > 0 => name[..dot].to_string(),
        _ => name.to_string(),
    }
}

/// Extension of the last segment without the dot; hidden files have none
pub fn find_extension(path: &str) -> Option<String> {
    let name = find_file_name(path, true);
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() => Some(name[dot + 1..].to_string()),
        _ => None,
    }
}

/// Everything before the last segment; empty for a bare file name
pub fn find_folder(path: &str) -> String {
    let normalized = normalize(path);
    let trimmed = normalized.trim_end_matches(SEPARATOR);
    match trimmed.rfind(SEPARATOR) {
        Some(0) => "/".to_string(),
        Some(i) => trimmed[..i].to_string(),
        None => String::new(),
    }
}

/// Join segments with single separators and normalize the result
pub fn join<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = parts
        .into_iter()
        .map(|p| p.as_ref().to_string())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    normalize(&joined)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilePathDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
}

impl DataType for FilePathDataType {
    crate::data_type_basics!("FilePath");

    fn cast(&self, value: &Value) -> Result<Value> {
        super::cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_constrained(self, &self.constraints, value)
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a/b/../c", "a/c")]
    #[case("a\\b\\.\\c.txt", "a/b/c.txt")]
    #[case("/var//log/", "/var/log/")]
    #[case("/../etc", "/etc")]
    #[case("../x/./y", "../x/y")]
    #[case("C:\\Users\\..\\Temp", "C:/Temp")]
    #[case("//server/share/../docs", "//server/docs")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[rstest]
    #[case("/etc/hosts", true)]
    #[case("C:\\data", true)]
    #[case("\\\\server\\share", true)]
    #[case("file:///tmp/x", true)]
    #[case("relative/path", false)]
    #[case("C:relative", false)]
    fn test_is_absolute(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_absolute(input), expected);
    }

    #[test]
    fn test_file_name_and_extension() {
        assert_eq!(find_file_name("dir/report.final.pdf", true), "report.final.pdf");
        assert_eq!(find_file_name("dir\\report.final.pdf", false), "report.final");
        assert_eq!(find_extension("dir/report.final.pdf").as_deref(), Some("pdf"));
        assert_eq!(find_extension("dir/.gitignore"), None);
        assert_eq!(find_extension("dir/README"), None);
    }

    #[test]
    fn test_find_folder_and_join() {
        assert_eq!(find_folder("a/b/c.txt"), "a/b");
        assert_eq!(find_folder("/c.txt"), "/");
        assert_eq!(find_folder("c.txt"), "");
        assert_eq!(join(["vendor/", "/pkg", "", "src\\lib.rs"]), "vendor/pkg/src/lib.rs");
    }
}
