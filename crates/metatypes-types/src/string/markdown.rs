use super::{parse_constrained, StringConstraints};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::Result;
use serde::Deserialize;

const SPECIAL_CHARS: &[char] = &[
    '\\', '`', '*', '_', '{', '}', '[', ']', '(', ')', '#', '+', '-', '.', '!', '|', '<', '>',
];

/// Backslash-escape characters with Markdown meaning
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A `#`-style heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub text: String,
}

/// ATX headings outside fenced code blocks, optionally limited to `max_level`
pub fn find_headings(markdown: &str, max_level: Option<usize>) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut in_fence = false;
    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let level = trimmed.chars().take_while(|c| *c == '#').count();
        if level == 0 || level > 6 {
            continue;
        }
        let rest = &trimmed[level..];
        if !rest.is_empty() && !rest.starts_with(' ') {
            continue;
        }
        if max_level.is_some_and(|max| level > max) {
            continue;
        }
        let text = rest.trim().trim_end_matches('#').trim_end();
        headings.push(Heading {
            level,
            text: text.to_string(),
        });
    }
    headings
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarkdownDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
}

impl DataType for MarkdownDataType {
    crate::data_type_basics!("Markdown");

    fn cast(&self, value: &Value) -> Result<Value> {
        super::cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_constrained(self, &self.constraints, value)
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }

    fn default_widget_type(&self) -> &'static str {
        "Markdown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a*b_[c](d)"), r"a\*b\_\[c\]\(d\)");
        assert_eq!(escape("1. item"), r"1\. item");
    }

    #[test]
    fn test_find_headings() {
        let md = "# Title\ntext\n## Sub ##\n```\n# not a heading\n```\n#nospace\n### Deep";
        let headings = find_headings(md, None);
        assert_eq!(
            headings,
            vec![
                Heading { level: 1, text: "Title".into() },
                Heading { level: 2, text: "Sub".into() },
                Heading { level: 3, text: "Deep".into() },
            ]
        );
        assert_eq!(find_headings(md, Some(2)).len(), 2);
    }
}
