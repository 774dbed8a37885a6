//! Rendering of offending values inside error messages

/// Placeholder shown instead of values of sensitive types
pub const SENSITIVE_PLACEHOLDER: &str = "(sensitive value hidden)";

/// Maximum number of characters of a raw value echoed in a message
pub const MAX_ECHO_CHARS: usize = 60;

/// Render a raw value for an error message.
///
/// Sensitive values are never echoed. Everything else is quoted and cut to
/// [`MAX_ECHO_CHARS`] characters.
pub fn describe_value(raw: &str, sensitive: bool) -> String {
    if sensitive {
        return SENSITIVE_PLACEHOLDER.to_string();
    }

    let mut chars = raw.chars();
    let head: String = chars.by_ref().take(MAX_ECHO_CHARS).collect();
    if chars.next().is_some() {
        format!("\"{}...\"", head)
    } else {
        format!("\"{}\"", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_values_are_hidden() {
        assert_eq!(describe_value("hunter2", true), SENSITIVE_PLACEHOLDER);
    }

    #[test]
    fn test_long_values_are_truncated() {
        let long = "x".repeat(100);
        let rendered = describe_value(&long, false);
        assert!(rendered.ends_with("...\""));
        assert_eq!(rendered.len(), MAX_ECHO_CHARS + 5);
    }

    #[test]
    fn test_short_values_are_quoted() {
        assert_eq!(describe_value("abc", false), "\"abc\"");
    }
}
