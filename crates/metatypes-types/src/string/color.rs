//! CSS colours: hex notation, `rgb()`/`rgba()` and named colours

use super::regex::StaticRegex;
use super::{parse_constrained, StringConstraints};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0018};
use serde::Deserialize;

static HEX_COLOR: StaticRegex =
    StaticRegex::new(r"^#(?:[0-9a-f]{3}|[0-9a-f]{4}|[0-9a-f]{6}|[0-9a-f]{8})$");
static RGB_COLOR: StaticRegex = StaticRegex::new(
    r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(0|1|0?\.\d+|1\.0+|\d{1,3}%)\s*)?\)$",
);

const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
    "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue",
    "tan", "teal", "thistle", "tomato", "transparent", "turquoise", "violet", "wheat", "white",
    "whitesmoke", "yellow", "yellowgreen",
];

pub fn is_named_color(name: &str) -> bool {
    NAMED_COLORS.binary_search(&name).is_ok()
}

fn is_rgb(normalized: &str) -> bool {
    let Ok(re) = RGB_COLOR.get() else {
        return false;
    };
    let Some(captures) = re.captures(normalized) else {
        return false;
    };
    let channels_ok = (1..=3).all(|i| {
        captures
            .get(i)
            .and_then(|m| m.as_str().parse::<u16>().ok())
            .is_some_and(|c| c <= 255)
    });
    let alpha_ok = match captures.get(4).map(|m| m.as_str()) {
        Some(pct) if pct.ends_with('%') => pct
            .trim_end_matches('%')
            .parse::<u16>()
            .is_ok_and(|p| p <= 100),
        _ => true,
    };
    // rgb() takes three channels, rgba() four
    let has_alpha = captures.get(4).is_some();
    channels_ok && alpha_ok && (normalized.starts_with("rgba") == has_alpha)
}

/// Canonical lower-case form without inner whitespace
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

pub fn is_color(raw: &str) -> bool {
    let normalized = normalize(raw);
    HEX_COLOR.is_match(&normalized) || is_rgb(&normalized) || is_named_color(&normalized)
}

pub fn cast(value: &Value) -> Result<Value> {
    let cast = super::cast(value)?;
    let Value::String(s) = &cast else {
        return Ok(cast);
    };
    if s.trim().is_empty() {
        return Ok(Value::string(""));
    }
    if is_color(s) {
        return Ok(Value::String(normalize(s)));
    }
    Err(DataTypeError::casting(
        DT0018,
        format!("{} is not a valid colour", describe_value(s, false)),
    ))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColorDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
}

impl DataType for ColorDataType {
    crate::data_type_basics!("Color");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_constrained(self, &self.constraints, value)
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }

    fn default_widget_type(&self) -> &'static str {
        "ColorIndicator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_named_colors_are_sorted() {
        assert!(NAMED_COLORS.windows(2).all(|w| w[0] < w[1]));
    }

    #[rstest]
    #[case("#FFF", "#fff")]
    #[case("#00ff00", "#00ff00")]
    #[case("#11223344", "#11223344")]
    #[case("rgb(255, 0, 10)", "rgb(255,0,10)")]
    #[case("RGBA(0,0,0,0.5)", "rgba(0,0,0,0.5)")]
    #[case("rgba(0,0,0,50%)", "rgba(0,0,0,50%)")]
    #[case(" CornflowerBlue ", "cornflowerblue")]
    fn test_cast_valid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(cast(&Value::from(input)).unwrap(), Value::from(expected));
    }

    #[rstest]
    #[case("#ff")]
    #[case("#gggggg")]
    #[case("rgb(256,0,0)")]
    #[case("rgb(0,0,0,1)")]
    #[case("rgba(0,0,0)")]
    #[case("notacolor")]
    fn test_cast_invalid(#[case] input: &str) {
        assert_eq!(cast(&Value::from(input)).unwrap_err().code(), DT0018);
    }
}
