use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};

lazy_static! {
    /// Regex for `#RRGGBB` colors used by templates and QR styling
    /// - Valid: "#000000", "#ffAA10"
    /// - Invalid: "000000", "#FFF", "#GGGGGG"
    pub static ref HEX_COLOR_REGEX: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
}

/// Parse a `#RRGGBB` color into RGB components
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    if !HEX_COLOR_REGEX.is_match(value) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&value[range], 16).ok();
    Some([channel(1..3)?, channel(3..5)?, channel(5..7)?])
}

/// Deserialize a string with surrounding whitespace removed, so length rules
/// reject blank input
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

/// [`trimmed`] for optional fields; pair with `#[serde(default)]`
pub fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Named {
        #[serde(deserialize_with = "trimmed")]
        name: String,
        #[serde(default, deserialize_with = "trimmed_opt")]
        alias: Option<String>,
    }

    #[test]
    fn test_hex_color_regex_valid() {
        assert!(HEX_COLOR_REGEX.is_match("#000000"));
        assert!(HEX_COLOR_REGEX.is_match("#FFFFFF"));
        assert!(HEX_COLOR_REGEX.is_match("#a1B2c3"));
    }

    #[test]
    fn test_hex_color_regex_invalid() {
        assert!(!HEX_COLOR_REGEX.is_match("000000")); // missing hash
        assert!(!HEX_COLOR_REGEX.is_match("#FFF")); // short form
        assert!(!HEX_COLOR_REGEX.is_match("#GGGGGG")); // not hex
        assert!(!HEX_COLOR_REGEX.is_match("#0000000")); // too long
        assert!(!HEX_COLOR_REGEX.is_match(""));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#000000"), Some([0, 0, 0]));
        assert_eq!(parse_hex_color("#FF8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex_color("#ff8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex_color("red"), None);
    }

    #[test]
    fn test_trimmed_strips_whitespace() {
        let named: Named =
            serde_json::from_value(json!({ "name": "  Jane Doe\t", "alias": " JD " })).unwrap();
        assert_eq!(named.name, "Jane Doe");
        assert_eq!(named.alias.as_deref(), Some("JD"));

        let blank: Named = serde_json::from_value(json!({ "name": "   " })).unwrap();
        assert_eq!(blank.name, "");
        assert_eq!(blank.alias, None);
    }
}
