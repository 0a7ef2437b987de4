//! Configuration

use serde::{Deserialize, Serialize};
use soup_html::ParseOptions;

/// Attributes whose value is a whitespace-separated token list
pub const DEFAULT_LIST_ATTRIBUTES: &[&str] = &[
    "accept-charset",
    "accesskey",
    "archive",
    "class",
    "dropzone",
    "for",
    "headers",
    "rel",
    "rev",
    "sandbox",
    "sizes",
];

/// Document configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoupConfig {
    /// Attributes matched by token containment instead of equality
    pub list_attributes: Vec<String>,
    /// Keep whitespace-only text nodes when parsing
    pub keep_whitespace_text: bool,
}

impl Default for SoupConfig {
    fn default() -> Self {
        Self {
            list_attributes: DEFAULT_LIST_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
            keep_whitespace_text: true,
        }
    }
}

impl SoupConfig {
    pub fn is_list_attribute(&self, name: &str) -> bool {
        self.list_attributes.iter().any(|a| a == name)
    }

    pub(crate) fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            keep_whitespace_text: self.keep_whitespace_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list_attributes() {
        let config = SoupConfig::default();
        assert!(config.is_list_attribute("class"));
        assert!(config.is_list_attribute("accept-charset"));
        assert!(!config.is_list_attribute("id"));
        assert!(config.keep_whitespace_text);
    }
}
