//! Language identifiers and the supported-language catalog.
//!
//! # Architecture
//!
//! - `codes`: canonical code → provider code resolution (with pass-through)
//! - `registry`: built-in language list used when no live catalog is reachable
//! - `catalog`: live catalog fetch with silent fallback to the registry
//!
//! Canonical codes are the two-letter identifiers (or `auto`) used at the
//! public HTTP boundary. Providers each have their own spelling for some of
//! them (`zh-CN`, `zh-Hans`, ...), which is what `codes` hides.

mod catalog;
mod codes;
mod registry;

pub use catalog::LanguageCatalog;
pub use codes::{is_auto, CodeMapping, CodeResolver, AUTO};
pub use registry::builtin_languages;

use serde::{Deserialize, Serialize};

/// One entry in the language catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDescriptor {
    pub code: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

impl LanguageDescriptor {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
        }
    }
}

/// Source side of a request after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLanguage {
    /// No source constraint; the provider detects the language itself.
    Auto,
    /// A provider-specific source code.
    Fixed(String),
}

impl SourceLanguage {
    pub fn is_auto(&self) -> bool {
        matches!(self, SourceLanguage::Auto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_descriptor_serializes_name_field() {
        let descriptor = LanguageDescriptor::new("es", "Spanish");
        let json = serde_json::to_value(&descriptor).expect("Should serialize");
        assert_eq!(json, serde_json::json!({ "code": "es", "name": "Spanish" }));
    }

    #[test]
    fn test_language_descriptor_ignores_extra_fields() {
        let json = r#"{"code":"fr","name":"French","targets":["en","es"]}"#;
        let descriptor: LanguageDescriptor = serde_json::from_str(json).expect("Should parse");
        assert_eq!(descriptor, LanguageDescriptor::new("fr", "French"));
    }

    #[test]
    fn test_source_language_is_auto() {
        assert!(SourceLanguage::Auto.is_auto());
        assert!(!SourceLanguage::Fixed("en".to_string()).is_auto());
    }
}
