//! Canonical → provider language code resolution.
//!
//! Providers disagree on how some languages are spelled. Each provider gets a
//! [`CodeMapping`] built once at startup; anything not in the table is passed
//! through unchanged so best-effort requests still reach the provider.

use crate::languages::SourceLanguage;
use crate::providers::ProviderKind;
use std::collections::HashMap;
use tracing::warn;

/// Sentinel meaning "detect the source language".
pub const AUTO: &str = "auto";

/// Whether a source code asks for auto-detection (`auto`, missing or blank).
pub fn is_auto(code: Option<&str>) -> bool {
    match code.map(str::trim) {
        None | Some("") => true,
        Some(code) => code.eq_ignore_ascii_case(AUTO),
    }
}

/// Lookup key for a canonical code.
fn normalize(code: &str) -> String {
    code.trim().to_ascii_lowercase()
}

/// Canonical → provider code table for one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeMapping {
    entries: HashMap<String, String>,
}

impl CodeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) one entry.
    pub fn with_entry(mut self, canonical: &str, provider_code: &str) -> Self {
        self.entries
            .insert(normalize(canonical), provider_code.trim().to_string());
        self
    }

    /// Built-in table for a provider.
    pub fn builtin(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::MyMemory => Self::new()
                .with_entry("zh", "zh-CN")
                .with_entry("zh-tw", "zh-TW")
                .with_entry("pt-br", "pt-BR"),
            ProviderKind::LibreTranslate => Self::new()
                .with_entry("zh", "zh-Hans")
                .with_entry("zh-tw", "zh-Hant")
                .with_entry("pt-br", "pb"),
        }
    }

    /// Parse overrides of the form `"zh=zh-CN,he=iw"`.
    ///
    /// Malformed entries are skipped with a warning rather than failing startup.
    pub fn parse_overrides(raw: &str) -> Self {
        let mut mapping = Self::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.split_once('=') {
                Some((canonical, provider_code))
                    if !canonical.trim().is_empty() && !provider_code.trim().is_empty() =>
                {
                    mapping = mapping.with_entry(canonical, provider_code);
                }
                _ => warn!("Ignoring malformed language code mapping entry: '{}'", entry),
            }
        }
        mapping
    }

    /// Overlay `other` on top of this table; `other` wins on conflicts.
    pub fn merged_with(mut self, other: CodeMapping) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn get(&self, canonical: &str) -> Option<&str> {
        self.entries.get(&normalize(canonical)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves canonical codes for every configured provider.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CodeResolver {
    mappings: HashMap<ProviderKind, CodeMapping>,
}

impl CodeResolver {
    /// Resolver with no tables at all (every code passes through).
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver preloaded with the built-in table of every provider.
    pub fn builtin() -> Self {
        Self::new()
            .with_mapping(
                ProviderKind::MyMemory,
                CodeMapping::builtin(ProviderKind::MyMemory),
            )
            .with_mapping(
                ProviderKind::LibreTranslate,
                CodeMapping::builtin(ProviderKind::LibreTranslate),
            )
    }

    pub fn with_mapping(mut self, provider: ProviderKind, mapping: CodeMapping) -> Self {
        self.mappings.insert(provider, mapping);
        self
    }

    /// Resolve a canonical code to the provider's spelling.
    ///
    /// Never fails: unknown codes come back unchanged (minus surrounding whitespace).
    pub fn resolve(&self, canonical: &str, provider: ProviderKind) -> String {
        self.mappings
            .get(&provider)
            .and_then(|mapping| mapping.get(canonical))
            .map(str::to_string)
            .unwrap_or_else(|| canonical.trim().to_string())
    }

    /// Resolve the source side of a request, where `auto`/absent means no constraint.
    pub fn resolve_source(&self, canonical: Option<&str>, provider: ProviderKind) -> SourceLanguage {
        match canonical {
            Some(code) if !is_auto(Some(code)) => {
                SourceLanguage::Fixed(self.resolve(code, provider))
            }
            _ => SourceLanguage::Auto,
        }
    }
}
