//! Built-in language list.
//!
//! Served whenever the live catalog cannot be fetched. Order is display
//! order: the most commonly requested languages come first.

use crate::languages::LanguageDescriptor;

/// Default language list, in display order.
pub fn builtin_languages() -> Vec<LanguageDescriptor> {
    [
        ("en", "English"),
        ("hi", "Hindi"),
        ("es", "Spanish"),
        ("fr", "French"),
        ("de", "German"),
        ("it", "Italian"),
        ("pt", "Portuguese"),
        ("ru", "Russian"),
        ("ja", "Japanese"),
        ("ko", "Korean"),
        ("zh", "Chinese"),
        ("ar", "Arabic"),
    ]
    .into_iter()
    .map(|(code, name)| LanguageDescriptor::new(code, name))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_languages_starts_with_english() {
        let languages = builtin_languages();
        assert_eq!(languages[0], LanguageDescriptor::new("en", "English"));
        assert_eq!(languages.len(), 12);
    }

    #[test]
    fn test_builtin_languages_codes_are_unique() {
        let languages = builtin_languages();
        let codes: HashSet<_> = languages.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes.len(), languages.len());
    }

    #[test]
    fn test_builtin_languages_excludes_auto() {
        assert!(builtin_languages().iter().all(|l| l.code != "auto"));
    }
}
