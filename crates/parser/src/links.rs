//! Coarse, first-pass recognition of supported-site links in message text.
//!
//! This only proposes candidates; each site parser applies its own stricter
//! pattern before anything is fetched.

use regex::Regex;
use std::sync::LazyLock;

static CANDIDATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)https?://(?:(?:www\.|m\.)?archiveofourown\.org|(?:www\.|m\.)?fanfiction\.net|forums\.spacebattles\.com)[^\s<>\[\]()|,"']*"#,
    )
    .unwrap()
});

/// Characters that usually end a sentence (or markdown) rather than a URL.
/// Brackets, parentheses, pipes, commas and quotes never continue one.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '*', '_', '|', '\'', '"'];

#[derive(Debug, Clone)]
pub struct LinkScanner {
    prefix: String,
}
impl LinkScanner {
    /// `prefix` is the escape marker: a link directly preceded by it is
    /// skipped.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Candidate links in the order they appear.
    pub fn scan<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> {
        CANDIDATE_REGEX.find_iter(text).filter_map(move |m| {
            if !self.prefix.is_empty() && text[..m.start()].ends_with(self.prefix.as_str()) {
                return None;
            }
            let link = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            (!link.is_empty()).then_some(link)
        })
    }
}
impl Default for LinkScanner {
    fn default() -> Self {
        Self::new("!")
    }
}
