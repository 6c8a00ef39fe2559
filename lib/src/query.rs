/// Lower-cases text one char at a time.
///
/// `str::to_lowercase` maps a word-final sigma to `ς`, which would let a
/// longer query stop matching text that its prefix matched. Mapping each
/// char on its own keeps both sides of a comparison consistent.
pub fn normalize(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Whitespace as a browser's `trim` sees it, which includes the BOM
fn is_trimmed(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// The search string after trimming and lower-casing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Self {
        Query(normalize(raw.trim_matches(is_trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty query matches everything
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain substring test against the lower-cased haystack
    pub fn matches(&self, haystack: &str) -> bool {
        self.is_empty() || normalize(haystack).contains(self.as_str())
    }
}
