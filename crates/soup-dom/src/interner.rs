//! String Interner - Deduplicate tag and attribute names
//!
//! Every element and attribute name is stored once and referenced by a
//! 4-byte id. Name tests in the query engine compare ids instead of strings.

use std::collections::HashMap;

/// Interned string ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct InternedString(pub u32);

impl InternedString {
    /// Empty string
    pub const EMPTY: InternedString = InternedString(0);
}

/// Names pre-interned so that the common HTML vocabulary gets small, stable ids
const COMMON_NAMES: &[&str] = &[
    "html", "head", "body", "title", "meta", "link", "script", "style",
    "div", "span", "p", "a", "b", "i", "u", "em", "strong", "img", "br", "hr",
    "ul", "ol", "li", "table", "thead", "tbody", "tr", "td", "th",
    "form", "input", "button", "select", "option", "textarea", "label",
    "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "footer", "nav", "main", "section", "article", "aside",
    "id", "class", "name", "href", "src", "alt", "type", "value", "rel", "for",
];

/// String interner for element and attribute names
#[derive(Debug, Clone)]
pub struct StringInterner {
    strings: Vec<Box<str>>,
    map: HashMap<Box<str>, u32>,
}

impl StringInterner {
    /// Create an interner with the common HTML names already present
    pub fn new() -> Self {
        let mut interner = Self {
            strings: Vec::with_capacity(128),
            map: HashMap::with_capacity(128),
        };
        interner.intern("");
        for name in COMMON_NAMES {
            interner.intern(name);
        }
        interner
    }

    /// Intern a string, returning the existing id when it is already known
    pub fn intern(&mut self, s: &str) -> InternedString {
        if let Some(&index) = self.map.get(s) {
            return InternedString(index);
        }
        let index = self.strings.len() as u32;
        self.strings.push(s.into());
        self.map.insert(s.into(), index);
        InternedString(index)
    }

    /// Look up a string without interning it
    ///
    /// `None` means no node in the tree can carry this name.
    pub fn lookup(&self, s: &str) -> Option<InternedString> {
        self.map.get(s).map(|&index| InternedString(index))
    }

    /// Get the string for an interned id (empty for unknown ids)
    #[inline]
    pub fn get(&self, id: InternedString) -> &str {
        self.strings.get(id.0 as usize).map_or("", |s| s)
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedup() {
        let mut interner = StringInterner::new();
        let id1 = interner.intern("custom-tag");
        let id2 = interner.intern("custom-tag");
        assert_eq!(id1, id2);
        assert_eq!(interner.get(id1), "custom-tag");
    }

    #[test]
    fn test_empty_string_is_first() {
        let interner = StringInterner::new();
        assert_eq!(interner.lookup(""), Some(InternedString::EMPTY));
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let interner = StringInterner::new();
        let before = interner.len();
        assert_eq!(interner.lookup("never-seen"), None);
        assert_eq!(interner.len(), before);
        assert!(interner.lookup("div").is_some());
    }

    #[test]
    fn test_unicode_names() {
        let mut interner = StringInterner::new();
        let id = interner.intern("寿司");
        assert_eq!(interner.get(id), "寿司");
    }
}
