//! Structural/attribute predicates over a [`DocumentTree`].
//!
//! # Syntax
//!
//! ```text
//! list     := complex ("," complex)*
//! complex  := compound (WS compound)*
//! compound := (tag | "*")? attr*
//! attr     := "[" name (op value)? "]"
//! op       := "=" | "*=" | "^=" | "$=" | "~="
//! value    := bare-word | "double quoted" | 'single quoted'
//! ```
//!
//! Whitespace between compounds is the descendant combinator. A comma separates
//! alternatives; a node matches the list when it matches any alternative.
//!
//! # Examples
//!
//! ```rust
//! # use chat_transcript::dom::Selector;
//! let listing = Selector::parse("span[role=listitem]").unwrap();
//! let body = Selector::parse("div[jsaction*=mouseenter][jslog*=impression] div[jscontroller]").unwrap();
//! let either = Selector::parse("a[aria-label*=Image], img[src]").unwrap();
//! # let _ = (listing, body, either);
//! ```
//!
//! Tag names compare ASCII-case-insensitively. Attribute names and values compare exactly.

use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

use super::DocumentTree;
use crate::error::SelectorError;

/// How an attribute value is tested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeMatcher {
    /// `[name]`
    Exists,
    /// `[name=value]`
    Equals(String),
    /// `[name*=value]`
    Contains(String),
    /// `[name^=value]`
    Prefix(String),
    /// `[name$=value]`
    Suffix(String),
    /// `[name~=value]`, whitespace-separated word list
    Word(String),
}

impl AttributeMatcher {
    fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };

        // Empty operands never match for the substring operators, as in CSS
        match self {
            Self::Exists => true,
            Self::Equals(expected) => value == expected,
            Self::Contains(needle) => !needle.is_empty() && value.contains(needle.as_str()),
            Self::Prefix(prefix) => !prefix.is_empty() && value.starts_with(prefix.as_str()),
            Self::Suffix(suffix) => !suffix.is_empty() && value.ends_with(suffix.as_str()),
            Self::Word(word) => value.split_whitespace().any(|w| w == word),
        }
    }
}

/// Single `[attribute op value]` test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    pub name: String,
    pub matcher: AttributeMatcher,
}

/// Tag and attribute tests applied to one element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    /// `None` for `*` or when only attribute filters are given
    pub tag: Option<String>,
    pub attributes: Vec<AttributeFilter>,
}

impl CompoundSelector {
    fn matches<T: DocumentTree + ?Sized>(&self, tree: &T, node: T::Node) -> bool {
        if let Some(tag) = &self.tag
            && !tree.tag_name(node).eq_ignore_ascii_case(tag)
        {
            return false;
        }

        self.attributes.iter().all(|filter| filter.matcher.matches(tree.attribute(node, &filter.name)))
    }
}

/// Compounds joined by descendant combinators, outermost first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
}

impl ComplexSelector {
    fn matches<T: DocumentTree + ?Sized>(&self, tree: &T, node: T::Node) -> bool {
        let Some((subject, ancestors)) = self.compounds.split_last() else {
            return false;
        };

        if !subject.matches(tree, node) {
            return false;
        }

        // Greedy nearest-ancestor matching is exact for descendant-only chains
        let mut current = tree.parent(node);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(candidate) = current else {
                    return false;
                };
                current = tree.parent(candidate);
                if compound.matches(tree, candidate) {
                    break;
                }
            }
        }

        true
    }
}

/// Parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<ComplexSelector>,
}

impl Selector {
    /// Parse a selector list
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] on empty input, empty alternatives, unterminated attribute
    /// brackets or quotes, and unknown operators.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse()
    }

    /// Whether `node` matches any alternative
    pub fn matches<T: DocumentTree + ?Sized>(&self, tree: &T, node: T::Node) -> bool {
        self.alternatives.iter().any(|alternative| alternative.matches(tree, node))
    }

    pub fn alternatives(&self) -> &[ComplexSelector] {
        &self.alternatives
    }

    /// The text this selector was parsed from
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, chars: input.char_indices().peekable() }
    }

    fn error(&self, position: usize, message: impl Into<String>) -> SelectorError {
        SelectorError { input: self.input.to_string(), position, message: message.into() }
    }

    fn position(&mut self) -> usize {
        self.chars.peek().map(|&(i, _)| i).unwrap_or(self.input.len())
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.peek().is_some_and(char::is_whitespace) {
            self.chars.next();
            skipped = true;
        }
        skipped
    }

    fn parse(mut self) -> Result<Selector, SelectorError> {
        if self.input.trim().is_empty() {
            return Err(self.error(0, "empty selector"));
        }

        let mut alternatives = Vec::new();
        loop {
            alternatives.push(self.parse_complex()?);
            match self.peek() {
                Some(',') => {
                    self.chars.next();
                }
                None => break,
                Some(ch) => {
                    let position = self.position();
                    return Err(self.error(position, format!("unexpected character '{}'", ch)));
                }
            }
        }

        Ok(Selector { source: self.input.trim().to_string(), alternatives })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        self.skip_whitespace();
        let mut compounds = Vec::new();

        loop {
            let start = self.position();
            let compound = self.parse_compound()?;
            if compound.tag.is_none() && compound.attributes.is_empty() && !compound_was_universal(self.input, start) {
                return Err(self.error(start, "expected tag name or attribute filter"));
            }
            compounds.push(compound);

            let had_whitespace = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some(_) if had_whitespace => continue,
                Some(ch) => {
                    let position = self.position();
                    return Err(self.error(position, format!("unexpected character '{}'", ch)));
                }
            }
        }

        Ok(ComplexSelector { compounds })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut compound = CompoundSelector::default();

        if self.peek() == Some('*') {
            self.chars.next();
        } else {
            let tag = self.read_name();
            if !tag.is_empty() {
                compound.tag = Some(tag.to_ascii_lowercase());
            }
        }

        while self.peek() == Some('[') {
            compound.attributes.push(self.parse_attribute()?);
        }

        Ok(compound)
    }

    fn parse_attribute(&mut self) -> Result<AttributeFilter, SelectorError> {
        let open = self.position();
        self.chars.next(); // '['
        self.skip_whitespace();

        let name = self.read_name();
        if name.is_empty() {
            let position = self.position();
            return Err(self.error(position, "expected attribute name"));
        }
        self.skip_whitespace();

        let operator_position = self.position();
        let operator = match self.peek() {
            Some(']') => {
                self.chars.next();
                return Ok(AttributeFilter { name, matcher: AttributeMatcher::Exists });
            }
            Some('=') => {
                self.chars.next();
                '='
            }
            Some(op @ ('*' | '^' | '$' | '~')) => {
                self.chars.next();
                if self.peek() != Some('=') {
                    return Err(self.error(operator_position, format!("expected '=' after '{}'", op)));
                }
                self.chars.next();
                op
            }
            None => return Err(self.error(open, "unterminated attribute filter")),
            Some(ch) => {
                return Err(self.error(operator_position, format!("unknown operator '{}'", ch)));
            }
        };

        self.skip_whitespace();
        let value = self.read_value(open)?;
        self.skip_whitespace();

        if self.peek() != Some(']') {
            return Err(self.error(open, "unterminated attribute filter"));
        }
        self.chars.next();

        let matcher = match operator {
            '*' => AttributeMatcher::Contains(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            '~' => AttributeMatcher::Word(value),
            _ => AttributeMatcher::Equals(value),
        };

        Ok(AttributeFilter { name, matcher })
    }

    /// Read a tag or attribute name
    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '-' || ch == '_' || ch == ':' {
                name.push(ch);
                self.chars.next();
            } else {
                break;
            }
        }
        name
    }

    /// Read a quoted or bare attribute value
    fn read_value(&mut self, open: usize) -> Result<String, SelectorError> {
        let mut value = String::new();

        if let Some(quote @ ('"' | '\'')) = self.peek() {
            self.chars.next();
            for (_, ch) in self.chars.by_ref() {
                if ch == quote {
                    return Ok(value);
                }
                value.push(ch);
            }
            return Err(self.error(open, "unterminated quoted value"));
        }

        while let Some(ch) = self.peek() {
            if ch == ']' || ch.is_whitespace() {
                break;
            }
            value.push(ch);
            self.chars.next();
        }

        Ok(value)
    }
}

fn compound_was_universal(input: &str, start: usize) -> bool {
    input[start..].starts_with('*')
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::{Snapshot, SnapshotElement};

    fn filter(name: &str, matcher: AttributeMatcher) -> AttributeFilter {
        AttributeFilter { name: name.to_string(), matcher }
    }

    #[test]
    fn test_parse_tag_and_attribute() {
        let selector = Selector::parse("span[role=listitem]").unwrap();
        assert_eq!(
            selector.alternatives(),
            &[ComplexSelector {
                compounds: vec![CompoundSelector {
                    tag: Some("span".to_string()),
                    attributes: vec![filter("role", AttributeMatcher::Equals("listitem".to_string()))],
                }],
            }]
        );
    }

    #[test]
    fn test_parse_descendant_chain() {
        let selector =
            Selector::parse("div[jsaction*=mouseenter][jslog*=impression] div[jscontroller]").unwrap();
        let compounds = &selector.alternatives()[0].compounds;
        assert_eq!(compounds.len(), 2);
        assert_eq!(
            compounds[0].attributes,
            vec![
                filter("jsaction", AttributeMatcher::Contains("mouseenter".to_string())),
                filter("jslog", AttributeMatcher::Contains("impression".to_string())),
            ]
        );
        assert_eq!(compounds[1].attributes, vec![filter("jscontroller", AttributeMatcher::Exists)]);
    }

    #[test]
    fn test_parse_custom_element_tag() {
        let selector = Selector::parse("c-wiz[data-is-user-topic=true]").unwrap();
        assert_eq!(selector.alternatives()[0].compounds[0].tag.as_deref(), Some("c-wiz"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let selector = Selector::parse(r#"a[aria-label*="Image attachment"][title='x y']"#).unwrap();
        assert_eq!(
            selector.alternatives()[0].compounds[0].attributes,
            vec![
                filter("aria-label", AttributeMatcher::Contains("Image attachment".to_string())),
                filter("title", AttributeMatcher::Equals("x y".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_selector_list() {
        let selector = Selector::parse("a[aria-label*=Image] , img[src]").unwrap();
        assert_eq!(selector.alternatives().len(), 2);
        assert_eq!(selector.to_string(), "a[aria-label*=Image] , img[src]");
    }

    #[test]
    fn test_parse_universal_and_attribute_only() {
        assert!(Selector::parse("*").is_ok());
        assert!(Selector::parse("*[title]").is_ok());
        assert!(Selector::parse("[data-absolute-timestamp]").is_ok());
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            ("", "empty selector"),
            ("   ", "empty selector"),
            ("span[role=listitem", "unterminated attribute filter"),
            ("span[role=\"x]", "unterminated quoted value"),
            ("span[]", "expected attribute name"),
            ("span[role!=x]", "unknown operator"),
            ("span[role*x]", "expected '='"),
            ("span,", "expected tag name or attribute filter"),
            ("span > div", "expected tag name or attribute filter"),
        ];

        for (input, expected) in cases {
            let err = Selector::parse(input).unwrap_err();
            assert!(err.message.contains(expected), "{:?} gave {:?}", input, err.message);
        }
    }

    #[test]
    fn test_attribute_matchers() {
        assert!(AttributeMatcher::Exists.matches(Some("")));
        assert!(!AttributeMatcher::Exists.matches(None));
        assert!(AttributeMatcher::Equals("true".to_string()).matches(Some("true")));
        assert!(!AttributeMatcher::Equals("true".to_string()).matches(Some("True")));
        assert!(AttributeMatcher::Contains("Image".to_string()).matches(Some("Image, photo.png")));
        assert!(!AttributeMatcher::Contains(String::new()).matches(Some("anything")));
        assert!(AttributeMatcher::Prefix("mouse".to_string()).matches(Some("mouseenter:x")));
        assert!(AttributeMatcher::Suffix(".png".to_string()).matches(Some("photo.png")));
        assert!(AttributeMatcher::Word("b".to_string()).matches(Some("a b c")));
        assert!(!AttributeMatcher::Word("b".to_string()).matches(Some("abc")));
    }

    #[test]
    fn test_tag_match_is_case_insensitive() {
        let snapshot = Snapshot::from_element(SnapshotElement::new("span").attr("role", "listitem"));
        let selector = Selector::parse("SPAN[role=listitem]").unwrap();
        assert!(selector.matches(&snapshot, snapshot.root()));
    }

    #[test]
    fn test_selector_list_matches_any_alternative() {
        let snapshot = Snapshot::from_element(
            SnapshotElement::new("div")
                .child(SnapshotElement::new("img").attr("src", "x.png"))
                .child(SnapshotElement::new("a").attr("aria-label", "Image")),
        );
        let selector = Selector::parse("a[aria-label*=Image], img[src]").unwrap();
        let found = snapshot.descendants(snapshot.root(), &selector);
        assert_eq!(found.len(), 2);
        assert_eq!(snapshot.tag_name(found[0]), "img");
    }
}
