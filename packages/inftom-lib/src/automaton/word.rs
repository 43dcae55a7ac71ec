use std::{fmt::Display, ops::Deref};

use itertools::Itertools;

/// The separator of the canonical textual word encoding, e.g. `a,b,a`.
pub const DEFAULT_SEPARATOR: &str = ",";

/// A word, i.e. an ordered sequence of symbols.
///
/// A word is just data. Whether its symbols belong to some alphabet is decided
/// by [`crate::automaton::Language`], not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(Vec<String>);

impl Word {
    pub fn empty() -> Self {
        Word(Vec::new())
    }

    /// Decodes a word from its textual encoding.
    ///
    /// Tokens are taken exactly as they appear between separators, whitespace
    /// included. Only the empty text is the empty word. An empty separator
    /// splits the text into single characters.
    pub fn parse(text: &str, separator: &str) -> Self {
        if text.is_empty() {
            return Word::empty();
        }

        if separator.is_empty() {
            return text.chars().map(String::from).collect();
        }

        text.split(separator).collect()
    }

    pub fn push(&mut self, symbol: impl Into<String>) {
        self.0.push(symbol.into());
    }

    /// Encodes the word using the given separator.
    pub fn encode(&self, separator: &str) -> String {
        self.0.iter().join(separator)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Word {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for Word {
    fn from(value: Vec<String>) -> Self {
        Word(value)
    }
}

impl From<&[&str]> for Word {
    fn from(value: &[&str]) -> Self {
        value.iter().map(|s| s.to_string()).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Word {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Word(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Word {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode(DEFAULT_SEPARATOR))
    }
}

#[test]
fn test_parse_comma_separated() {
    let word = Word::parse("a,b,c", DEFAULT_SEPARATOR);
    assert_eq!(word, Word::from_iter(["a", "b", "c"]));
    assert_eq!(word.len(), 3);
}

#[test]
fn test_parse_keeps_whitespace() {
    let word = Word::parse("a, b", DEFAULT_SEPARATOR);
    assert_eq!(word, Word::from_iter(["a", " b"]));

    let word = Word::parse(" ", DEFAULT_SEPARATOR);
    assert_eq!(word, Word::from_iter([" "]));
}

#[test]
fn test_parse_only_empty_text_is_empty() {
    assert!(Word::parse("", DEFAULT_SEPARATOR).is_empty());
    assert_eq!(Word::parse("   ", DEFAULT_SEPARATOR).len(), 1);
}

#[test]
fn test_parse_keeps_empty_tokens() {
    let word = Word::parse("a,,b", DEFAULT_SEPARATOR);
    assert_eq!(word.len(), 3);
    assert_eq!(word[1], "");
}

#[test]
fn test_parse_without_separator() {
    let word = Word::parse("ab a", "");
    assert_eq!(word, Word::from_iter(["a", "b", " ", "a"]));
}

#[test]
fn test_encode() {
    let word = Word::from_iter(["q", "r"]);
    assert_eq!(word.to_string(), "q,r");
    assert_eq!(word.encode(" "), "q r");
    assert_eq!(Word::empty().to_string(), "");
}
