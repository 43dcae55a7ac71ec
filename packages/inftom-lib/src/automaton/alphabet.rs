use std::collections::BTreeSet;

use crate::automaton::{Language, error::ConstructionError};

/// A finite, non-empty set of symbols. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: BTreeSet<String>,
}

impl Alphabet {
    /// Builds an alphabet, rejecting empty symbols, repeated symbols and an
    /// empty symbol set, in that order.
    pub fn new<S: Into<String>>(
        symbols: impl IntoIterator<Item = S>,
    ) -> Result<Self, ConstructionError> {
        let mut set = BTreeSet::new();

        for symbol in symbols {
            let symbol = symbol.into();

            if symbol.is_empty() {
                return Err(ConstructionError::EmptySymbol);
            }

            if set.contains(&symbol) {
                return Err(ConstructionError::DuplicateSymbol(symbol));
            }

            set.insert(symbol);
        }

        if set.is_empty() {
            return Err(ConstructionError::EmptyAlphabet);
        }

        Ok(Alphabet { symbols: set })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false, an alphabet cannot be built without symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

impl Language for Alphabet {
    fn symbols(&self) -> &BTreeSet<String> {
        &self.symbols
    }

    fn is_valid_symbol(&self, symbol: &str) -> bool {
        self.contains(symbol)
    }
}
