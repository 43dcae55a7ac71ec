use std::{collections::BTreeSet, fmt::Debug, hash::Hash};

use crate::automaton::{
    runner::Runner,
    word::{DEFAULT_SEPARATOR, Word},
};

pub mod alphabet;
pub mod dfa;
pub mod error;
pub mod runner;
pub mod word;

/// The basic trait for anything that defines a set of symbols words can be
/// built from.
pub trait Language {
    /// Returns the set of symbols, in sorted order.
    fn symbols(&self) -> &BTreeSet<String>;

    /// Checks whether the given string is a single symbol of this language.
    fn is_valid_symbol(&self, symbol: &str) -> bool {
        self.symbols().contains(symbol)
    }

    /// Checks whether every symbol of an already decoded word is valid. The
    /// empty word is always valid.
    fn is_valid_sequence(&self, word: &Word) -> bool {
        word.iter().all(|symbol| self.is_valid_symbol(symbol))
    }

    /// Checks whether a comma separated list of symbols only contains valid
    /// symbols.
    fn is_valid_word(&self, word: &str) -> bool {
        self.is_valid_sequence(&Word::parse(word, DEFAULT_SEPARATOR))
    }
}

/// This trait represents automata that can be stepped one symbol at a time.
pub trait TransitionSystem: Language {
    /// The index type used to identify states.
    type NIndex: Debug + Copy + Clone + PartialEq + Eq + Hash;

    /// Returns the state reached from `node` by reading `symbol`, or `None` if
    /// there is no such transition.
    ///
    /// Callers are expected to only pass symbols that are valid in the
    /// language of the automaton.
    fn successor(&self, node: Self::NIndex, symbol: &str) -> Option<Self::NIndex>;
}

pub trait InitializedAutomaton: TransitionSystem {
    /// Returns the start state of the automaton.
    fn get_initial(&self) -> Self::NIndex;

    /// Returns true if the passed in state is accepting / a final state.
    /// Returns false otherwise.
    fn is_accepting(&self, node: Self::NIndex) -> bool;
}

/// Anything that can decide whether a word belongs to its language.
pub trait Acceptor: Language {
    fn accepts(&self, word: &Word) -> bool;
}

impl<T: InitializedAutomaton> Acceptor for T {
    fn accepts(&self, word: &Word) -> bool {
        Runner::new(self, word).run().is_accepted()
    }
}
