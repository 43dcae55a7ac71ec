use std::fmt::Display;

/// The ways a candidate automaton can fail structural validation.
///
/// Every variant corresponds to exactly one construction invariant, so the
/// variant alone identifies which invariant was broken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error("the set of states contains the empty state identifier")]
    EmptyStateIdentifier,
    #[error("the alphabet is empty")]
    EmptyAlphabet,
    #[error("the alphabet contains the empty symbol")]
    EmptySymbol,
    #[error("the alphabet contains symbol {0:?} more than once")]
    DuplicateSymbol(String),
    #[error("the transition function is incomplete: {0}")]
    IncompleteTransition(IncompleteTransition),
    #[error("transition {state:?} -{symbol:?}-> {target:?} leads to an unknown state")]
    InvalidTransitionTarget {
        state: String,
        symbol: String,
        target: String,
    },
    #[error("initial state {0:?} is not a state of the automaton")]
    InvalidInitialState(String),
    #[error("final state {0:?} is not a state of the automaton")]
    InvalidFinalState(String),
}

/// Details on how the domain of a transition table differs from
/// states × alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncompleteTransition {
    /// A state has no transition row at all.
    MissingState(String),
    /// There is a transition row for something that is not a state.
    UnknownState(String),
    /// A state has no entry for a symbol of the alphabet.
    MissingSymbol { state: String, symbol: String },
    /// A state has an entry for something that is not in the alphabet.
    UnknownSymbol { state: String, symbol: String },
}

impl Display for IncompleteTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncompleteTransition::MissingState(state) => {
                write!(f, "no transitions defined for state {:?}", state)
            }
            IncompleteTransition::UnknownState(state) => {
                write!(f, "transitions defined for unknown state {:?}", state)
            }
            IncompleteTransition::MissingSymbol { state, symbol } => {
                write!(f, "state {:?} has no entry for symbol {:?}", state, symbol)
            }
            IncompleteTransition::UnknownSymbol { state, symbol } => {
                write!(
                    f,
                    "state {:?} has an entry for unknown symbol {:?}",
                    state, symbol
                )
            }
        }
    }
}

/// Contract violations when querying a validated automaton.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("trying to transition from invalid state {0:?}")]
    InvalidState(String),
    #[error("trying to transition using invalid symbol {0:?}")]
    InvalidSymbol(String),
}
