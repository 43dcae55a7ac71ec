use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::automaton::{InitializedAutomaton, word::Word};

/// Why a run over a valid word ended without accepting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection<I> {
    /// There is no transition from `state` on the symbol at `position`. No
    /// continuation of the word can be accepted from here.
    DeadTransition {
        state: I,
        symbol: String,
        position: usize,
    },
    /// The whole word was read, but the run ended in a non-final state.
    NonAcceptingState { state: I },
}

/// The result of running a word through an automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome<I> {
    Accepted { state: I },
    Rejected(Rejection<I>),
    /// The word contains a symbol that is not in the alphabet. The run stopped
    /// at the first such symbol.
    InvalidWord { position: usize, symbol: String },
}

impl<I> RunOutcome<I> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RunOutcome::Accepted { .. })
    }

    /// True for every outcome that is not an acceptance, including invalid
    /// words.
    pub fn is_rejected(&self) -> bool {
        !self.is_accepted()
    }

    pub fn is_invalid_word(&self) -> bool {
        matches!(self, RunOutcome::InvalidWord { .. })
    }

    pub fn is_dead_transition(&self) -> bool {
        matches!(
            self,
            RunOutcome::Rejected(Rejection::DeadTransition { .. })
        )
    }

    /// The state the run stopped in, if it stopped in one.
    pub fn state(&self) -> Option<&I> {
        match self {
            RunOutcome::Accepted { state }
            | RunOutcome::Rejected(Rejection::DeadTransition { state, .. })
            | RunOutcome::Rejected(Rejection::NonAcceptingState { state }) => Some(state),
            RunOutcome::InvalidWord { .. } => None,
        }
    }

    pub fn map_state<J>(self, f: impl Fn(I) -> J) -> RunOutcome<J> {
        match self {
            RunOutcome::Accepted { state } => RunOutcome::Accepted { state: f(state) },
            RunOutcome::Rejected(Rejection::DeadTransition {
                state,
                symbol,
                position,
            }) => RunOutcome::Rejected(Rejection::DeadTransition {
                state: f(state),
                symbol,
                position,
            }),
            RunOutcome::Rejected(Rejection::NonAcceptingState { state }) => {
                RunOutcome::Rejected(Rejection::NonAcceptingState { state: f(state) })
            }
            RunOutcome::InvalidWord { position, symbol } => {
                RunOutcome::InvalidWord { position, symbol }
            }
        }
    }
}

impl<I: Display> Display for RunOutcome<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Accepted { state } => write!(f, "accepted in state {}", state),
            RunOutcome::Rejected(Rejection::DeadTransition {
                state,
                symbol,
                position,
            }) => write!(
                f,
                "rejected, no transition from state {} on symbol {:?} at position {}",
                state, symbol, position
            ),
            RunOutcome::Rejected(Rejection::NonAcceptingState { state }) => {
                write!(f, "rejected, ended in non-final state {}", state)
            }
            RunOutcome::InvalidWord { position, symbol } => {
                write!(f, "invalid word, unknown symbol {:?} at position {}", symbol, position)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SerializableRunStatus {
    Accepted,
    Rejected,
    InvalidWord,
}

impl<I> From<&RunOutcome<I>> for SerializableRunStatus {
    fn from(outcome: &RunOutcome<I>) -> Self {
        match outcome {
            RunOutcome::Accepted { .. } => SerializableRunStatus::Accepted,
            RunOutcome::Rejected(_) => SerializableRunStatus::Rejected,
            RunOutcome::InvalidWord { .. } => SerializableRunStatus::InvalidWord,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerState<I> {
    /// The run is in `state` and the next symbol to read is at `position`.
    Running { state: I, position: usize },
    Halted(RunOutcome<I>),
}

/// A single symbol read by a [`Runner`]. `to` is `None` for a dead
/// transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<I> {
    pub position: usize,
    pub symbol: String,
    pub from: I,
    pub to: Option<I>,
}

/// Executes a word on an automaton, one symbol at a time.
///
/// The runner starts in the initial state of the automaton and halts after at
/// most `word.len() + 1` calls to [`Runner::step`]: one per symbol and one for
/// the final accept / reject decision.
#[derive(Debug)]
pub struct Runner<'a, A: InitializedAutomaton> {
    automaton: &'a A,
    word: &'a Word,
    state: RunnerState<A::NIndex>,
    visited: Vec<A::NIndex>,
}

impl<'a, A: InitializedAutomaton> Runner<'a, A> {
    pub fn new(automaton: &'a A, word: &'a Word) -> Self {
        let initial = automaton.get_initial();

        Runner {
            automaton,
            word,
            state: RunnerState::Running {
                state: initial,
                position: 0,
            },
            visited: vec![initial],
        }
    }

    pub fn state(&self) -> &RunnerState<A::NIndex> {
        &self.state
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, RunnerState::Halted(_))
    }

    pub fn outcome(&self) -> Option<&RunOutcome<A::NIndex>> {
        match &self.state {
            RunnerState::Halted(outcome) => Some(outcome),
            RunnerState::Running { .. } => None,
        }
    }

    /// The states visited so far, starting with the initial state.
    pub fn visited(&self) -> &[A::NIndex] {
        &self.visited
    }

    /// Advances the run by one step.
    ///
    /// Returns the transition taken if a symbol was read. Returns `None` if the
    /// runner halted without taking a transition (invalid symbol or end of the
    /// word) or was already halted.
    pub fn step(&mut self) -> Option<Step<A::NIndex>> {
        let RunnerState::Running { state, position } = self.state else {
            return None;
        };

        let word = self.word;
        let Some(symbol) = word.get(position) else {
            let outcome = if self.automaton.is_accepting(state) {
                RunOutcome::Accepted { state }
            } else {
                RunOutcome::Rejected(Rejection::NonAcceptingState { state })
            };
            self.halt(outcome);
            return None;
        };

        if !self.automaton.is_valid_symbol(symbol) {
            self.halt(RunOutcome::InvalidWord {
                position,
                symbol: symbol.clone(),
            });
            return None;
        }

        let next = self.automaton.successor(state, symbol);
        tracing::trace!(?state, %symbol, ?next, position, "runner step");

        match next {
            Some(next) => {
                self.visited.push(next);
                self.state = RunnerState::Running {
                    state: next,
                    position: position + 1,
                };
            }
            None => self.halt(RunOutcome::Rejected(Rejection::DeadTransition {
                state,
                symbol: symbol.clone(),
                position,
            })),
        }

        Some(Step {
            position,
            symbol: symbol.clone(),
            from: state,
            to: next,
        })
    }

    /// Drives the run to completion.
    pub fn run(mut self) -> RunOutcome<A::NIndex> {
        loop {
            match self.state {
                RunnerState::Halted(outcome) => return outcome,
                RunnerState::Running { .. } => {
                    self.step();
                }
            }
        }
    }

    /// Drives the run to completion, returning the outcome together with the
    /// visited states.
    pub fn run_with_trace(mut self) -> (RunOutcome<A::NIndex>, Vec<A::NIndex>) {
        while !self.is_halted() {
            self.step();
        }

        let visited = std::mem::take(&mut self.visited);
        (self.run(), visited)
    }

    fn halt(&mut self, outcome: RunOutcome<A::NIndex>) {
        tracing::debug!(?outcome, word = %self.word, "run halted");
        self.state = RunnerState::Halted(outcome);
    }
}

impl<A: InitializedAutomaton> Iterator for Runner<'_, A> {
    type Item = Step<A::NIndex>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_halted() {
            return None;
        }

        self.step()
    }
}
