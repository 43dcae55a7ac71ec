//! Raw, unvalidated automaton data, as read from JSON.
//!
//! An example candidate accepting all words over `{a, b}` that end in `a`:
//!
//! ```json
//! {
//!     "states": ["q0", "q1"],
//!     "alphabet": ["a", "b"],
//!     "delta": {
//!         "q0": { "a": "q1", "b": "q0" },
//!         "q1": { "a": "q1", "b": "q0" }
//!     },
//!     "initialState": "q0",
//!     "finalStates": ["q1"]
//! }
//! ```
//!
//! A `null` target is a dead transition. Leaving out a symbol altogether is
//! not allowed and fails validation.
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// The transition table of a candidate: state -> symbol -> optional target.
pub type TransitionTable = BTreeMap<String, BTreeMap<String, Option<String>>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DfaCandidate {
    pub states: BTreeSet<String>,
    pub alphabet: BTreeSet<String>,
    pub delta: TransitionTable,
    pub initial_state: String,
    pub final_states: BTreeSet<String>,
}

impl DfaCandidate {
    /// Creates a candidate without any transitions. Add them with
    /// [`DfaCandidate::with_transition`] and
    /// [`DfaCandidate::with_dead_transition`].
    pub fn new<S: Into<String>>(
        states: impl IntoIterator<Item = S>,
        alphabet: impl IntoIterator<Item = S>,
        initial_state: impl Into<String>,
        final_states: impl IntoIterator<Item = S>,
    ) -> Self {
        DfaCandidate {
            states: states.into_iter().map(Into::into).collect(),
            alphabet: alphabet.into_iter().map(Into::into).collect(),
            delta: BTreeMap::new(),
            initial_state: initial_state.into(),
            final_states: final_states.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_transition(
        mut self,
        from: impl Into<String>,
        symbol: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.set_transition(from.into(), symbol.into(), Some(to.into()));
        self
    }

    pub fn with_dead_transition(
        mut self,
        from: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        self.set_transition(from.into(), symbol.into(), None);
        self
    }

    /// Removes the entry for `(from, symbol)`, leaving the table incomplete.
    pub fn without_transition(mut self, from: &str, symbol: &str) -> Self {
        if let Some(row) = self.delta.get_mut(from) {
            row.remove(symbol);
        }
        self
    }

    pub fn set_transition(&mut self, from: String, symbol: String, to: Option<String>) {
        self.delta.entry(from).or_default().insert(symbol, to);
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match path.extension() {
            Some(ext) if ext == "json" => {
                let json_str = std::fs::read_to_string(path)?;
                Self::from_json(&json_str)
            }
            _ => Err(anyhow::anyhow!(
                "Unsupported file extension: {:?}",
                path.extension()
            )),
        }
    }
}

#[test]
fn test_null_is_dead_transition() {
    let candidate = DfaCandidate::from_json(
        r#"{
            "states": ["q0"],
            "alphabet": ["a", "b"],
            "delta": { "q0": { "a": "q0", "b": null } },
            "initialState": "q0",
            "finalStates": []
        }"#,
    )
    .unwrap();

    let row = &candidate.delta["q0"];
    assert_eq!(row.get("a"), Some(&Some("q0".to_string())));
    assert_eq!(row.get("b"), Some(&None));
}

#[test]
fn test_builder_matches_json() {
    let built = DfaCandidate::new(["q0", "q1"], ["a"], "q0", ["q1"])
        .with_transition("q0", "a", "q1")
        .with_dead_transition("q1", "a");

    let parsed = DfaCandidate::from_json(
        r#"{
            "states": ["q1", "q0"],
            "alphabet": ["a"],
            "delta": { "q0": { "a": "q1" }, "q1": { "a": null } },
            "initialState": "q0",
            "finalStates": ["q1"]
        }"#,
    )
    .unwrap();

    assert_eq!(built, parsed);
}

#[test]
fn test_json_keeps_dead_transitions() {
    let candidate = DfaCandidate::new(["q0"], ["a", "b"], "q0", ["q0"])
        .with_transition("q0", "a", "q0")
        .with_dead_transition("q0", "b");

    let json = candidate.to_json().unwrap();
    assert!(json.contains("\"initialState\": \"q0\""));
    assert!(json.contains("\"b\": null"));
    assert_eq!(DfaCandidate::from_json(&json).unwrap(), candidate);
}

#[test]
fn test_unsupported_extension() {
    assert!(DfaCandidate::from_file("automaton.yaml").is_err());
}
