use std::{
    collections::{BTreeSet, VecDeque},
    fmt::Debug,
};

use candidate::DfaCandidate;
use hashbrown::HashMap;
use itertools::Itertools;
use node::DfaNode;
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use crate::automaton::{
    InitializedAutomaton, Language, TransitionSystem,
    alphabet::Alphabet,
    error::{ConstructionError, IncompleteTransition, QueryError},
    runner::{RunOutcome, Runner},
    word::{DEFAULT_SEPARATOR, Word},
};

pub mod candidate;
pub mod node;

/// A validated, immutable deterministic finite automaton over string symbols.
///
/// States are the nodes of the graph, transitions are edges labelled with
/// their symbol. Every state has at most one outgoing edge per symbol. A
/// missing edge is a dead transition: the candidate the DFA was built from
/// explicitly mapped that (state, symbol) pair to no state.
///
/// There is no way to modify a DFA after construction, so it can be shared
/// freely between threads.
#[derive(Clone)]
pub struct DFA {
    graph: DiGraph<DfaNode, String>,
    alphabet: Alphabet,
    initial: NodeIndex<u32>,
    lookup: HashMap<String, NodeIndex<u32>>,
    /// Outgoing transitions per state, indexed by `NodeIndex::index`.
    transitions: Vec<HashMap<String, NodeIndex<u32>>>,
}

impl DFA {
    /// Validates a candidate and builds a DFA from it.
    ///
    /// The checks run in a fixed order, and the first failing one is
    /// reported:
    /// 1. no state identifier is empty
    /// 2. the alphabet is valid (non-empty, no empty symbol)
    /// 3. the transition table has a row for exactly the states
    /// 4. every row has an entry for exactly the symbols of the alphabet
    /// 5. every present transition target is a state
    /// 6. the initial state is a state
    /// 7. every final state is a state
    ///
    /// Sets and maps are walked in sorted order, so the same invalid candidate
    /// always reports the same error.
    pub fn new(candidate: DfaCandidate) -> Result<Self, ConstructionError> {
        let DfaCandidate {
            states,
            alphabet,
            delta,
            initial_state,
            final_states,
        } = candidate;

        if states.iter().any(|state| state.is_empty()) {
            return Err(ConstructionError::EmptyStateIdentifier);
        }

        let alphabet = Alphabet::new(alphabet)?;

        if let Some(state) = states.iter().find(|state| !delta.contains_key(*state)) {
            return Err(ConstructionError::IncompleteTransition(
                IncompleteTransition::MissingState(state.clone()),
            ));
        }

        if let Some(state) = delta.keys().find(|state| !states.contains(*state)) {
            return Err(ConstructionError::IncompleteTransition(
                IncompleteTransition::UnknownState(state.clone()),
            ));
        }

        for (state, row) in delta.iter() {
            if let Some(symbol) = alphabet.iter().find(|symbol| !row.contains_key(*symbol)) {
                return Err(ConstructionError::IncompleteTransition(
                    IncompleteTransition::MissingSymbol {
                        state: state.clone(),
                        symbol: symbol.to_string(),
                    },
                ));
            }

            if let Some(symbol) = row.keys().find(|symbol| !alphabet.contains(symbol)) {
                return Err(ConstructionError::IncompleteTransition(
                    IncompleteTransition::UnknownSymbol {
                        state: state.clone(),
                        symbol: symbol.clone(),
                    },
                ));
            }
        }

        for (state, row) in delta.iter() {
            for (symbol, target) in row.iter() {
                if let Some(target) = target
                    && !states.contains(target)
                {
                    return Err(ConstructionError::InvalidTransitionTarget {
                        state: state.clone(),
                        symbol: symbol.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        if !states.contains(&initial_state) {
            return Err(ConstructionError::InvalidInitialState(initial_state));
        }

        if let Some(state) = final_states.iter().find(|state| !states.contains(*state)) {
            return Err(ConstructionError::InvalidFinalState(state.clone()));
        }

        // everything is valid from here on, so the lookups below cannot fail
        let mut graph = DiGraph::with_capacity(states.len(), states.len() * alphabet.len());
        let mut lookup = HashMap::with_capacity(states.len());
        let mut transitions = Vec::with_capacity(states.len());

        for state in states {
            let accepting = final_states.contains(&state);
            let node = graph.add_node(DfaNode::new(state.clone(), accepting));
            lookup.insert(state, node);
            transitions.push(HashMap::with_capacity(alphabet.len()));
        }

        for (state, row) in delta {
            let from = lookup[&state];

            for (symbol, target) in row {
                if let Some(target) = target {
                    let to = lookup[&target];
                    transitions[from.index()].insert(symbol.clone(), to);
                    graph.add_edge(from, to, symbol);
                }
            }
        }

        let initial = lookup[&initial_state];

        tracing::debug!(
            states = graph.node_count(),
            symbols = alphabet.len(),
            transitions = graph.edge_count(),
            "validated DFA"
        );

        Ok(DFA {
            graph,
            alphabet,
            initial,
            lookup,
            transitions,
        })
    }

    /// Loads a candidate from JSON and validates it.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(DFA::new(DfaCandidate::from_json(json)?)?)
    }

    /// Loads a candidate from a file and validates it.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        Ok(DFA::new(DfaCandidate::from_file(path)?)?)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Iterates over all state identifiers in sorted order.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(DfaNode::name)
    }

    pub fn initial_state(&self) -> &str {
        self.graph[self.initial].name()
    }

    /// Iterates over all final state identifiers in sorted order.
    pub fn final_states(&self) -> impl Iterator<Item = &str> {
        self.graph
            .node_weights()
            .filter(|node| node.is_accepting())
            .map(DfaNode::name)
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    /// The number of transitions that lead to a state, i.e. excluding dead
    /// transitions.
    pub fn transition_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.lookup.contains_key(state)
    }

    pub fn is_final_state(&self, state: &str) -> bool {
        self.node_index(state)
            .is_some_and(|node| self.graph[node].is_accepting())
    }

    pub fn node_index(&self, state: &str) -> Option<NodeIndex<u32>> {
        self.lookup.get(state).copied()
    }

    pub fn state_name(&self, node: NodeIndex<u32>) -> Option<&str> {
        self.graph.node_weight(node).map(DfaNode::name)
    }

    /// Looks up the transition for `(state, symbol)`.
    ///
    /// Returns `Ok(None)` for a dead transition. Querying a state or symbol
    /// that is not part of the automaton is an error.
    pub fn next_state(&self, state: &str, symbol: &str) -> Result<Option<&str>, QueryError> {
        let node = self
            .node_index(state)
            .ok_or_else(|| QueryError::InvalidState(state.to_string()))?;

        if !self.alphabet.contains(symbol) {
            return Err(QueryError::InvalidSymbol(symbol.to_string()));
        }

        Ok(self
            .successor(node, symbol)
            .map(|next| self.graph[next].name()))
    }

    pub fn runner<'a>(&'a self, word: &'a Word) -> Runner<'a, Self> {
        Runner::new(self, word)
    }

    pub fn run(&self, word: &Word) -> RunOutcome<NodeIndex<u32>> {
        self.runner(word).run()
    }

    /// Runs a word given in its textual, comma separated encoding.
    pub fn run_str(&self, word: &str) -> RunOutcome<NodeIndex<u32>> {
        self.run(&Word::parse(word, DEFAULT_SEPARATOR))
    }

    pub fn accepts_str(&self, word: &str) -> bool {
        self.run_str(word).is_accepted()
    }

    /// Replaces the node indices in an outcome of this DFA by state names.
    pub fn named_outcome(&self, outcome: RunOutcome<NodeIndex<u32>>) -> RunOutcome<String> {
        outcome.map_state(|node| self.graph[node].name().to_string())
    }

    /// All states reachable from the initial state, in breadth first order.
    pub fn reachable_states(&self) -> Vec<&str> {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();
        let mut reachable = Vec::new();

        visited.insert(self.initial);
        queue.push_back(self.initial);

        while let Some(node) = queue.pop_front() {
            reachable.push(self.graph[node].name());

            for target in self.sorted_edges(node).map(|edge| edge.target()) {
                if visited.insert(target) {
                    queue.push_back(target);
                }
            }
        }

        reachable
    }

    /// Finds a shortest accepted word by a breadth first search from the
    /// initial state. Among words of equal length, the one that is smallest
    /// symbol by symbol wins.
    pub fn shortest_accepted_word(&self) -> Option<Word> {
        let mut parents: HashMap<NodeIndex<u32>, Option<EdgeIndex<u32>>> = HashMap::new();
        let mut queue = VecDeque::new();

        parents.insert(self.initial, None);
        queue.push_back(self.initial);

        while let Some(node) = queue.pop_front() {
            if self.graph[node].is_accepting() {
                return Some(self.word_to(node, &parents));
            }

            for edge in self.sorted_edges(node) {
                if let hashbrown::hash_map::Entry::Vacant(entry) = parents.entry(edge.target()) {
                    entry.insert(Some(edge.id()));
                    queue.push_back(edge.target());
                }
            }
        }

        None
    }

    /// Checks whether any word is accepted, i.e. whether some final state is
    /// reachable from the initial state.
    pub fn has_accepting_run(&self) -> bool {
        if self.graph.node_weights().all(|node| !node.is_accepting()) {
            return false;
        }

        self.shortest_accepted_word().is_some()
    }

    /// Checks if `L(Self) = ∅` by checking if there is no accepting run in the
    /// DFA.
    pub fn is_language_empty(&self) -> bool {
        !self.has_accepting_run()
    }

    pub fn to_graphviz(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph finite_state_machine {\n");
        dot.push_str("fontname=\"Helvetica,Arial,sans-serif\"\n");
        dot.push_str("node [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("edge [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("rankdir=LR;\n");
        dot.push_str("node [shape=point,label=\"\"]START\n");

        let accepting_states = self
            .final_states()
            .map(|name| format!("{:?}", name))
            .collect_vec();
        if !accepting_states.is_empty() {
            dot.push_str(&format!(
                "node [shape = doublecircle]; {};\n",
                accepting_states.join(" ")
            ));
        }
        dot.push_str("node [shape = circle];\n");

        dot.push_str(&format!("START -> {:?};\n", self.initial_state()));

        for node in self.graph.node_indices() {
            for edge in self.sorted_edges(node) {
                dot.push_str(&format!(
                    "{:?} -> {:?} [ label={:?} ];\n",
                    self.graph[edge.source()].name(),
                    self.graph[edge.target()].name(),
                    edge.weight()
                ));
            }
        }

        dot.push_str("}\n");

        dot
    }

    fn sorted_edges(
        &self,
        node: NodeIndex<u32>,
    ) -> impl Iterator<Item = petgraph::graph::EdgeReference<'_, String>> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .sorted_by(|a, b| a.weight().cmp(b.weight()))
    }

    fn word_to(
        &self,
        node: NodeIndex<u32>,
        parents: &HashMap<NodeIndex<u32>, Option<EdgeIndex<u32>>>,
    ) -> Word {
        let mut symbols = Vec::new();
        let mut current = node;

        while let Some(Some(edge)) = parents.get(&current) {
            symbols.push(self.graph[*edge].clone());
            current = self
                .graph
                .edge_endpoints(*edge)
                .map_or(self.initial, |(from, _)| from);
        }

        symbols.reverse();
        Word::from(symbols)
    }
}

impl TryFrom<DfaCandidate> for DFA {
    type Error = ConstructionError;

    fn try_from(candidate: DfaCandidate) -> Result<Self, Self::Error> {
        DFA::new(candidate)
    }
}

impl Language for DFA {
    fn symbols(&self) -> &BTreeSet<String> {
        self.alphabet.symbols()
    }

    fn is_valid_symbol(&self, symbol: &str) -> bool {
        self.alphabet.contains(symbol)
    }
}

impl TransitionSystem for DFA {
    type NIndex = NodeIndex<u32>;

    fn successor(&self, node: Self::NIndex, symbol: &str) -> Option<Self::NIndex> {
        self.transitions.get(node.index())?.get(symbol).copied()
    }
}

impl InitializedAutomaton for DFA {
    fn get_initial(&self) -> Self::NIndex {
        self.initial
    }

    fn is_accepting(&self, node: Self::NIndex) -> bool {
        self.graph[node].is_accepting()
    }
}

impl Debug for DFA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DFA")
            .field("alphabet", &self.alphabet.iter().collect_vec())
            .field("states", &self.states().collect_vec())
            .field("initial_state", &self.initial_state())
            .field("final_states", &self.final_states().collect_vec())
            .field(
                "transitions",
                &self
                    .graph
                    .edge_references()
                    .map(|edge| {
                        format!(
                            "{} --- {} --> {}",
                            self.graph[edge.source()].name(),
                            edge.weight(),
                            self.graph[edge.target()].name()
                        )
                    })
                    .collect_vec(),
            )
            .finish()
    }
}
