use inftom_lib::automaton::{
    Acceptor, InitializedAutomaton,
    dfa::{DFA, candidate::DfaCandidate},
    runner::{Rejection, RunOutcome, Runner, RunnerState, SerializableRunStatus, Step},
    word::Word,
};
use itertools::Itertools;
use rand::{RngExt, SeedableRng, rngs::StdRng};

fn ends_with_a() -> DFA {
    let candidate = DfaCandidate::new(["q0", "q1"], ["a", "b"], "q0", ["q1"])
        .with_transition("q0", "a", "q1")
        .with_transition("q0", "b", "q0")
        .with_transition("q1", "a", "q1")
        .with_transition("q1", "b", "q0");
    DFA::new(candidate).unwrap()
}

/// Accepts exactly the words starting with `a b`.
fn ab_prefix() -> DFA {
    let candidate =
        DfaCandidate::new(["start", "seen_a", "done"], ["a", "b"], "start", ["done"])
            .with_transition("start", "a", "seen_a")
            .with_dead_transition("start", "b")
            .with_dead_transition("seen_a", "a")
            .with_transition("seen_a", "b", "done")
            .with_transition("done", "a", "done")
            .with_transition("done", "b", "done");
    DFA::new(candidate).unwrap()
}

fn word(text: &str) -> Word {
    Word::parse(text, ",")
}

/// Builds a candidate with `state_count` states over `symbol_count` symbols,
/// where every transition is either dead or leads to a random state.
fn random_candidate(
    random: &mut StdRng,
    state_count: usize,
    symbol_count: usize,
) -> DfaCandidate {
    let states = (0..state_count).map(|i| format!("q{}", i)).collect_vec();
    let symbols = (0..symbol_count).map(|i| format!("s{}", i)).collect_vec();
    let finals = states
        .iter()
        .filter(|_| random.random_range(0..3) == 0)
        .cloned()
        .collect_vec();

    let mut candidate = DfaCandidate::new(states.clone(), symbols.clone(), "q0", finals);
    for state in &states {
        for symbol in &symbols {
            let target = if random.random_range(0..5) == 0 {
                None
            } else {
                Some(states[random.random_range(0..state_count)].clone())
            };
            candidate.set_transition(state.clone(), symbol.clone(), target);
        }
    }

    candidate
}

fn random_dfa(random: &mut StdRng, state_count: usize, symbol_count: usize) -> DFA {
    DFA::new(random_candidate(random, state_count, symbol_count)).unwrap()
}

fn random_word(random: &mut StdRng, symbol_count: usize, max_len: usize) -> Word {
    let len = random.random_range(0..=max_len);
    (0..len)
        .map(|_| format!("s{}", random.random_range(0..symbol_count)))
        .collect()
}

#[test]
fn test_runner_outcomes() {
    let dfa = ends_with_a();

    let outcome = dfa.named_outcome(dfa.run(&word("b,a")));
    assert_eq!(
        outcome,
        RunOutcome::Accepted {
            state: "q1".to_string()
        }
    );

    let outcome = dfa.named_outcome(dfa.run(&word("a,b")));
    assert_eq!(
        outcome,
        RunOutcome::Rejected(Rejection::NonAcceptingState {
            state: "q0".to_string()
        })
    );

    let outcome = dfa.named_outcome(dfa.run(&Word::empty()));
    assert_eq!(
        outcome,
        RunOutcome::Rejected(Rejection::NonAcceptingState {
            state: "q0".to_string()
        })
    );
}

#[test]
fn test_runner_dead_transition() {
    let dfa = ab_prefix();

    let outcome = dfa.named_outcome(dfa.run(&word("a,a,b")));
    assert_eq!(
        outcome,
        RunOutcome::Rejected(Rejection::DeadTransition {
            state: "seen_a".to_string(),
            symbol: "a".to_string(),
            position: 1,
        })
    );
    assert!(outcome.is_dead_transition());
    assert!(outcome.is_rejected());
    assert!(!outcome.is_invalid_word());
}

#[test]
fn test_runner_invalid_word() {
    let dfa = ends_with_a();

    let outcome = dfa.run(&word("a,c,a"));
    assert_eq!(
        outcome,
        RunOutcome::InvalidWord {
            position: 1,
            symbol: "c".to_string()
        }
    );
    assert!(outcome.is_invalid_word());
    assert!(outcome.is_rejected());
    assert_eq!(outcome.state(), None);
    assert!(!dfa.accepts(&word("a,c,a")));
}

#[test]
fn test_invalid_symbol_after_dead_transition() {
    // the run stops at the dead transition and never looks at the unknown
    // symbol behind it
    let dfa = ab_prefix();

    let outcome = dfa.run(&word("b,x"));
    assert!(outcome.is_dead_transition());
}

#[test]
fn test_run_str() {
    let dfa = ends_with_a();

    assert!(dfa.run_str("b,b,a").is_accepted());
    assert!(dfa.run_str("a,b").is_rejected());
    assert!(dfa.run_str("").is_rejected());
}

#[test]
fn test_runner_step_by_step() {
    let dfa = ends_with_a();
    let q0 = dfa.node_index("q0").unwrap();
    let q1 = dfa.node_index("q1").unwrap();
    let input = word("a,b");

    let mut runner = dfa.runner(&input);
    assert_eq!(
        runner.state(),
        &RunnerState::Running {
            state: q0,
            position: 0
        }
    );

    assert_eq!(
        runner.step(),
        Some(Step {
            position: 0,
            symbol: "a".to_string(),
            from: q0,
            to: Some(q1),
        })
    );
    assert_eq!(
        runner.step(),
        Some(Step {
            position: 1,
            symbol: "b".to_string(),
            from: q1,
            to: Some(q0),
        })
    );
    assert!(!runner.is_halted());

    assert_eq!(runner.step(), None);
    assert!(runner.is_halted());
    assert_eq!(
        runner.outcome(),
        Some(&RunOutcome::Rejected(Rejection::NonAcceptingState {
            state: q0
        }))
    );
    assert_eq!(runner.visited(), &[q0, q1, q0]);

    // halted runners stay halted
    assert_eq!(runner.step(), None);
    assert!(runner.is_halted());
}

#[test]
fn test_runner_iterator() {
    let dfa = ab_prefix();
    let input = word("a,b,a");

    let symbols = dfa
        .runner(&input)
        .map(|step| step.symbol)
        .collect_vec();
    assert_eq!(symbols, vec!["a", "b", "a"]);

    let input = word("a,a,b");
    let steps = dfa.runner(&input).collect_vec();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].to, None);
}

#[test]
fn test_run_with_trace() {
    let dfa = ab_prefix();
    let input = word("a,b,b");

    let (outcome, visited) = dfa.runner(&input).run_with_trace();
    assert!(outcome.is_accepted());
    assert_eq!(
        visited
            .iter()
            .map(|node| dfa.state_name(*node).unwrap())
            .collect_vec(),
        vec!["start", "seen_a", "done", "done"]
    );
}

#[test]
fn test_outcome_display() {
    let dfa = ab_prefix();

    let outcome = dfa.named_outcome(dfa.run(&word("a,b")));
    assert_eq!(outcome.to_string(), "accepted in state done");

    let outcome = dfa.named_outcome(dfa.run(&word("b")));
    assert_eq!(
        outcome.to_string(),
        "rejected, no transition from state start on symbol \"b\" at position 0"
    );

    let outcome = dfa.named_outcome(dfa.run(&word("a,z")));
    assert_eq!(
        outcome.to_string(),
        "invalid word, unknown symbol \"z\" at position 1"
    );
}

#[test]
fn test_serializable_status() {
    let dfa = ab_prefix();

    let status = SerializableRunStatus::from(&dfa.run(&word("a,b")));
    assert_eq!(status, SerializableRunStatus::Accepted);
    assert_eq!(serde_json::to_string(&status).unwrap(), "\"Accepted\"");

    let status = SerializableRunStatus::from(&dfa.run(&word("a")));
    assert_eq!(status, SerializableRunStatus::Rejected);

    let status = SerializableRunStatus::from(&dfa.run(&word("q")));
    assert_eq!(status, SerializableRunStatus::InvalidWord);
}

#[test]
fn test_runner_random_words_terminate() {
    let mut random = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let state_count = random.random_range(1..6);
        let symbol_count = random.random_range(1..4);
        let dfa = random_dfa(&mut random, state_count, symbol_count);

        for _ in 0..20 {
            let input = random_word(&mut random, symbol_count, 8);
            let mut runner = Runner::new(&dfa, &input);

            let mut calls = 0;
            while !runner.is_halted() {
                runner.step();
                calls += 1;
            }

            assert!(calls <= input.len() + 1);
            let outcome = runner.outcome().unwrap();
            assert_eq!(
                outcome.is_accepted(),
                dfa.accepts(&input),
                "{:?} on {}",
                dfa,
                input
            );
        }
    }
}

#[test]
fn test_dead_transition_is_final() {
    let mut random = StdRng::seed_from_u64(42);

    for _ in 0..50 {
        let dfa = random_dfa(&mut random, 4, 2);

        for _ in 0..20 {
            let input = random_word(&mut random, 2, 6);
            if !dfa.run(&input).is_dead_transition() {
                continue;
            }

            for _ in 0..5 {
                let mut extended = input.clone();
                for symbol in random_word(&mut random, 2, 4).iter() {
                    extended.push(symbol.clone());
                }

                assert!(dfa.run(&extended).is_dead_transition());
                assert!(!dfa.accepts(&extended));
            }
        }
    }
}

#[test]
fn test_empty_word_accepted_iff_initial_final() {
    let mut random = StdRng::seed_from_u64(3);

    for _ in 0..50 {
        let dfa = random_dfa(&mut random, 3, 2);
        let initial = dfa.get_initial();

        assert_eq!(dfa.accepts(&Word::empty()), dfa.is_accepting(initial));
    }
}

#[test]
fn test_shortest_accepted_word_is_accepted() {
    let mut random = StdRng::seed_from_u64(11);

    for _ in 0..50 {
        let dfa = random_dfa(&mut random, 5, 3);

        match dfa.shortest_accepted_word() {
            Some(word) => assert!(dfa.accepts(&word)),
            None => assert!(dfa.is_language_empty()),
        }
    }
}

#[test]
fn test_transitions_match_candidate() {
    let mut random = StdRng::seed_from_u64(5);

    for _ in 0..50 {
        let state_count = random.random_range(1..8);
        let symbol_count = random.random_range(1..5);
        let candidate = random_candidate(&mut random, state_count, symbol_count);
        let dfa = DFA::new(candidate.clone()).unwrap();

        for (state, row) in &candidate.delta {
            for (symbol, target) in row {
                assert_eq!(
                    dfa.next_state(state, symbol),
                    Ok(target.as_deref()),
                    "{} on {}",
                    state,
                    symbol
                );
            }
        }
    }
}
