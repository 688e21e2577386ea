//! Set-of-active-states simulation of NFAs, with epsilon closures computed by worklist.
//!
//! [`NfaSimulator`] and [`DfaSimulator`] consume one symbol per call so a host can animate
//! execution; [`run`] and [`trace`] drive them over a whole input.

use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::types::{AutomatonError, Label, State, Symbol, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of states borrowed from an automaton. Ordered, so equal sets compare and hash
/// equal regardless of discovery order.
pub type ActiveSet<'a> = BTreeSet<&'a str>;

/// Something that can be fed input one symbol at a time.
pub trait Simulatable {
    /// Returns whether the machine accepts the input fed so far.
    fn is_accepting(&self) -> bool;

    /// Feeds a single symbol and returns whether the machine now accepts.
    fn feed(&mut self, symbol: Symbol) -> Result<bool, AutomatonError>;

    /// Feeds every symbol of `input` and returns whether the machine accepts afterwards.
    fn feed_str(&mut self, input: &str) -> Result<bool, AutomatonError> {
        for symbol in input.chars() {
            self.feed(symbol)?;
        }
        Ok(self.is_accepting())
    }
}

/// Returns every state reachable from `states` using only epsilon transitions,
/// `states` included.
///
/// Epsilon cycles are harmless: a state is queued only the first time it is seen.
pub fn epsilon_closure<'a, I>(nfa: &'a Nfa, states: I) -> ActiveSet<'a>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut closure = ActiveSet::new();
    let mut worklist = Vec::new();

    for state in states {
        if closure.insert(state) {
            worklist.push(state);
        }
    }

    while let Some(state) = worklist.pop() {
        for target in nfa.successors(state, Label::Epsilon) {
            if closure.insert(target.as_str()) {
                worklist.push(target.as_str());
            }
        }
    }

    closure
}

/// Returns the union of `δ(s, symbol)` over all `s` in `states`, without closing it.
pub fn move_on<'a>(nfa: &'a Nfa, states: &ActiveSet<'a>, symbol: Symbol) -> ActiveSet<'a> {
    states
        .iter()
        .flat_map(|state| nfa.successors(state, Label::Symbol(symbol)))
        .map(String::as_str)
        .collect()
}

/// Incremental NFA execution over a borrowed model.
#[derive(Debug, Clone)]
pub struct NfaSimulator<'a> {
    nfa: &'a Nfa,
    active: ActiveSet<'a>,
    consumed: usize,
}

impl<'a> NfaSimulator<'a> {
    /// Starts at the epsilon closure of the start state.
    pub fn new(nfa: &'a Nfa) -> Result<Self, AutomatonError> {
        let start = nfa.start_or_err()?;
        Ok(Self {
            nfa,
            active: epsilon_closure(nfa, [start]),
            consumed: 0,
        })
    }

    pub fn active(&self) -> &ActiveSet<'a> {
        &self.active
    }

    /// Number of symbols consumed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// No state is active, so no remaining input can lead to acceptance.
    pub fn is_stuck(&self) -> bool {
        self.active.is_empty()
    }

    pub fn verdict(&self) -> Verdict {
        self.is_accepting().into()
    }

    pub fn reset(&mut self) {
        if let Some(start) = self.nfa.start() {
            self.active = epsilon_closure(self.nfa, [start]);
        }
        self.consumed = 0;
    }

    fn advance(&mut self, symbol: Symbol) {
        let moved = move_on(self.nfa, &self.active, symbol);
        self.active = epsilon_closure(self.nfa, moved);
        self.consumed += 1;
    }
}

impl Simulatable for NfaSimulator<'_> {
    fn is_accepting(&self) -> bool {
        self.active.iter().any(|state| self.nfa.is_accepting(state))
    }

    fn feed(&mut self, symbol: Symbol) -> Result<bool, AutomatonError> {
        if !self.nfa.alphabet().contains(&symbol) {
            return Err(AutomatonError::InvalidSymbol(symbol.to_string()));
        }
        self.advance(symbol);
        Ok(self.is_accepting())
    }
}

/// Incremental DFA execution over a borrowed model.
#[derive(Debug, Clone)]
pub struct DfaSimulator<'a> {
    dfa: &'a Dfa,
    /// `None` once a transition was missing.
    current: Option<&'a str>,
}

impl<'a> DfaSimulator<'a> {
    pub fn new(dfa: &'a Dfa) -> Result<Self, AutomatonError> {
        let start = dfa.start().ok_or(AutomatonError::NoStartState)?;
        Ok(Self {
            dfa,
            current: Some(start),
        })
    }

    pub fn current(&self) -> Option<&'a str> {
        self.current
    }
}

impl Simulatable for DfaSimulator<'_> {
    fn is_accepting(&self) -> bool {
        self.current.is_some_and(|state| self.dfa.is_accepting(state))
    }

    fn feed(&mut self, symbol: Symbol) -> Result<bool, AutomatonError> {
        if !self.dfa.alphabet().contains(&symbol) {
            return Err(AutomatonError::InvalidSymbol(symbol.to_string()));
        }
        let dfa = self.dfa;
        self.current = self
            .current
            .and_then(|state| dfa.target(state, symbol))
            .map(String::as_str);
        Ok(self.is_accepting())
    }
}

/// The active sets an NFA went through on one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfaTrace {
    /// The initial closure followed by the set after each consumed symbol. Ends early
    /// with an empty set when the automaton got stuck.
    pub steps: Vec<BTreeSet<State>>,
    pub verdict: Verdict,
}

/// Runs `nfa` on `input`.
///
/// The whole input is checked against the alphabet first, so an invalid symbol is
/// reported even when simulation would have stopped before reaching it.
pub fn run(nfa: &Nfa, input: &str) -> Result<Verdict, AutomatonError> {
    trace(nfa, input).map(|trace| trace.verdict)
}

/// Runs `nfa` on `input`, recording the active set after every symbol.
pub fn trace(nfa: &Nfa, input: &str) -> Result<NfaTrace, AutomatonError> {
    let symbols = nfa.check_input(input)?;
    let mut simulator = NfaSimulator::new(nfa)?;
    let mut steps = vec![owned(simulator.active())];

    for symbol in symbols {
        simulator.advance(symbol);
        steps.push(owned(simulator.active()));
        if simulator.is_stuck() {
            tracing::trace!(consumed = simulator.consumed(), "NFA has no active states");
            return Ok(NfaTrace {
                steps,
                verdict: Verdict::Reject,
            });
        }
    }

    let verdict = simulator.verdict();
    tracing::debug!(input, %verdict, "NFA run finished");
    Ok(NfaTrace { steps, verdict })
}

fn owned(states: &ActiveSet<'_>) -> BTreeSet<State> {
    states.iter().map(|state| state.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Over {0,1}, accepts strings ending in 1: q0 loops on everything and guesses the
    /// last symbol through an epsilon hop to q1.
    fn ends_in_one() -> Nfa {
        let mut nfa = Nfa::new();
        nfa.set_alphabet(["0", "1"]).unwrap();
        nfa.add_state("q1").unwrap();
        nfa.add_state("q2").unwrap();
        nfa.add_transition("q0", '0', "q0").unwrap();
        nfa.add_transition("q0", '1', "q0").unwrap();
        nfa.add_transition("q0", Label::Epsilon, "q1").unwrap();
        nfa.add_transition("q1", '1', "q2").unwrap();
        nfa.toggle_accept("q2").unwrap();
        nfa
    }

    fn set<'a>(states: &[&'a str]) -> ActiveSet<'a> {
        states.iter().copied().collect()
    }

    #[test]
    fn test_epsilon_closure_of_start() {
        let nfa = ends_in_one();
        assert_eq!(epsilon_closure(&nfa, ["q0"]), set(&["q0", "q1"]));
        assert_eq!(epsilon_closure(&nfa, ["q2"]), set(&["q2"]));
    }

    #[test]
    fn test_epsilon_closure_survives_cycles() {
        let mut nfa = Nfa::new();
        nfa.add_state("q1").unwrap();
        nfa.add_state("q2").unwrap();
        nfa.add_transition("q0", Label::Epsilon, "q1").unwrap();
        nfa.add_transition("q1", Label::Epsilon, "q2").unwrap();
        nfa.add_transition("q2", Label::Epsilon, "q0").unwrap();

        assert_eq!(epsilon_closure(&nfa, ["q1"]), set(&["q0", "q1", "q2"]));
    }

    #[test]
    fn test_epsilon_closure_is_idempotent() {
        let nfa = ends_in_one();
        let once = epsilon_closure(&nfa, ["q0"]);
        let twice = epsilon_closure(&nfa, once.iter().copied());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_run_ends_in_one() {
        let nfa = ends_in_one();
        assert_eq!(run(&nfa, "101"), Ok(Verdict::Accept));
        assert_eq!(run(&nfa, "100"), Ok(Verdict::Reject));
        assert_eq!(run(&nfa, ""), Ok(Verdict::Reject));
        assert_eq!(run(&nfa, "1"), Ok(Verdict::Accept));
    }

    #[test]
    fn test_invalid_symbol_is_reported() {
        let nfa = ends_in_one();
        assert_eq!(
            run(&nfa, "10x1"),
            Err(AutomatonError::InvalidSymbol("x".to_string()))
        );
    }

    #[test]
    fn test_stuck_simulation_short_circuits() {
        let mut nfa = Nfa::new();
        nfa.set_alphabet(["a", "b"]).unwrap();
        nfa.add_state("q1").unwrap();
        nfa.add_transition("q0", 'a', "q1").unwrap();
        nfa.toggle_accept("q1").unwrap();

        let trace = trace(&nfa, "bab").unwrap();
        assert_eq!(trace.verdict, Verdict::Reject);
        assert_eq!(trace.steps.len(), 2);
        assert!(trace.steps[1].is_empty());
    }

    #[test]
    fn test_trace_records_active_sets() {
        let nfa = ends_in_one();
        let trace = trace(&nfa, "01").unwrap();

        let expected: Vec<BTreeSet<State>> = vec![
            ["q0", "q1"].iter().map(|s| s.to_string()).collect(),
            ["q0", "q1"].iter().map(|s| s.to_string()).collect(),
            ["q0", "q1", "q2"].iter().map(|s| s.to_string()).collect(),
        ];
        assert_eq!(trace.steps, expected);
        assert_eq!(trace.verdict, Verdict::Accept);
    }

    #[test]
    fn test_incremental_feed_matches_run() {
        let nfa = ends_in_one();
        let mut simulator = NfaSimulator::new(&nfa).unwrap();

        assert_eq!(simulator.feed('1'), Ok(true));
        assert_eq!(simulator.feed('0'), Ok(false));
        assert_eq!(simulator.feed_str("01"), Ok(true));
        assert_eq!(simulator.consumed(), 4);

        simulator.reset();
        assert_eq!(simulator.consumed(), 0);
        assert_eq!(simulator.active(), &set(&["q0", "q1"]));
    }

    #[test]
    fn test_dfa_simulator_dies_on_missing_transition() {
        let mut dfa = Dfa::new();
        dfa.set_alphabet(["a", "b"]).unwrap();
        dfa.add_transition("q0", 'a', "q0").unwrap();
        dfa.toggle_accept("q0").unwrap();

        let mut simulator = DfaSimulator::new(&dfa).unwrap();
        assert_eq!(simulator.feed('a'), Ok(true));
        assert_eq!(simulator.feed('b'), Ok(false));
        assert_eq!(simulator.current(), None);
        assert_eq!(simulator.feed('a'), Ok(false));
    }
}
