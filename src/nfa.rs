//! The nondeterministic finite automaton model and its editing operations.
//!
//! Transitions form a relation: one `(state, label)` pair may lead to several targets,
//! and labels may be epsilon. Every mutation validates its operands first and only then
//! touches the model, so a returned error means nothing changed.

use crate::analyzer::{analyze_finite, FiniteKind};
use crate::definition::{FiniteDefinition, Transition};
use crate::finite::Skeleton;
use crate::types::{AutomatonError, Label, State, Symbol, Verdict};
use crate::{alphabet::Alphabet, alphabet::StateSet, dfa::Dfa};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An outgoing transition stored under its source state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub label: Label,
    pub target: State,
}

/// A nondeterministic finite automaton with epsilon transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FiniteDefinition", into = "FiniteDefinition")]
pub struct Nfa {
    skeleton: Skeleton,
    rules: HashMap<State, Vec<Edge>>,
}

impl Default for Nfa {
    fn default() -> Self {
        Self::new()
    }
}

impl Nfa {
    /// Creates an NFA with the single start state `q0` and an empty alphabet.
    pub fn new() -> Self {
        Self {
            skeleton: Skeleton::initial(),
            rules: HashMap::new(),
        }
    }

    /// Creates an NFA with no states at all.
    pub fn empty() -> Self {
        Self {
            skeleton: Skeleton::default(),
            rules: HashMap::new(),
        }
    }

    pub fn states(&self) -> &StateSet {
        &self.skeleton.states
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.skeleton.alphabet
    }

    pub fn start(&self) -> Option<&str> {
        self.skeleton.start.as_deref()
    }

    pub fn accept_states(&self) -> &StateSet {
        &self.skeleton.accept
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.skeleton.accept.contains(state)
    }

    pub fn add_state(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.skeleton.add_state(name)
    }

    /// Removes a state together with every transition that mentions it.
    ///
    /// Removing the start state leaves the automaton without one; simulation reports
    /// [`AutomatonError::NoStartState`] until [`Nfa::set_start`] is called.
    pub fn remove_state(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.skeleton.remove_state(name)?;
        self.rules.remove(name);
        for edges in self.rules.values_mut() {
            edges.retain(|edge| edge.target != name);
        }
        Ok(())
    }

    /// Replaces the alphabet. Transitions on symbols that are no longer present are pruned.
    pub fn set_alphabet<I, S>(&mut self, symbols: I) -> Result<(), AutomatonError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed = self.skeleton.replace_alphabet(symbols)?;
        self.prune_symbols(&removed);
        Ok(())
    }

    pub fn add_symbol(&mut self, symbol: &str) -> Result<(), AutomatonError> {
        self.skeleton.add_symbol(symbol)
    }

    pub fn remove_symbol(&mut self, symbol: Symbol) -> Result<(), AutomatonError> {
        self.skeleton.remove_symbol(symbol)?;
        self.prune_symbols(&[symbol]);
        Ok(())
    }

    fn prune_symbols(&mut self, removed: &[Symbol]) {
        if removed.is_empty() {
            return;
        }
        for edges in self.rules.values_mut() {
            edges.retain(|edge| edge.label.symbol().is_none_or(|s| !removed.contains(&s)));
        }
    }

    /// Adds `from --label--> to`. Returns `false` if the transition already existed.
    pub fn add_transition(
        &mut self,
        from: &str,
        label: impl Into<Label>,
        to: &str,
    ) -> Result<bool, AutomatonError> {
        let label = label.into();
        self.skeleton.require_state(from)?;
        self.skeleton.require_state(to)?;
        if let Label::Symbol(symbol) = label {
            self.skeleton.require_symbol(symbol)?;
        }

        let edges = self.rules.entry(from.to_string()).or_default();
        let edge = Edge {
            label,
            target: to.to_string(),
        };
        if edges.contains(&edge) {
            return Ok(false);
        }
        edges.push(edge);
        Ok(true)
    }

    pub fn remove_transition(
        &mut self,
        from: &str,
        label: impl Into<Label>,
        to: &str,
    ) -> Result<(), AutomatonError> {
        let label = label.into();
        let missing = || AutomatonError::UnknownTransition(format!("{from} --{label}--> {to}"));

        let edges = self.rules.get_mut(from).ok_or_else(missing)?;
        let index = edges
            .iter()
            .position(|edge| edge.label == label && edge.target == to)
            .ok_or_else(missing)?;
        edges.remove(index);
        Ok(())
    }

    /// Flips the accepting flag of `name`, returning the new flag.
    pub fn toggle_accept(&mut self, name: &str) -> Result<bool, AutomatonError> {
        self.skeleton.toggle_accept(name)
    }

    pub fn set_start(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.skeleton.set_start(name)
    }

    /// Returns the outgoing transitions of `state` in insertion order.
    pub fn edges(&self, state: &str) -> &[Edge] {
        self.rules.get(state).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the targets of `state` on `label`.
    pub fn successors<'a>(&'a self, state: &str, label: Label) -> impl Iterator<Item = &'a State> {
        self.edges(state)
            .iter()
            .filter(move |edge| edge.label == label)
            .map(|edge| &edge.target)
    }

    /// Returns every transition, grouped by source state in state order.
    pub fn transitions(&self) -> Vec<Transition> {
        self.skeleton
            .states
            .iter()
            .flat_map(|from| {
                self.edges(from)
                    .iter()
                    .map(move |edge| Transition::new(from.clone(), edge.label, edge.target.clone()))
            })
            .collect()
    }

    pub(crate) fn start_or_err(&self) -> Result<&str, AutomatonError> {
        self.skeleton.start_or_err()
    }

    pub(crate) fn check_input(&self, input: &str) -> Result<Vec<Symbol>, AutomatonError> {
        self.skeleton.check_input(input)
    }

    /// Runs the automaton on `input`. See [`crate::simulator::run`].
    pub fn run(&self, input: &str) -> Result<Verdict, AutomatonError> {
        crate::simulator::run(self, input)
    }

    /// Builds the equivalent DFA. See [`crate::subset::to_dfa`].
    pub fn to_dfa(&self) -> Result<Dfa, AutomatonError> {
        crate::subset::to_dfa(self)
    }
}

impl From<Nfa> for FiniteDefinition {
    fn from(nfa: Nfa) -> Self {
        FiniteDefinition {
            transitions: nfa.transitions(),
            states: nfa.skeleton.states.iter().cloned().collect(),
            alphabet: nfa.skeleton.alphabet.iter().map(char::to_string).collect(),
            start: nfa.skeleton.start,
            accept: nfa.skeleton.accept.into_iter().collect(),
        }
    }
}

impl TryFrom<FiniteDefinition> for Nfa {
    type Error = AutomatonError;

    fn try_from(definition: FiniteDefinition) -> Result<Self, Self::Error> {
        analyze_finite(&definition, FiniteKind::Nfa)?;

        let mut nfa = Nfa::empty();
        for state in &definition.states {
            nfa.add_state(state)?;
        }
        nfa.set_alphabet(&definition.alphabet)?;
        for transition in &definition.transitions {
            nfa.add_transition(&transition.from, transition.label, &transition.to)?;
        }
        if let Some(start) = &definition.start {
            nfa.set_start(start)?;
        }
        for state in &definition.accept {
            nfa.toggle_accept(state)?;
        }
        Ok(nfa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::INITIAL_STATE;

    fn sample_nfa() -> Nfa {
        let mut nfa = Nfa::new();
        nfa.set_alphabet(["a", "b"]).unwrap();
        nfa.add_state("q1").unwrap();
        nfa.add_state("q2").unwrap();
        nfa.add_transition("q0", 'a', "q1").unwrap();
        nfa.add_transition("q0", 'a', "q0").unwrap();
        nfa.add_transition("q1", Label::Epsilon, "q2").unwrap();
        nfa.add_transition("q2", 'b', "q0").unwrap();
        nfa.toggle_accept("q2").unwrap();
        nfa
    }

    #[test]
    fn test_new_nfa_has_single_start_state() {
        let nfa = Nfa::new();
        assert_eq!(nfa.start(), Some(INITIAL_STATE));
        assert_eq!(nfa.states().len(), 1);
        assert!(nfa.alphabet().is_empty());
        assert!(nfa.transitions().is_empty());
    }

    #[test]
    fn test_add_duplicate_state() {
        let mut nfa = Nfa::new();
        assert_eq!(
            nfa.add_state("q0"),
            Err(AutomatonError::DuplicateState("q0".to_string()))
        );
    }

    #[test]
    fn test_add_transition_requires_registered_operands() {
        let mut nfa = sample_nfa();
        let before = nfa.clone();

        assert_eq!(
            nfa.add_transition("q9", 'a', "q0"),
            Err(AutomatonError::UnknownState("q9".to_string()))
        );
        assert_eq!(
            nfa.add_transition("q0", 'a', "q9"),
            Err(AutomatonError::UnknownState("q9".to_string()))
        );
        assert_eq!(
            nfa.add_transition("q0", 'z', "q1"),
            Err(AutomatonError::UnknownSymbol('z'))
        );
        assert_eq!(nfa, before);
    }

    #[test]
    fn test_add_existing_transition_is_noop() {
        let mut nfa = sample_nfa();
        assert_eq!(nfa.add_transition("q0", 'a', "q1"), Ok(false));
        assert_eq!(nfa.transitions().len(), 4);
    }

    #[test]
    fn test_successors_follow_the_relation() {
        let nfa = sample_nfa();
        let mut targets: Vec<&State> = nfa.successors("q0", Label::Symbol('a')).collect();
        targets.sort();
        assert_eq!(targets, vec!["q0", "q1"]);
        assert_eq!(nfa.successors("q1", Label::Epsilon).count(), 1);
        assert_eq!(nfa.successors("q1", Label::Symbol('a')).count(), 0);
    }

    #[test]
    fn test_remove_state_cascades() {
        let mut nfa = sample_nfa();
        nfa.remove_state("q2").unwrap();

        assert!(!nfa.states().contains("q2"));
        assert!(nfa.accept_states().is_empty());
        assert!(nfa
            .transitions()
            .iter()
            .all(|t| t.from != "q2" && t.to != "q2"));
        assert_eq!(nfa.transitions().len(), 2);
    }

    #[test]
    fn test_remove_start_state_leaves_no_start() {
        let mut nfa = sample_nfa();
        nfa.remove_state("q0").unwrap();

        assert_eq!(nfa.start(), None);
        assert_eq!(nfa.run("a"), Err(AutomatonError::NoStartState));

        nfa.set_start("q1").unwrap();
        assert_eq!(nfa.run(""), Ok(Verdict::Accept));
    }

    #[test]
    fn test_set_alphabet_prunes_transitions() {
        let mut nfa = sample_nfa();
        nfa.set_alphabet(["a"]).unwrap();

        assert!(nfa
            .transitions()
            .iter()
            .all(|t| t.label != Label::Symbol('b')));
        // Epsilon transitions survive any alphabet change.
        assert!(nfa.transitions().iter().any(|t| t.label.is_epsilon()));
    }

    #[test]
    fn test_remove_transition() {
        let mut nfa = sample_nfa();
        nfa.remove_transition("q1", Label::Epsilon, "q2").unwrap();
        assert_eq!(nfa.successors("q1", Label::Epsilon).count(), 0);

        assert!(matches!(
            nfa.remove_transition("q1", Label::Epsilon, "q2"),
            Err(AutomatonError::UnknownTransition(_))
        ));
    }

    #[test]
    fn test_toggle_accept_and_set_start_reject_unknown_states() {
        let mut nfa = sample_nfa();
        assert_eq!(nfa.toggle_accept("q2"), Ok(false));
        assert_eq!(nfa.toggle_accept("q2"), Ok(true));
        assert_eq!(
            nfa.toggle_accept("nope"),
            Err(AutomatonError::UnknownState("nope".to_string()))
        );
        assert_eq!(
            nfa.set_start("nope"),
            Err(AutomatonError::UnknownState("nope".to_string()))
        );
    }

    #[test]
    fn test_json_round_trip() {
        let nfa = sample_nfa();
        let json = serde_json::to_string(&nfa).unwrap();
        let restored: Nfa = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, nfa);
    }

    #[test]
    fn test_deserialize_rejects_dangling_transition() {
        let json = r#"{
            "states": ["q0"],
            "alphabet": ["a"],
            "transitions": [{"from": "q0", "symbol": "a", "to": "q1"}],
            "start": "q0",
            "accept": []
        }"#;

        assert!(serde_json::from_str::<Nfa>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_repeated_accept_state() {
        let json = r#"{
            "states": ["q0", "q1"],
            "alphabet": ["a"],
            "transitions": [{"from": "q0", "symbol": "a", "to": "q1"}],
            "start": "q0",
            "accept": ["q1", "q1"]
        }"#;

        let error = serde_json::from_str::<Nfa>(json).unwrap_err();
        assert!(error.to_string().contains("State 'q1' already exists"));
    }
}
