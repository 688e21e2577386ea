//! The deterministic finite automaton model.
//!
//! The transition function may be partial: a missing `(state, symbol)` entry means the
//! input is rejected. [`Dfa::complete_with_sink`] makes it total on request.

use crate::alphabet::{Alphabet, StateSet};
use crate::analyzer::{analyze_finite, FiniteKind};
use crate::definition::{FiniteDefinition, Transition};
use crate::finite::Skeleton;
use crate::types::{AutomatonError, Label, State, Symbol, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A deterministic finite automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FiniteDefinition", into = "FiniteDefinition")]
pub struct Dfa {
    skeleton: Skeleton,
    rules: HashMap<State, Vec<(Symbol, State)>>,
}

/// The path a DFA took through an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaTrace {
    /// Visited states, starting with the start state. Shorter than the input plus one
    /// when a transition was missing.
    pub path: Vec<State>,
    pub verdict: Verdict,
}

impl Default for Dfa {
    fn default() -> Self {
        Self::new()
    }
}

impl Dfa {
    /// Creates a DFA with the single start state `q0` and an empty alphabet.
    pub fn new() -> Self {
        Self {
            skeleton: Skeleton::initial(),
            rules: HashMap::new(),
        }
    }

    /// Creates a DFA with no states at all.
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
    pub fn remove_state(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.skeleton.remove_state(name)?;
        self.rules.remove(name);
        for entries in self.rules.values_mut() {
            entries.retain(|(_, target)| target != name);
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
        for entries in self.rules.values_mut() {
            entries.retain(|(symbol, _)| !removed.contains(symbol));
        }
    }

    /// Sets `δ(from, label) = to`, returning the target it replaced, if any.
    ///
    /// Epsilon labels are rejected with [`AutomatonError::EpsilonInDfa`].
    pub fn add_transition(
        &mut self,
        from: &str,
        label: impl Into<Label>,
        to: &str,
    ) -> Result<Option<State>, AutomatonError> {
        let symbol = label.into().symbol().ok_or(AutomatonError::EpsilonInDfa)?;
        self.skeleton.require_state(from)?;
        self.skeleton.require_state(to)?;
        self.skeleton.require_symbol(symbol)?;

        let entries = self.rules.entry(from.to_string()).or_default();
        match entries.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, target)) => Ok(Some(std::mem::replace(target, to.to_string()))),
            None => {
                entries.push((symbol, to.to_string()));
                Ok(None)
            }
        }
    }

    pub fn remove_transition(
        &mut self,
        from: &str,
        label: impl Into<Label>,
        to: &str,
    ) -> Result<(), AutomatonError> {
        let label = label.into();
        let missing = || AutomatonError::UnknownTransition(format!("{from} --{label}--> {to}"));
        let symbol = label.symbol().ok_or_else(missing)?;

        let entries = self.rules.get_mut(from).ok_or_else(missing)?;
        let index = entries
            .iter()
            .position(|(s, target)| *s == symbol && target == to)
            .ok_or_else(missing)?;
        entries.remove(index);
        Ok(())
    }

    /// Flips the accepting flag of `name`, returning the new flag.
    pub fn toggle_accept(&mut self, name: &str) -> Result<bool, AutomatonError> {
        self.skeleton.toggle_accept(name)
    }

    pub fn set_start(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.skeleton.set_start(name)
    }

    /// Returns `δ(state, symbol)` if defined.
    pub fn target(&self, state: &str, symbol: Symbol) -> Option<&State> {
        self.rules
            .get(state)?
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, target)| target)
    }

    /// Returns every transition, grouped by source state in state order.
    pub fn transitions(&self) -> Vec<Transition> {
        self.skeleton
            .states
            .iter()
            .flat_map(|from| {
                self.rules.get(from).into_iter().flatten().map(move |(symbol, to)| {
                    Transition::new(from.clone(), *symbol, to.clone())
                })
            })
            .collect()
    }

    /// Checks whether every state has a transition on every symbol.
    pub fn is_complete(&self) -> bool {
        self.skeleton.states.iter().all(|state| {
            self.skeleton
                .alphabet
                .iter()
                .all(|&symbol| self.target(state, symbol).is_some())
        })
    }

    /// Routes every undefined `(state, symbol)` pair to a new non-accepting state `sink`.
    ///
    /// Returns `false` without adding anything if the DFA is already complete.
    pub fn complete_with_sink(&mut self, sink: &str) -> Result<bool, AutomatonError> {
        if self.is_complete() {
            return Ok(false);
        }
        self.add_state(sink)?;

        let alphabet: Vec<Symbol> = self.skeleton.alphabet.iter().copied().collect();
        let states: Vec<State> = self.skeleton.states.iter().cloned().collect();
        for state in &states {
            for &symbol in &alphabet {
                if self.target(state, symbol).is_none() {
                    self.rules
                        .entry(state.clone())
                        .or_default()
                        .push((symbol, sink.to_string()));
                }
            }
        }
        tracing::debug!(sink, "completed DFA with sink state");
        Ok(true)
    }

    /// Runs the DFA on `input`. A missing transition rejects.
    pub fn run(&self, input: &str) -> Result<Verdict, AutomatonError> {
        self.trace(input).map(|trace| trace.verdict)
    }

    /// Runs the DFA on `input`, recording each visited state.
    pub fn trace(&self, input: &str) -> Result<DfaTrace, AutomatonError> {
        let symbols = self.skeleton.check_input(input)?;
        let mut current = self.skeleton.start_or_err()?;
        let mut path = vec![current.to_string()];

        for symbol in symbols {
            match self.target(current, symbol) {
                Some(next) => {
                    current = next.as_str();
                    path.push(next.clone());
                }
                None => {
                    tracing::trace!(state = current, %symbol, "no DFA transition");
                    return Ok(DfaTrace {
                        path,
                        verdict: Verdict::Reject,
                    });
                }
            }
        }

        Ok(DfaTrace {
            path,
            verdict: self.is_accepting(current).into(),
        })
    }
}

impl From<Dfa> for FiniteDefinition {
    fn from(dfa: Dfa) -> Self {
        FiniteDefinition {
            transitions: dfa.transitions(),
            states: dfa.skeleton.states.iter().cloned().collect(),
            alphabet: dfa.skeleton.alphabet.iter().map(char::to_string).collect(),
            start: dfa.skeleton.start,
            accept: dfa.skeleton.accept.into_iter().collect(),
        }
    }
}

impl TryFrom<FiniteDefinition> for Dfa {
    type Error = AutomatonError;

    fn try_from(definition: FiniteDefinition) -> Result<Self, Self::Error> {
        analyze_finite(&definition, FiniteKind::Dfa)?;

        let mut dfa = Dfa::empty();
        for state in &definition.states {
            dfa.add_state(state)?;
        }
        dfa.set_alphabet(&definition.alphabet)?;
        for transition in &definition.transitions {
            dfa.add_transition(&transition.from, transition.label, &transition.to)?;
        }
        if let Some(start) = &definition.start {
            dfa.set_start(start)?;
        }
        for state in &definition.accept {
            dfa.toggle_accept(state)?;
        }
        Ok(dfa)
    }
}
