//! This module provides functions for analyzing automaton definitions to detect errors and
//! inconsistencies before a model is built from them. Deserialization runs these checks, so
//! a model can never be constructed from a definition that breaks its invariants.
//!
//! It also offers diagnostics for well-formed models: states that cannot be reached from the
//! start state and, for Turing Machines, the configurations that reject implicitly.

use crate::definition::{FiniteDefinition, TmDefinition};
use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::turing::TuringMachine;
use crate::types::{AutomatonError, Label, State, Symbol};
use std::collections::{HashMap, HashSet};

/// Represents the problems that can be found in a definition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// A state is listed more than once.
    DuplicateState(State),
    /// A state name is empty or whitespace.
    BlankStateName(String),
    /// An alphabet entry or the blank is not exactly one character.
    MalformedSymbol(String),
    /// A symbol is listed more than once in the same alphabet.
    DuplicateSymbol(Symbol),
    /// A transition, the start state or a halting set names a state that is not listed.
    UndefinedState(State),
    /// A transition reads or writes a symbol outside the relevant alphabet.
    UndefinedSymbol(Symbol),
    /// A DFA definition contains an epsilon transition.
    EpsilonTransition(State),
    /// A DFA or Turing Machine definition maps one `(state, symbol)` to different moves.
    Nondeterministic(State, Symbol),
    /// The blank symbol is part of the input alphabet.
    BlankInInput(Symbol),
    /// A state is both accepting and rejecting.
    ConflictingHaltState(State),
}

impl From<AnalysisError> for AutomatonError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::DuplicateState(state) => AutomatonError::DuplicateState(state),
            AnalysisError::BlankStateName(name) => AutomatonError::InvalidState(name),
            AnalysisError::MalformedSymbol(text) => AutomatonError::InvalidSymbol(text),
            AnalysisError::DuplicateSymbol(symbol) => AutomatonError::DuplicateSymbol(symbol),
            AnalysisError::UndefinedState(state) => AutomatonError::UnknownState(state),
            AnalysisError::UndefinedSymbol(symbol) => AutomatonError::UnknownSymbol(symbol),
            AnalysisError::EpsilonTransition(_) => AutomatonError::EpsilonInDfa,
            AnalysisError::Nondeterministic(state, symbol) => {
                AutomatonError::NondeterministicTransition(state, symbol)
            }
            AnalysisError::BlankInInput(symbol) => AutomatonError::BlankInInputAlphabet(symbol),
            AnalysisError::ConflictingHaltState(state) => {
                AutomatonError::ConflictingHaltState(state)
            }
        }
    }
}

/// Which finite automaton a [`FiniteDefinition`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FiniteKind {
    Nfa,
    Dfa,
}

type FiniteCheck = fn(&FiniteDefinition, FiniteKind) -> Result<(), AnalysisError>;
type TmCheck = fn(&TmDefinition) -> Result<(), AnalysisError>;

/// Runs every check on a finite automaton definition and collects the failures.
pub fn check_finite(definition: &FiniteDefinition, kind: FiniteKind) -> Vec<AnalysisError> {
    let checks: [FiniteCheck; 4] = [
        check_finite_states,
        check_finite_alphabet,
        check_finite_references,
        check_determinism,
    ];
    checks
        .iter()
        .filter_map(|check| check(definition, kind).err())
        .collect()
}

/// Analyzes a finite automaton definition.
///
/// # Arguments
///
/// * `definition` - The definition to be analyzed.
/// * `kind` - Whether the definition must describe a DFA.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(AutomatonError)` describing the first problem found otherwise.
pub fn analyze_finite(
    definition: &FiniteDefinition,
    kind: FiniteKind,
) -> Result<(), AutomatonError> {
    match check_finite(definition, kind).into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

/// Runs every check on a Turing Machine definition and collects the failures.
pub fn check_tm(definition: &TmDefinition) -> Vec<AnalysisError> {
    let checks: [TmCheck; 5] = [
        check_tm_states,
        check_tm_alphabets,
        check_tm_references,
        check_tm_determinism,
        check_halting_sets,
    ];
    checks
        .iter()
        .filter_map(|check| check(definition).err())
        .collect()
}

/// Analyzes a Turing Machine definition.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(AutomatonError)` describing the first problem found otherwise.
pub fn analyze_tm(definition: &TmDefinition) -> Result<(), AutomatonError> {
    match check_tm(definition).into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

/// Checks that state names are non-blank and unique.
fn check_states(states: &[State]) -> Result<(), AnalysisError> {
    let mut seen = HashSet::new();
    for state in states {
        if state.trim().is_empty() {
            return Err(AnalysisError::BlankStateName(state.clone()));
        }
        if !seen.insert(state.as_str()) {
            return Err(AnalysisError::DuplicateState(state.clone()));
        }
    }
    Ok(())
}

fn check_finite_states(definition: &FiniteDefinition, _kind: FiniteKind) -> Result<(), AnalysisError> {
    check_states(&definition.states)
}

fn check_tm_states(definition: &TmDefinition) -> Result<(), AnalysisError> {
    check_states(&definition.states)
}

fn parse_symbol(text: &str) -> Result<Symbol, AnalysisError> {
    crate::alphabet::parse_symbol(text)
        .map_err(|_| AnalysisError::MalformedSymbol(text.to_string()))
}

/// Checks that every entry is one character and that none repeats.
fn check_alphabet(symbols: &[String]) -> Result<HashSet<Symbol>, AnalysisError> {
    let mut alphabet = HashSet::new();
    for text in symbols {
        let symbol = parse_symbol(text)?;
        if !alphabet.insert(symbol) {
            return Err(AnalysisError::DuplicateSymbol(symbol));
        }
    }
    Ok(alphabet)
}

/// Models rebuild halting sets by toggling, so a repeated entry would cancel itself out.
fn check_no_repeats(states: &[State]) -> Result<(), AnalysisError> {
    let mut seen = HashSet::new();
    match states.iter().find(|state| !seen.insert(state.as_str())) {
        Some(state) => Err(AnalysisError::DuplicateState(state.clone())),
        None => Ok(()),
    }
}

fn require_state(states: &HashSet<&str>, state: &str) -> Result<(), AnalysisError> {
    if states.contains(state) {
        Ok(())
    } else {
        Err(AnalysisError::UndefinedState(state.to_string()))
    }
}

fn check_finite_alphabet(
    definition: &FiniteDefinition,
    _kind: FiniteKind,
) -> Result<(), AnalysisError> {
    check_alphabet(&definition.alphabet).map(|_| ())
}

/// Checks that transitions, the start state and the accept set only name listed states
/// and that non-epsilon labels belong to the alphabet.
fn check_finite_references(
    definition: &FiniteDefinition,
    _kind: FiniteKind,
) -> Result<(), AnalysisError> {
    let states: HashSet<&str> = definition.states.iter().map(String::as_str).collect();
    // Malformed alphabets are reported by `check_alphabet`.
    let alphabet: HashSet<Symbol> = definition
        .alphabet
        .iter()
        .filter_map(|text| parse_symbol(text).ok())
        .collect();

    for transition in &definition.transitions {
        require_state(&states, &transition.from)?;
        require_state(&states, &transition.to)?;
        if let Label::Symbol(symbol) = transition.label {
            if !alphabet.contains(&symbol) {
                return Err(AnalysisError::UndefinedSymbol(symbol));
            }
        }
    }
    if let Some(start) = &definition.start {
        require_state(&states, start)?;
    }
    for state in &definition.accept {
        require_state(&states, state)?;
    }
    check_no_repeats(&definition.accept)
}

/// Checks that a DFA definition has no epsilon transitions and at most one target per
/// `(state, symbol)`. Repeating an identical transition is allowed.
fn check_determinism(definition: &FiniteDefinition, kind: FiniteKind) -> Result<(), AnalysisError> {
    if kind == FiniteKind::Nfa {
        return Ok(());
    }

    let mut targets: HashMap<(&str, Symbol), &str> = HashMap::new();
    for transition in &definition.transitions {
        let symbol = match transition.label {
            Label::Symbol(symbol) => symbol,
            Label::Epsilon => {
                return Err(AnalysisError::EpsilonTransition(transition.from.clone()))
            }
        };
        let target = *targets
            .entry((transition.from.as_str(), symbol))
            .or_insert(transition.to.as_str());
        if target != transition.to {
            return Err(AnalysisError::Nondeterministic(
                transition.from.clone(),
                symbol,
            ));
        }
    }
    Ok(())
}

/// Checks the input alphabet, the tape alphabet and the blank.
fn check_tm_alphabets(definition: &TmDefinition) -> Result<(), AnalysisError> {
    let input = check_alphabet(&definition.input_alphabet)?;
    check_alphabet(&definition.tape_alphabet)?;
    let blank = parse_symbol(&definition.blank)?;
    if input.contains(&blank) {
        return Err(AnalysisError::BlankInInput(blank));
    }
    Ok(())
}

/// Checks that rules only name listed states and symbols of the complete tape alphabet,
/// which is the listed tape symbols plus the input alphabet and the blank.
fn check_tm_references(definition: &TmDefinition) -> Result<(), AnalysisError> {
    let states: HashSet<&str> = definition.states.iter().map(String::as_str).collect();
    let tape: HashSet<Symbol> = definition
        .tape_alphabet
        .iter()
        .chain(&definition.input_alphabet)
        .chain([&definition.blank])
        .filter_map(|text| parse_symbol(text).ok())
        .collect();

    for rule in &definition.rules {
        require_state(&states, &rule.from)?;
        require_state(&states, &rule.to)?;
        for symbol in [rule.read, rule.write] {
            if !tape.contains(&symbol) {
                return Err(AnalysisError::UndefinedSymbol(symbol));
            }
        }
    }
    if let Some(start) = &definition.start {
        require_state(&states, start)?;
    }
    for state in definition.accept.iter().chain(&definition.reject) {
        require_state(&states, state)?;
    }
    check_no_repeats(&definition.accept)?;
    check_no_repeats(&definition.reject)
}

/// Checks that each `(state, read)` pair has at most one rule. Identical repeats are allowed.
fn check_tm_determinism(definition: &TmDefinition) -> Result<(), AnalysisError> {
    let mut seen = HashMap::new();
    for rule in &definition.rules {
        let previous = *seen.entry((rule.from.as_str(), rule.read)).or_insert(rule);
        if previous != rule {
            return Err(AnalysisError::Nondeterministic(rule.from.clone(), rule.read));
        }
    }
    Ok(())
}

/// Checks that the accept and reject sets are disjoint.
fn check_halting_sets(definition: &TmDefinition) -> Result<(), AnalysisError> {
    let accept: HashSet<&str> = definition.accept.iter().map(String::as_str).collect();
    match definition.reject.iter().find(|s| accept.contains(s.as_str())) {
        Some(state) => Err(AnalysisError::ConflictingHaltState(state.clone())),
        None => Ok(()),
    }
}

/// A model viewed as a directed graph over its states.
pub trait StateGraph {
    /// States in display order.
    fn nodes(&self) -> Vec<&str>;

    fn initial(&self) -> Option<&str>;

    /// States reachable in one transition from `state`, in any order.
    fn neighbors(&self, state: &str) -> Vec<&str>;
}

impl StateGraph for Nfa {
    fn nodes(&self) -> Vec<&str> {
        self.states().iter().map(String::as_str).collect()
    }

    fn initial(&self) -> Option<&str> {
        self.start()
    }

    fn neighbors(&self, state: &str) -> Vec<&str> {
        self.edges(state).iter().map(|e| e.target.as_str()).collect()
    }
}

impl StateGraph for Dfa {
    fn nodes(&self) -> Vec<&str> {
        self.states().iter().map(String::as_str).collect()
    }

    fn initial(&self) -> Option<&str> {
        self.start()
    }

    fn neighbors(&self, state: &str) -> Vec<&str> {
        self.alphabet()
            .iter()
            .filter_map(|&symbol| self.target(state, symbol))
            .map(String::as_str)
            .collect()
    }
}

impl StateGraph for TuringMachine {
    fn nodes(&self) -> Vec<&str> {
        self.states().iter().map(String::as_str).collect()
    }

    fn initial(&self) -> Option<&str> {
        self.start()
    }

    fn neighbors(&self, state: &str) -> Vec<&str> {
        self.actions(state)
            .iter()
            .map(|a| a.next_state.as_str())
            .collect()
    }
}

/// Returns the states no transition path leads to from the start state, in display order.
///
/// Without a start state every state is unreachable.
pub fn unreachable_states<G: StateGraph>(model: &G) -> Vec<State> {
    let mut visited = HashSet::new();
    let mut stack: Vec<&str> = model.initial().into_iter().collect();

    while let Some(state) = stack.pop() {
        if !visited.insert(state) {
            continue;
        }
        stack.extend(
            model
                .neighbors(state)
                .into_iter()
                .filter(|next| !visited.contains(next)),
        );
    }

    model
        .nodes()
        .into_iter()
        .filter(|state| !visited.contains(state))
        .map(str::to_string)
        .collect()
}

/// Returns the `(state, symbol)` pairs of non-halting states that have no rule.
///
/// Reading such a symbol in such a state rejects the input.
pub fn missing_transitions(tm: &TuringMachine) -> Vec<(State, Symbol)> {
    tm.states()
        .iter()
        .filter(|state| !tm.is_accepting(state) && !tm.is_rejecting(state))
        .flat_map(|state| {
            tm.tape_alphabet()
                .iter()
                .filter(move |&&symbol| tm.rule(state, symbol).is_none())
                .map(move |&symbol| (state.clone(), symbol))
        })
        .collect()
}
