//! The single-tape Turing Machine model and its editing operations.
//!
//! The tape alphabet always contains the input alphabet and the blank, the blank is never an
//! input symbol, and no state is both accepting and rejecting. Mutations that would break
//! one of these fail before changing anything.

use crate::alphabet::{parse_alphabet, parse_symbol, Alphabet, StateSet};
use crate::analyzer::analyze_tm;
use crate::definition::{Rule, TmDefinition};
use crate::finite::Skeleton;
use crate::machine::Outcome;
use crate::types::{AutomatonError, Direction, RunConfig, State, Symbol, DEFAULT_BLANK_SYMBOL};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the machine does after reading `read` in some state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub read: Symbol,
    pub write: Symbol,
    pub direction: Direction,
    pub next_state: State,
}

/// A deterministic single-tape Turing Machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TmDefinition", into = "TmDefinition")]
pub struct TuringMachine {
    /// States, input alphabet, start and accept set.
    skeleton: Skeleton,
    tape_alphabet: Alphabet,
    blank: Symbol,
    reject: StateSet,
    rules: HashMap<State, Vec<Action>>,
}

impl Default for TuringMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TuringMachine {
    /// Creates a machine with the start state `q0`, no input symbols and `_` as blank.
    pub fn new() -> Self {
        Self::with_blank(DEFAULT_BLANK_SYMBOL)
    }

    pub fn with_blank(blank: Symbol) -> Self {
        Self {
            skeleton: Skeleton::initial(),
            tape_alphabet: [blank].into_iter().collect(),
            blank,
            reject: StateSet::new(),
            rules: HashMap::new(),
        }
    }

    fn empty(blank: Symbol) -> Self {
        Self {
            skeleton: Skeleton::default(),
            ..Self::with_blank(blank)
        }
    }

    pub fn states(&self) -> &StateSet {
        &self.skeleton.states
    }

    pub fn input_alphabet(&self) -> &Alphabet {
        &self.skeleton.alphabet
    }

    pub fn tape_alphabet(&self) -> &Alphabet {
        &self.tape_alphabet
    }

    pub fn blank(&self) -> Symbol {
        self.blank
    }

    pub fn start(&self) -> Option<&str> {
        self.skeleton.start.as_deref()
    }

    pub fn accept_states(&self) -> &StateSet {
        &self.skeleton.accept
    }

    pub fn reject_states(&self) -> &StateSet {
        &self.reject
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.skeleton.accept.contains(state)
    }

    pub fn is_rejecting(&self, state: &str) -> bool {
        self.reject.contains(state)
    }

    pub fn add_state(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.skeleton.add_state(name)
    }

    /// Removes a state together with every rule that reads in it or moves to it.
    pub fn remove_state(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.skeleton.remove_state(name)?;
        self.reject.remove(name);
        self.rules.remove(name);
        for actions in self.rules.values_mut() {
            actions.retain(|action| action.next_state != name);
        }
        Ok(())
    }

    /// Replaces the input alphabet. New symbols join the tape alphabet; symbols dropped from
    /// the input stay on the tape alphabet, so no rule is lost.
    pub fn set_input_alphabet<I, S>(&mut self, symbols: I) -> Result<(), AutomatonError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alphabet = parse_alphabet(symbols)?;
        if alphabet.contains(&self.blank) {
            return Err(AutomatonError::BlankInInputAlphabet(self.blank));
        }
        for &symbol in &alphabet {
            self.tape_alphabet.insert(symbol);
        }
        self.skeleton.alphabet = alphabet;
        Ok(())
    }

    /// Replaces the tape alphabet, which must keep the input alphabet and the blank.
    /// Rules that read or write a removed symbol are pruned.
    pub fn set_tape_alphabet<I, S>(&mut self, symbols: I) -> Result<(), AutomatonError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alphabet = parse_alphabet(symbols)?;
        let missing: Vec<Symbol> = self
            .skeleton
            .alphabet
            .iter()
            .chain([&self.blank])
            .filter(|symbol| !alphabet.contains(*symbol))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(AutomatonError::ValidationError(format!(
                "Tape alphabet must contain the input alphabet and the blank, missing {missing:?}"
            )));
        }

        for actions in self.rules.values_mut() {
            actions.retain(|action| {
                alphabet.contains(&action.read) && alphabet.contains(&action.write)
            });
        }
        self.tape_alphabet = alphabet;
        Ok(())
    }

    /// Adds a symbol to the tape alphabet only.
    pub fn add_tape_symbol(&mut self, symbol: &str) -> Result<(), AutomatonError> {
        let symbol = parse_symbol(symbol)?;
        if !self.tape_alphabet.insert(symbol) {
            return Err(AutomatonError::DuplicateSymbol(symbol));
        }
        Ok(())
    }

    /// Sets the rule for `(from, read)`, returning the action it replaced, if any.
    pub fn add_transition(
        &mut self,
        from: &str,
        read: Symbol,
        to: &str,
        write: Symbol,
        direction: Direction,
    ) -> Result<Option<Action>, AutomatonError> {
        self.skeleton.require_state(from)?;
        self.skeleton.require_state(to)?;
        self.require_tape_symbol(read)?;
        self.require_tape_symbol(write)?;

        let action = Action {
            read,
            write,
            direction,
            next_state: to.to_string(),
        };
        let actions = self.rules.entry(from.to_string()).or_default();
        match actions.iter_mut().find(|a| a.read == read) {
            Some(existing) => Ok(Some(std::mem::replace(existing, action))),
            None => {
                actions.push(action);
                Ok(None)
            }
        }
    }

    /// Removes the rule for `(from, read)` and returns it.
    pub fn remove_transition(&mut self, from: &str, read: Symbol) -> Result<Action, AutomatonError> {
        let missing = || AutomatonError::UnknownTransition(format!("({from}, '{read}')"));
        let actions = self.rules.get_mut(from).ok_or_else(missing)?;
        let index = actions
            .iter()
            .position(|a| a.read == read)
            .ok_or_else(missing)?;
        Ok(actions.remove(index))
    }

    pub fn set_start(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.skeleton.set_start(name)
    }

    /// Flips the accepting flag of `name`, returning the new flag.
    pub fn toggle_accept(&mut self, name: &str) -> Result<bool, AutomatonError> {
        self.skeleton.require_state(name)?;
        if self.reject.contains(name) {
            return Err(AutomatonError::ConflictingHaltState(name.to_string()));
        }
        self.skeleton.toggle_accept(name)
    }

    /// Flips the rejecting flag of `name`, returning the new flag.
    pub fn toggle_reject(&mut self, name: &str) -> Result<bool, AutomatonError> {
        self.skeleton.require_state(name)?;
        if self.skeleton.accept.contains(name) {
            return Err(AutomatonError::ConflictingHaltState(name.to_string()));
        }
        if self.reject.remove(name) {
            Ok(false)
        } else {
            self.reject.insert(name.to_string());
            Ok(true)
        }
    }

    fn require_tape_symbol(&self, symbol: Symbol) -> Result<(), AutomatonError> {
        if self.tape_alphabet.contains(&symbol) {
            Ok(())
        } else {
            Err(AutomatonError::UnknownSymbol(symbol))
        }
    }

    /// Finds the rule for reading `symbol` in `state`.
    pub fn rule(&self, state: &str, symbol: Symbol) -> Option<&Action> {
        self.rules.get(state)?.iter().find(|a| a.read == symbol)
    }

    /// Returns the rules of `state` in insertion order.
    pub fn actions(&self, state: &str) -> &[Action] {
        self.rules.get(state).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns every rule, grouped by state in state order.
    pub fn rules(&self) -> Vec<Rule> {
        self.skeleton
            .states
            .iter()
            .flat_map(|from| {
                self.actions(from).iter().map(move |action| Rule {
                    from: from.clone(),
                    read: action.read,
                    to: action.next_state.clone(),
                    write: action.write,
                    direction: action.direction,
                })
            })
            .collect()
    }

    pub(crate) fn start_or_err(&self) -> Result<&str, AutomatonError> {
        self.skeleton.start_or_err()
    }

    pub(crate) fn check_input(&self, input: &str) -> Result<Vec<Symbol>, AutomatonError> {
        self.skeleton.check_input(input)
    }

    /// Runs the machine on `input` within `config.max_steps`. See [`crate::machine::run`].
    pub fn run(&self, input: &str, config: &RunConfig) -> Result<Outcome, AutomatonError> {
        crate::machine::run(self, input, config)
    }
}

impl From<TuringMachine> for TmDefinition {
    fn from(tm: TuringMachine) -> Self {
        TmDefinition {
            rules: tm.rules(),
            states: tm.skeleton.states.iter().cloned().collect(),
            input_alphabet: tm.skeleton.alphabet.iter().map(char::to_string).collect(),
            tape_alphabet: tm.tape_alphabet.iter().map(char::to_string).collect(),
            blank: tm.blank.to_string(),
            start: tm.skeleton.start,
            accept: tm.skeleton.accept.into_iter().collect(),
            reject: tm.reject.into_iter().collect(),
        }
    }
}

impl TryFrom<TmDefinition> for TuringMachine {
    type Error = AutomatonError;

    fn try_from(definition: TmDefinition) -> Result<Self, Self::Error> {
        analyze_tm(&definition)?;

        let blank = parse_symbol(&definition.blank)?;
        let mut tm = TuringMachine::empty(blank);
        for state in &definition.states {
            tm.add_state(state)?;
        }
        let mut tape_alphabet = Alphabet::new();
        for symbol in &definition.tape_alphabet {
            tape_alphabet.insert(parse_symbol(symbol)?);
        }
        tape_alphabet.insert(blank);
        tm.tape_alphabet = tape_alphabet;
        tm.set_input_alphabet(&definition.input_alphabet)?;
        for rule in &definition.rules {
            tm.add_transition(&rule.from, rule.read, &rule.to, rule.write, rule.direction)?;
        }
        if let Some(start) = &definition.start {
            tm.set_start(start)?;
        }
        for state in &definition.accept {
            tm.toggle_accept(state)?;
        }
        for state in &definition.reject {
            tm.toggle_reject(state)?;
        }
        Ok(tm)
    }
}
