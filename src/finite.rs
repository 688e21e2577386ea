//! The parts shared by NFAs and DFAs: registered states and symbols, the start state and
//! the accept set. Transition storage lives in the concrete models.

use crate::alphabet::{check_state_name, parse_alphabet, Alphabet, StateSet};
use crate::types::{AutomatonError, State, Symbol, INITIAL_STATE};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Skeleton {
    pub(crate) states: StateSet,
    pub(crate) alphabet: Alphabet,
    pub(crate) start: Option<State>,
    pub(crate) accept: StateSet,
}

impl Skeleton {
    /// A single start state and an empty alphabet.
    pub(crate) fn initial() -> Self {
        let mut states = StateSet::new();
        states.insert(INITIAL_STATE.to_string());

        Self {
            states,
            start: Some(INITIAL_STATE.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn require_state(&self, name: &str) -> Result<(), AutomatonError> {
        if self.states.contains(name) {
            Ok(())
        } else {
            Err(AutomatonError::UnknownState(name.to_string()))
        }
    }

    pub(crate) fn require_symbol(&self, symbol: Symbol) -> Result<(), AutomatonError> {
        if self.alphabet.contains(&symbol) {
            Ok(())
        } else {
            Err(AutomatonError::UnknownSymbol(symbol))
        }
    }

    pub(crate) fn add_state(&mut self, name: &str) -> Result<(), AutomatonError> {
        check_state_name(name)?;
        if !self.states.insert(name.to_string()) {
            return Err(AutomatonError::DuplicateState(name.to_string()));
        }
        Ok(())
    }

    /// Drops `name` from the state set, the accept set and the start slot.
    pub(crate) fn remove_state(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.require_state(name)?;
        self.states.remove(name);
        self.accept.remove(name);
        if self.start.as_deref() == Some(name) {
            self.start = None;
        }
        Ok(())
    }

    pub(crate) fn set_start(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.require_state(name)?;
        self.start = Some(name.to_string());
        Ok(())
    }

    /// Returns whether `name` is accepting after the toggle.
    pub(crate) fn toggle_accept(&mut self, name: &str) -> Result<bool, AutomatonError> {
        self.require_state(name)?;
        if self.accept.remove(name) {
            Ok(false)
        } else {
            self.accept.insert(name.to_string());
            Ok(true)
        }
    }

    /// Validates `symbols` and swaps them in, returning the symbols that were dropped.
    pub(crate) fn replace_alphabet<I, S>(&mut self, symbols: I) -> Result<Vec<Symbol>, AutomatonError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alphabet = parse_alphabet(symbols)?;
        let removed = self
            .alphabet
            .iter()
            .filter(|symbol| !alphabet.contains(*symbol))
            .copied()
            .collect();
        self.alphabet = alphabet;
        Ok(removed)
    }

    pub(crate) fn add_symbol(&mut self, text: &str) -> Result<(), AutomatonError> {
        let symbol = crate::alphabet::parse_symbol(text)?;
        if !self.alphabet.insert(symbol) {
            return Err(AutomatonError::DuplicateSymbol(symbol));
        }
        Ok(())
    }

    pub(crate) fn remove_symbol(&mut self, symbol: Symbol) -> Result<(), AutomatonError> {
        self.require_symbol(symbol)?;
        self.alphabet.remove(&symbol);
        Ok(())
    }

    /// Splits `input` into symbols, failing on the first one outside the alphabet.
    pub(crate) fn check_input(&self, input: &str) -> Result<Vec<Symbol>, AutomatonError> {
        input
            .chars()
            .map(|symbol| {
                if self.alphabet.contains(&symbol) {
                    Ok(symbol)
                } else {
                    Err(AutomatonError::InvalidSymbol(symbol.to_string()))
                }
            })
            .collect()
    }

    pub(crate) fn start_or_err(&self) -> Result<&str, AutomatonError> {
        self.start.as_deref().ok_or(AutomatonError::NoStartState)
    }
}
