//! This module defines the core data types shared by every model in the engine, including
//! state and symbol aliases, transition labels, head directions, verdicts, run configuration
//! and the error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A state identifier, unique within one automaton.
pub type State = String;
/// A single input or tape symbol.
pub type Symbol = char;

/// The default blank symbol used on the Turing Machine tape.
pub const DEFAULT_BLANK_SYMBOL: char = '_';
/// The name of the single state a freshly created model starts with.
pub const INITIAL_STATE: &str = "q0";
/// The default maximum number of steps a Turing Machine may execute.
pub const DEFAULT_STEP_BUDGET: usize = 10000;

/// The label of a finite automaton transition: either a symbol or epsilon.
///
/// In plain data a label is a one-character string, or `null` for epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<char>", into = "Option<char>")]
pub enum Label {
    /// Consumes one input symbol.
    Symbol(Symbol),
    /// Consumes nothing.
    Epsilon,
}

impl Label {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// Returns the symbol of a non-epsilon label.
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Label::Symbol(symbol) => Some(*symbol),
            Label::Epsilon => None,
        }
    }
}

impl From<Option<char>> for Label {
    fn from(value: Option<char>) -> Self {
        match value {
            Some(symbol) => Label::Symbol(symbol),
            None => Label::Epsilon,
        }
    }
}

impl From<Label> for Option<char> {
    fn from(label: Label) -> Self {
        label.symbol()
    }
}

impl From<char> for Label {
    fn from(symbol: char) -> Self {
        Label::Symbol(symbol)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Symbol(symbol) => write!(f, "{symbol}"),
            Label::Epsilon => write!(f, "ε"),
        }
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    #[serde(alias = "L")]
    Left,
    /// Move the head one position to the right.
    #[serde(alias = "R")]
    Right,
    /// Keep the head in the same position.
    #[serde(alias = "S", alias = "N")]
    Stay,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = match self {
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::Stay => "S",
        };
        write!(f, "{short}")
    }
}

/// The verdict of running a finite automaton on a complete input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

impl From<bool> for Verdict {
    fn from(accepted: bool) -> Self {
        if accepted {
            Verdict::Accept
        } else {
            Verdict::Reject
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accept => write!(f, "accept"),
            Verdict::Reject => write!(f, "reject"),
        }
    }
}

/// Represents the outcome of a single Turing Machine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a transition and is still running.
    Continue,
    /// The machine is in a terminal status.
    Halt(Halt),
}

/// The terminal statuses of a Turing Machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Halt {
    /// Entered an accept state.
    Accepted,
    /// Entered a reject state or read a symbol with no rule.
    Rejected,
}

/// The verdict of a budgeted Turing Machine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TmVerdict {
    Accepted,
    Rejected,
    /// The step budget ran out before the machine halted.
    Timeout,
}

impl From<Halt> for TmVerdict {
    fn from(halt: Halt) -> Self {
        match halt {
            Halt::Accepted => TmVerdict::Accepted,
            Halt::Rejected => TmVerdict::Rejected,
        }
    }
}

impl fmt::Display for TmVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TmVerdict::Accepted => write!(f, "accepted"),
            TmVerdict::Rejected => write!(f, "rejected"),
            TmVerdict::Timeout => write!(f, "timeout"),
        }
    }
}

/// Options for a budgeted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Maximum number of transitions a Turing Machine may take.
    pub max_steps: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_STEP_BUDGET,
        }
    }
}

/// Represents the errors reported by model mutations, simulations and loading.
///
/// Every variant is recoverable by the caller. Mutations report them before touching
/// the model, so a failed call never leaves a partial change behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("State '{0}' already exists")]
    DuplicateState(State),
    #[error("Symbol '{0}' already exists")]
    DuplicateSymbol(Symbol),
    #[error("Unknown state: {0}")]
    UnknownState(State),
    #[error("Unknown symbol: '{0}'")]
    UnknownSymbol(Symbol),
    /// A symbol that is not a single character, or an input symbol outside the alphabet.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),
    #[error("Invalid state name: {0:?}")]
    InvalidState(String),
    #[error("No start state defined")]
    NoStartState,
    #[error("Epsilon transitions are not allowed in a DFA")]
    EpsilonInDfa,
    #[error("Unknown transition: {0}")]
    UnknownTransition(String),
    #[error("State {0} has more than one transition on '{1}'")]
    NondeterministicTransition(State, Symbol),
    #[error("Blank symbol '{0}' cannot be part of the input alphabet")]
    BlankInInputAlphabet(Symbol),
    #[error("State {0} cannot be both accepting and rejecting")]
    ConflictingHaltState(State),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("File error: {0}")]
    FileError(String),
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for AutomatonError {
    fn from(error: serde_json::Error) -> Self {
        AutomatonError::Json(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(left_json, "\"Left\"");

        let short: Direction = serde_json::from_str("\"R\"").unwrap();
        assert_eq!(short, Direction::Right);

        let stay: Direction = serde_json::from_str("\"N\"").unwrap();
        assert_eq!(stay, Direction::Stay);
    }

    #[test]
    fn test_label_serializes_epsilon_as_null() {
        assert_eq!(serde_json::to_string(&Label::Epsilon).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Label::Symbol('a')).unwrap(), "\"a\"");

        let label: Label = serde_json::from_str("null").unwrap();
        assert!(label.is_epsilon());
    }

    #[test]
    fn test_run_config_defaults_missing_fields() {
        let config: RunConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_steps, DEFAULT_STEP_BUDGET);
    }

    #[test]
    fn test_error_display() {
        let error = AutomatonError::UnknownState("q7".to_string());

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unknown state"));
        assert!(error_msg.contains("q7"));
    }

    #[test]
    fn test_halt_into_verdict() {
        assert_eq!(TmVerdict::from(Halt::Accepted), TmVerdict::Accepted);
        assert_eq!(TmVerdict::from(Halt::Rejected), TmVerdict::Rejected);
    }
}
