//! Plain-data records for every model. These carry no behavior and are what models
//! serialize to and deserialize from, so any host format can round-trip a model.

use crate::types::{Direction, Label, State};
use serde::{Deserialize, Serialize};

/// A single finite automaton transition `from --label--> to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub from: State,
    /// The symbol read, `null` for epsilon.
    #[serde(rename = "symbol")]
    pub label: Label,
    pub to: State,
}

impl Transition {
    pub fn new(from: impl Into<State>, label: impl Into<Label>, to: impl Into<State>) -> Self {
        Self {
            from: from.into(),
            label: label.into(),
            to: to.into(),
        }
    }
}

/// The plain-data form of an NFA or a DFA.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FiniteDefinition {
    pub states: Vec<State>,
    /// One-character strings.
    pub alphabet: Vec<String>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    #[serde(default)]
    pub start: Option<State>,
    #[serde(default)]
    pub accept: Vec<State>,
}

/// A Turing Machine rule `(from, read) -> (to, write, direction)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub from: State,
    pub read: char,
    pub to: State,
    pub write: char,
    pub direction: Direction,
}

/// The plain-data form of a Turing Machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmDefinition {
    pub states: Vec<State>,
    pub input_alphabet: Vec<String>,
    /// Symbols that may appear on the tape beyond the input alphabet and the blank.
    #[serde(default)]
    pub tape_alphabet: Vec<String>,
    pub blank: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub start: Option<State>,
    #[serde(default)]
    pub accept: Vec<State>,
    #[serde(default)]
    pub reject: Vec<State>,
}
