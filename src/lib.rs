//! This crate provides the core logic for modelling and simulating finite automata and
//! Turing Machines. It includes modules for building NFAs, DFAs and single-tape Turing
//! Machines incrementally, simulating them on inputs, converting NFAs to DFAs by subset
//! construction, analyzing definitions and loading them from JSON.

pub mod alphabet;
pub mod analyzer;
pub mod definition;
pub mod dfa;
pub mod edit;
mod finite;
pub mod loader;
pub mod machine;
pub mod nfa;
pub mod simulator;
pub mod subset;
pub mod tape;
pub mod turing;
pub mod types;

/// Re-exports the alphabet collections and symbol parsing.
pub use alphabet::{parse_alphabet, parse_symbol, Alphabet, OrderedSet, StateSet};
/// Re-exports the analysis entry points and diagnostics.
pub use analyzer::{
    analyze_finite, analyze_tm, missing_transitions, unreachable_states, AnalysisError,
    FiniteKind, StateGraph,
};
/// Re-exports the plain-data definition records.
pub use definition::{FiniteDefinition, Rule, TmDefinition, Transition};
pub use dfa::{Dfa, DfaTrace};
pub use edit::{Edit, Editable, TmEdit};
/// Re-exports the `AutomatonLoader` struct from the loader module.
pub use loader::AutomatonLoader;
pub use machine::{Configuration, Machine, Outcome};
pub use nfa::{Edge, Nfa};
pub use simulator::{
    epsilon_closure, DfaSimulator, NfaSimulator, NfaTrace, Simulatable,
};
pub use subset::to_dfa;
pub use tape::Tape;
pub use turing::{Action, TuringMachine};
/// Re-exports the shared types, constants and the error enum.
pub use types::{
    AutomatonError, Direction, Halt, Label, RunConfig, State, Step, Symbol, TmVerdict, Verdict,
    DEFAULT_BLANK_SYMBOL, DEFAULT_STEP_BUDGET, INITIAL_STATE,
};
