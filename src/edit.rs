//! Edit commands for the editor layer.
//!
//! An editor describes a change as an [`Edit`] (or [`TmEdit`]) value and applies it to the
//! current model. [`Editable::apply`] returns a new model and leaves the original untouched,
//! so the caller keeps one explicit "current model" variable and replaces it on success.

use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::turing::TuringMachine;
use crate::types::{AutomatonError, Direction, Label, State, Symbol};
use serde::{Deserialize, Serialize};

/// A change to an NFA or a DFA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    AddState { name: State },
    RemoveState { name: State },
    SetAlphabet { symbols: Vec<String> },
    AddTransition { from: State, symbol: Label, to: State },
    RemoveTransition { from: State, symbol: Label, to: State },
    ToggleAccept { name: State },
    SetStart { name: State },
}

/// A change to a Turing Machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TmEdit {
    AddState {
        name: State,
    },
    RemoveState {
        name: State,
    },
    SetInputAlphabet {
        symbols: Vec<String>,
    },
    SetTapeAlphabet {
        symbols: Vec<String>,
    },
    AddTransition {
        from: State,
        read: Symbol,
        to: State,
        write: Symbol,
        direction: Direction,
    },
    RemoveTransition {
        from: State,
        read: Symbol,
    },
    ToggleAccept {
        name: State,
    },
    ToggleReject {
        name: State,
    },
    SetStart {
        name: State,
    },
}

/// A model that can be changed through edit commands.
pub trait Editable: Clone {
    type Edit;

    /// Applies `edit` to `self`. On error `self` is unchanged.
    fn apply_in_place(&mut self, edit: &Self::Edit) -> Result<(), AutomatonError>;

    /// Returns a copy of `self` with `edit` applied.
    fn apply(&self, edit: &Self::Edit) -> Result<Self, AutomatonError> {
        let mut next = self.clone();
        next.apply_in_place(edit)?;
        Ok(next)
    }

    /// Applies every edit in order. Either all of them succeed or none is visible.
    fn apply_all<'e, I>(&self, edits: I) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = &'e Self::Edit>,
        Self::Edit: 'e,
    {
        let mut next = self.clone();
        for edit in edits {
            next.apply_in_place(edit)?;
        }
        Ok(next)
    }
}

impl Editable for Nfa {
    type Edit = Edit;

    fn apply_in_place(&mut self, edit: &Edit) -> Result<(), AutomatonError> {
        match edit {
            Edit::AddState { name } => self.add_state(name),
            Edit::RemoveState { name } => self.remove_state(name),
            Edit::SetAlphabet { symbols } => self.set_alphabet(symbols),
            Edit::AddTransition { from, symbol, to } => {
                self.add_transition(from, *symbol, to).map(|_| ())
            }
            Edit::RemoveTransition { from, symbol, to } => {
                self.remove_transition(from, *symbol, to)
            }
            Edit::ToggleAccept { name } => self.toggle_accept(name).map(|_| ()),
            Edit::SetStart { name } => self.set_start(name),
        }
    }
}

impl Editable for Dfa {
    type Edit = Edit;

    fn apply_in_place(&mut self, edit: &Edit) -> Result<(), AutomatonError> {
        match edit {
            Edit::AddState { name } => self.add_state(name),
            Edit::RemoveState { name } => self.remove_state(name),
            Edit::SetAlphabet { symbols } => self.set_alphabet(symbols),
            Edit::AddTransition { from, symbol, to } => {
                self.add_transition(from, *symbol, to).map(|_| ())
            }
            Edit::RemoveTransition { from, symbol, to } => {
                self.remove_transition(from, *symbol, to)
            }
            Edit::ToggleAccept { name } => self.toggle_accept(name).map(|_| ()),
            Edit::SetStart { name } => self.set_start(name),
        }
    }
}

impl Editable for TuringMachine {
    type Edit = TmEdit;

    fn apply_in_place(&mut self, edit: &TmEdit) -> Result<(), AutomatonError> {
        match edit {
            TmEdit::AddState { name } => self.add_state(name),
            TmEdit::RemoveState { name } => self.remove_state(name),
            TmEdit::SetInputAlphabet { symbols } => self.set_input_alphabet(symbols),
            TmEdit::SetTapeAlphabet { symbols } => self.set_tape_alphabet(symbols),
            TmEdit::AddTransition {
                from,
                read,
                to,
                write,
                direction,
            } => self
                .add_transition(from, *read, to, *write, *direction)
                .map(|_| ()),
            TmEdit::RemoveTransition { from, read } => {
                self.remove_transition(from, *read).map(|_| ())
            }
            TmEdit::ToggleAccept { name } => self.toggle_accept(name).map(|_| ()),
            TmEdit::ToggleReject { name } => self.toggle_reject(name).map(|_| ()),
            TmEdit::SetStart { name } => self.set_start(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verdict;

    fn add_state(name: &str) -> Edit {
        Edit::AddState {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_apply_returns_new_model() {
        let nfa = Nfa::new();
        let next = nfa.apply(&add_state("q1")).unwrap();

        assert_eq!(nfa.states().len(), 1);
        assert_eq!(next.states().len(), 2);
    }

    #[test]
    fn test_failed_edit_reports_error() {
        let nfa = Nfa::new();
        assert_eq!(
            nfa.apply(&add_state("q0")),
            Err(AutomatonError::DuplicateState("q0".to_string()))
        );
    }

    #[test]
    fn test_apply_all_is_all_or_nothing() {
        let nfa = Nfa::new();
        let edits = vec![
            add_state("q1"),
            Edit::SetAlphabet {
                symbols: vec!["a".to_string()],
            },
            Edit::AddTransition {
                from: "q0".to_string(),
                symbol: Label::Symbol('a'),
                to: "q9".to_string(),
            },
        ];

        assert_eq!(
            nfa.apply_all(&edits),
            Err(AutomatonError::UnknownState("q9".to_string()))
        );
        assert_eq!(nfa, Nfa::new());
    }

    #[test]
    fn test_edit_session_builds_a_dfa() {
        let edits: Vec<Edit> = serde_json::from_str(
            r#"[
                {"op": "set_alphabet", "symbols": ["a"]},
                {"op": "add_state", "name": "q1"},
                {"op": "add_transition", "from": "q0", "symbol": "a", "to": "q1"},
                {"op": "add_transition", "from": "q1", "symbol": "a", "to": "q0"},
                {"op": "toggle_accept", "name": "q1"}
            ]"#,
        )
        .unwrap();

        let dfa = Dfa::new().apply_all(&edits).unwrap();
        assert_eq!(dfa.run("a"), Ok(Verdict::Accept));
        assert_eq!(dfa.run("aa"), Ok(Verdict::Reject));
    }

    #[test]
    fn test_dfa_edit_rejects_epsilon() {
        let edit = Edit::AddTransition {
            from: "q0".to_string(),
            symbol: Label::Epsilon,
            to: "q0".to_string(),
        };
        assert_eq!(Dfa::new().apply(&edit), Err(AutomatonError::EpsilonInDfa));
    }

    #[test]
    fn test_tm_edits() {
        let tm = TuringMachine::new();
        let edits = vec![
            TmEdit::SetInputAlphabet {
                symbols: vec!["1".to_string()],
            },
            TmEdit::AddState {
                name: "done".to_string(),
            },
            TmEdit::AddTransition {
                from: "q0".to_string(),
                read: '1',
                to: "done".to_string(),
                write: '1',
                direction: Direction::Right,
            },
            TmEdit::ToggleAccept {
                name: "done".to_string(),
            },
        ];

        let tm = tm.apply_all(&edits).unwrap();
        assert!(tm.rule("q0", '1').is_some());

        let conflicting = TmEdit::ToggleReject {
            name: "done".to_string(),
        };
        assert_eq!(
            tm.apply(&conflicting),
            Err(AutomatonError::ConflictingHaltState("done".to_string()))
        );
    }
}
