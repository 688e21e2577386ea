//! This module defines the `Machine` struct, which executes a `TuringMachine` definition on
//! one input. It tracks the current state, the tape, the step count and whether the machine
//! has halted, and it can be driven one step at a time or run under a step budget.

use crate::tape::Tape;
use crate::turing::TuringMachine;
use crate::types::{AutomatonError, Halt, RunConfig, State, Step, Symbol, TmVerdict};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of a budgeted run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub verdict: TmVerdict,
    /// Number of transitions taken.
    pub steps: usize,
    /// Tape contents without leading and trailing blanks.
    pub final_tape: Vec<Symbol>,
}

impl Outcome {
    pub fn tape_string(&self) -> String {
        self.final_tape.iter().collect()
    }
}

/// A snapshot of a running machine, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub state: State,
    pub head: usize,
    pub tape: Vec<Symbol>,
    pub steps: usize,
    pub halt: Option<Halt>,
}

/// A Turing Machine executing on a particular input.
///
/// The machine borrows its definition, so the definition cannot change while it runs.
#[derive(Debug, Clone)]
pub struct Machine<'a> {
    tm: &'a TuringMachine,
    input: Vec<Symbol>,
    state: &'a str,
    tape: Tape,
    step_count: usize,
    halt: Option<Halt>,
}

impl<'a> Machine<'a> {
    /// Loads `input` onto a fresh tape with the head on its first symbol.
    ///
    /// # Returns
    ///
    /// * `Err(AutomatonError::InvalidSymbol)` if `input` uses a symbol outside the input alphabet.
    /// * `Err(AutomatonError::NoStartState)` if the definition has no start state.
    pub fn new(tm: &'a TuringMachine, input: &str) -> Result<Self, AutomatonError> {
        let input = tm.check_input(input)?;
        let start = tm.start_or_err()?;

        Ok(Self {
            tm,
            state: start,
            tape: Tape::new(input.iter().copied(), tm.blank()),
            input,
            step_count: 0,
            halt: Self::halt_in(tm, start),
        })
    }

    /// Whether entering `state` ends the computation.
    fn halt_in(tm: &TuringMachine, state: &str) -> Option<Halt> {
        if tm.is_accepting(state) {
            Some(Halt::Accepted)
        } else if tm.is_rejecting(state) {
            Some(Halt::Rejected)
        } else {
            None
        }
    }

    /// Executes a single step.
    ///
    /// Reads the symbol under the head, writes, moves and changes state according to the
    /// matching rule. A missing rule rejects without counting a step. Stepping a halted
    /// machine does nothing and reports the halt again.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = self.halt {
            return Step::Halt(halt);
        }

        let symbol = self.tape.read();
        let action = match self.tm.rule(self.state, symbol) {
            Some(action) => action,
            None => {
                tracing::trace!(state = self.state, %symbol, "no rule, rejecting");
                self.halt = Some(Halt::Rejected);
                return Step::Halt(Halt::Rejected);
            }
        };

        self.tape.write(action.write);
        self.tape.shift(action.direction);
        self.state = action.next_state.as_str();
        self.step_count += 1;
        tracing::trace!(
            step = self.step_count,
            state = self.state,
            head = self.tape.head(),
            "transition taken"
        );

        self.halt = Self::halt_in(self.tm, self.state);
        match self.halt {
            Some(halt) => Step::Halt(halt),
            None => Step::Continue,
        }
    }

    /// Steps until the machine halts or `max_steps` transitions have been taken in total.
    pub fn run(&mut self, max_steps: usize) -> Outcome {
        loop {
            if let Some(halt) = self.halt {
                return self.outcome(halt.into());
            }
            if self.step_count >= max_steps {
                tracing::debug!(max_steps, state = self.state, "step budget exhausted");
                return self.outcome(TmVerdict::Timeout);
            }
            self.step();
        }
    }

    fn outcome(&self, verdict: TmVerdict) -> Outcome {
        Outcome {
            verdict,
            steps: self.step_count,
            final_tape: self.tape.contents(),
        }
    }

    /// Resets the machine to the start state with the original input.
    pub fn reset(&mut self) {
        if let Some(start) = self.tm.start() {
            self.state = start;
        }
        self.tape = Tape::new(self.input.iter().copied(), self.tm.blank());
        self.step_count = 0;
        self.halt = Self::halt_in(self.tm, self.state);
    }

    /// Returns the current state.
    pub fn state(&self) -> &str {
        self.state
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the total number of steps executed.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn halt(&self) -> Option<Halt> {
        self.halt
    }

    pub fn is_halted(&self) -> bool {
        self.halt.is_some()
    }

    pub fn configuration(&self) -> Configuration {
        Configuration {
            state: self.state.to_string(),
            head: self.tape.head(),
            tape: self.tape.cells().to_vec(),
            steps: self.step_count,
            halt: self.halt,
        }
    }
}

impl fmt::Display for Machine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {:>4}  {:<8} {}",
            self.step_count, self.state, self.tape
        )
    }
}

/// Runs `tm` on `input` under `config.max_steps`.
///
/// Identical `(tm, input, config)` always produce identical outcomes.
pub fn run(tm: &TuringMachine, input: &str, config: &RunConfig) -> Result<Outcome, AutomatonError> {
    let mut machine = Machine::new(tm, input)?;
    let outcome = machine.run(config.max_steps);
    tracing::debug!(
        input,
        verdict = %outcome.verdict,
        steps = outcome.steps,
        "Turing Machine run finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    /// Decides { 0^n 1^n }: marks a 0 with X, the matching 1 with Y, and repeats.
    fn zeros_then_ones() -> TuringMachine {
        let mut tm = TuringMachine::new();
        tm.set_input_alphabet(["0", "1"]).unwrap();
        tm.add_tape_symbol("X").unwrap();
        tm.add_tape_symbol("Y").unwrap();
        for state in ["q1", "q2", "q3", "accept", "reject"] {
            tm.add_state(state).unwrap();
        }

        tm.add_transition("q0", '0', "q1", 'X', Direction::Right).unwrap();
        tm.add_transition("q0", 'Y', "q3", 'Y', Direction::Right).unwrap();
        tm.add_transition("q0", '_', "accept", '_', Direction::Stay).unwrap();
        tm.add_transition("q0", '1', "reject", '1', Direction::Stay).unwrap();

        tm.add_transition("q1", '0', "q1", '0', Direction::Right).unwrap();
        tm.add_transition("q1", 'Y', "q1", 'Y', Direction::Right).unwrap();
        tm.add_transition("q1", '1', "q2", 'Y', Direction::Left).unwrap();

        tm.add_transition("q2", '0', "q2", '0', Direction::Left).unwrap();
        tm.add_transition("q2", 'Y', "q2", 'Y', Direction::Left).unwrap();
        tm.add_transition("q2", 'X', "q0", 'X', Direction::Right).unwrap();

        tm.add_transition("q3", 'Y', "q3", 'Y', Direction::Right).unwrap();
        tm.add_transition("q3", '_', "accept", '_', Direction::Stay).unwrap();

        tm.toggle_accept("accept").unwrap();
        tm.toggle_reject("reject").unwrap();
        tm
    }

    /// Moves right forever without changing the tape.
    fn runaway() -> TuringMachine {
        let mut tm = TuringMachine::new();
        tm.set_input_alphabet(["a", "b"]).unwrap();
        for symbol in ['a', 'b', '_'] {
            tm.add_transition("q0", symbol, "q0", symbol, Direction::Right)
                .unwrap();
        }
        tm
    }

    #[test]
    fn test_zeros_then_ones_accepts() {
        let outcome = run(&zeros_then_ones(), "0011", &RunConfig::default()).unwrap();
        assert_eq!(outcome.verdict, TmVerdict::Accepted);
        assert_eq!(outcome.steps, 13);
        assert_eq!(outcome.tape_string(), "XXYY");
    }

    #[test]
    fn test_zeros_then_ones_rejects_on_missing_rule() {
        let outcome = run(&zeros_then_ones(), "001", &RunConfig::default()).unwrap();
        assert_eq!(outcome.verdict, TmVerdict::Rejected);
    }

    #[test]
    fn test_explicit_reject_state() {
        let outcome = run(&zeros_then_ones(), "10", &RunConfig::default()).unwrap();
        assert_eq!(outcome.verdict, TmVerdict::Rejected);
        assert_eq!(outcome.steps, 1);
    }

    #[test]
    fn test_empty_input_accepts() {
        let outcome = run(&zeros_then_ones(), "", &RunConfig::default()).unwrap();
        assert_eq!(outcome.verdict, TmVerdict::Accepted);
        assert_eq!(outcome.steps, 1);
        assert!(outcome.final_tape.is_empty());
    }

    #[test]
    fn test_missing_transition_rejects_without_error() {
        let mut tm = zeros_then_ones();
        tm.remove_transition("q1", '1').unwrap();

        let mut machine = Machine::new(&tm, "001").unwrap();
        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.step(), Step::Halt(Halt::Rejected));
        assert_eq!(machine.step_count(), 2);
        assert_eq!(machine.state(), "q1");
    }

    #[test]
    fn test_timeout_after_exact_budget() {
        let outcome = run(&runaway(), "ab", &RunConfig { max_steps: 1000 }).unwrap();
        assert_eq!(outcome.verdict, TmVerdict::Timeout);
        assert_eq!(outcome.steps, 1000);
        assert_eq!(outcome.final_tape, vec!['a', 'b']);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let tm = zeros_then_ones();
        for input in ["0011", "001", "000111", "0101"] {
            let first = run(&tm, input, &RunConfig { max_steps: 50 }).unwrap();
            let second = run(&tm, input, &RunConfig { max_steps: 50 }).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_single_steps_match_run() {
        let tm = zeros_then_ones();
        let expected = run(&tm, "000111", &RunConfig::default()).unwrap();

        let mut machine = Machine::new(&tm, "000111").unwrap();
        while machine.step() == Step::Continue {}
        assert_eq!(machine.run(crate::types::DEFAULT_STEP_BUDGET), expected);
    }

    #[test]
    fn test_left_move_extends_tape() {
        let mut tm = TuringMachine::new();
        tm.set_input_alphabet(["a"]).unwrap();
        tm.add_state("done").unwrap();
        tm.add_transition("q0", 'a', "q0", 'a', Direction::Left).unwrap();
        tm.add_transition("q0", '_', "done", 'a', Direction::Stay).unwrap();
        tm.toggle_accept("done").unwrap();

        let outcome = run(&tm, "a", &RunConfig::default()).unwrap();
        assert_eq!(outcome.verdict, TmVerdict::Accepted);
        assert_eq!(outcome.tape_string(), "aa");
    }

    #[test]
    fn test_start_in_accept_state_halts_immediately() {
        let mut tm = runaway();
        tm.toggle_accept("q0").unwrap();

        let mut machine = Machine::new(&tm, "ab").unwrap();
        assert!(machine.is_halted());
        assert_eq!(machine.step(), Step::Halt(Halt::Accepted));
        assert_eq!(machine.run(10).steps, 0);
    }

    #[test]
    fn test_input_validation() {
        let tm = zeros_then_ones();
        assert_eq!(
            Machine::new(&tm, "0X").map(|_| ()),
            Err(AutomatonError::InvalidSymbol("X".to_string()))
        );

        let mut tm = zeros_then_ones();
        tm.remove_state("q0").unwrap();
        assert_eq!(
            Machine::new(&tm, "01").map(|_| ()),
            Err(AutomatonError::NoStartState)
        );
    }

    #[test]
    fn test_reset() {
        let tm = zeros_then_ones();
        let mut machine = Machine::new(&tm, "01").unwrap();
        machine.run(100);
        assert!(machine.is_halted());

        machine.reset();
        assert_eq!(machine.state(), "q0");
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.tape().cells(), &['0', '1']);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_configuration_and_display() {
        let tm = zeros_then_ones();
        let mut machine = Machine::new(&tm, "01").unwrap();
        machine.step();

        let configuration = machine.configuration();
        assert_eq!(configuration.state, "q1");
        assert_eq!(configuration.head, 1);
        assert_eq!(configuration.tape, vec!['X', '1']);
        assert_eq!(configuration.halt, None);
        assert!(machine.to_string().ends_with("X [1]"));
    }
}
