//! The Turing Machine tape: unbounded in both directions, materialized lazily.

use crate::types::{Direction, Symbol};
use std::fmt;

/// A tape of symbols with a read/write head.
///
/// Only visited cells are stored. Moving past either end appends a blank cell on that
/// side, so the head always points at a stored cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Symbol>,
    head: usize,
    blank: Symbol,
}

impl Tape {
    /// Creates a tape holding `input` with the head on its first symbol.
    pub fn new(input: impl IntoIterator<Item = Symbol>, blank: Symbol) -> Self {
        let mut cells: Vec<Symbol> = input.into_iter().collect();
        if cells.is_empty() {
            cells.push(blank);
        }
        Self {
            cells,
            head: 0,
            blank,
        }
    }

    pub fn read(&self) -> Symbol {
        self.cells[self.head]
    }

    pub fn write(&mut self, symbol: Symbol) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell, growing the tape with a blank on overrun.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.head == 0 {
                    // Extend tape to the left
                    self.cells.insert(0, self.blank);
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head >= self.cells.len() {
                    self.cells.push(self.blank);
                }
            }
            Direction::Stay => {}
        }
    }

    /// Index of the head within [`Tape::cells`].
    pub fn head(&self) -> usize {
        self.head
    }

    pub fn blank(&self) -> Symbol {
        self.blank
    }

    /// Every visited cell, blanks included.
    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    /// The tape contents without leading and trailing blanks.
    pub fn contents(&self) -> Vec<Symbol> {
        let first = self.cells.iter().position(|&c| c != self.blank);
        let last = self.cells.iter().rposition(|&c| c != self.blank);
        match (first, last) {
            (Some(first), Some(last)) => self.cells[first..=last].to_vec(),
            _ => Vec::new(),
        }
    }
}

/// Renders the visited cells with the head cell in brackets, e.g. `a [b] c`.
impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, symbol)| {
                if i == self.head {
                    format!("[{symbol}]")
                } else {
                    symbol.to_string()
                }
            })
            .collect();
        write!(f, "{}", rendered.join(" "))
    }
}
