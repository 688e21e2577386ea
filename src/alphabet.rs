//! Insertion-ordered, duplicate-free collections used for alphabets and state sets,
//! plus the validation of user-supplied symbols.

use crate::types::{AutomatonError, State, Symbol};

/// A set that remembers the order in which its members were inserted.
///
/// Editors display states and symbols in the order they were created, so membership
/// is set-like while iteration follows insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSet<T> {
    items: Vec<T>,
}

/// The symbols an automaton reads.
pub type Alphabet = OrderedSet<Symbol>;
/// The states of an automaton, or a subset of them.
pub type StateSet = OrderedSet<State>;

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: PartialEq> OrderedSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item` at the end. Returns `false` if it was already present.
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Removes `item`, keeping the order of the rest. Returns `false` if it was absent.
    pub fn remove<Q>(&mut self, item: &Q) -> bool
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        match self.items.iter().position(|i| i == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        self.items.iter().any(|i| i == item)
    }

    /// Position of `item` in insertion order.
    pub fn position<Q>(&self, item: &Q) -> Option<usize>
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        self.items.iter().position(|i| i == item)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: PartialEq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Parses a user-supplied symbol, which must be exactly one character.
pub fn parse_symbol(text: &str) -> Result<Symbol, AutomatonError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(AutomatonError::InvalidSymbol(text.to_string())),
    }
}

/// Parses a complete alphabet, rejecting malformed and repeated symbols.
pub fn parse_alphabet<I, S>(symbols: I) -> Result<Alphabet, AutomatonError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut alphabet = Alphabet::new();
    for text in symbols {
        let symbol = parse_symbol(text.as_ref())?;
        if !alphabet.insert(symbol) {
            return Err(AutomatonError::DuplicateSymbol(symbol));
        }
    }
    Ok(alphabet)
}

/// Checks that a new state name is usable.
pub(crate) fn check_state_name(name: &str) -> Result<(), AutomatonError> {
    if name.trim().is_empty() {
        return Err(AutomatonError::InvalidState(name.to_string()));
    }
    Ok(())
}
