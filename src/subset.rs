//! Subset construction: converts an NFA into an equivalent DFA whose states are
//! epsilon-closed sets of NFA states.

use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::simulator::{epsilon_closure, move_on, ActiveSet};
use crate::types::{AutomatonError, State};
use std::collections::{HashMap, VecDeque};

/// Builds the DFA equivalent to `nfa`.
///
/// Macro-states are discovered breadth-first from the closure of the start state and
/// memoized by their member set, so each distinct set becomes exactly one DFA state.
/// Symbols that lead nowhere leave the transition undefined; use
/// [`Dfa::complete_with_sink`] when a total function is needed.
///
/// DFA states are named after their members, e.g. `{q0,q1}`.
pub fn to_dfa(nfa: &Nfa) -> Result<Dfa, AutomatonError> {
    let start = nfa.start_or_err()?;

    let mut dfa = Dfa::empty();
    dfa.set_alphabet(nfa.alphabet().iter().map(char::to_string))?;

    let mut names: HashMap<ActiveSet<'_>, State> = HashMap::new();
    let mut queue = VecDeque::new();

    let start_set = epsilon_closure(nfa, [start]);
    let start_name = register(nfa, &mut dfa, &mut names, start_set.clone())?;
    dfa.set_start(&start_name)?;
    queue.push_back(start_set);

    while let Some(current) = queue.pop_front() {
        let from = names
            .get(&current)
            .cloned()
            .ok_or_else(|| AutomatonError::UnknownState(set_name(&current)))?;

        for &symbol in nfa.alphabet() {
            let moved = move_on(nfa, &current, symbol);
            if moved.is_empty() {
                continue;
            }

            let target = epsilon_closure(nfa, moved);
            let to = match names.get(&target) {
                Some(name) => name.clone(),
                None => {
                    let name = register(nfa, &mut dfa, &mut names, target.clone())?;
                    queue.push_back(target);
                    name
                }
            };
            dfa.add_transition(&from, symbol, &to)?;
        }
    }

    tracing::debug!(
        nfa_states = nfa.states().len(),
        dfa_states = dfa.states().len(),
        "subset construction finished"
    );
    Ok(dfa)
}

/// Adds a DFA state for `set`, accepting iff it contains an NFA accept state.
fn register<'a>(
    nfa: &Nfa,
    dfa: &mut Dfa,
    names: &mut HashMap<ActiveSet<'a>, State>,
    set: ActiveSet<'a>,
) -> Result<State, AutomatonError> {
    let mut name = set_name(&set);
    // NFA state names may themselves contain braces or commas.
    while dfa.states().contains(&name) {
        name.push('\'');
    }

    dfa.add_state(&name)?;
    if set.iter().any(|state| nfa.is_accepting(state)) {
        dfa.toggle_accept(&name)?;
    }
    names.insert(set, name.clone());
    Ok(name)
}

fn set_name(set: &ActiveSet<'_>) -> String {
    format!("{{{}}}", set.iter().copied().collect::<Vec<_>>().join(","))
}
