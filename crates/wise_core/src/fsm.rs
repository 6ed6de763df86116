//! State Machine Runtime
//!
//! Flat state machines for app-level flow control. States and events are any
//! `Copy + Eq + Hash` enum; entry and exit actions run around each
//! transition.

use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Marker bound for state and event identifiers
pub trait FsmKey: Copy + Eq + Hash + Debug + Send + 'static {}

impl<T: Copy + Eq + Hash + Debug + Send + 'static> FsmKey for T {}

/// An action run on entering or leaving a state
pub type Action = Box<dyn FnMut() + Send>;

struct Transition<S, E> {
    from: S,
    event: E,
    to: S,
}

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    transitions: Vec<Transition<S, E>>,
    entry_callbacks: FxHashMap<S, Vec<Action>>,
    exit_callbacks: FxHashMap<S, Vec<Action>>,
}

impl<S: FsmKey, E: FsmKey> StateMachineBuilder<S, E> {
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: Vec::new(),
            entry_callbacks: FxHashMap::default(),
            exit_callbacks: FxHashMap::default(),
        }
    }

    /// Add a transition (from, event, to). The first match wins.
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.push(Transition { from, event, to });
        self
    }

    /// Add an entry action for a state
    pub fn on_enter<F: FnMut() + Send + 'static>(mut self, state: S, action: F) -> Self {
        self.entry_callbacks
            .entry(state)
            .or_default()
            .push(Box::new(action));
        self
    }

    /// Add an exit action for a state
    pub fn on_exit<F: FnMut() + Send + 'static>(mut self, state: S, action: F) -> Self {
        self.exit_callbacks
            .entry(state)
            .or_default()
            .push(Box::new(action));
        self
    }

    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
            entry_callbacks: self.entry_callbacks,
            exit_callbacks: self.exit_callbacks,
        }
    }
}

/// A state machine instance
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: Vec<Transition<S, E>>,
    entry_callbacks: FxHashMap<S, Vec<Action>>,
    exit_callbacks: FxHashMap<S, Vec<Action>>,
}

impl<S: FsmKey, E: FsmKey> StateMachine<S, E> {
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Send an event, running exit actions of the old state and entry
    /// actions of the new one.
    ///
    /// Returns the state after the event has been handled. Events with no
    /// matching transition leave the machine untouched.
    pub fn send(&mut self, event: E) -> S {
        let current = self.current_state;

        let Some(to_state) = self
            .transitions
            .iter()
            .find(|t| t.from == current && t.event == event)
            .map(|t| t.to)
        else {
            tracing::trace!(?current, ?event, "fsm: event ignored");
            return current;
        };

        if let Some(callbacks) = self.exit_callbacks.get_mut(&current) {
            for callback in callbacks.iter_mut() {
                callback();
            }
        }

        self.current_state = to_state;
        tracing::debug!(from = ?current, ?event, to = ?to_state, "fsm: transition");

        if let Some(callbacks) = self.entry_callbacks.get_mut(&to_state) {
            for callback in callbacks.iter_mut() {
                callback();
            }
        }

        to_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Screen {
        Launch,
        Onboarding,
        Home,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Nav {
        LaunchFinished,
        GetStarted,
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = StateMachine::builder(Screen::Launch)
            .on(Screen::Launch, Nav::LaunchFinished, Screen::Onboarding)
            .on(Screen::Onboarding, Nav::GetStarted, Screen::Home)
            .build();

        assert_eq!(fsm.current_state(), Screen::Launch);
        assert_eq!(fsm.send(Nav::LaunchFinished), Screen::Onboarding);
        assert_eq!(fsm.send(Nav::GetStarted), Screen::Home);
    }

    #[test]
    fn test_unmatched_event_runs_nothing() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let exit_log = log.clone();
        let mut fsm = StateMachine::builder(Screen::Launch)
            .on(Screen::Launch, Nav::LaunchFinished, Screen::Onboarding)
            .on_exit(Screen::Launch, move || exit_log.lock().unwrap().push("exit"))
            .build();

        assert_eq!(fsm.send(Nav::GetStarted), Screen::Launch);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_exit_runs_before_entry() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (exit_log, entry_log) = (order.clone(), order.clone());

        let mut fsm = StateMachine::builder(Screen::Launch)
            .on(Screen::Launch, Nav::LaunchFinished, Screen::Onboarding)
            .on_exit(Screen::Launch, move || exit_log.lock().unwrap().push("exit"))
            .on_enter(Screen::Onboarding, move || {
                entry_log.lock().unwrap().push("enter")
            })
            .build();

        fsm.send(Nav::LaunchFinished);
        fsm.send(Nav::LaunchFinished);
        assert_eq!(*order.lock().unwrap(), vec!["exit", "enter"]);
    }
}
