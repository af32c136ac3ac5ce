//! A small library for keeping learner state as a log of events.
//!
//! The app never edits its state directly. It appends events ("lesson selected",
//! "answer graded") to an [`EventLog`], and the current state is the result of folding
//! those events, in order, over a default initial state. Persisting the state means
//! persisting the log.

pub mod data_model;

pub use crate::data_model::{Event, EventLog, LogError, Timestamped};

/// Core trait for folding events into state.
pub trait PartialAppState: Sized {
    type Event: Event;

    /// The intermediate state type returned by process_event.
    /// For simple cases, this can just be Self.
    type Partial: Sized;

    /// Fold one event into the intermediate state.
    fn process_event(partial: Self::Partial, event: &Timestamped<Self::Event>) -> Self::Partial;

    /// Compute anything derived from the folded events. Called once after a batch of events.
    fn finalize(partial: Self::Partial) -> Self;
}

/// Applying a single event to an already finalized state.
pub trait AppState: PartialAppState {
    fn apply_event(self, event: &Timestamped<Self::Event>) -> Self;
}

impl<T> AppState for T
where
    T: PartialAppState,
    T::Partial: From<T>,
{
    fn apply_event(self, event: &Timestamped<Self::Event>) -> Self {
        let partial = T::Partial::from(self);
        let partial = T::process_event(partial, event);
        T::finalize(partial)
    }
}
