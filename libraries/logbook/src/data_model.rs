use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PartialAppState;

/// An event that can be stored in a log.
///
/// Implementations usually serialize through a `#[serde(tag = "version")]` wrapper enum so that
/// old logs keep loading after the event type changes.
pub trait Event: Clone + Sized {
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error>;
    fn from_json(json: &serde_json::Value) -> Result<Self, serde_json::Error>;
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamped<E> {
    pub timestamp: DateTime<Utc>,
    /// Position of the event within its log. Logs are gapless and start at zero.
    pub index: usize,
    pub event: E,
}

impl<E> Timestamped<E> {
    pub fn map<A>(self, f: impl FnOnce(E) -> A) -> Timestamped<A> {
        Timestamped {
            timestamp: self.timestamp,
            index: self.index,
            event: f(self.event),
        }
    }

    pub fn as_ref(&self) -> Timestamped<&E> {
        Timestamped {
            timestamp: self.timestamp,
            index: self.index,
            event: &self.event,
        }
    }
}

impl<E, Error> Timestamped<Result<E, Error>> {
    pub fn transpose(self) -> Result<Timestamped<E>, Error> {
        let Timestamped {
            timestamp,
            index,
            event,
        } = self;
        event.map(|event| Timestamped {
            timestamp,
            index,
            event,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("event out of order: expected index {expected}, got {found}")]
    OutOfOrder { expected: usize, found: usize },
    #[error("malformed event: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct EventLog<E> {
    events: Vec<Timestamped<E>>,
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E: Event> EventLog<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and return it as stored, for folding into already built state.
    pub fn push(&mut self, event: E) -> &Timestamped<E> {
        let index = self.events.len();
        self.events.push(Timestamped {
            timestamp: Utc::now(),
            index,
            event,
        });
        &self.events[index]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn state<A>(&self, initial_state: A::Partial) -> A
    where
        A: PartialAppState<Event = E>,
    {
        apply_events(self.events.iter(), initial_state)
    }

    pub fn to_jsons(&self) -> Result<Vec<Timestamped<serde_json::Value>>, serde_json::Error> {
        self.events
            .iter()
            .map(|event| event.as_ref().map(Event::to_json).transpose())
            .collect()
    }

    /// Rebuild a log from its JSON form, rejecting gaps and reordering.
    pub fn from_jsons(jsons: Vec<Timestamped<serde_json::Value>>) -> Result<Self, LogError> {
        let mut events = Vec::with_capacity(jsons.len());
        for (expected, json) in jsons.into_iter().enumerate() {
            if json.index != expected {
                log::warn!(
                    "Event out of order - expected index {}, got {}",
                    expected,
                    json.index
                );
                return Err(LogError::OutOfOrder {
                    expected,
                    found: json.index,
                });
            }
            let event = json
                .map(|value| E::from_json(&value))
                .transpose()
                .inspect_err(|e| log::error!("Error deserializing event JSON: {e:?}"))?;
            events.push(event);
        }
        Ok(Self { events })
    }
}

pub fn apply_events<'a, E: Event + 'a, A>(
    events: impl Iterator<Item = &'a Timestamped<E>>,
    initial_state: A::Partial,
) -> A
where
    A: PartialAppState<Event = E>,
{
    let mut state = initial_state;
    for event in events {
        state = A::process_event(state, event);
    }
    A::finalize(state)
}
