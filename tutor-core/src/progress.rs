use std::cell::RefCell;
use std::collections::BTreeMap;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use logbook::{AppState, Event, EventLog, PartialAppState, Timestamped};

use crate::TutorError;
use crate::lesson::{Lesson, LessonMap};

pub const MAX_WEIGHT: u32 = 10;

/// How often the learner got one word of one lesson right or wrong.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WordStatistic {
    pub correct_count: u32,
    pub wrong_count: u32,
}

impl WordStatistic {
    /// Selection weight in `1..=MAX_WEIGHT`: the share of wrong answers scaled to
    /// `MAX_WEIGHT` and rounded up.
    ///
    /// Both counts start from one pseudo-answer, so an unseen word sits in the middle.
    pub fn weight(&self) -> u32 {
        let wrong = u64::from(self.wrong_count) + 1;
        let total = u64::from(self.correct_count) + u64::from(self.wrong_count) + 2;
        (u64::from(MAX_WEIGHT) * wrong).div_ceil(total) as u32
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LessonStatistics {
    pub total: u32,
    pub wrong: u32,
}

impl LessonStatistics {
    /// Share of correct answers, rounded down. Zero before the first answer.
    pub fn percent_correct(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let wrong_percent = (u64::from(self.wrong) * 100).div_ceil(u64::from(self.total));
        100u64.saturating_sub(wrong_percent) as u32
    }
}

/// Where the engine reads word weights from and records graded answers to.
#[allow(async_fn_in_trait)]
pub trait ProgressStore {
    /// The statistic for a word, created with zero counts if it was never seen.
    async fn statistic(
        &self,
        lesson: Lesson,
        main_form: &str,
    ) -> Result<WordStatistic, TutorError>;
    async fn record_correct(&self, lesson: Lesson, main_form: &str) -> Result<(), TutorError>;
    async fn record_wrong(&self, lesson: Lesson, main_form: &str) -> Result<(), TutorError>;
    async fn lesson_statistics(&self, lesson: Lesson) -> Result<LessonStatistics, TutorError>;

    /// A stream of a lesson's statistics, starting with the current value and updated after
    /// every recorded answer.
    fn subscribe_lesson_statistics(&self, lesson: Lesson) -> UnboundedReceiver<LessonStatistics>;
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub enum ProgressEvent {
    Answered {
        lesson: Lesson,
        main_form: String,
        correct: bool,
    },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "version")]
pub enum VersionedProgressEvent {
    V1(ProgressEvent),
}

impl Event for ProgressEvent {
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(VersionedProgressEvent::V1(self.clone()))
    }

    fn from_json(json: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<VersionedProgressEvent>(json.clone()).map(
            |versioned| match versioned {
                VersionedProgressEvent::V1(event) => event,
            },
        )
    }
}

/// Statistics folded from a [`ProgressEvent`] log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub words: BTreeMap<(Lesson, String), WordStatistic>,
    pub lessons: BTreeMap<Lesson, LessonStatistics>,
}

impl PartialAppState for Statistics {
    type Event = ProgressEvent;
    type Partial = Self;

    fn process_event(mut partial: Self::Partial, event: &Timestamped<Self::Event>) -> Self::Partial {
        match &event.event {
            ProgressEvent::Answered {
                lesson,
                main_form,
                correct,
            } => {
                let word = partial
                    .words
                    .entry((*lesson, main_form.clone()))
                    .or_default();
                let totals = partial.lessons.entry(*lesson).or_default();
                totals.total += 1;
                if *correct {
                    word.correct_count += 1;
                } else {
                    word.wrong_count += 1;
                    totals.wrong += 1;
                }
            }
        }
        partial
    }

    fn finalize(partial: Self::Partial) -> Self {
        partial
    }
}

/// A [`ProgressStore`] kept in memory as an event log, so it can be saved and replayed.
#[derive(Debug)]
pub struct LearningProgress {
    log: RefCell<EventLog<ProgressEvent>>,
    statistics: RefCell<Statistics>,
    subscribers: RefCell<LessonMap<Vec<UnboundedSender<LessonStatistics>>>>,
}

impl Default for LearningProgress {
    fn default() -> Self {
        Self::from_log(EventLog::new())
    }
}

impl LearningProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_log(log: EventLog<ProgressEvent>) -> Self {
        let statistics = log.state::<Statistics>(Statistics::default());
        log::debug!(
            "Replayed {} answers over {} words",
            log.len(),
            statistics.words.len()
        );
        Self {
            log: RefCell::new(log),
            statistics: RefCell::new(statistics),
            subscribers: RefCell::new(LessonMap::from_fn(|_| Vec::new())),
        }
    }

    pub fn to_jsons(&self) -> Result<Vec<Timestamped<serde_json::Value>>, serde_json::Error> {
        self.log.borrow().to_jsons()
    }

    pub fn answers(&self) -> usize {
        self.log.borrow().len()
    }

    fn totals(&self, lesson: Lesson) -> LessonStatistics {
        self.statistics
            .borrow()
            .lessons
            .get(&lesson)
            .copied()
            .unwrap_or_default()
    }

    fn record(&self, lesson: Lesson, main_form: &str, correct: bool) {
        {
            let mut log = self.log.borrow_mut();
            let event = log.push(ProgressEvent::Answered {
                lesson,
                main_form: main_form.to_string(),
                correct,
            });
            let mut statistics = self.statistics.borrow_mut();
            *statistics = std::mem::take(&mut *statistics).apply_event(event);
        }

        let totals = self.totals(lesson);
        self.subscribers
            .borrow_mut()
            .get_mut(&lesson)
            .retain(|subscriber| subscriber.unbounded_send(totals).is_ok());
    }
}

impl ProgressStore for LearningProgress {
    async fn statistic(
        &self,
        lesson: Lesson,
        main_form: &str,
    ) -> Result<WordStatistic, TutorError> {
        let mut statistics = self.statistics.borrow_mut();
        let statistic = statistics
            .words
            .entry((lesson, main_form.to_string()))
            .or_default();
        Ok(*statistic)
    }

    async fn record_correct(&self, lesson: Lesson, main_form: &str) -> Result<(), TutorError> {
        self.record(lesson, main_form, true);
        Ok(())
    }

    async fn record_wrong(&self, lesson: Lesson, main_form: &str) -> Result<(), TutorError> {
        self.record(lesson, main_form, false);
        Ok(())
    }

    async fn lesson_statistics(&self, lesson: Lesson) -> Result<LessonStatistics, TutorError> {
        Ok(self.totals(lesson))
    }

    fn subscribe_lesson_statistics(&self, lesson: Lesson) -> UnboundedReceiver<LessonStatistics> {
        let (sender, receiver) = unbounded();
        if sender.unbounded_send(self.totals(lesson)).is_ok() {
            self.subscribers.borrow_mut().get_mut(&lesson).push(sender);
        }
        receiver
    }
}
