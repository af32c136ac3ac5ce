use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use grammar_utils::ParadigmKind;
use logbook::{AppState, Event, EventLog, PartialAppState, Timestamped};

/// A drill the learner can work on. Each lesson draws from exactly one word database.
#[derive(
    enumap::EnuMap,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    parse_display::Display,
    parse_display::FromStr,
)]
#[serde(rename_all = "kebab-case")]
#[display(style = "kebab-case")]
pub enum Lesson {
    PersonalPronounsDeclination,
    ReflexivePronounsDeclination,
    PossessivePronounsDeclination,
    InterrogativePronounsDeclination,
    CasesInterrogativesDeclination,
    #[default]
    NounsDeclination,
    BitiConjugation,
    HtetiConjugation,
    MociConjugation,
    VerbsConjugation,
    VerbsConjugationForms,
}

impl Lesson {
    pub fn title(self) -> &'static str {
        match self {
            Lesson::PersonalPronounsDeclination => "Personal pronouns",
            Lesson::ReflexivePronounsDeclination => "Reflexive pronoun",
            Lesson::PossessivePronounsDeclination => "Possessive pronouns",
            Lesson::InterrogativePronounsDeclination => "Interrogative pronouns",
            Lesson::CasesInterrogativesDeclination => "Case questions",
            Lesson::NounsDeclination => "Nouns",
            Lesson::BitiConjugation => "Verb бити",
            Lesson::HtetiConjugation => "Verb хтети",
            Lesson::MociConjugation => "Verb моћи",
            Lesson::VerbsConjugation => "Regular verbs",
            Lesson::VerbsConjugationForms => "Regular verbs: conjugation rules",
        }
    }
}

/// How a lesson turns a word entry into a fully specified slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, parse_display::Display)]
#[display(style = "kebab-case")]
pub enum Policy {
    /// Number first, then case (never the nominative singular), then gender, form and animacy.
    PluralityFirst,
    /// Case first, every other dimension drawn independently.
    CaseFirst,
    Conjugation,
    /// Name the present tense rule a verb follows instead of conjugating it.
    ConjugationRule,
}

impl Policy {
    pub fn kind(self) -> ParadigmKind {
        match self {
            Policy::PluralityFirst | Policy::CaseFirst => ParadigmKind::Declension,
            Policy::Conjugation | Policy::ConjugationRule => ParadigmKind::Conjugation,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LessonSelection {
    pub lesson: Lesson,
}

impl PartialAppState for LessonSelection {
    type Event = LessonSelectionEvent;
    type Partial = Self;

    fn process_event(_partial: Self::Partial, event: &Timestamped<Self::Event>) -> Self::Partial {
        match event.event {
            LessonSelectionEvent::SelectLesson(lesson) => LessonSelection { lesson },
        }
    }

    fn finalize(partial: Self::Partial) -> Self {
        partial
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, Ord, PartialOrd)]
pub enum LessonSelectionEvent {
    SelectLesson(Lesson),
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, Ord, PartialOrd, Eq, PartialEq)]
#[serde(tag = "version")]
pub enum VersionedLessonSelectionEvent {
    V1(LessonSelectionEvent),
}

impl Event for LessonSelectionEvent {
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let versioned = VersionedLessonSelectionEvent::from(self.clone());
        serde_json::to_value(versioned)
    }

    fn from_json(json: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<VersionedLessonSelectionEvent>(json.clone())
            .map(|versioned| versioned.into())
    }
}

impl From<LessonSelectionEvent> for VersionedLessonSelectionEvent {
    fn from(event: LessonSelectionEvent) -> Self {
        VersionedLessonSelectionEvent::V1(event)
    }
}

impl From<VersionedLessonSelectionEvent> for LessonSelectionEvent {
    fn from(event: VersionedLessonSelectionEvent) -> Self {
        match event {
            VersionedLessonSelectionEvent::V1(event) => event,
        }
    }
}

/// The active lesson, persisted as a log of selections and observable through channels.
#[derive(Debug, Default)]
pub struct LessonState {
    log: EventLog<LessonSelectionEvent>,
    selection: LessonSelection,
    subscribers: Vec<UnboundedSender<Lesson>>,
}

impl LessonState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_log(log: EventLog<LessonSelectionEvent>) -> Self {
        let selection = log.state::<LessonSelection>(LessonSelection::default());
        Self {
            log,
            selection,
            subscribers: Vec::new(),
        }
    }

    pub fn current(&self) -> Lesson {
        self.selection.lesson
    }

    /// Record the selection and tell every live subscriber, even if `lesson` was already active.
    pub fn set_current(&mut self, lesson: Lesson) -> Lesson {
        let previous = self.selection.lesson;
        let event = self.log.push(LessonSelectionEvent::SelectLesson(lesson));
        self.selection = self.selection.apply_event(event);
        self.subscribers
            .retain(|subscriber| subscriber.unbounded_send(lesson).is_ok());
        log::info!("Lesson switched from {previous} to {lesson}");
        lesson
    }

    /// A stream of lesson values, starting with the current one.
    pub fn subscribe(&mut self) -> UnboundedReceiver<Lesson> {
        let (sender, receiver) = unbounded();
        if sender.unbounded_send(self.current()).is_ok() {
            self.subscribers.push(sender);
        }
        receiver
    }

    pub fn log(&self) -> &EventLog<LessonSelectionEvent> {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{FutureExt, StreamExt};

    #[test]
    fn lessons_parse_from_kebab_case() {
        assert_eq!(
            "biti-conjugation".parse::<Lesson>().unwrap(),
            Lesson::BitiConjugation
        );
        assert_eq!(
            Lesson::CasesInterrogativesDeclination.to_string(),
            "cases-interrogatives-declination"
        );
        assert!("biti".parse::<Lesson>().is_err());
        assert_eq!(Lesson::default(), Lesson::NounsDeclination);
        assert_eq!(
            serde_json::to_value(Lesson::VerbsConjugationForms).unwrap(),
            "verbs-conjugation-forms"
        );
    }

    #[test]
    fn subscribers_see_current_value_then_every_selection() {
        let mut state = LessonState::new();
        let mut receiver = state.subscribe();
        state.set_current(Lesson::MociConjugation);
        state.set_current(Lesson::MociConjugation);

        assert_eq!(
            receiver.next().now_or_never(),
            Some(Some(Lesson::NounsDeclination))
        );
        assert_eq!(
            receiver.next().now_or_never(),
            Some(Some(Lesson::MociConjugation))
        );
        assert_eq!(
            receiver.next().now_or_never(),
            Some(Some(Lesson::MociConjugation))
        );
        assert_eq!(receiver.next().now_or_never(), None);
    }

    #[test]
    fn dropped_subscribers_are_forgotten() {
        let mut state = LessonState::new();
        drop(state.subscribe());
        state.set_current(Lesson::HtetiConjugation);
        assert!(state.subscribers.is_empty());
    }

    #[test]
    fn state_is_restored_from_its_log() {
        let mut state = LessonState::new();
        state.set_current(Lesson::BitiConjugation);
        state.set_current(Lesson::PersonalPronounsDeclination);

        let jsons = state.log().to_jsons().unwrap();
        assert_eq!(jsons[1].event["version"], "V1");
        assert_eq!(
            jsons[1].event["SelectLesson"],
            "personal-pronouns-declination"
        );

        let restored = LessonState::from_log(EventLog::from_jsons(jsons).unwrap());
        assert_eq!(restored.current(), Lesson::PersonalPronounsDeclination);
        assert_eq!(LessonState::from_log(EventLog::new()).current(), Lesson::NounsDeclination);
    }
}
