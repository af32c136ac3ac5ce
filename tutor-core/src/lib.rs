//! Exercise selection and grading for a Serbian grammar tutor.
//!
//! A [`Tutor`] owns one learner session. For the active [`Lesson`] it picks a main form
//! (favouring words the learner gets wrong), draws a grammatical slot for it, and resolves
//! the slot to the one correct form. Answers are graded by exact comparison and fed back
//! into the progress store.

pub mod conjugation;
pub mod database;
pub mod lesson;
pub mod next_word;
pub mod progress;
pub mod resolve;

use futures::channel::mpsc::UnboundedReceiver;
use grammar_utils::features::Slot;
use grammar_utils::{
    Aspect, CaseVariant, Inflection, Paradigm, PersonVariant, WordEntry, WordListError,
};
use word_sampler::Chooser;

pub use crate::database::{LessonSource, StaticWordDatabase, WordDatabase, builtin_lessons};
pub use crate::lesson::{Lesson, LessonMap, LessonState, Policy};
pub use crate::next_word::WordSelector;
pub use crate::progress::{LearningProgress, LessonStatistics, ProgressStore, WordStatistic};

#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    #[error("no word {main_form:?} in the database")]
    NotFound { main_form: String },
    #[error("lesson {0} has no words")]
    EmptyLesson(Lesson),
    #[error("{} forms of {main_form:?} match {request}: {}", .words.len(), .words.join(", "))]
    DataIntegrity {
        main_form: String,
        request: Slot,
        words: Vec<String>,
    },
    #[error("{main_form:?} has no form for {request}")]
    NoMatch { main_form: String, request: Slot },
    #[error("{main_form:?} cannot be drilled in lesson {lesson}")]
    ParadigmMismatch { lesson: Lesson, main_form: String },
    #[error("lesson {0} does not produce this kind of exercise")]
    WrongLessonKind(Lesson),
    #[error("{main_form:?} has no conjugation rule to ask about in lesson {lesson}")]
    MissingRule { lesson: Lesson, main_form: String },
    #[error("malformed word list: {0}")]
    WordList(#[from] WordListError),
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CaseExercise {
    pub main_form: String,
    pub exercise_case: CaseVariant,
    /// Every distinct form of the word, for multiple choice.
    pub possible_variants: Vec<String>,
    pub correct_answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ConjugationExercise {
    pub main_form: String,
    pub aspect: Option<Aspect>,
    pub exercise_person: PersonVariant,
    pub possible_variants: Vec<String>,
    pub correct_answer: String,
}

/// Which present tense rule does the verb follow? The answer is the rule's description.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RuleExercise {
    pub main_form: String,
    pub aspect: Option<Aspect>,
    /// Every rule the lesson's database knows.
    pub possible_variants: Vec<String>,
    pub correct_answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Exercise {
    Case(CaseExercise),
    Conjugation(ConjugationExercise),
    Rule(RuleExercise),
}

impl Exercise {
    pub fn main_form(&self) -> &str {
        match self {
            Exercise::Case(exercise) => &exercise.main_form,
            Exercise::Conjugation(exercise) => &exercise.main_form,
            Exercise::Rule(exercise) => &exercise.main_form,
        }
    }

    pub fn correct_answer(&self) -> &str {
        match self {
            Exercise::Case(exercise) => &exercise.correct_answer,
            Exercise::Conjugation(exercise) => &exercise.correct_answer,
            Exercise::Rule(exercise) => &exercise.correct_answer,
        }
    }

    pub fn possible_variants(&self) -> &[String] {
        match self {
            Exercise::Case(exercise) => &exercise.possible_variants,
            Exercise::Conjugation(exercise) => &exercise.possible_variants,
            Exercise::Rule(exercise) => &exercise.possible_variants,
        }
    }

    /// What the learner is asked for. Rule exercises ask for no particular form.
    pub fn slot(&self) -> Slot {
        match self {
            Exercise::Case(exercise) => exercise.exercise_case.slot(),
            Exercise::Conjugation(exercise) => exercise.exercise_person.slot(),
            Exercise::Rule(_) => Slot::default(),
        }
    }

    pub fn aspect(&self) -> Option<Aspect> {
        match self {
            Exercise::Case(_) => None,
            Exercise::Conjugation(exercise) => exercise.aspect,
            Exercise::Rule(exercise) => exercise.aspect,
        }
    }
}

/// Build an exercise for `entry` the way `policy` draws slots.
///
/// `rules` are the rule descriptions offered as choices when `policy` asks for a rule.
pub fn exercise_for(
    lesson: Lesson,
    policy: Policy,
    entry: &WordEntry,
    rules: &[String],
    chooser: &mut impl Chooser,
) -> Result<Exercise, TutorError> {
    let main_form = entry.main_form.as_str();
    let no_match = |request: Slot| {
        log::warn!("{main_form:?} has no form for {request}");
        TutorError::NoMatch {
            main_form: main_form.to_string(),
            request,
        }
    };

    let exercise = match (policy, &entry.paradigm) {
        (Policy::PluralityFirst, Paradigm::Declension(variants)) => {
            let request = resolve::draw_plurality_first(variants, chooser);
            let variant = resolve::find_case_variant(main_form, variants, &request)?
                .ok_or_else(|| no_match(request))?;
            case_exercise(entry, variant)
        }
        (Policy::CaseFirst, Paradigm::Declension(variants)) => {
            let request = resolve::draw_case_first(variants, chooser);
            let variant = resolve::find_case_variant_by_case(main_form, variants, &request)?
                .ok_or_else(|| no_match(request))?;
            case_exercise(entry, variant)
        }
        (Policy::Conjugation, Paradigm::Conjugation(variants)) => {
            let request = conjugation::draw_person(variants, chooser);
            let variant = conjugation::find_person_variant(main_form, variants, &request)?
                .ok_or_else(|| no_match(request))?;
            Exercise::Conjugation(ConjugationExercise {
                main_form: main_form.to_string(),
                aspect: entry.aspect,
                exercise_person: variant.clone(),
                possible_variants: entry.surface_forms(),
                correct_answer: variant.word.clone(),
            })
        }
        (Policy::ConjugationRule, Paradigm::Conjugation(_)) => {
            let rule = entry.rule.clone().ok_or_else(|| TutorError::MissingRule {
                lesson,
                main_form: main_form.to_string(),
            })?;
            Exercise::Rule(RuleExercise {
                main_form: main_form.to_string(),
                aspect: entry.aspect,
                possible_variants: rules.to_vec(),
                correct_answer: rule,
            })
        }
        (policy, paradigm) => {
            log::warn!(
                "{main_form:?} is a {} word but lesson {lesson} drills {} words",
                paradigm.kind(),
                policy.kind()
            );
            return Err(TutorError::ParadigmMismatch {
                lesson,
                main_form: main_form.to_string(),
            });
        }
    };
    match &exercise {
        Exercise::Rule(_) => log::debug!("Asking for the rule {main_form:?} follows"),
        _ => log::debug!("Asking for {main_form:?} as {}", exercise.slot()),
    }
    Ok(exercise)
}

fn case_exercise(entry: &WordEntry, variant: &CaseVariant) -> Exercise {
    Exercise::Case(CaseExercise {
        main_form: entry.main_form.clone(),
        exercise_case: variant.clone(),
        possible_variants: entry.surface_forms(),
        correct_answer: variant.word.clone(),
    })
}

/// One learner's session: which lesson is active, what they know, and what to ask next.
pub struct Tutor<D, S, C> {
    lessons: LessonMap<LessonSource<D>>,
    progress: S,
    lesson: LessonState,
    selector: WordSelector<C>,
}

impl<D, S, C> Tutor<D, S, C>
where
    D: WordDatabase,
    S: ProgressStore,
    C: Chooser,
{
    pub fn new(
        lessons: LessonMap<LessonSource<D>>,
        progress: S,
        lesson: LessonState,
        chooser: C,
    ) -> Self {
        Self {
            lessons,
            progress,
            lesson,
            selector: WordSelector::new(chooser),
        }
    }

    pub fn current_lesson(&self) -> Lesson {
        self.lesson.current()
    }

    /// Switch lessons. Statistics are kept per lesson, so nothing is reset.
    pub fn select_lesson(&mut self, lesson: Lesson) -> Result<Lesson, TutorError> {
        Ok(self.lesson.set_current(lesson))
    }

    pub fn subscribe_lesson(&mut self) -> UnboundedReceiver<Lesson> {
        self.lesson.subscribe()
    }

    pub fn subscribe_lesson_statistics(
        &self,
        lesson: Lesson,
    ) -> UnboundedReceiver<LessonStatistics> {
        self.progress.subscribe_lesson_statistics(lesson)
    }

    /// Whether the active lesson asks for conjugation rules rather than forms.
    pub fn current_lesson_has_rules(&self) -> bool {
        self.lessons.get(&self.lesson.current()).policy == Policy::ConjugationRule
    }

    pub fn lessons(&self) -> &LessonMap<LessonSource<D>> {
        &self.lessons
    }

    pub fn progress(&self) -> &S {
        &self.progress
    }

    pub fn lesson_state(&self) -> &LessonState {
        &self.lesson
    }

    pub async fn next_exercise(&mut self) -> Result<Exercise, TutorError> {
        let lesson = self.lesson.current();
        let source = self.lessons.get(&lesson);
        let main_forms = source.database.main_forms().await?;
        let main_form = self
            .selector
            .next_main_form(&self.progress, lesson, &main_forms)
            .await?;
        let entry = source.database.word(&main_form).await?;
        let rules = match source.policy {
            Policy::ConjugationRule => source.database.rules().await?,
            _ => Vec::new(),
        };
        exercise_for(lesson, source.policy, &entry, &rules, self.selector.chooser())
    }

    pub async fn next_case_exercise(&mut self) -> Result<CaseExercise, TutorError> {
        let lesson = self.ensure_policy(&[Policy::PluralityFirst, Policy::CaseFirst])?;
        match self.next_exercise().await? {
            Exercise::Case(exercise) => Ok(exercise),
            _ => Err(TutorError::WrongLessonKind(lesson)),
        }
    }

    pub async fn next_conjugation_exercise(&mut self) -> Result<ConjugationExercise, TutorError> {
        let lesson = self.ensure_policy(&[Policy::Conjugation])?;
        match self.next_exercise().await? {
            Exercise::Conjugation(exercise) => Ok(exercise),
            _ => Err(TutorError::WrongLessonKind(lesson)),
        }
    }

    pub async fn next_rule_exercise(&mut self) -> Result<RuleExercise, TutorError> {
        let lesson = self.ensure_policy(&[Policy::ConjugationRule])?;
        match self.next_exercise().await? {
            Exercise::Rule(exercise) => Ok(exercise),
            _ => Err(TutorError::WrongLessonKind(lesson)),
        }
    }

    fn ensure_policy(&self, policies: &[Policy]) -> Result<Lesson, TutorError> {
        let lesson = self.lesson.current();
        if policies.contains(&self.lessons.get(&lesson).policy) {
            Ok(lesson)
        } else {
            Err(TutorError::WrongLessonKind(lesson))
        }
    }

    /// Grade an answer and record it against the current lesson.
    pub async fn check_answer(
        &self,
        answer: &str,
        exercise: &Exercise,
    ) -> Result<bool, TutorError> {
        let lesson = self.lesson.current();
        let correct = answer == exercise.correct_answer();
        if correct {
            self.progress
                .record_correct(lesson, exercise.main_form())
                .await?;
        } else {
            self.progress
                .record_wrong(lesson, exercise.main_form())
                .await?;
        }
        log::debug!(
            "{answer:?} for {:?} in {lesson}: {}",
            exercise.main_form(),
            if correct { "correct" } else { "wrong" }
        );
        Ok(correct)
    }

    pub async fn lesson_statistics(&self, lesson: Lesson) -> Result<LessonStatistics, TutorError> {
        self.progress.lesson_statistics(lesson).await
    }
}
