use std::rc::Rc;

use grammar_utils::{ParadigmKind, WordEntry, WordList, WordListError};
use indexmap::IndexMap;

use crate::TutorError;
use crate::lesson::{Lesson, LessonMap, Policy};

/// A source of main forms and their inflected variants.
#[allow(async_fn_in_trait)]
pub trait WordDatabase {
    /// Every main form, in the database's own order.
    async fn main_forms(&self) -> Result<Vec<String>, TutorError>;
    async fn word(&self, main_form: &str) -> Result<WordEntry, TutorError>;

    /// Descriptions of the conjugation rules the words follow, for multiple choice.
    async fn rules(&self) -> Result<Vec<String>, TutorError> {
        Ok(Vec::new())
    }
}

/// A word database held entirely in memory.
#[derive(Clone, Debug)]
pub struct StaticWordDatabase {
    kind: ParadigmKind,
    words: IndexMap<String, WordEntry>,
    rules: Vec<String>,
}

impl StaticWordDatabase {
    pub fn from_word_list(list: WordList) -> Result<Self, TutorError> {
        let kind = list.kind();
        let rules = list.rule_descriptions();
        Ok(Self {
            kind,
            words: list.into_entries()?,
            rules,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, TutorError> {
        let list = WordList::from_json(json).map_err(WordListError::from)?;
        Self::from_word_list(list)
    }

    pub fn kind(&self) -> ParadigmKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordDatabase for StaticWordDatabase {
    async fn main_forms(&self) -> Result<Vec<String>, TutorError> {
        Ok(self.words.keys().cloned().collect())
    }

    async fn word(&self, main_form: &str) -> Result<WordEntry, TutorError> {
        self.words
            .get(main_form)
            .cloned()
            .ok_or_else(|| TutorError::NotFound {
                main_form: main_form.to_string(),
            })
    }

    async fn rules(&self) -> Result<Vec<String>, TutorError> {
        Ok(self.rules.clone())
    }
}

/// The database a lesson draws from, and how it picks a slot.
#[derive(Debug)]
pub struct LessonSource<D> {
    pub database: Rc<D>,
    pub policy: Policy,
}

impl<D> LessonSource<D> {
    pub fn new(database: Rc<D>, policy: Policy) -> Self {
        Self { database, policy }
    }
}

impl<D> Clone for LessonSource<D> {
    fn clone(&self) -> Self {
        Self {
            database: Rc::clone(&self.database),
            policy: self.policy,
        }
    }
}

const PERSONAL_PRONOUNS: &str = include_str!("../data/personal_pronouns.json");
const REFLEXIVE_PRONOUNS: &str = include_str!("../data/reflexive_pronouns.json");
const POSSESSIVE_PRONOUNS: &str = include_str!("../data/possessive_pronouns.json");
const INTERROGATIVE_PRONOUNS: &str = include_str!("../data/interrogative_pronouns.json");
const CASES_INTERROGATIVES: &str = include_str!("../data/cases_interrogatives.json");
const NOUNS: &str = include_str!("../data/nouns.json");
const BITI: &str = include_str!("../data/biti.json");
const HTETI: &str = include_str!("../data/hteti.json");
const MOCI: &str = include_str!("../data/moci.json");
const VERBS: &str = include_str!("../data/verbs.json");

/// Every lesson wired to the word lists bundled with the crate.
pub fn builtin_lessons() -> Result<LessonMap<LessonSource<StaticWordDatabase>>, TutorError> {
    let load = |json: &str| StaticWordDatabase::from_json(json).map(Rc::new);
    let verbs = load(VERBS)?;

    LessonMap::try_from_fn(|lesson| {
        let database = match lesson {
            Lesson::PersonalPronounsDeclination => load(PERSONAL_PRONOUNS)?,
            Lesson::ReflexivePronounsDeclination => load(REFLEXIVE_PRONOUNS)?,
            Lesson::PossessivePronounsDeclination => load(POSSESSIVE_PRONOUNS)?,
            Lesson::InterrogativePronounsDeclination => load(INTERROGATIVE_PRONOUNS)?,
            Lesson::CasesInterrogativesDeclination => load(CASES_INTERROGATIVES)?,
            Lesson::NounsDeclination => load(NOUNS)?,
            Lesson::BitiConjugation => load(BITI)?,
            Lesson::HtetiConjugation => load(HTETI)?,
            Lesson::MociConjugation => load(MOCI)?,
            Lesson::VerbsConjugation | Lesson::VerbsConjugationForms => Rc::clone(&verbs),
        };
        let policy = match lesson {
            Lesson::CasesInterrogativesDeclination => Policy::CaseFirst,
            Lesson::BitiConjugation
            | Lesson::HtetiConjugation
            | Lesson::MociConjugation
            | Lesson::VerbsConjugation => Policy::Conjugation,
            Lesson::VerbsConjugationForms => Policy::ConjugationRule,
            _ => Policy::PluralityFirst,
        };
        Ok(LessonSource::new(database, policy))
    })
}
