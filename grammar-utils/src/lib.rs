pub mod features;

use std::collections::BTreeSet;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::features::{Animation, Case, Dimension, Form, Gender, Person, Plurality, Slot};

/// Anything that carries a surface word tagged with grammatical dimensions.
pub trait Inflection {
    fn word(&self) -> &str;
    fn slot(&self) -> Slot;
}

/// One declined form of a noun or pronoun.
///
/// Optional dimensions that are left out apply to every value of that dimension:
/// "мном" carries no gender because it is the instrumental of "ја" regardless of gender.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CaseVariant {
    pub word: String,
    pub case: Case,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plurality: Option<Plurality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<Form>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
}

impl Inflection for CaseVariant {
    fn word(&self) -> &str {
        &self.word
    }

    fn slot(&self) -> Slot {
        Slot {
            plurality: self.plurality,
            case: Some(self.case),
            gender: self.gender,
            form: self.form,
            animation: self.animation,
            person: None,
        }
    }
}

/// One conjugated (present tense) form of a verb.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PersonVariant {
    pub word: String,
    pub person: Person,
    pub plurality: Plurality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<Form>,
}

impl Inflection for PersonVariant {
    fn word(&self) -> &str {
        &self.word
    }

    fn slot(&self) -> Slot {
        Slot {
            plurality: Some(self.plurality),
            person: Some(self.person),
            form: self.form,
            ..Slot::default()
        }
    }
}

/// Verbal aspect.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    parse_display::Display,
)]
#[serde(rename_all = "snake_case")]
#[display(style = "snake_case")]
pub enum Aspect {
    Perfective,
    Imperfective,
}

impl Aspect {
    /// The term a Serbian grammar book uses.
    pub fn term(self) -> &'static str {
        match self {
            Aspect::Perfective => "свршени",
            Aspect::Imperfective => "несвршени",
        }
    }
}

/// A verb as it appears in a conjugation word list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VerbForms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<Aspect>,
    /// Key into the `rules` of the same list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    pub persons: Vec<PersonVariant>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Paradigm {
    Declension(Vec<CaseVariant>),
    Conjugation(Vec<PersonVariant>),
}

impl Paradigm {
    pub fn kind(&self) -> ParadigmKind {
        match self {
            Paradigm::Declension(_) => ParadigmKind::Declension,
            Paradigm::Conjugation(_) => ParadigmKind::Conjugation,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, parse_display::Display)]
#[display(style = "snake_case")]
pub enum ParadigmKind {
    Declension,
    Conjugation,
}

/// A main (dictionary) form together with all of its inflected variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordEntry {
    pub main_form: String,
    pub paradigm: Paradigm,
    pub aspect: Option<Aspect>,
    /// Description of the conjugation rule the verb follows, e.g. "-ам, -аш, -а, -амо, -ате, -ају".
    pub rule: Option<String>,
}

impl WordEntry {
    pub fn new(main_form: impl Into<String>, paradigm: Paradigm) -> Self {
        Self {
            main_form: main_form.into(),
            paradigm,
            aspect: None,
            rule: None,
        }
    }

    /// Every distinct surface form of the word, in first-seen order.
    pub fn surface_forms(&self) -> Vec<String> {
        fn distinct<'a>(words: impl Iterator<Item = &'a str>) -> Vec<String> {
            let mut seen = BTreeSet::new();
            words
                .filter(|word| seen.insert(*word))
                .map(str::to_string)
                .collect()
        }
        match &self.paradigm {
            Paradigm::Declension(variants) => distinct(variants.iter().map(Inflection::word)),
            Paradigm::Conjugation(variants) => distinct(variants.iter().map(Inflection::word)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WordListError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{main_form:?} follows rule {rule:?}, which the list does not define")]
    UnknownRule { main_form: String, rule: String },
}

/// The on-disk format of a word database.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "paradigm", rename_all = "snake_case")]
pub enum WordList {
    Declension {
        words: IndexMap<String, Vec<CaseVariant>>,
    },
    Conjugation {
        /// Conjugation rules by key, each with the description a learner has to name.
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        rules: IndexMap<String, String>,
        words: IndexMap<String, VerbForms>,
    },
}

impl WordList {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn kind(&self) -> ParadigmKind {
        match self {
            WordList::Declension { .. } => ParadigmKind::Declension,
            WordList::Conjugation { .. } => ParadigmKind::Conjugation,
        }
    }

    /// Rule descriptions in the order the list defines them.
    pub fn rule_descriptions(&self) -> Vec<String> {
        match self {
            WordList::Declension { .. } => Vec::new(),
            WordList::Conjugation { rules, .. } => rules.values().cloned().collect(),
        }
    }

    /// Entries keyed by main form, keeping the order of the file.
    pub fn into_entries(self) -> Result<IndexMap<String, WordEntry>, WordListError> {
        match self {
            WordList::Declension { words } => Ok(words
                .into_iter()
                .map(|(main_form, variants)| {
                    let entry = WordEntry::new(main_form.clone(), Paradigm::Declension(variants));
                    (main_form, entry)
                })
                .collect()),
            WordList::Conjugation { rules, words } => words
                .into_iter()
                .map(|(main_form, verb)| {
                    let rule = match verb.rule {
                        Some(key) => match rules.get(&key) {
                            Some(description) => Some(description.clone()),
                            None => {
                                return Err(WordListError::UnknownRule {
                                    main_form,
                                    rule: key,
                                });
                            }
                        },
                        None => None,
                    };
                    let entry = WordEntry {
                        aspect: verb.aspect,
                        rule,
                        ..WordEntry::new(main_form.clone(), Paradigm::Conjugation(verb.persons))
                    };
                    Ok((main_form, entry))
                })
                .collect(),
        }
    }
}

/// The distinct values of dimension `D` carried by the variants that `filter` selects exactly.
///
/// Variants that leave `D` unset contribute nothing. Values come back in declaration order.
pub fn available_values<D, V>(variants: &[V], filter: &Slot) -> Vec<D>
where
    D: Dimension,
    V: Inflection,
{
    variants
        .iter()
        .map(Inflection::slot)
        .filter(|tags| filter.selects(tags))
        .filter_map(|tags| D::get(&tags))
        .collect::<BTreeSet<D>>()
        .into_iter()
        .collect()
}
