//! Grammatical dimensions a Serbian word form can be tagged with.
//!
//! Every enum lists its values in the order used whenever the "observed values" of a
//! dimension are collected, so a given variant set always produces the same ordering.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub trait Dimension: Copy + Ord + std::fmt::Debug + std::fmt::Display {
    fn name() -> &'static str;
    fn get(slot: &Slot) -> Option<Self>;
    fn set(self, slot: &mut Slot);
}

/// Number. Reflexive pronouns and other words without number are tagged singular in the word lists.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    parse_display::Display,
)]
#[serde(rename_all = "snake_case")]
#[display(style = "snake_case")]
pub enum Plurality {
    Singular,
    Plural,
}

/// The seven cases of Serbian nominal declension.
///
/// The nominative singular is the main form of a declined word, so exercises never ask for it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    parse_display::Display,
)]
#[serde(rename_all = "snake_case")]
#[display(style = "snake_case")]
pub enum Case {
    Nominative,
    Genitive,
    Dative,
    Accusative,
    Vocative,
    Instrumental,
    Locative,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    parse_display::Display,
)]
#[serde(rename_all = "snake_case")]
#[display(style = "snake_case")]
pub enum Gender {
    Masculine,
    Feminine,
    Neuter,
}

/// Clitic (short) versus stressed (long) forms, e.g. "ме" / "мене", or "сам" / "јесам".
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    parse_display::Display,
)]
#[serde(rename_all = "snake_case")]
#[display(style = "snake_case")]
pub enum Form {
    Short,
    Long,
}

/// Animacy decides between genitive-like and nominative-like accusatives ("мога" / "мој", "кога" / "шта").
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    parse_display::Display,
)]
#[serde(rename_all = "snake_case")]
#[display(style = "snake_case")]
pub enum Animation {
    Animate,
    Inanimate,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    parse_display::Display,
)]
#[serde(rename_all = "snake_case")]
#[display(style = "snake_case")]
pub enum Person {
    First,
    Second,
    Third,
}

/// A combination of dimension values, any of which may be left open.
///
/// Used both to describe what a variant is tagged with and to describe what an exercise asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plurality: Option<Plurality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<Case>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<Form>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
}

impl Slot {
    pub fn with<D: Dimension>(mut self, value: D) -> Self {
        value.set(&mut self);
        self
    }

    pub fn with_opt<D: Dimension>(self, value: Option<D>) -> Self {
        match value {
            Some(value) => self.with(value),
            None => self,
        }
    }

    /// Exact matching: every dimension set on `self` must be set to the same value on `tags`.
    pub fn selects(&self, tags: &Slot) -> bool {
        fn exact<T: PartialEq>(wanted: Option<T>, actual: Option<T>) -> bool {
            wanted.is_none() || wanted == actual
        }
        exact(self.plurality, tags.plurality)
            && exact(self.case, tags.case)
            && exact(self.gender, tags.gender)
            && exact(self.form, tags.form)
            && exact(self.animation, tags.animation)
            && exact(self.person, tags.person)
    }

    /// Wildcard matching: a dimension left unset on `tags` applies to every value of that dimension.
    pub fn admits(&self, tags: &Slot) -> bool {
        fn wildcard<T: PartialEq>(wanted: Option<T>, actual: Option<T>) -> bool {
            match (wanted, actual) {
                (Some(wanted), Some(actual)) => wanted == actual,
                _ => true,
            }
        }
        wildcard(self.plurality, tags.plurality)
            && wildcard(self.case, tags.case)
            && wildcard(self.gender, tags.gender)
            && wildcard(self.form, tags.form)
            && wildcard(self.animation, tags.animation)
            && wildcard(self.person, tags.person)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = [
            self.plurality.map(|v| v.to_string()),
            self.case.map(|v| v.to_string()),
            self.person.map(|v| v.to_string()),
            self.gender.map(|v| v.to_string()),
            self.form.map(|v| v.to_string()),
            self.animation.map(|v| v.to_string()),
        ];
        let parts = parts.into_iter().flatten().collect::<Vec<_>>();
        if parts.is_empty() {
            write!(f, "any")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

macro_rules! dimension {
    ($ty:ty, $field:ident, $name:literal) => {
        impl Dimension for $ty {
            fn name() -> &'static str {
                $name
            }
            fn get(slot: &Slot) -> Option<Self> {
                slot.$field
            }
            fn set(self, slot: &mut Slot) {
                slot.$field = Some(self);
            }
        }
    };
}

dimension!(Plurality, plurality, "plurality");
dimension!(Case, case, "case");
dimension!(Gender, gender, "gender");
dimension!(Form, form, "form");
dimension!(Animation, animation, "animation");
dimension!(Person, person, "person");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_selection_ignores_open_dimensions() {
        let filter = Slot::default()
            .with(Plurality::Singular)
            .with(Case::Genitive);
        let tags = Slot::default()
            .with(Plurality::Singular)
            .with(Case::Genitive)
            .with(Form::Long);
        assert!(filter.selects(&tags));
        assert!(!filter.with(Form::Short).selects(&tags));
        // unset on the variant does not satisfy an exact filter
        assert!(!filter.with(Gender::Feminine).selects(&tags));
    }

    #[test]
    fn wildcard_admits_untagged_dimensions() {
        let request = Slot::default()
            .with(Plurality::Singular)
            .with(Case::Instrumental)
            .with(Gender::Feminine);
        let untagged = Slot::default()
            .with(Plurality::Singular)
            .with(Case::Instrumental);
        let masculine = untagged.with(Gender::Masculine);
        assert!(request.admits(&untagged));
        assert!(!request.admits(&masculine));
    }

    #[test]
    fn slot_display_lists_set_dimensions() {
        let slot = Slot::default()
            .with(Plurality::Plural)
            .with(Case::Dative)
            .with(Form::Short);
        assert_eq!(slot.to_string(), "plural, dative, short");
        assert_eq!(Slot::default().to_string(), "any");
    }
}
