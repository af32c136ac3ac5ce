use grammar_utils::features::{Form, Person, Plurality, Slot};
use grammar_utils::{Inflection, PersonVariant, available_values};
use word_sampler::{Chooser, pick};

use crate::TutorError;
use crate::resolve::{draw, single};

/// Extra copies of (plural, third person) in the draw pool.
///
/// Third person plural endings are the ones learners get wrong most, so they come up about
/// five times as often as any other person.
pub const THIRD_PLURAL_BONUS: usize = 4;

/// Every (plurality, person) pair the verb has, with the third person plural repeated.
pub fn person_pool(variants: &[PersonVariant]) -> Vec<(Plurality, Person)> {
    let mut pool = Vec::new();
    for plurality in available_values::<Plurality, _>(variants, &Slot::default()) {
        let persons: Vec<Person> = available_values(variants, &Slot::default().with(plurality));
        pool.extend(persons.iter().map(|person| (plurality, *person)));
        if plurality == Plurality::Plural && persons.contains(&Person::Third) {
            pool.extend(std::iter::repeat_n(
                (plurality, Person::Third),
                THIRD_PLURAL_BONUS,
            ));
        }
    }
    pool
}

pub fn draw_person(variants: &[PersonVariant], chooser: &mut impl Chooser) -> Slot {
    let Some((plurality, person)) = pick(chooser, &person_pool(variants)) else {
        return Slot::default();
    };
    let request = Slot::default().with(plurality).with(person);
    request.with_opt(draw::<Form, _>(variants, &request, chooser))
}

/// The variant with exactly the requested person, plurality and, if the request has one, form.
pub fn find_person_variant<'a>(
    main_form: &str,
    variants: &'a [PersonVariant],
    request: &Slot,
) -> Result<Option<&'a PersonVariant>, TutorError> {
    if request.person.is_none() || request.plurality.is_none() {
        return Ok(None);
    }
    let candidates = variants
        .iter()
        .filter(|variant| request.selects(&variant.slot()))
        .collect();
    single(main_form, request, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use word_sampler::{RandomChooser, ScriptedChooser};

    const PERSONS: [(Plurality, Person); 6] = [
        (Plurality::Singular, Person::First),
        (Plurality::Singular, Person::Second),
        (Plurality::Singular, Person::Third),
        (Plurality::Plural, Person::First),
        (Plurality::Plural, Person::Second),
        (Plurality::Plural, Person::Third),
    ];

    fn conjugate(words: [&str; 6], form: Option<Form>) -> Vec<PersonVariant> {
        PERSONS
            .iter()
            .zip(words)
            .map(|((plurality, person), word)| PersonVariant {
                word: word.to_string(),
                person: *person,
                plurality: *plurality,
                form,
            })
            .collect()
    }

    fn biti() -> Vec<PersonVariant> {
        let mut variants = conjugate(["сам", "си", "је", "смо", "сте", "су"], Some(Form::Short));
        variants.extend(conjugate(
            ["јесам", "јеси", "јесте", "јесмо", "јесте", "јесу"],
            Some(Form::Long),
        ));
        variants
    }

    #[test]
    fn third_plural_is_five_times_as_likely() {
        let pool = person_pool(&conjugate(
            ["могу", "можеш", "може", "можемо", "можете", "могу"],
            None,
        ));
        assert_eq!(pool.len(), 10);
        let third_plural = pool
            .iter()
            .filter(|pair| **pair == (Plurality::Plural, Person::Third))
            .count();
        assert_eq!(third_plural, 5);
        for pair in &PERSONS[..5] {
            assert_eq!(pool.iter().filter(|p| *p == pair).count(), 1);
        }
    }

    #[test]
    fn no_bonus_without_third_plural() {
        let singular_only = conjugate(["a", "b", "c", "d", "e", "f"], None)
            .into_iter()
            .take(3)
            .collect::<Vec<_>>();
        assert_eq!(person_pool(&singular_only).len(), 3);
    }

    #[test]
    fn forms_are_drawn_when_the_verb_has_them() {
        let variants = biti();
        // pool index 0 is singular first person, then the second form (long)
        let mut chooser = ScriptedChooser::new([0, 1]);
        let request = draw_person(&variants, &mut chooser);
        assert_eq!(request.form, Some(Form::Long));
        let found = find_person_variant("бити", &variants, &request)
            .unwrap()
            .unwrap();
        assert_eq!(found.word, "јесам");
    }

    #[test]
    fn every_draw_resolves() {
        let variants = biti();
        let mut chooser = RandomChooser::seeded(11);
        for _ in 0..200 {
            let request = draw_person(&variants, &mut chooser);
            assert!(
                find_person_variant("бити", &variants, &request)
                    .unwrap()
                    .is_some()
            );
        }
    }

    #[test]
    fn missing_form_is_ambiguous_for_verbs_with_forms() {
        let variants = biti();
        let request = Slot::default()
            .with(Plurality::Plural)
            .with(Person::Third);
        assert!(matches!(
            find_person_variant("бити", &variants, &request),
            Err(TutorError::DataIntegrity { .. })
        ));
    }

    #[test]
    fn absent_person_is_no_match() {
        let variants = conjugate(["a", "b", "c", "d", "e", "f"], None);
        let request = Slot::default()
            .with(Plurality::Plural)
            .with(Person::Third)
            .with(Form::Short);
        assert_eq!(find_person_variant("x", &variants, &request).unwrap(), None);
        assert_eq!(find_person_variant("x", &[], &Slot::default()).unwrap(), None);
    }
}
