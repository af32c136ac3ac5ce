//! Turning a declined word into a fully specified slot, and that slot back into one variant.
//!
//! Drawing and resolving are separate steps so a caller can resolve a slot it built by hand.
//! A slot drawn from a word's own variants always names at least one of them, so the
//! interesting failure is the opposite one: a word list that tags two variants the same
//! way. That is reported as [`TutorError::DataIntegrity`] and never settled by taking the
//! first match.

use grammar_utils::features::{Animation, Case, Dimension, Form, Gender, Plurality, Slot};
use grammar_utils::{CaseVariant, Inflection, available_values};
use word_sampler::{Chooser, pick};

use crate::TutorError;

/// Draw plurality, then a case seen with it, then gender, form and animacy where the word has them.
///
/// The nominative singular is the main form itself, so it is never drawn.
pub fn draw_plurality_first(variants: &[CaseVariant], chooser: &mut impl Chooser) -> Slot {
    let request = Slot::default();

    let Some(plurality) = draw::<Plurality, _>(variants, &request, chooser) else {
        return request;
    };
    let request = request.with(plurality);

    let cases = available_values::<Case, _>(variants, &request)
        .into_iter()
        .filter(|case| !(plurality == Plurality::Singular && *case == Case::Nominative))
        .collect::<Vec<_>>();
    let Some(case) = pick(chooser, &cases) else {
        return request;
    };
    let request = request.with(case);

    let request = request.with_opt(draw::<Gender, _>(variants, &request, chooser));

    // form and animacy are each narrowed by (plurality, case, gender), not by each other
    let form = draw::<Form, _>(variants, &request, chooser);
    let animation = draw::<Animation, _>(variants, &request, chooser);
    request.with_opt(form).with_opt(animation)
}

/// Draw a case, then plurality, animacy and form independently from everything the word has.
///
/// Gender is never drawn, so words resolved this way must not split a case by gender.
pub fn draw_case_first(variants: &[CaseVariant], chooser: &mut impl Chooser) -> Slot {
    let everything = Slot::default();
    let case = draw::<Case, _>(variants, &everything, chooser);
    let plurality = draw::<Plurality, _>(variants, &everything, chooser);
    let animation = draw::<Animation, _>(variants, &everything, chooser);
    let form = draw::<Form, _>(variants, &everything, chooser);

    everything
        .with_opt(case)
        .with_opt(plurality)
        .with_opt(animation)
        .with_opt(form)
}

/// Draw one of the values of `D` that the variants selected by `filter` carry.
pub(crate) fn draw<D: Dimension, V: Inflection>(
    variants: &[V],
    filter: &Slot,
    chooser: &mut impl Chooser,
) -> Option<D> {
    let values: Vec<D> = available_values(variants, filter);
    let drawn = pick(chooser, &values);
    log::trace!("{} {drawn:?} drawn from {values:?}", D::name());
    drawn
}

/// The variant for a request holding at least a plurality and a case.
///
/// A single variant with that plurality and case is returned whatever else the request holds.
/// Otherwise the remaining dimensions narrow the candidates, with dimensions a variant leaves
/// unset matching anything.
pub fn find_case_variant<'a>(
    main_form: &str,
    variants: &'a [CaseVariant],
    request: &Slot,
) -> Result<Option<&'a CaseVariant>, TutorError> {
    let (Some(plurality), Some(case)) = (request.plurality, request.case) else {
        return Ok(None);
    };
    let filter = Slot::default().with(plurality).with(case);
    narrow(main_form, variants, &filter, request)
}

/// Like [`find_case_variant`], but only the case has to match exactly.
pub fn find_case_variant_by_case<'a>(
    main_form: &str,
    variants: &'a [CaseVariant],
    request: &Slot,
) -> Result<Option<&'a CaseVariant>, TutorError> {
    let Some(case) = request.case else {
        return Ok(None);
    };
    narrow(main_form, variants, &Slot::default().with(case), request)
}

fn narrow<'a, V: Inflection>(
    main_form: &str,
    variants: &'a [V],
    filter: &Slot,
    request: &Slot,
) -> Result<Option<&'a V>, TutorError> {
    let candidates = variants
        .iter()
        .filter(|variant| filter.selects(&variant.slot()))
        .collect::<Vec<_>>();
    if let [only] = candidates.as_slice() {
        return Ok(Some(*only));
    }
    let admitted = candidates
        .into_iter()
        .filter(|variant| request.admits(&variant.slot()))
        .collect();
    single(main_form, request, admitted)
}

/// At most one variant may be left after filtering.
pub(crate) fn single<'a, V: Inflection>(
    main_form: &str,
    request: &Slot,
    candidates: Vec<&'a V>,
) -> Result<Option<&'a V>, TutorError> {
    match candidates.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(*only)),
        many => {
            let words = many
                .iter()
                .map(|variant| variant.word().to_string())
                .collect::<Vec<_>>();
            log::error!(
                "{} variants of {main_form:?} match {request}: {}",
                words.len(),
                words.join("; ")
            );
            Err(TutorError::DataIntegrity {
                main_form: main_form.to_string(),
                request: *request,
                words,
            })
        }
    }
}
