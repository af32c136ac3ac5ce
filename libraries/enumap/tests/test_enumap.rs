use enumap::EnuMap;

#[derive(EnuMap, Debug, Clone, Copy, PartialEq, Eq)]
enum Drill {
    NounsDeclination,
    BitiConjugation,
    Vocabulary,
}

#[test]
fn test_fields_are_snake_case() {
    let map = DrillMap {
        nouns_declination: "nouns",
        biti_conjugation: "бити",
        vocabulary: "words",
    };

    assert_eq!(map.get(&Drill::NounsDeclination), &"nouns");
    assert_eq!(map.get(&Drill::BitiConjugation), &"бити");
    assert_eq!(map.get(&Drill::Vocabulary), &"words");
}

#[test]
fn test_variants_in_declaration_order() {
    assert_eq!(
        Drill::VARIANTS,
        [
            Drill::NounsDeclination,
            Drill::BitiConjugation,
            Drill::Vocabulary
        ]
    );
}

#[test]
fn test_from_fn_and_iter() {
    let map = DrillMap::from_fn(|drill| format!("{drill:?}").len());
    let collected = map.iter().map(|(drill, len)| (drill, *len)).collect::<Vec<_>>();
    assert_eq!(
        collected,
        vec![
            (Drill::NounsDeclination, 16),
            (Drill::BitiConjugation, 15),
            (Drill::Vocabulary, 10),
        ]
    );
}

#[test]
fn test_try_from_fn_stops_at_first_error() {
    let mut visited = Vec::new();
    let result: Result<DrillMap<u8>, Drill> = DrillMap::try_from_fn(|drill| {
        visited.push(drill);
        if drill == Drill::BitiConjugation {
            Err(drill)
        } else {
            Ok(1)
        }
    });
    assert_eq!(result.unwrap_err(), Drill::BitiConjugation);
    assert_eq!(visited, vec![Drill::NounsDeclination, Drill::BitiConjugation]);
}

#[test]
fn test_get_mut() {
    let mut map = DrillMap::from_fn(|_| Vec::new());
    map.get_mut(&Drill::Vocabulary).push("реч");
    map.get_mut(&Drill::Vocabulary).push("слово");

    assert_eq!(map.get(&Drill::Vocabulary), &vec!["реч", "слово"]);
    assert!(map.get(&Drill::NounsDeclination).is_empty());
}
