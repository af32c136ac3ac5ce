use futures::future::join_all;
use word_sampler::{Chooser, pick_weighted};

use crate::TutorError;
use crate::lesson::Lesson;
use crate::progress::ProgressStore;

/// Picks the main form for the next exercise.
///
/// Words are drawn with their statistic's weight, and the word drawn last time is left out
/// whenever there is anything else to draw.
#[derive(Debug)]
pub struct WordSelector<C> {
    chooser: C,
    previous: Option<String>,
}

impl<C: Chooser> WordSelector<C> {
    pub fn new(chooser: C) -> Self {
        Self {
            chooser,
            previous: None,
        }
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn chooser(&mut self) -> &mut C {
        &mut self.chooser
    }

    pub async fn next_main_form(
        &mut self,
        progress: &impl ProgressStore,
        lesson: Lesson,
        candidates: &[String],
    ) -> Result<String, TutorError> {
        let main_form = match candidates {
            [] => return Err(TutorError::EmptyLesson(lesson)),
            [only] => only.clone(),
            _ => {
                let statistics =
                    join_all(candidates.iter().map(|word| progress.statistic(lesson, word))).await;
                let weighted = candidates
                    .iter()
                    .cloned()
                    .zip(statistics)
                    .map(|(word, statistic)| Ok((word, statistic?.weight())))
                    .collect::<Result<Vec<_>, TutorError>>()?;
                pick_weighted(&mut self.chooser, &weighted, self.previous.as_ref())
                    .ok_or(TutorError::EmptyLesson(lesson))?
            }
        };
        log::debug!(
            "Selected {main_form:?} for {lesson} (previous: {:?})",
            self.previous
        );
        self.previous = Some(main_form.clone());
        Ok(main_form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::LearningProgress;
    use word_sampler::{RandomChooser, ScriptedChooser};

    fn words(words: &[&str]) -> Vec<String> {
        words.iter().map(|word| word.to_string()).collect()
    }

    #[tokio::test]
    async fn forced_index_picks_third_of_equal_weights() {
        let progress = LearningProgress::new();
        let candidates = words(&["ја", "ти", "он, она, оно"]);
        // equal weights of 5, so index 10 is the first copy of the third word
        let mut selector = WordSelector::new(ScriptedChooser::new([10]));
        let picked = selector
            .next_main_form(&progress, Lesson::PersonalPronounsDeclination, &candidates)
            .await
            .unwrap();
        assert_eq!(picked, "он, она, оно");
        assert_eq!(selector.previous(), Some("он, она, оно"));
    }

    #[tokio::test]
    async fn weights_stay_with_their_words() {
        let progress = LearningProgress::new();
        for _ in 0..8 {
            progress
                .record_correct(Lesson::NounsDeclination, "жена")
                .await
                .unwrap();
            progress
                .record_wrong(Lesson::NounsDeclination, "град")
                .await
                .unwrap();
        }
        let candidates = words(&["жена", "град"]);
        let mut weights = Vec::new();
        for word in &candidates {
            let statistic = progress
                .statistic(Lesson::NounsDeclination, word)
                .await
                .unwrap();
            weights.push(statistic.weight());
        }
        assert_eq!(weights, vec![1, 9]);

        // pool is one "жена" then nine "град"
        let mut selector = WordSelector::new(ScriptedChooser::new([1]));
        let picked = selector
            .next_main_form(&progress, Lesson::NounsDeclination, &candidates)
            .await
            .unwrap();
        assert_eq!(picked, "град");

        let mut selector = WordSelector::new(ScriptedChooser::new([0]));
        let picked = selector
            .next_main_form(&progress, Lesson::NounsDeclination, &candidates)
            .await
            .unwrap();
        assert_eq!(picked, "жена");
    }

    #[tokio::test]
    async fn mistakes_make_a_word_come_up_more_often() {
        let progress = LearningProgress::new();
        for _ in 0..8 {
            for known in ["жена", "град", "брат"] {
                progress
                    .record_correct(Lesson::NounsDeclination, known)
                    .await
                    .unwrap();
            }
            progress
                .record_wrong(Lesson::NounsDeclination, "село")
                .await
                .unwrap();
        }
        let candidates = words(&["жена", "град", "село", "брат"]);
        let mut selector = WordSelector::new(RandomChooser::seeded(21));
        let mut village = 0;
        for _ in 0..600 {
            let picked = selector
                .next_main_form(&progress, Lesson::NounsDeclination, &candidates)
                .await
                .unwrap();
            if picked == "село" {
                village += 1;
            }
        }
        // about 270 expected, against 150 if the weights were ignored; never more than every
        // other draw because a word does not follow itself
        assert!(village > 220, "село drawn {village} times");
        assert!(village <= 300);
    }

    #[tokio::test]
    async fn never_repeats_with_two_or_more_words() {
        let progress = LearningProgress::new();
        for _ in 0..5 {
            progress
                .record_wrong(Lesson::NounsDeclination, "жена")
                .await
                .unwrap();
        }
        let candidates = words(&["жена", "град", "село"]);
        let mut selector = WordSelector::new(RandomChooser::seeded(5));
        let mut previous: Option<String> = None;
        for _ in 0..300 {
            let picked = selector
                .next_main_form(&progress, Lesson::NounsDeclination, &candidates)
                .await
                .unwrap();
            assert_ne!(Some(&picked), previous.as_ref());
            previous = Some(picked);
        }
    }

    #[tokio::test]
    async fn single_candidate_repeats() {
        let progress = LearningProgress::new();
        let candidates = words(&["себе"]);
        let mut selector = WordSelector::new(ScriptedChooser::first());
        for _ in 0..3 {
            let picked = selector
                .next_main_form(&progress, Lesson::ReflexivePronounsDeclination, &candidates)
                .await
                .unwrap();
            assert_eq!(picked, "себе");
        }
    }

    #[tokio::test]
    async fn no_candidates_is_an_empty_lesson() {
        let progress = LearningProgress::new();
        let mut selector = WordSelector::new(ScriptedChooser::first());
        let err = selector
            .next_main_form(&progress, Lesson::MociConjugation, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, TutorError::EmptyLesson(Lesson::MociConjugation)));
    }

    #[tokio::test]
    async fn statistics_are_created_for_every_candidate() {
        let progress = LearningProgress::new();
        let candidates = words(&["радити", "читати"]);
        let mut selector = WordSelector::new(ScriptedChooser::first());
        selector
            .next_main_form(&progress, Lesson::VerbsConjugation, &candidates)
            .await
            .unwrap();
        assert_eq!(progress.answers(), 0);
        assert_eq!(
            progress
                .statistic(Lesson::VerbsConjugation, "читати")
                .await
                .unwrap()
                .weight(),
            5
        );
    }
}
