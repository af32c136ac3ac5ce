use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use tutor_core::{Exercise, LearningProgress, Lesson, ProgressStore, StaticWordDatabase, Tutor};
use word_sampler::Chooser;

use crate::store::ProgressFile;

pub type CliTutor<C> = Tutor<StaticWordDatabase, LearningProgress, C>;

/// How a drill session ended.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub asked: usize,
    pub correct: usize,
}

fn prompt(exercise: &Exercise) -> String {
    let question = match exercise {
        Exercise::Case(_) => format!("declension: {}", exercise.slot()),
        Exercise::Conjugation(_) => format!("conjugation: {}", exercise.slot()),
        Exercise::Rule(_) => "conjugation rule".to_string(),
    };
    let aspect = exercise
        .aspect()
        .map(|aspect| format!(", {}", aspect.term()))
        .unwrap_or_default();
    format!(
        "{} ({question}{aspect})\n  choices: {}\n> ",
        exercise.main_form(),
        exercise.possible_variants().join(" / ")
    )
}

/// Make `lesson` the active one, saving right away if that changed anything.
pub fn switch_lesson<C: Chooser>(
    tutor: &mut CliTutor<C>,
    lesson: Option<Lesson>,
    save_to: &Path,
) -> Result<bool> {
    if let Some(lesson) = lesson
        && lesson != tutor.current_lesson()
    {
        tutor.select_lesson(lesson)?;
        ProgressFile::capture(tutor.progress(), tutor.lesson_state())?.save(save_to)?;
        return Ok(true);
    }
    Ok(false)
}

/// Ask exercises until the input ends, an empty line is entered, or `rounds` are done.
///
/// Progress is saved to `save_to` after every answer.
pub async fn drill<C: Chooser>(
    tutor: &mut CliTutor<C>,
    input: impl BufRead,
    mut output: impl Write,
    rounds: Option<usize>,
    save_to: Option<&Path>,
) -> Result<Summary> {
    let mut summary = Summary::default();
    let mut lines = input.lines();
    writeln!(
        output,
        "Lesson: {} ({})",
        tutor.current_lesson().title(),
        tutor.current_lesson()
    )?;

    while rounds.is_none_or(|rounds| summary.asked < rounds) {
        let exercise = tutor.next_exercise().await?;
        write!(output, "{}", prompt(&exercise))?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let answer = line.trim();
        if answer.is_empty() {
            break;
        }

        summary.asked += 1;
        if tutor.check_answer(answer, &exercise).await? {
            summary.correct += 1;
            writeln!(output, "correct")?;
        } else {
            writeln!(output, "wrong, it is {}", exercise.correct_answer())?;
        }
        if let Some(path) = save_to {
            ProgressFile::capture(tutor.progress(), tutor.lesson_state())?.save(path)?;
        }
    }

    let lesson = tutor.current_lesson();
    let statistics = tutor.progress().lesson_statistics(lesson).await?;
    writeln!(
        output,
        "{} of {} this session; {}% correct overall in {}",
        summary.correct,
        summary.asked,
        statistics.percent_correct(),
        lesson
    )?;
    Ok(summary)
}
