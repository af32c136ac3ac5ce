mod drill;
mod store;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grammar_utils::WordList;
use tutor_core::{Lesson, ProgressStore, Tutor, builtin_lessons};
use word_sampler::{Chooser, RandomChooser};

use crate::drill::{CliTutor, drill, switch_lesson};
use crate::store::ProgressFile;

#[derive(Parser, Debug)]
#[command(version, about = "Drill Serbian declension and conjugation", long_about = None)]
struct Args {
    /// Where answers and lesson choices are kept between runs
    #[arg(long, env = "TUTOR_PROGRESS_FILE", default_value = "tutor-progress.json")]
    progress_file: PathBuf,

    /// Switch to this lesson before starting (e.g. nouns-declination, biti-conjugation)
    #[arg(long, env = "TUTOR_LESSON")]
    lesson: Option<Lesson>,

    /// Seed for a reproducible sequence of exercises
    #[arg(long, env = "TUTOR_SEED")]
    seed: Option<u64>,

    /// Stop after this many exercises
    #[arg(long)]
    rounds: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    /// Answer exercises for the current lesson (the default)
    #[default]
    Drill,
    /// Show how well each lesson is going
    Stats,
    /// List the available lessons
    Lessons,
    /// Print the JSON schema of word list files
    Schema,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.seed {
        Some(seed) => run(args, RandomChooser::seeded(seed)).await,
        None => run(args, RandomChooser::thread()).await,
    }
}

async fn run<C: Chooser>(args: Args, chooser: C) -> Result<()> {
    let command = args.command.unwrap_or_default();
    if command == Command::Schema {
        let schema = schemars::schema_for!(WordList);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let (progress, lessons) = ProgressFile::load(&args.progress_file)?.into_state()?;
    let mut tutor: CliTutor<C> = Tutor::new(
        builtin_lessons().context("Built-in word lists are broken")?,
        progress,
        lessons,
        chooser,
    );
    switch_lesson(&mut tutor, args.lesson, &args.progress_file)?;

    match command {
        Command::Drill => {
            let stdin = std::io::stdin().lock();
            drill(
                &mut tutor,
                stdin,
                std::io::stdout(),
                args.rounds,
                Some(&args.progress_file),
            )
            .await?;
        }
        Command::Stats => {
            for lesson in Lesson::VARIANTS {
                let statistics = tutor.progress().lesson_statistics(lesson).await?;
                println!(
                    "{:<36} {:>5} answers {:>4}% correct",
                    lesson.to_string(),
                    statistics.total,
                    statistics.percent_correct()
                );
            }
        }
        Command::Lessons => {
            for (lesson, source) in tutor.lessons().iter() {
                let marker = if lesson == tutor.current_lesson() { "*" } else { " " };
                println!(
                    "{marker} {:<36} {:<16} {}",
                    lesson.to_string(),
                    source.policy.to_string(),
                    lesson.title()
                );
            }
        }
        Command::Schema => {}
    }

    Ok(())
}
