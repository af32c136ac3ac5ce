use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use logbook::{EventLog, Timestamped};
use serde::{Deserialize, Serialize};
use tutor_core::{LearningProgress, LessonState};

/// Everything the tutor remembers between runs, as two event logs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProgressFile {
    #[serde(default)]
    pub progress: Vec<Timestamped<serde_json::Value>>,
    #[serde(default)]
    pub lessons: Vec<Timestamped<serde_json::Value>>,
}

impl ProgressFile {
    /// Read the file, or start fresh if it does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No progress file at {}, starting fresh", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse progress file {}", path.display()))
    }

    /// Write through a temporary file in the same directory, so a crash never leaves half a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut file = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut file, self)?;
        file.write_all(b"\n")?;
        file.persist(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn capture(progress: &LearningProgress, lessons: &LessonState) -> Result<Self> {
        Ok(Self {
            progress: progress.to_jsons()?,
            lessons: lessons.log().to_jsons()?,
        })
    }

    pub fn into_state(self) -> Result<(LearningProgress, LessonState)> {
        let progress = EventLog::from_jsons(self.progress).context("Corrupt progress log")?;
        let lessons = EventLog::from_jsons(self.lessons).context("Corrupt lesson log")?;
        Ok((
            LearningProgress::from_log(progress),
            LessonState::from_log(lessons),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::{Lesson, ProgressStore};

    #[tokio::test]
    async fn saved_state_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        let progress = LearningProgress::new();
        progress
            .record_wrong(Lesson::BitiConjugation, "бити")
            .await
            .unwrap();
        let mut lessons = LessonState::new();
        lessons.set_current(Lesson::BitiConjugation);
        ProgressFile::capture(&progress, &lessons)
            .unwrap()
            .save(&path)
            .unwrap();

        let (progress, lessons) = ProgressFile::load(&path).unwrap().into_state().unwrap();
        assert_eq!(lessons.current(), Lesson::BitiConjugation);
        let statistic = progress
            .statistic(Lesson::BitiConjugation, "бити")
            .await
            .unwrap();
        assert_eq!(statistic.wrong_count, 1);
    }

    #[test]
    fn missing_file_is_a_fresh_start() {
        let dir = tempfile::tempdir().unwrap();
        let file = ProgressFile::load(&dir.path().join("nothing.json")).unwrap();
        assert!(file.progress.is_empty());
        assert!(file.lessons.is_empty());
    }

    #[test]
    fn garbage_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(ProgressFile::load(&path).is_err());
    }

    #[test]
    fn reordered_events_are_rejected() {
        let mut lessons = LessonState::new();
        lessons.set_current(Lesson::MociConjugation);
        lessons.set_current(Lesson::HtetiConjugation);
        let mut file = ProgressFile::capture(&LearningProgress::new(), &lessons).unwrap();
        file.lessons.swap(0, 1);
        assert!(file.into_state().is_err());
    }
}
