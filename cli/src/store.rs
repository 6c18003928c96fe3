use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use sweeper_core::HighScoreStore;

const FILE_NAME: &str = "scores.json";

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct ScoreFile {
    best_secs: Option<u32>,
}

/// Best time kept in a small JSON file, rewritten on every new record.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: ScoreFile,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing or unreadable file means no best
    /// time yet.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable score file {}: {}", path.display(), err);
                ScoreFile::default()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => ScoreFile::default(),
            Err(err) => {
                log::warn!("Could not read score file {}: {}", path.display(), err);
                ScoreFile::default()
            }
        };
        log::debug!("Score file {}: {:?}", path.display(), data);
        Self { path, data }
    }

    /// Per-user data directory, or the working directory when there is none.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("dev", "sugoijan", "sweeper")
            .map(|dirs| dirs.data_dir().join(FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(FILE_NAME))
    }

    fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.data)?)?;
        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn best(&self) -> Option<u32> {
        self.data.best_secs
    }

    fn set_best(&mut self, secs: u32) {
        self.data.best_secs = Some(secs);
        if let Err(err) = self.save() {
            log::error!("Could not save best time to {}: {:?}", self.path.display(), err);
        }
    }
}
