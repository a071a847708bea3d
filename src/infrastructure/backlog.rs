//! Flat-file product backlog behind the story-recording tools.
//!
//! User stories live in one JSON array; ids are assigned sequentially and
//! subtasks nest under their story. Every mutation rewrites the whole file.
//! A missing or unreadable file reads as an empty backlog.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStory {
    pub id: u64,
    pub user_story: String,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: u64,
    pub subtask: String,
}

#[derive(Debug, Error)]
pub enum BacklogError {
    #[error("failed to write backlog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode backlog {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("user story with id {0} not found")]
    UnknownStory(u64),
}

pub struct BacklogStore {
    path: PathBuf,
}

impl BacklogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all stories. Missing or corrupt files read as empty.
    pub fn user_stories(&self) -> Vec<UserStory> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "No readable backlog file; starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(stories) => stories,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "Corrupt backlog file; treating as empty");
                Vec::new()
            }
        }
    }

    /// Records a user story and returns its id.
    pub fn create_user_story(&self, user_story: &str) -> Result<u64, BacklogError> {
        let mut stories = self.user_stories();
        let id = stories.last().map(|story| story.id + 1).unwrap_or(1);
        stories.push(UserStory {
            id,
            user_story: user_story.to_string(),
            subtasks: Vec::new(),
        });
        self.save(&stories)?;
        Ok(id)
    }

    /// Records a subtask under an existing story and returns the subtask id.
    pub fn create_subtask(&self, user_story_id: u64, subtask: &str) -> Result<u64, BacklogError> {
        let mut stories = self.user_stories();
        let story = stories
            .iter_mut()
            .find(|story| story.id == user_story_id)
            .ok_or(BacklogError::UnknownStory(user_story_id))?;
        let id = story.subtasks.len() as u64 + 1;
        story.subtasks.push(Subtask {
            id,
            subtask: subtask.to_string(),
        });
        self.save(&stories)?;
        Ok(id)
    }

    fn save(&self, stories: &[UserStory]) -> Result<(), BacklogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| BacklogError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        let encoded = serde_json::to_string_pretty(stories).map_err(|source| BacklogError::Encode {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, encoded).map_err(|source| BacklogError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
