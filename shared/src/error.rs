use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::EpisodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Authentication,
    Cancelled,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Authentication => "AUTH_ERROR",
            Self::Cancelled => "CANCELLED",
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Authentication | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Authentication => {
                "We couldn't sign you in. Please check your connection and try again.".into()
            }
            ErrorKind::Cancelled => "Sign in was cancelled.".into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown screen: {0}")]
    UnknownScreen(String),
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
    #[error("unknown level: {0}")]
    UnknownLevel(String),
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("unknown playback mode: {0}")]
    UnknownPlaybackMode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("question {index} out of range ({len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },
    #[error("option {index} out of range ({len} options)")]
    OptionOutOfRange { index: usize, len: usize },
    #[error("question {0} already answered")]
    AlreadyAnswered(usize),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate episode id: {0}")]
    DuplicateEpisode(EpisodeId),
    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),
}
