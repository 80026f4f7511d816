//! Playback session manager.
//!
//! Owns the notion of the active episode, play/pause, playback mode and
//! speed, simulated progress and the completion policy. Engagement counters
//! (favorites, history, xp) are updated here as side effects of playback.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::capabilities::TimerToken;
use crate::catalog::{ContentProvider, Episode, EpisodeId, QuizQuestion};
use crate::error::{ParseError, QuizError};
use crate::model::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    #[default]
    List,
    Repeat,
    Shuffle,
}

impl PlaybackMode {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::List => Self::Repeat,
            Self::Repeat => Self::Shuffle,
            Self::Shuffle => Self::List,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Repeat => "repeat",
            Self::Shuffle => "shuffle",
        }
    }
}

impl FromStr for PlaybackMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(Self::List),
            "repeat" => Ok(Self::Repeat),
            "shuffle" => Ok(Self::Shuffle),
            other => Err(ParseError::UnknownPlaybackMode(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlaybackSpeed {
    ThreeQuarters,
    #[default]
    Normal,
    OneAndQuarter,
    OneAndHalf,
    Double,
}

impl PlaybackSpeed {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::ThreeQuarters => Self::Normal,
            Self::Normal => Self::OneAndQuarter,
            Self::OneAndQuarter => Self::OneAndHalf,
            Self::OneAndHalf => Self::Double,
            Self::Double => Self::ThreeQuarters,
        }
    }

    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::ThreeQuarters => 0.75,
            Self::Normal => 1.0,
            Self::OneAndQuarter => 1.25,
            Self::OneAndHalf => 1.5,
            Self::Double => 2.0,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ThreeQuarters => "0.75x",
            Self::Normal => "1x",
            Self::OneAndQuarter => "1.25x",
            Self::OneAndHalf => "1.5x",
            Self::Double => "2x",
        }
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DetailTab {
    #[default]
    Transcript,
    Quiz,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub last_played: Option<EpisodeId>,
    /// Explicit card selection; `None` means "show the daily pick".
    pub selected: Option<EpisodeId>,
    pub is_playing: bool,
    pub mode: PlaybackMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementState {
    pub favorites: Vec<EpisodeId>,
    /// Most recent first. Repeated plays are logged each time.
    pub history: Vec<EpisodeId>,
    pub streak: u32,
    pub xp: u64,
}

impl EngagementState {
    #[must_use]
    pub fn new(streak: u32, xp: u64) -> Self {
        Self {
            favorites: Vec::new(),
            history: Vec::new(),
            streak,
            xp,
        }
    }

    pub fn toggle_favorite(&mut self, id: EpisodeId) {
        if let Some(pos) = self.favorites.iter().position(|f| f == &id) {
            self.favorites.remove(pos);
        } else {
            self.favorites.push(id);
        }
    }

    #[must_use]
    pub fn is_favorite(&self, id: &EpisodeId) -> bool {
        self.favorites.contains(id)
    }

    pub fn record_play(&mut self, id: EpisodeId) {
        self.history.insert(0, id);
    }

    pub fn record_completion(&mut self, xp_award: u64) {
        self.xp = self.xp.saturating_add(xp_award);
    }
}

/// Answers given on the quiz tab, keyed by question index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizSession {
    answers: BTreeMap<usize, usize>,
}

impl QuizSession {
    /// Locks in an answer. Returns whether it was correct.
    pub fn answer(
        &mut self,
        quiz: &[QuizQuestion],
        question: usize,
        option: usize,
    ) -> Result<bool, QuizError> {
        let q = quiz.get(question).ok_or(QuizError::QuestionOutOfRange {
            index: question,
            len: quiz.len(),
        })?;
        if option >= q.options.len() {
            return Err(QuizError::OptionOutOfRange {
                index: option,
                len: q.options.len(),
            });
        }
        if self.answers.contains_key(&question) {
            return Err(QuizError::AlreadyAnswered(question));
        }
        self.answers.insert(question, option);
        Ok(q.is_correct(option))
    }

    #[must_use]
    pub fn answer_for(&self, question: usize) -> Option<usize> {
        self.answers.get(&question).copied()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAdvance {
    pub token: TimerToken,
    pub next: EpisodeId,
}

/// Per-session player state: progress, speed, tab, quiz answers and timers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    /// Percentage in `[0, 100]`.
    pub progress: f64,
    pub speed: PlaybackSpeed,
    pub tab: DetailTab,
    pub quiz: QuizSession,
    pub ticker: Option<TimerToken>,
    pub pending_advance: Option<PendingAdvance>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    AdvanceTo(EpisodeId),
    Stop,
}

impl Model {
    /// The single authoritative "currently relevant" episode: the explicit
    /// selection when it still resolves, otherwise the daily pick.
    #[must_use]
    pub fn active_episode<'a>(&self, catalog: &'a dyn ContentProvider) -> Option<&'a Episode> {
        self.playback
            .selected
            .as_ref()
            .and_then(|id| catalog.find(id))
            .or_else(|| self.daily_pick(catalog))
    }

    #[must_use]
    pub fn daily_pick<'a>(&self, catalog: &'a dyn ContentProvider) -> Option<&'a Episode> {
        catalog.daily_pick(self.selection.topic, self.selection.level)
    }

    #[must_use]
    pub fn active_episode_id(&self, catalog: &dyn ContentProvider) -> Option<EpisodeId> {
        self.active_episode(catalog).map(|e| e.id.clone())
    }

    #[must_use]
    pub fn is_active_playing(&self, catalog: &dyn ContentProvider) -> bool {
        self.playback.is_playing
            && self.playback.last_played.is_some()
            && self.playback.last_played == self.active_episode_id(catalog)
    }

    /// True while the progress ticker should be running.
    #[must_use]
    pub fn wants_ticker(&self, catalog: &dyn ContentProvider) -> bool {
        self.is_active_playing(catalog)
            && self.session.pending_advance.is_none()
            && self.session.progress < 100.0
    }

    pub fn play_episode(&mut self, id: EpisodeId) {
        self.playback.last_played = Some(id.clone());
        self.playback.selected = Some(id.clone());
        self.playback.is_playing = true;
        self.engagement.record_play(id);
        self.session.progress = 0.0;
    }

    pub fn toggle_play(&mut self) {
        self.playback.is_playing = !self.playback.is_playing;
    }

    pub fn cycle_playback_mode(&mut self) {
        self.playback.mode = self.playback.mode.next();
    }

    pub fn cycle_playback_speed(&mut self) {
        self.session.speed = self.session.speed.next();
    }

    pub fn seek(&mut self, percent: f64) {
        self.session.progress = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
    }

    /// Advances progress by one tick. Returns true when the episode is done.
    pub fn advance_progress(&mut self) -> bool {
        let step = self.config.progress_step * self.session.speed.multiplier();
        self.session.progress = (self.session.progress + step).min(100.0);
        self.session.progress >= 100.0
    }

    /// "Next" is positional within the currently filtered display list.
    #[must_use]
    pub fn completion(&self, catalog: &dyn ContentProvider) -> Completion {
        let Some(active) = self.active_episode(catalog) else {
            return Completion::Stop;
        };
        let list = catalog.display_list(self.selection.topic, self.selection.level);
        list.iter()
            .position(|e| e.id == active.id)
            .and_then(|idx| list.get(idx + 1))
            .map_or(Completion::Stop, |next| Completion::AdvanceTo(next.id.clone()))
    }

    /// Flips the card between the daily pick and the first latest episode.
    pub fn toggle_episode_kind(&mut self, catalog: &dyn ContentProvider) {
        let daily = self.daily_pick(catalog).map(|e| e.id.clone());
        let showing_daily = self.active_episode_id(catalog) == daily;
        if showing_daily {
            let latest = catalog.latest(self.selection.topic, self.selection.level);
            if let Some(first) = latest.first() {
                self.playback.selected = Some(first.id.clone());
            }
        } else {
            self.playback.selected = daily;
        }
    }
}
