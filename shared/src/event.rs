use serde::{Deserialize, Serialize};

use crate::capabilities::TimerToken;
use crate::catalog::{EpisodeId, Language, Level, Topic};
use crate::navigation::Screen;
use crate::playback::DetailTab;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginProvider {
    Google,
    Apple,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum LoginFailure {
    Network(String),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Event {
    #[default]
    Noop,

    // Navigation
    Navigate { screen: Screen },
    GoBack,

    // Onboarding selections
    SetLanguage { language: Language },
    SetLevel { level: Level },
    SetTopic { topic: Topic },

    // Auth
    Login,
    LoginRequested { provider: LoginProvider },
    LoginCompleted { token: TimerToken },
    LoginFailed { failure: LoginFailure },
    DismissError,

    // Playback session
    PlayEpisode { episode_id: EpisodeId },
    TogglePlay,
    CyclePlaybackMode,
    CyclePlaybackSpeed,
    SelectEpisode { episode_id: EpisodeId },
    ToggleEpisodeKind,
    PlayActiveEpisode,
    BottomPlayPressed,
    SeekTo { percent: f64 },

    // Engagement
    ToggleFavorite { episode_id: EpisodeId },
    RecordCompletion { xp: u64 },
    ShowDetailTab { tab: DetailTab },
    AnswerQuiz { question: usize, option: usize },

    // Timer callbacks
    ProgressTick { token: TimerToken },
    AutoAdvanceElapsed { token: TimerToken },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Navigate { .. } => "navigate",
            Self::GoBack => "go_back",
            Self::SetLanguage { .. } => "set_language",
            Self::SetLevel { .. } => "set_level",
            Self::SetTopic { .. } => "set_topic",
            Self::Login => "login",
            Self::LoginRequested { .. } => "login_requested",
            Self::LoginCompleted { .. } => "login_completed",
            Self::LoginFailed { .. } => "login_failed",
            Self::DismissError => "dismiss_error",
            Self::PlayEpisode { .. } => "play_episode",
            Self::TogglePlay => "toggle_play",
            Self::CyclePlaybackMode => "cycle_playback_mode",
            Self::CyclePlaybackSpeed => "cycle_playback_speed",
            Self::SelectEpisode { .. } => "select_episode",
            Self::ToggleEpisodeKind => "toggle_episode_kind",
            Self::PlayActiveEpisode => "play_active_episode",
            Self::BottomPlayPressed => "bottom_play_pressed",
            Self::SeekTo { .. } => "seek_to",
            Self::ToggleFavorite { .. } => "toggle_favorite",
            Self::RecordCompletion { .. } => "record_completion",
            Self::ShowDetailTab { .. } => "show_detail_tab",
            Self::AnswerQuiz { .. } => "answer_quiz",
            Self::ProgressTick { .. } => "progress_tick",
            Self::AutoAdvanceElapsed { .. } => "auto_advance_elapsed",
        }
    }

    /// Shell callbacks (timers, sign-in results) are not user intents.
    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::Noop
                | Self::LoginCompleted { .. }
                | Self::LoginFailed { .. }
                | Self::ProgressTick { .. }
                | Self::AutoAdvanceElapsed { .. }
        )
    }
}
