use serde::{Deserialize, Serialize};

use crate::capabilities::TimerToken;
use crate::catalog::{Language, Level, Topic};
use crate::error::AppError;
use crate::navigation::NavigationState;
use crate::playback::{EngagementState, PlaybackState, SessionState};
use crate::{
    AUTO_ADVANCE_DELAY_MS, DEFAULT_STREAK, DEFAULT_XP, HISTORY_DISPLAY_LIMIT, LOGIN_DELAY_MS,
    NEXT_LEVEL_XP, PROGRESS_STEP, QUIZ_XP_AWARD, SIMULATED_EPISODE_SECS, TICK_INTERVAL_MS,
};

/// Timings and rewards. Hosts may override any of these per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    pub tick_interval_ms: u64,
    /// Progress percentage added per tick at 1x speed.
    pub progress_step: f64,
    pub auto_advance_delay_ms: u64,
    pub login_delay_ms: u64,
    pub quiz_xp_award: u64,
    pub next_level_xp: u64,
    pub history_display_limit: usize,
    pub simulated_episode_secs: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            progress_step: PROGRESS_STEP,
            auto_advance_delay_ms: AUTO_ADVANCE_DELAY_MS,
            login_delay_ms: LOGIN_DELAY_MS,
            quiz_xp_award: QUIZ_XP_AWARD,
            next_level_xp: NEXT_LEVEL_XP,
            history_display_limit: HISTORY_DISPLAY_LIMIT,
            simulated_episode_secs: SIMULATED_EPISODE_SECS,
        }
    }
}

/// Onboarding choices. Each is overwritten independently; never cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub language: Option<Language>,
    pub level: Option<Level>,
    pub topic: Option<Topic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginState {
    pub is_logged_in: bool,
    /// Set while the simulated sign-in delay is outstanding.
    pub pending: Option<TimerToken>,
    pub error: Option<AppError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub navigation: NavigationState,
    pub login: LoginState,
    pub selection: SelectionState,
    pub playback: PlaybackState,
    pub engagement: EngagementState,
    pub session: SessionState,
    pub config: PlaybackConfig,
    next_token: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self::with_config(PlaybackConfig::default())
    }
}

impl Model {
    #[must_use]
    pub fn with_config(config: PlaybackConfig) -> Self {
        Self {
            navigation: NavigationState::default(),
            login: LoginState::default(),
            selection: SelectionState::default(),
            playback: PlaybackState::default(),
            engagement: EngagementState::new(DEFAULT_STREAK, DEFAULT_XP),
            session: SessionState::default(),
            config,
            next_token: 0,
        }
    }

    pub fn issue_token(&mut self) -> TimerToken {
        self.next_token += 1;
        TimerToken(self.next_token)
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.login.is_logged_in
    }

    #[must_use]
    pub fn xp_progress_percent(&self) -> f64 {
        if self.config.next_level_xp == 0 {
            return 100.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = self.engagement.xp as f64 / self.config.next_level_xp as f64 * 100.0;
        pct.min(100.0)
    }
}
