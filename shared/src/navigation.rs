//! Screen enumeration and the navigation controller.
//!
//! `navigate` is an unrestricted edge to any screen. `go_back` follows a
//! fixed predecessor table keyed only by the current screen; there is no
//! history stack and `previous` is an audit field, not an undo log.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    #[default]
    Home,
    Login,
    SelectLanguage,
    SelectLevel,
    SelectTopic,
    TopicHub,
    Player,
    DailyRecommendation,
    Profile,
}

impl Screen {
    pub const ALL: [Self; 9] = [
        Self::Home,
        Self::Login,
        Self::SelectLanguage,
        Self::SelectLevel,
        Self::SelectTopic,
        Self::TopicHub,
        Self::Player,
        Self::DailyRecommendation,
        Self::Profile,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::SelectLanguage => "select-language",
            Self::SelectLevel => "select-level",
            Self::SelectTopic => "select-topic",
            Self::TopicHub => "topic-hub",
            Self::Player => "player",
            Self::DailyRecommendation => "daily-recommendation",
            Self::Profile => "profile",
        }
    }

    /// Fixed back-navigation predecessor.
    #[must_use]
    pub const fn back_target(self) -> Self {
        match self {
            Self::Login | Self::SelectLanguage => Self::Home,
            Self::SelectLevel => Self::SelectLanguage,
            Self::SelectTopic => Self::SelectLevel,
            Self::TopicHub => Self::SelectTopic,
            Self::Player | Self::Profile => Self::TopicHub,
            Self::Home | Self::DailyRecommendation => Self::Home,
        }
    }

    #[must_use]
    pub const fn shows_bottom_nav(self) -> bool {
        matches!(self, Self::TopicHub | Self::Profile)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| ParseError::UnknownScreen(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NavigationState {
    pub current: Screen,
    pub previous: Option<Screen>,
}

impl NavigationState {
    #[must_use]
    pub const fn navigate(self, target: Screen) -> Self {
        Self {
            current: target,
            previous: Some(self.current),
        }
    }

    #[must_use]
    pub const fn go_back(self) -> Self {
        Self {
            current: self.current.back_target(),
            previous: None,
        }
    }
}
