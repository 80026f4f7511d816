//! Serialisable description of the current screen.
//!
//! Everything here is derived from `Model` and the catalog on every call to
//! `view`; nothing is cached, so derived picks can never go stale when the
//! filters change.

use serde::{Deserialize, Serialize};

use crate::catalog::{ContentProvider, Episode, EpisodeId, Language, Level, Topic, VocabEntry};
use crate::error::AppError;
use crate::model::Model;
use crate::navigation::Screen;
use crate::playback::{DetailTab, PlaybackMode};

/// Formats whole seconds as `m:ss`.
#[must_use]
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserFacingError {
    pub message: String,
    pub is_retryable: bool,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            is_retryable: e.kind.is_retryable(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BottomNavView {
    pub current: Screen,
    /// Drives the play/pause glyph on the centre button.
    pub is_playing: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageOption {
    pub language: Language,
    pub label: String,
    pub flag: String,
    pub is_selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelOption {
    pub level: Level,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub is_selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicOption {
    pub topic: Topic,
    pub label: String,
    pub icon: String,
    pub is_selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpisodeCard {
    pub id: EpisodeId,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub topic: Topic,
    pub level: Level,
    pub duration: String,
    pub image_url: String,
    pub is_favorite: bool,
}

impl EpisodeCard {
    fn new(episode: &Episode, model: &Model) -> Self {
        Self {
            id: episode.id.clone(),
            title: episode.title.clone(),
            subtitle: episode.subtitle.clone(),
            description: episode.description.clone(),
            topic: episode.topic,
            level: episode.level,
            duration: episode.duration.clone(),
            image_url: episode.image_url.clone(),
            is_favorite: model.engagement.is_favorite(&episode.id),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    DailyPick,
    Latest,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptLineView {
    pub timestamp: String,
    pub text: String,
    pub is_current: bool,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OptionState {
    Neutral,
    Correct,
    Wrong,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizOptionView {
    pub text: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizQuestionView {
    pub index: usize,
    pub question: String,
    pub options: Vec<QuizOptionView>,
    pub is_answered: bool,
    /// Revealed once the question has been answered.
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressView {
    pub percent: f64,
    pub elapsed: String,
    pub speed: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EpisodeDetail {
    pub card: EpisodeCard,
    pub transcript: Vec<TranscriptLineView>,
    pub vocab: Vec<VocabEntry>,
    pub quiz: Vec<QuizQuestionView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ViewState {
    Home,
    Login {
        is_pending: bool,
    },
    SelectLanguage {
        options: Vec<LanguageOption>,
        can_continue: bool,
    },
    SelectLevel {
        options: Vec<LevelOption>,
        can_continue: bool,
    },
    SelectTopic {
        options: Vec<TopicOption>,
        can_continue: bool,
    },
    TopicHub {
        topic: Option<Topic>,
        level: Option<Level>,
        card: Option<EpisodeCard>,
        card_kind: CardKind,
        latest: Vec<EpisodeCard>,
        is_playing: bool,
        progress: ProgressView,
    },
    Player {
        episode: Option<EpisodeDetail>,
        is_playing: bool,
        progress: ProgressView,
        mode: PlaybackMode,
        tab: DetailTab,
    },
    DailyRecommendation {
        card: Option<EpisodeCard>,
    },
    Profile {
        level_label: String,
        streak: u32,
        xp: u64,
        next_level_xp: u64,
        xp_progress_percent: f64,
        favorites: Vec<EpisodeCard>,
        history: Vec<EpisodeCard>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub screen: Screen,
    pub previous_screen: Option<Screen>,
    pub is_logged_in: bool,
    pub state: ViewState,
    pub bottom_nav: Option<BottomNavView>,
    pub error: Option<UserFacingError>,
}

impl ViewModel {
    #[must_use]
    pub fn build(model: &Model, catalog: &dyn ContentProvider) -> Self {
        let screen = model.navigation.current;

        let state = match screen {
            Screen::Home => ViewState::Home,
            Screen::Login => ViewState::Login {
                is_pending: model.login.pending.is_some(),
            },
            Screen::SelectLanguage => ViewState::SelectLanguage {
                options: Language::ALL
                    .iter()
                    .map(|&language| LanguageOption {
                        language,
                        label: language.label().into(),
                        flag: language.flag().into(),
                        is_selected: model.selection.language == Some(language),
                    })
                    .collect(),
                can_continue: model.selection.language.is_some(),
            },
            Screen::SelectLevel => ViewState::SelectLevel {
                options: catalog
                    .list_levels()
                    .iter()
                    .map(|info| LevelOption {
                        level: info.id,
                        title: info.title.clone(),
                        subtitle: info.subtitle.clone(),
                        description: info.description.clone(),
                        is_selected: model.selection.level == Some(info.id),
                    })
                    .collect(),
                can_continue: model.selection.level.is_some(),
            },
            Screen::SelectTopic => ViewState::SelectTopic {
                options: catalog
                    .list_topics()
                    .iter()
                    .map(|info| TopicOption {
                        topic: info.id,
                        label: info.label.clone(),
                        icon: info.icon.clone(),
                        is_selected: model.selection.topic == Some(info.id),
                    })
                    .collect(),
                can_continue: model.selection.topic.is_some(),
            },
            Screen::TopicHub => Self::topic_hub(model, catalog),
            Screen::Player => Self::player(model, catalog),
            Screen::DailyRecommendation => ViewState::DailyRecommendation {
                card: model
                    .daily_pick(catalog)
                    .map(|e| EpisodeCard::new(e, model)),
            },
            Screen::Profile => Self::profile(model, catalog),
        };

        let bottom_nav = screen.shows_bottom_nav().then(|| BottomNavView {
            current: screen,
            is_playing: model.is_active_playing(catalog),
        });

        Self {
            screen,
            previous_screen: model.navigation.previous,
            is_logged_in: model.is_logged_in(),
            state,
            bottom_nav,
            error: model.login.error.as_ref().map(UserFacingError::from),
        }
    }

    fn elapsed_secs(model: &Model) -> u32 {
        let total = f64::from(model.config.simulated_episode_secs);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let secs = (model.session.progress / 100.0 * total).floor() as u32;
        secs
    }

    fn progress(model: &Model) -> ProgressView {
        ProgressView {
            percent: model.session.progress,
            elapsed: format_clock(Self::elapsed_secs(model)),
            speed: model.session.speed.label().into(),
        }
    }

    fn topic_hub(model: &Model, catalog: &dyn ContentProvider) -> ViewState {
        let active = model.active_episode(catalog);
        let daily = model.daily_pick(catalog);
        let card_kind = match (active, daily) {
            (Some(a), Some(d)) if a.id != d.id => CardKind::Latest,
            _ => CardKind::DailyPick,
        };
        let latest = catalog
            .latest(model.selection.topic, model.selection.level)
            .into_iter()
            .map(|e| EpisodeCard::new(e, model))
            .collect();

        ViewState::TopicHub {
            topic: model.selection.topic,
            level: model.selection.level,
            card: active.map(|e| EpisodeCard::new(e, model)),
            card_kind,
            latest,
            is_playing: model.is_active_playing(catalog),
            progress: Self::progress(model),
        }
    }

    fn player(model: &Model, catalog: &dyn ContentProvider) -> ViewState {
        let elapsed = Self::elapsed_secs(model);
        let episode = model.active_episode(catalog).map(|e| EpisodeDetail {
            card: EpisodeCard::new(e, model),
            transcript: Self::transcript(e, elapsed),
            vocab: e.vocab.clone(),
            quiz: Self::quiz(e, model),
        });

        ViewState::Player {
            episode,
            is_playing: model.is_active_playing(catalog),
            progress: Self::progress(model),
            mode: model.playback.mode,
            tab: model.session.tab,
        }
    }

    fn transcript(episode: &Episode, elapsed: u32) -> Vec<TranscriptLineView> {
        // The current line is the last one whose stamp has been reached.
        let current = episode
            .transcript
            .iter()
            .rposition(|line| line.time <= elapsed);

        episode
            .transcript
            .iter()
            .enumerate()
            .map(|(i, line)| TranscriptLineView {
                timestamp: format_clock(line.time),
                text: line.text.clone(),
                is_current: current == Some(i),
            })
            .collect()
    }

    fn quiz(episode: &Episode, model: &Model) -> Vec<QuizQuestionView> {
        episode
            .quiz
            .iter()
            .enumerate()
            .map(|(index, q)| {
                let answer = model.session.quiz.answer_for(index);
                let options = q
                    .options
                    .iter()
                    .enumerate()
                    .map(|(i, text)| {
                        let state = match answer {
                            Some(_) if q.is_correct(i) => OptionState::Correct,
                            Some(chosen) if chosen == i => OptionState::Wrong,
                            _ => OptionState::Neutral,
                        };
                        QuizOptionView {
                            text: text.clone(),
                            state,
                        }
                    })
                    .collect();

                QuizQuestionView {
                    index,
                    question: q.question.clone(),
                    options,
                    is_answered: answer.is_some(),
                    explanation: answer.map(|_| q.explanation.clone()),
                }
            })
            .collect()
    }

    fn profile(model: &Model, catalog: &dyn ContentProvider) -> ViewState {
        let favorites = catalog
            .resolve_ids(&model.engagement.favorites)
            .into_iter()
            .map(|e| EpisodeCard::new(e, model))
            .collect();
        let history = catalog
            .resolve_ids(&model.engagement.history)
            .into_iter()
            .take(model.config.history_display_limit)
            .map(|e| EpisodeCard::new(e, model))
            .collect();

        ViewState::Profile {
            level_label: model.selection.level.unwrap_or(Level::A1).as_str().into(),
            streak: model.engagement.streak,
            xp: model.engagement.xp,
            next_level_xp: model.config.next_level_xp,
            xp_progress_percent: model.xp_progress_percent(),
            favorites,
            history,
        }
    }
}
