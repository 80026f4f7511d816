#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod capabilities;
pub mod catalog;
pub mod error;
pub mod event;
pub mod model;
pub mod navigation;
pub mod playback;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect, TimerOperation, TimerOutput, TimerToken};
pub use catalog::{Catalog, ContentProvider, Episode, EpisodeId, Language, Level, Topic};
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{AppError, ErrorKind};
pub use event::{Event, LoginFailure, LoginProvider};
pub use model::{Model, PlaybackConfig};
pub use navigation::{NavigationState, Screen};
pub use playback::{DetailTab, PlaybackMode, PlaybackSpeed};
pub use view::{ViewModel, ViewState};

pub const TICK_INTERVAL_MS: u64 = 100;
pub const PROGRESS_STEP: f64 = 0.5;
pub const AUTO_ADVANCE_DELAY_MS: u64 = 500;
pub const LOGIN_DELAY_MS: u64 = 1000;
pub const QUIZ_XP_AWARD: u64 = 50;
pub const DEFAULT_STREAK: u32 = 3;
pub const DEFAULT_XP: u64 = 1250;
pub const NEXT_LEVEL_XP: u64 = 2000;
pub const HISTORY_DISPLAY_LIMIT: usize = 10;
pub const SIMULATED_EPISODE_SECS: u32 = 300;

pub mod app {
    use std::sync::Arc;

    use tracing::{debug, info, warn};

    use crate::capabilities::Capabilities;
    use crate::catalog::{Catalog, ContentProvider, EpisodeId};
    use crate::error::{AppError, ErrorKind};
    use crate::event::{Event, LoginFailure};
    use crate::model::Model;
    use crate::navigation::Screen;
    use crate::playback::{Completion, PendingAdvance};
    use crate::view::ViewModel;

    pub struct App {
        catalog: Arc<dyn ContentProvider>,
    }

    impl Default for App {
        fn default() -> Self {
            Self::with_catalog(Catalog::builtin())
        }
    }

    impl App {
        #[must_use]
        pub fn with_catalog(catalog: impl ContentProvider + 'static) -> Self {
            Self {
                catalog: Arc::new(catalog),
            }
        }

        #[must_use]
        pub fn catalog(&self) -> &dyn ContentProvider {
            self.catalog.as_ref()
        }

        fn cancel_pending_advance(model: &mut Model, caps: &Capabilities) {
            if let Some(pending) = model.session.pending_advance.take() {
                debug!(token = %pending.token, next = %pending.next, "auto-advance cancelled");
                caps.timer.cancel(pending.token);
            }
        }

        fn start_playback(model: &mut Model, id: EpisodeId, caps: &Capabilities) {
            Self::cancel_pending_advance(model, caps);
            info!(episode = %id, "playback started");
            model.play_episode(id);
        }

        fn toggle_play(model: &mut Model, caps: &Capabilities) {
            Self::cancel_pending_advance(model, caps);
            model.toggle_play();
            debug!(is_playing = model.playback.is_playing, "play toggled");
        }

        fn play_active(&self, model: &mut Model, caps: &Capabilities) {
            let Some(active) = model.active_episode_id(self.catalog()) else {
                warn!("play requested with an empty catalog");
                return;
            };
            if model.playback.last_played.as_ref() == Some(&active) {
                Self::toggle_play(model, caps);
            } else {
                Self::start_playback(model, active, caps);
            }
        }

        /// Runs the completion policy once progress has reached the end.
        fn finish_episode(&self, model: &mut Model, caps: &Capabilities) {
            match model.completion(self.catalog()) {
                Completion::AdvanceTo(next) => {
                    let token = model.issue_token();
                    debug!(%token, next = %next, "auto-advance scheduled");
                    model.session.pending_advance = Some(PendingAdvance { token, next });
                    caps.timer
                        .notify_after(token, model.config.auto_advance_delay_ms, |token| {
                            Event::AutoAdvanceElapsed { token }
                        });
                }
                Completion::Stop => {
                    info!("end of list reached, playback stopped");
                    model.toggle_play();
                    model.session.progress = 0.0;
                }
            }
        }

        /// Starts or cancels the progress ticker so that one is running
        /// exactly while `Model::wants_ticker` holds.
        fn reconcile_ticker(&self, model: &mut Model, caps: &Capabilities) {
            let wants = model.wants_ticker(self.catalog());
            match (wants, model.session.ticker) {
                (true, None) => {
                    let token = model.issue_token();
                    model.session.ticker = Some(token);
                    caps.timer
                        .notify_after(token, model.config.tick_interval_ms, |token| {
                            Event::ProgressTick { token }
                        });
                }
                (false, Some(token)) => {
                    model.session.ticker = None;
                    caps.timer.cancel(token);
                }
                _ => {}
            }
        }

        fn apply(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            let catalog = self.catalog();

            match event {
                Event::Noop => {}

                Event::Navigate { screen } => {
                    model.navigation = model.navigation.navigate(screen);
                }

                Event::GoBack => {
                    model.navigation = model.navigation.go_back();
                }

                Event::SetLanguage { language } => {
                    model.selection.language = Some(language);
                }

                Event::SetLevel { level } => {
                    model.selection.level = Some(level);
                    model.playback.selected = None;
                    Self::cancel_pending_advance(model, caps);
                }

                Event::SetTopic { topic } => {
                    model.selection.topic = Some(topic);
                    model.playback.selected = None;
                    Self::cancel_pending_advance(model, caps);
                }

                Event::Login => {
                    model.login.is_logged_in = true;
                    info!("logged in");
                }

                Event::LoginRequested { provider } => {
                    if model.login.pending.is_some() {
                        warn!(?provider, "login already in progress");
                        return;
                    }
                    let token = model.issue_token();
                    model.login.pending = Some(token);
                    model.login.error = None;
                    info!(?provider, "login requested");
                    caps.timer
                        .notify_after(token, model.config.login_delay_ms, |token| {
                            Event::LoginCompleted { token }
                        });
                }

                Event::LoginCompleted { token } => {
                    if model.login.pending != Some(token) {
                        warn!(%token, "stale login completion ignored");
                        return;
                    }
                    model.login.pending = None;
                    model.login.is_logged_in = true;
                    model.navigation = model.navigation.navigate(Screen::SelectLanguage);
                    info!("login completed");
                }

                Event::LoginFailed { failure } => {
                    if let Some(token) = model.login.pending.take() {
                        caps.timer.cancel(token);
                    }
                    let error = match failure {
                        LoginFailure::Network(reason) => {
                            AppError::new(ErrorKind::Authentication, reason)
                        }
                        LoginFailure::Cancelled => {
                            AppError::new(ErrorKind::Cancelled, "sign in cancelled")
                        }
                    };
                    warn!(code = error.code(), message = %error.message, "login failed");
                    model.login.error = Some(error);
                    if model.navigation.current != Screen::Login {
                        model.navigation = model.navigation.navigate(Screen::Login);
                    }
                }

                Event::DismissError => {
                    model.login.error = None;
                }

                Event::PlayEpisode { episode_id } => {
                    if catalog.find(&episode_id).is_none() {
                        warn!(episode = %episode_id, "play requested for unknown episode");
                        return;
                    }
                    Self::start_playback(model, episode_id, caps);
                }

                Event::TogglePlay => Self::toggle_play(model, caps),

                Event::CyclePlaybackMode => {
                    model.cycle_playback_mode();
                    debug!(mode = model.playback.mode.as_str(), "playback mode changed");
                }

                Event::CyclePlaybackSpeed => {
                    model.cycle_playback_speed();
                    debug!(speed = %model.session.speed, "playback speed changed");
                }

                Event::SelectEpisode { episode_id } => {
                    if catalog.find(&episode_id).is_none() {
                        warn!(episode = %episode_id, "select requested for unknown episode");
                        return;
                    }
                    model.playback.selected = Some(episode_id);
                }

                Event::ToggleEpisodeKind => model.toggle_episode_kind(catalog),

                Event::PlayActiveEpisode => self.play_active(model, caps),

                Event::BottomPlayPressed => {
                    if model.navigation.current == Screen::TopicHub {
                        self.play_active(model, caps);
                        return;
                    }
                    let Some(active) = model.active_episode_id(catalog) else {
                        warn!("play requested with an empty catalog");
                        return;
                    };
                    if model.playback.last_played.as_ref() == Some(&active) {
                        model.playback.is_playing = true;
                    } else {
                        Self::start_playback(model, active, caps);
                    }
                    model.navigation = model.navigation.navigate(Screen::Player);
                }

                Event::SeekTo { percent } => {
                    Self::cancel_pending_advance(model, caps);
                    model.seek(percent);
                }

                Event::ToggleFavorite { episode_id } => {
                    model.engagement.toggle_favorite(episode_id);
                }

                Event::RecordCompletion { xp } => {
                    model.engagement.record_completion(xp);
                }

                Event::ShowDetailTab { tab } => {
                    model.session.tab = tab;
                    model.session.quiz.clear();
                }

                Event::AnswerQuiz { question, option } => {
                    let Some(episode) = model.active_episode(catalog) else {
                        warn!("quiz answer with no active episode");
                        return;
                    };
                    match model.session.quiz.answer(&episode.quiz, question, option) {
                        Ok(true) => {
                            model
                                .engagement
                                .record_completion(model.config.quiz_xp_award);
                            info!(question, xp = model.engagement.xp, "quiz answered correctly");
                        }
                        Ok(false) => debug!(question, option, "quiz answered incorrectly"),
                        Err(e) => warn!(error = %e, "quiz answer rejected"),
                    }
                }

                Event::ProgressTick { token } => {
                    if model.session.ticker != Some(token) {
                        warn!(%token, "stale progress tick ignored");
                        return;
                    }
                    model.session.ticker = None;
                    if model.is_active_playing(catalog) {
                        model.advance_progress();
                    }
                }

                Event::AutoAdvanceElapsed { token } => {
                    match model.session.pending_advance.take() {
                        Some(pending) if pending.token == token => {
                            info!(episode = %pending.next, "auto-advancing");
                            model.play_episode(pending.next);
                        }
                        other => {
                            model.session.pending_advance = other;
                            warn!(%token, "stale auto-advance ignored");
                        }
                    }
                }
            }
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(
                event = event.name(),
                user_initiated = event.is_user_initiated(),
                "processing event"
            );

            let active_before = model.active_episode_id(self.catalog());
            self.apply(event, model, caps);
            let active_after = model.active_episode_id(self.catalog());

            if active_before != active_after {
                debug!(from = ?active_before, to = ?active_after, "active episode changed");
                model.session.progress = 0.0;
                model.session.quiz.clear();
                Self::cancel_pending_advance(model, caps);
            }

            // Ticks, seeks and resumes can all leave the playing episode at its end.
            if model.session.progress >= 100.0
                && model.session.pending_advance.is_none()
                && model.is_active_playing(self.catalog())
            {
                self.finish_episode(model, caps);
            }

            self.reconcile_ticker(model, caps);
            caps.render.render();
        }

        fn view(&self, model: &Model) -> ViewModel {
            ViewModel::build(model, self.catalog())
        }
    }
}
