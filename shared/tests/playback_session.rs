use crux_core::testing::AppTester;
use lingopod::view::{CardKind, OptionState};
use lingopod::{
    App, DetailTab, Effect, EpisodeId, Event, Level, Model, PlaybackConfig, PlaybackMode, Screen,
    TimerOperation, Topic, ViewState,
};

fn timer_ops(effects: &[Effect]) -> Vec<TimerOperation> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Timer(request) => Some(request.operation.clone()),
            Effect::Render(_) => None,
        })
        .collect()
}

fn play(app: &AppTester<App, Effect>, model: &mut Model, id: &str) {
    app.update(
        Event::PlayEpisode {
            episode_id: EpisodeId::new(id),
        },
        model,
    );
}

fn daily_life_model() -> Model {
    let mut model = Model::default();
    model.selection.topic = Some(Topic::DailyLife);
    model
}

#[test]
fn test_play_records_history_every_time() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    play(&app, &mut model, "2");
    play(&app, &mut model, "2");

    assert_eq!(
        model.engagement.history,
        vec![EpisodeId::new("2"), EpisodeId::new("2")]
    );
    assert_eq!(model.playback.last_played, Some(EpisodeId::new("2")));
    assert!(model.playback.is_playing);

    app.update(Event::TogglePlay, &mut model);
    assert!(!model.playback.is_playing);
    assert_eq!(model.engagement.history.len(), 2);
}

#[test]
fn test_unknown_episode_is_ignored() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    play(&app, &mut model, "404");
    assert!(model.engagement.history.is_empty());
    assert!(!model.playback.is_playing);
    assert_eq!(model.session.ticker, None);
}

#[test]
fn test_ticks_reach_end_and_auto_advance() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::with_config(PlaybackConfig {
        progress_step: 50.0,
        ..PlaybackConfig::default()
    });
    model.selection.topic = Some(Topic::DailyLife);

    play(&app, &mut model, "1");

    let tick = model.session.ticker.unwrap();
    app.update(Event::ProgressTick { token: tick }, &mut model);
    assert!((model.session.progress - 50.0).abs() < f64::EPSILON);

    let tick = model.session.ticker.unwrap();
    let update = app.update(Event::ProgressTick { token: tick }, &mut model);
    assert!((model.session.progress - 100.0).abs() < f64::EPSILON);
    assert_eq!(model.session.ticker, None);

    let pending = model.session.pending_advance.clone().expect("advance scheduled");
    assert_eq!(pending.next, EpisodeId::new("6"));
    assert_eq!(
        timer_ops(&update.effects),
        vec![TimerOperation::NotifyAfter {
            token: pending.token,
            millis: 500
        }]
    );

    let update = app.update(
        Event::AutoAdvanceElapsed {
            token: pending.token,
        },
        &mut model,
    );
    assert_eq!(model.playback.last_played, Some(EpisodeId::new("6")));
    assert_eq!(model.active_episode_id(app_catalog()), Some(EpisodeId::new("6")));
    assert!(model.playback.is_playing);
    assert!(model.session.progress.abs() < f64::EPSILON);
    assert_eq!(
        model.engagement.history,
        vec![EpisodeId::new("6"), EpisodeId::new("1")]
    );

    let next_tick = model.session.ticker.expect("ticker restarted");
    assert_eq!(
        timer_ops(&update.effects),
        vec![TimerOperation::NotifyAfter {
            token: next_tick,
            millis: 100
        }]
    );
}

fn app_catalog() -> &'static lingopod::Catalog {
    use std::sync::OnceLock;
    static CATALOG: OnceLock<lingopod::Catalog> = OnceLock::new();
    CATALOG.get_or_init(lingopod::Catalog::builtin)
}

#[test]
fn test_end_of_filtered_list_stops() {
    let app = AppTester::<App, Effect>::default();
    let mut model = daily_life_model();

    play(&app, &mut model, "7");
    let update = app.update(Event::SeekTo { percent: 100.0 }, &mut model);

    assert!(!model.playback.is_playing);
    assert!(model.session.progress.abs() < f64::EPSILON);
    assert_eq!(model.session.pending_advance, None);
    assert_eq!(model.playback.last_played, Some(EpisodeId::new("7")));
    assert!(timer_ops(&update.effects)
        .iter()
        .all(|op| matches!(op, TimerOperation::Cancel { .. })));
}

#[test]
fn test_pause_cancels_pending_advance() {
    let app = AppTester::<App, Effect>::default();
    let mut model = daily_life_model();

    play(&app, &mut model, "1");
    app.update(Event::SeekTo { percent: 100.0 }, &mut model);
    let pending = model.session.pending_advance.clone().unwrap();

    let update = app.update(Event::TogglePlay, &mut model);
    assert_eq!(model.session.pending_advance, None);
    assert!(timer_ops(&update.effects).contains(&TimerOperation::Cancel {
        token: pending.token
    }));

    // A callback that raced the cancellation changes nothing.
    app.update(
        Event::AutoAdvanceElapsed {
            token: pending.token,
        },
        &mut model,
    );
    assert_eq!(model.playback.last_played, Some(EpisodeId::new("1")));
    assert!(!model.playback.is_playing);
    assert_eq!(model.engagement.history.len(), 1);
}

#[test]
fn test_resume_at_end_schedules_advance() {
    let app = AppTester::<App, Effect>::default();
    let mut model = daily_life_model();

    play(&app, &mut model, "1");
    app.update(Event::SeekTo { percent: 100.0 }, &mut model);
    app.update(Event::TogglePlay, &mut model);
    assert_eq!(model.session.pending_advance, None);

    let update = app.update(Event::TogglePlay, &mut model);
    assert!(model.playback.is_playing);
    let pending = model.session.pending_advance.clone().expect("advance scheduled");
    assert_eq!(pending.next, EpisodeId::new("6"));
    assert_eq!(model.session.ticker, None);
    assert_eq!(
        timer_ops(&update.effects),
        vec![TimerOperation::NotifyAfter {
            token: pending.token,
            millis: 500
        }]
    );
}

#[test]
fn test_resume_after_parking_at_end_runs_completion() {
    let app = AppTester::<App, Effect>::default();
    let mut model = daily_life_model();
    app.update(
        Event::Navigate {
            screen: Screen::TopicHub,
        },
        &mut model,
    );

    play(&app, &mut model, "1");
    app.update(Event::TogglePlay, &mut model);
    app.update(Event::SeekTo { percent: 100.0 }, &mut model);
    assert!((model.session.progress - 100.0).abs() < f64::EPSILON);
    assert_eq!(model.session.pending_advance, None);

    app.update(Event::BottomPlayPressed, &mut model);
    assert_eq!(
        model.session.pending_advance.clone().map(|p| p.next),
        Some(EpisodeId::new("6"))
    );

    // At the end of the list, resuming stops instead.
    play(&app, &mut model, "7");
    app.update(Event::TogglePlay, &mut model);
    app.update(Event::SeekTo { percent: 100.0 }, &mut model);
    app.update(Event::PlayActiveEpisode, &mut model);
    assert!(!model.playback.is_playing);
    assert!(model.session.progress.abs() < f64::EPSILON);
    assert_eq!(model.session.pending_advance, None);
    assert_eq!(model.session.ticker, None);
}

#[test]
fn test_seek_back_cancels_pending_advance() {
    let app = AppTester::<App, Effect>::default();
    let mut model = daily_life_model();

    play(&app, &mut model, "1");
    app.update(Event::SeekTo { percent: 100.0 }, &mut model);
    assert!(model.session.pending_advance.is_some());

    app.update(Event::SeekTo { percent: 25.0 }, &mut model);
    assert_eq!(model.session.pending_advance, None);
    assert!((model.session.progress - 25.0).abs() < f64::EPSILON);
    assert!(model.session.ticker.is_some());
}

#[test]
fn test_filter_change_cancels_advance_and_resets_card() {
    let app = AppTester::<App, Effect>::default();
    let mut model = daily_life_model();

    play(&app, &mut model, "1");
    app.update(Event::SeekTo { percent: 100.0 }, &mut model);
    assert!(model.session.pending_advance.is_some());

    app.update(Event::SetTopic { topic: Topic::Food }, &mut model);
    assert_eq!(model.session.pending_advance, None);
    assert_eq!(model.playback.selected, None);
    assert_eq!(
        model.active_episode_id(app_catalog()),
        Some(EpisodeId::new("3"))
    );
    assert!(model.session.progress.abs() < f64::EPSILON);
    // Episode 1 is still the last played, but it is no longer on the card.
    assert!(!model.is_active_playing(app_catalog()));
    assert_eq!(model.session.ticker, None);
}

#[test]
fn test_speed_scales_progress() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(Event::CyclePlaybackSpeed, &mut model);
    play(&app, &mut model, "5");
    let tick = model.session.ticker.unwrap();
    app.update(Event::ProgressTick { token: tick }, &mut model);

    assert!((model.session.progress - 0.625).abs() < 1e-9);
}

#[test]
fn test_mode_cycles_independently_of_playback() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(Event::CyclePlaybackMode, &mut model);
    assert_eq!(model.playback.mode, PlaybackMode::Repeat);
    app.update(Event::CyclePlaybackMode, &mut model);
    app.update(Event::CyclePlaybackMode, &mut model);
    assert_eq!(model.playback.mode, PlaybackMode::List);
    assert!(!model.playback.is_playing);
}

#[test]
fn test_bottom_play_on_hub_toggles_active_episode() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(
        Event::SetTopic {
            topic: Topic::Travel,
        },
        &mut model,
    );
    app.update(
        Event::Navigate {
            screen: Screen::TopicHub,
        },
        &mut model,
    );

    app.update(Event::BottomPlayPressed, &mut model);
    assert_eq!(model.playback.last_played, Some(EpisodeId::new("2")));
    assert!(model.playback.is_playing);
    assert_eq!(model.navigation.current, Screen::TopicHub);

    app.update(Event::BottomPlayPressed, &mut model);
    assert!(!model.playback.is_playing);
    assert_eq!(model.engagement.history.len(), 1);

    let view = app.view(&model);
    assert_eq!(view.bottom_nav.map(|b| b.is_playing), Some(false));
}

#[test]
fn test_bottom_play_elsewhere_opens_player() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::SetTopic { topic: Topic::Food }, &mut model);
    app.update(Event::SetLevel { level: Level::A2 }, &mut model);
    app.update(
        Event::Navigate {
            screen: Screen::Profile,
        },
        &mut model,
    );

    app.update(Event::BottomPlayPressed, &mut model);
    assert_eq!(model.navigation.current, Screen::Player);
    assert_eq!(model.navigation.previous, Some(Screen::Profile));
    assert_eq!(model.playback.last_played, Some(EpisodeId::new("3")));
    assert!(model.playback.is_playing);

    // Paused, back on the profile: pressing again resumes without a new history entry.
    app.update(Event::TogglePlay, &mut model);
    app.update(
        Event::Navigate {
            screen: Screen::Profile,
        },
        &mut model,
    );
    app.update(Event::BottomPlayPressed, &mut model);
    assert!(model.playback.is_playing);
    assert_eq!(model.engagement.history.len(), 1);
    assert_eq!(model.navigation.current, Screen::Player);
}

#[test]
fn test_episode_kind_toggle_and_play_active() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(
        Event::SetTopic {
            topic: Topic::Travel,
        },
        &mut model,
    );
    app.update(
        Event::Navigate {
            screen: Screen::TopicHub,
        },
        &mut model,
    );

    match app.view(&model).state {
        ViewState::TopicHub {
            card_kind, latest, ..
        } => {
            assert_eq!(card_kind, CardKind::DailyPick);
            assert_eq!(latest.len(), 1);
        }
        _ => panic!("expected topic hub"),
    }

    app.update(Event::ToggleEpisodeKind, &mut model);
    match app.view(&model).state {
        ViewState::TopicHub {
            card, card_kind, ..
        } => {
            assert_eq!(card_kind, CardKind::Latest);
            assert_eq!(card.map(|c| c.id), Some(EpisodeId::new("8")));
        }
        _ => panic!("expected topic hub"),
    }

    app.update(Event::PlayActiveEpisode, &mut model);
    assert_eq!(model.playback.last_played, Some(EpisodeId::new("8")));

    app.update(Event::PlayActiveEpisode, &mut model);
    assert!(!model.playback.is_playing);
    assert_eq!(model.playback.last_played, Some(EpisodeId::new("8")));
}

#[test]
fn test_selecting_another_episode_resets_session() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    play(&app, &mut model, "1");
    app.update(Event::SeekTo { percent: 40.0 }, &mut model);
    app.update(
        Event::SelectEpisode {
            episode_id: EpisodeId::new("4"),
        },
        &mut model,
    );

    assert!(model.session.progress.abs() < f64::EPSILON);
    // Only the card changed; nothing new is playing.
    assert_eq!(model.playback.last_played, Some(EpisodeId::new("1")));
    assert!(!model.is_active_playing(app_catalog()));
    assert_eq!(model.session.ticker, None);
}

#[test]
fn test_quiz_awards_xp_once_per_answer() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    play(&app, &mut model, "3");
    app.update(
        Event::ShowDetailTab {
            tab: DetailTab::Quiz,
        },
        &mut model,
    );

    app.update(
        Event::AnswerQuiz {
            question: 0,
            option: 1,
        },
        &mut model,
    );
    assert_eq!(model.engagement.xp, 1300);

    app.update(
        Event::AnswerQuiz {
            question: 0,
            option: 1,
        },
        &mut model,
    );
    assert_eq!(model.engagement.xp, 1300);

    app.update(
        Event::Navigate {
            screen: Screen::Player,
        },
        &mut model,
    );
    match app.view(&model).state {
        ViewState::Player { episode, tab, .. } => {
            assert_eq!(tab, DetailTab::Quiz);
            let quiz = episode.unwrap().quiz;
            assert!(quiz[0].is_answered);
            assert_eq!(quiz[0].options[1].state, OptionState::Correct);
            assert!(quiz[0].explanation.is_some());
        }
        _ => panic!("expected player"),
    }

    // Switching tabs clears the answers, so the question can be retaken.
    app.update(
        Event::ShowDetailTab {
            tab: DetailTab::Transcript,
        },
        &mut model,
    );
    app.update(
        Event::ShowDetailTab {
            tab: DetailTab::Quiz,
        },
        &mut model,
    );
    app.update(
        Event::AnswerQuiz {
            question: 0,
            option: 0,
        },
        &mut model,
    );
    assert_eq!(model.engagement.xp, 1300);
}

#[test]
fn test_record_completion_and_favorites() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    for _ in 0..3 {
        app.update(Event::RecordCompletion { xp: 50 }, &mut model);
    }
    assert_eq!(model.engagement.xp, 1400);

    let id = EpisodeId::new("4");
    app.update(
        Event::ToggleFavorite {
            episode_id: id.clone(),
        },
        &mut model,
    );
    assert!(model.engagement.is_favorite(&id));
    app.update(
        Event::ToggleFavorite {
            episode_id: id.clone(),
        },
        &mut model,
    );
    assert!(!model.engagement.is_favorite(&id));
}

#[test]
fn test_profile_view() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    play(&app, &mut model, "2");
    play(&app, &mut model, "5");
    app.update(
        Event::ToggleFavorite {
            episode_id: EpisodeId::new("4"),
        },
        &mut model,
    );
    app.update(Event::SetLevel { level: Level::B1 }, &mut model);
    app.update(
        Event::Navigate {
            screen: Screen::Profile,
        },
        &mut model,
    );

    match app.view(&model).state {
        ViewState::Profile {
            level_label,
            streak,
            xp,
            xp_progress_percent,
            favorites,
            history,
            ..
        } => {
            assert_eq!(level_label, "B1");
            assert_eq!(streak, 3);
            assert_eq!(xp, 1250);
            assert!((xp_progress_percent - 62.5).abs() < f64::EPSILON);
            assert_eq!(favorites.len(), 1);
            let ids: Vec<_> = history.into_iter().map(|c| c.id).collect();
            assert_eq!(ids, vec![EpisodeId::new("5"), EpisodeId::new("2")]);
        }
        _ => panic!("expected profile"),
    }
}

#[test]
fn test_hub_progress_view() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(
        Event::SetTopic {
            topic: Topic::Tech,
        },
        &mut model,
    );
    app.update(Event::PlayActiveEpisode, &mut model);
    app.update(Event::SeekTo { percent: 50.0 }, &mut model);
    app.update(
        Event::Navigate {
            screen: Screen::TopicHub,
        },
        &mut model,
    );

    match app.view(&model).state {
        ViewState::TopicHub {
            is_playing,
            progress,
            ..
        } => {
            assert!(is_playing);
            assert_eq!(progress.elapsed, "2:30");
            assert_eq!(progress.speed, "1x");
        }
        _ => panic!("expected topic hub"),
    }
}
