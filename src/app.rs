use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::error::SupplyError;
use crate::engine::{GameEvent, GameSession, GameSummary, SessionSettings, SpawnTicket};
use crate::event::AppEvent;
use crate::generator::http::HttpWordSource;
use crate::generator::pool::WordPool;
use crate::generator::worker::FetchWorker;
use crate::generator::{LocalWordSource, WordEntry, WordSource};
use crate::store::json_store::JsonStore;
use crate::store::remote::{HttpScoreSink, RemoteScore, ScoreSink, ScoreSubmission, submit_detached};
use crate::store::schema::{ProfileData, ScoreHistory, ScoreRecord};
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::layout::GameLayout;
use crate::ui::theme::Theme;

const LEADERBOARD_SIZE: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Game,
    GameOver,
    Leaderboard,
    Profile,
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub profile: ProfileData,
    pub scores: ScoreHistory,
    pub store: Option<JsonStore>,
    pub session: Option<GameSession>,
    pub last_summary: Option<GameSummary>,
    /// Best score before the last game, for the "new best" banner.
    pub previous_best: u64,
    pub remote_top: Option<Vec<RemoteScore>>,
    pub bio_draft: Option<String>,
    pub play_width: u16,
    pub should_quit: bool,
    local_words: LocalWordSource,
    fetcher: Option<FetchWorker>,
    score_sink: Option<Arc<dyn ScoreSink>>,
    events_tx: Option<Sender<AppEvent>>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> Self {
        let store = JsonStore::new()
            .map_err(|e| warn!(error = %e, "no data dir, progress will not be saved"))
            .ok();
        Self::with_parts(config, store, Local::now().date_naive(), seed)
    }

    pub fn with_parts(
        config: Config,
        store: Option<JsonStore>,
        today: NaiveDate,
        seed: Option<u64>,
    ) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_else(|| {
            warn!(theme = %config.theme, available = ?Theme::available_themes(), "unknown theme");
            Theme::default()
        });
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);

        let (mut profile, scores) = match store {
            Some(ref s) => (s.load_profile_or_reset(), s.load_scores()),
            None => (ProfileData::default(), ScoreHistory::default()),
        };
        profile.username = config.player_name.clone();
        profile.register_login(today);
        info!(streak = profile.login_streak, "player logged in");

        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let local_rng = SmallRng::seed_from_u64(rng.gen_range(0..=u64::MAX));
        let local_words = LocalWordSource::new(WordPool::load(), local_rng);

        let mut app = Self {
            screen: AppScreen::Menu,
            menu,
            theme,
            config,
            profile,
            scores,
            store,
            session: None,
            last_summary: None,
            previous_best: 0,
            remote_top: None,
            bio_draft: None,
            play_width: 80,
            should_quit: false,
            local_words,
            fetcher: None,
            score_sink: None,
            events_tx: None,
            rng,
        };
        app.save_profile();
        app
    }

    /// Starts the background word fetcher and score sink. Without this the
    /// app runs fully offline on the built-in pool.
    pub fn connect(&mut self, tx: Sender<AppEvent>) {
        self.events_tx = Some(tx.clone());
        if !self.config.network_enabled {
            info!("network disabled, using built-in words");
            return;
        }
        let source: Arc<dyn WordSource> = Arc::new(HttpWordSource::new(&self.config.api_base_url));
        self.fetcher = Some(FetchWorker::spawn(source, move |ticket, result| {
            tx.send(AppEvent::WordsFetched { ticket, result }).is_ok()
        }));
        self.score_sink = Some(Arc::new(HttpScoreSink::new(&self.config.api_base_url)));
        info!(api = %self.config.api_base_url, "network enabled");
    }

    // ---- navigation ----

    pub fn go_to_menu(&mut self) {
        self.session = None;
        self.bio_draft = None;
        self.screen = AppScreen::Menu;
    }

    pub fn activate_menu(&mut self, action: MenuAction) {
        match action {
            MenuAction::Play => self.start_game(),
            MenuAction::Leaderboard => self.go_to_leaderboard(),
            MenuAction::Profile => self.go_to_profile(),
            MenuAction::Quit => self.should_quit = true,
        }
    }

    pub fn go_to_leaderboard(&mut self) {
        self.screen = AppScreen::Leaderboard;
        self.refresh_remote_top();
    }

    pub fn go_to_profile(&mut self) {
        self.bio_draft = None;
        self.screen = AppScreen::Profile;
    }

    pub fn local_top(&self) -> Vec<ScoreRecord> {
        self.scores.top(LEADERBOARD_SIZE)
    }

    fn refresh_remote_top(&mut self) {
        let (Some(sink), Some(tx)) = (self.score_sink.clone(), self.events_tx.clone()) else {
            return;
        };
        thread::spawn(move || {
            let _ = tx.send(AppEvent::RemoteScores(sink.top(LEADERBOARD_SIZE)));
        });
    }

    pub fn on_remote_scores(&mut self, rows: Vec<RemoteScore>) {
        self.remote_top = Some(rows);
    }

    // ---- game ----

    pub fn start_game(&mut self) {
        let settings = SessionSettings {
            tuning: self.config.tuning.clone(),
            unlock_policy: self.config.power_unlock_policy,
            play_width: self.play_width,
            pool: WordPool::load(),
        };
        let rng = SmallRng::seed_from_u64(self.rng.gen_range(0..=u64::MAX));
        self.session = Some(GameSession::new(settings, rng));
        self.last_summary = None;
        self.screen = AppScreen::Game;
        info!("game started");
    }

    /// Recomputes the board width after a terminal resize.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.play_width = GameLayout::new(Rect::new(0, 0, width, height)).play_width();
        if let Some(session) = self.session.as_mut() {
            session.set_play_width(self.play_width);
        }
    }

    /// Moves the running game forward and reacts to what happened.
    pub fn advance(&mut self, dt: Duration) {
        if self.screen != AppScreen::Game {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.advance(dt);
        }
        self.pump();
    }

    pub fn on_words_fetched(&mut self, ticket: SpawnTicket, result: Result<Vec<WordEntry>, SupplyError>) {
        if let Some(session) = self.session.as_mut() {
            session.complete_spawn(ticket, result);
        }
        self.pump();
    }

    /// Sends out word requests and handles session events.
    pub fn pump(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match &self.fetcher {
            Some(fetcher) => {
                for req in session.take_spawn_requests() {
                    if !fetcher.request(req.clone()) {
                        let err = SupplyError::Unavailable("fetch worker stopped".to_string());
                        session.complete_spawn(req.ticket, Err(err));
                    }
                }
            }
            None => {
                session.resolve_spawns_with(&self.local_words);
            }
        }

        for event in session.drain_events() {
            match event {
                GameEvent::GameOver(summary) => self.finish_game(summary),
                GameEvent::Exited => {
                    info!("player left the game");
                    self.go_to_menu();
                    return;
                }
                other => debug!(?other, "game event"),
            }
        }
    }

    pub fn type_char(&mut self, ch: char) {
        if let Some(session) = self.session.as_mut() {
            session.type_char(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.backspace();
        }
    }

    pub fn submit(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.submit();
        }
        self.pump();
    }

    pub fn activate_power(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.activate_power();
        }
        self.pump();
    }

    pub fn toggle_pause(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.toggle_pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.session.as_ref().is_some_and(GameSession::is_paused)
    }

    pub fn exit_game(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.exit();
        }
        self.pump();
    }

    fn finish_game(&mut self, summary: GameSummary) {
        self.previous_best = self.profile.highest_score;
        self.profile.record_game(&summary);
        self.scores.push(ScoreRecord::from_summary(
            &self.config.player_name,
            &summary,
            Utc::now(),
        ));
        self.save_profile();
        if let Some(store) = &self.store
            && let Err(e) = store.save_scores(&self.scores)
        {
            warn!(error = %e, "failed to save score history");
        }
        if let Some(sink) = &self.score_sink {
            let submission = ScoreSubmission::new(&self.config.player_name, &self.profile.user_id, &summary);
            submit_detached(Arc::clone(sink), submission);
        }
        self.last_summary = Some(summary);
        self.screen = AppScreen::GameOver;
    }

    // ---- profile ----

    pub fn start_bio_edit(&mut self) {
        self.bio_draft = Some(self.profile.bio.clone());
    }

    pub fn bio_push(&mut self, ch: char) {
        if let Some(draft) = self.bio_draft.as_mut()
            && !ch.is_control()
        {
            draft.push(ch);
        }
    }

    pub fn bio_pop(&mut self) {
        if let Some(draft) = self.bio_draft.as_mut() {
            draft.pop();
        }
    }

    pub fn commit_bio(&mut self) {
        if let Some(draft) = self.bio_draft.take() {
            self.profile.bio = draft.trim().to_string();
            self.save_profile();
        }
    }

    pub fn cancel_bio(&mut self) {
        self.bio_draft = None;
    }

    fn save_profile(&self) {
        if let Some(store) = &self.store
            && let Err(e) = store.save_profile(&self.profile)
        {
            warn!(error = %e, "failed to save profile");
        }
    }
}
