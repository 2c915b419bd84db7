use std::time::Instant;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, warn};

use cinemood_core::catalog::{self, normalize_query};
use cinemood_core::model::ChatResponse;
use cinemood_core::stats::{self, FADE};
use cinemood_core::top10;
use cinemood_core::{
    ApiError, BackendClient, ChatSession, Config, ListingView, PendingTurn, RequestId,
    RequestSequencer, StatsPanel, TmdbClient, Top10View, TranscriptEntry,
};
use crate::tui::AppEvent;
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Catalog,
    Chat,
    Stats,
}

impl Screen {
    pub fn all() -> [Screen; 3] {
        [Screen::Catalog, Screen::Chat, Screen::Stats]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Catalog => "영화",
            Screen::Chat => "챗봇",
            Screen::Stats => "통계",
        }
    }

    pub fn next(&self) -> Screen {
        match self {
            Screen::Catalog => Screen::Chat,
            Screen::Chat => Screen::Stats,
            Screen::Stats => Screen::Catalog,
        }
    }

    pub fn prev(&self) -> Screen {
        match self {
            Screen::Catalog => Screen::Stats,
            Screen::Chat => Screen::Catalog,
            Screen::Stats => Screen::Chat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,

    // Catalog state
    pub search_input: String,
    pub listing: ListingView,
    pub listing_state: ListState,
    listing_seq: RequestSequencer,

    // Chat state
    pub session: ChatSession,
    pub transcript: Vec<TranscriptEntry>,
    pub chat_input: String,
    pub chat_cursor: usize, // cursor position in chat_input, in chars
    pub chat_pending: Option<(RequestId, PendingTurn)>,
    chat_seq: RequestSequencer,
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of transcript area for scroll calculations
    pub chat_width: u16,  // Width of transcript area for wrap calculations

    // Stats & top10 state
    pub stats: StatsPanel,
    pub stats_rotated_at: Option<Instant>,
    stats_seq: RequestSequencer,
    pub top10: Top10View,
    pub top10_state: ListState,
    pub show_top10_detail: bool,
    top10_seq: RequestSequencer,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub list_area: Option<Rect>,
    pub transcript_area: Option<Rect>,

    // Clients
    pub tmdb: TmdbClient,
    pub backend: BackendClient,
    tx: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(config: &Config, tx: UnboundedSender<AppEvent>) -> Self {
        if config.tmdb_api_key.is_none() {
            warn!("no metadata API key configured; set TMDB_API_KEY or add it to the config file");
        }

        Self {
            should_quit: false,
            screen: Screen::Catalog,
            input_mode: InputMode::Normal,

            search_input: String::new(),
            listing: ListingView::Loading,
            listing_state: ListState::default(),
            listing_seq: RequestSequencer::new(),

            session: ChatSession::new(),
            transcript: vec![ChatSession::greeting()],
            chat_input: String::new(),
            chat_cursor: 0,
            chat_pending: None,
            chat_seq: RequestSequencer::new(),
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            stats: StatsPanel::Loading,
            stats_rotated_at: None,
            stats_seq: RequestSequencer::new(),
            top10: Top10View::Loading,
            top10_state: ListState::default(),
            show_top10_detail: false,
            top10_seq: RequestSequencer::new(),

            animation_frame: 0,

            list_area: None,
            transcript_area: None,

            tmdb: TmdbClient::from_config(config),
            backend: BackendClient::from_config(config),
            tx,
        }
    }

    /// Kick off everything a page load would: popular movies, stats and top10.
    pub fn start(&mut self) {
        self.load_popular();
        self.load_stats();
        self.load_top10();
    }

    // Catalog

    pub fn load_popular(&mut self) {
        let id = self.listing_seq.issue();
        self.listing = ListingView::Loading;
        let tmdb = self.tmdb.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let view = catalog::load_popular(&tmdb).await;
            let _ = tx.send(AppEvent::Listing(id, view));
        });
    }

    pub fn perform_search(&mut self) {
        let Some(query) = normalize_query(&self.search_input) else {
            return;
        };

        let id = self.listing_seq.issue();
        self.listing = ListingView::Loading;
        let tmdb = self.tmdb.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Some(view) = catalog::load_search(&tmdb, &query).await {
                let _ = tx.send(AppEvent::Listing(id, view));
            }
        });
    }

    pub fn apply_listing(&mut self, id: RequestId, view: ListingView) {
        if !self.listing_seq.is_latest(id) {
            return;
        }
        self.listing = view;
        let selected = if self.listing.cards().is_empty() { None } else { Some(0) };
        self.listing_state.select(selected);
    }

    pub fn listing_nav_down(&mut self) {
        let len = self.listing.cards().len();
        if len > 0 {
            let i = self.listing_state.selected().unwrap_or(0);
            self.listing_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn listing_nav_up(&mut self) {
        let i = self.listing_state.selected().unwrap_or(0);
        self.listing_state.select(Some(i.saturating_sub(1)));
    }

    pub fn listing_first(&mut self) {
        if !self.listing.cards().is_empty() {
            self.listing_state.select(Some(0));
        }
    }

    pub fn listing_last(&mut self) {
        let len = self.listing.cards().len();
        if len > 0 {
            self.listing_state.select(Some(len - 1));
        }
    }

    // Chat

    pub fn submit_chat(&mut self) {
        if self.chat_pending.is_some() {
            return;
        }
        let Some(pending) = self.session.submit(&self.chat_input) else {
            return;
        };

        self.transcript.push(pending.user_entry());
        self.chat_input.clear();
        self.chat_cursor = 0;

        let id = self.chat_seq.issue();
        let request = pending.request.clone();
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.chat(&request).await;
            let _ = tx.send(AppEvent::ChatReply(id, result));
        });

        self.chat_pending = Some((id, pending));
        self.scroll_chat_to_bottom();
    }

    pub fn apply_chat_reply(&mut self, id: RequestId, result: Result<ChatResponse, ApiError>) {
        if !self.chat_seq.is_latest(id) {
            return;
        }
        let Some((_, pending)) = self.chat_pending.take() else {
            return;
        };

        match result {
            Ok(response) => {
                let outcome = pending.resolve(response, self.tmdb.image_base());
                self.session = outcome.session;
                self.transcript.extend(outcome.entries);
            }
            Err(e) => {
                error!(error = %e, "chat turn failed");
                self.transcript.push(ChatSession::failure_entry());
            }
        }
        self.scroll_chat_to_bottom();
    }

    pub fn is_waiting_for_reply(&self) -> bool {
        self.chat_pending.is_some()
    }

    /// Scroll the transcript so the newest bubble (or the pending indicator) is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };
        let visible_height = if self.chat_height > 0 {
            self.chat_height as usize
        } else {
            20
        };

        let total_lines = ui::wrapped_height(&ui::transcript_lines(self), wrap_width);
        let scroll = total_lines.saturating_sub(visible_height);
        self.chat_scroll = scroll.min(u16::MAX as usize) as u16;
    }

    // Stats & top10

    pub fn load_stats(&mut self) {
        let id = self.stats_seq.issue();
        self.stats = StatsPanel::Loading;
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let panel = stats::load_stats(&backend).await;
            let _ = tx.send(AppEvent::Stats(id, panel));
        });
    }

    pub fn apply_stats(&mut self, id: RequestId, panel: StatsPanel) {
        if self.stats_seq.is_latest(id) {
            self.stats = panel;
            self.stats_rotated_at = None;
        }
    }

    pub fn rotate_stats(&mut self) {
        if let StatsPanel::Rotating(_) = self.stats {
            self.stats.advance();
            self.stats_rotated_at = Some(Instant::now());
        }
    }

    /// True during the short fade right after a rotation.
    pub fn stats_fading(&self) -> bool {
        self.stats_rotated_at
            .map(|at| at.elapsed() < FADE)
            .unwrap_or(false)
    }

    pub fn load_top10(&mut self) {
        let id = self.top10_seq.issue();
        self.top10 = Top10View::Loading;
        let backend = self.backend.clone();
        let tmdb = self.tmdb.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let view = top10::load_top10(&backend, &tmdb).await;
            let _ = tx.send(AppEvent::Top10(id, view));
        });
    }

    pub fn apply_top10(&mut self, id: RequestId, view: Top10View) {
        if !self.top10_seq.is_latest(id) {
            return;
        }
        self.top10 = view;
        self.show_top10_detail = false;
        let selected = if self.top10.cards().is_empty() { None } else { Some(0) };
        self.top10_state.select(selected);
    }

    pub fn top10_nav_down(&mut self) {
        let len = self.top10.cards().len();
        if len > 0 {
            let i = self.top10_state.selected().unwrap_or(0);
            self.top10_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn top10_nav_up(&mut self) {
        let i = self.top10_state.selected().unwrap_or(0);
        self.top10_state.select(Some(i.saturating_sub(1)));
    }

    pub fn toggle_top10_detail(&mut self) {
        if self.top10_state.selected().is_some() {
            self.show_top10_detail = !self.show_top10_detail;
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.chat_pending.is_some() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinemood_core::chat::CONNECTION_ERROR;
    use cinemood_core::model::{Movie, TurnMarker};
    use cinemood_core::{ChatMessage, Phase, PosterTile};
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    fn closed_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn app_with_dead_backends() -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let mut config = Config::new();
        config.tmdb_base_url = closed_url();
        config.backend_url = closed_url();
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(&config, tx), rx)
    }

    fn movie(title: &str) -> Movie {
        Movie { title: title.to_string(), ..Movie::default() }
    }

    #[tokio::test]
    async fn test_stale_listing_is_discarded() {
        let (mut app, _rx) = app_with_dead_backends();

        let stale = app.listing_seq.issue();
        let latest = app.listing_seq.issue();

        app.apply_listing(latest, ListingView::Cards(vec![]));
        app.apply_listing(stale, ListingView::from_results(Some(vec![movie("Old")]), ""));
        assert_eq!(app.listing, ListingView::Cards(vec![]));
    }

    #[tokio::test]
    async fn test_blank_search_keeps_listing() {
        let (mut app, _rx) = app_with_dead_backends();
        app.listing = ListingView::NoResults;
        app.search_input = "   ".to_string();
        app.perform_search();
        assert_eq!(app.listing, ListingView::NoResults);
    }

    #[tokio::test]
    async fn test_search_failure_reaches_listing() {
        let (mut app, mut rx) = app_with_dead_backends();
        app.search_input = "인셉션".to_string();
        app.perform_search();
        assert_eq!(app.listing, ListingView::Loading);

        match rx.recv().await.unwrap() {
            AppEvent::Listing(id, view) => app.apply_listing(id, view),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(
            app.listing,
            ListingView::Failed(catalog::SEARCH_FAILED.to_string())
        );
        assert_eq!(app.listing_state.selected(), None);
    }

    #[tokio::test]
    async fn test_failed_chat_turn_keeps_session() {
        let (mut app, mut rx) = app_with_dead_backends();
        app.chat_input = "오늘 너무 힘들었어".to_string();
        app.submit_chat();

        assert!(app.is_waiting_for_reply());
        assert!(app.chat_input.is_empty());
        assert_eq!(
            app.transcript.last(),
            Some(&TranscriptEntry::user("오늘 너무 힘들었어"))
        );

        // A second submit while waiting is ignored
        app.chat_input = "여보세요?".to_string();
        app.submit_chat();
        assert_eq!(app.transcript.len(), 2);

        match rx.recv().await.unwrap() {
            AppEvent::ChatReply(id, result) => {
                assert!(result.is_err());
                app.apply_chat_reply(id, result);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        assert!(!app.is_waiting_for_reply());
        assert_eq!(app.session, ChatSession::new());
        assert_eq!(
            app.transcript.last(),
            Some(&TranscriptEntry::Message(ChatMessage::bot(CONNECTION_ERROR)))
        );
    }

    #[tokio::test]
    async fn test_chat_reply_commits_next_session() {
        let (mut app, _rx) = app_with_dead_backends();
        app.chat_input = "hi".to_string();
        app.submit_chat();

        let (id, pending) = app.chat_pending.clone().unwrap();
        assert_eq!(pending.request.turn, TurnMarker::Intake(1));

        let response = ChatResponse { reply: Some("안녕!".to_string()), ..ChatResponse::default() };
        app.apply_chat_reply(id, Ok(response));

        assert_eq!(app.session.phase, Phase::Intake);
        assert_eq!(app.session.turn, 1);
        assert_eq!(app.transcript.last(), Some(&TranscriptEntry::bot("안녕!")));
    }

    #[tokio::test]
    async fn test_rotation_only_when_rotating() {
        let (mut app, _rx) = app_with_dead_backends();
        app.rotate_stats();
        assert!(app.stats_rotated_at.is_none());

        app.stats = StatsPanel::from_stats(vec![
            cinemood_core::model::EmotionStat { rep_emotion: "슬픔".to_string(), count: 2 },
            cinemood_core::model::EmotionStat { rep_emotion: "행복".to_string(), count: 1 },
        ]);
        app.rotate_stats();
        assert!(app.stats_fading());
        match &app.stats {
            StatsPanel::Rotating(r) => assert_eq!(r.current().label, "행복"),
            other => panic!("unexpected panel: {other:?}"),
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_latest_reply_visible_after_scrolling() {
        let (mut app, _rx) = app_with_dead_backends();
        app.screen = Screen::Chat;
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        // First draw sizes the transcript area
        terminal.draw(|frame| ui::render(&mut app, frame)).unwrap();

        for i in 0..6 {
            app.transcript.push(TranscriptEntry::user(
                "오늘은 정말 길고 피곤한 하루였어. 아무것도 하기 싫어",
            ));
            app.transcript.push(TranscriptEntry::bot(format!(
                "그랬구나, 많이 힘들었겠다. 무슨 일이 있었는지 조금 더 얘기해줄래 END{i}"
            )));
        }
        app.scroll_chat_to_bottom();
        terminal.draw(|frame| ui::render(&mut app, frame)).unwrap();
        assert!(screen_text(&terminal).contains("END5"));

        app.transcript.push(TranscriptEntry::Carousel(vec![
            PosterTile {
                title: "기생충".to_string(),
                poster_url: "https://image.tmdb.org/t/p/w500/7IiTTgloJzvGI1TAYymCfbfl3vT.jpg"
                    .to_string(),
            },
            PosterTile {
                title: "어벤져스: 엔드게임".to_string(),
                poster_url: "https://image.tmdb.org/t/p/w500/z7ilT5rNN9kDo8JZmgyhM6ej2xv.jpg"
                    .to_string(),
            },
        ]));
        app.transcript.push(TranscriptEntry::bot("내가 추천해준 영화가 마음에 들어? 🎬 PROMPT"));
        app.scroll_chat_to_bottom();
        terminal.draw(|frame| ui::render(&mut app, frame)).unwrap();
        assert!(screen_text(&terminal).contains("PROMPT"));
    }

    #[test]
    fn test_short_transcript_is_not_scrolled() {
        let (mut app, _rx) = app_with_dead_backends();
        app.chat_scroll = 7;
        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, 0);
    }
}
