//! Turn-based recommendation chat.
//!
//! The session is a plain value: `submit` produces the outgoing request plus the
//! session to commit if the turn succeeds, and `resolve` turns the backend's
//! answer into transcript entries and the next session. A failed turn simply
//! keeps the session it started from.

use crate::model::{ChatRequest, ChatResponse, RecommendedMovie, TurnMarker};
use crate::poster::resolve_poster;
use crate::state::ChatMessage;

pub const GREETING: &str = "너의 기분에 맞는 영화를 추천해줄게! 😊\n오늘 기분이 어때?";
pub const FEEDBACK_PROMPT: &str = "내가 추천해준 영화가 마음에 들어? 🎬";
pub const CONNECTION_ERROR: &str = "⚠️ 서버 연결 오류";
/// Sub-emotion value meaning "nothing more specific was detected".
pub const NO_SUB_EMOTION: &str = "세부감정 없음";
pub const UNTITLED: &str = "No Title";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Collecting emotion-related input and counting turns.
    #[default]
    Intake,
    /// A recommendation was delivered; waiting for the user's reaction.
    Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChatSession {
    pub phase: Phase,
    pub turn: u32,
}

/// A poster in the recommendation carousel.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterTile {
    pub title: String,
    pub poster_url: String,
}

impl PosterTile {
    pub fn from_recommended(movie: &RecommendedMovie, image_base: &str) -> Self {
        Self {
            title: movie
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            poster_url: resolve_poster(
                movie.poster.as_deref(),
                movie.poster_path.as_deref(),
                image_base,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEntry {
    Message(ChatMessage),
    Carousel(Vec<PosterTile>),
}

impl TranscriptEntry {
    pub fn bot(content: impl Into<String>) -> Self {
        TranscriptEntry::Message(ChatMessage::bot(content))
    }

    pub fn user(content: impl Into<String>) -> Self {
        TranscriptEntry::Message(ChatMessage::user(content))
    }
}

/// A submitted message waiting for the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTurn {
    pub request: ChatRequest,
    /// Session as it was when the message was submitted.
    pub sent_from: ChatSession,
    /// Session to commit once the backend answers.
    pub next: ChatSession,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub session: ChatSession,
    pub entries: Vec<TranscriptEntry>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opening bot message for a fresh conversation.
    pub fn greeting() -> TranscriptEntry {
        TranscriptEntry::bot(GREETING)
    }

    /// `None` for blank input, which is never sent.
    pub fn submit(&self, raw: &str) -> Option<PendingTurn> {
        let message = raw.trim();
        if message.is_empty() {
            return None;
        }

        let (next, turn) = match self.phase {
            Phase::Intake => {
                let next = ChatSession {
                    phase: Phase::Intake,
                    turn: self.turn.saturating_add(1),
                };
                (next, TurnMarker::Intake(next.turn))
            }
            Phase::Feedback => (*self, TurnMarker::AfterRecommend),
        };

        Some(PendingTurn {
            request: ChatRequest { message: message.to_string(), turn },
            sent_from: *self,
            next,
        })
    }

    /// Bot message appended when a turn fails. The session stays where it was.
    pub fn failure_entry() -> TranscriptEntry {
        TranscriptEntry::bot(CONNECTION_ERROR)
    }
}

impl PendingTurn {
    /// The user's bubble, appended before the request goes out.
    pub fn user_entry(&self) -> TranscriptEntry {
        TranscriptEntry::user(self.request.message.clone())
    }

    pub fn resolve(self, response: ChatResponse, image_base: &str) -> ChatOutcome {
        let mut entries = Vec::new();

        if let Some(reply) = response.reply.as_deref().filter(|r| !r.is_empty()) {
            entries.push(TranscriptEntry::bot(reply));
        }

        if self.sent_from.phase == Phase::Intake && response.is_final {
            entries.push(TranscriptEntry::bot(compose_summary(&response)));

            if !response.movies.is_empty() {
                let tiles = response
                    .movies
                    .iter()
                    .map(|m| PosterTile::from_recommended(m, image_base))
                    .collect();
                entries.push(TranscriptEntry::Carousel(tiles));
            }

            entries.push(TranscriptEntry::bot(FEEDBACK_PROMPT));

            return ChatOutcome {
                session: ChatSession { phase: Phase::Feedback, turn: 0 },
                entries,
            };
        }

        ChatOutcome { session: self.next, entries }
    }
}

/// The recap shown when the backend delivers its recommendation.
pub fn compose_summary(response: &ChatResponse) -> String {
    let mut combined = format!("🧠 요약: {}\n", response.summary.as_deref().unwrap_or_default());
    combined.push_str(&format!("🎭 대표 감정: {}\n", response.emotion.as_deref().unwrap_or_default()));

    if let Some(sub) = response
        .sub_emotion
        .as_deref()
        .filter(|s| !s.is_empty() && *s != NO_SUB_EMOTION)
    {
        combined.push_str(&format!("💫 세부 감정: {}\n", sub));
    }

    combined.push_str("🎥 추천 영화 목록:\n");
    for movie in &response.movies {
        combined.push_str(&format!("- {}\n", movie.title.as_deref().unwrap_or(UNTITLED)));
    }

    combined
}
