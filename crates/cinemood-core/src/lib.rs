pub mod api;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod emotion;
pub mod error;
pub mod model;
pub mod poster;
pub mod sequence;
pub mod state;
pub mod stats;
pub mod top10;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export main types for convenience
pub use api::{BackendClient, TmdbClient};
pub use catalog::{ListingView, MovieCard};
pub use chat::{ChatOutcome, ChatSession, PendingTurn, Phase, PosterTile, TranscriptEntry};
pub use config::Config;
pub use emotion::Emotion;
pub use error::{ApiError, ApiResult};
pub use sequence::{RequestId, RequestSequencer};
pub use state::{ChatMessage, ChatRole};
pub use stats::{EmotionRotator, StatsPanel, StatsView};
pub use top10::{Top10Card, Top10View};
