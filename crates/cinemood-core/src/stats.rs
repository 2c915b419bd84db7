//! Emotion statistics, cycled one entry at a time.

use std::time::Duration;
use tracing::error;

use crate::api::BackendClient;
use crate::emotion::{icon_for_label, DEFAULT_ICON, ICON_DIR};
use crate::model::EmotionStat;

pub const NO_DATA: &str = "데이터가 아직 없어요 😢";
pub const CONNECTION_ERROR: &str = "서버 연결 오류 😢";
pub const FADE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub headline: String,
    pub label: String,
    pub count: u64,
    pub icon: String,
}

impl StatsView {
    fn from_stat(stat: &EmotionStat) -> Self {
        Self {
            headline: format!(
                "사용자들이 분류된 감정은 {} ({}회) 입니다.",
                stat.rep_emotion, stat.count
            ),
            label: stat.rep_emotion.clone(),
            count: stat.count,
            icon: icon_for_label(&stat.rep_emotion),
        }
    }
}

/// Cycles through a non-empty list of stats, wrapping at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionRotator {
    entries: Vec<EmotionStat>,
    index: usize,
}

impl EmotionRotator {
    pub fn new(entries: Vec<EmotionStat>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries, index: 0 })
        }
    }

    pub fn current(&self) -> StatsView {
        StatsView::from_stat(&self.entries[self.index])
    }

    pub fn advance(&mut self) -> StatsView {
        self.index = (self.index + 1) % self.entries.len();
        self.current()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatsPanel {
    Loading,
    Rotating(EmotionRotator),
    Empty,
    Failed(String),
}

impl StatsPanel {
    pub fn from_stats(stats: Vec<EmotionStat>) -> Self {
        match EmotionRotator::new(stats) {
            Some(rotator) => StatsPanel::Rotating(rotator),
            None => StatsPanel::Empty,
        }
    }

    /// Move to the next entry; a no-op unless rotating.
    pub fn advance(&mut self) {
        if let StatsPanel::Rotating(rotator) = self {
            rotator.advance();
        }
    }

    /// Icon shown next to the text; the default icon outside of rotation.
    pub fn icon(&self) -> String {
        match self {
            StatsPanel::Rotating(rotator) => rotator.current().icon,
            _ => format!("{}/{}", ICON_DIR, DEFAULT_ICON),
        }
    }
}

pub async fn load_stats(backend: &BackendClient) -> StatsPanel {
    match backend.stats().await {
        Ok(stats) => StatsPanel::from_stats(stats),
        Err(e) => {
            error!(error = %e, "failed to load emotion stats");
            StatsPanel::Failed(CONNECTION_ERROR.to_string())
        }
    }
}
