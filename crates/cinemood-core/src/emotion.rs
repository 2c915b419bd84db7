/// Icon used for unknown emotions and for the empty stats panel.
pub const DEFAULT_ICON: &str = "chatbot-logo.png";
pub const ICON_DIR: &str = "../static/assets/img";

/// The emotion categories the backend classifies users into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Anger,
    Anxiety,
    Sadness,
    Loneliness,
    Boredom,
    Curiosity,
    Happiness,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Anger => "분노",
            Emotion::Anxiety => "불안",
            Emotion::Sadness => "슬픔",
            Emotion::Loneliness => "외로움",
            Emotion::Boredom => "심심",
            Emotion::Curiosity => "탐구",
            Emotion::Happiness => "행복",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().into_iter().find(|e| e.as_str() == label.trim())
    }

    pub fn all() -> Vec<Emotion> {
        vec![
            Emotion::Anger,
            Emotion::Anxiety,
            Emotion::Sadness,
            Emotion::Loneliness,
            Emotion::Boredom,
            Emotion::Curiosity,
            Emotion::Happiness,
        ]
    }

    pub fn icon_file(&self) -> String {
        format!("{}.gif", self.as_str())
    }

    /// Stand-in for the animated icon on a terminal.
    pub fn glyph(&self) -> &'static str {
        match self {
            Emotion::Anger => "😠",
            Emotion::Anxiety => "😰",
            Emotion::Sadness => "😢",
            Emotion::Loneliness => "🥺",
            Emotion::Boredom => "😐",
            Emotion::Curiosity => "🧐",
            Emotion::Happiness => "😊",
        }
    }
}

/// Icon asset path for a label, falling back to the default icon.
pub fn icon_for_label(label: &str) -> String {
    let file = Emotion::from_label(label)
        .map(|e| e.icon_file())
        .unwrap_or_else(|| DEFAULT_ICON.to_string());
    format!("{}/{}", ICON_DIR, file)
}

pub fn glyph_for_label(label: &str) -> &'static str {
    Emotion::from_label(label).map(|e| e.glyph()).unwrap_or("🤖")
}
