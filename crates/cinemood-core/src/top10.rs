//! Most-recommended movies, matched against the metadata API for posters.

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, error};

use crate::api::{BackendClient, TmdbClient};
use crate::catalog::format_rating;
use crate::error::ApiResult;
use crate::model::Movie;
use crate::poster::resolve_poster;

pub const NO_DATA: &str = "추천된 영화 데이터가 없습니다 😢";
pub const CONNECTION_ERROR: &str = "서버 연결 오류 😢";

#[derive(Debug, Clone, PartialEq)]
pub struct Top10Card {
    pub id: Option<u64>,
    pub title: String,
    pub poster_url: String,
    /// Overlay text, e.g. "⭐ 7.4 | 2019".
    pub overlay: String,
    pub overview: Option<String>,
}

impl Top10Card {
    pub fn from_movie(movie: &Movie, image_base: &str) -> Self {
        let year = movie
            .release_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| d.chars().take(4).collect::<String>())
            .unwrap_or_else(|| "N/A".to_string());

        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: resolve_poster(None, movie.poster_path.as_deref(), image_base),
            overlay: format!("⭐ {} | {}", format_rating(movie.vote_average), year),
            overview: movie.overview.clone().filter(|o| !o.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Top10View {
    Loading,
    Empty,
    Cards(Vec<Top10Card>),
    Failed(String),
}

impl Top10View {
    pub fn cards(&self) -> &[Top10Card] {
        match self {
            Top10View::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Top10View::Loading => Some("불러오는 중..."),
            Top10View::Empty => Some(NO_DATA),
            Top10View::Failed(msg) => Some(msg.as_str()),
            Top10View::Cards(_) => None,
        }
    }
}

fn parenthetical() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(.*?\)").expect("valid regex"))
}

/// "기생충 (2019)" -> "기생충"
pub fn strip_parentheticals(title: &str) -> String {
    parenthetical().replace_all(title, "").trim().to_string()
}

async fn resolve_cards(backend: &BackendClient, tmdb: &TmdbClient) -> ApiResult<Top10View> {
    let entries = backend.top10().await?;
    if entries.is_empty() {
        return Ok(Top10View::Empty);
    }

    let mut cards = Vec::new();
    for entry in &entries {
        let query = strip_parentheticals(&entry.movie);
        match tmdb.search_first(&query).await? {
            Some(movie) => cards.push(Top10Card::from_movie(&movie, tmdb.image_base())),
            None => debug!(title = %entry.movie, "no metadata match, dropping"),
        }
    }

    Ok(Top10View::Cards(cards))
}

pub async fn load_top10(backend: &BackendClient, tmdb: &TmdbClient) -> Top10View {
    match resolve_cards(backend, tmdb).await {
        Ok(view) => view,
        Err(e) => {
            error!(error = %e, "failed to load top10 movies");
            Top10View::Failed(CONNECTION_ERROR.to_string())
        }
    }
}
