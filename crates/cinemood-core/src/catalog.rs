//! Catalog browser: popular list and title search rendered as movie cards.

use tracing::error;

use crate::api::TmdbClient;
use crate::model::Movie;
use crate::poster::resolve_poster;

pub const NO_RESULTS: &str = "검색 결과가 없습니다 😢";
pub const POPULAR_FAILED: &str = "영화 데이터를 불러오지 못했습니다 😢";
pub const SEARCH_FAILED: &str = "검색 중 오류가 발생했습니다 😢";
pub const RELEASE_DATE_UNKNOWN: &str = "정보 없음";

#[derive(Debug, Clone, PartialEq)]
pub struct MovieCard {
    pub id: Option<u64>,
    pub title: String,
    pub poster_url: String,
    pub rating: String,
    pub release_date: String,
    pub overview: Option<String>,
}

impl MovieCard {
    pub fn from_movie(movie: &Movie, image_base: &str) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: resolve_poster(None, movie.poster_path.as_deref(), image_base),
            rating: format_rating(movie.vote_average),
            release_date: movie
                .release_date
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| RELEASE_DATE_UNKNOWN.to_string()),
            overview: movie.overview.clone().filter(|o| !o.is_empty()),
        }
    }
}

/// What the listing area shows. Each variant replaces whatever was there.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingView {
    Loading,
    NoResults,
    Cards(Vec<MovieCard>),
    Failed(String),
}

impl ListingView {
    pub fn from_results(results: Option<Vec<Movie>>, image_base: &str) -> Self {
        match results {
            Some(movies) if !movies.is_empty() => ListingView::Cards(
                movies.iter().map(|m| MovieCard::from_movie(m, image_base)).collect(),
            ),
            _ => ListingView::NoResults,
        }
    }

    pub fn cards(&self) -> &[MovieCard] {
        match self {
            ListingView::Cards(cards) => cards,
            _ => &[],
        }
    }

    /// The placeholder text to show instead of cards, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ListingView::Loading => Some("불러오는 중..."),
            ListingView::NoResults => Some(NO_RESULTS),
            ListingView::Failed(msg) => Some(msg.as_str()),
            ListingView::Cards(_) => None,
        }
    }
}

/// One decimal, halves rounded up; "0.0" when absent.
pub fn format_rating(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(v) if v.is_finite() => format!("{:.1}", (v * 10.0).round() / 10.0),
        _ => "0.0".to_string(),
    }
}

/// Trimmed query, or `None` when there is nothing to search for.
pub fn normalize_query(raw: &str) -> Option<String> {
    let query = raw.trim();
    if query.is_empty() {
        None
    } else {
        Some(query.to_string())
    }
}

pub async fn load_popular(client: &TmdbClient) -> ListingView {
    match client.popular(1).await {
        Ok(list) => ListingView::from_results(list.results, client.image_base()),
        Err(e) => {
            error!(error = %e, "failed to load popular movies");
            ListingView::Failed(POPULAR_FAILED.to_string())
        }
    }
}

/// `None` when the query is blank and nothing was sent.
pub async fn load_search(client: &TmdbClient, raw_query: &str) -> Option<ListingView> {
    let query = normalize_query(raw_query)?;

    let view = match client.search(&query, 1).await {
        Ok(list) => ListingView::from_results(list.results, client.image_base()),
        Err(e) => {
            error!(error = %e, query = %query, "movie search failed");
            ListingView::Failed(SEARCH_FAILED.to_string())
        }
    };
    Some(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poster::PLACEHOLDER_POSTER;
    use crate::testutil::{closed_url, serve};

    const BASE: &str = "https://image.tmdb.org/t/p/w500";

    fn movie(title: &str) -> Movie {
        Movie { title: title.to_string(), ..Movie::default() }
    }

    #[test]
    fn test_one_card_per_result_in_order() {
        let movies = vec![movie("A"), movie("B"), movie("C")];
        let view = ListingView::from_results(Some(movies), BASE);

        let titles: Vec<&str> = view.cards().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(view.message(), None);
    }

    #[test]
    fn test_empty_or_absent_results_show_placeholder() {
        for results in [None, Some(vec![])] {
            let view = ListingView::from_results(results, BASE);
            assert_eq!(view, ListingView::NoResults);
            assert!(view.cards().is_empty());
            assert_eq!(view.message(), Some(NO_RESULTS));
        }
    }

    #[test]
    fn test_card_defaults() {
        let card = MovieCard::from_movie(&movie("Untitled"), BASE);
        assert_eq!(card.poster_url, PLACEHOLDER_POSTER);
        assert_eq!(card.rating, "0.0");
        assert_eq!(card.release_date, RELEASE_DATE_UNKNOWN);
    }

    #[test]
    fn test_card_fields() {
        let m = Movie {
            id: Some(496243),
            title: "기생충".to_string(),
            poster_path: Some("/p.jpg".to_string()),
            vote_average: Some(8.5),
            release_date: Some("2019-05-30".to_string()),
            overview: Some("".to_string()),
        };
        let card = MovieCard::from_movie(&m, BASE);
        assert_eq!(card.poster_url, format!("{}/p.jpg", BASE));
        assert_eq!(card.rating, "8.5");
        assert_eq!(card.release_date, "2019-05-30");
        assert_eq!(card.overview, None);
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(Some(7.35)), "7.4");
        assert_eq!(format_rating(Some(8.0)), "8.0");
        assert_eq!(format_rating(Some(6.25)), "6.3");
        assert_eq!(format_rating(Some(0.0)), "0.0");
        assert_eq!(format_rating(None), "0.0");
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  인셉션 "), Some("인셉션".to_string()));
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(""), None);
    }

    #[tokio::test]
    async fn test_blank_search_sends_nothing() {
        let client = TmdbClient::new(&closed_url(), "key", "ko-KR", BASE);
        assert_eq!(load_search(&client, "  \t ").await, None);
    }

    #[tokio::test]
    async fn test_search_network_failure_shows_error() {
        let client = TmdbClient::new(&closed_url(), "key", "ko-KR", BASE);
        let view = load_search(&client, "인셉션").await.unwrap();
        assert_eq!(view, ListingView::Failed(SEARCH_FAILED.to_string()));
        assert!(view.cards().is_empty());
    }

    #[tokio::test]
    async fn test_popular_failure_shows_error() {
        let (base, _seen) = serve(vec![(500, "{}")]).await;
        let client = TmdbClient::new(&base, "key", "ko-KR", BASE);
        assert_eq!(load_popular(&client).await, ListingView::Failed(POPULAR_FAILED.to_string()));
    }

    #[tokio::test]
    async fn test_popular_success_builds_cards() {
        let (base, _seen) = serve(vec![(
            200,
            r#"{"page": 1, "results": [{"id": 1, "title": "Dune", "vote_average": 7.35, "poster_path": "/d.jpg"}]}"#,
        )])
        .await;
        let client = TmdbClient::new(&base, "key", "ko-KR", BASE);

        let view = load_popular(&client).await;
        let cards = view.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Dune");
        assert_eq!(cards[0].rating, "7.4");
    }
}
