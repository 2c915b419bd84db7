//! Wire types for the metadata API and the recommendation backend.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A movie as returned by the metadata API's list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieList {
    #[serde(default)]
    pub results: Option<Vec<Movie>>,
}

/// Sent to the backend as `turn`: the intake counter, or `"after_recommend"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnMarker {
    Intake(u32),
    AfterRecommend,
}

pub const AFTER_RECOMMEND: &str = "after_recommend";

impl Serialize for TurnMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TurnMarker::Intake(turn) => serializer.serialize_u32(*turn),
            TurnMarker::AfterRecommend => serializer.serialize_str(AFTER_RECOMMEND),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub turn: TurnMarker,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecommendedMovie {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub sub_emotion: Option<String>,
    #[serde(default, deserialize_with = "movies_or_empty")]
    pub movies: Vec<RecommendedMovie>,
}

// The backend answers with a bare string instead of a list when it found nothing.
fn movies_or_empty<'de, D>(deserializer: D) -> Result<Vec<RecommendedMovie>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MoviesField {
        List(Vec<RecommendedMovie>),
        Other(serde_json::Value),
    }

    Ok(match MoviesField::deserialize(deserializer)? {
        MoviesField::List(movies) => movies,
        MoviesField::Other(_) => Vec::new(),
    })
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmotionStat {
    pub rep_emotion: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopMovie {
    pub movie: String,
    #[serde(default)]
    pub count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_marker_wire_format() {
        let intake = ChatRequest { message: "hi".to_string(), turn: TurnMarker::Intake(2) };
        assert_eq!(
            serde_json::to_value(&intake).unwrap(),
            serde_json::json!({"message": "hi", "turn": 2})
        );

        let feedback = ChatRequest { message: "좋아".to_string(), turn: TurnMarker::AfterRecommend };
        assert_eq!(
            serde_json::to_value(&feedback).unwrap(),
            serde_json::json!({"message": "좋아", "turn": "after_recommend"})
        );
    }

    #[test]
    fn test_chat_response_all_fields_optional() {
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, ChatResponse::default());
    }

    #[test]
    fn test_chat_response_final() {
        let response: ChatResponse = serde_json::from_str(
            r#"{
                "reply": "",
                "final": true,
                "summary": "지친 하루",
                "emotion": "슬픔",
                "sub_emotion": "세부감정 없음",
                "movies": [{"title": "A", "poster": "https://x/a.jpg", "rating": 8.1}]
            }"#,
        )
        .unwrap();
        assert!(response.is_final);
        assert_eq!(response.movies.len(), 1);
        assert_eq!(response.movies[0].poster.as_deref(), Some("https://x/a.jpg"));
    }

    #[test]
    fn test_chat_response_movies_as_string() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"final": true, "movies": "추천할 영화가 없습니다."}"#).unwrap();
        assert!(response.movies.is_empty());
    }

    #[test]
    fn test_movie_list_without_results() {
        let list: MovieList = serde_json::from_str(r#"{"page": 1}"#).unwrap();
        assert!(list.results.is_none());
    }
}
