/// Shown whenever a movie has no usable poster.
pub const PLACEHOLDER_POSTER: &str = "/static/assets/img/no-poster.png";

/// Resolve a poster reference to something displayable.
///
/// A direct `poster` wins over a metadata-style `poster_path`. Values that are
/// already absolute URLs are kept as they are; anything else is appended to
/// `image_base`. Empty strings count as missing.
pub fn resolve_poster(poster: Option<&str>, poster_path: Option<&str>, image_base: &str) -> String {
    let reference = poster
        .filter(|p| !p.is_empty())
        .or_else(|| poster_path.filter(|p| !p.is_empty()));

    match reference {
        Some(url) if url.starts_with("http") => url.to_string(),
        Some(path) => format!("{}{}", image_base, path),
        None => PLACEHOLDER_POSTER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://image.tmdb.org/t/p/w500";

    #[test]
    fn test_absolute_poster_used_verbatim() {
        assert_eq!(resolve_poster(Some("https://x/y.jpg"), None, BASE), "https://x/y.jpg");
    }

    #[test]
    fn test_poster_path_gets_image_base() {
        assert_eq!(
            resolve_poster(None, Some("/abc.jpg"), BASE),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_nothing_gives_placeholder() {
        assert_eq!(resolve_poster(None, None, BASE), PLACEHOLDER_POSTER);
        assert_eq!(resolve_poster(Some(""), Some(""), BASE), PLACEHOLDER_POSTER);
    }

    #[test]
    fn test_poster_preferred_over_poster_path() {
        assert_eq!(
            resolve_poster(Some("/direct.jpg"), Some("/meta.jpg"), BASE),
            "https://image.tmdb.org/t/p/w500/direct.jpg"
        );
        assert_eq!(
            resolve_poster(Some(""), Some("/meta.jpg"), BASE),
            "https://image.tmdb.org/t/p/w500/meta.jpg"
        );
    }
}
