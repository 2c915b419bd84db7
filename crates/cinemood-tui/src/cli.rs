//! One-shot subcommands that print a view to stdout and exit.

use anyhow::Result;
use colored::*;

use cinemood_core::catalog::{self, normalize_query};
use cinemood_core::emotion::glyph_for_label;
use cinemood_core::stats::{self, StatsPanel};
use cinemood_core::top10;
use cinemood_core::{BackendClient, Config, ListingView, TmdbClient, Top10View};

fn listing_lines(view: &ListingView) -> Vec<String> {
    if let Some(message) = view.message() {
        return vec![message.red().to_string()];
    }

    let mut lines = Vec::new();
    for (i, card) in view.cards().iter().enumerate() {
        lines.push(format!(
            "{}. {} {}",
            (i + 1).to_string().bold().blue(),
            card.title.bold().yellow(),
            format!("⭐ {}", card.rating).green()
        ));
        lines.push(format!("   📅 {}", card.release_date.dimmed()));
        lines.push(format!("   🖼  {}", card.poster_url.dimmed()));
        if let Some(overview) = &card.overview {
            lines.push(format!("   {}", overview));
        }
        lines.push(String::new());
    }
    lines
}

fn stats_lines(panel: &StatsPanel) -> Vec<String> {
    match panel {
        StatsPanel::Rotating(rotator) => {
            // Walk one full rotation so every entry is printed once
            let mut rotator = rotator.clone();
            let mut lines = vec![];
            for _ in 0..rotator.len() {
                let view = rotator.current();
                lines.push(format!(
                    "{}  {} {}",
                    glyph_for_label(&view.label),
                    view.label.bold().yellow(),
                    format!("({}회)", view.count).dimmed()
                ));
                rotator.advance();
            }
            lines
        }
        StatsPanel::Empty => vec![stats::NO_DATA.yellow().to_string()],
        StatsPanel::Failed(msg) => vec![msg.red().to_string()],
        StatsPanel::Loading => vec![],
    }
}

fn top10_lines(view: &Top10View) -> Vec<String> {
    if let Some(message) = view.message() {
        return vec![message.red().to_string()];
    }

    view.cards()
        .iter()
        .enumerate()
        .map(|(i, card)| {
            format!(
                "{:>2}. {}  {}",
                i + 1,
                card.title.bold().yellow(),
                card.overlay.dimmed()
            )
        })
        .collect()
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

pub async fn popular(config: &Config) -> Result<()> {
    let tmdb = TmdbClient::from_config(config);
    println!("\n{}", "🎬 인기 영화".bold().blue());
    println!("{}", "=".repeat(40).dimmed());

    let view = catalog::load_popular(&tmdb).await;
    print_lines(&listing_lines(&view));
    Ok(())
}

pub async fn search(config: &Config, query: &str) -> Result<()> {
    let Some(query) = normalize_query(query) else {
        println!("{}", "검색어를 입력하세요".yellow());
        return Ok(());
    };

    let tmdb = TmdbClient::from_config(config);
    println!("🔍 검색: {}", query.bold().cyan());

    if let Some(view) = catalog::load_search(&tmdb, &query).await {
        if let ListingView::Cards(cards) = &view {
            println!("\n{} results found:\n", cards.len().to_string().bold().green());
        }
        print_lines(&listing_lines(&view));
    }
    Ok(())
}

pub async fn emotion_stats(config: &Config) -> Result<()> {
    let backend = BackendClient::from_config(config);
    println!("\n{}", "📊 감정 통계".bold().blue());
    println!("{}", "=".repeat(40).dimmed());

    let panel = stats::load_stats(&backend).await;
    print_lines(&stats_lines(&panel));
    Ok(())
}

pub async fn most_recommended(config: &Config) -> Result<()> {
    let backend = BackendClient::from_config(config);
    let tmdb = TmdbClient::from_config(config);
    println!("\n{}", "🏆 추천 TOP 10".bold().blue());
    println!("{}", "=".repeat(40).dimmed());

    let view = top10::load_top10(&backend, &tmdb).await;
    print_lines(&top10_lines(&view));
    Ok(())
}

/// Store settings in the config file; with no changes, just show where it lives.
pub fn configure(tmdb_api_key: Option<String>, backend_url: Option<String>) -> Result<()> {
    let path = Config::get_config_path()?;
    let mut config = Config::load_from(&path)?;

    let changed = tmdb_api_key.is_some() || backend_url.is_some();
    if let Some(key) = tmdb_api_key {
        config.tmdb_api_key = Some(key);
    }
    if let Some(url) = backend_url {
        config.backend_url = url;
    }

    if changed {
        config.save()?;
        println!("{} {}", "Saved".green(), path.display());
    } else {
        println!("{}", path.display());
    }

    println!(
        "  tmdb_api_key: {}",
        if config.tmdb_api_key.is_some() { "set".green() } else { "not set".red() }
    );
    println!("  backend_url:  {}", config.backend_url);
    println!("  language:     {}", config.language);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinemood_core::model::{EmotionStat, Movie};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_listing_lines_number_every_card() {
        plain();
        let view = ListingView::from_results(
            Some(vec![
                Movie { title: "인셉션".to_string(), vote_average: Some(8.36), ..Movie::default() },
                Movie { title: "Up".to_string(), ..Movie::default() },
            ]),
            "https://image.tmdb.org/t/p/w500",
        );
        let lines = listing_lines(&view);
        assert_eq!(lines[0], "1. 인셉션 ⭐ 8.4");
        assert!(lines.iter().any(|l| l == "2. Up ⭐ 0.0"));
    }

    #[test]
    fn test_listing_lines_show_placeholder() {
        plain();
        assert_eq!(
            listing_lines(&ListingView::NoResults),
            vec![catalog::NO_RESULTS.to_string()]
        );
    }

    #[test]
    fn test_stats_lines_cover_every_entry_once() {
        plain();
        let panel = StatsPanel::from_stats(vec![
            EmotionStat { rep_emotion: "슬픔".to_string(), count: 4 },
            EmotionStat { rep_emotion: "행복".to_string(), count: 2 },
        ]);
        let lines = stats_lines(&panel);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("슬픔 (4회)"));
        assert!(lines[1].contains("행복 (2회)"));
    }

    #[test]
    fn test_top10_lines_failed() {
        plain();
        let view = Top10View::Failed(top10::CONNECTION_ERROR.to_string());
        assert_eq!(top10_lines(&view), vec![top10::CONNECTION_ERROR.to_string()]);
    }
}
