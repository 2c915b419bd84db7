use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use crate::app::{App, InputMode, Screen};
use cinemood_core::emotion::glyph_for_label;
use cinemood_core::{ChatRole, StatsPanel, TranscriptEntry};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ensure the selected item in a list is visible by adjusting the ListState offset.
fn ensure_selected_visible(state: &mut ListState, visible_height: usize) {
    let visible_height = visible_height.max(1);

    if let Some(selected) = state.selected() {
        let min_offset = selected.saturating_sub(visible_height - 1);
        let max_offset = selected;

        let new_offset = state.offset().clamp(min_offset, max_offset);
        if new_offset != state.offset() {
            *state.offset_mut() = new_offset;
        }
    }
}

fn placeholder(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)))
        .wrap(Wrap { trim: true })
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Catalog => render_catalog_screen(app, frame, body_area),
        Screen::Chat => render_chat_screen(app, frame, body_area),
        Screen::Stats => render_stats_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);

    if app.screen == Screen::Stats && app.show_top10_detail {
        render_top10_detail(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(
        " 🎬 CineMood ",
        Style::default().fg(Color::Cyan).bold(),
    )];

    for (i, screen) in Screen::all().iter().enumerate() {
        let style = if *screen == app.screen {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} {} ", i + 1, screen.title()), style));
    }

    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        format!("v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::DarkGray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.screen {
        Screen::Catalog => " MOVIES ",
        Screen::Chat => " CHAT ",
        Screen::Stats => " STATS ",
    };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let keys: Vec<(&str, &str)> = match (app.screen, app.input_mode) {
        (Screen::Catalog, InputMode::Normal) => vec![
            ("j/k", "nav"),
            ("g/G", "top/bottom"),
            ("/", "search"),
            ("p", "popular"),
            ("Tab", "screen"),
            ("q", "quit"),
        ],
        (Screen::Catalog, InputMode::Editing) => vec![("Enter", "search"), ("Esc", "cancel")],
        (Screen::Chat, InputMode::Normal) => vec![
            ("i", "type"),
            ("j/k", "scroll"),
            ("G", "latest"),
            ("Tab", "screen"),
            ("q", "quit"),
        ],
        (Screen::Chat, InputMode::Editing) => vec![("Enter", "send"), ("Esc", "stop typing")],
        (Screen::Stats, _) => {
            if app.show_top10_detail {
                vec![("Enter/Esc", "close"), ("j/k", "nav"), ("q", "quit")]
            } else {
                vec![("j/k", "nav"), ("Enter", "detail"), ("Tab", "screen"), ("q", "quit")]
            }
        }
    };

    let mut hints = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    for (key, label) in keys {
        hints.push(Span::styled(format!(" {} ", key), key_style));
        hints.push(Span::styled(format!(" {} ", label), label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_catalog_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    // Layout: search input at top, results below split into list and preview
    let [input_area, results_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(
            if app.input_mode == InputMode::Editing {
                Color::Yellow
            } else {
                Color::DarkGray
            },
        ))
        .title(" 영화 제목 검색 ");

    let input = Paragraph::new(app.search_input.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);

    frame.render_widget(input, input_area);

    if app.input_mode == InputMode::Editing {
        frame.set_cursor_position((
            input_area.x + app.search_input.chars().count() as u16 + 1,
            input_area.y + 1,
        ));
    }

    let [list_area, preview_area] = Layout::horizontal([
        Constraint::Percentage(40),
        Constraint::Percentage(60),
    ])
    .areas(results_area);

    app.list_area = Some(list_area);
    app.transcript_area = None;

    let cards = app.listing.cards();
    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" 영화 ({}) ", cards.len()));

    if let Some(message) = app.listing.message() {
        frame.render_widget(placeholder(message).block(list_block), list_area);
    } else {
        let items: Vec<ListItem> = cards
            .iter()
            .map(|card| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!(" {} ", card.title)),
                    Span::styled(
                        format!("⭐ {}", card.rating),
                        Style::default().fg(Color::Yellow),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(list_block)
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let visible_height = list_area.height.saturating_sub(2) as usize;
        ensure_selected_visible(&mut app.listing_state, visible_height);
        frame.render_stateful_widget(list, list_area, &mut app.listing_state);
    }

    let preview_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" 상세 ");

    let selected = app
        .listing_state
        .selected()
        .and_then(|i| app.listing.cards().get(i));

    let preview_text = match selected {
        Some(card) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    card.title.clone(),
                    Style::default().fg(Color::Yellow).bold(),
                )),
                Line::default(),
                Line::from(format!("⭐ 평점: {}", card.rating)),
                Line::from(format!("📅 개봉일: {}", card.release_date)),
                Line::from(Span::styled(
                    format!("🖼  {}", card.poster_url),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            if let Some(overview) = &card.overview {
                lines.push(Line::default());
                lines.push(Line::from(overview.clone()));
            }
            Text::from(lines)
        }
        None => Text::from(Span::styled(
            "영화를 선택하세요",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let preview = Paragraph::new(preview_text)
        .block(preview_block)
        .wrap(Wrap { trim: true });

    frame.render_widget(preview, preview_area);
}

/// The chat transcript exactly as the chat screen draws it, pending indicator included.
pub fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    for entry in &app.transcript {
        match entry {
            TranscriptEntry::Message(msg) => {
                let (speaker, color) = match msg.role {
                    ChatRole::User => ("나:", Color::Cyan),
                    ChatRole::Bot => ("챗봇:", Color::Yellow),
                };
                lines.push(Line::from(Span::styled(
                    speaker,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )));
                for line in msg.content.lines() {
                    lines.push(Line::from(line.to_string()));
                }
            }
            TranscriptEntry::Carousel(tiles) => {
                lines.push(Line::from(Span::styled(
                    "🎞  추천 영화",
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                )));
                for tile in tiles {
                    lines.push(Line::from(vec![
                        Span::styled(format!("  ▸ {} ", tile.title), Style::default().bold()),
                        Span::styled(tile.poster_url.clone(), Style::default().fg(Color::DarkGray)),
                    ]));
                }
            }
        }
        lines.push(Line::default());
    }

    if app.is_waiting_for_reply() {
        lines.push(Line::from(Span::styled(
            "챗봇:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("생각 중{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

/// Rows a single line takes once word-wrapped to `width` columns.
fn wrapped_rows(text: &str, width: usize) -> usize {
    if width == 0 {
        return 1;
    }

    let mut rows = 1;
    let mut current = 0;
    for word in text.split_whitespace() {
        let word_width = word.width();
        if current > 0 && current + 1 + word_width <= width {
            current += 1 + word_width;
            continue;
        }
        if current > 0 {
            rows += 1;
        }

        // Words wider than the view are broken at character boundaries
        current = 0;
        for c in word.chars() {
            let char_width = c.width().unwrap_or(0);
            if current + char_width > width {
                rows += 1;
                current = 0;
            }
            current += char_width;
        }
    }
    rows
}

/// Total rows `lines` occupy in a wrapping paragraph `width` columns wide.
pub fn wrapped_height(lines: &[Line], width: usize) -> usize {
    lines
        .iter()
        .map(|line| {
            let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
            wrapped_rows(&text, width)
        })
        .fold(0, usize::saturating_add)
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    app.transcript_area = Some(chat_area);
    app.list_area = None;

    // Inner size minus borders, for scroll calculations
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 감정 기반 영화 추천 챗봇 ");

    let lines = transcript_lines(app);

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, chat_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(
            if app.input_mode == InputMode::Editing {
                Color::Yellow
            } else {
                Color::DarkGray
            },
        ))
        .title(if app.is_waiting_for_reply() { " 답변을 기다리는 중 " } else { " 메시지 " });

    // Horizontal scrolling keeps the cursor visible
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.chat_cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .chat_input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);

    frame.render_widget(input, input_area);

    if app.input_mode == InputMode::Editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
    }
}

fn render_stats_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [rotator_area, top10_area] = Layout::vertical([
        Constraint::Length(6),
        Constraint::Min(0),
    ])
    .areas(area);

    app.list_area = Some(top10_area);
    app.transcript_area = None;

    let rotator_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 감정 통계 ");

    let fading = app.stats_fading();
    let mut lines = match &app.stats {
        StatsPanel::Rotating(rotator) => {
            let view = rotator.current();
            let style = if fading {
                Style::default().add_modifier(Modifier::DIM)
            } else {
                Style::default()
            };
            vec![
                Line::from(vec![
                    Span::styled(format!("{}  ", glyph_for_label(&view.label)), style),
                    Span::styled(view.headline, style),
                ]),
                Line::from(Span::styled(
                    format!("{}/{}", rotator.position() + 1, rotator.len()),
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        }
        StatsPanel::Loading => vec![Line::from(Span::styled(
            "불러오는 중...",
            Style::default().fg(Color::DarkGray),
        ))],
        StatsPanel::Empty => vec![Line::from(format!("🤖  {}", cinemood_core::stats::NO_DATA))],
        StatsPanel::Failed(msg) => vec![Line::from(Span::styled(
            format!("🤖  {}", msg),
            Style::default().fg(Color::Red),
        ))],
    };
    if !matches!(app.stats, StatsPanel::Loading) {
        lines.push(Line::from(Span::styled(
            format!("🖼  {}", app.stats.icon()),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let text = Text::from(lines);

    frame.render_widget(
        Paragraph::new(text).block(rotator_block).wrap(Wrap { trim: true }),
        rotator_area,
    );

    let top10_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 🏆 추천 TOP 10 ");

    if let Some(message) = app.top10.message() {
        frame.render_widget(placeholder(message).block(top10_block), top10_area);
        return;
    }

    let items: Vec<ListItem> = app
        .top10
        .cards()
        .iter()
        .enumerate()
        .map(|(i, card)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:>2}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(format!("{} ", card.title)),
                Span::styled(card.overlay.clone(), Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(top10_block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let visible_height = top10_area.height.saturating_sub(2) as usize;
    ensure_selected_visible(&mut app.top10_state, visible_height);
    frame.render_stateful_widget(list, top10_area, &mut app.top10_state);
}

fn render_top10_detail(app: &App, frame: &mut Frame, area: Rect) {
    let Some(card) = app
        .top10_state
        .selected()
        .and_then(|i| app.top10.cards().get(i))
    else {
        return;
    };

    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 14.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", card.title));

    let mut lines = vec![
        Line::from(Span::styled(card.overlay.clone(), Style::default().fg(Color::Yellow))),
        Line::from(Span::styled(
            card.poster_url.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ];
    lines.push(Line::from(
        card.overview.clone().unwrap_or_else(|| "줄거리 정보가 없습니다.".to_string()),
    ));

    let detail = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(detail, popup_area);
}
