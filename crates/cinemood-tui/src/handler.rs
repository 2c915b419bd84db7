use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, InputMode, Screen};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Rotate => app.rotate_stats(),
        AppEvent::Listing(id, view) => app.apply_listing(id, view),
        AppEvent::ChatReply(id, result) => app.apply_chat_reply(id, result),
        AppEvent::Stats(id, panel) => app.apply_stats(id, panel),
        AppEvent::Top10(id, view) => app.apply_top10(id, view),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    // Screen switching works the same everywhere
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab => {
            app.screen = app.screen.next();
            return;
        }
        KeyCode::BackTab => {
            app.screen = app.screen.prev();
            return;
        }
        KeyCode::Char('1') => {
            app.screen = Screen::Catalog;
            return;
        }
        KeyCode::Char('2') => {
            app.screen = Screen::Chat;
            return;
        }
        KeyCode::Char('3') => {
            app.screen = Screen::Stats;
            return;
        }
        _ => {}
    }

    match app.screen {
        Screen::Catalog => handle_catalog_normal(app, key),
        Screen::Chat => handle_chat_normal(app, key),
        Screen::Stats => handle_stats_normal(app, key),
    }
}

fn handle_catalog_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.listing_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.listing_nav_up(),
        KeyCode::Char('g') => app.listing_first(),
        KeyCode::Char('G') => app.listing_last(),

        // Edit search
        KeyCode::Char('/') | KeyCode::Char('i') => {
            app.input_mode = InputMode::Editing;
        }

        // Back to the popular list
        KeyCode::Char('p') => {
            app.search_input.clear();
            app.load_popular();
        }

        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.chat_scroll = app.chat_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.chat_scroll = app.chat_scroll.saturating_sub(1);
        }
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),
        KeyCode::Char('g') => app.chat_scroll = 0,
        _ => {}
    }
}

fn handle_stats_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.top10_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.top10_nav_up(),
        KeyCode::Enter => app.toggle_top10_detail(),
        KeyCode::Esc => app.show_top10_detail = false,
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match app.screen {
        Screen::Catalog => handle_search_editing(app, key),
        Screen::Chat => handle_chat_editing(app, key),
        Screen::Stats => app.input_mode = InputMode::Normal,
    }
}

fn handle_search_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.perform_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
        }
        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.submit_chat();
        }
        KeyCode::Backspace => {
            if app.chat_cursor > 0 {
                app.chat_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.chat_input.chars().count();
            if app.chat_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.chat_cursor = app.chat_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.chat_input.chars().count();
            app.chat_cursor = (app.chat_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.chat_cursor = 0;
        }
        KeyCode::End => {
            app.chat_cursor = app.chat_input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
            app.chat_input.insert(byte_pos, c);
            app.chat_cursor += 1;
        }
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_list = app.list_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_transcript = app.transcript_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown => match app.screen {
            Screen::Catalog if in_list => app.listing_nav_down(),
            Screen::Chat if in_transcript => {
                app.chat_scroll = app.chat_scroll.saturating_add(3);
            }
            Screen::Stats if in_list => app.top10_nav_down(),
            _ => {}
        },
        MouseEventKind::ScrollUp => match app.screen {
            Screen::Catalog if in_list => app.listing_nav_up(),
            Screen::Chat if in_transcript => {
                app.chat_scroll = app.chat_scroll.saturating_sub(3);
            }
            Screen::Stats if in_list => app.top10_nav_up(),
            _ => {}
        },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinemood_core::Config;
    use crossterm::event::KeyEventKind;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(&Config::new(), tx)
    }

    #[test]
    fn test_char_to_byte_index() {
        let s = "안녕a";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 1), 3);
        assert_eq!(char_to_byte_index(s, 2), 6);
        assert_eq!(char_to_byte_index(s, 3), s.len());
    }

    #[test]
    fn test_screen_switching() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.screen, Screen::Chat);
        handle_event(&mut app, key(KeyCode::Char('3'))).unwrap();
        assert_eq!(app.screen, Screen::Stats);
        handle_event(&mut app, key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.screen, Screen::Chat);
    }

    #[test]
    fn test_chat_editing_handles_multibyte_input() {
        let mut app = app();
        app.screen = Screen::Chat;
        handle_event(&mut app, key(KeyCode::Char('i'))).unwrap();
        assert_eq!(app.input_mode, InputMode::Editing);

        for c in "슬퍼".chars() {
            handle_event(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_event(&mut app, key(KeyCode::Left)).unwrap();
        handle_event(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.chat_input, "퍼");
        assert_eq!(app.chat_cursor, 0);

        // 'q' while editing is text, not quit
        handle_event(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(!app.should_quit);
        assert_eq!(app.chat_input, "q퍼");
    }

    #[test]
    fn test_blank_search_enter_is_a_no_op() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('/'))).unwrap();
        handle_event(&mut app, key(KeyCode::Char(' '))).unwrap();
        handle_event(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.listing, cinemood_core::ListingView::Loading);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        let mut event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        event.kind = KeyEventKind::Press;
        handle_event(&mut app, AppEvent::Key(event)).unwrap();
        assert!(app.should_quit);
    }
}
