use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Lines the document pane moves per scroll key.
const PREVIEW_SCROLL_STEP: usize = 10;

/// Handle a key event, routing to the menu when one is open.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if app.menu.is_open() {
        handle_menu_mode(app, key);
    } else {
        handle_normal_mode(app, key);
    }
}

fn handle_menu_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(10) => app.menu.close(),
        KeyCode::Left => app.menu.previous_menu(),
        KeyCode::Right => app.menu.next_menu(),
        KeyCode::Up => app.menu.previous_item(),
        KeyCode::Down => app.menu.next_item(),
        KeyCode::Enter => {
            if let Some((label, action)) = app.menu.activate() {
                app.run_menu_action(label, action);
            }
        }
        _ => {}
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::F(10) => app.menu.toggle(),
        KeyCode::Char('q') => app.quit(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),

        KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => app.expand_selected(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => app.collapse_selected(),

        KeyCode::PageDown | KeyCode::Char('J') => app.preview.scroll_down(PREVIEW_SCROLL_STEP),
        KeyCode::PageUp | KeyCode::Char('K') => app.preview.scroll_up(PREVIEW_SCROLL_STEP),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Bin, Catalog};
    use crate::config::AppConfig;
    use std::fs;
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn setup_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let sources = dir.path().join("sources");
        fs::create_dir_all(sources.join("blue")).unwrap();
        fs::write(sources.join("blue").join("counterspell.json"), "{}").unwrap();
        let lines: String = (0..40).map(|i| format!("line {}\n", i)).collect();
        fs::write(sources.join("lore.txt"), lines).unwrap();
        let catalog = Catalog::load(&[Bin::new("Sources", &sources)]).unwrap();
        (dir, App::new(AppConfig::default(), catalog))
    }

    fn selected_label(app: &App) -> &str {
        &app.tree_state.selected().unwrap().label
    }

    #[test]
    fn q_quits() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_even_with_menu_open() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::F(10));
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn tree_navigation_keys() {
        let (_dir, mut app) = setup_app();
        assert_eq!(selected_label(&app), "Sources");
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(selected_label(&app), "blue");
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Down);
        assert_eq!(selected_label(&app), "counterspell");
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(selected_label(&app), "lore");
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(selected_label(&app), "Sources");
        press(&mut app, KeyCode::Left);
        assert_eq!(app.tree_state.flat_items.len(), 1);
    }

    #[test]
    fn menu_captures_keys_while_open() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::F(10));
        assert!(app.menu.is_open());
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Down);
        assert_eq!(selected_label(&app), "Sources");
        assert_eq!(app.menu.highlighted, Some(1));
        press(&mut app, KeyCode::Esc);
        assert!(!app.menu.is_open());
    }

    #[test]
    fn menu_enter_runs_action() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::F(10));
        press(&mut app, KeyCode::Up); // wraps to Quit
        press(&mut app, KeyCode::Enter);
        assert!(app.should_quit);
        assert!(!app.menu.is_open());
    }

    #[test]
    fn placeholder_menu_entry_sets_status() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::F(10));
        press(&mut app, KeyCode::Enter);
        let (msg, _, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "New deck is not available yet");
    }

    #[test]
    fn page_keys_scroll_document() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(selected_label(&app), "lore");
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.preview.scroll_offset, PREVIEW_SCROLL_STEP);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.preview.scroll_offset, 0);
    }
}
