//! Keyboard input handling

use super::{actions::ActionKind, App, Focus};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

impl App {
    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Handle Ctrl+C always
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Open modals take every key
        if self.modals.handle_key(key) {
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.ledger.clear_filter() {
                    self.selected = 0;
                }
                self.focus = Focus::Ledger;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Enter | KeyCode::Char('.' | 'a') => self.open_actions_menu(),
            KeyCode::Char('r') => self.run_action(ActionKind::Refund),
            KeyCode::Char('x') => self.run_action(ActionKind::Reject),
            KeyCode::Char('g') => self.run_action(ActionKind::ViewRelated),
            KeyCode::Char('d') => self.run_action(ActionKind::Download),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.ledger.visible().len();
        if len == 0 {
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
        self.focus = Focus::Ledger;
    }
}

#[cfg(test)]
mod tests {
    use crate::app::{App, Focus};
    use crate::event::Event;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use curtain::config::CurtainConfig;
    use tokio::sync::mpsc;

    fn app() -> App {
        let (tx, _rx) = mpsc::channel(16);
        App::new(&CurtainConfig::default(), tx, false)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        app.sync_modals();
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = app();
        let rows = app.ledger.visible().len();

        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, 0);

        for _ in 0..rows + 3 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.selected, rows - 1);
    }

    #[test]
    fn test_open_modal_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.modals.has_open());

        // 'q' goes to the menu, which closes instead of quitting the app
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert!(!app.modals.has_open());

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_even_with_modal_open() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_esc_clears_group_filter() {
        let mut app = app();
        app.handle_event(Event::FilterGroup("g-ada".to_string()));
        assert_eq!(app.ledger.visible().len(), 2);

        app.focus = Focus::Trigger(1041);
        press(&mut app, KeyCode::Esc);
        assert!(app.ledger.group_filter().is_none());
        assert_eq!(app.focus, Focus::Ledger);
    }
}
