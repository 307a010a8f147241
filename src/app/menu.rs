//! Row actions menu

use super::actions::{Action, ActionType};
use crossterm::event::{KeyCode, KeyEvent};
use curtain::config::colors;
use curtain::helpers::centered_fixed;
use curtain::modal::{ModalComponent, ModalControl};
use ratatui::{
    layout::Rect,
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState},
    Frame,
};

/// Id of the single actions menu record
pub const MENU_ID: &str = "row-actions";

/// Lists a transaction's actions; the chosen one runs after the menu closes
pub struct ActionsMenu {
    title: String,
    actions: Vec<Action>,
    selected: usize,
    chosen: Option<Action>,
}

impl ActionsMenu {
    pub fn new(title: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            title: title.into(),
            actions,
            selected: 0,
            chosen: None,
        }
    }

    fn next(&mut self) {
        if !self.actions.is_empty() {
            self.selected = (self.selected + 1) % self.actions.len();
        }
    }

    fn previous(&mut self) {
        if !self.actions.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.actions.len() - 1);
        }
    }
}

impl ModalComponent for ActionsMenu {
    fn name(&self) -> &str {
        MENU_ID
    }

    fn render(&mut self, f: &mut Frame, area: Rect) {
        let mut items = Vec::with_capacity(self.actions.len() + 1);
        let mut selected_row = self.selected;
        for (i, action) in self.actions.iter().enumerate() {
            let is_first_secondary = action.action_type == ActionType::Secondary
                && (i == 0 || self.actions[i - 1].action_type == ActionType::Primary);
            if is_first_secondary && i > 0 {
                items.push(ListItem::new("─".repeat(30)).fg(colors::BORDER));
                if i <= self.selected {
                    selected_row += 1;
                }
            }
            let color = match action.action_type {
                ActionType::Primary => colors::FG,
                ActionType::Secondary => colors::MUTED,
            };
            items.push(ListItem::new(format!(" {} ", action.label)).fg(color));
        }
        if items.is_empty() {
            items.push(ListItem::new(" No actions available ").fg(colors::MUTED));
        }

        let height = u16::try_from(items.len()).unwrap_or(u16::MAX).saturating_add(2);
        let menu_area = centered_fixed(36, height, area);

        let list = List::new(items)
            .block(
                Block::default()
                    .title(Line::from(format!(" {} ", self.title)).bold())
                    .title_bottom(Line::from(" Enter:run  Esc:close ").centered())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors::HIGHLIGHT))
                    .border_type(BorderType::Rounded)
                    .style(Style::default().bg(colors::BG)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD));

        let mut state = ListState::default();
        if !self.actions.is_empty() {
            state.select(Some(selected_row));
        }

        f.render_widget(Clear, menu_area);
        f.render_stateful_widget(list, menu_area, &mut state);
    }

    fn handle_key(&mut self, key: KeyEvent, modal: &mut ModalControl) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.next(),
            KeyCode::Char('k') | KeyCode::Up => self.previous(),
            KeyCode::Enter => {
                self.chosen = self.actions.get(self.selected).cloned();
                modal.set_open(false);
            }
            KeyCode::Esc | KeyCode::Char('q') => modal.set_open(false),
            _ => {}
        }
    }

    fn on_close(&mut self) {
        // Close is already queued, so a dialog opened here lands after it
        if let Some(action) = self.chosen.take() {
            action.run();
        }
    }
}
