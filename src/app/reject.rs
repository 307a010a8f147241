//! Reject transaction dialog

use super::ledger::TxId;
use crate::event::Event;
use crossterm::event::{KeyCode, KeyEvent};
use curtain::config::colors;
use curtain::helpers::centered_fixed;
use curtain::modal::{ModalComponent, ModalControl};
use ratatui::{
    layout::Rect,
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc;

/// Asks for a rejection reason, optionally refunding as well
pub struct RejectModal {
    tx_id: TxId,
    can_refund: bool,
    refund: bool,
    reason: String,
    error: Option<&'static str>,
    events: mpsc::Sender<Event>,
}

impl RejectModal {
    pub fn new(tx_id: TxId, can_refund: bool, events: mpsc::Sender<Event>) -> Self {
        Self {
            tx_id,
            can_refund,
            refund: false,
            reason: String::new(),
            error: None,
            events,
        }
    }

    fn submit(&mut self, modal: &mut ModalControl) {
        let reason = self.reason.trim();
        if reason.is_empty() {
            self.error = Some("A reason is required");
            return;
        }

        let event = Event::Rejected {
            tx_id: self.tx_id,
            reason: reason.to_string(),
            refund: self.refund,
        };
        if let Err(e) = self.events.try_send(event) {
            tracing::warn!(tx = self.tx_id, error = %e, "Could not submit rejection");
            self.error = Some("Busy, try again");
            return;
        }
        modal.set_open(false);
    }
}

impl ModalComponent for RejectModal {
    fn name(&self) -> &str {
        "reject-transaction"
    }

    fn render(&mut self, f: &mut Frame, area: Rect) {
        let dialog_area = centered_fixed(56, 11, area);

        let mut lines = vec![
            Line::from("Tell the contributor why this transaction is rejected.")
                .style(Style::default().fg(colors::MUTED)),
            Line::default(),
            Line::from(vec![
                Span::styled("Reason: ", Style::default().fg(colors::FG).bold()),
                Span::styled(self.reason.clone(), Style::default().fg(colors::FG)),
                Span::styled("▏", Style::default().fg(colors::ACCENT)),
            ]),
        ];
        if self.can_refund {
            let mark = if self.refund { "[x]" } else { "[ ]" };
            lines.push(Line::from(format!("{mark} Also refund the contributor")).fg(colors::FG));
        }
        if let Some(error) = self.error {
            lines.push(Line::default());
            lines.push(Line::from(error).fg(colors::DANGER));
        }

        let hint = if self.can_refund {
            " Enter:reject  Tab:toggle refund  Esc:cancel "
        } else {
            " Enter:reject  Esc:cancel "
        };

        let dialog = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(Line::from(format!(" Reject transaction #{} ", self.tx_id)).bold())
                .title_bottom(Line::from(hint).centered())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::WARNING))
                .border_type(BorderType::Double)
                .padding(ratatui::widgets::Padding::new(1, 1, 1, 0))
                .style(Style::default().bg(colors::BG)),
        );

        f.render_widget(Clear, dialog_area);
        f.render_widget(dialog, dialog_area);
    }

    fn handle_key(&mut self, key: KeyEvent, modal: &mut ModalControl) {
        match key.code {
            KeyCode::Esc => modal.set_open(false),
            KeyCode::Enter => self.submit(modal),
            KeyCode::Tab if self.can_refund => self.refund = !self.refund,
            KeyCode::Backspace => {
                self.reason.pop();
            }
            KeyCode::Char(c) => {
                self.reason.push(c);
                self.error = None;
            }
            _ => {}
        }
    }

    fn on_close(&mut self) {
        tracing::debug!(tx = self.tx_id, "Reject dialog closed");
    }
}
