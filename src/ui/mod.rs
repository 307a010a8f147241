//! UI rendering for the transactions dashboard
//!
//! Header, ledger table and footer are drawn first; open modals are drawn
//! last by the modal host so they sit on top.

use crate::app::ledger::{Transaction, TxKind, TxStatus};
use crate::app::{App, Focus};
use curtain::config::colors;
use curtain::helpers::truncate;
use curtain::notify::Severity;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

/// Main render function
pub fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Ledger
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    render_ledger(f, chunks[1], app);
    render_footer(f, chunks[2], app);

    app.modals.render(f);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let all = app.ledger.all();
    let refunded = all.iter().filter(|t| t.is_refunded()).count();
    let rejected = all
        .iter()
        .filter(|t| matches!(t.status, TxStatus::Rejected { .. }))
        .count();

    let mut title = format!("Curtain ({} transactions", all.len());
    if refunded > 0 {
        title.push_str(&format!(", {refunded} refunded"));
    }
    if rejected > 0 {
        title.push_str(&format!(", {rejected} rejected"));
    }
    title.push(')');
    if let Some(group) = app.ledger.group_filter() {
        title.push_str(&format!(" [GROUP {group}]"));
    }

    let header = Paragraph::new(title)
        .style(Style::default().fg(colors::FG).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::BORDER))
                .border_type(BorderType::Rounded),
        );
    f.render_widget(header, area);
}

fn render_ledger(f: &mut Frame, area: Rect, app: &App) {
    let visible = app.ledger.visible();
    let rows: Vec<Row> = visible.iter().map(|tx| ledger_row(tx, app.focus)).collect();

    let header = Row::new(["Date", "Description", "Account", "Amount", "Status", ""])
        .style(Style::default().fg(colors::MUTED).add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Min(16),
            Constraint::Length(18),
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(3),
        ],
    )
    .header(header)
    .row_highlight_style(Style::default().bg(colors::BG_LIGHT))
    .block(
        Block::default()
            .title(" Transactions ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::BORDER))
            .border_type(BorderType::Rounded),
    );

    let mut state = TableState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected.min(visible.len() - 1)));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn ledger_row(tx: &Transaction, focus: Focus) -> Row<'static> {
    let amount_color = match tx.kind {
        TxKind::Contribution => colors::SUCCESS,
        TxKind::Expense => colors::WARNING,
    };
    let status_color = match tx.status {
        TxStatus::Completed => colors::FG,
        TxStatus::Refunded => colors::ACCENT,
        TxStatus::Rejected { .. } => colors::DANGER,
    };

    // The actions trigger; focused after a row modal closes
    let trigger_style = if focus == Focus::Trigger(tx.id) {
        Style::default()
            .fg(colors::HIGHLIGHT)
            .add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default().fg(colors::MUTED)
    };

    Row::new(vec![
        Cell::from(tx.created_at.format("%b %d %H:%M").to_string()).fg(colors::MUTED),
        Cell::from(truncate(&tx.description, 32)).fg(colors::FG),
        Cell::from(truncate(&tx.account, 18)).fg(colors::FG),
        Cell::from(Line::from(tx.amount_label()).alignment(Alignment::Right)).fg(amount_color),
        Cell::from(tx.status.label()).fg(status_color),
        Cell::from(" ⋯ ").style(trigger_style),
    ])
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let footer = match app.toasts.last() {
        Some(toast) => {
            let color = match toast.notification.severity {
                Severity::Info => colors::ACCENT,
                Severity::Success => colors::SUCCESS,
                Severity::Error => colors::DANGER,
            };
            Paragraph::new(toast.notification.message.clone()).style(Style::default().fg(color))
        }
        None => {
            let help = if app.ledger.group_filter().is_some() {
                "j/k:move  Enter:actions  r:refund  x:reject  d:receipt  Esc:all  q:quit"
            } else {
                "j/k:move  Enter:actions  r:refund  x:reject  g:related  d:receipt  q:quit"
            };
            Paragraph::new(help).style(Style::default().fg(colors::MUTED))
        }
    };

    f.render_widget(footer.alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use curtain::config::CurtainConfig;
    use curtain::notify::Notification;
    use ratatui::backend::TestBackend;
    use tokio::sync::mpsc;

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 24)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        let (tx, _rx) = mpsc::channel(16);
        App::new(&CurtainConfig::default(), tx, false)
    }

    #[test]
    fn test_renders_ledger_and_hints() {
        let mut app = app();
        let screen = screen(&mut app);
        assert!(screen.contains("Curtain (8 transactions)"));
        assert!(screen.contains("Ada Byron"));
        assert!(screen.contains("-$49.00"));
        assert!(screen.contains("Enter:actions"));
    }

    #[test]
    fn test_toast_replaces_hints() {
        let mut app = app();
        app.handle_event(Event::Notify(Notification::error("Refund declined")));
        let screen = screen(&mut app);
        assert!(screen.contains("Refund declined"));
        assert!(!screen.contains("Enter:actions"));
    }

    #[test]
    fn test_modals_draw_over_ledger() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE));
        app.sync_modals();

        let screen = screen(&mut app);
        assert!(screen.contains("Are you sure you want to refund"));
        assert!(screen.contains("[ Refund ]"));
    }
}
