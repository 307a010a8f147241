//! Built-in confirmation dialog widget

use super::{ConfirmVariant, ConfirmationExecutor, ConfirmationProps, DialogButton};
use crate::config::colors;
use crate::helpers::{centered_fixed, wrapped_height};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const MIN_WIDTH: u16 = 40;
const MAX_WIDTH: u16 = 72;

/// What a key means inside a confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DialogCommand {
    Confirm,
    Cancel,
    ToggleFocus,
    /// Press whichever button has focus
    Activate,
}

pub(crate) fn command_for(key: KeyEvent) -> Option<DialogCommand> {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => Some(DialogCommand::Activate),
        KeyCode::Tab
        | KeyCode::BackTab
        | KeyCode::Left
        | KeyCode::Right
        | KeyCode::Char('h' | 'l') => Some(DialogCommand::ToggleFocus),
        KeyCode::Char('y') => Some(DialogCommand::Confirm),
        KeyCode::Char('n') | KeyCode::Esc => Some(DialogCommand::Cancel),
        _ => None,
    }
}

pub(crate) fn render_confirmation(
    f: &mut Frame,
    area: Rect,
    props: &ConfirmationProps,
    executor: &ConfirmationExecutor,
) {
    let width = (area.width / 2).clamp(MIN_WIDTH, MAX_WIDTH);
    let inner_width = width.saturating_sub(4);

    let mut text = Text::default();
    if let Some(description) = &props.description {
        for line in &description.lines {
            text.push_line(line.clone().patch_style(Style::default().fg(colors::FG)));
        }
    }
    if let Some(body) = &props.body {
        if !text.lines.is_empty() {
            text.push_line(Line::default());
        }
        for line in &body.lines {
            text.push_line(line.clone().patch_style(Style::default().fg(colors::MUTED)));
        }
    }
    text.push_line(Line::default());
    text.push_line(buttons(props, executor));

    // Borders plus one row of padding above the content
    let height = wrapped_height(&text, inner_width) + 3;
    let dialog_area = centered_fixed(width, height, area);

    let border_color = match props.variant {
        ConfirmVariant::Destructive => colors::DANGER,
        ConfirmVariant::Default => colors::HIGHLIGHT,
    };
    let hint = if executor.is_submitting() {
        " Working… "
    } else {
        " Tab:switch  Enter:select  y:confirm  Esc:cancel "
    };

    let dialog = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Line::from(format!(" {} ", props.title)).bold())
                .title_bottom(Line::from(hint).centered())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .border_type(BorderType::Double)
                .padding(ratatui::widgets::Padding::new(1, 1, 1, 0))
                .style(Style::default().bg(colors::BG)),
        );

    f.render_widget(Clear, dialog_area);
    f.render_widget(dialog, dialog_area);
}

fn buttons(props: &ConfirmationProps, executor: &ConfirmationExecutor) -> Line<'static> {
    let enabled = executor.controls_enabled();
    let confirm_color = match props.variant {
        ConfirmVariant::Destructive => colors::DANGER,
        ConfirmVariant::Default => colors::ACCENT,
    };

    let style_for = |button: DialogButton, color: Color| {
        let style = Style::default().fg(color);
        if !enabled {
            style.add_modifier(Modifier::DIM)
        } else if executor.focused() == button {
            style.add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            style
        }
    };

    let mut confirm = props.confirm_text().to_string();
    if executor.is_submitting() {
        confirm.push_str(" …");
    }

    Line::from(vec![
        Span::styled(
            format!("[ {} ]", props.cancel_text()),
            style_for(DialogButton::Cancel, colors::FG),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[ {confirm} ]"),
            style_for(DialogButton::Confirm, confirm_color),
        ),
    ])
    .alignment(Alignment::Right)
}
