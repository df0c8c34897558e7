//! Alert and confirmation dialogs

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;

use crate::models::{AlertSpec, AlertVariant};
use crate::tui::ui::{popup_rect, Styles};

/// An open alert
#[derive(Debug, Clone)]
pub struct AlertDialog {
    pub spec: AlertSpec,
    pub opened_at: DateTime<Local>,
    auto_dismiss_after: Duration,
}

impl AlertDialog {
    pub fn open(spec: AlertSpec, auto_dismiss_after: Duration, now: DateTime<Local>) -> Self {
        Self {
            spec,
            opened_at: now,
            auto_dismiss_after,
        }
    }

    pub fn variant(&self) -> AlertVariant {
        self.spec.variant
    }

    /// Timer-driven close, only for auto-dismissing alerts
    pub fn should_auto_dismiss(&self, now: DateTime<Local>) -> bool {
        if !self.spec.auto_dismiss {
            return false;
        }
        let elapsed = now.signed_duration_since(self.opened_at);
        elapsed.to_std().unwrap_or_default() >= self.auto_dismiss_after
    }

    /// Manual close, only when the close button is shown
    pub fn is_close_key(&self, key: KeyEvent) -> bool {
        self.spec.show_close_button && matches!(key.code, KeyCode::Enter | KeyCode::Esc)
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let popup = popup_rect(60, 7, area);
        f.render_widget(Clear, popup);

        let style = Styles::alert(self.spec.variant);
        let title = match self.spec.variant {
            AlertVariant::Success => " Berhasil ",
            AlertVariant::Danger => " Gagal ",
            AlertVariant::Primary => " Info ",
        };
        let block = Block::default()
            .title(Span::styled(title, style.add_modifier(Modifier::BOLD)))
            .borders(Borders::ALL)
            .border_style(style);

        let footer = if self.spec.show_close_button {
            Line::from(Span::styled("[Enter] Tutup", Styles::inactive()))
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(self.spec.message.clone(), style)),
            Line::from(""),
            footer,
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

        f.render_widget(paragraph, popup);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    No,
    Yes,
}

/// Yes/No modal
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub message: String,
    pub selected: ConfirmChoice,
}

impl ConfirmDialog {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            selected: ConfirmChoice::No,
        }
    }

    /// Returns the choice once the user commits to one
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ConfirmChoice> {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.selected = match self.selected {
                    ConfirmChoice::No => ConfirmChoice::Yes,
                    ConfirmChoice::Yes => ConfirmChoice::No,
                };
                None
            }
            KeyCode::Enter => Some(self.selected),
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(ConfirmChoice::Yes),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('t') | KeyCode::Char('T') | KeyCode::Esc => {
                Some(ConfirmChoice::No)
            }
            _ => None,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let popup = popup_rect(60, 8, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::error());
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        f.render_widget(
            Paragraph::new(self.message.as_str())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            chunks[0],
        );

        let button = |label: &'static str, choice: ConfirmChoice| {
            if self.selected == choice {
                Span::styled(format!(" {} ", label), Styles::selected())
            } else {
                Span::styled(format!(" {} ", label), Styles::inactive())
            }
        };
        let buttons = Line::from(vec![
            button("Tidak", ConfirmChoice::No),
            Span::raw("    "),
            button("Ya", ConfirmChoice::Yes),
        ]);
        f.render_widget(
            Paragraph::new(buttons).alignment(Alignment::Center),
            chunks[1],
        );
    }
}
