//! Placeholder pages the flows lead to: login, register and dashboard

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::Route;
use crate::store::FlowContext;
use crate::tui::{
    traits::{Screen, ScreenAction},
    ui::{popup_rect, Styles},
};

pub struct LandingScreen {
    route: Route,
    /// Registration fields seen on entry
    registration: Vec<(String, String)>,
}

impl LandingScreen {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            registration: Vec::new(),
        }
    }

    fn body(&self) -> Vec<Line<'static>> {
        match self.route {
            Route::Login => vec![
                Line::from("Silakan masuk ke akun LumiBank Anda."),
                Line::from(""),
                Line::from(vec![
                    Span::styled("f", Styles::info().add_modifier(Modifier::BOLD)),
                    Span::raw(" Lupa password?"),
                ]),
            ],
            Route::Register if self.registration.is_empty() => vec![
                Line::from("Belum ada data registrasi."),
                Line::from(Span::styled(
                    "Gunakan --field kunci=nilai saat menjalankan aplikasi.",
                    Styles::inactive(),
                )),
            ],
            Route::Register => self
                .registration
                .iter()
                .map(|(key, value)| {
                    Line::from(vec![
                        Span::styled(format!("{}: ", key), Styles::info()),
                        Span::raw(value.clone()),
                    ])
                })
                .collect(),
            _ => vec![Line::from("Selamat datang di LumiBank.")],
        }
    }

    fn next_hint(&self) -> &'static str {
        match self.route {
            Route::Register => "[ Enter: Atur Pin ]",
            _ => "[ Enter: Menu ]",
        }
    }
}

impl Screen for LandingScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let mut lines = self.body();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(self.next_hint(), Styles::selected())));

        let height = lines.len() as u16 + 2;
        let card = popup_rect(60, height, area);
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(Span::styled(format!(" {} ", self.route.title()), Styles::title()))
                    .borders(Borders::ALL)
                    .border_style(Styles::inactive_border()),
            );
        f.render_widget(paragraph, card);
    }

    fn handle_key_event(&mut self, key: KeyEvent, _flows: &mut FlowContext) -> Result<ScreenAction> {
        let action = match (self.route, key.code) {
            (Route::Register, KeyCode::Enter) => ScreenAction::NavigateTo(Route::RegisterPin),
            (Route::Login, KeyCode::Char('f')) => ScreenAction::NavigateTo(Route::ForgotPassword),
            (_, KeyCode::Enter) | (_, KeyCode::Esc) => ScreenAction::NavigateTo(Route::Menu),
            _ => ScreenAction::None,
        };
        Ok(action)
    }

    fn on_enter(&mut self, flows: &FlowContext) {
        self.registration = flows
            .registration
            .snapshot()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
    }

    fn help_text(&self) -> &'static str {
        match self.route {
            Route::Login => "Enter/Esc menu, f lupa password",
            Route::Register => "Enter atur pin, Esc menu",
            _ => "Enter/Esc menu",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(screen: &mut LandingScreen, code: KeyCode) -> ScreenAction {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), &mut FlowContext::new())
            .unwrap()
    }

    #[test]
    fn test_login_links_to_forgot_password() {
        let mut screen = LandingScreen::new(Route::Login);
        assert_eq!(
            press(&mut screen, KeyCode::Char('f')),
            ScreenAction::NavigateTo(Route::ForgotPassword)
        );
        assert_eq!(press(&mut screen, KeyCode::Esc), ScreenAction::NavigateTo(Route::Menu));
    }

    #[test]
    fn test_register_shows_flow_fields_and_leads_to_pin() {
        let mut flows = FlowContext::new();
        flows.registration.set_field("name", "Budi");
        let mut screen = LandingScreen::new(Route::Register);
        screen.on_enter(&flows);

        assert_eq!(screen.registration, vec![("name".to_string(), "Budi".to_string())]);
        assert_eq!(press(&mut screen, KeyCode::Enter), ScreenAction::NavigateTo(Route::RegisterPin));
    }
}
