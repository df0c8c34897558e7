//! Main TUI application state and logic

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::components::{status_display::StatusType, StatusDisplay};
use super::handlers::CommonKeyHandler;
use super::operations::{SubmissionRunner, SubmitOutcome};
use super::screens::*;
use super::traits::{Screen, ScreenAction};
use super::ui::{centered_rect, Styles};
use crate::api::AuthApi;
use crate::config::Config;
use crate::models::Route;
use crate::store::FlowContext;

/// One screen per route
pub struct Screens {
    pub menu: MenuScreen,
    pub login: LandingScreen,
    pub register: LandingScreen,
    pub dashboard: LandingScreen,
    pub pin_setup: PinSetupScreen,
    pub forgot_password: ForgotPasswordScreen,
    pub otp: OtpScreen,
    pub new_password: NewPasswordScreen,
}

impl Screens {
    pub fn new(config: &Config) -> Self {
        let alert_duration = config.alert_auto_dismiss();
        Self {
            menu: MenuScreen::new(),
            login: LandingScreen::new(Route::Login),
            register: LandingScreen::new(Route::Register),
            dashboard: LandingScreen::new(Route::Dashboard),
            pin_setup: PinSetupScreen::new(alert_duration),
            forgot_password: ForgotPasswordScreen::new(alert_duration),
            otp: OtpScreen::new(alert_duration),
            new_password: NewPasswordScreen::new(alert_duration),
        }
    }

    pub fn get_mut(&mut self, route: Route) -> &mut dyn Screen {
        match route {
            Route::Menu => &mut self.menu,
            Route::Login => &mut self.login,
            Route::Register => &mut self.register,
            Route::Dashboard => &mut self.dashboard,
            Route::RegisterPin => &mut self.pin_setup,
            Route::ForgotPassword => &mut self.forgot_password,
            Route::Otp => &mut self.otp,
            Route::NewPassword => &mut self.new_password,
        }
    }
}

/// Main TUI application state
pub struct App {
    /// Current active screen
    pub current_screen: Route,
    /// Previous screen for navigation
    pub previous_screen: Option<Route>,
    /// Application configuration
    pub config: Config,
    /// Flow stores lent to the screens
    pub flows: FlowContext,
    pub screens: Screens,
    pub runner: SubmissionRunner,
    pub status: StatusDisplay,

    // Global application state
    pub should_quit: bool,
    pub show_help_popup: bool,
}

impl App {
    pub fn new(config: Config, api: Arc<dyn AuthApi>, flows: FlowContext) -> Self {
        let mut app = Self {
            current_screen: Route::Menu,
            previous_screen: None,
            screens: Screens::new(&config),
            runner: SubmissionRunner::new(api),
            status: StatusDisplay::new().with_auto_clear(std::time::Duration::from_secs(5)),
            config,
            flows,
            should_quit: false,
            show_help_popup: false,
        };
        app.screens.get_mut(Route::Menu).on_enter(&app.flows);
        app
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let tick_rate = self.config.tick_rate();

        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key_event(key)?;
                }
            }

            self.tick(Local::now());

            if self.should_quit {
                break;
            }
        }

        self.runner.cancel();
        Ok(())
    }

    /// Navigate to a route, leaving the current one
    pub fn navigate_to_screen(&mut self, route: Route) {
        // a request must never outlive the page that started it
        self.runner.cancel();
        self.screens.get_mut(self.current_screen).on_exit();

        info!("Navigating {} -> {}", self.current_screen.path(), route.path());
        self.previous_screen = Some(self.current_screen);
        self.current_screen = route;
        self.screens.get_mut(route).on_enter(&self.flows);
        self.status.set_info(format!("Halaman: {}", route.title()));
    }

    pub fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::NavigateTo(route) => self.navigate_to_screen(route),
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::Submit(request) => {
                let name = request.call.name().to_string();
                if self.runner.spawn(self.current_screen, request) {
                    self.status.set_loading(format!("Mengirim permintaan {}...", name));
                } else {
                    self.status.set_error("Permintaan sebelumnya masih diproses".to_string());
                }
            }
            ScreenAction::None => {}
        }
    }

    /// Hand a finished request back to the screen that started it
    pub fn process_outcome(&mut self, route: Route, outcome: SubmitOutcome) {
        if route != self.current_screen {
            warn!(
                "Dropping result for {}: now at {}",
                route.path(),
                self.current_screen.path()
            );
            return;
        }

        if matches!(self.status.get_current(), Some(m) if m.status_type == StatusType::Loading) {
            self.status.clear();
        }
        let action = self
            .screens
            .get_mut(route)
            .on_submit_outcome(outcome, &mut self.flows);
        self.apply_action(action);
    }

    /// Deliver finished requests and drive timers
    pub fn tick(&mut self, now: DateTime<Local>) {
        while let Some((route, outcome)) = self.runner.try_recv() {
            self.process_outcome(route, outcome);
        }

        let action = self.screens.get_mut(self.current_screen).on_tick(now);
        self.apply_action(action);

        if self.status.should_auto_clear(now) {
            self.status.clear();
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if let Some(action) = CommonKeyHandler::handle_global_keys(key) {
            self.apply_action(action);
            return Ok(());
        }

        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return Ok(());
            }
            KeyCode::Esc if self.show_help_popup => {
                self.show_help_popup = false;
                return Ok(());
            }
            _ => {}
        }

        if self.show_help_popup {
            debug!("Key {:?} ignored while help is open", key.code);
            return Ok(());
        }

        let action = self
            .screens
            .get_mut(self.current_screen)
            .handle_key_event(key, &mut self.flows)?;
        self.apply_action(action);
        Ok(())
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        // Main layout: status bar at bottom, content area above
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.screens.get_mut(self.current_screen).draw(f, chunks[0]);

        let idle_text = format!(
            "LumiBank - {} ({}) | Ctrl+C: Keluar | F1: Bantuan",
            self.current_screen.title(),
            self.current_screen.path()
        );
        self.status.render(f, chunks[1], &idle_text);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_help_popup(&mut self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 50, area);
        f.render_widget(Clear, popup_area);

        let screen_help = self.screens.get_mut(self.current_screen).help_text();
        let help = format!(
            "Umum:\n\
            Ctrl+C / Ctrl+Q - Keluar\n\
            F1 - Tampilkan/tutup bantuan\n\n\
            {}:\n{}",
            self.current_screen.title(),
            screen_help
        );

        let popup = Paragraph::new(help)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Bantuan")
                    .borders(Borders::ALL)
                    .border_style(Styles::warning()),
            );
        f.render_widget(popup, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RemoteEnvelope;
    use crate::tui::operations::submission::tests::FakeApi;
    use crate::validation::FIELD_EMAIL;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use tokio::sync::Notify;

    fn app_with(api: FakeApi) -> App {
        App::new(Config::default(), Arc::new(api), FlowContext::new())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_forgot_password_round_trip_reaches_otp() {
        let mut app = app_with(FakeApi::replying(RemoteEnvelope::ok()));
        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.current_screen, Route::ForgotPassword);

        type_text(&mut app, "budi@lumibank.id");
        press(&mut app, KeyCode::Enter);
        assert!(app.runner.is_in_flight());

        let (route, outcome) = app.runner.recv().await.unwrap();
        app.process_outcome(route, outcome);

        assert_eq!(app.current_screen, Route::Otp);
        assert_eq!(app.previous_screen, Some(Route::ForgotPassword));
        assert_eq!(app.flows.reset_password.get_field(FIELD_EMAIL), Some("budi@lumibank.id"));
    }

    #[tokio::test]
    async fn test_leaving_page_cancels_request() {
        let gate = Arc::new(Notify::new());
        let mut app = app_with(FakeApi::gated(RemoteEnvelope::ok(), gate.clone()));
        app.navigate_to_screen(Route::ForgotPassword);
        type_text(&mut app, "budi@lumibank.id");
        press(&mut app, KeyCode::Enter);
        assert!(app.screens.forgot_password.is_busy());

        app.navigate_to_screen(Route::Menu);
        gate.notify_one();
        tokio::task::yield_now().await;
        app.tick(Local::now());

        assert!(!app.runner.is_in_flight());
        assert!(!app.screens.forgot_password.is_busy());
        assert_eq!(app.current_screen, Route::Menu);
        assert!(app.flows.reset_password.is_empty());
    }

    #[test]
    fn test_global_keys() {
        let mut app = app_with(FakeApi::replying(RemoteEnvelope::ok()));
        press(&mut app, KeyCode::F(1));
        assert!(app.show_help_popup);
        // screen keys are swallowed while help is open
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.current_screen, Route::Menu);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help_popup);

        app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_draw_smoke() {
        let mut app = app_with(FakeApi::replying(RemoteEnvelope::ok()));
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();

        terminal.draw(|f| app.draw(f)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("LumiBank"));

        app.navigate_to_screen(Route::NewPassword);
        press(&mut app, KeyCode::Esc);
        app.show_help_popup = true;
        terminal.draw(|f| app.draw(f)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Bantuan"));
    }
}
