//! Shared state and behavior for the form pages
//!
//! Every form page is a [`Form`], a [`SubmitMachine`] and at most one open
//! [`AlertDialog`]. Keys go to the alert first, are swallowed while a request
//! is in flight, and reach the form otherwise.

use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::flow::{self, Page, Resolution, SubmitMachine};
use crate::tui::{
    components::{AlertDialog, Form},
    handlers::{CommonKeyHandler, FormKey},
    operations::SubmitOutcome,
    traits::ScreenAction,
    ui::{popup_rect, Styles},
};
use crate::validation::{FormValues, Schema};

/// Result of routing a key through a form page
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// The open alert was closed; carries the resulting navigation
    AlertClosed(ScreenAction),
    /// The key reached the form
    Key(FormKey),
    /// Swallowed by an open alert or a request in flight
    Blocked,
}

pub struct FormScreen {
    pub page: Option<Page>,
    pub title: String,
    pub description: Option<String>,
    pub submit_label: String,
    pub form: Form,
    pub machine: SubmitMachine,
    pub alert: Option<AlertDialog>,
    alert_duration: Duration,
    pending: Option<FormValues>,
}

impl FormScreen {
    pub fn new(title: &str, form: Form, alert_duration: Duration) -> Self {
        Self {
            page: None,
            title: title.to_string(),
            description: None,
            submit_label: "Lanjut".to_string(),
            form,
            machine: SubmitMachine::new(),
            alert: None,
            alert_duration,
            pending: None,
        }
    }

    pub fn for_page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_submit_label(mut self, label: &str) -> Self {
        self.submit_label = label.to_string();
        self
    }

    pub fn is_busy(&self) -> bool {
        self.machine.is_submitting()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        if let Some(alert) = &self.alert {
            if alert.is_close_key(key) {
                return FormEvent::AlertClosed(self.close_alert());
            }
            return FormEvent::Blocked;
        }
        if self.machine.is_submitting() {
            return FormEvent::Blocked;
        }
        FormEvent::Key(CommonKeyHandler::handle_form_keys(&mut self.form, key))
    }

    /// Validate the form and show inline errors; values when valid
    pub fn validate_form(&mut self, schema: &Schema) -> Option<FormValues> {
        let values = self.form.values();
        let errors = schema.validate(&values);
        self.form.apply_errors(&errors);
        if errors.is_empty() {
            Some(values)
        } else {
            info!("{}: validation failed on {} field(s)", self.title, errors.len());
            None
        }
    }

    /// Validate and move to Submitting; `None` when invalid or not idle
    pub fn begin_submit(&mut self, schema: &Schema) -> Option<(Uuid, FormValues)> {
        if !self.machine.is_idle() {
            debug!("{}: submit ignored, machine is {:?}", self.title, self.machine.state());
            return None;
        }
        let values = self.validate_form(schema)?;
        let request_id = self.machine.begin()?;
        self.pending = Some(values.clone());
        Some((request_id, values))
    }

    /// Interpret a finished request; `None` for results this page no longer
    /// waits for. Returns the values that were submitted with it.
    pub fn resolve_outcome(
        &mut self,
        outcome: &SubmitOutcome,
        now: DateTime<Local>,
    ) -> Option<(Resolution, FormValues)> {
        let page = self.page?;
        let resolution = flow::resolve(page, &outcome.result);
        if !self.machine.resolve(outcome.request_id, resolution.success) {
            debug!("{}: ignoring result for request {}", self.title, outcome.request_id);
            return None;
        }

        match &outcome.result {
            Ok(envelope) if envelope.success => info!("{}: request succeeded", self.title),
            Ok(envelope) => warn!(
                "{}: server rejected request: {}",
                self.title,
                envelope.message.as_deref().unwrap_or("<no message>")
            ),
            Err(e) => error!("{}: request failed: {}", self.title, e),
        }

        match &resolution.alert {
            Some(spec) => {
                self.alert = Some(AlertDialog::open(spec.clone(), self.alert_duration, now));
            }
            None => self.machine.settle(),
        }

        let submitted = self.pending.take().unwrap_or_default();
        Some((resolution, submitted))
    }

    /// Close the open alert and look up where that leads
    pub fn close_alert(&mut self) -> ScreenAction {
        let Some(alert) = self.alert.take() else {
            return ScreenAction::None;
        };
        self.machine.settle();

        match self.page.and_then(|page| flow::after_dismiss(page, alert.variant())) {
            Some(route) => {
                info!("{}: alert dismissed, navigating to {}", self.title, route.path());
                ScreenAction::NavigateTo(route)
            }
            None => ScreenAction::None,
        }
    }

    pub fn tick(&mut self, now: DateTime<Local>) -> ScreenAction {
        match &self.alert {
            Some(alert) if alert.should_auto_dismiss(now) => self.close_alert(),
            _ => ScreenAction::None,
        }
    }

    /// Forget everything page-scoped (page exit)
    pub fn reset(&mut self) {
        self.machine.cancel();
        self.alert = None;
        self.pending = None;
        self.form.clear();
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let card_height = 4 + self.form.height() + 3;
        let card = popup_rect(60, card_height, area);

        let block = Block::default()
            .title(Span::styled(format!(" {} ", self.title), Styles::title()))
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());
        let inner = block.inner(card);
        f.render_widget(block, card);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(self.form.height()),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        if let Some(description) = &self.description {
            f.render_widget(
                Paragraph::new(description.as_str())
                    .style(Styles::inactive())
                    .wrap(Wrap { trim: true }),
                chunks[0],
            );
        }

        self.form.render(f, chunks[1]);

        let button = Paragraph::new(Line::from(Span::styled(
            format!("[ Enter: {} ]", self.submit_label),
            Styles::selected(),
        )))
        .alignment(Alignment::Center);
        f.render_widget(button, chunks[2]);

        if self.machine.is_submitting() {
            draw_loading(f, area);
        }

        if let Some(alert) = &self.alert {
            alert.render(f, area);
        }
    }
}

fn draw_loading(f: &mut Frame, area: Rect) {
    let popup = popup_rect(30, 3, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(Span::styled(
            "⟳ Memproses...",
            Styles::warning().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Styles::warning())),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;
    use crate::models::{AlertVariant, RemoteEnvelope, Route};
    use crate::tui::components::{FormField, FormFieldType};
    use crate::validation::{forgot_password_schema, FIELD_EMAIL};
    use crossterm::event::{KeyCode, KeyModifiers};

    fn screen() -> FormScreen {
        FormScreen::new(
            "Lupa Password",
            Form::new(vec![FormField::new(FIELD_EMAIL, "Email", FormFieldType::Text)]),
            Duration::from_millis(3000),
        )
        .for_page(Page::ForgotPassword)
    }

    fn type_text(screen: &mut FormScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_invalid_form_does_not_begin() {
        let mut screen = screen();
        type_text(&mut screen, "not-an-email");
        assert!(screen.begin_submit(&forgot_password_schema()).is_none());
        assert!(screen.machine.is_idle());
        assert_eq!(
            screen.form.get_field(FIELD_EMAIL).unwrap().validation_error.as_deref(),
            Some("Harap isi dengan email yang valid")
        );
    }

    #[test]
    fn test_keys_blocked_while_submitting() {
        let mut screen = screen();
        type_text(&mut screen, "budi@lumibank.id");
        let (id, values) = screen.begin_submit(&forgot_password_schema()).unwrap();
        assert_eq!(values.get(FIELD_EMAIL).map(String::as_str), Some("budi@lumibank.id"));

        assert_eq!(
            screen.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
            FormEvent::Blocked
        );
        assert!(screen.begin_submit(&forgot_password_schema()).is_none());

        let outcome = SubmitOutcome { request_id: id, result: Ok(RemoteEnvelope::ok()) };
        let (resolution, submitted) = screen.resolve_outcome(&outcome, Local::now()).unwrap();
        assert_eq!(resolution.navigate_now, Some(Route::Otp));
        assert_eq!(submitted, values);
        // no alert on this outcome, so the machine is idle again
        assert!(screen.machine.is_idle());
    }

    #[test]
    fn test_sticky_alert_closes_on_enter_and_stays() {
        let mut screen = screen();
        type_text(&mut screen, "budi@lumibank.id");
        let (id, _) = screen.begin_submit(&forgot_password_schema()).unwrap();
        let outcome = SubmitOutcome {
            request_id: id,
            result: Err(ApiError::Status { status: 404, message: "Email tidak terdaftar".to_string() }),
        };
        screen.resolve_outcome(&outcome, Local::now()).unwrap();

        let alert = screen.alert.as_ref().unwrap();
        assert_eq!(alert.variant(), AlertVariant::Danger);
        assert_eq!(alert.spec.message, "Error: Email tidak terdaftar");

        // typing does not reach the form while the alert is open
        assert_eq!(
            screen.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
            FormEvent::Blocked
        );
        assert_eq!(
            screen.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            FormEvent::AlertClosed(ScreenAction::None)
        );
        assert!(screen.alert.is_none());
        assert!(screen.machine.is_idle());
        assert_eq!(screen.form.value(FIELD_EMAIL), "budi@lumibank.id");
    }

    #[test]
    fn test_stale_outcome_ignored() {
        let mut screen = screen();
        type_text(&mut screen, "budi@lumibank.id");
        screen.begin_submit(&forgot_password_schema()).unwrap();
        let stale = SubmitOutcome { request_id: Uuid::new_v4(), result: Ok(RemoteEnvelope::ok()) };
        assert!(screen.resolve_outcome(&stale, Local::now()).is_none());
        assert!(screen.is_busy());

        screen.reset();
        assert!(!screen.is_busy());
        assert!(screen.form.get_field(FIELD_EMAIL).unwrap().is_empty());
    }
}
