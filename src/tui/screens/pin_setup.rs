//! "Atur Pin": last step of account registration

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::time::Duration;

use crate::flow::{self, Page};
use crate::models::Route;
use crate::store::FlowContext;
use crate::tui::{
    components::{form_screen::FormEvent, Form, FormField, FormFieldType, FormScreen},
    handlers::FormKey,
    operations::{ApiCall, SubmitOutcome, SubmitRequest},
    traits::{Screen, ScreenAction},
};
use crate::validation::{pin_schema, FIELD_CONFIRM_PIN, FIELD_PIN};

pub struct PinSetupScreen {
    pub base: FormScreen,
}

impl PinSetupScreen {
    pub fn new(alert_duration: Duration) -> Self {
        let form = Form::new(vec![
            FormField::new(FIELD_PIN, "Pin", FormFieldType::Numeric)
                .with_placeholder("Masukkan pin"),
            FormField::new(FIELD_CONFIRM_PIN, "Konfirmasi Pin", FormFieldType::Numeric)
                .with_placeholder("Masukkan ulang pin"),
        ]);

        Self {
            base: FormScreen::new("Atur Pin", form, alert_duration)
                .for_page(Page::PinSetup)
                .with_description("Buat pin untuk bertransaksi dengan rekening baru Anda.")
                .with_submit_label("Simpan"),
        }
    }

    fn submit(&mut self, flows: &FlowContext) -> ScreenAction {
        let Some((request_id, values)) = self.base.begin_submit(&pin_schema()) else {
            return ScreenAction::None;
        };
        let pin = values.get(FIELD_PIN).map(String::as_str).unwrap_or_default();
        let payload = flows.registration.payload_with(FIELD_PIN, pin);

        ScreenAction::Submit(SubmitRequest {
            request_id,
            call: ApiCall::Register(payload),
        })
    }
}

impl Screen for PinSetupScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        self.base.draw(f, area);
    }

    fn handle_key_event(&mut self, key: KeyEvent, flows: &mut FlowContext) -> Result<ScreenAction> {
        let action = match self.base.handle_key(key) {
            FormEvent::AlertClosed(action) => action,
            FormEvent::Key(FormKey::Submit) => self.submit(flows),
            FormEvent::Key(FormKey::Back) => ScreenAction::NavigateTo(Route::Register),
            FormEvent::Key(_) | FormEvent::Blocked => ScreenAction::None,
        };
        Ok(action)
    }

    fn on_exit(&mut self) {
        self.base.reset();
    }

    fn on_submit_outcome(&mut self, outcome: SubmitOutcome, flows: &mut FlowContext) -> ScreenAction {
        let Some((resolution, submitted)) = self.base.resolve_outcome(&outcome, Local::now()) else {
            return ScreenAction::None;
        };
        flow::apply_store_effect(resolution.store, &mut flows.registration, &submitted);
        resolution
            .navigate_now
            .map(ScreenAction::NavigateTo)
            .unwrap_or(ScreenAction::None)
    }

    fn on_tick(&mut self, now: DateTime<Local>) -> ScreenAction {
        self.base.tick(now)
    }

    fn is_busy(&self) -> bool {
        self.base.is_busy()
    }

    fn help_text(&self) -> &'static str {
        "Tab pindah kolom, Enter simpan, Esc kembali ke registrasi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;
    use crate::flow::{MSG_REGISTER_FAILED, MSG_REGISTER_SUCCESS};
    use crate::models::RemoteEnvelope;
    use crate::tui::screens::testing::{press, type_text};
    use crossterm::event::KeyCode;
    use serde_json::{json, Value};

    fn registration() -> FlowContext {
        let mut flows = FlowContext::new();
        flows.registration.set_field("name", "Budi Santoso");
        flows.registration.set_field("email", "budi@lumibank.id");
        flows
    }

    fn fill(screen: &mut PinSetupScreen, flows: &mut FlowContext, pin: &str, confirm: &str) {
        type_text(screen, flows, pin);
        press(screen, flows, KeyCode::Tab);
        type_text(screen, flows, confirm);
    }

    fn submit(screen: &mut PinSetupScreen, flows: &mut FlowContext) -> SubmitRequest {
        match press(screen, flows, KeyCode::Enter) {
            ScreenAction::Submit(request) => request,
            other => panic!("expected a submit, got {:?}", other),
        }
    }

    #[test]
    fn test_successful_registration_goes_to_login_once() {
        let mut flows = registration();
        let mut screen = PinSetupScreen::new(Duration::from_millis(3000));
        fill(&mut screen, &mut flows, "1234", "1234");

        let request = submit(&mut screen, &mut flows);
        let ApiCall::Register(payload) = &request.call else {
            panic!("expected a register call");
        };
        assert_eq!(
            Value::Object(payload.clone()),
            json!({ "name": "Budi Santoso", "email": "budi@lumibank.id", "pin": "1234" })
        );

        let action = screen.on_submit_outcome(
            SubmitOutcome { request_id: request.request_id, result: Ok(RemoteEnvelope::ok()) },
            &mut flows,
        );
        assert_eq!(action, ScreenAction::None);
        assert_eq!(screen.base.alert.as_ref().unwrap().spec.message, MSG_REGISTER_SUCCESS);
        assert!(flows.registration.is_empty());

        // no close button: Enter does nothing while the alert is up
        assert_eq!(press(&mut screen, &mut flows, KeyCode::Enter), ScreenAction::None);
        assert_eq!(screen.on_tick(Local::now()), ScreenAction::None);

        let later = Local::now() + chrono::Duration::seconds(4);
        assert_eq!(screen.on_tick(later), ScreenAction::NavigateTo(Route::Login));
        assert_eq!(screen.on_tick(later), ScreenAction::None);
    }

    #[test]
    fn test_mismatched_pin_is_not_submitted() {
        let mut flows = registration();
        let mut screen = PinSetupScreen::new(Duration::from_millis(3000));
        fill(&mut screen, &mut flows, "1234", "4321");

        assert_eq!(press(&mut screen, &mut flows, KeyCode::Enter), ScreenAction::None);
        let confirm = screen.base.form.get_field(FIELD_CONFIRM_PIN).unwrap();
        assert_eq!(confirm.validation_error.as_deref(), Some("Pin dan konfirmasi pin tidak sama"));
        assert!(screen.base.form.get_field(FIELD_PIN).unwrap().validation_error.is_none());
        assert!(screen.base.machine.is_idle());
    }

    #[test]
    fn test_second_enter_while_submitting_is_ignored() {
        let mut flows = registration();
        let mut screen = PinSetupScreen::new(Duration::from_millis(3000));
        fill(&mut screen, &mut flows, "1234", "1234");

        submit(&mut screen, &mut flows);
        assert!(screen.is_busy());
        assert_eq!(press(&mut screen, &mut flows, KeyCode::Enter), ScreenAction::None);
    }

    #[test]
    fn test_rejected_registration_keeps_store_and_returns_to_register() {
        let mut flows = registration();
        let mut screen = PinSetupScreen::new(Duration::from_millis(3000));
        fill(&mut screen, &mut flows, "1234", "1234");
        let request = submit(&mut screen, &mut flows);

        let action = screen.on_submit_outcome(
            SubmitOutcome {
                request_id: request.request_id,
                result: Ok(RemoteEnvelope::failed("NIK sudah terdaftar")),
            },
            &mut flows,
        );
        assert_eq!(action, ScreenAction::None);
        assert_eq!(screen.base.alert.as_ref().unwrap().spec.message, MSG_REGISTER_FAILED);
        assert_eq!(flows.registration.get_field("name"), Some("Budi Santoso"));

        // stays on the page until the alert expires
        assert_eq!(press(&mut screen, &mut flows, KeyCode::Enter), ScreenAction::None);
        assert_eq!(screen.on_tick(Local::now()), ScreenAction::None);

        let later = Local::now() + chrono::Duration::seconds(4);
        assert_eq!(screen.on_tick(later), ScreenAction::NavigateTo(Route::Register));
        assert_eq!(flows.registration.snapshot().len(), 2);
    }

    #[test]
    fn test_transport_error_only_unlocks_the_form() {
        let mut flows = registration();
        let mut screen = PinSetupScreen::new(Duration::from_millis(3000));
        fill(&mut screen, &mut flows, "1234", "1234");
        let request = submit(&mut screen, &mut flows);

        let action = screen.on_submit_outcome(
            SubmitOutcome {
                request_id: request.request_id,
                result: Err(ApiError::Status { status: 502, message: "Bad Gateway".to_string() }),
            },
            &mut flows,
        );
        assert_eq!(action, ScreenAction::None);
        assert!(screen.base.alert.is_none());
        assert!(screen.base.machine.is_idle());
        assert!(!flows.registration.is_empty());
    }
}
