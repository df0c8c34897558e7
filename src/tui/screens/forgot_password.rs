//! "Lupa Password": starts the reset flow by mailing a verification code

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
use crate::validation::{forgot_password_schema, FIELD_EMAIL};

const DESCRIPTION: &str =
    "Masukkan email Anda untuk proses verifikasi, kami akan mengirimkan kode 4 digit ke email Anda.";

pub struct ForgotPasswordScreen {
    pub base: FormScreen,
}

impl ForgotPasswordScreen {
    pub fn new(alert_duration: Duration) -> Self {
        let form = Form::new(vec![FormField::new(FIELD_EMAIL, "Email", FormFieldType::Text)
            .with_placeholder("nama@email.com")]);

        Self {
            base: FormScreen::new("Lupa Password", form, alert_duration)
                .for_page(Page::ForgotPassword)
                .with_description(DESCRIPTION),
        }
    }
}

impl Screen for ForgotPasswordScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        self.base.draw(f, area);
    }

    fn handle_key_event(&mut self, key: KeyEvent, _flows: &mut FlowContext) -> Result<ScreenAction> {
        let action = match self.base.handle_key(key) {
            FormEvent::AlertClosed(action) => action,
            FormEvent::Key(FormKey::Submit) => match self.base.begin_submit(&forgot_password_schema()) {
                Some((request_id, values)) => ScreenAction::Submit(SubmitRequest {
                    request_id,
                    call: ApiCall::SendOtp {
                        email: values.get(FIELD_EMAIL).cloned().unwrap_or_default(),
                    },
                }),
                None => ScreenAction::None,
            },
            FormEvent::Key(FormKey::Back) => ScreenAction::NavigateTo(Route::Login),
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
        flow::apply_store_effect(resolution.store, &mut flows.reset_password, &submitted);
        match resolution.navigate_now {
            Some(route) => {
                self.base.form.clear();
                ScreenAction::NavigateTo(route)
            }
            None => ScreenAction::None,
        }
    }

    fn on_tick(&mut self, now: DateTime<Local>) -> ScreenAction {
        self.base.tick(now)
    }

    fn is_busy(&self) -> bool {
        self.base.is_busy()
    }

    fn help_text(&self) -> &'static str {
        "Enter kirim kode, Esc kembali ke login, Enter/Esc tutup pesan error"
    }
}
