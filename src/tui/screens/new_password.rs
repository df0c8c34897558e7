//! "Buat Password Baru": final step of the reset flow

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::time::Duration;
use tracing::info;

use crate::flow::{self, Page, MSG_LEAVE_CONFIRM};
use crate::models::Route;
use crate::store::FlowContext;
use crate::tui::{
    components::{form_screen::FormEvent, ConfirmChoice, ConfirmDialog, Form, FormField, FormFieldType, FormScreen},
    handlers::FormKey,
    operations::{ApiCall, SubmitOutcome, SubmitRequest},
    traits::{Screen, ScreenAction},
};
use crate::validation::{
    new_password_schema, FormValues, FIELD_CONFIRM_PASSWORD, FIELD_NEW_PASSWORD, FIELD_PASSWORD,
};

pub struct NewPasswordScreen {
    pub base: FormScreen,
    /// Open leave-page confirmation
    pub confirm: Option<ConfirmDialog>,
}

impl NewPasswordScreen {
    pub fn new(alert_duration: Duration) -> Self {
        let form = Form::new(vec![
            FormField::new(FIELD_PASSWORD, "Password Baru", FormFieldType::Password { revealed: false })
                .with_placeholder("8-15 karakter huruf dan angka"),
            FormField::new(
                FIELD_CONFIRM_PASSWORD,
                "Konfirmasi Password",
                FormFieldType::Password { revealed: false },
            )
            .with_placeholder("Ketik ulang password"),
        ]);

        Self {
            base: FormScreen::new("Buat Password Baru", form, alert_duration)
                .for_page(Page::NewPassword)
                .with_description("Password harus terdiri dari 8-15 karakter kombinasi huruf dan angka.")
                .with_submit_label("Simpan"),
            confirm: None,
        }
    }

    fn submit(&mut self, flows: &FlowContext) -> ScreenAction {
        let Some((request_id, values)) = self.base.begin_submit(&new_password_schema()) else {
            return ScreenAction::None;
        };
        let password = values.get(FIELD_PASSWORD).map(String::as_str).unwrap_or_default();

        ScreenAction::Submit(SubmitRequest {
            request_id,
            call: ApiCall::ChangePassword(flows.reset_password.payload_with(FIELD_NEW_PASSWORD, password)),
        })
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, flows: &mut FlowContext) -> ScreenAction {
        let Some(dialog) = self.confirm.as_mut() else {
            return ScreenAction::None;
        };
        match dialog.handle_key(key) {
            Some(ConfirmChoice::Yes) => {
                self.confirm = None;
                let (route, effect) = flow::abandon_target(&flows.reset_password);
                info!("Leaving new password page for {}", route.path());
                flow::apply_store_effect(effect, &mut flows.reset_password, &FormValues::new());
                ScreenAction::NavigateTo(route)
            }
            Some(ConfirmChoice::No) => {
                self.confirm = None;
                ScreenAction::None
            }
            None => ScreenAction::None,
        }
    }
}

impl Screen for NewPasswordScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        self.base.draw(f, area);
        if let Some(dialog) = &self.confirm {
            dialog.render(f, area);
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent, flows: &mut FlowContext) -> Result<ScreenAction> {
        if self.confirm.is_some() {
            return Ok(self.handle_confirm_key(key, flows));
        }

        let action = match self.base.handle_key(key) {
            FormEvent::AlertClosed(action) => action,
            FormEvent::Key(FormKey::Submit) => self.submit(flows),
            FormEvent::Key(FormKey::Back) => {
                self.confirm = Some(ConfirmDialog::new(MSG_LEAVE_CONFIRM));
                ScreenAction::None
            }
            FormEvent::Key(_) | FormEvent::Blocked => ScreenAction::None,
        };
        Ok(action)
    }

    fn on_exit(&mut self) {
        self.confirm = None;
        self.base.reset();
    }

    fn on_submit_outcome(&mut self, outcome: SubmitOutcome, flows: &mut FlowContext) -> ScreenAction {
        let Some((resolution, submitted)) = self.base.resolve_outcome(&outcome, Local::now()) else {
            return ScreenAction::None;
        };
        flow::apply_store_effect(resolution.store, &mut flows.reset_password, &submitted);
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
        "Tab pindah kolom, F2 tampilkan/sembunyikan password, Enter simpan, Esc keluar"
    }
}
