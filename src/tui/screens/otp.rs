//! Verification code entry between the two reset pages

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::time::Duration;
use tracing::info;

use crate::models::Route;
use crate::store::FlowContext;
use crate::tui::{
    components::{form_screen::FormEvent, Form, FormField, FormFieldType, FormScreen},
    handlers::FormKey,
    traits::{Screen, ScreenAction},
};
use crate::validation::{otp_schema, FIELD_EMAIL, FIELD_OTP};

pub struct OtpScreen {
    pub base: FormScreen,
}

impl OtpScreen {
    pub fn new(alert_duration: Duration) -> Self {
        let form = Form::new(vec![FormField::new(FIELD_OTP, "Kode OTP", FormFieldType::Numeric)
            .with_placeholder("0000")]);

        Self {
            base: FormScreen::new("Verifikasi OTP", form, alert_duration)
                .with_description("Masukkan kode 4 digit yang kami kirim ke email Anda."),
        }
    }

    fn submit(&mut self, flows: &mut FlowContext) -> ScreenAction {
        let Some(values) = self.base.validate_form(&otp_schema()) else {
            return ScreenAction::None;
        };
        let otp = values.get(FIELD_OTP).map(String::as_str).unwrap_or_default();
        flows.reset_password.set_field(FIELD_OTP, otp);
        info!(
            "OTP recorded for {}",
            flows.reset_password.get_field(FIELD_EMAIL).unwrap_or("<no email>")
        );
        self.base.form.clear();
        ScreenAction::NavigateTo(Route::NewPassword)
    }
}

impl Screen for OtpScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        self.base.draw(f, area);
    }

    fn handle_key_event(&mut self, key: KeyEvent, flows: &mut FlowContext) -> Result<ScreenAction> {
        let action = match self.base.handle_key(key) {
            FormEvent::AlertClosed(action) => action,
            FormEvent::Key(FormKey::Submit) => self.submit(flows),
            FormEvent::Key(FormKey::Back) => ScreenAction::NavigateTo(Route::ForgotPassword),
            FormEvent::Key(_) | FormEvent::Blocked => ScreenAction::None,
        };
        Ok(action)
    }

    fn on_exit(&mut self) {
        self.base.reset();
    }

    fn help_text(&self) -> &'static str {
        "Enter lanjut, Esc kembali ke lupa password"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::screens::testing::{press, type_text};
    use crossterm::event::KeyCode;

    #[test]
    fn test_four_digits_recorded_in_reset_flow() {
        let mut flows = FlowContext::new();
        flows.reset_password.set_field(FIELD_EMAIL, "budi@lumibank.id");
        let mut screen = OtpScreen::new(Duration::from_millis(3000));

        type_text(&mut screen, &mut flows, "12a4");
        assert_eq!(press(&mut screen, &mut flows, KeyCode::Enter), ScreenAction::None);
        assert!(!flows.reset_password.has_field(FIELD_OTP));

        press(&mut screen, &mut flows, KeyCode::End);
        press(&mut screen, &mut flows, KeyCode::Backspace);
        press(&mut screen, &mut flows, KeyCode::Backspace);
        type_text(&mut screen, &mut flows, "34");
        assert_eq!(
            press(&mut screen, &mut flows, KeyCode::Enter),
            ScreenAction::NavigateTo(Route::NewPassword)
        );
        assert_eq!(flows.reset_password.get_field(FIELD_OTP), Some("1234"));
        assert!(screen.base.form.get_field(FIELD_OTP).unwrap().is_empty());
    }
}
