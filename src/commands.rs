//! Non-interactive versions of the three submitting pages
//!
//! Each command validates with the same schema as its page, makes the same
//! call and resolves the response through [`flow::resolve`], so the text and
//! next route printed here match what the TUI would show.

use anyhow::Result;
use tracing::{error, info, warn};

use crate::api::AuthApi;
use crate::errors::ApiError;
use crate::flow::{self, Page};
use crate::models::{RemoteEnvelope, Route};
use crate::store::{FlowKind, FlowStore};
use crate::tui::operations::ApiCall;
use crate::validation::{
    forgot_password_schema, new_password_schema, otp_schema, pin_schema, values_of, Schema,
    FIELD_CONFIRM_PASSWORD, FIELD_CONFIRM_PIN, FIELD_EMAIL, FIELD_NEW_PASSWORD, FIELD_OTP,
    FIELD_PASSWORD, FIELD_PIN,
};

/// Result of running one command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub success: bool,
    /// Alert text the page would show
    pub message: Option<String>,
    /// Transport failure the page only logs
    pub error: Option<String>,
    pub next_route: Option<Route>,
}

impl CommandOutcome {
    fn resolve(page: Page, result: &Result<RemoteEnvelope, ApiError>) -> Self {
        let resolution = flow::resolve(page, result);
        let next_route = resolution.navigate_now.or_else(|| {
            resolution
                .alert
                .as_ref()
                .and_then(|alert| flow::after_dismiss(page, alert.variant))
        });

        Self {
            success: resolution.success,
            message: resolution.alert.map(|alert| alert.message),
            error: result.as_ref().err().map(ToString::to_string),
            next_route,
        }
    }

    pub fn print(&self) {
        let marker = if self.success { "✓" } else { "✗" };
        match (&self.message, &self.error) {
            (Some(message), _) => println!("{} {}", marker, message),
            (None, Some(error)) => println!("{} {}", marker, error),
            (None, None) => println!("{} {}", marker, if self.success { "OK" } else { "Gagal" }),
        }
        if let Some(route) = self.next_route {
            println!("Next: {} ({})", route.title(), route.path());
        }
    }
}

fn check(schema: &Schema, pairs: &[(&str, &str)]) -> Result<()> {
    let errors = schema.validate(&values_of(pairs));
    if errors.is_empty() {
        return Ok(());
    }
    let details: Vec<String> = errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect();
    warn!("Validation failed: {}", details.join("; "));
    Err(anyhow::anyhow!("Validation failed: {}", details.join("; ")))
}

fn log_result(name: &str, result: &Result<RemoteEnvelope, ApiError>) {
    match result {
        Ok(envelope) if envelope.success => info!("{} succeeded", name),
        Ok(envelope) => warn!(
            "{} rejected: {}",
            name,
            envelope.message.as_deref().unwrap_or("<no message>")
        ),
        Err(e) => error!("{} failed: {}", name, e),
    }
}

async fn run(api: &dyn AuthApi, page: Page, call: ApiCall) -> CommandOutcome {
    let name = call.name().to_string();
    info!("Running {}", name);
    let result = call.execute(api).await;
    log_result(&name, &result);
    CommandOutcome::resolve(page, &result)
}

pub async fn send_otp(api: &dyn AuthApi, email: &str) -> Result<CommandOutcome> {
    check(&forgot_password_schema(), &[(FIELD_EMAIL, email)])?;
    let call = ApiCall::SendOtp {
        email: email.to_string(),
    };
    Ok(run(api, Page::ForgotPassword, call).await)
}

pub async fn set_pin(
    api: &dyn AuthApi,
    pin: &str,
    confirm_pin: &str,
    fields: &[(String, String)],
) -> Result<CommandOutcome> {
    check(&pin_schema(), &[(FIELD_PIN, pin), (FIELD_CONFIRM_PIN, confirm_pin)])?;

    let mut registration = FlowStore::new(FlowKind::Registration);
    for (key, value) in fields {
        registration.set_field(key, value);
    }
    let call = ApiCall::Register(registration.payload_with(FIELD_PIN, pin));
    Ok(run(api, Page::PinSetup, call).await)
}

pub async fn new_password(
    api: &dyn AuthApi,
    email: &str,
    otp: &str,
    password: &str,
    confirm_password: &str,
) -> Result<CommandOutcome> {
    check(&forgot_password_schema(), &[(FIELD_EMAIL, email)])?;
    check(&otp_schema(), &[(FIELD_OTP, otp)])?;
    check(
        &new_password_schema(),
        &[(FIELD_PASSWORD, password), (FIELD_CONFIRM_PASSWORD, confirm_password)],
    )?;

    let mut reset = FlowStore::new(FlowKind::ResetPassword);
    reset.set_field(FIELD_EMAIL, email);
    reset.set_field(FIELD_OTP, otp);
    let call = ApiCall::ChangePassword(reset.payload_with(FIELD_NEW_PASSWORD, password));
    Ok(run(api, Page::NewPassword, call).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{MSG_PASSWORD_CHANGED, MSG_REGISTER_SUCCESS};
    use crate::tui::operations::submission::tests::FakeApi;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_invalid_email_never_calls_backend() {
        let api = FakeApi::replying(RemoteEnvelope::ok());
        let err = send_otp(&api, "not-an-email").await.unwrap_err();
        assert!(err.to_string().contains("Harap isi dengan email yang valid"));
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_otp_success_points_to_otp_page() {
        let api = FakeApi::replying(RemoteEnvelope::ok());
        let outcome = send_otp(&api, "budi@lumibank.id").await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.message, None);
        assert_eq!(outcome.next_route, Some(Route::Otp));
    }

    #[tokio::test]
    async fn test_set_pin_sends_fields_and_pin() {
        let api = FakeApi::replying(RemoteEnvelope::ok());
        let fields = vec![("name".to_string(), "Budi".to_string())];
        let outcome = set_pin(&api, "1234", "1234", &fields).await.unwrap();

        assert_eq!(outcome.message.as_deref(), Some(MSG_REGISTER_SUCCESS));
        assert_eq!(outcome.next_route, Some(Route::Login));
        let calls = api.calls.lock().unwrap();
        let ApiCall::Register(payload) = &calls[0] else {
            panic!("expected a register call");
        };
        assert_eq!(Value::Object(payload.clone()), json!({ "name": "Budi", "pin": "1234" }));
    }

    #[tokio::test]
    async fn test_set_pin_transport_error_has_no_alert() {
        let api = FakeApi::failing();
        let outcome = set_pin(&api, "1234", "1234", &[]).await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, None);
        assert_eq!(outcome.next_route, None);
        assert!(outcome.error.is_some());
    }

    #[tokio::test]
    async fn test_new_password_flow() {
        let api = FakeApi::replying(RemoteEnvelope::ok());
        let outcome = new_password(&api, "budi@lumibank.id", "0427", "rahasia123", "rahasia123")
            .await
            .unwrap();
        assert_eq!(outcome.message.as_deref(), Some(MSG_PASSWORD_CHANGED));
        assert_eq!(outcome.next_route, Some(Route::Dashboard));

        let err = new_password(&api, "budi@lumibank.id", "0427", "abcdefgh", "abcdefgh")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("kombinasi huruf dan angka"));
        assert_eq!(api.calls.lock().unwrap().len(), 1);
    }
}
