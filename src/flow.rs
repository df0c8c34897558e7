//! Submit state machine and per-page outcome policy
//!
//! Pages never decide navigation inside a dismissal callback. Instead the
//! outcome of a request is resolved into an alert, a store effect and an
//! optional immediate route ([`resolve`]), and the route taken after an alert
//! closes is looked up in a fixed table ([`after_dismiss`]).

use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{AlertSpec, AlertVariant, RemoteEnvelope, Route};
use crate::store::FlowStore;
use crate::validation::{FormValues, FIELD_OTP};

pub const MSG_REGISTER_SUCCESS: &str = "Anda berhasil membuka rekening";
pub const MSG_REGISTER_FAILED: &str =
    "Registrasi gagal. Terjadi kesalahan yang tidak terduga. Silakan coba lagi";
pub const MSG_PASSWORD_CHANGED: &str = "Berhasil ubah password";
pub const MSG_PASSWORD_CHANGE_FAILED: &str = "Gagal ubah password";
pub const MSG_LEAVE_CONFIRM: &str =
    "Apakah anda yakin akan keluar dari halaman ini? Jika iya, maka data Anda tidak akan tersimpan";

/// Pages that submit to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    PinSetup,
    ForgotPassword,
    NewPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting { request_id: Uuid },
    Success,
    Failure,
}

/// Idle -> Submitting -> {Success, Failure} -> Idle
#[derive(Debug, Clone)]
pub struct SubmitMachine {
    state: SubmitState,
}

impl Default for SubmitMachine {
    fn default() -> Self {
        Self {
            state: SubmitState::Idle,
        }
    }
}

impl SubmitMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmitState::Submitting { .. })
    }

    pub fn is_idle(&self) -> bool {
        self.state == SubmitState::Idle
    }

    /// Start a submission; `None` unless the machine is idle
    pub fn begin(&mut self) -> Option<Uuid> {
        if !self.is_idle() {
            return None;
        }
        let request_id = Uuid::new_v4();
        self.state = SubmitState::Submitting { request_id };
        Some(request_id)
    }

    /// Record the outcome of `request_id`; stale ids are ignored
    pub fn resolve(&mut self, request_id: Uuid, success: bool) -> bool {
        match self.state {
            SubmitState::Submitting { request_id: current } if current == request_id => {
                self.state = if success {
                    SubmitState::Success
                } else {
                    SubmitState::Failure
                };
                true
            }
            _ => false,
        }
    }

    /// Back to idle once the outcome has been acknowledged
    pub fn settle(&mut self) {
        if matches!(self.state, SubmitState::Success | SubmitState::Failure) {
            self.state = SubmitState::Idle;
        }
    }

    /// Drop whatever was in progress (page exit)
    pub fn cancel(&mut self) {
        self.state = SubmitState::Idle;
    }
}

/// What to do with a page's flow store after an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEffect {
    Keep,
    Reset,
    /// Start the flow afresh from the values just submitted
    Begin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub success: bool,
    pub alert: Option<AlertSpec>,
    pub store: StoreEffect,
    pub navigate_now: Option<Route>,
}

/// Interpret a response for `page`
pub fn resolve(page: Page, result: &Result<RemoteEnvelope, ApiError>) -> Resolution {
    match (page, result) {
        (Page::PinSetup, Ok(envelope)) if envelope.success => Resolution {
            success: true,
            alert: Some(AlertSpec::transient(AlertVariant::Success, MSG_REGISTER_SUCCESS)),
            store: StoreEffect::Reset,
            navigate_now: None,
        },
        // The server message is not shown on this page
        (Page::PinSetup, Ok(_)) => Resolution {
            success: false,
            alert: Some(AlertSpec::transient(AlertVariant::Danger, MSG_REGISTER_FAILED)),
            store: StoreEffect::Keep,
            navigate_now: None,
        },
        (Page::PinSetup, Err(_)) => Resolution {
            success: false,
            alert: None,
            store: StoreEffect::Keep,
            navigate_now: None,
        },

        (Page::ForgotPassword, Ok(envelope)) if envelope.success => Resolution {
            success: true,
            alert: None,
            store: StoreEffect::Begin,
            navigate_now: Some(Route::Otp),
        },
        (Page::ForgotPassword, Ok(envelope)) => Resolution {
            success: false,
            alert: Some(AlertSpec::sticky(
                AlertVariant::Danger,
                format!(
                    "Error: {}",
                    envelope.message.as_deref().unwrap_or("An error occurred")
                ),
            )),
            store: StoreEffect::Keep,
            navigate_now: None,
        },
        (Page::ForgotPassword, Err(err)) => Resolution {
            success: false,
            alert: Some(AlertSpec::sticky(
                AlertVariant::Danger,
                format!("Error: {}", err.user_message()),
            )),
            store: StoreEffect::Keep,
            navigate_now: None,
        },

        (Page::NewPassword, Ok(envelope)) if envelope.success => Resolution {
            success: true,
            alert: Some(AlertSpec::transient(AlertVariant::Success, MSG_PASSWORD_CHANGED)),
            store: StoreEffect::Reset,
            navigate_now: None,
        },
        (Page::NewPassword, Ok(envelope)) => Resolution {
            success: false,
            alert: Some(AlertSpec::sticky(
                AlertVariant::Danger,
                envelope
                    .message
                    .clone()
                    .unwrap_or_else(|| MSG_PASSWORD_CHANGE_FAILED.to_string()),
            )),
            store: StoreEffect::Keep,
            navigate_now: None,
        },
        (Page::NewPassword, Err(err)) => Resolution {
            success: false,
            alert: Some(AlertSpec::sticky(AlertVariant::Danger, err.user_message())),
            store: StoreEffect::Keep,
            navigate_now: None,
        },
    }
}

/// Route taken once the alert for `page` has been dismissed
pub fn after_dismiss(page: Page, variant: AlertVariant) -> Option<Route> {
    match (page, variant) {
        (Page::PinSetup, AlertVariant::Success) => Some(Route::Login),
        (Page::PinSetup, _) => Some(Route::Register),
        (Page::ForgotPassword, AlertVariant::Success) => Some(Route::Otp),
        (Page::ForgotPassword, _) => None,
        (Page::NewPassword, AlertVariant::Success) => Some(Route::Dashboard),
        (Page::NewPassword, _) => None,
    }
}

/// Apply `effect` to `store`; `submitted` seeds the store on [`StoreEffect::Begin`]
pub fn apply_store_effect(effect: StoreEffect, store: &mut FlowStore, submitted: &FormValues) {
    match effect {
        StoreEffect::Keep => {}
        StoreEffect::Reset => store.reset(),
        StoreEffect::Begin => {
            store.reset();
            for (key, value) in submitted {
                store.set_field(key, value);
            }
        }
    }
}

/// Where a confirmed abandon of the new-password page leads, and what happens
/// to the reset flow
pub fn abandon_target(reset_flow: &FlowStore) -> (Route, StoreEffect) {
    if reset_flow.has_field(FIELD_OTP) {
        (Route::Login, StoreEffect::Reset)
    } else {
        (Route::ForgotPassword, StoreEffect::Keep)
    }
}
