use serde::{Deserialize, Serialize};

/// Response envelope returned by every LumiBank endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RemoteEnvelope {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
        }
    }
}

/// Client-side routes the application can be at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Menu,
    Login,
    Register,
    RegisterPin,
    Dashboard,
    ForgotPassword,
    Otp,
    NewPassword,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Menu,
        Route::Login,
        Route::Register,
        Route::RegisterPin,
        Route::Dashboard,
        Route::ForgotPassword,
        Route::Otp,
        Route::NewPassword,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Menu => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::RegisterPin => "/register/pin",
            Route::Dashboard => "/dashboard",
            Route::ForgotPassword => "/reset/forgot-password",
            Route::Otp => "/reset/otp",
            Route::NewPassword => "/reset/new-password",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Menu => "Menu",
            Route::Login => "Login",
            Route::Register => "Registrasi",
            Route::RegisterPin => "Atur Pin",
            Route::Dashboard => "Dashboard",
            Route::ForgotPassword => "Lupa Password",
            Route::Otp => "Verifikasi OTP",
            Route::NewPassword => "Buat Password Baru",
        }
    }

    /// Look a route up by path or by a short name such as `pin` or `otp`
    pub fn from_path(value: &str) -> Option<Route> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "menu" | "home" => return Some(Route::Menu),
            "login" => return Some(Route::Login),
            "register" => return Some(Route::Register),
            "pin" | "atur-pin" => return Some(Route::RegisterPin),
            "dashboard" => return Some(Route::Dashboard),
            "forgot-password" | "forgot" => return Some(Route::ForgotPassword),
            "otp" => return Some(Route::Otp),
            "new-password" => return Some(Route::NewPassword),
            _ => {}
        }
        Route::ALL
            .iter()
            .copied()
            .find(|route| route.path() == normalized)
    }
}

/// Severity of an alert dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertVariant {
    Success,
    Danger,
    Primary,
}

impl AlertVariant {
    pub fn as_str(&self) -> &str {
        match self {
            AlertVariant::Success => "success",
            AlertVariant::Danger => "danger",
            AlertVariant::Primary => "primary",
        }
    }
}

/// Everything needed to present an alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertSpec {
    pub variant: AlertVariant,
    pub message: String,
    pub auto_dismiss: bool,
    pub show_close_button: bool,
}

impl AlertSpec {
    /// Alert that closes itself on a timer and has no close button
    pub fn transient(variant: AlertVariant, message: impl Into<String>) -> Self {
        Self {
            variant,
            message: message.into(),
            auto_dismiss: true,
            show_close_button: false,
        }
    }

    /// Alert that stays open until the user closes it
    pub fn sticky(variant: AlertVariant, message: impl Into<String>) -> Self {
        Self {
            variant,
            message: message.into(),
            auto_dismiss: false,
            show_close_button: true,
        }
    }
}
