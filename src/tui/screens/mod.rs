//! Screen modules for the LumiBank TUI

pub mod forgot_password;
pub mod landing;
pub mod menu;
pub mod new_password;
pub mod otp;
pub mod pin_setup;

pub use forgot_password::ForgotPasswordScreen;
pub use landing::LandingScreen;
pub use menu::MenuScreen;
pub use new_password::NewPasswordScreen;
pub use otp::OtpScreen;
pub use pin_setup::PinSetupScreen;
