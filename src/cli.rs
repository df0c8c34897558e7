use clap::{Parser, Subcommand};

use crate::models::Route;

#[derive(Parser)]
#[command(name = "lumibank")]
#[command(about = "Terminal client for LumiBank PIN setup and password reset")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive terminal UI
    Tui {
        /// Route to open first (path such as /reset/forgot-password or a short name such as pin)
        #[arg(short, long, default_value = "/")]
        start: String,

        /// Registration field carried into the PIN page (key=value, repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Send a verification code to an email address
    SendOtp {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },

    /// Set the transaction PIN and complete a registration
    SetPin {
        /// New PIN
        #[arg(long)]
        pin: String,

        /// PIN typed a second time
        #[arg(long)]
        confirm_pin: String,

        /// Registration field sent along with the PIN (key=value, repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Change the password using a verification code
    NewPassword {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// 4 digit verification code
        #[arg(long)]
        otp: String,

        /// New password
        #[arg(long)]
        password: String,

        /// New password typed a second time
        #[arg(long)]
        confirm_password: String,
    },
}

impl Commands {
    pub fn parse_route(route: &str) -> Result<Route, anyhow::Error> {
        Route::from_path(route).ok_or_else(|| {
            let known: Vec<&str> = Route::ALL.iter().map(|r| r.path()).collect();
            anyhow::anyhow!("Unknown route: {}. Known routes: {}", route, known.join(", "))
        })
    }

    pub fn parse_field(field: &str) -> Result<(String, String), anyhow::Error> {
        match field.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(anyhow::anyhow!("Invalid field: {}. Expected key=value", field)),
        }
    }

    pub fn parse_fields(fields: &[String]) -> Result<Vec<(String, String)>, anyhow::Error> {
        fields.iter().map(|f| Self::parse_field(f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route_accepts_paths_and_names() {
        assert_eq!(Commands::parse_route("/reset/otp").unwrap(), Route::Otp);
        assert_eq!(Commands::parse_route("pin").unwrap(), Route::RegisterPin);
        assert!(Commands::parse_route("/nowhere").is_err());
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            Commands::parse_field("name=Budi Santoso").unwrap(),
            ("name".to_string(), "Budi Santoso".to_string())
        );
        assert_eq!(
            Commands::parse_field("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(Commands::parse_field("=value").is_err());
        assert!(Commands::parse_field("novalue").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from([
            "lumibank", "set-pin", "--pin", "1234", "--confirm-pin", "1234", "-f", "name=Budi",
        ]);
        match cli.command {
            Commands::SetPin { pin, confirm_pin, fields } => {
                assert_eq!(pin, "1234");
                assert_eq!(confirm_pin, "1234");
                assert_eq!(fields, vec!["name=Budi".to_string()]);
            }
            _ => panic!("expected set-pin"),
        }
    }
}
