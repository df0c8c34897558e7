use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use lumibank::{
    api::{AuthApi, HttpAuthApi},
    cli::{Cli, Commands},
    commands,
    config::Config,
    store::FlowContext,
    tui::App,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "lumibank=info");
    }

    let config = Config::from_env()?;
    // the file appender panics on an unusable log path
    config.validate()?;

    let interactive = matches!(cli.command, Commands::Tui { .. });
    init_logging(&config.log_file, interactive);
    info!("Using backend {}", config.api.base_url);

    let api = HttpAuthApi::new(&config)?;

    match cli.command {
        Commands::Tui { start, fields } => {
            let start = Commands::parse_route(&start)?;
            let mut flows = FlowContext::new();
            for (key, value) in Commands::parse_fields(&fields)? {
                flows.registration.set_field(&key, &value);
            }
            run_tui(config, Arc::new(api), flows, start).await?;
        }
        Commands::SendOtp { email } => {
            finish(commands::send_otp(&api, &email).await?);
        }
        Commands::SetPin {
            pin,
            confirm_pin,
            fields,
        } => {
            let fields = Commands::parse_fields(&fields)?;
            finish(commands::set_pin(&api, &pin, &confirm_pin, &fields).await?);
        }
        Commands::NewPassword {
            email,
            otp,
            password,
            confirm_password,
        } => {
            finish(
                commands::new_password(&api, &email, &otp, &password, &confirm_password).await?,
            );
        }
    }

    Ok(())
}

/// File logging always; stderr as well unless the TUI owns the terminal
fn init_logging(log_file: &Path, interactive: bool) {
    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "lumibank.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let stderr_layer = (!interactive).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}

fn finish(outcome: commands::CommandOutcome) {
    outcome.print();
    if !outcome.success {
        std::process::exit(1);
    }
}

async fn run_tui(
    config: Config,
    api: Arc<dyn AuthApi>,
    flows: FlowContext,
    start: lumibank::models::Route,
) -> Result<()> {
    info!("Starting LumiBank TUI at {}", start.path());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, api, flows);
    app.navigate_to_screen(start);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => {
            info!("LumiBank TUI exited successfully");
            Ok(())
        }
        Err(e) => {
            error!("LumiBank TUI encountered an error: {}", e);
            Err(e)
        }
    }
}
