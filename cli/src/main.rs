//! boarding — buy a demo ticket and verify it from the terminal.

mod anchor;
mod config;
mod pass;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use boarding_client::{HttpWidgetLoader, TicketClient};
use boarding_store::{FileTicketStore, TicketStore};
use boarding_types::{NewTicket, SessionState};
use boarding_utils::LogFormat;
use boarding_verification::{SessionConfig, SessionFlow, SessionView, VerificationSessionController};
use clap::Parser;

use crate::anchor::TerminalAnchor;
use crate::config::{AppConfig, Overrides};

#[derive(Parser)]
#[command(name = "boarding", about = "Boarding-pass check-in with credential verification")]
struct Cli {
    /// Base URL of the backend API.
    #[arg(long, env = "BOARDING_API_ENDPOINT")]
    api_endpoint: Option<String>,

    /// Display language: "en" or "nl".
    #[arg(long, env = "BOARDING_LANGUAGE")]
    language: Option<String>,

    /// File holding the pending ticket.
    #[arg(long, env = "BOARDING_STORE")]
    store: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BOARDING_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Path to a TOML configuration file. Flags and env vars override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Create a ticket and keep it for verification.
    Buy {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Passport or document number.
        #[arg(long)]
        document_number: String,
    },
    /// Verify with the credential app and print the boarding pass.
    Verify {
        /// Bind the session to the pending ticket instead of a plain disclosure.
        #[arg(long)]
        ticket: bool,
    },
    /// Show the pending ticket.
    Show,
    /// Forget the pending ticket.
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_toml_file(path)?,
        None => AppConfig::default(),
    };
    config.apply(Overrides {
        api_endpoint: cli.api_endpoint,
        language: cli.language,
        store_path: cli.store,
        log_level: cli.log_level,
        log_format: cli.log_format,
    });

    boarding_utils::init_tracing(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::debug!("loaded config from {}", path.display());
    }

    let store = Arc::new(FileTicketStore::new(&config.store_path));

    match cli.command {
        Command::Buy {
            first_name,
            last_name,
            document_number,
        } => {
            let request = NewTicket {
                first_name,
                last_name,
                document_number,
            };
            let pending = TicketClient::with_timeout(config.request_timeout())
                .create_ticket(&config.endpoint(), &request)
                .await
                .context("failed to create ticket")?;
            store.set(&pending).context("failed to store ticket")?;

            print!("{}", pass::render(&pending.ticket, config.language(), false));
            println!("Ticket {} stored. Run `boarding verify --ticket` to check in.", pending.ticket_id);
        }
        Command::Verify { ticket } => {
            let flow = if ticket {
                SessionFlow::TicketBound
            } else {
                SessionFlow::Disclosure
            };
            let view = verify(&config, store, flow).await;
            report(&config, &view)?;
        }
        Command::Show => match store.get().context("failed to read ticket")? {
            Some(pending) => {
                println!("Ticket {}", pending.ticket_id);
                print!("{}", pass::render(&pending.ticket, config.language(), false));
            }
            None => println!("No pending ticket."),
        },
        Command::Reset => {
            store.clear().context("failed to clear ticket")?;
            tracing::info!(path = %store.path().display(), "pending ticket cleared");
        }
    }

    Ok(())
}

/// Run one session to completion, or until Ctrl-C.
async fn verify(config: &AppConfig, store: Arc<FileTicketStore>, flow: SessionFlow) -> SessionView {
    let loader = HttpWidgetLoader::builder()
        .poll_interval(config.poll_interval())
        .session_timeout(config.session_timeout())
        .request_timeout(config.request_timeout())
        .follow_status(config.follow_status)
        .build();
    let mut controller = VerificationSessionController::new(
        Arc::new(loader),
        store,
        Arc::new(TerminalAnchor::new()),
        config.itinerary.clone(),
    );

    controller.start(SessionConfig {
        endpoint: config.endpoint(),
        language: config.language(),
        flow,
    });

    let settled = tokio::select! {
        view = controller.wait() => Some(view),
        _ = tokio::signal::ctrl_c() => None,
    };
    match settled {
        Some(view) => view,
        None => {
            tracing::info!("interrupted");
            controller.cancel();
            controller.view()
        }
    }
}

fn report(config: &AppConfig, view: &SessionView) -> anyhow::Result<()> {
    match view.state {
        SessionState::Completed => {
            match &view.ticket {
                Some(ticket) => print!("{}", pass::render(ticket, config.language(), view.ready)),
                None => println!("Verification complete; no passenger details were disclosed."),
            }
            if view.verified == Some(false) {
                println!(
                    "Ticket not verified: {}",
                    view.message.as_deref().unwrap_or("no reason given")
                );
            }
            Ok(())
        }
        SessionState::Cancelled => {
            println!("Verification cancelled.");
            Ok(())
        }
        _ => {
            let message = view
                .error_message()
                .unwrap_or("Verification did not finish.");
            if let Some(error) = &view.error {
                tracing::debug!("session error: {error}");
            }
            anyhow::bail!(message)
        }
    }
}
