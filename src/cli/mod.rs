use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod auth;
pub mod bills;
pub mod chat;
pub mod forecast;
pub mod health;
pub mod init;
pub mod invoices;
pub mod scam;
pub mod upload;
pub mod vendors;

use crate::auth::{Session, SessionStore};
use crate::core::db::{async_db, initialize_db};
use crate::core::AppConfig;
use forecast::Period;

#[derive(Subcommand)]
enum Command {
    /// Create the storage directory and session database
    Init {},
    /// Sign in and store the session locally
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account and its organization
    Register {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        org_name: Option<String>,
    },
    /// End the session and wipe local credentials
    Logout {},
    /// Show the signed-in user and their organizations
    Me {},
    /// Start an interactive chat session with the AI CFO
    Chat {},
    /// List invoices for the active organization
    Invoices {},
    /// List vendors
    Vendors {},
    /// List bills, or upload a bill document for capture
    Bills {
        #[arg(long)]
        upload: Option<String>,
    },
    /// Show the latest financial health score
    Health {
        #[arg(long, action, default_value = "false")]
        calculate: bool,
    },
    /// Show the cashflow forecast
    Forecast {
        #[arg(long, value_enum, default_value = "month")]
        period: Period,
    },
    /// Upload a file to the chat service and parse it
    Upload {
        #[arg(long)]
        path: String,
    },
    /// Check a piece of text for scam signals
    Scam {
        #[arg(long)]
        text: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Init {}) => {
            init::run(&config).await?;
        }
        Some(Command::Login { email }) => {
            auth::login(&config, email).await?;
        }
        Some(Command::Register {
            email,
            name,
            org_name,
        }) => {
            auth::register(&config, email, name, org_name).await?;
        }
        Some(Command::Logout {}) => {
            auth::logout(&config).await?;
        }
        Some(Command::Me {}) => {
            auth::me(&config).await?;
        }
        Some(Command::Chat {}) => {
            chat::run(&config).await?;
        }
        Some(Command::Invoices {}) => {
            invoices::run(&config).await?;
        }
        Some(Command::Vendors {}) => {
            vendors::run(&config).await?;
        }
        Some(Command::Bills { upload }) => {
            bills::run(&config, upload).await?;
        }
        Some(Command::Health { calculate }) => {
            health::run(&config, calculate).await?;
        }
        Some(Command::Forecast { period }) => {
            forecast::run(&config, period).await?;
        }
        Some(Command::Upload { path }) => {
            upload::run(&config, &path).await?;
        }
        Some(Command::Scam { text }) => {
            scam::run(&config, &text).await?;
        }
        None => {}
    }

    Ok(())
}

/// Open the session database and wrap it in an authenticated session.
pub(crate) async fn open_session(config: &AppConfig) -> Result<Session> {
    let db = async_db(&config.db_path).await?;
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await?;
    Ok(Session::new(config, SessionStore::new(db)))
}
