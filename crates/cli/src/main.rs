//! Tradepost CLI - Database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Apply the schema
//! tp-cli migrate
//!
//! # Create a user (password is read from stdin when --password is omitted)
//! tp-cli user create -u alice -f Alice -l Liddell -e alice@example.com \
//!     --country-code +1 --phone 5550100 --gender Female
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create a user with a hashed password

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use tradepost_core::{Email, Gender};

mod commands;

#[derive(Parser)]
#[command(name = "tp-cli")]
#[command(author, version, about = "Tradepost CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login handle
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        first_name: String,

        #[arg(short, long)]
        last_name: String,

        /// Email address
        #[arg(short, long)]
        email: Email,

        /// Dialling prefix, e.g. `+1`
        #[arg(long)]
        country_code: String,

        #[arg(long)]
        phone: String,

        /// `Male`, `Female` or `Other`
        #[arg(long, default_value = "Other")]
        gender: Gender,

        /// Plaintext password; read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                first_name,
                last_name,
                email,
                country_code,
                phone,
                gender,
                password,
            } => {
                let password = match password {
                    Some(password) => password,
                    None => commands::user::read_password()?,
                };
                let user = tradepost_api::models::UserCreate {
                    username,
                    first_name,
                    last_name,
                    email,
                    country_code,
                    phone,
                    gender,
                    password,
                };
                commands::user::create(user).await?;
            }
        },
    }
    Ok(())
}
