mod input;
mod price;
mod session;
mod variants;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use storefront_core::Theme;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Storefront variant pricing and admin variant sync")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a color/size selection and show effective price and stock
    Price {
        /// Product JSON or YAML file
        #[arg(long)]
        product: PathBuf,
        #[arg(long)]
        color: String,
        #[arg(long)]
        size: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        /// Units of this variant already in the cart
        #[arg(long, default_value_t = 0)]
        in_cart: u32,
    },
    /// Show the calls a variant save would make
    Plan {
        /// Variants as loaded into the form
        #[arg(long)]
        existing: PathBuf,
        /// Variants as edited
        #[arg(long)]
        edited: PathBuf,
    },
    /// Save edited variants to the backend
    Sync {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        existing: PathBuf,
        #[arg(long)]
        edited: PathBuf,
    },
    /// Inspect or change the persisted session
    Session {
        #[arg(long, env = "STOREFRONT_SESSION_PATH", default_value = "./.storefront-session.json")]
        path: PathBuf,
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Debug, Subcommand)]
enum SessionCommands {
    Show,
    Login {
        #[arg(long, env = "STOREFRONT_ACCESS_TOKEN", hide_env_values = true)]
        token: String,
        #[arg(long, env = "STOREFRONT_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: Option<String>,
        #[arg(long)]
        admin: bool,
    },
    Logout,
    Theme {
        theme: Theme,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let log_level = std::env::var("STOREFRONT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Price {
            product,
            color,
            size,
            quantity,
            in_cart,
        }) => price::run_price(&product, &color, &size, quantity, in_cart)?,
        Some(Commands::Plan { existing, edited }) => variants::run_plan(&existing, &edited)?,
        Some(Commands::Sync {
            product_id,
            existing,
            edited,
        }) => {
            let config = storefront_core::load_app_config()?;
            variants::run_sync(&config, &product_id, &existing, &edited).await?;
        }
        Some(Commands::Session { path, command }) => session::run_session(&path, command)?,
        None => println!("storefront-cli: try --help"),
    }

    Ok(())
}
