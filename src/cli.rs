use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::dashboards::DashboardKind;

#[derive(Parser)]
#[command(name = "siteboard")]
#[command(about = "Role-aware operations dashboards for mining and construction sites")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Login {
        #[arg(long, env = "SITEBOARD_USERNAME", help = "Username (prompted if omitted)")]
        username: Option<String>,

        #[arg(long, env = "SITEBOARD_PASSWORD", hide_env_values = true, help = "Password (prompted if omitted)")]
        password: Option<String>,
    },

    Logout,

    Whoami,

    Nav,

    Widgets,

    Dashboard {
        #[arg(long, help = "Dashboard to open (defaults to the role's dashboard)")]
        view: Option<DashboardKind>,
    },

    Export {
        module: String,

        #[arg(long, help = "Export endpoint (defaults to /api/csv/export/<module>)")]
        endpoint: Option<String>,

        #[arg(long, help = "Directory to write the CSV into")]
        out: Option<PathBuf>,
    },

    Import {
        module: String,

        file: PathBuf,

        #[arg(long, help = "Import endpoint (defaults to /api/csv/import/<module>)")]
        endpoint: Option<String>,
    },

    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    Show,
    Init,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { username, password } => crate::commands::login(username, password).await,
        Commands::Logout => crate::commands::logout().await,
        Commands::Whoami => crate::commands::whoami().await,
        Commands::Nav => crate::commands::nav().await,
        Commands::Widgets => crate::commands::widgets().await,
        Commands::Dashboard { view } => crate::commands::dashboard(view).await,
        Commands::Export { module, endpoint, out } => {
            crate::commands::export(module, endpoint, out).await
        }
        Commands::Import { module, file, endpoint } => {
            crate::commands::import(module, file, endpoint).await
        }
        Commands::Config { action } => match action {
            Some(ConfigAction::Show) => crate::config::show_config().await,
            Some(ConfigAction::Init) => crate::config::init_config().await,
            None => crate::config::show_config().await,
        },
    }
}
