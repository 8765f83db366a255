use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::batch::{LoadState, View};
use crate::client::ApiClient;
use crate::config::Config;
use crate::dashboards::{
    self, accountant::AccountantDashboard, driver::DriverDashboard, foreman::ForemanDashboard,
    guard::GuardDashboard, manager::ManagerDashboard, Dashboard, DashboardKind,
};
use crate::error::{Error, EXPORT_FAILED, IMPORT_FAILED};
use crate::render;
use crate::session::{self, Session, TokenStore};

async fn current_session(config: &Config) -> Result<Session> {
    let token = TokenStore::new(config).require()?;
    let session = Session::establish(config, &token)
        .await
        .context("Failed to establish session")?;
    Ok(session)
}

pub async fn login(username: Option<String>, password: Option<String>) -> Result<()> {
    let config = Config::load()?;

    let username = match username {
        Some(u) => u,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()?,
    };

    let token = match session::login(&config, &username, &password).await {
        Ok(token) => token,
        Err(e) => anyhow::bail!(e.user_message(config.locale, &render::LOGIN_FAILED)),
    };

    let session = Session::establish(&config, &token).await?;
    TokenStore::new(&config).save(&token)?;

    println!("✓ Logged in as {}", session.user().username);
    render::print_identity(&session);
    Ok(())
}

pub async fn logout() -> Result<()> {
    let config = Config::load()?;
    TokenStore::new(&config).clear()?;
    println!("✓ Logged out");
    Ok(())
}

pub async fn whoami() -> Result<()> {
    let config = Config::load()?;
    let session = current_session(&config).await?;
    render::print_identity(&session);
    Ok(())
}

pub async fn nav() -> Result<()> {
    let config = Config::load()?;
    let session = current_session(&config).await?;
    render::print_nav(&session.nav_items());
    Ok(())
}

pub async fn widgets() -> Result<()> {
    let config = Config::load()?;
    let session = current_session(&config).await?;
    render::print_widgets(&session.dashboard_widgets());
    Ok(())
}

pub async fn dashboard(view: Option<DashboardKind>) -> Result<()> {
    let config = Config::load()?;
    let session = current_session(&config).await?;

    let client = ApiClient::new(&config, &session)?;
    let kind = view.unwrap_or_else(|| session.role().dashboard());

    match kind {
        DashboardKind::Manager => {
            let state = open(ManagerDashboard::default(), client, &config).await;
            render::print_state(&state, render::print_manager);
        }
        DashboardKind::Accountant => {
            let state = open(AccountantDashboard::default(), client, &config).await;
            render::print_state(&state, render::print_accountant);
        }
        DashboardKind::Foreman => {
            let state = open(ForemanDashboard::default(), client, &config).await;
            render::print_state(&state, render::print_foreman);
        }
        DashboardKind::Driver => {
            let state = open(DriverDashboard::default(), client, &config).await;
            render::print_state(&state, render::print_driver);
        }
        DashboardKind::Guard => {
            let state = open(GuardDashboard::default(), client, &config).await;
            render::print_state(&state, render::print_guard);
        }
    }

    Ok(())
}

async fn open<D>(dashboard: D, client: ApiClient, config: &Config) -> LoadState<D::Summary>
where
    D: Dashboard + 'static,
{
    let mut view: View<D::Summary> =
        dashboards::mount(Arc::new(dashboard), client, config.locale).await;
    view.settled().await
}

pub async fn export(module: String, endpoint: Option<String>, out: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let session = current_session(&config).await?;
    let client = ApiClient::new(&config, &session)?;

    let endpoint = endpoint.unwrap_or_else(|| crate::csv::default_export_endpoint(&module));
    let dest = out.unwrap_or_else(|| config.export_dir.clone());

    match crate::csv::export(&client, &module, &endpoint, &dest, crate::aggregate::today()).await {
        Ok(path) => {
            println!("✓ Exported to {}", path.display());
            Ok(())
        }
        Err(e) => anyhow::bail!(e.prefixed_message(config.locale, &EXPORT_FAILED)),
    }
}

pub async fn import(module: String, file: PathBuf, endpoint: Option<String>) -> Result<()> {
    let config = Config::load()?;

    // Client-side validation runs before any session or network work.
    if let Err(e) = crate::csv::validate_csv_path(&file, config.locale) {
        anyhow::bail!(e.user_message(config.locale, &IMPORT_FAILED));
    }

    let session = current_session(&config).await?;
    let client = ApiClient::new(&config, &session)?;
    let endpoint = endpoint.unwrap_or_else(|| crate::csv::default_import_endpoint(&module));

    match crate::csv::import(&client, &endpoint, &file, config.locale).await {
        Ok(report) => {
            render::print_import_report(&report, config.locale);
            Ok(())
        }
        Err(e @ Error::Import(_)) | Err(e @ Error::Backend { .. }) => {
            anyhow::bail!(e.user_message(config.locale, &IMPORT_FAILED))
        }
        Err(e) => Err(e).context(IMPORT_FAILED.get(config.locale)),
    }
}
