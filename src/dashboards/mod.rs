use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::batch::{Settlement, View};
use crate::client::ApiClient;
use crate::error::{Error, Fallback, Locale, Result};

pub mod accountant;
pub mod driver;
pub mod foreman;
pub mod guard;
pub mod manager;

/// A role-specific dashboard: a fixed batch of fetches reduced to a summary.
#[async_trait]
pub trait Dashboard: Send + Sync {
    type Summary: Clone + Send + 'static;

    fn kind(&self) -> DashboardKind;

    fn settlement(&self) -> Settlement;

    /// Message shown when the batch fails without a backend `detail`.
    fn fallback(&self) -> Fallback;

    async fn load(&self, client: &ApiClient, today: NaiveDate) -> Result<Self::Summary>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardKind {
    Manager,
    Accountant,
    Foreman,
    Driver,
    Guard,
}

impl DashboardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardKind::Manager => "manager",
            DashboardKind::Accountant => "accountant",
            DashboardKind::Foreman => "foreman",
            DashboardKind::Driver => "driver",
            DashboardKind::Guard => "guard",
        }
    }
}

impl std::str::FromStr for DashboardKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "manager" => Ok(DashboardKind::Manager),
            "accountant" => Ok(DashboardKind::Accountant),
            "foreman" => Ok(DashboardKind::Foreman),
            "driver" => Ok(DashboardKind::Driver),
            "guard" => Ok(DashboardKind::Guard),
            _ => Err(Error::Validation(format!("Invalid dashboard: {}", s))),
        }
    }
}

/// Mount `dashboard` and start its first load.
pub async fn mount<D>(dashboard: Arc<D>, client: ApiClient, locale: Locale) -> View<D::Summary>
where
    D: Dashboard + 'static,
{
    let mut view = View::new(locale, dashboard.fallback());
    reload(&mut view, dashboard, client).await;
    view
}

/// Re-enter `Loading` and fetch a fresh snapshot for an already mounted view.
pub async fn reload<D>(view: &mut View<D::Summary>, dashboard: Arc<D>, client: ApiClient)
where
    D: Dashboard + 'static,
{
    tracing::debug!(
        "Loading {} dashboard ({:?})",
        dashboard.kind().as_str(),
        dashboard.settlement()
    );
    view.refresh(async move {
        let today = crate::aggregate::today();
        dashboard.load(&client, today).await
    })
    .await;
}
