use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{count_where, sum_by};
use crate::batch::{Settlement, Settler};
use crate::client::ApiClient;
use crate::dashboards::{Dashboard, DashboardKind};
use crate::error::{Fallback, Result};
use crate::records::{Employee, Equipment, Production, Project};

const FALLBACK: Fallback = Fallback::new(
    "فشل تحميل بيانات المدير",
    "Failed to load manager data",
);

const ACTIVE_PROJECTS_SHOWN: usize = 5;

/// Company-wide view used by managers, owners and platform admins.
pub struct ManagerDashboard {
    settlement: Settlement,
}

impl Default for ManagerDashboard {
    fn default() -> Self {
        Self {
            settlement: Settlement::AllOrNothing,
        }
    }
}

impl ManagerDashboard {
    pub fn with_settlement(settlement: Settlement) -> Self {
        Self { settlement }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ManagerSummary {
    pub active_projects: Vec<Project>,
    pub active_project_count: usize,
    pub active_equipment: usize,
    pub equipment_total: usize,
    pub active_employees: usize,
    pub total_production: f64,
    pub unavailable: Vec<&'static str>,
}

impl ManagerSummary {
    pub fn compute(
        projects: &[Project],
        equipment: &[Equipment],
        production: &[Production],
        employees: &[Employee],
    ) -> Self {
        let in_progress: Vec<Project> = projects
            .iter()
            .filter(|p| p.status == "in_progress")
            .cloned()
            .collect();

        Self {
            active_project_count: in_progress.len(),
            active_projects: in_progress.into_iter().take(ACTIVE_PROJECTS_SHOWN).collect(),
            active_equipment: count_where(equipment, |e| e.status == "active"),
            equipment_total: equipment.len(),
            active_employees: count_where(employees, |e| e.employment_status == "active"),
            total_production: sum_by(production, |p| p.actual_qty),
            unavailable: Vec::new(),
        }
    }
}

#[async_trait]
impl Dashboard for ManagerDashboard {
    type Summary = ManagerSummary;

    fn kind(&self) -> DashboardKind {
        DashboardKind::Manager
    }

    fn settlement(&self) -> Settlement {
        self.settlement
    }

    fn fallback(&self) -> Fallback {
        FALLBACK
    }

    async fn load(&self, client: &ApiClient, _today: NaiveDate) -> Result<ManagerSummary> {
        let (projects, equipment, production, employees) = tokio::join!(
            client.list::<Project>("projects"),
            client.list::<Equipment>("equipment"),
            client.list::<Production>("production"),
            client.list::<Employee>("employees"),
        );

        let mut settler = Settler::new(self.settlement);
        let projects = settler.take_guarded("projects", projects);
        let equipment = settler.take("equipment", equipment);
        let production = settler.take("production", production);
        let employees = settler.take_guarded("employees", employees);
        let unavailable = settler.finish()?;

        let mut summary = ManagerSummary::compute(&projects, &equipment, &production, &employees);
        summary.unavailable = unavailable;
        Ok(summary)
    }
}
