use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{count_where, is_on, sum_by, AttendanceStats};
use crate::batch::{Settlement, Settler};
use crate::client::ApiClient;
use crate::dashboards::{Dashboard, DashboardKind};
use crate::error::{Fallback, Result};
use crate::records::{Attendance, Equipment, Production};

const FALLBACK: Fallback = Fallback::new(
    "فشل تحميل بيانات العمليات",
    "Failed to load operations data",
);

/// Site operations overview: equipment, production and today's crew.
pub struct ForemanDashboard {
    settlement: Settlement,
}

impl Default for ForemanDashboard {
    fn default() -> Self {
        Self {
            settlement: Settlement::BestEffort,
        }
    }
}

impl ForemanDashboard {
    pub fn with_settlement(settlement: Settlement) -> Self {
        Self { settlement }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForemanSummary {
    pub equipment: Vec<Equipment>,
    pub production_today: Vec<Production>,
    pub active_equipment: usize,
    pub total_production: f64,
    pub attendance: AttendanceStats,
    pub unavailable: Vec<&'static str>,
}

impl ForemanSummary {
    pub fn compute(
        equipment: Vec<Equipment>,
        production: &[Production],
        attendance: &[Attendance],
        today: NaiveDate,
    ) -> Self {
        let production_today: Vec<Production> = production
            .iter()
            .filter(|p| is_on(&p.date, today))
            .cloned()
            .collect();

        Self {
            active_equipment: count_where(&equipment, |e| e.status == "active"),
            total_production: sum_by(production, |p| p.actual_qty),
            attendance: AttendanceStats::compute(attendance, today),
            equipment,
            production_today,
            unavailable: Vec::new(),
        }
    }

    pub fn production_today_count(&self) -> usize {
        self.production_today.len()
    }
}

#[async_trait]
impl Dashboard for ForemanDashboard {
    type Summary = ForemanSummary;

    fn kind(&self) -> DashboardKind {
        DashboardKind::Foreman
    }

    fn settlement(&self) -> Settlement {
        self.settlement
    }

    fn fallback(&self) -> Fallback {
        FALLBACK
    }

    async fn load(&self, client: &ApiClient, today: NaiveDate) -> Result<ForemanSummary> {
        let (equipment, production, attendance) = tokio::join!(
            client.list::<Equipment>("equipment"),
            client.list::<Production>("production"),
            client.list::<Attendance>("attendance"),
        );

        let mut settler = Settler::new(self.settlement);
        let equipment = settler.take("equipment", equipment);
        let production = settler.take("production", production);
        let attendance = settler.take("attendance", attendance);
        let unavailable = settler.finish()?;

        let mut summary = ForemanSummary::compute(equipment, &production, &attendance, today);
        summary.unavailable = unavailable;
        Ok(summary)
    }
}
