use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::AttendanceStats;
use crate::batch::{Settlement, Settler};
use crate::client::ApiClient;
use crate::dashboards::{Dashboard, DashboardKind};
use crate::error::{Fallback, Result};
use crate::records::{Attendance, Employee};

const FALLBACK: Fallback = Fallback::new("فشل تحميل بياناتك", "Failed to load your data");

pub struct GuardDashboard {
    settlement: Settlement,
}

impl Default for GuardDashboard {
    fn default() -> Self {
        Self {
            settlement: Settlement::BestEffort,
        }
    }
}

impl GuardDashboard {
    pub fn with_settlement(settlement: Settlement) -> Self {
        Self { settlement }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GuardSummary {
    pub profile: Option<Employee>,
    pub records: Vec<Attendance>,
    pub attendance: AttendanceStats,
    pub unavailable: Vec<&'static str>,
}

impl GuardSummary {
    pub fn compute(profile: Option<Employee>, records: Vec<Attendance>, today: NaiveDate) -> Self {
        Self {
            attendance: AttendanceStats::compute(&records, today),
            profile,
            records,
            unavailable: Vec::new(),
        }
    }
}

#[async_trait]
impl Dashboard for GuardDashboard {
    type Summary = GuardSummary;

    fn kind(&self) -> DashboardKind {
        DashboardKind::Guard
    }

    fn settlement(&self) -> Settlement {
        self.settlement
    }

    fn fallback(&self) -> Fallback {
        FALLBACK
    }

    async fn load(&self, client: &ApiClient, today: NaiveDate) -> Result<GuardSummary> {
        let (profile, attendance) = tokio::join!(
            client.get::<Employee>("/api/employees/me"),
            client.list::<Attendance>("attendance"),
        );

        let mut settler = Settler::new(self.settlement);
        // Guards may have no employee record yet.
        let profile = settler.take_guarded("profile", profile.map(Some));
        let attendance = settler.take("attendance", attendance);
        let unavailable = settler.finish()?;

        let mut summary = GuardSummary::compute(profile, attendance, today);
        summary.unavailable = unavailable;
        Ok(summary)
    }
}
