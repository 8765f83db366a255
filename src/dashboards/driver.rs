use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{count_where, sum_by};
use crate::batch::{Settlement, Settler};
use crate::client::ApiClient;
use crate::dashboards::{Dashboard, DashboardKind};
use crate::error::{Fallback, Result};
use crate::records::{Employee, SalaryPayment, Vehicle};

const FALLBACK: Fallback = Fallback::new("فشل تحميل بياناتك", "Failed to load your data");

const RECENT_PAYMENTS: usize = 3;

/// A driver's own profile, pay and assigned vehicle.
pub struct DriverDashboard {
    settlement: Settlement,
}

impl Default for DriverDashboard {
    fn default() -> Self {
        Self {
            settlement: Settlement::AllOrNothing,
        }
    }
}

impl DriverDashboard {
    pub fn with_settlement(settlement: Settlement) -> Self {
        Self { settlement }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DriverSummary {
    pub profile: Option<Employee>,
    pub recent_payments: Vec<SalaryPayment>,
    pub vehicle: Option<Vehicle>,
    pub total_paid: f64,
    pub pending_payments: usize,
    pub unavailable: Vec<&'static str>,
}

impl DriverSummary {
    pub fn compute(
        profile: Option<Employee>,
        payments: &[SalaryPayment],
        vehicles: Vec<Vehicle>,
    ) -> Self {
        let paid: Vec<SalaryPayment> = payments
            .iter()
            .filter(|p| p.status == "paid")
            .cloned()
            .collect();

        Self {
            profile,
            recent_payments: payments.iter().take(RECENT_PAYMENTS).cloned().collect(),
            vehicle: vehicles.into_iter().next(),
            total_paid: sum_by(&paid, |p| p.net_salary),
            pending_payments: count_where(payments, |p| p.status != "paid"),
            unavailable: Vec::new(),
        }
    }
}

#[async_trait]
impl Dashboard for DriverDashboard {
    type Summary = DriverSummary;

    fn kind(&self) -> DashboardKind {
        DashboardKind::Driver
    }

    fn settlement(&self) -> Settlement {
        self.settlement
    }

    fn fallback(&self) -> Fallback {
        FALLBACK
    }

    async fn load(&self, client: &ApiClient, _today: NaiveDate) -> Result<DriverSummary> {
        let (profile, payments, vehicles) = tokio::join!(
            client.get::<Employee>("/api/employees/me"),
            client.list::<SalaryPayment>("salary-payments"),
            client.list::<Vehicle>("vehicles"),
        );

        let mut settler = Settler::new(self.settlement);
        let profile = settler.take("profile", profile.map(Some));
        let payments = settler.take("salary", payments);
        let vehicles = settler.take("vehicle", vehicles);
        let unavailable = settler.finish()?;

        let mut summary = DriverSummary::compute(profile, &payments, vehicles);
        summary.unavailable = unavailable;
        Ok(summary)
    }
}
