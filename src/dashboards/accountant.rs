use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::sum_by;
use crate::batch::{Settlement, Settler};
use crate::client::ApiClient;
use crate::dashboards::{Dashboard, DashboardKind};
use crate::error::{Fallback, Result};
use crate::records::{Expense, Investment, Invoice};

const FALLBACK: Fallback = Fallback::new(
    "فشل تحميل البيانات المالية",
    "Failed to load financial data",
);

const RECENT_ROWS: usize = 5;

pub struct AccountantDashboard {
    settlement: Settlement,
}

impl Default for AccountantDashboard {
    fn default() -> Self {
        Self {
            settlement: Settlement::AllOrNothing,
        }
    }
}

impl AccountantDashboard {
    pub fn with_settlement(settlement: Settlement) -> Self {
        Self { settlement }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountantSummary {
    pub recent_expenses: Vec<Expense>,
    pub recent_invoices: Vec<Invoice>,
    pub total_expenses: f64,
    pub total_invoices: f64,
    pub total_investments: f64,
    pub unavailable: Vec<&'static str>,
}

impl AccountantSummary {
    pub fn compute(expenses: &[Expense], invoices: &[Invoice], investments: &[Investment]) -> Self {
        Self {
            recent_expenses: expenses.iter().take(RECENT_ROWS).cloned().collect(),
            recent_invoices: invoices.iter().take(RECENT_ROWS).cloned().collect(),
            total_expenses: sum_by(expenses, |e| e.amount),
            total_invoices: sum_by(invoices, |i| i.amount),
            total_investments: sum_by(investments, |i| i.amount),
            unavailable: Vec::new(),
        }
    }

    pub fn net(&self) -> f64 {
        self.total_invoices - self.total_expenses
    }
}

#[async_trait]
impl Dashboard for AccountantDashboard {
    type Summary = AccountantSummary;

    fn kind(&self) -> DashboardKind {
        DashboardKind::Accountant
    }

    fn settlement(&self) -> Settlement {
        self.settlement
    }

    fn fallback(&self) -> Fallback {
        FALLBACK
    }

    async fn load(&self, client: &ApiClient, _today: NaiveDate) -> Result<AccountantSummary> {
        let (expenses, invoices, investments) = tokio::join!(
            client.list::<Expense>("expenses"),
            client.list::<Invoice>("invoices"),
            client.list::<Investment>("investments"),
        );

        let mut settler = Settler::new(self.settlement);
        let expenses = settler.take("expenses", expenses);
        let invoices = settler.take("invoices", invoices);
        let investments = settler.take_guarded("investments", investments);
        let unavailable = settler.finish()?;

        let mut summary = AccountantSummary::compute(&expenses, &invoices, &investments);
        summary.unavailable = unavailable;
        Ok(summary)
    }
}
