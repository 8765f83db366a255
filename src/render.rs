//! Plain-text rendering of sessions, menus and dashboard summaries.

use std::io::{self, Write};

use crate::batch::LoadState;
use crate::csv::ImportReport;
use crate::dashboards::accountant::AccountantSummary;
use crate::dashboards::driver::DriverSummary;
use crate::dashboards::foreman::ForemanSummary;
use crate::dashboards::guard::GuardSummary;
use crate::dashboards::manager::ManagerSummary;
use crate::error::{Fallback, Locale};
use crate::navigation::{DashboardWidget, NavItem};
use crate::session::Session;

pub const LOGIN_FAILED: Fallback = Fallback::new("فشل تسجيل الدخول", "Login failed");

const RULE: &str = "─────────────────────────────────────";

pub fn print_identity(session: &Session) {
    let user = session.user();
    let role = session.role();
    println!("User:  {} ({})", user.full_name, user.username);
    println!("Role:  {} [{}]", role.display_name(), role.as_str());
    if let Some(ref company) = user.company_id {
        println!("Company: {}", company);
    }
}

pub fn print_nav(items: &[NavItem]) {
    if items.is_empty() {
        println!("No navigation entries available.");
        return;
    }
    for item in items {
        let marker = if item.admin_only { " (admin)" } else { "" };
        println!("{} {}  {}{}", item.icon, item.name, item.path, marker);
    }
}

pub fn print_widgets(widgets: &[DashboardWidget]) {
    if widgets.is_empty() {
        println!("No dashboard widgets available.");
        return;
    }
    for widget in widgets {
        println!("[{}] {}", widget.id, widget.title);
    }
}

/// Print the error banner, or the summary when the load succeeded.
pub fn print_state<T>(state: &LoadState<T>, print: fn(&T)) {
    match state {
        LoadState::Loading => println!("Loading..."),
        LoadState::Failed(message) => {
            println!("{}", RULE);
            println!("✗ {}", message);
            println!("{}", RULE);
        }
        LoadState::Loaded(summary) => print(summary),
    }
}

pub fn print_foreman(summary: &ForemanSummary) {
    println!("{}", RULE);
    println!("Active equipment:    {}", summary.active_equipment);
    println!("Production today:    {}", summary.production_today_count());
    println!("Total production:    {:.2}", summary.total_production);
    println!(
        "Attendance today:    {}/{} ({}%)",
        summary.attendance.present_today,
        summary.attendance.records_today,
        summary.attendance.rate_today
    );
    println!("{}", RULE);

    println!("Equipment:");
    if summary.equipment.is_empty() {
        println!("  No equipment");
    }
    for item in &summary.equipment {
        println!("  {} ({}) - {}", item.name, item.kind, item.status);
    }

    println!("Today's production:");
    if summary.production_today.is_empty() {
        println!("  No production recorded today");
    }
    for prod in &summary.production_today {
        println!(
            "  {}: {:.2}/{:.2} {}",
            prod.product_name, prod.actual_qty, prod.planned_qty, prod.unit
        );
    }
}

pub fn print_driver(summary: &DriverSummary) {
    println!("{}", RULE);
    match &summary.profile {
        Some(profile) => {
            println!("{} #{}", profile.full_name_ar, profile.employee_number);
            println!("{} - {}", profile.position_title_ar, profile.department_name);
            println!("Base salary: {:.0} {}", profile.base_salary, profile.currency);
        }
        None => println!("No profile on file"),
    }
    println!("{}", RULE);

    println!("Recent payments:");
    if summary.recent_payments.is_empty() {
        println!("  No payments yet");
    }
    for payment in &summary.recent_payments {
        println!(
            "  {:02}/{}: {:.0} ({})",
            payment.month, payment.year, payment.net_salary, payment.status
        );
    }
    println!("Total paid: {:.0} | Pending: {}", summary.total_paid, summary.pending_payments);

    match &summary.vehicle {
        Some(vehicle) => println!(
            "Vehicle: {} {} {} [{}] - {}",
            vehicle.vehicle_number, vehicle.make, vehicle.model, vehicle.license_plate, vehicle.status
        ),
        None => println!("Vehicle: none assigned"),
    }
}

pub fn print_guard(summary: &GuardSummary) {
    println!("{}", RULE);
    if let Some(profile) = &summary.profile {
        println!("{} - {}", profile.full_name_ar, profile.position_title_ar);
    }
    println!(
        "Attendance today: {}/{} ({}%)",
        summary.attendance.present_today,
        summary.attendance.records_today,
        summary.attendance.rate_today
    );
    println!("{}", RULE);

    if summary.records.is_empty() {
        println!("No attendance records");
    }
    for record in &summary.records {
        println!("  {} {} - {}", record.date, record.employee_name, record.status);
    }
}

pub fn print_manager(summary: &ManagerSummary) {
    println!("{}", RULE);
    println!("Active projects:   {}", summary.active_project_count);
    println!(
        "Active equipment:  {}/{}",
        summary.active_equipment, summary.equipment_total
    );
    println!("Active employees:  {}", summary.active_employees);
    println!("Total production:  {:.2}", summary.total_production);
    println!("{}", RULE);

    if summary.active_projects.is_empty() {
        println!("No projects in progress");
    }
    for project in &summary.active_projects {
        println!("  {} {:.0}%", project.name_ar, project.completion_percentage);
    }
}

pub fn print_accountant(summary: &AccountantSummary) {
    let stdout = io::stdout();
    if let Err(e) = write_accountant(&mut stdout.lock(), summary) {
        tracing::debug!("Failed to write accountant summary: {}", e);
    }
}

pub fn write_accountant<W: Write>(out: &mut W, summary: &AccountantSummary) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Expenses:     {:.2}", summary.total_expenses)?;
    writeln!(out, "Invoices:     {:.2}", summary.total_invoices)?;
    writeln!(out, "Investments:  {:.2}", summary.total_investments)?;
    writeln!(out, "Net:          {:.2}", summary.net())?;
    writeln!(out, "{}", RULE)?;

    writeln!(out, "Recent expenses:")?;
    if summary.recent_expenses.is_empty() {
        writeln!(out, "  No expenses recorded")?;
    }
    for expense in &summary.recent_expenses {
        writeln!(
            out,
            "  {} - {:.2} ({})",
            expense.description, expense.amount, expense.category
        )?;
    }

    writeln!(out, "Recent invoices:")?;
    if summary.recent_invoices.is_empty() {
        writeln!(out, "  No invoices issued")?;
    }
    for invoice in &summary.recent_invoices {
        writeln!(
            out,
            "  {} {} - {:.2}",
            invoice.invoice_number, invoice.customer_name, invoice.amount
        )?;
    }
    Ok(())
}

pub fn print_import_report(report: &ImportReport, locale: Locale) {
    match locale {
        Locale::Ar => println!("✓ تم استيراد {} سجل بنجاح", report.imported_count),
        Locale::En => println!("✓ Imported {} record(s)", report.imported_count),
    }

    if report.has_warnings() {
        match locale {
            Locale::Ar => println!(
                "⚠ تحذير: حدثت {} أخطاء أثناء الاستيراد",
                report.errors.len()
            ),
            Locale::En => println!(
                "⚠ Warning: {} row(s) failed during import",
                report.errors.len()
            ),
        }
        for err in &report.errors {
            println!("  - {}", err);
        }
    }
}
