//! Rows of the backend collections the dashboards read.
//!
//! Every field is defaulted. A field may be missing or sent as `null`; either
//! way a number counts as zero in the aggregates.

use serde::{Deserialize, Deserializer, Serialize};

/// Read `null` as the field's default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Equipment {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Production {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub date: String,
    #[serde(deserialize_with = "nullable")]
    pub product_name: String,
    #[serde(deserialize_with = "nullable")]
    pub actual_qty: f64,
    #[serde(deserialize_with = "nullable")]
    pub planned_qty: f64,
    #[serde(deserialize_with = "nullable")]
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attendance {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub employee_name: String,
    #[serde(deserialize_with = "nullable")]
    pub date: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub hours_worked: f64,
    #[serde(deserialize_with = "nullable")]
    pub overtime_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Employee {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub employee_number: String,
    #[serde(deserialize_with = "nullable")]
    pub full_name_ar: String,
    #[serde(deserialize_with = "nullable")]
    pub position_title_ar: String,
    #[serde(deserialize_with = "nullable")]
    pub department_name: String,
    #[serde(deserialize_with = "nullable")]
    pub employment_status: String,
    #[serde(deserialize_with = "nullable")]
    pub base_salary: f64,
    #[serde(deserialize_with = "nullable")]
    pub currency: String,
    pub phone: Option<String>,
    pub hire_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryPayment {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub month: u32,
    #[serde(deserialize_with = "nullable")]
    pub year: i32,
    #[serde(deserialize_with = "nullable")]
    pub base_salary: f64,
    #[serde(deserialize_with = "nullable")]
    pub bonuses: f64,
    #[serde(deserialize_with = "nullable")]
    pub deductions: f64,
    #[serde(deserialize_with = "nullable")]
    pub net_salary: f64,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vehicle {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub vehicle_number: String,
    #[serde(deserialize_with = "nullable")]
    pub vehicle_type: String,
    #[serde(deserialize_with = "nullable")]
    pub make: String,
    #[serde(deserialize_with = "nullable")]
    pub model: String,
    #[serde(deserialize_with = "nullable")]
    pub license_plate: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    pub next_maintenance_date: Option<String>,
    pub last_location_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name_ar: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub completion_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expense {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub date: String,
    #[serde(deserialize_with = "nullable")]
    pub category: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub invoice_number: String,
    #[serde(deserialize_with = "nullable")]
    pub customer_name: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Investment {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub amount: f64,
}
