use serde::{Deserialize, Serialize};

use crate::dashboards::DashboardKind;
use crate::error::Error;

pub const DEFAULT_BADGE_COLOR: &str = "bg-gray-100 text-gray-800 border-gray-300";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Owner,
    Manager,
    Accountant,
    Foreman,
    Driver,
    Guard,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Superadmin,
        Role::Owner,
        Role::Manager,
        Role::Accountant,
        Role::Foreman,
        Role::Driver,
        Role::Guard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Owner => "owner",
            Role::Manager => "manager",
            Role::Accountant => "accountant",
            Role::Foreman => "foreman",
            Role::Driver => "driver",
            Role::Guard => "guard",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Superadmin => "مسؤول النظام",
            Role::Owner => "المالك",
            Role::Manager => "مدير",
            Role::Accountant => "محاسب",
            Role::Foreman => "مشرف",
            Role::Driver => "سائق",
            Role::Guard => "حارس",
        }
    }

    pub fn badge_color(&self) -> &'static str {
        match self {
            Role::Superadmin => "bg-purple-100 text-purple-800 border-purple-300",
            Role::Owner => "bg-blue-100 text-blue-800 border-blue-300",
            Role::Manager => "bg-green-100 text-green-800 border-green-300",
            Role::Accountant => "bg-yellow-100 text-yellow-800 border-yellow-300",
            Role::Foreman => "bg-orange-100 text-orange-800 border-orange-300",
            Role::Driver => DEFAULT_BADGE_COLOR,
            Role::Guard => "bg-indigo-100 text-indigo-800 border-indigo-300",
        }
    }

    /// The dashboard a user with this role lands on.
    pub fn dashboard(&self) -> DashboardKind {
        match self {
            Role::Superadmin | Role::Owner | Role::Manager => DashboardKind::Manager,
            Role::Accountant => DashboardKind::Accountant,
            Role::Foreman => DashboardKind::Foreman,
            Role::Driver => DashboardKind::Driver,
            Role::Guard => DashboardKind::Guard,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "superadmin" => Ok(Role::Superadmin),
            "owner" => Ok(Role::Owner),
            "manager" => Ok(Role::Manager),
            "accountant" => Ok(Role::Accountant),
            "foreman" => Ok(Role::Foreman),
            "driver" => Ok(Role::Driver),
            "guard" => Ok(Role::Guard),
            _ => Err(Error::Validation(format!("Invalid role: {}", s))),
        }
    }
}

/// Badge color for a raw role string; unknown roles get the neutral badge.
pub fn badge_color_for(role: &str) -> &'static str {
    role.parse::<Role>()
        .map(|r| r.badge_color())
        .unwrap_or(DEFAULT_BADGE_COLOR)
}
