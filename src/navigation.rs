use serde::Serialize;

use crate::permissions::{has_permission, Action, PermissionSet, Resource};
use crate::roles::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
    pub resource: Resource,
    pub action: Action,
    pub admin_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardWidget {
    pub id: &'static str,
    pub title: &'static str,
    pub resource: Resource,
    pub action: Action,
}

pub const NAV_ITEMS: [NavItem; 7] = [
    NavItem {
        name: "لوحة التحكم",
        path: "/dashboard",
        icon: "📊",
        resource: Resource::Dashboard,
        action: Action::Read,
        admin_only: false,
    },
    NavItem {
        name: "المعدات",
        path: "/equipment",
        icon: "🚜",
        resource: Resource::Equipment,
        action: Action::Read,
        admin_only: false,
    },
    NavItem {
        name: "الإنتاج",
        path: "/production",
        icon: "📈",
        resource: Resource::Production,
        action: Action::Read,
        admin_only: false,
    },
    NavItem {
        name: "المصروفات",
        path: "/expenses",
        icon: "💰",
        resource: Resource::Expenses,
        action: Action::Read,
        admin_only: false,
    },
    NavItem {
        name: "الفواتير",
        path: "/invoices",
        icon: "📄",
        resource: Resource::Invoices,
        action: Action::Read,
        admin_only: false,
    },
    NavItem {
        name: "الحضور",
        path: "/attendance",
        icon: "👥",
        resource: Resource::Attendance,
        action: Action::Read,
        admin_only: false,
    },
    NavItem {
        name: "المستخدمون",
        path: "/users",
        icon: "👤",
        resource: Resource::Users,
        action: Action::Read,
        admin_only: true,
    },
];

pub const DASHBOARD_WIDGETS: [DashboardWidget; 5] = [
    DashboardWidget {
        id: "production",
        title: "الإنتاج",
        resource: Resource::Production,
        action: Action::Read,
    },
    DashboardWidget {
        id: "equipment",
        title: "المعدات",
        resource: Resource::Equipment,
        action: Action::Read,
    },
    DashboardWidget {
        id: "expenses",
        title: "المصروفات",
        resource: Resource::Expenses,
        action: Action::Read,
    },
    DashboardWidget {
        id: "invoices",
        title: "الفواتير",
        resource: Resource::Invoices,
        action: Action::Read,
    },
    DashboardWidget {
        id: "attendance",
        title: "الحضور",
        resource: Resource::Attendance,
        action: Action::Read,
    },
];

// `role` is accepted so callers do not need to change if a role-specific
// menu is ever introduced; visibility currently depends on permissions alone.
pub fn nav_items_for_role(_role: Role, permissions: Option<&PermissionSet>) -> Vec<NavItem> {
    NAV_ITEMS
        .iter()
        .filter(|item| has_permission(permissions, item.resource, item.action))
        .copied()
        .collect()
}

pub fn dashboard_widgets_for_role(
    _role: Role,
    permissions: Option<&PermissionSet>,
) -> Vec<DashboardWidget> {
    DASHBOARD_WIDGETS
        .iter()
        .filter(|widget| has_permission(permissions, widget.resource, widget.action))
        .copied()
        .collect()
}
