//! Resource/action grants held by an authenticated session.
//!
//! Everything here is deny-by-default: a resource missing from a
//! [`PermissionSet`] grants nothing. Unknown names coming from the backend are
//! rejected when the set is built, so a typo in a grant table shows up as an
//! error instead of silently hiding a menu entry.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::roles::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Companies,
    Users,
    Equipment,
    Production,
    Expenses,
    Invoices,
    Attendance,
    CostingCenters,
    Dashboard,
    Reports,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Companies => "companies",
            Resource::Users => "users",
            Resource::Equipment => "equipment",
            Resource::Production => "production",
            Resource::Expenses => "expenses",
            Resource::Invoices => "invoices",
            Resource::Attendance => "attendance",
            Resource::CostingCenters => "costing_centers",
            Resource::Dashboard => "dashboard",
            Resource::Reports => "reports",
        }
    }
}

impl std::str::FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "companies" => Ok(Resource::Companies),
            "users" => Ok(Resource::Users),
            "equipment" => Ok(Resource::Equipment),
            "production" => Ok(Resource::Production),
            "expenses" => Ok(Resource::Expenses),
            "invoices" => Ok(Resource::Invoices),
            "attendance" => Ok(Resource::Attendance),
            "costing_centers" => Ok(Resource::CostingCenters),
            "dashboard" => Ok(Resource::Dashboard),
            "reports" => Ok(Resource::Reports),
            _ => Err(Error::Permission(format!("unknown resource '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Export,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Export => "export",
        }
    }
}

impl std::str::FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "export" => Ok(Action::Export),
            _ => Err(Error::Permission(format!("unknown action '{}'", s))),
        }
    }
}

/// Permission map as the backend sends it: resource name to action names.
pub type WirePermissions = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    grants: HashMap<Resource, BTreeSet<Action>>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_grants<I, A>(grants: I) -> Self
    where
        I: IntoIterator<Item = (Resource, A)>,
        A: IntoIterator<Item = Action>,
    {
        let mut set = Self::new();
        for (resource, actions) in grants {
            set.grants.entry(resource).or_default().extend(actions);
        }
        set
    }

    /// Validate a backend permission map.
    pub fn from_wire(wire: &WirePermissions) -> Result<Self> {
        let mut set = Self::new();
        for (resource, actions) in wire {
            let resource: Resource = resource.parse()?;
            let entry = set.grants.entry(resource).or_default();
            for action in actions {
                let action: Action = action.parse().map_err(|_| {
                    Error::Permission(format!(
                        "unknown action '{}' on resource '{}'",
                        action,
                        resource.as_str()
                    ))
                })?;
                entry.insert(action);
            }
        }
        Ok(set)
    }

    /// Default grants per role, used when the profile carries no explicit map.
    pub fn for_role(role: Role) -> Self {
        use Action::*;
        use Resource::*;

        const CRUD: [Action; 4] = [Create, Read, Update, Delete];

        match role {
            Role::Superadmin => Self::from_grants([
                (Companies, CRUD.to_vec()),
                (Users, CRUD.to_vec()),
                (Equipment, CRUD.to_vec()),
                (Production, CRUD.to_vec()),
                (Expenses, CRUD.to_vec()),
                (Invoices, CRUD.to_vec()),
                (Attendance, CRUD.to_vec()),
                (CostingCenters, CRUD.to_vec()),
                (Dashboard, vec![Read]),
                (Reports, vec![Read, Export]),
            ]),
            Role::Owner => Self::from_grants([
                (Users, CRUD.to_vec()),
                (Equipment, CRUD.to_vec()),
                (Production, CRUD.to_vec()),
                (Expenses, CRUD.to_vec()),
                (Invoices, CRUD.to_vec()),
                (Attendance, CRUD.to_vec()),
                (CostingCenters, CRUD.to_vec()),
                (Dashboard, vec![Read]),
                (Reports, vec![Read, Export]),
            ]),
            Role::Manager => Self::from_grants([
                (Users, vec![Read]),
                (Equipment, vec![Create, Read, Update]),
                (Production, vec![Create, Read, Update]),
                (Expenses, vec![Read]),
                (Invoices, vec![Read]),
                (Attendance, vec![Create, Read, Update]),
                (CostingCenters, vec![Read]),
                (Dashboard, vec![Read]),
                (Reports, vec![Read, Export]),
            ]),
            Role::Accountant => Self::from_grants([
                (Users, vec![Read]),
                (Production, vec![Read]),
                (Expenses, CRUD.to_vec()),
                (Invoices, CRUD.to_vec()),
                (Attendance, vec![Create, Read]),
                (CostingCenters, vec![Read]),
                (Dashboard, vec![Read]),
                (Reports, vec![Read, Export]),
            ]),
            Role::Foreman => Self::from_grants([
                (Users, vec![Read]),
                (Equipment, vec![Read, Update]),
                (Production, vec![Create, Read, Update]),
                (Expenses, vec![Read]),
                (Invoices, vec![Read]),
                (Attendance, vec![Create, Read, Update]),
                (CostingCenters, vec![Read]),
                (Dashboard, vec![Read]),
                (Reports, vec![Read]),
            ]),
            Role::Driver => Self::from_grants([
                (Equipment, vec![Read]),
                (Production, vec![Read]),
                (Attendance, vec![Create, Read]),
                (Dashboard, vec![Read]),
            ]),
            Role::Guard => Self::from_grants([(Attendance, vec![Create, Read])]),
        }
    }

    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        self.grants
            .get(&resource)
            .map(|actions| actions.contains(&action))
            .unwrap_or(false)
    }

    /// String-keyed check. Unknown names are simply not granted.
    pub fn allows_str(&self, resource: &str, action: &str) -> bool {
        match (resource.parse::<Resource>(), action.parse::<Action>()) {
            (Ok(resource), Ok(action)) => self.allows(resource, action),
            _ => false,
        }
    }

    pub fn actions(&self, resource: Resource) -> Vec<Action> {
        self.grants
            .get(&resource)
            .map(|actions| actions.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.values().all(|actions| actions.is_empty())
    }

    pub fn to_wire(&self) -> WirePermissions {
        self.grants
            .iter()
            .map(|(resource, actions)| {
                (
                    resource.as_str().to_string(),
                    actions.iter().map(|a| a.as_str().to_string()).collect(),
                )
            })
            .collect()
    }
}

/// True iff `permissions` exists and grants `action` on `resource`.
pub fn has_permission(permissions: Option<&PermissionSet>, resource: Resource, action: Action) -> bool {
    permissions
        .map(|set| set.allows(resource, action))
        .unwrap_or(false)
}
