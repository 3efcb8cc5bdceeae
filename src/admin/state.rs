use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::wizard::{Field, FormState};

/// Back-office administrator types, each with the numeric code the backend
/// stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    Cashier,
    AdministrativeSecretary,
    CreditAgent,
    BranchManager,
    RegionalDirector,
    SystemAdministrator,
    GeneralManagement,
    AccountingFinance,
}

impl AdminRole {
    pub const ALL: [AdminRole; 8] = [
        AdminRole::Cashier,
        AdminRole::AdministrativeSecretary,
        AdminRole::CreditAgent,
        AdminRole::BranchManager,
        AdminRole::RegionalDirector,
        AdminRole::SystemAdministrator,
        AdminRole::GeneralManagement,
        AdminRole::AccountingFinance,
    ];

    pub fn code(&self) -> u8 {
        match self {
            AdminRole::Cashier => 0,
            AdminRole::AdministrativeSecretary => 1,
            AdminRole::CreditAgent => 2,
            AdminRole::BranchManager => 3,
            AdminRole::RegionalDirector => 4,
            AdminRole::SystemAdministrator => 5,
            AdminRole::GeneralManagement => 6,
            AdminRole::AccountingFinance => 7,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdminRole::Cashier => "Cashier",
            AdminRole::AdministrativeSecretary => "Administrative secretary",
            AdminRole::CreditAgent => "Credit agent",
            AdminRole::BranchManager => "Branch manager",
            AdminRole::RegionalDirector => "Regional director",
            AdminRole::SystemAdministrator => "System administrator",
            AdminRole::GeneralManagement => "General management",
            AdminRole::AccountingFinance => "Accounting & finance",
        }
    }

    /// Only regional directors oversee a list of branches.
    pub fn oversees_branches(&self) -> bool {
        *self == AdminRole::RegionalDirector
    }

    pub fn options() -> Vec<String> {
        Self::ALL.iter().map(|role| role.label().to_string()).collect()
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AdminRole {
    type Err = String;

    /// Accepts labels, SCREAMING_SNAKE names, and numeric codes.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .to_lowercase()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect();
        if let Ok(code) = normalized.parse::<u8>() {
            if let Some(role) = Self::ALL.iter().find(|role| role.code() == code) {
                return Ok(*role);
            }
        }
        Self::ALL
            .iter()
            .find(|role| {
                let label: String = role
                    .label()
                    .to_lowercase()
                    .chars()
                    .filter(|ch| ch.is_ascii_alphanumeric())
                    .collect();
                label == normalized
            })
            .copied()
            .ok_or_else(|| {
                format!(
                    "Administrator type must be one of: {}",
                    AdminRole::options().join(", ")
                )
            })
    }
}

/// Departments an administrator can be attached to.
pub const DEPARTMENTS: [&str; 9] = [
    "General management",
    "Operations",
    "Finance & accounting",
    "Human resources",
    "Technology",
    "Marketing",
    "Customer service",
    "Audit & compliance",
    "Credit & collections",
];

/// Everything the administrator wizard collects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminState {
    pub role: Option<AdminRole>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub branch_id: String,
    pub hire_date: String,
    pub assigned_branches: String,
    pub password: String,
    pub password_confirmation: String,
}

impl AdminState {
    pub fn oversees_branches(&self) -> bool {
        self.role.is_some_and(|role| role.oversees_branches())
    }

    /// Leaving the regional director role drops the branch list.
    fn set_role(&mut self, role: AdminRole) {
        if !role.oversees_branches() {
            self.assigned_branches.clear();
        }
        self.role = Some(role);
    }

    fn text_slot(&mut self, field: Field) -> Result<&mut String, String> {
        Ok(match field {
            Field::FullName => &mut self.full_name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Department => &mut self.department,
            Field::BranchId => &mut self.branch_id,
            Field::HireDate => &mut self.hire_date,
            Field::AssignedBranches => &mut self.assigned_branches,
            Field::Password => &mut self.password,
            Field::PasswordConfirmation => &mut self.password_confirmation,
            other => {
                return Err(format!(
                    "{} is not part of the administrator form",
                    other.label()
                ))
            }
        })
    }
}

impl FormState for AdminState {
    fn raw(&self, field: Field) -> Option<String> {
        let value = match field {
            Field::AdminType => return self.role.map(|role| role.label().to_string()),
            Field::FullName => &self.full_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Department => &self.department,
            Field::BranchId => &self.branch_id,
            Field::HireDate => &self.hire_date,
            Field::AssignedBranches => &self.assigned_branches,
            Field::Password | Field::PasswordConfirmation => {
                let secret = if field == Field::Password {
                    &self.password
                } else {
                    &self.password_confirmation
                };
                return (!secret.is_empty()).then(|| secret.clone());
            }
            _ => return None,
        };
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn assign(&mut self, field: Field, raw: &str) -> Result<(), String> {
        match field {
            Field::AdminType => self.set_role(raw.parse()?),
            secret if secret.is_secret() => *self.text_slot(secret)? = raw.to_string(),
            other => *self.text_slot(other)? = raw.trim().to_string(),
        }
        Ok(())
    }
}

/// Parses a comma-separated branch list, rejecting zero and duplicates.
pub fn parse_branch_ids(input: &str) -> Result<Vec<u32>, String> {
    let mut ids = Vec::new();
    for part in input.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let id = part
            .parse::<u32>()
            .map_err(|_| format!("'{}' is not a branch ID", part))?;
        if id == 0 {
            return Err("Branch IDs start at 1".into());
        }
        if ids.contains(&id) {
            return Err(format!("Branch #{} is listed twice", id));
        }
        ids.push(id);
    }
    Ok(ids)
}
