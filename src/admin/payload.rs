use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::WizardError;
use crate::wizard::validation::parse_date;
use crate::wizard::{Field, ValidationError};

use super::state::{parse_branch_ids, AdminState};

/// Sent when the department was never chosen.
pub const UNSPECIFIED_DEPARTMENT: &str = "Unspecified";

/// Body of `POST /administrators`. The password confirmation never leaves the
/// wizard.
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Numeric administrator type code.
    pub admin_type: u8,
    pub department: String,
    pub hire_date: NaiveDate,
    /// Overseen branches plus the home branch, as strings.
    pub assigned_branches: Vec<String>,
    pub password: String,
}

impl std::fmt::Debug for AdminPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminPayload")
            .field("email", &self.email)
            .field("admin_type", &self.admin_type)
            .field("department", &self.department)
            .field("assigned_branches", &self.assigned_branches)
            .finish_non_exhaustive()
    }
}

pub fn build_admin_payload(state: &AdminState) -> Result<AdminPayload, WizardError> {
    let email = state.email.trim();
    if email.is_empty() {
        return Err(WizardError::MissingIdentifier("email"));
    }
    let role = state
        .role
        .ok_or_else(|| ValidationError::single(Field::AdminType, "Administrator type is required"))?;
    let branch_id = home_branch(&state.branch_id)?;
    let hire_date = parse_date(&state.hire_date)
        .map_err(|message| ValidationError::single(Field::HireDate, message))?;

    let mut branches = if role.oversees_branches() {
        parse_branch_ids(&state.assigned_branches)
            .map_err(|message| ValidationError::single(Field::AssignedBranches, message))?
    } else {
        Vec::new()
    };
    if !branches.contains(&branch_id) {
        branches.push(branch_id);
    }

    let (first_name, last_name) = split_full_name(&state.full_name);
    let department = state.department.trim();

    Ok(AdminPayload {
        first_name,
        last_name,
        email: email.to_string(),
        phone: wire_phone(&state.phone),
        admin_type: role.code(),
        department: if department.is_empty() {
            UNSPECIFIED_DEPARTMENT.to_string()
        } else {
            department.to_string()
        },
        hire_date,
        assigned_branches: branches.iter().map(u32::to_string).collect(),
        password: state.password.clone(),
    })
}

/// First word is the first name, the rest the last name. A single word fills
/// both.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut words = full_name.split_whitespace();
    let first = words.next().unwrap_or_default().to_string();
    let rest = words.collect::<Vec<_>>().join(" ");
    if rest.is_empty() {
        (first.clone(), first)
    } else {
        (first, rest)
    }
}

/// Drops spaces, dashes and parentheses; a leading `+` is kept.
fn wire_phone(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(ch, '-' | '(' | ')'))
        .collect()
}

fn home_branch(raw: &str) -> Result<u32, WizardError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WizardError::MissingBranch);
    }
    match trimmed.parse::<u32>() {
        Ok(0) => Err(WizardError::MissingBranch),
        Ok(id) => Ok(id),
        Err(_) => Err(ValidationError::single(Field::BranchId, "Enter the numeric branch ID").into()),
    }
}
