use crate::account::steps::check_branch;
use crate::wizard::{Check, Field, FieldKind, FieldRule, PasswordPolicy, StepDefinition};

use super::state::{parse_branch_ids, AdminRole, AdminState, DEPARTMENTS};

const MIN_FULL_NAME: usize = 3;
const DIRECTOR_NEEDS_BRANCH: &str = "Assign at least one branch to a regional director";

/// Identity, assignment, and credentials, in order. `active` lists the branch
/// IDs that may be chosen; empty skips the membership check.
pub fn admin_steps(active: &[u32]) -> Vec<StepDefinition<AdminState>> {
    vec![identity_step(), assignment_step(active), credentials_step()]
}

fn identity_step() -> StepDefinition<AdminState> {
    StepDefinition::new(
        1,
        "Identity",
        vec![
            FieldRule::new(
                Field::AdminType,
                FieldKind::Choice(AdminRole::options()),
                Check::None,
            ),
            FieldRule::new(
                Field::FullName,
                FieldKind::Text,
                Check::custom(|_: &AdminState, input| check_full_name(input)),
            )
            .with_help("First name first; everything after the first word is the last name."),
            FieldRule::new(Field::Email, FieldKind::Text, Check::Email)
                .with_help("Used as the administrator's login identity."),
            FieldRule::new(
                Field::Phone,
                FieldKind::Text,
                Check::custom(|_: &AdminState, input| check_local_phone(input)),
            )
            .with_help("Eight digits, optionally prefixed with 509."),
        ],
    )
}

fn assignment_step(active: &[u32]) -> StepDefinition<AdminState> {
    let primary_active = active.to_vec();
    let listed_active = active.to_vec();
    let departments: Vec<String> = DEPARTMENTS.iter().map(|name| name.to_string()).collect();

    StepDefinition::new(
        2,
        "Assignment",
        vec![
            FieldRule::new(
                Field::Department,
                FieldKind::Choice(departments.clone()),
                Check::OneOf(departments),
            ),
            FieldRule::new(
                Field::BranchId,
                FieldKind::Integer,
                Check::custom(move |_: &AdminState, input| check_branch(input, &primary_active)),
            ),
            FieldRule::new(Field::HireDate, FieldKind::Date, Check::Date).with_help("YYYY-MM-DD"),
            FieldRule::new(
                Field::AssignedBranches,
                FieldKind::Text,
                Check::custom(move |_: &AdminState, input| check_branch_list(input, &listed_active)),
            )
            .with_optional()
            .when(AdminState::oversees_branches)
            .with_help("Comma-separated IDs of the branches this director oversees."),
        ],
    )
    .with_check(|state| {
        (state.oversees_branches() && state.assigned_branches.trim().is_empty()).then(|| {
            (Field::AssignedBranches, DIRECTOR_NEEDS_BRANCH.to_string())
        })
    })
}

fn credentials_step() -> StepDefinition<AdminState> {
    StepDefinition::new(
        3,
        "Credentials",
        vec![
            FieldRule::new(
                Field::Password,
                FieldKind::Secret,
                Check::Password(PasswordPolicy::default()),
            )
            .with_help("At least 8 characters with upper and lower case, a digit, and one of @$!%*?&."),
            FieldRule::new(
                Field::PasswordConfirmation,
                FieldKind::Secret,
                Check::custom(|state: &AdminState, input| {
                    if input == state.password {
                        Ok(())
                    } else {
                        Err("Passwords do not match".into())
                    }
                }),
            ),
        ],
    )
}

fn check_full_name(input: &str) -> Result<(), String> {
    if input.trim().chars().count() < MIN_FULL_NAME {
        Err(format!("Full name must be at least {} characters", MIN_FULL_NAME))
    } else {
        Ok(())
    }
}

/// Local mobile numbers: eight digits, with or without the 509 country code.
/// Spaces, dashes, parentheses and a `+` are ignored.
pub(crate) fn check_local_phone(input: &str) -> Result<(), String> {
    let digits: String = input
        .chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(ch, '-' | '+' | '(' | ')'))
        .collect();
    let valid = digits.chars().all(|ch| ch.is_ascii_digit())
        && (digits.len() == 8 || (digits.len() == 11 && digits.starts_with("509")));
    if valid {
        Ok(())
    } else {
        Err("Phone must be 8 digits, optionally prefixed with 509".into())
    }
}

fn check_branch_list(input: &str, active: &[u32]) -> Result<(), String> {
    let ids = parse_branch_ids(input)?;
    if ids.is_empty() {
        return Err(DIRECTOR_NEEDS_BRANCH.into());
    }
    if let Some(inactive) = ids
        .iter()
        .find(|id| !active.is_empty() && !active.contains(*id))
    {
        return Err(format!("Branch #{} is not an active branch", inactive));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_phone_accepts_country_code_and_punctuation() {
        assert!(check_local_phone("3712-4455").is_ok());
        assert!(check_local_phone("+509 (37) 12 44 55").is_ok());
        assert!(check_local_phone("50937124455").is_ok());
        assert!(check_local_phone("1 212 555 0100").is_err());
        assert!(check_local_phone("3712 445").is_err());
        assert!(check_local_phone("3712-CALL").is_err());
    }

    #[test]
    fn full_name_needs_three_characters() {
        assert!(check_full_name("Ti").is_err());
        assert!(check_full_name("Ana").is_ok());
    }

    #[test]
    fn branch_lists_must_be_active() {
        assert!(check_branch_list("1,2", &[1, 2, 3]).is_ok());
        assert!(check_branch_list("4", &[]).is_ok());
        assert_eq!(check_branch_list(" , ", &[]).unwrap_err(), DIRECTOR_NEEDS_BRANCH);
        assert_eq!(
            check_branch_list("1,4", &[1, 2]).unwrap_err(),
            "Branch #4 is not an active branch"
        );
    }
}
