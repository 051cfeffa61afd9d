//! The Employee form's `employee_name` default, seeded from the User side.

use shared::protocol::{Employee, User};

use crate::{employees::EmployeeField, entity::FormSchema};

/// Recomputes one form field's reset default from the loaded records.
pub trait FieldSeed<E: FormSchema>: Send + Sync {
    fn field(&self) -> E::Field;

    fn resolve(&self, records: &[E]) -> String;
}

/// A candidate name carried across one User → Employee navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    pub employee_name: String,
}

impl Handoff {
    pub fn new(employee_name: impl Into<String>) -> Self {
        Self {
            employee_name: employee_name.into(),
        }
    }
}

fn taken(name: &str, employees: &[Employee]) -> bool {
    employees
        .iter()
        .any(|employee| employee.employee_name.trim() == name)
}

/// Handoff candidate first, then the most recently created user, skipping
/// any name already held by a loaded employee.
pub fn resolve_employee_name(
    candidate: Option<&str>,
    last_user: Option<&User>,
    employees: &[Employee],
) -> String {
    if let Some(candidate) = candidate.map(str::trim).filter(|name| !name.is_empty()) {
        if !taken(candidate, employees) {
            return candidate.to_string();
        }
    }

    match last_user {
        Some(user) => {
            let name = user.full_name();
            let name = name.trim();
            if taken(name, employees) {
                String::new()
            } else {
                name.to_string()
            }
        }
        None => String::new(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeNameSeed {
    candidate: Option<String>,
    last_user: Option<User>,
}

impl EmployeeNameSeed {
    pub fn new(handoff: Option<Handoff>, last_user: Option<User>) -> Self {
        Self {
            candidate: handoff.map(|handoff| handoff.employee_name),
            last_user,
        }
    }
}

impl FieldSeed<Employee> for EmployeeNameSeed {
    fn field(&self) -> EmployeeField {
        EmployeeField::EmployeeName
    }

    fn resolve(&self, records: &[Employee]) -> String {
        resolve_employee_name(self.candidate.as_deref(), self.last_user.as_ref(), records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{Department, District, EmployeeRecordId, Gender, Profile, Region, UserId};

    fn employee(name: &str) -> Employee {
        Employee {
            id: EmployeeRecordId(1),
            employee_name: name.to_string(),
            employee_id: "1000".to_string(),
            department: Department::Hr,
            profile: Profile::Manager,
        }
    }

    fn user(firstname: &str, lastname: &str) -> User {
        User {
            id: UserId(9),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            gender: Gender::Female,
            phone: "9876543210".to_string(),
            address_line1: "12 Hill Road".to_string(),
            address_line2: None,
            pin: "400001".to_string(),
            district: District::Mumbai,
            state: Region::Maharashtra,
        }
    }

    #[test]
    fn fresh_handoff_wins() {
        assert_eq!(resolve_employee_name(Some("Asha Rao"), None, &[]), "Asha Rao");
        assert_eq!(
            resolve_employee_name(Some("  Asha Rao "), Some(&user("Ravi", "Shah")), &[]),
            "Asha Rao"
        );
    }

    #[test]
    fn taken_handoff_falls_back_to_last_user() {
        let employees = [employee("Asha Rao")];
        assert_eq!(resolve_employee_name(Some("Asha Rao"), None, &employees), "");
        assert_eq!(
            resolve_employee_name(Some("Asha Rao"), Some(&user("Ravi", "Shah")), &employees),
            "Ravi Shah"
        );
    }

    #[test]
    fn taken_last_user_yields_empty() {
        let employees = [employee(" Ravi Shah ")];
        assert_eq!(
            resolve_employee_name(Some("   "), Some(&user("Ravi", "Shah")), &employees),
            ""
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        let employees = [employee("asha rao")];
        assert_eq!(resolve_employee_name(Some("Asha Rao"), None, &employees), "Asha Rao");
    }

    #[test]
    fn seed_re_resolves_against_new_records() {
        let seed = EmployeeNameSeed::new(Some(Handoff::new("Asha Rao")), None);
        assert_eq!(seed.field(), EmployeeField::EmployeeName);
        assert_eq!(seed.resolve(&[]), "Asha Rao");
        assert_eq!(seed.resolve(&[employee("Asha Rao")]), "");
    }
}
