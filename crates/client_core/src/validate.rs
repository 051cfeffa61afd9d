//! Field predicates and the inline messages built on top of them.

use std::str::FromStr;

pub const PHONE_DIGITS: usize = 10;
pub const PIN_DIGITS: usize = 6;
pub const EMPLOYEE_CODE_DIGITS: usize = 4;

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_phone(phone: &str) -> bool {
    is_digits(phone, PHONE_DIGITS)
}

pub fn validate_pin(pin: &str) -> bool {
    is_digits(pin, PIN_DIGITS)
}

/// Letters and spaces only. Blank-but-nonempty input passes here; the
/// required check trims first.
pub fn validate_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
}

pub fn validate_employee_code(code: &str) -> bool {
    is_digits(code, EMPLOYEE_CODE_DIGITS)
}

pub(crate) fn required(label: &str, value: &str) -> Option<String> {
    value
        .trim()
        .is_empty()
        .then(|| format!("{label} is required!"))
}

pub(crate) fn check_name(label: &str, value: &str) -> Option<String> {
    required(label, value).or_else(|| {
        (!validate_name(value))
            .then(|| format!("{label} should not contain numbers/special characters!"))
    })
}

pub(crate) fn check_phone(label: &str, value: &str) -> Option<String> {
    required(label, value)
        .or_else(|| (!validate_phone(value)).then(|| format!("{label} is invalid!")))
}

pub(crate) fn check_pin(label: &str, value: &str) -> Option<String> {
    required(label, value)
        .or_else(|| (!validate_pin(value)).then(|| format!("{label} is invalid!")))
}

pub(crate) fn check_choice<T: FromStr>(label: &str, value: &str) -> Option<String> {
    required(label, value).or_else(|| {
        value
            .parse::<T>()
            .is_err()
            .then(|| format!("{label} must be one of the listed options!"))
    })
}

/// `taken` yields the codes held by other loaded records.
pub(crate) fn check_employee_code<'a>(
    label: &str,
    value: &str,
    mut taken: impl Iterator<Item = &'a str>,
) -> Option<String> {
    if value.is_empty() {
        return Some(format!("{label} is required!"));
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Some(format!("{label} must contain only digits!"));
    }
    if value.len() != EMPLOYEE_CODE_DIGITS {
        return Some(format!("{label} must be {EMPLOYEE_CODE_DIGITS} digits!"));
    }
    if taken.any(|code| code == value) {
        return Some(format!("{label} must be unique!"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::Gender;

    #[test]
    fn phone_requires_exactly_ten_digits() {
        assert!(validate_phone("9876543210"));
        assert!(validate_phone("0123456789"));
        assert!(!validate_phone("987654321"));
        assert!(!validate_phone("98765432100"));
        assert!(!validate_phone("98765-4321"));
        assert!(!validate_phone(" 987654321"));
        assert!(!validate_phone(""));
        assert!(!validate_phone("٩٨٧٦٥٤٣٢١٠"));
    }

    #[test]
    fn pin_requires_exactly_six_digits() {
        assert!(validate_pin("400001"));
        assert!(!validate_pin("40001"));
        assert!(!validate_pin("4000011"));
        assert!(!validate_pin("40000a"));
    }

    #[test]
    fn name_allows_letters_and_spaces_only() {
        assert!(validate_name("Asha Rao"));
        assert!(validate_name("Mary Jane Watson"));
        assert!(!validate_name(""));
        assert!(!validate_name("R2D2"));
        assert!(!validate_name("O'Brien"));
        assert!(!validate_name("Zoë"));
    }

    #[test]
    fn name_field_trims_before_required_check() {
        assert_eq!(
            check_name("Firstname", "   ").as_deref(),
            Some("Firstname is required!")
        );
        assert_eq!(
            check_name("Firstname", "Asha1").as_deref(),
            Some("Firstname should not contain numbers/special characters!")
        );
        assert_eq!(check_name("Firstname", "Asha"), None);
    }

    #[test]
    fn phone_and_pin_fields_report_required_before_invalid() {
        assert_eq!(
            check_phone("Phone Number", " ").as_deref(),
            Some("Phone Number is required!")
        );
        assert_eq!(
            check_phone("Phone Number", "98765").as_deref(),
            Some("Phone Number is invalid!")
        );
        assert_eq!(check_phone("Phone Number", "9876543210"), None);

        assert_eq!(
            check_pin("Pin Code", "").as_deref(),
            Some("Pin Code is required!")
        );
        assert_eq!(
            check_pin("Pin Code", "4110011").as_deref(),
            Some("Pin Code is invalid!")
        );
        assert_eq!(check_pin("Pin Code", "411001"), None);
    }

    #[test]
    fn choice_must_be_listed() {
        assert_eq!(
            check_choice::<Gender>("Gender", "").as_deref(),
            Some("Gender is required!")
        );
        assert_eq!(
            check_choice::<Gender>("Gender", "Other").as_deref(),
            Some("Gender must be one of the listed options!")
        );
        assert_eq!(check_choice::<Gender>("Gender", "Female"), None);
    }

    #[test]
    fn employee_code_checks_in_order() {
        let none = std::iter::empty::<&str>;
        assert_eq!(
            check_employee_code("Employee Id", "", none()).as_deref(),
            Some("Employee Id is required!")
        );
        assert_eq!(
            check_employee_code("Employee Id", "12a4", none()).as_deref(),
            Some("Employee Id must contain only digits!")
        );
        assert_eq!(
            check_employee_code("Employee Id", "123", none()).as_deref(),
            Some("Employee Id must be 4 digits!")
        );
        assert_eq!(
            check_employee_code("Employee Id", "1234", ["1234"].into_iter()).as_deref(),
            Some("Employee Id must be unique!")
        );
        assert_eq!(
            check_employee_code("Employee Id", "1234", ["4321"].into_iter()),
            None
        );
    }
}
