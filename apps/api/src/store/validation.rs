use serde::Serialize;

use crate::models::Profile;

/// One rejected profile form field, named the way the client names it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Checks the required fields of the profile form.
///
/// Every blank required field is reported, not just the first one.
pub fn validate_profile(profile: &Profile) -> Result<(), Vec<FieldError>> {
    let required = [
        ("fullName", profile.full_name.as_str(), "Введите полное имя"),
        ("email", profile.email.as_str(), "Введите email"),
        ("position", profile.position.as_str(), "Укажите желаемую должность"),
    ];

    let errors: Vec<FieldError> = required
        .into_iter()
        .filter(|(_, value, _)| value.trim().is_empty())
        .map(|(field, _, message)| FieldError { field, message })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
