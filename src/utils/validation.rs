use crate::errors::AppError;
use validator::{Validate, ValidationError};

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|err| AppError::InvalidArgument(err.to_string()))
}

pub fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    if gender != "Male" && gender != "Female" {
        return Err(ValidationError::new("gender must be either 'Male' or 'Female'"));
    }
    Ok(())
}

/// Local Singapore mobile format: exactly 8 digits, leading 8 or 9.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let valid = phone.len() == 8
        && phone.chars().all(|c| c.is_ascii_digit())
        && matches!(phone.chars().next(), Some('8' | '9'));
    if !valid {
        return Err(ValidationError::new("phone number must be 8 digits starting with 8 or 9"));
    }
    Ok(())
}

/// Minimal shape check: something before the '@', a dot inside the domain
/// with characters on both sides.
pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    let well_formed = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && domain
                .split_once('.')
                .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty())
    });
    if !well_formed {
        return Err(ValidationError::new("email address must contain '@' and a dotted domain"));
    }
    Ok(())
}
