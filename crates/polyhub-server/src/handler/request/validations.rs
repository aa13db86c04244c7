//! Request validation utilities.

use validator::ValidationError;

pub fn validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_string().into());
    error
}

/// Rejects names made only of whitespace or containing control characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(validation_error("blank", "Name cannot be blank"));
    }

    if name.chars().any(char::is_control) {
        return Err(validation_error(
            "name_format",
            "Name cannot contain control characters",
        ));
    }

    Ok(())
}

/// Requires at least one letter and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_letter || !has_digit {
        return Err(validation_error(
            "password_strength",
            "Password must contain at least one letter and one digit",
        ));
    }

    Ok(())
}

/// Trims the value and returns `None` when nothing is left.
pub fn normalized_option(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Lowercased and trimmed email address.
pub fn normalized_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_passwords() {
        assert!(validate_name("  ").is_err());
        assert!(validate_name("Acme Polymers").is_ok());
        assert!(validate_password_strength("onlyletters").is_err());
        assert!(validate_password_strength("letters123").is_ok());
    }

    #[test]
    fn normalizes_values() {
        assert_eq!(normalized_option(Some("  ".into())), None);
        assert_eq!(normalized_option(Some(" Acme ".into())), Some("Acme".into()));
        assert_eq!(normalized_email(" Buyer@Example.COM "), "buyer@example.com");
    }
}
