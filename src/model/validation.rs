use regex::Regex;
use std::sync::OnceLock;

use crate::error::LeagueError;

/// A US-style phone number, stored as digits only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Accepts "555-123-4567", "(555) 123 4567", "5551234567" and similar.
    ///
    /// # Panics
    ///
    /// Will panic if the regex is invalid
    #[must_use]
    pub fn new(input: &str) -> Option<Self> {
        static REGEX: OnceLock<Regex> = OnceLock::new();
        let re = REGEX.get_or_init(|| {
            Regex::new(r"^\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}$")
                .expect("Invalid regex pattern - this is a programming error")
        });

        let trimmed = input.trim();
        if re.is_match(trimmed) {
            Some(PhoneNumber(
                trimmed.chars().filter(char::is_ascii_digit).collect(),
            ))
        } else {
            None
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = LeagueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        PhoneNumber::new(value)
            .ok_or_else(|| LeagueError::Validation(format!("invalid phone number '{value}'")))
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) {}-{}", &self.0[..3], &self.0[3..6], &self.0[6..])
    }
}

/// # Errors
///
/// Will return `Err` if the name is blank or longer than 60 characters
pub fn validate_display_name(name: &str) -> Result<String, LeagueError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LeagueError::Validation("display name is required".to_string()));
    }
    if name.chars().count() > 60 {
        return Err(LeagueError::Validation(
            "display name must be 60 characters or fewer".to_string(),
        ));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_formats() {
        let p = PhoneNumber::try_from("(555) 123-4567").unwrap();
        assert_eq!(p.value(), "5551234567");
        assert_eq!(p.to_string(), "(555) 123-4567");
        assert!(PhoneNumber::new("555.123.4567").is_some());
        assert!(PhoneNumber::new("12345").is_none());
        assert!(PhoneNumber::new("555-123-45678").is_none());
    }

    #[test]
    fn display_names() {
        assert_eq!(validate_display_name("  Ben ").unwrap(), "Ben");
        assert!(validate_display_name("   ").is_err());
    }
}
