//! Input sanitizers applied before any query is built.

use crate::config::{DEFAULT_ADDRESS_LIMIT, MAX_ADDRESS_LIMIT};
use crate::service::ServiceError;

/// Strip everything outside `A-Z` and keep the first two characters.
/// Fewer than two surviving characters is an error.
pub fn sanitize_country_code(input: &str) -> Result<String, ServiceError> {
    let code: String = input
        .chars()
        .filter(char::is_ascii_uppercase)
        .take(2)
        .collect();
    if code.len() < 2 {
        return Err(ServiceError::InvalidCountryCode);
    }
    Ok(code)
}

/// Strip non-digits and parse. Absent, unparseable, zero or above
/// `MAX_ADDRESS_LIMIT` all fall back to the default. Never an error:
/// defaulting is the designed behavior.
pub fn sanitize_limit(input: Option<&str>) -> u32 {
    let digits: String = input
        .unwrap_or("")
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    match digits.parse::<u32>() {
        Ok(n) if n >= 1 && n <= MAX_ADDRESS_LIMIT => n,
        _ => DEFAULT_ADDRESS_LIMIT,
    }
}

/// Guard used by the service layer on already-sanitized codes.
pub fn validate_country_length(code: &str) -> Result<(), ServiceError> {
    if code.len() < 2 {
        return Err(ServiceError::InvalidCountryCode);
    }
    Ok(())
}
