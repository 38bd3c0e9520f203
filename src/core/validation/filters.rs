//! Input normalisation applied before validation and submission

/// Trim surrounding whitespace
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Key used to compare emails: trimmed and lowercased
pub fn email_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Parse a number typed into an hours field; blank or invalid input is `None`
pub fn parse_hours(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}
