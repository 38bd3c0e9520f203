//! Reusable field validators
//!
//! Each validator is a closure taking the field name and the raw input and
//! returning the message to show next to the field on failure.

use regex::Regex;
use std::sync::OnceLock;

/// Basic `local@domain.tld` shape: no whitespace, exactly one `@`, a dot in the domain
fn email_shape() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Validator: text must be non-empty after trimming
pub fn not_blank(
    message: &'static str,
) -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &str| {
        if value.trim().is_empty() {
            Err(message.to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: required email with a plausible shape
pub fn email() -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &str| {
        let value = value.trim();
        if value.is_empty() {
            Err("Email is required".to_string())
        } else if !is_email_shaped(value) {
            Err("Invalid email format".to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: number present and within an inclusive range
pub fn within(
    min: i64,
    max: i64,
    message: &'static str,
) -> impl Fn(&str, Option<i64>) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: Option<i64>| match value {
        Some(n) if (min..=max).contains(&n) => Ok(()),
        _ => Err(message.to_string()),
    }
}

/// Check the email shape without producing a message
pub fn is_email_shaped(value: &str) -> bool {
    email_shape().is_match(value)
}
