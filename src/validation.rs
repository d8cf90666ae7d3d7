//! Input validation helpers shared by the auth and task handlers.
//!
//! These are deliberately small predicates rather than a derive-based
//! validation layer: the password policy is a conjunction of independent
//! character-class checks, and the email rule requires a dot in the domain
//! part, neither of which a single derive attribute expresses well.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // local@domain.tld: no whitespace, exactly one '@', a '.' in the domain.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref HAS_LETTER: Regex = Regex::new(r"[A-Za-z]").unwrap();
    static ref HAS_DIGIT: Regex = Regex::new(r"\d").unwrap();
    static ref HAS_SPECIAL: Regex = Regex::new(r"[@$!%*#?&]").unwrap();
}

/// Password policy: at least 8 characters, with at least one letter, one
/// digit, and one of `@$!%*#?&`.
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= 8
        && HAS_LETTER.is_match(password)
        && HAS_DIGIT.is_match(password)
        && HAS_SPECIAL.is_match(password)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// A task title is acceptable when it is non-empty after trimming.
pub fn is_valid_task_title(title: &str) -> bool {
    !title.trim().is_empty()
}

/// Parses a calendar date in the wire format `YYYY-MM-DD`.
pub fn parse_due_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}
