use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::error::FieldError;

/// E.164-like: optional `+`, then 2 to 15 ASCII digits with no leading zero.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]{1,14}$").expect("phone pattern compiles"));

// Unicode mode is off so case folding cannot map e.g. U+212A onto `k`.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^[a-z0-9_'+\-.]*[a-z0-9_+\-]@(?:[a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .case_insensitive(true)
        .unicode(false)
        .build()
        .expect("email pattern compiles")
});

/// A single-field constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    /// At least `n` characters
    MinLength(usize),
    Phone,
    Email,
    /// Free text, always accepted
    Any,
}

impl FieldRule {
    pub fn check(&self, value: &str) -> Result<(), FieldError> {
        match self {
            FieldRule::MinLength(min_len) => {
                if value.chars().count() < *min_len {
                    Err(FieldError::Required { min_len: *min_len })
                } else {
                    Ok(())
                }
            }
            FieldRule::Phone => {
                if is_phone_number(value) {
                    Ok(())
                } else {
                    Err(FieldError::Invalid("phone".to_string()))
                }
            }
            FieldRule::Email => {
                if is_email_address(value) {
                    Ok(())
                } else {
                    Err(FieldError::Invalid("email".to_string()))
                }
            }
            FieldRule::Any => Ok(()),
        }
    }
}

pub fn is_phone_number(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

pub fn is_email_address(value: &str) -> bool {
    // the regex crate has no lookahead, so dot placement is checked here
    !value.starts_with('.') && !value.contains("..") && EMAIL_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_length_boundary() {
        let rule = FieldRule::MinLength(3);
        assert_eq!(rule.check("Al"), Err(FieldError::Required { min_len: 3 }));
        assert_eq!(rule.check(""), Err(FieldError::Required { min_len: 3 }));
        assert!(rule.check("Ali").is_ok());
        // counts characters, not bytes
        assert!(rule.check("Zoë").is_ok());
        assert!(rule.check("Jé").is_err());
    }

    #[test]
    fn test_phone_numbers() {
        assert!(is_phone_number("+15551234567"));
        assert!(is_phone_number("15551234567"));
        assert!(is_phone_number("12"));
        assert!(is_phone_number("+123456789012345"));

        assert!(!is_phone_number("0123456789"));
        assert!(!is_phone_number("notaphone"));
        assert!(!is_phone_number("1"));
        assert!(!is_phone_number("+1234567890123456"));
        assert!(!is_phone_number("+1 555 123 4567"));
        assert!(!is_phone_number(""));

        // only ASCII digits count
        assert!(!is_phone_number("+1\u{0662}\u{0663}\u{0664}"));
        assert!(!is_phone_number("1\u{FF15}\u{FF15}\u{FF15}"));
        assert_eq!(
            FieldRule::Phone.check("+1\u{0662}\u{0663}\u{0664}\u{0665}\u{0666}"),
            Err(FieldError::Invalid("phone".to_string()))
        );
    }

    #[test]
    fn test_phone_rule_error_kind() {
        assert_eq!(
            FieldRule::Phone.check("notaphone"),
            Err(FieldError::Invalid("phone".to_string()))
        );
    }

    #[test]
    fn test_email_addresses() {
        assert!(is_email_address("a@b.com"));
        assert!(is_email_address("first.last+tag@sub.example.co"));
        assert!(is_email_address("O'Brien@Example.ORG"));

        assert!(!is_email_address("a@b"));
        assert!(!is_email_address("a.b.com"));
        assert!(!is_email_address("@b.com"));
        assert!(!is_email_address(".a@b.com"));
        assert!(!is_email_address("a..b@b.com"));
        assert!(!is_email_address("a.@b.com"));
        assert!(!is_email_address("a@-b.com"));
        assert!(!is_email_address("a@b.c"));
        assert!(!is_email_address(""));

        // no Unicode case folding onto ASCII letters
        assert!(!is_email_address("a@b.co\u{212A}"));
        assert!(!is_email_address("\u{017F}am@b.com"));
        assert!(!is_email_address("a@b\u{00E9}.com"));
    }

    #[test]
    fn test_any_accepts_everything() {
        assert!(FieldRule::Any.check("").is_ok());
        assert!(FieldRule::Any.check("anything at all").is_ok());
    }
}
