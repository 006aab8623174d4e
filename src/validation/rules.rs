//! Individual field rules. Each returns `Ok(())` or the message to attach to
//! the rejected field. Rules operate on already-trimmed input.

use chrono::DateTime;

pub fn not_empty(value: &str, label: &str) -> Result<(), String> {
    if value.is_empty() {
        Err(format!("{} is required", label))
    } else {
        Ok(())
    }
}

pub fn length_between(value: &str, min: usize, max: usize, label: &str) -> Result<(), String> {
    let len = value.chars().count();
    if len < min || len > max {
        Err(format!("{} must be between {} and {} characters", label, min, max))
    } else {
        Ok(())
    }
}

pub fn max_length(value: &str, max: usize, label: &str) -> Result<(), String> {
    if value.chars().count() > max {
        Err(format!("{} must not exceed {} characters", label, max))
    } else {
        Ok(())
    }
}

pub fn email(value: &str) -> Result<(), String> {
    let invalid = || Err("Please provide a valid email address".to_string());
    if value.is_empty() || value.contains(char::is_whitespace) {
        return invalid();
    }
    let Some((local, domain)) = value.split_once('@') else {
        return invalid();
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return invalid();
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return invalid();
    };
    if host.is_empty() || tld.len() < 2 {
        return invalid();
    }
    Ok(())
}

/// 10-digit mobile number, optionally prefixed with `+91` and one separator.
pub fn indian_mobile(value: &str) -> Result<(), String> {
    let rest = match value.strip_prefix("+91") {
        Some(r) => r.strip_prefix(['-', ' ']).unwrap_or(r),
        None => value,
    };
    if rest.len() == 10 && rest.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err("Please provide a valid 10-digit mobile number (with or without +91)".to_string())
    }
}

pub fn password_min_length(value: &str) -> Result<(), String> {
    if value.chars().count() < 8 {
        Err("Password must be at least 8 characters long".to_string())
    } else {
        Ok(())
    }
}

pub fn password_complexity(value: &str) -> Result<(), String> {
    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if has_lower && has_upper && has_digit {
        Ok(())
    } else {
        Err(
            "Password must contain at least one lowercase letter, one uppercase letter, and one number"
                .to_string(),
        )
    }
}

/// Letters, digits, and underscores only.
pub fn username_charset(value: &str) -> Result<(), String> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err("Username can only contain letters, numbers, and underscores".to_string())
    }
}

pub fn one_of(value: &str, allowed: &[&str], message: &str) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

pub fn int_between(value: i64, min: i64, max: i64, label: &str) -> Result<(), String> {
    if value < min || value > max {
        Err(format!("{} must be between {} and {}", label, min, max))
    } else {
        Ok(())
    }
}

pub fn equals(value: &str, other: &str, message: &str) -> Result<(), String> {
    if value == other {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

pub fn must_be_true(value: bool, message: &str) -> Result<(), String> {
    if value {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

/// Coerce an RFC 3339 timestamp to unix seconds.
pub fn parse_rfc3339(value: &str) -> Result<i64, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp())
        .map_err(|_| "Invalid date format, expected RFC 3339".to_string())
}

/// Strip the `+91` prefix and separators, leaving the bare 10 digits.
pub fn normalize_mobile(value: &str) -> String {
    let trimmed = value.trim();
    let rest = match trimmed.strip_prefix("+91") {
        Some(r) => r.strip_prefix(['-', ' ']).unwrap_or(r),
        None => trimmed,
    };
    rest.chars().filter(|c| !matches!(c, '-' | ' ')).collect()
}

/// Trim and lowercase, the storage form for email addresses.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_ordinary_addresses() {
        assert!(email("asha.verma@example.com").is_ok());
        assert!(email("a@b.co").is_ok());
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for bad in ["", "plain", "@example.com", "user@", "user@nodot", "a b@example.com", "a@b@c.com", "user@.com"] {
            assert!(email(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn mobile_accepts_bare_and_prefixed_numbers() {
        assert!(indian_mobile("9876543210").is_ok());
        assert!(indian_mobile("+919876543210").is_ok());
        assert!(indian_mobile("+91-9876543210").is_ok());
        assert!(indian_mobile("+91 9876543210").is_ok());
    }

    #[test]
    fn mobile_rejects_wrong_lengths_and_characters() {
        assert!(indian_mobile("98765").is_err());
        assert!(indian_mobile("98765432101").is_err());
        assert!(indian_mobile("98765a3210").is_err());
        assert!(indian_mobile("+92 9876543210").is_err());
    }

    #[test]
    fn normalize_mobile_strips_prefix_and_separators() {
        assert_eq!(normalize_mobile("+91-9876543210"), "9876543210");
        assert_eq!(normalize_mobile("+91 9876543210"), "9876543210");
        assert_eq!(normalize_mobile(" 9876543210 "), "9876543210");
    }

    #[test]
    fn password_complexity_requires_all_three_classes() {
        assert!(password_complexity("Passw0rd").is_ok());
        assert!(password_complexity("password1").is_err());
        assert!(password_complexity("PASSWORD1").is_err());
        assert!(password_complexity("Password").is_err());
    }

    #[test]
    fn username_charset_allows_underscores_only() {
        assert!(username_charset("data_entry_01").is_ok());
        assert!(username_charset("bad name").is_err());
        assert!(username_charset("bad-name").is_err());
        assert!(username_charset("").is_err());
    }

    #[test]
    fn length_between_counts_characters_not_bytes() {
        assert!(length_between("नमस्ते", 2, 10, "Name").is_ok());
    }

    #[test]
    fn parse_rfc3339_coerces_to_unix_seconds() {
        assert_eq!(parse_rfc3339("1970-01-01T00:00:10Z").unwrap(), 10);
        assert!(parse_rfc3339("next tuesday").is_err());
    }
}
