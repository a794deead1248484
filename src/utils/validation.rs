use std::borrow::Cow;

use chrono_tz::Tz;
use validator::ValidationError;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// E.164: a `+` followed by 8 to 15 digits, no leading zero.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let Some(digits) = value.strip_prefix('+') else {
        return Err(error("phone", "Enter a valid phone number."));
    };
    let valid = (8..=15).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0');
    if valid {
        Ok(())
    } else {
        Err(error("phone", "Enter a valid phone number."))
    }
}

/// Accepts names from the IANA time zone database, e.g. `Europe/Berlin`.
pub fn validate_timezone(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Tz>()
        .map(|_| ())
        .map_err(|_| error("timezone", "Enter a valid time zone."))
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "This field may not be blank."))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_numbers() {
        assert!(validate_phone("+14155552671").is_ok());
        assert!(validate_phone("14155552671").is_err());
        assert!(validate_phone("+0123456789").is_err());
        assert!(validate_phone("+12ab").is_err());
    }

    #[test]
    fn timezones() {
        assert!(validate_timezone("UTC").is_ok());
        assert!(validate_timezone("Europe/Berlin").is_ok());
        assert!(validate_timezone("America/Argentina/Buenos_Aires").is_ok());
        assert!(validate_timezone("Mars").is_err());
        assert!(validate_timezone("europe/berlin").is_err());
        assert!(validate_timezone("Europe/").is_err());
        assert!(validate_timezone("Mars/Olympus_Mons").is_err());
    }
}
