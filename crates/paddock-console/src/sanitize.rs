//! Form value sanitizers.
//!
//! These run before values are interpolated into SQL templates. They are
//! convenience validation for form input, nothing more — the execution
//! endpoint itself accepts arbitrary SQL, so they cannot be relied on as an
//! injection barrier.

/// Trims the value and doubles every single-quote character, the standard
/// SQL way of embedding a quote inside a quoted literal.
pub fn escape_sql_string(value: &str) -> String {
    value.trim().replace('\'', "''")
}

/// Validates a shorthand identifier of the form lowercase-letters-then-digits
/// (`horse12`). Input is case-folded first, so `HORSE1` validates as
/// `horse1`. When `required_prefix` is given, the letter part must equal it
/// exactly.
///
/// Returns `None` for anything else — empty input, letters without digits,
/// digits without letters, embedded punctuation, or a prefix mismatch.
pub fn validate_identifier(raw: &str, required_prefix: Option<&str>) -> Option<String> {
    let folded = raw.trim().to_ascii_lowercase();

    let digits_at = folded.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = folded.split_at(digits_at);

    if letters.is_empty()
        || !letters.chars().all(|c| c.is_ascii_lowercase())
        || !digits.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    if let Some(prefix) = required_prefix {
        if letters != prefix {
            return None;
        }
    }

    Some(folded)
}

/// Converts a raw form value to a finite number.
///
/// Empty input and anything that does not parse to a finite `f64` yield
/// `None`; callers must check explicitly before using the value.
pub fn to_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
