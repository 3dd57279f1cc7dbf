use shtg_types::{ShtgError, ShtgResult};
use std::time::Duration;

fn invalid(input: &str, reason: impl Into<String>) -> ShtgError {
    ShtgError::InvalidDuration {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn unit_seconds(unit: char) -> Option<f64> {
    match unit {
        's' => Some(1.0),
        'm' => Some(60.0),
        'h' => Some(60.0 * 60.0),
        'd' => Some(24.0 * 60.0 * 60.0),
        'w' => Some(7.0 * 24.0 * 60.0 * 60.0),
        _ => None,
    }
}

/// Parse a human-readable duration.
///
/// Supports sequences of `<number><unit>` such as "90s", "12h", "1h30m",
/// "1.5d" or "2w". A lone "0" is accepted.
pub fn parse_duration(input: &str) -> ShtgResult<Duration> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid(input, "duration cannot be empty"));
    }
    if trimmed == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_seconds = 0f64;
    let mut current_num = String::new();

    for c in trimmed.chars() {
        match c {
            '0'..='9' | '.' => current_num.push(c),
            _ => {
                let Some(scale) = unit_seconds(c.to_ascii_lowercase()) else {
                    return Err(invalid(input, format!("unknown unit '{c}'")));
                };
                if current_num.is_empty() {
                    return Err(invalid(input, format!("missing number before '{c}'")));
                }
                let value: f64 = current_num
                    .parse()
                    .map_err(|_| invalid(input, format!("invalid number '{current_num}'")))?;
                total_seconds += value * scale;
                current_num.clear();
            }
        }
    }

    if !current_num.is_empty() {
        return Err(invalid(
            input,
            format!("missing unit after '{current_num}', expected one of s, m, h, d, w"),
        ));
    }
    Duration::try_from_secs_f64(total_seconds).map_err(|e| invalid(input, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("12h").unwrap(), Duration::from_secs(12 * 3600));
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("1.5d").unwrap(), Duration::from_secs(129600));
        assert_eq!(parse_duration("2w").unwrap(), Duration::from_secs(1209600));
        assert_eq!(parse_duration(" 5M ").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration_errors() {
        for input in ["", "  ", "12", "h", "12x", "-1h", "1..5h", "1h30"] {
            assert!(
                matches!(parse_duration(input), Err(ShtgError::InvalidDuration { .. })),
                "{input:?} should be rejected"
            );
        }
    }
}
