//! Parsing of human-relative time labels.
//!
//! Activity feeds label each item with a relative age such as `"5 minutes ago"`
//! or `"1 day, 5 hours ago"`. This module turns those labels into a signed
//! [`chrono::Duration`] without any knowledge of the current wall clock: the
//! caller compares the result against its own recency threshold.

use chrono::Duration;

use crate::error::TimeParseError;

const WEEK_SECS: f64 = 7.0 * 24.0 * 3600.0;

/// Average-length calendar units expressed in seconds.
///
/// Years and months are approximated the way the feed itself rounds them
/// (52.25 and 4.34524 weeks respectively); the coarse units only matter for
/// items that are far outside any reasonable recency window anyway.
fn unit_secs(unit: &str) -> Option<f64> {
    match unit {
        "year" => Some(52.25 * WEEK_SECS),
        "month" => Some(4.34524 * WEEK_SECS),
        "week" => Some(WEEK_SECS),
        "day" => Some(24.0 * 3600.0),
        "hour" => Some(3600.0),
        "minute" => Some(60.0),
        _ => None,
    }
}

/// Parses a relative time label such as `"1 day, 5 hours ago"` into a
/// duration offset from "now".
///
/// The input is split on commas; each component is stripped of a trailing
/// `ago`, surrounding whitespace and a plural `s`, then read as
/// `<integer> <unit>`. The component durations are summed and the total is
/// negated, because relative-past labels always describe elapsed time.
///
/// # Errors
///
/// * [`TimeParseError::Malformed`] when a component's count is not an integer.
/// * [`TimeParseError::UnknownUnit`] when a component is empty, has no unit
///   word, or names a unit outside the known table.
///
/// # Examples
///
/// ```
/// let age = parse_relative("5 minutes ago").unwrap();
/// assert_eq!(age.num_seconds(), -300);
/// ```
pub fn parse_relative(text: &str) -> Result<Duration, TimeParseError> {
    let mut total_secs = 0.0;

    for component in text.split(',') {
        let cleaned = component.replace("ago", "");
        let cleaned = cleaned.trim().trim_end_matches('s');

        let mut words = cleaned.split_whitespace();
        let (count, unit) = match (words.next(), words.next(), words.next()) {
            (Some(count), Some(unit), None) => (count, unit),
            _ => {
                return Err(TimeParseError::UnknownUnit {
                    unit: cleaned.to_owned(),
                });
            }
        };

        let count: i64 = count.parse().map_err(|_| TimeParseError::Malformed {
            input: component.trim().to_owned(),
        })?;
        let secs = unit_secs(unit).ok_or_else(|| TimeParseError::UnknownUnit {
            unit: unit.to_owned(),
        })?;

        total_secs += count as f64 * secs;
    }

    Ok(Duration::milliseconds(-(total_secs * 1000.0).round() as i64))
}
