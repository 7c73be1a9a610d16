//! Data structures flowing through the watch pipeline.

use std::fmt;

use chrono::Duration;

/// A team-scoped activity feed discovered during bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Team name, unique within a run.
    pub name: String,
    /// Site-relative path of the team page, as found in the navigation menu.
    pub path: String,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "name={}, path={}", self.name, self.path)
    }
}

/// One activity line item as extracted from a feed document.
///
/// Items appear in feed order, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawActivityItem {
    /// The relative time label, e.g. `"5 minutes ago"`.
    pub time_label: String,
    /// Free-text body of the activity line.
    pub text: String,
}

/// An activity item combined with its parsed age.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedActivity {
    /// Team whose feed produced this activity.
    pub team: Team,
    /// Full URL of the feed the activity came from.
    pub feed_url: String,
    /// Age relative to the fetch, negative because it lies in the past.
    ///
    /// Within one feed the magnitude never decreases from one item to the
    /// next; the recency filter relies on this to stop early.
    pub age: Duration,
    /// The original relative time label.
    pub time_label: String,
    /// Free-text body of the activity line.
    pub text: String,
}

impl fmt::Display for ParsedActivity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "team={}, age={}s, text={:?}",
            self.team.name,
            self.age.num_seconds(),
            self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_display() {
        let team = Team {
            name: "alpha".to_string(),
            path: "/en/teams/alpha/".to_string(),
        };

        assert_eq!(format!("{}", team), "name=alpha, path=/en/teams/alpha/");
    }

    #[test]
    fn test_parsed_activity_display() {
        let activity = ParsedActivity {
            team: Team {
                name: "alpha".to_string(),
                path: "/en/teams/alpha/".to_string(),
            },
            feed_url: "https://example.com/en/teams/alpha/activity/".to_string(),
            age: Duration::seconds(-300),
            time_label: "5 minutes ago".to_string(),
            text: "X added a video".to_string(),
        };

        let display = format!("{}", activity);
        assert!(display.contains("team=alpha"));
        assert!(display.contains("age=-300s"));
        assert!(display.contains("X added a video"));
    }
}
