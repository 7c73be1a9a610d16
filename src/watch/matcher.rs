//! Alert pattern predicates and activity matching.

use log::debug;
use regex::Regex;

use crate::config::PatternConfig;
use crate::error::WatchError;
use crate::watch::structs::ParsedActivity;

/// One alert-worthiness predicate over activity text.
///
/// Patterns are independent of each other: an activity is alert-worthy as
/// soon as any single pattern matches. All matching is case-sensitive.
#[derive(Debug, Clone)]
pub enum AlertPattern {
    /// Plain substring match.
    Contains(String),
    /// A substring followed later by another substring in the same text.
    ///
    /// Used for rules like "endorsed ... (transcriber)" where both parts must
    /// appear, in order, but not adjacently.
    Sequence(String, String),
    /// Full regular expression for config-supplied rules.
    Regex(Regex),
}

impl AlertPattern {
    /// Whether the pattern matches the given activity text.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            AlertPattern::Contains(needle) => text.contains(needle),
            AlertPattern::Sequence(first, second) => text
                .find(first)
                .map(|at| text[at + first.len()..].contains(second))
                .unwrap_or(false),
            AlertPattern::Regex(regex) => regex.is_match(text),
        }
    }
}

/// Compiles configured pattern entries into ready predicates.
///
/// # Errors
///
/// [`WatchError::Pattern`] when a `regex` entry does not compile.
pub fn compile_patterns(configs: &[PatternConfig]) -> Result<Vec<AlertPattern>, WatchError> {
    configs
        .iter()
        .map(|config| match config {
            PatternConfig::Contains(needle) => Ok(AlertPattern::Contains(needle.clone())),
            PatternConfig::Sequence(first, second) => {
                Ok(AlertPattern::Sequence(first.clone(), second.clone()))
            }
            PatternConfig::Regex(pattern) => Regex::new(pattern)
                .map(AlertPattern::Regex)
                .map_err(|source| WatchError::Pattern {
                    pattern: pattern.clone(),
                    source,
                }),
        })
        .collect()
}

/// Retains the activities whose text matches at least one pattern.
///
/// Pure and order-preserving; running it twice on its own output changes
/// nothing.
pub fn match_activities(
    activities: Vec<ParsedActivity>,
    patterns: &[AlertPattern],
) -> Vec<ParsedActivity> {
    activities
        .into_iter()
        .filter(|activity| {
            let matched = patterns.iter().any(|pattern| pattern.matches(&activity.text));
            if matched {
                debug!("matched activity: {}", activity);
            }
            matched
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::watch::structs::Team;

    fn activity(text: &str) -> ParsedActivity {
        ParsedActivity {
            team: Team {
                name: "alpha".to_string(),
                path: "/en/teams/alpha/".to_string(),
            },
            feed_url: "https://x/teams/alpha/activity/".to_string(),
            age: Duration::seconds(-60),
            time_label: "1 minute ago".to_string(),
            text: text.to_string(),
        }
    }

    fn default_patterns() -> Vec<AlertPattern> {
        compile_patterns(&PatternConfig::default_set()).unwrap()
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let pattern = AlertPattern::Contains("added a video".to_string());

        assert!(pattern.matches("X added a video to the Y playlist"));
        assert!(!pattern.matches("X Added A Video"));
    }

    #[test]
    fn test_sequence_requires_both_parts_in_order() {
        let pattern =
            AlertPattern::Sequence("endorsed".to_string(), "(transcriber)".to_string());

        assert!(pattern.matches("Z endorsed Q (transcriber)"));
        assert!(pattern.matches("endorsed, later marked (transcriber) done"));
        assert!(!pattern.matches("(transcriber) Q endorsed Z"));
        assert!(!pattern.matches("Z endorsed Q (reviewer)"));
    }

    #[test]
    fn test_regex_pattern() {
        let patterns =
            compile_patterns(&[PatternConfig::Regex("declined .* task".to_string())]).unwrap();

        assert!(patterns[0].matches("A declined the review task"));
        assert!(!patterns[0].matches("A declined"));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let error = compile_patterns(&[PatternConfig::Regex("(unclosed".to_string())]);

        assert!(matches!(error, Err(WatchError::Pattern { .. })));
    }

    #[test]
    fn test_match_activities_keeps_any_match() {
        let activities = vec![
            activity("X added a video to the Y playlist"),
            activity("nothing interesting"),
            activity("B unassigned C from the task"),
            activity("Z endorsed Q (transcriber)"),
        ];

        let matched = match_activities(activities, &default_patterns());

        assert_eq!(matched.len(), 3);
        assert!(matched[0].text.contains("added a video"));
        assert!(matched[1].text.contains("unassigned"));
        assert!(matched[2].text.contains("endorsed"));
    }

    #[test]
    fn test_match_activities_is_idempotent() {
        let activities = vec![
            activity("X added a video"),
            activity("nothing interesting"),
        ];
        let patterns = default_patterns();

        let once = match_activities(activities, &patterns);
        let twice = match_activities(once.clone(), &patterns);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_match_activities_with_empty_pattern_set() {
        let matched = match_activities(vec![activity("X added a video")], &[]);

        assert!(matched.is_empty());
    }
}
