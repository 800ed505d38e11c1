//! Heuristic quality scoring of itinerary text
//!
//! Scoring starts at 100 and deducts a fixed penalty per failed check:
//!
//! | Check                                   | Penalty |
//! |-----------------------------------------|---------|
//! | fewer than 500 characters               | 20      |
//! | destination not mentioned (any case)    | 15      |
//! | fewer day markers than trip days        | 25      |
//! | no currency symbol                      | 10      |
//!
//! A report with a score of at least 70 is valid. A low score is a warning
//! carried as data, never an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::TravelPreferences;

pub const MIN_LENGTH: usize = 500;
pub const VALID_THRESHOLD: u8 = 70;

const SHORT_PENALTY: i32 = 20;
const DESTINATION_PENALTY: i32 = 15;
const DAYS_PENALTY: i32 = 25;
const BUDGET_PENALTY: i32 = 10;

pub const ISSUE_TOO_SHORT: &str = "Itinerary is too short";
pub const ISSUE_DESTINATION_MISSING: &str = "Itinerary does not mention the destination";
pub const ISSUE_MISSING_DAYS: &str = "Itinerary is missing days";
pub const ISSUE_NO_BUDGET: &str = "Itinerary has no budget information";

const CURRENCY_SYMBOLS: [char; 3] = ['€', '$', '£'];

/// "Day 3", "Days 2", "Day 10" ...
static DAY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bDays?\s+\d+").expect("day marker regex is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    /// 0 to 100
    pub score: u8,
    /// One message per applied deduction, in check order
    pub issues: Vec<String>,
    pub is_valid: bool,
}

impl QualityReport {
    /// Informational warning for reports below the validity threshold
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        (!self.is_valid).then(|| {
            format!(
                "Quality score {} is below {}: {}",
                self.score,
                VALID_THRESHOLD,
                self.issues.join("; ")
            )
        })
    }
}

pub struct QualityValidator;

impl QualityValidator {
    /// Score `text` against the preferences it was written for
    #[must_use]
    pub fn score(text: &str, preferences: &TravelPreferences) -> QualityReport {
        let mut score: i32 = 100;
        let mut issues = Vec::new();
        let mut deduct = |applies: bool, penalty: i32, issue: &str| {
            if applies {
                score -= penalty;
                issues.push(issue.to_string());
            }
        };

        deduct(
            text.chars().count() < MIN_LENGTH,
            SHORT_PENALTY,
            ISSUE_TOO_SHORT,
        );
        deduct(
            !mentions(text, preferences.destination()),
            DESTINATION_PENALTY,
            ISSUE_DESTINATION_MISSING,
        );
        deduct(
            count_day_markers(text) < preferences.duration_days() as usize,
            DAYS_PENALTY,
            ISSUE_MISSING_DAYS,
        );
        deduct(!has_currency(text), BUDGET_PENALTY, ISSUE_NO_BUDGET);

        let score = u8::try_from(score.clamp(0, 100)).unwrap_or(0);
        QualityReport {
            score,
            issues,
            is_valid: score >= VALID_THRESHOLD,
        }
    }
}

/// Number of day markers ("Day N" / "Days N") in `text`
#[must_use]
pub fn count_day_markers(text: &str) -> usize {
    DAY_MARKER.find_iter(text).count()
}

fn has_currency(text: &str) -> bool {
    text.contains(CURRENCY_SYMBOLS)
}

fn mentions(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(&needle.to_lowercase())
}

/// Descriptive statistics of an itinerary, reported alongside the score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentAnalysis {
    pub char_count: usize,
    pub word_count: usize,
    pub day_markers: usize,
    /// Stated interests that appear in the text
    pub interests_mentioned: Vec<String>,
    pub destination_mentioned: bool,
    pub budget_info_present: bool,
}

impl ContentAnalysis {
    #[must_use]
    pub fn of(text: &str, preferences: &TravelPreferences) -> Self {
        Self {
            char_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
            day_markers: count_day_markers(text),
            interests_mentioned: preferences
                .interests()
                .iter()
                .filter(|interest| mentions(text, interest))
                .cloned()
                .collect(),
            destination_mentioned: mentions(text, preferences.destination()),
            budget_info_present: has_currency(text) || mentions(text, "euro"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn prefs(days: u32) -> TravelPreferences {
        TravelPreferences::new("Madrid", days, 900.0)
            .unwrap()
            .with_interests(["Culture", "Nightlife"])
    }

    fn complete_text(days: u32) -> String {
        let mut text = String::from("# Trip to madrid\n\n");
        for day in 1..=days {
            text.push_str(&format!(
                "### Day {day}\nMorning walk, museum visit and lunch. Budget: €100\n\n"
            ));
        }
        while text.chars().count() < MIN_LENGTH {
            text.push_str("Enjoy the local culture and food. ");
        }
        text
    }

    #[test]
    fn test_complete_itinerary_scores_full_marks() {
        let report = QualityValidator::score(&complete_text(3), &prefs(3));
        assert_eq!(report.score, 100);
        assert!(report.issues.is_empty());
        assert!(report.is_valid);
        assert_eq!(report.warning(), None);
    }

    #[test]
    fn test_short_text_without_days_scores_low() {
        let text = "A 50 character note about Madrid with a € symbol.";
        let report = QualityValidator::score(text, &prefs(5));

        assert_eq!(report.score, 55);
        assert_eq!(
            report.issues,
            vec![ISSUE_TOO_SHORT.to_string(), ISSUE_MISSING_DAYS.to_string()]
        );
        assert!(!report.is_valid);
        assert!(report.warning().is_some());
    }

    #[test]
    fn test_every_deduction_in_check_order() {
        let report = QualityValidator::score("nothing useful", &prefs(2));
        assert_eq!(report.score, 30);
        assert_eq!(
            report.issues,
            vec![
                ISSUE_TOO_SHORT.to_string(),
                ISSUE_DESTINATION_MISSING.to_string(),
                ISSUE_MISSING_DAYS.to_string(),
                ISSUE_NO_BUDGET.to_string(),
            ]
        );
    }

    #[rstest]
    #[case("### Day 1\n### Day 2", 2)]
    #[case("Days 2 to 4 are free", 1)]
    #[case("Day1 and Sunday 3", 0)]
    #[case("day 1", 0)]
    #[case("Day 10, Day 11", 2)]
    fn test_count_day_markers(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(count_day_markers(text), expected);
    }

    #[rstest]
    #[case("€50", true)]
    #[case("$50", true)]
    #[case("£50", true)]
    #[case("50 EUR", false)]
    fn test_currency_detection(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(has_currency(text), expected);
    }

    #[test]
    fn test_score_is_deterministic_and_counts_characters() {
        // 499 multibyte characters are still short
        let text = format!("Madrid Day 1 € {}", "é".repeat(499 - 15));
        let first = QualityValidator::score(&text, &prefs(1));
        assert_eq!(first, QualityValidator::score(&text, &prefs(1)));
        assert_eq!(first.issues, vec![ISSUE_TOO_SHORT.to_string()]);
    }

    #[test]
    fn test_content_analysis() {
        let analysis = ContentAnalysis::of("Day 1 in MADRID: culture all day, 20 euros", &prefs(1));
        assert_eq!(analysis.day_markers, 1);
        assert_eq!(analysis.word_count, 9);
        assert_eq!(analysis.interests_mentioned, vec!["Culture".to_string()]);
        assert!(analysis.destination_mentioned);
        assert!(analysis.budget_info_present);
    }
}
