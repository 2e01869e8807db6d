//! Study plan domain model.
//!
//! # Responsibility
//! - Define the canonical persisted plan record and its duration shape.
//! - Turn raw form input into a validated, immutable `StudyPlan`.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `study_topics` is never empty for a constructed or persisted plan.
//! - Duration fields default to zero; bad duration input is never an error.

use crate::clock::Clock;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable plan identifier, epoch milliseconds at creation time.
pub type PlanId = i64;

/// Hours/minutes pair used for per-topic study time.
///
/// Stored components are read leniently: negative numbers clamp to 0,
/// numeric strings go through `parse_duration_field`, and anything else
/// reads as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyDuration {
    #[serde(default, deserialize_with = "lenient_component")]
    pub hours: u32,
    #[serde(default, deserialize_with = "lenient_component")]
    pub minutes: u32,
}

impl StudyDuration {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    /// Returns whether both components are zero.
    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }
}

/// Canonical persisted study plan record.
///
/// Field names are serialized in camelCase to match the stored JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub id: PlanId,
    pub exam_name: String,
    /// Date text as entered (`YYYY-MM-DD` or RFC 3339).
    pub exam_date: String,
    pub study_topics: Vec<String>,
    #[serde(default)]
    pub sub_topics: Vec<String>,
    #[serde(default)]
    pub time_per_topic: StudyDuration,
    #[serde(default)]
    pub time_per_sub_topic: StudyDuration,
}

impl StudyPlan {
    /// Parses `exam_date` into a calendar day.
    ///
    /// Returns `None` for text that is neither `YYYY-MM-DD` nor RFC 3339.
    pub fn exam_day(&self) -> Option<NaiveDate> {
        parse_exam_date(&self.exam_date)
    }

    /// Validates persisted-shape invariants.
    ///
    /// The store runs this on every record it reads back.
    pub fn validate(&self) -> Result<(), PlanValidationError> {
        if self.exam_name.trim().is_empty() {
            return Err(PlanValidationError::EmptyExamName);
        }
        if self.exam_date.trim().is_empty() {
            return Err(PlanValidationError::EmptyExamDate);
        }
        if self.study_topics.is_empty() {
            return Err(PlanValidationError::NoStudyTopics);
        }
        if self
            .study_topics
            .iter()
            .chain(self.sub_topics.iter())
            .any(|topic| topic.trim().is_empty())
        {
            return Err(PlanValidationError::BlankTopic);
        }
        Ok(())
    }
}

/// Raw submission fields, exactly as a form would hand them over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanInput {
    pub exam_name: String,
    pub exam_date: String,
    /// Comma-separated topic list.
    pub study_topics: String,
    /// Comma-separated sub-topic list.
    pub sub_topics: String,
    pub topic_hours: Option<String>,
    pub topic_minutes: Option<String>,
    pub sub_topic_hours: Option<String>,
    pub sub_topic_minutes: Option<String>,
}

/// Validation failures for plan construction and read-back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanValidationError {
    EmptyExamName,
    EmptyExamDate,
    InvalidExamDate(String),
    NoStudyTopics,
    BlankTopic,
}

impl Display for PlanValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyExamName => write!(f, "exam name must not be empty"),
            Self::EmptyExamDate => write!(f, "exam date must not be empty"),
            Self::InvalidExamDate(value) => write!(f, "exam date `{value}` is not a valid date"),
            Self::NoStudyTopics => write!(f, "at least one study topic is required"),
            Self::BlankTopic => write!(f, "topic entries must not be blank"),
        }
    }
}

impl Error for PlanValidationError {}

/// Builds a validated plan from raw input, stamping the id from `clock`.
///
/// # Errors
/// - `EmptyExamName` when the trimmed name is empty.
/// - `EmptyExamDate` when the trimmed date is empty.
/// - `InvalidExamDate` when the date does not parse.
/// - `NoStudyTopics` when no topic survives split/trim/filter.
pub fn create_plan(
    input: &PlanInput,
    clock: &dyn Clock,
) -> Result<StudyPlan, PlanValidationError> {
    let exam_name = input.exam_name.trim();
    let exam_date = input.exam_date.trim();
    let study_topics = split_topics(&input.study_topics);

    if exam_name.is_empty() {
        return Err(PlanValidationError::EmptyExamName);
    }
    if exam_date.is_empty() {
        return Err(PlanValidationError::EmptyExamDate);
    }
    if parse_exam_date(exam_date).is_none() {
        return Err(PlanValidationError::InvalidExamDate(exam_date.to_string()));
    }
    if study_topics.is_empty() {
        return Err(PlanValidationError::NoStudyTopics);
    }

    Ok(StudyPlan {
        id: clock.now().timestamp_millis(),
        exam_name: exam_name.to_string(),
        exam_date: exam_date.to_string(),
        study_topics,
        sub_topics: split_topics(&input.sub_topics),
        time_per_topic: StudyDuration::new(
            parse_duration_field(input.topic_hours.as_deref()),
            parse_duration_field(input.topic_minutes.as_deref()),
        ),
        time_per_sub_topic: StudyDuration::new(
            parse_duration_field(input.sub_topic_hours.as_deref()),
            parse_duration_field(input.sub_topic_minutes.as_deref()),
        ),
    })
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
pub fn split_topics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a duration component leniently.
///
/// Reads an optional sign and the leading digit run after whitespace, so
/// `"1.5"` gives 1 and `"12abc"` gives 12. Absent, non-numeric or negative
/// text gives 0; digit runs past `u32::MAX` saturate.
pub fn parse_duration_field(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if negative || digits_len == 0 {
        return 0;
    }
    rest[..digits_len].parse::<u32>().unwrap_or(u32::MAX)
}

fn lenient_component<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let component = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => {
            if let Some(whole) = number.as_u64() {
                u32::try_from(whole).unwrap_or(u32::MAX)
            } else if let Some(fraction) = number.as_f64() {
                // `as` saturates and maps NaN to 0.
                fraction.max(0.0) as u32
            } else {
                0
            }
        }
        Some(Value::String(text)) => parse_duration_field(Some(&text)),
        _ => 0,
    };
    Ok(component)
}

/// Parses exam date text as `YYYY-MM-DD`, falling back to RFC 3339.
pub fn parse_exam_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::{parse_duration_field, parse_exam_date, split_topics, StudyDuration};
    use chrono::NaiveDate;

    #[test]
    fn split_topics_trims_and_drops_empty_entries() {
        assert_eq!(split_topics("A, B ,, C"), vec!["A", "B", "C"]);
        assert!(split_topics(" , ,").is_empty());
        assert!(split_topics("").is_empty());
    }

    #[test]
    fn parse_duration_field_reads_leading_integer() {
        assert_eq!(parse_duration_field(Some("45")), 45);
        assert_eq!(parse_duration_field(Some(" 7")), 7);
        assert_eq!(parse_duration_field(Some("1.5")), 1);
        assert_eq!(parse_duration_field(Some("12abc")), 12);
        assert_eq!(parse_duration_field(Some("+3")), 3);
    }

    #[test]
    fn parse_duration_field_defaults_to_zero() {
        assert_eq!(parse_duration_field(None), 0);
        assert_eq!(parse_duration_field(Some("")), 0);
        assert_eq!(parse_duration_field(Some("abc")), 0);
        assert_eq!(parse_duration_field(Some("-4")), 0);
    }

    #[test]
    fn parse_duration_field_saturates_long_digit_runs() {
        assert_eq!(parse_duration_field(Some("99999999999")), u32::MAX);
        assert_eq!(parse_duration_field(Some("4294967295")), u32::MAX);
    }

    #[test]
    fn stored_duration_components_are_read_leniently() {
        let read = |raw: &str| serde_json::from_str::<StudyDuration>(raw).unwrap();

        assert_eq!(read(r#"{"hours":-2,"minutes":30}"#), StudyDuration::new(0, 30));
        assert_eq!(read(r#"{"hours":1.9,"minutes":"15"}"#), StudyDuration::new(1, 15));
        assert_eq!(read(r#"{"hours":null}"#), StudyDuration::new(0, 0));
        assert_eq!(
            read(r#"{"hours":99999999999,"minutes":[]}"#),
            StudyDuration::new(u32::MAX, 0)
        );
    }

    #[test]
    fn parse_exam_date_accepts_plain_and_rfc3339() {
        let expected = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
        assert_eq!(parse_exam_date("2099-01-01"), Some(expected));
        assert_eq!(parse_exam_date("2099-01-01T09:30:00Z"), Some(expected));
        assert_eq!(parse_exam_date("next tuesday"), None);
        assert_eq!(parse_exam_date("2099-02-30"), None);
    }
}
