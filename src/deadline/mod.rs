//! Calendar deadline detection in generated answers.
//!
//! Answers are scanned for the first date in one of four written forms. A date that lies in
//! the future becomes a [`DeadlineInfo`] the client can offer to add to a calendar.

use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::store::SourceDescriptor;

/// Characters of the answer copied into the calendar description.
const DESCRIPTION_CHARS: usize = 200;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const MONTH_ALTERNATION: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(\d{{1,2}})\s+({MONTH_ALTERNATION})\s+(\d{{4}})"))
        .expect("day-month-year pattern is valid")
});

static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)({MONTH_ALTERNATION})\s+(\d{{1,2}}),?\s+(\d{{4}})"))
        .expect("month-day-year pattern is valid")
});

static NUMERIC_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})[-/](\d{1,2})[-/](\d{4})").expect("numeric d-m-y pattern is valid")
});

static NUMERIC_YMD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})[-/](\d{1,2})[-/](\d{1,2})").expect("numeric y-m-d pattern is valid")
});

/// Calendar-ready deadline found in an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineInfo {
    pub can_add_to_calendar: bool,
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub title: String,
    pub description: String,
    pub context: String,
    pub source_document: String,
}

/// Extracts a deadline relative to the current UTC date.
pub fn extract_deadline(answer: &str, sources: &[SourceDescriptor]) -> Option<DeadlineInfo> {
    extract_deadline_info(answer, sources, Utc::now().date_naive())
}

/// Extracts the first future date in `answer`.
///
/// Patterns are tried in order and only the first match of each is considered. A pattern
/// whose match is not a valid calendar date, or not strictly after `today`, falls through to
/// the next pattern.
pub fn extract_deadline_info(
    answer: &str,
    sources: &[SourceDescriptor],
    today: NaiveDate,
) -> Option<DeadlineInfo> {
    let clean = answer.replace("**", "");

    let parsers: [(&Regex, fn(&Captures<'_>) -> Option<NaiveDate>); 4] = [
        (&DAY_MONTH_YEAR, |c| date_from(&c[3], month_index(&c[2])?, &c[1])),
        (&MONTH_DAY_YEAR, |c| date_from(&c[3], month_index(&c[1])?, &c[2])),
        (&NUMERIC_DMY, |c| date_from(&c[3], c[2].parse().ok()?, &c[1])),
        (&NUMERIC_YMD, |c| date_from(&c[1], c[2].parse().ok()?, &c[3])),
    ];

    let date = parsers.iter().find_map(|(re, parse)| {
        re.captures(&clean)
            .and_then(|c| parse(&c))
            .filter(|d| *d > today)
    })?;

    Some(DeadlineInfo {
        can_add_to_calendar: true,
        date: date.format("%Y-%m-%d").to_string(),
        title: "Deadline".to_string(),
        description: answer.chars().take(DESCRIPTION_CHARS).collect(),
        context: answer.to_string(),
        source_document: sources
            .first()
            .map(|s| s.document_id.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
    })
}

fn month_index(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}

fn date_from(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}
