//! Academic entity extraction.
//!
//! Entities are coarse attributes (year, program, semester) found by plain substring matching
//! on the lower-cased question. Each kind holds at most one value and the first rule in
//! priority order wins. Two questions can only share a semantic cache entry when their
//! entity sets are identical.

use serde::{Deserialize, Serialize};

/// Academic year of study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcademicYear {
    #[serde(rename = "FY")]
    First,
    #[serde(rename = "SY")]
    Second,
    #[serde(rename = "TY")]
    Third,
    #[serde(rename = "LY")]
    Final,
}

impl AcademicYear {
    /// Keyword and value pairs in priority order.
    const RULES: [(&'static str, AcademicYear); 4] = [
        ("fy", AcademicYear::First),
        ("sy", AcademicYear::Second),
        ("ty", AcademicYear::Third),
        ("ly", AcademicYear::Final),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AcademicYear::First => "FY",
            AcademicYear::Second => "SY",
            AcademicYear::Third => "TY",
            AcademicYear::Final => "LY",
        }
    }
}

/// Degree program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Program {
    #[serde(rename = "BTech")]
    BTech,
    #[serde(rename = "MTech")]
    MTech,
}

impl Program {
    const RULES: [(&'static str, Program); 2] =
        [("btech", Program::BTech), ("mtech", Program::MTech)];

    pub fn as_str(&self) -> &'static str {
        match self {
            Program::BTech => "BTech",
            Program::MTech => "MTech",
        }
    }
}

/// Entities extracted from a question. Absent kinds are `None` and are omitted when
/// serialized, so an empty set serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<AcademicYear>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<Program>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<u8>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entity kinds present.
    pub fn len(&self) -> usize {
        usize::from(self.year.is_some())
            + usize::from(self.program.is_some())
            + usize::from(self.semester.is_some())
    }
}

const SEMESTERS: [u8; 4] = [1, 2, 3, 4];

/// Extracts year, program and semester from a question.
pub fn extract_entities(question: &str) -> Entities {
    let q = question.to_lowercase();

    let year = AcademicYear::RULES
        .iter()
        .find(|(kw, _)| q.contains(kw))
        .map(|(_, year)| *year);

    let program = Program::RULES
        .iter()
        .find(|(kw, _)| q.contains(kw))
        .map(|(_, program)| *program);

    let semester = SEMESTERS.into_iter().find(|n| {
        q.contains(&format!("sem {n}")) || q.contains(&format!("semester {n}"))
    });

    Entities {
        year,
        program,
        semester,
    }
}

/// Strict equality of entity sets, including both being empty.
#[inline]
pub fn entities_match(a: &Entities, b: &Entities) -> bool {
    a == b
}
