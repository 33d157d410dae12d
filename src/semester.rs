use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Curriculum variant a semester's subjects belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemesterKind {
    Old,
    New,
    Regular,
}

impl SemesterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemesterKind::Old => "old",
            SemesterKind::New => "new",
            SemesterKind::Regular => "regular",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "old" => Some(SemesterKind::Old),
            "new" => Some(SemesterKind::New),
            "regular" => Some(SemesterKind::Regular),
            _ => None,
        }
    }

    /// Label shown next to the semester number. `new` is the NEP curriculum.
    fn label(&self) -> Option<&'static str> {
        match self {
            SemesterKind::Old => Some("OLD"),
            SemesterKind::New => Some("NEP"),
            SemesterKind::Regular => None,
        }
    }
}

impl fmt::Display for SemesterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemesterInfo {
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: SemesterKind,
    pub display_name: String,
    pub slug: String,
}

impl SemesterInfo {
    pub fn new(number: u32, kind: SemesterKind) -> Self {
        Self {
            number,
            kind,
            display_name: display_name(number, kind),
            slug: create_semester_slug(number, kind),
        }
    }
}

fn variant_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^semester-(\d+)-(old|new)$").expect("valid regex"))
}

fn regular_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^semester-(\d+)$").expect("valid regex"))
}

pub fn display_name(number: u32, kind: SemesterKind) -> String {
    match kind.label() {
        Some(label) => format!("Semester {} ({})", number, label),
        None => format!("Semester {}", number),
    }
}

/// Maps a URL segment such as `semester-3-old` or `semester-5` to its semester.
/// Patterns are tried in order; anything else yields `None`.
pub fn parse_semester_slug(slug: &str) -> Option<SemesterInfo> {
    let (number, kind) = if let Some(caps) = variant_pattern().captures(slug) {
        (caps[1].to_string(), SemesterKind::parse(&caps[2])?)
    } else if let Some(caps) = regular_pattern().captures(slug) {
        (caps[1].to_string(), SemesterKind::Regular)
    } else {
        return None;
    };

    // digit runs too long for u32 are not a semester
    let number = number.parse::<u32>().ok()?;

    Some(SemesterInfo {
        number,
        kind,
        display_name: display_name(number, kind),
        slug: slug.to_string(),
    })
}

pub fn create_semester_slug(number: u32, kind: SemesterKind) -> String {
    match kind {
        SemesterKind::Regular => format!("semester-{}", number),
        other => format!("semester-{}-{}", number, other),
    }
}

/// Semesters the department currently publishes material for.
pub fn available_semesters() -> Vec<SemesterInfo> {
    let mut semesters = Vec::new();
    for number in 1..=3 {
        semesters.push(SemesterInfo::new(number, SemesterKind::Old));
        semesters.push(SemesterInfo::new(number, SemesterKind::New));
    }
    for number in 4..=6 {
        semesters.push(SemesterInfo::new(number, SemesterKind::Regular));
    }
    semesters
}
