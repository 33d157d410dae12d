use std::io;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{ResourceCategory, normalize_category};

/// Decoration and column-title rows at the top of every import sheet.
pub const HEADER_ROWS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub category: ResourceCategory,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub semester: i32,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

/// A data row that neither opened a subject nor attached a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based position among the sheet's non-blank records, header rows included.
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedImport {
    pub subjects: Vec<SubjectRecord>,
    pub skipped_rows: usize,
    pub skipped: Vec<SkippedRow>,
}

impl ParsedImport {
    fn skip(&mut self, row: usize, reason: String) {
        debug!("row {}: {}, dropped", row, reason);
        self.skipped_rows += 1;
        self.skipped.push(SkippedRow { row, reason });
    }
}

/// Reads an import sheet and groups its rows into subjects.
///
/// Blank lines are ignored, the first [`HEADER_ROWS`] records are discarded, and
/// every remaining record is read positionally as
/// `[semester, code, name, category, url]`.
pub fn parse_csv<R: io::Read>(reader: R) -> Result<ParsedImport, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    Ok(group_rows(rows.into_iter().skip(HEADER_ROWS)))
}

/// Single forward pass over data rows with one open-subject slot.
///
/// A row with semester, code and name opens a new subject (closing the previous
/// one) and may carry a first resource. A row with those three empty but a
/// category and url attaches a resource to the open subject. Anything else is
/// dropped, as are resource rows seen while no subject is open.
pub fn group_rows<I>(rows: I) -> ParsedImport
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut parsed = ParsedImport::default();
    let mut current: Option<SubjectRecord> = None;

    for (index, row) in rows.into_iter().enumerate() {
        let row_number = index + HEADER_ROWS + 1;
        let [semester, code, name, category, url] = columns(&row);

        let opens_subject = !semester.is_empty() && !code.is_empty() && !name.is_empty();
        let continuation = semester.is_empty() && code.is_empty() && name.is_empty();
        let has_resource = !category.is_empty() && !url.is_empty();

        if opens_subject {
            if let Some(done) = current.take() {
                parsed.subjects.push(done);
            }

            let Some(semester) = parse_semester(semester) else {
                parsed.skip(
                    row_number,
                    format!(
                        "semester {:?} of {} ({}) is not a positive whole number",
                        semester, name, code
                    ),
                );
                continue;
            };

            let mut subject = SubjectRecord {
                semester,
                code: code.to_string(),
                name: name.to_string(),
                resources: Vec::new(),
            };
            if has_resource {
                subject.resources.push(entry(category, url));
            }
            current = Some(subject);
        } else if continuation && has_resource {
            match current.as_mut() {
                Some(subject) => subject.resources.push(entry(category, url)),
                None => parsed.skip(
                    row_number,
                    format!("{} resource has no subject above it", category),
                ),
            }
        } else {
            parsed.skip(
                row_number,
                "row needs semester, code and name, or category and URL alone".to_string(),
            );
        }
    }

    if let Some(done) = current {
        parsed.subjects.push(done);
    }

    parsed
}

fn columns(row: &[String]) -> [&str; 5] {
    let cell = |idx: usize| row.get(idx).map(|c| c.trim()).unwrap_or("");
    [cell(0), cell(1), cell(2), cell(3), cell(4)]
}

fn entry(category: &str, url: &str) -> ResourceEntry {
    ResourceEntry {
        category: normalize_category(Some(category)),
        url: url.to_string(),
    }
}

// Spreadsheets export whole numbers as "3" or "3.0". Semesters start at 1.
fn parse_semester(raw: &str) -> Option<i32> {
    let n = match raw.parse::<i32>() {
        Ok(n) => n,
        Err(_) => {
            let f = raw.parse::<f64>().ok()?;
            if f.fract() != 0.0 || f < 1.0 || f > i32::MAX as f64 {
                return None;
            }
            f as i32
        }
    };
    (n >= 1).then_some(n)
}
