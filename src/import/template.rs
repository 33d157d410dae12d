pub const TEMPLATE_FILE_NAME: &str = "subject_template.csv";

const EXAMPLE_URL: &str = "https://example.com";

/// Continuation rows listed under the example subject, one per category.
const EXAMPLE_CATEGORIES: [&str; 8] = [
    "Assignments",
    "Lab Manual",
    "Question Papers",
    "Reference Materials",
    "Notes",
    "Presentations",
    "Resources",
    "name(Other)",
];

/// Skeleton import sheet: two header rows, then one example subject.
pub fn template_csv() -> String {
    let mut out = String::new();
    out.push_str("Subject,,,Material,,\n");
    out.push_str("Semester,Sub_Code,Subject_Name,Category,URL\n");
    out.push_str(&format!("1,DI0100001,Example Subject,Syllabus,{}\n", EXAMPLE_URL));
    for category in EXAMPLE_CATEGORIES {
        out.push_str(&format!(",,,{},{}\n", category, EXAMPLE_URL));
    }
    out
}
