use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Resource;

/// Fixed set of resource categories every imported label is folded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceCategory {
    Notes,
    Presentations,
    Assignments,
    Syllabus,
    Resources,
    #[serde(rename = "Lab Manual")]
    LabManual,
    #[serde(rename = "Question Papers")]
    QuestionPapers,
    #[serde(rename = "Reference Materials")]
    ReferenceMaterials,
    Other,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 9] = [
        ResourceCategory::Notes,
        ResourceCategory::Presentations,
        ResourceCategory::Assignments,
        ResourceCategory::Syllabus,
        ResourceCategory::Resources,
        ResourceCategory::LabManual,
        ResourceCategory::QuestionPapers,
        ResourceCategory::ReferenceMaterials,
        ResourceCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::Notes => "Notes",
            ResourceCategory::Presentations => "Presentations",
            ResourceCategory::Assignments => "Assignments",
            ResourceCategory::Syllabus => "Syllabus",
            ResourceCategory::Resources => "Resources",
            ResourceCategory::LabManual => "Lab Manual",
            ResourceCategory::QuestionPapers => "Question Papers",
            ResourceCategory::ReferenceMaterials => "Reference Materials",
            ResourceCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Rule = (fn(&str) -> bool, ResourceCategory);

// Evaluated top to bottom, first hit wins. "lab notes" must stay a lab manual.
const RULES: &[Rule] = &[
    (|s: &str| s == "syllabus" || s == "syallabus", ResourceCategory::Syllabus),
    (|s: &str| s.contains("assign"), ResourceCategory::Assignments),
    (|s: &str| s.contains("lab"), ResourceCategory::LabManual),
    (|s: &str| s.contains("previous") || s.contains("paper"), ResourceCategory::QuestionPapers),
    (|s: &str| s.contains("study") || s.contains("material"), ResourceCategory::ReferenceMaterials),
    (|s: &str| s.contains("note"), ResourceCategory::Notes),
    (|s: &str| s.contains("present"), ResourceCategory::Presentations),
    (|s: &str| s.contains("resource"), ResourceCategory::Resources),
];

/// Folds a free-text spreadsheet label into a [`ResourceCategory`].
///
/// Never fails: empty, missing and unrecognised labels all become `Other`.
pub fn normalize_category(input: Option<&str>) -> ResourceCategory {
    let clean = match input {
        Some(raw) => raw.trim().to_lowercase(),
        None => return ResourceCategory::Other,
    };
    if clean.is_empty() {
        return ResourceCategory::Other;
    }

    RULES
        .iter()
        .find(|(matches, _)| matches(clean.as_str()))
        .map(|(_, category)| *category)
        .unwrap_or(ResourceCategory::Other)
}

/// Section headings of the public subject page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MainCategory {
    Curriculum,
    #[serde(rename = "Course Material")]
    CourseMaterial,
    #[serde(rename = "Lab Resources")]
    LabResources,
    #[serde(rename = "Learning Exercises")]
    LearningExercises,
}

impl MainCategory {
    pub const ORDER: [MainCategory; 4] = [
        MainCategory::Curriculum,
        MainCategory::CourseMaterial,
        MainCategory::LabResources,
        MainCategory::LearningExercises,
    ];

    fn members(&self) -> &'static [&'static str] {
        match self {
            MainCategory::Curriculum => &["Syllabus"],
            MainCategory::CourseMaterial => &[
                "Resources",
                "Reference Materials",
                "Other",
                "Notes",
                "Presentations",
            ],
            MainCategory::LabResources => &["Lab Manual"],
            MainCategory::LearningExercises => &[
                "Assignments",
                "Assignments Rubrics",
                "Suggested List of Microprojects",
                "Microproject Rubrics",
                "Question Bank",
                "Internal Viva Questions",
                "GTU Question Papers",
                "Question Papers",
                "Diary Format",
                "Cover Pages",
            ],
        }
    }
}

/// Section a stored category label is listed under. Unknown labels land in course material.
pub fn main_category_of(category: &str) -> MainCategory {
    MainCategory::ORDER
        .into_iter()
        .find(|main| main.members().contains(&category))
        .unwrap_or(MainCategory::CourseMaterial)
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceSection {
    pub heading: MainCategory,
    pub resources: Vec<Resource>,
}

/// Buckets resources into the four page sections, keeping their incoming order.
pub fn group_by_main_category(resources: Vec<Resource>) -> Vec<ResourceSection> {
    let mut sections: Vec<ResourceSection> = MainCategory::ORDER
        .into_iter()
        .map(|heading| ResourceSection {
            heading,
            resources: Vec::new(),
        })
        .collect();

    for resource in resources {
        let heading = main_category_of(&resource.category);
        if let Some(section) = sections.iter_mut().find(|s| s.heading == heading) {
            section.resources.push(resource);
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> ResourceCategory {
        normalize_category(Some(s))
    }

    #[test]
    fn test_lab_wins_over_notes() {
        assert_eq!(n("Lab Notes"), ResourceCategory::LabManual);
        assert_eq!(n("notes for lab"), ResourceCategory::LabManual);
    }

    #[test]
    fn test_empty_and_unknown_become_other() {
        assert_eq!(n(""), ResourceCategory::Other);
        assert_eq!(n("   "), ResourceCategory::Other);
        assert_eq!(normalize_category(None), ResourceCategory::Other);
        assert_eq!(n("xyz"), ResourceCategory::Other);
    }

    #[test]
    fn test_syllabus_requires_exact_match() {
        assert_eq!(n("Syallabus"), ResourceCategory::Syllabus);
        assert_eq!(n("  SYLLABUS "), ResourceCategory::Syllabus);
        // "syllabus" itself contains "lab"
        assert_eq!(n("syllabus notes"), ResourceCategory::LabManual);
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(n("Assignment papers"), ResourceCategory::Assignments);
        assert_eq!(n("Previous Year Papers"), ResourceCategory::QuestionPapers);
        assert_eq!(n("Study Material"), ResourceCategory::ReferenceMaterials);
        assert_eq!(n("Reference Materials"), ResourceCategory::ReferenceMaterials);
        assert_eq!(n("Class Notes"), ResourceCategory::Notes);
        assert_eq!(n("Presentations"), ResourceCategory::Presentations);
        assert_eq!(n("Extra Resources"), ResourceCategory::Resources);
        assert_eq!(n("name(Other)"), ResourceCategory::Other);
    }

    #[test]
    fn test_canonical_names_are_fixed_points() {
        for category in ResourceCategory::ALL {
            assert_eq!(n(category.as_str()), category, "{}", category);
        }
    }

    #[test]
    fn test_category_serializes_as_display_name() {
        let json = serde_json::to_string(&ResourceCategory::LabManual).unwrap();
        assert_eq!(json, "\"Lab Manual\"");
        let back: ResourceCategory = serde_json::from_str("\"Question Papers\"").unwrap();
        assert_eq!(back, ResourceCategory::QuestionPapers);
    }

    #[test]
    fn test_main_category_mapping() {
        assert_eq!(main_category_of("Syllabus"), MainCategory::Curriculum);
        assert_eq!(main_category_of("Lab Manual"), MainCategory::LabResources);
        assert_eq!(main_category_of("GTU Question Papers"), MainCategory::LearningExercises);
        assert_eq!(main_category_of("Notes"), MainCategory::CourseMaterial);
        assert_eq!(main_category_of("Something Else"), MainCategory::CourseMaterial);
    }

    #[test]
    fn test_group_by_main_category_keeps_all_sections() {
        let make = |id: &str, category: &str| Resource {
            id: id.to_string(),
            subject_id: "s1".to_string(),
            title: category.to_string(),
            category: category.to_string(),
            file_url: None,
            file_type: None,
            uploaded_by: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let sections = group_by_main_category(vec![
            make("r1", "Notes"),
            make("r2", "Syllabus"),
            make("r3", "Presentations"),
        ]);

        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0].heading, MainCategory::Curriculum);
        assert_eq!(sections[0].resources.len(), 1);
        let course: Vec<&str> = sections[1].resources.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(course, vec!["r1", "r3"]);
        assert!(sections[2].resources.is_empty());
        assert!(sections[3].resources.is_empty());
    }
}
