use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::db::CatalogStore;
use crate::import::parser::SubjectRecord;
use crate::models::{NewResource, NewSubject};

/// Every imported resource is an external link, never an uploaded file.
pub const LINK_FILE_TYPE: &str = "link";

#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    /// Human-readable progress lines in the order they happened.
    pub log: Vec<String>,
    pub subjects_inserted: usize,
    pub subjects_failed: usize,
    pub resources_inserted: usize,
    pub resource_batches_failed: usize,
}

impl ImportReport {
    fn push(&mut self, line: String) {
        info!("{}", line);
        self.log.push(line);
    }
}

/// Writes parsed subjects and their resources to the catalog, one subject at a time.
pub struct BulkImporter {
    store: Arc<dyn CatalogStore>,
    uploaded_by: Option<String>,
}

impl BulkImporter {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            uploaded_by: None,
        }
    }

    pub fn with_uploader(mut self, user_id: impl Into<String>) -> Self {
        self.uploaded_by = Some(user_id.into());
        self
    }

    /// Inserts each subject and then its resources as one batch.
    ///
    /// A failed subject skips its resources and the run moves on. A failed
    /// resource batch leaves its subject in place. Nothing is rolled back.
    pub async fn run(&self, subjects: &[SubjectRecord]) -> ImportReport {
        let mut report = ImportReport::default();
        report.push(format!("Uploading {} subjects…", subjects.len()));

        for record in subjects {
            report.push(format!("Inserting subject {} ({})", record.name, record.code));

            let new_subject = NewSubject {
                name: record.name.clone(),
                code: Some(record.code.clone()),
                semester: record.semester,
                old_new: None,
            };

            let subject = match self.store.insert_subject(new_subject).await {
                Ok(subject) => subject,
                Err(e) => {
                    warn!("subject {} failed: {}", record.code, e);
                    report.subjects_failed += 1;
                    report.push(format!("Subject failed: {}", e));
                    continue;
                }
            };
            report.subjects_inserted += 1;

            let resources: Vec<NewResource> = record
                .resources
                .iter()
                .map(|entry| NewResource {
                    subject_id: subject.id.clone(),
                    title: entry.category.to_string(),
                    category: entry.category.to_string(),
                    file_url: Some(entry.url.clone()),
                    file_type: Some(LINK_FILE_TYPE.to_string()),
                    uploaded_by: self.uploaded_by.clone(),
                })
                .collect();

            match self.store.insert_resources(resources).await {
                Ok(inserted) => {
                    report.resources_inserted += inserted.len();
                    report.push(format!("Inserted {} resources", inserted.len()));
                }
                Err(e) => {
                    warn!("resources for subject {} failed: {}", record.code, e);
                    report.resource_batches_failed += 1;
                    report.push(format!("Resource insert error: {}", e));
                }
            }
        }

        report.push("Upload complete.".to_string());
        report
    }
}
