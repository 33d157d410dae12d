pub mod content;
pub mod profile;
pub mod resource;
pub mod subject;

pub use content::{
    Event, Faculty, Feedback, NewEventRequest, NewFacultyRequest, NewFeedbackRequest,
    NewPublicationRequest, Publication, UpdateEventRequest, UpdateFacultyRequest,
    UpdatePublicationRequest,
};
pub use profile::{CurrentUser, Profile};
pub use resource::{NewResource, NewResourceRow, Resource, UpdateResourceRequest};
pub use subject::{BulkSubjectRow, NewSubject, Subject, UpdateSubjectRequest};

/// Treats an all-whitespace form value as absent.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
