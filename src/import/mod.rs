pub mod parser;
pub mod service;
pub mod template;

pub use parser::{
    HEADER_ROWS, ParsedImport, ResourceEntry, SkippedRow, SubjectRecord, group_rows, parse_csv,
};
pub use service::{BulkImporter, ImportReport, LINK_FILE_TYPE};
pub use template::{TEMPLATE_FILE_NAME, template_csv};
